//! YAML settings for hosts that configure the function set from a file.
//!
//! ```yaml
//! functions: [filter, sort, head, table]   # or: all
//! table:
//!   width: 4
//!   tab: 8
//!   padding: 2
//! flag: f
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::ops::table::{DEFAULT_PADDING, DEFAULT_TAB, DEFAULT_WIDTH};
use crate::registry::{Config, Function};

/// Which built-in functions a template may call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FunctionSelection {
    /// `all` or `none`
    Keyword(String),
    Names(Vec<String>),
}

impl Default for FunctionSelection {
    fn default() -> Self {
        FunctionSelection::Keyword("all".to_string())
    }
}

impl FunctionSelection {
    fn resolve(&self) -> Result<Vec<Function>> {
        match self {
            FunctionSelection::Keyword(k) if k == "all" => Ok(Function::ALL.to_vec()),
            FunctionSelection::Keyword(k) if k == "none" => Ok(Vec::new()),
            FunctionSelection::Keyword(k) => Err(Error::Config(format!(
                "functions must be 'all', 'none' or a list of names, got '{}'",
                k
            ))),
            FunctionSelection::Names(names) => names
                .iter()
                .map(|name| {
                    Function::from_name(name)
                        .ok_or_else(|| Error::Config(format!("unknown function '{}'", name)))
                })
                .collect(),
        }
    }
}

/// Layout used by the table functions that take no layout arguments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSettings {
    #[serde(default = "default_width")]
    pub width: usize,
    #[serde(default = "default_tab")]
    pub tab: usize,
    #[serde(default = "default_padding")]
    pub padding: usize,
}

fn default_width() -> usize {
    DEFAULT_WIDTH
}

fn default_tab() -> usize {
    DEFAULT_TAB
}

fn default_padding() -> usize {
    DEFAULT_PADDING
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            tab: DEFAULT_TAB,
            padding: DEFAULT_PADDING,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default)]
    pub functions: FunctionSelection,

    #[serde(default)]
    pub table: TableSettings,

    /// Option name quoted by decorated usage, without the leading dash
    #[serde(default = "default_flag")]
    pub flag: String,
}

fn default_flag() -> String {
    "f".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            functions: FunctionSelection::default(),
            table: TableSettings::default(),
            flag: default_flag(),
        }
    }
}

impl Settings {
    /// Load settings from a YAML file.
    ///
    /// # Errors
    /// Returns `Error::Config` if the file can't be read, isn't valid YAML or
    /// names an unknown function.
    ///
    /// # Example
    /// ```ignore
    /// use recordkit::Settings;
    ///
    /// let settings = Settings::load_from_file("recordkit.yaml")?;
    /// let config = settings.to_config()?;
    /// ```
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read settings file {}: {}", path.display(), e))
        })?;
        Self::from_yaml(&contents)
    }

    pub fn from_yaml(contents: &str) -> Result<Self> {
        let settings: Settings = serde_yaml::from_str(contents)
            .map_err(|e| Error::Config(format!("Failed to parse YAML: {}", e)))?;
        settings.functions.resolve()?;
        Ok(settings)
    }

    /// Build the function configuration these settings describe
    pub fn to_config(&self) -> Result<Config> {
        let config = self
            .functions
            .resolve()?
            .into_iter()
            .fold(Config::new(), Config::with);
        Ok(config.with_table_defaults(self.table.width, self.table.tab, self.table.padding))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let settings = Settings::from_yaml("{}").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.flag, "f");
        assert_eq!(settings.to_config().unwrap().function_names().len(), 27);
    }

    #[test]
    fn test_default_flag_used_in_usage() {
        let settings = Settings::default();
        assert_eq!(settings.flag, "f");
        let config = settings.to_config().unwrap();
        let usage =
            crate::registry::generate_usage_decorated(&settings.flag, &crate::Value::from(1), &config)
                .unwrap();
        assert!(usage.starts_with("The template passed to the -f option"));
    }

    #[test]
    fn test_function_list() {
        let settings = Settings::from_yaml("functions: [sort, head, filter]\nflag: t\n").unwrap();
        let config = settings.to_config().unwrap();
        assert_eq!(config.function_names(), vec!["filter", "sort", "head"]);
        assert_eq!(settings.flag, "t");
    }

    #[test]
    fn test_none_keyword() {
        let config = Settings::from_yaml("functions: none").unwrap().to_config().unwrap();
        assert!(config.function_names().is_empty());
    }

    #[test]
    fn test_unknown_function_rejected() {
        let err = Settings::from_yaml("functions: [sort, shuffle]").unwrap_err();
        assert!(matches!(err, Error::Config(ref m) if m.contains("shuffle")));
        assert!(Settings::from_yaml("functions: some").is_err());
    }

    #[test]
    fn test_partial_table_settings() {
        let settings = Settings::from_yaml("table:\n  padding: 1\n").unwrap();
        assert_eq!(
            settings.table,
            TableSettings {
                width: DEFAULT_WIDTH,
                tab: DEFAULT_TAB,
                padding: 1
            }
        );
        let config = settings.to_config().unwrap();
        assert_eq!(config.table_defaults().padding, 1);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "functions: all\ntable:\n  width: 2\n  tab: 4\n  padding: 3").unwrap();

        let settings = Settings::load_from_file(file.path()).unwrap();
        assert_eq!(settings.table.width, 2);
        assert_eq!(settings.table.tab, 4);

        let missing = Settings::load_from_file("/nonexistent/recordkit.yaml");
        assert!(matches!(missing, Err(Error::Config(_))));
    }
}
