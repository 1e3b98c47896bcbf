//! Function dispatch table for template evaluators.
//!
//! A [`Config`] records which functions a template may call. The evaluator
//! hands it a function name and positional arguments and gets back a value or
//! an error. Documentation for the enabled set is always emitted in the fixed
//! priority order of [`Function`], whatever order functions were enabled in.

use indexmap::IndexMap;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::help;
use crate::ops::{self, Direction, FilterMode, TableSpec};
use crate::record::Collection;
use crate::schema;
use crate::serialization;
use crate::value::Value;

/// Built-in functions, declared in help priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Function {
    Filter,
    FilterContains,
    FilterHasPrefix,
    FilterHasSuffix,
    FilterFolded,
    FilterRegexp,
    ToJson,
    ToCsv,
    Select,
    SelectAlt,
    Table,
    TableAlt,
    TableX,
    TableXAlt,
    HTable,
    HTableAlt,
    HTableX,
    HTableXAlt,
    Cols,
    Sort,
    Rows,
    Head,
    Tail,
    Describe,
    Promote,
    Sliceof,
    ToTable,
}

impl Function {
    pub const ALL: [Function; 27] = [
        Function::Filter,
        Function::FilterContains,
        Function::FilterHasPrefix,
        Function::FilterHasSuffix,
        Function::FilterFolded,
        Function::FilterRegexp,
        Function::ToJson,
        Function::ToCsv,
        Function::Select,
        Function::SelectAlt,
        Function::Table,
        Function::TableAlt,
        Function::TableX,
        Function::TableXAlt,
        Function::HTable,
        Function::HTableAlt,
        Function::HTableX,
        Function::HTableXAlt,
        Function::Cols,
        Function::Sort,
        Function::Rows,
        Function::Head,
        Function::Tail,
        Function::Describe,
        Function::Promote,
        Function::Sliceof,
        Function::ToTable,
    ];

    pub const FILTERS: [Function; 6] = [
        Function::Filter,
        Function::FilterContains,
        Function::FilterHasPrefix,
        Function::FilterHasSuffix,
        Function::FilterFolded,
        Function::FilterRegexp,
    ];

    /// Position in the documentation; lower comes first
    pub fn priority(self) -> usize {
        self as usize
    }

    /// Name used to call the function from a template
    pub fn name(self) -> &'static str {
        match self {
            Function::Filter => "filter",
            Function::FilterContains => "filterContains",
            Function::FilterHasPrefix => "filterHasPrefix",
            Function::FilterHasSuffix => "filterHasSuffix",
            Function::FilterFolded => "filterFolded",
            Function::FilterRegexp => "filterRegexp",
            Function::ToJson => "tojson",
            Function::ToCsv => "tocsv",
            Function::Select => "select",
            Function::SelectAlt => "selectalt",
            Function::Table => "table",
            Function::TableAlt => "tablealt",
            Function::TableX => "tablex",
            Function::TableXAlt => "tablexalt",
            Function::HTable => "htable",
            Function::HTableAlt => "htablealt",
            Function::HTableX => "htablex",
            Function::HTableXAlt => "htablexalt",
            Function::Cols => "cols",
            Function::Sort => "sort",
            Function::Rows => "rows",
            Function::Head => "head",
            Function::Tail => "tail",
            Function::Describe => "describe",
            Function::Promote => "promote",
            Function::Sliceof => "sliceof",
            Function::ToTable => "totable",
        }
    }

    pub fn help(self) -> &'static str {
        match self {
            Function::Filter => help::FILTER,
            Function::FilterContains => help::FILTER_CONTAINS,
            Function::FilterHasPrefix => help::FILTER_HAS_PREFIX,
            Function::FilterHasSuffix => help::FILTER_HAS_SUFFIX,
            Function::FilterFolded => help::FILTER_FOLDED,
            Function::FilterRegexp => help::FILTER_REGEXP,
            Function::ToJson => help::TO_JSON,
            Function::ToCsv => help::TO_CSV,
            Function::Select => help::SELECT,
            Function::SelectAlt => help::SELECT_ALT,
            Function::Table => help::TABLE,
            Function::TableAlt => help::TABLE_ALT,
            Function::TableX => help::TABLE_X,
            Function::TableXAlt => help::TABLE_X_ALT,
            Function::HTable => help::HTABLE,
            Function::HTableAlt => help::HTABLE_ALT,
            Function::HTableX => help::HTABLE_X,
            Function::HTableXAlt => help::HTABLE_X_ALT,
            Function::Cols => help::COLS,
            Function::Sort => help::SORT,
            Function::Rows => help::ROWS,
            Function::Head => help::HEAD,
            Function::Tail => help::TAIL,
            Function::Describe => help::DESCRIBE,
            Function::Promote => help::PROMOTE,
            Function::Sliceof => help::SLICEOF,
            Function::ToTable => help::TO_TABLE,
        }
    }

    pub fn from_name(name: &str) -> Option<Function> {
        Function::ALL.iter().copied().find(|f| f.name() == name)
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A host-supplied function callable from templates
pub trait CustomFn: Send + Sync {
    fn call(&self, args: &[Value]) -> Result<Value>;
}

impl<F> CustomFn for F
where
    F: Fn(&[Value]) -> Result<Value> + Send + Sync,
{
    fn call(&self, args: &[Value]) -> Result<Value> {
        self(args)
    }
}

#[derive(Clone)]
struct CustomEntry {
    func: Arc<dyn CustomFn>,
    help: Option<String>,
}

/// The set of functions enabled for a template, plus their dispatch
#[derive(Clone)]
pub struct Config {
    enabled: BTreeSet<Function>,
    custom: IndexMap<String, CustomEntry>,
    table_defaults: TableSpec,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("enabled", &self.enabled)
            .field("custom", &self.custom.keys().collect::<Vec<_>>())
            .field("table_defaults", &self.table_defaults)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::all()
    }
}

impl Config {
    /// A config with nothing enabled
    pub fn new() -> Self {
        Self {
            enabled: BTreeSet::new(),
            custom: IndexMap::new(),
            table_defaults: TableSpec::default(),
        }
    }

    /// Every built-in function enabled
    pub fn all() -> Self {
        Function::ALL.iter().fold(Self::new(), |c, f| c.with(*f))
    }

    /// Enable one function. Enabling twice, or enabling a function whose
    /// name a custom function already took, does nothing.
    pub fn with(mut self, function: Function) -> Self {
        if !self.custom.contains_key(function.name()) {
            self.enabled.insert(function);
        }
        self
    }

    /// Enable the six filter functions
    pub fn with_filters(self) -> Self {
        Function::FILTERS.iter().fold(self, |c, f| c.with(*f))
    }

    /// Width, tab and padding used by `table`, `htable` and their alt forms
    pub fn with_table_defaults(mut self, width: usize, tab: usize, padding: usize) -> Self {
        self.table_defaults = TableSpec::new(width, tab, padding);
        self
    }

    pub fn table_defaults(&self) -> &TableSpec {
        &self.table_defaults
    }

    pub fn is_enabled(&self, name: &str) -> bool {
        self.custom.contains_key(name)
            || Function::from_name(name).is_some_and(|f| self.enabled.contains(&f))
    }

    /// Register a host function under `name`.
    ///
    /// Fails if `name` is already callable. Trailing whitespace is trimmed
    /// from `help_text`; an empty help text keeps the function out of the
    /// documentation.
    pub fn add_custom_fn(
        &mut self,
        name: impl Into<String>,
        func: impl CustomFn + 'static,
        help_text: &str,
    ) -> Result<()> {
        let name = name.into();
        if self.is_enabled(&name) {
            return Err(Error::argument(format!("{} already exists", name)));
        }
        let trimmed = help_text.trim_end();
        let help = (!trimmed.is_empty()).then(|| format!("{}\n", trimmed));
        self.custom.insert(
            name,
            CustomEntry {
                func: Arc::new(func),
                help,
            },
        );
        Ok(())
    }

    fn helpers(&self) -> impl Iterator<Item = (&str, &str)> {
        let builtins = self.enabled.iter().map(|f| (f.name(), f.help()));
        let custom = self
            .custom
            .iter()
            .filter_map(|(name, entry)| entry.help.as_deref().map(|h| (name.as_str(), h)));
        builtins.chain(custom)
    }

    /// Names of the documented functions, in help order
    pub fn function_names(&self) -> Vec<String> {
        self.helpers().map(|(name, _)| name.to_string()).collect()
    }

    /// Documentation for every documented function, in help order
    pub fn function_help(&self) -> String {
        let mut out = String::from(help::HELP_HEADER);
        for (_, text) in self.helpers() {
            out.push_str(text);
        }
        out
    }

    /// Documentation for one function
    pub fn function_help_single(&self, name: &str) -> Result<&str> {
        self.helpers()
            .find(|(n, _)| *n == name)
            .map(|(_, text)| text)
            .ok_or_else(|| Error::argument(format!("{} is not defined", name)))
    }

    /// Invoke the function called `name`.
    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value> {
        if let Some(entry) = self.custom.get(name) {
            tracing::debug!("calling custom function '{}'", name);
            return entry.func.call(args);
        }
        match Function::from_name(name) {
            Some(function) if self.enabled.contains(&function) => {
                tracing::debug!("calling '{}' with {} arguments", name, args.len());
                self.call_builtin(function, Args { function, args })
            }
            _ => Err(Error::argument(format!("function '{}' is not enabled", name))),
        }
    }

    fn call_builtin(&self, function: Function, args: Args<'_>) -> Result<Value> {
        use Function::*;

        let value = match function {
            Filter => args.filter(FilterMode::Exact)?,
            FilterContains => args.filter(FilterMode::Contains)?,
            FilterHasPrefix => args.filter(FilterMode::HasPrefix)?,
            FilterHasSuffix => args.filter(FilterMode::HasSuffix)?,
            FilterFolded => args.filter(FilterMode::Folded)?,
            FilterRegexp => args.filter(FilterMode::Regexp)?,
            ToJson => {
                args.arity(1, Some(1))?;
                serialization::to_json(&args.args[0])?.into()
            }
            ToCsv => {
                args.arity(1, Some(2))?;
                let omit_header = args.optional_bool(1, false)?;
                serialization::to_csv(&args.args[0], omit_header)?.into()
            }
            Select | SelectAlt => {
                args.arity(2, Some(2))?;
                ops::select(args.collection(0)?, args.string(1)?, function == SelectAlt)?.into()
            }
            Table | TableAlt => {
                args.arity(1, Some(1))?;
                let spec = self.table_defaults.clone().with_alt(function == TableAlt);
                ops::table(args.collection(0)?, &spec).into()
            }
            HTable | HTableAlt => {
                args.arity(1, Some(1))?;
                let spec = self.table_defaults.clone().with_alt(function == HTableAlt);
                ops::htable(args.collection(0)?, &spec).into()
            }
            TableX | TableXAlt => {
                let spec = args.table_spec(function == TableXAlt)?;
                ops::table(args.collection(0)?, &spec).into()
            }
            HTableX | HTableXAlt => {
                let spec = args.table_spec(function == HTableXAlt)?;
                ops::htable(args.collection(0)?, &spec).into()
            }
            Cols => {
                args.arity(2, None)?;
                let names = args.strings_from(1)?;
                ops::cols(args.collection(0)?, &names)?.into()
            }
            Sort => {
                args.arity(2, Some(3))?;
                let direction = match args.args.get(2) {
                    Some(_) => args.string(2)?.parse()?,
                    None => Direction::Ascending,
                };
                ops::sort_by(args.collection(0)?, args.string(1)?, direction)?.into()
            }
            Rows => {
                args.arity(2, None)?;
                let indices = (1..args.args.len())
                    .map(|i| args.int(i))
                    .collect::<Result<Vec<_>>>()?;
                ops::rows(args.collection(0)?, &indices)?.into()
            }
            Head | Tail => {
                args.arity(1, Some(2))?;
                let n = args.optional_int(1, 1)?;
                let collection = args.collection(0)?;
                let result = if function == Head {
                    ops::head(collection, n)?
                } else {
                    ops::tail(collection, n)?
                };
                result.into()
            }
            Describe => {
                args.arity(1, Some(1))?;
                schema::describe(&args.args[0])?.into()
            }
            Promote => {
                args.arity(2, Some(2))?;
                ops::promote(args.collection(0)?, args.string(1)?)?.into()
            }
            Sliceof => {
                args.arity(1, Some(1))?;
                ops::sliceof(&args.args[0])?.into()
            }
            ToTable => {
                args.arity(1, Some(1))?;
                ops::to_table(args.grid(0)?)?.into()
            }
        };
        Ok(value)
    }
}

/// The structure of `value`, as `describe` prints it.
pub fn generate_usage_undecorated(value: &Value) -> Result<String> {
    schema::describe(value)
}

/// Usage text for a command-line option that takes a template: the
/// structure of `value` followed by the help for every function in `config`.
pub fn generate_usage_decorated(flag: &str, value: &Value, config: &Config) -> Result<String> {
    let mut out = format!("The template passed to the -{} option operates on a\n\n", flag);
    out.push_str(&schema::describe(value)?);
    out.push('\n');
    out.push_str(&config.function_help());
    Ok(out)
}

/// Positional argument accessors that produce uniform errors
struct Args<'a> {
    function: Function,
    args: &'a [Value],
}

impl<'a> Args<'a> {
    fn arity(&self, min: usize, max: Option<usize>) -> Result<()> {
        let n = self.args.len();
        if n < min || max.is_some_and(|max| n > max) {
            let expected = match max {
                Some(max) if max == min => format!("{}", min),
                Some(max) => format!("{} to {}", min, max),
                None => format!("at least {}", min),
            };
            return Err(Error::argument(format!(
                "{} takes {} arguments, got {}",
                self.function, expected, n
            )));
        }
        Ok(())
    }

    fn get(&self, index: usize) -> Result<&'a Value> {
        self.args.get(index).ok_or_else(|| {
            Error::argument(format!("{}: missing argument {}", self.function, index + 1))
        })
    }

    fn wrong(&self, index: usize, expected: &str, got: &Value) -> Error {
        Error::argument(format!(
            "{}: argument {} must be {}, got {}",
            self.function,
            index + 1,
            expected,
            got.describe_kind()
        ))
    }

    fn collection(&self, index: usize) -> Result<&'a Collection> {
        let value = self.get(index)?;
        value.as_collection().ok_or_else(|| {
            Error::shape(format!(
                "{} expects a collection, got {}",
                self.function,
                value.describe_kind()
            ))
        })
    }

    fn grid(&self, index: usize) -> Result<&'a crate::value::Grid> {
        let value = self.get(index)?;
        value.as_grid().ok_or_else(|| {
            Error::shape(format!(
                "{} expects a grid of strings, got {}",
                self.function,
                value.describe_kind()
            ))
        })
    }

    fn string(&self, index: usize) -> Result<&'a str> {
        let value = self.get(index)?;
        value.as_str().ok_or_else(|| self.wrong(index, "a string", value))
    }

    fn int(&self, index: usize) -> Result<i64> {
        let value = self.get(index)?;
        value.as_int().ok_or_else(|| self.wrong(index, "an integer", value))
    }

    fn optional_int(&self, index: usize, default: i64) -> Result<i64> {
        match self.args.get(index) {
            Some(_) => self.int(index),
            None => Ok(default),
        }
    }

    fn optional_bool(&self, index: usize, default: bool) -> Result<bool> {
        match self.args.get(index) {
            Some(value) => value.as_bool().ok_or_else(|| self.wrong(index, "a boolean", value)),
            None => Ok(default),
        }
    }

    fn size(&self, index: usize) -> Result<usize> {
        let n = self.int(index)?;
        usize::try_from(n).map_err(|_| {
            Error::argument(format!(
                "{}: argument {} must not be negative, got {}",
                self.function,
                index + 1,
                n
            ))
        })
    }

    fn strings_from(&self, start: usize) -> Result<Vec<&'a str>> {
        (start..self.args.len()).map(|i| self.string(i)).collect()
    }

    /// `collection field pattern`
    fn filter(&self, mode: FilterMode) -> Result<Value> {
        self.arity(3, Some(3))?;
        let result = ops::filter(self.collection(0)?, self.string(1)?, self.string(2)?, mode)?;
        Ok(result.into())
    }

    /// `collection width tab padding [headings...]`
    fn table_spec(&self, alt: bool) -> Result<TableSpec> {
        self.arity(4, None)?;
        let headings = self
            .strings_from(4)?
            .into_iter()
            .map(str::to_string)
            .collect();
        Ok(TableSpec::new(self.size(1)?, self.size(2)?, self.size(3)?)
            .with_headings(headings)
            .with_alt(alt))
    }
}
