//! Entry points that run a template against a value.
//!
//! Parsing and executing template source is the job of an [`Evaluator`].
//! This module binds an evaluator to a function [`Config`] and routes its
//! output to a writer.

use std::io::Write;

use crate::error::{Error, Result};
use crate::registry::Config;
use crate::value::Value;

/// A template language that can call the functions of a [`Config`]
pub trait Evaluator {
    type Compiled;

    /// Parse `source`, failing on syntax errors or calls to functions the
    /// config does not enable.
    fn compile(&self, name: &str, source: &str, config: &Config) -> Result<Self::Compiled>;

    /// Run a compiled template on `context`, writing its output to `out`.
    fn execute(
        &self,
        compiled: &Self::Compiled,
        context: &Value,
        config: &Config,
        out: &mut dyn Write,
    ) -> Result<()>;
}

/// A compiled template together with the functions it was compiled against
#[derive(Debug, Clone)]
pub struct Template<C> {
    name: String,
    compiled: C,
    config: Config,
}

impl<C> Template<C> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn execute<E>(&self, evaluator: &E, context: &Value, out: &mut dyn Write) -> Result<()>
    where
        E: Evaluator<Compiled = C>,
    {
        tracing::debug!("executing template '{}'", self.name);
        evaluator.execute(&self.compiled, context, &self.config, out)
    }

    /// Execute into a string
    pub fn render<E>(&self, evaluator: &E, context: &Value) -> Result<String>
    where
        E: Evaluator<Compiled = C>,
    {
        let mut buf = Vec::new();
        self.execute(evaluator, context, &mut buf)?;
        String::from_utf8(buf).map_err(|e| Error::Template(e.to_string()))
    }
}

/// Compile `source` with the functions of `config` available.
///
/// `config` is `None` to enable every built-in function.
pub fn create_template<E: Evaluator>(
    name: &str,
    source: &str,
    config: Option<&Config>,
    evaluator: &E,
) -> Result<Template<E::Compiled>> {
    if source.is_empty() {
        return Err(Error::argument(format!("template '{}' has no source", name)));
    }
    let config = config.cloned().unwrap_or_else(Config::all);
    let compiled = evaluator.compile(name, source, &config)?;
    Ok(Template {
        name: name.to_string(),
        compiled,
        config,
    })
}

/// Compile `source` and run it once on `context`, writing to `out`.
///
/// # Example
/// ```
/// use recordkit::{output_to_template, PipelineEvaluator, Value};
///
/// let mut out = Vec::new();
/// let grid = Value::Grid(vec![
///     vec!["Name".to_string(), "Count".to_string()],
///     vec!["a".to_string(), "1".to_string()],
/// ]);
/// output_to_template(&mut out, "demo", "totable | select \"Count\"", &grid, None, &PipelineEvaluator)
///     .unwrap();
/// assert_eq!(String::from_utf8(out).unwrap(), "1\n");
/// ```
pub fn output_to_template<E: Evaluator>(
    out: &mut dyn Write,
    name: &str,
    source: &str,
    context: &Value,
    config: Option<&Config>,
    evaluator: &E,
) -> Result<()> {
    create_template(name, source, config, evaluator)?.execute(evaluator, context, out)
}
