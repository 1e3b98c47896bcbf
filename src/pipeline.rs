//! A minimal evaluator: a `|`-separated chain of function calls.
//!
//! ```text
//! sort "Volume" "dsc" | head 2 | table
//! ```
//!
//! The context value is the first argument of the first stage and every
//! stage's result is the first argument of the next. Arguments are
//! double-quoted strings, integers, floats, `true`/`false` or bare words,
//! which are taken as strings. The final value is written in canonical form.

use std::io::Write;

use crate::error::{Error, Result};
use crate::registry::Config;
use crate::template::Evaluator;
use crate::value::{FieldValue, Value};

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Word(String),
    Quoted(String),
    Pipe,
}

/// One function call in a pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct Stage {
    pub function: String,
    pub args: Vec<Value>,
}

/// Compiled form of a pipeline template
#[derive(Debug, Clone, PartialEq)]
pub struct Pipeline {
    pub stages: Vec<Stage>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineEvaluator;

impl Evaluator for PipelineEvaluator {
    type Compiled = Pipeline;

    fn compile(&self, name: &str, source: &str, config: &Config) -> Result<Pipeline> {
        let tokens = tokenize(source).map_err(|e| Error::Template(format!("{}: {}", name, e)))?;

        let mut stages = Vec::new();
        for (i, chunk) in tokens.split(|t| *t == Token::Pipe).enumerate() {
            let (head, rest) = chunk
                .split_first()
                .ok_or_else(|| Error::Template(format!("{}: stage {} is empty", name, i + 1)))?;
            let function = match head {
                Token::Word(w) => w.clone(),
                _ => {
                    return Err(Error::Template(format!(
                        "{}: stage {} must start with a function name",
                        name,
                        i + 1
                    )))
                }
            };
            if !config.is_enabled(&function) {
                return Err(Error::Template(format!(
                    "{}: function \"{}\" not defined",
                    name, function
                )));
            }
            let args = rest.iter().map(literal).collect();
            stages.push(Stage { function, args });
        }

        tracing::debug!("compiled '{}' into {} stages", name, stages.len());
        Ok(Pipeline { stages })
    }

    fn execute(
        &self,
        compiled: &Pipeline,
        context: &Value,
        config: &Config,
        out: &mut dyn Write,
    ) -> Result<()> {
        let mut current = context.clone();
        for stage in &compiled.stages {
            let mut args = Vec::with_capacity(stage.args.len() + 1);
            args.push(current);
            args.extend(stage.args.iter().cloned());
            current = config.call(&stage.function, &args)?;
        }
        write!(out, "{}", current).map_err(|e| Error::Template(e.to_string()))
    }
}

fn literal(token: &Token) -> Value {
    match token {
        Token::Quoted(s) => Value::from(s.as_str()),
        Token::Word(w) => {
            if w == "true" || w == "false" {
                Value::from(w == "true")
            } else if let Ok(i) = w.parse::<i64>() {
                Value::from(i)
            } else if let Some(f) = w
                .parse::<f64>()
                .ok()
                .filter(|_| w.chars().any(|c| c.is_ascii_digit()))
            {
                Value::Field(FieldValue::Float(f))
            } else {
                Value::from(w.as_str())
            }
        }
        Token::Pipe => Value::from("|"),
    }
}

fn tokenize(source: &str) -> std::result::Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let mut chars = source.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
        } else if c == '|' {
            chars.next();
            tokens.push(Token::Pipe);
        } else if c == '"' {
            chars.next();
            let mut s = String::new();
            loop {
                match chars.next() {
                    Some('"') => break,
                    Some('\\') => match chars.next() {
                        Some('n') => s.push('\n'),
                        Some('t') => s.push('\t'),
                        Some(other) => s.push(other),
                        None => return Err("unterminated string".to_string()),
                    },
                    Some(other) => s.push(other),
                    None => return Err("unterminated string".to_string()),
                }
            }
            tokens.push(Token::Quoted(s));
        } else {
            let mut w = String::new();
            while let Some(&c) = chars.peek() {
                if c.is_whitespace() || c == '|' || c == '"' {
                    break;
                }
                w.push(c);
                chars.next();
            }
            tokens.push(Token::Word(w));
        }
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Collection, Record, RecordType};
    use crate::registry::Function;
    use crate::value::Kind;

    fn stocks() -> Value {
        let ty = RecordType::builder("Stock")
            .field("Name", Kind::String)
            .field("Volume", Kind::Int)
            .build()
            .unwrap();
        let records = [("A", 100), ("B", 50), ("C", 75)]
            .iter()
            .map(|(n, v)| {
                Record::new(
                    ty.clone(),
                    vec![FieldValue::String(n.to_string()), FieldValue::Int(*v)],
                )
                .unwrap()
            })
            .collect();
        Collection::new(ty, records).unwrap().into()
    }

    fn run(source: &str, context: &Value) -> Result<String> {
        let config = Config::all();
        let pipeline = PipelineEvaluator.compile("test", source, &config)?;
        let mut out = Vec::new();
        PipelineEvaluator.execute(&pipeline, context, &config, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_tokenize() {
        let tokens = tokenize(r#"filter "Name" "a | b" | head 2"#).unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Word("filter".to_string()),
                Token::Quoted("Name".to_string()),
                Token::Quoted("a | b".to_string()),
                Token::Pipe,
                Token::Word("head".to_string()),
                Token::Word("2".to_string()),
            ]
        );
        assert!(tokenize("select \"Name").is_err());
    }

    #[test]
    fn test_literals() {
        assert_eq!(literal(&Token::Word("3".to_string())), Value::from(3));
        assert_eq!(literal(&Token::Word("true".to_string())), Value::from(true));
        assert_eq!(
            literal(&Token::Word("2.5".to_string())),
            Value::Field(FieldValue::Float(2.5))
        );
        assert_eq!(literal(&Token::Word("inf".to_string())), Value::from("inf"));
        assert_eq!(literal(&Token::Quoted("3".to_string())), Value::from("3"));
    }

    #[test]
    fn test_chain() {
        let out = run(r#"sort "Volume" "dsc" | head 2 | select "Name""#, &stocks()).unwrap();
        assert_eq!(out, "A\nC\n");
    }

    #[test]
    fn test_final_value_canonical() {
        let out = run("head 1", &stocks()).unwrap();
        assert_eq!(out, "[{A 100}]");
    }

    #[test]
    fn test_compile_errors() {
        let config = Config::new().with(Function::Head);
        assert!(matches!(
            PipelineEvaluator.compile("t", "head | tail", &config),
            Err(Error::Template(_))
        ));
        assert!(matches!(
            PipelineEvaluator.compile("t", "head || head", &config),
            Err(Error::Template(_))
        ));
        assert!(matches!(
            PipelineEvaluator.compile("t", "\"head\"", &config),
            Err(Error::Template(_))
        ));
    }

    #[test]
    fn test_runtime_error_propagates() {
        let err = run(r#"cols "Missing""#, &stocks()).unwrap_err();
        assert_eq!(
            err,
            Error::FieldNotFound {
                field: "Missing".to_string()
            }
        );
    }
}
