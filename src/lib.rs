//! # Recordkit: Record Transformations for Template-Scripted Tools
//!
//! Recordkit gives command-line tools a set of functions that templates can
//! call to reshape the records a tool produces before they are printed.
//!
//! ## Features
//!
//! - **Dynamic records**: typed records and homogeneous collections built at
//!   runtime or reflected from JSON and `Serialize` host types
//! - **Filtering and sorting**: six string match modes, stable one-field sort
//! - **Slicing**: `head`, `tail`, `rows`, `cols`, `promote`, `sliceof`
//! - **Rendering**: elastic text tables, JSON, CSV and type descriptions
//! - **Schema synthesis**: `totable` infers a record type from a string grid
//! - **Function registry**: pick the functions a template may call, add host
//!   functions and generate help for exactly that set
//!
//! ## Example: Top Stock by Volume
//!
//! ```
//! use recordkit::{Collection, Config, Value};
//! use serde_json::json;
//!
//! let stocks = Collection::from_json(
//!     &json!([
//!         {"Name": "A", "Volume": 100},
//!         {"Name": "B", "Volume": 50}
//!     ]),
//!     "Stock",
//! )
//! .unwrap();
//!
//! let config = Config::all();
//! let sorted = config
//!     .call("sort", &[stocks.into(), "Volume".into(), "dsc".into()])
//!     .unwrap();
//! let top = config.call("head", &[sorted, 1.into()]).unwrap();
//! let names = config.call("select", &[top, "Name".into()]).unwrap();
//! assert_eq!(names, Value::from("A\n"));
//! ```
//!
//! ## Example: Pipelines
//!
//! ```
//! use recordkit::{output_to_template, PipelineEvaluator, Value};
//!
//! let grid: Value = vec![
//!     vec!["Name".to_string(), "Count".to_string()],
//!     vec!["a".to_string(), "2".to_string()],
//!     vec!["b".to_string(), "7".to_string()],
//! ]
//! .into();
//!
//! let mut out = Vec::new();
//! output_to_template(&mut out, "top", "totable | sort Count dsc | head | tojson", &grid, None, &PipelineEvaluator)
//!     .unwrap();
//! assert!(String::from_utf8(out).unwrap().contains("\"Count\": 7"));
//! ```

// Core model
pub mod error;
pub mod value;
pub mod record;
pub mod path;
pub mod compare;
pub mod schema;

// Operations
pub mod ops;
pub mod serialization;
pub mod convert;

// Function registry and template entry points
mod help;
pub mod registry;
pub mod settings;
pub mod template;
pub mod pipeline;

// Re-export key types
pub use error::{Error, Result};
pub use value::{FieldValue, Grid, Kind, Value};
pub use record::{Collection, FieldDecl, Record, RecordType, RecordTypeBuilder};
pub use path::FieldPath;
pub use schema::{describe, Schema, MAX_DEPTH};
pub use ops::{Direction, FilterMode, TableSpec};
pub use serialization::{to_csv, to_json};
pub use registry::{generate_usage_decorated, generate_usage_undecorated, Config, CustomFn, Function};
pub use settings::{FunctionSelection, Settings, TableSettings};
pub use template::{create_template, output_to_template, Evaluator, Template};
pub use pipeline::{Pipeline, PipelineEvaluator, Stage};
