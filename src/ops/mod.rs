//! Record operations.
//!
//! Every operation is a pure function of its inputs: it validates shape,
//! builds a new value and never mutates the collection it was given.

pub mod filter;
pub mod slice;
pub mod sort;
pub mod table;
pub mod totable;

pub use filter::{filter, FilterMode};
pub use slice::{cols, head, promote, rows, select, sliceof, tail};
pub use sort::{sort_by, Direction};
pub use table::{htable, table, TableSpec};
pub use totable::to_table;
