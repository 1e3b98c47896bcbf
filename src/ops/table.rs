//! Aligned text tables.
//!
//! `table` lays a collection out one row per record; `htable` emits one
//! two-column (field, value) table per record. Column widths follow the
//! elastic tab stop rule: every column but the last is as wide as its widest
//! cell plus padding, and never narrower than the minimum width.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::record::{Collection, Record};

pub const DEFAULT_WIDTH: usize = 8;
pub const DEFAULT_TAB: usize = 8;
pub const DEFAULT_PADDING: usize = 8;

/// Rendering configuration for the table operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSpec {
    /// Minimum column width, padding included
    pub width: usize,
    /// Tab stop used to expand tab characters inside cells
    pub tab: usize,
    /// Spaces added after the widest cell of a column
    pub padding: usize,
    /// Replacement headings (first column labels for `htable`), by position
    pub headings: Vec<String>,
    /// Render values in their alternate form
    pub alt: bool,
}

impl Default for TableSpec {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            tab: DEFAULT_TAB,
            padding: DEFAULT_PADDING,
            headings: Vec::new(),
            alt: false,
        }
    }
}

impl TableSpec {
    pub fn new(width: usize, tab: usize, padding: usize) -> Self {
        Self {
            width,
            tab,
            padding,
            ..Self::default()
        }
    }

    pub fn with_headings(mut self, headings: Vec<String>) -> Self {
        self.headings = headings;
        self
    }

    pub fn with_alt(mut self, alt: bool) -> Self {
        self.alt = alt;
        self
    }

    fn heading<'a>(&'a self, index: usize, field_name: &'a str) -> &'a str {
        self.headings
            .get(index)
            .map(String::as_str)
            .unwrap_or(field_name)
    }

    fn cells(&self, record: &Record) -> Vec<String> {
        record
            .visible()
            .map(|(_, value)| {
                if self.alt {
                    value.alt().to_string()
                } else {
                    value.to_string()
                }
            })
            .collect()
    }
}

/// One row per record, one column per visible field, headed by field names.
pub fn table(collection: &Collection, spec: &TableSpec) -> String {
    let header: Vec<String> = collection
        .record_type()
        .visible_fields()
        .enumerate()
        .map(|(i, (_, decl))| spec.heading(i, &decl.name).to_string())
        .collect();

    let mut lines = Vec::with_capacity(collection.len() + 1);
    lines.push(header);
    lines.extend(collection.iter().map(|record| spec.cells(record)));

    tracing::debug!("table: {} rows", collection.len());
    layout(&lines, spec)
}

/// One two-column table per record, separated by blank lines.
pub fn htable(collection: &Collection, spec: &TableSpec) -> String {
    let names: Vec<&str> = collection
        .record_type()
        .visible_fields()
        .enumerate()
        .map(|(i, (_, decl))| spec.heading(i, &decl.name))
        .collect();

    let tables: Vec<String> = collection
        .iter()
        .map(|record| {
            let lines: Vec<Vec<String>> = names
                .iter()
                .zip(spec.cells(record))
                .map(|(name, value)| vec![name.to_string(), value])
                .collect();
            layout(&lines, spec)
        })
        .collect();

    tables.join("\n")
}

fn expand_tabs(cell: &str, tab: usize) -> String {
    if !cell.contains('\t') {
        return cell.to_string();
    }
    let tab = tab.max(1);
    let mut out = String::with_capacity(cell.len());
    let mut column = 0;
    for c in cell.chars() {
        if c == '\t' {
            let spaces = tab - column % tab;
            out.extend(std::iter::repeat(' ').take(spaces));
            column += spaces;
        } else {
            out.push(c);
            column += c.width().unwrap_or(0);
        }
    }
    out
}

fn layout(lines: &[Vec<String>], spec: &TableSpec) -> String {
    let lines: Vec<Vec<String>> = lines
        .iter()
        .map(|line| line.iter().map(|cell| expand_tabs(cell, spec.tab)).collect())
        .collect();

    let columns = lines.iter().map(Vec::len).max().unwrap_or(0);
    let mut widths = vec![0usize; columns];
    for line in &lines {
        for (i, cell) in line.iter().enumerate() {
            widths[i] = widths[i].max(cell.width() + spec.padding);
        }
    }
    for w in &mut widths {
        *w = (*w).max(spec.width);
    }

    let mut out = String::new();
    for line in &lines {
        for (i, cell) in line.iter().enumerate() {
            out.push_str(cell);
            if i + 1 < line.len() {
                let fill = widths[i].saturating_sub(cell.width());
                out.extend(std::iter::repeat(' ').take(fill));
            }
        }
        out.push('\n');
    }
    out
}
