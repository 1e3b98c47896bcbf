//! Usage paragraphs for the built-in functions.

pub(crate) const HELP_HEADER: &str = "Some new functions have been added to the template language\n\n";

// Examples are written as pipeline stages: the current value is passed as
// the first argument, so it never appears in the argument list.

pub(crate) const FILTER: &str = r#"- 'filter' keeps the elements of a collection whose named field, rendered as
  a string, equals the given value exactly, e.g.

  filter "Protected" "true" | table

  prints the elements whose "Protected" field is "true".
"#;

pub(crate) const FILTER_CONTAINS: &str = r#"- 'filterContains' works like filter but keeps substring matches, e.g.

  filterContains "Name" "Cloud" | select "Name"

  prints the names that contain "Cloud".
"#;

pub(crate) const FILTER_HAS_PREFIX: &str =
    "- 'filterHasPrefix' works like filter but keeps prefix matches.\n";

pub(crate) const FILTER_HAS_SUFFIX: &str =
    "- 'filterHasSuffix' works like filter but keeps suffix matches.\n";

pub(crate) const FILTER_FOLDED: &str = r#"- 'filterFolded' works like filter but compares under Unicode case folding.
"#;

pub(crate) const FILTER_REGEXP: &str = r#"- 'filterRegexp' works like filter but keeps regular expression matches, e.g.

  filterRegexp "Name" "^Docker[ a-zA-Z]*latest$" | select "Name"

  prints the names that start with "Docker" and end with "latest".  An
  invalid expression fails the whole call.
"#;

pub(crate) const TO_JSON: &str =
    "- 'tojson' renders its argument as indented JSON, e.g., tojson\n";

pub(crate) const TO_CSV: &str = r#"- 'tocsv' renders a collection or a grid of strings as CSV, e.g.,

  tocsv

  An optional boolean second argument, when true, drops the header row of
  field names.  It defaults to false and has no effect on grids.
"#;

pub(crate) const SELECT: &str = r#"- 'select' prints one named field of every element of a collection, one
  value per line, e.g.,

  select "Name"
"#;

pub(crate) const SELECT_ALT: &str =
    "- 'selectalt' works like select but prints values in their alternate form.\n";

pub(crate) const TABLE: &str = r#"- 'table' lays a collection out as a text table, one row per element and
  one column per field, headed by the field names.  Hidden fields and fields
  that cannot be reflected are left out.  Minimum column width, tab width and
  padding take their default values.  For example

  table
"#;

pub(crate) const TABLE_ALT: &str =
    "- 'tablealt' works like table but prints values in their alternate form.\n";

pub(crate) const TABLE_X: &str = r#"- 'tablex' works like table but gives control over the layout.  It takes
  at least 4 arguments: the collection, the minimum column width, the tab
  width and the padding.  Any further arguments replace the column headings
  in order; columns without a replacement keep their field name.  For example

  tablex 12 8 1 "Column 1" "Column 2"
  tablex 8 8 1
"#;

pub(crate) const TABLE_X_ALT: &str =
    "- 'tablexalt' works like tablex but prints values in their alternate form.\n";

pub(crate) const HTABLE: &str = r#"- 'htable' prints every element of a collection as its own two column
  table: field names on the left, values on the right.  Hidden fields and
  fields that cannot be reflected are left out.  For example

  htable
"#;

pub(crate) const HTABLE_ALT: &str =
    "- 'htablealt' works like htable but prints values in their alternate form.\n";

pub(crate) const HTABLE_X: &str = r#"- 'htablex' works like htable but gives control over the layout.  It takes
  at least 4 arguments: the collection, the minimum column width, the tab
  width and the padding.  Any further arguments replace the labels of the
  first column in order.  For example

  htablex 12 8 1 "Field 1" "Field 2"
  htablex 8 8 1
"#;

pub(crate) const HTABLE_X_ALT: &str =
    "- 'htablexalt' works like htablex but prints values in their alternate form.\n";

pub(crate) const COLS: &str = r#"- 'cols' keeps only the named fields of every element of a collection, in
  the order given, e.g.

  cols "Name" "Address"

  returns a collection whose elements have exactly the fields 'Name' and
  'Address'.  Naming a field that does not exist is an error.
"#;

pub(crate) const SORT: &str = r#"- 'sort' orders a collection by one field.  The first argument is the
  collection, the second the field name and the optional third the
  direction, "asc" (the default) or "dsc".  Numbers compare numerically,
  strings lexically and anything else by its string form.  Equal elements
  keep their order.  For example

  sort "Name" | table
"#;

pub(crate) const ROWS: &str = r#"- 'rows' picks elements of a collection by 0-based index, in the order the
  indices are given.  Indices past the end are ignored.  For example

  rows 1 2

  returns the 2nd and 3rd elements.
"#;

pub(crate) const HEAD: &str = r#"- 'head' returns the first n elements of a collection, or just the first
  when n is omitted, e.g.

  head 3

  A collection shorter than n is returned whole.
"#;

pub(crate) const TAIL: &str = r#"- 'tail' works like head but returns the last n elements, e.g.

  tail 2
"#;

pub(crate) const DESCRIBE: &str = r#"- 'describe' prints a description of the type of its argument, which helps
  when a tool's help does not document the data passed to the template.

  describe
"#;

pub(crate) const PROMOTE: &str = r#"- 'promote' takes a collection and a dotted field path and returns the
  collection of records found at that path in each element.  Every segment
  must name a nested record.  For elements shaped like

  Account {
      uninteresting int
      user User {
          credentials Credentials {
              name string
          }
      }
  }

  promote "user.credentials"

  returns one Credentials record per account.
"#;

pub(crate) const SLICEOF: &str =
    "- 'sliceof' wraps a single record in a one element collection.\n";

pub(crate) const TO_TABLE: &str = r#"- 'totable' turns a grid of strings into a collection of records.  The first
  row names the fields and the second row decides each field's kind, trying
  bool, then int, then float, then string.  Later rows must parse under the
  same kinds.  Headings must be unique and are turned into identifiers when
  they are not already.
"#;
