//! Stable sorting of a collection by one field.

use std::str::FromStr;

use crate::compare::compare_keys;
use crate::error::{Error, Result};
use crate::path::FieldPath;
use crate::record::{Collection, Record};

/// Sort direction; parsed from `"asc"` or `"dsc"`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Ascending,
    Descending,
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "asc" => Ok(Direction::Ascending),
            "dsc" => Ok(Direction::Descending),
            other => Err(Error::argument(format!(
                "sort direction must be \"asc\" or \"dsc\", got \"{}\"",
                other
            ))),
        }
    }
}

/// Return a copy of `collection` ordered by `field`.
///
/// The sort is stable in both directions: records with equal keys keep their
/// input order. Records on which the field does not resolve sort as the
/// empty string.
pub fn sort_by(collection: &Collection, field: &str, direction: Direction) -> Result<Collection> {
    let path = FieldPath::single(field);
    let mut keyed: Vec<(Option<_>, &Record)> = collection
        .iter()
        .map(|record| (path.resolve(record).ok(), record))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| {
        let ordering = compare_keys(*a, *b);
        match direction {
            Direction::Ascending => ordering,
            Direction::Descending => ordering.reverse(),
        }
    });

    tracing::debug!("sort: {} records by '{}' {:?}", keyed.len(), field, direction);
    let records = keyed.into_iter().map(|(_, r)| r.clone()).collect();
    Ok(collection.with_records(records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordType;
    use crate::value::{FieldValue, Kind};

    fn stocks(rows: &[(&str, i64)]) -> Collection {
        let ty = RecordType::builder("Stock")
            .field("Name", Kind::String)
            .field("Volume", Kind::Int)
            .build()
            .unwrap();
        let records = rows
            .iter()
            .map(|(n, v)| {
                Record::new(
                    ty.clone(),
                    vec![FieldValue::String(n.to_string()), FieldValue::Int(*v)],
                )
                .unwrap()
            })
            .collect();
        Collection::new(ty, records).unwrap()
    }

    fn names(c: &Collection) -> Vec<String> {
        c.iter().map(|r| r.get("Name").unwrap().to_string()).collect()
    }

    #[test]
    fn test_numeric_descending() {
        let c = stocks(&[("A", 100), ("B", 50), ("C", 7500)]);
        let sorted = sort_by(&c, "Volume", Direction::Descending).unwrap();
        assert_eq!(names(&sorted), vec!["C", "A", "B"]);
        // Original untouched
        assert_eq!(names(&c), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_stable_on_ties() {
        let c = stocks(&[("first", 1), ("second", 0), ("third", 1), ("fourth", 0)]);
        let asc = sort_by(&c, "Volume", Direction::Ascending).unwrap();
        assert_eq!(names(&asc), vec!["second", "fourth", "first", "third"]);
        let dsc = sort_by(&c, "Volume", Direction::Descending).unwrap();
        assert_eq!(names(&dsc), vec!["first", "third", "second", "fourth"]);
    }

    #[test]
    fn test_idempotent_permutation() {
        let c = stocks(&[("b", 3), ("a", 3), ("c", 1)]);
        let once = sort_by(&c, "Name", Direction::Ascending).unwrap();
        let twice = sort_by(&once, "Name", Direction::Ascending).unwrap();
        assert_eq!(once, twice);
        assert_eq!(once.len(), c.len());
        let mut original = names(&c);
        original.sort();
        assert_eq!(names(&once), original);
    }

    #[test]
    fn test_unknown_field_keeps_order() {
        let c = stocks(&[("b", 3), ("a", 3)]);
        let sorted = sort_by(&c, "Missing", Direction::Descending).unwrap();
        assert_eq!(names(&sorted), vec!["b", "a"]);
    }

    #[test]
    fn test_direction_parse() {
        assert_eq!("asc".parse::<Direction>().unwrap(), Direction::Ascending);
        assert_eq!("dsc".parse::<Direction>().unwrap(), Direction::Descending);
        assert!(matches!("down".parse::<Direction>(), Err(Error::Argument(_))));
    }
}
