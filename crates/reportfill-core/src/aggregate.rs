/// Per-sector measure totals.
///
/// Built once per run from the resolved source rows and consumed by the sector
/// table writer. Unresolved rows are kept in their own bucket so totals can be
/// inspected, but no sheet label ever selects that bucket.
use std::collections::BTreeMap;

use crate::config::MeasureType;
use crate::resolve::GroupKey;
use crate::source::{SourceRow, finite_or_zero};

/// Summed measures of one group.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Totals {
    /// Ferrous total.
    pub bms: f64,
    /// Non-ferrous total.
    pub fms: f64,
}

impl Totals {
    /// Total for `measure`.
    pub fn get(&self, measure: MeasureType) -> f64 {
        match measure {
            MeasureType::Bms => self.bms,
            MeasureType::Fms => self.fms,
        }
    }

    /// Measures of a single row; non-finite values become zero.
    pub fn of_row(row: &SourceRow) -> Self {
        Self {
            bms: row.measure(MeasureType::Bms),
            fms: row.measure(MeasureType::Fms),
        }
    }

    fn add(&mut self, other: Self) {
        self.bms += finite_or_zero(other.bms);
        self.fms += finite_or_zero(other.fms);
    }
}

/// Totals keyed by [`GroupKey`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregate {
    groups: BTreeMap<GroupKey, Totals>,
}

impl Aggregate {
    /// Sums `rows` into groups chosen by `key_fn`.
    pub fn build<'a, I, F>(rows: I, mut key_fn: F) -> Self
    where
        I: IntoIterator<Item = &'a SourceRow>,
        F: FnMut(&SourceRow) -> GroupKey,
    {
        let mut groups: BTreeMap<GroupKey, Totals> = BTreeMap::new();
        for row in rows {
            groups.entry(key_fn(row)).or_default().add(Totals::of_row(row));
        }
        Self { groups }
    }

    /// Totals for a sector label, matched exactly.
    pub fn sector(&self, label: &str) -> Option<&Totals> {
        self.groups.get(&GroupKey::Sector(label.to_owned()))
    }

    /// Totals of the rows that did not resolve, if there were any.
    pub fn unresolved(&self) -> Option<&Totals> {
        self.groups.get(&GroupKey::Unresolved)
    }

    /// All groups in key order, sectors first.
    pub fn iter(&self) -> impl Iterator<Item = (&GroupKey, &Totals)> {
        self.groups.iter()
    }

    /// Number of groups, including the unresolved bucket.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Returns `true` when no row was aggregated.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::row;

    fn by_manager(row: &SourceRow) -> GroupKey {
        match row.manager.as_str() {
            "Иванов" | "Петров" => GroupKey::Sector("СекторА".to_owned()),
            _ => GroupKey::Unresolved,
        }
    }

    #[test]
    fn rows_with_same_key_are_summed() {
        let rows = [
            row("", "Иванов", "", 50.0, 1.5),
            row("", "Петров", "", 70.0, 2.5),
        ];
        let aggregate = Aggregate::build(&rows, by_manager);
        let totals = aggregate.sector("СекторА").copied().unwrap_or_default();
        assert_eq!(totals.get(MeasureType::Bms), 120.0);
        assert_eq!(totals.get(MeasureType::Fms), 4.0);
        assert_eq!(aggregate.len(), 1);
    }

    #[test]
    fn nan_counts_as_zero() {
        let rows = [
            row("", "Иванов", "", 100.0, 0.0),
            row("", "Иванов", "", f64::NAN, 0.0),
        ];
        let aggregate = Aggregate::build(&rows, by_manager);
        assert_eq!(aggregate.sector("СекторА").map(|t| t.bms), Some(100.0));
    }

    #[test]
    fn unresolved_rows_form_their_own_group() {
        let rows = [
            row("", "Иванов", "", 10.0, 0.0),
            row("", "Сидоров", "", 5.0, 0.0),
            row("", "Козлов", "", 7.0, 0.0),
        ];
        let aggregate = Aggregate::build(&rows, by_manager);
        assert_eq!(aggregate.unresolved().map(|t| t.bms), Some(12.0));
        assert_eq!(aggregate.len(), 2);
        let keys: Vec<_> = aggregate.iter().map(|(k, _)| k.clone()).collect();
        assert_eq!(keys.last(), Some(&GroupKey::Unresolved));
    }

    #[test]
    fn sector_lookup_is_exact() {
        let rows = [row("", "Иванов", "", 10.0, 0.0)];
        let aggregate = Aggregate::build(&rows, by_manager);
        assert!(aggregate.sector("секторА").is_none());
        assert!(aggregate.sector("СекторА ").is_none());
    }

    #[test]
    fn empty_input_gives_empty_aggregate() {
        let rows: [SourceRow; 0] = [];
        let aggregate = Aggregate::build(&rows, by_manager);
        assert!(aggregate.is_empty());
        assert!(aggregate.unresolved().is_none());
    }
}
