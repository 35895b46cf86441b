//! Derived per-date record of which sessions already hold a placement.
//!
//! Rebuilt from scratch on every rebalance pass and discarded afterwards;
//! never persisted.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use uuid::Uuid;

/// Upper bound on distinct subjects scheduled on one calendar day.
pub const MAX_SUBJECTS_PER_DAY: usize = 2;

/// Date → occupying session ids, accumulated while a pass places modules.
#[derive(Debug, Clone, Default)]
pub struct Occupancy {
    by_date: BTreeMap<NaiveDate, HashSet<Uuid>>,
}

impl Occupancy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `session` holds a placement on `date`.
    pub fn register(&mut self, date: NaiveDate, session: Uuid) {
        self.by_date.entry(date).or_default().insert(session);
    }

    /// Whether `session` may still place a module on `date`.
    ///
    /// A day below the subject cap is open to anyone; a day at the cap stays
    /// open to the sessions already on it (a session may always stack more of
    /// its own modules on a day it occupies), and closed to newcomers.
    pub fn has_slot(&self, date: NaiveDate, session: Uuid) -> bool {
        self.by_date
            .get(&date)
            .is_none_or(|ids| ids.len() < MAX_SUBJECTS_PER_DAY || ids.contains(&session))
    }

    /// Number of distinct sessions occupying `date`.
    pub fn distinct_subjects(&self, date: NaiveDate) -> usize {
        self.by_date.get(&date).map_or(0, HashSet::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    #[test]
    fn empty_day_is_open() {
        let occ = Occupancy::new();
        assert!(occ.has_slot(date(1), Uuid::new_v4()));
        assert_eq!(occ.distinct_subjects(date(1)), 0);
    }

    #[test]
    fn day_at_cap_is_closed_to_newcomers() {
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let mut occ = Occupancy::new();
        occ.register(date(1), a);
        assert!(occ.has_slot(date(1), b));
        occ.register(date(1), b);
        assert!(!occ.has_slot(date(1), c));
    }

    #[test]
    fn day_at_cap_stays_open_to_its_occupants() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let mut occ = Occupancy::new();
        occ.register(date(1), a);
        occ.register(date(1), b);
        assert!(occ.has_slot(date(1), a));
        assert!(occ.has_slot(date(1), b));
    }

    #[test]
    fn registering_twice_counts_once() {
        let a = Uuid::new_v4();
        let mut occ = Occupancy::new();
        occ.register(date(1), a);
        occ.register(date(1), a);
        assert_eq!(occ.distinct_subjects(date(1)), 1);
    }
}
