use crate::calendar::{parse_date_key, MonthAnchor};
use chrono::NaiveDate;
use std::collections::BTreeSet;
use tracing::warn;

/// Dates the user has marked done.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletedDates {
    dates: BTreeSet<NaiveDate>,
}

impl CompletedDates {
    /// Builds the set from wire keys, dropping anything that is not a valid `YYYY-MM-DD` date.
    pub fn from_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut dates = BTreeSet::new();
        for key in keys {
            let key = key.as_ref();
            match parse_date_key(key) {
                Some(date) => {
                    dates.insert(date);
                }
                None => warn!("ignoring invalid completed date {key:?}"),
            }
        }
        Self { dates }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.dates.contains(&date)
    }

    /// Records the confirmed state of `date`.
    pub fn set(&mut self, date: NaiveDate, completed: bool) {
        if completed {
            self.dates.insert(date);
        } else {
            self.dates.remove(&date);
        }
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn count_in_month(&self, anchor: MonthAnchor) -> usize {
        self.dates.iter().filter(|date| anchor.contains(**date)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_keys_skips_invalid_entries() {
        let completed = CompletedDates::from_keys(["2024-03-05", "garbage", "2024-02-30", "2024-03-05"]);
        assert_eq!(completed.len(), 1);
        assert!(completed.contains(NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()));
    }

    #[test]
    fn set_inserts_and_removes() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        let mut completed = CompletedDates::default();

        completed.set(date, true);
        assert!(completed.contains(date));
        completed.set(date, true);
        assert_eq!(completed.len(), 1);

        completed.set(date, false);
        assert!(completed.is_empty());
    }

    #[test]
    fn count_in_month_matches_year_and_month() {
        let completed =
            CompletedDates::from_keys(["2024-03-01", "2024-03-31", "2023-03-15", "2024-04-01"]);
        let march = MonthAnchor::new(2024, 3).unwrap();
        assert_eq!(completed.count_in_month(march), 2);
    }
}
