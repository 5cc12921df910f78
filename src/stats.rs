use crate::calendar::MonthAnchor;
use crate::completed::CompletedDates;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CalendarStats {
    pub month_count: usize,
    pub total_count: usize,
}

pub fn build_stats(completed: &CompletedDates, anchor: MonthAnchor) -> CalendarStats {
    CalendarStats {
        month_count: completed.count_in_month(anchor),
        total_count: completed.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_count_anchor_month_and_total() {
        let completed = CompletedDates::from_keys(["2024-03-05", "2024-03-10", "2024-02-29"]);
        let stats = build_stats(&completed, MonthAnchor::new(2024, 3).unwrap());
        assert_eq!(stats.month_count, 2);
        assert_eq!(stats.total_count, 3);
    }

    #[test]
    fn stats_empty_set() {
        let stats = build_stats(&CompletedDates::default(), MonthAnchor::new(2024, 1).unwrap());
        assert_eq!(stats, CalendarStats::default());
    }
}
