//! Grid model for the month and year views.
//!
//! Everything here is a pure function of the anchor month, the completed
//! set and "today"; rendering to HTML or text lives in [`crate::ui`].

use crate::completed::CompletedDates;
use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// A month page is always six weeks of seven days.
pub const GRID_CELLS: usize = 42;

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

pub const WEEKDAY_NAMES: [&str; 7] = ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Month,
    Year,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Month => ViewMode::Year,
            ViewMode::Year => ViewMode::Month,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ViewMode::Month => "month",
            ViewMode::Year => "year",
        }
    }

    /// Label of the control that switches away from this mode.
    pub fn toggle_label(self) -> &'static str {
        match self {
            ViewMode::Month => "Year View",
            ViewMode::Year => "Month View",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "month" => Some(ViewMode::Month),
            "year" => Some(ViewMode::Year),
            _ => None,
        }
    }
}

/// Year and month currently on display. Always holds the 1st of the month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthAnchor(NaiveDate);

impl MonthAnchor {
    /// `month` is 1-based.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Self)
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self(date.with_day(1).unwrap_or(date))
    }

    pub fn year(self) -> i32 {
        self.0.year()
    }

    pub fn month(self) -> u32 {
        self.0.month()
    }

    pub fn first_day(self) -> NaiveDate {
        self.0
    }

    /// Weekday of the 1st, 0 = Sunday.
    pub fn first_weekday(self) -> u32 {
        self.0.weekday().num_days_from_sunday()
    }

    pub fn day_count(self) -> u32 {
        match self.0.checked_add_months(Months::new(1)) {
            Some(next) => (next - self.0).num_days() as u32,
            // December of the last representable year.
            None => 31,
        }
    }

    pub fn previous_month(self) -> Self {
        self.shift_back(Months::new(1))
    }

    pub fn next_month(self) -> Self {
        self.shift_forward(Months::new(1))
    }

    pub fn previous_year(self) -> Self {
        self.shift_back(Months::new(12))
    }

    pub fn next_year(self) -> Self {
        self.shift_forward(Months::new(12))
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }

    pub fn days(self) -> impl Iterator<Item = NaiveDate> {
        self.0.iter_days().take(self.day_count() as usize)
    }

    pub fn label(self) -> String {
        format!("{} {}", self.month_name(), self.year())
    }

    pub fn month_name(self) -> &'static str {
        MONTH_NAMES[self.month0()]
    }

    fn month0(self) -> usize {
        self.0.month0() as usize
    }

    fn shift_back(self, months: Months) -> Self {
        self.0.checked_sub_months(months).map(Self).unwrap_or(self)
    }

    fn shift_forward(self, months: Months) -> Self {
        self.0.checked_add_months(months).map(Self).unwrap_or(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCell {
    /// Day of month; 0 for year-view alignment blanks.
    pub day: u32,
    /// Set only for days of the displayed month, which are the toggleable ones.
    pub date: Option<NaiveDate>,
    pub other_month: bool,
    pub today: bool,
    pub completed: bool,
}

impl DayCell {
    fn adjacent(day: u32) -> Self {
        Self {
            day,
            date: None,
            other_month: true,
            today: false,
            completed: false,
        }
    }

    fn blank() -> Self {
        Self::adjacent(0)
    }

    fn current(date: NaiveDate, today: NaiveDate, completed: &CompletedDates) -> Self {
        Self {
            day: date.day(),
            date: Some(date),
            other_month: false,
            today: date == today,
            completed: completed.contains(date),
        }
    }

    pub fn is_interactive(&self) -> bool {
        self.date.is_some()
    }

    pub fn is_blank(&self) -> bool {
        self.day == 0
    }

    pub fn key(&self) -> Option<String> {
        self.date.map(date_key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    pub anchor: MonthAnchor,
    pub cells: Vec<DayCell>,
}

impl MonthGrid {
    pub fn weeks(&self) -> impl Iterator<Item = &[DayCell]> {
        self.cells.chunks(7)
    }

    pub fn current_cells(&self) -> impl Iterator<Item = &DayCell> {
        self.cells.iter().filter(|cell| !cell.other_month)
    }

    pub fn cell_for(&self, date: NaiveDate) -> Option<&DayCell> {
        self.cells.iter().find(|cell| cell.date == Some(date))
    }
}

/// Compact month used by the year view: leading blanks, then the month's days.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MiniMonth {
    pub anchor: MonthAnchor,
    pub cells: Vec<DayCell>,
}

impl MiniMonth {
    pub fn weeks(&self) -> impl Iterator<Item = &[DayCell]> {
        self.cells.chunks(7)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearGrid {
    pub year: i32,
    pub months: Vec<MiniMonth>,
}

impl YearGrid {
    pub fn cell_for(&self, date: NaiveDate) -> Option<&DayCell> {
        self.months
            .iter()
            .flat_map(|month| month.cells.iter())
            .find(|cell| cell.date == Some(date))
    }
}

pub fn month_grid(anchor: MonthAnchor, completed: &CompletedDates, today: NaiveDate) -> MonthGrid {
    let leading = anchor.first_weekday();
    let previous_day_count = anchor.previous_month().day_count();

    let mut cells = Vec::with_capacity(GRID_CELLS);
    for offset in (0..leading).rev() {
        cells.push(DayCell::adjacent(previous_day_count - offset));
    }

    cells.extend(anchor.days().map(|date| DayCell::current(date, today, completed)));

    let trailing = GRID_CELLS.saturating_sub(cells.len()) as u32;
    for day in 1..=trailing {
        cells.push(DayCell::adjacent(day));
    }

    MonthGrid { anchor, cells }
}

pub fn year_grid(anchor: MonthAnchor, completed: &CompletedDates, today: NaiveDate) -> YearGrid {
    let year = anchor.year();
    let months = (1..=12)
        .filter_map(|month| MonthAnchor::new(year, month))
        .map(|month| {
            let mut cells = Vec::with_capacity(month.first_weekday() as usize + 31);
            cells.extend((0..month.first_weekday()).map(|_| DayCell::blank()));
            cells.extend(month.days().map(|date| DayCell::current(date, today, completed)));
            MiniMonth {
                anchor: month,
                cells,
            }
        })
        .collect();

    YearGrid { year, months }
}

/// Wire form of a date: `YYYY-MM-DD`, zero padded.
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Strict inverse of [`date_key`]; rejects unpadded or out-of-range input.
pub fn parse_date_key(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.len() != 10 {
        return None;
    }
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()?;
    (date_key(date) == value).then_some(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn anchor(year: i32, month: u32) -> MonthAnchor {
        MonthAnchor::new(year, month).unwrap()
    }

    #[test]
    fn month_grid_always_has_42_cells() {
        let completed = CompletedDates::default();
        let today = date(2026, 10, 19);
        for year in [1999, 2000, 2015, 2024, 2100] {
            for month in 1..=12 {
                let grid = month_grid(anchor(year, month), &completed, today);
                assert_eq!(grid.cells.len(), GRID_CELLS, "{year}-{month}");
                assert_eq!(grid.weeks().count(), 6);
            }
        }
    }

    #[test]
    fn march_2024_layout() {
        let grid = month_grid(anchor(2024, 3), &CompletedDates::default(), date(2026, 1, 1));

        let leading: Vec<u32> = grid.cells[..5].iter().map(|cell| cell.day).collect();
        assert_eq!(leading, vec![25, 26, 27, 28, 29]);
        assert!(grid.cells[..5].iter().all(|cell| cell.other_month && !cell.is_interactive()));

        assert_eq!(grid.current_cells().count(), 31);
        assert_eq!(grid.cells[5].date, Some(date(2024, 3, 1)));
        assert_eq!(grid.cells[35].date, Some(date(2024, 3, 31)));

        let trailing: Vec<u32> = grid.cells[36..].iter().map(|cell| cell.day).collect();
        assert_eq!(trailing, vec![1, 2, 3, 4, 5, 6]);
        assert!(grid.cells[36..].iter().all(|cell| cell.other_month));
    }

    #[test]
    fn february_starting_on_sunday_has_no_leading_days() {
        // February 2015 starts on a Sunday and has 28 days.
        let grid = month_grid(anchor(2015, 2), &CompletedDates::default(), date(2026, 1, 1));
        assert!(!grid.cells[0].other_month);
        assert_eq!(grid.cells[0].day, 1);
        assert_eq!(grid.current_cells().count(), 28);
        assert_eq!(grid.cells.iter().filter(|cell| cell.other_month).count(), 14);
    }

    #[test]
    fn completed_marks_only_members_of_the_displayed_month() {
        let completed = CompletedDates::from_keys(["2024-03-05", "2024-03-10", "2024-04-01"]);
        let grid = month_grid(anchor(2024, 3), &completed, date(2026, 1, 1));

        let marked: Vec<u32> = grid
            .cells
            .iter()
            .filter(|cell| cell.completed)
            .map(|cell| cell.day)
            .collect();
        assert_eq!(marked, vec![5, 10]);
        // April 1st appears as trailing padding but is never marked.
        assert!(grid.cells[36..].iter().all(|cell| !cell.completed));
    }

    #[test]
    fn today_is_marked_once_and_only_in_its_month() {
        let today = date(2024, 3, 19);
        let completed = CompletedDates::default();

        let march = month_grid(anchor(2024, 3), &completed, today);
        let todays: Vec<_> = march.cells.iter().filter(|cell| cell.today).collect();
        assert_eq!(todays.len(), 1);
        assert_eq!(todays[0].date, Some(today));

        for other in [anchor(2024, 2), anchor(2024, 4), anchor(2023, 3)] {
            let grid = month_grid(other, &completed, today);
            assert!(grid.cells.iter().all(|cell| !cell.today), "{}", other.label());
        }
    }

    #[test]
    fn year_grid_has_leading_blanks_only() {
        let completed = CompletedDates::from_keys(["2024-02-29", "2024-12-25"]);
        let grid = year_grid(anchor(2024, 7), &completed, date(2026, 1, 1));

        assert_eq!(grid.year, 2024);
        assert_eq!(grid.months.len(), 12);

        let march = &grid.months[2];
        assert_eq!(march.cells.len(), 5 + 31);
        assert!(march.cells[..5].iter().all(DayCell::is_blank));
        assert!(march.cells[5..].iter().all(DayCell::is_interactive));

        let february = &grid.months[1];
        assert_eq!(february.cells.iter().filter(|cell| cell.is_interactive()).count(), 29);

        assert!(grid.cell_for(date(2024, 2, 29)).unwrap().completed);
        assert!(grid.cell_for(date(2024, 12, 25)).unwrap().completed);
        assert!(!grid.cell_for(date(2024, 12, 24)).unwrap().completed);
    }

    #[test]
    fn navigation_rolls_over_year_boundaries() {
        assert_eq!(anchor(2024, 1).previous_month(), anchor(2023, 12));
        assert_eq!(anchor(2023, 12).next_month(), anchor(2024, 1));
        assert_eq!(anchor(2024, 3).previous_year(), anchor(2023, 3));
        assert_eq!(anchor(2024, 3).next_year(), anchor(2025, 3));
    }

    #[test]
    fn day_counts_follow_leap_years() {
        assert_eq!(anchor(2024, 2).day_count(), 29);
        assert_eq!(anchor(2023, 2).day_count(), 28);
        assert_eq!(anchor(1900, 2).day_count(), 28);
        assert_eq!(anchor(2000, 2).day_count(), 29);
        assert_eq!(anchor(2024, 4).day_count(), 30);
        assert_eq!(anchor(2024, 12).day_count(), 31);
    }

    #[test]
    fn date_keys_are_zero_padded_and_strict() {
        assert_eq!(date_key(date(2024, 3, 7)), "2024-03-07");
        assert_eq!(parse_date_key("2024-03-07"), Some(date(2024, 3, 7)));
        assert_eq!(parse_date_key("2024-3-7"), None);
        assert_eq!(parse_date_key("2023-02-29"), None);
        assert_eq!(parse_date_key("not-a-date"), None);
    }

    #[test]
    fn view_mode_labels() {
        assert_eq!(ViewMode::default(), ViewMode::Month);
        assert_eq!(ViewMode::Month.toggled(), ViewMode::Year);
        assert_eq!(ViewMode::Month.toggle_label(), "Year View");
        assert_eq!(ViewMode::Year.toggle_label(), "Month View");
        assert_eq!(ViewMode::parse("year"), Some(ViewMode::Year));
        assert_eq!(ViewMode::parse("week"), None);
    }
}
