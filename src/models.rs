use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Persisted store: every date ever toggled, with its current completion flag.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppData {
    pub days: BTreeMap<String, bool>,
}

impl AppData {
    pub fn completed_days(&self) -> Vec<String> {
        self.days
            .iter()
            .filter(|(_, completed)| **completed)
            .map(|(date, _)| date.clone())
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DaysResponse {
    pub completed_days: Vec<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToggleResponse {
    pub success: bool,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExportRecord {
    pub date: String,
    pub completed: bool,
}

/// Query string of the calendar page and of the form toggle redirect.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CalendarQuery {
    pub view: Option<String>,
    pub year: Option<i32>,
    pub month: Option<u32>,
}
