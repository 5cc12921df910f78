use crate::models::{AppData, ExportRecord};
use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn path(self) -> &'static str {
        match self {
            ExportFormat::Json => "/api/export/json",
            ExportFormat::Csv => "/api/export/csv",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Csv => "text/csv",
        }
    }
}

/// Every stored day, completed or not, ordered by date.
pub fn records(data: &AppData) -> Vec<ExportRecord> {
    data.days
        .iter()
        .map(|(date, completed)| ExportRecord {
            date: date.clone(),
            completed: *completed,
        })
        .collect()
}

pub fn to_json(data: &AppData) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec_pretty(&records(data))
}

pub fn to_csv(data: &AppData) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["Date", "Completed"])?;
    for record in records(data) {
        let completed = if record.completed { "Yes" } else { "No" };
        writer.write_record([record.date.as_str(), completed])?;
    }
    writer
        .into_inner()
        .map_err(|err| csv::Error::from(err.into_error()))
}

pub fn file_name(format: ExportFormat, today: NaiveDate) -> String {
    format!(
        "goals_export_{}.{}",
        today.format("%Y%m%d"),
        format.extension()
    )
}
