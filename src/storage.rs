use crate::errors::AppError;
use crate::models::AppData;
use std::{env, path::Path, path::PathBuf};
use tokio::fs;
use tracing::error;

pub const DEFAULT_DATA_PATH: &str = "data/goals.json";

pub fn resolve_data_path() -> Result<PathBuf, std::io::Error> {
    if let Ok(path) = env::var("APP_DATA_PATH") {
        return Ok(PathBuf::from(path));
    }

    Ok(PathBuf::from(DEFAULT_DATA_PATH))
}

pub async fn load_data(path: &Path) -> AppData {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(data) => data,
            Err(err) => {
                error!("failed to parse data file {}: {err}", path.display());
                AppData::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => AppData::default(),
        Err(err) => {
            error!("failed to read data file {}: {err}", path.display());
            AppData::default()
        }
    }
}

pub async fn persist_data(path: &Path, data: &AppData) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(data).map_err(AppError::internal)?;
    fs::write(path, payload).await.map_err(AppError::internal)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        env::temp_dir().join(format!("habit_calendar_{name}_{}_{nanos}.json", std::process::id()))
    }

    #[tokio::test]
    async fn missing_file_loads_empty() {
        let data = load_data(&temp_path("missing")).await;
        assert!(data.days.is_empty());
    }

    #[tokio::test]
    async fn corrupt_file_loads_empty() {
        let path = temp_path("corrupt");
        fs::write(&path, b"{ not json").await.unwrap();
        assert!(load_data(&path).await.days.is_empty());
        let _ = fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn persisted_data_loads_back() {
        let path = temp_path("persist");
        let mut data = AppData::default();
        data.days.insert("2024-03-05".to_string(), true);
        data.days.insert("2024-03-06".to_string(), false);
        persist_data(&path, &data).await.unwrap();

        let loaded = load_data(&path).await;
        assert_eq!(loaded.completed_days(), vec!["2024-03-05".to_string()]);
        assert_eq!(loaded.days.len(), 2);
        let _ = fs::remove_file(&path).await;
    }
}
