use crate::calendar::{date_key, month_grid, parse_date_key, year_grid, MonthAnchor, ViewMode};
use crate::completed::CompletedDates;
use crate::errors::AppError;
use crate::export::{self, ExportFormat};
use crate::models::{CalendarQuery, DaysResponse, ToggleResponse};
use crate::state::AppState;
use crate::stats::build_stats;
use crate::storage::persist_data;
use crate::ui::{calendar_href, render_month_page, render_year_page};
use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{Html, IntoResponse, Redirect},
    Json,
};
use chrono::{Local, NaiveDate};
use tracing::info;

pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<CalendarQuery>,
) -> Html<String> {
    let today = Local::now().date_naive();
    let (view, anchor) = resolve_view(&query, today);
    let completed = {
        let data = state.data.lock().await;
        CompletedDates::from_keys(data.completed_days())
    };
    let stats = build_stats(&completed, anchor);

    let page = match view {
        ViewMode::Month => render_month_page(&month_grid(anchor, &completed, today), &stats),
        ViewMode::Year => {
            render_year_page(&year_grid(anchor, &completed, today), anchor, &stats)
        }
    };
    Html(page)
}

pub async fn get_days(State(state): State<AppState>) -> Json<DaysResponse> {
    let data = state.data.lock().await;
    Json(DaysResponse {
        completed_days: data.completed_days(),
    })
}

pub async fn toggle_day(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Json<ToggleResponse>, AppError> {
    let completed = apply_toggle(&state, &date).await?;
    Ok(Json(ToggleResponse {
        success: true,
        completed,
    }))
}

pub async fn toggle_form(
    State(state): State<AppState>,
    Path(date): Path<String>,
    Query(query): Query<CalendarQuery>,
) -> Result<Redirect, AppError> {
    apply_toggle(&state, &date).await?;
    let (view, anchor) = resolve_view(&query, Local::now().date_naive());
    Ok(Redirect::to(&calendar_href(view, anchor)))
}

pub async fn export_json(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let data = state.data.lock().await;
    let body = export::to_json(&data).map_err(AppError::internal)?;
    Ok(attachment(ExportFormat::Json, body))
}

pub async fn export_csv(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let data = state.data.lock().await;
    let body = export::to_csv(&data).map_err(AppError::internal)?;
    Ok(attachment(ExportFormat::Csv, body))
}

async fn apply_toggle(state: &AppState, date: &str) -> Result<bool, AppError> {
    let key = parse_date_key(date)
        .map(date_key)
        .ok_or_else(|| AppError::bad_request(format!("invalid date '{date}', expected YYYY-MM-DD")))?;

    let mut data = state.data.lock().await;
    let previous = data.days.get(&key).copied();
    let completed = !previous.unwrap_or(false);
    data.days.insert(key.clone(), completed);

    if let Err(err) = persist_data(&state.data_path, &data).await {
        match previous {
            Some(value) => data.days.insert(key, value),
            None => data.days.remove(&key),
        };
        return Err(err);
    }

    info!(completed, "toggled {key}");
    Ok(completed)
}

fn resolve_view(query: &CalendarQuery, today: NaiveDate) -> (ViewMode, MonthAnchor) {
    let view = query
        .view
        .as_deref()
        .and_then(ViewMode::parse)
        .unwrap_or_default();
    let year = query.year.unwrap_or_else(|| MonthAnchor::from_date(today).year());
    let month = query.month.unwrap_or_else(|| MonthAnchor::from_date(today).month());
    let anchor = MonthAnchor::new(year, month).unwrap_or_else(|| MonthAnchor::from_date(today));
    (view, anchor)
}

fn attachment(format: ExportFormat, body: Vec<u8>) -> impl IntoResponse {
    let file_name = export::file_name(format, Local::now().date_naive());
    (
        [
            (header::CONTENT_TYPE, format.mime().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        body,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AppData;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 19).unwrap()
    }

    #[test]
    fn resolve_view_defaults_to_current_month() {
        let (view, anchor) = resolve_view(&CalendarQuery::default(), today());
        assert_eq!(view, ViewMode::Month);
        assert_eq!(anchor, MonthAnchor::new(2024, 3).unwrap());
    }

    #[test]
    fn resolve_view_falls_back_on_bad_month() {
        let query = CalendarQuery {
            view: Some("year".to_string()),
            year: Some(2020),
            month: Some(13),
        };
        let (view, anchor) = resolve_view(&query, today());
        assert_eq!(view, ViewMode::Year);
        assert_eq!(anchor, MonthAnchor::new(2024, 3).unwrap());
    }

    fn unwritable_state(data: AppData) -> AppState {
        // A directory cannot be written as a file.
        AppState::new(std::env::temp_dir(), data)
    }

    #[tokio::test]
    async fn failed_persist_forgets_new_days() {
        let state = unwritable_state(AppData::default());

        let err = apply_toggle(&state, "2024-03-05").await.unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::INTERNAL_SERVER_ERROR);
        assert!(state.data.lock().await.days.is_empty());
    }

    #[tokio::test]
    async fn failed_persist_restores_previous_flag() {
        let mut data = AppData::default();
        data.days.insert("2024-03-05".to_string(), true);
        data.days.insert("2024-03-06".to_string(), false);
        let state = unwritable_state(data);

        assert!(apply_toggle(&state, "2024-03-05").await.is_err());
        assert!(apply_toggle(&state, "2024-03-06").await.is_err());

        let data = state.data.lock().await;
        assert_eq!(data.days.get("2024-03-05"), Some(&true));
        assert_eq!(data.days.get("2024-03-06"), Some(&false));
        assert_eq!(data.days.len(), 2);
    }

    #[tokio::test]
    async fn invalid_date_is_a_bad_request() {
        let state = unwritable_state(AppData::default());
        let err = apply_toggle(&state, "2024-3-5").await.unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::BAD_REQUEST);
        assert!(state.data.lock().await.days.is_empty());
    }
}
