pub mod app;
pub mod calendar;
pub mod client;
pub mod completed;
pub mod controller;
pub mod errors;
pub mod export;
pub mod handlers;
pub mod models;
pub mod stats;
pub mod storage;
pub mod ui;
pub mod state;

pub use app::router;
pub use client::{ClientError, DaysApi, HttpDaysApi};
pub use controller::{CalendarController, ControllerOptions};
pub use state::AppState;
pub use storage::{load_data, resolve_data_path};
