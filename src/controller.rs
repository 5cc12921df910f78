//! Calendar state and its synchronization with the days API.
//!
//! The controller owns the anchor month, the view mode and the completed set.
//! Toggles follow a request/confirm pattern: nothing changes locally until
//! the backend answers, and a failed call leaves state exactly as it was.

use crate::calendar::{
    self, date_key, parse_date_key, MonthAnchor, MonthGrid, ViewMode, YearGrid,
};
use crate::client::DaysApi;
use crate::completed::CompletedDates;
use crate::stats::{build_stats, CalendarStats};
use chrono::{Local, NaiveDate};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

/// How long a renderer should spend on a slide between pages.
pub const SLIDE_DURATION: Duration = Duration::from_millis(300);

type Clock = Box<dyn Fn() -> NaiveDate + Send + Sync>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControllerOptions {
    /// Report slide transitions on navigation and page through whole years in year view.
    pub animate_transitions: bool,
    /// Drop toggle responses older than the last confirmed toggle of the same date.
    pub sequence_toggles: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    PreviousMonth,
    NextMonth,
    PreviousYear,
    NextYear,
}

impl Step {
    fn slide(self) -> Slide {
        match self {
            Step::PreviousMonth | Step::PreviousYear => Slide::Left,
            Step::NextMonth | Step::NextYear => Slide::Right,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slide {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalendarView {
    Month(MonthGrid),
    Year(YearGrid),
}

/// Visibility and labels of the controls around the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewChrome {
    pub mode: ViewMode,
    pub toggle_label: &'static str,
    pub month_nav_visible: bool,
}

impl ViewChrome {
    pub fn month_visible(&self) -> bool {
        self.mode == ViewMode::Month
    }

    pub fn year_visible(&self) -> bool {
        self.mode == ViewMode::Year
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub view: CalendarView,
    pub chrome: ViewChrome,
    pub stats: CalendarStats,
    pub slide: Option<Slide>,
}

/// Toggle bookkeeping for one date while requests for it are in flight.
#[derive(Debug, Default)]
struct Tickets {
    issued: u64,
    applied: u64,
    in_flight: usize,
}

#[derive(Debug)]
struct ControllerState {
    anchor: MonthAnchor,
    view: ViewMode,
    completed: CompletedDates,
    stats: CalendarStats,
    tickets: HashMap<NaiveDate, Tickets>,
}

impl ControllerState {
    fn new(today: NaiveDate) -> Self {
        Self {
            anchor: MonthAnchor::from_date(today),
            view: ViewMode::Month,
            completed: CompletedDates::default(),
            stats: CalendarStats::default(),
            tickets: HashMap::new(),
        }
    }

    fn update_stats(&mut self) -> CalendarStats {
        self.stats = build_stats(&self.completed, self.anchor);
        self.stats
    }

    fn issue_ticket(&mut self, date: NaiveDate) -> u64 {
        let tickets = self.tickets.entry(date).or_default();
        tickets.issued += 1;
        tickets.in_flight += 1;
        tickets.issued
    }

    /// Retires `ticket` once its request has settled.
    ///
    /// Returns whether a confirmed answer carrying `ticket` is newer than the
    /// last one applied for `date`. Failed requests never advance `applied`.
    fn retire_ticket(&mut self, date: NaiveDate, ticket: u64, confirmed: bool) -> bool {
        let Some(tickets) = self.tickets.get_mut(&date) else {
            return true;
        };
        let fresh = ticket > tickets.applied;
        if confirmed && fresh {
            tickets.applied = ticket;
        }
        tickets.in_flight = tickets.in_flight.saturating_sub(1);
        if tickets.in_flight == 0 {
            self.tickets.remove(&date);
        }
        fresh
    }
}

pub struct CalendarController<A> {
    api: A,
    options: ControllerOptions,
    clock: Clock,
    state: Mutex<ControllerState>,
}

impl<A: DaysApi> CalendarController<A> {
    pub fn new(api: A) -> Self {
        Self::with_options(api, ControllerOptions::default())
    }

    pub fn with_options(api: A, options: ControllerOptions) -> Self {
        let clock: Clock = Box::new(|| Local::now().date_naive());
        let state = Mutex::new(ControllerState::new(clock()));
        Self {
            api,
            options,
            clock,
            state,
        }
    }

    /// Replaces the source of "today" and re-anchors on it.
    pub fn with_clock(mut self, clock: impl Fn() -> NaiveDate + Send + Sync + 'static) -> Self {
        let today = clock();
        self.clock = Box::new(clock);
        let state = self.state.get_mut();
        state.anchor = MonthAnchor::from_date(today);
        state.update_stats();
        self
    }

    pub fn today(&self) -> NaiveDate {
        (self.clock)()
    }

    /// Rehydrates the completed set from the backend. Failures are logged and ignored.
    pub async fn load(&self) {
        match self.api.completed_days().await {
            Ok(response) => {
                let completed = CompletedDates::from_keys(&response.completed_days);
                let mut state = self.state.lock().await;
                state.completed = completed;
                let stats = state.update_stats();
                info!(
                    total = stats.total_count,
                    month = stats.month_count,
                    "loaded completed days"
                );
            }
            Err(err) => error!("error loading completed days: {err}"),
        }
    }

    pub async fn render_month(&self) -> MonthGrid {
        let today = self.today();
        let mut state = self.state.lock().await;
        state.update_stats();
        calendar::month_grid(state.anchor, &state.completed, today)
    }

    pub async fn render_year(&self) -> YearGrid {
        let today = self.today();
        let mut state = self.state.lock().await;
        state.update_stats();
        calendar::year_grid(state.anchor, &state.completed, today)
    }

    /// Renders whichever view is active.
    pub async fn render(&self) -> Rendered {
        let today = self.today();
        let mut state = self.state.lock().await;
        self.render_locked(&mut state, today, None)
    }

    pub async fn switch_view(&self) -> Rendered {
        let today = self.today();
        let mut state = self.state.lock().await;
        state.view = state.view.toggled();
        debug!(view = state.view.as_str(), "switched view");
        self.render_locked(&mut state, today, None)
    }

    /// Flips `date` on the backend and applies the confirmed state.
    ///
    /// Returns the new completion state, or `None` when nothing changed.
    pub async fn toggle_day(&self, date: NaiveDate) -> Option<bool> {
        let key = date_key(date);
        let ticket = if self.options.sequence_toggles {
            Some(self.state.lock().await.issue_ticket(date))
        } else {
            None
        };

        let result = self.api.toggle_day(date).await;

        let mut state = self.state.lock().await;
        let confirmed = matches!(&result, Ok(response) if response.success);
        let fresh = match ticket {
            Some(ticket) => state.retire_ticket(date, ticket, confirmed),
            None => true,
        };

        let response = match result {
            Ok(response) => response,
            Err(err) => {
                error!("error toggling {key}: {err}");
                return None;
            }
        };
        if !response.success {
            warn!("backend did not toggle {key}");
            return None;
        }
        if !fresh {
            debug!(ticket, "dropping stale toggle response for {key}");
            return None;
        }
        state.completed.set(date, response.completed);
        state.update_stats();
        Some(response.completed)
    }

    /// Same as [`Self::toggle_day`] for a `YYYY-MM-DD` key.
    pub async fn toggle_key(&self, key: &str) -> Option<bool> {
        match parse_date_key(key) {
            Some(date) => self.toggle_day(date).await,
            None => {
                warn!("refusing to toggle invalid date {key:?}");
                None
            }
        }
    }

    pub async fn update_stats(&self) -> CalendarStats {
        self.state.lock().await.update_stats()
    }

    pub async fn stats(&self) -> CalendarStats {
        self.state.lock().await.stats
    }

    pub async fn navigate(&self, step: Step) -> Rendered {
        let today = self.today();
        let mut state = self.state.lock().await;
        state.anchor = match step {
            Step::PreviousMonth => state.anchor.previous_month(),
            Step::NextMonth => state.anchor.next_month(),
            Step::PreviousYear => state.anchor.previous_year(),
            Step::NextYear => state.anchor.next_year(),
        };
        let slide = self.options.animate_transitions.then(|| step.slide());
        self.render_locked(&mut state, today, slide)
    }

    /// The "previous" control: a month back, or a year back in animated year view.
    pub async fn previous(&self) -> Rendered {
        let step = if self.pages_by_year().await {
            Step::PreviousYear
        } else {
            Step::PreviousMonth
        };
        self.navigate(step).await
    }

    pub async fn next(&self) -> Rendered {
        let step = if self.pages_by_year().await {
            Step::NextYear
        } else {
            Step::NextMonth
        };
        self.navigate(step).await
    }

    pub async fn go_to(&self, anchor: MonthAnchor) -> Rendered {
        let today = self.today();
        let mut state = self.state.lock().await;
        state.anchor = anchor;
        self.render_locked(&mut state, today, None)
    }

    /// Re-anchors on the current month and returns to month view.
    pub async fn go_to_today(&self) -> Rendered {
        let today = self.today();
        let mut state = self.state.lock().await;
        state.anchor = MonthAnchor::from_date(today);
        state.view = ViewMode::Month;
        self.render_locked(&mut state, today, None)
    }

    pub async fn anchor(&self) -> MonthAnchor {
        self.state.lock().await.anchor
    }

    pub async fn view_mode(&self) -> ViewMode {
        self.state.lock().await.view
    }

    pub async fn chrome(&self) -> ViewChrome {
        self.chrome_for(self.state.lock().await.view)
    }

    pub async fn is_completed(&self, date: NaiveDate) -> bool {
        self.state.lock().await.completed.contains(date)
    }

    async fn pages_by_year(&self) -> bool {
        self.options.animate_transitions && self.state.lock().await.view == ViewMode::Year
    }

    fn chrome_for(&self, mode: ViewMode) -> ViewChrome {
        ViewChrome {
            mode,
            toggle_label: mode.toggle_label(),
            month_nav_visible: !self.options.animate_transitions || mode == ViewMode::Month,
        }
    }

    fn render_locked(
        &self,
        state: &mut ControllerState,
        today: NaiveDate,
        slide: Option<Slide>,
    ) -> Rendered {
        let view = match state.view {
            ViewMode::Month => {
                CalendarView::Month(calendar::month_grid(state.anchor, &state.completed, today))
            }
            ViewMode::Year => {
                CalendarView::Year(calendar::year_grid(state.anchor, &state.completed, today))
            }
        };
        let stats = state.update_stats();
        Rendered {
            view,
            chrome: self.chrome_for(state.view),
            stats,
            slide,
        }
    }
}
