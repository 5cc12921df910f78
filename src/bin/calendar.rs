use clap::{Parser, Subcommand};
use habit_calendar::calendar::MonthAnchor;
use habit_calendar::controller::CalendarView;
use habit_calendar::export::ExportFormat;
use habit_calendar::ui::{render_month_text, render_year_text};
use habit_calendar::{CalendarController, ControllerOptions, HttpDaysApi};
use std::io::Write;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Debug, Parser)]
#[command(name = "calendar", about = "Terminal front end for the habit calendar")]
struct Cli {
    /// Base URL of the habit calendar server.
    #[arg(long, env = "HABIT_CALENDAR_URL", default_value = "http://127.0.0.1:8080")]
    server: String,

    /// Ignore toggle responses overtaken by a newer toggle of the same day.
    #[arg(long)]
    sequence_toggles: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show a month grid (defaults to the current month).
    Month {
        #[arg(long)]
        year: Option<i32>,
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,
    },
    /// Show all twelve months of a year.
    Year {
        #[arg(long)]
        year: Option<i32>,
    },
    /// Flip completion of a day (YYYY-MM-DD).
    Toggle { date: String },
    /// Print this month's and the all-time completion counts.
    Stats,
    /// Write an export of every stored day to stdout.
    Export {
        #[arg(value_enum)]
        format: ExportFormat,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive("warn".parse()?))
        .init();

    let cli = Cli::parse();
    let api = HttpDaysApi::new(cli.server);

    if let Command::Export { format } = cli.command {
        let bytes = api.export(format).await?;
        std::io::stdout().write_all(&bytes)?;
        return Ok(());
    }

    let options = ControllerOptions {
        sequence_toggles: cli.sequence_toggles,
        ..ControllerOptions::default()
    };
    let controller = CalendarController::with_options(api, options);
    controller.load().await;

    match cli.command {
        Command::Month { year, month } => {
            let current = controller.anchor().await;
            let anchor = MonthAnchor::new(
                year.unwrap_or(current.year()),
                month.unwrap_or(current.month()),
            )
            .ok_or("no such month")?;
            let rendered = controller.go_to(anchor).await;
            if let CalendarView::Month(grid) = &rendered.view {
                print!("{}", render_month_text(grid, &rendered.stats));
            }
        }
        Command::Year { year } => {
            let current = controller.anchor().await;
            if let Some(year) = year {
                let anchor = MonthAnchor::new(year, current.month()).ok_or("no such year")?;
                controller.go_to(anchor).await;
            }
            let rendered = controller.switch_view().await;
            if let CalendarView::Year(grid) = &rendered.view {
                print!("{}", render_year_text(grid, &rendered.stats));
            }
        }
        Command::Toggle { date } => {
            match controller.toggle_key(&date).await {
                Some(true) => println!("{date}: completed"),
                Some(false) => println!("{date}: not completed"),
                None => println!("{date}: unchanged"),
            }
            let stats = controller.stats().await;
            println!("This month: {}  Total: {}", stats.month_count, stats.total_count);
        }
        Command::Stats => {
            let stats = controller.update_stats().await;
            println!("This month: {}  Total: {}", stats.month_count, stats.total_count);
        }
        Command::Export { .. } => {}
    }

    Ok(())
}
