use crate::calendar::{DayCell, MonthAnchor, MonthGrid, ViewMode, YearGrid, WEEKDAY_NAMES};
use crate::stats::CalendarStats;
use std::fmt::Write;

/// Link to the calendar page showing `view` anchored on `anchor`.
pub fn calendar_href(view: ViewMode, anchor: MonthAnchor) -> String {
    format!(
        "/?view={}&year={}&month={}",
        view.as_str(),
        anchor.year(),
        anchor.month()
    )
}

pub fn render_month_page(grid: &MonthGrid, stats: &CalendarStats) -> String {
    let anchor = grid.anchor;
    let mut body = String::new();
    body.push_str(r#"<div class="weekdays">"#);
    for name in WEEKDAY_NAMES {
        let _ = write!(body, "<div>{name}</div>");
    }
    body.push_str("</div>\n");
    body.push_str(r#"<div class="days-grid month-grid">"#);
    for cell in &grid.cells {
        body.push_str(&render_cell(cell, ViewMode::Month, anchor));
    }
    body.push_str("</div>");

    render_page(PageParts {
        title: anchor.label(),
        view: ViewMode::Month,
        anchor,
        previous: anchor.previous_month(),
        next: anchor.next_month(),
        stats,
        body,
    })
}

pub fn render_year_page(grid: &YearGrid, anchor: MonthAnchor, stats: &CalendarStats) -> String {
    let mut body = String::from(r#"<div class="year-grid">"#);
    for month in &grid.months {
        let _ = write!(
            body,
            r#"<div class="mini-month"><h3>{}</h3><div class="weekdays">"#,
            month.anchor.month_name()
        );
        for name in WEEKDAY_NAMES {
            let _ = write!(body, "<div>{}</div>", &name[..1]);
        }
        body.push_str(r#"</div><div class="days-grid">"#);
        for cell in &month.cells {
            body.push_str(&render_cell(cell, ViewMode::Year, anchor));
        }
        body.push_str("</div></div>\n");
    }
    body.push_str("</div>");

    render_page(PageParts {
        title: grid.year.to_string(),
        view: ViewMode::Year,
        anchor,
        previous: anchor.previous_year(),
        next: anchor.next_year(),
        stats,
        body,
    })
}

struct PageParts<'a> {
    title: String,
    view: ViewMode,
    anchor: MonthAnchor,
    previous: MonthAnchor,
    next: MonthAnchor,
    stats: &'a CalendarStats,
    body: String,
}

fn render_page(parts: PageParts<'_>) -> String {
    INDEX_HTML
        .replace("{{TITLE}}", &parts.title)
        .replace("{{PREV}}", &calendar_href(parts.view, parts.previous))
        .replace("{{NEXT}}", &calendar_href(parts.view, parts.next))
        .replace(
            "{{TOGGLE}}",
            &calendar_href(parts.view.toggled(), parts.anchor),
        )
        .replace("{{TOGGLE_LABEL}}", parts.view.toggle_label())
        .replace("{{MONTH_LABEL}}", &parts.anchor.label())
        .replace("{{MONTH_COUNT}}", &parts.stats.month_count.to_string())
        .replace("{{TOTAL_COUNT}}", &parts.stats.total_count.to_string())
        .replace("{{BODY}}", &parts.body)
}

fn render_cell(cell: &DayCell, view: ViewMode, anchor: MonthAnchor) -> String {
    let mut classes = String::from("day");
    if cell.other_month {
        classes.push_str(" other-month");
    }
    if cell.today {
        classes.push_str(" today");
    }
    if cell.completed {
        classes.push_str(" completed");
    }

    match cell.key() {
        Some(key) => format!(
            r#"<form method="post" action="/days/{key}/toggle?view={view}&year={year}&month={month}"><button class="{classes}" title="{key}">{day}</button></form>"#,
            view = view.as_str(),
            year = anchor.year(),
            month = anchor.month(),
            day = cell.day,
        ),
        None if cell.is_blank() => format!(r#"<div class="{classes}"></div>"#),
        None => format!(r#"<div class="{classes}">{}</div>"#, cell.day),
    }
}

/// Plain-text month page: `[..]` completed, `*` today, `(..)` adjacent month.
pub fn render_month_text(grid: &MonthGrid, stats: &CalendarStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:^35}", grid.anchor.label());
    out.push_str(&weekday_header());
    for week in grid.weeks() {
        out.push_str(&render_week_text(week));
    }
    let _ = writeln!(
        out,
        "\nThis month: {}  Total: {}",
        stats.month_count, stats.total_count
    );
    out
}

pub fn render_year_text(grid: &YearGrid, stats: &CalendarStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:^35}", grid.year);
    for month in &grid.months {
        let _ = writeln!(out, "\n{}", month.anchor.month_name());
        out.push_str(&weekday_header());
        for week in month.weeks() {
            out.push_str(&render_week_text(week));
        }
    }
    let _ = writeln!(
        out,
        "\nThis month: {}  Total: {}",
        stats.month_count, stats.total_count
    );
    out
}

fn weekday_header() -> String {
    let mut line: String = WEEKDAY_NAMES.iter().map(|name| format!("{name:^5}")).collect();
    line.truncate(line.trim_end().len());
    line.push('\n');
    line
}

fn render_week_text(week: &[DayCell]) -> String {
    let mut line: String = week.iter().map(render_cell_text).collect();
    line.truncate(line.trim_end().len());
    line.push('\n');
    line
}

fn render_cell_text(cell: &DayCell) -> String {
    if cell.is_blank() {
        return " ".repeat(5);
    }
    let (open, close) = if cell.other_month {
        ('(', ')')
    } else if cell.completed {
        ('[', ']')
    } else {
        (' ', ' ')
    };
    let star = if cell.today { '*' } else { ' ' };
    format!("{open}{:>2}{star}{close}", cell.day)
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Habit Calendar · {{TITLE}}</title>
  <style>
    @import url('https://fonts.googleapis.com/css2?family=Space+Grotesk:wght@400;500;600&family=Fraunces:wght@600&display=swap');

    :root {
      --bg-1: #f8f3e6;
      --bg-2: #f5d3a7;
      --ink: #2b2a28;
      --accent: #ff6b4a;
      --accent-2: #2f4858;
      --card: rgba(255, 255, 255, 0.86);
      --shadow: 0 24px 60px rgba(47, 72, 88, 0.18);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 60%),
        linear-gradient(135deg, var(--bg-1), #ffe9d4 60%, #f9f2e9 100%);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(960px, 100%);
      background: var(--card);
      backdrop-filter: blur(12px);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 36px;
      display: grid;
      gap: 24px;
    }

    header {
      display: flex;
      flex-wrap: wrap;
      align-items: center;
      justify-content: space-between;
      gap: 16px;
    }

    h1 {
      font-family: "Fraunces", "Georgia", serif;
      font-weight: 600;
      font-size: clamp(1.8rem, 4vw, 2.6rem);
      margin: 0;
    }

    nav {
      display: flex;
      flex-wrap: wrap;
      gap: 8px;
    }

    nav a {
      text-decoration: none;
      border-radius: 999px;
      padding: 10px 16px;
      font-weight: 600;
      background: rgba(47, 72, 88, 0.08);
      color: var(--accent-2);
    }

    nav a.primary {
      background: var(--accent-2);
      color: white;
    }

    .panel {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(180px, 1fr));
      gap: 16px;
    }

    .stat {
      background: white;
      border-radius: 18px;
      padding: 18px;
      border: 1px solid rgba(47, 72, 88, 0.08);
      display: grid;
      gap: 8px;
    }

    .stat .label {
      font-size: 0.85rem;
      text-transform: uppercase;
      letter-spacing: 0.12em;
      color: #8b857d;
    }

    .stat .value {
      font-size: 1.7rem;
      font-weight: 600;
      color: var(--accent-2);
    }

    .weekdays,
    .days-grid {
      display: grid;
      grid-template-columns: repeat(7, 1fr);
      gap: 6px;
      text-align: center;
    }

    .weekdays {
      color: #8b857d;
      font-size: 0.8rem;
      text-transform: uppercase;
    }

    .days-grid form {
      margin: 0;
    }

    .day {
      width: 100%;
      aspect-ratio: 1;
      border: none;
      border-radius: 14px;
      background: white;
      font: inherit;
      font-weight: 600;
      color: var(--ink);
      display: grid;
      place-items: center;
    }

    button.day {
      cursor: pointer;
    }

    .day.other-month {
      background: transparent;
      color: #c2bbb3;
    }

    .day.today {
      outline: 2px solid var(--accent-2);
    }

    .day.completed {
      background: var(--accent);
      color: white;
    }

    .year-grid {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(200px, 1fr));
      gap: 18px;
    }

    .mini-month h3 {
      margin: 0 0 8px;
      font-size: 1rem;
    }

    .mini-month .day {
      border-radius: 8px;
      font-size: 0.75rem;
    }

    .exports {
      margin: 0;
      color: #6f6a65;
      font-size: 0.9rem;
    }

    .exports a {
      color: var(--accent-2);
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>{{TITLE}}</h1>
      <nav>
        <a href="{{PREV}}">&larr;</a>
        <a href="/">Today</a>
        <a href="{{NEXT}}">&rarr;</a>
        <a class="primary" href="{{TOGGLE}}">{{TOGGLE_LABEL}}</a>
      </nav>
    </header>

    <section class="panel">
      <div class="stat">
        <span class="label">{{MONTH_LABEL}}</span>
        <span id="monthCount" class="value">{{MONTH_COUNT}}</span>
      </div>
      <div class="stat">
        <span class="label">All time</span>
        <span id="totalCount" class="value">{{TOTAL_COUNT}}</span>
      </div>
    </section>

    <section class="calendar">
{{BODY}}
    </section>

    <p class="exports">Export: <a href="/api/export/json">JSON</a> · <a href="/api/export/csv">CSV</a></p>
  </main>
</body>
</html>
"#;
