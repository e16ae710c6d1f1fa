//! Plain text rendering of the calendar for a terminal.
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

use super::calendar::{CalendarView, Phase, Selection};
use crate::api::Event;
use crate::calendar::{Cell, CellEvents, INLINE_EVENTS};

pub const CELL_WIDTH: usize = 14;

const TIME_FORMAT: &str = "%a %-d %b %Y %H:%M";

/// The whole screen: month grid, status line and the open dialog, if any.
pub fn view(calendar: &CalendarView, today: NaiveDate) -> String {
    let mut out = String::new();

    out.push_str(&view_title(calendar));
    out.push_str(&view_labels(calendar));

    for week in calendar.grid().weeks() {
        out.push_str(&view_week(calendar, &week, today));
    }

    if let Some(status) = view_status(calendar) {
        out.push('\n');
        out.push_str(&status);
        out.push('\n');
    }

    if let Some(dialog) = view_dialog(calendar) {
        out.push('\n');
        out.push_str(&dialog);
    }

    out
}

fn view_title(calendar: &CalendarView) -> String {
    let title = calendar.grid().month().format("%B %Y").to_string();
    let width = (CELL_WIDTH + 1) * calendar.grid().week_start().labels().len();

    format!("{title:^width$}\n")
}

fn view_labels(calendar: &CalendarView) -> String {
    let labels = calendar
        .grid()
        .week_start()
        .labels()
        .iter()
        .map(|label| pad(label))
        .collect::<Vec<_>>();

    format!("{}\n{}\n", labels.join("|"), separator(labels.len()))
}

fn view_week(calendar: &CalendarView, week: &[Cell], today: NaiveDate) -> String {
    let selected = match calendar.selection() {
        Selection::Cell(date) => Some(*date),
        _ => None,
    };
    let cells = week
        .iter()
        .map(|cell| (cell, calendar.cell(cell.date)))
        .collect::<Vec<_>>();

    let mut lines = vec![cells
        .iter()
        .map(|(cell, _)| pad(&day_label(cell, selected, today)))
        .collect::<Vec<_>>()];

    for slot in 0..INLINE_EVENTS {
        lines.push(
            cells
                .iter()
                .map(|(_, events)| pad(&events.inline.get(slot).map_or_else(String::new, |e| event_label(e))))
                .collect(),
        );
    }

    if cells.iter().any(|(_, events)| events.overflow > 0) {
        lines.push(
            cells
                .iter()
                .map(|(_, events)| pad(&events.overflow_label().unwrap_or_default()))
                .collect(),
        );
    }

    let mut out = lines
        .iter()
        .map(|line| format!("{}\n", line.join("|")))
        .collect::<String>();
    out.push_str(&separator(week.len()));
    out.push('\n');

    out
}

fn view_status(calendar: &CalendarView) -> Option<String> {
    let phase = match calendar.phase() {
        Phase::Idle | Phase::Ready => None,
        Phase::Loading => Some("Loading events...".to_owned()),
        Phase::Failed(message) => Some(format!("Could not load events: {message}")),
    };
    let error = calendar.error().map(|error| format!("Error: {error}"));

    match (phase, error) {
        (Some(phase), Some(error)) => Some(format!("{phase}\n{error}")),
        (phase, error) => phase.or(error),
    }
}

fn view_dialog(calendar: &CalendarView) -> Option<String> {
    match calendar.selection() {
        Selection::None => None,
        Selection::Cell(date) => Some(view_day(calendar, *date)),
        Selection::Detail(event) => Some(view_event(event, calendar.timezone())),
    }
}

fn view_day(calendar: &CalendarView, date: NaiveDate) -> String {
    let mut out = format!("{}\n", date.format("%A, %-d %B %Y"));
    let events = calendar.events_on(date);

    if events.is_empty() {
        out.push_str("  No events\n");
    }

    for event in events {
        out.push_str(&format!("  #{} {}\n", event.id, event.title));
    }

    out.push_str("add <title> [| description], open <id> or close\n");

    out
}

fn view_event(event: &Event, tz: &Tz) -> String {
    let mut out = format!("#{} {}\n", event.id, event.title);

    if event.all_day {
        out.push_str("  All day\n");
    }

    out.push_str(&format!("  From: {}\n", local(event.start, tz)));
    out.push_str(&format!("  To:   {}\n", local(event.end, tz)));

    if let Some(recurrence) = &event.recurrence {
        out.push_str(&format!("  Repeats: {recurrence}\n"));
    }

    if !event.description().is_empty() {
        out.push_str(&format!("  {}\n", event.description()));
    }

    out.push_str("delete or close\n");

    out
}

fn day_label(cell: &Cell, selected: Option<NaiveDate>, today: NaiveDate) -> String {
    let day = cell.date.format("%-d").to_string();
    let mut label = if Some(cell.date) == selected {
        format!("[{day}]")
    } else if cell.in_month {
        day
    } else {
        format!("({day})")
    };

    if cell.date == today {
        label.push('*');
    }

    label
}

fn event_label(event: &Event) -> String {
    truncate(&format!("#{} {}", event.id, event.title))
}

fn local(instant: DateTime<Utc>, tz: &Tz) -> String {
    instant.with_timezone(tz).format(TIME_FORMAT).to_string()
}

fn truncate(text: &str) -> String {
    if text.chars().count() <= CELL_WIDTH {
        return text.to_owned();
    }

    let mut short = text.chars().take(CELL_WIDTH - 1).collect::<String>();
    short.push('~');
    short
}

fn pad(text: &str) -> String {
    format!("{:<CELL_WIDTH$}", truncate(text))
}

fn separator(cols: usize) -> String {
    vec!["-".repeat(CELL_WIDTH); cols].join("+")
}

/// One line per cell with events, for scripts and logs.
pub fn summary(calendar: &CalendarView) -> String {
    calendar
        .cells()
        .filter(|(cell, events)| cell.in_month && !events.is_empty())
        .map(|(cell, events)| summary_line(&cell, &events))
        .collect()
}

fn summary_line(cell: &Cell, events: &CellEvents<'_>) -> String {
    let titles = events
        .inline
        .iter()
        .map(|event| event.title.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    match events.overflow_label() {
        Some(more) => format!("{}  {titles} {more}\n", cell.date),
        None => format!("{}  {titles}\n", cell.date),
    }
}
