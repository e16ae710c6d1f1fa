use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::api::Event;

/// Events rendered inside a cell before the rest collapses into a count.
pub const INLINE_EVENTS: usize = 2;

/// Order of the events inside one cell.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellOrder {
  /// As the server returned them.
  #[default]
  Fetched,
  /// By start instant, ties keep the server order.
  Start,
}

/// What a single cell shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellEvents<'a> {
  pub inline: Vec<&'a Event>,
  /// Matching events that did not fit inline.
  pub overflow: usize,
}

impl CellEvents<'_> {
  pub fn matched(&self) -> usize {
    self.inline.len() + self.overflow
  }

  pub fn is_empty(&self) -> bool {
    self.matched() == 0
  }

  /// The "+N" marker, if anything overflowed.
  pub fn overflow_label(&self) -> Option<String> {
    (self.overflow > 0).then(|| format!("+{}", self.overflow))
  }
}

/// Decides which events belong to a calendar date.
///
/// Events are matched on calendar dates in the configured time zone, so an
/// event spanning several days lands in every cell it touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
  tz: Tz,
  order: CellOrder,
}

impl Default for Placement {
  fn default() -> Self {
    Self::new(Tz::UTC, CellOrder::default())
  }
}

impl Placement {
  pub const fn new(tz: Tz, order: CellOrder) -> Self {
    Self { tz, order }
  }

  pub const fn timezone(&self) -> &Tz {
    &self.tz
  }

  /// Start and end date of `event`.
  pub fn span(&self, event: &Event) -> (NaiveDate, NaiveDate) {
    (local_date(event.start, &self.tz), local_date(event.end, &self.tz))
  }

  pub fn occupies(&self, event: &Event, date: NaiveDate) -> bool {
    let (start, end) = self.span(event);

    start == date || end == date || (start < date && date < end)
  }

  /// Every event on `date`, ordered for display.
  pub fn events_on<'a>(&self, date: NaiveDate, events: &'a [Event]) -> Vec<&'a Event> {
    let mut matched = events
      .iter()
      .filter(|event| self.occupies(event, date))
      .collect::<Vec<_>>();

    if self.order == CellOrder::Start {
      matched.sort_by_key(|event| event.start);
    }

    matched
  }

  /// Events on `date`, capped at [`INLINE_EVENTS`].
  pub fn place<'a>(&self, date: NaiveDate, events: &'a [Event]) -> CellEvents<'a> {
    let mut inline = self.events_on(date, events);
    let overflow = inline.len().saturating_sub(INLINE_EVENTS);

    inline.truncate(INLINE_EVENTS);

    CellEvents { inline, overflow }
  }
}

pub fn local_date(instant: DateTime<Utc>, tz: &Tz) -> NaiveDate {
  instant.with_timezone(tz).date_naive()
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone as _;

  use super::*;

  fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  fn event(id: i64, start: (u32, u32, u32), end: (u32, u32, u32)) -> Event {
    Event {
      id,
      title: format!("event {id}"),
      description: None,
      start: Utc.with_ymd_and_hms(2024, start.0, start.1, start.2, 0, 0).unwrap(),
      end: Utc.with_ymd_and_hms(2024, end.0, end.1, end.2, 0, 0).unwrap(),
      all_day: false,
      recurrence: None,
      category_id: None,
    }
  }

  #[test]
  fn multi_day_event_fills_every_cell() {
    let events = [event(1, (3, 10, 9), (3, 12, 10))];
    let placement = Placement::default();

    for day in 10..=12 {
      assert_eq!(placement.events_on(date(2024, 3, day), &events).len(), 1, "March {day}");
    }
    assert!(placement.events_on(date(2024, 3, 9), &events).is_empty());
    assert!(placement.events_on(date(2024, 3, 13), &events).is_empty());
  }

  #[test]
  fn event_across_months_is_on_every_day_in_between() {
    let events = [event(1, (2, 27, 8), (3, 4, 18))];
    let placement = Placement::default();
    let (start, end) = placement.span(&events[0]);

    for day in start.iter_days().take_while(|d| *d <= end) {
      assert!(placement.occupies(&events[0], day), "{day}");
    }
  }

  #[test]
  fn overflow_counts_the_rest() {
    let events = (1..=5).map(|id| event(id, (3, 10, 9), (3, 10, 10))).collect::<Vec<_>>();
    let cell = Placement::default().place(date(2024, 3, 10), &events);

    assert_eq!(cell.inline.len(), 2);
    assert_eq!(cell.overflow, 3);
    assert_eq!(cell.matched(), 5);
    assert_eq!(cell.overflow_label().as_deref(), Some("+3"));
  }

  #[test]
  fn two_events_need_no_marker() {
    let events = [event(1, (3, 10, 9), (3, 10, 10)), event(2, (3, 10, 11), (3, 10, 12))];
    let cell = Placement::default().place(date(2024, 3, 10), &events);

    assert_eq!(cell.inline.len(), 2);
    assert_eq!(cell.overflow_label(), None);
  }

  #[test]
  fn fetched_order_is_kept() {
    let events = [event(1, (3, 10, 15), (3, 10, 16)), event(2, (3, 10, 8), (3, 10, 9))];
    let placement = Placement::default();
    let ids = |order| {
      Placement::new(Tz::UTC, order)
        .events_on(date(2024, 3, 10), &events)
        .iter()
        .map(|event| event.id)
        .collect::<Vec<_>>()
    };

    assert_eq!(placement, Placement::new(Tz::UTC, CellOrder::Fetched));
    assert_eq!(ids(CellOrder::Fetched), vec![1, 2]);
    assert_eq!(ids(CellOrder::Start), vec![2, 1]);
  }

  #[test]
  fn dates_follow_the_timezone() {
    // 23:30 UTC on the 9th is already the 10th in Berlin
    let mut late = event(1, (3, 9, 23), (3, 9, 23));
    late.start += chrono::TimeDelta::minutes(30);
    late.end += chrono::TimeDelta::minutes(45);

    let berlin = Placement::new(chrono_tz::Europe::Berlin, CellOrder::Fetched);

    assert!(berlin.occupies(&late, date(2024, 3, 10)));
    assert!(!Placement::default().occupies(&late, date(2024, 3, 10)));
  }

  #[test]
  fn reversed_event_only_touches_its_endpoints() {
    let reversed = event(1, (3, 12, 9), (3, 10, 9));
    let placement = Placement::default();

    assert!(placement.occupies(&reversed, date(2024, 3, 12)));
    assert!(placement.occupies(&reversed, date(2024, 3, 10)));
    assert!(!placement.occupies(&reversed, date(2024, 3, 11)));
  }
}
