use chrono::{DateTime, Datelike as _, Days, Months, NaiveDate, NaiveTime, TimeDelta, TimeZone as _, Utc, Weekday};
use std::ops::RangeInclusive;

use chrono_tz::Tz;

pub const GRID_COLS: usize = 7;

/// Years a grid can show.
pub const YEARS: RangeInclusive<i32> = 1..=9999;

pub fn is_supported(date: NaiveDate) -> bool {
  YEARS.contains(&date.year())
}

/// First column of the month grid.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
  #[default]
  Sunday,
  Monday,
}

impl WeekStart {
  pub const fn first_day(self) -> Weekday {
    match self {
      Self::Sunday => Weekday::Sun,
      Self::Monday => Weekday::Mon,
    }
  }

  pub const fn last_day(self) -> Weekday {
    match self {
      Self::Sunday => Weekday::Sat,
      Self::Monday => Weekday::Sun,
    }
  }

  pub const fn labels(self) -> [&'static str; GRID_COLS] {
    match self {
      Self::Sunday => ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"],
      Self::Monday => ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"],
    }
  }
}

/// One square of the month grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Cell {
  pub date: NaiveDate,
  /// False for padding days of the previous or next month.
  pub in_month: bool,
}

/// A month padded to whole weeks.
///
/// Depending on the month the grid has four, five or six rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthGrid {
  month: NaiveDate,
  start: NaiveDate,
  end: NaiveDate,
  week_start: WeekStart,
}

impl MonthGrid {
  /// Grid of the month containing `reference`, moved into [`YEARS`] first.
  pub fn new(reference: NaiveDate, week_start: WeekStart) -> Self {
    Self::checked(clamp_to_years(reference), week_start)
      .expect("months inside YEARS are far from the date limits")
  }

  /// Grid of the month containing `reference`, or `None` if its padding
  /// leaves the representable dates.
  pub fn checked(reference: NaiveDate, week_start: WeekStart) -> Option<Self> {
    let month = reference.with_day(1)?;
    let last = month.checked_add_months(Months::new(1))?.pred_opt()?;

    Some(Self {
      month,
      start: start_of_week(month, week_start)?,
      end: end_of_week(last, week_start)?,
      week_start,
    })
  }

  /// First day of the reference month.
  pub const fn month(&self) -> NaiveDate {
    self.month
  }

  /// First cell, always on the configured week start.
  pub const fn start(&self) -> NaiveDate {
    self.start
  }

  /// Last cell, always on the day before the week start.
  pub const fn end(&self) -> NaiveDate {
    self.end
  }

  pub const fn week_start(&self) -> WeekStart {
    self.week_start
  }

  pub fn len(&self) -> usize {
    (self.end - self.start).num_days() as usize + 1
  }

  pub const fn is_empty(&self) -> bool {
    false
  }

  pub fn rows(&self) -> usize {
    self.len() / GRID_COLS
  }

  pub fn contains_month(&self, date: NaiveDate) -> bool {
    date.year() == self.month.year() && date.month() == self.month.month()
  }

  pub fn contains(&self, date: NaiveDate) -> bool {
    (self.start..=self.end).contains(&date)
  }

  /// All cells from the padded start to the padded end, without gaps.
  pub fn cells(&self) -> impl Iterator<Item = Cell> {
    let grid = *self;

    grid.start
      .iter_days()
      .take_while(move |date| *date <= grid.end)
      .map(move |date| Cell {
        date,
        in_month: grid.contains_month(date),
      })
  }

  /// Cells grouped into rows of [`GRID_COLS`].
  pub fn weeks(&self) -> Vec<Vec<Cell>> {
    self.cells()
      .collect::<Vec<_>>()
      .chunks(GRID_COLS)
      .map(<[Cell]>::to_vec)
      .collect()
  }

  /// Instants bounding the grid in `tz`: midnight of the first cell up to
  /// midnight after the last cell.
  pub fn window(&self, tz: &Tz) -> (DateTime<Utc>, DateTime<Utc>) {
    (
      local_midnight(self.start, tz),
      local_midnight(self.end + Days::new(1), tz),
    )
  }

  /// The following month, `None` past the end of [`YEARS`].
  pub fn next_month(&self) -> Option<Self> {
    self.month
      .checked_add_months(Months::new(1))
      .filter(|month| is_supported(*month))
      .map(|month| Self::new(month, self.week_start))
  }

  /// The preceding month, `None` before the start of [`YEARS`].
  pub fn prev_month(&self) -> Option<Self> {
    self.month
      .checked_sub_months(Months::new(1))
      .filter(|month| is_supported(*month))
      .map(|month| Self::new(month, self.week_start))
  }
}

/// Cells of the month containing `reference`.
pub fn grid_cells(reference: NaiveDate, week_start: WeekStart) -> Vec<Cell> {
  MonthGrid::new(reference, week_start).cells().collect()
}

/// Start of `date` in `tz`. A day that begins inside a DST gap starts an hour later.
pub fn local_midnight(date: NaiveDate, tz: &Tz) -> DateTime<Utc> {
  let midnight = date.and_time(NaiveTime::MIN);

  tz.from_local_datetime(&midnight)
    .earliest()
    .or_else(|| tz.from_local_datetime(&(midnight + TimeDelta::hours(1))).earliest())
    .map_or_else(|| midnight.and_utc(), |date_time| date_time.with_timezone(&Utc))
}

fn clamp_to_years(date: NaiveDate) -> NaiveDate {
  let bound = if date.year() < *YEARS.start() {
    NaiveDate::from_ymd_opt(*YEARS.start(), 1, 1)
  } else if date.year() > *YEARS.end() {
    NaiveDate::from_ymd_opt(*YEARS.end(), 12, 31)
  } else {
    None
  };

  bound.unwrap_or(date)
}

fn start_of_week(date: NaiveDate, week_start: WeekStart) -> Option<NaiveDate> {
  date.checked_sub_days(Days::new(days_between(week_start.first_day(), date.weekday())))
}

fn end_of_week(date: NaiveDate, week_start: WeekStart) -> Option<NaiveDate> {
  date.checked_add_days(Days::new(days_between(date.weekday(), week_start.last_day())))
}

/// Days to go forward from `from` to reach `to`.
fn days_between(from: Weekday, to: Weekday) -> u64 {
  u64::from((7 + to.num_days_from_monday() - from.num_days_from_monday()) % 7)
}
