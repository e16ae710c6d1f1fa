use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeZone as _, Utc};
use chrono_tz::Tz;

use crate::api::NewEvent;

/// Local time of day a new event occupies when created from a date cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl Default for EventWindow {
    fn default() -> Self {
        Self {
            start: NaiveTime::from_hms_opt(9, 0, 0).expect("09:00 is a valid time"),
            end: NaiveTime::from_hms_opt(10, 0, 0).expect("10:00 is a valid time"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    MissingTitle,
    EmptyWindow,
    /// The local time does not exist on that date, e.g. inside a DST gap.
    NonexistentTime(NaiveDateTime),
}

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingTitle => f.write_str("an event needs a title"),
            Self::EmptyWindow => f.write_str("an event must end after it starts"),
            Self::NonexistentTime(time) => write!(f, "{time} does not exist in the local time zone"),
        }
    }
}

impl std::error::Error for FormError {}

/// Input for creating an event on a selected date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventForm {
    pub title: String,
    pub description: Option<String>,
}

impl EventForm {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Read `title | description` as typed on the command line.
    pub fn parse(input: &str) -> Self {
        let (title, description) = match input.split_once('|') {
            Some((title, description)) => (title, Some(description.trim())),
            None => (input, None),
        };

        Self {
            title: title.trim().to_owned(),
            description: description.filter(|d| !d.is_empty()).map(str::to_owned),
        }
    }

    /// # Errors
    /// Returns an error if the title is blank.
    pub fn validate(&self) -> Result<(), FormError> {
        if self.title.trim().is_empty() {
            return Err(FormError::MissingTitle);
        }

        Ok(())
    }

    /// Build the payload for an event on `date`, placed in `window` local time.
    ///
    /// # Errors
    /// Returns an error if the form is invalid or the window does not exist on
    /// that date.
    pub fn into_new_event(
        self,
        date: NaiveDate,
        window: &EventWindow,
        tz: &Tz,
    ) -> Result<NewEvent, FormError> {
        self.validate()?;

        if window.end <= window.start {
            return Err(FormError::EmptyWindow);
        }

        let local = |time: NaiveTime| {
            let naive = date.and_time(time);

            tz.from_local_datetime(&naive)
                .earliest()
                .map(|date_time| date_time.with_timezone(&Utc))
                .ok_or(FormError::NonexistentTime(naive))
        };

        Ok(NewEvent {
            description: self.description,
            ..NewEvent::new(self.title.trim(), local(window.start)?, local(window.end)?)
        })
    }
}
