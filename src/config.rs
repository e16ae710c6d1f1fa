use std::path::Path;
use std::time::Duration;

use anyhow::Context as _;
use chrono::NaiveTime;
use chrono_tz::Tz;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use url::Url;

use crate::api::{Client, WeatherQuery};
use crate::calendar::{CellOrder, Placement, WeekStart};
use crate::views::form::EventWindow;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub api: Api,
    #[serde(default)]
    pub calendar: Calendar,
    #[serde(default)]
    pub weather: Weather,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Api {
    pub url: Url,
    pub timeout_secs: Option<u64>,
}

impl Api {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    pub fn client(&self) -> Client {
        Client::new(self.url.clone(), self.timeout())
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Calendar {
    #[serde(default = "default_timezone", deserialize_with = "deserialize_timezone")]
    pub timezone: Tz,
    #[serde(default)]
    pub week_start: WeekStart,
    #[serde(default)]
    pub order: CellOrder,
    #[serde(default = "default_event_start")]
    pub event_start: NaiveTime,
    #[serde(default = "default_event_end")]
    pub event_end: NaiveTime,
}

impl Default for Calendar {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            week_start: WeekStart::default(),
            order: CellOrder::default(),
            event_start: default_event_start(),
            event_end: default_event_end(),
        }
    }
}

impl Calendar {
    pub const fn placement(&self) -> Placement {
        Placement::new(self.timezone, self.order)
    }

    pub const fn event_window(&self) -> EventWindow {
        EventWindow {
            start: self.event_start,
            end: self.event_end,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Weather {
    pub city: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

impl Weather {
    pub fn query(&self) -> WeatherQuery {
        WeatherQuery {
            city: self.city.clone(),
            lat: self.lat,
            lon: self.lon,
        }
    }
}

/// Read and validate the configuration file at `path`.
///
/// # Errors
/// Returns an error if the file cannot be read or is not a valid configuration.
pub fn init(path: impl AsRef<Path>) -> anyhow::Result<Config> {
    let path = path.as_ref();
    let string = std::fs::read_to_string(path)
        .with_context(|| format!("Could not read {}", path.display()))?;

    parse(&string).with_context(|| format!("Invalid configuration in {}", path.display()))
}

/// # Errors
/// Returns an error if `string` is not a valid configuration.
pub fn parse(string: &str) -> anyhow::Result<Config> {
    let config: Config = toml::from_str(string)?;

    if config.calendar.event_end <= config.calendar.event_start {
        anyhow::bail!(
            "calendar.event_end ({}) must be after calendar.event_start ({})",
            config.calendar.event_end,
            config.calendar.event_start,
        );
    }

    Ok(config)
}

fn deserialize_timezone<'de, D>(deserializer: D) -> Result<Tz, D::Error>
where
    D: Deserializer<'de>,
{
    let name = String::deserialize(deserializer)?;

    name.parse().map_err(D::Error::custom)
}

const fn default_timezone() -> Tz {
    Tz::UTC
}

fn default_event_start() -> NaiveTime {
    EventWindow::default().start
}

fn default_event_end() -> NaiveTime {
    EventWindow::default().end
}
