use serde::Deserialize;

use super::Query;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Weather {
    pub temp: f64,
    pub feels_like: f64,
    pub description: String,
    pub icon: String,
    pub humidity: i64,
    pub wind_speed: f64,
    pub city: String,
}

/// Location to ask the weather for, by city name or coordinates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeatherQuery {
    pub city: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

impl WeatherQuery {
    pub fn city(city: impl Into<String>) -> Self {
        Self {
            city: Some(city.into()),
            ..Self::default()
        }
    }

    pub const fn coordinates(lat: f64, lon: f64) -> Self {
        Self {
            city: None,
            lat: Some(lat),
            lon: Some(lon),
        }
    }

    /// No location at all, a blank city counts as none.
    pub fn is_empty(&self) -> bool {
        self.city_name().is_none() && self.lat.is_none() && self.lon.is_none()
    }

    fn city_name(&self) -> Option<&str> {
        self.city.as_deref().filter(|city| !city.trim().is_empty())
    }

    /// Use `fallback` when this query names no location.
    #[must_use]
    pub fn or(self, fallback: &Self) -> Self {
        if self.is_empty() {
            fallback.clone()
        } else {
            self
        }
    }
}

impl From<&WeatherQuery> for Query {
    fn from(query: &WeatherQuery) -> Self {
        Self::new()
            .opt("city", query.city_name())
            .opt("lat", query.lat)
            .opt("lon", query.lon)
    }
}
