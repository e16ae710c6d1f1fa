use anyhow::Context as _;
use home_dashboard::api::{Client, WeatherQuery};
use home_dashboard::config;
use home_dashboard::logger::LogExt as _;

use crate::cli::WeatherArgs;

pub fn run(client: &Client, args: WeatherArgs, fallback: &config::Weather) -> anyhow::Result<()> {
    let query = WeatherQuery {
        city: args.city,
        lat: args.lat,
        lon: args.lon,
    }
    .or(&fallback.query());

    let query = (!query.is_empty())
        .then_some(query)
        .log_warn("No location given, pass --city or --lat/--lon or set [weather] in the configuration")?;

    let weather = client.weather(&query).context("Could not load the weather")?;

    println!("{}: {}", weather.city, weather.description);
    println!("  {:.1}°C, feels like {:.1}°C", weather.temp, weather.feels_like);
    println!("  Humidity {}%, wind {:.1} m/s", weather.humidity, weather.wind_speed);

    Ok(())
}
