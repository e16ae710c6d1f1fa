use std::fmt::Debug;
use std::panic::Location;

use log::Level;

pub const DEFAULT_FILTER: &str = "info";

/// Install the global logger. `RUST_LOG` overrides [`DEFAULT_FILTER`].
pub fn init() {
  env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(DEFAULT_FILTER))
    .format_timestamp_secs()
    .init();
}

/// Log a missing value or an error where it happens, then hand it on as
/// [`anyhow::Error`].
pub trait LogExt<T> {
  fn log_warn(self, msg: &str) -> anyhow::Result<T>;
  fn log_error(self, msg: &str) -> anyhow::Result<T>;
}

impl<T> LogExt<T> for Option<T> {
  #[track_caller]
  fn log_warn(self, msg: &str) -> anyhow::Result<T> {
    self.ok_or_else(|| report(Level::Warn, Location::caller(), msg, None::<&()>))
  }

  #[track_caller]
  fn log_error(self, msg: &str) -> anyhow::Result<T> {
    self.ok_or_else(|| report(Level::Error, Location::caller(), msg, None::<&()>))
  }
}

impl<T, E> LogExt<T> for Result<T, E>
where
  E: Debug,
{
  #[track_caller]
  fn log_warn(self, msg: &str) -> anyhow::Result<T> {
    let location = Location::caller();
    self.map_err(|error| report(Level::Warn, location, msg, Some(&error)))
  }

  #[track_caller]
  fn log_error(self, msg: &str) -> anyhow::Result<T> {
    let location = Location::caller();
    self.map_err(|error| report(Level::Error, location, msg, Some(&error)))
  }
}

fn report(level: Level, location: &Location<'_>, msg: &str, error: Option<&impl Debug>) -> anyhow::Error {
  let location = location.to_string();

  match error {
    Some(error) => {
      log::log!(level, location = location.as_str(); "{msg}: {error:?}");
      anyhow::anyhow!("{msg}: {error:?}")
    }
    None => {
      log::log!(level, location = location.as_str(); "{msg}");
      anyhow::anyhow!(msg.to_owned())
    }
  }
}
