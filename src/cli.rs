use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use home_dashboard::api::Id;
use home_dashboard::calendar;

#[derive(Debug, Clone, Parser)]
#[clap(bin_name = env!("CARGO_PKG_NAME"), version = env!("CARGO_PKG_VERSION"), about = env!("CARGO_PKG_DESCRIPTION"))]
pub struct Cli {
    /// Path to the configuration file
    #[clap(name = "config")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Interactive month calendar
    Calendar(MonthArgs),
    /// Print one month with its events and exit
    Month(MonthArgs),
    /// Household chores
    #[command(subcommand)]
    Chores(ChoresCommand),
    /// Todo lists and their items
    #[command(subcommand)]
    Lists(ListsCommand),
    /// Categories shared by events, chores and lists
    #[command(subcommand)]
    Categories(CategoriesCommand),
    /// Current weather
    Weather(WeatherArgs),
}

#[derive(Debug, Clone, Args)]
pub struct MonthArgs {
    /// Month to show as YYYY-MM, defaults to the current one
    #[arg(long, value_parser = parse_month)]
    pub month: Option<NaiveDate>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum ChoresCommand {
    List {
        #[arg(long)]
        completed: Option<bool>,
        #[arg(long)]
        assignee: Option<String>,
    },
    Add {
        title: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        assignee: Option<String>,
        /// Due date as YYYY-MM-DD
        #[arg(long)]
        due: Option<NaiveDate>,
        #[arg(long)]
        category: Option<Id>,
    },
    /// Mark a chore as completed, or open again with --undo
    Done {
        id: Id,
        #[arg(long)]
        undo: bool,
    },
    Delete { id: Id },
}

#[derive(Debug, Clone, Subcommand)]
pub enum ListsCommand {
    List,
    Add {
        title: String,
        #[arg(long)]
        color: Option<String>,
        #[arg(long)]
        category: Option<Id>,
    },
    Delete { id: Id },
    /// Show the items of a list
    Items { list: Id },
    AddItem {
        list: Id,
        title: String,
        #[arg(long, default_value_t = 0)]
        sort_order: i32,
    },
    /// Mark an item as completed, or open again with --undo
    Check {
        list: Id,
        item: Id,
        #[arg(long)]
        undo: bool,
    },
    RemoveItem { list: Id, item: Id },
}

#[derive(Debug, Clone, Subcommand)]
pub enum CategoriesCommand {
    List,
    Add {
        name: String,
        /// Hex color, a default is used when omitted
        #[arg(long)]
        color: Option<String>,
    },
    Delete { id: Id },
}

#[derive(Debug, Clone, Args)]
pub struct WeatherArgs {
    #[arg(long, conflicts_with_all = ["lat", "lon"])]
    pub city: Option<String>,
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    pub lat: Option<f64>,
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub lon: Option<f64>,
}

fn parse_month(value: &str) -> Result<NaiveDate, String> {
    let month = NaiveDate::parse_from_str(&format!("{value}-01"), "%Y-%m-%d")
        .map_err(|err| format!("expected YYYY-MM: {err}"))?;

    if !calendar::is_supported(month) {
        let years = calendar::YEARS;
        return Err(format!("year must be between {} and {}", years.start(), years.end()));
    }

    Ok(month)
}
