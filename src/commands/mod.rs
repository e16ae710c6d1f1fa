use home_dashboard::config::Config;

use crate::cli::Command;

mod calendar;
mod categories;
mod chores;
mod lists;
mod weather;

pub fn run(command: Command, config: &Config) -> anyhow::Result<()> {
    let client = config.api.client();

    match command {
        Command::Calendar(args) => calendar::interactive(client, &config.calendar, args.month),
        Command::Month(args) => calendar::month(client, &config.calendar, args.month),
        Command::Chores(command) => chores::run(&client, command),
        Command::Lists(command) => lists::run(&client, command),
        Command::Categories(command) => categories::run(&client, command),
        Command::Weather(args) => weather::run(&client, args, &config.weather),
    }
}
