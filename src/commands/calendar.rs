use std::ops::ControlFlow;

use chrono::{NaiveDate, Utc};
use home_dashboard::api::{Client, Id};
use home_dashboard::calendar::local_date;
use home_dashboard::config;
use home_dashboard::runtime::{self, Input as RuntimeInput, Runtime};
use home_dashboard::views::calendar::{Message, Phase};
use home_dashboard::views::form::EventForm;
use home_dashboard::views::{render, CalendarView};
use smol::io::{AsyncBufReadExt as _, BufReader};
use smol::stream::StreamExt as _;
use smol::Unblock;

const HELP: &str = "\
prev | next | today       change the month
select <YYYY-MM-DD>       select a day
open <id>                 show an event
add <title> [| text]      add an event on the selected day
delete                    delete the open event
close                     close the dialog
refresh                   load the month again
quit";

#[derive(Debug, PartialEq)]
enum Input {
    Message(Message),
    Help,
    Quit,
}

/// Month view driven by commands read from stdin.
pub fn interactive(client: Client, settings: &config::Calendar, month: Option<NaiveDate>) -> anyhow::Result<()> {
    let today = local_date(Utc::now(), &settings.timezone);
    let mut view = CalendarView::new(month.unwrap_or(today), settings);
    let runtime = Runtime::new(client);

    runtime.spawn_input(read_input(runtime.input(), today));
    runtime.send(Message::Mount);

    runtime.run(&mut view, |view, message| {
        log::debug!("Redrawing after {message:?}");
        print!("{}", render::view(view, today));

        ControlFlow::Continue(())
    });

    Ok(())
}

/// Fetch a single month and print it.
pub fn month(client: Client, settings: &config::Calendar, month: Option<NaiveDate>) -> anyhow::Result<()> {
    let today = local_date(Utc::now(), &settings.timezone);
    let mut view = CalendarView::new(month.unwrap_or(today), settings);

    let task = view.update(Message::Mount);
    if let Some(message) = smol::block_on(runtime::perform(client, task)) {
        view.update(message);
    }

    if let Phase::Failed(message) = view.phase() {
        anyhow::bail!("Could not load events: {message}");
    }

    print!("{}", render::view(&view, today));
    println!();
    print!("{}", render::summary(&view));

    Ok(())
}

async fn read_input(input: RuntimeInput, today: NaiveDate) {
    let mut lines = BufReader::new(Unblock::new(std::io::stdin())).lines();

    while let Some(line) = lines.next().await {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                log::error!("Could not read input: {err}");
                break;
            }
        };

        let message = match parse_input(&line, today) {
            Ok(Input::Message(message)) => message,
            Ok(Input::Help) => {
                println!("{HELP}");
                continue;
            }
            Ok(Input::Quit) => {
                input.quit();
                return;
            }
            Err(err) => {
                println!("{err}, try help");
                continue;
            }
        };

        if !input.send(message).await {
            return;
        }
    }

    input.hang_up();
}

fn parse_input(line: &str, today: NaiveDate) -> Result<Input, String> {
    let line = line.trim();
    let (command, argument) = line.split_once(' ').map_or((line, ""), |(c, a)| (c, a.trim()));

    let message = match command {
        "help" | "?" => return Ok(Input::Help),
        "quit" | "exit" | "q" => return Ok(Input::Quit),
        "prev" => Message::PrevMonth,
        "next" => Message::NextMonth,
        "today" => Message::GoTo(today),
        "" | "refresh" => Message::Refresh,
        "close" => Message::Close,
        "delete" => Message::DeleteOpen,
        "select" => Message::SelectDate(
            argument
                .parse::<NaiveDate>()
                .map_err(|err| format!("Invalid date {argument:?}: {err}"))?,
        ),
        "open" => Message::OpenEvent(
            argument
                .parse::<Id>()
                .map_err(|err| format!("Invalid event id {argument:?}: {err}"))?,
        ),
        "add" => Message::Submit(EventForm::parse(argument)),
        other => return Err(format!("Unknown command {other:?}")),
    };

    Ok(Input::Message(message))
}
