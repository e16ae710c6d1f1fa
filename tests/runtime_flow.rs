use std::ops::ControlFlow;

use chrono::NaiveDate;
use home_dashboard::api::{ErrorKind, Method};
use home_dashboard::config;
use home_dashboard::runtime::{perform, Runtime};
use home_dashboard::views::calendar::{CalendarView, Message, Phase, Selection, Task};
use home_dashboard::views::form::EventForm;

mod common;

use common::Scripted;

const MARCH_WINDOW: &str = "/events?start=2024-02-25";
const APRIL_WINDOW: &str = "/events?start=2024-03-31";

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn event_json(id: i64, title: &str, day: &str) -> String {
    format!(
        r#"{{"id": {id}, "title": "{title}", "description": null,
            "start": "{day}T09:00:00Z", "end": "{day}T10:00:00Z",
            "all_day": false, "recurrence": null, "category_id": null}}"#
    )
}

fn march() -> CalendarView {
    CalendarView::new(date(2024, 3, 15), &config::Calendar::default())
}

#[test]
fn late_march_response_does_not_overwrite_april() {
    let server = Scripted::new();
    let release_march = server.gated(
        Method::Get,
        MARCH_WINDOW,
        200,
        &format!("[{}]", event_json(1, "March", "2024-03-10")),
    );
    server.on(
        Method::Get,
        APRIL_WINDOW,
        200,
        &format!("[{}]", event_json(2, "April", "2024-04-05")),
    );

    let runtime = Runtime::new(server.client());
    let mut view = march();

    runtime.send(Message::Mount);
    runtime.send(Message::NextMonth);

    runtime.run(&mut view, |_, message| match message {
        Message::EventsLoaded { request, .. } if request.month == date(2024, 4, 1) => {
            release_march.send(()).unwrap();
            ControlFlow::Continue(())
        }
        Message::EventsLoaded { request, .. } if request.month == date(2024, 3, 1) => ControlFlow::Break(()),
        _ => ControlFlow::Continue(()),
    });

    assert_eq!(view.grid().month(), date(2024, 4, 1));
    assert_eq!(view.phase(), &Phase::Ready);
    assert_eq!(view.events().len(), 1);
    assert_eq!(view.events()[0].title, "April");
    assert_eq!(view.cell(date(2024, 4, 5)).inline[0].id, 2);
    assert!(view.cell(date(2024, 3, 10)).is_empty());
}

#[test]
fn created_event_appears_after_refetch() {
    let server = Scripted::new();
    server.on(Method::Get, "/events", 200, "[]");
    server.on(Method::Post, "/events", 201, &event_json(7, "Piano", "2024-03-12"));

    let runtime = Runtime::new(server.client());
    let sender = runtime.sender();
    let mut view = march();

    runtime.send(Message::Mount);

    runtime.run(&mut view, |view, message| match message {
        Message::EventsLoaded { .. } if view.events().is_empty() => {
            sender.try_send(Message::SelectDate(date(2024, 3, 12))).unwrap();
            sender.try_send(Message::Submit(EventForm::new("Piano"))).unwrap();
            ControlFlow::Continue(())
        }
        Message::EventCreated(Ok(_)) => {
            server.on(
                Method::Get,
                "/events",
                200,
                &format!("[{}]", event_json(7, "Piano", "2024-03-12")),
            );
            ControlFlow::Continue(())
        }
        Message::EventsLoaded { .. } => ControlFlow::Break(()),
        _ => ControlFlow::Continue(()),
    });

    let methods = server.requests().iter().map(|r| r.method).collect::<Vec<_>>();
    assert_eq!(methods, vec![Method::Get, Method::Post, Method::Get]);
    assert_eq!(
        server.requests()[1].body.as_deref(),
        Some(r#"{"title":"Piano","start":"2024-03-12T09:00:00Z","end":"2024-03-12T10:00:00Z","all_day":false}"#)
    );
    assert_eq!(view.selection(), &Selection::None);
    assert_eq!(view.cell(date(2024, 3, 12)).inline[0].title, "Piano");
}

#[test]
fn rejected_create_keeps_the_dialog_open() {
    let server = Scripted::new();
    server.on(Method::Post, "/events", 422, "title too long");

    let mut view = march();
    view.update(Message::SelectDate(date(2024, 3, 12)));
    let task = view.update(Message::Submit(EventForm::new("Piano")));

    let message = smol::block_on(perform(server.client(), task)).unwrap();
    assert_eq!(view.update(message), Task::None);

    assert_eq!(view.error(), Some("title too long"));
    assert_eq!(view.selection(), &Selection::Cell(date(2024, 3, 12)));
}

#[test]
fn failed_fetch_surfaces_server_text() {
    let server = Scripted::new();
    server.on(Method::Get, "/events", 500, "database is locked");

    let mut view = march();
    let task = view.update(Message::Mount);
    let message = smol::block_on(perform(server.client(), task)).unwrap();

    if let Message::EventsLoaded { result: Err(error), .. } = &message {
        assert_eq!(error.kind, ErrorKind::Status(500));
    } else {
        panic!("expected a failed load, got {message:?}");
    }

    view.update(message);
    assert_eq!(view.phase(), &Phase::Failed("database is locked".to_owned()));
}

#[test]
fn deleting_refetches_the_window() {
    let server = Scripted::new();
    server.on(Method::Get, "/events", 200, &format!("[{}]", event_json(3, "Swim", "2024-03-10")));
    server.on(Method::Delete, "/events/3", 204, "");

    let client = server.client();
    let mut view = march();

    let task = view.update(Message::Mount);
    view.update(smol::block_on(perform(client.clone(), task)).unwrap());
    view.update(Message::OpenEvent(3));

    let task = view.update(Message::DeleteOpen);
    assert_eq!(task, Task::Delete(3));

    server.on(Method::Get, "/events", 200, "[]");
    let refetch = view.update(smol::block_on(perform(client.clone(), task)).unwrap());
    view.update(smol::block_on(perform(client, refetch)).unwrap());

    assert!(view.events().is_empty());
    assert_eq!(view.phase(), &Phase::Ready);
    assert_eq!(server.requests().last().unwrap().method, Method::Get);
}

#[test]
fn closed_input_lets_running_fetches_finish() {
    let server = Scripted::new();
    let release = server.gated(
        Method::Get,
        MARCH_WINDOW,
        200,
        &format!("[{}]", event_json(1, "Swim", "2024-03-10")),
    );

    let runtime = Runtime::new(server.client());
    let input = runtime.input();
    let mut view = march();

    runtime.send(Message::Mount);

    runtime.run(&mut view, |_, message| {
        if matches!(message, Message::Mount) {
            input.hang_up();
            release.send(()).unwrap();
        }
        ControlFlow::Continue(())
    });

    assert_eq!(view.phase(), &Phase::Ready);
    assert_eq!(view.events().len(), 1);
}

#[test]
fn closed_input_with_nothing_running_stops_at_once() {
    let server = Scripted::new();
    let runtime = Runtime::new(server.client());
    let mut view = march();

    runtime.input().hang_up();
    runtime.run(&mut view, |_, _| ControlFlow::Continue(()));

    assert_eq!(view.phase(), &Phase::Idle);
    assert!(server.requests().is_empty());
}
