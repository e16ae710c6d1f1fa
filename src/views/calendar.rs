use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::api::{self, Event, Id, NewEvent};
use crate::calendar::{Cell, CellEvents, MonthGrid, Placement};
use crate::config;

use super::form::{EventForm, EventWindow};

pub type RequestId = u64;

/// Loading state of the visible month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Ready,
    Failed(String),
}

/// Either a day is selected for adding an event, or one event is open.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    None,
    Cell(NaiveDate),
    Detail(Event),
}

/// An event fetch, tagged with the month it was issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub id: RequestId,
    pub month: NaiveDate,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Mount,
    Refresh,
    PrevMonth,
    NextMonth,
    GoTo(NaiveDate),
    SelectDate(NaiveDate),
    OpenEvent(Id),
    Close,
    Submit(EventForm),
    DeleteOpen,
    EventsLoaded {
        request: FetchRequest,
        result: Result<Vec<Event>, api::Error>,
    },
    /// `Ok(None)` when the server answered without content.
    EventCreated(Result<Option<Event>, api::Error>),
    EventDeleted(Id, Result<(), api::Error>),
}

/// Work the view asks its runtime to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    None,
    Fetch(FetchRequest),
    Create(NewEvent),
    Delete(Id),
}

/// The month calendar: reference month, loaded events and selection.
///
/// All state changes go through [`CalendarView::update`]. The view never
/// touches the network; it hands out [`Task`]s and receives their outcome as
/// messages, possibly out of order.
#[derive(Debug)]
pub struct CalendarView {
    grid: MonthGrid,
    placement: Placement,
    window: EventWindow,
    events: Vec<Event>,
    phase: Phase,
    selection: Selection,
    error: Option<String>,
    pending: Option<FetchRequest>,
    last_request: RequestId,
}

impl CalendarView {
    pub fn new(reference: NaiveDate, settings: &config::Calendar) -> Self {
        Self {
            grid: MonthGrid::new(reference, settings.week_start),
            placement: settings.placement(),
            window: settings.event_window(),
            events: Vec::new(),
            phase: Phase::Idle,
            selection: Selection::None,
            error: None,
            pending: None,
            last_request: 0,
        }
    }

    pub const fn grid(&self) -> &MonthGrid {
        &self.grid
    }

    pub const fn timezone(&self) -> &Tz {
        self.placement.timezone()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub const fn phase(&self) -> &Phase {
        &self.phase
    }

    pub const fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Last failed mutation, shown until the next selection change.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub const fn pending(&self) -> Option<&FetchRequest> {
        self.pending.as_ref()
    }

    /// Every loaded event on `date`, uncapped.
    pub fn events_on(&self, date: NaiveDate) -> Vec<&Event> {
        self.placement.events_on(date, &self.events)
    }

    pub fn cell(&self, date: NaiveDate) -> CellEvents<'_> {
        self.placement.place(date, &self.events)
    }

    pub fn cells(&self) -> impl Iterator<Item = (Cell, CellEvents<'_>)> {
        self.grid.cells().map(move |cell| (cell, self.cell(cell.date)))
    }

    pub fn update(&mut self, message: Message) -> Task {
        match message {
            Message::Mount | Message::Refresh => self.invalidate(),
            Message::PrevMonth => self.navigate(self.grid.prev_month()),
            Message::NextMonth => self.navigate(self.grid.next_month()),
            Message::GoTo(date) => self.navigate(Some(MonthGrid::new(date, self.grid.week_start()))),
            Message::SelectDate(date) => {
                self.selection = Selection::Cell(date);
                self.error = None;

                Task::None
            }
            Message::OpenEvent(id) => {
                match self.events.iter().find(|event| event.id == id) {
                    Some(event) => {
                        self.selection = Selection::Detail(event.clone());
                        self.error = None;
                    }
                    None => log::warn!(id = id; "Event is not loaded, cannot open it"),
                }

                Task::None
            }
            Message::Close => {
                self.selection = Selection::None;
                self.error = None;

                Task::None
            }
            Message::Submit(form) => self.submit(form),
            Message::DeleteOpen => match &self.selection {
                Selection::Detail(event) => Task::Delete(event.id),
                _ => {
                    self.error = Some("Open an event to delete it".to_owned());

                    Task::None
                }
            },
            Message::EventsLoaded { request, result } => {
                self.apply(request, result);

                Task::None
            }
            Message::EventCreated(result) => self.after_mutation(result.map(|event| match event {
                Some(event) => log::info!(id = event.id; "Event created"),
                None => log::info!("Event created, server sent no content"),
            })),
            Message::EventDeleted(id, result) => {
                self.after_mutation(result.map(|()| log::info!(id = id; "Event deleted")))
            }
        }
    }

    fn navigate(&mut self, grid: Option<MonthGrid>) -> Task {
        let Some(grid) = grid else {
            self.error = Some("No further months in that direction".to_owned());

            return Task::None;
        };

        self.grid = grid;

        self.invalidate()
    }

    /// Start a fetch of the visible window, superseding any pending one.
    fn invalidate(&mut self) -> Task {
        let (start, end) = self.grid.window(self.placement.timezone());

        self.last_request += 1;
        let request = FetchRequest {
            id: self.last_request,
            month: self.grid.month(),
            start,
            end,
        };

        log::debug!(id = request.id, month = request.month.to_string(); "Fetching events");

        self.phase = Phase::Loading;
        self.pending = Some(request.clone());

        Task::Fetch(request)
    }

    fn apply(&mut self, request: FetchRequest, result: Result<Vec<Event>, api::Error>) {
        let current = self.pending.as_ref().is_some_and(|pending| {
            *pending == request && pending.month == self.grid.month()
        });

        if !current {
            log::debug!(id = request.id, month = request.month.to_string(); "Discarding stale events");
            return;
        }

        self.pending = None;

        match result {
            Ok(events) => {
                log::info!(month = request.month.to_string(), count = events.len(); "Events loaded");

                if let Selection::Detail(open) = &self.selection {
                    let id = open.id;
                    self.selection = events
                        .iter()
                        .find(|event| event.id == id)
                        .cloned()
                        .map_or(Selection::None, Selection::Detail);
                }

                self.events = events;
                self.phase = Phase::Ready;
            }
            Err(err) => {
                log::error!(month = request.month.to_string(); "Failed to fetch events: {err}");

                self.phase = Phase::Failed(err.message);
            }
        }
    }

    fn submit(&mut self, form: EventForm) -> Task {
        let Selection::Cell(date) = self.selection else {
            self.error = Some("Select a day to add an event".to_owned());

            return Task::None;
        };

        match form.into_new_event(date, &self.window, self.placement.timezone()) {
            Ok(new) => Task::Create(new),
            Err(err) => {
                self.error = Some(err.to_string());

                Task::None
            }
        }
    }

    /// Every successful mutation ends in a refetch of the visible window.
    fn after_mutation(&mut self, result: Result<(), api::Error>) -> Task {
        match result {
            Ok(()) => {
                self.selection = Selection::None;
                self.error = None;

                self.invalidate()
            }
            Err(err) => {
                log::warn!("Event mutation failed: {err}");
                self.error = Some(err.message);

                Task::None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone as _;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn event(id: Id, day: u32, month: u32) -> Event {
        Event {
            id,
            title: format!("event {id}"),
            description: None,
            start: Utc.with_ymd_and_hms(2024, month, day, 9, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2024, month, day, 10, 0, 0).unwrap(),
            all_day: false,
            recurrence: None,
            category_id: None,
        }
    }

    fn view() -> CalendarView {
        CalendarView::new(date(2024, 3, 15), &config::Calendar::default())
    }

    fn fetch(task: Task) -> FetchRequest {
        match task {
            Task::Fetch(request) => request,
            other => panic!("expected a fetch, got {other:?}"),
        }
    }

    fn loaded(request: FetchRequest, events: Vec<Event>) -> Message {
        Message::EventsLoaded {
            request,
            result: Ok(events),
        }
    }

    #[test]
    fn mount_loads_the_padded_window() {
        let mut view = view();
        assert_eq!(view.phase(), &Phase::Idle);

        let request = fetch(view.update(Message::Mount));

        assert_eq!(view.phase(), &Phase::Loading);
        assert_eq!(request.month, date(2024, 3, 1));
        assert_eq!(request.start, Utc.with_ymd_and_hms(2024, 2, 25, 0, 0, 0).unwrap());
        assert_eq!(request.end, Utc.with_ymd_and_hms(2024, 4, 7, 0, 0, 0).unwrap());

        view.update(loaded(request, vec![event(1, 10, 3)]));

        assert_eq!(view.phase(), &Phase::Ready);
        assert_eq!(view.cell(date(2024, 3, 10)).inline.len(), 1);
    }

    #[test]
    fn stale_month_does_not_overwrite_newer_one() {
        let mut view = view();
        let march = fetch(view.update(Message::Mount));
        let april = fetch(view.update(Message::NextMonth));

        assert_eq!(april.month, date(2024, 4, 1));

        view.update(loaded(april, vec![event(2, 5, 4)]));
        view.update(loaded(march, vec![event(1, 10, 3)]));

        assert_eq!(view.grid().month(), date(2024, 4, 1));
        assert_eq!(view.events().iter().map(|e| e.id).collect::<Vec<_>>(), vec![2]);
        assert_eq!(view.phase(), &Phase::Ready);
    }

    #[test]
    fn stale_response_arriving_first_is_ignored() {
        let mut view = view();
        let march = fetch(view.update(Message::Mount));
        let april = fetch(view.update(Message::NextMonth));

        view.update(loaded(march, vec![event(1, 10, 3)]));

        assert!(view.events().is_empty());
        assert_eq!(view.phase(), &Phase::Loading);
        assert_eq!(view.pending(), Some(&april));
    }

    #[test]
    fn refetch_of_same_month_supersedes_older_request() {
        let mut view = view();
        let first = fetch(view.update(Message::Mount));
        let second = fetch(view.update(Message::Refresh));

        assert_eq!(first.month, second.month);
        assert_ne!(first.id, second.id);

        view.update(loaded(first, vec![event(1, 10, 3)]));
        assert!(view.events().is_empty());

        view.update(loaded(second, vec![event(2, 10, 3)]));
        assert_eq!(view.events()[0].id, 2);
    }

    #[test]
    fn failed_fetch_is_shown_inline() {
        let mut view = view();
        let request = fetch(view.update(Message::Mount));

        view.update(Message::EventsLoaded {
            request,
            result: Err(api::Error::status(500, "database is locked".to_owned())),
        });

        assert_eq!(view.phase(), &Phase::Failed("database is locked".to_owned()));
    }

    #[test]
    fn selection_and_detail_are_exclusive() {
        let mut view = view();
        let request = fetch(view.update(Message::Mount));
        view.update(loaded(request, vec![event(1, 10, 3)]));

        view.update(Message::SelectDate(date(2024, 3, 10)));
        assert_eq!(view.selection(), &Selection::Cell(date(2024, 3, 10)));

        view.update(Message::OpenEvent(1));
        assert!(matches!(view.selection(), Selection::Detail(event) if event.id == 1));

        view.update(Message::SelectDate(date(2024, 3, 11)));
        assert_eq!(view.selection(), &Selection::Cell(date(2024, 3, 11)));

        view.update(Message::OpenEvent(42));
        assert_eq!(view.selection(), &Selection::Cell(date(2024, 3, 11)));
    }

    #[test]
    fn create_goes_through_refetch() {
        let mut view = view();
        let request = fetch(view.update(Message::Mount));
        view.update(loaded(request, Vec::new()));

        view.update(Message::SelectDate(date(2024, 3, 12)));
        let task = view.update(Message::Submit(EventForm::new("Piano lesson")));

        let Task::Create(new) = task else {
            panic!("expected a create task, got {task:?}");
        };
        assert_eq!(new.start, Utc.with_ymd_and_hms(2024, 3, 12, 9, 0, 0).unwrap());
        assert_eq!(new.end, Utc.with_ymd_and_hms(2024, 3, 12, 10, 0, 0).unwrap());
        // nothing is inserted before the server confirms
        assert!(view.events().is_empty());

        let refetch = fetch(view.update(Message::EventCreated(Ok(Some(event(7, 12, 3))))));

        assert_eq!(view.selection(), &Selection::None);
        assert_eq!(view.phase(), &Phase::Loading);
        assert!(view.events().is_empty());

        view.update(loaded(refetch, vec![event(7, 12, 3)]));
        assert_eq!(view.cell(date(2024, 3, 12)).inline[0].id, 7);
    }

    #[test]
    fn submit_without_selected_day_is_refused() {
        let mut view = view();

        assert_eq!(view.update(Message::Submit(EventForm::new("Piano"))), Task::None);
        assert!(view.error().is_some());
    }

    #[test]
    fn invalid_form_is_refused() {
        let mut view = view();
        view.update(Message::SelectDate(date(2024, 3, 12)));

        assert_eq!(view.update(Message::Submit(EventForm::new(""))), Task::None);
        assert_eq!(view.error(), Some("an event needs a title"));
        assert_eq!(view.selection(), &Selection::Cell(date(2024, 3, 12)));
    }

    #[test]
    fn failed_mutation_keeps_selection_and_reports() {
        let mut view = view();
        view.update(Message::SelectDate(date(2024, 3, 12)));

        let task = view.update(Message::EventCreated(Err(api::Error::status(422, "title too long".to_owned()))));

        assert_eq!(task, Task::None);
        assert_eq!(view.error(), Some("title too long"));
        assert_eq!(view.selection(), &Selection::Cell(date(2024, 3, 12)));
    }

    #[test]
    fn create_without_content_still_refetches() {
        let mut view = view();
        view.update(Message::SelectDate(date(2024, 3, 12)));

        let refetch = fetch(view.update(Message::EventCreated(Ok(None))));

        assert_eq!(refetch.month, date(2024, 3, 1));
        assert_eq!(view.selection(), &Selection::None);
        assert_eq!(view.error(), None);
    }

    #[test]
    fn navigation_stops_at_the_last_supported_month() {
        let mut view = CalendarView::new(date(9999, 12, 20), &config::Calendar::default());
        let request = fetch(view.update(Message::Mount));
        view.update(loaded(request, Vec::new()));

        assert_eq!(view.update(Message::NextMonth), Task::None);
        assert_eq!(view.grid().month(), date(9999, 12, 1));
        assert!(view.error().is_some());
        assert_eq!(view.phase(), &Phase::Ready);

        assert_eq!(fetch(view.update(Message::PrevMonth)).month, date(9999, 11, 1));
    }

    #[test]
    fn delete_open_event_then_refetch() {
        let mut view = view();
        let request = fetch(view.update(Message::Mount));
        view.update(loaded(request, vec![event(3, 10, 3)]));
        view.update(Message::OpenEvent(3));

        assert_eq!(view.update(Message::DeleteOpen), Task::Delete(3));

        let refetch = fetch(view.update(Message::EventDeleted(3, Ok(()))));
        assert_eq!(view.selection(), &Selection::None);

        view.update(loaded(refetch, Vec::new()));
        assert!(view.cell(date(2024, 3, 10)).is_empty());
    }

    #[test]
    fn open_detail_follows_refetched_copy() {
        let mut view = view();
        let request = fetch(view.update(Message::Mount));
        view.update(loaded(request, vec![event(3, 10, 3)]));
        view.update(Message::OpenEvent(3));

        let mut renamed = event(3, 10, 3);
        renamed.title = "Renamed".to_owned();
        let refetch = fetch(view.update(Message::Refresh));
        view.update(loaded(refetch, vec![renamed]));

        assert!(matches!(view.selection(), Selection::Detail(event) if event.title == "Renamed"));
    }

    #[test]
    fn navigation_walks_months() {
        let mut view = view();

        assert_eq!(fetch(view.update(Message::PrevMonth)).month, date(2024, 2, 1));
        assert_eq!(fetch(view.update(Message::GoTo(date(2025, 1, 20)))).month, date(2025, 1, 1));
        assert_eq!(fetch(view.update(Message::NextMonth)).month, date(2025, 2, 1));
    }
}
