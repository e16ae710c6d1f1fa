//! Drives a [`CalendarView`]: messages come in over a channel, the view
//! updates, and the [`Task`] it returns runs on a local executor. Blocking
//! HTTP calls are moved off the executor with [`smol::unblock`].
use std::cell::Cell;
use std::future::Future;
use std::ops::ControlFlow;
use std::rc::Rc;

use smol::LocalExecutor;

use crate::api::{Client, EventFilter, Query};
use crate::views::calendar::{CalendarView, Message, Task};

pub type Sender = async_channel::Sender<Message>;
pub type Receiver = async_channel::Receiver<Message>;

/// Carry out `task` against the API and report its outcome.
pub async fn perform(client: Client, task: Task) -> Option<Message> {
    let message = match task {
        Task::None => return None,
        Task::Fetch(request) => {
            let query = Query::from(&EventFilter::between(request.start, request.end));
            let result = smol::unblock(move || client.events().list(&query)).await;

            Message::EventsLoaded { request, result }
        }
        Task::Create(new) => {
            let result = smol::unblock(move || client.events().create(&new)).await;

            Message::EventCreated(result)
        }
        Task::Delete(id) => {
            let result = smol::unblock(move || client.events().delete(id)).await;

            Message::EventDeleted(id, result)
        }
    };

    Some(message)
}

#[derive(Default)]
struct Pending {
    tasks: Cell<usize>,
    hung_up: Cell<bool>,
}

impl Pending {
    fn settled(&self) -> bool {
        self.hung_up.get() && self.tasks.get() == 0
    }
}

/// Hands user input to a running [`Runtime`].
#[derive(Clone)]
pub struct Input {
    sender: Sender,
    pending: Rc<Pending>,
}

impl Input {
    /// Queue `message`, false once the runtime has stopped.
    pub async fn send(&self, message: Message) -> bool {
        self.sender.send(message).await.is_ok()
    }

    /// Stop without waiting for running tasks.
    pub fn quit(&self) {
        self.sender.close();
    }

    /// No more input will come. The runtime stops once running tasks have
    /// reported back and their messages are handled.
    pub fn hang_up(&self) {
        self.pending.hung_up.set(true);

        if self.pending.settled() && self.sender.is_empty() {
            self.sender.close();
        }
    }
}

pub struct Runtime {
    client: Client,
    executor: LocalExecutor<'static>,
    sender: Sender,
    receiver: Receiver,
    pending: Rc<Pending>,
}

impl Runtime {
    pub fn new(client: Client) -> Self {
        let (sender, receiver) = async_channel::unbounded();

        Self {
            client,
            executor: LocalExecutor::new(),
            sender,
            receiver,
            pending: Rc::default(),
        }
    }

    pub fn sender(&self) -> Sender {
        self.sender.clone()
    }

    pub fn input(&self) -> Input {
        Input {
            sender: self.sender.clone(),
            pending: Rc::clone(&self.pending),
        }
    }

    /// Queue `message` for the view.
    pub fn send(&self, message: Message) {
        if let Err(err) = self.sender.try_send(message) {
            log::error!("Failed to send message: {err}");
        }
    }

    /// Stop [`Runtime::run`] once the queued messages are handled.
    pub fn close(&self) {
        self.sender.close();
    }

    /// Run `task` in the background, its outcome is queued as a message.
    pub fn spawn(&self, task: Task) {
        if task == Task::None {
            return;
        }

        let client = self.client.clone();
        let sender = self.sender.clone();
        let pending = Rc::clone(&self.pending);
        pending.tasks.set(pending.tasks.get() + 1);

        self.executor
            .spawn(async move {
                if let Some(message) = perform(client, task).await {
                    if let Err(err) = sender.send(message).await {
                        log::warn!("Dropping task result, the view is gone: {err}");
                    }
                }

                pending.tasks.set(pending.tasks.get() - 1);
            })
            .detach();
    }

    /// Run an input source, e.g. a terminal reader, next to the view.
    pub fn spawn_input(&self, future: impl Future<Output = ()> + 'static) {
        self.executor.spawn(future).detach();
    }

    /// Feed queued messages into `view` until the channel closes, `after`
    /// breaks, or the input hung up and nothing is left to handle. `after`
    /// sees the view right after each update.
    pub fn run<F>(&self, view: &mut CalendarView, mut after: F)
    where
        F: FnMut(&CalendarView, &Message) -> ControlFlow<()>,
    {
        smol::block_on(self.executor.run(async {
            while let Ok(message) = self.receiver.recv().await {
                log::trace!("Handling {message:?}");

                let task = view.update(message.clone());
                self.spawn(task);

                if after(view, &message).is_break() {
                    break;
                }

                if self.pending.settled() && self.receiver.is_empty() {
                    log::debug!("Input closed and all tasks done, stopping");
                    break;
                }
            }
        }));
    }
}
