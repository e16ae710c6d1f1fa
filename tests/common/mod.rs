#![allow(dead_code)]

use std::sync::mpsc;
use std::sync::{Arc, Mutex};

use home_dashboard::api::{Client, Error, Method, RawResponse, Transport};
use url::Url;

pub const BASE_URL: &str = "http://dashboard.test/api/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    pub url: Url,
    pub body: Option<String>,
}

impl Request {
    /// Path and query relative to the API root, e.g. `/events?start=..`.
    pub fn target(&self) -> String {
        let path = self.url.path().trim_start_matches("/api");

        match self.url.query() {
            Some(query) => format!("{path}?{query}"),
            None => path.to_owned(),
        }
    }
}

struct Route {
    method: Method,
    prefix: String,
    response: RawResponse,
    gate: Option<Arc<Mutex<mpsc::Receiver<()>>>>,
}

/// Answers requests from a fixed script and records everything it sees.
#[derive(Clone, Default)]
pub struct Scripted {
    routes: Arc<Mutex<Vec<Route>>>,
    log: Arc<Mutex<Vec<Request>>>,
}

impl Scripted {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `method` on targets starting with `prefix`. Later routes win.
    pub fn on(&self, method: Method, prefix: &str, status: u16, body: &str) -> &Self {
        self.push(method, prefix, status, body, None);
        self
    }

    /// Like [`Scripted::on`], but the answer waits until the returned sender
    /// fires or is dropped.
    pub fn gated(&self, method: Method, prefix: &str, status: u16, body: &str) -> mpsc::Sender<()> {
        let (sender, receiver) = mpsc::channel();
        self.push(method, prefix, status, body, Some(Arc::new(Mutex::new(receiver))));
        sender
    }

    pub fn requests(&self) -> Vec<Request> {
        self.log.lock().unwrap().clone()
    }

    pub fn client(&self) -> Client {
        Client::with_transport(Url::parse(BASE_URL).unwrap(), self.clone())
    }

    fn push(&self, method: Method, prefix: &str, status: u16, body: &str, gate: Option<Arc<Mutex<mpsc::Receiver<()>>>>) {
        self.routes.lock().unwrap().push(Route {
            method,
            prefix: prefix.to_owned(),
            response: RawResponse::new(status, body.to_owned()),
            gate,
        });
    }
}

impl Transport for Scripted {
    fn send(&self, method: Method, url: &Url, body: Option<&str>) -> Result<RawResponse, Error> {
        let request = Request {
            method,
            url: url.clone(),
            body: body.map(str::to_owned),
        };
        let target = request.target();
        self.log.lock().unwrap().push(request);

        let (response, gate) = {
            let routes = self.routes.lock().unwrap();
            let route = routes
                .iter()
                .rev()
                .find(|route| route.method == method && target.starts_with(&route.prefix))
                .unwrap_or_else(|| panic!("no route for {} {target}", method.as_str()));

            (route.response.clone(), route.gate.clone())
        };

        if let Some(gate) = gate {
            let _ = gate.lock().unwrap().recv();
        }

        Ok(response)
    }
}
