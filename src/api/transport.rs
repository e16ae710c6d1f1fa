use std::time::Duration;

use ureq::Agent;
use url::Url;

use super::Error;

pub const NO_CONTENT: u16 = 204;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl Method {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

/// Status and body of a finished HTTP exchange, successful or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// The HTTP boundary of the [`Client`](super::Client).
///
/// Implementations return `Ok` for every response the server produced,
/// including error statuses. `Err` is reserved for requests that never got an
/// answer.
pub trait Transport: Send + Sync {
    fn send(&self, method: Method, url: &Url, body: Option<&str>) -> Result<RawResponse, Error>;
}

#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: Agent,
}

impl UreqTransport {
    pub fn new(timeout: Option<Duration>) -> Self {
        let mut builder = ureq::AgentBuilder::new();

        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Self {
            agent: builder.build(),
        }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Transport for UreqTransport {
    fn send(&self, method: Method, url: &Url, body: Option<&str>) -> Result<RawResponse, Error> {
        let request = self
            .agent
            .request(method.as_str(), url.as_str())
            .set("Accept", "application/json");

        let result = match body {
            Some(body) => request
                .set("Content-Type", "application/json")
                .send_string(body),
            None => request.call(),
        };

        // ureq reports 4xx/5xx as errors, but they still carry the body we need
        let response = match result {
            Ok(response) | Err(ureq::Error::Status(_, response)) => response,
            Err(e) => return Err(e.into()),
        };

        let status = response.status();
        let body = if status == NO_CONTENT {
            String::new()
        } else {
            response.into_string()?
        };

        Ok(RawResponse { status, body })
    }
}
