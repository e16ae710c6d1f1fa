use std::fmt;

/// Errors that may occur while talking to the dashboard API.
///
/// The message of a [`ErrorKind::Status`] error is the raw response body, so
/// callers can show the server's text verbatim.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Error {
    pub kind: ErrorKind,
    pub message: String,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ErrorKind {
    /// No response was received.
    Transport,
    /// The server answered with a non-success status.
    Status(u16),
    /// The response body is not the declared JSON type.
    Parsing,
    /// The request could not be built.
    Request,
}

impl Error {
    pub fn status(code: u16, body: String) -> Self {
        Self {
            kind: ErrorKind::Status(code),
            message: body,
        }
    }

    pub fn request(message: impl fmt::Display) -> Self {
        Self {
            kind: ErrorKind::Request,
            message: message.to_string(),
        }
    }

    pub const fn status_code(&self) -> Option<u16> {
        match self.kind {
            ErrorKind::Status(code) => Some(code),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for Error {}

impl From<ureq::Error> for Error {
    fn from(e: ureq::Error) -> Self {
        match e {
            ureq::Error::Status(code, response) => {
                Self::status(code, response.into_string().unwrap_or_default())
            }
            ureq::Error::Transport(transport) => Self {
                kind: ErrorKind::Transport,
                message: transport.to_string(),
            },
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self {
            kind: ErrorKind::Transport,
            message: e.to_string(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self {
            kind: ErrorKind::Parsing,
            message: e.to_string(),
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(e: url::ParseError) -> Self {
        Self::request(e)
    }
}
