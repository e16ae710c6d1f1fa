//! Typed client for the dashboard REST API.
//!
//! Every feature goes through [`Client::request`]; the per-resource modules
//! only describe payload types and plug them into the generic [`Endpoint`].

mod categories;
mod chores;
mod client;
mod error;
mod events;
mod lists;
mod query;
mod resource;
mod weather;

pub mod timestamp;
pub mod transport;

pub use categories::*;
pub use chores::*;
pub use client::*;
pub use error::*;
pub use events::*;
pub use lists::*;
pub use query::*;
pub use resource::*;
pub use transport::{Method, RawResponse, Transport};
pub use weather::*;
