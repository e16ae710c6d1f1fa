use std::sync::Arc;
use std::time::Duration;

use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize as _, Serialize};
use url::Url;

use super::transport::{Method, Transport, UreqTransport, NO_CONTENT};
use super::{
    Categories, Chores, Endpoint, Error, Events, Id, Query, TodoItems, TodoLists, Weather,
    WeatherQuery,
};

/// Typed access to the dashboard REST API.
///
/// The client holds no state besides its configuration and is cheap to clone,
/// so it can be moved into background tasks.
#[derive(Clone)]
pub struct Client {
    base_url: Url,
    transport: Arc<dyn Transport>,
}

impl core::fmt::Debug for Client {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl Client {
    pub fn new(base_url: Url, timeout: Option<Duration>) -> Self {
        Self::with_transport(base_url, UreqTransport::new(timeout))
    }

    pub fn with_transport(base_url: Url, transport: impl Transport + 'static) -> Self {
        Self {
            base_url,
            transport: Arc::new(transport),
        }
    }

    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve `path` below the API root and attach `query`.
    ///
    /// # Errors
    /// Returns an error if the base url cannot carry a path.
    pub fn url(&self, path: &str, query: &Query) -> Result<Url, Error> {
        let mut url = self.base_url.clone();

        url.path_segments_mut()
            .map_err(|()| Error::request(format!("{} cannot be used as API root", self.base_url)))?
            .pop_if_empty()
            .extend(path.split('/').filter(|segment| !segment.is_empty()));

        query.apply(&mut url);

        Ok(url)
    }

    /// Send one request and decode the response as `T`.
    ///
    /// A no-content response (or an empty body) yields the empty value of `T`
    /// without reading a body, so `T` should be `()`, an `Option` or
    /// [`IgnoredAny`] for endpoints that answer that way.
    ///
    /// # Errors
    /// Returns an error if the request fails, the status is not a success, or
    /// the body is not a valid `T`.
    pub fn request<T, B>(
        &self,
        method: Method,
        path: &str,
        query: &Query,
        body: Option<&B>,
    ) -> Result<T, Error>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.url(path, query)?;
        let body = body
            .map(serde_json::to_string)
            .transpose()
            .map_err(Error::request)?;

        let response = self.transport.send(method, &url, body.as_deref())?;

        log::debug!(
            method = method.as_str(),
            url = url.as_str(),
            status = response.status;
            "API request finished"
        );

        if !response.is_success() {
            return Err(Error::status(response.status, response.body));
        }

        if response.status == NO_CONTENT || response.body.trim().is_empty() {
            return Ok(T::deserialize(serde_json::Value::Null)?);
        }

        Ok(serde_json::from_str(&response.body)?)
    }

    pub fn get<T: DeserializeOwned>(&self, path: &str, query: &Query) -> Result<T, Error> {
        self.request::<T, ()>(Method::Get, path, query, None)
    }

    pub fn post<T, B>(&self, path: &str, body: &B) -> Result<T, Error>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::Post, path, &Query::new(), Some(body))
    }

    pub fn patch<T, B>(&self, path: &str, body: &B) -> Result<T, Error>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::Patch, path, &Query::new(), Some(body))
    }

    /// Delete the resource at `path`, ignoring whatever body the server sends.
    ///
    /// # Errors
    /// Returns an error if the request fails or the status is not a success.
    pub fn delete(&self, path: &str) -> Result<(), Error> {
        self.request::<IgnoredAny, ()>(Method::Delete, path, &Query::new(), None)
            .map(|_| ())
    }

    pub fn events(&self) -> Endpoint<'_, Events> {
        Endpoint::new(self)
    }

    pub fn chores(&self) -> Endpoint<'_, Chores> {
        Endpoint::new(self)
    }

    pub fn lists(&self) -> Endpoint<'_, TodoLists> {
        Endpoint::new(self)
    }

    pub fn items(&self, list_id: Id) -> Endpoint<'_, TodoItems> {
        Endpoint::at(self, format!("/lists/{list_id}/items"))
    }

    pub fn categories(&self) -> Endpoint<'_, Categories> {
        Endpoint::new(self)
    }

    /// # Errors
    /// Returns an error if the request fails, e.g. for an unknown city.
    pub fn weather(&self, query: &WeatherQuery) -> Result<Weather, Error> {
        self.get("/weather", &query.into())
    }
}
