use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{Client, Error, Query};

/// Server side identifier of any resource.
pub type Id = i64;

/// A collection on the API that supports the list/get/create/update/delete
/// template.
pub trait Resource {
    /// Collection path below the API root.
    const PATH: &'static str;

    type Item: DeserializeOwned;
    /// Payload for creation.
    type New: Serialize;
    /// Partial payload for updates, unset fields are left out of the body.
    type Patch: Serialize;
}

/// One collection of `R` on a [`Client`].
pub struct Endpoint<'a, R> {
    client: &'a Client,
    path: String,
    resource: PhantomData<fn() -> R>,
}

impl<R> core::fmt::Debug for Endpoint<'_, R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Endpoint").field("path", &self.path).finish()
    }
}

impl<'a, R: Resource> Endpoint<'a, R> {
    pub fn new(client: &'a Client) -> Self {
        Self::at(client, R::PATH.to_owned())
    }

    /// Endpoint for `R` mounted at a custom path, e.g. a nested collection.
    pub fn at(client: &'a Client, path: String) -> Self {
        Self {
            client,
            path,
            resource: PhantomData,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// # Errors
    /// Returns an error if the request fails.
    pub fn list(&self, query: &Query) -> Result<Vec<R::Item>, Error> {
        self.client.get(&self.path, query)
    }

    /// # Errors
    /// Returns an error if the request fails or the item does not exist.
    pub fn get(&self, id: Id) -> Result<R::Item, Error> {
        self.client.get(&self.item_path(id), &Query::new())
    }

    /// Create an item. `None` means the server accepted it with no content.
    ///
    /// # Errors
    /// Returns an error if the request fails or the server rejects the payload.
    pub fn create(&self, new: &R::New) -> Result<Option<R::Item>, Error> {
        self.client.post(&self.path, new)
    }

    /// Patch an item. `None` means the server accepted it with no content.
    ///
    /// # Errors
    /// Returns an error if the request fails or the server rejects the patch.
    pub fn update(&self, id: Id, patch: &R::Patch) -> Result<Option<R::Item>, Error> {
        self.client.patch(&self.item_path(id), patch)
    }

    /// # Errors
    /// Returns an error if the request fails.
    pub fn delete(&self, id: Id) -> Result<(), Error> {
        self.client.delete(&self.item_path(id))
    }

    fn item_path(&self, id: Id) -> String {
        format!("{}/{id}", self.path)
    }
}
