// src/store.rs
//! In-memory list cache for one backend collection.
//!
//! Every successful mutation is followed by a full reload: the list always
//! mirrors the last server answer and never holds records the server has not
//! returned (no speculative appends, no local filtering on delete).

use std::fmt;

use http::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::client::HttpClient;
use crate::error::ApiError;

/// Which verb a collection uses for edits. `PUT` replaces the record, `PATCH`
/// merges the supplied fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateVerb {
    Put,
    Patch,
}

impl UpdateVerb {
    pub fn method(self) -> Method {
        match self {
            UpdateVerb::Put => Method::PUT,
            UpdateVerb::Patch => Method::PATCH,
        }
    }
}

pub trait Resource: DeserializeOwned + Clone + fmt::Debug {
    /// Body sent on create (and full update).
    type Payload: Serialize;

    /// Collection path, e.g. `drivers`.
    const COLLECTION: &'static str;
    /// Singular noun used in messages, e.g. `driver`.
    const LABEL: &'static str;
    const UPDATE_VERB: UpdateVerb;

    fn id(&self) -> i64;
}

pub struct ResourceStore<R: Resource> {
    client: HttpClient,
    items: Vec<R>,
    last_error: Option<String>,
}

impl<R: Resource> ResourceStore<R> {
    pub fn new(client: HttpClient) -> Self {
        Self { client, items: Vec::new(), last_error: None }
    }

    /// Records in the order the server returned them.
    pub fn items(&self) -> &[R] {
        &self.items
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn find(&self, id: i64) -> Option<&R> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Replaces the list with the server's. On failure the list is kept.
    pub async fn load(&mut self) -> Result<(), ApiError> {
        let fallback = format!("Failed to fetch {}.", R::COLLECTION);
        let result = self
            .client
            .request_as::<Vec<R>>(Method::GET, R::COLLECTION, None, &fallback)
            .await;

        match result {
            Ok(items) => {
                tracing::debug!(collection = R::COLLECTION, count = items.len(), "loaded");
                self.items = items;
                self.last_error = None;
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    pub async fn create(&mut self, payload: &R::Payload) -> Result<(), ApiError> {
        let fallback = format!("Failed to create {}.", R::LABEL);
        match self.client.send_json(Method::POST, R::COLLECTION, payload, &fallback).await {
            Ok(_) => {
                tracing::info!(collection = R::COLLECTION, "created");
                self.settle().await;
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Sends `patch` with the collection's update verb.
    pub async fn update<P: Serialize + ?Sized>(&mut self, id: i64, patch: &P) -> Result<(), ApiError> {
        let fallback = format!("Failed to update {}.", R::LABEL);
        let method = R::UPDATE_VERB.method();
        match self.client.send_json(method, &item_path::<R>(id), patch, &fallback).await {
            Ok(_) => {
                tracing::info!(collection = R::COLLECTION, id, "updated");
                self.settle().await;
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    pub async fn remove(&mut self, id: i64) -> Result<(), ApiError> {
        let fallback = format!("Failed to delete {}.", R::LABEL);
        match self.client.request(Method::DELETE, &item_path::<R>(id), None, &fallback).await {
            Ok(_) => {
                tracing::info!(collection = R::COLLECTION, id, "deleted");
                self.settle().await;
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Detail view; leaves `items` alone.
    pub async fn get_by_id(&mut self, id: i64) -> Result<R, ApiError> {
        let fallback = format!("Failed to fetch {} details.", R::LABEL);
        match self
            .client
            .request_as::<R>(Method::GET, &item_path::<R>(id), None, &fallback)
            .await
        {
            Ok(item) => {
                self.last_error = None;
                Ok(item)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    // The mutation went through; a failing reload only shows up in last_error.
    async fn settle(&mut self) {
        self.last_error = None;
        if let Err(e) = self.load().await {
            tracing::warn!(collection = R::COLLECTION, error = %e, "reload after mutation failed");
        }
    }

    fn fail(&mut self, err: ApiError) -> ApiError {
        self.last_error = Some(err.to_string());
        err
    }
}

fn item_path<R: Resource>(id: i64) -> String {
    format!("{}/{}", R::COLLECTION, id)
}
