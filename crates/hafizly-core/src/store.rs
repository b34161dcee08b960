//! Link store
//!
//! The store owns the in-memory snapshot of the remote table and the
//! data-access handle. The snapshot is always a full copy of the table,
//! never a diff: every mutation is followed by a complete re-fetch. That
//! trades an extra round trip for never having local patching drift out
//! of sync with the server.
//!
//! ## Usage
//!
//! ```ignore
//! let table = RemoteTable::new(url, "link-hub", key)?;
//! let mut store = LinkStore::new(Arc::new(table));
//!
//! store.refresh().await?;
//! store.add(&LinkDraft::new("Docs", "", "https://example.com", true)).await?;
//! let links = store.links();
//! ```

use std::sync::Arc;

use thiserror::Error;

use crate::models::{Category, Link, LinkDraft, ValidationError};
use crate::remote::{LinkBackend, TableError};

/// Errors from store operations
///
/// Remote failures carry the generic alert text the screens display;
/// the underlying `TableError` stays attached as the source.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("{message}")]
    Remote {
        message: &'static str,
        #[source]
        source: TableError,
    },
}

impl StoreError {
    /// The message shown to the user
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

fn remote(message: &'static str) -> impl FnOnce(TableError) -> StoreError {
    move |source| StoreError::Remote { message, source }
}

/// Owner of the in-memory link list and its remote synchronization
pub struct LinkStore {
    backend: Arc<dyn LinkBackend>,
    links: Vec<Link>,
}

impl LinkStore {
    /// Create a store over the given data-access handle
    ///
    /// The snapshot starts empty; call `refresh` to load it.
    pub fn new(backend: Arc<dyn LinkBackend>) -> Self {
        Self {
            backend,
            links: Vec::new(),
        }
    }

    // ==================== Snapshot access ====================

    /// The current snapshot, newest first
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Find a link by id in the current snapshot
    pub fn get(&self, id: i64) -> Option<&Link> {
        self.links.iter().find(|l| l.id == id)
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn public_count(&self) -> usize {
        self.links.iter().filter(|l| l.is_public()).count()
    }

    pub fn private_count(&self) -> usize {
        self.links.iter().filter(|l| !l.is_public()).count()
    }

    // ==================== Operations ====================

    /// Fetch the full table, newest first
    ///
    /// On failure the prior snapshot is left untouched.
    pub async fn refresh(&mut self) -> Result<(), StoreError> {
        let links = self
            .backend
            .list()
            .await
            .map_err(remote("Failed to fetch links."))?;
        self.links = links;
        Ok(())
    }

    /// Validate and insert a new link, then re-fetch
    ///
    /// A draft that fails validation never reaches the remote table.
    pub async fn add(&mut self, draft: &LinkDraft) -> Result<(), StoreError> {
        let valid = draft.validate()?;
        self.backend
            .insert(&valid)
            .await
            .map_err(remote("Failed to add link."))?;
        self.refresh().await
    }

    /// Validate and overwrite every field of an existing link, then re-fetch
    pub async fn update(&mut self, id: i64, draft: &LinkDraft) -> Result<(), StoreError> {
        let valid = draft.validate()?;
        self.backend
            .update(id, &valid)
            .await
            .map_err(remote("Failed to update link."))?;
        self.refresh().await
    }

    /// Flip a link to the opposite category, then re-fetch
    pub async fn toggle_privacy(&mut self, id: i64, current: Category) -> Result<(), StoreError> {
        self.backend
            .set_category(id, current.toggled())
            .await
            .map_err(remote("Failed to update privacy."))?;
        self.refresh().await
    }

    /// Remove a link by id, then re-fetch
    pub async fn delete(&mut self, id: i64) -> Result<(), StoreError> {
        self.backend
            .delete(id)
            .await
            .map_err(remote("Failed to delete link."))?;
        self.refresh().await
    }
}
