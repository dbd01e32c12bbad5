//! The hosted-backend contract and its implementations
//!
//! The backend is a remote capability the application consumes but does not
//! own: query/insert/update/delete over named collections of JSON rows, a
//! per-collection change feed, and an auth surface. [`Backend`] is the seam;
//! everything above it (forms, pages) is backend-agnostic.

pub mod in_memory;
pub mod rest;

pub use in_memory::InMemoryBackend;
pub use rest::RestBackend;

use crate::auth::{Session, UserRole};
use crate::core::{BackendError, ChangeSubscription, Query, Record};
use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

/// The remote backend capability
///
/// Rows cross this boundary as JSON values; [`fetch_all`] bridges to typed
/// records. Mutations are last-write-wins — the backend is the arbiter and
/// the UI reflects only confirmed reads.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Fetch all rows of a collection matching the query, in query order
    async fn fetch(&self, collection: &str, query: &Query) -> Result<Vec<Value>, BackendError>;

    /// Insert one or many rows in a single call
    async fn insert(&self, collection: &str, rows: Vec<Value>) -> Result<(), BackendError>;

    /// Update the fields present in `patch` on the row identified by `id`
    async fn update(&self, collection: &str, id: Uuid, patch: Value) -> Result<(), BackendError>;

    /// Delete the row identified by `id`
    async fn delete(&self, collection: &str, id: Uuid) -> Result<(), BackendError>;

    /// Open a change-feed subscription for one collection (all event types)
    fn subscribe(&self, collection: &str) -> ChangeSubscription;

    // === Auth surface ===

    /// The currently established session, if any
    async fn current_session(&self) -> Result<Option<Session>, crate::core::AuthError>;

    /// Sign in with email and password
    async fn sign_in(&self, email: &str, password: &str)
    -> Result<Session, crate::core::AuthError>;

    /// Register a new account and establish its session
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        name: &str,
        role: UserRole,
    ) -> Result<Session, crate::core::AuthError>;

    /// Tear down the current session
    async fn sign_out(&self) -> Result<(), crate::core::AuthError>;
}

/// Fetch a collection and decode every row into a typed record
pub async fn fetch_all<T: Record>(
    backend: &dyn Backend,
    query: &Query,
) -> Result<Vec<T>, BackendError> {
    let rows = backend.fetch(T::collection(), query).await?;
    rows.into_iter()
        .map(|row| {
            serde_json::from_value(row).map_err(|e| BackendError::Decode {
                collection: T::collection().to_string(),
                message: e.to_string(),
            })
        })
        .collect()
}
