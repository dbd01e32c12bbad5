//! Record trait binding a domain type to its backend collection

use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

/// A persisted record type
///
/// Every record lives in exactly one named collection and is identified by an
/// opaque unique id assigned by the backend.
pub trait Record: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
    /// The backend collection this record type is stored in
    fn collection() -> &'static str;

    /// The row id
    fn id(&self) -> Uuid;
}
