//! Core building blocks: errors, change feed, query spec, record trait

pub mod error;
pub mod events;
pub mod query;
pub mod record;

pub use error::{AppError, AuthError, BackendError, ValidationError};
pub use events::{ChangeAction, ChangeEnvelope, ChangeEvent, ChangeFeed, ChangeSubscription};
pub use query::{Filter, OrderBy, Query, SortDirection};
pub use record::Record;
