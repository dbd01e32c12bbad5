//! Typed error handling for opsboard
//!
//! Errors fall into two families the rest of the crate cares about:
//!
//! - [`ValidationError`]: caught client-side before any backend call is made.
//!   Submission short-circuits and the message is rendered inline.
//! - [`BackendError`] / [`AuthError`]: the backend rejected or the transport
//!   failed. The backend's own message string is preserved verbatim so it can
//!   be shown inline, leaving the form populated for a manual retry.
//!
//! [`AppError`] is the umbrella type returned by form submits and page
//! operations.

use thiserror::Error;
use uuid::Uuid;

/// The top-level error type for the application core
#[derive(Debug, Error)]
pub enum AppError {
    /// Client-side validation failure (no backend call was made)
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The backend rejected an operation or the transport failed
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// Authentication/session failure
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Configuration loading/parsing failure
    #[error("configuration error: {0}")]
    Config(String),

    /// Should not happen in normal operation
    #[error("internal error: {0}")]
    Internal(String),
}

/// Client-side validation failures
///
/// One variant per rejection the forms can produce. Messages are the exact
/// strings rendered inline above the form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field was left empty
    #[error("The {field} field is required.")]
    MissingField { field: &'static str },

    /// Supplier selection is "Other" but the custom text is empty
    #[error("Please enter a custom supplier name.")]
    CustomSupplierRequired,

    /// No employee selected and "Other" not chosen
    #[error("Please select an employee or choose \"Other\".")]
    EmployeeChoiceRequired,

    /// "Other" chosen but the custom employee text is empty
    #[error("Please enter a custom employee name.")]
    CustomEmployeeNameRequired,

    /// Edit path: the free-text employee name is empty
    #[error("Employee name is required.")]
    EmployeeNameRequired,

    /// Weekly form: some employee block has an empty/whitespace-only name
    #[error("All employees must have a name.")]
    AllEmployeesNeedNames,

    /// Weekly form: no {employee, day} pair has both start and end set
    #[error("At least one shift must be defined.")]
    NoShiftsDefined,

    /// A date input did not parse as a calendar date
    #[error("'{value}' is not a valid date for {field} (expected YYYY-MM-DD).")]
    InvalidDate { field: &'static str, value: String },

    /// A time input did not parse as a time of day
    #[error("'{value}' is not a valid time for {field} (expected HH:MM).")]
    InvalidTime { field: &'static str, value: String },

    /// A numeric input did not parse or was negative
    #[error("'{value}' is not a valid non-negative number for {field}.")]
    InvalidNumber { field: &'static str, value: String },
}

/// Errors from the hosted backend's data surface
#[derive(Debug, Error)]
pub enum BackendError {
    /// The backend answered with an error. The message is the backend's own
    /// string and is displayed verbatim.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The request never completed (network failure, connection refused, ...)
    #[error("network error: {0}")]
    Transport(String),

    /// A row could not be decoded into the expected record type
    #[error("failed to decode {collection} row: {message}")]
    Decode { collection: String, message: String },

    /// Update target does not exist
    #[error("{collection} row with id '{id}' not found")]
    NotFound { collection: String, id: Uuid },

    /// Local store failure (lock poisoning and the like)
    #[error("store error: {0}")]
    Store(String),
}

/// Errors from the backend's auth surface
#[derive(Debug, Error)]
pub enum AuthError {
    /// The auth service rejected the attempt; message shown verbatim
    #[error("{0}")]
    Rejected(String),

    /// The request never reached the auth service
    #[error("network error: {0}")]
    Transport(String),

    /// An operation required a session but none is established
    #[error("no active session")]
    NoSession,
}
