//! # OpsBoard
//!
//! Application core for a small business operations board: supplier invoices
//! and employee work schedules over a hosted backend.
//!
//! ## Features
//!
//! - **Backend Seam**: One [`backend::Backend`] trait covering CRUD, a
//!   per-collection change feed, and the auth surface
//! - **Live Pages**: Page controllers that refetch on every change event and
//!   replace their snapshot wholesale
//! - **Role Gating**: Schedule management restricted to employer accounts
//! - **Form Pipeline**: String-field forms validated into persistence rows,
//!   including weekly bulk shift entry
//! - **Two Backends**: An in-memory backend for tests and a REST backend
//!   speaking a PostgREST-style API with websocket change frames
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use opsboard::prelude::*;
//!
//! let backend: Arc<dyn Backend> = Arc::new(InMemoryBackend::new());
//! let auth = AuthContext::new(backend.clone());
//! auth.initialize().await;
//! auth.sign_in("boss@example.com", "secret").await?;
//!
//! let page = InvoicesPage::new(backend);
//! page.mount().await;
//! for row in page.view().await {
//!     println!("{} {} {}", row.date, row.supplier_name, row.amount);
//! }
//! ```

pub mod app;
pub mod auth;
pub mod backend;
pub mod config;
pub mod core;
pub mod forms;
pub mod model;
pub mod pages;
pub mod views;

/// Install the global tracing subscriber, honoring `RUST_LOG`
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        AppError, AuthError, BackendError, ChangeAction, ChangeEvent, ChangeFeed,
        ChangeSubscription, Query, Record, SortDirection, ValidationError,
    };

    // === Backend ===
    pub use crate::backend::{Backend, InMemoryBackend, RestBackend, fetch_all};

    // === Auth ===
    pub use crate::auth::{AuthContext, Session, SessionStatus, UserRole};

    // === Model ===
    pub use crate::model::{EmployeeUser, Invoice, Schedule, SUPPLIERS, time_options};

    // === Forms ===
    pub use crate::forms::{
        EditScheduleForm, EmployeeChoice, InvoiceForm, ScheduleForm, WeeklyScheduleForm,
    };

    // === Pages ===
    pub use crate::pages::{InvoiceModal, InvoicesPage, ScheduleModal, SchedulesPage};

    // === App ===
    pub use crate::app::{NavbarModel, Navigation, Route, resolve};

    // === Config ===
    pub use crate::config::{AppConfig, BackendConfig};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::NaiveDate;
    pub use serde::{Deserialize, Serialize};
    pub use std::sync::Arc;
    pub use uuid::Uuid;
}
