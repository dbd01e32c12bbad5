//! Route table and auth-aware navigation
//!
//! Routes resolve against the session status: protected routes redirect to
//! the login route while signed out, auth routes redirect to the invoice
//! page once signed in, and everything waits behind a loading placeholder
//! until the initial session resolution completes.

use crate::auth::{AuthContext, Session, SessionStatus};

/// Every addressable page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Register,
    Invoices,
    Schedules,
    /// Bare root, always forwarded to [`Route::Invoices`]
    Root,
}

impl Route {
    /// Parse a location path; unknown paths fall back to the root forward
    pub fn parse(path: &str) -> Route {
        match path.trim_end_matches('/') {
            "/login" => Route::Login,
            "/register" => Route::Register,
            "/invoices" => Route::Invoices,
            "/schedules" => Route::Schedules,
            _ => Route::Root,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Register => "/register",
            Route::Invoices => "/invoices",
            Route::Schedules => "/schedules",
            Route::Root => "/",
        }
    }

    fn requires_auth(&self) -> bool {
        matches!(self, Route::Invoices | Route::Schedules | Route::Root)
    }
}

/// What the router does with a requested route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// Session still resolving: render the loading placeholder
    Loading,
    Render(Route),
    Redirect(Route),
}

/// Resolve a requested route against the current session status
pub fn resolve(route: Route, status: SessionStatus) -> Navigation {
    match status {
        SessionStatus::Resolving => Navigation::Loading,
        SessionStatus::SignedOut => {
            if route.requires_auth() {
                Navigation::Redirect(Route::Login)
            } else {
                Navigation::Render(route)
            }
        }
        SessionStatus::SignedIn => match route {
            Route::Login | Route::Register | Route::Root => Navigation::Redirect(Route::Invoices),
            route => Navigation::Render(route),
        },
    }
}

/// One navbar link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub label: &'static str,
    pub route: Route,
    pub active: bool,
}

/// The signed-in navigation bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavbarModel {
    pub title: &'static str,
    pub links: Vec<NavLink>,
    /// `email (role)`
    pub user_label: String,
}

impl NavbarModel {
    /// Build the navbar for the current user; `None` while signed out or
    /// resolving, since the bar only renders inside the app shell
    pub fn build(auth: &AuthContext, current: Route) -> Option<NavbarModel> {
        let session = auth.user()?;
        Some(NavbarModel {
            title: "Invoice Scheduler",
            links: vec![
                NavLink {
                    label: "Invoices",
                    route: Route::Invoices,
                    active: current == Route::Invoices,
                },
                NavLink {
                    label: "Schedules",
                    route: Route::Schedules,
                    active: current == Route::Schedules,
                },
            ],
            user_label: user_label(&session),
        })
    }
}

fn user_label(session: &Session) -> String {
    format!("{} ({})", session.email, session.role)
}
