//! Routes, navigation side effects and the session route guard

use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;

use crate::domains::auth::state_types::SessionState;

/// Top-level pages of the front-end
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    /// Authenticated landing area, `/`
    Dashboard,
    /// `/login`
    Login,
    NotFound(String),
}

impl Route {
    pub fn from_path(path: &str) -> Self {
        let trimmed = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = trimmed.trim_end_matches('/');
        match trimmed {
            "" => Route::Dashboard,
            "/login" => Route::Login,
            _ => Route::NotFound(path.to_string()),
        }
    }

    pub fn path(&self) -> &str {
        match self {
            Route::Dashboard => "/",
            Route::Login => "/login",
            Route::NotFound(path) => path,
        }
    }

    pub fn requires_session(&self) -> bool {
        matches!(self, Route::Dashboard)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Receives the navigation side effects of session transitions
pub trait Navigator: Send + Sync + fmt::Debug {
    fn navigate(&self, route: Route);
}

/// Publishes the current route on a watch channel for the UI layer
#[derive(Debug, Clone)]
pub struct ChannelNavigator {
    sender: Arc<watch::Sender<Route>>,
}

impl ChannelNavigator {
    pub fn new(initial: Route) -> Self {
        let (sender, _) = watch::channel(initial);
        Self {
            sender: Arc::new(sender),
        }
    }

    pub fn current(&self) -> Route {
        self.sender.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Route> {
        self.sender.subscribe()
    }
}

impl Default for ChannelNavigator {
    fn default() -> Self {
        Self::new(Route::Dashboard)
    }
}

impl Navigator for ChannelNavigator {
    fn navigate(&self, route: Route) {
        log::debug!("[Navigator] -> {}", route);
        self.sender.send_replace(route);
    }
}

/// Outcome of checking a route against the session state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session state is not authoritative yet; render a placeholder
    Wait,
    Render,
    Redirect(Route),
}

pub fn guard(route: &Route, state: &SessionState) -> GuardDecision {
    if state.is_loading {
        return GuardDecision::Wait;
    }
    match route {
        Route::Dashboard if state.user.is_none() => {
            GuardDecision::Redirect(Route::Login)
        }
        Route::Login if state.user.is_some() => {
            GuardDecision::Redirect(Route::Dashboard)
        }
        _ => GuardDecision::Render,
    }
}
