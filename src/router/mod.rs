//! Client-side router.
//!
//! SYSTEM CONTEXT
//! ==============
//! The router becomes active after the boot identity check. Every navigation
//! passes through [`guard::before_each`]; a redirect is followed once, to the
//! unguarded login route.

pub mod guard;
pub mod routes;

use std::sync::Arc;

use tokio::sync::RwLock;

pub use guard::NavigationDecision;
pub use routes::{RouteMatch, RouteName};

use crate::state::session::SessionStore;

pub struct Router {
    session: Arc<SessionStore>,
    current: RwLock<Option<RouteMatch>>,
}

impl Router {
    #[must_use]
    pub fn new(session: Arc<SessionStore>) -> Self {
        Self { session, current: RwLock::new(None) }
    }

    /// Route currently displayed, if any navigation has succeeded.
    pub async fn current(&self) -> Option<RouteMatch> {
        self.current.read().await.clone()
    }

    /// Navigate to `location`, following a guard redirect to the login route.
    ///
    /// Returns the guard's decision for the requested location. The current
    /// route is unchanged when the location does not resolve.
    pub async fn navigate(&self, location: &str) -> NavigationDecision {
        let decision = guard::before_each(&self.session, location).await;
        let landed = match &decision {
            NavigationDecision::Proceed(route) => Some(route.clone()),
            NavigationDecision::Redirect { location } => routes::resolve(location),
            NavigationDecision::NotFound { .. } => None,
        };
        if let Some(route) = landed {
            *self.current.write().await = Some(route);
        }
        decision
    }
}
