//! Authentication events and the navigation handler that reacts to them
//!
//! The request pipeline never navigates by itself. On a 401 it clears the
//! stored credentials and publishes [`AuthEvent::Unauthenticated`]; a
//! [`RedirectHandler`] subscribed to the channel sends the user to the login
//! route, remembering where they were.

use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

const EVENT_CAPACITY: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    /// The server rejected the credentials of a call to `endpoint`
    Unauthenticated { endpoint: String },
}

/// Publisher side of the authentication event channel
#[derive(Debug, Clone)]
pub struct AuthEvents {
    sender: broadcast::Sender<AuthEvent>,
}

impl AuthEvents {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(EVENT_CAPACITY);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: AuthEvent) {
        if self.sender.send(event).is_err() {
            debug!("No subscribers for auth event");
        }
    }
}

impl Default for AuthEvents {
    fn default() -> Self {
        Self::new()
    }
}

/// Host navigation surface (browser location, TUI screen stack, ...)
pub trait Navigator: Send + Sync + 'static {
    /// Path the user is currently on, e.g. `/curriculums/42`
    fn current_path(&self) -> String;

    fn navigate(&self, url: &str);
}

/// `<login_route>?redirect=<current path>`, the path encoded as a URI component
pub fn login_redirect_url(login_route: &str, current_path: &str) -> String {
    format!("{login_route}?redirect={}", urlencoding::encode(current_path))
}

/// Performs one login redirect per authentication failure
pub struct RedirectHandler {
    navigator: Arc<dyn Navigator>,
    login_route: String,
}

impl RedirectHandler {
    pub fn new(navigator: Arc<dyn Navigator>, login_route: impl Into<String>) -> Self {
        Self {
            navigator,
            login_route: login_route.into(),
        }
    }

    pub fn handle(&self, event: &AuthEvent) {
        match event {
            AuthEvent::Unauthenticated { endpoint } => {
                let target = login_redirect_url(&self.login_route, &self.navigator.current_path());
                info!(endpoint = %endpoint, target = %target, "Redirecting to login");
                self.navigator.navigate(&target);
            }
        }
    }

    /// Handle events until every publisher is gone
    pub async fn run(self, mut events: broadcast::Receiver<AuthEvent>) {
        loop {
            match events.recv().await {
                Ok(event) => self.handle(&event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped = %skipped, "Auth event handler lagged behind");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    debug!("Auth event channel closed");
                    break;
                }
            }
        }
    }
}
