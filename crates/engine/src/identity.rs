//! Identity collaborator.
//!
//! The engine never handles credentials: it only asks who is signed in and
//! lets callers watch session transitions.

use serde::Serialize;
use tokio::sync::watch;

use crate::{EngineError, ResultEngine};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub display_name: String,
    pub email: String,
}

pub trait Identity: Send + Sync {
    fn current_user(&self) -> Option<User>;

    /// Receiver notified on every sign-in / sign-out.
    fn subscribe(&self) -> watch::Receiver<Option<User>>;

    /// The current user's id, or [`EngineError::Unauthenticated`].
    fn require_user_id(&self) -> ResultEngine<String> {
        self.current_user()
            .map(|user| user.id)
            .filter(|id| !id.trim().is_empty())
            .ok_or(EngineError::Unauthenticated)
    }
}

/// Session holder driven by whatever performs the actual authentication.
#[derive(Debug)]
pub struct SessionIdentity {
    sender: watch::Sender<Option<User>>,
}

impl SessionIdentity {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(None);
        Self { sender }
    }

    pub fn signed_in(user: User) -> Self {
        let (sender, _) = watch::channel(Some(user));
        Self { sender }
    }

    pub fn sign_in(&self, user: User) {
        tracing::info!("user {} signed in", user.id);
        self.sender.send_replace(Some(user));
    }

    pub fn sign_out(&self) {
        if let Some(user) = self.sender.send_replace(None) {
            tracing::info!("user {} signed out", user.id);
        }
    }
}

impl Default for SessionIdentity {
    fn default() -> Self {
        Self::new()
    }
}

impl Identity for SessionIdentity {
    fn current_user(&self) -> Option<User> {
        (*self.sender.borrow()).clone()
    }

    fn subscribe(&self) -> watch::Receiver<Option<User>> {
        self.sender.subscribe()
    }
}
