//! Client-side application state for the user roster: session, roster cache,
//! edit session, transient notifications and theme, coordinated by
//! [`Coordinator`].

use std::sync::Arc;

use async_trait::async_trait;
use shared::{
    domain::{Identity, UserRecord},
    protocol::NewUser,
};

pub mod config;
mod coordinator;
pub mod edit;
pub mod error;
pub mod http;
pub mod notification;
pub mod roster;
pub mod session;
pub mod theme;

pub use config::{load_settings, ClientSettings};
pub use coordinator::{AppSnapshot, ClientEvent, Coordinator};
pub use edit::{EditDraft, EditMode};
pub use error::{
    AuthError, CoordinatorError, CreateError, FetchError, UiError, UiErrorCategory,
    UiErrorContext, UpdateError,
};
pub use http::HttpUserService;
pub use notification::NotificationState;
pub use theme::{Palette, ThemeState};

#[async_trait]
pub trait AuthService: Send + Sync {
    async fn authenticate(&self, email: &str, password: &str) -> Result<Identity, AuthError>;
}

#[async_trait]
pub trait RosterService: Send + Sync {
    async fn list_users(&self) -> Result<Vec<UserRecord>, FetchError>;
}

#[async_trait]
pub trait UpdateService: Send + Sync {
    /// Returns the canonical copy the service stored.
    async fn update_user(&self, record: UserRecord) -> Result<UserRecord, UpdateError>;
}

#[async_trait]
pub trait CreateService: Send + Sync {
    async fn create_user(&self, draft: NewUser) -> Result<UserRecord, CreateError>;
}

/// The remote collaborators a [`Coordinator`] drives.
#[derive(Clone)]
pub struct Collaborators {
    pub auth: Arc<dyn AuthService>,
    pub roster: Arc<dyn RosterService>,
    pub updates: Arc<dyn UpdateService>,
    pub creates: Arc<dyn CreateService>,
}

impl Collaborators {
    /// Wires every collaborator to one service implementing all four traits.
    pub fn from_service<S>(service: Arc<S>) -> Self
    where
        S: AuthService + RosterService + UpdateService + CreateService + 'static,
    {
        Self {
            auth: service.clone(),
            roster: service.clone(),
            updates: service.clone(),
            creates: service,
        }
    }
}
