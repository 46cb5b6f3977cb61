//! Authentication state.

use chrono::{DateTime, Utc};
use shared::domain::Identity;

/// Identifies one signed-in session. Results of remote calls issued under an
/// older epoch are discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionEpoch(u64);

#[derive(Debug, Default)]
pub struct SessionStore {
    identity: Option<Identity>,
    authenticated_at: Option<DateTime<Utc>>,
    epoch: SessionEpoch,
}

impl SessionStore {
    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn authenticated_at(&self) -> Option<DateTime<Utc>> {
        self.authenticated_at
    }

    pub fn epoch(&self) -> SessionEpoch {
        self.epoch
    }

    /// Records a successful login. Returns `false` and leaves the store
    /// untouched when a session is already established.
    pub fn establish(&mut self, identity: Identity) -> bool {
        if self.identity.is_some() {
            return false;
        }
        self.identity = Some(identity);
        self.authenticated_at = Some(Utc::now());
        self.epoch.0 += 1;
        true
    }

    pub fn clear(&mut self) -> Option<Identity> {
        let previous = self.identity.take();
        if previous.is_some() {
            self.authenticated_at = None;
            self.epoch.0 += 1;
        }
        previous
    }
}
