//! Sequences login, roster refetch, creation, editing and notifications
//! against the stores in [`AppState`].
//!
//! Every trigger takes the state lock only between remote calls, never across
//! one, so further triggers can be issued while a call is in flight. Results
//! are checked against the session and edit epochs captured before the call
//! and dropped when the context they were issued for is gone.

use std::{
    sync::{Arc, Weak},
    time::Duration,
};

use chrono::{DateTime, Utc};
use shared::{
    domain::{Identity, UserId, UserRecord},
    protocol::NewUser,
};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};

use crate::{
    config::ClientSettings,
    edit::{EditMode, EditSession, SubmitDisposition},
    error::{CoordinatorError, UiError, UiErrorContext},
    notification::{created_message, HideTicket, NotificationState, NotificationTimer},
    roster::RosterCache,
    session::SessionStore,
    theme::{Palette, ThemeState},
    Collaborators,
};

const EVENT_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    SessionChanged(Option<Identity>),
    RosterUpdated {
        records: Vec<UserRecord>,
        generation: u64,
    },
    EditTargetChanged(Option<UserRecord>),
    NotificationChanged(NotificationState),
    ThemeChanged {
        dark: bool,
        palette: Palette,
    },
    Failure(UiError),
}

#[derive(Debug, Default)]
pub(crate) struct AppState {
    session: SessionStore,
    roster: RosterCache,
    edit: EditSession,
    notification: NotificationTimer,
    theme: ThemeState,
    last_failure: Option<UiError>,
}

/// Point-in-time copy of every store, for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct AppSnapshot {
    pub identity: Option<Identity>,
    pub signed_in_at: Option<DateTime<Utc>>,
    pub roster: Vec<UserRecord>,
    pub roster_loaded: bool,
    pub generation: u64,
    pub edit_mode: EditMode,
    pub edit_target: Option<UserRecord>,
    pub edit_error: Option<String>,
    pub submitting: bool,
    pub notification: NotificationState,
    pub theme: ThemeState,
    pub last_failure: Option<UiError>,
}

pub struct Coordinator {
    services: Collaborators,
    state: Arc<Mutex<AppState>>,
    events: broadcast::Sender<ClientEvent>,
    notification_delay: Duration,
}

impl Coordinator {
    pub fn new(services: Collaborators, settings: &ClientSettings) -> Self {
        Self::new_with_delay(services, settings.notification_delay())
    }

    pub fn new_with_delay(services: Collaborators, notification_delay: Duration) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            services,
            state: Arc::new(Mutex::new(AppState::default())),
            events,
            notification_delay,
        }
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ClientEvent> {
        self.events.subscribe()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.lock().await.session.is_authenticated()
    }

    pub async fn snapshot(&self) -> AppSnapshot {
        let state = self.state.lock().await;
        AppSnapshot {
            identity: state.session.identity().cloned(),
            signed_in_at: state.session.authenticated_at(),
            roster: state.roster.records().to_vec(),
            roster_loaded: state.roster.is_loaded(),
            generation: state.roster.generation(),
            edit_mode: state.edit.mode(),
            edit_target: state.edit.target().cloned(),
            edit_error: state.edit.last_error().map(str::to_string),
            submitting: state
                .edit
                .target()
                .is_some_and(|target| state.edit.is_submitting(&target.id)),
            notification: state.notification.state().clone(),
            theme: state.theme,
            last_failure: state.last_failure.clone(),
        }
    }

    /// Looks up a cached roster entry, e.g. to open it for editing.
    pub async fn record(&self, id: &UserId) -> Option<UserRecord> {
        self.state.lock().await.roster.get(id).cloned()
    }

    /// Signs in and, on the transition to authenticated, loads the roster.
    /// A failed initial fetch is reported but does not fail the login.
    pub async fn on_login(&self, email: &str, password: &str) -> Result<Identity, CoordinatorError> {
        if self.is_authenticated().await {
            return Err(self
                .fail(UiErrorContext::Login, CoordinatorError::AlreadyAuthenticated)
                .await);
        }

        let identity = match self.services.auth.authenticate(email, password).await {
            Ok(identity) => identity,
            Err(err) => {
                warn!(%email, error = %err, "login failed");
                return Err(self.fail(UiErrorContext::Login, err.into()).await);
            }
        };

        {
            let mut state = self.state.lock().await;
            if !state.session.establish(identity.clone()) {
                // another login completed while this one was in flight
                let err = CoordinatorError::AlreadyAuthenticated;
                return Err(self.record_failure(&mut state, UiErrorContext::Login, err));
            }
            state.last_failure = None;
        }
        info!(name = %identity.name, "login succeeded");
        self.emit(ClientEvent::SessionChanged(Some(identity.clone())));

        let _ = self.refresh_roster().await;
        Ok(identity)
    }

    /// Drops the session and everything scoped to it. In-flight results for
    /// the old session are discarded when they land.
    pub async fn on_logout(&self) {
        let mut state = self.state.lock().await;
        let Some(identity) = state.session.clear() else {
            return;
        };
        state.roster.clear();
        state.edit.reset();
        state.last_failure = None;
        let generation = state.roster.generation();
        drop(state);

        info!(name = %identity.name, "logged out");
        self.emit(ClientEvent::SessionChanged(None));
        self.emit(ClientEvent::EditTargetChanged(None));
        self.emit(ClientEvent::RosterUpdated {
            records: Vec::new(),
            generation,
        });
    }

    /// Fetches the full roster and replaces the cache with it. On failure the
    /// previous roster stays in place.
    pub async fn refresh_roster(&self) -> Result<(), CoordinatorError> {
        let epoch = {
            let mut state = self.state.lock().await;
            if !state.session.is_authenticated() {
                let err = CoordinatorError::NotAuthenticated;
                return Err(self.record_failure(&mut state, UiErrorContext::Refresh, err));
            }
            state.session.epoch()
        };

        let result = self.services.roster.list_users().await;

        let mut state = self.state.lock().await;
        if state.session.epoch() != epoch {
            warn!("roster: discarding fetch issued for a previous session");
            return Ok(());
        }
        match result {
            Ok(records) => {
                let dropped = state.roster.replace(records);
                let event = ClientEvent::RosterUpdated {
                    records: state.roster.records().to_vec(),
                    generation: state.roster.generation(),
                };
                drop(state);
                info!(dropped, "roster: refreshed");
                self.emit(event);
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "roster: refresh failed; keeping previous list");
                Err(self.record_failure(&mut state, UiErrorContext::Refresh, err.into()))
            }
        }
    }

    /// Records a creation the service already acknowledged: bumps the
    /// generation, shows the banner and refetches. Returns the new generation.
    pub async fn on_create(&self, record: UserRecord) -> Result<u64, CoordinatorError> {
        let (generation, notification) = {
            let mut state = self.state.lock().await;
            if !state.session.is_authenticated() {
                let err = CoordinatorError::NotAuthenticated;
                return Err(self.record_failure(&mut state, UiErrorContext::Create, err));
            }
            let generation = state.roster.record_created();
            let ticket = state.notification.show(created_message(&record.name));
            self.schedule_hide(&mut state, ticket);
            (generation, state.notification.state().clone())
        };
        info!(user_id = %record.id, generation, "user created");
        self.emit(ClientEvent::NotificationChanged(notification));

        // a generation change always triggers exactly one refetch
        let _ = self.refresh_roster().await;
        Ok(generation)
    }

    /// Posts `draft` to the create service, then proceeds as [`Self::on_create`]
    /// with the record the service returned.
    pub async fn on_create_draft(&self, draft: NewUser) -> Result<UserRecord, CoordinatorError> {
        if !self.is_authenticated().await {
            return Err(self
                .fail(UiErrorContext::Create, CoordinatorError::NotAuthenticated)
                .await);
        }

        let record = match self.services.creates.create_user(draft).await {
            Ok(record) => record,
            Err(err) => {
                warn!(error = %err, "create failed");
                return Err(self.fail(UiErrorContext::Create, err.into()).await);
            }
        };
        self.on_create(record.clone()).await?;
        Ok(record)
    }

    pub async fn on_edit_request(&self, record: UserRecord) -> Result<(), CoordinatorError> {
        {
            let mut state = self.state.lock().await;
            if !state.session.is_authenticated() {
                let err = CoordinatorError::NotAuthenticated;
                return Err(self.record_failure(&mut state, UiErrorContext::Edit, err));
            }
            state.edit.begin(&record);
        }
        debug!(user_id = %record.id, "edit: begin");
        self.emit(ClientEvent::EditTargetChanged(Some(record)));
        Ok(())
    }

    /// Sends the edited record to the update service. Success patches the
    /// roster with the canonical copy, closes the edit and refetches; failure
    /// keeps the edit open with the submitted values.
    pub async fn on_edit_submit(&self, record: UserRecord) -> Result<UserRecord, CoordinatorError> {
        let (ticket, session_epoch) = {
            let mut state = self.state.lock().await;
            if !state.session.is_authenticated() {
                let err = CoordinatorError::NotAuthenticated;
                return Err(self.record_failure(&mut state, UiErrorContext::Edit, err));
            }
            match state.edit.start_submit(&record) {
                Ok(ticket) => (ticket, state.session.epoch()),
                Err(err) => return Err(self.record_failure(&mut state, UiErrorContext::Edit, err)),
            }
        };
        debug!(user_id = %ticket.user_id(), "edit: submitting");

        let result = self.services.updates.update_user(record).await;

        let mut state = self.state.lock().await;
        let disposition = state.edit.finish_submit(&ticket, result.as_ref());
        let same_session = state.session.epoch() == session_epoch;

        match (disposition, result) {
            (SubmitDisposition::Current, Ok(canonical)) => {
                let patched = state.roster.apply_update(&canonical);
                let roster_event = ClientEvent::RosterUpdated {
                    records: state.roster.records().to_vec(),
                    generation: state.roster.generation(),
                };
                drop(state);

                info!(user_id = %canonical.id, patched, "edit: update acknowledged");
                if patched {
                    self.emit(roster_event);
                }
                self.emit(ClientEvent::EditTargetChanged(None));
                let _ = self.refresh_roster().await;
                Ok(canonical)
            }
            (SubmitDisposition::Stale, Ok(canonical)) => {
                drop(state);
                warn!(user_id = %canonical.id, "edit: update landed after the edit was closed");
                if same_session {
                    let _ = self.refresh_roster().await;
                }
                Ok(canonical)
            }
            (SubmitDisposition::Current, Err(err)) => {
                warn!(user_id = %ticket.user_id(), error = %err, "edit: update failed");
                Err(self.record_failure(&mut state, UiErrorContext::Edit, err.into()))
            }
            (SubmitDisposition::Stale, Err(err)) => {
                warn!(user_id = %ticket.user_id(), error = %err, "edit: stale update failed");
                Err(err.into())
            }
        }
    }

    pub async fn on_edit_cancel(&self) {
        let cancelled = self.state.lock().await.edit.cancel();
        if let Some(record) = cancelled {
            debug!(user_id = %record.id, "edit: cancelled");
            self.emit(ClientEvent::EditTargetChanged(None));
        }
    }

    pub async fn on_toggle_theme(&self) -> ThemeState {
        let (theme, palette) = {
            let mut state = self.state.lock().await;
            let palette = state.theme.toggle();
            (state.theme, palette)
        };
        self.emit(ClientEvent::ThemeChanged {
            dark: theme.dark,
            palette,
        });
        theme
    }

    pub async fn on_dismiss_notification(&self) {
        let mut state = self.state.lock().await;
        if state.notification.hide() {
            let notification = state.notification.state().clone();
            drop(state);
            self.emit(ClientEvent::NotificationChanged(notification));
        }
    }

    /// Spawns the auto-hide for `ticket`. The task holds only a weak handle to
    /// the state, so it becomes a no-op once the coordinator is gone.
    fn schedule_hide(&self, state: &mut AppState, ticket: HideTicket) {
        let weak: Weak<Mutex<AppState>> = Arc::downgrade(&self.state);
        let events = self.events.clone();
        let delay = self.notification_delay;
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let Some(state) = weak.upgrade() else {
                return;
            };
            let mut state = state.lock().await;
            if state.notification.expire(ticket) {
                let notification = state.notification.state().clone();
                drop(state);
                debug!("notification: auto-hidden");
                let _ = events.send(ClientEvent::NotificationChanged(notification));
            }
        });
        state.notification.arm(ticket, task);
        debug!(?delay, "notification: hide scheduled");
    }

    async fn fail(&self, context: UiErrorContext, err: CoordinatorError) -> CoordinatorError {
        let mut state = self.state.lock().await;
        self.record_failure(&mut state, context, err)
    }

    fn record_failure(
        &self,
        state: &mut AppState,
        context: UiErrorContext,
        err: CoordinatorError,
    ) -> CoordinatorError {
        let ui_error = UiError::from_error(context, &err);
        state.last_failure = Some(ui_error.clone());
        self.emit(ClientEvent::Failure(ui_error));
        err
    }

    fn emit(&self, event: ClientEvent) {
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
#[path = "tests/coordinator_tests.rs"]
mod tests;
