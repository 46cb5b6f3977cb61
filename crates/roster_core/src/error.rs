//! Failure taxonomy for the coordinator and its collaborators.

use shared::domain::UserId;
use thiserror::Error;

pub const LOGIN_FAILED_MESSAGE: &str = "Login failed. Please check your credentials.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("authentication service unreachable: {0}")]
    Transport(String),
    #[error("authentication rejected: {0}")]
    Rejected(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("roster service unreachable: {0}")]
    Transport(String),
    #[error("roster request rejected: {0}")]
    Rejected(String),
    #[error("malformed roster response: {0}")]
    Decode(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpdateError {
    #[error("update service unreachable: {0}")]
    Transport(String),
    #[error("update rejected: {0}")]
    Rejected(String),
    #[error("malformed update response: {0}")]
    Decode(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CreateError {
    #[error("create service unreachable: {0}")]
    Transport(String),
    #[error("create rejected: {0}")]
    Rejected(String),
    #[error("malformed create response: {0}")]
    Decode(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoordinatorError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Update(#[from] UpdateError),
    #[error(transparent)]
    Create(#[from] CreateError),
    #[error("not signed in")]
    NotAuthenticated,
    #[error("already signed in")]
    AlreadyAuthenticated,
    #[error("no user is being edited")]
    NotEditing,
    #[error("submitted user {submitted} does not match the user being edited ({editing})")]
    EditTargetMismatch { submitted: UserId, editing: UserId },
    #[error("an update for user {0} is already in flight")]
    SubmitInFlight(UserId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Auth,
    Transport,
    Validation,
    Rejected,
    State,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    Login,
    Refresh,
    Create,
    Edit,
}

/// A failure converted into something the presentation surface can show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_error(context: UiErrorContext, err: &CoordinatorError) -> Self {
        let category = categorize(err);
        let message = match (context, err) {
            (UiErrorContext::Login, CoordinatorError::AlreadyAuthenticated) => {
                "Already signed in.".to_string()
            }
            (UiErrorContext::Login, CoordinatorError::Auth(AuthError::Transport(_))) => {
                "Server unreachable; check URL/network and retry sign-in.".to_string()
            }
            (UiErrorContext::Login, _) => LOGIN_FAILED_MESSAGE.to_string(),
            (_, CoordinatorError::NotAuthenticated) => "Please sign in first.".to_string(),
            (UiErrorContext::Refresh, err) => {
                format!("Could not load users ({err}); showing the last known list.")
            }
            (UiErrorContext::Create, err) => format!("Could not create user: {err}"),
            (UiErrorContext::Edit, err) => format!("Could not save changes: {err}"),
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn requires_reauth(&self) -> bool {
        self.category == UiErrorCategory::Auth && self.context != UiErrorContext::Login
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

fn categorize(err: &CoordinatorError) -> UiErrorCategory {
    match err {
        CoordinatorError::Auth(AuthError::Transport(_))
        | CoordinatorError::Fetch(FetchError::Transport(_))
        | CoordinatorError::Update(UpdateError::Transport(_))
        | CoordinatorError::Create(CreateError::Transport(_)) => UiErrorCategory::Transport,
        CoordinatorError::Auth(_) | CoordinatorError::NotAuthenticated => UiErrorCategory::Auth,
        CoordinatorError::Fetch(_) | CoordinatorError::Update(_) | CoordinatorError::Create(_) => {
            UiErrorCategory::Rejected
        }
        CoordinatorError::EditTargetMismatch { .. } => UiErrorCategory::Validation,
        CoordinatorError::AlreadyAuthenticated
        | CoordinatorError::NotEditing
        | CoordinatorError::SubmitInFlight(_) => UiErrorCategory::State,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_credentials_use_fixed_login_message() {
        let err = UiError::from_error(
            UiErrorContext::Login,
            &CoordinatorError::Auth(AuthError::InvalidCredentials),
        );
        assert_eq!(err.message(), LOGIN_FAILED_MESSAGE);
        assert_eq!(err.category(), UiErrorCategory::Auth);
        assert!(!err.requires_reauth());
    }

    #[test]
    fn unreachable_login_is_classified_as_transport() {
        let err = UiError::from_error(
            UiErrorContext::Login,
            &AuthError::Transport("connection refused".into()).into(),
        );
        assert_eq!(err.category(), UiErrorCategory::Transport);
        assert!(err.message().contains("Server unreachable"));
    }

    #[test]
    fn refresh_failure_mentions_stale_list() {
        let err = UiError::from_error(
            UiErrorContext::Refresh,
            &FetchError::Transport("timed out".into()).into(),
        );
        assert!(err.message().contains("last known list"));
        assert!(err.message().contains("timed out"));
    }

    #[test]
    fn unauthenticated_edit_requires_reauth() {
        let err = UiError::from_error(UiErrorContext::Edit, &CoordinatorError::NotAuthenticated);
        assert!(err.requires_reauth());
    }
}
