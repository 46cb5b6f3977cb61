//! The single record open for editing and the submit bookkeeping around it.

use std::collections::HashMap;

use shared::domain::{UserId, UserRecord};
use thiserror::Error;

use crate::error::{CoordinatorError, UpdateError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    Viewing,
    Editing,
}

/// Handed out when a submit starts; presented again when its result lands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitTicket {
    user_id: UserId,
    epoch: u64,
    sequence: u64,
}

impl SubmitTicket {
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitDisposition {
    /// The edit the result belongs to is still open.
    Current,
    /// The edit was cancelled or replaced while the call was in flight.
    Stale,
}

#[derive(Debug, Default)]
pub struct EditSession {
    target: Option<UserRecord>,
    epoch: u64,
    submits: u64,
    /// Outstanding submit per record, keyed to the ticket that owns it.
    in_flight: HashMap<UserId, u64>,
    last_error: Option<String>,
}

impl EditSession {
    pub fn mode(&self) -> EditMode {
        if self.target.is_some() {
            EditMode::Editing
        } else {
            EditMode::Viewing
        }
    }

    pub fn target(&self) -> Option<&UserRecord> {
        self.target.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn is_submitting(&self, id: &UserId) -> bool {
        self.in_flight.contains_key(id)
    }

    /// Opens `record` for editing, replacing any current target.
    pub fn begin(&mut self, record: &UserRecord) {
        self.target = Some(record.clone());
        self.last_error = None;
        self.epoch += 1;
    }

    pub fn cancel(&mut self) -> Option<UserRecord> {
        self.last_error = None;
        self.epoch += 1;
        self.target.take()
    }

    /// Drops the target on sign-out. Submits still on the wire keep their
    /// in-flight marker until they settle.
    pub fn reset(&mut self) {
        self.cancel();
    }

    /// Validates and registers a submit of `record`. The submitted values
    /// become the target so unsaved edits survive a failed call.
    pub fn start_submit(&mut self, record: &UserRecord) -> Result<SubmitTicket, CoordinatorError> {
        let Some(target) = self.target.as_mut() else {
            return Err(CoordinatorError::NotEditing);
        };
        if target.id != record.id {
            return Err(CoordinatorError::EditTargetMismatch {
                submitted: record.id.clone(),
                editing: target.id.clone(),
            });
        }
        if self.in_flight.contains_key(&record.id) {
            return Err(CoordinatorError::SubmitInFlight(record.id.clone()));
        }

        *target = record.clone();
        self.last_error = None;
        self.submits += 1;
        self.in_flight.insert(record.id.clone(), self.submits);
        Ok(SubmitTicket {
            user_id: record.id.clone(),
            epoch: self.epoch,
            sequence: self.submits,
        })
    }

    /// Settles a submit. Success closes the edit; failure keeps it open with
    /// the error attached. Stale results leave the session untouched.
    pub fn finish_submit(
        &mut self,
        ticket: &SubmitTicket,
        outcome: Result<&UserRecord, &UpdateError>,
    ) -> SubmitDisposition {
        if self.in_flight.get(&ticket.user_id) == Some(&ticket.sequence) {
            self.in_flight.remove(&ticket.user_id);
        }
        if ticket.epoch != self.epoch {
            return SubmitDisposition::Stale;
        }

        match outcome {
            Ok(_) => {
                self.target = None;
                self.last_error = None;
                self.epoch += 1;
            }
            Err(err) => {
                self.last_error = Some(err.to_string());
            }
        }
        SubmitDisposition::Current
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("unknown field '{0}'")]
    UnknownField(String),
    #[error("age must be a whole number, got '{0}'")]
    InvalidAge(String),
}

/// Form-side working copy of a record being edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditDraft {
    record: UserRecord,
}

impl EditDraft {
    pub fn record(&self) -> &UserRecord {
        &self.record
    }

    pub fn into_record(self) -> UserRecord {
        self.record
    }

    pub fn set_field(&mut self, field: &str, value: &str) -> Result<(), DraftError> {
        match field {
            "name" => self.record.name = value.to_string(),
            "email" => self.record.email = value.to_string(),
            "age" => {
                self.record.age = value
                    .trim()
                    .parse()
                    .map_err(|_| DraftError::InvalidAge(value.to_string()))?;
            }
            other => return Err(DraftError::UnknownField(other.to_string())),
        }
        Ok(())
    }
}

impl From<UserRecord> for EditDraft {
    fn from(record: UserRecord) -> Self {
        Self { record }
    }
}

#[cfg(test)]
#[path = "tests/edit_tests.rs"]
mod tests;
