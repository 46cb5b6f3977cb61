//! Maps prompt commands onto coordinator triggers.

use std::{future::Future, sync::Arc};

use roster_core::{Coordinator, CoordinatorError, EditDraft};

use crate::{
    commands::{Command, HELP},
    render::render_snapshot,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Runs a trigger without holding up the prompt. Failures have already been
/// surfaced through the coordinator's event stream.
pub fn dispatch<F, T>(command: &'static str, trigger: F)
where
    F: Future<Output = Result<T, CoordinatorError>> + Send + 'static,
    T: Send + 'static,
{
    tracing::debug!(command, "dispatching trigger");
    tokio::spawn(async move {
        match trigger.await {
            Ok(_) => tracing::debug!(command, "trigger completed"),
            Err(err) => tracing::debug!(command, %err, "trigger failed"),
        }
    });
}

pub struct Prompt {
    coordinator: Arc<Coordinator>,
    draft: Option<EditDraft>,
}

impl Prompt {
    pub fn new(coordinator: Arc<Coordinator>) -> Self {
        Self {
            coordinator,
            draft: None,
        }
    }

    pub async fn handle(&mut self, command: Command) -> Flow {
        match command {
            Command::Quit => return Flow::Exit,
            Command::Help => println!("{HELP}"),
            Command::Show => {
                let snapshot = self.coordinator.snapshot().await;
                print!("{}", render_snapshot(&snapshot));
            }
            Command::Refresh => {
                let coordinator = Arc::clone(&self.coordinator);
                dispatch("refresh", async move { coordinator.refresh_roster().await });
            }
            Command::Create(new_user) => {
                let coordinator = Arc::clone(&self.coordinator);
                dispatch("create", async move { coordinator.on_create_draft(new_user).await });
            }
            Command::Edit(id) => {
                match self.coordinator.record(&id).await {
                    Some(record) => {
                        if self.coordinator.on_edit_request(record.clone()).await.is_ok() {
                            self.draft = Some(EditDraft::from(record));
                        }
                    }
                    None => println!("no user with id {id}"),
                }
            }
            Command::Set { field, value } => {
                self.sync_draft().await;
                match self.draft.as_mut() {
                    Some(draft) => {
                        if let Err(err) = draft.set_field(&field, &value) {
                            println!("{err}");
                        }
                    }
                    None => println!("nothing is being edited; use 'edit <id>'"),
                }
            }
            Command::Save => {
                self.sync_draft().await;
                match self.draft.clone() {
                    Some(draft) => {
                        let coordinator = Arc::clone(&self.coordinator);
                        let record = draft.into_record();
                        dispatch("save", async move { coordinator.on_edit_submit(record).await });
                    }
                    None => println!("nothing is being edited; use 'edit <id>'"),
                }
            }
            Command::Cancel => {
                self.draft = None;
                self.coordinator.on_edit_cancel().await;
            }
            Command::Theme => {
                self.coordinator.on_toggle_theme().await;
            }
            Command::Dismiss => self.coordinator.on_dismiss_notification().await,
            Command::Logout => {
                self.coordinator.on_logout().await;
                return Flow::Exit;
            }
        }
        Flow::Continue
    }

    /// Drops the local draft once the coordinator has closed its edit.
    async fn sync_draft(&mut self) {
        let target = self.coordinator.snapshot().await.edit_target;
        let still_open = match (&self.draft, &target) {
            (Some(draft), Some(target)) => draft.record().id == target.id,
            _ => false,
        };
        if !still_open {
            self.draft = None;
        }
    }
}
