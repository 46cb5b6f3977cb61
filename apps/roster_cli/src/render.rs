//! Plain-text rendering of coordinator state and events.

use std::fmt::Write as _;

use roster_core::{AppSnapshot, ClientEvent, EditMode};
use shared::domain::UserRecord;

pub fn render_snapshot(snapshot: &AppSnapshot) -> String {
    let mut out = String::new();
    if snapshot.notification.visible {
        let _ = writeln!(out, "* {}", snapshot.notification.message);
    }
    let _ = writeln!(out, "[{}]", snapshot.theme.toggle_label());

    let Some(identity) = &snapshot.identity else {
        out.push_str("not signed in\n");
        return out;
    };

    match (snapshot.edit_mode, &snapshot.edit_target) {
        (EditMode::Editing, Some(target)) => {
            out.push_str(&render_edit_form(target));
            if snapshot.submitting {
                out.push_str("  (saving...)\n");
            }
            if let Some(err) = &snapshot.edit_error {
                let _ = writeln!(out, "  ! {err}");
            }
        }
        _ => {
            let _ = writeln!(out, "Welcome, {}!", identity.name);
            if let Some(at) = snapshot.signed_in_at {
                let _ = writeln!(out, "signed in at {}", at.format("%Y-%m-%d %H:%M UTC"));
            }
            out.push_str(&render_roster(&snapshot.roster));
            let _ = writeln!(out, "New users: {}", snapshot.generation);
        }
    }
    out
}

pub fn render_roster(records: &[UserRecord]) -> String {
    if records.is_empty() {
        return "  (no users)\n".to_string();
    }
    let mut out = String::new();
    for record in records {
        let _ = writeln!(
            out,
            "  {:<26} {:<20} age {:<4} {}",
            record.id, record.name, record.age, record.email
        );
    }
    out
}

pub fn render_edit_form(record: &UserRecord) -> String {
    format!(
        "Edit User {}\n  name:  {}\n  age:   {}\n  email: {}\n",
        record.id, record.name, record.age, record.email
    )
}

/// One-line-or-block rendering of an event; `None` for events the prompt
/// does not echo.
pub fn render_event(event: &ClientEvent) -> Option<String> {
    match event {
        ClientEvent::SessionChanged(Some(identity)) => {
            Some(format!("signed in as {} <{}>", identity.name, identity.email))
        }
        ClientEvent::SessionChanged(None) => Some("signed out".to_string()),
        ClientEvent::RosterUpdated { records, .. } => Some(render_roster(records)),
        ClientEvent::EditTargetChanged(Some(record)) => Some(render_edit_form(record)),
        ClientEvent::EditTargetChanged(None) => None,
        ClientEvent::NotificationChanged(state) if state.visible => {
            Some(format!("* {}", state.message))
        }
        ClientEvent::NotificationChanged(_) => None,
        ClientEvent::ThemeChanged { dark, palette } => Some(format!(
            "theme: {} (background {}, text {})",
            if *dark { "dark" } else { "light" },
            palette.background,
            palette.foreground
        )),
        ClientEvent::Failure(err) if err.requires_reauth() => Some(format!(
            "! {}\n  (session ended; restart roster_cli to sign in again)",
            err.message()
        )),
        ClientEvent::Failure(err) => Some(format!("! {}", err.message())),
    }
}
