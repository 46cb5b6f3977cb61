//! Typed commands parsed from the prompt line.

use shared::{domain::UserId, protocol::NewUser};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Show,
    Refresh,
    Create(NewUser),
    Edit(UserId),
    Set { field: String, value: String },
    Save,
    Cancel,
    Theme,
    Dismiss,
    Logout,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty command")]
    Empty,
    #[error("unknown command '{0}'; type 'help'")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("age must be a whole number, got '{0}'")]
    InvalidAge(String),
}

pub const HELP: &str = "\
commands:
  users                      show the roster
  refresh                    refetch the roster
  new <name> <age> <email>   create a user
  edit <id>                  open a user for editing
  set <field> <value>        change name, age or email of the open edit
  save                       submit the open edit
  cancel                     discard the open edit
  theme                      toggle light/dark
  dismiss                    hide the notification
  logout | quit";

pub fn parse(line: &str) -> Result<Command, ParseError> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Err(ParseError::Empty);
    };
    let rest: Vec<&str> = words.collect();

    match verb {
        "users" | "ls" => Ok(Command::Show),
        "refresh" => Ok(Command::Refresh),
        "new" => match rest.as_slice() {
            [name, age, email] => Ok(Command::Create(NewUser {
                name: (*name).to_string(),
                age: age
                    .parse()
                    .map_err(|_| ParseError::InvalidAge((*age).to_string()))?,
                email: (*email).to_string(),
            })),
            _ => Err(ParseError::Usage("new <name> <age> <email>")),
        },
        "edit" => match rest.as_slice() {
            [id] => Ok(Command::Edit(UserId::new(*id))),
            _ => Err(ParseError::Usage("edit <id>")),
        },
        "set" => match rest.as_slice() {
            [field, value @ ..] if !value.is_empty() => Ok(Command::Set {
                field: (*field).to_string(),
                value: value.join(" "),
            }),
            _ => Err(ParseError::Usage("set <field> <value>")),
        },
        "save" => Ok(Command::Save),
        "cancel" => Ok(Command::Cancel),
        "theme" => Ok(Command::Theme),
        "dismiss" => Ok(Command::Dismiss),
        "logout" => Ok(Command::Logout),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        other => Err(ParseError::Unknown(other.to_string())),
    }
}

#[cfg(test)]
#[path = "tests/commands_tests.rs"]
mod tests;
