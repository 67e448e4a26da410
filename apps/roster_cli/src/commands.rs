//! Text commands typed at the prompt, mapped to controller intents.

use shared::domain::{DraftField, UnknownFieldError};
use thiserror::Error;

pub const HELP: &str = "\
commands:
  set <name|surname|dob|course> <value>   edit the registration form
  submit                                   register the student
  next | prev                              change page
  reload                                   fetch the current page again
  show                                     print the current view
  help                                     this text
  quit                                     exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    SetField { field: DraftField, value: String },
    Submit,
    NextPage,
    PreviousPage,
    Reload,
    Show,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command '{0}' (type 'help')")]
    Unknown(String),
    #[error("usage: set <name|surname|dob|course> <value>")]
    MissingField,
    #[error(transparent)]
    Field(#[from] UnknownFieldError),
}

pub fn parse_intent(line: &str) -> Result<Intent, CommandError> {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    match verb.to_ascii_lowercase().as_str() {
        "" => Err(CommandError::Empty),
        "set" => {
            let (field, value) = match rest.split_once(char::is_whitespace) {
                Some((field, value)) => (field, value.trim()),
                None => (rest, ""),
            };
            if field.is_empty() {
                return Err(CommandError::MissingField);
            }
            Ok(Intent::SetField {
                field: field.parse()?,
                value: value.to_string(),
            })
        }
        "submit" => Ok(Intent::Submit),
        "next" | "n" => Ok(Intent::NextPage),
        "prev" | "previous" | "p" => Ok(Intent::PreviousPage),
        "reload" => Ok(Intent::Reload),
        "show" | "ls" => Ok(Intent::Show),
        "help" | "?" => Ok(Intent::Help),
        "quit" | "exit" | "q" => Ok(Intent::Quit),
        other => Err(CommandError::Unknown(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_keeps_spaces_in_value() {
        assert_eq!(
            parse_intent("set course  Computer Science ").expect("intent"),
            Intent::SetField {
                field: DraftField::Course,
                value: "Computer Science".to_string(),
            }
        );
    }

    #[test]
    fn set_without_value_clears_field() {
        assert_eq!(
            parse_intent("set dob").expect("intent"),
            Intent::SetField {
                field: DraftField::Dob,
                value: String::new(),
            }
        );
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(parse_intent("   "), Err(CommandError::Empty));
        assert_eq!(parse_intent("set"), Err(CommandError::MissingField));
        assert!(matches!(
            parse_intent("set email a@b.c"),
            Err(CommandError::Field(_))
        ));
        assert_eq!(
            parse_intent("delete 3"),
            Err(CommandError::Unknown("delete".to_string()))
        );
    }

    #[test]
    fn navigation_aliases() {
        assert_eq!(parse_intent("N"), Ok(Intent::NextPage));
        assert_eq!(parse_intent("previous"), Ok(Intent::PreviousPage));
        assert_eq!(parse_intent("q"), Ok(Intent::Quit));
    }
}
