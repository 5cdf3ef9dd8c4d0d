//! Terminal command grammar
//!
//! Tested before any input is treated as a search query.

use serde::{Deserialize, Serialize};

const LOGIN_PREFIX: &str = "LOGIN ";

/// Parsed terminal input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    /// `LOGIN <identifier>`; identifier uppercased and trimmed
    Login(String),
    /// `LOGOUT` or `EXIT`
    Logout,
    /// `HELP`
    Help,
    /// Anything else; the trimmed input with its original casing
    Query(String),
}

impl Command {
    /// Classify raw input
    ///
    /// Returns `None` for blank input, which callers treat as a no-op.
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return None;
        }

        let upper = trimmed.to_uppercase();
        if let Some(identifier) = upper.strip_prefix(LOGIN_PREFIX) {
            return Some(Command::Login(identifier.trim().to_string()));
        }
        let command = match upper.as_str() {
            "LOGOUT" | "EXIT" => Command::Logout,
            "HELP" => Command::Help,
            _ => Command::Query(trimmed.to_string()),
        };
        Some(command)
    }
}
