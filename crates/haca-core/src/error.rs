//! Error types for the terminal core
//!
//! Every runtime outcome here is recoverable: the worst a user ever sees is
//! a denial notice or an unrecognized-identifier message. Configuration
//! errors only occur at startup.

use crate::events::{Cue, TerminalEvent};
use crate::messages;
use haca_corpus::Clearance;
use haca_markup::MarkupError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where a login attempt was started
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoginOrigin {
    /// Login prompt shown before any session exists
    Screen,
    /// `LOGIN <id>` typed at the terminal prompt
    Command,
}

/// Runtime outcome the caller renders instead of a normal response
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TerminalError {
    /// Identifier not present in any account tier
    #[error("unrecognized identifier: {identifier}")]
    UnrecognizedIdentifier {
        /// Normalized identifier that was looked up
        identifier: String,
        /// Login path that performed the lookup
        origin: LoginOrigin,
    },

    /// Session clearance below the document's requirement
    #[error("access denied to {document_id}: requires {required}, holding {held}")]
    AccessDenied {
        /// Document id
        document_id: String,
        /// Clearance the document requires
        required: Clearance,
        /// Clearance the session holds
        held: Clearance,
    },

    /// No document with this id
    #[error("document not found: {document_id}")]
    DocumentNotFound {
        /// Id as requested
        document_id: String,
    },

    /// Operation needs a logged-in session
    #[error("no active session")]
    NoActiveSession,

    /// Deferred login outlived the state it was started in: a logout
    /// happened, or a login-prompt ticket lost the race to another login
    #[error("login ticket is no longer valid")]
    StaleLogin,
}

impl TerminalError {
    /// Create an access denial
    #[inline]
    pub fn access_denied(document_id: impl Into<String>, required: Clearance, held: Clearance) -> Self {
        Self::AccessDenied {
            document_id: document_id.into(),
            required,
            held,
        }
    }

    /// Whether the terminal keeps running normally after this outcome
    #[inline]
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::UnrecognizedIdentifier { .. }
            | Self::AccessDenied { .. }
            | Self::DocumentNotFound { .. }
            | Self::NoActiveSession
            | Self::StaleLogin => true,
        }
    }

    /// Whether the user should see anything for this outcome
    ///
    /// Stale logins are dropped silently.
    #[inline]
    #[must_use]
    pub fn should_notify(&self) -> bool {
        !matches!(self, Self::StaleLogin)
    }

    /// Audio cue accompanying the notice, if any
    #[must_use]
    pub fn cue(&self) -> Option<Cue> {
        match self {
            Self::UnrecognizedIdentifier {
                origin: LoginOrigin::Command,
                ..
            } => Some(Cue::Error),
            _ => None,
        }
    }

    /// Event the presentation layer renders for this outcome
    #[must_use]
    pub fn to_event(&self) -> Option<TerminalEvent> {
        match self {
            Self::UnrecognizedIdentifier { identifier, origin } => {
                let text = match origin {
                    LoginOrigin::Screen => messages::INVALID_EMPLOYEE_ID.to_string(),
                    LoginOrigin::Command => messages::unrecognized_user(identifier),
                };
                Some(TerminalEvent::SystemMessage { text })
            }
            Self::AccessDenied {
                document_id,
                required,
                held,
            } => Some(TerminalEvent::AccessDenied {
                document_id: document_id.clone(),
                required: *required,
                held: *held,
            }),
            Self::DocumentNotFound { document_id } => Some(TerminalEvent::SystemMessage {
                text: messages::document_not_found(document_id),
            }),
            Self::NoActiveSession => Some(TerminalEvent::SystemMessage {
                text: messages::NOT_LOGGED_IN.to_string(),
            }),
            Self::StaleLogin => None,
        }
    }

    /// Notice event followed by the cue, ready to append to a transcript
    #[must_use]
    pub fn to_events(&self) -> Vec<TerminalEvent> {
        self.to_event()
            .into_iter()
            .chain(self.cue().map(TerminalEvent::Cue))
            .collect()
    }
}

/// Configuration loading and validation errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file unreadable
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        /// File path
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// TOML syntax or type error
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Probability outside `[0, 1]`
    #[error("{field} must be within [0, 1], got {value}")]
    ChanceOutOfRange {
        /// Offending field
        field: &'static str,
        /// Configured value
        value: f64,
    },

    /// Disturbance thresholds not strictly ascending
    #[error("thresholds must ascend: mild {mild} < moderate {moderate} < severe {severe}")]
    ThresholdsNotAscending {
        /// Mild threshold
        mild: u32,
        /// Moderate threshold
        moderate: u32,
        /// Severe threshold
        severe: u32,
    },

    /// Tick or flash duration of zero
    #[error("{field} must be greater than zero")]
    ZeroInterval {
        /// Offending field
        field: &'static str,
    },

    /// Keyword list rejected by the markup transformer
    #[error("markup keywords: {0}")]
    Markup(#[from] MarkupError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_runtime_error_is_recoverable() {
        let errors = [
            TerminalError::UnrecognizedIdentifier {
                identifier: "X".into(),
                origin: LoginOrigin::Screen,
            },
            TerminalError::access_denied("LAB-004", Clearance::new(4), Clearance::new(1)),
            TerminalError::DocumentNotFound { document_id: "NOPE".into() },
            TerminalError::NoActiveSession,
            TerminalError::StaleLogin,
        ];
        assert!(errors.iter().all(TerminalError::is_recoverable));
    }

    #[test]
    fn command_miss_plays_error_cue() {
        let err = TerminalError::UnrecognizedIdentifier {
            identifier: "GHOST".into(),
            origin: LoginOrigin::Command,
        };
        let events = err.to_events();

        assert_eq!(events.len(), 2);
        assert!(matches!(&events[0], TerminalEvent::SystemMessage { text } if text.contains("[GHOST]")));
        assert_eq!(events[1], TerminalEvent::Cue(Cue::Error));
    }

    #[test]
    fn screen_miss_is_silent_apart_from_message() {
        let err = TerminalError::UnrecognizedIdentifier {
            identifier: "GHOST".into(),
            origin: LoginOrigin::Screen,
        };
        assert_eq!(
            err.to_events(),
            vec![TerminalEvent::SystemMessage {
                text: messages::INVALID_EMPLOYEE_ID.to_string()
            }]
        );
    }

    #[test]
    fn access_denied_maps_to_dedicated_event() {
        let err = TerminalError::access_denied("LAB-004", Clearance::new(4), Clearance::new(2));
        assert_eq!(
            err.to_event(),
            Some(TerminalEvent::AccessDenied {
                document_id: "LAB-004".into(),
                required: Clearance::new(4),
                held: Clearance::new(2),
            })
        );
        assert_eq!(err.to_string(), "access denied to LAB-004: requires SCL-4, holding SCL-2");
    }

    #[test]
    fn stale_login_is_not_shown() {
        assert!(!TerminalError::StaleLogin.should_notify());
        assert!(TerminalError::StaleLogin.to_events().is_empty());
    }
}
