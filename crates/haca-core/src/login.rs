//! Account switching and deferred logins
//!
//! Logins are two-phase: the caller gets a [`PendingLogin`] immediately
//! and hands it back after its own delay. Tickets carry the session epoch
//! they were issued in, so a logout in between makes them stale.

use crate::config::EscalationConfig;
use crate::error::{LoginOrigin, TerminalError};
use crate::escalation::InfectionBanner;
use crate::session::Session;
use haca_corpus::{normalize_key, Account, Corpus};
use serde::{Deserialize, Serialize};

/// Login awaiting completion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[must_use = "a pending login does nothing until completed"]
pub struct PendingLogin {
    identifier: String,
    origin: LoginOrigin,
    epoch: u64,
}

impl PendingLogin {
    pub(crate) fn new(identifier: impl Into<String>, origin: LoginOrigin, epoch: u64) -> Self {
        Self {
            identifier: identifier.into(),
            origin,
            epoch,
        }
    }

    /// Normalized identifier to look up
    #[inline]
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Login path that issued this ticket
    #[inline]
    #[must_use]
    pub fn origin(&self) -> LoginOrigin {
        self.origin
    }

    /// Session epoch at issue time
    #[inline]
    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

/// Outcome of a successful account switch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUpdate {
    /// Newly bound account
    pub account: Account,
    /// No session existed before this switch
    pub created: bool,
    /// Banner if this switch started the infection track
    pub infection: Option<InfectionBanner>,
}

/// Bind `session` to the account named by `identifier`
///
/// Tiers are searched standard, hidden, secret; first match wins. An
/// existing session keeps its exposure and unlocked documents; otherwise a
/// new one is created.
///
/// # Errors
/// [`TerminalError::UnrecognizedIdentifier`] if no tier has the
/// identifier. `session` is left untouched.
pub fn switch_account(
    corpus: &Corpus,
    identifier: &str,
    origin: LoginOrigin,
    session: &mut Option<Session>,
    escalation: EscalationConfig,
) -> Result<SessionUpdate, TerminalError> {
    let Some(account) = corpus.find_account(identifier) else {
        let identifier = normalize_key(identifier);
        tracing::warn!(%identifier, ?origin, "Unrecognized identifier");
        return Err(TerminalError::UnrecognizedIdentifier { identifier, origin });
    };

    let account = account.clone();
    let (created, infection) = match session {
        Some(current) => {
            let previous = current.account().identifier().to_string();
            let infection = current.bind_account(account.clone());
            tracing::info!(
                session = %current.id(),
                from = %previous,
                identifier = %account.identifier(),
                clearance = %account.clearance(),
                "Account switched"
            );
            (false, infection)
        }
        None => {
            let (fresh, infection) = Session::start(account.clone(), escalation);
            tracing::info!(
                session = %fresh.id(),
                identifier = %account.identifier(),
                clearance = %account.clearance(),
                tier = %account.tier(),
                "Session established"
            );
            *session = Some(fresh);
            (true, infection)
        }
    };

    Ok(SessionUpdate {
        account,
        created,
        infection,
    })
}
