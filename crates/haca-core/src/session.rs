//! Login session
//!
//! Exactly one per logged-in terminal. Discarded wholesale on logout; no
//! state survives it.

use crate::config::EscalationConfig;
use crate::escalation::{DisturbanceLevel, Escalation, InfectionBanner};
use chrono::{DateTime, Utc};
use haca_corpus::{Account, Clearance, Document};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sanity with no exposure
pub const MAX_SANITY: u32 = 100;

/// Sanity after `exposure` qualifying opens, floored at zero
#[inline]
#[must_use]
pub fn sanity_for(exposure: u32, decay_per_exposure: u32) -> u32 {
    MAX_SANITY.saturating_sub(exposure.saturating_mul(decay_per_exposure))
}

/// Unique session identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Generate new session ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "session:{}", self.0)
    }
}

/// Active login session
#[derive(Debug, Clone)]
pub struct Session {
    id: SessionId,
    account: Account,
    unlocked: IndexSet<String>,
    exposure: u32,
    escalation: Escalation,
    established_at: DateTime<Utc>,
}

impl Session {
    /// Session bound to `account`
    ///
    /// Infection is not started here; see [`Session::bind_account`].
    #[must_use]
    pub fn new(account: Account, config: EscalationConfig) -> Self {
        Self {
            id: SessionId::new(),
            account,
            unlocked: IndexSet::new(),
            exposure: 0,
            escalation: Escalation::new(config),
            established_at: Utc::now(),
        }
    }

    /// New session that also starts the infection track if `account` is
    /// infected
    #[must_use]
    pub fn start(account: Account, config: EscalationConfig) -> (Self, Option<InfectionBanner>) {
        let infected = account.is_infected();
        let mut session = Self::new(account, config);
        let banner = if infected {
            session.escalation.activate_infection()
        } else {
            None
        };
        (session, banner)
    }

    /// Rebind to another account, keeping exposure and unlocked documents
    ///
    /// Starts the infection track for infected accounts and returns its
    /// banner if this call started it.
    pub fn bind_account(&mut self, account: Account) -> Option<InfectionBanner> {
        let infected = account.is_infected();
        self.account = account;
        if infected {
            self.escalation.activate_infection()
        } else {
            None
        }
    }

    /// Record a successful open of `document`
    ///
    /// The id joins the unlocked set. Opens at or above the escalation's
    /// exposure clearance count every time, re-opens included. Returns
    /// newly activated disturbance levels.
    pub fn record_open(&mut self, document: &Document) -> Vec<DisturbanceLevel> {
        self.unlocked.insert(document.id().to_string());

        if document.required_clearance() < self.escalation.config().exposure_min_clearance {
            return Vec::new();
        }
        self.exposure = self.exposure.saturating_add(1);
        tracing::debug!(
            document = %document.id(),
            exposure = self.exposure,
            sanity = self.sanity(),
            "Exposure recorded"
        );
        self.escalation.observe_exposure(self.exposure)
    }

    /// Session ID
    #[inline]
    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Bound account
    #[inline]
    #[must_use]
    pub fn account(&self) -> &Account {
        &self.account
    }

    /// Clearance used for every access decision; always the bound account's
    #[inline]
    #[must_use]
    pub fn effective_clearance(&self) -> Clearance {
        self.account.clearance()
    }

    /// Whether `document_id` was ever opened in this session
    #[must_use]
    pub fn is_unlocked(&self, document_id: &str) -> bool {
        self.unlocked.contains(&haca_corpus::normalize_key(document_id))
    }

    /// Opened document ids, first-open order
    #[inline]
    pub fn unlocked_documents(&self) -> impl Iterator<Item = &str> {
        self.unlocked.iter().map(String::as_str)
    }

    /// Count of qualifying opens
    #[inline]
    #[must_use]
    pub fn exposure(&self) -> u32 {
        self.exposure
    }

    /// Derived sanity, `0..=100`
    #[inline]
    #[must_use]
    pub fn sanity(&self) -> u32 {
        sanity_for(self.exposure, self.escalation.config().sanity_decay_per_exposure)
    }

    /// Escalation tracks
    #[inline]
    #[must_use]
    pub fn escalation(&self) -> &Escalation {
        &self.escalation
    }

    /// Escalation tracks, for ticking
    #[inline]
    pub fn escalation_mut(&mut self) -> &mut Escalation {
        &mut self.escalation
    }

    /// When the session was created
    #[inline]
    #[must_use]
    pub fn established_at(&self) -> DateTime<Utc> {
        self.established_at
    }
}
