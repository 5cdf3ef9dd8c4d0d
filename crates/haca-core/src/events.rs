//! Events emitted for the presentation layer

use crate::escalation::{DisturbanceLevel, InfectionBanner};
use crate::login::PendingLogin;
use crate::search::SearchResults;
use haca_corpus::{Account, Clearance, DocumentSummary};
use haca_markup::TransformedBody;
use serde::{Deserialize, Serialize};

/// Audio cue hint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cue {
    /// Login completed
    Success,
    /// Command login rejected
    Error,
}

/// Opened document, ready to render
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenedDocument {
    /// Header fields
    pub summary: DocumentSummary,
    /// Transformed body
    pub body: TransformedBody,
    /// Sanity after this open
    pub sanity: u32,
    /// Exposure after this open
    pub exposure: u32,
}

/// Something the presentation layer should react to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalEvent {
    /// Non-empty search outcome
    SearchResults(SearchResults),

    /// Search matched nothing
    NoRecordsFound {
        /// Query as entered
        query: String,
    },

    /// Status, help or error text
    SystemMessage {
        /// Message body; may span lines
        text: String,
    },

    /// Blocking denial notice
    AccessDenied {
        /// Document id
        document_id: String,
        /// Required clearance
        required: Clearance,
        /// Held clearance
        held: Clearance,
    },

    /// A session is now bound to `account`
    SessionEstablished {
        /// Bound account
        account: Account,
    },

    /// Session discarded; return to the login prompt
    SessionTerminated,

    /// Infection track started
    InfectedAccountActivated {
        /// Banner to show
        banner: InfectionBanner,
    },

    /// First-login guide
    ShowTutorial {
        /// Guide text
        text: String,
    },

    /// Exposure track level newly active
    DisturbanceLevelReached {
        /// Level
        level: DisturbanceLevel,
    },

    /// Document open succeeded
    DocumentOpened(OpenedDocument),

    /// Audio cue hint
    Cue(Cue),
}

/// Result of one terminal operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    /// Events in emission order
    pub events: Vec<TerminalEvent>,
    /// Deferred login to complete after the configured delay
    pub pending: Option<PendingLogin>,
}

impl Response {
    /// Response with no events
    #[inline]
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Response with a single event
    #[inline]
    #[must_use]
    pub fn event(event: TerminalEvent) -> Self {
        Self {
            events: vec![event],
            pending: None,
        }
    }

    /// Attach a deferred login
    #[inline]
    #[must_use]
    pub fn with_pending(mut self, pending: PendingLogin) -> Self {
        self.pending = Some(pending);
        self
    }

    /// True if nothing happened
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty() && self.pending.is_none()
    }
}
