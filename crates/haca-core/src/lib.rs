//! HACA Core - Archive Terminal Engine
//!
//! The engine behind the archive terminal:
//! - Clearance-gated access control, applied to search and direct opens alike
//! - Case-insensitive document search with a small command grammar in front
//! - Two-phase logins across standard, hidden and secret account tiers
//! - Per-session exposure, sanity and disturbance escalation
//!
//! Rendering, audio and timers belong to the presentation layer. The core
//! turns each discrete input into a list of [`TerminalEvent`]s and exposes
//! pull-based escalation state for the caller's own clock.
//!
//! # Example
//!
//! ```rust
//! use haca_core::{Terminal, TerminalConfig, TerminalEvent};
//! use haca_corpus::{Account, Clearance, Corpus, Document};
//! use rand::{rngs::StdRng, SeedableRng};
//! use std::sync::Arc;
//!
//! let corpus = Corpus::builder()
//!     .account(Account::new("INTERN-01", "Intern", Clearance::new(1)))
//!     .document(Document::new("SYS-001", "Orientation", "GUIDE", Clearance::new(1), "Welcome."))
//!     .build()
//!     .unwrap();
//! let mut terminal = Terminal::new(Arc::new(corpus), TerminalConfig::default()).unwrap();
//!
//! let pending = terminal.begin_login("intern-01").pending.unwrap();
//! terminal.complete_login(pending).unwrap();
//!
//! let response = terminal.submit("SYS-001").unwrap();
//! assert!(matches!(response.events[0], TerminalEvent::SearchResults(_)));
//!
//! let mut rng = StdRng::seed_from_u64(1);
//! let opened = terminal.open_document("SYS-001", &mut rng).unwrap();
//! assert!(matches!(opened.events[0], TerminalEvent::DocumentOpened(_)));
//! ```

#![warn(missing_docs)]

pub mod access;
pub mod command;
pub mod config;
pub mod error;
pub mod escalation;
pub mod events;
pub mod login;
pub mod messages;
pub mod search;
pub mod session;
pub mod terminal;

// Re-exports for convenience
pub use access::{can_access, ensure_access};
pub use command::Command;
pub use config::{EscalationConfig, MarkupConfig, TerminalConfig, TimingConfig, TutorialConfig};
pub use error::{ConfigError, LoginOrigin, TerminalError};
pub use escalation::{
    DisturbanceLevel, Escalation, InfectionBanner, Overlay, TickKind, VisualState,
};
pub use events::{Cue, OpenedDocument, Response, TerminalEvent};
pub use login::{switch_account, PendingLogin, SessionUpdate};
pub use search::{matches_query, search, SearchResults};
pub use session::{sanity_for, Session, SessionId, MAX_SANITY};
pub use terminal::Terminal;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for driving a terminal
    pub use crate::{
        Cue, DisturbanceLevel, PendingLogin, Response, Terminal, TerminalConfig, TerminalError,
        TerminalEvent, TickKind,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
