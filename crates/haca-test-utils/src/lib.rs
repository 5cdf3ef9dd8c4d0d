//! Testing utilities for the HACA workspace
//!
//! Shared fixtures: a small archive corpus, seeded RNGs and terminal setup.

#![allow(missing_docs)]

use haca_core::{Terminal, TerminalConfig};
use haca_corpus::{Account, AccountTier, Clearance, Corpus, Document};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

pub const INTERN: &str = "INTERN-01";
pub const ANALYST: &str = "ANALYST-07";
pub const DIRECTOR: &str = "DIR-THORNE";
pub const ARCHIVIST: &str = "ARCHIVIST";
pub const ECHO: &str = "ECHO";

pub fn sample_accounts() -> Vec<Account> {
    vec![
        Account::new(INTERN, "New Intern", Clearance::new(1)),
        Account::new(ANALYST, "M. Kaelen", Clearance::new(3)),
        Account::new(DIRECTOR, "Director Thorne", Clearance::new(5)),
        Account::new(ARCHIVIST, "The Archivist", Clearance::new(4)).with_tier(AccountTier::Hidden),
        Account::new(ECHO, "Echo", Clearance::new(5))
            .infected()
            .with_tier(AccountTier::Secret),
    ]
}

pub fn sample_documents() -> Vec<Document> {
    vec![
        Document::new(
            "SYS-001",
            "Orientation Guide",
            "GUIDE",
            Clearance::new(1),
            "Welcome to the archive.\nReport anything unusual to Dr. VANCE.",
        )
        .with_keywords(["guide", "orientation"]),
        Document::new(
            "MEMO-014",
            "Cafeteria Schedule Change",
            "MEMO",
            Clearance::new(1),
            "Lunch moves to sector B4. [DATA REDACTED]",
        )
        .with_keywords(["memo"]),
        Document::new(
            "MED-021",
            "Medical File: E. Vance",
            "FILE",
            Clearance::new(2),
            "Patient reports hearing a hum. [DATA CORRUPTED]",
        )
        .with_keywords(["vance", "medical"]),
        Document::new(
            "LAB-003",
            "Resonance Chamber Log",
            "LOG",
            Clearance::new(3),
            "[WARNING do not read aloud]\nThe RESONANCE is stable. [GARBLED]",
        )
        .with_keywords(["resonance", "b4"]),
        Document::new(
            "LAB-004",
            "Containment Breach Report",
            "INCIDENT REPORT",
            Clearance::new(4),
            "Subject MIMIR breached containment.",
        )
        .with_keywords(["mimir", "breach"]),
        Document::new(
            "DIR-005",
            "Director's Private Notes",
            "NOTES",
            Clearance::new(5),
            "THORNE knew. [DATA REDACTED]",
        )
        .with_keywords(["thorne"]),
    ]
}

pub fn sample_corpus() -> Corpus {
    Corpus::builder()
        .accounts(sample_accounts())
        .documents(sample_documents())
        .build()
        .unwrap()
}

pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

pub fn setup_terminal() -> Terminal {
    setup_terminal_with(TerminalConfig::default())
}

pub fn setup_terminal_with(config: TerminalConfig) -> Terminal {
    Terminal::new(Arc::new(sample_corpus()), config).unwrap()
}

/// Log in through the login prompt, returning the completion events
pub fn screen_login(terminal: &mut Terminal, identifier: &str) -> haca_core::Response {
    let pending = terminal.begin_login(identifier).pending.unwrap();
    terminal.complete_login(pending).unwrap()
}

/// Log in with a `LOGIN` command, returning the completion events
pub fn command_login(terminal: &mut Terminal, identifier: &str) -> haca_core::Response {
    let pending = terminal
        .submit(&format!("LOGIN {identifier}"))
        .unwrap()
        .pending
        .unwrap();
    terminal.complete_login(pending).unwrap()
}
