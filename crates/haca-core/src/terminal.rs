//! Terminal facade
//!
//! Owns the optional [`Session`] and wires command parsing, login, search,
//! document opens and escalation together. Every method handles one
//! discrete input and returns the events it produced; nothing here owns a
//! timer.

use crate::access::ensure_access;
use crate::command::Command;
use crate::config::TerminalConfig;
use crate::error::{ConfigError, LoginOrigin, TerminalError};
use crate::escalation::{Overlay, TickKind, VisualState};
use crate::events::{Cue, OpenedDocument, Response, TerminalEvent};
use crate::login::{switch_account, PendingLogin};
use crate::messages;
use crate::search::{search, SearchResults};
use crate::session::Session;
use haca_corpus::{normalize_key, Corpus};
use haca_markup::ContentTransformer;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;

/// Archive terminal state machine
#[derive(Debug)]
pub struct Terminal {
    corpus: Arc<Corpus>,
    config: TerminalConfig,
    transformer: ContentTransformer,
    session: Option<Session>,
    tutorial_pending: bool,
    epoch: u64,
}

impl Terminal {
    /// Terminal over `corpus`
    ///
    /// # Errors
    /// Any [`TerminalConfig::validate`] failure.
    pub fn new(corpus: Arc<Corpus>, config: TerminalConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let transformer = config.markup.transformer()?;
        Ok(Self {
            corpus,
            config,
            transformer,
            session: None,
            tutorial_pending: true,
            epoch: 0,
        })
    }

    /// Handle one line typed at the terminal prompt
    ///
    /// Commands take precedence over search. Blank input yields an empty
    /// response.
    ///
    /// # Errors
    /// [`TerminalError::UnrecognizedIdentifier`] for `LOGIN` misses and
    /// [`TerminalError::NoActiveSession`] for searches while logged out.
    pub fn submit(&mut self, input: &str) -> Result<Response, TerminalError> {
        let Some(command) = Command::parse(input) else {
            return Ok(Response::empty());
        };
        match command {
            Command::Login(identifier) => self.command_login(&identifier),
            Command::Logout => Ok(self.logout()),
            Command::Help => Ok(Response::event(TerminalEvent::SystemMessage {
                text: messages::HELP.to_string(),
            })),
            Command::Query(query) => self.search(&query),
        }
    }

    /// Search for a selected keyword's literal text
    ///
    /// Commands are not interpreted on this path.
    ///
    /// # Errors
    /// [`TerminalError::NoActiveSession`] while logged out.
    pub fn follow_keyword(&self, keyword: &str) -> Result<Response, TerminalError> {
        if keyword.trim().is_empty() {
            return Ok(Response::empty());
        }
        self.search(keyword.trim())
    }

    fn search(&self, query: &str) -> Result<Response, TerminalError> {
        let session = self.session.as_ref().ok_or(TerminalError::NoActiveSession)?;
        let found = search(&self.corpus, query, session);
        let event = if found.is_empty() {
            TerminalEvent::NoRecordsFound {
                query: query.to_string(),
            }
        } else {
            TerminalEvent::SearchResults(SearchResults::new(query, &found))
        };
        Ok(Response::event(event))
    }

    /// Start a login from the login prompt
    ///
    /// The lookup happens in [`Terminal::complete_login`].
    pub fn begin_login(&mut self, identifier: &str) -> Response {
        let identifier = normalize_key(identifier);
        tracing::debug!(%identifier, "Login requested");
        Response::event(TerminalEvent::SystemMessage {
            text: messages::VERIFYING_IDENTITY.to_string(),
        })
        .with_pending(PendingLogin::new(identifier, LoginOrigin::Screen, self.epoch))
    }

    fn command_login(&mut self, identifier: &str) -> Result<Response, TerminalError> {
        let identifier = normalize_key(identifier);
        if self.corpus.find_account(&identifier).is_none() {
            tracing::warn!(%identifier, "Unrecognized identifier");
            return Err(TerminalError::UnrecognizedIdentifier {
                identifier,
                origin: LoginOrigin::Command,
            });
        }
        let text = messages::verifying_user(&identifier);
        Ok(Response::event(TerminalEvent::SystemMessage { text })
            .with_pending(PendingLogin::new(identifier, LoginOrigin::Command, self.epoch)))
    }

    /// Finish a deferred login
    ///
    /// # Errors
    /// [`TerminalError::StaleLogin`] if a logout happened since the ticket
    /// was issued, or if a login-prompt ticket arrives after another login
    /// already established a session. [`TerminalError::UnrecognizedIdentifier`]
    /// on a miss. Errors never change state.
    pub fn complete_login(&mut self, pending: PendingLogin) -> Result<Response, TerminalError> {
        if pending.epoch() != self.epoch {
            tracing::warn!(
                identifier = %pending.identifier(),
                issued = pending.epoch(),
                current = self.epoch,
                "Dropping stale login"
            );
            return Err(TerminalError::StaleLogin);
        }
        if pending.origin() == LoginOrigin::Screen && self.session.is_some() {
            tracing::warn!(
                identifier = %pending.identifier(),
                "Dropping login-prompt ticket; a session is already active"
            );
            return Err(TerminalError::StaleLogin);
        }

        let had_session = self.session.is_some();
        let update = switch_account(
            &self.corpus,
            pending.identifier(),
            pending.origin(),
            &mut self.session,
            self.config.escalation,
        )?;

        let mut events = Vec::with_capacity(5);
        if pending.origin() == LoginOrigin::Command {
            events.push(TerminalEvent::SystemMessage {
                text: messages::login_success(&update.account),
            });
        }
        events.push(TerminalEvent::SessionEstablished {
            account: update.account.clone(),
        });
        if let Some(banner) = update.infection {
            events.push(TerminalEvent::InfectedAccountActivated { banner });
        }
        if !had_session
            && self.tutorial_pending
            && update.account.clearance() == self.config.tutorial.clearance
        {
            self.tutorial_pending = false;
            events.push(TerminalEvent::ShowTutorial {
                text: messages::tutorial(update.account.clearance()),
            });
        }
        if pending.origin() == LoginOrigin::Command {
            events.push(TerminalEvent::Cue(Cue::Success));
        }

        Ok(Response {
            events,
            pending: None,
        })
    }

    /// Discard the session entirely
    ///
    /// Outstanding login tickets become stale. The tutorial latch is kept.
    pub fn logout(&mut self) -> Response {
        if let Some(session) = self.session.take() {
            tracing::info!(
                session = %session.id(),
                identifier = %session.account().identifier(),
                exposure = session.exposure(),
                "Session terminated"
            );
        }
        self.epoch = self.epoch.wrapping_add(1);
        Response::event(TerminalEvent::SessionTerminated)
    }

    /// Open a document by id
    ///
    /// Re-checks access independently of search. On success the document is
    /// unlocked, exposure is counted for qualifying documents, and any newly
    /// reached disturbance levels follow the `DocumentOpened` event.
    ///
    /// # Errors
    /// [`TerminalError::NoActiveSession`], [`TerminalError::DocumentNotFound`]
    /// or [`TerminalError::AccessDenied`]; none mutates state.
    pub fn open_document<R: Rng + ?Sized>(
        &mut self,
        document_id: &str,
        rng: &mut R,
    ) -> Result<Response, TerminalError> {
        let session = self.session.as_mut().ok_or(TerminalError::NoActiveSession)?;
        let document = self.corpus.find_document(document_id).ok_or_else(|| {
            TerminalError::DocumentNotFound {
                document_id: normalize_key(document_id),
            }
        })?;
        ensure_access(document, session)?;

        let body = self.transformer.transform(document.raw_body(), rng);
        let reached = session.record_open(document);
        tracing::info!(
            document = %document.id(),
            exposure = session.exposure(),
            sanity = session.sanity(),
            "Document opened"
        );

        let mut events = Vec::with_capacity(1 + reached.len());
        events.push(TerminalEvent::DocumentOpened(OpenedDocument {
            summary: document.summary(),
            body,
            sanity: session.sanity(),
            exposure: session.exposure(),
        }));
        events.extend(
            reached
                .into_iter()
                .map(|level| TerminalEvent::DisturbanceLevelReached { level }),
        );
        Ok(Response {
            events,
            pending: None,
        })
    }

    /// Advance a disturbance tick; no-op while logged out
    pub fn tick<R: Rng + ?Sized>(&mut self, kind: TickKind, rng: &mut R) -> Option<Overlay> {
        self.session
            .as_mut()
            .and_then(|session| session.escalation_mut().tick(kind, rng))
    }

    /// Ticks currently due
    #[must_use]
    pub fn schedule(&self) -> Vec<(TickKind, Duration)> {
        self.session
            .as_ref()
            .map(|session| session.escalation().schedule())
            .unwrap_or_default()
    }

    /// Continuous visual parameters
    #[must_use]
    pub fn visual_state(&self) -> VisualState {
        self.session
            .as_ref()
            .map(|session| session.escalation().visual_state())
            .unwrap_or_default()
    }

    /// Current session
    #[inline]
    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Whether a session is active
    #[inline]
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.session.is_some()
    }

    /// Whether the first-login guide can still fire
    #[inline]
    #[must_use]
    pub fn tutorial_pending(&self) -> bool {
        self.tutorial_pending
    }

    /// Corpus
    #[inline]
    #[must_use]
    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    /// Configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &TerminalConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use haca_corpus::{Account, Clearance, Document};
    use rand::{rngs::StdRng, SeedableRng};

    fn terminal() -> Terminal {
        let corpus = Corpus::builder()
            .account(Account::new("INTERN-01", "Intern", Clearance::new(1)))
            .account(Account::new("ANALYST-07", "Analyst", Clearance::new(3)))
            .document(Document::new("SYS-001", "Guide", "GUIDE", Clearance::new(1), "Hi"))
            .document(Document::new("LAB-003", "Log", "LOG", Clearance::new(3), "B4"))
            .build()
            .unwrap();
        Terminal::new(Arc::new(corpus), TerminalConfig::default()).unwrap()
    }

    fn login(t: &mut Terminal, id: &str) -> Response {
        let pending = t.begin_login(id).pending.unwrap();
        t.complete_login(pending).unwrap()
    }

    #[test]
    fn blank_input_is_silent() {
        let mut t = terminal();
        assert!(t.submit("   ").unwrap().is_empty());
    }

    #[test]
    fn search_requires_session() {
        let mut t = terminal();
        assert_eq!(t.submit("SYS").unwrap_err(), TerminalError::NoActiveSession);
    }

    #[test]
    fn help_works_logged_out() {
        let mut t = terminal();
        let response = t.submit("help").unwrap();
        assert_eq!(
            response.events,
            vec![TerminalEvent::SystemMessage { text: messages::HELP.into() }]
        );
    }

    #[test]
    fn screen_login_verifies_then_establishes() {
        let mut t = terminal();
        let begun = t.begin_login(" intern-01 ");
        assert_eq!(
            begun.events,
            vec![TerminalEvent::SystemMessage { text: messages::VERIFYING_IDENTITY.into() }]
        );
        let pending = begun.pending.unwrap();
        assert_eq!(pending.identifier(), "INTERN-01");
        assert!(!t.is_logged_in());

        let done = t.complete_login(pending).unwrap();
        assert!(matches!(done.events[0], TerminalEvent::SessionEstablished { .. }));
        assert!(matches!(done.events[1], TerminalEvent::ShowTutorial { .. }));
        assert!(t.is_logged_in());
    }

    #[test]
    fn second_prompt_ticket_cannot_rebind_live_session() {
        let mut t = terminal();
        let first = t.begin_login("INTERN-01").pending.unwrap();
        let second = t.begin_login("ANALYST-07").pending.unwrap();

        t.complete_login(first).unwrap();
        assert_eq!(t.complete_login(second).unwrap_err(), TerminalError::StaleLogin);
        assert_eq!(t.session().unwrap().account().identifier(), "INTERN-01");
    }

    #[test]
    fn opening_denied_document_changes_nothing() {
        let mut t = terminal();
        let _ = login(&mut t, "INTERN-01");
        let mut rng = StdRng::seed_from_u64(0);

        let err = t.open_document("lab-003", &mut rng).unwrap_err();
        assert!(matches!(err, TerminalError::AccessDenied { .. }));
        let session = t.session().unwrap();
        assert_eq!(session.exposure(), 0);
        assert!(!session.is_unlocked("LAB-003"));
    }

    #[test]
    fn unknown_document_is_reported() {
        let mut t = terminal();
        let _ = login(&mut t, "INTERN-01");
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            t.open_document("x-9", &mut rng).unwrap_err(),
            TerminalError::DocumentNotFound { document_id: "X-9".into() }
        );
    }

    #[test]
    fn keyword_follow_does_not_parse_commands() {
        let mut t = terminal();
        let _ = login(&mut t, "INTERN-01");
        let response = t.follow_keyword("LOGOUT").unwrap();
        assert_eq!(
            response.events,
            vec![TerminalEvent::NoRecordsFound { query: "LOGOUT".into() }]
        );
        assert!(t.is_logged_in());
    }

    #[test]
    fn schedule_and_visuals_default_when_logged_out() {
        let mut t = terminal();
        let mut rng = StdRng::seed_from_u64(0);
        assert!(t.schedule().is_empty());
        assert_eq!(t.visual_state(), VisualState::default());
        assert!(t.tick(TickKind::ColorCycle, &mut rng).is_none());
    }
}
