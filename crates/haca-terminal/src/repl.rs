//! Interactive read-eval-print loop
//!
//! Reads stdin line by line and owns every timer the core leaves to its
//! caller: deferred login completion, the infection banner, the tutorial,
//! keyword follow-ups and the disturbance ticks.

use crate::render;
use anyhow::{Context, Result};
use haca_core::{
    InfectionBanner, LoginOrigin, PendingLogin, Response, Terminal, TerminalError, TerminalEvent,
    TickKind,
};
use haca_corpus::DocumentSummary;
use rand::rngs::StdRng;
use std::collections::HashMap;
use std::io::Write;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{sleep_until, Instant};

const LOGIN_PROMPT: &str = "EMPLOYEE ID> ";
const SEARCH_PROMPT: &str = "SEARCH> ";

/// Work scheduled for a later instant
#[derive(Debug)]
enum Deferred {
    CompleteLogin(PendingLogin),
    ShowBanner(InfectionBanner),
    ShowTutorial(String),
    FollowKeyword(String),
}

/// Presentation-only input, prefixed with `/`
#[derive(Debug, PartialEq, Eq)]
enum Directive<'a> {
    Open(&'a str),
    Follow(&'a str),
    Back,
    Status,
    Sound,
    Unknown(&'a str),
}

impl<'a> Directive<'a> {
    fn parse(line: &'a str) -> Option<Self> {
        let rest = line.trim().strip_prefix('/')?;
        let (name, arg) = rest
            .split_once(char::is_whitespace)
            .map_or((rest, ""), |(name, arg)| (name, arg.trim()));
        let directive = match name.to_ascii_lowercase().as_str() {
            "open" => Directive::Open(arg),
            "follow" => Directive::Follow(arg),
            "back" => Directive::Back,
            "status" => Directive::Status,
            "sound" => Directive::Sound,
            _ => Directive::Unknown(name),
        };
        Some(directive)
    }
}

/// Next firing instant for each running tick
#[derive(Debug, Default)]
struct TickClock {
    due: HashMap<TickKind, (Duration, Instant)>,
}

impl TickClock {
    /// Match running ticks to `schedule`, starting new ones one period out
    fn sync(&mut self, schedule: &[(TickKind, Duration)], now: Instant) {
        self.due
            .retain(|kind, _| schedule.iter().any(|(scheduled, _)| scheduled == kind));
        for (kind, period) in schedule {
            self.due.entry(*kind).or_insert((*period, now + *period));
        }
    }

    fn next_deadline(&self) -> Option<Instant> {
        self.due.values().map(|(_, at)| *at).min()
    }

    fn take_due(&mut self, now: Instant) -> Vec<TickKind> {
        let mut fired = Vec::new();
        for (kind, (period, at)) in &mut self.due {
            if *at <= now {
                fired.push(*kind);
                *at = now + *period;
            }
        }
        fired
    }
}

struct Repl {
    terminal: Terminal,
    rng: StdRng,
    sound: bool,
    awaiting_login: bool,
    results: Vec<DocumentSummary>,
    keywords: Vec<String>,
    deferred: Vec<(Instant, Deferred)>,
    clock: TickClock,
    dirty: bool,
}

/// Run until stdin closes
pub(crate) async fn run(terminal: Terminal, rng: StdRng) -> Result<()> {
    let mut repl = Repl::new(terminal, rng);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("HACA DEEP ARCHIVE TERMINAL v{}", haca_core::VERSION);
    repl.prompt()?;

    loop {
        let wake = repl.next_wake();
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read stdin")? else {
                    break;
                };
                repl.handle_line(&line);
                repl.dirty = true;
            }
            () = wait_until(wake) => repl.fire_due(Instant::now()),
        }
        repl.clock.sync(&repl.terminal.schedule(), Instant::now());
        if std::mem::take(&mut repl.dirty) {
            repl.prompt()?;
        }
    }

    tracing::info!("Input closed; leaving terminal");
    Ok(())
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(at) => sleep_until(at).await,
        None => std::future::pending::<()>().await,
    }
}

impl Repl {
    fn new(terminal: Terminal, rng: StdRng) -> Self {
        Self {
            terminal,
            rng,
            sound: true,
            awaiting_login: false,
            results: Vec::new(),
            keywords: Vec::new(),
            deferred: Vec::new(),
            clock: TickClock::default(),
            dirty: false,
        }
    }

    fn prompt(&self) -> Result<()> {
        if self.awaiting_login {
            return Ok(());
        }
        let prompt = if self.terminal.is_logged_in() {
            SEARCH_PROMPT
        } else {
            LOGIN_PROMPT
        };
        let mut stdout = std::io::stdout();
        write!(stdout, "{prompt}").context("failed to write prompt")?;
        stdout.flush().context("failed to flush stdout")
    }

    fn next_wake(&self) -> Option<Instant> {
        let deferred = self.deferred.iter().map(|(at, _)| *at).min();
        match (deferred, self.clock.next_deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    fn emit(&mut self, text: &str) {
        println!("{text}");
        self.dirty = true;
    }

    fn defer(&mut self, delay: Duration, work: Deferred) {
        self.deferred.push((Instant::now() + delay, work));
    }

    fn handle_line(&mut self, line: &str) {
        if self.awaiting_login {
            return;
        }
        if !self.terminal.is_logged_in() {
            let response = self.terminal.begin_login(line);
            self.apply(response);
            return;
        }
        match Directive::parse(line) {
            Some(directive) => self.handle_directive(directive),
            None => {
                let outcome = self.terminal.submit(line);
                self.settle(outcome);
            }
        }
    }

    fn handle_directive(&mut self, directive: Directive<'_>) {
        match directive {
            Directive::Open(target) => {
                let id = match target.parse::<usize>() {
                    Ok(n) => {
                        let listed = n
                            .checked_sub(1)
                            .and_then(|idx| self.results.get(idx))
                            .map(|summary| summary.id.clone());
                        let Some(id) = listed else {
                            self.emit(&format!("> NO RESULT #{n}."));
                            return;
                        };
                        id
                    }
                    Err(_) => target.to_string(),
                };
                let outcome = self.terminal.open_document(&id, &mut self.rng);
                self.settle(outcome);
            }
            Directive::Follow(target) => {
                let keyword = target
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .and_then(|idx| self.keywords.get(idx))
                    .cloned();
                match keyword {
                    Some(keyword) => {
                        let delay = self.terminal.config().timing.keyword_follow_delay();
                        self.defer(delay, Deferred::FollowKeyword(keyword));
                    }
                    None => self.emit(&format!("> NO KEYWORD #{target}.")),
                }
            }
            Directive::Back => {
                self.keywords.clear();
                self.emit("> RETURNED TO SEARCH.");
            }
            Directive::Status => {
                let status = self.terminal.session().map(render::render_status);
                if let Some(status) = status {
                    self.emit(&status);
                }
            }
            Directive::Sound => {
                self.sound = !self.sound;
                let state = if self.sound { "ON" } else { "OFF" };
                self.emit(&format!("> SOUND: {state}"));
            }
            Directive::Unknown(name) => self.emit(&format!("> UNKNOWN DIRECTIVE /{name}.")),
        }
    }

    fn settle(&mut self, outcome: Result<Response, TerminalError>) {
        match outcome {
            Ok(response) => self.apply(response),
            Err(err) => {
                tracing::debug!(error = %err, recoverable = err.is_recoverable(), "Terminal outcome");
                if err.should_notify() {
                    self.apply(Response {
                        events: err.to_events(),
                        pending: None,
                    });
                }
            }
        }
    }

    fn apply(&mut self, response: Response) {
        if let Some(pending) = response.pending {
            let delay = self.terminal.config().timing.login_delay();
            if pending.origin() == LoginOrigin::Screen {
                self.awaiting_login = true;
            }
            self.defer(delay, Deferred::CompleteLogin(pending));
        }

        let timing = self.terminal.config().timing;
        let banner_delay = Duration::from_millis(self.terminal.config().escalation.banner_delay_ms);
        for event in &response.events {
            match event {
                TerminalEvent::SearchResults(results) => {
                    self.results.clone_from(&results.results);
                }
                TerminalEvent::DocumentOpened(document) => {
                    self.keywords = document.body.keywords().into_iter().map(str::to_string).collect();
                }
                TerminalEvent::InfectedAccountActivated { banner } => {
                    self.defer(banner_delay, Deferred::ShowBanner(banner.clone()));
                }
                TerminalEvent::ShowTutorial { text } => {
                    self.defer(timing.tutorial_delay(), Deferred::ShowTutorial(text.clone()));
                }
                TerminalEvent::SessionTerminated => {
                    self.results.clear();
                    self.keywords.clear();
                    self.deferred
                        .retain(|(_, work)| matches!(work, Deferred::CompleteLogin(_)));
                }
                _ => {}
            }
            if let Some(text) = render::render_event(event, self.sound) {
                self.emit(&text);
            }
        }
    }

    fn fire_due(&mut self, now: Instant) {
        let (due, later): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.deferred).into_iter().partition(|(at, _)| *at <= now);
        self.deferred = later;

        for (_, work) in due {
            match work {
                Deferred::CompleteLogin(pending) => {
                    if pending.origin() == LoginOrigin::Screen {
                        self.awaiting_login = false;
                    }
                    let outcome = self.terminal.complete_login(pending);
                    self.settle(outcome);
                }
                Deferred::ShowBanner(banner) => self.emit(&render::render_banner(&banner)),
                Deferred::ShowTutorial(text) => self.emit(&text),
                Deferred::FollowKeyword(keyword) => {
                    let outcome = self.terminal.follow_keyword(&keyword);
                    self.settle(outcome);
                }
            }
        }

        for kind in self.clock.take_due(now) {
            if let Some(overlay) = self.terminal.tick(kind, &mut self.rng) {
                self.emit(&render::render_overlay(&overlay));
            }
        }
    }
}
