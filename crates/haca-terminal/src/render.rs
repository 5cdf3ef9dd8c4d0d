//! Plain-text rendering of terminal events

use haca_core::{
    messages, Cue, DisturbanceLevel, InfectionBanner, OpenedDocument, Overlay, SearchResults,
    Session, TerminalEvent,
};
use haca_markup::{Fragment, TransformedBody};
use std::fmt::Write as _;

const RULE: &str = "----------------------------------------";

/// Text for one event, or `None` for events the REPL handles itself
pub(crate) fn render_event(event: &TerminalEvent, sound: bool) -> Option<String> {
    let text = match event {
        TerminalEvent::SearchResults(results) => render_results(results),
        TerminalEvent::NoRecordsFound { query } => messages::no_records_found(query),
        TerminalEvent::SystemMessage { text } => text.clone(),
        TerminalEvent::AccessDenied {
            document_id,
            required,
            held,
        } => format!(
            "{}\n[{document_id}] requires {required}; you hold {held}.",
            messages::ACCESS_DENIED_NOTICE
        ),
        TerminalEvent::SessionEstablished { account } => format!(
            "USER: {} | {}",
            account.display_name(),
            account.clearance()
        ),
        TerminalEvent::SessionTerminated => "SESSION TERMINATED.".to_string(),
        TerminalEvent::DisturbanceLevelReached { level } => render_level(*level).to_string(),
        TerminalEvent::DocumentOpened(document) => render_document(document),
        TerminalEvent::Cue(cue) => return render_cue(*cue, sound),
        TerminalEvent::InfectedAccountActivated { .. } | TerminalEvent::ShowTutorial { .. } => {
            return None
        }
    };
    Some(text)
}

pub(crate) fn render_results(results: &SearchResults) -> String {
    let mut out = messages::records_found(results.len());
    for (idx, summary) in results.results.iter().enumerate() {
        let _ = write!(
            out,
            "\n  {}. [{}] {}\n     {} | TYPE: {}",
            idx + 1,
            summary.id,
            summary.title,
            summary.required_clearance,
            summary.document_type
        );
    }
    out.push_str("\n(/open <n> to read)");
    out
}

pub(crate) fn render_document(document: &OpenedDocument) -> String {
    let summary = &document.summary;
    let mut out = format!(
        "{RULE}\n[{}] {}\nTYPE: {} | {}\n{RULE}\n",
        summary.id, summary.title, summary.document_type, summary.required_clearance
    );
    out.push_str(&render_body(&document.body));

    let keywords = document.body.keywords();
    if !keywords.is_empty() {
        let _ = write!(out, "\n{RULE}\nKEYWORDS:");
        for (idx, keyword) in keywords.iter().enumerate() {
            let _ = write!(out, " [{}] {keyword}", idx + 1);
        }
        out.push_str("  (/follow <n>)");
    }
    out
}

pub(crate) fn render_body(body: &TransformedBody) -> String {
    let mut out = String::new();
    for fragment in body.fragments() {
        render_fragment(fragment, &mut out);
    }
    out
}

fn render_fragment(fragment: &Fragment, out: &mut String) {
    match fragment {
        Fragment::Redacted { text } => {
            out.extend(std::iter::repeat('█').take(text.chars().count()));
        }
        Fragment::Keyword { text } => {
            let _ = write!(out, "{{{text}}}");
        }
        Fragment::Warning { children } => {
            out.push_str("⚠ ");
            for child in children {
                render_fragment(child, out);
            }
        }
        other => {
            let _ = write!(out, "{other}");
        }
    }
}

fn render_level(level: DisturbanceLevel) -> &'static str {
    match level {
        DisturbanceLevel::Mild => "(the display tint drifts, just slightly)",
        DisturbanceLevel::Moderate => "(something flickers at the edge of the screen)",
        DisturbanceLevel::Severe => "(the display will not hold still)",
    }
}

fn render_cue(cue: Cue, sound: bool) -> Option<String> {
    if !sound {
        return None;
    }
    let bells = match cue {
        Cue::Success => "\u{7}\u{7}",
        Cue::Error => "\u{7}",
    };
    Some(bells.to_string())
}

pub(crate) fn render_banner(banner: &InfectionBanner) -> String {
    let width = banner
        .lines
        .iter()
        .map(|line| line.chars().count())
        .max()
        .unwrap_or(0);
    let border: String = std::iter::repeat('▓').take(width + 4).collect();
    let mut out = border.clone();
    for line in &banner.lines {
        let _ = write!(out, "\n▓ {line:^width$} ▓");
    }
    out.push('\n');
    out.push_str(&border);
    out
}

pub(crate) fn render_overlay(overlay: &Overlay) -> String {
    format!(">>> {} <<<", overlay.message)
}

pub(crate) fn render_status(session: &Session) -> String {
    let account = session.account();
    let visual = session.escalation().visual_state();
    let levels: Vec<String> = session
        .escalation()
        .active_levels()
        .iter()
        .map(ToString::to_string)
        .collect();
    format!(
        "USER: {} ({})\nCLEARANCE: {}\nSESSION: {} since {}\nDOCUMENTS READ: {}\nEXPOSURE: {} | SANITY: {}\nDISTURBANCE: {}{}\nDISPLAY: hue {}° saturate {:.1} contrast {:.1}",
        account.display_name(),
        account.identifier(),
        session.effective_clearance(),
        session.id(),
        session.established_at().format("%H:%M:%S"),
        session.unlocked_documents().count(),
        session.exposure(),
        session.sanity(),
        if levels.is_empty() { "none".to_string() } else { levels.join(", ") },
        if visual.infected { " + infection" } else { "" },
        visual.hue_rotate_deg,
        visual.saturate,
        visual.contrast,
    )
}
