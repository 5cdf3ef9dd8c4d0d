//! Canned terminal text

use haca_corpus::{Account, Clearance};

/// Response to `HELP`
pub const HELP: &str = "AVAILABLE COMMANDS:\n - SEARCH [keyword/document id]\n - LOGIN [employee id]\n - LOGOUT";

/// Shown on the login prompt while an identifier is checked
pub const VERIFYING_IDENTITY: &str = "VERIFYING IDENTITY...";

/// Login prompt failure
pub const INVALID_EMPLOYEE_ID: &str = "ERROR: INVALID EMPLOYEE ID.";

/// Session-only operation attempted while logged out
pub const NOT_LOGGED_IN: &str = "> ERROR: NO ACTIVE SESSION.";

/// Blocking notice for a direct open above the held clearance
pub const ACCESS_DENIED_NOTICE: &str =
    "SECURITY ALERT: ACCESS DENIED. YOUR CLEARANCE LEVEL IS INSUFFICIENT.";

/// Infection banner, top to bottom
pub const INFECTION_BANNER: [&str; 3] = [
    "⚠ WARNING: COGNITIVE CONTAMINATION DETECTED ⚠",
    "CURRENT USER CONSCIOUSNESS INFECTED BY 'RESONANCE'",
    "WE ARE ONE / JOIN US",
];

/// Overlay texts for the moderate disturbance track
pub const MODERATE_FLASHES: &[&str] = &["I SEE YOU", "WATCHING YOU", "JOIN US", "DO NOT RESIST"];

/// Overlay texts for the infection track
pub const INFECTION_FLASHES: &[&str] = &[
    "WE SEE THROUGH YOUR EYES",
    "UNDERSTAND US",
    "YOU ARE THE RESONANCE",
    "DO NOT RESIST",
    "THE PATTERN IS BEAUTIFUL",
];

/// Command login acknowledgement, before the delay
#[must_use]
pub fn verifying_user(identifier: &str) -> String {
    format!("> VERIFYING USER [{identifier}]...")
}

/// Command login success, after the delay
#[must_use]
pub fn login_success(account: &Account) -> String {
    format!(
        "> AUTHENTICATION SUCCESSFUL.\n> WELCOME BACK, {}.\n> SECURITY CLEARANCE UPDATED TO: {}",
        account.display_name(),
        account.clearance()
    )
}

/// Command login miss
#[must_use]
pub fn unrecognized_user(identifier: &str) -> String {
    format!("> ERROR: USER [{identifier}] NOT RECOGNIZED.\n> ACCESS DENIED.")
}

/// Zero-match search
#[must_use]
pub fn no_records_found(query: &str) -> String {
    format!("NO RECORDS FOUND MATCHING \"{query}\".")
}

/// Search header
#[must_use]
pub fn records_found(count: usize) -> String {
    format!("FOUND {count} RECORD(S):")
}

/// Direct open of an unknown id
#[must_use]
pub fn document_not_found(document_id: &str) -> String {
    format!("> ERROR: DOCUMENT [{document_id}] NOT FOUND.")
}

/// First-login guide for new low-clearance staff
#[must_use]
pub fn tutorial(clearance: Clearance) -> String {
    format!(
        "WELCOME, NEW EMPLOYEE!\n\
         \n\
         This is your first login. Some basic guidance:\n\
         \n\
         1. Use SEARCH to find documents\n   \
            Example: type \"SYS-001\" or \"guide\"\n\
         \n\
         2. Open a search result to read the full document\n   \
            Press ESC to return to search\n\
         \n\
         3. Your current security clearance is {clearance}\n   \
            Higher-level documents require higher clearance\n\
         \n\
         4. Special commands:\n   \
            - LOGIN [ID] : switch user account\n   \
            - LOGOUT : exit the system\n   \
            - HELP : show help\n\
         \n\
         HINT: read carefully. Some documents may hide clues to higher clearance.\n\
         \n\
         Now try searching \"SYS-001\" to begin your work."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn help_lists_commands() {
        for command in ["SEARCH", "LOGIN", "LOGOUT"] {
            assert!(HELP.contains(command));
        }
    }

    #[test]
    fn tutorial_mentions_clearance_and_first_search() {
        let text = tutorial(Clearance::new(1));
        assert!(text.contains("SCL-1"));
        assert!(text.contains("\"SYS-001\""));
        assert!(text.contains("ESC"));
        assert!(text.contains("\n   Example:"));
    }

    #[test]
    fn login_success_names_account_and_level() {
        let account = Account::new("analyst-07", "M. Kaelen", Clearance::new(3));
        let text = login_success(&account);
        assert!(text.contains("M. Kaelen"));
        assert!(text.ends_with("SCL-3"));
    }

    #[test]
    fn no_records_quotes_query() {
        assert_eq!(no_records_found("b5"), "NO RECORDS FOUND MATCHING \"b5\".");
    }
}
