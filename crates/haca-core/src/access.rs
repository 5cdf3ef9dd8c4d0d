//! Clearance-based access control
//!
//! One predicate, used by both search filtering and direct opens.

use crate::error::TerminalError;
use crate::session::Session;
use haca_corpus::Document;

/// True iff the session's clearance meets the document's requirement
#[inline]
#[must_use]
pub fn can_access(document: &Document, session: &Session) -> bool {
    session.effective_clearance().permits(document.required_clearance())
}

/// [`can_access`] as a guard for direct opens
///
/// # Errors
/// [`TerminalError::AccessDenied`] naming the shortfall.
pub fn ensure_access(document: &Document, session: &Session) -> Result<(), TerminalError> {
    if can_access(document, session) {
        return Ok(());
    }
    let required = document.required_clearance();
    let held = session.effective_clearance();
    tracing::warn!(
        document = %document.id(),
        %required,
        %held,
        identifier = %session.account().identifier(),
        "Access denied"
    );
    Err(TerminalError::access_denied(document.id(), required, held))
}
