//! Employee accounts and their discoverability tiers

use crate::clearance::Clearance;
use crate::corpus::normalize_key;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Account tier
///
/// Tiers only control how discoverable an identifier is through guidance
/// text. They carry no privilege; access is decided by clearance alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountTier {
    /// Regular staff, listed in guidance
    #[default]
    Standard,

    /// Unlisted staff, found through document clues
    Hidden,

    /// Easter-egg accounts
    Secret,
}

impl AccountTier {
    /// Order in which tiers are searched during login
    pub const LOOKUP_ORDER: [AccountTier; 3] =
        [AccountTier::Standard, AccountTier::Hidden, AccountTier::Secret];

    /// True if guidance text may reveal identifiers of this tier
    #[inline]
    #[must_use]
    pub fn is_discoverable(self) -> bool {
        matches!(self, AccountTier::Standard)
    }
}

impl Display for AccountTier {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            AccountTier::Standard => "standard",
            AccountTier::Hidden => "hidden",
            AccountTier::Secret => "secret",
        };
        f.write_str(name)
    }
}

/// Employee account
///
/// Immutable once loaded. The identifier is stored normalized (trimmed,
/// uppercase) so lookups can be case-insensitive. Deserialization goes
/// through the same normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "AccountFields")]
pub struct Account {
    identifier: String,
    display_name: String,
    clearance: Clearance,
    infected: bool,
    tier: AccountTier,
}

impl Account {
    /// Create a standard-tier, uninfected account
    #[must_use]
    pub fn new(
        identifier: impl AsRef<str>,
        display_name: impl Into<String>,
        clearance: Clearance,
    ) -> Self {
        Self {
            identifier: normalize_key(identifier.as_ref()),
            display_name: display_name.into(),
            clearance,
            infected: false,
            tier: AccountTier::Standard,
        }
    }

    /// Mark account as infected
    #[inline]
    #[must_use]
    pub fn infected(mut self) -> Self {
        self.infected = true;
        self
    }

    /// Place account in a tier
    #[inline]
    #[must_use]
    pub fn with_tier(mut self, tier: AccountTier) -> Self {
        self.tier = tier;
        self
    }

    /// Normalized identifier
    #[inline]
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Display name shown in the terminal badge
    #[inline]
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Clearance level
    #[inline]
    #[must_use]
    pub fn clearance(&self) -> Clearance {
        self.clearance
    }

    /// Whether this account carries the infection
    #[inline]
    #[must_use]
    pub fn is_infected(&self) -> bool {
        self.infected
    }

    /// Discoverability tier
    #[inline]
    #[must_use]
    pub fn tier(&self) -> AccountTier {
        self.tier
    }
}

/// Wire shape of [`Account`]
#[derive(Deserialize)]
struct AccountFields {
    identifier: String,
    display_name: String,
    clearance: Clearance,
    #[serde(default)]
    infected: bool,
    #[serde(default)]
    tier: AccountTier,
}

impl From<AccountFields> for Account {
    fn from(fields: AccountFields) -> Self {
        let account = Account::new(fields.identifier, fields.display_name, fields.clearance)
            .with_tier(fields.tier);
        if fields.infected {
            account.infected()
        } else {
            account
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_is_normalized() {
        let account = Account::new("  intern-01 ", "Intern", Clearance::new(1));
        assert_eq!(account.identifier(), "INTERN-01");
    }

    #[test]
    fn defaults_to_standard_and_clean() {
        let account = Account::new("A", "A", Clearance::new(1));
        assert_eq!(account.tier(), AccountTier::Standard);
        assert!(!account.is_infected());
    }

    #[test]
    fn builder_flags() {
        let account = Account::new("B4", "Subject", Clearance::new(2))
            .infected()
            .with_tier(AccountTier::Hidden);
        assert!(account.is_infected());
        assert_eq!(account.tier(), AccountTier::Hidden);
    }

    #[test]
    fn decoding_normalizes_identifier() {
        let account: Account = serde_json::from_str(
            r#"{"identifier":" archivist ","display_name":"Archivist","clearance":4,"tier":"hidden"}"#,
        )
        .unwrap();
        assert_eq!(account.identifier(), "ARCHIVIST");
        assert_eq!(account.tier(), AccountTier::Hidden);
        assert!(!account.is_infected());

        let corpus = crate::Corpus::builder().account(account).build().unwrap();
        assert!(corpus.find_account("archivist").is_some());
    }

    #[test]
    fn encode_decode_keeps_account() {
        let account = Account::new("ECHO", "Echo", Clearance::new(5))
            .infected()
            .with_tier(AccountTier::Secret);
        let text = serde_json::to_string(&account).unwrap();
        assert_eq!(serde_json::from_str::<Account>(&text).unwrap(), account);
    }

    #[test]
    fn only_standard_is_discoverable() {
        assert!(AccountTier::Standard.is_discoverable());
        assert!(!AccountTier::Hidden.is_discoverable());
        assert!(!AccountTier::Secret.is_discoverable());
    }
}
