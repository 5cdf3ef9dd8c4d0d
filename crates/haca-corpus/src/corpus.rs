//! Validated corpus store
//!
//! Provides [`Corpus`], the immutable set of tiered accounts and documents,
//! and [`CorpusBuilder`] which enforces key uniqueness at construction.

use crate::account::{Account, AccountTier};
use crate::document::Document;
use crate::error::CorpusError;
use indexmap::IndexMap;
use std::collections::HashMap;

/// Normalize an identifier or document id for case-insensitive keys
#[inline]
#[must_use]
pub fn normalize_key(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Immutable corpus of accounts and documents
///
/// Accounts are kept per tier in insertion order. Documents keep corpus
/// order, which is also the order search results are reported in.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    standard: IndexMap<String, Account>,
    hidden: IndexMap<String, Account>,
    secret: IndexMap<String, Account>,
    documents: Vec<Document>,
    /// Normalized id -> position in `documents`
    by_id: HashMap<String, usize>,
}

impl Corpus {
    /// Start building a corpus
    #[inline]
    #[must_use]
    pub fn builder() -> CorpusBuilder {
        CorpusBuilder::default()
    }

    fn tier_map(&self, tier: AccountTier) -> &IndexMap<String, Account> {
        match tier {
            AccountTier::Standard => &self.standard,
            AccountTier::Hidden => &self.hidden,
            AccountTier::Secret => &self.secret,
        }
    }

    /// Look up an account by identifier
    ///
    /// Tiers are searched standard, hidden, secret; first match wins.
    /// Comparison is case-insensitive.
    #[must_use]
    pub fn find_account(&self, identifier: &str) -> Option<&Account> {
        let key = normalize_key(identifier);
        AccountTier::LOOKUP_ORDER
            .iter()
            .find_map(|tier| self.tier_map(*tier).get(&key))
    }

    /// Look up a document by id (case-insensitive)
    #[must_use]
    pub fn find_document(&self, id: &str) -> Option<&Document> {
        self.by_id
            .get(&normalize_key(id))
            .and_then(|idx| self.documents.get(*idx))
    }

    /// Documents in corpus order
    #[inline]
    #[must_use]
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Accounts of a single tier in insertion order
    #[inline]
    pub fn accounts(&self, tier: AccountTier) -> impl Iterator<Item = &Account> {
        self.tier_map(tier).values()
    }

    /// Counts per tier and documents
    #[must_use]
    pub fn stats(&self) -> CorpusStats {
        CorpusStats {
            standard_accounts: self.standard.len(),
            hidden_accounts: self.hidden.len(),
            secret_accounts: self.secret.len(),
            documents: self.documents.len(),
        }
    }
}

/// Size summary of a corpus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CorpusStats {
    /// Standard-tier accounts
    pub standard_accounts: usize,
    /// Hidden-tier accounts
    pub hidden_accounts: usize,
    /// Secret-tier accounts
    pub secret_accounts: usize,
    /// Documents
    pub documents: usize,
}

/// Builder for [`Corpus`]
#[derive(Debug, Default)]
pub struct CorpusBuilder {
    accounts: Vec<Account>,
    documents: Vec<Document>,
}

impl CorpusBuilder {
    /// Add an account (tier taken from the account)
    #[must_use]
    pub fn account(mut self, account: Account) -> Self {
        self.accounts.push(account);
        self
    }

    /// Add several accounts
    #[must_use]
    pub fn accounts(mut self, accounts: impl IntoIterator<Item = Account>) -> Self {
        self.accounts.extend(accounts);
        self
    }

    /// Add a document
    #[must_use]
    pub fn document(mut self, document: Document) -> Self {
        self.documents.push(document);
        self
    }

    /// Add several documents
    #[must_use]
    pub fn documents(mut self, documents: impl IntoIterator<Item = Document>) -> Self {
        self.documents.extend(documents);
        self
    }

    /// Validate and freeze
    ///
    /// # Errors
    /// - [`CorpusError::EmptyKey`] for a blank identifier or document id
    /// - [`CorpusError::DuplicateAccount`] for two accounts with the same
    ///   identifier inside one tier
    /// - [`CorpusError::DuplicateDocument`] for two documents with the same id
    pub fn build(self) -> Result<Corpus, CorpusError> {
        let mut corpus = Corpus::default();

        for account in self.accounts {
            if account.identifier().is_empty() {
                return Err(CorpusError::EmptyKey { kind: "account" });
            }
            let tier = account.tier();
            let shadowed_by = AccountTier::LOOKUP_ORDER
                .iter()
                .copied()
                .filter(|other| *other != tier)
                .find(|other| corpus.tier_map(*other).contains_key(account.identifier()));
            if let Some(other) = shadowed_by {
                tracing::warn!(
                    identifier = %account.identifier(),
                    %tier,
                    other = %other,
                    "Account identifier present in several tiers; lookup order decides"
                );
            }

            let map = match tier {
                AccountTier::Standard => &mut corpus.standard,
                AccountTier::Hidden => &mut corpus.hidden,
                AccountTier::Secret => &mut corpus.secret,
            };
            if map.contains_key(account.identifier()) {
                return Err(CorpusError::DuplicateAccount {
                    identifier: account.identifier().to_string(),
                    tier,
                });
            }
            map.insert(account.identifier().to_string(), account);
        }

        for document in self.documents {
            if document.id().is_empty() {
                return Err(CorpusError::EmptyKey { kind: "document" });
            }
            if corpus.by_id.contains_key(document.id()) {
                return Err(CorpusError::DuplicateDocument(document.id().to_string()));
            }
            corpus
                .by_id
                .insert(document.id().to_string(), corpus.documents.len());
            corpus.documents.push(document);
        }

        tracing::debug!(
            accounts = corpus.standard.len() + corpus.hidden.len() + corpus.secret.len(),
            documents = corpus.documents.len(),
            "Corpus built"
        );

        Ok(corpus)
    }
}
