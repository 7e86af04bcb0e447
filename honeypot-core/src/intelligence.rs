//! Session-wide intelligence store.
//!
//! Holds every financial account, payment handle and suspicious link seen
//! across the conversation, deduplicated by exact string equality and kept
//! in first-seen order for stable display.

use serde::Serialize;
use std::collections::HashSet;

use crate::models::ExtractedIntelligence;

/// An insertion-ordered set of strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EntitySet {
    items: Vec<String>,
    #[serde(skip)]
    seen: HashSet<String>,
}

impl EntitySet {
    /// Insert `value` unless already present. Returns true if it was new.
    pub fn insert(&mut self, value: &str) -> bool {
        if self.seen.contains(value) {
            return false;
        }
        self.seen.insert(value.to_string());
        self.items.push(value.to_string());
        true
    }

    pub fn extend<'a>(&mut self, values: impl IntoIterator<Item = &'a String>) -> usize {
        values.into_iter().filter(|v| self.insert(v)).count()
    }

    pub fn contains(&self, value: &str) -> bool {
        self.seen.contains(value)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.items.iter()
    }
}

/// The three intelligence categories tracked by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    FinancialAccounts,
    PaymentHandles,
    SuspiciousLinks,
}

impl Category {
    pub const ALL: [Category; 3] = [
        Category::FinancialAccounts,
        Category::PaymentHandles,
        Category::SuspiciousLinks,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::FinancialAccounts => "Bank Accounts",
            Category::PaymentHandles => "UPI IDs",
            Category::SuspiciousLinks => "Phishing URLs",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IntelligenceStore {
    financial_accounts: EntitySet,
    payment_handles: EntitySet,
    suspicious_links: EntitySet,
}

impl IntelligenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Union `extracted` into the store. Returns how many entities were new.
    pub fn merge(&mut self, extracted: &ExtractedIntelligence) -> usize {
        self.financial_accounts.extend(&extracted.financial_accounts)
            + self.payment_handles.extend(&extracted.payment_handles)
            + self.suspicious_links.extend(&extracted.suspicious_links)
    }

    pub fn category(&self, category: Category) -> &EntitySet {
        match category {
            Category::FinancialAccounts => &self.financial_accounts,
            Category::PaymentHandles => &self.payment_handles,
            Category::SuspiciousLinks => &self.suspicious_links,
        }
    }

    pub fn financial_accounts(&self) -> &[String] {
        self.financial_accounts.as_slice()
    }

    pub fn payment_handles(&self) -> &[String] {
        self.payment_handles.as_slice()
    }

    pub fn suspicious_links(&self) -> &[String] {
        self.suspicious_links.as_slice()
    }

    pub fn total_distinct(&self) -> usize {
        Category::ALL.iter().map(|c| self.category(*c).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_distinct() == 0
    }

    /// Whether there is anything worth showing in a details view.
    pub fn has_details(&self) -> bool {
        !self.is_empty()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
