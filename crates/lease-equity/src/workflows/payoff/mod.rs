//! Lender payoff phone directory backing the payoff-lookup page.

mod normalizer;
mod parser;
pub mod router;

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::Serialize;

use normalizer::normalize_lender;
pub use router::payoff_router;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LenderContact {
    pub lender: String,
    pub payoff_phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum PayoffDirectoryError {
    #[error("failed to read payoff directory: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid payoff directory CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Lender contacts keyed by normalized lender name. The first row for a lender wins.
#[derive(Debug, Clone, Default)]
pub struct PayoffDirectory {
    contacts: Vec<LenderContact>,
    index: HashMap<String, usize>,
}

impl PayoffDirectory {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, PayoffDirectoryError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, PayoffDirectoryError> {
        let mut directory = Self::default();
        for contact in parser::parse_contacts(reader)? {
            directory.insert(contact);
        }
        Ok(directory)
    }

    fn insert(&mut self, contact: LenderContact) {
        let key = normalize_lender(&contact.lender);
        if key.is_empty() || self.index.contains_key(&key) {
            return;
        }
        self.index.insert(key, self.contacts.len());
        self.contacts.push(contact);
    }

    pub fn lookup(&self, lender: &str) -> Option<&LenderContact> {
        self.index
            .get(&normalize_lender(lender))
            .and_then(|position| self.contacts.get(*position))
    }

    /// Contacts in file order.
    pub fn entries(&self) -> &[LenderContact] {
        &self.contacts
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }
}
