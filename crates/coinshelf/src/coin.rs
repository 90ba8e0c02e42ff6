//! Core slot types for coinshelf.
//!
//! This module defines the fundamental data structure for representing one
//! trackable coin in a collection.

use serde::{Deserialize, Serialize};

/// One trackable coin instance in a collection.
///
/// A slot's identity is its identifier (usually a year) plus mint mark; both
/// are fixed at creation. Only the collected flag changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinSlot {
    /// Unique identifier for this slot (assigned by the storage layer).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// The coin's identifier, usually a year ("2009") but any label works.
    pub identifier: String,

    /// Mint mark letter(s), or empty when the series doesn't distinguish mints.
    pub mint_mark: String,

    /// Whether the user owns this coin.
    pub collected: bool,
}

impl CoinSlot {
    /// Create a new, uncollected slot.
    #[must_use]
    pub fn new(identifier: impl Into<String>, mint_mark: impl Into<String>) -> Self {
        Self {
            id: None,
            identifier: identifier.into(),
            mint_mark: mint_mark.into(),
            collected: false,
        }
    }

    /// Human-readable label, e.g. "2009 P" or just "2009".
    #[must_use]
    pub fn label(&self) -> String {
        if self.mint_mark.is_empty() {
            self.identifier.clone()
        } else {
            format!("{} {}", self.identifier, self.mint_mark)
        }
    }

    /// Check whether this slot has the given identity.
    #[must_use]
    pub fn matches(&self, identifier: &str, mint_mark: &str) -> bool {
        self.identifier == identifier && self.mint_mark == mint_mark
    }

    /// The identifier parsed as a year, if it is one.
    #[must_use]
    pub fn year(&self) -> Option<u16> {
        self.identifier.parse().ok()
    }
}

impl std::fmt::Display for CoinSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_slot_uncollected() {
        let slot = CoinSlot::new("2009", "P");
        assert!(slot.id.is_none());
        assert_eq!(slot.identifier, "2009");
        assert_eq!(slot.mint_mark, "P");
        assert!(!slot.collected);
    }

    #[test]
    fn test_label_with_mint_mark() {
        let slot = CoinSlot::new("2009", "P");
        assert_eq!(slot.label(), "2009 P");
    }

    #[test]
    fn test_label_without_mint_mark() {
        let slot = CoinSlot::new("2009", "");
        assert_eq!(slot.label(), "2009");
    }

    #[test]
    fn test_display_matches_label() {
        let slot = CoinSlot::new("2011", "D");
        assert_eq!(slot.to_string(), slot.label());
    }

    #[test]
    fn test_matches() {
        let slot = CoinSlot::new("2009", "P");
        assert!(slot.matches("2009", "P"));
        assert!(!slot.matches("2009", "D"));
        assert!(!slot.matches("2010", "P"));
    }

    #[test]
    fn test_year() {
        assert_eq!(CoinSlot::new("2009", "P").year(), Some(2009));
        assert_eq!(CoinSlot::new("Type 1", "").year(), None);
    }

    #[test]
    fn test_serialization_roundtrip() {
        let slot = CoinSlot {
            id: Some(7),
            identifier: "2014".to_string(),
            mint_mark: "D".to_string(),
            collected: true,
        };
        let json = serde_json::to_string(&slot).unwrap();
        let back: CoinSlot = serde_json::from_str(&json).unwrap();
        assert_eq!(slot, back);
    }

    #[test]
    fn test_serialization_skips_missing_id() {
        let slot = CoinSlot::new("2009", "P");
        let json = serde_json::to_string(&slot).unwrap();
        assert!(!json.contains("\"id\""));
    }
}
