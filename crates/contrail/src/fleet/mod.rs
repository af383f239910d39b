//! Carriers covered by Contrail.
//!
//! Each carrier is identified by its stock ticker, which is also the code
//! used in the financials dataset, and carries its SEC Central Index Key for
//! filing lookups.

pub mod carriers;

pub use carriers::{Carrier, UsCarriers};

/// Trait for carrier registries.
pub trait Fleet {
    /// Get all carrier codes.
    fn codes(&self) -> Vec<String>;

    /// Check if a carrier code is in the registry, ignoring case.
    fn contains(&self, code: &str) -> bool {
        self.codes().iter().any(|c| c.eq_ignore_ascii_case(code.trim()))
    }

    /// Get the number of carriers.
    fn size(&self) -> usize {
        self.codes().len()
    }
}

impl Fleet for UsCarriers {
    fn codes(&self) -> Vec<String> {
        self.codes()
    }
}
