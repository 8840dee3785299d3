//! Error taxonomy for host capabilities and configuration.
//!
//! Nothing in the synchronizer propagates these to callers: storage and DOM
//! failures are logged at the boundary and the surface degrades visually.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ThemeError {
    /// No persisted key-value store (private browsing, disabled storage, SSR)
    #[error("preference storage unavailable")]
    StorageUnavailable,

    /// The store exists but rejected the operation (quota, security error)
    #[error("preference storage {op} failed: {reason}")]
    Storage { op: &'static str, reason: String },

    /// No document root to mutate
    #[error("document root unavailable")]
    NoDocument,

    #[error("document update failed: {0}")]
    Dom(String),

    #[error("invalid theme configuration: {0}")]
    Config(String),
}

impl ThemeError {
    pub fn storage(op: &'static str, reason: impl Into<String>) -> Self {
        Self::Storage {
            op,
            reason: reason.into(),
        }
    }
}
