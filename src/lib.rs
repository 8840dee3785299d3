//! Theme Sync - Rust Implementation
//!
//! Client-side theme preference management for web pages.
//!
//! This library provides:
//! - Persisted theme preference with system appearance following
//! - Cross-tab sync through storage change events
//! - Forced per-surface themes and transition suppression during swaps
//! - An inline bootstrap script that paints the theme before the first frame
//! - Web UI (Dioxus) and an HTTP shell serving the pre-paint script

// =============================================================================
// Lints - Enforce code quality and consistency
// =============================================================================

// Deny truly dangerous patterns (these will fail the build)
#![deny(unsafe_code)]
#![deny(unused_must_use)]

// Dioxus UI app (shared between the server shell and WASM client)
pub mod app;

pub mod apply;
pub mod config;
pub mod error;
pub mod platform;
pub mod script;
pub mod sync;
pub mod theme;

// Server-only modules (excluded from WASM build)
#[cfg(feature = "server")]
pub mod server;

pub use config::ThemeConfig;
pub use error::ThemeError;
pub use script::{bootstrap_script, script_tag};
pub use sync::{DefaultSynchronizer, ThemeSynchronizer};
pub use theme::{ResolvedTheme, ThemeAttribute};
