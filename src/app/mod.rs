//! Dioxus application entry point.
//!
//! This module provides the main App component that serves as the root
//! of the Dioxus application. The theme provider sits above the router so
//! every page shares one synchronizer.

use dioxus::prelude::*;

pub mod components;
pub mod context;
pub mod pages;

use components::ThemeProvider;
use pages::{Appearance, Home};

/// Theme configuration of the bundled app (also the server shell's default).
pub fn app_config() -> crate::config::ThemeConfig {
    crate::config::ThemeConfig {
        disable_transition_on_change: true,
        ..crate::config::ThemeConfig::default().with_themes(["light", "dark", "black"])
    }
}

/// Root app component with routing
#[component]
pub fn App() -> Element {
    rsx! {
        ThemeProvider { config: app_config(),
            Router::<Route> {}
        }
    }
}

/// Application routes
#[derive(Clone, Routable, Debug, PartialEq)]
pub enum Route {
    #[route("/")]
    Home {},
    #[route("/appearance")]
    Appearance {},
}
