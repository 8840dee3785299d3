//! Layout component wrapping all pages with Pico CSS and common elements.

use dioxus::prelude::*;

use super::nav::Nav;
use super::theme::ThemeSwitcher;

/// CSS styles for the application (extends Pico CSS).
pub const CUSTOM_STYLES: &str = r#"
:root { --pico-font-size: 15px; }
small { color: var(--pico-muted-color); }
body, .card { transition: background-color .3s ease, color .3s ease; }
.state-grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(220px, 1fr)); gap: 1rem; }
.state-grid article { margin: 0; }
.state-grid strong { display: block; font-size: 1.25rem; }
/* Black theme (OLED) - Pico has no third scheme, so restate the dark palette */
[data-theme="black"] {
    color-scheme: dark;
    --pico-color: #c2c7d0;
    --pico-background-color: #000;
    --pico-card-background-color: #0a0a0a;
    --pico-card-sectioning-background-color: #0a0a0a;
    --pico-modal-overlay-background-color: rgba(0,0,0,.9);
    --pico-primary-background: #1a1a1a;
    --pico-secondary-background: #111;
    --pico-contrast-background: #0a0a0a;
    --pico-muted-border-color: #1a1a1a;
    --pico-form-element-background-color: #0a0a0a;
    --pico-table-border-color: #1a1a1a;
}
/* Theme switcher */
.theme-switcher { display: flex; gap: 0.25rem; }
.theme-switcher button { padding: 0.25rem 0.5rem; font-size: 0.8rem; margin: 0; }
.theme-switcher button.active { background: var(--pico-primary-background); color: var(--pico-primary-inverse); }
"#;

pub const PICO_CSS: &str = "https://cdn.jsdelivr.net/npm/@picocss/pico@2/css/pico.min.css";

#[derive(Props, Clone, PartialEq)]
pub struct LayoutProps {
    /// Page title (shown in browser tab)
    pub title: String,
    /// Active navigation item ID
    pub nav_active: String,
    /// Page content
    pub children: Element,
}

/// Main layout component wrapping all pages.
#[component]
pub fn Layout(props: LayoutProps) -> Element {
    let version = env!("CARGO_PKG_VERSION");
    let full_title = format!("{} - Theme Sync", props.title);

    rsx! {
        // Head elements - Dioxus hoists these to the real <head>
        document::Title { "{full_title}" }
        document::Link { rel: "stylesheet", href: PICO_CSS }
        document::Style { {CUSTOM_STYLES} }

        header { class: "container",
            Nav { active: props.nav_active.clone() }
        }
        main { class: "container",
            {props.children}
        }
        footer {
            class: "container",
            style: "display:flex;justify-content:space-between;align-items:center;",
            small { "Theme Sync v{version}" }
            ThemeSwitcher {}
        }
    }
}
