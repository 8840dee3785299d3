//! Theme provider, bootstrap script and switcher components.

use dioxus::prelude::*;

use crate::app::context::{use_theme, use_theme_provider};
use crate::config::ThemeConfig;
use crate::script::bootstrap_script;

/// Provides [`crate::app::context::ThemeContext`] to `children` and injects
/// the bootstrap script into the document head.
#[component]
pub fn ThemeProvider(config: ThemeConfig, children: Element) -> Element {
    use_theme_provider(config.clone());

    rsx! {
        ThemeScript { config }
        {children}
    }
}

#[derive(Props, Clone)]
pub struct ThemeScriptProps {
    pub config: ThemeConfig,
}

// Everything but the forced theme is fixed for the surface's lifetime
impl PartialEq for ThemeScriptProps {
    fn eq(&self, other: &Self) -> bool {
        self.config.forced_theme == other.config.forced_theme
    }
}

/// Inline bootstrap script, hoisted to `<head>`.
/// Runs immediately to prevent flash of wrong theme.
#[component]
pub fn ThemeScript(props: ThemeScriptProps) -> Element {
    let script = bootstrap_script(&props.config);

    rsx! {
        document::Script { {script} }
    }
}

/// One button per selectable theme, including `system` when followed.
#[component]
pub fn ThemeSwitcher() -> Element {
    let theme = use_theme();
    let current = theme.theme();
    let locked = theme.forced_theme().is_some();

    rsx! {
        div { class: "theme-switcher",
            for name in theme.themes() {
                ThemeButton {
                    key: "{name}",
                    active: current == name,
                    locked,
                    name: name.clone(),
                }
            }
        }
    }
}

#[component]
fn ThemeButton(name: String, active: bool, locked: bool) -> Element {
    let theme = use_theme();
    let label = theme_label(&name);
    let id = format!("theme-{name}");

    rsx! {
        button {
            id: "{id}",
            class: if active { "active" } else { "" },
            disabled: locked,
            onclick: move |_| theme.set_theme(name.clone()),
            "{label}"
        }
    }
}

/// Display label for a theme name: `system` -> "System", `dark` -> "Dark".
pub fn theme_label(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
