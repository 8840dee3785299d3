//! Appearance page: theme picker plus the active configuration.

use dioxus::prelude::*;

use crate::app::components::theme::theme_label;
use crate::app::components::Layout;
use crate::app::context::use_theme;
use crate::script::bootstrap_script;

#[component]
pub fn Appearance() -> Element {
    let theme = use_theme();
    let current = theme.theme();
    let config = theme.config();

    let targets = config
        .attribute
        .iter()
        .map(|a| a.name().to_string())
        .collect::<Vec<_>>()
        .join(", ");
    let remap = if config.value.is_empty() {
        "-".to_string()
    } else {
        config
            .value
            .iter()
            .map(|(logical, emitted)| format!("{logical} → {emitted}"))
            .collect::<Vec<_>>()
            .join(", ")
    };
    let storage_key = config.storage_key.clone();
    let default_theme = config.default_theme().to_string();
    let enable_system = config.enable_system;
    let enable_color_scheme = config.enable_color_scheme;
    let suppress = config.disable_transition_on_change;
    let locked = config.forced_theme.is_some();
    let script = bootstrap_script(&config);

    rsx! {
        Layout {
            title: "Appearance".to_string(),
            nav_active: "appearance".to_string(),

            h1 { "Appearance" }

            section {
                label { r#for: "theme-select", "Theme" }
                select {
                    id: "theme-select",
                    disabled: locked,
                    onchange: move |evt| theme.set_theme(evt.value()),
                    for name in theme.themes() {
                        option {
                            key: "{name}",
                            value: "{name}",
                            selected: name == current,
                            {theme_label(&name)}
                        }
                    }
                }
                if let Some(forced) = config.forced_theme.clone() {
                    small { "This surface is pinned to \"{forced}\". Your choice is still saved." }
                }
            }

            section {
                h2 { "Configuration" }
                table {
                    tbody {
                        tr { td { "Storage key" } td { code { "{storage_key}" } } }
                        tr { td { "Written to" } td { code { "{targets}" } } }
                        tr { td { "Default theme" } td { "{default_theme}" } }
                        tr { td { "Value map" } td { "{remap}" } }
                        tr { td { "Follow system" } td { "{enable_system}" } }
                        tr { td { "color-scheme hint" } td { "{enable_color_scheme}" } }
                        tr { td { "Transitions off during swap" } td { "{suppress}" } }
                    }
                }
            }

            section {
                h2 { "Bootstrap script" }
                p { small { "Inlined in <head> so the first paint already has the right theme." } }
                pre { code { "{script}" } }
            }
        }
    }
}
