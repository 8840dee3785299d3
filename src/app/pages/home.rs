//! Home page: live view of the theme state.

use dioxus::prelude::*;

use crate::app::components::Layout;
use crate::app::context::use_theme;

#[component]
pub fn Home() -> Element {
    let theme = use_theme();

    let preference = theme.theme();
    let resolved = theme.resolved_theme().unwrap_or_else(|| "-".to_string());
    let system = theme
        .system_theme()
        .map(|s| s.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    let forced = theme.forced_theme().unwrap_or_else(|| "none".to_string());
    let effective = theme.effective_name().unwrap_or_else(|| "-".to_string());

    rsx! {
        Layout {
            title: "Home".to_string(),
            nav_active: "home".to_string(),

            h1 { "Theme" }
            p { "Pick a theme below. Other open tabs follow along, and reloading keeps the choice." }

            div { class: "state-grid", id: "theme-state",
                article {
                    small { "Preference" }
                    strong { id: "state-preference", "{preference}" }
                }
                article {
                    small { "Resolved" }
                    strong { id: "state-resolved", "{resolved}" }
                }
                article {
                    small { "System" }
                    strong { id: "state-system", "{system}" }
                }
                article {
                    small { "Forced" }
                    strong { id: "state-forced", "{forced}" }
                }
                article {
                    small { "On the document" }
                    strong { id: "state-effective", "{effective}" }
                }
            }
        }
    }
}
