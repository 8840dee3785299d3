//! Navigation bar.

use dioxus::prelude::*;

use crate::app::Route;

#[derive(Props, Clone, PartialEq)]
pub struct NavProps {
    /// The currently active page ID (e.g., "home", "appearance")
    pub active: String,
}

#[component]
pub fn Nav(props: NavProps) -> Element {
    let link_class = |page: &str| {
        if props.active == page {
            "contrast".to_string()
        } else {
            "secondary".to_string()
        }
    };

    rsx! {
        nav {
            ul {
                li { strong { "Theme Sync" } }
            }
            ul {
                li {
                    Link { to: Route::Home {}, class: link_class("home"), "Home" }
                }
                li {
                    Link { to: Route::Appearance {}, class: link_class("appearance"), "Appearance" }
                }
            }
        }
    }
}
