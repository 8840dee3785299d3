//! Dioxus page components.

mod appearance;
mod home;

pub use appearance::Appearance;
pub use home::Home;
