//! Theme names and their resolution to what lands on the document.
//!
//! A preference is a configured theme name or the [`SYSTEM`] sentinel. It is
//! resolved to a logical theme (replacing `system` with the OS appearance)
//! and then remapped through the configured value table to the effective
//! name written to the root element.

use serde::{Deserialize, Serialize};

use crate::config::ThemeConfig;

/// Preference sentinel meaning "follow the OS appearance".
pub const SYSTEM: &str = "system";

/// Attribute written when no target is configured.
pub const DEFAULT_ATTRIBUTE: &str = "data-theme";

/// Media query used to read the OS appearance.
pub const DARK_MEDIA_QUERY: &str = "(prefers-color-scheme: dark)";

/// Concrete light/dark appearance reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolvedTheme {
    Light,
    Dark,
}

impl ResolvedTheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Map a logical theme name onto a color scheme, if it names one exactly.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    pub fn from_dark(matches_dark: bool) -> Self {
        if matches_dark {
            Self::Dark
        } else {
            Self::Light
        }
    }
}

impl std::fmt::Display for ResolvedTheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the effective name is written on the root element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ThemeAttribute {
    /// Member of the root class list
    Class,
    /// Named attribute, e.g. `data-theme`
    Attribute(String),
}

impl ThemeAttribute {
    pub fn name(&self) -> &str {
        match self {
            Self::Class => "class",
            Self::Attribute(name) => name,
        }
    }
}

impl From<&str> for ThemeAttribute {
    fn from(s: &str) -> Self {
        match s {
            "class" => Self::Class,
            other => Self::Attribute(other.to_string()),
        }
    }
}

impl From<String> for ThemeAttribute {
    fn from(s: String) -> Self {
        if s == "class" {
            Self::Class
        } else {
            Self::Attribute(s)
        }
    }
}

impl From<ThemeAttribute> for String {
    fn from(attr: ThemeAttribute) -> Self {
        attr.name().to_string()
    }
}

impl Default for ThemeAttribute {
    fn default() -> Self {
        Self::Attribute(DEFAULT_ATTRIBUTE.to_string())
    }
}

/// Resolve a preference to a logical theme name.
///
/// Returns `None` when the preference is `system` and the OS appearance is
/// unknown. `system` is only special when system-following is enabled;
/// otherwise it is an ordinary (unstyled) name.
pub fn resolve(config: &ThemeConfig, preference: &str, system: Option<ResolvedTheme>) -> Option<String> {
    if preference == SYSTEM && config.enable_system {
        system.map(|s| s.as_str().to_string())
    } else {
        Some(preference.to_string())
    }
}

/// Remap a logical theme name to the value written to the document.
pub fn remap<'a>(config: &'a ThemeConfig, logical: &'a str) -> &'a str {
    config.value.get(logical).map(String::as_str).unwrap_or(logical)
}

/// Every class name a theme swap must clear in class mode.
pub fn class_names(config: &ThemeConfig) -> Vec<String> {
    config
        .themes
        .iter()
        .map(|t| remap(config, t).to_string())
        .collect()
}
