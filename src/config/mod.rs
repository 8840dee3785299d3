//! Configuration management

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ThemeError;
use crate::theme::{ThemeAttribute, SYSTEM};

/// Theme configuration, fixed for the lifetime of a provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Allowed theme names (without the `system` sentinel)
    pub themes: Vec<String>,

    /// Preference used when nothing is persisted.
    /// Falls back to `system` when system-following is on, else `light`.
    pub default_theme: Option<String>,

    /// Targets on the root element: `class` and/or attribute names
    #[serde(deserialize_with = "one_or_many")]
    pub attribute: Vec<ThemeAttribute>,

    /// Logical theme name -> value written to the document
    pub value: BTreeMap<String, String>,

    /// Pins the effective theme regardless of preference
    pub forced_theme: Option<String>,

    pub enable_system: bool,

    /// Set the root `color-scheme` property for light/dark themes
    pub enable_color_scheme: bool,

    /// Disable CSS transitions for the paint that swaps themes
    pub disable_transition_on_change: bool,

    /// Key of the persisted preference
    pub storage_key: String,

    /// CSP nonce for the injected script and style elements
    pub nonce: Option<String>,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            themes: vec!["light".to_string(), "dark".to_string()],
            default_theme: None,
            attribute: vec![ThemeAttribute::default()],
            value: BTreeMap::new(),
            forced_theme: None,
            enable_system: true,
            enable_color_scheme: true,
            disable_transition_on_change: false,
            storage_key: "theme".to_string(),
            nonce: None,
        }
    }
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<ThemeAttribute>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(ThemeAttribute),
        Many(Vec<ThemeAttribute>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(attr) => vec![attr],
        OneOrMany::Many(attrs) => attrs,
    })
}

impl ThemeConfig {
    /// Preference applied when nothing is persisted
    pub fn default_theme(&self) -> &str {
        match &self.default_theme {
            Some(theme) => theme,
            None if self.enable_system => SYSTEM,
            None => "light",
        }
    }

    /// Themes offered to the user, including `system` when it is followed
    pub fn selectable_themes(&self) -> Vec<String> {
        let mut themes = self.themes.clone();
        if self.enable_system {
            themes.push(SYSTEM.to_string());
        }
        themes
    }

    pub fn with_themes<I, S>(mut self, themes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.themes = themes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_default_theme(mut self, theme: impl Into<String>) -> Self {
        self.default_theme = Some(theme.into());
        self
    }

    pub fn with_attribute(mut self, attribute: impl Into<ThemeAttribute>) -> Self {
        self.attribute = vec![attribute.into()];
        self
    }

    pub fn with_value(mut self, logical: impl Into<String>, emitted: impl Into<String>) -> Self {
        self.value.insert(logical.into(), emitted.into());
        self
    }

    pub fn with_forced_theme(mut self, theme: impl Into<String>) -> Self {
        self.forced_theme = Some(theme.into());
        self
    }

    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Check the configuration for values no surface can work with.
    pub fn validate(&self) -> Result<(), ThemeError> {
        if self.themes.is_empty() {
            return Err(ThemeError::Config("themes must not be empty".to_string()));
        }
        if self.storage_key.is_empty() {
            return Err(ThemeError::Config("storage_key must not be empty".to_string()));
        }
        if self.attribute.iter().any(|a| a.name().is_empty()) {
            return Err(ThemeError::Config("attribute names must not be empty".to_string()));
        }

        let default = self.default_theme();
        let known = self.themes.iter().any(|t| t == default)
            || (default == SYSTEM && self.enable_system);
        if !known {
            return Err(ThemeError::Config(format!(
                "default theme '{}' is not one of {:?}",
                default,
                self.selectable_themes()
            )));
        }
        Ok(())
    }
}

/// HTTP shell configuration
#[cfg(feature = "server")]
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_title")]
    pub title: String,

    #[serde(default = "crate::app::app_config")]
    pub theme: ThemeConfig,

    /// Directory served under `/assets` (the built client bundle)
    #[serde(default)]
    pub assets_dir: Option<std::path::PathBuf>,

    /// ES module URL that boots the client, e.g. `/assets/theme-sync.js`
    #[serde(default)]
    pub client_entry: Option<String>,
}

#[cfg(feature = "server")]
impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            title: default_title(),
            theme: crate::app::app_config(),
            assets_dir: None,
            client_entry: None,
        }
    }
}

#[cfg(feature = "server")]
fn default_port() -> u16 {
    3000
}

#[cfg(feature = "server")]
fn default_title() -> String {
    "Theme Sync".to_string()
}

#[cfg(feature = "server")]
pub fn load_config() -> anyhow::Result<ServerConfig> {
    let config_dir = directories::ProjectDirs::from("com", "open-horizon-labs", "theme-sync")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| std::path::PathBuf::from("."));

    load_config_from(&config_dir.join("config"))
}

/// Load from an explicit file stem (extension optional), then the environment.
#[cfg(feature = "server")]
pub fn load_config_from(path: &std::path::Path) -> anyhow::Result<ServerConfig> {
    let app = crate::app::app_config();
    let config = ::config::Config::builder()
        // Start with defaults (theme keys too, so a partial [theme] table keeps them)
        .set_default("port", 3000)?
        .set_default("theme.themes", app.themes.clone())?
        .set_default(
            "theme.disable_transition_on_change",
            app.disable_transition_on_change,
        )?
        // Load from config file if it exists
        .add_source(::config::File::with_name(&path.to_string_lossy()).required(false))
        // Override with environment variables (THEME_SYNC_PORT, THEME_SYNC_THEME__STORAGE_KEY, etc.)
        .add_source(
            ::config::Environment::with_prefix("THEME_SYNC")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("theme.themes")
                .try_parsing(true),
        )
        .build()?;

    let config: ServerConfig = config.try_deserialize()?;
    config.theme.validate()?;
    Ok(config)
}
