//! Preference store and document synchronizer.
//!
//! Holds the user's preference and the last known OS appearance, persists
//! the preference under the configured key and keeps the document root in
//! step with both. All host failures are logged and swallowed.

use crate::apply::apply_theme;
use crate::config::ThemeConfig;
use crate::platform::{
    DefaultAppearance, DefaultRoot, DefaultStore, DocumentRoot, Host, HostEvent, PreferenceStore,
    StorageChange, SystemAppearance,
};
use crate::theme::{remap, resolve, ResolvedTheme, SYSTEM};

/// Synchronizer over the current target's host
pub type DefaultSynchronizer = ThemeSynchronizer<DefaultStore, DefaultAppearance, DefaultRoot>;

pub struct ThemeSynchronizer<S, A, R> {
    config: ThemeConfig,
    host: Host<S, A, R>,
    preference: String,
    system: Option<ResolvedTheme>,
}

impl<S, A, R> ThemeSynchronizer<S, A, R>
where
    S: PreferenceStore,
    A: SystemAppearance,
    R: DocumentRoot,
{
    /// Read the persisted preference and OS appearance, then paint.
    pub fn new(config: ThemeConfig, host: Host<S, A, R>) -> Self {
        let preference = match host.store.load(&config.storage_key) {
            // An empty value is no preference, as in the bootstrap script
            Ok(Some(stored)) if !stored.is_empty() => stored,
            Ok(_) => config.default_theme().to_string(),
            Err(e) => {
                tracing::debug!("Theme preference unreadable, using default: {}", e);
                config.default_theme().to_string()
            }
        };
        let system = host.appearance.query();

        let sync = Self {
            config,
            host,
            preference,
            system,
        };
        sync.paint();
        sync
    }

    pub fn config(&self) -> &ThemeConfig {
        &self.config
    }

    pub fn host(&self) -> &Host<S, A, R> {
        &self.host
    }

    /// The active preference (a theme name or `system`)
    pub fn theme(&self) -> &str {
        &self.preference
    }

    pub fn forced_theme(&self) -> Option<&str> {
        self.config.forced_theme.as_deref()
    }

    /// OS appearance, only reported when system-following is enabled
    pub fn system_theme(&self) -> Option<ResolvedTheme> {
        if self.config.enable_system {
            self.system
        } else {
            None
        }
    }

    /// Preference with `system` replaced by the OS appearance
    pub fn resolved_theme(&self) -> Option<String> {
        resolve(&self.config, &self.preference, self.system)
    }

    /// Themes a user can pick from
    pub fn themes(&self) -> Vec<String> {
        self.config.selectable_themes()
    }

    /// Value currently written to the document
    pub fn effective_name(&self) -> Option<String> {
        let logical = match &self.config.forced_theme {
            Some(forced) => Some(forced.clone()),
            None => self.resolved_theme(),
        };
        logical.map(|l| remap(&self.config, &l).to_string())
    }

    /// Select a theme. Any string is accepted; unknown names simply match no
    /// styling. The preference is persisted even while a forced theme keeps
    /// the document unchanged.
    pub fn set_preference(&mut self, name: impl Into<String>) {
        let name = name.into();
        if let Err(e) = self.host.store.save(&self.config.storage_key, &name) {
            tracing::debug!("Theme preference not persisted: {}", e);
        }
        self.adopt(name);
    }

    /// Select a theme computed from the current preference.
    pub fn set_preference_with<F>(&mut self, f: F)
    where
        F: FnOnce(&str) -> String,
    {
        let next = f(&self.preference);
        self.set_preference(next);
    }

    /// The OS switched between light and dark.
    pub fn handle_system_change(&mut self, theme: ResolvedTheme) {
        self.system = Some(theme);
        if self.preference == SYSTEM && self.config.enable_system && self.config.forced_theme.is_none()
        {
            self.paint();
        }
    }

    /// Another view wrote the persisted key.
    pub fn handle_storage_change(&mut self, change: StorageChange) {
        if change.key.as_deref() != Some(self.config.storage_key.as_str()) {
            return;
        }
        match change.new_value.filter(|v| !v.is_empty()) {
            // Already persisted by the writer
            Some(value) => self.adopt(value),
            None => {
                let default = self.config.default_theme().to_string();
                self.set_preference(default);
            }
        }
    }

    pub fn handle_event(&mut self, event: HostEvent) {
        match event {
            HostEvent::SystemAppearance(theme) => self.handle_system_change(theme),
            HostEvent::Storage(change) => self.handle_storage_change(change),
        }
    }

    fn adopt(&mut self, name: String) {
        tracing::debug!(preference = %name, "Theme preference changed");
        self.preference = name;
        if self.config.forced_theme.is_none() {
            self.paint();
        }
    }

    fn paint(&self) {
        let logical = match &self.config.forced_theme {
            Some(forced) => Some(forced.clone()),
            None => self.resolved_theme(),
        };
        apply_theme(
            &self.config,
            &self.host.root,
            logical.as_deref(),
            self.config.disable_transition_on_change,
        );
    }
}
