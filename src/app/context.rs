//! Theme state shared with the whole component tree.
//!
//! `use_theme_provider` owns the synchronizer for the lifetime of the
//! providing scope; descendants read and set the theme through
//! [`use_theme`].

use std::cell::RefCell;
use std::rc::Rc;

use dioxus::prelude::*;
use futures::channel::mpsc;
use futures::StreamExt;

use crate::config::ThemeConfig;
use crate::platform::{default_host, HostEvent};
use crate::sync::{DefaultSynchronizer, ThemeSynchronizer};
use crate::theme::ResolvedTheme;

/// Handle to the provider's theme state. Reads subscribe the calling component.
#[derive(Clone, Copy)]
pub struct ThemeContext {
    sync: Signal<DefaultSynchronizer>,
}

impl ThemeContext {
    /// Active preference (a theme name or `system`)
    pub fn theme(&self) -> String {
        self.sync.read().theme().to_string()
    }

    pub fn resolved_theme(&self) -> Option<String> {
        self.sync.read().resolved_theme()
    }

    pub fn system_theme(&self) -> Option<ResolvedTheme> {
        self.sync.read().system_theme()
    }

    pub fn forced_theme(&self) -> Option<String> {
        self.sync.read().forced_theme().map(str::to_string)
    }

    /// Value written to the document root
    pub fn effective_name(&self) -> Option<String> {
        self.sync.read().effective_name()
    }

    pub fn themes(&self) -> Vec<String> {
        self.sync.read().themes()
    }

    pub fn config(&self) -> ThemeConfig {
        self.sync.read().config().clone()
    }

    /// Set and persist the preference
    pub fn set_theme(&self, name: impl Into<String>) {
        let mut sync = self.sync;
        sync.write().set_preference(name);
    }
}

/// Initialize theme context provider - call once at app root
pub fn use_theme_provider(config: ThemeConfig) -> ThemeContext {
    let mut sync = use_signal(move || {
        if let Err(e) = config.validate() {
            tracing::warn!("{}", e);
        }
        ThemeSynchronizer::new(config, default_host())
    });

    // Host callbacks only queue events; the scope's task applies them
    let listeners = use_hook(move || {
        let (tx, mut rx) = mpsc::unbounded::<HostEvent>();
        let handles = sync.peek().host().watch(move |event| {
            let _ = tx.unbounded_send(event);
        });

        spawn(async move {
            while let Some(event) = rx.next().await {
                sync.write().handle_event(event);
            }
        });

        Rc::new(RefCell::new(handles))
    });

    use_drop(move || listeners.borrow_mut().clear());

    use_context_provider(|| ThemeContext { sync })
}

/// Get theme context - use in any component
pub fn use_theme() -> ThemeContext {
    use_context::<ThemeContext>()
}
