//! Host capabilities the synchronizer runs against.
//!
//! The browser host (`web`, wasm32 only) talks to `localStorage`,
//! `matchMedia` and the document root. The memory host stands in for it on
//! native builds and in tests.

pub mod memory;
#[cfg(target_arch = "wasm32")]
pub mod web;

use crate::error::ThemeError;
use crate::theme::ResolvedTheme;

/// Stylesheet installed while the theme attribute/class is swapped.
pub const SUPPRESS_TRANSITIONS_CSS: &str = "*,*::before,*::after{-webkit-transition:none!important;-moz-transition:none!important;-o-transition:none!important;-ms-transition:none!important;transition:none!important;-webkit-animation:none!important;animation:none!important}";

/// Deferred teardown: runs its closure once, on [`Cleanup::run`] or drop.
///
/// Returned by listener registrations (detaches the listener) and by
/// transition suppression (schedules removal of the suppression rule).
#[must_use = "dropping a Cleanup runs it immediately"]
pub struct Cleanup(Option<Box<dyn FnOnce()>>);

impl Cleanup {
    pub fn new(f: impl FnOnce() + 'static) -> Self {
        Self(Some(Box::new(f)))
    }

    pub fn run(mut self) {
        if let Some(f) = self.0.take() {
            f();
        }
    }
}

impl Drop for Cleanup {
    fn drop(&mut self) {
        if let Some(f) = self.0.take() {
            f();
        }
    }
}

impl std::fmt::Debug for Cleanup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Cleanup").field(&self.0.is_some()).finish()
    }
}

/// A write to the persisted store made by another view of the same origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageChange {
    pub key: Option<String>,
    /// `None` when the key was removed or the store cleared
    pub new_value: Option<String>,
}

/// External signals the synchronizer reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    SystemAppearance(ResolvedTheme),
    Storage(StorageChange),
}

/// Persisted key-value slot.
pub trait PreferenceStore {
    fn load(&self, key: &str) -> Result<Option<String>, ThemeError>;

    fn save(&self, key: &str, value: &str) -> Result<(), ThemeError>;

    /// Subscribe to writes made by other views. `None` if the host cannot notify.
    fn watch(&self, on_change: Box<dyn FnMut(StorageChange)>) -> Option<Cleanup>;
}

/// OS/browser light-dark signal.
pub trait SystemAppearance {
    /// Current appearance, `None` when the capability is missing
    fn query(&self) -> Option<ResolvedTheme>;

    fn watch(&self, on_change: Box<dyn FnMut(ResolvedTheme)>) -> Option<Cleanup>;
}

/// Mutation surface of the document root element.
pub trait DocumentRoot {
    fn set_attribute(&self, name: &str, value: &str) -> Result<(), ThemeError>;

    fn remove_attribute(&self, name: &str) -> Result<(), ThemeError>;

    /// Remove every class in `remove`, then add `add` if given.
    fn replace_classes(&self, remove: &[String], add: Option<&str>) -> Result<(), ThemeError>;

    /// Set or clear the root `color-scheme` hint.
    fn set_color_scheme(&self, scheme: Option<ResolvedTheme>) -> Result<(), ThemeError>;

    /// Install a document-wide rule disabling transitions and animations.
    /// The returned cleanup forces a style recalculation and removes the rule
    /// on the next macrotask.
    fn suppress_transitions(&self, nonce: Option<&str>) -> Result<Cleanup, ThemeError>;
}

/// Bundle of the three capabilities for one rendering surface.
#[derive(Debug, Clone)]
pub struct Host<S, A, R> {
    pub store: S,
    pub appearance: A,
    pub root: R,
}

impl<S, A, R> Host<S, A, R>
where
    S: PreferenceStore,
    A: SystemAppearance,
    R: DocumentRoot,
{
    pub fn new(store: S, appearance: A, root: R) -> Self {
        Self {
            store,
            appearance,
            root,
        }
    }

    /// Subscribe to both external signals, forwarding them as [`HostEvent`]s.
    pub fn watch<F>(&self, on_event: F) -> Vec<Cleanup>
    where
        F: Fn(HostEvent) + Clone + 'static,
    {
        let mut handles = Vec::new();

        let forward = on_event.clone();
        match self
            .appearance
            .watch(Box::new(move |theme| forward(HostEvent::SystemAppearance(theme))))
        {
            Some(handle) => handles.push(handle),
            None => tracing::debug!("System appearance changes unavailable"),
        }

        let forward = on_event;
        match self
            .store
            .watch(Box::new(move |change| forward(HostEvent::Storage(change))))
        {
            Some(handle) => handles.push(handle),
            None => tracing::debug!("Cross-view storage notifications unavailable"),
        }

        handles
    }
}

#[cfg(target_arch = "wasm32")]
pub type DefaultStore = web::LocalStorage;
#[cfg(target_arch = "wasm32")]
pub type DefaultAppearance = web::MediaQuery;
#[cfg(target_arch = "wasm32")]
pub type DefaultRoot = web::RootElement;

#[cfg(not(target_arch = "wasm32"))]
pub type DefaultStore = memory::MemoryStore;
#[cfg(not(target_arch = "wasm32"))]
pub type DefaultAppearance = memory::MemoryAppearance;
#[cfg(not(target_arch = "wasm32"))]
pub type DefaultRoot = memory::MemoryRoot;

pub type DefaultHost = Host<DefaultStore, DefaultAppearance, DefaultRoot>;

/// Host for the current target: the browser on wasm32, memory elsewhere.
#[cfg(target_arch = "wasm32")]
pub fn default_host() -> DefaultHost {
    Host::new(web::LocalStorage, web::MediaQuery::dark(), web::RootElement)
}

#[cfg(not(target_arch = "wasm32"))]
pub fn default_host() -> DefaultHost {
    Host::new(
        memory::MemoryStore::new(),
        memory::MemoryAppearance::unsupported(),
        memory::MemoryRoot::new(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use memory::{MemoryAppearance, MemoryRoot, MemoryStore};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_cleanup_runs_once() {
        let count = Rc::new(RefCell::new(0));
        let c = count.clone();
        let cleanup = Cleanup::new(move || *c.borrow_mut() += 1);
        cleanup.run();
        assert_eq!(*count.borrow(), 1);

        let c = count.clone();
        drop(Cleanup::new(move || *c.borrow_mut() += 1));
        assert_eq!(*count.borrow(), 2);
    }

    #[test]
    fn test_host_watch_forwards_events() {
        let store = MemoryStore::new();
        let appearance = MemoryAppearance::new(ResolvedTheme::Light);
        let host = Host::new(store.clone(), appearance.clone(), MemoryRoot::new());

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let handles = host.watch(move |event| sink.borrow_mut().push(event));
        assert_eq!(handles.len(), 2);

        appearance.set(ResolvedTheme::Dark);
        store.simulate_external_write("theme", Some("light"));

        assert_eq!(
            *seen.borrow(),
            vec![
                HostEvent::SystemAppearance(ResolvedTheme::Dark),
                HostEvent::Storage(StorageChange {
                    key: Some("theme".to_string()),
                    new_value: Some("light".to_string()),
                }),
            ]
        );

        drop(handles);
        appearance.set(ResolvedTheme::Light);
        assert_eq!(seen.borrow().len(), 2);
    }

    #[test]
    fn test_host_watch_without_media() {
        let host = Host::new(
            MemoryStore::new(),
            MemoryAppearance::unsupported(),
            MemoryRoot::new(),
        );
        let handles = host.watch(|_| {});
        assert_eq!(handles.len(), 1);
    }
}
