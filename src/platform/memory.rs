//! In-memory host for native builds and tests.
//!
//! Handles are cheap clones sharing state, so a test can keep one copy to
//! drive signals ("another tab wrote the key", "the OS switched to dark")
//! and inspect the root while the synchronizer owns the other.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::{Rc, Weak};

use super::{Cleanup, DocumentRoot, PreferenceStore, StorageChange, SystemAppearance};
use crate::error::ThemeError;
use crate::theme::ResolvedTheme;

type Callback<T> = Rc<RefCell<Box<dyn FnMut(T)>>>;

struct ListenerSet<T> {
    next_id: u64,
    entries: Vec<(u64, Callback<T>)>,
}

/// Registered callbacks, detached when their [`Cleanup`] runs.
struct Listeners<T>(Rc<RefCell<ListenerSet<T>>>);

impl<T> Clone for Listeners<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T: Clone + 'static> Listeners<T> {
    fn new() -> Self {
        Self(Rc::new(RefCell::new(ListenerSet {
            next_id: 0,
            entries: Vec::new(),
        })))
    }

    fn register(&self, callback: Box<dyn FnMut(T)>) -> Cleanup {
        let id = {
            let mut set = self.0.borrow_mut();
            let id = set.next_id;
            set.next_id += 1;
            set.entries.push((id, Rc::new(RefCell::new(callback))));
            id
        };

        let weak: Weak<RefCell<ListenerSet<T>>> = Rc::downgrade(&self.0);
        Cleanup::new(move || {
            if let Some(set) = weak.upgrade() {
                set.borrow_mut().entries.retain(|(entry, _)| *entry != id);
            }
        })
    }

    fn emit(&self, value: T) {
        // Snapshot so callbacks may register or detach while we iterate
        let callbacks: Vec<Callback<T>> =
            self.0.borrow().entries.iter().map(|(_, cb)| cb.clone()).collect();
        for callback in callbacks {
            let mut f = callback.borrow_mut();
            (*f)(value.clone());
        }
    }

    fn len(&self) -> usize {
        self.0.borrow().entries.len()
    }
}

// =============================================================================
// Store
// =============================================================================

#[derive(Default)]
struct StoreState {
    values: HashMap<String, String>,
    unavailable: bool,
    reject_writes: bool,
}

/// Key-value slot with switchable failure modes.
#[derive(Clone)]
pub struct MemoryStore {
    state: Rc<RefCell<StoreState>>,
    listeners: Listeners<StorageChange>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(StoreState::default())),
            listeners: Listeners::new(),
        }
    }

    pub fn with_value(key: &str, value: &str) -> Self {
        let store = Self::new();
        store
            .state
            .borrow_mut()
            .values
            .insert(key.to_string(), value.to_string());
        store
    }

    /// Every access fails, as with storage disabled or blocked.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.state.borrow_mut().unavailable = unavailable;
    }

    /// Writes fail, as with an exceeded quota.
    pub fn set_reject_writes(&self, reject: bool) {
        self.state.borrow_mut().reject_writes = reject;
    }

    /// Raw value, bypassing failure modes.
    pub fn get(&self, key: &str) -> Option<String> {
        self.state.borrow().values.get(key).cloned()
    }

    /// Write as another view would: the value changes and this view is notified.
    pub fn simulate_external_write(&self, key: &str, value: Option<&str>) {
        {
            let mut state = self.state.borrow_mut();
            match value {
                Some(v) => state.values.insert(key.to_string(), v.to_string()),
                None => state.values.remove(key),
            };
        }
        self.listeners.emit(StorageChange {
            key: Some(key.to_string()),
            new_value: value.map(str::to_string),
        });
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PreferenceStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, ThemeError> {
        let state = self.state.borrow();
        if state.unavailable {
            return Err(ThemeError::StorageUnavailable);
        }
        Ok(state.values.get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<(), ThemeError> {
        let mut state = self.state.borrow_mut();
        if state.unavailable {
            return Err(ThemeError::StorageUnavailable);
        }
        if state.reject_writes {
            return Err(ThemeError::storage("write", "QuotaExceededError"));
        }
        state.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn watch(&self, on_change: Box<dyn FnMut(StorageChange)>) -> Option<Cleanup> {
        Some(self.listeners.register(on_change))
    }
}

// =============================================================================
// Appearance
// =============================================================================

/// Simulated media signal. `unsupported()` behaves like a host without
/// `matchMedia`.
#[derive(Clone)]
pub struct MemoryAppearance {
    current: Rc<RefCell<Option<ResolvedTheme>>>,
    listeners: Listeners<ResolvedTheme>,
}

impl MemoryAppearance {
    pub fn new(initial: ResolvedTheme) -> Self {
        Self {
            current: Rc::new(RefCell::new(Some(initial))),
            listeners: Listeners::new(),
        }
    }

    pub fn unsupported() -> Self {
        Self {
            current: Rc::new(RefCell::new(None)),
            listeners: Listeners::new(),
        }
    }

    /// Change the appearance and fire the change notification.
    pub fn set(&self, theme: ResolvedTheme) {
        *self.current.borrow_mut() = Some(theme);
        self.listeners.emit(theme);
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl SystemAppearance for MemoryAppearance {
    fn query(&self) -> Option<ResolvedTheme> {
        *self.current.borrow()
    }

    fn watch(&self, on_change: Box<dyn FnMut(ResolvedTheme)>) -> Option<Cleanup> {
        if self.current.borrow().is_none() {
            return None;
        }
        Some(self.listeners.register(on_change))
    }
}

// =============================================================================
// Root element
// =============================================================================

#[derive(Default)]
struct RootState {
    attributes: BTreeMap<String, String>,
    classes: Vec<String>,
    color_scheme: Option<ResolvedTheme>,
    suppressions: usize,
    suppressed: bool,
    writes: usize,
    writes_while_suppressed: usize,
}

impl RootState {
    fn record_write(&mut self) {
        self.writes += 1;
        if self.suppressed {
            self.writes_while_suppressed += 1;
        }
    }
}

/// Recording document root.
#[derive(Clone, Default)]
pub struct MemoryRoot {
    state: Rc<RefCell<RootState>>,
}

impl MemoryRoot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attribute(&self, name: &str) -> Option<String> {
        self.state.borrow().attributes.get(name).cloned()
    }

    pub fn classes(&self) -> Vec<String> {
        self.state.borrow().classes.clone()
    }

    pub fn add_class(&self, class: &str) {
        let mut state = self.state.borrow_mut();
        if !state.classes.iter().any(|c| c == class) {
            state.classes.push(class.to_string());
        }
    }

    pub fn color_scheme(&self) -> Option<ResolvedTheme> {
        self.state.borrow().color_scheme
    }

    /// Number of times transitions were suppressed
    pub fn suppression_count(&self) -> usize {
        self.state.borrow().suppressions
    }

    pub fn is_suppressed(&self) -> bool {
        self.state.borrow().suppressed
    }

    /// Attribute/class writes made in total
    pub fn write_count(&self) -> usize {
        self.state.borrow().writes
    }

    /// Attribute/class writes made while transitions were suppressed
    pub fn writes_while_suppressed(&self) -> usize {
        self.state.borrow().writes_while_suppressed
    }
}

impl DocumentRoot for MemoryRoot {
    fn set_attribute(&self, name: &str, value: &str) -> Result<(), ThemeError> {
        let mut state = self.state.borrow_mut();
        state.attributes.insert(name.to_string(), value.to_string());
        state.record_write();
        Ok(())
    }

    fn remove_attribute(&self, name: &str) -> Result<(), ThemeError> {
        let mut state = self.state.borrow_mut();
        state.attributes.remove(name);
        state.record_write();
        Ok(())
    }

    fn replace_classes(&self, remove: &[String], add: Option<&str>) -> Result<(), ThemeError> {
        let mut state = self.state.borrow_mut();
        state.classes.retain(|c| !remove.contains(c));
        if let Some(class) = add {
            if !state.classes.iter().any(|c| c == class) {
                state.classes.push(class.to_string());
            }
        }
        state.record_write();
        Ok(())
    }

    fn set_color_scheme(&self, scheme: Option<ResolvedTheme>) -> Result<(), ThemeError> {
        self.state.borrow_mut().color_scheme = scheme;
        Ok(())
    }

    fn suppress_transitions(&self, _nonce: Option<&str>) -> Result<Cleanup, ThemeError> {
        {
            let mut state = self.state.borrow_mut();
            state.suppressions += 1;
            state.suppressed = true;
        }
        let state = self.state.clone();
        Ok(Cleanup::new(move || state.borrow_mut().suppressed = false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_failure_modes() {
        let store = MemoryStore::with_value("theme", "dark");
        assert_eq!(store.load("theme").unwrap().as_deref(), Some("dark"));

        store.set_reject_writes(true);
        assert!(matches!(
            store.save("theme", "light"),
            Err(ThemeError::Storage { op: "write", .. })
        ));
        assert_eq!(store.get("theme").as_deref(), Some("dark"));

        store.set_unavailable(true);
        assert_eq!(store.load("theme"), Err(ThemeError::StorageUnavailable));
    }

    #[test]
    fn test_store_own_writes_do_not_notify() {
        let store = MemoryStore::new();
        let seen = Rc::new(RefCell::new(0));
        let sink = seen.clone();
        let handle = store.watch(Box::new(move |_| *sink.borrow_mut() += 1));
        assert_eq!(store.listener_count(), 1);

        store.save("theme", "dark").unwrap();
        assert_eq!(*seen.borrow(), 0);

        store.simulate_external_write("theme", None);
        assert_eq!(*seen.borrow(), 1);
        assert_eq!(store.get("theme"), None);

        drop(handle);
        assert_eq!(store.listener_count(), 0);
    }

    #[test]
    fn test_appearance_detach() {
        let appearance = MemoryAppearance::new(ResolvedTheme::Light);
        let handle = appearance.watch(Box::new(|_| {}));
        assert_eq!(appearance.listener_count(), 1);
        drop(handle);
        assert_eq!(appearance.listener_count(), 0);
    }

    #[test]
    fn test_unsupported_appearance() {
        let appearance = MemoryAppearance::unsupported();
        assert_eq!(appearance.query(), None);
        assert!(appearance.watch(Box::new(|_| {})).is_none());
    }

    #[test]
    fn test_root_replace_classes() {
        let root = MemoryRoot::new();
        root.add_class("layout-wide");
        root.add_class("light");
        root.replace_classes(&["light".to_string(), "dark".to_string()], Some("dark"))
            .unwrap();
        assert_eq!(root.classes(), vec!["layout-wide", "dark"]);
    }

    #[test]
    fn test_root_tracks_suppressed_writes() {
        let root = MemoryRoot::new();
        let guard = root.suppress_transitions(None).unwrap();
        root.set_attribute("data-theme", "dark").unwrap();
        guard.run();
        root.set_attribute("data-theme", "light").unwrap();

        assert_eq!(root.suppression_count(), 1);
        assert!(!root.is_suppressed());
        assert_eq!(root.write_count(), 2);
        assert_eq!(root.writes_while_suppressed(), 1);
    }
}
