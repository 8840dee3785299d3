//! Browser host backed by `web-sys`.

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{HtmlElement, MediaQueryList, MediaQueryListEvent, StorageEvent};

use super::{
    Cleanup, DocumentRoot, PreferenceStore, StorageChange, SystemAppearance,
    SUPPRESS_TRANSITIONS_CSS,
};
use crate::error::ThemeError;
use crate::theme::{ResolvedTheme, DARK_MEDIA_QUERY};

fn reason(err: JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}

fn dom(err: JsValue) -> ThemeError {
    ThemeError::Dom(reason(err))
}

/// `window.localStorage`
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

impl LocalStorage {
    fn storage() -> Result<web_sys::Storage, ThemeError> {
        let window = web_sys::window().ok_or(ThemeError::StorageUnavailable)?;
        match window.local_storage() {
            Ok(Some(storage)) => Ok(storage),
            Ok(None) => Err(ThemeError::StorageUnavailable),
            // Accessing localStorage throws when blocked by privacy settings
            Err(e) => Err(ThemeError::storage("open", reason(e))),
        }
    }
}

impl PreferenceStore for LocalStorage {
    fn load(&self, key: &str) -> Result<Option<String>, ThemeError> {
        Self::storage()?
            .get_item(key)
            .map_err(|e| ThemeError::storage("read", reason(e)))
    }

    fn save(&self, key: &str, value: &str) -> Result<(), ThemeError> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|e| ThemeError::storage("write", reason(e)))
    }

    fn watch(&self, on_change: Box<dyn FnMut(StorageChange)>) -> Option<Cleanup> {
        let window = web_sys::window()?;
        let mut on_change = on_change;
        let closure = Closure::<dyn FnMut(StorageEvent)>::new(move |event: StorageEvent| {
            on_change(StorageChange {
                key: event.key(),
                new_value: event.new_value(),
            });
        });

        window
            .add_event_listener_with_callback("storage", closure.as_ref().unchecked_ref())
            .ok()?;

        Some(Cleanup::new(move || {
            let _ = window
                .remove_event_listener_with_callback("storage", closure.as_ref().unchecked_ref());
            drop(closure);
        }))
    }
}

/// `window.matchMedia(query)`, read as "dark when it matches".
#[derive(Debug, Clone, Copy)]
pub struct MediaQuery {
    query: &'static str,
}

impl MediaQuery {
    pub fn dark() -> Self {
        Self {
            query: DARK_MEDIA_QUERY,
        }
    }

    fn list(&self) -> Option<MediaQueryList> {
        web_sys::window()?.match_media(self.query).ok().flatten()
    }
}

impl SystemAppearance for MediaQuery {
    fn query(&self) -> Option<ResolvedTheme> {
        self.list().map(|list| ResolvedTheme::from_dark(list.matches()))
    }

    // addListener/removeListener rather than addEventListener: older Safari
    // only implements the legacy API on MediaQueryList.
    #[allow(deprecated)]
    fn watch(&self, on_change: Box<dyn FnMut(ResolvedTheme)>) -> Option<Cleanup> {
        let list = self.list()?;
        let mut on_change = on_change;
        let closure =
            Closure::<dyn FnMut(MediaQueryListEvent)>::new(move |event: MediaQueryListEvent| {
                on_change(ResolvedTheme::from_dark(event.matches()));
            });

        list.add_listener_with_opt_callback(Some(closure.as_ref().unchecked_ref()))
            .ok()?;

        Some(Cleanup::new(move || {
            let _ = list.remove_listener_with_opt_callback(Some(closure.as_ref().unchecked_ref()));
            drop(closure);
        }))
    }
}

/// `document.documentElement`
#[derive(Debug, Clone, Copy, Default)]
pub struct RootElement;

impl RootElement {
    fn element() -> Result<web_sys::Element, ThemeError> {
        web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.document_element())
            .ok_or(ThemeError::NoDocument)
    }
}

impl DocumentRoot for RootElement {
    fn set_attribute(&self, name: &str, value: &str) -> Result<(), ThemeError> {
        Self::element()?.set_attribute(name, value).map_err(dom)
    }

    fn remove_attribute(&self, name: &str) -> Result<(), ThemeError> {
        Self::element()?.remove_attribute(name).map_err(dom)
    }

    fn replace_classes(&self, remove: &[String], add: Option<&str>) -> Result<(), ThemeError> {
        let classes = Self::element()?.class_list();
        for class in remove {
            classes.remove_1(class).map_err(dom)?;
        }
        if let Some(class) = add {
            classes.add_1(class).map_err(dom)?;
        }
        Ok(())
    }

    fn set_color_scheme(&self, scheme: Option<ResolvedTheme>) -> Result<(), ThemeError> {
        let root = Self::element()?
            .dyn_into::<HtmlElement>()
            .map_err(|_| ThemeError::Dom("root is not an HTML element".to_string()))?;
        let style = root.style();
        match scheme {
            Some(scheme) => style.set_property("color-scheme", scheme.as_str()),
            None => style.remove_property("color-scheme").map(|_| ()),
        }
        .map_err(dom)
    }

    fn suppress_transitions(&self, nonce: Option<&str>) -> Result<Cleanup, ThemeError> {
        let window = web_sys::window().ok_or(ThemeError::NoDocument)?;
        let document = window.document().ok_or(ThemeError::NoDocument)?;
        let head = document.head().ok_or(ThemeError::NoDocument)?;

        let style = document.create_element("style").map_err(dom)?;
        if let Some(nonce) = nonce {
            style.set_attribute("nonce", nonce).map_err(dom)?;
        }
        style
            .append_child(&document.create_text_node(SUPPRESS_TRANSITIONS_CSS))
            .map_err(dom)?;
        head.append_child(&style).map_err(dom)?;

        Ok(Cleanup::new(move || {
            // Reading computed style forces the recalculation with the rule in place
            if let Some(body) = document.body() {
                if let Ok(Some(computed)) = window.get_computed_style(&body) {
                    let _ = computed.get_property_value("transition");
                }
            }

            let fallback = style.clone();
            let remove = Closure::once_into_js(move || style.remove());
            if window
                .set_timeout_with_callback_and_timeout_and_arguments_0(remove.unchecked_ref(), 1)
                .is_err()
            {
                fallback.remove();
            }
        }))
    }
}
