//! Bootstrap script that paints the theme before the first frame.
//!
//! The reactive tree only mounts after the WASM bundle loads, so without
//! this snippet the page would first paint with no theme (or the wrong one).
//! The generated script is self-contained, runs synchronously from the
//! document head and only writes to `document.documentElement`, so running
//! it twice leaves the document as running it once.
//!
//! [`bootstrap_theme`] and [`run_bootstrap`] are the same procedure in Rust,
//! used by the memory host and to pin down the script's decisions in tests.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::apply::apply_theme;
use crate::config::ThemeConfig;
use crate::platform::{DocumentRoot, Host, PreferenceStore, SystemAppearance};
use crate::theme::{resolve, ResolvedTheme, DARK_MEDIA_QUERY};

/// Body of the bootstrap function; receives the parameters as `p`.
const BOOTSTRAP_FN: &str = r#"function (p) {
    var d = document.documentElement;
    function name(t) {
        return Object.prototype.hasOwnProperty.call(p.value, t) ? p.value[t] : t;
    }
    function system() {
        if (!window.matchMedia) return null;
        return window.matchMedia(p.mediaQuery).matches ? "dark" : "light";
    }
    function apply(t) {
        var n = t === null ? null : name(t);
        p.attributes.forEach(function (k) {
            if (k === "class") {
                d.classList.remove.apply(d.classList, p.themes.map(name));
                if (n) d.classList.add(n);
            } else if (n) {
                d.setAttribute(k, n);
            } else {
                d.removeAttribute(k);
            }
        });
        if (p.enableColorScheme) {
            if (t === "light" || t === "dark") d.style.colorScheme = t;
            else d.style.removeProperty("color-scheme");
        }
    }
    var t = null;
    try { t = localStorage.getItem(p.storageKey); } catch (e) {}
    if (p.forcedTheme) { apply(p.forcedTheme); return; }
    t = t || p.defaultTheme;
    if (p.enableSystem && t === "system") t = system();
    apply(t);
}"#;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ScriptParams<'a> {
    storage_key: &'a str,
    default_theme: &'a str,
    forced_theme: Option<&'a str>,
    attributes: Vec<&'a str>,
    themes: &'a [String],
    value: &'a BTreeMap<String, String>,
    enable_system: bool,
    enable_color_scheme: bool,
    media_query: &'static str,
}

impl<'a> ScriptParams<'a> {
    fn new(config: &'a ThemeConfig) -> Self {
        Self {
            storage_key: &config.storage_key,
            default_theme: config.default_theme(),
            forced_theme: config.forced_theme.as_deref(),
            attributes: config.attribute.iter().map(|a| a.name()).collect(),
            themes: &config.themes,
            value: &config.value,
            enable_system: config.enable_system,
            enable_color_scheme: config.enable_color_scheme,
            media_query: DARK_MEDIA_QUERY,
        }
    }
}

/// Generate the inline bootstrap script for `config`.
pub fn bootstrap_script(config: &ThemeConfig) -> String {
    let params = match serde_json::to_string(&ScriptParams::new(config)) {
        Ok(json) => json,
        Err(e) => {
            tracing::warn!("Failed to encode bootstrap parameters: {}", e);
            return String::new();
        }
    };
    // `<` escaped so a value can never close the surrounding <script> element
    let params = params.replace('<', "\\u003c");
    format!("({BOOTSTRAP_FN})({params});")
}

/// The bootstrap script wrapped in a `<script>` element for HTML shells.
pub fn script_tag(config: &ThemeConfig) -> String {
    let script = bootstrap_script(config);
    match &config.nonce {
        Some(nonce) => format!(
            "<script nonce=\"{}\">{}</script>",
            escape_attribute(nonce),
            script
        ),
        None => format!("<script>{script}</script>"),
    }
}

fn escape_attribute(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Logical theme the bootstrap script paints, given what the host reports.
pub fn bootstrap_theme(
    config: &ThemeConfig,
    stored: Option<&str>,
    system: Option<ResolvedTheme>,
) -> Option<String> {
    if let Some(forced) = &config.forced_theme {
        return Some(forced.clone());
    }
    let preference = stored
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| config.default_theme());
    resolve(config, preference, system)
}

/// Run the bootstrap procedure against a host.
pub fn run_bootstrap<S, A, R>(config: &ThemeConfig, host: &Host<S, A, R>)
where
    S: PreferenceStore,
    A: SystemAppearance,
    R: DocumentRoot,
{
    let stored = host.store.load(&config.storage_key).unwrap_or_else(|e| {
        tracing::debug!("Bootstrap could not read theme preference: {}", e);
        None
    });
    let theme = bootstrap_theme(config, stored.as_deref(), host.appearance.query());
    apply_theme(config, &host.root, theme.as_deref(), false);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::memory::{MemoryAppearance, MemoryRoot, MemoryStore};
    use crate::sync::ThemeSynchronizer;

    fn host(
        store: &MemoryStore,
        appearance: &MemoryAppearance,
        root: &MemoryRoot,
    ) -> Host<MemoryStore, MemoryAppearance, MemoryRoot> {
        Host::new(store.clone(), appearance.clone(), root.clone())
    }

    #[test]
    fn test_script_embeds_parameters() {
        let config = ThemeConfig::default()
            .with_storage_key("site-theme")
            .with_value("dark", "night");
        let script = bootstrap_script(&config);

        assert!(script.starts_with("(function (p) {"));
        assert!(script.ends_with(");"));
        assert!(script.contains(r#""storageKey":"site-theme""#));
        assert!(script.contains(r#""defaultTheme":"system""#));
        assert!(script.contains(r#""forcedTheme":null"#));
        assert!(script.contains(r#""attributes":["data-theme"]"#));
        assert!(script.contains(r#""value":{"dark":"night"}"#));
        assert!(script.contains(r#""mediaQuery":"(prefers-color-scheme: dark)""#));
    }

    #[test]
    fn test_script_is_deterministic() {
        let config = ThemeConfig::default()
            .with_value("light", "day")
            .with_value("dark", "night");
        assert_eq!(bootstrap_script(&config), bootstrap_script(&config.clone()));
    }

    #[test]
    fn test_script_cannot_close_its_element() {
        let config = ThemeConfig::default().with_storage_key("</script><script>alert(1)");
        let script = bootstrap_script(&config);
        assert!(!script.contains("</script>"));
        assert!(script.contains(r"\u003c/script>"));
    }

    #[test]
    fn test_script_tag_nonce() {
        let mut config = ThemeConfig::default();
        assert!(script_tag(&config).starts_with("<script>("));

        config.nonce = Some("r4nd\"om".to_string());
        let tag = script_tag(&config);
        assert!(tag.starts_with("<script nonce=\"r4nd&quot;om\">"));
        assert!(tag.ends_with("</script>"));
    }

    #[test]
    fn test_bootstrap_theme_decisions() {
        let config = ThemeConfig::default();
        assert_eq!(
            bootstrap_theme(&config, None, Some(ResolvedTheme::Dark)).as_deref(),
            Some("dark")
        );
        assert_eq!(
            bootstrap_theme(&config, Some("light"), Some(ResolvedTheme::Dark)).as_deref(),
            Some("light")
        );
        assert_eq!(
            bootstrap_theme(&config, Some(""), Some(ResolvedTheme::Light)).as_deref(),
            Some("light")
        );
        assert_eq!(
            bootstrap_theme(&config, Some("system"), Some(ResolvedTheme::Light)).as_deref(),
            Some("light")
        );
        assert_eq!(bootstrap_theme(&config, None, None), None);

        let forced = ThemeConfig::default().with_forced_theme("dark");
        assert_eq!(
            bootstrap_theme(&forced, Some("light"), Some(ResolvedTheme::Light)).as_deref(),
            Some("dark")
        );
    }

    #[test]
    fn test_bootstrap_applies_remap() {
        let config = ThemeConfig::default()
            .with_attribute("class")
            .with_value("dark", "theme-dark");
        let store = MemoryStore::with_value("theme", "dark");
        let appearance = MemoryAppearance::new(ResolvedTheme::Light);
        let root = MemoryRoot::new();

        run_bootstrap(&config, &host(&store, &appearance, &root));
        assert_eq!(root.classes(), vec!["theme-dark"]);
    }

    #[test]
    fn test_bootstrap_is_idempotent() {
        let config = ThemeConfig::default().with_attribute("class");
        let store = MemoryStore::with_value("theme", "dark");
        let appearance = MemoryAppearance::new(ResolvedTheme::Light);

        let once = MemoryRoot::new();
        once.add_class("page");
        run_bootstrap(&config, &host(&store, &appearance, &once));

        let twice = MemoryRoot::new();
        twice.add_class("page");
        run_bootstrap(&config, &host(&store, &appearance, &twice));
        run_bootstrap(&config, &host(&store, &appearance, &twice));

        assert_eq!(once.classes(), twice.classes());
        assert_eq!(once.color_scheme(), twice.color_scheme());
    }

    #[test]
    fn test_bootstrap_survives_unavailable_storage() {
        let config = ThemeConfig::default().with_default_theme("dark");
        let store = MemoryStore::with_value("theme", "light");
        store.set_unavailable(true);
        let root = MemoryRoot::new();

        run_bootstrap(
            &config,
            &host(&store, &MemoryAppearance::unsupported(), &root),
        );
        assert_eq!(root.attribute("data-theme").as_deref(), Some("dark"));
    }

    #[test]
    fn test_bootstrap_then_synchronizer_agree() {
        let config = ThemeConfig::default()
            .with_themes(["light", "dark"])
            .with_default_theme("system")
            .with_attribute("data-theme");
        let store = MemoryStore::new();
        let appearance = MemoryAppearance::new(ResolvedTheme::Dark);
        let root = MemoryRoot::new();

        run_bootstrap(&config, &host(&store, &appearance, &root));
        assert_eq!(root.attribute("data-theme").as_deref(), Some("dark"));

        let sync = ThemeSynchronizer::new(config, host(&store, &appearance, &root));
        assert_eq!(sync.theme(), "system");
        assert_eq!(sync.resolved_theme().as_deref(), Some("dark"));
        assert_eq!(root.attribute("data-theme").as_deref(), Some("dark"));
    }

    /// The generated script evaluated in a JS engine against a stub page.
    mod in_page {
        use super::*;
        use boa_engine::{Context, Source};
        use serde_json::{json, Value};

        // Root element starts with an unrelated `page` class
        const PAGE_STUB: &str = r#"
var root = { attrs: {}, classes: ["page"], style: { colorScheme: "" } };
root.setAttribute = function (k, v) { root.attrs[k] = String(v); };
root.removeAttribute = function (k) { delete root.attrs[k]; };
root.classList = {
    add: function () {
        for (var i = 0; i < arguments.length; i++) {
            if (root.classes.indexOf(arguments[i]) < 0) root.classes.push(arguments[i]);
        }
    },
    remove: function () {
        for (var i = 0; i < arguments.length; i++) {
            var at = root.classes.indexOf(arguments[i]);
            if (at >= 0) root.classes.splice(at, 1);
        }
    }
};
root.style.removeProperty = function (p) {
    if (p === "color-scheme") root.style.colorScheme = "";
};
var document = { documentElement: root };
var stored = __STORED__;
var localStorage = {
    getItem: function (k) {
        if (stored === undefined) throw new Error("SecurityError");
        return Object.prototype.hasOwnProperty.call(stored, k) ? stored[k] : null;
    }
};
var window = {};
if (__DARK__ !== null) {
    window.matchMedia = function (q) {
        return { matches: q === "(prefers-color-scheme: dark)" && __DARK__ };
    };
}
"#;

        /// Run `script` `runs` times and return the root's state.
        /// `storage: None` makes `localStorage` throw; `dark: None` removes `matchMedia`.
        fn run_in_page(
            script: &str,
            runs: usize,
            storage: Option<Value>,
            dark: Option<bool>,
        ) -> Value {
            let stub = PAGE_STUB
                .replace(
                    "__STORED__",
                    &storage.map_or_else(|| "undefined".to_string(), |s| s.to_string()),
                )
                .replace(
                    "__DARK__",
                    &dark.map_or_else(|| "null".to_string(), |d| d.to_string()),
                );

            let mut context = Context::default();
            context.eval(Source::from_bytes(stub.as_bytes())).unwrap();
            for _ in 0..runs {
                context.eval(Source::from_bytes(script.as_bytes())).unwrap();
            }
            let state = context
                .eval(Source::from_bytes(
                    "JSON.stringify({ attrs: root.attrs, classes: root.classes, colorScheme: root.style.colorScheme })",
                ))
                .unwrap();
            let state = state.as_string().unwrap().to_std_string_escaped();
            serde_json::from_str(&state).unwrap()
        }

        #[test]
        fn test_no_stored_value_follows_dark_system() {
            let config = ThemeConfig::default()
                .with_themes(["light", "dark"])
                .with_default_theme("system")
                .with_attribute("data-theme");
            let state = run_in_page(&bootstrap_script(&config), 1, Some(json!({})), Some(true));

            assert_eq!(state["attrs"], json!({"data-theme": "dark"}));
            assert_eq!(state["colorScheme"], "dark");
            assert_eq!(state["classes"], json!(["page"]));
        }

        #[test]
        fn test_running_twice_matches_running_once() {
            let config = ThemeConfig::default()
                .with_attribute("class")
                .with_value("dark", "theme-dark");
            let script = bootstrap_script(&config);
            let storage = json!({"theme": "dark"});

            let once = run_in_page(&script, 1, Some(storage.clone()), Some(false));
            let twice = run_in_page(&script, 2, Some(storage), Some(false));
            assert_eq!(once, twice);
            assert_eq!(once["classes"], json!(["page", "theme-dark"]));
            assert_eq!(once["colorScheme"], "dark");
        }

        #[test]
        fn test_forced_theme_wins() {
            let config = ThemeConfig::default().with_forced_theme("dark");
            let state = run_in_page(
                &bootstrap_script(&config),
                1,
                Some(json!({"theme": "light"})),
                Some(false),
            );
            assert_eq!(state["attrs"], json!({"data-theme": "dark"}));
        }

        #[test]
        fn test_unavailable_storage_and_media() {
            let config = ThemeConfig::default().with_default_theme("dark");
            let state = run_in_page(&bootstrap_script(&config), 1, None, None);
            assert_eq!(state["attrs"], json!({"data-theme": "dark"}));

            // `system` with nothing to resolve it leaves the targets clear
            let state = run_in_page(&bootstrap_script(&ThemeConfig::default()), 1, None, None);
            assert_eq!(state["attrs"], json!({}));
            assert_eq!(state["colorScheme"], "");
        }

        #[test]
        fn test_script_agrees_with_run_bootstrap() {
            let config = ThemeConfig::default()
                .with_themes(["light", "dark", "black"])
                .with_value("black", "oled");
            let cases = [
                (None, Some(ResolvedTheme::Dark)),
                (Some(""), Some(ResolvedTheme::Light)),
                (Some("light"), Some(ResolvedTheme::Dark)),
                (Some("black"), Some(ResolvedTheme::Light)),
                (Some("system"), None),
            ];

            for (stored, system) in cases {
                let storage = match stored {
                    Some(v) => json!({"theme": v}),
                    None => json!({}),
                };
                let state = run_in_page(
                    &bootstrap_script(&config),
                    1,
                    Some(storage),
                    system.map(|s| s == ResolvedTheme::Dark),
                );

                let store = match stored {
                    Some(v) => MemoryStore::with_value("theme", v),
                    None => MemoryStore::new(),
                };
                let appearance = match system {
                    Some(s) => MemoryAppearance::new(s),
                    None => MemoryAppearance::unsupported(),
                };
                let root = MemoryRoot::new();
                run_bootstrap(&config, &host(&store, &appearance, &root));

                let expected_attr = root
                    .attribute("data-theme")
                    .map_or(Value::Null, Value::String);
                assert_eq!(
                    state["attrs"].get("data-theme").cloned().unwrap_or(Value::Null),
                    expected_attr,
                    "stored {:?}, system {:?}",
                    stored,
                    system
                );
                let expected_scheme = root.color_scheme().map_or("", |s| s.as_str());
                assert_eq!(state["colorScheme"], expected_scheme);
            }
        }
    }
}
