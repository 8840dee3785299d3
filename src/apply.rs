//! Writing a resolved theme onto the document root.

use crate::config::ThemeConfig;
use crate::platform::{Cleanup, DocumentRoot};
use crate::theme::{class_names, remap, ResolvedTheme, ThemeAttribute};

/// Write `logical` (already resolved, not yet remapped) to every configured
/// target, then update the color-scheme hint.
///
/// `None` clears the targets: the attribute is removed and theme classes are
/// dropped. This happens when `system` cannot be resolved. Failures are
/// logged and the remaining targets are still written.
pub fn apply_theme<R: DocumentRoot>(
    config: &ThemeConfig,
    root: &R,
    logical: Option<&str>,
    suppress_transitions: bool,
) {
    let effective = logical.map(|l| remap(config, l));

    let guard: Option<Cleanup> = if suppress_transitions {
        root.suppress_transitions(config.nonce.as_deref())
            .map_err(|e| tracing::warn!("Could not suppress transitions: {}", e))
            .ok()
    } else {
        None
    };

    for target in &config.attribute {
        let result = match (target, effective) {
            (ThemeAttribute::Class, name) => root.replace_classes(&class_names(config), name),
            (ThemeAttribute::Attribute(attr), Some(name)) => root.set_attribute(attr, name),
            (ThemeAttribute::Attribute(attr), None) => root.remove_attribute(attr),
        };
        if let Err(e) = result {
            tracing::warn!("Failed to write theme to {}: {}", target.name(), e);
        }
    }

    if config.enable_color_scheme {
        let scheme = logical.and_then(ResolvedTheme::from_name);
        if let Err(e) = root.set_color_scheme(scheme) {
            tracing::warn!("Failed to set color-scheme: {}", e);
        }
    }

    tracing::debug!(theme = ?logical, effective = ?effective, "Applied theme");

    if let Some(guard) = guard {
        guard.run();
    }
}
