//! Session-scoped configuration and the persisted theme preference.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{LABEL_WIDTH, NAME_PREFIX, NEIGHBOR_SPAN, PAGE_SIZE, PREVIEW_BASE_URL, THEME_KEY};

// ============================================
// ViewConfig
// ============================================

/// Knobs for one collection view session. Passed to the view at
/// construction; there is no process-wide copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Initial reveal count and disclosure increment.
    pub page_size: usize,
    /// Items on each side of the current item in the neighbor window.
    pub neighbor_span: usize,
    /// Name token in display labels.
    pub name_prefix: String,
    /// Zero-padding width of the ordinal in display labels.
    pub label_width: usize,
    /// Prefix joined with an identifier to reference its preview.
    pub preview_base_url: String,
    /// Reset disclosure to one page whenever the filter state changes.
    pub reset_disclosure_on_filter_change: bool,
}

impl Default for ViewConfig {
    fn default() -> Self {
        ViewConfig {
            page_size: PAGE_SIZE,
            neighbor_span: NEIGHBOR_SPAN,
            name_prefix: NAME_PREFIX.to_string(),
            label_width: LABEL_WIDTH,
            preview_base_url: PREVIEW_BASE_URL.to_string(),
            reset_disclosure_on_filter_change: true,
        }
    }
}

impl ViewConfig {
    /// Display label for a 1-based catalog ordinal: `purrbang007`.
    pub fn display_label(&self, ordinal: usize) -> String {
        format!(
            "{}{:0width$}",
            self.name_prefix,
            ordinal,
            width = self.label_width
        )
    }

    /// Display label for a 0-based catalog position.
    pub fn label_for_position(&self, position: usize) -> String {
        self.display_label(position + 1)
    }

    pub fn image_ref(&self, id: &str) -> String {
        format!("{}{}", self.preview_base_url, id)
    }
}

// ============================================
// Preferences
// ============================================

/// Minimal key-value store for user preferences (browser local storage,
/// a settings file, or memory).
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    pub fn parse(value: &str) -> Option<Theme> {
        match value {
            "dark" => Some(Theme::Dark),
            "light" => Some(Theme::Light),
            _ => None,
        }
    }

    /// Stored theme, or Dark when nothing valid is stored.
    pub fn load(store: &dyn PreferenceStore) -> Theme {
        store
            .get(THEME_KEY)
            .and_then(|value| Theme::parse(&value))
            .unwrap_or_default()
    }

    pub fn store(self, store: &mut dyn PreferenceStore) {
        store.set(THEME_KEY, self.as_str());
    }

    pub fn toggled(self) -> Theme {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    /// Flip the theme and persist the new value.
    pub fn toggle(&mut self, store: &mut dyn PreferenceStore) {
        *self = self.toggled();
        self.store(store);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_label_pads_to_width() {
        let config = ViewConfig::default();
        assert_eq!(config.display_label(7), "purrbang007");
        assert_eq!(config.display_label(42), "purrbang042");
        assert_eq!(config.display_label(1234), "purrbang1234");
        assert_eq!(config.label_for_position(0), "purrbang001");
    }

    #[test]
    fn test_image_ref() {
        let config = ViewConfig::default();
        assert_eq!(config.image_ref("abci0"), "https://ordinals.com/preview/abci0");
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: ViewConfig = serde_json::from_str(r#"{"page_size": 12}"#).unwrap();
        assert_eq!(config.page_size, 12);
        assert_eq!(config.neighbor_span, NEIGHBOR_SPAN);
        assert!(config.reset_disclosure_on_filter_change);
    }

    #[test]
    fn test_theme_defaults_to_dark() {
        let mut store = MemoryStore::new();
        assert_eq!(Theme::load(&store), Theme::Dark);
        store.set(THEME_KEY, "sepia");
        assert_eq!(Theme::load(&store), Theme::Dark);
    }

    #[test]
    fn test_theme_toggle_persists() {
        let mut store = MemoryStore::new();
        let mut theme = Theme::load(&store);
        theme.toggle(&mut store);
        assert_eq!(theme, Theme::Light);
        assert_eq!(store.get(THEME_KEY).as_deref(), Some("light"));
        assert_eq!(Theme::load(&store), Theme::Light);

        theme.toggle(&mut store);
        assert_eq!(Theme::load(&store), Theme::Dark);
    }
}
