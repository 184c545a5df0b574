//! Host setting state container.
//!
//! Holds the mutable settings a fake host exposes to production UI code:
//! fonts, spacing categories, theme, speech rate, feature flags. Every
//! setting has a documented default, mutations are synchronous, and reads
//! never fail — unknown settings degrade to a type-appropriate default
//! instead of erroring.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// =============================================================================
// DEFAULTS
// =============================================================================

/// Default font family
pub const DEFAULT_FONT_NAME: &str = "sans-serif";

/// Default font size in pixels
pub const DEFAULT_FONT_SIZE: f64 = 18.0;

/// Default speech rate multiplier
pub const DEFAULT_SPEECH_RATE: f64 = 1.0;

/// Default line spacing category
pub const DEFAULT_LINE_SPACING: i64 = 1;

/// Default letter spacing category
pub const DEFAULT_LETTER_SPACING: i64 = 0;

/// Default color theme identifier
pub const DEFAULT_COLOR_THEME: i64 = 0;

/// Default highlight granularity
pub const DEFAULT_HIGHLIGHT_GRANULARITY: i64 = 0;

// =============================================================================
// SETTING VALUES
// =============================================================================

/// A dynamically-typed setting value.
///
/// The real host API exposes settings of three primitive shapes; the fake
/// mirrors that so tests can exercise every settings path with one surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SettingValue {
    /// String-valued setting (font name, language code)
    Text(String),
    /// Numeric setting (font size, speech rate, spacing category)
    Number(f64),
    /// Boolean feature flag
    Flag(bool),
}

impl SettingValue {
    /// Interpret as text; non-text values yield the empty string.
    #[must_use]
    pub fn as_text(&self) -> &str {
        match self {
            Self::Text(s) => s,
            _ => "",
        }
    }

    /// Interpret as a number; non-numeric values yield 0.
    #[must_use]
    pub fn as_number(&self) -> f64 {
        match self {
            Self::Number(n) => *n,
            _ => 0.0,
        }
    }

    /// Interpret as a flag; non-flag values yield false.
    #[must_use]
    pub fn as_flag(&self) -> bool {
        match self {
            Self::Flag(b) => *b,
            _ => false,
        }
    }
}

impl From<&str> for SettingValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for SettingValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for SettingValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for SettingValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<bool> for SettingValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

// =============================================================================
// HOST STATE
// =============================================================================

/// Mutable container for every setting the production UI reads or writes.
///
/// Created fresh per test (see [`crate::fixture::HostFixture`]); nothing
/// persists across tests. Writes are immediately observable by subsequent
/// reads and never emit events on their own — callers trigger the
/// [`crate::sink::EventSink`] separately when the real host would.
#[derive(Debug, Clone)]
pub struct HostState {
    settings: HashMap<String, SettingValue>,
}

impl Default for HostState {
    fn default() -> Self {
        Self::new()
    }
}

impl HostState {
    /// Create a state container seeded with documented defaults.
    #[must_use]
    pub fn new() -> Self {
        let mut settings = HashMap::new();
        let _ = settings.insert("fontName".to_string(), DEFAULT_FONT_NAME.into());
        let _ = settings.insert("fontSize".to_string(), DEFAULT_FONT_SIZE.into());
        let _ = settings.insert("lineSpacing".to_string(), DEFAULT_LINE_SPACING.into());
        let _ = settings.insert("letterSpacing".to_string(), DEFAULT_LETTER_SPACING.into());
        let _ = settings.insert("colorTheme".to_string(), DEFAULT_COLOR_THEME.into());
        let _ = settings.insert("speechRate".to_string(), DEFAULT_SPEECH_RATE.into());
        let _ = settings.insert(
            "highlightGranularity".to_string(),
            DEFAULT_HIGHLIGHT_GRANULARITY.into(),
        );
        let _ = settings.insert("linksEnabled".to_string(), true.into());
        let _ = settings.insert("language".to_string(), "".into());
        let _ = settings.insert("isReadAloudEnabled".to_string(), false.into());
        let _ = settings.insert("isSelectable".to_string(), true.into());
        Self { settings }
    }

    /// Read a setting by name.
    ///
    /// Total: unknown settings return the empty-string default rather than
    /// erroring, matching the forgiving surface of the host binding.
    #[must_use]
    pub fn read(&self, name: &str) -> SettingValue {
        self.settings
            .get(name)
            .cloned()
            .unwrap_or_else(|| SettingValue::Text(String::new()))
    }

    /// Write a setting by name.
    ///
    /// No validation beyond type; the new value is visible to the next
    /// `read` in the same turn.
    pub fn write(&mut self, name: impl Into<String>, value: impl Into<SettingValue>) {
        let _ = self.settings.insert(name.into(), value.into());
    }

    /// Number of settings currently stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.settings.len()
    }

    /// Whether the container is empty (never true after `new`).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }

    // -------------------------------------------------------------------------
    // Typed accessors over the dynamic surface
    // -------------------------------------------------------------------------

    /// Current font family.
    #[must_use]
    pub fn font_name(&self) -> String {
        self.read("fontName").as_text().to_string()
    }

    /// Set the font family.
    pub fn set_font_name(&mut self, name: impl Into<String>) {
        self.write("fontName", name.into());
    }

    /// Current font size in pixels.
    #[must_use]
    pub fn font_size(&self) -> f64 {
        self.read("fontSize").as_number()
    }

    /// Set the font size.
    pub fn set_font_size(&mut self, size: f64) {
        self.write("fontSize", size);
    }

    /// Current line spacing category.
    #[must_use]
    pub fn line_spacing(&self) -> f64 {
        self.read("lineSpacing").as_number()
    }

    /// Set the line spacing category.
    pub fn set_line_spacing(&mut self, category: f64) {
        self.write("lineSpacing", category);
    }

    /// Current letter spacing category.
    #[must_use]
    pub fn letter_spacing(&self) -> f64 {
        self.read("letterSpacing").as_number()
    }

    /// Set the letter spacing category.
    pub fn set_letter_spacing(&mut self, category: f64) {
        self.write("letterSpacing", category);
    }

    /// Current color theme identifier.
    #[must_use]
    pub fn color_theme(&self) -> f64 {
        self.read("colorTheme").as_number()
    }

    /// Set the color theme.
    pub fn set_color_theme(&mut self, theme: f64) {
        self.write("colorTheme", theme);
    }

    /// Current speech rate multiplier.
    #[must_use]
    pub fn speech_rate(&self) -> f64 {
        self.read("speechRate").as_number()
    }

    /// Set the speech rate.
    pub fn set_speech_rate(&mut self, rate: f64) {
        self.write("speechRate", rate);
    }

    /// Current highlight granularity.
    #[must_use]
    pub fn highlight_granularity(&self) -> f64 {
        self.read("highlightGranularity").as_number()
    }

    /// Set the highlight granularity.
    pub fn set_highlight_granularity(&mut self, granularity: f64) {
        self.write("highlightGranularity", granularity);
    }

    /// Whether links are rendered as links.
    #[must_use]
    pub fn links_enabled(&self) -> bool {
        self.read("linksEnabled").as_flag()
    }

    /// Enable or disable link rendering.
    pub fn set_links_enabled(&mut self, enabled: bool) {
        self.write("linksEnabled", enabled);
    }

    /// Current content language code.
    #[must_use]
    pub fn language(&self) -> String {
        self.read("language").as_text().to_string()
    }

    /// Set the content language code.
    pub fn set_language(&mut self, code: impl Into<String>) {
        self.write("language", code.into());
    }

    /// Whether read-aloud is enabled.
    #[must_use]
    pub fn is_read_aloud_enabled(&self) -> bool {
        self.read("isReadAloudEnabled").as_flag()
    }

    /// Whether rendered content is selectable.
    #[must_use]
    pub fn is_selectable(&self) -> bool {
        self.read("isSelectable").as_flag()
    }

    // -------------------------------------------------------------------------
    // Category indirection
    // -------------------------------------------------------------------------

    /// Map a line spacing category to its effective value.
    ///
    /// The real host routes categories through a lookup table; the fake maps
    /// every category to itself so assertions stay deterministic.
    #[must_use]
    pub fn line_spacing_value(&self, category: f64) -> f64 {
        category
    }

    /// Map a letter spacing category to its effective value. Identity, like
    /// [`Self::line_spacing_value`].
    #[must_use]
    pub fn letter_spacing_value(&self, category: f64) -> f64 {
        category
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    mod defaults {
        use super::*;

        #[test]
        fn test_documented_defaults() {
            let state = HostState::new();
            assert_eq!(state.font_name(), DEFAULT_FONT_NAME);
            assert_eq!(state.font_size(), DEFAULT_FONT_SIZE);
            assert_eq!(state.speech_rate(), DEFAULT_SPEECH_RATE);
            assert!(state.links_enabled());
            assert!(state.is_selectable());
            assert!(!state.is_read_aloud_enabled());
            assert_eq!(state.language(), "");
        }

        #[test]
        fn test_unknown_setting_reads_empty_text() {
            let state = HostState::new();
            assert_eq!(state.read("noSuchSetting"), SettingValue::Text(String::new()));
        }

        #[test]
        fn test_not_empty_after_new() {
            let state = HostState::new();
            assert!(!state.is_empty());
            assert!(state.len() >= 11);
        }
    }

    mod round_trip {
        use super::*;

        #[test]
        fn test_write_read_text() {
            let mut state = HostState::new();
            state.write("fontName", "serif");
            assert_eq!(state.read("fontName"), SettingValue::Text("serif".into()));
        }

        #[test]
        fn test_write_read_number() {
            let mut state = HostState::new();
            state.write("fontSize", 12.0);
            assert_eq!(state.font_size(), 12.0);
        }

        #[test]
        fn test_write_read_flag() {
            let mut state = HostState::new();
            state.write("linksEnabled", false);
            assert!(!state.links_enabled());
        }

        #[test]
        fn test_write_read_unknown_name_round_trips() {
            let mut state = HostState::new();
            state.write("customFlag", true);
            assert!(state.read("customFlag").as_flag());
        }

        #[test]
        fn test_repeated_writes_no_stale_value() {
            let mut state = HostState::new();
            for size in [12.0, 16.0, 9.0] {
                state.set_font_size(size);
                assert_eq!(state.font_size(), size);
            }
        }
    }

    mod categories {
        use super::*;

        #[test]
        fn test_line_spacing_value_is_identity() {
            let state = HostState::new();
            for c in [0.0, 1.0, 2.0, 3.5] {
                assert_eq!(state.line_spacing_value(c), c);
            }
        }

        #[test]
        fn test_letter_spacing_value_is_identity() {
            let state = HostState::new();
            assert_eq!(state.letter_spacing_value(2.0), 2.0);
        }
    }

    mod coercion {
        use super::*;

        #[test]
        fn test_as_text_on_number_is_empty() {
            assert_eq!(SettingValue::Number(3.0).as_text(), "");
        }

        #[test]
        fn test_as_number_on_text_is_zero() {
            assert_eq!(SettingValue::Text("x".into()).as_number(), 0.0);
        }

        #[test]
        fn test_as_flag_on_text_is_false() {
            assert!(!SettingValue::Text("true".into()).as_flag());
        }
    }
}
