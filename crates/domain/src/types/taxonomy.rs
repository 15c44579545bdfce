//! Translatable lookup records: locales, categories, areas and UI labels
//!
//! Every translatable record carries a `translation_key` shared by all of
//! its locale-specific copies, so a record picked in one locale can be
//! mapped to its counterpart in another.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AreaId, CategoryId, LocaleId};

/// A content locale (`en`, `cy`, ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locale {
    pub id: LocaleId,
    pub language_code: String,
}

impl Locale {
    /// Whether this locale is the given language, ignoring case and region.
    pub fn is_language(&self, code: &str) -> bool {
        let base = self.language_code.split(['-', '_']).next().unwrap_or_default();
        base.eq_ignore_ascii_case(code)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.language_code)
    }
}

/// Event category used as a filter dimension
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventsCategory {
    pub id: CategoryId,
    pub name: Option<String>,
    pub translation_key: Uuid,
    pub locale_id: LocaleId,
}

impl fmt::Display for EventsCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name.as_deref().unwrap_or_default())
    }
}

/// Geographic area used as a filter dimension
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventArea {
    pub id: AreaId,
    pub name: String,
    pub description: Option<String>,
    pub translation_key: Uuid,
    pub locale_id: LocaleId,
}

impl fmt::Display for EventArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Locale-scoped UI copy, unique per `(key, locale)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub id: i64,
    pub key: String,
    pub value: String,
    pub locale_id: LocaleId,
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (locale {})", self.key, self.locale_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_match_ignores_region_and_case() {
        let locale = Locale { id: 2, language_code: "CY-gb".into() };

        assert!(locale.is_language("cy"));
        assert!(!locale.is_language("en"));
    }

    #[test]
    fn label_display_includes_locale() {
        let label = Label { id: 1, key: "search".into(), value: "Chwilio".into(), locale_id: 2 };
        assert_eq!(label.to_string(), "search (locale 2)");
    }

    #[test]
    fn unnamed_category_displays_empty() {
        let category =
            EventsCategory { id: 1, name: None, translation_key: Uuid::new_v4(), locale_id: 1 };
        assert_eq!(category.to_string(), "");
    }
}
