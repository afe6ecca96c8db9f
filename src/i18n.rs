//! Locale catalog — key -> string lookup with a fallback locale
//!
//! The built-in catalog carries English and Tamil entries; an optional TOML
//! file loaded at startup can add locales or override strings. Unknown
//! locales and unknown keys fall back to the default locale.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

use crate::error::Error;

/// File shape: `[locale.<tag>]` tables of key -> string.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    locale: HashMap<String, HashMap<String, String>>,
}

/// Immutable locale catalog, built once at startup.
#[derive(Debug, Clone)]
pub struct Catalog {
    default_locale: String,
    tables: HashMap<String, HashMap<String, String>>,
}

impl Catalog {
    /// Built-in strings matching the dashboard's English and Tamil labels.
    pub fn builtin(default_locale: &str) -> Self {
        let mut tables = HashMap::new();

        let en: HashMap<String, String> = [
            ("recommendation_title", "AI-Based Smart Irrigation Suggestions"),
            ("dashboard_title", "Smart Irrigation System Dashboard"),
            ("settings_saved", "Settings saved."),
            ("telemetry_ok", "Data sent successfully to the telemetry channel."),
            ("telemetry_failed", "Failed to send data to the telemetry channel."),
            ("viewing_language", "You are viewing the English version."),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let ta: HashMap<String, String> = [
            ("recommendation_title", "ஸ்மார்ட் ஆர்ிகேஷன் பரிந்துரைகள்"),
            ("viewing_language", "நீங்கள் தமிழ் பதிப்பை பார்க்கிறீர்கள்."),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        tables.insert("en".to_string(), en);
        tables.insert("ta".to_string(), ta);

        Self {
            default_locale: default_locale.to_string(),
            tables,
        }
    }

    /// Merge a TOML catalog file over the built-in strings.
    pub fn load(default_locale: &str, path: &Path) -> Result<Self, Error> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::MissingConfiguration(format!("cannot read catalog {}: {e}", path.display()))
        })?;
        let file: CatalogFile = toml::from_str(&raw).map_err(|e| {
            Error::MissingConfiguration(format!("cannot parse catalog {}: {e}", path.display()))
        })?;

        let mut catalog = Self::builtin(default_locale);
        for (locale, entries) in file.locale {
            catalog.tables.entry(locale).or_default().extend(entries);
        }
        info!(path = %path.display(), locales = catalog.tables.len(), "Loaded locale catalog");
        Ok(catalog)
    }

    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }

    /// Look up a key, falling back to the default locale, then the key itself.
    pub fn lookup(&self, locale: &str, key: &str) -> String {
        self.tables
            .get(locale)
            .and_then(|t| t.get(key))
            .or_else(|| {
                self.tables
                    .get(&self.default_locale)
                    .and_then(|t| t.get(key))
            })
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }

    /// Full table for a locale with fallback entries filled in. Used by the
    /// UI shell to fetch all labels in one request.
    pub fn table(&self, locale: &str) -> HashMap<String, String> {
        let mut merged = self
            .tables
            .get(&self.default_locale)
            .cloned()
            .unwrap_or_default();
        if let Some(overlay) = self.tables.get(locale) {
            merged.extend(overlay.clone());
        }
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_lookup_known_locale() {
        let catalog = Catalog::builtin("en");
        assert_eq!(
            catalog.lookup("ta", "viewing_language"),
            "நீங்கள் தமிழ் பதிப்பை பார்க்கிறீர்கள்."
        );
    }

    #[test]
    fn test_lookup_falls_back_to_default_locale() {
        let catalog = Catalog::builtin("en");
        // Tamil table has no entry for this key.
        assert_eq!(catalog.lookup("ta", "settings_saved"), "Settings saved.");
        // Unknown locale falls back entirely.
        assert_eq!(
            catalog.lookup("fr", "dashboard_title"),
            "Smart Irrigation System Dashboard"
        );
    }

    #[test]
    fn test_lookup_unknown_key_returns_key() {
        let catalog = Catalog::builtin("en");
        assert_eq!(catalog.lookup("en", "no_such_key"), "no_such_key");
    }

    #[test]
    fn test_table_merges_fallback() {
        let catalog = Catalog::builtin("en");
        let ta = catalog.table("ta");
        // Overridden in Tamil
        assert_eq!(
            ta.get("viewing_language").map(String::as_str),
            Some("நீங்கள் தமிழ் பதிப்பை பார்க்கிறீர்கள்.")
        );
        // Filled from English fallback
        assert_eq!(ta.get("settings_saved").map(String::as_str), Some("Settings saved."));
    }

    #[test]
    fn test_load_merges_file_over_builtin() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[locale.en]\nsettings_saved = \"Saved!\"\n\n[locale.fr]\nsettings_saved = \"Enregistré.\""
        )
        .unwrap();

        let catalog = Catalog::load("en", file.path()).unwrap();
        assert_eq!(catalog.lookup("en", "settings_saved"), "Saved!");
        assert_eq!(catalog.lookup("fr", "settings_saved"), "Enregistré.");
        // Untouched built-in key survives the merge.
        assert_eq!(
            catalog.lookup("en", "dashboard_title"),
            "Smart Irrigation System Dashboard"
        );
    }
}
