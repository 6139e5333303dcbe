//! Language registry: lookup tables for catalog language directories.
//!
//! Catalog directories are named with internal language codes (`de`, `zh_Hans`, ...).
//! The translation service uses its own codes (`DE`, `ZH`, ...), and reports show a
//! human-readable name. Both tables live in a process-wide singleton built once
//! with `OnceLock` and never mutated afterwards.

use std::collections::HashMap;
use std::sync::OnceLock;

/// Internal code -> translation service code.
const SERVICE_CODES: &[(&str, &str)] = &[
    ("zh_Hans", "ZH"),
    ("de", "DE"),
    ("es", "ES"),
    ("fr", "FR"),
    ("it", "IT"),
    ("ja", "JA"),
    ("ko", "KO"),
    ("ru", "RU"),
    ("pl", "PL"),
    ("tr", "TR"),
    ("uk", "UK"),
    ("nl", "NL"),
    ("id", "ID"),
    ("pt", "PT"),
    ("sv", "SV"),
    ("da", "DA"),
    ("fi", "FI"),
    ("no", "NB"),
    ("cs", "CS"),
    ("el", "EL"),
    ("hu", "HU"),
    ("ro", "RO"),
    ("sk", "SK"),
    ("bg", "BG"),
    ("lt", "LT"),
    ("lv", "LV"),
    ("et", "ET"),
    ("sl", "SL"),
];

/// Internal code -> display name. Not every supported code has one.
const DISPLAY_NAMES: &[(&str, &str)] = &[
    ("zh_Hans", "Simplified Chinese"),
    ("de", "German"),
    ("es", "Spanish"),
    ("fr", "French"),
    ("it", "Italian"),
    ("ja", "Japanese"),
    ("ko", "Korean"),
    ("ru", "Russian"),
    ("pl", "Polish"),
    ("tr", "Turkish"),
    ("uk", "Ukrainian"),
    ("nl", "Dutch"),
    ("id", "Indonesian"),
];

/// Configuration for a language the translation service can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageConfig {
    /// Internal code, as used for the catalog directory name (e.g., "de", "zh_Hans")
    pub code: &'static str,

    /// Code understood by the translation service (e.g., "DE", "ZH")
    pub service_code: &'static str,

    /// English display name, if one is registered
    pub name: Option<&'static str>,
}

impl LanguageConfig {
    /// Display name, falling back to the internal code.
    pub fn display_name(&self) -> &'static str {
        self.name.unwrap_or(self.code)
    }
}

/// Global language registry singleton.
pub struct LanguageRegistry {
    service_codes: HashMap<&'static str, &'static str>,
    display_names: HashMap<&'static str, &'static str>,
}

/// Global registry instance (initialized lazily)
static REGISTRY: OnceLock<LanguageRegistry> = OnceLock::new();

impl LanguageRegistry {
    /// Get the global language registry instance.
    pub fn get() -> &'static LanguageRegistry {
        REGISTRY.get_or_init(|| LanguageRegistry {
            service_codes: SERVICE_CODES.iter().copied().collect(),
            display_names: DISPLAY_NAMES.iter().copied().collect(),
        })
    }

    /// Get the language configuration for an internal code.
    ///
    /// # Returns
    /// * `Some(LanguageConfig)` if the service supports the language
    /// * `None` if there is no service code mapping for it
    pub fn get_by_code(&self, code: &str) -> Option<LanguageConfig> {
        let (&code, &service_code) = self.service_codes.get_key_value(code)?;
        Some(LanguageConfig {
            code,
            service_code,
            name: self.display_names.get(code).copied(),
        })
    }
}
