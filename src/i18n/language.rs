//! Language type: a catalog language validated against the registry.
//!
//! Catalog directories are named after internal language codes. A `Language`
//! can only be constructed for codes the translation service supports, so code
//! holding one never has to handle a missing service code.

use crate::i18n::{LanguageConfig, LanguageRegistry};
use anyhow::{bail, Result};
use std::fmt;

/// A validated catalog language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Language {
    config: LanguageConfig,
}

impl Language {
    /// Create a Language from an internal language code (a catalog directory name).
    ///
    /// # Returns
    /// * `Ok(Language)` if the translation service supports the code
    /// * `Err` if no service code is mapped for it
    pub fn from_code(code: &str) -> Result<Language> {
        match LanguageRegistry::get().get_by_code(code) {
            Some(config) => Ok(Language { config }),
            None => bail!("Language '{}' is not supported by the translation service", code),
        }
    }

    /// Internal code (e.g., "de", "zh_Hans").
    pub fn code(&self) -> &'static str {
        self.config.code
    }

    /// Code sent to the translation service (e.g., "DE", "ZH").
    pub fn service_code(&self) -> &'static str {
        self.config.service_code
    }

    /// Display name, falling back to the internal code.
    pub fn name(&self) -> &'static str {
        self.config.display_name()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} -> service: {})",
            self.name(),
            self.code(),
            self.service_code()
        )
    }
}
