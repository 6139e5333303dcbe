//! Language tables for catalog directories.
//!
//! - `registry`: process-wide mapping from internal codes to service codes and display names
//! - `language`: validated `Language` type built from a catalog directory name
//!
//! # Example
//!
//! ```rust,ignore
//! use crate::i18n::Language;
//!
//! let german = Language::from_code("de")?;
//! assert_eq!(german.service_code(), "DE");
//! ```

mod language;
mod registry;

pub use language::Language;
pub use registry::{LanguageConfig, LanguageRegistry};
