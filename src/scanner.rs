//! Scan a catalog root for entries that still need a translation.
//!
//! Layout: `<root>/<language code>/*.po`, one level deep. The `templates`
//! directory holds the `.pot` sources and is never scanned.

use crate::catalog::{self, Entry, CATALOG_EXTENSION};
use crate::i18n::Language;
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Directory name that is never treated as a language.
pub const TEMPLATES_DIR: &str = "templates";

/// Untranslated entries of one catalog file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanResult {
    pub language: Language,
    /// Entries with an empty msgstr and a non-empty msgid, in file order
    pub untranslated: Vec<Entry>,
    /// Number of entries parsed from the file, header included
    pub total: usize,
}

/// Scan results keyed by catalog path. Iteration order is lexicographic by path.
pub type ScanResults = BTreeMap<PathBuf, ScanResult>;

/// List the immediate children of `dir` sorted by path.
fn sorted_children(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory {}", dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()
        .with_context(|| format!("Failed to list directory {}", dir.display()))?;
    paths.sort();
    Ok(paths)
}

fn is_catalog_file(path: &Path) -> bool {
    path.is_file() && path.extension().is_some_and(|ext| ext == CATALOG_EXTENSION)
}

/// Find every catalog file under `root` that has at least one untranslated entry.
///
/// Language directories without a service code mapping are skipped with a warning.
/// Files that are fully translated are left out of the result.
pub fn scan(root: &Path) -> Result<ScanResults> {
    let mut results = ScanResults::new();

    for lang_dir in sorted_children(root)? {
        if !lang_dir.is_dir() {
            continue;
        }
        let Some(dir_name) = lang_dir.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if dir_name == TEMPLATES_DIR {
            continue;
        }

        let language = match Language::from_code(dir_name) {
            Ok(language) => language,
            Err(e) => {
                warn!("{}, skipping...", e);
                continue;
            }
        };

        for path in sorted_children(&lang_dir)? {
            if !is_catalog_file(&path) {
                continue;
            }

            let entries = catalog::parse_file(&path)?;
            let total = entries.len();
            let untranslated: Vec<Entry> = entries
                .into_iter()
                .filter(Entry::needs_translation)
                .collect();

            debug!(
                "{}: {}/{} untranslated",
                path.display(),
                untranslated.len(),
                total
            );

            if !untranslated.is_empty() {
                results.insert(
                    path,
                    ScanResult {
                        language,
                        untranslated,
                        total,
                    },
                );
            }
        }
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const TRANSLATED: &str = "msgid \"\"\nmsgstr \"\"\n\"Language: de\\n\"\n\nmsgid \"Save\"\nmsgstr \"Speichern\"\n";
    const PARTIAL: &str = "msgid \"\"\nmsgstr \"\"\n\"Language: fr\\n\"\n\nmsgid \"Save\"\nmsgstr \"Enregistrer\"\n\nmsgid \"Cancel\"\nmsgstr \"\"\n\nmsgid \"Apply\"\nmsgstr \"\"\n";

    fn write(root: &Path, rel: &str, content: &str) -> PathBuf {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_scan_finds_untranslated_entries() {
        let temp = TempDir::new().unwrap();
        let path = write(temp.path(), "fr/app.po", PARTIAL);

        let results = scan(temp.path()).unwrap();

        assert_eq!(results.len(), 1);
        let result = &results[&path];
        assert_eq!(result.language.code(), "fr");
        assert_eq!(result.language.service_code(), "FR");
        assert_eq!(result.language.name(), "French");
        assert_eq!(result.total, 4);
        let sources: Vec<_> = result
            .untranslated
            .iter()
            .map(|e| e.source_text.as_str())
            .collect();
        assert_eq!(sources, vec!["Cancel", "Apply"]);
    }

    #[test]
    fn test_scan_omits_fully_translated_files() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "de/app.po", TRANSLATED);

        let results = scan(temp.path()).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_scan_skips_templates_dir() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "templates/app.po", PARTIAL);

        let results = scan(temp.path()).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_scan_skips_unsupported_language() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "eo/app.po", PARTIAL);
        let supported = write(temp.path(), "es/app.po", PARTIAL);

        let results = scan(temp.path()).expect("unsupported language must not fail the scan");

        assert_eq!(results.len(), 1);
        assert!(results.contains_key(&supported));
    }

    #[test]
    fn test_scan_ignores_other_extensions_and_nested_dirs() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "it/app.pot", PARTIAL);
        write(temp.path(), "it/notes.txt", PARTIAL);
        write(temp.path(), "it/nested/app.po", PARTIAL);
        write(temp.path(), "README.po", PARTIAL);

        let results = scan(temp.path()).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_scan_is_idempotent() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "fr/app.po", PARTIAL);
        write(temp.path(), "ja/app.po", PARTIAL);
        write(temp.path(), "de/app.po", TRANSLATED);

        let first = scan(temp.path()).unwrap();
        let second = scan(temp.path()).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn test_scan_results_are_ordered_by_path() {
        let temp = TempDir::new().unwrap();
        let ja = write(temp.path(), "ja/app.po", PARTIAL);
        let de = write(temp.path(), "de/b.po", PARTIAL);
        let de_a = write(temp.path(), "de/a.po", PARTIAL);

        let results = scan(temp.path()).unwrap();
        let keys: Vec<_> = results.keys().cloned().collect();
        assert_eq!(keys, vec![de_a, de, ja]);
    }

    #[test]
    fn test_scan_missing_root_is_error() {
        let result = scan(Path::new("/nonexistent/po"));
        assert!(result.is_err());
    }
}
