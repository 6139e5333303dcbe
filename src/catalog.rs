//! Catalog (.po) parsing and textual writeback.
//!
//! This is deliberately text-based: entries are blank-line separated blocks, and
//! `msgid`/`msgstr` are pulled out with regexes. Escaped quotes, plural forms and
//! flags are not understood. Writeback is a literal substring replacement of the
//! empty `msgstr ""` marker, with no escaping of the inserted translation.

use anyhow::{Context, Result};
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

/// File extension of catalog files.
pub const CATALOG_EXTENSION: &str = "po";

/// The empty target-text marker that writeback replaces.
const EMPTY_MSGSTR: &str = r#"msgstr """#;

/// One msgid/msgstr pair and the block it was parsed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub source_text: String,
    pub target_text: String,
    /// Exact original text of the block, used as the replacement key on writeback
    pub raw_block: String,
    pub is_empty: bool,
}

impl Entry {
    /// Empty translation with something to translate.
    pub fn needs_translation(&self) -> bool {
        self.is_empty && !self.source_text.is_empty()
    }
}

struct Patterns {
    block_separator: Regex,
    msgid: Regex,
    msgstr: Regex,
    msgid_multiline: Regex,
    msgstr_multiline: Regex,
    quoted: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        block_separator: Regex::new(r"\n\n+").expect("valid block separator regex"),
        msgid: Regex::new(r#"msgid\s+"([^"]*)""#).expect("valid msgid regex"),
        msgstr: Regex::new(r#"msgstr\s+"([^"]*)""#).expect("valid msgstr regex"),
        msgid_multiline: Regex::new(r#"msgid\s+""\n((?:\s*"[^"]*"\n?)+)"#)
            .expect("valid multi-line msgid regex"),
        msgstr_multiline: Regex::new(r#"msgstr\s+""\n((?:\s*"[^"]*"\n?)+)"#)
            .expect("valid multi-line msgstr regex"),
        quoted: Regex::new(r#""([^"]*)""#).expect("valid quoted string regex"),
    })
}

/// Concatenate the continuation lines of a multi-line field, if the block uses that form.
fn multiline_value(pattern: &Regex, block: &str) -> Option<String> {
    let lines = pattern.captures(block)?.get(1)?.as_str();
    Some(
        patterns()
            .quoted
            .captures_iter(lines)
            .filter_map(|c| c.get(1))
            .map(|m| m.as_str())
            .collect(),
    )
}

fn parse_block(block: &str) -> Option<Entry> {
    let p = patterns();

    let mut source_text = p.msgid.captures(block)?.get(1)?.as_str().to_string();
    let mut target_text = p.msgstr.captures(block)?.get(1)?.as_str().to_string();

    if block.contains(r#""""#) {
        if let Some(joined) = multiline_value(&p.msgid_multiline, block) {
            source_text = joined;
        }
        if let Some(joined) = multiline_value(&p.msgstr_multiline, block) {
            target_text = joined;
        }
    }

    Some(Entry {
        is_empty: target_text.is_empty(),
        source_text,
        target_text,
        raw_block: block.to_string(),
    })
}

/// Parse catalog text into entries.
///
/// Blocks without both a `msgid` and a `msgstr` field are skipped.
pub fn parse(content: &str) -> Vec<Entry> {
    patterns()
        .block_separator
        .split(content)
        .filter(|block| !block.trim().is_empty())
        .filter_map(parse_block)
        .collect()
}

/// Read and parse a catalog file.
pub fn parse_file(path: &Path) -> Result<Vec<Entry>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog file {}", path.display()))?;
    Ok(parse(&content))
}

/// Rewrite a block so its empty `msgstr ""` carries `translation`.
///
/// The translation is inserted verbatim; a `"` in it produces a broken block.
pub fn apply_translation(raw_block: &str, translation: &str) -> String {
    raw_block.replace(EMPTY_MSGSTR, &format!(r#"msgstr "{}""#, translation))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const HEADER: &str = r#"msgid ""
msgstr ""
"Content-Type: text/plain; charset=UTF-8\n"
"Language: de\n""#;

    // ==================== Single-line Entries ====================

    #[test]
    fn test_parse_single_line_entries() {
        let content = format!(
            "{}\n\nmsgid \"Save\"\nmsgstr \"Speichern\"\n\nmsgid \"Cancel\"\nmsgstr \"\"\n",
            HEADER
        );
        let entries = parse(&content);

        // Header is an entry too (empty msgid), but never needs translation
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[1].source_text, "Save");
        assert_eq!(entries[1].target_text, "Speichern");
        assert!(!entries[1].is_empty);

        assert_eq!(entries[2].source_text, "Cancel");
        assert!(entries[2].is_empty);
        assert!(entries[2].needs_translation());
    }

    #[test]
    fn test_header_is_not_untranslated() {
        let entries = parse(HEADER);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].source_text, "");
        assert!(entries[0].target_text.starts_with("Content-Type"));
        assert!(!entries[0].needs_translation());
    }

    #[test]
    fn test_raw_block_is_exact_text() {
        let block = "#: view.js:12\nmsgid \"Apply\"\nmsgstr \"\"";
        let content = format!("{}\n\n\n{}\n\n", HEADER, block);
        let entries = parse(&content);

        assert_eq!(entries[1].raw_block, block);
    }

    #[test]
    fn test_comment_only_block_is_skipped() {
        let content = "# Translators: keep short\n\nmsgid \"OK\"\nmsgstr \"\"\n";
        let entries = parse(content);

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].source_text, "OK");
    }

    #[test]
    fn test_block_without_msgstr_is_skipped() {
        let entries = parse("msgid \"Dangling\"\n");
        assert!(entries.is_empty());
    }

    #[test]
    fn test_empty_content() {
        assert!(parse("").is_empty());
        assert!(parse("\n\n\n").is_empty());
    }

    // ==================== Multi-line Entries ====================

    #[test]
    fn test_parse_multiline_msgid() {
        let content = "msgid \"\"\n\"A long sentence \"\n\"split in two.\"\nmsgstr \"\"\n";
        let entries = parse(content);

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].source_text, "A long sentence split in two.");
        assert!(entries[0].is_empty);
    }

    #[test]
    fn test_parse_multiline_msgstr() {
        let content = "msgid \"Hello world\"\nmsgstr \"\"\n\"Hallo \"\n\"Welt\"\n";
        let entries = parse(content);

        assert_eq!(entries[0].source_text, "Hello world");
        assert_eq!(entries[0].target_text, "Hallo Welt");
        assert!(!entries[0].is_empty);
    }

    #[test]
    fn test_parse_indented_continuation_lines() {
        let content = "msgid \"\"\n  \"Indented \"\n  \"lines\"\nmsgstr \"\"\n";
        let entries = parse(content);

        assert_eq!(entries[0].source_text, "Indented lines");
    }

    #[test]
    fn test_escaped_quotes_are_not_understood() {
        // Matching stops at the backslash-escaped quote
        let content = "msgid \"Say \\\"hi\\\"\"\nmsgstr \"\"\n";
        let entries = parse(content);

        assert_eq!(entries[0].source_text, "Say \\");
    }

    // ==================== Writeback ====================

    #[test]
    fn test_apply_translation() {
        let block = "msgid \"Save\"\nmsgstr \"\"";
        assert_eq!(
            apply_translation(block, "Speichern"),
            "msgid \"Save\"\nmsgstr \"Speichern\""
        );
    }

    #[test]
    fn test_apply_translation_leaves_msgid_alone() {
        let block = "msgid \"\"\n\"Multi \"\n\"line\"\nmsgstr \"\"";
        let updated = apply_translation(block, "Mehrzeilig");

        assert!(updated.starts_with("msgid \"\"\n"));
        assert!(updated.ends_with("msgstr \"Mehrzeilig\""));
    }

    #[test]
    fn test_apply_translation_without_empty_marker_is_noop() {
        let block = "msgid \"Save\"\nmsgstr \"Speichern\"";
        assert_eq!(apply_translation(block, "Sichern"), block);
    }

    #[test]
    fn test_parse_file_missing() {
        let result = parse_file(Path::new("/nonexistent/catalog.po"));
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Failed to read catalog file"));
    }

    // ==================== Properties ====================

    fn text() -> impl Strategy<Value = String> {
        "[A-Za-z0-9 .,:!?-]{1,40}"
    }

    proptest! {
        #[test]
        fn prop_fully_translated_catalog_has_no_empty_entries(
            pairs in prop::collection::vec((text(), text()), 0..20)
        ) {
            let content = pairs
                .iter()
                .map(|(id, s)| format!("msgid \"{}\"\nmsgstr \"{}\"", id, s))
                .collect::<Vec<_>>()
                .join("\n\n");

            let entries = parse(&content);
            prop_assert_eq!(entries.len(), pairs.len());
            prop_assert!(entries.iter().all(|e| !e.is_empty));
        }

        #[test]
        fn prop_writeback_then_parse(source in text(), translation in text()) {
            let block = format!("msgid \"{}\"\nmsgstr \"\"", source);
            let entry = &parse(&block)[0];
            prop_assert!(entry.is_empty);

            let entries = parse(&apply_translation(&entry.raw_block, &translation));
            prop_assert_eq!(entries.len(), 1);
            prop_assert!(!entries[0].is_empty);
            prop_assert_eq!(&entries[0].target_text, &translation);
            prop_assert_eq!(&entries[0].source_text, &source);
        }
    }
}
