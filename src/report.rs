//! Human-readable summary of untranslated entries.

use crate::scanner::ScanResults;
use std::fmt::Write;

/// Untranslated entries listed per file before collapsing to "... and N more".
const PREVIEW_ENTRIES: usize = 5;

/// Characters of a message shown in previews.
const PREVIEW_CHARS: usize = 60;

/// Truncate `text` to the preview length without splitting a character.
pub fn preview(text: &str) -> &str {
    match text.char_indices().nth(PREVIEW_CHARS) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

fn rule() -> String {
    "=".repeat(80)
}

/// Total untranslated entries across all files.
pub fn total_untranslated(results: &ScanResults) -> usize {
    results.values().map(|r| r.untranslated.len()).sum()
}

/// Render the report for `results`.
pub fn format_report(results: &ScanResults) -> String {
    let mut out = String::new();

    // Writing to a String cannot fail
    let _ = writeln!(out, "{}", rule());
    let _ = writeln!(out, "Untranslated .po file entries report");
    let _ = writeln!(out, "{}", rule());
    let _ = writeln!(out);

    for (path, result) in results {
        let untranslated = &result.untranslated;

        let _ = writeln!(out, "File: {}", path.display());
        let _ = writeln!(out, "Language: {}", result.language);
        let _ = writeln!(out, "Untranslated: {}/{}", untranslated.len(), result.total);
        let _ = writeln!(out);

        for (i, entry) in untranslated.iter().take(PREVIEW_ENTRIES).enumerate() {
            let _ = writeln!(out, "  [{}] msgid: {}...", i + 1, preview(&entry.source_text));
        }
        if untranslated.len() > PREVIEW_ENTRIES {
            let _ = writeln!(
                out,
                "  ... and {} more",
                untranslated.len() - PREVIEW_ENTRIES
            );
        }
        let _ = writeln!(out);
    }

    let _ = writeln!(out, "{}", rule());
    let _ = writeln!(out, "Total untranslated entries: {}", total_untranslated(results));
    let _ = writeln!(out, "{}", rule());

    out
}

/// Print the report to stdout.
pub fn print_report(results: &ScanResults) {
    print!("{}", format_report(results));
}
