//! Drive batched translation of scan results and write the catalogs back.
//!
//! Files are processed in path order. Each file's untranslated entries are sent in
//! batches of `batch_size`; successful batches are spliced into the file text by
//! replacing each entry's original block. After `MAX_CONSECUTIVE_FAILURES` failed
//! batches in a row the whole run stops, since the service is most likely
//! rate-limiting us or down.

use crate::catalog::{apply_translation, Entry};
use crate::config::Config;
use crate::report::preview;
use crate::scanner::ScanResults;
use crate::translation::TranslationClient;
use anyhow::{Context, Result};
use std::path::Path;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Failed batches in a row that stop the run.
pub const MAX_CONSECUTIVE_FAILURES: u32 = 3;

/// Batching and pacing options.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub batch_size: usize,
    /// Pause between consecutive batches of a file
    pub batch_delay: Duration,
    pub dry_run: bool,
}

impl BatchOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            batch_size: config.batch_size,
            batch_delay: config.batch_delay,
            dry_run: config.dry_run,
        }
    }
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            batch_size: 10,
            batch_delay: Duration::from_millis(500),
            dry_run: false,
        }
    }
}

fn log_halt(consecutive_failures: u32, total_translated: usize) {
    warn!(
        "Stopping translation: {} consecutive failures detected",
        consecutive_failures
    );
    warn!("This usually means the service is rate-limiting this client or is temporarily unavailable");
    warn!("Wait 30-60 minutes before trying again, use a longer --delay (e.g., --delay 5.0), or try a different --endpoint");
    info!(
        "Progress saved: {} entries translated so far",
        total_translated
    );
}

fn write_catalog(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write catalog file {}", path.display()))?;
    info!("Updated {}", path.display());
    Ok(())
}

/// Translate every untranslated entry in `results`.
///
/// Returns the number of entries translated. Translation failures never surface as
/// errors; only filesystem errors do.
pub async fn run(
    results: &ScanResults,
    client: &TranslationClient,
    options: &BatchOptions,
) -> Result<usize> {
    let batch_size = options.batch_size.max(1);
    let mut total_translated = 0usize;
    let mut consecutive_failures = 0u32;

    for (path, result) in results {
        if consecutive_failures >= MAX_CONSECUTIVE_FAILURES {
            log_halt(consecutive_failures, total_translated);
            return Ok(total_translated);
        }

        let language = &result.language;

        info!("Processing: {}", path.display());
        info!("Language: {}", language);
        info!("Endpoint: {} ({})", client.dialect(), client.endpoint());
        info!("Untranslated entries: {}", result.untranslated.len());

        if options.dry_run {
            info!("[DRY RUN] Skipping actual translation");
            continue;
        }

        let mut content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog file {}", path.display()))?;

        let batch_count = result.untranslated.len().div_ceil(batch_size);
        let mut halted = false;

        for (batch_index, batch) in result.untranslated.chunks(batch_size).enumerate() {
            if consecutive_failures >= MAX_CONSECUTIVE_FAILURES {
                halted = true;
                break;
            }

            let entries: Vec<&Entry> = batch
                .iter()
                .filter(|entry| !entry.source_text.is_empty())
                .collect();
            let sources: Vec<String> = entries.iter().map(|e| e.source_text.clone()).collect();

            info!(
                "  [batch {}/{}] Translating {} entries",
                batch_index + 1,
                batch_count,
                sources.len()
            );

            match client
                .translate_batch(&sources, language.service_code())
                .await
            {
                Ok(translations) if translations.len() == sources.len() => {
                    for (entry, translation) in entries.iter().zip(&translations) {
                        let new_block = apply_translation(&entry.raw_block, translation);
                        content = content.replace(&entry.raw_block, &new_block);
                        total_translated += 1;
                        debug!(
                            "    {} -> {}",
                            preview(&entry.source_text),
                            preview(translation)
                        );
                    }
                    consecutive_failures = 0;
                }
                Ok(translations) => {
                    consecutive_failures += 1;
                    warn!(
                        "  Batch {}/{} failed: expected {} translations, got {} (consecutive failures: {})",
                        batch_index + 1,
                        batch_count,
                        sources.len(),
                        translations.len(),
                        consecutive_failures
                    );
                }
                Err(e) => {
                    consecutive_failures += 1;
                    warn!(
                        "  Batch {}/{} failed: {} (consecutive failures: {})",
                        batch_index + 1,
                        batch_count,
                        e,
                        consecutive_failures
                    );
                }
            }

            let more_batches = batch_index + 1 < batch_count;
            if more_batches && consecutive_failures < MAX_CONSECUTIVE_FAILURES {
                sleep(options.batch_delay).await;
            }
        }

        // Keyed off the run-wide total, so a file with no successes of its own is
        // still rewritten once any earlier file succeeded.
        if total_translated > 0 {
            write_catalog(path, &content)?;
        }

        if halted {
            log_halt(consecutive_failures, total_translated);
            return Ok(total_translated);
        }
    }

    Ok(total_translated)
}
