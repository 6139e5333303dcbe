use crate::config::Config;
use crate::retry::{with_backoff, Backoff, RetryConfig};
use anyhow::{bail, Context, Result};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;
use tracing::info;

/// Source language sent by the dialects that expect one.
const SOURCE_LANG: &str = "EN";

/// Request/response conventions of the translation endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    /// Free endpoint (`/translate`): one string per request, `{data}` responses
    #[default]
    Restricted,
    /// Pro endpoint (`/v1/translate`): batched, `{data}` accepted for single texts
    Extended,
    /// Official endpoint (`/v2/translate`): batched, `{translations}` only
    Standard,
}

impl Dialect {
    /// Path appended to the service base URL.
    pub fn path(&self) -> &'static str {
        match self {
            Dialect::Restricted => "/translate",
            Dialect::Extended => "/v1/translate",
            Dialect::Standard => "/v2/translate",
        }
    }

    /// Whether the server accepts a list of texts in one request.
    pub fn supports_batch(&self) -> bool {
        !matches!(self, Dialect::Restricted)
    }

    /// Full endpoint URL for a base URL. A base that already ends with any dialect's
    /// path has it replaced by this dialect's path.
    pub fn endpoint_url(&self, base_url: &str) -> String {
        let base = base_url.trim_end_matches('/');
        // Longest paths first: "/translate" is a suffix of the versioned ones
        let root = [Dialect::Standard, Dialect::Extended, Dialect::Restricted]
            .iter()
            .find_map(|dialect| base.strip_suffix(dialect.path()))
            .unwrap_or(base);
        format!("{}{}", root, self.path())
    }
}

impl FromStr for Dialect {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "restricted" | "free" => Ok(Dialect::Restricted),
            "extended" | "pro" => Ok(Dialect::Extended),
            "standard" | "official" => Ok(Dialect::Standard),
            other => bail!(
                "Unknown endpoint '{}' (expected restricted/free, extended/pro or standard/official)",
                other
            ),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Dialect::Restricted => "restricted",
            Dialect::Extended => "extended",
            Dialect::Standard => "standard",
        };
        f.write_str(name)
    }
}

/// Why a translation call failed.
#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("service overloaded (HTTP 503)")]
    Overloaded,

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("unexpected response format: {0}")]
    UnexpectedFormat(String),

    #[error("legacy single-text response returned for a batch request")]
    LegacyBatchResponse,

    #[error("service returned an empty translation")]
    EmptyTranslation,

    #[error("text {index} of batch failed: {source}")]
    RequestFailed {
        index: usize,
        #[source]
        source: Box<TranslateError>,
    },
}

/// Map an error to its retry behavior: 503 backs off exponentially, other
/// HTTP and network errors linearly, malformed responses are final.
fn backoff_for(error: &TranslateError) -> Backoff {
    match error {
        TranslateError::Overloaded => Backoff::Overloaded,
        TranslateError::Status { .. } | TranslateError::Network(_) => Backoff::Transient,
        _ => Backoff::Fatal,
    }
}

/// An empty string from the service is a failed translation, not a result.
fn non_empty(text: String) -> Result<String, TranslateError> {
    if text.is_empty() {
        Err(TranslateError::EmptyTranslation)
    } else {
        Ok(text)
    }
}

#[derive(Debug, Serialize)]
struct SingleTextRequest<'a> {
    text: &'a str,
    source_lang: &'static str,
    target_lang: &'a str,
}

#[derive(Debug, Serialize)]
struct TextListRequest<'a> {
    text: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    source_lang: Option<&'static str>,
    target_lang: &'a str,
}

#[derive(Debug, Deserialize)]
struct TranslationResponse {
    #[serde(default)]
    translations: Option<Vec<TranslatedText>>,
    /// Legacy single-text shape
    #[serde(default)]
    data: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TranslatedText {
    text: String,
}

/// Client for a DeepL-compatible translation endpoint.
pub struct TranslationClient {
    client: reqwest::Client,
    endpoint: String,
    dialect: Dialect,
    retry: RetryConfig,
    request_delay: Duration,
}

impl TranslationClient {
    /// Create a client for `base_url` using `dialect`'s path and payload conventions.
    pub fn new(client: reqwest::Client, base_url: &str, dialect: Dialect) -> Self {
        Self {
            client,
            endpoint: dialect.endpoint_url(base_url),
            dialect,
            retry: RetryConfig::default(),
            request_delay: Duration::from_millis(500),
        }
    }

    /// Build a client from configuration, with the configured per-request timeout.
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self::new(client, &config.api_url, config.dialect)
            .with_retry(RetryConfig::new(config.max_retries))
            .with_request_delay(config.request_delay))
    }

    /// Set the retry configuration applied to each HTTP call
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Set the pause between the single-text calls of a decomposed batch
    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Translate one text into `target_lang` (a service language code such as "DE").
    pub async fn translate_text(
        &self,
        text: &str,
        target_lang: &str,
    ) -> Result<String, TranslateError> {
        let response = match self.dialect {
            Dialect::Restricted => {
                let request = SingleTextRequest {
                    text,
                    source_lang: SOURCE_LANG,
                    target_lang,
                };
                self.post_with_retry(&request, target_lang).await?
            }
            Dialect::Extended | Dialect::Standard => {
                let texts = [text.to_string()];
                let request = self.text_list_request(&texts, target_lang);
                self.post_with_retry(&request, target_lang).await?
            }
        };

        let TranslationResponse { translations, data } = response;
        let text = match (translations.and_then(|t| t.into_iter().next()), data) {
            (Some(first), _) => first.text,
            (None, Some(data)) if self.dialect != Dialect::Standard => data,
            _ => {
                return Err(TranslateError::UnexpectedFormat(
                    "no translations in response".to_string(),
                ))
            }
        };
        non_empty(text)
    }

    /// Translate a list of texts, preserving order.
    ///
    /// The restricted dialect has no batch support, so the list is sent one text at a
    /// time with `request_delay` between calls; any failed text fails the whole batch.
    /// The returned list is whatever the service sent back; callers should check its length.
    pub async fn translate_batch(
        &self,
        texts: &[String],
        target_lang: &str,
    ) -> Result<Vec<String>, TranslateError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        if !self.dialect.supports_batch() {
            return self.translate_sequentially(texts, target_lang).await;
        }

        let request = self.text_list_request(texts, target_lang);
        let response = self.post_with_retry(&request, target_lang).await?;

        match response {
            TranslationResponse {
                translations: Some(translations),
                ..
            } if !translations.is_empty() => translations
                .into_iter()
                .map(|t| non_empty(t.text))
                .collect(),
            TranslationResponse { data: Some(_), .. } => Err(TranslateError::LegacyBatchResponse),
            _ => Err(TranslateError::UnexpectedFormat(
                "no translations in response".to_string(),
            )),
        }
    }

    async fn translate_sequentially(
        &self,
        texts: &[String],
        target_lang: &str,
    ) -> Result<Vec<String>, TranslateError> {
        let mut translated = Vec::with_capacity(texts.len());

        for (index, text) in texts.iter().enumerate() {
            if index > 0 {
                sleep(self.request_delay).await;
            }

            let result = self
                .translate_text(text, target_lang)
                .await
                .map_err(|source| TranslateError::RequestFailed {
                    index,
                    source: Box::new(source),
                })?;
            translated.push(result);

            if (index + 1) % 10 == 0 {
                info!("Translated {}/{} texts", index + 1, texts.len());
            }
        }

        Ok(translated)
    }

    fn text_list_request<'a>(&self, texts: &'a [String], target_lang: &'a str) -> TextListRequest<'a> {
        TextListRequest {
            text: texts,
            source_lang: (self.dialect == Dialect::Extended).then_some(SOURCE_LANG),
            target_lang,
        }
    }

    async fn post_with_retry<B: Serialize>(
        &self,
        body: &B,
        target_lang: &str,
    ) -> Result<TranslationResponse, TranslateError> {
        with_backoff(
            &self.retry,
            &format!("Translation to {}", target_lang),
            move || self.post(body),
            backoff_for,
        )
        .await
    }

    /// One HTTP attempt.
    async fn post<B: Serialize>(&self, body: &B) -> Result<TranslationResponse, TranslateError> {
        let response = self.client.post(&self.endpoint).json(body).send().await?;

        let status = response.status();
        if status == StatusCode::SERVICE_UNAVAILABLE {
            return Err(TranslateError::Overloaded);
        }
        if status != StatusCode::OK {
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<failed to read body: {}>", e));
            return Err(TranslateError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|_| TranslateError::UnexpectedFormat(body))
    }
}
