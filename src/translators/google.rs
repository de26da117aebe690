use std::time::Duration;
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use serde_json::Value;
use url::Url;

use crate::errors::TranslationError;
use crate::translators::Translator;

/// Client for Google's public web-translate endpoint
///
/// This is the same unauthenticated endpoint the web widget uses: a GET with
/// `client=gtx` and `sl=auto` returns a nested JSON array whose first element
/// holds the translated segments. No API key is involved, which also means
/// quota failures surface as plain HTTP errors.
#[derive(Debug)]
pub struct GoogleTranslate {
    /// HTTP client with the configured timeout
    client: Client,

    /// Endpoint URL
    endpoint: String,

    /// Retries after a retryable failure
    retry_count: u32,

    /// Base backoff in milliseconds, doubled on each retry
    retry_backoff_ms: u64,
}

impl GoogleTranslate {
    /// Create a new client against the given endpoint.
    pub fn new(
        endpoint: impl Into<String>,
        timeout_secs: u64,
        retry_count: u32,
        retry_backoff_ms: u64,
    ) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            endpoint: endpoint.into(),
            retry_count,
            retry_backoff_ms,
        }
    }

    /// Issue one translation request without retries.
    async fn request_translation(
        &self,
        text: &str,
        target_language: &str,
    ) -> Result<String, TranslationError> {
        let url = Url::parse_with_params(
            &self.endpoint,
            &[
                ("client", "gtx"),
                ("sl", "auto"),
                ("tl", target_language),
                ("dt", "t"),
                ("q", text),
            ],
        )
        .map_err(|e| TranslationError::RequestFailed(format!("invalid endpoint URL: {}", e)))?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| TranslationError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if status.as_u16() == 400 {
            // The endpoint answers 400 for an unknown `tl` parameter
            return Err(TranslationError::UnsupportedLanguage(
                target_language.to_string(),
            ));
        }
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read error response body".to_string());
            return Err(TranslationError::ApiError {
                status_code: status.as_u16(),
                message,
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| TranslationError::ParseError(e.to_string()))?;

        Self::extract_text(&body)
    }

    /// Pull the translated segments out of the endpoint's nested-array response.
    fn extract_text(body: &Value) -> Result<String, TranslationError> {
        let segments = body
            .get(0)
            .and_then(|v| v.as_array())
            .ok_or_else(|| {
                TranslationError::ParseError("response missing translation segments".to_string())
            })?;

        let mut translated = String::new();
        for segment in segments {
            if let Some(piece) = segment.get(0).and_then(|v| v.as_str()) {
                translated.push_str(piece);
            }
        }

        if translated.is_empty() {
            return Err(TranslationError::ParseError(
                "response contained no translated text".to_string(),
            ));
        }

        Ok(translated)
    }

    /// Whether a failure is worth retrying.
    fn is_retryable(error: &TranslationError) -> bool {
        match error {
            TranslationError::RequestFailed(_) => true,
            TranslationError::ApiError { status_code, .. } => {
                *status_code == 429 || *status_code >= 500
            }
            _ => false,
        }
    }

    /// Probe the endpoint with a one-word request.
    ///
    /// Used by the host to log connectivity problems up front; a failure here
    /// never stops a run, since per-caption failures are non-fatal anyway.
    pub async fn test_connection(&self, target_language: &str) -> Result<(), TranslationError> {
        self.request_translation("hello", target_language).await?;
        Ok(())
    }
}

#[async_trait]
impl Translator for GoogleTranslate {
    async fn translate(
        &self,
        text: &str,
        target_language: &str,
    ) -> Result<String, TranslationError> {
        let mut attempt: u32 = 0;
        loop {
            match self.request_translation(text, target_language).await {
                Ok(translated) => {
                    debug!(
                        "Translated {} chars to {} on attempt {}",
                        text.len(),
                        target_language,
                        attempt + 1
                    );
                    return Ok(translated);
                }
                Err(e) if attempt < self.retry_count && Self::is_retryable(&e) => {
                    let backoff = self.retry_backoff_ms.saturating_mul(1 << attempt);
                    warn!(
                        "Translation attempt {} failed ({}), retrying in {}ms",
                        attempt + 1,
                        e,
                        backoff
                    );
                    tokio::time::sleep(Duration::from_millis(backoff)).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn name(&self) -> &'static str {
        "google-web"
    }
}
