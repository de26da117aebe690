/*!
 * Translator implementations for re-rendering caption text.
 *
 * The pipeline only depends on the narrow `Translator` contract: hand over a
 * unit of text and a target language code, get translated text back or a
 * `TranslationError`. Source language is always auto-detected by the
 * implementation.
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::TranslationError;

/// Common trait for all translation backends
///
/// Implementations are free to block on network I/O; the orchestrator awaits
/// one call at a time and downgrades any failure to a per-caption error event.
#[async_trait]
pub trait Translator: Send + Sync + Debug {
    /// Translate a unit of text into the target language.
    ///
    /// # Arguments
    /// * `text` - The text to translate, possibly spanning several lines
    /// * `target_language` - Target language code as the backend understands it
    ///
    /// # Returns
    /// * `Result<String, TranslationError>` - The translated text or an error
    async fn translate(&self, text: &str, target_language: &str)
        -> Result<String, TranslationError>;

    /// Short human-readable backend name for logging.
    fn name(&self) -> &'static str;
}

pub mod google;
