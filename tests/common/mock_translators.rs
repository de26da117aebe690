/*!
 * Mock translator implementations for testing.
 *
 * This module provides mock translators that simulate different behaviors:
 * - `MockTranslator::working()` - Always succeeds with tagged text
 * - `MockTranslator::intermittent(n)` - Fails every nth request
 * - `MockTranslator::failing()` - Always fails with an error
 * - `MockTranslator::empty()` - Succeeds with empty text
 */

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use subsweep::errors::TranslationError;
use subsweep::translators::Translator;

/// Behavior mode for the mock translator
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds, prefixing every line with the target language
    Working,
    /// Fails every nth request
    Intermittent { fail_every: usize },
    /// Always fails with an error
    Failing,
    /// Returns empty text, simulating a translation that lost the caption
    Empty,
}

/// Mock translator for exercising pipeline translation behavior
#[derive(Debug)]
pub struct MockTranslator {
    /// Behavior mode
    behavior: MockBehavior,
    /// Request counter for intermittent failures
    request_count: Arc<AtomicUsize>,
}

impl MockTranslator {
    /// Create a new mock translator with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a working mock translator that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create an intermittently failing mock translator
    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent { fail_every })
    }

    /// Create a failing mock translator that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock that returns empty translations
    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    /// Number of translate calls made so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Tag every line of the text with the target language
    fn tag_lines(text: &str, target_language: &str) -> String {
        text.lines()
            .map(|line| format!("[{}] {}", target_language, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[async_trait]
impl Translator for MockTranslator {
    async fn translate(
        &self,
        text: &str,
        target_language: &str,
    ) -> Result<String, TranslationError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst) + 1;

        match self.behavior {
            MockBehavior::Working => Ok(Self::tag_lines(text, target_language)),
            MockBehavior::Intermittent { fail_every } => {
                if fail_every > 0 && count % fail_every == 0 {
                    Err(TranslationError::RequestFailed(format!(
                        "mock translator failed on request {}",
                        count
                    )))
                } else {
                    Ok(Self::tag_lines(text, target_language))
                }
            }
            MockBehavior::Failing => Err(TranslationError::RequestFailed(
                "mock translator configured to fail".to_string(),
            )),
            MockBehavior::Empty => Ok(String::new()),
        }
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
