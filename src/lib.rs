/*!
 * # subsweep
 *
 * A Rust library for cleaning and translating SRT subtitle documents.
 *
 * ## Features
 *
 * - Strip known spam/advertising watermarks from caption text
 * - Optionally translate captions through a pluggable backend
 * - Segment documents into caption blocks and repair incomplete ones,
 *   preserving timing continuity across merges
 * - Re-emit well-formed SRT with sequential numbering and clean spacing
 * - Typed progress/event stream for host UIs
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `spam_filter`: Ordered case-insensitive spam pattern removal
 * - `subtitle_processor`: Caption block segmentation, repair and serialization
 * - `pipeline`: Pipeline orchestration and the typed event stream
 * - `translators`: Translation backends behind the `Translator` trait
 * - `app_config`: Configuration management
 * - `app_controller`: Main application controller
 * - `file_utils`: File system operations
 * - `language_utils`: Language code display helpers
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod pipeline;
pub mod spam_filter;
pub mod subtitle_processor;
pub mod translators;

// Re-export main types for easier usage
pub use app_config::Config;
pub use errors::{AppError, PipelineError, TranslationError};
pub use pipeline::{CancellationFlag, PipelineEvent, PipelineOptions, PipelineOrchestrator};
pub use spam_filter::SpamFilter;
pub use subtitle_processor::{CaptionBlock, CaptionDocument, TimingRange};
pub use translators::Translator;
