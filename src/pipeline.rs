use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use log::debug;
use tokio::sync::mpsc::UnboundedSender;

use crate::errors::PipelineError;
use crate::spam_filter::SpamFilter;
use crate::subtitle_processor::{CaptionDocument, format_timestamp};
use crate::translators::Translator;

// @module: Pipeline orchestration and progress events

/// Typed events emitted over the run's channel, in non-decreasing progress
/// order, terminal event last. Exactly one terminal event is emitted per run:
/// `Completed` with the output document, or `Failed` with the fatal error.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    /// Overall progress fraction in [0.0, 1.0]
    Progress(f64),

    /// Stage transition announcement
    Status(String),

    /// Informational note about the run
    Info(String),

    /// Non-fatal per-caption failure
    Error(String),

    /// Terminal success carrying the output document
    Completed(String),

    /// Terminal failure carrying the error message
    Failed(String),
}

/// Pipeline stages in execution order.
///
/// Each stage owns a slice of the overall progress fraction; translation's
/// slice is skipped entirely when translation is off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Segmenting,
    Translating,
    Repairing,
    Formatting,
    Done,
    Failed,
}

impl Stage {
    /// The stage's slice of the overall progress fraction.
    fn span(self) -> (f64, f64) {
        match self {
            Stage::Idle => (0.0, 0.0),
            Stage::Segmenting => (0.0, 0.20),
            Stage::Translating => (0.20, 0.80),
            Stage::Repairing => (0.80, 0.90),
            Stage::Formatting => (0.90, 1.0),
            Stage::Done | Stage::Failed => (1.0, 1.0),
        }
    }

    /// Status line announced on entering the stage.
    fn label(self) -> &'static str {
        match self {
            Stage::Idle => "Idle",
            Stage::Segmenting => "Segmenting captions",
            Stage::Translating => "Translating captions",
            Stage::Repairing => "Repairing incomplete captions",
            Stage::Formatting => "Formatting output",
            Stage::Done => "Done",
            Stage::Failed => "Failed",
        }
    }
}

/// Cooperative cancellation handle shared between the host and the pipeline.
///
/// Checked between per-caption translation calls, the one place a run can
/// block for long. Cancelling mid-run produces the terminal failure path.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    /// A fresh, uncancelled flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; takes effect before the next translation call.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Per-run pipeline options supplied by the host.
#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    /// Whether to re-render caption text in another language
    pub translate: bool,

    /// Target language code, required non-empty only when `translate` is set.
    /// No validation beyond non-empty happens here; an invalid code surfaces
    /// as a translator failure.
    pub target_language: String,
}

/// Drives one document through clean → segment → translate → repair → format.
///
/// Holds no state between runs; every run operates on caller-supplied data
/// and reports through its own event channel.
pub struct PipelineOrchestrator {
    /// Spam filter applied per line before segmentation
    spam_filter: SpamFilter,

    /// Translation backend, present when options.translate is set
    translator: Option<Arc<dyn Translator>>,

    /// Run options
    options: PipelineOptions,

    /// Event channel towards the host
    events: UnboundedSender<PipelineEvent>,

    /// Cooperative cancellation handle
    cancel: CancellationFlag,

    /// Current stage
    stage: Stage,

    /// Highest progress fraction emitted so far
    last_progress: f64,
}

impl PipelineOrchestrator {
    /// Create an orchestrator for one run.
    ///
    /// Fails when translation is requested without a target language or
    /// without a translator; both are caller misuse, caught before any
    /// processing starts.
    pub fn new(
        spam_filter: SpamFilter,
        translator: Option<Arc<dyn Translator>>,
        options: PipelineOptions,
        events: UnboundedSender<PipelineEvent>,
        cancel: CancellationFlag,
    ) -> Result<Self, PipelineError> {
        if options.translate {
            if options.target_language.trim().is_empty() {
                return Err(PipelineError::InvalidOptions(
                    "translation enabled but target language is empty".to_string(),
                ));
            }
            if translator.is_none() {
                return Err(PipelineError::InvalidOptions(
                    "translation enabled but no translator supplied".to_string(),
                ));
            }
        }

        Ok(Self {
            spam_filter,
            translator,
            options,
            events,
            cancel,
            stage: Stage::Idle,
            last_progress: 0.0,
        })
    }

    /// Run the whole pipeline over one document.
    ///
    /// Emits exactly one terminal event and consumes the orchestrator, so the
    /// event channel closes once the run is over.
    pub async fn run(mut self, content: String) {
        match self.process(&content).await {
            Ok(output) => {
                self.stage = Stage::Done;
                self.emit_progress_fraction(1.0);
                self.emit(PipelineEvent::Completed(output));
            }
            Err(e) => {
                self.stage = Stage::Failed;
                self.emit(PipelineEvent::Failed(e.to_string()));
            }
        }
    }

    /// The pipeline proper; any error here is fatal for the run.
    async fn process(&mut self, content: &str) -> Result<String, PipelineError> {
        // Clean per line, then segment. Cleaning whole joined blocks (as one
        // historical variant of this pipeline did) risks merging multi-line
        // patterns incorrectly, so the line-level rule is the canonical one.
        self.enter_stage(Stage::Segmenting);
        let cleaned: String = content
            .lines()
            .map(|line| self.spam_filter.clean(line))
            .collect::<Vec<_>>()
            .join("\n");
        self.emit_stage_progress(0.5);

        let mut document = CaptionDocument::segment(&cleaned);
        self.emit(PipelineEvent::Info(format!(
            "Found {} caption blocks",
            document.block_count()
        )));
        if document.is_empty() {
            self.emit(PipelineEvent::Info(
                "Document contains no captions".to_string(),
            ));
        }
        self.emit_stage_progress(1.0);

        if self.options.translate {
            self.translate_blocks(&mut document).await?;
        }

        self.enter_stage(Stage::Repairing);
        let removed = document.repair();
        if removed > 0 {
            self.emit(PipelineEvent::Info(format!(
                "Merged {} incomplete caption blocks",
                removed
            )));
        }
        self.emit_stage_progress(1.0);

        self.enter_stage(Stage::Formatting);
        let output = document.render();
        if let Some((start_ms, end_ms)) = document.timing_span_ms() {
            debug!(
                "Output spans {} --> {}",
                format_timestamp(start_ms),
                format_timestamp(end_ms)
            );
        }
        self.emit_stage_progress(1.0);

        Ok(output)
    }

    /// Translate every well-formed block's text in place, one call at a time.
    ///
    /// Per-caption failures are downgraded to `Error` events with the
    /// original text retained; cancellation between calls aborts the run.
    async fn translate_blocks(&mut self, document: &mut CaptionDocument) -> Result<(), PipelineError> {
        self.enter_stage(Stage::Translating);

        // Presence is checked at construction time
        let translator = self
            .translator
            .clone()
            .ok_or_else(|| PipelineError::InvalidOptions("no translator supplied".to_string()))?;

        let total = document.block_count().max(1);
        let mut failures = 0usize;

        for (idx, block) in document.blocks.iter_mut().enumerate() {
            if self.cancel.is_cancelled() {
                return Err(PipelineError::Cancelled);
            }

            if block.is_well_formed() {
                let text = block.text();
                match translator
                    .translate(&text, &self.options.target_language)
                    .await
                {
                    Ok(translated) => block.set_text(&translated),
                    Err(e) => {
                        failures += 1;
                        self.emit(PipelineEvent::Error(format!(
                            "Caption {}: {}",
                            idx + 1,
                            e
                        )));
                    }
                }
            }

            self.emit_stage_progress((idx + 1) as f64 / total as f64);
        }

        if failures > 0 {
            self.emit(PipelineEvent::Info(format!(
                "Kept original text for {} captions after translation failures",
                failures
            )));
        }

        Ok(())
    }

    /// Move to a new stage, announcing it and its opening progress fraction.
    fn enter_stage(&mut self, stage: Stage) {
        self.stage = stage;
        self.emit(PipelineEvent::Status(stage.label().to_string()));
        self.emit_stage_progress(0.0);
    }

    /// Emit progress for a fraction of the current stage's span.
    fn emit_stage_progress(&mut self, fraction: f64) {
        let (start, end) = self.stage.span();
        let overall = start + (end - start) * fraction.clamp(0.0, 1.0);
        self.emit_progress_fraction(overall);
    }

    /// Emit an overall progress fraction, clamped to stay non-decreasing.
    fn emit_progress_fraction(&mut self, fraction: f64) {
        let fraction = fraction.clamp(0.0, 1.0).max(self.last_progress);
        self.last_progress = fraction;
        self.emit(PipelineEvent::Progress(fraction));
    }

    /// Send an event; a dropped receiver means the host has gone away and the
    /// event is discarded.
    fn emit(&self, event: PipelineEvent) {
        let _ = self.events.send(event);
    }
}
