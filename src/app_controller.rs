use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::app_config::Config;
use crate::errors::AppError;
use crate::file_utils::FileManager;
use crate::language_utils;
use crate::pipeline::{
    CancellationFlag, PipelineEvent, PipelineOptions, PipelineOrchestrator,
};
use crate::spam_filter::SpamFilter;
use crate::translators::Translator;
use crate::translators::google::GoogleTranslate;

// @module: Application controller for subtitle processing

/// Main application controller for subtitle cleanup and translation
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Cancellation handle shared with the host's signal handling
    cancel: CancellationFlag,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            config,
            cancel: CancellationFlag::new(),
        })
    }

    /// Handle the host can use to cancel in-flight runs (e.g. on Ctrl-C).
    pub fn cancellation_flag(&self) -> CancellationFlag {
        self.cancel.clone()
    }

    /// Process a single subtitle file.
    ///
    /// Reads the document, runs the pipeline on a worker task, consumes its
    /// event stream, and writes the output file only after the terminal
    /// success event. Nothing is written on a fatal failure.
    pub async fn run(
        &self,
        input_file: PathBuf,
        output_dir: Option<PathBuf>,
        force_overwrite: bool,
    ) -> Result<(), AppError> {
        let start_time = std::time::Instant::now();

        if !FileManager::file_exists(&input_file) {
            return Err(AppError::Input(format!(
                "Input file does not exist: {:?}",
                input_file
            )));
        }

        let output_dir = output_dir
            .or_else(|| input_file.parent().map(|p| p.to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."));
        let output_path = FileManager::build_output_path(&input_file, &output_dir);

        if FileManager::file_exists(&output_path) && !force_overwrite {
            warn!(
                "Skipping {:?}, processed output already exists (use -f to force overwrite)",
                input_file
            );
            return Ok(());
        }

        let content =
            FileManager::read_to_string(&input_file).map_err(|e| AppError::Input(e.to_string()))?;

        let spam_filter = SpamFilter::from_patterns(&self.config.spam_patterns)?;
        let translator = self.build_translator();
        let options = PipelineOptions {
            translate: self.config.translation.enabled,
            target_language: self.config.translation.target_language.clone(),
        };

        if options.translate {
            info!(
                "Translating captions to {}",
                language_utils::describe(&options.target_language)
            );
        }

        let (events_tx, mut events_rx) = mpsc::unbounded_channel();
        let orchestrator = PipelineOrchestrator::new(
            spam_filter,
            translator,
            options,
            events_tx,
            self.cancel.clone(),
        )?;
        let worker = tokio::spawn(orchestrator.run(content));

        let progress = ProgressBar::new(100);
        progress.set_style(
            ProgressStyle::with_template("{spinner:.green} [{bar:40.cyan/blue}] {percent:>3}% {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );

        let mut output: Option<String> = None;
        let mut failure: Option<String> = None;

        while let Some(event) = events_rx.recv().await {
            match event {
                PipelineEvent::Progress(fraction) => {
                    progress.set_position((fraction * 100.0).round() as u64);
                }
                PipelineEvent::Status(message) => progress.set_message(message),
                PipelineEvent::Info(message) => debug!("{}", message),
                PipelineEvent::Error(message) => error!("{}", message),
                PipelineEvent::Completed(document) => output = Some(document),
                PipelineEvent::Failed(message) => failure = Some(message),
            }
        }
        progress.finish_and_clear();

        if let Err(e) = worker.await {
            debug!("Pipeline worker task ended abnormally: {}", e);
        }

        if let Some(message) = failure {
            return Err(AppError::Unknown(message));
        }
        let document = output.ok_or_else(|| {
            AppError::Unknown("pipeline ended without a terminal event".to_string())
        })?;

        FileManager::write_to_file(&output_path, &document)?;
        info!(
            "Processed {:?} in {} -> {:?}",
            input_file,
            Self::format_duration(start_time.elapsed()),
            output_path
        );

        Ok(())
    }

    /// Process every subtitle file under a directory, recursively.
    ///
    /// Per-file failures are logged and counted; they never stop the batch.
    pub async fn run_folder(
        &self,
        input_dir: PathBuf,
        output_dir: Option<PathBuf>,
        force_overwrite: bool,
    ) -> Result<(), AppError> {
        if !FileManager::dir_exists(&input_dir) {
            return Err(AppError::Input(format!(
                "Input directory does not exist: {:?}",
                input_dir
            )));
        }

        let files = FileManager::find_subtitle_files(&input_dir)?;
        if files.is_empty() {
            warn!("No subtitle files found in {:?}", input_dir);
            return Ok(());
        }

        info!("Processing {} subtitle files", files.len());
        let mut failed = 0usize;
        for file in files {
            if self.cancel.is_cancelled() {
                warn!("Cancellation requested, stopping the batch");
                break;
            }
            if let Err(e) = self.run(file.clone(), output_dir.clone(), force_overwrite).await {
                failed += 1;
                error!("Failed to process {:?}: {}", file, e);
            }
        }

        if failed > 0 {
            warn!("{} files failed to process", failed);
        }
        Ok(())
    }

    /// Build the configured translation backend, when translation is on.
    ///
    /// A connectivity probe runs in the background; its failure is only a
    /// warning, since per-caption failures are non-fatal by design.
    fn build_translator(&self) -> Option<Arc<dyn Translator>> {
        if !self.config.translation.enabled {
            return None;
        }

        let translation = &self.config.translation;
        let client = Arc::new(GoogleTranslate::new(
            translation.endpoint.clone(),
            translation.timeout_secs,
            translation.retry_count,
            translation.retry_backoff_ms,
        ));
        debug!("Using {} translation backend", client.name());

        let probe = Arc::clone(&client);
        let target_language = translation.target_language.clone();
        tokio::spawn(async move {
            if let Err(e) = probe.test_connection(&target_language).await {
                warn!("Translation endpoint check failed: {}", e);
            }
        });

        Some(client)
    }

    /// Human-readable duration for completion logging.
    fn format_duration(duration: Duration) -> String {
        let total_secs = duration.as_secs();
        if total_secs >= 60 {
            format!("{}m {}s", total_secs / 60, total_secs % 60)
        } else {
            format!("{:.1}s", duration.as_secs_f64())
        }
    }
}
