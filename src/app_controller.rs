use anyhow::{anyhow, Context, Result};
use futures::stream::{self, StreamExt};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use crate::build_report::BuildReport;
use crate::extractor;
use crate::file_utils::{self, ArtifactPaths, FileManager};
use crate::reinjector;
use crate::translation_service::TranslationService;

// @module: Application controller for documentation translation

/// Subdirectory of the output tree holding masked text and snippet lists
pub const PREPROCESS_DIR: &str = "preprocess";

/// Subdirectory of the output tree holding restored translated documents
pub const BUILD_DIR: &str = "build";

/// Outcome of one document's pipeline
#[derive(Debug)]
enum DocumentOutcome {
    /// Translated, restored and written to the build tree
    Translated,

    /// Masked and persisted, translation skipped on request
    Masked,

    /// Structurally invalid, no output produced
    Skipped { reason: String },

    /// Translation or restoration failed, verbatim copy written instead
    FellBack { reason: String },
}

/// Main application controller for the translation pipeline
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Translation service shared by all document pipelines
    service: TranslationService,
}

impl Controller {
    /// Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        let service = TranslationService::new(config.translation.clone());
        Ok(Self { config, service })
    }

    /// Create a controller with an explicit service (test constructor)
    pub fn with_service(config: Config, service: TranslationService) -> Self {
        Self { config, service }
    }

    /// Check if the controller is properly initialized with configuration
    pub fn is_initialized(&self) -> bool {
        !self.config.source_language.is_empty() && !self.config.target_language.is_empty()
    }

    /// Run the full pipeline over every Markdown/MDX document under
    /// `input_dir`.
    ///
    /// The output tree is rebuilt from scratch on every run: masked text and
    /// snippet lists land under `<output>/preprocess/`, restored documents
    /// under `<output>/build/`, and the run report at the output root. With
    /// `mask_only` the provider is never contacted and the pipeline stops
    /// after the masking artifacts are written.
    pub async fn run(
        &self,
        input_dir: PathBuf,
        output_dir: PathBuf,
        mask_only: bool,
    ) -> Result<BuildReport> {
        let start_time = std::time::Instant::now();

        if !FileManager::dir_exists(&input_dir) {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let documents = FileManager::find_markdown_files(&input_dir)?;
        if documents.is_empty() {
            return Err(anyhow!(
                "No Markdown/MDX documents found in directory: {:?}",
                input_dir
            ));
        }

        info!(
            "Translating {} documents from {:?} ({} -> {})",
            documents.len(),
            input_dir,
            self.config.source_language,
            self.config.target_language
        );

        // Stale artifacts from a previous run must never leak into this one
        FileManager::clean_dir(&output_dir)?;
        let preprocess_dir = output_dir.join(PREPROCESS_DIR);
        let build_dir = output_dir.join(BUILD_DIR);
        FileManager::ensure_dir(&preprocess_dir)?;
        FileManager::ensure_dir(&build_dir)?;

        let multi_progress = MultiProgress::new();
        let progress_bar = multi_progress.add(ProgressBar::new(documents.len() as u64));
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} documents ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result.progress_chars("█▓▒░"));
        progress_bar.set_message("Processing documents");

        let concurrency = self.config.translation.optimal_concurrent_requests().max(1);
        let mut report = BuildReport::new();

        let mut outcomes = stream::iter(documents.iter())
            .map(|document| {
                let relative = document
                    .strip_prefix(&input_dir)
                    .unwrap_or(document)
                    .to_path_buf();
                let preprocess_dir = &preprocess_dir;
                let build_dir = &build_dir;
                async move {
                    let outcome = self
                        .process_document(document, &relative, preprocess_dir, build_dir, mask_only)
                        .await;
                    (relative, outcome)
                }
            })
            .buffer_unordered(concurrency);

        while let Some((relative, outcome)) = outcomes.next().await {
            match outcome {
                Ok(DocumentOutcome::Translated) | Ok(DocumentOutcome::Masked) => {
                    report.record_success(&relative);
                }
                Ok(DocumentOutcome::Skipped { reason }) => {
                    warn!("Skipping {:?}: {}", relative, reason);
                    report.record_failure(&relative, reason);
                }
                Ok(DocumentOutcome::FellBack { reason }) => {
                    warn!("Fell back to verbatim copy for {:?}: {}", relative, reason);
                    report.record_failure(&relative, reason);
                }
                Err(e) => {
                    warn!("Failed to process {:?}: {}", relative, e);
                    report.record_failure(&relative, e.to_string());
                }
            }
            progress_bar.inc(1);
        }

        progress_bar.finish_with_message("Document processing complete");

        let report_path = report.write_to_dir(&output_dir)?;
        info!(
            "Run completed in {}: {} succeeded, {} failed, report at {:?}",
            Self::format_duration(start_time.elapsed()),
            report.success.len(),
            report.failed.len(),
            report_path
        );
        if !mask_only {
            info!("{}", self.service.usage_stats().summary());
        }

        Ok(report)
    }

    /// Full pipeline for one document: mask, persist artifacts, translate,
    /// restore, write.
    async fn process_document(
        &self,
        document: &Path,
        relative: &Path,
        preprocess_dir: &Path,
        build_dir: &Path,
        mask_only: bool,
    ) -> Result<DocumentOutcome> {
        let raw = FileManager::read_to_string(document)?;
        let build_path = build_dir.join(relative);

        // Structural validation happens before anything touches the network;
        // a malformed document is reported and produces no output at all.
        let masked = match extractor::extract(&raw, &self.config.processing) {
            Ok(masked) => masked,
            Err(e) => {
                return Ok(DocumentOutcome::Skipped {
                    reason: e.to_string(),
                })
            }
        };

        let artifacts = ArtifactPaths::for_document(preprocess_dir.join(relative));
        FileManager::write_to_file(&artifacts.masked_text, &masked.text)?;
        file_utils::write_snippet_list(&artifacts.snippet_list, &masked.snippets)
            .with_context(|| format!("Failed to persist snippet list for {:?}", relative))?;
        debug!("Masked {:?} into {} snippets", relative, masked.snippets.len());

        if mask_only {
            return Ok(DocumentOutcome::Masked);
        }

        let translated = match self
            .service
            .translate_document(
                &masked.text,
                &self.config.source_language,
                &self.config.target_language,
            )
            .await
        {
            Ok(translated) => translated,
            Err(e) => {
                self.write_fallback_copy(document, &build_path)?;
                return Ok(DocumentOutcome::FellBack {
                    reason: e.to_string(),
                });
            }
        };

        // The translated masked text replaces the pre-translation artifact,
        // so the preprocess tree always reflects the last completed step
        FileManager::write_to_file(&artifacts.masked_text, &translated)?;

        match reinjector::reinject(&translated, &masked.snippets, &self.config.processing) {
            Ok(restored) => {
                FileManager::write_to_file(&build_path, &restored)?;
                Ok(DocumentOutcome::Translated)
            }
            Err(e) => {
                self.write_fallback_copy(document, &build_path)?;
                Ok(DocumentOutcome::FellBack {
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Copy the untranslated source into the build tree so the output site
    /// never has a missing page.
    fn write_fallback_copy(&self, source: &Path, build_path: &Path) -> Result<()> {
        FileManager::copy_file(source, build_path)
            .with_context(|| format!("Failed to write fallback copy to {:?}", build_path))
    }

    /// Test the connection to the configured provider
    pub async fn test_connection(&self) -> Result<()> {
        self.service
            .test_connection()
            .await
            .map_err(|e| anyhow!("Provider connection test failed: {}", e))
    }

    /// Format a duration as a compact human-readable string
    fn format_duration(duration: std::time::Duration) -> String {
        let total_secs = duration.as_secs();
        let hours = total_secs / 3600;
        let minutes = (total_secs % 3600) / 60;
        let seconds = total_secs % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }
}
