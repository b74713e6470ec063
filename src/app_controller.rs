use anyhow::{Result, anyhow};
use log::info;
use std::path::{Path, PathBuf};
use indicatif::{ProgressBar, ProgressStyle};
use tempfile::TempDir;

use crate::app_config::Config;
use crate::errors::ValidationError;
use crate::file_utils::FileManager;
use crate::interaction::{self, Chooser, ConsoleChooser};
use crate::subtitle_merger::Merger;
use crate::track_extractor::{Extractor, TrackInfo};
use crate::language_utils;

// @module: Application controller driving the extract/merge workflows

/// Main application controller for subtitle extraction and merging
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Front end used for every interactive choice
    chooser: Box<dyn Chooser>,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default(), Box::new(ConsoleChooser))
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config, chooser: Box<dyn Chooser>) -> Result<Self> {
        Ok(Self { config, chooser })
    }

    /// Check if the controller is properly initialized with configuration
    pub fn is_initialized(&self) -> bool {
        self.config.validate().is_ok()
    }

    /// Interactive extraction: pick a container, pick a track, extract the
    /// standalone subtitle file beside the container
    pub async fn run_extract(&self) -> Result<()> {
        let container_path = interaction::pick_file(
            self.chooser.as_ref(),
            "Select the container file to extract subtitles from",
            &interaction::default_start_dir(),
            std::slice::from_ref(&self.config.container_extension),
        )?;

        let extractor = Extractor::new(&container_path).await?;
        if extractor.tracks().is_empty() {
            return Err(anyhow!(
                "No subtitle tracks found in {}",
                container_path.display()
            ));
        }

        let extracted = extractor.extract(None, None, self.chooser.as_ref()).await?;
        info!("Success: {}", extracted.display());
        Ok(())
    }

    /// Interactive merge of two already-standalone subtitle files
    pub async fn run_merge(&self) -> Result<()> {
        let original_path = interaction::pick_file(
            self.chooser.as_ref(),
            "Select the ORIGINAL subtitle file",
            &interaction::default_start_dir(),
            &self.config.subtitle_extensions,
        )?;
        info!("Original Subtitle File: {}", original_path.display());

        let additional_path = interaction::pick_file(
            self.chooser.as_ref(),
            "Select the ADDITIONAL subtitle file to add",
            original_path
                .parent()
                .unwrap_or_else(|| Path::new(".")),
            &self.config.subtitle_extensions,
        )?;
        info!("Additional Subtitle File: {}", additional_path.display());

        let merger =
            Merger::with_options(&original_path, &additional_path, None, &self.config.merge)?;
        let output_path = merger.output_path().to_path_buf();
        merger.merge()?;
        info!("Saved {}", output_path.display());
        Ok(())
    }

    /// Interactive extract-then-merge for one container
    pub async fn run_full(&self) -> Result<()> {
        let container_path = interaction::pick_file(
            self.chooser.as_ref(),
            "Select the container file to extract subtitles from",
            &interaction::default_start_dir(),
            std::slice::from_ref(&self.config.container_extension),
        )?;
        info!("Container File: {}", container_path.display());

        let additional_path = interaction::pick_file(
            self.chooser.as_ref(),
            "Select the additional subtitle file to add",
            container_path
                .parent()
                .unwrap_or_else(|| Path::new(".")),
            &self.config.subtitle_extensions,
        )?;
        info!("Additional Subtitle File: {}", additional_path.display());

        self.run_full_process(&container_path, &additional_path, None)
            .await?;
        Ok(())
    }

    /// Interactive batch processing: pick a directory, then process it
    pub async fn run_batch(&self) -> Result<()> {
        let directory = interaction::pick_directory(
            self.chooser.as_ref(),
            "Select the directory to process",
            &interaction::default_start_dir(),
        )?;
        info!("Directory: {}", directory.display());
        self.run_batch_cli(&directory).await
    }

    /// Process every container in a directory: pair each with exactly one
    /// same-stem external subtitle file and run the full pipeline. The
    /// first container's interactively chosen track is the reference for
    /// deriving the track choice on all subsequent containers.
    pub async fn run_batch_cli(&self, directory: &Path) -> Result<()> {
        let start_time = std::time::Instant::now();

        if !FileManager::dir_exists(directory) {
            return Err(anyhow!("Input directory does not exist: {:?}", directory));
        }

        let containers = FileManager::find_files(directory, &self.config.container_extension)?;
        if containers.is_empty() {
            return Err(anyhow!(
                "No {} files found in the directory",
                self.config.container_extension.to_uppercase()
            ));
        }

        let first_extractor = Extractor::new(&containers[0]).await?;
        if first_extractor.tracks().is_empty() {
            return Err(anyhow!(
                "No subtitle tracks found in {}",
                containers[0].display()
            ));
        }
        let first_track = first_extractor.choose_track(self.chooser.as_ref())?.clone();
        let reference_language = first_track
            .language
            .as_deref()
            .ok_or(ValidationError::MissingLanguage)?;
        info!(
            "Reference track language: {}",
            language_utils::get_language_name(reference_language)
                .unwrap_or_else(|_| reference_language.to_string())
        );

        // Create a progress bar for batch processing
        let batch_pb = ProgressBar::new(containers.len() as u64);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        batch_pb.set_style(template_result.progress_chars("█▓▒░"));
        batch_pb.set_message("Processing containers");

        for container in &containers {
            let file_name = container
                .file_name()
                .map(|name| name.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string());
            batch_pb.set_message(format!("Processing: {}", file_name));

            let subtitle_path = self.pair_container(directory, container)?;
            self.run_full_process(container, &subtitle_path, Some(&first_track))
                .await?;
            batch_pb.inc(1);
        }

        batch_pb.finish_with_message("Batch processing complete");
        info!(
            "Batch processing completed: {} containers in {}",
            containers.len(),
            Self::format_duration(start_time.elapsed())
        );
        Ok(())
    }

    /// Pair one container with its external subtitle candidate. Exactly
    /// one file whose stem starts with the container's stem must exist
    /// across the recognized subtitle extensions; zero or multiple matches
    /// abort the batch.
    pub fn pair_container(&self, directory: &Path, container: &Path) -> Result<PathBuf> {
        let file_name = container
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| "unknown".to_string());
        let stem = container
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_default();

        let mut candidates = FileManager::find_matching_subtitles(
            directory,
            &stem,
            &self.config.subtitle_extensions,
        )?;
        match candidates.len() {
            0 => Err(ValidationError::NoCandidate(file_name).into()),
            1 => Ok(candidates.remove(0)),
            _ => Err(ValidationError::MultipleCandidates(file_name).into()),
        }
    }

    /// Run the extract-then-merge pipeline for one container. The
    /// intermediate extracted file lives in a fresh temporary directory
    /// that is removed on every exit path.
    async fn run_full_process(
        &self,
        container_path: &Path,
        additional_subtitle_path: &Path,
        derive_track_from: Option<&TrackInfo>,
    ) -> Result<PathBuf> {
        let temp_dir = TempDir::new()?;

        let extractor = Extractor::new(container_path).await?;
        let track_id = match derive_track_from {
            Some(reference) => {
                let language = reference
                    .language
                    .as_deref()
                    .ok_or(ValidationError::MissingLanguage)?;
                Some(extractor.most_likely_track_id(language, reference.track_name.as_deref())?)
            }
            None => None,
        };

        let original_subtitle_path = extractor
            .extract(Some(temp_dir.path()), track_id, self.chooser.as_ref())
            .await?;

        let merger = Merger::with_options(
            &original_subtitle_path,
            additional_subtitle_path,
            None,
            &self.config.merge,
        )?;
        let merged = merger.merge()?;

        let stem = container_path
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_default();
        let merged_path = container_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(format!("{}.{}", stem, merged.format.extension()));
        merged.save(&merged_path)?;
        info!("Saved {}", merged_path.display());

        Ok(merged_path)
    }

    // Format duration in a human-readable format
    fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
