use std::fmt;
use std::path::{Path, PathBuf};
use anyhow::{Result, Context, anyhow};
use log::{error, info, warn};
use serde::Deserialize;
use tokio::process::Command;

use crate::errors::{ExtractionError, PromptError};
use crate::file_utils::FileManager;
use crate::interaction::{ChoiceItem, Chooser};
use crate::language_utils;

// @module: Container track probing and subtitle extraction

/// One subtitle stream as returned by ffprobe
#[derive(Debug, Deserialize)]
struct ProbedStream {
    index: u64,
    codec_name: Option<String>,
    #[serde(default)]
    tags: ProbedTags,
}

/// Language and title tags for a stream; ffprobe may omit either
#[derive(Debug, Default, Deserialize)]
struct ProbedTags {
    language: Option<String>,
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbedStream>,
}

/// Metadata of one subtitle track inside a container
#[derive(Debug, Clone)]
pub struct TrackInfo {
    /// Container-wide stream index, usable with ffmpeg -map 0:<id>
    pub track_id: u64,
    pub language: Option<String>,
    pub track_name: Option<String>,
    pub codec: Option<String>,
}

impl fmt::Display for TrackInfo {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "ID: {} - Lang: {} - Track Name: {} - Codec: {}",
            self.track_id,
            self.language.as_deref().unwrap_or("unknown"),
            self.track_name.as_deref().unwrap_or("None"),
            self.codec.as_deref().unwrap_or("unknown"),
        )
    }
}

/// Lists the subtitle-bearing streams of one container file and pulls a
/// chosen one out as a standalone subtitle file
pub struct Extractor {
    file_path: PathBuf,
    subtitle_tracks: Vec<TrackInfo>,
}

impl Extractor {
    /// Probe a container's subtitle tracks with ffprobe
    pub async fn new<P: AsRef<Path>>(container_path: P) -> Result<Self> {
        let file_path = container_path.as_ref().to_path_buf();

        if !FileManager::file_exists(&file_path) {
            return Err(anyhow!("Container file not found: {:?}", file_path));
        }

        // Add timeout to prevent hanging on problematic files
        let ffprobe_future = Command::new("ffprobe")
            .args([
                "-v", "quiet",
                "-print_format", "json",
                "-show_streams",
                "-select_streams", "s",
                file_path.to_str().unwrap_or(""),
            ])
            .output();

        let timeout_duration = std::time::Duration::from_secs(60);
        let output = tokio::select! {
            result = ffprobe_future => {
                result.map_err(|e| anyhow!("Failed to execute ffprobe command: {}", e))?
            },
            _ = tokio::time::sleep(timeout_duration) => {
                return Err(anyhow!("ffprobe command timed out after 60 seconds"));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            error!("ffprobe failed: {}", stderr);
            return Err(anyhow!("ffprobe command failed: {}", stderr));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let subtitle_tracks = if stdout.trim().is_empty() {
            Vec::new()
        } else {
            let probe: ProbeOutput = serde_json::from_str(&stdout)
                .context("Failed to parse ffprobe JSON output")?;
            probe
                .streams
                .into_iter()
                .map(|stream| TrackInfo {
                    track_id: stream.index,
                    language: stream.tags.language,
                    track_name: stream.tags.title,
                    codec: stream.codec_name,
                })
                .collect()
        };

        Ok(Extractor {
            file_path,
            subtitle_tracks,
        })
    }

    /// Creates an extractor over a fixed track list - used by tests
    #[allow(dead_code)]
    pub fn from_tracks<P: AsRef<Path>>(container_path: P, tracks: Vec<TrackInfo>) -> Self {
        Extractor {
            file_path: container_path.as_ref().to_path_buf(),
            subtitle_tracks: tracks,
        }
    }

    /// Subtitle tracks in probe order
    pub fn tracks(&self) -> &[TrackInfo] {
        &self.subtitle_tracks
    }

    /// Look up one track by id
    pub fn track(&self, track_id: u64) -> Option<&TrackInfo> {
        self.subtitle_tracks
            .iter()
            .find(|track| track.track_id == track_id)
    }

    /// Derive the track to extract from a reference track's language and
    /// display name. Among subtitle tracks sharing the language, prefer
    /// the unique match, then an exact display-name match, then a track
    /// whose name mentions "full" or "complete", then the first one.
    pub fn most_likely_track_id(&self, language: &str, track_name: Option<&str>) -> Result<u64> {
        let same_language_tracks: Vec<&TrackInfo> = self
            .subtitle_tracks
            .iter()
            .filter(|track| {
                track
                    .language
                    .as_deref()
                    .is_some_and(|lang| language_utils::language_codes_match(lang, language))
            })
            .collect();

        if same_language_tracks.is_empty() {
            return Err(ExtractionError::NoLanguageMatch {
                language: language.to_string(),
                file_name: self
                    .file_path
                    .file_name()
                    .map(|name| name.to_string_lossy().to_string())
                    .unwrap_or_default(),
            }
            .into());
        }

        if same_language_tracks.len() == 1 {
            return Ok(same_language_tracks[0].track_id);
        }

        if let Some(track_name) = track_name {
            if let Some(track) = same_language_tracks
                .iter()
                .find(|track| track.track_name.as_deref() == Some(track_name))
            {
                return Ok(track.track_id);
            }
        }

        if let Some(track) = same_language_tracks.iter().find(|track| {
            track.track_name.as_deref().is_some_and(|name| {
                let lowered = name.to_lowercase();
                lowered.contains("full") || lowered.contains("complete")
            })
        }) {
            return Ok(track.track_id);
        }

        Ok(same_language_tracks[0].track_id)
    }

    /// Present the track list through a front end and return the pick
    pub fn choose_track(&self, chooser: &dyn Chooser) -> Result<&TrackInfo> {
        if self.subtitle_tracks.is_empty() {
            return Err(anyhow!(
                "No subtitle tracks found in {}",
                self.file_path.display()
            ));
        }

        let items: Vec<ChoiceItem> = self
            .subtitle_tracks
            .iter()
            .map(|track| ChoiceItem::new(track.track_id.to_string(), track.to_string()))
            .collect();

        let title = "Please enter the ID of the track to be extracted";
        let selected = chooser
            .choose(title, &items)?
            .ok_or_else(|| PromptError::UserCancelled {
                prompt: title.to_string(),
            })?;

        let track = &self.subtitle_tracks[selected];
        info!("Selected track: {}", track);
        Ok(track)
    }

    /// Extract one subtitle track to a standalone file. With no track id
    /// the choice is interactive; with no destination the file is written
    /// beside the container.
    pub async fn extract(
        &self,
        destination_dir: Option<&Path>,
        track_id: Option<u64>,
        chooser: &dyn Chooser,
    ) -> Result<PathBuf> {
        let track = match track_id {
            Some(id) => self
                .track(id)
                .ok_or(ExtractionError::TrackLookup { track_id: id })?,
            None => self.choose_track(chooser)?,
        };

        self.extract_track(track, destination_dir).await
    }

    async fn extract_track(
        &self,
        track: &TrackInfo,
        destination_dir: Option<&Path>,
    ) -> Result<PathBuf> {
        let destination_dir = destination_dir
            .map(|dir| dir.to_path_buf())
            .or_else(|| self.file_path.parent().map(|parent| parent.to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."));

        let stem = self
            .file_path
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_default();

        let (extension, codec_arg) = codec_extension(track.codec.as_deref());
        let output_path =
            destination_dir.join(format!("{}.track{}.{}", stem, track.track_id, extension));

        // Add timeout to prevent hanging on problematic files
        let ffmpeg_future = Command::new("ffmpeg")
            .args([
                "-y", // Overwrite existing file
                "-i", self.file_path.to_str().unwrap_or_default(),
                "-map", &format!("0:{}", track.track_id),
                "-c:s", codec_arg,
                output_path.to_str().unwrap_or_default(),
            ])
            .output();

        let timeout_duration = std::time::Duration::from_secs(120);
        let result = tokio::select! {
            result = ffmpeg_future => {
                result.map_err(|e| anyhow!("Failed to execute ffmpeg command for subtitle extraction: {}", e))?
            },
            _ = tokio::time::sleep(timeout_duration) => {
                return Err(anyhow!("ffmpeg command timed out after 2 minutes"));
            }
        };

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            let filtered = filter_ffmpeg_stderr(&stderr);
            error!("Subtitle extraction failed: {}", filtered);
            return Err(anyhow!("ffmpeg extraction failed: {}", filtered));
        }

        let file_size = std::fs::metadata(&output_path)?.len();
        if file_size == 0 {
            return Err(anyhow!(
                "Extracted file is empty — no subtitles found in track {}",
                track.track_id
            ));
        }

        info!("Extracted track {} to {}", track.track_id, output_path.display());
        Ok(output_path)
    }
}

/// Map a probed codec to the extracted file's extension and the ffmpeg
/// subtitle codec argument. Known text codecs are stream-copied; anything
/// else is transcoded to SRT.
fn codec_extension(codec: Option<&str>) -> (&'static str, &'static str) {
    match codec {
        Some("ass") | Some("ssa") | Some("SubStationAlpha") => ("ass", "copy"),
        Some("subrip") | Some("srt") => ("srt", "copy"),
        other => {
            if let Some(codec) = other {
                warn!("Unknown subtitle codec '{}', transcoding to SRT", codec);
            }
            ("srt", "srt")
        }
    }
}

/// Filter ffmpeg stderr to only show meaningful error lines, stripping the
/// version banner, build configuration, and stream metadata noise.
fn filter_ffmpeg_stderr(stderr: &str) -> String {
    let dominated_prefixes = [
        "ffmpeg version",
        "  built with",
        "  configuration:",
        "  lib",
        "Input #",
        "  Metadata:",
        "  Duration:",
        "  Chapter",
        "    Chapter",
        "  Stream #",
        "      Metadata:",
        "        title",
        "        BPS",
        "        DURATION",
        "        NUMBER_OF",
        "        _STATISTICS",
        "Output #",
        "Stream mapping:",
        "Press [q]",
    ];

    let meaningful: Vec<&str> = stderr
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                return false;
            }
            !dominated_prefixes.iter().any(|p| trimmed.starts_with(p))
        })
        .collect();

    if meaningful.is_empty() {
        "unknown ffmpeg error (stderr was empty after filtering)".to_string()
    } else {
        meaningful.join("\n")
    }
}
