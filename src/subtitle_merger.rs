use std::path::{Path, PathBuf};
use anyhow::Result;
use log::{debug, info};

use crate::app_config::MergeConfig;
use crate::subtitle_document::{Event, StyleMap, SubtitleDocument};

// @module: Overlap-aware merging of two subtitle documents

/// Merges an externally supplied subtitle document into an original one,
/// repositioning the imported stream so simultaneous on-screen text does
/// not collide with the original's captions.
///
/// For every style used by a Dialogue event of the original document a
/// derived variant is registered whose vertical margin is pushed further
/// from the frame edge by `font_size + margin_padding`. Imported events are
/// restyled to the derived counterpart of the original's "Default" style;
/// events that overlap a multi-line original caption additionally get a
/// per-event margin computed from the derived style with the same rule.
///
/// The "first Default-named style becomes the derived-default anchor" rule
/// is fragile: when the original document has no Dialogue event styled
/// "Default", imported events keep an empty style reference. Known
/// correctness risk, kept deliberately for output compatibility.
pub struct Merger {
    original: SubtitleDocument,
    all_styles: StyleMap,
    all_events: Vec<Event>,
    default_style_name: Option<String>,
    add_default_style_name: String,
    new_file_path: PathBuf,
}

impl Merger {
    /// Load both documents and prepare the merge with default options.
    /// The output path is `<stem>.merged.ass` beside the original file;
    /// `new_file_name` overrides the stem.
    pub fn new(
        original_file_path: &Path,
        additional_file_path: &Path,
        new_file_name: Option<&str>,
    ) -> Result<Self> {
        Self::with_options(
            original_file_path,
            additional_file_path,
            new_file_name,
            &MergeConfig::default(),
        )
    }

    /// Load both documents and prepare the merge.
    /// Fails when either input does not parse as a recognized subtitle
    /// dialect; the parser error is surfaced unchanged. No timing
    /// validation is performed, malformed ranges propagate into output.
    pub fn with_options(
        original_file_path: &Path,
        additional_file_path: &Path,
        new_file_name: Option<&str>,
        options: &MergeConfig,
    ) -> Result<Self> {
        let original = SubtitleDocument::load(original_file_path)?;
        let additional = SubtitleDocument::load(additional_file_path)?;

        let stem = original_file_path
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_default();
        let output_stem = match new_file_name {
            Some(name) => name.to_string(),
            None => format!("{}.{}", stem, options.merged_suffix),
        };
        let new_file_path = original_file_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(format!("{}.ass", output_stem));

        Ok(Self::from_documents(original, additional, new_file_path, options))
    }

    /// Prepare the merge from already-loaded documents
    pub fn from_documents(
        original: SubtitleDocument,
        additional: SubtitleDocument,
        new_file_path: PathBuf,
        options: &MergeConfig,
    ) -> Self {
        let mut merger = Merger {
            original,
            all_styles: StyleMap::new(),
            all_events: Vec::new(),
            default_style_name: None,
            add_default_style_name: String::new(),
            new_file_path,
        };
        merger.build_styles(options);
        merger.build_events(&additional, options);
        merger
    }

    /// Path the merged document is saved to
    pub fn output_path(&self) -> &Path {
        &self.new_file_path
    }

    /// The original style recorded as the derived-default anchor, if any
    pub fn default_style_name(&self) -> Option<&str> {
        self.default_style_name.as_deref()
    }

    /// Style name assigned to imported events; empty when no anchor exists
    pub fn additional_default_style_name(&self) -> &str {
        &self.add_default_style_name
    }

    /// Copy the original's styles and register a derived counterpart for
    /// every style used by one of its Dialogue events
    fn build_styles(&mut self, options: &MergeConfig) {
        self.all_styles = self.original.styles.clone();

        for event in &self.original.events {
            if !event.kind.is_dialogue() {
                continue;
            }

            let derived_name = format!("{}{}", event.style, options.style_suffix);
            if self.all_styles.contains(&derived_name) {
                continue;
            }

            if self.default_style_name.is_none() && event.style == "Default" {
                self.default_style_name = Some(event.style.clone());
                self.add_default_style_name = derived_name.clone();
            }

            let Some(base_style) = self.original.styles.get(&event.style) else {
                debug!("Event references unknown style '{}', skipping derivation", event.style);
                continue;
            };

            let mut derived = base_style.clone();
            derived.margin_v =
                (derived.margin_v as f64 + derived.font_size + options.margin_padding) as i32;
            self.all_styles.insert(derived_name, derived);
        }

        info!("Copied/Created {} styles", self.all_styles.len());
    }

    /// Restyle the additional document's Dialogue events and combine them
    /// with the original's events into one chronological sequence
    fn build_events(&mut self, additional: &SubtitleDocument, options: &MergeConfig) {
        // Chronological scan order for the overlap check
        let mut sorted_originals: Vec<Event> = self.original.events.clone();
        sorted_originals.sort_by_key(|event| event.start_ms);

        let mut additional_events = Vec::new();
        for source_event in &additional.events {
            if !source_event.kind.is_dialogue() {
                continue;
            }

            let mut event = source_event.clone();
            event.style = self.add_default_style_name.clone();
            if Self::should_fix_margins(&sorted_originals, &event) {
                if let Some(base_style) = self.all_styles.get(&event.style) {
                    event.margin_v =
                        (base_style.margin_v as f64 + base_style.font_size + options.margin_padding)
                            as i32;
                }
            }
            additional_events.push(event);
        }

        let mut all_events = self.original.events.clone();
        all_events.extend(additional_events);
        // Stable sort keeps original-then-appended order for equal starts
        all_events.sort_by_key(|event| event.start_ms);

        self.all_events = all_events;
        info!("Built {} events", self.all_events.len());
    }

    /// An imported event needs its margin raised when some original
    /// Dialogue event overlaps it in time and spans multiple lines.
    /// The scan stops once no later original can overlap.
    fn should_fix_margins(sorted_originals: &[Event], additional_event: &Event) -> bool {
        for event in sorted_originals {
            if event.start_ms > additional_event.end_ms {
                return false;
            }
            if event.kind.is_dialogue()
                && event.overlaps(additional_event)
                && event.is_multi_line()
            {
                return true;
            }
        }
        false
    }

    /// Assemble the merged document and persist it to the output path.
    /// All document-level passthrough metadata comes from the original;
    /// the additional document contributed only Dialogue text and timing.
    pub fn merge(self) -> Result<SubtitleDocument> {
        info!("Merging events...");

        let mut new_file = SubtitleDocument::new(self.original.format);
        new_file.info = self.original.info.clone();
        new_file.project = self.original.project.clone();
        new_file.fonts = self.original.fonts.clone();
        new_file.graphics = self.original.graphics.clone();
        new_file.fps = self.original.fps;
        new_file.styles = self.all_styles;
        new_file.events = self.all_events;

        new_file.save(&self.new_file_path)?;
        Ok(new_file)
    }
}
