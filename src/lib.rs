/*!
 * # submerge - Subtitle track extraction and overlap-aware merging
 *
 * A Rust library for combining two independently authored subtitle streams
 * into one chronologically ordered, style-consistent document.
 *
 * ## Features
 *
 * - Probe and extract subtitle tracks from container media files
 * - Typed subtitle document model with ASS and SRT dialect support
 * - Overlap-aware merge that repositions imported captions vertically
 * - Batch processing of a directory of containers
 * - Interchangeable console and menu front ends for every interactive choice
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `subtitle_document`: Typed document model, parsing and serialization
 * - `subtitle_merger`: The merge engine
 * - `track_extractor`: Container probing and track extraction
 * - `interaction`: Front-end contract and its two implementations
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod file_utils;
pub mod interaction;
pub mod language_utils;
pub mod subtitle_document;
pub mod subtitle_merger;
pub mod track_extractor;

// Re-export main types for easier usage
pub use app_config::Config;
pub use subtitle_document::{Event, EventKind, Style, StyleMap, SubtitleDocument, SubtitleFormat};
pub use subtitle_merger::Merger;
pub use track_extractor::{Extractor, TrackInfo};
pub use language_utils::{language_codes_match, normalize_to_part2t, get_language_name};
pub use errors::{AppError, ExtractionError, FormatError, PromptError, ValidationError};
