/*!
 * Error types for the submerge application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors raised by the interactive front ends
#[derive(Error, Debug)]
pub enum PromptError {
    /// The human closed a picker or declined a prompt; carries which prompt
    #[error("No selection made for '{prompt}'")]
    UserCancelled {
        /// Title of the prompt or dialog that was cancelled
        prompt: String,
    },
}

/// Errors that can occur while probing or extracting container tracks
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// An explicitly requested track id is absent from the subtitle track list
    #[error("Track ID {track_id} not found")]
    TrackLookup {
        /// The requested track id
        track_id: u64,
    },

    /// No subtitle track matches a required language
    #[error("No tracks found for language: {language} in {file_name}")]
    NoLanguageMatch {
        /// The required language code
        language: String,
        /// Container file the lookup ran against
        file_name: String,
    },
}

/// Errors that can occur while pairing containers with subtitle candidates
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Zero candidate subtitle files matched a container stem
    #[error("No subtitle files found for {0}")]
    NoCandidate(String),

    /// More than one candidate subtitle file matched a container stem
    #[error("Multiple subtitle files found for {0}")]
    MultipleCandidates(String),

    /// A reference track carries no usable language tag
    #[error("Unable to determine language of subtitles")]
    MissingLanguage,
}

/// Errors raised by the subtitle document layer
#[derive(Error, Debug)]
pub enum FormatError {
    /// The input does not parse as a recognized subtitle dialect
    #[error("Failed to parse subtitle document: {0}")]
    Parse(String),

    /// The file extension maps to no known subtitle dialect
    #[error("Unrecognized subtitle format: {0}")]
    UnknownFormat(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from an interactive prompt
    #[error("Prompt error: {0}")]
    Prompt(#[from] PromptError),

    /// Error from track probing or extraction
    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Error from container/subtitle pairing
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Error from the subtitle document layer
    #[error("Format error: {0}")]
    Format(#[from] FormatError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
