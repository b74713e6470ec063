use anyhow::{Result, Context};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    /// Find files with a specific extension directly inside a directory
    /// (single level, no recursion), sorted by name for a stable order
    pub fn find_files<P: AsRef<Path>>(dir: P, extension: &str) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();
        let normalized_ext = extension.trim_start_matches('.');

        for entry in WalkDir::new(dir.as_ref()).max_depth(1).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file() {
                if let Some(ext) = path.extension() {
                    if ext.to_string_lossy().eq_ignore_ascii_case(normalized_ext) {
                        result.push(path.to_path_buf());
                    }
                }
            }
        }

        result.sort();
        Ok(result)
    }

    /// List the immediate subdirectories of a directory, sorted by name
    pub fn list_subdirectories<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();

        for entry in fs::read_dir(dir.as_ref())
            .with_context(|| format!("Failed to read directory: {}", dir.as_ref().display()))?
        {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();
            if path.is_dir() {
                result.push(path);
            }
        }

        result.sort();
        Ok(result)
    }

    /// Locate the external subtitle candidates for one container: files in
    /// the same directory whose stem starts with the container's stem,
    /// across the recognized subtitle extensions
    pub fn find_matching_subtitles<P: AsRef<Path>>(
        directory: P,
        file_stem: &str,
        extensions: &[String],
    ) -> Result<Vec<PathBuf>> {
        let mut subtitle_files = Vec::new();

        for extension in extensions {
            let files_for_ext = Self::find_files(directory.as_ref(), extension)?;
            subtitle_files.extend(files_for_ext.into_iter().filter(|file| {
                file.file_stem()
                    .map(|stem| stem.to_string_lossy().starts_with(file_stem))
                    .unwrap_or(false)
            }));
        }

        Ok(subtitle_files)
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }
}
