use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use log::info;

use crate::errors::PromptError;
use crate::file_utils::FileManager;

// @module: Interactive front ends for track and file selection

/// One labeled choice. The key is what the console front end accepts as
/// typed input; the label is what both front ends display.
#[derive(Debug, Clone)]
pub struct ChoiceItem {
    pub key: String,
    pub label: String,
}

impl ChoiceItem {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        ChoiceItem {
            key: key.into(),
            label: label.into(),
        }
    }
}

/// Presentation contract shared by both front ends: given labeled choices,
/// return exactly one selection, or `None` for an explicit cancel. `None`
/// is distinguishable from a valid choice of index 0.
pub trait Chooser {
    fn choose(&self, title: &str, items: &[ChoiceItem]) -> Result<Option<usize>>;
}

/// Text-mode front end. Prints every label, then re-prompts indefinitely
/// on invalid, non-numeric or out-of-range input until a valid key is
/// entered. Only end-of-input reads as a cancel.
pub struct ConsoleChooser;

impl Chooser for ConsoleChooser {
    fn choose(&self, title: &str, items: &[ChoiceItem]) -> Result<Option<usize>> {
        let stdin = io::stdin();
        let mut lines = stdin.lock().lines();

        for item in items {
            println!("{}", item.label);
        }

        loop {
            print!("{}: ", title);
            io::stdout().flush().context("Failed to flush prompt")?;

            let Some(line) = lines.next() else {
                // stdin closed; nothing was selected
                return Ok(None);
            };
            let line = line.context("Failed to read selection")?;
            let entered = line.trim();

            if let Some(index) = items.iter().position(|item| item.key == entered) {
                return Ok(Some(index));
            }
            println!("Please enter a valid choice.");
        }
    }
}

/// Menu front end backed by dialoguer. Escape reads as an explicit cancel
/// and maps to `None`, never conflated with an I/O error.
pub struct MenuChooser;

impl Chooser for MenuChooser {
    fn choose(&self, title: &str, items: &[ChoiceItem]) -> Result<Option<usize>> {
        let labels: Vec<&str> = items.iter().map(|item| item.label.as_str()).collect();
        let selection = dialoguer::Select::new()
            .with_prompt(title)
            .items(&labels)
            .default(0)
            .interact_opt()
            .context("Failed to show selection dialog")?;
        Ok(selection)
    }
}

/// Starting directory for pickers when the caller has no better anchor
pub fn default_start_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// Pick a single file by navigating directories with the given front end.
/// Only files matching one of the suggested extensions are offered.
/// A cancel surfaces as `UserCancelled` carrying the picker's title.
pub fn pick_file(
    chooser: &dyn Chooser,
    title: &str,
    start_dir: &Path,
    extensions: &[String],
) -> Result<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let mut items = Vec::new();
        let mut targets = Vec::new();

        if current.parent().is_some() {
            items.push(ChoiceItem::new("..", ".."));
            targets.push(Entry::Up);
        }

        for dir in FileManager::list_subdirectories(&current)? {
            let name = entry_name(&dir);
            items.push(ChoiceItem::new(name.clone(), format!("{}/", name)));
            targets.push(Entry::Descend(dir));
        }

        let mut files = Vec::new();
        for extension in extensions {
            files.extend(FileManager::find_files(&current, extension)?);
        }
        files.sort();
        for file in files {
            let name = entry_name(&file);
            items.push(ChoiceItem::new(name.clone(), name));
            targets.push(Entry::Pick(file));
        }

        let selected = chooser
            .choose(title, &items)?
            .ok_or_else(|| PromptError::UserCancelled {
                prompt: title.to_string(),
            })?;

        match &targets[selected] {
            Entry::Up => {
                if let Some(parent) = current.parent() {
                    current = parent.to_path_buf();
                }
            }
            Entry::Descend(dir) => current = dir.clone(),
            Entry::Pick(file) => {
                info!("Selected file: {}", file.display());
                return Ok(file.clone());
            }
        }
    }
}

/// Pick a directory by navigating with the given front end
pub fn pick_directory(chooser: &dyn Chooser, title: &str, start_dir: &Path) -> Result<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let mut items = vec![ChoiceItem::new(".", "[ select this directory ]")];
        let mut targets = vec![Entry::Pick(current.clone())];

        if current.parent().is_some() {
            items.push(ChoiceItem::new("..", ".."));
            targets.push(Entry::Up);
        }

        for dir in FileManager::list_subdirectories(&current)? {
            let name = entry_name(&dir);
            items.push(ChoiceItem::new(name.clone(), format!("{}/", name)));
            targets.push(Entry::Descend(dir));
        }

        let selected = chooser
            .choose(title, &items)?
            .ok_or_else(|| PromptError::UserCancelled {
                prompt: title.to_string(),
            })?;

        match &targets[selected] {
            Entry::Up => {
                if let Some(parent) = current.parent() {
                    current = parent.to_path_buf();
                }
            }
            Entry::Descend(dir) => current = dir.clone(),
            Entry::Pick(dir) => {
                info!("Selected directory: {}", dir.display());
                return Ok(dir.clone());
            }
        }
    }
}

enum Entry {
    Up,
    Descend(PathBuf),
    Pick(PathBuf),
}

fn entry_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
