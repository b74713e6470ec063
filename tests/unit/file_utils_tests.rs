/*!
 * Tests for file and folder utilities
 */

use anyhow::Result;
use submerge::file_utils::FileManager;
use crate::common;

/// Test finding files with an extension, single level only
#[test]
fn test_find_files_withMixedEntries_shouldReturnSortedMatches() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();

    common::create_test_file(dir, "b.mkv", "")?;
    common::create_test_file(dir, "a.mkv", "")?;
    common::create_test_file(dir, "c.MKV", "")?;
    common::create_test_file(dir, "notes.txt", "")?;
    std::fs::create_dir(dir.join("season2"))?;
    common::create_test_file(&dir.join("season2"), "nested.mkv", "")?;

    let files = FileManager::find_files(dir, "mkv")?;
    let names: Vec<String> = files
        .iter()
        .map(|path| path.file_name().unwrap().to_string_lossy().to_string())
        .collect();

    // Extension matching is case-insensitive and nested files are ignored
    assert_eq!(names, vec!["a.mkv", "b.mkv", "c.MKV"]);
    Ok(())
}

/// Test listing immediate subdirectories
#[test]
fn test_list_subdirectories_withNestedLayout_shouldReturnTopLevelOnly() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();

    std::fs::create_dir(dir.join("b_dir"))?;
    std::fs::create_dir_all(dir.join("a_dir").join("inner"))?;
    common::create_test_file(dir, "file.mkv", "")?;

    let subdirs = FileManager::list_subdirectories(dir)?;
    let names: Vec<String> = subdirs
        .iter()
        .map(|path| path.file_name().unwrap().to_string_lossy().to_string())
        .collect();

    assert_eq!(names, vec!["a_dir", "b_dir"]);
    Ok(())
}

/// Candidate subtitles match by stem prefix across recognized extensions
#[test]
fn test_find_matching_subtitles_withPrefixStems_shouldCollectAllMatches() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();
    let extensions = vec!["ass".to_string(), "srt".to_string()];

    common::create_test_file(dir, "ep01.srt", "")?;
    common::create_test_file(dir, "ep01.en.srt", "")?;
    common::create_test_file(dir, "ep02.ass", "")?;
    common::create_test_file(dir, "other.srt", "")?;

    // Both stem-prefix candidates for ep01 are reported
    let ep01 = FileManager::find_matching_subtitles(dir, "ep01", &extensions)?;
    assert_eq!(ep01.len(), 2);

    let ep02 = FileManager::find_matching_subtitles(dir, "ep02", &extensions)?;
    assert_eq!(ep02.len(), 1);
    assert!(ep02[0].ends_with("ep02.ass"));

    let ep03 = FileManager::find_matching_subtitles(dir, "ep03", &extensions)?;
    assert!(ep03.is_empty());
    Ok(())
}

/// Test directory creation and file round trips
#[test]
fn test_write_to_file_withMissingParent_shouldCreateAndRoundTrip() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("nested").join("out.txt");

    FileManager::write_to_file(&path, "contents")?;
    assert!(FileManager::file_exists(&path));
    assert!(FileManager::dir_exists(path.parent().unwrap()));
    assert_eq!(FileManager::read_to_string(&path)?, "contents");
    Ok(())
}

/// Test existence checks distinguish files from directories
#[test]
fn test_existence_checks_withFileAndDir_shouldDistinguish() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let file = common::create_test_file(temp_dir.path(), "a.srt", "")?;

    assert!(FileManager::file_exists(&file));
    assert!(!FileManager::dir_exists(&file));
    assert!(FileManager::dir_exists(temp_dir.path()));
    assert!(!FileManager::file_exists(temp_dir.path()));
    Ok(())
}
