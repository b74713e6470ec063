/*!
 * End-to-end merge workflow tests: load two files from disk, merge, and
 * inspect the persisted document
 */

use anyhow::Result;
use submerge::app_config::MergeConfig;
use submerge::subtitle_document::SubtitleDocument;
use submerge::subtitle_merger::Merger;
use crate::common;

/// Merging an extracted ASS file with an external SRT file produces a
/// single combined document beside the original
#[test]
fn test_merge_workflow_withAssAndSrt_shouldPersistCombinedDocument() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let original_path = common::create_test_ass(temp_dir.path(), "ep01.ass")?;
    let additional_path = common::create_test_srt(temp_dir.path(), "ep01.en.srt")?;

    let merger = Merger::new(&original_path, &additional_path, None)?;
    assert_eq!(
        merger.output_path(),
        temp_dir.path().join("ep01.merged.ass")
    );
    assert_eq!(merger.default_style_name(), Some("Default"));
    assert_eq!(merger.additional_default_style_name(), "DefaultAdd");

    let merged = merger.merge()?;

    let saved_path = temp_dir.path().join("ep01.merged.ass");
    assert!(saved_path.exists());

    // The persisted file reparses into the merged document
    let reloaded = SubtitleDocument::load(&saved_path)?;
    assert_eq!(reloaded.events.len(), merged.events.len());
    assert!(reloaded.styles.contains("Default"));
    assert!(reloaded.styles.contains("DefaultAdd"));
    assert!(reloaded.styles.contains("SignsAdd"));

    // Sample ASS: 3 Dialogue + 1 Comment; sample SRT: 3 Dialogue
    assert_eq!(reloaded.events.len(), 7);

    // Imported events all use the derived default style
    let imported: Vec<_> = reloaded
        .events
        .iter()
        .filter(|event| event.style == "DefaultAdd")
        .collect();
    assert_eq!(imported.len(), 3);

    // The first SRT entry (2s-5s) overlaps the multi-line ASS caption
    // (1s-4s), so it carries the recomputed margin; the last one (12s-14s)
    // overlaps nothing multi-line and does not
    let overlapping = imported
        .iter()
        .find(|event| event.start_ms == 2000)
        .expect("overlapping import");
    assert_eq!(overlapping.margin_v, 70);

    let clear = imported
        .iter()
        .find(|event| event.start_ms == 12000)
        .expect("non-overlapping import");
    assert_eq!(clear.margin_v, 0);
    Ok(())
}

/// A caller-specified name overrides the output stem
#[test]
fn test_merge_workflow_withNameOverride_shouldUseGivenStem() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let original_path = common::create_test_ass(temp_dir.path(), "ep01.ass")?;
    let additional_path = common::create_test_srt(temp_dir.path(), "ep01.en.srt")?;

    let merger = Merger::with_options(
        &original_path,
        &additional_path,
        Some("combined"),
        &MergeConfig::default(),
    )?;
    merger.merge()?;

    assert!(temp_dir.path().join("combined.ass").exists());
    Ok(())
}

/// A file that parses as no recognized dialect fails the merge up front
#[test]
fn test_merge_workflow_withUnparsableInput_shouldSurfaceFormatError() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let original_path = common::create_test_ass(temp_dir.path(), "ep01.ass")?;
    let broken_path = common::create_test_file(temp_dir.path(), "broken.srt", "no entries here")?;

    let result = Merger::new(&original_path, &broken_path, None);
    assert!(result.is_err());

    let message = result.err().unwrap().to_string();
    assert!(message.contains("No valid subtitle entries"), "got: {}", message);
    Ok(())
}
