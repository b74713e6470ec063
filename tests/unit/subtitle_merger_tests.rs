/*!
 * Tests for the merge engine
 */

use anyhow::Result;
use submerge::app_config::MergeConfig;
use submerge::subtitle_document::{Event, EventKind, Style, SubtitleDocument, SubtitleFormat};
use submerge::subtitle_merger::Merger;
use crate::common;

fn comment(start_ms: i64, end_ms: i64, style: &str, text: &str) -> Event {
    let mut event = Event::dialogue(start_ms, end_ms, style, text);
    event.kind = EventKind::Comment;
    event
}

fn merge_in_temp(
    original: SubtitleDocument,
    additional: SubtitleDocument,
) -> Result<SubtitleDocument> {
    let temp_dir = common::create_temp_dir()?;
    let output_path = temp_dir.path().join("merged.ass");
    let merger = Merger::from_documents(original, additional, output_path, &MergeConfig::default());
    merger.merge()
}

/// The derived style's vertical margin follows the margin + fontsize + 10 rule
#[test]
fn test_build_styles_withDialogueEvents_shouldRegisterDerivedVariants() -> Result<()> {
    let original = SubtitleDocument::from_ass_string(common::sample_ass_content())?;
    let additional = common::build_ass_document(vec![]);

    let merged = merge_in_temp(original, additional)?;

    // Default: marginv 10, fontsize 20 -> 10 + 20 + 10
    let default_add = merged.styles.get("DefaultAdd").expect("derived Default style");
    assert_eq!(default_add.margin_v, 40);
    assert_eq!(default_add.font_size, 20.0);

    // Signs: marginv 20, fontsize 30 -> 20 + 30 + 10
    let signs_add = merged.styles.get("SignsAdd").expect("derived Signs style");
    assert_eq!(signs_add.margin_v, 60);

    // Originals are copied verbatim
    assert_eq!(merged.styles.get("Default").unwrap().margin_v, 10);
    assert_eq!(merged.styles.get("Signs").unwrap().margin_v, 20);
    Ok(())
}

/// An additional event overlapping a multi-line original gets its own
/// margin recomputed from the derived style
#[test]
fn test_merge_withOverlappingMultilineOriginal_shouldRaiseEventMargin() -> Result<()> {
    let original = common::build_ass_document(vec![Event::dialogue(
        1000,
        4000,
        "Default",
        "First line\\NSecond line",
    )]);
    let additional = common::build_ass_document(vec![Event::dialogue(
        2000,
        3000,
        "Default",
        "Imported text",
    )]);

    let merged = merge_in_temp(original, additional)?;

    let imported = merged
        .events
        .iter()
        .find(|event| event.style == "DefaultAdd")
        .expect("imported event");
    // derived margin 40, derived fontsize 20 -> 40 + 20 + 10
    assert_eq!(imported.margin_v, 70);
    Ok(())
}

/// Touching endpoints count as overlapping (closed intervals)
#[test]
fn test_merge_withTouchingEndpoints_shouldStillCountAsOverlap() -> Result<()> {
    let original = common::build_ass_document(vec![Event::dialogue(
        1000,
        4000,
        "Default",
        "Two\\Nlines",
    )]);
    let additional = common::build_ass_document(vec![Event::dialogue(
        4000,
        5000,
        "Default",
        "Starts as the original ends",
    )]);

    let merged = merge_in_temp(original, additional)?;

    let imported = merged
        .events
        .iter()
        .find(|event| event.style == "DefaultAdd")
        .expect("imported event");
    assert_eq!(imported.margin_v, 70);
    Ok(())
}

/// Without an overlapping multi-line original, the imported event keeps the
/// derived style with no per-event margin adjustment
#[test]
fn test_merge_withNoOverlappingMultiline_shouldKeepDerivedStyleOnly() -> Result<()> {
    let original = common::build_ass_document(vec![
        Event::dialogue(1000, 4000, "Default", "Two\\Nlines"),
        Event::dialogue(5000, 8000, "Default", "Single line overlapping nothing"),
    ]);
    let additional = common::build_ass_document(vec![
        // Overlaps only the single-line original
        Event::dialogue(6000, 7000, "Default", "No fix needed"),
        // Overlaps nothing at all
        Event::dialogue(9000, 9500, "Default", "Nothing nearby"),
    ]);

    let merged = merge_in_temp(original, additional)?;

    for imported in merged.events.iter().filter(|event| event.style == "DefaultAdd") {
        assert_eq!(imported.margin_v, 0, "margin must defer to the derived style");
    }
    Ok(())
}

/// The merged sequence is sorted by start time; equal starts keep the
/// original-then-appended order
#[test]
fn test_merge_withEqualStartTimes_shouldPreserveStableOrder() -> Result<()> {
    let original = common::build_ass_document(vec![
        Event::dialogue(2000, 3000, "Default", "original at 2s"),
        Event::dialogue(5000, 6000, "Default", "original at 5s"),
    ]);
    let additional = common::build_ass_document(vec![
        Event::dialogue(2000, 2500, "Default", "imported at 2s"),
        Event::dialogue(1000, 1500, "Default", "imported at 1s"),
    ]);

    let merged = merge_in_temp(original, additional)?;

    let starts: Vec<i64> = merged.events.iter().map(|event| event.start_ms).collect();
    let mut sorted = starts.clone();
    sorted.sort();
    assert_eq!(starts, sorted, "events must be sorted by start time");

    // At 2s the original event comes before the imported one
    let at_two: Vec<&str> = merged
        .events
        .iter()
        .filter(|event| event.start_ms == 2000)
        .map(|event| event.text.as_str())
        .collect();
    assert_eq!(at_two, vec!["original at 2s", "imported at 2s"]);
    Ok(())
}

/// Every style referenced by a merged event resolves in the merged mapping
#[test]
fn test_merge_withDefaultStyle_shouldLeaveNoDanglingReferences() -> Result<()> {
    let original = SubtitleDocument::from_ass_string(common::sample_ass_content())?;
    let additional = SubtitleDocument::from_srt_string(common::sample_srt_content())?;

    let merged = merge_in_temp(original, additional)?;

    for event in &merged.events {
        assert!(
            merged.styles.contains(&event.style),
            "dangling style reference: '{}'",
            event.style
        );
    }
    Ok(())
}

/// Non-Dialogue events: dropped from the additional document, preserved
/// unchanged from the original
#[test]
fn test_merge_withCommentEvents_shouldOnlyKeepOriginalComments() -> Result<()> {
    let original = common::build_ass_document(vec![
        Event::dialogue(1000, 2000, "Default", "spoken"),
        comment(1500, 1600, "Default", "original note"),
    ]);
    let additional = common::build_ass_document(vec![
        Event::dialogue(3000, 4000, "Default", "imported"),
        comment(3500, 3600, "Default", "imported note"),
    ]);

    let merged = merge_in_temp(original, additional)?;

    let comments: Vec<&Event> = merged
        .events
        .iter()
        .filter(|event| event.kind == EventKind::Comment)
        .collect();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].text, "original note");
    assert_eq!(comments[0].style, "Default");
    Ok(())
}

/// Merging a document with itself doubles the Dialogue count and the copies
/// use the derived style with the doubled-margin rule
#[test]
fn test_merge_withItself_shouldDoubleDialogueEvents() -> Result<()> {
    let document = SubtitleDocument::from_ass_string(common::sample_ass_content())?;
    let dialogue_count = document
        .events
        .iter()
        .filter(|event| event.kind.is_dialogue())
        .count();

    let merged = merge_in_temp(document.clone(), document)?;

    let merged_dialogue_count = merged
        .events
        .iter()
        .filter(|event| event.kind.is_dialogue())
        .count();
    assert_eq!(merged_dialogue_count, dialogue_count * 2);

    // The sample's first caption is multi-line and overlaps its own copy,
    // so that copy gets the recomputed margin
    let fixed = merged
        .events
        .iter()
        .find(|event| event.style == "DefaultAdd" && event.start_ms == 1000)
        .expect("copied first caption");
    assert_eq!(fixed.margin_v, 70);
    Ok(())
}

/// Without a style literally named "Default" no additional-track default is
/// established; imported events fall back to an empty style reference
#[test]
fn test_merge_withoutDefaultStyle_shouldLeaveEmptyStyleReference() -> Result<()> {
    let mut original = SubtitleDocument::new(SubtitleFormat::Ass);
    original.styles.insert("Main", Style::default());
    original.events = vec![Event::dialogue(1000, 4000, "Main", "Two\\Nlines")];

    let additional = common::build_ass_document(vec![Event::dialogue(
        2000,
        3000,
        "Default",
        "Imported",
    )]);

    let merged = merge_in_temp(original, additional)?;

    // The derived variant of Main still exists
    assert!(merged.styles.contains("MainAdd"));

    let imported = merged
        .events
        .iter()
        .find(|event| event.text == "Imported")
        .expect("imported event");
    assert_eq!(imported.style, "");
    // The margin fix is skipped for an unresolvable style reference
    assert_eq!(imported.margin_v, 0);
    Ok(())
}

/// A derived style name already present in the original suppresses the
/// Default anchor; kept for compatibility with the historical behavior
#[test]
fn test_merge_withPreexistingDerivedStyle_shouldNotAnchorDefault() -> Result<()> {
    let mut original = common::build_ass_document(vec![Event::dialogue(
        1000,
        2000,
        "Default",
        "spoken",
    )]);
    original.styles.insert("DefaultAdd", Style::default());

    let additional = common::build_ass_document(vec![Event::dialogue(
        3000,
        4000,
        "Default",
        "Imported",
    )]);

    let merged = merge_in_temp(original, additional)?;

    let imported = merged
        .events
        .iter()
        .find(|event| event.text == "Imported")
        .expect("imported event");
    assert_eq!(imported.style, "");
    Ok(())
}

/// The chronological overlap scan stops once an original starts after the
/// imported event ends
#[test]
fn test_merge_withLaterMultilineOriginal_shouldNotRaiseMargin() -> Result<()> {
    let original = common::build_ass_document(vec![Event::dialogue(
        8000,
        9000,
        "Default",
        "Late\\Ncaption",
    )]);
    let additional = common::build_ass_document(vec![Event::dialogue(
        1000,
        2000,
        "Default",
        "Early import",
    )]);

    let merged = merge_in_temp(original, additional)?;

    let imported = merged
        .events
        .iter()
        .find(|event| event.style == "DefaultAdd")
        .expect("imported event");
    assert_eq!(imported.margin_v, 0);
    Ok(())
}

/// Document-level passthrough metadata comes from the original only
#[test]
fn test_merge_withMetadata_shouldCopyFromOriginalOnly() -> Result<()> {
    let mut original = common::build_ass_document(vec![Event::dialogue(
        0,
        1000,
        "Default",
        "text",
    )]);
    original.info = vec![("Title".to_string(), "Original title".to_string())];
    original.fonts = vec!["fontname: original.ttf".to_string()];

    let mut additional = common::build_ass_document(vec![]);
    additional.info = vec![("Title".to_string(), "Additional title".to_string())];
    additional.fonts = vec!["fontname: additional.ttf".to_string()];

    let merged = merge_in_temp(original, additional)?;

    assert_eq!(merged.info, vec![("Title".to_string(), "Original title".to_string())]);
    assert_eq!(merged.fonts, vec!["fontname: original.ttf".to_string()]);
    Ok(())
}

/// Malformed timing is not rejected; it propagates into the merged output
#[test]
fn test_merge_withMalformedTiming_shouldPropagateUnchanged() -> Result<()> {
    let original = common::build_ass_document(vec![Event::dialogue(
        4000,
        1000,
        "Default",
        "ends before it starts",
    )]);
    let additional = common::build_ass_document(vec![]);

    let merged = merge_in_temp(original, additional)?;

    assert_eq!(merged.events[0].start_ms, 4000);
    assert_eq!(merged.events[0].end_ms, 1000);
    Ok(())
}
