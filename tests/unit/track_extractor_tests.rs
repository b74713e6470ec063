/*!
 * Tests for the track selection policy
 */

use std::path::Path;
use submerge::track_extractor::{Extractor, TrackInfo};

fn track(track_id: u64, language: Option<&str>, name: Option<&str>) -> TrackInfo {
    TrackInfo {
        track_id,
        language: language.map(|value| value.to_string()),
        track_name: name.map(|value| value.to_string()),
        codec: Some("ass".to_string()),
    }
}

fn extractor(tracks: Vec<TrackInfo>) -> Extractor {
    Extractor::from_tracks(Path::new("episode.mkv"), tracks)
}

/// No track of the required language is a hard failure
#[test]
fn test_most_likely_track_id_withNoLanguageMatch_shouldFail() {
    let extractor = extractor(vec![
        track(2, Some("jpn"), Some("Full")),
        track(3, None, Some("Signs")),
    ]);

    let result = extractor.most_likely_track_id("eng", None);
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("No tracks found for language: eng"));
}

/// A unique same-language track wins outright
#[test]
fn test_most_likely_track_id_withUniqueMatch_shouldReturnIt() {
    let extractor = extractor(vec![
        track(2, Some("jpn"), None),
        track(3, Some("eng"), Some("Signs & Songs")),
    ]);

    assert_eq!(extractor.most_likely_track_id("eng", None).unwrap(), 3);
}

/// An exact display-name match beats every other same-language track
#[test]
fn test_most_likely_track_id_withExactNameMatch_shouldPreferIt() {
    let extractor = extractor(vec![
        track(2, Some("eng"), Some("Signs & Songs")),
        track(3, Some("eng"), Some("Dialogue")),
    ]);

    assert_eq!(
        extractor.most_likely_track_id("eng", Some("Dialogue")).unwrap(),
        3
    );
}

/// Without a name match, a track mentioning "full" or "complete" is preferred
#[test]
fn test_most_likely_track_id_withFullInName_shouldPreferIt() {
    let extractor = extractor(vec![
        track(2, Some("eng"), Some("Signs & Songs")),
        track(3, Some("eng"), Some("Full Subtitles")),
        track(4, Some("eng"), Some("Complete")),
    ]);

    assert_eq!(extractor.most_likely_track_id("eng", None).unwrap(), 3);
    assert_eq!(
        extractor.most_likely_track_id("eng", Some("does not exist")).unwrap(),
        3
    );
}

/// With no better signal the first same-language track is used
#[test]
fn test_most_likely_track_id_withNoSignal_shouldFallBackToFirst() {
    let extractor = extractor(vec![
        track(2, Some("eng"), Some("Signs")),
        track(3, Some("eng"), Some("Songs")),
    ]);

    assert_eq!(extractor.most_likely_track_id("eng", None).unwrap(), 2);
}

/// Language comparison tolerates ISO 639-1 and 639-2 spellings
#[test]
fn test_most_likely_track_id_withMixedCodeSpellings_shouldMatch() {
    let extractor = extractor(vec![track(2, Some("eng"), None)]);
    assert_eq!(extractor.most_likely_track_id("en", None).unwrap(), 2);

    let extractor = extractor_with_bibliographic();
    assert_eq!(extractor.most_likely_track_id("fr", None).unwrap(), 5);
}

fn extractor_with_bibliographic() -> Extractor {
    extractor(vec![track(5, Some("fre"), None)])
}

/// Track lookup by id distinguishes present from absent tracks
#[test]
fn test_track_withKnownAndUnknownIds_shouldLookUpCorrectly() {
    let extractor = extractor(vec![track(2, Some("eng"), None)]);

    assert!(extractor.track(2).is_some());
    assert!(extractor.track(7).is_none());
    assert_eq!(extractor.tracks().len(), 1);
}

/// The display line carries id, language, name and codec
#[test]
fn test_track_info_display_withMissingTags_shouldShowPlaceholders() {
    let with_tags = track(2, Some("eng"), Some("Full"));
    assert_eq!(
        with_tags.to_string(),
        "ID: 2 - Lang: eng - Track Name: Full - Codec: ass"
    );

    let bare = TrackInfo {
        track_id: 4,
        language: None,
        track_name: None,
        codec: None,
    };
    assert_eq!(
        bare.to_string(),
        "ID: 4 - Lang: unknown - Track Name: None - Codec: unknown"
    );
}
