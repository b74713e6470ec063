use std::fmt;
use std::path::Path;
use once_cell::sync::Lazy;
use regex::Regex;
use anyhow::Result;
use log::warn;

use crate::errors::FormatError;
use crate::file_utils::FileManager;

// @module: Typed subtitle document model with ASS and SRT dialect support

// @const: SRT timestamp regex
static SRT_TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{2}):(\d{2}):(\d{2}),(\d{3}) --> (\d{2}):(\d{2}):(\d{2}),(\d{3})").unwrap()
});

// @const: ASS timestamp regex (H:MM:SS.cc)
static ASS_TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+):(\d{2}):(\d{2})[.,](\d{2})$").unwrap()
});

// @const: ASS override tag block, e.g. {\an8\pos(10,10)}
static OVERRIDE_TAG_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{[^}]*\}").unwrap());

/// Subtitle dialect identifier carried by a document from load to save
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubtitleFormat {
    /// Advanced SubStation Alpha (.ass)
    Ass,
    /// SubRip (.srt)
    Srt,
}

impl SubtitleFormat {
    /// Map a file extension to a dialect
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "ass" | "ssa" => Some(SubtitleFormat::Ass),
            "srt" => Some(SubtitleFormat::Srt),
            _ => None,
        }
    }

    /// Canonical file extension for the dialect
    pub fn extension(&self) -> &'static str {
        match self {
            SubtitleFormat::Ass => "ass",
            SubtitleFormat::Srt => "srt",
        }
    }
}

/// Event type tag. Only Dialogue events participate in merge logic;
/// other types are passed through for the original document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// A cue meant for on-screen display
    Dialogue,
    /// An annotation cue, not rendered
    Comment,
    /// Any other ASS event descriptor (Picture, Sound, Movie, Command)
    Other(String),
}

impl EventKind {
    pub fn is_dialogue(&self) -> bool {
        matches!(self, EventKind::Dialogue)
    }

    fn from_descriptor(descriptor: &str) -> Self {
        match descriptor {
            "Dialogue" => EventKind::Dialogue,
            "Comment" => EventKind::Comment,
            other => EventKind::Other(other.to_string()),
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EventKind::Dialogue => write!(f, "Dialogue"),
            EventKind::Comment => write!(f, "Comment"),
            EventKind::Other(descriptor) => write!(f, "{}", descriptor),
        }
    }
}

/// Named visual formatting record, one line of the [V4+ Styles] section.
/// The vertical margin and font size drive derived-style positioning;
/// every other field is carried verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub font_name: String,
    pub font_size: f64,
    pub primary_colour: String,
    pub secondary_colour: String,
    pub outline_colour: String,
    pub back_colour: String,
    pub bold: i32,
    pub italic: i32,
    pub underline: i32,
    pub strike_out: i32,
    pub scale_x: f64,
    pub scale_y: f64,
    pub spacing: f64,
    pub angle: f64,
    pub border_style: i32,
    pub outline: f64,
    pub shadow: f64,
    pub alignment: i32,
    pub margin_l: i32,
    pub margin_r: i32,
    /// Distance from the frame edge, in script pixels
    pub margin_v: i32,
    pub encoding: i32,
}

impl Default for Style {
    fn default() -> Self {
        Style {
            font_name: "Arial".to_string(),
            font_size: 20.0,
            primary_colour: "&H00FFFFFF".to_string(),
            secondary_colour: "&H000000FF".to_string(),
            outline_colour: "&H00000000".to_string(),
            back_colour: "&H00000000".to_string(),
            bold: 0,
            italic: 0,
            underline: 0,
            strike_out: 0,
            scale_x: 100.0,
            scale_y: 100.0,
            spacing: 0.0,
            angle: 0.0,
            border_style: 1,
            outline: 2.0,
            shadow: 0.0,
            alignment: 2,
            margin_l: 10,
            margin_r: 10,
            margin_v: 10,
            encoding: 1,
        }
    }
}

/// Ordered style mapping. Insertion order is preserved so serialization
/// round-trips the [V4+ Styles] section; inserting an existing name
/// replaces the definition in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleMap {
    entries: Vec<(String, Style)>,
}

impl StyleMap {
    pub fn new() -> Self {
        StyleMap { entries: Vec::new() }
    }

    pub fn insert(&mut self, name: impl Into<String>, style: Style) {
        let name = name.into();
        if let Some(slot) = self.entries.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = style;
        } else {
            self.entries.push((name, style));
        }
    }

    pub fn get(&self, name: &str) -> Option<&Style> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, s)| s)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Style)> {
        self.entries.iter().map(|(n, s)| (n.as_str(), s))
    }
}

/// One subtitle cue on the document's absolute timeline
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub kind: EventKind,
    /// Start time in ms
    pub start_ms: i64,
    /// End time in ms
    pub end_ms: i64,
    /// Style name reference, resolved against the owning document
    pub style: String,
    /// Raw payload; may contain \N line breaks and {..} override tags
    pub text: String,
    pub layer: i32,
    /// Name a.k.a. actor field
    pub name: String,
    pub margin_l: i32,
    pub margin_r: i32,
    /// Per-event vertical margin override; 0 defers to the style
    pub margin_v: i32,
    pub effect: String,
}

impl Event {
    /// Creates a Dialogue event with default passthrough fields
    pub fn dialogue(start_ms: i64, end_ms: i64, style: &str, text: &str) -> Self {
        Event {
            kind: EventKind::Dialogue,
            start_ms,
            end_ms,
            style: style.to_string(),
            text: text.to_string(),
            layer: 0,
            name: String::new(),
            margin_l: 0,
            margin_r: 0,
            margin_v: 0,
            effect: String::new(),
        }
    }

    /// Payload with override tags stripped and ASS break/space markers
    /// mapped to plain characters
    pub fn plain_text(&self) -> String {
        let stripped = OVERRIDE_TAG_REGEX.replace_all(&self.text, "");
        stripped
            .replace("\\N", "\n")
            .replace("\\n", "\n")
            .replace("\\h", " ")
    }

    /// A multi-line caption visually occupies more vertical space
    pub fn is_multi_line(&self) -> bool {
        self.plain_text().contains('\n')
    }

    /// Closed-interval temporal overlap; touching endpoints count
    pub fn overlaps(&self, other: &Event) -> bool {
        self.end_ms >= other.start_ms && self.start_ms <= other.end_ms
    }
}

/// A parsed subtitle document: ordered events, ordered style mapping and
/// passthrough metadata blocks
#[derive(Debug, Clone)]
pub struct SubtitleDocument {
    /// Detected dialect, used to pick the writer on save
    pub format: SubtitleFormat,
    /// [Script Info] key/value pairs in file order
    pub info: Vec<(String, String)>,
    /// [Aegisub Project Garbage] key/value pairs, opaque
    pub project: Vec<(String, String)>,
    /// [Fonts] attachment lines, opaque
    pub fonts: Vec<String>,
    /// [Graphics] attachment lines, opaque
    pub graphics: Vec<String>,
    /// Frame rate hint carried from load, never interpreted
    pub fps: Option<f64>,
    pub styles: StyleMap,
    pub events: Vec<Event>,
}

// Canonical V4+ field orders, used when a section has no Format line
// and for serialization.
const STYLE_FORMAT_FIELDS: &[&str] = &[
    "Name", "Fontname", "Fontsize", "PrimaryColour", "SecondaryColour", "OutlineColour",
    "BackColour", "Bold", "Italic", "Underline", "StrikeOut", "ScaleX", "ScaleY", "Spacing",
    "Angle", "BorderStyle", "Outline", "Shadow", "Alignment", "MarginL", "MarginR", "MarginV",
    "Encoding",
];

const EVENT_FORMAT_FIELDS: &[&str] = &[
    "Layer", "Start", "End", "Style", "Name", "MarginL", "MarginR", "MarginV", "Effect", "Text",
];

impl SubtitleDocument {
    /// Create an empty document for the given dialect
    pub fn new(format: SubtitleFormat) -> Self {
        SubtitleDocument {
            format,
            info: Vec::new(),
            project: Vec::new(),
            fonts: Vec::new(),
            graphics: Vec::new(),
            fps: None,
            styles: StyleMap::new(),
            events: Vec::new(),
        }
    }

    /// Load a document from disk, picking the parser by file extension
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_string())
            .unwrap_or_default();

        let format = SubtitleFormat::from_extension(&extension)
            .ok_or_else(|| FormatError::UnknownFormat(path.display().to_string()))?;

        let content = FileManager::read_to_string(path)?;

        match format {
            SubtitleFormat::Ass => Self::from_ass_string(&content),
            SubtitleFormat::Srt => Self::from_srt_string(&content),
        }
    }

    /// Serialize with the native writer for this document's own dialect.
    /// The dialect comes from the format identifier, not the output path.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = match self.format {
            SubtitleFormat::Ass => self.to_ass_string(),
            SubtitleFormat::Srt => self.to_srt_string(),
        };

        FileManager::write_to_file(path, &content)
    }

    /// Parse an ASS script into the document model
    pub fn from_ass_string(content: &str) -> Result<Self> {
        let content = content.trim_start_matches('\u{feff}');
        let mut document = SubtitleDocument::new(SubtitleFormat::Ass);
        let mut section = Section::None;
        let mut style_fields: Vec<String> = Vec::new();
        let mut event_fields: Vec<String> = Vec::new();
        let mut seen_any_section = false;

        for raw_line in content.lines() {
            let line = raw_line.trim_end_matches('\r');
            let trimmed = line.trim();

            if trimmed.starts_with('[') && trimmed.ends_with(']') {
                section = Section::from_header(trimmed);
                seen_any_section = true;
                continue;
            }

            match section {
                Section::None => {
                    // Content before the first section header is tolerated
                    // only when blank
                    if !trimmed.is_empty() {
                        return Err(FormatError::Parse(format!(
                            "Unexpected content before first section: {}",
                            trimmed
                        ))
                        .into());
                    }
                }
                Section::ScriptInfo => {
                    if trimmed.is_empty() || trimmed.starts_with(';') || trimmed.starts_with("!:") {
                        continue;
                    }
                    if let Some((key, value)) = split_key_value(trimmed) {
                        document.info.push((key, value));
                    }
                }
                Section::Project => {
                    if trimmed.is_empty() {
                        continue;
                    }
                    if let Some((key, value)) = split_key_value(trimmed) {
                        document.project.push((key, value));
                    }
                }
                Section::Styles => {
                    if trimmed.is_empty() || trimmed.starts_with(';') {
                        continue;
                    }
                    if let Some(rest) = trimmed.strip_prefix("Format:") {
                        style_fields = split_format_fields(rest);
                    } else if let Some(rest) = trimmed.strip_prefix("Style:") {
                        let fields = if style_fields.is_empty() {
                            STYLE_FORMAT_FIELDS.iter().map(|s| s.to_string()).collect()
                        } else {
                            style_fields.clone()
                        };
                        let (name, style) = parse_style_line(rest, &fields)?;
                        document.styles.insert(name, style);
                    }
                }
                Section::Events => {
                    if trimmed.is_empty() || trimmed.starts_with(';') {
                        continue;
                    }
                    if let Some(rest) = trimmed.strip_prefix("Format:") {
                        event_fields = split_format_fields(rest);
                    } else if let Some((descriptor, rest)) = trimmed.split_once(':') {
                        let fields = if event_fields.is_empty() {
                            EVENT_FORMAT_FIELDS.iter().map(|s| s.to_string()).collect()
                        } else {
                            event_fields.clone()
                        };
                        let event = parse_event_line(descriptor, rest, &fields)?;
                        document.events.push(event);
                    }
                }
                Section::Fonts => {
                    document.fonts.push(line.to_string());
                }
                Section::Graphics => {
                    document.graphics.push(line.to_string());
                }
                Section::Unknown => {
                    // Unknown sections are dropped; they carry no merge-relevant data
                }
            }
        }

        if !seen_any_section {
            return Err(FormatError::Parse(
                "No ASS section headers found in content".to_string(),
            )
            .into());
        }

        Ok(document)
    }

    /// Parse SRT content, adapting it into the same document model.
    /// Entries get the Dialogue kind and a "Default" style reference;
    /// internal line breaks become \N markers as in the ASS payload form.
    /// Timing is kept as parsed, malformed ranges included.
    pub fn from_srt_string(content: &str) -> Result<Self> {
        let mut document = SubtitleDocument::new(SubtitleFormat::Srt);
        document.styles.insert("Default", Style::default());

        // State variables for parsing
        let mut current_seq_seen = false;
        let mut current_times: Option<(i64, i64)> = None;
        let mut current_text = String::new();

        let mut flush =
            |times: &mut Option<(i64, i64)>, seq: &mut bool, text: &mut String, events: &mut Vec<Event>| {
                if let Some((start_ms, end_ms)) = times.take() {
                    if !text.trim().is_empty() {
                        events.push(Event::dialogue(
                            start_ms,
                            end_ms,
                            "Default",
                            &text.trim().replace('\n', "\\N"),
                        ));
                    } else {
                        warn!("Skipping empty subtitle entry ending at {}ms", end_ms);
                    }
                }
                *seq = false;
                text.clear();
            };

        for line in content.lines() {
            let trimmed = line.trim();

            if trimmed.is_empty() {
                flush(&mut current_times, &mut current_seq_seen, &mut current_text, &mut document.events);
                continue;
            }

            // Sequence counter starts a new entry
            if !current_seq_seen && current_times.is_none() && trimmed.parse::<u64>().is_ok() {
                current_seq_seen = true;
                continue;
            }

            if current_times.is_none() {
                if let Some(caps) = SRT_TIMESTAMP_REGEX.captures(trimmed) {
                    let start_ms = srt_caps_to_ms(&caps, 1);
                    let end_ms = srt_caps_to_ms(&caps, 5);
                    current_times = Some((start_ms, end_ms));
                    continue;
                }
            }

            if current_times.is_some() {
                if !current_text.is_empty() {
                    current_text.push('\n');
                }
                current_text.push_str(trimmed);
            } else {
                warn!("Unexpected text before timestamp: {}", trimmed);
            }
        }

        flush(&mut current_times, &mut current_seq_seen, &mut current_text, &mut document.events);

        if document.events.is_empty() {
            return Err(FormatError::Parse(
                "No valid subtitle entries were found in the SRT content".to_string(),
            )
            .into());
        }

        Ok(document)
    }

    /// Write the document as an ASS script
    pub fn to_ass_string(&self) -> String {
        let mut out = String::new();

        out.push_str("[Script Info]\n");
        if self.info.is_empty() {
            out.push_str("ScriptType: v4.00+\n");
        } else {
            for (key, value) in &self.info {
                out.push_str(&format!("{}: {}\n", key, value));
            }
        }
        out.push('\n');

        if !self.project.is_empty() {
            out.push_str("[Aegisub Project Garbage]\n");
            for (key, value) in &self.project {
                out.push_str(&format!("{}: {}\n", key, value));
            }
            out.push('\n');
        }

        out.push_str("[V4+ Styles]\n");
        out.push_str(&format!("Format: {}\n", STYLE_FORMAT_FIELDS.join(", ")));
        for (name, style) in self.styles.iter() {
            out.push_str(&format_style_line(name, style));
        }
        out.push('\n');

        if !self.fonts.is_empty() {
            out.push_str("[Fonts]\n");
            for line in &self.fonts {
                out.push_str(line);
                out.push('\n');
            }
            out.push('\n');
        }

        if !self.graphics.is_empty() {
            out.push_str("[Graphics]\n");
            for line in &self.graphics {
                out.push_str(line);
                out.push('\n');
            }
            out.push('\n');
        }

        out.push_str("[Events]\n");
        out.push_str(&format!("Format: {}\n", EVENT_FORMAT_FIELDS.join(", ")));
        for event in &self.events {
            out.push_str(&format_event_line(event));
        }

        out
    }

    /// Write the document as SRT. Styles and non-Dialogue events do not
    /// survive this dialect; the payload is reduced to plain text.
    pub fn to_srt_string(&self) -> String {
        let mut out = String::new();
        let mut seq_num = 0usize;

        for event in &self.events {
            if !event.kind.is_dialogue() {
                continue;
            }
            seq_num += 1;
            out.push_str(&format!(
                "{}\n{} --> {}\n{}\n\n",
                seq_num,
                format_srt_timestamp(event.start_ms),
                format_srt_timestamp(event.end_ms),
                event.plain_text()
            ));
        }

        out
    }
}

/// ASS section being parsed
#[derive(Debug, Clone, Copy, PartialEq)]
enum Section {
    None,
    ScriptInfo,
    Project,
    Styles,
    Events,
    Fonts,
    Graphics,
    Unknown,
}

impl Section {
    fn from_header(header: &str) -> Self {
        match header.to_lowercase().as_str() {
            "[script info]" => Section::ScriptInfo,
            "[aegisub project garbage]" => Section::Project,
            "[v4+ styles]" | "[v4 styles]" | "[v4 styles+]" => Section::Styles,
            "[events]" => Section::Events,
            "[fonts]" => Section::Fonts,
            "[graphics]" => Section::Graphics,
            _ => Section::Unknown,
        }
    }
}

fn split_key_value(line: &str) -> Option<(String, String)> {
    line.split_once(':')
        .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
}

fn split_format_fields(rest: &str) -> Vec<String> {
    rest.split(',').map(|field| field.trim().to_string()).collect()
}

/// Parse one Style: line against the section's Format field order
fn parse_style_line(rest: &str, fields: &[String]) -> Result<(String, Style)> {
    let values: Vec<&str> = rest.splitn(fields.len(), ',').map(|v| v.trim()).collect();
    if values.len() < fields.len() {
        return Err(FormatError::Parse(format!(
            "Style line has {} fields, format declares {}: {}",
            values.len(),
            fields.len(),
            rest.trim()
        ))
        .into());
    }

    let mut name = String::new();
    let mut style = Style::default();

    for (field, value) in fields.iter().zip(values.iter()) {
        match field.as_str() {
            "Name" => name = value.to_string(),
            "Fontname" => style.font_name = value.to_string(),
            "Fontsize" => style.font_size = parse_number(value),
            "PrimaryColour" => style.primary_colour = value.to_string(),
            "SecondaryColour" => style.secondary_colour = value.to_string(),
            "OutlineColour" | "TertiaryColour" => style.outline_colour = value.to_string(),
            "BackColour" => style.back_colour = value.to_string(),
            "Bold" => style.bold = parse_int(value),
            "Italic" => style.italic = parse_int(value),
            "Underline" => style.underline = parse_int(value),
            "StrikeOut" => style.strike_out = parse_int(value),
            "ScaleX" => style.scale_x = parse_number(value),
            "ScaleY" => style.scale_y = parse_number(value),
            "Spacing" => style.spacing = parse_number(value),
            "Angle" => style.angle = parse_number(value),
            "BorderStyle" => style.border_style = parse_int(value),
            "Outline" => style.outline = parse_number(value),
            "Shadow" => style.shadow = parse_number(value),
            "Alignment" => style.alignment = parse_int(value),
            "MarginL" => style.margin_l = parse_int(value),
            "MarginR" => style.margin_r = parse_int(value),
            "MarginV" => style.margin_v = parse_int(value),
            "Encoding" => style.encoding = parse_int(value),
            _ => {}
        }
    }

    if name.is_empty() {
        return Err(FormatError::Parse(format!("Style line without a name: {}", rest.trim())).into());
    }

    Ok((name, style))
}

/// Parse one Dialogue:/Comment:/... line against the Format field order.
/// The Text field must be last; it keeps every remaining comma.
fn parse_event_line(descriptor: &str, rest: &str, fields: &[String]) -> Result<Event> {
    let values: Vec<&str> = rest.splitn(fields.len(), ',').collect();
    if values.len() < fields.len() {
        return Err(FormatError::Parse(format!(
            "Event line has {} fields, format declares {}: {}",
            values.len(),
            fields.len(),
            rest.trim()
        ))
        .into());
    }

    let mut event = Event::dialogue(0, 0, "", "");
    event.kind = EventKind::from_descriptor(descriptor.trim());

    for (field, value) in fields.iter().zip(values.iter()) {
        let trimmed = value.trim();
        match field.as_str() {
            "Layer" | "Marked" => event.layer = parse_int(trimmed),
            "Start" => event.start_ms = parse_ass_timestamp(trimmed)?,
            "End" => event.end_ms = parse_ass_timestamp(trimmed)?,
            "Style" => event.style = trimmed.to_string(),
            "Name" | "Actor" => event.name = trimmed.to_string(),
            "MarginL" => event.margin_l = parse_int(trimmed),
            "MarginR" => event.margin_r = parse_int(trimmed),
            "MarginV" => event.margin_v = parse_int(trimmed),
            "Effect" => event.effect = trimmed.to_string(),
            // Text is the only field that keeps leading whitespace
            "Text" => event.text = value.to_string(),
            _ => {}
        }
    }

    Ok(event)
}

fn parse_number(value: &str) -> f64 {
    value.parse().unwrap_or(0.0)
}

fn parse_int(value: &str) -> i32 {
    // ASS tools occasionally write integer fields as decimals
    value
        .parse::<i32>()
        .ok()
        .or_else(|| value.parse::<f64>().ok().map(|v| v as i32))
        .unwrap_or(0)
}

/// Parse an ASS timestamp (H:MM:SS.cc) to milliseconds
fn parse_ass_timestamp(value: &str) -> Result<i64> {
    let caps = ASS_TIMESTAMP_REGEX
        .captures(value)
        .ok_or_else(|| FormatError::Parse(format!("Invalid ASS timestamp: {}", value)))?;

    let hours: i64 = caps[1].parse().unwrap_or(0);
    let minutes: i64 = caps[2].parse().unwrap_or(0);
    let seconds: i64 = caps[3].parse().unwrap_or(0);
    let centis: i64 = caps[4].parse().unwrap_or(0);

    Ok(hours * 3_600_000 + minutes * 60_000 + seconds * 1_000 + centis * 10)
}

/// Format milliseconds as an ASS timestamp (H:MM:SS.cc, truncated to
/// centiseconds). Negative times clamp to zero on output only.
pub fn format_ass_timestamp(ms: i64) -> String {
    let ms = ms.max(0);
    let hours = ms / 3_600_000;
    let minutes = (ms % 3_600_000) / 60_000;
    let seconds = (ms % 60_000) / 1_000;
    let centis = (ms % 1_000) / 10;

    format!("{}:{:02}:{:02}.{:02}", hours, minutes, seconds, centis)
}

/// Format milliseconds as an SRT timestamp (HH:MM:SS,mmm)
pub fn format_srt_timestamp(ms: i64) -> String {
    let ms = ms.max(0);
    let hours = ms / 3_600_000;
    let minutes = (ms % 3_600_000) / 60_000;
    let seconds = (ms % 60_000) / 1_000;
    let millis = ms % 1_000;

    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
}

fn srt_caps_to_ms(caps: &regex::Captures, start_idx: usize) -> i64 {
    let hours: i64 = caps.get(start_idx).map_or(0, |m| m.as_str().parse().unwrap_or(0));
    let minutes: i64 = caps.get(start_idx + 1).map_or(0, |m| m.as_str().parse().unwrap_or(0));
    let seconds: i64 = caps.get(start_idx + 2).map_or(0, |m| m.as_str().parse().unwrap_or(0));
    let millis: i64 = caps.get(start_idx + 3).map_or(0, |m| m.as_str().parse().unwrap_or(0));

    (hours * 3600 + minutes * 60 + seconds) * 1000 + millis
}

/// ASS numeric fields drop the fraction when it is zero (20, not 20.0)
fn format_ass_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

fn format_style_line(name: &str, style: &Style) -> String {
    format!(
        "Style: {},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{}\n",
        name,
        style.font_name,
        format_ass_number(style.font_size),
        style.primary_colour,
        style.secondary_colour,
        style.outline_colour,
        style.back_colour,
        style.bold,
        style.italic,
        style.underline,
        style.strike_out,
        format_ass_number(style.scale_x),
        format_ass_number(style.scale_y),
        format_ass_number(style.spacing),
        format_ass_number(style.angle),
        style.border_style,
        format_ass_number(style.outline),
        format_ass_number(style.shadow),
        style.alignment,
        style.margin_l,
        style.margin_r,
        style.margin_v,
        style.encoding,
    )
}

fn format_event_line(event: &Event) -> String {
    format!(
        "{}: {},{},{},{},{},{},{},{},{},{}\n",
        event.kind,
        event.layer,
        format_ass_timestamp(event.start_ms),
        format_ass_timestamp(event.end_ms),
        event.style,
        event.name,
        event.margin_l,
        event.margin_r,
        event.margin_v,
        event.effect,
        event.text,
    )
}

impl fmt::Display for SubtitleDocument {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Subtitle Document")?;
        writeln!(f, "Format: {:?}", self.format)?;
        writeln!(f, "Styles: {}", self.styles.len())?;
        writeln!(f, "Events: {}", self.events.len())?;
        Ok(())
    }
}
