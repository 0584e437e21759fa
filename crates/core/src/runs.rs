//! Raw text runs and the font conventions used to interpret them.

use serde::{Deserialize, Serialize};

/// Position and size of a run as reported by the page extractor.
///
/// `y` grows towards the top of the page, as in PDF user space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Geometry {
    pub x: f32,
    pub y: f32,
    /// Rendered glyph size.
    pub size: f32,
}

/// One atomic text fragment, in the order the extractor emitted it.
///
/// `text` may end with `\n` when the next run starts a new line, and with
/// `-` or `-\n` when a word is hyphenated across runs.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawRun {
    pub text: String,
    /// Base font name, e.g. `AvenirLTStd-Heavy`. `None` when the extractor
    /// could not resolve the font.
    pub font_id: Option<String>,
    pub geometry: Geometry,
}

impl RawRun {
    pub fn new(text: impl Into<String>, font_id: Option<&str>, geometry: Geometry) -> Self {
        RawRun {
            text: text.into(),
            font_id: font_id.map(str::to_string),
            geometry,
        }
    }

    /// The font name, or the empty string when unknown.
    pub fn font(&self) -> &str {
        self.font_id.as_deref().unwrap_or("")
    }
}

/// Italic/bold flags derived from a font name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StyleFlags {
    pub italic: bool,
    pub bold: bool,
}

impl StyleFlags {
    pub const PLAIN: StyleFlags = StyleFlags {
        italic: false,
        bold: false,
    };

    pub fn is_plain(&self) -> bool {
        !self.italic && !self.bold
    }
}

/// Substring markers identifying the role of each font family.
///
/// The books use a small closed set of typefaces: a title face for entry
/// headings, a sans body face with heavy and oblique cuts, an icon face for
/// dice and technique glyphs, ornaments, and a brush-stroke face that closes
/// an article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleSheet {
    pub title: String,
    pub bold: String,
    pub italic: String,
    pub body: String,
    pub icon: String,
    pub ornament: String,
    pub terminal: String,
    /// Runs smaller than this are candidates for decorative filler.
    pub filler_size: f32,
}

impl Default for StyleSheet {
    fn default() -> Self {
        StyleSheet {
            title: "BiolinumOB".to_string(),
            bold: "Heavy".to_string(),
            italic: "Oblique".to_string(),
            body: "Avenir".to_string(),
            icon: "RPGIcons".to_string(),
            ornament: "Ornament".to_string(),
            terminal: "brushtip".to_string(),
            filler_size: 8.0,
        }
    }
}

impl StyleSheet {
    pub fn is_title(&self, font: &str) -> bool {
        font.contains(&self.title)
    }

    pub fn is_bold(&self, font: &str) -> bool {
        font.contains(&self.bold)
    }

    pub fn is_italic(&self, font: &str) -> bool {
        font.contains(&self.italic)
    }

    pub fn is_body(&self, font: &str) -> bool {
        font.contains(&self.body)
    }

    pub fn is_icon(&self, font: &str) -> bool {
        font.contains(&self.icon)
    }

    pub fn is_ornament(&self, font: &str) -> bool {
        font.contains(&self.ornament)
    }

    pub fn is_terminal(&self, font: &str) -> bool {
        font.contains(&self.terminal)
    }

    pub fn flags(&self, font: &str) -> StyleFlags {
        StyleFlags {
            italic: self.is_italic(font),
            bold: self.is_bold(font),
        }
    }
}
