//! Icon glyph translation.
//!
//! The rulebooks set dice faces and technique categories in a private-use
//! icon font. Extracted text carries those glyphs verbatim; this module turns
//! them into bracketed tags that survive plain-text output.

/// Private-use codepoints and the tag each one is rendered as.
pub const ICON_TAGS: [(char, &str); 9] = [
    ('\u{f3b0}', "[Succ]"),
    ('\u{f3b2}', "[Exp]"),
    ('\u{f3b5}', "[RingDie]"),
    ('\u{f3b9}', "[Kata]"),
    ('\u{f3ba}', "[Shūji]"),
    ('\u{f3b7}', "[Ritual]"),
    ('\u{f3bc}', "[Invocation]"),
    ('\u{f3b8}', "[Ninjutsu]"),
    ('\u{f3bb}', "[Kihō]"),
];

fn icon_tag(c: char) -> Option<&'static str> {
    ICON_TAGS
        .iter()
        .find(|(glyph, _)| *glyph == c)
        .map(|(_, tag)| *tag)
}

/// Replace every icon glyph in `text` with its bracketed tag.
///
/// Characters outside [`ICON_TAGS`] are copied unchanged.
pub fn map_icons(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match icon_tag(c) {
            Some(tag) => out.push_str(tag),
            None => out.push(c),
        }
    }
    out
}
