//! Telling which book a document is.

use serde::{Deserialize, Serialize};

use crate::condense::condense;
use crate::error::Error;
use crate::runs::StyleSheet;
use crate::source::PageSource;

/// Leading pages whose text is searched for identifying phrases.
pub const IDENTIFY_PAGES: usize = 5;

/// A phrase that, found in a document's opening pages, names the book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookPhrase {
    pub code: String,
    /// Lowercase phrase.
    pub phrase: String,
}

impl BookPhrase {
    pub fn new(code: &str, phrase: &str) -> Self {
        BookPhrase {
            code: code.to_string(),
            phrase: phrase.to_string(),
        }
    }
}

/// Built-in identification table. The first matching phrase wins.
pub fn default_phrases() -> Vec<BookPhrase> {
    [
        ("Mantis", "the mantis clan"),
        ("CoS", "courts of stone"),
        ("Core", "the land of ten thousand fortunes"),
        ("PoW", "welcome to the fringes of rokugan"),
        ("EE", "emerald empire"),
        ("CR", "celestial realms"),
        ("SL", "shadowlands"),
        ("FoV", "fields of victory"),
        ("GMK", "game master's kit"),
    ]
    .into_iter()
    .map(|(code, phrase)| BookPhrase::new(code, phrase))
    .collect()
}

/// Code of the first phrase contained in `text` (case-insensitive).
pub fn match_phrase<'a>(text: &str, phrases: &'a [BookPhrase]) -> Option<&'a str> {
    let text = text.to_lowercase();
    phrases
        .iter()
        .find(|p| text.contains(&p.phrase.to_lowercase()))
        .map(|p| p.code.as_str())
}

/// Condensed text of the opening pages, concatenated.
pub fn opening_text<S: PageSource + ?Sized>(source: &S, sheet: &StyleSheet) -> Result<String, Error> {
    let mut text = String::new();
    for index in 0..source.page_count().min(IDENTIFY_PAGES) {
        let runs = source.spread_runs(index)?;
        for block in condense(&runs, sheet, false) {
            text.push_str(&block.text);
        }
    }
    Ok(text)
}

/// Book code of `source`, or `None` when no phrase matches.
pub fn identify_book<S: PageSource + ?Sized>(
    source: &S,
    sheet: &StyleSheet,
    phrases: &[BookPhrase],
) -> Result<Option<String>, Error> {
    let text = opening_text(source, sheet)?;
    let code = match_phrase(&text, phrases).map(str::to_string);
    log::debug!("identified document as {code:?}");
    Ok(code)
}
