//! Entry location and body extraction.
//!
//! Given the condensed blocks of a page spread, finds the heading naming a
//! catalog entry and collects the text that belongs to it, shaped by the
//! entry's [`FormattingPolicy`].

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::condense::{condense, Classification, CondensedBlock};
use crate::error::Error;
use crate::icons::map_icons;
use crate::normalize::normalize_whitespace;
use crate::runs::StyleSheet;
use crate::source::PageSource;

const LIST_MARKER: &str = "\n- ";
const ADVANCE_MARKER: &str = "*ADVANCE";
const NEW_OPPORTUNITIES: &str = "New Opportunities";

/// Per item-type extraction rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormattingPolicy {
    /// Property labels (lowercase prefixes) whose label and value are dropped.
    pub ignored_properties: Vec<String>,
    /// Discard everything before the first bulleted effect.
    pub cut_to_list: bool,
    /// Entries open with a property list; a new body-face line after a value
    /// starts prose.
    pub beginning_properties: bool,
}

impl FormattingPolicy {
    pub fn ignores(&self, label: &str) -> bool {
        let label = label.to_lowercase();
        self.ignored_properties
            .iter()
            .any(|prefix| label.starts_with(&prefix.to_lowercase()))
    }
}

/// One extracted blurb.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedRecord {
    pub name: String,
    pub item_type: String,
    pub text: String,
    pub book: String,
    /// Physical page the search started on.
    pub page: usize,
}

/// What to extract and where.
#[derive(Debug, Clone, Copy)]
pub struct EntryRequest<'a> {
    pub name: &'a str,
    /// Name to look for among the headings; differs from `name` when an
    /// override applies.
    pub search_name: &'a str,
    pub item_type: &'a str,
    pub book: &'a str,
    /// Physical page index.
    pub page: usize,
    pub policy: &'a FormattingPolicy,
}

fn chars_only(text: &str) -> String {
    text.to_lowercase().chars().filter(|c| c.is_lowercase()).collect()
}

/// `prefix [bracketed] suffix (parenthetical)`; yields the prefix.
fn bracketed_prefix(heading: &str) -> Option<&str> {
    static RE_SHAPE: OnceLock<Regex> = OnceLock::new();
    let re = RE_SHAPE.get_or_init(|| Regex::new(r"^\s*(.*)\[(.*)\](.*)(\(.*\))?\s*$").unwrap());
    re.captures(heading)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Index of the block heading the entry `search_name`.
///
/// Four matching tiers are tried in order, and the first tier with any match
/// decides. Within a tier the last matching heading wins, since an entry's own
/// heading follows any chapter heading that mentions it.
pub fn find_heading(blocks: &[CondensedBlock], search_name: &str) -> Option<usize> {
    let headings: Vec<(usize, &str)> = blocks
        .iter()
        .enumerate()
        .filter(|(_, b)| b.classification == Classification::Heading)
        .map(|(i, b)| (i, b.text.as_str()))
        .collect();

    let lowered = search_name.to_lowercase();
    let squashed = chars_only(search_name);

    let tiers: [&dyn Fn(&str) -> bool; 4] = [
        &|text: &str| text.to_lowercase().contains(&lowered),
        &|text: &str| chars_only(text).contains(&squashed),
        &|text: &str| bracketed_prefix(text).is_some_and(|p| lowered.contains(&p.to_lowercase())),
        &|text: &str| bracketed_prefix(text).is_some_and(|p| squashed.contains(&chars_only(p))),
    ];

    tiers.iter().find_map(|matches| {
        headings
            .iter()
            .filter(|(_, text)| matches(*text))
            .map(|(i, _)| *i)
            .last()
    })
}

/// Collect the body of the entry whose heading is at `heading`.
///
/// Stops after the next heading or article-end block has been visited.
pub fn extract_body(
    blocks: &[CondensedBlock],
    heading: usize,
    item_type: &str,
    policy: &FormattingPolicy,
) -> String {
    let mut blurb = String::new();
    let mut list_started = false;
    let mut i = heading + 1;

    while i < blocks.len() {
        let block = &blocks[i];
        let class = &block.classification;
        let text = block.text.as_str();

        if *class == Classification::PropertyName && policy.ignores(text) {
            // The value goes with it, when there is one.
            let paired = blocks
                .get(i + 1)
                .is_some_and(|next| next.classification == Classification::PropertyValue);
            i += if paired { 2 } else { 1 };
            continue;
        }

        if text.contains('$') {
            let listed = text.replace('$', LIST_MARKER);
            if policy.cut_to_list && !list_started {
                let start = listed.find(LIST_MARKER).map_or(0, |p| p + 1);
                blurb = listed[start..].to_string();
            } else {
                blurb.push_str(&listed);
            }
            list_started = true;
        } else if policy.cut_to_list && !list_started {
            // Prose before the effect list.
        } else if text == NEW_OPPORTUNITIES {
            blurb.push_str("\n\n*New Opportunities:*\n");
        } else if class.is_italic_aside() {
            // Flavor quotes and captions.
        } else if item_type == "school" && text.contains(ADVANCE_MARKER) {
            let cut = text.find(ADVANCE_MARKER).unwrap_or(text.len());
            blurb.push_str(text[..cut].trim());
            break;
        } else {
            match class {
                Classification::Basic => {
                    blurb.push_str(text.trim_end());
                    blurb.push(' ');
                }
                Classification::PropertyName => {
                    if !blurb.is_empty() && !blurb.ends_with('\n') {
                        blurb.push('\n');
                    }
                    let label = text.trim().trim_end_matches(':');
                    blurb.push_str(&format!("*{label}:* "));
                }
                Classification::PropertyValue => {
                    blurb.push_str(text);
                    blurb.push('\n');
                }
                _ => {}
            }
        }

        log::trace!("{i} {} {text}", class.label());

        if *class == Classification::Heading || class.is_terminal() {
            break;
        }
        i += 1;
    }

    let blurb = blurb.trim_start_matches('\n').trim_end();
    map_icons(&normalize_whitespace(blurb)).trim_end().to_string()
}

/// Locate and extract one entry from already condensed blocks.
pub fn extract_entry(
    blocks: &[CondensedBlock],
    request: &EntryRequest<'_>,
) -> Result<ExtractedRecord, Error> {
    let heading =
        find_heading(blocks, request.search_name).ok_or_else(|| Error::HeadingNotFound {
            name: request.name.to_string(),
            item_type: request.item_type.to_string(),
            book: request.book.to_string(),
            page: request.page,
        })?;

    Ok(ExtractedRecord {
        name: request.name.to_string(),
        item_type: request.item_type.to_string(),
        text: extract_body(blocks, heading, request.item_type, request.policy),
        book: request.book.to_string(),
        page: request.page,
    })
}

/// Condense the requested page and the next one, then extract the entry.
pub fn extract_blurb<S: PageSource + ?Sized>(
    source: &S,
    sheet: &StyleSheet,
    request: &EntryRequest<'_>,
) -> Result<ExtractedRecord, Error> {
    if request.page >= source.page_count() {
        return Err(Error::PageOutOfRange {
            index: request.page as i64,
            count: source.page_count(),
        });
    }
    let runs = source.spread_runs(request.page)?;
    let blocks = condense(&runs, sheet, request.policy.beginning_properties);
    extract_entry(&blocks, request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runs::{Geometry, RawRun};

    fn block(text: &str, classification: Classification) -> CondensedBlock {
        CondensedBlock::new(text, classification)
    }

    fn heading(text: &str) -> CondensedBlock {
        block(text, Classification::Heading)
    }

    fn request<'a>(name: &'a str, item_type: &'a str, policy: &'a FormattingPolicy) -> EntryRequest<'a> {
        EntryRequest {
            name,
            search_name: name,
            item_type,
            book: "CoS",
            page: 88,
            policy,
        }
    }

    #[test]
    fn test_property_then_prose() {
        let blocks = vec![
            heading("Gift of Air"),
            block("Ring Increase:", Classification::PropertyName),
            block("Water", Classification::PropertyValue),
            block("A gift from the elements.", Classification::Basic),
            heading("Next Entry"),
        ];
        let policy = FormattingPolicy::default();
        let record = extract_entry(&blocks, &request("Gift of Air", "technique", &policy)).unwrap();
        assert_eq!(record.text, "*Ring Increase:* Water\nA gift from the elements.");
        assert_eq!(record.book, "CoS");
        assert_eq!(record.page, 88);
    }

    #[test]
    fn test_later_heading_wins_within_tier() {
        let blocks = vec![
            heading("Air Techniques"),
            block("Chapter intro.", Classification::Basic),
            heading("Air"),
            block("The right one.", Classification::Basic),
        ];
        assert_eq!(find_heading(&blocks, "Air"), Some(2));
    }

    #[test]
    fn test_heading_tiers() {
        // Tier 2: punctuation and case differ.
        let blocks = vec![heading("KAKITA-DUELIST")];
        assert_eq!(find_heading(&blocks, "Kakita Duelist"), Some(0));

        // Tier 3: bracketed qualifier inside the heading.
        let blocks = vec![heading("Shinjo [Battle] Strike (Rank 2)")];
        assert_eq!(find_heading(&blocks, "Shinjo Strike"), Some(0));

        // Tier 4: the prefix only matches letter by letter.
        let blocks = vec![heading("Iron-Forest [Kata]")];
        assert_eq!(find_heading(&blocks, "Iron Forest Style"), Some(0));
    }

    #[test]
    fn test_earlier_tier_takes_precedence() {
        let blocks = vec![
            heading("Striking [Kata] Wave"),
            heading("Striking Wave"),
            heading("Other"),
        ];
        assert_eq!(find_heading(&blocks, "Striking Wave"), Some(1));
    }

    #[test]
    fn test_non_headings_are_not_candidates() {
        let blocks = vec![block("Gift of Air", Classification::Basic)];
        assert_eq!(find_heading(&blocks, "Gift of Air"), None);
    }

    #[test]
    fn test_not_found_carries_context() {
        let blocks = vec![heading("Something Else")];
        let policy = FormattingPolicy::default();
        let err = extract_entry(&blocks, &request("Gift of Air", "technique", &policy)).unwrap_err();
        match err {
            Error::HeadingNotFound { name, book, page, .. } => {
                assert_eq!(name, "Gift of Air");
                assert_eq!(book, "CoS");
                assert_eq!(page, 88);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_ignored_property_and_value_are_skipped() {
        let blocks = vec![
            heading("Shika"),
            block("Ring Increase", Classification::PropertyName),
            block("+1 Water", Classification::PropertyValue),
            block("Glory", Classification::PropertyName),
            block("40", Classification::PropertyValue),
            block("A family of deer keepers.", Classification::Basic),
        ];
        let policy = FormattingPolicy {
            ignored_properties: vec!["ring increase".into(), "glory".into()],
            beginning_properties: true,
            ..FormattingPolicy::default()
        };
        let record = extract_entry(&blocks, &request("Shika", "family", &policy)).unwrap();
        assert_eq!(record.text, "A family of deer keepers.");
    }

    #[test]
    fn test_ignored_label_without_value_keeps_next_heading() {
        let blocks = vec![
            heading("Kaeru Assassin School"),
            block("Assassins.", Classification::Basic),
            block("Kata", Classification::PropertyName),
            heading("Shika Speardancer"),
            block("Deer riders from another entry.", Classification::Basic),
        ];
        let policy = FormattingPolicy {
            ignored_properties: vec!["kata".into()],
            ..FormattingPolicy::default()
        };
        let record =
            extract_entry(&blocks, &request("Kaeru Assassin School", "school", &policy)).unwrap();
        assert_eq!(record.text, "Assassins.");
    }

    #[test]
    fn test_cut_to_list_drops_leading_prose() {
        let blocks = vec![
            heading("Well Connected"),
            block("Intro prose.", Classification::Basic),
            block("Effects", Classification::PropertyName),
            block("Some setup $First effect. $Second effect.", Classification::Basic),
            heading("Famously Neutral"),
        ];
        let policy = FormattingPolicy {
            cut_to_list: true,
            ..FormattingPolicy::default()
        };
        let record = extract_entry(&blocks, &request("Well Connected", "distinction", &policy)).unwrap();
        assert_eq!(record.text, "- First effect.\n- Second effect.");
        assert!(!record.text.contains("Intro"));
    }

    #[test]
    fn test_list_without_cut_keeps_prose() {
        let blocks = vec![
            heading("Pot Stirrer"),
            block("You like trouble.", Classification::Basic),
            block("Effects", Classification::PropertyName),
            block("$Gain a strife.", Classification::PropertyValue),
        ];
        let policy = FormattingPolicy::default();
        let record = extract_entry(&blocks, &request("Pot Stirrer", "passion", &policy)).unwrap();
        assert_eq!(record.text, "You like trouble.\n*Effects:*\n- Gain a strife.");
    }

    #[test]
    fn test_school_stops_at_advance_table() {
        let blocks = vec![
            heading("Bayushi Deathdealer"),
            block("Rings", Classification::PropertyName),
            block("+1 Fire", Classification::PropertyValue),
            block("Assassins of the Scorpion. *ADVANCE* TABLE", Classification::Basic),
            block("Never reached", Classification::PropertyName),
        ];
        let policy = FormattingPolicy {
            ignored_properties: vec!["rings".into()],
            ..FormattingPolicy::default()
        };
        let record = extract_entry(&blocks, &request("Bayushi Deathdealer", "school", &policy)).unwrap();
        assert_eq!(record.text, "Assassins of the Scorpion.");
    }

    #[test]
    fn test_italic_asides_and_terminal_glyph() {
        let aside = Classification::Other {
            font: "Garamond-Oblique".into(),
            italic: true,
            terminal: false,
        };
        let end = Classification::Other {
            font: "brushtip".into(),
            italic: false,
            terminal: true,
        };
        let blocks = vec![
            heading("Folding Fan"),
            block("A fan.", Classification::Basic),
            block("A quote from a courtier.", aside),
            block("Folds.", Classification::Basic),
            block("x", end),
            block("Past the end.", Classification::Basic),
        ];
        let policy = FormattingPolicy::default();
        let record = extract_entry(&blocks, &request("Folding Fan", "gear", &policy)).unwrap();
        assert_eq!(record.text, "A fan. Folds.");
    }

    #[test]
    fn test_new_opportunities_banner_and_icons() {
        let blocks = vec![
            heading("Deer"),
            block("Spend \u{f3b0} to act.", Classification::Basic),
            block(NEW_OPPORTUNITIES, Classification::PropertyName),
            block("\u{f3b2}: Gain more.", Classification::PropertyValue),
        ];
        let policy = FormattingPolicy::default();
        let record = extract_entry(&blocks, &request("Deer", "clan", &policy)).unwrap();
        assert_eq!(
            record.text,
            "Spend [Succ] to act.\n\n*New Opportunities:*\n[Exp]: Gain more."
        );
    }

    #[test]
    fn test_extract_blurb_reads_following_page() {
        let at = |text: &str, font: &str, y: f32| {
            RawRun::new(text, Some(font), Geometry { x: 10.0, y, size: 10.0 })
        };
        let pages = vec![
            vec![at("Folding Half-Bow\n", "LinBiolinumOB", 700.0)],
            vec![at("Collapses for travel.", "AvenirLTStd-Book", 700.0)],
        ];
        let policy = FormattingPolicy::default();
        let mut req = request("Folding Half-Bow", "gear", &policy);
        req.page = 0;
        let record = extract_blurb(&pages, &StyleSheet::default(), &req).unwrap();
        assert_eq!(record.text, "Collapses for travel.");

        req.page = 5;
        assert!(matches!(
            extract_blurb(&pages, &StyleSheet::default(), &req),
            Err(Error::PageOutOfRange { index: 5, count: 2 })
        ));
    }

    #[test]
    fn test_policy_ignores_by_prefix() {
        let policy = FormattingPolicy {
            ignored_properties: vec!["starting skills".into()],
            ..FormattingPolicy::default()
        };
        assert!(policy.ignores("Starting Skills (choose five)"));
        assert!(!policy.ignores("Skills"));
    }
}
