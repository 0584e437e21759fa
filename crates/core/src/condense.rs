//! Run classification and condensation.
//!
//! Turns the flat run sequence of a page into [`CondensedBlock`]s: maximal
//! stretches of text sharing one [`Classification`]. The classifier is a
//! finite-state machine whose input alphabet is the run's [`Signal`] (derived
//! from its font and text shape) and whose state is the classification of the
//! block being accumulated.
//!
//! ```text
//! RawRun[]  ->  Signal  ->  transition  ->  Aggregate  ->  CondensedBlock[]
//!                (font)     (state, signal)  (joins, emphasis)
//! ```

use serde::{Deserialize, Serialize};

use crate::normalize::remove_redundancy;
use crate::runs::{RawRun, StyleFlags, StyleSheet};

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Role of a condensed block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Classification {
    Heading,
    PropertyName,
    PropertyValue,
    Basic,
    /// Text set in a font outside the role families (sidebars, captions,
    /// article-end glyphs). Keeps the font name so consecutive runs in the
    /// same font stay together.
    Other {
        font: String,
        italic: bool,
        terminal: bool,
    },
}

impl Classification {
    fn other(font: &str, sheet: &StyleSheet) -> Self {
        Classification::Other {
            font: font.to_string(),
            italic: sheet.is_italic(font),
            terminal: sheet.is_terminal(font),
        }
    }

    /// Whether this block is set in the article-end face.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Classification::Other { terminal: true, .. })
    }

    /// Whether this block is italic text outside the body face.
    pub fn is_italic_aside(&self) -> bool {
        matches!(self, Classification::Other { italic: true, .. })
    }

    /// Short label used in diagnostics.
    pub fn label(&self) -> &str {
        match self {
            Classification::Heading => "Heading",
            Classification::PropertyName => "PropertyName",
            Classification::PropertyValue => "PropertyValue",
            Classification::Basic => "Basic",
            Classification::Other { font, .. } => font,
        }
    }

    /// Whether emphasis markers are reproduced inside blocks of this kind.
    fn carries_emphasis(&self) -> bool {
        matches!(
            self,
            Classification::Basic | Classification::PropertyValue
        )
    }
}

/// A maximal run of consecutive raw runs sharing one classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CondensedBlock {
    pub text: String,
    pub classification: Classification,
}

impl CondensedBlock {
    pub fn new(text: impl Into<String>, classification: Classification) -> Self {
        CondensedBlock {
            text: text.into(),
            classification,
        }
    }
}

/// What a single run tells the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// Entry title face.
    Title,
    /// Bold text ending with a colon: a property label.
    Label,
    /// Body face.
    Body,
    /// Icon glyph face.
    Icon,
    /// Any other face.
    Foreign,
}

impl Signal {
    pub fn of(run: &RawRun, sheet: &StyleSheet) -> Signal {
        let font = run.font();
        if sheet.is_title(font) {
            Signal::Title
        } else if run.text.trim_end().ends_with(':') && sheet.is_bold(font) {
            Signal::Label
        } else if sheet.is_body(font) {
            Signal::Body
        } else if sheet.is_icon(font) {
            Signal::Icon
        } else {
            Signal::Foreign
        }
    }
}

/// Outcome of feeding one run to the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Keep accumulating into the current block.
    Stay,
    /// Close the current block and start one with the given classification.
    Close(Classification),
    /// Close the current block and start a property label, carrying trailing
    /// icons and bold text of the outgoing block into the label.
    OpenLabel,
}

/// Transition table of the classifier.
///
/// Rows are tried top to bottom; `same_line` is false when the run starts a
/// new line of text.
pub fn transition(
    state: &Classification,
    run: &RawRun,
    same_line: bool,
    beginning_properties: bool,
    sheet: &StyleSheet,
) -> Transition {
    use Classification as C;

    if let C::Other { font, .. } = state {
        if font == run.font() {
            return Transition::Stay;
        }
    }

    match (state, Signal::of(run, sheet)) {
        (C::Heading, Signal::Title) => Transition::Stay,
        (_, Signal::Title) => Transition::Close(C::Heading),
        (_, Signal::Label) => Transition::OpenLabel,
        (C::PropertyName, _) => Transition::Close(C::PropertyValue),
        (C::PropertyValue, _) if same_line => Transition::Stay,
        (C::PropertyValue, Signal::Body) if !beginning_properties => Transition::Stay,
        (C::Basic, Signal::Body) => Transition::Stay,
        (_, Signal::Body) => Transition::Close(C::Basic),
        (_, Signal::Icon) => Transition::Stay,
        (_, Signal::Foreign) => Transition::Close(C::other(run.font(), sheet)),
    }
}

// ---------------------------------------------------------------------------
// Aggregate: text of the block being built
// ---------------------------------------------------------------------------

/// Text buffer of the block under construction.
///
/// Emphasis is tracked as an open span: the opening markers are written when
/// a styled run starts, the closing markers only when a run with a different
/// style arrives or the block closes. The word separator after a run is kept
/// pending so closing markers land before it.
#[derive(Debug, Default)]
struct Aggregate {
    text: String,
    open: StyleFlags,
    pending_space: bool,
    /// Offset of the first icon glyph of the trailing icon sequence.
    icon_start: Option<usize>,
}

impl Aggregate {
    fn seeded(text: String) -> Self {
        Aggregate {
            text,
            ..Aggregate::default()
        }
    }

    fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    fn close_span(&mut self) {
        if self.open.italic {
            self.text.push('/');
        }
        if self.open.bold {
            self.text.push('*');
        }
        self.open = StyleFlags::PLAIN;
    }

    fn open_span(&mut self, style: StyleFlags) {
        if style.bold {
            self.text.push('*');
        }
        if style.italic {
            self.text.push('/');
        }
        self.open = style;
    }

    fn flush_space(&mut self) {
        if self.pending_space {
            self.text.push(' ');
            self.pending_space = false;
        }
    }

    /// Prepare for the next run's text: settle the separator and switch the
    /// emphasis span when the style changes.
    fn begin_run(&mut self, style: StyleFlags, glued: bool) {
        if glued {
            self.pending_space = false;
        }
        if self.open != style {
            self.close_span();
            self.flush_space();
            self.open_span(style);
        } else {
            self.flush_space();
        }
    }

    /// Append run text, repairing hyphenation and line ends.
    fn push_run_text(&mut self, text: &str) {
        if let Some(stem) = text.strip_suffix('-') {
            self.text.push_str(stem.trim());
        } else if let Some(stem) = text.strip_suffix("-\n") {
            self.text.push_str(stem.trim());
        } else if text.ends_with('\n') || text.ends_with(' ') {
            self.text.push_str(text.trim());
            self.pending_space = true;
        } else {
            self.text.push_str(text);
            self.pending_space = true;
        }
    }

    fn push_label_text(&mut self, text: &str) {
        self.flush_space();
        self.text.push_str(text.trim().trim_end_matches(':'));
    }

    /// Start a hanging-indent continuation line.
    fn indent(&mut self) {
        self.close_span();
        let kept = self.text.trim_end().len();
        self.text.truncate(kept);
        self.text.push_str("\n\t");
        self.pending_space = false;
        self.icon_start = None;
    }

    /// Detach the text that visually prefixes a property label: the trailing
    /// icon glyphs, then any bold spans right before them.
    fn take_label_prefix(&mut self) -> String {
        let mut prefix = String::new();
        if let Some(start) = self.icon_start.take() {
            if start <= self.text.len() {
                prefix = self.text.split_off(start);
                prefix.push(' ');
            }
        }
        self.close_span();
        self.pending_space = false;

        loop {
            let trimmed = self.text.trim_end();
            let Some(body) = trimmed.strip_suffix('*') else {
                break;
            };
            match body.rfind('*') {
                Some(open) => {
                    prefix = format!("{} {}", &body[open + 1..], prefix);
                    self.text = body[..open].trim().to_string();
                }
                None => {
                    prefix = format!("{} {}", body, prefix);
                    self.text.clear();
                }
            }
        }
        prefix
    }

    fn finish(mut self) -> String {
        self.close_span();
        self.text.trim().to_string()
    }
}

// ---------------------------------------------------------------------------
// Condenser
// ---------------------------------------------------------------------------

/// Incremental classifier over a run sequence.
///
/// Feed runs in reading order with [`Condenser::feed`] and collect the blocks
/// with [`Condenser::finish`].
pub struct Condenser<'a> {
    sheet: &'a StyleSheet,
    beginning_properties: bool,
    state: Classification,
    aggregate: Aggregate,
    /// Last run that was not discarded.
    last: Option<RawRun>,
    /// Whether the previous raw run (discarded or not) ended a line.
    previous_ended_line: bool,
    blocks: Vec<CondensedBlock>,
}

impl<'a> Condenser<'a> {
    pub fn new(sheet: &'a StyleSheet, beginning_properties: bool) -> Self {
        Condenser {
            sheet,
            beginning_properties,
            state: Classification::other("", sheet),
            aggregate: Aggregate::default(),
            last: None,
            previous_ended_line: false,
            blocks: Vec::new(),
        }
    }

    pub fn feed(&mut self, run: &RawRun) {
        let new_line = run.text.starts_with('\n') || self.previous_ended_line;
        self.previous_ended_line = run.text.ends_with('\n');

        if run.text.trim().is_empty() || self.is_filler(run) {
            return;
        }

        let font = run.font();
        let is_icon = self.sheet.is_icon(font);

        match transition(
            &self.state,
            run,
            !new_line,
            self.beginning_properties,
            self.sheet,
        ) {
            Transition::Stay => {}
            Transition::Close(next) => self.close_block(next, String::new()),
            Transition::OpenLabel => {
                let prefix = self.aggregate.take_label_prefix();
                self.close_block(Classification::PropertyName, prefix);
            }
        }

        if !is_icon {
            self.aggregate.icon_start = None;
        }

        if let Some(last) = &self.last {
            let indented = run.geometry.x - last.geometry.x > 1.0;
            let next_row = run.geometry.y - last.geometry.y < -1.0;
            if !self.aggregate.is_empty()
                && indented
                && next_row
                && !self.aggregate.text.contains('$')
            {
                self.aggregate.indent();
            }
        }

        if self.state == Classification::PropertyName {
            self.aggregate.push_label_text(&run.text);
        } else {
            let style = if self.state.carries_emphasis() {
                self.sheet.flags(font)
            } else {
                StyleFlags::PLAIN
            };
            // A lone body-face character is a kerning split of the previous word.
            let glued = run.text.chars().count() == 1 && self.sheet.is_body(font);
            self.aggregate.begin_run(style, glued);
            if is_icon && self.aggregate.icon_start.is_none() {
                self.aggregate.icon_start = Some(self.aggregate.text.len());
            }
            self.aggregate.push_run_text(&run.text);
        }

        self.last = Some(run.clone());
    }

    pub fn finish(mut self) -> Vec<CondensedBlock> {
        let state = self.state.clone();
        self.close_block(state, String::new());
        self.blocks
    }

    /// Small glyphs between two non-ornament runs are decorative filler.
    fn is_filler(&self, run: &RawRun) -> bool {
        let Some(last) = &self.last else {
            return false;
        };
        let Some(last_font) = &last.font_id else {
            return false;
        };
        run.geometry.size < self.sheet.filler_size
            && !self.sheet.is_ornament(run.font())
            && !self.sheet.is_ornament(last_font)
    }

    fn close_block(&mut self, next: Classification, seed: String) {
        let aggregate = std::mem::replace(&mut self.aggregate, Aggregate::seeded(seed));
        let text = aggregate.finish();
        let classification = std::mem::replace(&mut self.state, next);
        if !text.is_empty() {
            self.push_block(remove_redundancy(&text), classification);
        }
    }

    fn push_block(&mut self, text: String, classification: Classification) {
        if let Some(last) = self.blocks.last_mut() {
            if last.classification == classification {
                last.text = remove_redundancy(&format!("{} {}", last.text, text));
                return;
            }
        }
        self.blocks.push(CondensedBlock {
            text,
            classification,
        });
    }
}

/// Condense a page's runs (optionally followed by the next page's) into
/// classified blocks.
pub fn condense(
    runs: &[RawRun],
    sheet: &StyleSheet,
    beginning_properties: bool,
) -> Vec<CondensedBlock> {
    let mut condenser = Condenser::new(sheet, beginning_properties);
    for run in runs {
        condenser.feed(run);
    }
    let blocks = condenser.finish();
    log::debug!("condensed {} runs into {} blocks", runs.len(), blocks.len());
    blocks
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runs::Geometry;

    const TITLE: &str = "LinBiolinumOB";
    const BOOK: &str = "AvenirLTStd-Book";
    const OBLIQUE: &str = "AvenirLTStd-Oblique";
    const HEAVY: &str = "AvenirLTStd-Heavy";
    const ICONS: &str = "RPGIcons";
    const SIDEBAR: &str = "Garamond-Italic";
    const SIDEBAR_OBLIQUE: &str = "Garamond-Oblique";
    const BRUSH: &str = "brushtipTexe";

    /// Runs laid out left to right on one row.
    fn row(parts: &[(&str, &str)]) -> Vec<RawRun> {
        parts
            .iter()
            .enumerate()
            .map(|(i, (text, font))| {
                RawRun::new(
                    *text,
                    Some(*font),
                    Geometry {
                        x: 10.0 + i as f32 * 30.0,
                        y: 700.0,
                        size: 10.0,
                    },
                )
            })
            .collect()
    }

    fn run_at(text: &str, font: &str, x: f32, y: f32) -> RawRun {
        RawRun::new(text, Some(font), Geometry { x, y, size: 10.0 })
    }

    fn texts(blocks: &[CondensedBlock]) -> Vec<(&str, &str)> {
        blocks
            .iter()
            .map(|b| (b.text.as_str(), b.classification.label()))
            .collect()
    }

    fn sheet() -> StyleSheet {
        StyleSheet::default()
    }

    // =====================================================================
    // transition table
    // =====================================================================

    #[test]
    fn test_title_opens_heading_once() {
        let s = sheet();
        let run = run_at("Gift", TITLE, 0.0, 0.0);
        assert_eq!(
            transition(&Classification::Basic, &run, true, false, &s),
            Transition::Close(Classification::Heading)
        );
        assert_eq!(
            transition(&Classification::Heading, &run, true, false, &s),
            Transition::Stay
        );
    }

    #[test]
    fn test_label_requires_bold_and_colon() {
        let s = sheet();
        let label = run_at("Ring Increase: ", HEAVY, 0.0, 0.0);
        let plain_colon = run_at("Note:", BOOK, 0.0, 0.0);
        assert_eq!(
            transition(&Classification::Heading, &label, true, false, &s),
            Transition::OpenLabel
        );
        assert_eq!(
            transition(&Classification::Heading, &plain_colon, true, false, &s),
            Transition::Close(Classification::Basic)
        );
    }

    #[test]
    fn test_property_name_always_yields_value() {
        let s = sheet();
        for font in [BOOK, HEAVY, ICONS, SIDEBAR] {
            let run = run_at("Water", font, 0.0, 0.0);
            assert_eq!(
                transition(&Classification::PropertyName, &run, false, true, &s),
                Transition::Close(Classification::PropertyValue),
                "font {font}"
            );
        }
    }

    #[test]
    fn test_property_value_continuation() {
        let s = sheet();
        let body = run_at("more", BOOK, 0.0, 0.0);
        let sidebar = run_at("aside", SIDEBAR, 0.0, 0.0);
        let pv = Classification::PropertyValue;

        // Same line: any face continues the value.
        assert_eq!(transition(&pv, &sidebar, true, true, &s), Transition::Stay);
        // New line in the body face: continues only outside property lists.
        assert_eq!(transition(&pv, &body, false, false, &s), Transition::Stay);
        assert_eq!(
            transition(&pv, &body, false, true, &s),
            Transition::Close(Classification::Basic)
        );
        assert!(matches!(
            transition(&pv, &sidebar, false, false, &s),
            Transition::Close(Classification::Other { .. })
        ));
    }

    #[test]
    fn test_icon_never_changes_state() {
        let s = sheet();
        let icon = run_at("\u{f3b0}", ICONS, 0.0, 0.0);
        for state in [Classification::Basic, Classification::Heading] {
            assert_eq!(transition(&state, &icon, false, false, &s), Transition::Stay);
        }
    }

    #[test]
    fn test_same_foreign_font_stays() {
        let s = sheet();
        let state = Classification::other(SIDEBAR, &s);
        let run = run_at("x", SIDEBAR, 0.0, 0.0);
        assert_eq!(transition(&state, &run, false, false, &s), Transition::Stay);
        let other = run_at("x", BRUSH, 0.0, 0.0);
        assert_eq!(
            transition(&state, &other, false, false, &s),
            Transition::Close(Classification::other(BRUSH, &s))
        );
    }

    // =====================================================================
    // condense
    // =====================================================================

    #[test]
    fn test_heading_property_and_body() {
        let runs = row(&[
            ("Gift of Air\n", TITLE),
            ("Ring Increase:", HEAVY),
            (" Water\n", BOOK),
            ("A gift from the elements.", BOOK),
        ]);
        let blocks = condense(&runs, &sheet(), true);
        assert_eq!(
            texts(&blocks),
            vec![
                ("Gift of Air", "Heading"),
                ("Ring Increase", "PropertyName"),
                ("Water", "PropertyValue"),
                ("A gift from the elements.", "Basic"),
            ]
        );
    }

    #[test]
    fn test_emphasis_closes_before_trailing_space() {
        let runs = row(&[("Text ", BOOK), ("wind", OBLIQUE), (" blows", BOOK)]);
        let blocks = condense(&runs, &sheet(), false);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].text, "Text /wind/ blows");
    }

    #[test]
    fn test_italic_word_then_plain_continuation() {
        let runs = row(&[("wind", OBLIQUE), (" blows", BOOK)]);
        let blocks = condense(&runs, &sheet(), false);
        assert_eq!(blocks[0].text, "/wind/ blows");
    }

    #[test]
    fn test_consecutive_styled_runs_share_one_span() {
        let runs = row(&[
            ("Start ", BOOK),
            ("the ", OBLIQUE),
            ("wind", OBLIQUE),
            (" blows", BOOK),
        ]);
        let blocks = condense(&runs, &sheet(), false);
        assert_eq!(blocks[0].text, "Start /the wind/ blows");
    }

    #[test]
    fn test_bold_span_and_bold_italic() {
        let runs = row(&[
            ("Spend ", BOOK),
            ("two", HEAVY),
            (" and ", BOOK),
            ("both", "AvenirLTStd-HeavyOblique"),
        ]);
        let blocks = condense(&runs, &sheet(), false);
        assert_eq!(blocks[0].text, "Spend *two* and */both/*");
    }

    #[test]
    fn test_single_character_rejoins_word() {
        let runs = row(&[("Begin ", BOOK), ("wor", OBLIQUE), ("d", OBLIQUE), (" end", BOOK)]);
        let blocks = condense(&runs, &sheet(), false);
        assert_eq!(blocks[0].text, "Begin /word/ end");

        let runs = row(&[("sta", BOOK), ("r", BOOK), ("t", BOOK)]);
        let blocks = condense(&runs, &sheet(), false);
        assert_eq!(blocks[0].text, "start");
    }

    #[test]
    fn test_hyphenation_joins() {
        let runs = row(&[("extra-", BOOK), ("ordinary ", BOOK), ("situ-\n", BOOK), ("ation", BOOK)]);
        let blocks = condense(&runs, &sheet(), false);
        assert_eq!(blocks[0].text, "extraordinary situation");
    }

    #[test]
    fn test_whitespace_runs_are_dropped() {
        let runs = row(&[("one", BOOK), ("   ", BOOK), ("\n", BOOK), ("two", BOOK)]);
        let blocks = condense(&runs, &sheet(), false);
        assert_eq!(blocks[0].text, "one two");
    }

    #[test]
    fn test_small_filler_glyph_is_dropped() {
        let mut runs = row(&[("before", BOOK), ("~", SIDEBAR), ("after", BOOK)]);
        runs[1].geometry.size = 4.0;
        let blocks = condense(&runs, &sheet(), false);
        assert_eq!(texts(&blocks), vec![("before after", "Basic")]);
    }

    #[test]
    fn test_small_run_after_unknown_font_is_kept() {
        let mut runs = row(&[("lead", BOOK), ("x", BOOK)]);
        runs[0].font_id = None;
        runs[1].geometry.size = 4.0;
        let blocks = condense(&runs, &sheet(), false);
        assert!(blocks.iter().any(|b| b.text.contains('x')));
    }

    #[test]
    fn test_indented_continuation_line() {
        let runs = vec![
            run_at("$First effect", BOOK, 10.0, 700.0),
            run_at("Intro line", BOOK, 10.0, 680.0),
            run_at("continued", BOOK, 20.0, 668.0),
        ];
        // A `$` in the aggregate suppresses indentation.
        let blocks = condense(&runs, &sheet(), false);
        assert!(!blocks[0].text.contains('\t'));

        let runs = vec![
            run_at("Intro line", BOOK, 10.0, 700.0),
            run_at("continued", BOOK, 20.0, 688.0),
        ];
        let blocks = condense(&runs, &sheet(), false);
        assert_eq!(blocks[0].text, "Intro line\n\tcontinued");
    }

    #[test]
    fn test_icons_move_into_following_label() {
        let runs = row(&[
            ("Kata Name\n", TITLE),
            ("Some words ", BOOK),
            ("\u{f3b9}", ICONS),
            ("Activation:", HEAVY),
            (" As an action", BOOK),
        ]);
        let blocks = condense(&runs, &sheet(), false);
        assert_eq!(
            texts(&blocks),
            vec![
                ("Kata Name", "Heading"),
                ("Some words", "Basic"),
                ("\u{f3b9} Activation", "PropertyName"),
                ("As an action", "PropertyValue"),
            ]
        );
    }

    #[test]
    fn test_icons_after_heading_move_into_label() {
        let runs = row(&[
            ("Kata Name\n", TITLE),
            ("\u{f3b9}", ICONS),
            ("Activation:", HEAVY),
            (" As an action", BOOK),
        ]);
        let blocks = condense(&runs, &sheet(), false);
        assert_eq!(
            texts(&blocks),
            vec![
                ("Kata Name", "Heading"),
                ("\u{f3b9} Activation", "PropertyName"),
                ("As an action", "PropertyValue"),
            ]
        );
    }

    #[test]
    fn test_bold_prefix_unwinds_into_label() {
        let runs = row(&[
            ("Body text ", BOOK),
            ("Ring ", HEAVY),
            ("Increase:", HEAVY),
            (" Water", BOOK),
        ]);
        let blocks = condense(&runs, &sheet(), true);
        assert_eq!(
            texts(&blocks),
            vec![
                ("Body text", "Basic"),
                ("Ring Increase", "PropertyName"),
                ("Water", "PropertyValue"),
            ]
        );
    }

    #[test]
    fn test_property_value_wraps_in_body_face_without_beginning_properties() {
        let runs = vec![
            run_at("Cost:", HEAVY, 10.0, 700.0),
            run_at(" 10 koku\n", BOOK, 40.0, 700.0),
            run_at("or trade goods", BOOK, 10.0, 688.0),
        ];
        let blocks = condense(&runs, &sheet(), false);
        assert_eq!(
            texts(&blocks),
            vec![("Cost", "PropertyName"), ("10 koku or trade goods", "PropertyValue")]
        );

        let blocks = condense(&runs, &sheet(), true);
        assert_eq!(
            texts(&blocks),
            vec![
                ("Cost", "PropertyName"),
                ("10 koku", "PropertyValue"),
                ("or trade goods", "Basic"),
            ]
        );
    }

    #[test]
    fn test_foreign_fonts_keep_traits() {
        let runs = row(&[
            ("Body", BOOK),
            ("A marginal note", SIDEBAR_OBLIQUE),
            ("\u{e000}", BRUSH),
        ]);
        let blocks = condense(&runs, &sheet(), false);
        assert_eq!(blocks.len(), 3);
        assert!(blocks[1].classification.is_italic_aside());
        assert!(blocks[2].classification.is_terminal());
    }

    #[test]
    fn test_adjacent_blocks_never_share_classification() {
        let runs = row(&[
            ("First", BOOK),
            ("   ", SIDEBAR),
            ("x", SIDEBAR),
            ("Second", BOOK),
            ("Third", TITLE),
            ("Fourth", BOOK),
        ]);
        let blocks = condense(&runs, &sheet(), false);
        for pair in blocks.windows(2) {
            assert_ne!(pair[0].classification, pair[1].classification);
        }
    }

    #[test]
    fn test_condense_is_deterministic() {
        let runs = row(&[
            ("Heading\n", TITLE),
            ("Label:", HEAVY),
            ("value", BOOK),
            ("body ", BOOK),
            ("italic", OBLIQUE),
        ]);
        let s = sheet();
        assert_eq!(condense(&runs, &s, false), condense(&runs, &s, false));
    }

    #[test]
    fn test_empty_input() {
        assert!(condense(&[], &sheet(), false).is_empty());
    }
}
