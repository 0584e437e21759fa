//! Positioned text runs from a page's content stream.
//!
//! Walks the text operators of one page with a simplified PDF text state
//! machine and emits one [`TextSpan`] per text-showing operator, in stream
//! order. [`spans_to_runs`] then turns spans into the core's [`RawRun`]s,
//! marking line ends.
//!
//! # Pipeline
//!
//! ```text
//! content ops  ->  TextSpan[]  ->  RawRun[]
//!   (per page)      extract         cleanup, line-end markers
//! ```

use blurbs_core::{Geometry, RawRun};

use super::backend::{get_number_from_value, BackendFontInfo, PageId, PdfBackend, PdfValue};
use super::cleanup::cleanup_run_text;
use crate::PdfError;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// The text of one text-showing operator and where it was drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSpan {
    pub text: String,
    pub x: f32,
    pub y: f32,
    /// Rendered size: font size scaled by the text matrix.
    pub font_size: f32,
    /// `BaseFont` of the current font, `None` when the resource is missing.
    pub font_name: Option<String>,
}

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Spans whose baselines differ by more than this are on different lines.
const Y_TOLERANCE: f32 = 1.0;

/// Approximate glyph advance as a fraction of the font size; no width tables
/// are read.
const APPROX_CHAR_WIDTH_RATIO: f32 = 0.5;

/// Identity text matrix `[a, b, c, d, tx, ty]`.
const IDENTITY_MATRIX: [f32; 6] = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

// ---------------------------------------------------------------------------
// Internal: PDF text-state machine
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct TextState {
    /// Resource key of the current font (`F1`), used for decoding.
    font_key: Vec<u8>,
    font_name: Option<String>,
    font_size: f32,
    text_matrix: [f32; 6],
    line_matrix: [f32; 6],
    /// Tz / 100.
    horiz_scale: f32,
    char_spacing: f32,
    word_spacing: f32,
    text_rise: f32,
    leading: f32,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            font_key: Vec::new(),
            font_name: None,
            font_size: 0.0,
            text_matrix: IDENTITY_MATRIX,
            line_matrix: IDENTITY_MATRIX,
            horiz_scale: 1.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            text_rise: 0.0,
            leading: 0.0,
        }
    }
}

impl TextState {
    fn x(&self) -> f32 {
        self.text_matrix[4]
    }

    fn y(&self) -> f32 {
        self.text_matrix[5] + self.text_rise
    }

    /// `font_size * sqrt(b^2 + d^2)`. Books that set fonts at size 1 and
    /// scale with `Tm` get their real size here.
    fn effective_font_size(&self) -> f32 {
        let scale = (self.text_matrix[1].powi(2) + self.text_matrix[3].powi(2)).sqrt();
        (self.font_size * scale).abs()
    }

    fn advance_x(&mut self, dx: f32) {
        self.text_matrix[4] += dx * self.text_matrix[0];
        self.text_matrix[5] += dx * self.text_matrix[1];
    }

    /// Td / TD: translate the line matrix and restart the text matrix there.
    fn translate_line(&mut self, tx: f32, ty: f32) {
        let new_tx = self.line_matrix[0] * tx + self.line_matrix[2] * ty + self.line_matrix[4];
        let new_ty = self.line_matrix[1] * tx + self.line_matrix[3] * ty + self.line_matrix[5];
        self.line_matrix[4] = new_tx;
        self.line_matrix[5] = new_ty;
        self.text_matrix = self.line_matrix;
    }

    fn next_line(&mut self) {
        self.translate_line(0.0, -self.leading);
    }

    fn set_font(&mut self, key: Vec<u8>, base_font: Option<String>, size: f32) {
        self.font_key = key;
        self.font_name = base_font;
        self.font_size = size;
    }

    fn span(&self, text: String, x: f32, y: f32) -> TextSpan {
        TextSpan {
            text,
            x,
            y,
            font_size: self.effective_font_size(),
            font_name: self.font_name.clone(),
        }
    }
}

fn resolve_font<'a>(key: &[u8], fonts: &'a [BackendFontInfo]) -> Option<&'a BackendFontInfo> {
    fonts.iter().find(|info| info.name == key)
}

/// Move the text position past `text`.
fn advance_after_show(text: &str, state: &mut TextState) {
    let mut total_dx: f32 = 0.0;
    for ch in text.chars() {
        total_dx += state.font_size * APPROX_CHAR_WIDTH_RATIO * state.horiz_scale;
        total_dx += state.char_spacing;
        if ch == ' ' {
            total_dx += state.word_spacing;
        }
    }
    state.advance_x(total_dx);
}

fn decode_string(
    val: &PdfValue,
    backend: &dyn PdfBackend,
    page_id: PageId,
    font_key: &[u8],
) -> String {
    match val {
        PdfValue::Str(bytes) => backend.decode_text(page_id, font_key, bytes),
        _ => String::new(),
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Walk one page's content stream and return its spans in stream order.
///
/// | Operator | Action |
/// |----------|--------|
/// | `BT`     | Reset matrices |
/// | `Tf`     | Set font and size |
/// | `Tm`     | Set text matrix |
/// | `Td` `TD` `T*` `TL` | Line positioning |
/// | `Tc` `Tw` `Tz` `Ts` | Spacing, scaling, rise |
/// | `Tj` `'` `"` | Show a string |
/// | `TJ`     | Show strings with kerning; wide gaps become spaces |
pub fn extract_page_spans(
    backend: &dyn PdfBackend,
    page_id: PageId,
) -> Result<Vec<TextSpan>, PdfError> {
    let raw_content = backend.page_content(page_id)?;
    let ops = backend.decode_content(&raw_content)?;
    let fonts = backend.page_fonts(page_id).unwrap_or_default();

    let mut state = TextState::default();
    let mut spans: Vec<TextSpan> = Vec::new();

    for op in &ops {
        let number = |i: usize| op.operands.get(i).and_then(get_number_from_value);
        match op.operator.as_str() {
            "BT" => {
                state.text_matrix = IDENTITY_MATRIX;
                state.line_matrix = IDENTITY_MATRIX;
            }
            "Tf" => handle_tf(&op.operands, &fonts, &mut state),
            "Tm" => handle_tm(&op.operands, &mut state),
            "Td" => {
                if let (Some(tx), Some(ty)) = (number(0), number(1)) {
                    state.translate_line(tx, ty);
                }
            }
            "TD" => {
                if let (Some(tx), Some(ty)) = (number(0), number(1)) {
                    state.leading = -ty;
                    state.translate_line(tx, ty);
                }
            }
            "T*" => state.next_line(),
            "TL" => {
                if let Some(v) = number(0) {
                    state.leading = v;
                }
            }
            "Tc" => {
                if let Some(v) = number(0) {
                    state.char_spacing = v;
                }
            }
            "Tw" => {
                if let Some(v) = number(0) {
                    state.word_spacing = v;
                }
            }
            "Tz" => {
                if let Some(v) = number(0) {
                    state.horiz_scale = v / 100.0;
                }
            }
            "Ts" => {
                if let Some(v) = number(0) {
                    state.text_rise = v;
                }
            }
            "Tj" => {
                if let Some(first) = op.operands.first() {
                    show_string(first, backend, page_id, &mut state, &mut spans);
                }
            }
            "TJ" => {
                if let Some(PdfValue::Array(arr)) = op.operands.first() {
                    show_array(arr, backend, page_id, &mut state, &mut spans);
                }
            }
            "'" => {
                state.next_line();
                if let Some(first) = op.operands.first() {
                    show_string(first, backend, page_id, &mut state, &mut spans);
                }
            }
            "\"" => {
                if op.operands.len() >= 3 {
                    if let Some(aw) = number(0) {
                        state.word_spacing = aw;
                    }
                    if let Some(ac) = number(1) {
                        state.char_spacing = ac;
                    }
                    state.next_line();
                    show_string(&op.operands[2], backend, page_id, &mut state, &mut spans);
                }
            }
            _ => {}
        }
    }

    log::trace!("page {:?}: {} spans from {} ops", page_id, spans.len(), ops.len());
    Ok(spans)
}

fn handle_tf(operands: &[PdfValue], fonts: &[BackendFontInfo], state: &mut TextState) {
    if operands.len() < 2 {
        return;
    }
    let key = match &operands[0] {
        PdfValue::Name(n) => n.clone(),
        PdfValue::Str(s) => s.clone(),
        _ => return,
    };
    let size = get_number_from_value(&operands[1]).unwrap_or(0.0);
    let base_font = resolve_font(&key, fonts).and_then(|info| info.base_font.clone());
    state.set_font(key, base_font, size);
}

fn handle_tm(operands: &[PdfValue], state: &mut TextState) {
    let vals: Vec<f32> = operands
        .iter()
        .take(6)
        .filter_map(get_number_from_value)
        .collect();
    if let [a, b, c, d, tx, ty] = vals[..] {
        state.text_matrix = [a, b, c, d, tx, ty];
        state.line_matrix = state.text_matrix;
    }
}

/// Tj, `'` and `"`: one span, then advance.
fn show_string(
    operand: &PdfValue,
    backend: &dyn PdfBackend,
    page_id: PageId,
    state: &mut TextState,
    spans: &mut Vec<TextSpan>,
) {
    let text = decode_string(operand, backend, page_id, &state.font_key);
    if text.is_empty() {
        return;
    }
    spans.push(state.span(text.clone(), state.x(), state.y()));
    advance_after_show(&text, state);
}

/// TJ: strings are joined into one span; kerning wider than a fraction of a
/// glyph reads as a word space.
fn show_array(
    arr: &[PdfValue],
    backend: &dyn PdfBackend,
    page_id: PageId,
    state: &mut TextState,
    spans: &mut Vec<TextSpan>,
) {
    let mut buf = String::new();
    let mut span_x = state.x();
    let span_y = state.y();

    for elem in arr {
        match elem {
            PdfValue::Str(_) => {
                let fragment = decode_string(elem, backend, page_id, &state.font_key);
                if buf.is_empty() {
                    span_x = state.x();
                }
                buf.push_str(&fragment);
                advance_after_show(&fragment, state);
            }
            val => {
                if let Some(adj) = get_number_from_value(val) {
                    // Thousandths of text space; negative moves right.
                    let dx = -adj / 1000.0 * state.font_size * state.horiz_scale;
                    let gap_threshold =
                        state.font_size * APPROX_CHAR_WIDTH_RATIO * state.horiz_scale * 0.3;
                    if dx > gap_threshold && !buf.is_empty() && !buf.ends_with(' ') {
                        buf.push(' ');
                    }
                    state.advance_x(dx);
                }
            }
        }
    }

    if !buf.is_empty() {
        spans.push(state.span(buf, span_x, span_y));
    }
}

/// Turn a page's spans into core runs.
///
/// A span followed by one on another baseline gets a trailing `\n`, as does
/// the last span of the page, so the classifier can tell line starts.
pub fn spans_to_runs(spans: Vec<TextSpan>) -> Vec<RawRun> {
    let mut runs: Vec<RawRun> = Vec::with_capacity(spans.len());
    let mut iter = spans.into_iter().peekable();

    while let Some(span) = iter.next() {
        let mut text = cleanup_run_text(&span.text);
        let line_ends = iter
            .peek()
            .is_none_or(|next| (next.y - span.y).abs() > Y_TOLERANCE);
        if line_ends && !text.ends_with('\n') {
            text.push('\n');
        }
        runs.push(RawRun::new(
            text,
            span.font_name.as_deref(),
            Geometry {
                x: span.x,
                y: span.y,
                size: span.font_size,
            },
        ));
    }

    runs
}

/// Runs of one page, ready for the classifier.
pub fn extract_page_runs(
    backend: &dyn PdfBackend,
    page_id: PageId,
) -> Result<Vec<RawRun>, PdfError> {
    Ok(spans_to_runs(extract_page_spans(backend, page_id)?))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
