//! Content-stream text extraction.
//!
//! Walks a page's operators with a reduced PDF text state machine and emits
//! one [`PositionedTextItem`] per shown string. Positions come from the text
//! matrix only; the result is in page space with Y growing upward.
//!
//! ```text
//! content ops  ->  PositionedTextItem[]  (per page, in stream order)
//! ```

use super::backend::{decode_text_simple, number, BackendFontInfo, PageId, PdfBackend, PdfValue};
use crate::{PdfError, PositionedTextItem};

/// Approximate glyph width as a fraction of the font size. No font metrics
/// are read, so every item's width is an estimate.
const APPROX_CHAR_WIDTH_RATIO: f32 = 0.5;

/// Kerning displacement (as a fraction of one approximate glyph) above which
/// a TJ adjustment is read as a word break.
const TJ_SPACE_RATIO: f32 = 0.3;

/// The identity 2x3 text matrix: [a, b, c, d, tx, ty].
const IDENTITY_MATRIX: [f32; 6] = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

#[derive(Debug, Clone)]
struct TextState {
    font_key: Vec<u8>,
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

    fn glyph_width(&self) -> f32 {
        self.font_size * APPROX_CHAR_WIDTH_RATIO * self.horiz_scale
    }

    /// Horizontal scale of the text matrix, from text space to page space.
    fn matrix_scale(&self) -> f32 {
        let [a, b, ..] = self.text_matrix;
        a.hypot(b)
    }

    /// Width in page space, matching how far [`Self::advance_after_show`]
    /// moves the pen without spacing adjustments.
    fn estimate_width(&self, text: &str) -> f32 {
        text.chars().count() as f32 * self.glyph_width() * self.matrix_scale()
    }

    fn advance_x(&mut self, dx: f32) {
        self.text_matrix[4] += dx * self.text_matrix[0];
        self.text_matrix[5] += dx * self.text_matrix[1];
    }

    /// Advance past `text` as if it had been painted.
    fn advance_after_show(&mut self, text: &str) {
        let dx: f32 = text
            .chars()
            .map(|ch| {
                let spacing = if ch == ' ' { self.word_spacing } else { 0.0 };
                self.glyph_width() + self.char_spacing + spacing
            })
            .sum();
        self.advance_x(dx);
    }

    /// Td: translate the line matrix and reset the text matrix to it.
    fn translate_line(&mut self, tx: f32, ty: f32) {
        let m = self.line_matrix;
        self.line_matrix[4] = m[0] * tx + m[2] * ty + m[4];
        self.line_matrix[5] = m[1] * tx + m[3] * ty + m[5];
        self.text_matrix = self.line_matrix;
    }

    fn next_line(&mut self) {
        self.translate_line(0.0, -self.leading);
    }
}

/// Extract the positioned text items of one page.
///
/// Handles `BT ET Tf Tm Td TD T* TL Tc Tw Tz Ts Tj TJ ' "`; every other
/// operator is ignored. Strings that decode to nothing are not emitted.
pub fn extract_page_items(
    backend: &dyn PdfBackend,
    page_id: PageId,
) -> Result<Vec<PositionedTextItem>, PdfError> {
    let raw = backend.page_content(page_id)?;
    let ops = backend.decode_content(&raw)?;
    let fonts = backend.page_fonts(page_id).unwrap_or_default();

    let mut state = TextState::default();
    let mut items = Vec::new();
    let mut page = PageCtx {
        backend,
        fonts: &fonts,
        items: &mut items,
    };

    for op in &ops {
        let operands = op.operands.as_slice();
        match op.operator.as_str() {
            "BT" => {
                state.text_matrix = IDENTITY_MATRIX;
                state.line_matrix = IDENTITY_MATRIX;
            }
            // Font state survives ET.
            "ET" => {}
            "Tf" => handle_tf(operands, &fonts, &mut state),
            "Tm" => {
                let vals: Vec<f32> = operands.iter().take(6).filter_map(number).collect();
                if let [a, b, c, d, e, f] = vals[..] {
                    state.text_matrix = [a, b, c, d, e, f];
                    state.line_matrix = state.text_matrix;
                }
            }
            "Td" | "TD" => {
                if let [tx, ty, ..] = operands {
                    let tx = number(tx).unwrap_or(0.0);
                    let ty = number(ty).unwrap_or(0.0);
                    if op.operator == "TD" {
                        state.leading = -ty;
                    }
                    state.translate_line(tx, ty);
                }
            }
            "T*" => state.next_line(),
            "TL" => set_from(operands, &mut state.leading),
            "Tc" => set_from(operands, &mut state.char_spacing),
            "Tw" => set_from(operands, &mut state.word_spacing),
            "Ts" => set_from(operands, &mut state.text_rise),
            "Tz" => {
                if let Some(v) = operands.first().and_then(number) {
                    state.horiz_scale = v / 100.0;
                }
            }
            "Tj" => {
                if let Some(s) = operands.first() {
                    page.show_string(s, &mut state);
                }
            }
            "TJ" => {
                if let Some(PdfValue::Array(arr)) = operands.first() {
                    page.show_array(arr, &mut state);
                }
            }
            "'" => {
                state.next_line();
                if let Some(s) = operands.first() {
                    page.show_string(s, &mut state);
                }
            }
            "\"" => {
                if let [aw, ac, s, ..] = operands {
                    set_from(std::slice::from_ref(aw), &mut state.word_spacing);
                    set_from(std::slice::from_ref(ac), &mut state.char_spacing);
                    state.next_line();
                    page.show_string(s, &mut state);
                }
            }
            _ => {}
        }
    }

    log::trace!("page {:?}: {} text items", page_id, items.len());
    Ok(items)
}

/// Extract the items of every page, in document order.
///
/// A failure on any page fails the whole document.
pub fn extract_document_items(
    backend: &dyn PdfBackend,
) -> Result<Vec<Vec<PositionedTextItem>>, PdfError> {
    backend
        .pages()
        .into_values()
        .map(|page_id| extract_page_items(backend, page_id))
        .collect()
}

fn set_from(operands: &[PdfValue], slot: &mut f32) {
    if let Some(v) = operands.first().and_then(number) {
        *slot = v;
    }
}

fn handle_tf(operands: &[PdfValue], fonts: &[BackendFontInfo], state: &mut TextState) {
    let [key, size, ..] = operands else {
        return;
    };
    let key = match key {
        PdfValue::Name(n) | PdfValue::Str(n) => n.clone(),
        _ => return,
    };
    if !fonts.iter().any(|f| f.name == key) {
        log::debug!(
            "font {} not in page resources",
            String::from_utf8_lossy(&key)
        );
    }
    state.font_key = key;
    state.font_size = number(size).unwrap_or(0.0);
}

/// Per-page emission context.
struct PageCtx<'a> {
    backend: &'a dyn PdfBackend,
    fonts: &'a [BackendFontInfo],
    items: &'a mut Vec<PositionedTextItem>,
}

impl PageCtx<'_> {
    fn decode(&self, val: &PdfValue, state: &TextState) -> String {
        match val {
            PdfValue::Str(bytes) => {
                let font = self.fonts.iter().find(|f| f.name == state.font_key);
                let decoded = self.backend.decode_text(font, bytes);
                if decoded.is_empty() {
                    decode_text_simple(bytes)
                } else {
                    decoded
                }
            }
            _ => String::new(),
        }
    }

    fn push(&mut self, text: String, x: f32, y: f32, state: &TextState) {
        let width = state.estimate_width(&text);
        self.items.push(PositionedTextItem { text, x, y, width });
    }

    /// Tj, ' and ": one item per string.
    fn show_string(&mut self, operand: &PdfValue, state: &mut TextState) {
        let text = self.decode(operand, state);
        if text.is_empty() {
            return;
        }
        let (x, y) = (state.x(), state.y());
        state.advance_after_show(&text);
        self.push(text, x, y, state);
    }

    /// TJ: strings and kerning numbers (thousandths of text space). The
    /// whole array becomes a single item; large negative kerning inserts a
    /// space.
    fn show_array(&mut self, arr: &[PdfValue], state: &mut TextState) {
        let mut buf = String::new();
        let mut start_x = state.x();
        let y = state.y();

        for elem in arr {
            if let PdfValue::Str(_) = elem {
                let fragment = self.decode(elem, state);
                if buf.is_empty() {
                    start_x = state.x();
                }
                buf.push_str(&fragment);
                state.advance_after_show(&fragment);
            } else if let Some(adj) = number(elem) {
                let dx = -adj / 1000.0 * state.font_size * state.horiz_scale;
                if dx > state.glyph_width() * TJ_SPACE_RATIO && !buf.is_empty() {
                    buf.push(' ');
                }
                state.advance_x(dx);
            }
        }

        let text = buf.trim_end();
        if !text.is_empty() {
            self.push(text.to_string(), start_x, y, state);
        }
    }
}
