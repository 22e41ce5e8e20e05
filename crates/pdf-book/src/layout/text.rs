use super::types::{TextLine, TextRun};
use crate::constants::*;
use crate::geometry::Rect;
use crate::types::TextAlign;

/// Font metrics needed to wrap and position text
pub trait TextMeasure {
    /// Advance width of `text` at `font_size`, in points
    fn text_width(&self, text: &str, font_size: f32) -> f32;
    /// Distance from baseline to the top of the tallest glyphs
    fn ascent(&self, font_size: f32) -> f32;
    /// Distance from baseline to the lowest descender (negative)
    fn descent(&self, font_size: f32) -> f32;
}

/// Approximate metrics for a font where every character has the same width
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedWidthMetrics {
    pub char_width_ratio: f32,
    pub ascent_ratio: f32,
    pub descent_ratio: f32,
}

impl FixedWidthMetrics {
    pub fn helvetica() -> Self {
        Self {
            char_width_ratio: HELVETICA_CHAR_WIDTH_RATIO,
            ascent_ratio: HELVETICA_ASCENT_RATIO,
            descent_ratio: HELVETICA_DESCENT_RATIO,
        }
    }
}

impl TextMeasure for FixedWidthMetrics {
    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        text.chars().count() as f32 * font_size * self.char_width_ratio
    }

    fn ascent(&self, font_size: f32) -> f32 {
        font_size * self.ascent_ratio
    }

    fn descent(&self, font_size: f32) -> f32 {
        font_size * self.descent_ratio
    }
}

/// Typography shared by every line of a text box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font_size: f32,
    pub leading: f32,
    pub align: TextAlign,
}

/// Result of flowing text into a box
#[derive(Debug, Clone, PartialEq)]
pub struct FlowedText {
    pub lines: Vec<TextLine>,
    /// Wrapped lines that did not fit vertically
    pub dropped_lines: usize,
}

struct WrappedLine {
    words: Vec<String>,
    /// Last line of its paragraph (never stretched when justifying)
    ends_paragraph: bool,
}

/// Wrap `text` on word boundaries to `max_width`.
///
/// Newlines start new paragraphs; a word wider than the box gets a line of
/// its own.
fn wrap(text: &str, measure: &dyn TextMeasure, font_size: f32, max_width: f32) -> Vec<WrappedLine> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let paragraph = paragraph.replace('\t', &" ".repeat(TAB_SIZE));
        let mut current: Vec<String> = Vec::new();
        let mut current_text = String::new();

        for word in paragraph.split_whitespace() {
            let candidate = if current_text.is_empty() {
                word.to_string()
            } else {
                format!("{current_text} {word}")
            };
            if current.is_empty() || measure.text_width(&candidate, font_size) <= max_width {
                current.push(word.to_string());
                current_text = candidate;
            } else {
                lines.push(WrappedLine {
                    words: std::mem::take(&mut current),
                    ends_paragraph: false,
                });
                current.push(word.to_string());
                current_text = word.to_string();
            }
        }

        lines.push(WrappedLine {
            words: current,
            ends_paragraph: true,
        });
    }
    lines
}

/// Flow text into `rect`, padded like a frame, one baseline per `leading`
pub fn flow_text(
    rect: Rect,
    text: &str,
    measure: &dyn TextMeasure,
    style: TextStyle,
) -> FlowedText {
    let inner = rect.inset(
        FRAME_PADDING_PT,
        FRAME_PADDING_PT,
        FRAME_PADDING_PT,
        FRAME_PADDING_PT,
    );
    let max_width = inner.width.max(0.0);
    let wrapped = wrap(text, measure, style.font_size, max_width);

    let descent = measure.descent(style.font_size).abs();
    let mut baseline = inner.top() - measure.ascent(style.font_size);
    let mut lines = Vec::new();
    let mut dropped_lines = 0;

    for line in &wrapped {
        if baseline - descent < inner.y - GEOMETRY_EPSILON {
            dropped_lines += 1;
            continue;
        }
        if !line.words.is_empty() {
            lines.push(TextLine {
                runs: position_runs(line, inner, measure, style),
                baseline_y: baseline,
            });
        }
        baseline -= style.leading;
    }

    FlowedText {
        lines,
        dropped_lines,
    }
}

fn position_runs(
    line: &WrappedLine,
    inner: Rect,
    measure: &dyn TextMeasure,
    style: TextStyle,
) -> Vec<TextRun> {
    let joined = line.words.join(" ");
    let line_width = measure.text_width(&joined, style.font_size);

    let x = match style.align {
        TextAlign::Left => inner.x,
        TextAlign::Center => inner.x + (inner.width - line_width) / 2.0,
        TextAlign::Right => inner.right() - line_width,
        TextAlign::Justify => {
            if line.ends_paragraph || line.words.len() < 2 {
                inner.x
            } else {
                return justify(line, inner, measure, style.font_size);
            }
        }
    };

    vec![TextRun { text: joined, x }]
}

fn justify(
    line: &WrappedLine,
    inner: Rect,
    measure: &dyn TextMeasure,
    font_size: f32,
) -> Vec<TextRun> {
    let widths: Vec<f32> = line
        .words
        .iter()
        .map(|word| measure.text_width(word, font_size))
        .collect();
    let gap = (inner.width - widths.iter().sum::<f32>()) / (line.words.len() - 1) as f32;

    let mut x = inner.x;
    line.words
        .iter()
        .zip(widths)
        .map(|(word, width)| {
            let run = TextRun {
                text: word.clone(),
                x,
            };
            x += width + gap;
            run
        })
        .collect()
}
