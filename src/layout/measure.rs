//! Block height measurement.
//!
//! Heights are not known a priori: pagination needs every block's
//! rendered height under the current content, overrides, and padding
//! before it can partition anything. The rendering shell can supply the
//! real thing (an off-screen render); the engine itself ships a
//! deterministic text-metrics approximation so pagination works — and is
//! testable — without any rendering surface.

use std::collections::HashMap;

use crate::catalog::Block;
use crate::content::ContentValue;
use crate::style::PagePadding;

use super::content_width;

/// Everything a measurer may depend on besides the block itself.
#[derive(Debug, Clone, Copy)]
pub struct MeasureContext {
    /// Horizontal space available to block content, in px.
    pub content_width: f64,
}

impl MeasureContext {
    pub fn for_padding(padding: &PagePadding) -> Self {
        MeasureContext {
            content_width: content_width(padding),
        }
    }
}

/// A capability that reports a block's rendered outer height in px,
/// including the block's own top and bottom spacing margins.
///
/// Must be deterministic for identical inputs: pagination re-runs from
/// scratch on every state change and each pass must fully supersede the
/// previous one.
pub trait Measure {
    fn measure(&self, block: &Block, ctx: &MeasureContext) -> f64;
}

// Type metrics for the approximation. The label renders slightly smaller
// than body text; the ratio is an average glyph advance for the preview
// face at 1em.
const LABEL_FONT_PX: f64 = 13.0;
const BODY_FONT_PX: f64 = 14.0;
const LINE_HEIGHT: f64 = 1.5;
const GLYPH_WIDTH_RATIO: f64 = 0.52;
const LABEL_GAP_PX: f64 = 6.0;
const LIST_ITEM_GAP_PX: f64 = 2.0;

/// Deterministic text-metrics measurer.
///
/// Wraps text at an estimated characters-per-line derived from the
/// content width and the block's font scale, then sums line boxes. Not
/// pixel-faithful to any particular font, but monotonic in text length,
/// font scale, and spacing — which is what the partitioning logic needs.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextMeasurer;

impl TextMeasurer {
    fn wrapped_lines(text: &str, chars_per_line: usize) -> usize {
        if text.is_empty() {
            return 1;
        }
        text.lines()
            .map(|line| {
                let chars = line.chars().count();
                chars.div_ceil(chars_per_line).max(1)
            })
            .sum::<usize>()
            .max(1)
    }
}

impl Measure for TextMeasurer {
    fn measure(&self, block: &Block, ctx: &MeasureContext) -> f64 {
        let scale = block.style.font_scale;
        let body_px = BODY_FONT_PX * scale;
        let glyph_px = (body_px * GLYPH_WIDTH_RATIO).max(1.0);
        let chars_per_line = ((ctx.content_width / glyph_px).floor() as usize).max(1);

        let label_height = LABEL_FONT_PX * scale * LINE_HEIGHT;
        let line_height = body_px * LINE_HEIGHT;

        let body_height = match &block.value {
            ContentValue::Text(text) => {
                Self::wrapped_lines(text, chars_per_line) as f64 * line_height
            }
            ContentValue::List(items) => {
                let lines: usize = items
                    .iter()
                    .map(|item| Self::wrapped_lines(item, chars_per_line))
                    .sum();
                lines.max(1) as f64 * line_height
                    + items.len().saturating_sub(1) as f64 * LIST_ITEM_GAP_PX
            }
        };

        label_height + LABEL_GAP_PX + body_height + block.style.spacing.vertical()
    }
}

/// Fixed-height measurer keyed by block id. Unknown blocks measure as
/// the configured fallback. Intended for tests and headless callers that
/// already know their heights.
#[derive(Debug, Clone, Default)]
pub struct FixedMeasurer {
    heights: HashMap<String, f64>,
    fallback: f64,
}

impl FixedMeasurer {
    pub fn new(fallback: f64) -> Self {
        FixedMeasurer {
            heights: HashMap::new(),
            fallback,
        }
    }

    pub fn with_height(mut self, block_id: impl Into<String>, height: f64) -> Self {
        self.heights.insert(block_id.into(), height);
        self
    }
}

impl Measure for FixedMeasurer {
    fn measure(&self, block: &Block, _ctx: &MeasureContext) -> f64 {
        self.heights.get(&block.id).copied().unwrap_or(self.fallback)
    }
}
