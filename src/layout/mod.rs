//! # Page-Aware Layout Engine
//!
//! The heart of the crate and the reason it exists.
//!
//! A preview that renders blocks onto one infinite column and slices it
//! afterwards breaks exactly where resumes care most: a role title
//! stranded at a page edge, a list split mid-bullet. This engine never
//! creates an infinite column. The fixed A4 page is the unit of layout:
//!
//! 1. Measure every block under the current content, overrides, and
//!    padding (the measurement pass).
//! 2. Walk the catalog in order. Before placing a block, ask: "does this
//!    fit the remaining page budget?"
//! 3. If not, and the page already holds something: close the page and
//!    start the next one.
//! 4. Place the block. A block is atomic — it is never split; one that
//!    alone exceeds the budget still gets a page to itself.
//! 5. If the block's override requests a forced break, close the page
//!    immediately after it (a trailing break, never leading).
//!
//! The pass is greedy, single-sweep, and order-preserving: concatenating
//! the pages reproduces the catalog exactly. It is also not incremental —
//! any state change re-runs it from scratch on a fresh snapshot, so a
//! partial result is never observable.

pub mod measure;

use serde::Serialize;

use crate::catalog::Block;
use crate::style::PagePadding;

pub use measure::{FixedMeasurer, Measure, MeasureContext, TextMeasurer};

/// CSS reference pixel density: 96 dpi over 25.4 mm per inch.
pub const MM_TO_PX: f64 = 96.0 / 25.4;

/// A4 sheet, in px at 96 dpi.
pub const PAGE_WIDTH_PX: f64 = 210.0 * MM_TO_PX;
pub const PAGE_HEIGHT_PX: f64 = 297.0 * MM_TO_PX;

/// Slack absorbing sub-pixel measurement jitter from the rendering
/// surface.
pub const FIT_EPSILON_PX: f64 = 0.5;

/// Vertical budget left for content once the page's own padding is
/// taken out.
pub fn available_height(padding: &PagePadding) -> f64 {
    (PAGE_HEIGHT_PX - padding.vertical()).max(0.0)
}

/// Horizontal space available to block content.
pub fn content_width(padding: &PagePadding) -> f64 {
    (PAGE_WIDTH_PX - padding.horizontal()).max(0.0)
}

/// A block placed on a page, with its page-local content box. `x`/`y`/
/// `width`/`height` exclude the block's own spacing margins (what a
/// bounding-rect query against the rendered block would report);
/// `outer_height` includes them and is what pagination budgeted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedBlock {
    pub block_id: String,
    /// Position in the source catalog.
    pub index: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub outer_height: f64,
}

/// One laid-out page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutPage {
    pub index: usize,
    pub blocks: Vec<PlacedBlock>,
}

impl LayoutPage {
    /// Catalog indices of the blocks on this page, in order.
    pub fn catalog_indices(&self) -> Vec<usize> {
        self.blocks.iter().map(|b| b.index).collect()
    }

    /// Sum of budgeted heights on this page.
    pub fn content_height(&self) -> f64 {
        self.blocks.iter().map(|b| b.outer_height).sum()
    }
}

/// Partition catalog order into per-page index runs: greedy first-fit
/// against the height budget, honoring trailing forced breaks.
///
/// `heights[i]` must be the outer height of `blocks[i]` — an index
/// mismatch here would silently corrupt pagination, so a length mismatch
/// is a programming error, not a recoverable condition.
pub fn partition(blocks: &[Block], heights: &[f64], available: f64) -> Vec<Vec<usize>> {
    assert_eq!(
        blocks.len(),
        heights.len(),
        "measurement pass out of step with catalog: {} blocks, {} heights",
        blocks.len(),
        heights.len(),
    );

    let mut pages: Vec<Vec<usize>> = Vec::new();
    let mut current: Vec<usize> = Vec::new();
    let mut current_height = 0.0;

    for (i, block) in blocks.iter().enumerate() {
        let height = heights[i];

        // Only a non-empty page can overflow-close: every block lands on
        // some page, even one taller than the budget.
        if !current.is_empty() && current_height + height > available + FIT_EPSILON_PX {
            pages.push(std::mem::take(&mut current));
            current_height = 0.0;
        }

        current.push(i);
        current_height += height;

        if block.style.force_page_break {
            pages.push(std::mem::take(&mut current));
            current_height = 0.0;
        }
    }

    if !current.is_empty() {
        pages.push(current);
    }

    pages
}

/// The layout engine. Stateless; every call computes a full replacement
/// result from the snapshot it is handed.
#[derive(Debug, Default)]
pub struct LayoutEngine;

impl LayoutEngine {
    pub fn new() -> Self {
        LayoutEngine
    }

    /// The measurement pass: one outer height per catalog entry, index
    /// for index.
    pub fn measure_pass<M: Measure>(
        &self,
        blocks: &[Block],
        measurer: &M,
        padding: &PagePadding,
    ) -> Vec<f64> {
        let ctx = MeasureContext::for_padding(padding);
        blocks.iter().map(|b| measurer.measure(b, &ctx)).collect()
    }

    /// Auto-pagination: measure, partition, and place blocks into pages.
    pub fn paginate<M: Measure>(
        &self,
        blocks: &[Block],
        measurer: &M,
        padding: &PagePadding,
    ) -> Vec<LayoutPage> {
        let heights = self.measure_pass(blocks, measurer, padding);
        let runs = partition(blocks, &heights, available_height(padding));
        runs.iter()
            .enumerate()
            .map(|(page_index, run)| place_page(page_index, run, blocks, &heights, padding))
            .collect()
    }

    /// Non-auto mode: the single implicit page holding every block in
    /// source order, regardless of height.
    pub fn single_page<M: Measure>(
        &self,
        blocks: &[Block],
        measurer: &M,
        padding: &PagePadding,
    ) -> LayoutPage {
        let heights = self.measure_pass(blocks, measurer, padding);
        let indices: Vec<usize> = (0..blocks.len()).collect();
        place_page(0, &indices, blocks, &heights, padding)
    }

    /// How far single-page content exceeds the page budget, in px. Zero
    /// when everything fits. Informational only — it never forces a
    /// layout change.
    pub fn overflow_px<M: Measure>(
        &self,
        blocks: &[Block],
        measurer: &M,
        padding: &PagePadding,
    ) -> f64 {
        let total: f64 = self.measure_pass(blocks, measurer, padding).iter().sum();
        (total - available_height(padding)).max(0.0)
    }
}

fn place_page(
    page_index: usize,
    run: &[usize],
    blocks: &[Block],
    heights: &[f64],
    padding: &PagePadding,
) -> LayoutPage {
    let x = f64::from(padding.left);
    let width = content_width(padding);
    let mut cursor = f64::from(padding.top);

    let mut placed = Vec::with_capacity(run.len());
    for &i in run {
        let block = &blocks[i];
        let outer = heights[i];
        let margins = block.style.spacing.vertical();
        placed.push(PlacedBlock {
            block_id: block.id.clone(),
            index: block.index,
            x,
            y: cursor + f64::from(block.style.spacing.top),
            width,
            height: (outer - margins).max(0.0),
            outer_height: outer,
        });
        cursor += outer;
    }

    LayoutPage {
        index: page_index,
        blocks: placed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Block;
    use crate::content::ContentValue;
    use crate::model::{Field, FieldType};
    use crate::style::{OverridePatch, StyleOverride};

    fn block(index: usize, id: &str, force_break: bool) -> Block {
        let style = StyleOverride::default().merged(&OverridePatch::force_page_break(force_break));
        Block {
            id: id.to_string(),
            index,
            section_id: "s".into(),
            section_title: "S".into(),
            field: Field {
                id: id.to_string(),
                label: id.to_uppercase(),
                field_type: FieldType::Text,
                placeholder: None,
                max_length: None,
                helper_text: None,
            },
            value: ContentValue::Text(String::new()),
            style,
        }
    }

    #[test]
    fn first_fit_closes_page_when_budget_exceeded() {
        let blocks = vec![block(0, "b1", false), block(1, "b2", false), block(2, "b3", false)];
        let pages = partition(&blocks, &[100.0, 150.0, 120.0], 250.0);
        assert_eq!(pages, vec![vec![0, 1], vec![2]]);
    }

    #[test]
    fn epsilon_absorbs_subpixel_overshoot() {
        let blocks = vec![block(0, "b1", false), block(1, "b2", false)];
        let pages = partition(&blocks, &[100.0, 150.4], 250.0);
        assert_eq!(pages, vec![vec![0, 1]]);
    }

    #[test]
    fn forced_break_ends_page_despite_remaining_capacity() {
        let blocks = vec![block(0, "b1", false), block(1, "b2", true), block(2, "b3", false)];
        let pages = partition(&blocks, &[100.0, 100.0, 100.0], 500.0);
        assert_eq!(pages, vec![vec![0, 1], vec![2]]);
    }

    #[test]
    fn trailing_forced_break_does_not_leave_empty_page() {
        let blocks = vec![block(0, "b1", true)];
        let pages = partition(&blocks, &[100.0], 500.0);
        assert_eq!(pages, vec![vec![0]]);
    }

    #[test]
    fn oversized_singleton_gets_its_own_page() {
        let blocks = vec![block(0, "b1", false), block(1, "b2", false)];
        let pages = partition(&blocks, &[900.0, 50.0], 250.0);
        assert_eq!(pages, vec![vec![0], vec![1]]);
    }

    #[test]
    fn partition_is_order_preserving_and_exhaustive() {
        let blocks: Vec<Block> = (0..9)
            .map(|i| block(i, &format!("b{i}"), i == 4))
            .collect();
        let heights: Vec<f64> = (0..9).map(|i| 60.0 + (i as f64) * 37.0).collect();
        let pages = partition(&blocks, &heights, 300.0);

        let flattened: Vec<usize> = pages.into_iter().flatten().collect();
        assert_eq!(flattened, (0..9).collect::<Vec<_>>());
    }

    #[test]
    #[should_panic(expected = "measurement pass out of step")]
    fn height_count_mismatch_is_a_fault() {
        let blocks = vec![block(0, "b1", false)];
        partition(&blocks, &[1.0, 2.0], 100.0);
    }

    #[test]
    fn placement_excludes_spacing_from_content_box() {
        let blocks = vec![block(0, "b1", false)];
        let padding = PagePadding::default();
        let measurer = FixedMeasurer::new(116.0); // 100 content + 8 + 8 spacing
        let engine = LayoutEngine::new();
        let pages = engine.paginate(&blocks, &measurer, &padding);

        assert_eq!(pages.len(), 1);
        let placed = &pages[0].blocks[0];
        assert_eq!(placed.y, f64::from(padding.top) + 8.0);
        assert_eq!(placed.height, 100.0);
        assert_eq!(placed.outer_height, 116.0);
    }

    #[test]
    fn text_measurer_grows_with_font_scale() {
        let mut small = block(0, "b", false);
        small.value = ContentValue::Text("a".repeat(400));
        let mut large = small.clone();
        large.style = large.style.merged(&OverridePatch::font_scale(1.6));

        let ctx = MeasureContext::for_padding(&PagePadding::default());
        let m = TextMeasurer;
        assert!(m.measure(&large, &ctx) > m.measure(&small, &ctx));
    }
}
