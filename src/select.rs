//! Selection and hit-testing.
//!
//! A small state machine driven by an abstract pointer-event stream:
//! idle → dragging on pointer-down over a page, dragging → idle on
//! pointer-up. Release within the click threshold selects the block
//! under the cursor; a larger drag becomes a rubber-band selection that
//! picks the first block whose center falls inside the band. Selection
//! is always single-block.
//!
//! Hit-testing runs against [`PageGeometry`] snapshots — page frames and
//! block rects in pointer coordinate space — built from laid-out pages,
//! so no windowing or DOM API leaks in here.

use serde::Serialize;

use crate::layout::{LayoutPage, PAGE_HEIGHT_PX, PAGE_WIDTH_PX};

/// Pointer movement below this, on both axes, counts as a click.
pub const CLICK_THRESHOLD_PX: f64 = 4.0;

/// A point in pointer coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    /// The bounding box of two corner points, in any order.
    pub fn from_corners(a: Point, b: Point) -> Self {
        let x = a.x.min(b.x);
        let y = a.y.min(b.y);
        Rect {
            x,
            y,
            width: (a.x - b.x).abs(),
            height: (a.y - b.y).abs(),
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// This rect translated into `frame`-local coordinates.
    pub fn relative_to(&self, frame: &Rect) -> Rect {
        Rect {
            x: self.x - frame.x,
            y: self.y - frame.y,
            width: self.width,
            height: self.height,
        }
    }
}

/// One block's rendered frame, in pointer space.
#[derive(Debug, Clone)]
pub struct BlockRegion {
    pub block_id: String,
    pub frame: Rect,
}

/// A rendered page's frame plus its blocks' frames, in pointer space.
#[derive(Debug, Clone)]
pub struct PageGeometry {
    pub index: usize,
    pub frame: Rect,
    pub blocks: Vec<BlockRegion>,
}

impl PageGeometry {
    /// Build the geometry for a laid-out page whose top-left corner sits
    /// at `origin` in pointer space.
    pub fn from_layout(page: &LayoutPage, origin: Point) -> Self {
        PageGeometry {
            index: page.index,
            frame: Rect::new(origin.x, origin.y, PAGE_WIDTH_PX, PAGE_HEIGHT_PX),
            blocks: page
                .blocks
                .iter()
                .map(|placed| BlockRegion {
                    block_id: placed.block_id.clone(),
                    frame: Rect::new(
                        origin.x + placed.x,
                        origin.y + placed.y,
                        placed.width,
                        placed.height,
                    ),
                })
                .collect(),
        }
    }

    /// The block under a point, if any. Blocks don't overlap, so the
    /// first hit in document order is the hit.
    pub fn block_at(&self, point: Point) -> Option<&BlockRegion> {
        self.blocks.iter().find(|b| b.frame.contains(point))
    }
}

/// The selection highlight: a block's rect relative to its containing
/// page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightRect {
    pub page_index: usize,
    pub rect: Rect,
}

/// Where the selected block's highlight should draw, or `None` when the
/// block is absent from the rendered page set (cleared, not an error).
pub fn highlight_rect(selected: &str, pages: &[PageGeometry]) -> Option<HighlightRect> {
    pages.iter().find_map(|page| {
        page.blocks
            .iter()
            .find(|b| b.block_id == selected)
            .map(|b| HighlightRect {
                page_index: page.index,
                rect: b.frame.relative_to(&page.frame),
            })
    })
}

#[derive(Debug, Clone)]
enum DragState {
    Idle,
    Dragging {
        start: Point,
        current: Point,
        page_index: usize,
        page_frame: Rect,
    },
}

/// The idle/dragging pointer state machine plus the current selection.
#[derive(Debug)]
pub struct SelectionEngine {
    state: DragState,
    selected: Option<String>,
}

impl Default for SelectionEngine {
    fn default() -> Self {
        SelectionEngine::new()
    }
}

impl SelectionEngine {
    pub fn new() -> Self {
        SelectionEngine {
            state: DragState::Idle,
            selected: None,
        }
    }

    pub fn selected_block(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn set_selected(&mut self, block_id: Option<String>) {
        self.selected = block_id;
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Pointer-down. A press outside every page is ignored; a press over
    /// a page starts a drag and, when the point is inside a block,
    /// provisionally selects it.
    pub fn pointer_down(&mut self, point: Point, pages: &[PageGeometry]) {
        let Some(page) = pages.iter().find(|p| p.frame.contains(point)) else {
            return;
        };

        self.state = DragState::Dragging {
            start: point,
            current: point,
            page_index: page.index,
            page_frame: page.frame,
        };

        if let Some(region) = page.block_at(point) {
            self.selected = Some(region.block_id.clone());
        }
    }

    /// Pointer-move. Tracked purely for the rubber-band overlay; no
    /// other side effects.
    pub fn pointer_move(&mut self, point: Point) {
        if let DragState::Dragging { current, .. } = &mut self.state {
            *current = point;
        }
    }

    /// Pointer-up (global capture: fires wherever the pointer is).
    /// Resolves the gesture and returns the new selection; a release
    /// with no qualifying target clears it.
    pub fn pointer_up(&mut self, point: Point, pages: &[PageGeometry]) -> Option<String> {
        let DragState::Dragging {
            start, page_index, ..
        } = std::mem::replace(&mut self.state, DragState::Idle)
        else {
            return self.selected.clone();
        };

        let is_click = (point.x - start.x).abs() < CLICK_THRESHOLD_PX
            && (point.y - start.y).abs() < CLICK_THRESHOLD_PX;

        let target = if is_click {
            // Point-under-cursor, wherever the release landed.
            pages
                .iter()
                .find_map(|page| page.block_at(point))
                .map(|region| region.block_id.clone())
        } else {
            // Rubber band: first block on the pressed page whose center
            // falls inside the drag's bounding box.
            let band = Rect::from_corners(start, point);
            pages
                .iter()
                .find(|p| p.index == page_index)
                .and_then(|page| {
                    page.blocks
                        .iter()
                        .find(|b| band.contains(b.frame.center()))
                })
                .map(|region| region.block_id.clone())
        };

        self.selected = target.clone();
        target
    }

    /// The live rubber-band rectangle, page-local, while dragging.
    pub fn overlay_rect(&self) -> Option<(usize, Rect)> {
        match &self.state {
            DragState::Dragging {
                start,
                current,
                page_index,
                page_frame,
            } => Some((
                *page_index,
                Rect::from_corners(*start, *current).relative_to(page_frame),
            )),
            DragState::Idle => None,
        }
    }
}
