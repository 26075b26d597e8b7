//! # Override Store
//!
//! Per-block style deltas relative to fixed, documented defaults. The
//! split mirrors the rest of the engine's philosophy: a sparse patch
//! type (`OverridePatch`) for what a caller wants to change, and a fully
//! populated record (`StyleOverride`) for what the layout engine reads.
//! A block with no stored entry behaves exactly as if it held all
//! defaults.
//!
//! Merge semantics: field-by-field, with spacing merged per-edge — a
//! patch touching only `spacing.top` never erases `spacing.bottom`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Default ink color for block text.
pub const DEFAULT_TEXT_COLOR: &str = "#1b1d21";

/// Inclusive domain for `font_scale`.
pub const FONT_SCALE_RANGE: (f64, f64) = (0.7, 1.6);
/// Inclusive domain for per-edge block spacing, in px.
pub const SPACING_RANGE: (u32, u32) = (0, 64);
/// Inclusive domain for per-edge page padding, in px.
pub const PAGE_PADDING_RANGE: (u32, u32) = (12, 80);

const DEFAULT_SPACING_PX: u32 = 8;
const DEFAULT_PAGE_PADDING_PX: u32 = 36;

/// Vertical gaps around a block, in px. These become the block's top and
/// bottom margins in the rendered sheet, so they count toward its
/// measured height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockSpacing {
    pub top: u32,
    pub bottom: u32,
}

impl Default for BlockSpacing {
    fn default() -> Self {
        BlockSpacing {
            top: DEFAULT_SPACING_PX,
            bottom: DEFAULT_SPACING_PX,
        }
    }
}

impl BlockSpacing {
    /// Combined top + bottom margin contribution, in px.
    pub fn vertical(&self) -> f64 {
        f64::from(self.top) + f64::from(self.bottom)
    }
}

/// The fully resolved style for one block. Never partial: resolution
/// always merges engine defaults underneath whatever was stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleOverride {
    /// Multiplier on the block's base font size.
    pub font_scale: f64,
    /// CSS color string for block text.
    pub text_color: String,
    pub spacing: BlockSpacing,
    /// Close the page immediately after this block (trailing break).
    pub force_page_break: bool,
}

impl Default for StyleOverride {
    fn default() -> Self {
        StyleOverride {
            font_scale: 1.0,
            text_color: DEFAULT_TEXT_COLOR.to_string(),
            spacing: BlockSpacing::default(),
            force_page_break: false,
        }
    }
}

impl StyleOverride {
    /// Apply a sparse patch on top of this record, producing the merged
    /// full record. Spacing merges per-edge; out-of-domain values clamp.
    pub fn merged(&self, patch: &OverridePatch) -> StyleOverride {
        StyleOverride {
            font_scale: patch
                .font_scale
                .map(|v| v.clamp(FONT_SCALE_RANGE.0, FONT_SCALE_RANGE.1))
                .unwrap_or(self.font_scale),
            text_color: patch
                .text_color
                .clone()
                .unwrap_or_else(|| self.text_color.clone()),
            spacing: BlockSpacing {
                top: patch
                    .spacing
                    .as_ref()
                    .and_then(|s| s.top)
                    .map(clamp_spacing)
                    .unwrap_or(self.spacing.top),
                bottom: patch
                    .spacing
                    .as_ref()
                    .and_then(|s| s.bottom)
                    .map(clamp_spacing)
                    .unwrap_or(self.spacing.bottom),
            },
            force_page_break: patch.force_page_break.unwrap_or(self.force_page_break),
        }
    }
}

fn clamp_spacing(v: u32) -> u32 {
    v.clamp(SPACING_RANGE.0, SPACING_RANGE.1)
}

/// Sparse per-edge spacing patch.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SpacingPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom: Option<u32>,
}

impl SpacingPatch {
    pub fn top(v: u32) -> Self {
        SpacingPatch {
            top: Some(v),
            bottom: None,
        }
    }

    pub fn bottom(v: u32) -> Self {
        SpacingPatch {
            top: None,
            bottom: Some(v),
        }
    }
}

/// A sparse style delta. Every field optional; unspecified fields are
/// never dropped by a merge.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverridePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_scale: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spacing: Option<SpacingPatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force_page_break: Option<bool>,
}

impl OverridePatch {
    pub fn font_scale(v: f64) -> Self {
        OverridePatch {
            font_scale: Some(v),
            ..Default::default()
        }
    }

    pub fn text_color(v: impl Into<String>) -> Self {
        OverridePatch {
            text_color: Some(v.into()),
            ..Default::default()
        }
    }

    pub fn spacing(patch: SpacingPatch) -> Self {
        OverridePatch {
            spacing: Some(patch),
            ..Default::default()
        }
    }

    pub fn force_page_break(v: bool) -> Self {
        OverridePatch {
            force_page_break: Some(v),
            ..Default::default()
        }
    }
}

/// Sparse map of block id → stored override record.
///
/// Writes go through whole-record replacement: `update` resolves the
/// block's current effective value, merges the patch, and stores the
/// full result, so repeated partial updates accumulate without the
/// caller ever reading before writing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OverrideStore {
    entries: HashMap<String, StyleOverride>,
}

impl OverrideStore {
    pub fn new() -> Self {
        OverrideStore::default()
    }

    /// The effective style for a block. Unknown block ids resolve to the
    /// default record — a lookup miss is not a fault.
    pub fn resolve(&self, block_id: &str) -> StyleOverride {
        self.entries.get(block_id).cloned().unwrap_or_default()
    }

    /// Merge a patch onto the block's current effective value and store
    /// the full result.
    pub fn update(&mut self, block_id: &str, patch: &OverridePatch) {
        let merged = self.resolve(block_id).merged(patch);
        self.entries.insert(block_id.to_string(), merged);
    }

    /// Remove the stored entry entirely, reverting the block to
    /// defaults. Idempotent.
    pub fn reset(&mut self, block_id: &str) {
        self.entries.remove(block_id);
    }

    /// Bulk whole-map replacement.
    pub fn set_all(&mut self, entries: HashMap<String, StyleOverride>) {
        self.entries = entries;
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &HashMap<String, StyleOverride> {
        &self.entries
    }
}

/// Independent edge margins of the printed sheet, in px.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagePadding {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

impl Default for PagePadding {
    fn default() -> Self {
        PagePadding::uniform(DEFAULT_PAGE_PADDING_PX)
    }
}

/// One of the four sheet edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaddingEdge {
    Top,
    Right,
    Bottom,
    Left,
}

impl PagePadding {
    pub fn uniform(v: u32) -> Self {
        PagePadding {
            top: v,
            right: v,
            bottom: v,
            left: v,
        }
    }

    pub fn vertical(&self) -> f64 {
        f64::from(self.top) + f64::from(self.bottom)
    }

    pub fn horizontal(&self) -> f64 {
        f64::from(self.left) + f64::from(self.right)
    }

    /// Set one edge, clamped into the documented domain.
    pub fn set_edge(&mut self, edge: PaddingEdge, value: u32) {
        let value = value.clamp(PAGE_PADDING_RANGE.0, PAGE_PADDING_RANGE.1);
        match edge {
            PaddingEdge::Top => self.top = value,
            PaddingEdge::Right => self.right = value,
            PaddingEdge::Bottom => self.bottom = value,
            PaddingEdge::Left => self.left = value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_without_entry_is_default() {
        let store = OverrideStore::new();
        assert_eq!(store.resolve("exp.role"), StyleOverride::default());
    }

    #[test]
    fn partial_spacing_patch_preserves_other_edge() {
        let mut store = OverrideStore::new();
        store.update("exp.role", &OverridePatch::spacing(SpacingPatch::top(20)));
        store.update("exp.role", &OverridePatch::spacing(SpacingPatch::bottom(5)));

        let resolved = store.resolve("exp.role");
        assert_eq!(resolved.spacing, BlockSpacing { top: 20, bottom: 5 });
    }

    #[test]
    fn patches_fold_left_to_right_over_defaults() {
        let mut store = OverrideStore::new();
        let patches = [
            OverridePatch::font_scale(1.2),
            OverridePatch::text_color("#334155"),
            OverridePatch::spacing(SpacingPatch::top(12)),
            OverridePatch::force_page_break(true),
            OverridePatch::font_scale(0.9),
        ];
        for patch in &patches {
            store.update("b", patch);
        }

        let mut expected = StyleOverride::default();
        for patch in &patches {
            expected = expected.merged(patch);
        }
        assert_eq!(store.resolve("b"), expected);
        assert_eq!(store.resolve("b").font_scale, 0.9);
        assert_eq!(store.resolve("b").text_color, "#334155");
    }

    #[test]
    fn reset_reverts_to_defaults_and_is_idempotent() {
        let mut store = OverrideStore::new();
        store.update("b", &OverridePatch::font_scale(1.5));
        store.reset("b");
        assert_eq!(store.resolve("b"), StyleOverride::default());
        store.reset("b");
        assert_eq!(store.resolve("b"), StyleOverride::default());
    }

    #[test]
    fn out_of_domain_values_clamp() {
        let mut store = OverrideStore::new();
        store.update("b", &OverridePatch::font_scale(9.0));
        store.update(
            "b",
            &OverridePatch::spacing(SpacingPatch {
                top: Some(500),
                bottom: None,
            }),
        );
        let resolved = store.resolve("b");
        assert_eq!(resolved.font_scale, FONT_SCALE_RANGE.1);
        assert_eq!(resolved.spacing.top, SPACING_RANGE.1);
    }

    #[test]
    fn padding_edge_set_clamps_into_domain() {
        let mut padding = PagePadding::default();
        padding.set_edge(PaddingEdge::Top, 4);
        padding.set_edge(PaddingEdge::Left, 200);
        assert_eq!(padding.top, PAGE_PADDING_RANGE.0);
        assert_eq!(padding.left, PAGE_PADDING_RANGE.1);
    }
}
