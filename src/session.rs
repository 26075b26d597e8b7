//! Editor session state.
//!
//! One controller owns everything a loaded template parameterizes:
//! content, the override map, page padding, header settings, the
//! auto-pagination flag, and the selection. Loading a template replaces
//! the whole unit atomically, so per-block state keyed by a previous
//! template's block ids can never leak into a new one — block keys are
//! template-scoped strings and are never validated against the new
//! template's block set.
//!
//! The derived page list is a pure function of this state: `preview`
//! reads one consistent snapshot and returns a full replacement result.

use std::collections::HashMap;

use crate::catalog::{build_catalog, Block};
use crate::content::{update_field, Content, ContentValue};
use crate::layout::{LayoutEngine, LayoutPage, Measure};
use crate::model::{HeaderSettings, TemplateDetail};
use crate::select::SelectionEngine;
use crate::style::{OverridePatch, OverrideStore, PaddingEdge, PagePadding, StyleOverride};

/// A full recompute of the rendered page set.
#[derive(Debug)]
pub struct Preview {
    /// The block catalog the pages index into.
    pub blocks: Vec<Block>,
    /// Laid-out pages. Exactly one page in non-auto mode.
    pub pages: Vec<LayoutPage>,
    /// Single-page overflow magnitude in px; always 0 in auto mode.
    pub overflow_px: f64,
}

#[derive(Debug, Default)]
pub struct Session {
    template: Option<TemplateDetail>,
    content: Content,
    overrides: OverrideStore,
    selection: SelectionEngine,
    page_padding: PagePadding,
    auto_paginate: bool,
    header: HeaderSettings,
    engine: LayoutEngine,
}

impl Session {
    pub fn new() -> Self {
        Session::default()
    }

    // ── Template lifecycle ─────────────────────────────────────

    /// Load a template, atomically resetting all per-template state.
    /// Re-loading the currently loaded template id is a no-op.
    pub fn load_template(&mut self, template: TemplateDetail) {
        if self.template.as_ref().is_some_and(|t| t.id == template.id) {
            return;
        }

        self.content = template.default_content.clone();
        self.overrides = OverrideStore::new();
        self.selection = SelectionEngine::new();
        self.page_padding = PagePadding::default();
        self.auto_paginate = false;
        self.header = HeaderSettings::default();
        self.template = Some(template);
    }

    /// Drop the template and all derived state.
    pub fn reset(&mut self) {
        *self = Session::default();
    }

    pub fn template(&self) -> Option<&TemplateDetail> {
        self.template.as_ref()
    }

    // ── Content ────────────────────────────────────────────────

    pub fn content(&self) -> &Content {
        &self.content
    }

    pub fn update_field(&mut self, section_id: &str, field_id: &str, value: ContentValue) {
        update_field(&mut self.content, section_id, field_id, value);
    }

    // ── Overrides ──────────────────────────────────────────────

    pub fn overrides(&self) -> &OverrideStore {
        &self.overrides
    }

    pub fn resolve_override(&self, block_id: &str) -> StyleOverride {
        self.overrides.resolve(block_id)
    }

    /// Merge a sparse patch into a block's override. A patch that turns
    /// on `force_page_break` also enables auto-pagination, since a break
    /// is only observable in paginated mode.
    pub fn update_override(&mut self, block_id: &str, patch: &OverridePatch) {
        if patch.force_page_break == Some(true) {
            self.auto_paginate = true;
        }
        self.overrides.update(block_id, patch);
    }

    pub fn reset_override(&mut self, block_id: &str) {
        self.overrides.reset(block_id);
    }

    /// Bulk whole-map replacement of the override store.
    pub fn set_overrides(&mut self, entries: HashMap<String, StyleOverride>) {
        self.overrides.set_all(entries);
    }

    // ── Page layout knobs ──────────────────────────────────────

    pub fn page_padding(&self) -> &PagePadding {
        &self.page_padding
    }

    pub fn update_page_padding(&mut self, edge: PaddingEdge, value: u32) {
        self.page_padding.set_edge(edge, value);
    }

    pub fn reset_page_padding(&mut self) {
        self.page_padding = PagePadding::default();
    }

    pub fn auto_paginate(&self) -> bool {
        self.auto_paginate
    }

    pub fn set_auto_paginate(&mut self, value: bool) {
        self.auto_paginate = value;
    }

    // ── Header ─────────────────────────────────────────────────

    pub fn header(&self) -> &HeaderSettings {
        &self.header
    }

    /// Merge a partial header patch; `None` fields are left untouched.
    pub fn update_header(&mut self, patch: HeaderSettings) {
        if let Some(title) = patch.title {
            self.header.title = Some(title);
        }
        if let Some(subtitle) = patch.subtitle {
            self.header.subtitle = Some(subtitle);
        }
        if let Some(show) = patch.show_header {
            self.header.show_header = Some(show);
        }
    }

    /// Effective header title: session override → template meta →
    /// template name, first non-empty wins.
    pub fn header_title(&self) -> String {
        let meta = self.template_meta_title();
        let name = self.template.as_ref().map(|t| t.name.as_str());
        first_non_empty([self.header.title.as_deref(), meta, name])
    }

    /// Effective header subtitle: session override → template meta →
    /// template description, first non-empty wins.
    pub fn header_subtitle(&self) -> String {
        let meta = self
            .template
            .as_ref()
            .and_then(|t| t.meta.as_ref())
            .and_then(|m| m.header_subtitle.as_deref());
        let description = self.template.as_ref().map(|t| t.description.as_str());
        first_non_empty([self.header.subtitle.as_deref(), meta, description])
    }

    /// Whether the first page renders a header: session override →
    /// template meta → shown.
    pub fn show_header(&self) -> bool {
        self.header
            .show_header
            .or_else(|| {
                self.template
                    .as_ref()
                    .and_then(|t| t.meta.as_ref())
                    .and_then(|m| m.show_header)
            })
            .unwrap_or(true)
    }

    fn template_meta_title(&self) -> Option<&str> {
        self.template
            .as_ref()
            .and_then(|t| t.meta.as_ref())
            .and_then(|m| m.header_title.as_deref())
    }

    // ── Selection ──────────────────────────────────────────────

    pub fn selection(&self) -> &SelectionEngine {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut SelectionEngine {
        &mut self.selection
    }

    pub fn selected_block(&self) -> Option<&str> {
        self.selection.selected_block()
    }

    pub fn select_block(&mut self, block_id: Option<String>) {
        self.selection.set_selected(block_id);
    }

    // ── Derived layout ─────────────────────────────────────────

    /// The current block catalog: sections' fields flattened in declared
    /// order, each block carrying its resolved value and style.
    pub fn catalog(&self) -> Vec<Block> {
        match &self.template {
            Some(template) => build_catalog(template, &self.content, &self.overrides),
            None => Vec::new(),
        }
    }

    /// Recompute the rendered page set from the current state. Auto mode
    /// partitions blocks across pages; otherwise everything lands on one
    /// implicit page and only the overflow magnitude is reported.
    pub fn preview<M: Measure>(&self, measurer: &M) -> Preview {
        let blocks = self.catalog();
        if blocks.is_empty() {
            return Preview {
                blocks,
                pages: Vec::new(),
                overflow_px: 0.0,
            };
        }

        if self.auto_paginate {
            let pages = self.engine.paginate(&blocks, measurer, &self.page_padding);
            Preview {
                pages,
                overflow_px: 0.0,
                blocks,
            }
        } else {
            let page = self.engine.single_page(&blocks, measurer, &self.page_padding);
            let overflow_px = self.engine.overflow_px(&blocks, measurer, &self.page_padding);
            Preview {
                pages: vec![page],
                overflow_px,
                blocks,
            }
        }
    }
}

/// Resolve an ordered list of optional sources, first non-empty
/// (after trimming) wins.
fn first_non_empty<'a, const N: usize>(candidates: [Option<&'a str>; N]) -> String {
    candidates
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .unwrap_or("")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::FixedMeasurer;
    use crate::model::{Field, FieldType, Section, TemplateMeta};
    use crate::style::SpacingPatch;

    fn field(id: &str) -> Field {
        Field {
            id: id.to_string(),
            label: id.to_uppercase(),
            field_type: FieldType::Text,
            placeholder: None,
            max_length: None,
            helper_text: None,
        }
    }

    fn template(id: &str) -> TemplateDetail {
        TemplateDetail {
            id: id.to_string(),
            name: "Modern Minimal".into(),
            description: "A quiet two-column resume".into(),
            tags: vec![],
            preview_colors: vec![],
            updated_at: None,
            sections: vec![Section {
                id: "exp".into(),
                title: "Experience".into(),
                description: None,
                layout: None,
                fields: vec![field("role"), field("summary")],
            }],
            default_content: Content::new(),
            styles: String::new(),
            meta: None,
        }
    }

    #[test]
    fn loading_a_template_resets_per_template_state_atomically() {
        let mut session = Session::new();
        session.load_template(template("t1"));
        session.update_override("exp.role", &OverridePatch::font_scale(1.3));
        session.select_block(Some("exp.role".into()));
        session.update_page_padding(PaddingEdge::Top, 60);
        session.set_auto_paginate(true);

        session.load_template(template("t2"));
        assert!(session.overrides().is_empty());
        assert_eq!(session.selected_block(), None);
        assert_eq!(session.page_padding(), &PagePadding::default());
        assert!(!session.auto_paginate());
    }

    #[test]
    fn reloading_the_same_template_id_is_a_noop() {
        let mut session = Session::new();
        session.load_template(template("t1"));
        session.update_override("exp.role", &OverridePatch::font_scale(1.3));

        session.load_template(template("t1"));
        assert_eq!(session.resolve_override("exp.role").font_scale, 1.3);
    }

    #[test]
    fn force_page_break_patch_enables_auto_pagination() {
        let mut session = Session::new();
        session.load_template(template("t1"));
        assert!(!session.auto_paginate());

        session.update_override("exp.role", &OverridePatch::force_page_break(true));
        assert!(session.auto_paginate());

        // Turning the flag off again leaves the mode alone.
        session.update_override("exp.role", &OverridePatch::force_page_break(false));
        assert!(session.auto_paginate());
    }

    #[test]
    fn spacing_edit_is_a_single_accumulating_write() {
        let mut session = Session::new();
        session.load_template(template("t1"));
        session.update_override("exp.role", &OverridePatch::spacing(SpacingPatch::top(20)));
        session.update_override("exp.role", &OverridePatch::spacing(SpacingPatch::bottom(5)));

        let spacing = session.resolve_override("exp.role").spacing;
        assert_eq!((spacing.top, spacing.bottom), (20, 5));
    }

    #[test]
    fn header_falls_back_session_then_meta_then_template() {
        let mut session = Session::new();
        let mut t = template("t1");
        t.meta = Some(TemplateMeta {
            header_title: Some("Meta Title".into()),
            ..Default::default()
        });
        session.load_template(t);

        assert_eq!(session.header_title(), "Meta Title");
        assert_eq!(session.header_subtitle(), "A quiet two-column resume");
        assert!(session.show_header());

        session.update_header(HeaderSettings {
            title: Some("My Resume".into()),
            ..Default::default()
        });
        assert_eq!(session.header_title(), "My Resume");

        // An explicitly empty override falls through, it does not stick.
        session.update_header(HeaderSettings {
            title: Some("   ".into()),
            ..Default::default()
        });
        assert_eq!(session.header_title(), "Meta Title");

        session.update_header(HeaderSettings {
            show_header: Some(false),
            ..Default::default()
        });
        assert!(!session.show_header());
    }

    #[test]
    fn preview_without_template_is_empty() {
        let session = Session::new();
        let preview = session.preview(&FixedMeasurer::new(100.0));
        assert!(preview.pages.is_empty());
        assert_eq!(preview.overflow_px, 0.0);
    }

    #[test]
    fn single_page_mode_reports_overflow_without_splitting() {
        let mut session = Session::new();
        session.load_template(template("t1"));

        // Two blocks far taller than one page.
        let measurer = FixedMeasurer::new(700.0);
        let preview = session.preview(&measurer);
        assert_eq!(preview.pages.len(), 1);
        assert_eq!(preview.pages[0].blocks.len(), 2);
        let available = crate::layout::available_height(session.page_padding());
        assert_eq!(preview.overflow_px, 1400.0 - available);
    }

    #[test]
    fn auto_mode_splits_and_never_reports_overflow() {
        let mut session = Session::new();
        session.load_template(template("t1"));
        session.set_auto_paginate(true);

        let measurer = FixedMeasurer::new(700.0);
        let preview = session.preview(&measurer);
        assert_eq!(preview.pages.len(), 2);
        assert_eq!(preview.overflow_px, 0.0);
    }
}
