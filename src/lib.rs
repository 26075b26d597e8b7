//! # Folio
//!
//! A page-native resume preview engine.
//!
//! Most WYSIWYG previews render content onto one infinite column and
//! slice it into pages afterwards, which is exactly where resumes break:
//! a heading stranded on a page edge, a bullet list cut mid-entry. Folio
//! does the opposite: **the fixed A4 page is the unit of layout.** Blocks
//! are measured first, then flow *into* pages — a block is atomic and is
//! never split across a boundary.
//!
//! ## Architecture
//!
//! ```text
//! Template detail (JSON/API)
//!         ↓
//!   [model]+[content]  — sections, fields, per-field values
//!         ↓
//!   [style]            — sparse per-block overrides over defaults
//!         ↓
//!   [catalog]          — flatten into ordered block descriptors
//!         ↓
//!   [layout]           — measure, then partition into A4 pages
//!         ↓
//!   [select]           — pointer hit-testing over rendered geometry
//! ```
//!
//! The whole pipeline is owned by a [`session::Session`]: one
//! atomically-replaceable state value whose `preview` method recomputes
//! the full page set from a consistent snapshot. The only asynchronous
//! code lives in [`api`], the contracts for the remote template catalog
//! and PDF render service.

pub mod api;
pub mod catalog;
pub mod content;
pub mod error;
pub mod layout;
pub mod model;
pub mod select;
pub mod session;
pub mod style;

pub use error::FolioError;
pub use session::{Preview, Session};

use layout::Measure;
use model::TemplateDetail;

/// Compute a preview for a template in one call: load into a fresh
/// session and lay out with the given measurer. Convenience for headless
/// callers; interactive shells should hold a [`Session`] and mutate it.
pub fn preview<M: Measure>(template: TemplateDetail, measurer: &M) -> Preview {
    let mut session = Session::new();
    session.load_template(template);
    session.preview(measurer)
}

/// Parse a template detail document from JSON and compute its preview.
pub fn preview_json<M: Measure>(json: &str, measurer: &M) -> Result<Preview, FolioError> {
    let template: TemplateDetail = serde_json::from_str(json)?;
    Ok(preview(template, measurer))
}
