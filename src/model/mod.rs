//! # Template Model
//!
//! The input representation for the preview engine. A template is an
//! ordered list of sections, each holding an ordered list of fields; the
//! catalog builder flattens those fields into the block list the layout
//! engine paginates. This is designed to be fetched from a template
//! service as JSON and held immutable for the life of a session.
//!
//! Field ids are unique within a section and section ids unique within a
//! template; the composite `"{sectionId}.{fieldId}"` key built from them
//! is the universal block address used by content lookup, override
//! lookup, and selection.

use serde::{Deserialize, Serialize};

use crate::content::Content;

/// How a field's value is entered and rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Single-line text.
    #[default]
    Text,
    /// Multi-line text.
    Textarea,
    /// An ordered sequence of short entries (bullet list).
    List,
}

/// A single editable slot inside a section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub id: String,
    pub label: String,
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub helper_text: Option<String>,
}

/// How a section arranges its fields in the rendered sheet. Purely
/// presentational; the layout engine ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionLayout {
    #[default]
    Single,
    Split,
}

/// A titled group of fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<SectionLayout>,
    #[serde(default)]
    pub fields: Vec<Field>,
}

/// Catalog listing entry returned by `GET /templates`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateSummary {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub preview_colors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Declared page geometry hints carried in template metadata. The engine
/// renders a fixed A4 sheet; these are passed through to the render
/// service untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin: Option<String>,
}

/// Starting values a template suggests for the session's layout knobs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDefaults {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_scale: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_spacing: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_padding: Option<u32>,
}

/// Optional template metadata: header text defaults and layout hints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<PageMeta>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_defaults: Option<LayoutDefaults>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_header: Option<bool>,
}

/// Per-session header overrides. Each `None` falls through to the
/// template's metadata, then to the template name/description; see
/// [`crate::session::Session::header_title`] for the exact chain.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_header: Option<bool>,
}

/// The full template document returned by `GET /templates/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDetail {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub preview_colors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,

    #[serde(default)]
    pub sections: Vec<Section>,

    /// Initial content the session clones on template load.
    #[serde(default)]
    pub default_content: Content,

    /// Style-sheet string injected into the rendered preview. Carried
    /// opaquely; never layout-affecting.
    #[serde(default)]
    pub styles: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<TemplateMeta>,
}

impl TemplateDetail {
    /// Total number of blocks this template flattens into.
    pub fn block_count(&self) -> usize {
        self.sections.iter().map(|s| s.fields.len()).sum()
    }
}
