//! Block catalog builder.
//!
//! Flattens a template's sections' fields, in declared order, into the
//! ordered list of block descriptors everything downstream runs on. The
//! catalog order is the canonical document order: pagination consumes it
//! as-is, measurement index `i` must correspond to catalog entry `i`,
//! and rendered output groups consecutive runs of the same section.

use crate::content::{resolve_value, Content, ContentValue};
use crate::model::{Field, Section, TemplateDetail};
use crate::style::{OverrideStore, StyleOverride};

/// One (section, field) pair with its resolved content and style. Blocks
/// are derived, never stored — rebuilt whenever the template, content,
/// or override map changes.
#[derive(Debug, Clone)]
pub struct Block {
    /// `"{sectionId}.{fieldId}"` — the universal block address.
    pub id: String,
    /// Position in the catalog (canonical document order).
    pub index: usize,
    pub section_id: String,
    pub section_title: String,
    pub field: Field,
    pub value: ContentValue,
    pub style: StyleOverride,
}

/// Compose the composite block key for a (section, field) pair.
pub fn block_id(section_id: &str, field_id: &str) -> String {
    format!("{section_id}.{field_id}")
}

/// Flatten a template into catalog order.
pub fn build_catalog(
    template: &TemplateDetail,
    content: &Content,
    overrides: &OverrideStore,
) -> Vec<Block> {
    let mut blocks = Vec::with_capacity(template.block_count());
    for section in &template.sections {
        for field in &section.fields {
            let id = block_id(&section.id, &field.id);
            blocks.push(Block {
                style: overrides.resolve(&id),
                value: resolve_value(&section.id, field, content),
                id,
                index: blocks.len(),
                section_id: section.id.clone(),
                section_title: section.title.clone(),
                field: field.clone(),
            });
        }
    }
    blocks
}

/// A consecutive run of blocks from the same section, as rendered on one
/// page. A section whose fields straddle a page boundary produces one
/// run on each page.
#[derive(Debug)]
pub struct SectionRun<'a> {
    pub section_id: &'a str,
    pub section_title: &'a str,
    pub blocks: Vec<&'a Block>,
}

/// Group a page's blocks into consecutive same-section runs, preserving
/// order.
pub fn group_by_section<'a>(blocks: &'a [Block]) -> Vec<SectionRun<'a>> {
    let mut runs: Vec<SectionRun<'a>> = Vec::new();
    for block in blocks {
        match runs.last_mut() {
            Some(run) if run.section_id == block.section_id => run.blocks.push(block),
            _ => runs.push(SectionRun {
                section_id: &block.section_id,
                section_title: &block.section_title,
                blocks: vec![block],
            }),
        }
    }
    runs
}

/// Human-readable label for a block id: the owning section and field.
/// `None` when either half of the key doesn't match the template — an
/// unmatched id is a no-op, not a fault.
pub fn block_label<'a>(template: &'a TemplateDetail, id: &str) -> Option<(&'a Section, &'a Field)> {
    let (section_id, field_id) = id.split_once('.')?;
    let section = template.sections.iter().find(|s| s.id == section_id)?;
    let field = section.fields.iter().find(|f| f.id == field_id)?;
    Some((section, field))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FieldType;

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

    fn template() -> TemplateDetail {
        TemplateDetail {
            id: "t1".into(),
            name: "Plain".into(),
            description: String::new(),
            tags: vec![],
            preview_colors: vec![],
            updated_at: None,
            sections: vec![
                Section {
                    id: "profile".into(),
                    title: "Profile".into(),
                    description: None,
                    layout: None,
                    fields: vec![field("name"), field("summary")],
                },
                Section {
                    id: "exp".into(),
                    title: "Experience".into(),
                    description: None,
                    layout: None,
                    fields: vec![field("role")],
                },
            ],
            default_content: Content::new(),
            styles: String::new(),
            meta: None,
        }
    }

    #[test]
    fn catalog_flattens_in_declared_order() {
        let catalog = build_catalog(&template(), &Content::new(), &OverrideStore::new());
        let ids: Vec<_> = catalog.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, ["profile.name", "profile.summary", "exp.role"]);
        assert!(catalog.iter().enumerate().all(|(i, b)| b.index == i));
    }

    #[test]
    fn grouping_splits_on_section_change_only() {
        let catalog = build_catalog(&template(), &Content::new(), &OverrideStore::new());
        let runs = group_by_section(&catalog);
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].section_id, "profile");
        assert_eq!(runs[0].blocks.len(), 2);
        assert_eq!(runs[1].section_id, "exp");
    }

    #[test]
    fn block_label_misses_resolve_to_none() {
        let template = template();
        assert!(block_label(&template, "exp.role").is_some());
        assert!(block_label(&template, "exp.unknown").is_none());
        assert!(block_label(&template, "nosuch.role").is_none());
        assert!(block_label(&template, "not-a-key").is_none());
    }
}
