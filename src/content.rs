//! Content storage and value resolution.
//!
//! Content is a two-level map: section id → field id → value. A value is
//! either a string (text/textarea fields) or a sequence of strings (list
//! fields). Absence is the only "unset" state — lookups that miss resolve
//! to the empty default, never to an error.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::{Field, FieldType};

/// A stored field value. Untagged so the wire shape stays a plain JSON
/// string or array of strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentValue {
    Text(String),
    List(Vec<String>),
}

impl ContentValue {
    pub fn text(s: impl Into<String>) -> Self {
        ContentValue::Text(s.into())
    }

    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ContentValue::List(items.into_iter().map(Into::into).collect())
    }

    /// Whether the value renders as nothing.
    pub fn is_empty(&self) -> bool {
        match self {
            ContentValue::Text(s) => s.is_empty(),
            ContentValue::List(items) => items.is_empty(),
        }
    }
}

/// Section id → field id → value.
pub type Content = HashMap<String, HashMap<String, ContentValue>>;

/// Resolve the displayable value for one field.
///
/// Pure: depends only on the three arguments. For `list` fields a stored
/// string is tolerated as a staging representation and split on newlines
/// (each line trimmed, empty lines dropped); a stored list passes through
/// as-is. For non-list fields a stored list coerces to the empty string —
/// malformed shapes degrade, they never raise.
pub fn resolve_value(section_id: &str, field: &Field, content: &Content) -> ContentValue {
    let stored = content
        .get(section_id)
        .and_then(|section| section.get(&field.id));

    if field.field_type == FieldType::List {
        return match stored {
            Some(ContentValue::List(items)) => ContentValue::List(items.clone()),
            Some(ContentValue::Text(s)) => ContentValue::List(split_staged_list(s)),
            None => ContentValue::List(Vec::new()),
        };
    }

    match stored {
        Some(ContentValue::Text(s)) => ContentValue::Text(s.clone()),
        _ => ContentValue::Text(String::new()),
    }
}

fn split_staged_list(s: &str) -> Vec<String> {
    s.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Write one field's value, creating the section map on first touch.
pub fn update_field(content: &mut Content, section_id: &str, field_id: &str, value: ContentValue) {
    content
        .entry(section_id.to_string())
        .or_default()
        .insert(field_id.to_string(), value);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_field(id: &str) -> Field {
        Field {
            id: id.to_string(),
            label: "Skills".to_string(),
            field_type: FieldType::List,
            placeholder: None,
            max_length: None,
            helper_text: None,
        }
    }

    fn text_field(id: &str) -> Field {
        Field {
            id: id.to_string(),
            label: "Name".to_string(),
            field_type: FieldType::Text,
            placeholder: None,
            max_length: None,
            helper_text: None,
        }
    }

    #[test]
    fn missing_value_resolves_to_empty_defaults() {
        let content = Content::new();
        assert_eq!(
            resolve_value("profile", &text_field("name"), &content),
            ContentValue::Text(String::new())
        );
        assert_eq!(
            resolve_value("skills", &list_field("items"), &content),
            ContentValue::List(vec![])
        );
    }

    #[test]
    fn staged_string_splits_into_list() {
        let mut content = Content::new();
        update_field(
            &mut content,
            "skills",
            "items",
            ContentValue::text("  Rust  \n\n  Systems design\n"),
        );
        assert_eq!(
            resolve_value("skills", &list_field("items"), &content),
            ContentValue::list(["Rust", "Systems design"])
        );
    }

    #[test]
    fn staged_string_and_equivalent_list_resolve_identically() {
        let mut staged = Content::new();
        update_field(&mut staged, "s", "f", ContentValue::text("a\n b \nc"));
        let mut direct = Content::new();
        update_field(&mut direct, "s", "f", ContentValue::list(["a", "b", "c"]));

        let field = list_field("f");
        assert_eq!(
            resolve_value("s", &field, &staged),
            resolve_value("s", &field, &direct)
        );
    }

    #[test]
    fn list_in_text_field_coerces_to_empty_string() {
        let mut content = Content::new();
        update_field(&mut content, "s", "f", ContentValue::list(["oops"]));
        assert_eq!(
            resolve_value("s", &text_field("f"), &content),
            ContentValue::Text(String::new())
        );
    }
}
