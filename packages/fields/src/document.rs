//! Serialized document content: a JSON array of `{id, kind, attributes}`.

use std::collections::HashSet;

use crate::{Element, FieldError};

/// Serialize elements in order
pub fn serialize_elements(elements: &[Element]) -> Result<String, FieldError> {
    Ok(serde_json::to_string(elements)?)
}

/// Parse persisted content. An empty string is an empty document.
pub fn deserialize_elements(content: &str) -> Result<Vec<Element>, FieldError> {
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }

    let elements: Vec<Element> = serde_json::from_str(content)?;

    let mut seen = HashSet::with_capacity(elements.len());
    for element in &elements {
        if !seen.insert(element.id()) {
            return Err(FieldError::DuplicateId(element.id().to_string()));
        }
    }

    tracing::debug!("Deserialized document with {} elements", elements.len());
    Ok(elements)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{registry, ElementId, FieldKind};

    #[test]
    fn test_round_trip_preserves_order_and_attributes() {
        let elements = vec![
            registry::construct(FieldKind::TitleField, ElementId::new("a")),
            registry::construct(FieldKind::NumberField, ElementId::new("b")),
            registry::construct(FieldKind::ImageField, ElementId::new("c")),
        ];

        let content = serialize_elements(&elements).unwrap();
        let restored = deserialize_elements(&content).unwrap();

        assert_eq!(restored, elements);
    }

    #[test]
    fn test_empty_content() {
        assert!(deserialize_elements("").unwrap().is_empty());
        assert!(deserialize_elements("  ").unwrap().is_empty());
        assert!(deserialize_elements("[]").unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let content = r#"[
            {"id": "x", "kind": "SeparatorField"},
            {"id": "x", "kind": "SpacerField", "attributes": {"height": 10}}
        ]"#;

        let result = deserialize_elements(content);
        assert!(matches!(result, Err(FieldError::DuplicateId(id)) if id == "x"));
    }

    #[test]
    fn test_malformed_content() {
        assert!(matches!(deserialize_elements("{"), Err(FieldError::Json(_))));
    }
}
