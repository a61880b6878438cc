//! # Generated Elements
//!
//! Parses the raw output of the generation collaborator. The response is
//! either `{"elements": [...]}` or a bare array, each entry shaped like a
//! stored element without (or with an ignored) id. A response that fails to
//! parse is rejected as a whole.

use formcraft_fields::{ElementDraft, FieldKind};
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Generation response is empty")]
    Empty,

    #[error("Generation response must be an array or an object with an `elements` array")]
    UnexpectedShape,

    #[error("Generated elements cannot contain another generator")]
    NestedGenerator,

    #[error("Invalid generated element: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parse a generation response into drafts awaiting ids
pub fn parse_generation_response(raw: &str) -> Result<Vec<ElementDraft>, GenerationError> {
    if raw.trim().is_empty() {
        return Err(GenerationError::Empty);
    }

    let value: Value = serde_json::from_str(raw)?;
    let entries = match value {
        Value::Array(_) => value,
        Value::Object(mut object) => match object.remove("elements") {
            Some(elements @ Value::Array(_)) => elements,
            _ => return Err(GenerationError::UnexpectedShape),
        },
        _ => return Err(GenerationError::UnexpectedShape),
    };

    let drafts: Vec<ElementDraft> = serde_json::from_value(entries)?;
    if drafts.iter().any(|d| d.kind() == FieldKind::GenerateField) {
        return Err(GenerationError::NestedGenerator);
    }

    Ok(drafts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use formcraft_fields::FieldAttributes;

    #[test]
    fn test_wrapped_response() {
        let raw = r#"{"elements":[
            {"type":"TitleField","extraAttributes":{"title":"Contact us"}},
            {"id":"ignored","type":"EmailField","extraAttributes":{"label":"Email","required":true}}
        ]}"#;

        let drafts = parse_generation_response(raw).unwrap();
        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0].kind(), FieldKind::TitleField);
        match drafts[1].attributes() {
            FieldAttributes::Email(input) => {
                assert_eq!(input.label, "Email");
                assert!(input.required);
                assert_eq!(input.placeholder, "name@example.com");
            }
            other => panic!("expected email attributes, got {:?}", other),
        }
    }

    #[test]
    fn test_bare_array_response() {
        let raw = r#"[{"kind":"SeparatorField"}]"#;
        assert_eq!(parse_generation_response(raw).unwrap().len(), 1);
    }

    #[test]
    fn test_malformed_responses_are_rejected() {
        assert!(matches!(parse_generation_response("  "), Err(GenerationError::Empty)));
        assert!(matches!(parse_generation_response("{oops"), Err(GenerationError::Json(_))));
        assert!(matches!(
            parse_generation_response(r#"{"fields":[]}"#),
            Err(GenerationError::UnexpectedShape)
        ));
        assert!(matches!(
            parse_generation_response(r#"[{"type":"TextField"},{"type":"BogusField"}]"#),
            Err(GenerationError::Json(_))
        ));
        assert!(matches!(
            parse_generation_response(r#"[{"type":"GenerateField"}]"#),
            Err(GenerationError::NestedGenerator)
        ));
    }
}
