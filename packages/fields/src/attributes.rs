//! # Field Kinds and Attributes
//!
//! `FieldKind` is the closed catalog of building blocks. Each kind owns one
//! attribute shape; `FieldAttributes` ties the two together so an element's
//! kind can never disagree with its attributes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{registry, FieldError};

/// Closed catalog of field kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FieldKind {
    TextField,
    TitleField,
    SubtitleField,
    ParagraphField,
    SeparatorField,
    SpacerField,
    NumberField,
    PhoneNumberField,
    EmailField,
    TextAreaField,
    DateField,
    SelectField,
    SingleSelectField,
    MultiSelectField,
    CheckboxField,
    ImageField,
    /// Palette item that opens the generation dialog instead of inserting
    GenerateField,
}

impl FieldKind {
    /// Every kind, in palette order
    pub const ALL: [FieldKind; 17] = [
        FieldKind::TextField,
        FieldKind::TitleField,
        FieldKind::SubtitleField,
        FieldKind::ParagraphField,
        FieldKind::SeparatorField,
        FieldKind::SpacerField,
        FieldKind::NumberField,
        FieldKind::PhoneNumberField,
        FieldKind::EmailField,
        FieldKind::TextAreaField,
        FieldKind::DateField,
        FieldKind::SelectField,
        FieldKind::SingleSelectField,
        FieldKind::MultiSelectField,
        FieldKind::CheckboxField,
        FieldKind::ImageField,
        FieldKind::GenerateField,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::TextField => "TextField",
            FieldKind::TitleField => "TitleField",
            FieldKind::SubtitleField => "SubtitleField",
            FieldKind::ParagraphField => "ParagraphField",
            FieldKind::SeparatorField => "SeparatorField",
            FieldKind::SpacerField => "SpacerField",
            FieldKind::NumberField => "NumberField",
            FieldKind::PhoneNumberField => "PhoneNumberField",
            FieldKind::EmailField => "EmailField",
            FieldKind::TextAreaField => "TextAreaField",
            FieldKind::DateField => "DateField",
            FieldKind::SelectField => "SelectField",
            FieldKind::SingleSelectField => "SingleSelectField",
            FieldKind::MultiSelectField => "MultiSelectField",
            FieldKind::CheckboxField => "CheckboxField",
            FieldKind::ImageField => "ImageField",
            FieldKind::GenerateField => "GenerateField",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("Unknown field kind: {}", s))
    }
}

/// Text-like input (text, phone number, email)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputAttributes {
    pub label: String,
    pub helper_text: String,
    pub required: bool,
    pub placeholder: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleAttributes {
    pub title: String,
    pub subtitle: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubtitleAttributes {
    pub subtitle: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParagraphAttributes {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpacerAttributes {
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumberAttributes {
    pub label: String,
    pub helper_text: String,
    pub min: f64,
    pub max: f64,
    pub required: bool,
    pub placeholder: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextAreaAttributes {
    pub label: String,
    pub helper_text: String,
    pub required: bool,
    pub placeholder: String,
    pub rows: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateAttributes {
    pub label: String,
    pub helper_text: String,
    pub required: bool,
}

/// Select, single-select and multi-select
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectAttributes {
    pub label: String,
    pub helper_text: String,
    pub required: bool,
    pub placeholder: String,
    pub options: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckboxAttributes {
    pub label: String,
    pub helper_text: String,
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageAttributes {
    pub label: String,
    pub helper_text: String,
    pub image_url: Option<String>,
}

/// Kinds without configurable properties
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmptyAttributes {}

/// Kind-specific properties of an element.
///
/// Serializes as the bare attribute object; the kind travels next to it in
/// the element record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldAttributes {
    Text(InputAttributes),
    Title(TitleAttributes),
    Subtitle(SubtitleAttributes),
    Paragraph(ParagraphAttributes),
    Separator(EmptyAttributes),
    Spacer(SpacerAttributes),
    Number(NumberAttributes),
    PhoneNumber(InputAttributes),
    Email(InputAttributes),
    TextArea(TextAreaAttributes),
    Date(DateAttributes),
    Select(SelectAttributes),
    SingleSelect(SelectAttributes),
    MultiSelect(SelectAttributes),
    Checkbox(CheckboxAttributes),
    Image(ImageAttributes),
    Generate(EmptyAttributes),
}

impl FieldAttributes {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldAttributes::Text(_) => FieldKind::TextField,
            FieldAttributes::Title(_) => FieldKind::TitleField,
            FieldAttributes::Subtitle(_) => FieldKind::SubtitleField,
            FieldAttributes::Paragraph(_) => FieldKind::ParagraphField,
            FieldAttributes::Separator(_) => FieldKind::SeparatorField,
            FieldAttributes::Spacer(_) => FieldKind::SpacerField,
            FieldAttributes::Number(_) => FieldKind::NumberField,
            FieldAttributes::PhoneNumber(_) => FieldKind::PhoneNumberField,
            FieldAttributes::Email(_) => FieldKind::EmailField,
            FieldAttributes::TextArea(_) => FieldKind::TextAreaField,
            FieldAttributes::Date(_) => FieldKind::DateField,
            FieldAttributes::Select(_) => FieldKind::SelectField,
            FieldAttributes::SingleSelect(_) => FieldKind::SingleSelectField,
            FieldAttributes::MultiSelect(_) => FieldKind::MultiSelectField,
            FieldAttributes::Checkbox(_) => FieldKind::CheckboxField,
            FieldAttributes::Image(_) => FieldKind::ImageField,
            FieldAttributes::Generate(_) => FieldKind::GenerateField,
        }
    }

    /// The `required` flag, for kinds that have one
    pub fn required(&self) -> bool {
        match self {
            FieldAttributes::Text(a)
            | FieldAttributes::PhoneNumber(a)
            | FieldAttributes::Email(a) => a.required,
            FieldAttributes::Number(a) => a.required,
            FieldAttributes::TextArea(a) => a.required,
            FieldAttributes::Date(a) => a.required,
            FieldAttributes::Select(a)
            | FieldAttributes::SingleSelect(a)
            | FieldAttributes::MultiSelect(a) => a.required,
            FieldAttributes::Checkbox(a) => a.required,
            _ => false,
        }
    }

    /// Build attributes for `kind` from a loosely-shaped JSON object.
    ///
    /// Keys missing from `value` take the registry defaults for `kind`;
    /// unknown keys are ignored. `null` is treated as an empty object.
    pub fn from_value(kind: FieldKind, value: Value) -> Result<Self, FieldError> {
        let mut merged = match serde_json::to_value(registry::strategy(kind).default_attributes())? {
            Value::Object(map) => map,
            _ => Map::new(),
        };

        match value {
            Value::Null => {}
            Value::Object(provided) => {
                for (key, v) in provided {
                    // Older documents spell it `placeHolder`
                    let key = if key == "placeHolder" {
                        "placeholder".to_string()
                    } else {
                        key
                    };
                    merged.insert(key, v);
                }
            }
            other => {
                return Err(FieldError::InvalidAttributes {
                    kind,
                    reason: format!("expected an object, found {}", other),
                })
            }
        }

        let merged = Value::Object(merged);
        let attributes = match kind {
            FieldKind::TextField => FieldAttributes::Text(serde_json::from_value(merged)?),
            FieldKind::TitleField => FieldAttributes::Title(serde_json::from_value(merged)?),
            FieldKind::SubtitleField => FieldAttributes::Subtitle(serde_json::from_value(merged)?),
            FieldKind::ParagraphField => FieldAttributes::Paragraph(serde_json::from_value(merged)?),
            FieldKind::SeparatorField => FieldAttributes::Separator(EmptyAttributes {}),
            FieldKind::SpacerField => FieldAttributes::Spacer(serde_json::from_value(merged)?),
            FieldKind::NumberField => FieldAttributes::Number(serde_json::from_value(merged)?),
            FieldKind::PhoneNumberField => {
                FieldAttributes::PhoneNumber(serde_json::from_value(merged)?)
            }
            FieldKind::EmailField => FieldAttributes::Email(serde_json::from_value(merged)?),
            FieldKind::TextAreaField => FieldAttributes::TextArea(serde_json::from_value(merged)?),
            FieldKind::DateField => FieldAttributes::Date(serde_json::from_value(merged)?),
            FieldKind::SelectField => FieldAttributes::Select(serde_json::from_value(merged)?),
            FieldKind::SingleSelectField => {
                FieldAttributes::SingleSelect(serde_json::from_value(merged)?)
            }
            FieldKind::MultiSelectField => {
                FieldAttributes::MultiSelect(serde_json::from_value(merged)?)
            }
            FieldKind::CheckboxField => FieldAttributes::Checkbox(serde_json::from_value(merged)?),
            FieldKind::ImageField => FieldAttributes::Image(serde_json::from_value(merged)?),
            FieldKind::GenerateField => FieldAttributes::Generate(EmptyAttributes {}),
        };

        Ok(attributes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_names_round_trip_through_from_str() {
        for kind in FieldKind::ALL {
            assert_eq!(kind.as_str().parse::<FieldKind>().unwrap(), kind);
        }
        assert!("RadioField".parse::<FieldKind>().is_err());
    }

    #[test]
    fn test_missing_keys_take_registry_defaults() {
        let attrs = FieldAttributes::from_value(
            FieldKind::NumberField,
            json!({ "label": "Seats", "required": true }),
        )
        .unwrap();

        match attrs {
            FieldAttributes::Number(n) => {
                assert_eq!(n.label, "Seats");
                assert!(n.required);
                assert_eq!(n.min, 0.0);
                assert_eq!(n.max, 100.0);
            }
            other => panic!("expected number attributes, got {:?}", other),
        }
    }

    #[test]
    fn test_place_holder_spelling_is_accepted() {
        let attrs = FieldAttributes::from_value(
            FieldKind::SelectField,
            json!({ "placeHolder": "Pick a size", "options": ["S", "M"] }),
        )
        .unwrap();

        match attrs {
            FieldAttributes::Select(s) => {
                assert_eq!(s.placeholder, "Pick a size");
                assert_eq!(s.options, vec!["S", "M"]);
            }
            other => panic!("expected select attributes, got {:?}", other),
        }
    }

    #[test]
    fn test_null_attributes_mean_defaults() {
        let attrs = FieldAttributes::from_value(FieldKind::SeparatorField, Value::Null).unwrap();
        assert_eq!(attrs.kind(), FieldKind::SeparatorField);

        let spacer = FieldAttributes::from_value(FieldKind::SpacerField, Value::Null).unwrap();
        assert_eq!(spacer, FieldAttributes::Spacer(SpacerAttributes { height: 20 }));
    }

    #[test]
    fn test_non_object_attributes_are_rejected() {
        let result = FieldAttributes::from_value(FieldKind::TextField, json!([1, 2]));
        assert!(matches!(result, Err(FieldError::InvalidAttributes { .. })));
    }

    #[test]
    fn test_attributes_serialize_without_tag() {
        let attrs = FieldAttributes::Spacer(SpacerAttributes { height: 40 });
        assert_eq!(serde_json::to_value(&attrs).unwrap(), json!({ "height": 40 }));

        let empty = FieldAttributes::Separator(EmptyAttributes {});
        assert_eq!(serde_json::to_value(&empty).unwrap(), json!({}));
    }
}
