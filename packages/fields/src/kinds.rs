//! Per-kind strategies: default attributes, palette metadata, validation.

use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate};
use regex::Regex;

use crate::registry::{DesignerButton, FieldStrategy};
use crate::*;

/// `Some(verdict)` when the value is empty, `None` when format checks apply
fn empty_verdict(required: bool, value: &str) -> Option<bool> {
    value.is_empty().then_some(!required)
}

fn phone_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\+?\(?[0-9]{3}\)?[-\s.]?[0-9]{3}[-\s.]?[0-9]{4,6}$")
            .expect("phone pattern is valid")
    })
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
    })
}

fn input_defaults(label: &str, placeholder: &str) -> InputAttributes {
    InputAttributes {
        label: label.to_string(),
        helper_text: "Helper text".to_string(),
        required: false,
        placeholder: placeholder.to_string(),
    }
}

fn select_defaults(label: &str) -> SelectAttributes {
    SelectAttributes {
        label: label.to_string(),
        helper_text: "Helper text".to_string(),
        required: false,
        placeholder: "Value here...".to_string(),
        options: Vec::new(),
    }
}

fn is_option(options: &[String], value: &str) -> bool {
    options.is_empty() || options.iter().any(|option| option == value)
}

pub struct TextField;

impl FieldStrategy for TextField {
    fn kind(&self) -> FieldKind {
        FieldKind::TextField
    }

    fn default_attributes(&self) -> FieldAttributes {
        FieldAttributes::Text(input_defaults("Text Field", "Value here..."))
    }

    fn designer_button(&self) -> DesignerButton {
        DesignerButton { label: "Text Field", icon: "MdTextFields" }
    }

    fn validate(&self, element: &Element, value: &str) -> bool {
        match element.attributes() {
            FieldAttributes::Text(attrs) => empty_verdict(attrs.required, value).unwrap_or(true),
            _ => false,
        }
    }

    fn collects_input(&self) -> bool {
        true
    }
}

pub struct TitleField;

impl FieldStrategy for TitleField {
    fn kind(&self) -> FieldKind {
        FieldKind::TitleField
    }

    fn default_attributes(&self) -> FieldAttributes {
        FieldAttributes::Title(TitleAttributes {
            title: "Title Field".to_string(),
            subtitle: String::new(),
        })
    }

    fn designer_button(&self) -> DesignerButton {
        DesignerButton { label: "Title Field", icon: "LuHeading1" }
    }

    fn validate(&self, element: &Element, _value: &str) -> bool {
        element.kind() == FieldKind::TitleField
    }
}

pub struct SubtitleField;

impl FieldStrategy for SubtitleField {
    fn kind(&self) -> FieldKind {
        FieldKind::SubtitleField
    }

    fn default_attributes(&self) -> FieldAttributes {
        FieldAttributes::Subtitle(SubtitleAttributes {
            subtitle: "Subtitle".to_string(),
        })
    }

    fn designer_button(&self) -> DesignerButton {
        DesignerButton { label: "Subtitle Field", icon: "LuHeading2" }
    }

    fn validate(&self, element: &Element, _value: &str) -> bool {
        element.kind() == FieldKind::SubtitleField
    }
}

pub struct ParagraphField;

impl FieldStrategy for ParagraphField {
    fn kind(&self) -> FieldKind {
        FieldKind::ParagraphField
    }

    fn default_attributes(&self) -> FieldAttributes {
        FieldAttributes::Paragraph(ParagraphAttributes {
            text: "Paragraph text here...".to_string(),
        })
    }

    fn designer_button(&self) -> DesignerButton {
        DesignerButton { label: "Paragraph Field", icon: "BsTextParagraph" }
    }

    fn validate(&self, element: &Element, _value: &str) -> bool {
        element.kind() == FieldKind::ParagraphField
    }
}

pub struct SeparatorField;

impl FieldStrategy for SeparatorField {
    fn kind(&self) -> FieldKind {
        FieldKind::SeparatorField
    }

    fn default_attributes(&self) -> FieldAttributes {
        FieldAttributes::Separator(EmptyAttributes {})
    }

    fn designer_button(&self) -> DesignerButton {
        DesignerButton { label: "Separator Field", icon: "RiSeparator" }
    }

    fn validate(&self, element: &Element, _value: &str) -> bool {
        element.kind() == FieldKind::SeparatorField
    }
}

pub struct SpacerField;

impl FieldStrategy for SpacerField {
    fn kind(&self) -> FieldKind {
        FieldKind::SpacerField
    }

    fn default_attributes(&self) -> FieldAttributes {
        FieldAttributes::Spacer(SpacerAttributes { height: 20 })
    }

    fn designer_button(&self) -> DesignerButton {
        DesignerButton { label: "Spacer", icon: "LuSeparatorHorizontal" }
    }

    fn validate(&self, element: &Element, _value: &str) -> bool {
        element.kind() == FieldKind::SpacerField
    }
}

pub struct NumberField;

impl FieldStrategy for NumberField {
    fn kind(&self) -> FieldKind {
        FieldKind::NumberField
    }

    fn default_attributes(&self) -> FieldAttributes {
        FieldAttributes::Number(NumberAttributes {
            label: "Number Input Label".to_string(),
            helper_text: "Helper text".to_string(),
            min: 0.0,
            max: 100.0,
            required: false,
            placeholder: String::new(),
        })
    }

    fn designer_button(&self) -> DesignerButton {
        DesignerButton { label: "Number Input", icon: "Bs123" }
    }

    fn validate(&self, element: &Element, value: &str) -> bool {
        let FieldAttributes::Number(attrs) = element.attributes() else {
            return false;
        };
        if let Some(verdict) = empty_verdict(attrs.required, value) {
            return verdict;
        }

        match value.trim().parse::<f64>() {
            Ok(number) if number.is_finite() => attrs.min <= number && number <= attrs.max,
            _ => false,
        }
    }

    fn collects_input(&self) -> bool {
        true
    }
}

pub struct PhoneNumberField;

impl FieldStrategy for PhoneNumberField {
    fn kind(&self) -> FieldKind {
        FieldKind::PhoneNumberField
    }

    fn default_attributes(&self) -> FieldAttributes {
        FieldAttributes::PhoneNumber(input_defaults("Phone Input Label", ""))
    }

    fn designer_button(&self) -> DesignerButton {
        DesignerButton { label: "Phone Input", icon: "BsPhone" }
    }

    fn validate(&self, element: &Element, value: &str) -> bool {
        let FieldAttributes::PhoneNumber(attrs) = element.attributes() else {
            return false;
        };
        empty_verdict(attrs.required, value).unwrap_or_else(|| phone_pattern().is_match(value))
    }

    fn collects_input(&self) -> bool {
        true
    }
}

pub struct EmailField;

impl FieldStrategy for EmailField {
    fn kind(&self) -> FieldKind {
        FieldKind::EmailField
    }

    fn default_attributes(&self) -> FieldAttributes {
        FieldAttributes::Email(input_defaults("Email Input Label", "name@example.com"))
    }

    fn designer_button(&self) -> DesignerButton {
        DesignerButton { label: "Email Input", icon: "MdOutlineEmail" }
    }

    fn validate(&self, element: &Element, value: &str) -> bool {
        let FieldAttributes::Email(attrs) = element.attributes() else {
            return false;
        };
        empty_verdict(attrs.required, value).unwrap_or_else(|| email_pattern().is_match(value))
    }

    fn collects_input(&self) -> bool {
        true
    }
}

pub struct TextAreaField;

impl FieldStrategy for TextAreaField {
    fn kind(&self) -> FieldKind {
        FieldKind::TextAreaField
    }

    fn default_attributes(&self) -> FieldAttributes {
        FieldAttributes::TextArea(TextAreaAttributes {
            label: "Text Area Field".to_string(),
            helper_text: "Helper text".to_string(),
            required: false,
            placeholder: "Value here...".to_string(),
            rows: 3,
        })
    }

    fn designer_button(&self) -> DesignerButton {
        DesignerButton { label: "TextArea Field", icon: "BsTextareaResize" }
    }

    fn validate(&self, element: &Element, value: &str) -> bool {
        match element.attributes() {
            FieldAttributes::TextArea(attrs) => {
                empty_verdict(attrs.required, value).unwrap_or(true)
            }
            _ => false,
        }
    }

    fn collects_input(&self) -> bool {
        true
    }
}

pub struct DateField;

impl FieldStrategy for DateField {
    fn kind(&self) -> FieldKind {
        FieldKind::DateField
    }

    fn default_attributes(&self) -> FieldAttributes {
        FieldAttributes::Date(DateAttributes {
            label: "Date Field".to_string(),
            helper_text: "Pick a date".to_string(),
            required: false,
        })
    }

    fn designer_button(&self) -> DesignerButton {
        DesignerButton { label: "Date Field", icon: "BsCalendarDate" }
    }

    fn validate(&self, element: &Element, value: &str) -> bool {
        let FieldAttributes::Date(attrs) = element.attributes() else {
            return false;
        };
        empty_verdict(attrs.required, value).unwrap_or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
                || DateTime::parse_from_rfc3339(value).is_ok()
        })
    }

    fn collects_input(&self) -> bool {
        true
    }
}

pub struct SelectField;

impl FieldStrategy for SelectField {
    fn kind(&self) -> FieldKind {
        FieldKind::SelectField
    }

    fn default_attributes(&self) -> FieldAttributes {
        FieldAttributes::Select(select_defaults("Select Field"))
    }

    fn designer_button(&self) -> DesignerButton {
        DesignerButton { label: "Select Field", icon: "RxDropdownMenu" }
    }

    fn validate(&self, element: &Element, value: &str) -> bool {
        let FieldAttributes::Select(attrs) = element.attributes() else {
            return false;
        };
        empty_verdict(attrs.required, value).unwrap_or_else(|| is_option(&attrs.options, value))
    }

    fn collects_input(&self) -> bool {
        true
    }
}

pub struct SingleSelectField;

impl FieldStrategy for SingleSelectField {
    fn kind(&self) -> FieldKind {
        FieldKind::SingleSelectField
    }

    fn default_attributes(&self) -> FieldAttributes {
        FieldAttributes::SingleSelect(select_defaults("Single Select Field Label"))
    }

    fn designer_button(&self) -> DesignerButton {
        DesignerButton { label: "Single Select", icon: "IoMdRadioButtonOn" }
    }

    fn validate(&self, element: &Element, value: &str) -> bool {
        let FieldAttributes::SingleSelect(attrs) = element.attributes() else {
            return false;
        };
        empty_verdict(attrs.required, value).unwrap_or_else(|| is_option(&attrs.options, value))
    }

    fn collects_input(&self) -> bool {
        true
    }
}

pub struct MultiSelectField;

impl FieldStrategy for MultiSelectField {
    fn kind(&self) -> FieldKind {
        FieldKind::MultiSelectField
    }

    fn default_attributes(&self) -> FieldAttributes {
        FieldAttributes::MultiSelect(select_defaults("Multi Select Field Label"))
    }

    fn designer_button(&self) -> DesignerButton {
        DesignerButton { label: "Multi Select", icon: "GoCheckbox" }
    }

    /// Value is the chosen options joined with `,`
    fn validate(&self, element: &Element, value: &str) -> bool {
        let FieldAttributes::MultiSelect(attrs) = element.attributes() else {
            return false;
        };
        empty_verdict(attrs.required, value).unwrap_or_else(|| {
            value
                .split(',')
                .all(|choice| !choice.is_empty() && is_option(&attrs.options, choice))
        })
    }

    fn collects_input(&self) -> bool {
        true
    }
}

pub struct CheckboxField;

impl FieldStrategy for CheckboxField {
    fn kind(&self) -> FieldKind {
        FieldKind::CheckboxField
    }

    fn default_attributes(&self) -> FieldAttributes {
        FieldAttributes::Checkbox(CheckboxAttributes {
            label: "Checkbox Field".to_string(),
            helper_text: "Helper text".to_string(),
            required: false,
        })
    }

    fn designer_button(&self) -> DesignerButton {
        DesignerButton { label: "Checkbox Field", icon: "IoMdCheckbox" }
    }

    /// Value is `"true"` or `"false"`; a required checkbox must be checked
    fn validate(&self, element: &Element, value: &str) -> bool {
        let FieldAttributes::Checkbox(attrs) = element.attributes() else {
            return false;
        };
        match value {
            "" => !attrs.required,
            "true" => true,
            "false" => !attrs.required,
            _ => false,
        }
    }

    fn collects_input(&self) -> bool {
        true
    }
}

pub struct ImageField;

impl FieldStrategy for ImageField {
    fn kind(&self) -> FieldKind {
        FieldKind::ImageField
    }

    fn default_attributes(&self) -> FieldAttributes {
        FieldAttributes::Image(ImageAttributes {
            label: "Image Field Label".to_string(),
            helper_text: "Helper text".to_string(),
            image_url: None,
        })
    }

    fn designer_button(&self) -> DesignerButton {
        DesignerButton { label: "Image Field", icon: "CiImageOn" }
    }

    fn validate(&self, element: &Element, _value: &str) -> bool {
        element.kind() == FieldKind::ImageField
    }
}

pub struct GenerateField;

impl FieldStrategy for GenerateField {
    fn kind(&self) -> FieldKind {
        FieldKind::GenerateField
    }

    fn default_attributes(&self) -> FieldAttributes {
        FieldAttributes::Generate(EmptyAttributes {})
    }

    fn designer_button(&self) -> DesignerButton {
        DesignerButton { label: "Generate Fields", icon: "SiOpenai" }
    }

    fn validate(&self, element: &Element, _value: &str) -> bool {
        element.kind() == FieldKind::GenerateField
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry;

    fn number(min: f64, max: f64, required: bool) -> Element {
        Element::new(
            ElementId::new("n"),
            FieldAttributes::Number(NumberAttributes {
                label: "Amount".to_string(),
                helper_text: String::new(),
                min,
                max,
                required,
                placeholder: String::new(),
            }),
        )
    }

    fn required(kind: FieldKind) -> Element {
        let element = registry::construct(kind, ElementId::new("r"));
        let value = match element.attributes().clone() {
            FieldAttributes::Text(mut a) => {
                a.required = true;
                FieldAttributes::Text(a)
            }
            FieldAttributes::PhoneNumber(mut a) => {
                a.required = true;
                FieldAttributes::PhoneNumber(a)
            }
            FieldAttributes::Email(mut a) => {
                a.required = true;
                FieldAttributes::Email(a)
            }
            FieldAttributes::Checkbox(mut a) => {
                a.required = true;
                FieldAttributes::Checkbox(a)
            }
            other => other,
        };
        element.with_attributes(value).unwrap()
    }

    #[test]
    fn test_number_range_and_required() {
        let element = number(0.0, 100.0, true);
        assert!(!registry::validate(&element, "150"));
        assert!(registry::validate(&element, "50"));
        assert!(!registry::validate(&element, ""));
        assert!(!registry::validate(&element, "-1"));
        assert!(registry::validate(&element, "100"));
    }

    #[test]
    fn test_number_rejects_garbage() {
        let element = number(0.0, 100.0, false);
        assert!(registry::validate(&element, ""));
        assert!(!registry::validate(&element, "fifty"));
        assert!(!registry::validate(&element, "NaN"));
        assert!(!registry::validate(&element, "inf"));
        assert!(registry::validate(&element, " 12.5 "));
    }

    #[test]
    fn test_phone_pattern() {
        let optional = registry::construct(FieldKind::PhoneNumberField, ElementId::new("p"));
        assert!(registry::validate(&optional, ""));
        assert!(registry::validate(&optional, "555-123-4567"));
        assert!(registry::validate(&optional, "+(555) 123 4567"));
        assert!(!registry::validate(&optional, "call me"));

        let phone = required(FieldKind::PhoneNumberField);
        assert!(!registry::validate(&phone, ""));
        assert!(!registry::validate(&phone, "12"));
        assert!(registry::validate(&phone, "5551234567"));
    }

    #[test]
    fn test_required_text_and_email() {
        let text = required(FieldKind::TextField);
        assert!(!registry::validate(&text, ""));
        assert!(registry::validate(&text, "anything"));

        let email = required(FieldKind::EmailField);
        assert!(!registry::validate(&email, ""));
        assert!(!registry::validate(&email, "not-an-email"));
        assert!(registry::validate(&email, "ada@example.com"));
    }

    #[test]
    fn test_date_formats() {
        let date = registry::construct(FieldKind::DateField, ElementId::new("d"));
        assert!(registry::validate(&date, ""));
        assert!(registry::validate(&date, "2024-02-29"));
        assert!(registry::validate(&date, "2024-02-29T10:00:00Z"));
        assert!(!registry::validate(&date, "2023-02-29"));
        assert!(!registry::validate(&date, "yesterday"));
    }

    #[test]
    fn test_select_options() {
        let base = registry::construct(FieldKind::MultiSelectField, ElementId::new("m"));
        let element = base
            .with_attributes(FieldAttributes::MultiSelect(SelectAttributes {
                label: "Sizes".to_string(),
                helper_text: String::new(),
                required: true,
                placeholder: String::new(),
                options: vec!["S".to_string(), "M".to_string(), "L".to_string()],
            }))
            .unwrap();

        assert!(!registry::validate(&element, ""));
        assert!(registry::validate(&element, "S"));
        assert!(registry::validate(&element, "S,L"));
        assert!(!registry::validate(&element, "S,XL"));
        assert!(!registry::validate(&element, "S,"));
    }

    #[test]
    fn test_checkbox_values() {
        let optional = registry::construct(FieldKind::CheckboxField, ElementId::new("c"));
        assert!(registry::validate(&optional, "false"));
        assert!(registry::validate(&optional, ""));
        assert!(!registry::validate(&optional, "yes"));

        let must_agree = required(FieldKind::CheckboxField);
        assert!(registry::validate(&must_agree, "true"));
        assert!(!registry::validate(&must_agree, "false"));
        assert!(!registry::validate(&must_agree, ""));
    }

    #[test]
    fn test_layout_kinds_always_pass() {
        for kind in [
            FieldKind::TitleField,
            FieldKind::SubtitleField,
            FieldKind::ParagraphField,
            FieldKind::SeparatorField,
            FieldKind::SpacerField,
            FieldKind::ImageField,
        ] {
            let element = registry::construct(kind, ElementId::new("l"));
            assert!(registry::validate(&element, ""));
            assert!(registry::validate(&element, "ignored"));
        }
    }

    #[test]
    fn test_strategy_rejects_foreign_kind() {
        let text = registry::construct(FieldKind::TextField, ElementId::new("t"));
        assert!(!NumberField.validate(&text, "5"));
        assert!(!ParagraphField.validate(&text, ""));
    }
}
