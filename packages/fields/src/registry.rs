//! # Field Registry
//!
//! Maps every `FieldKind` to the strategy that constructs and validates it.
//!
//! The mapping is an exhaustive `match`, so adding a kind without a strategy
//! is a compile error rather than a runtime lookup failure.

use crate::kinds::*;
use crate::{Element, ElementId, FieldAttributes, FieldKind};

/// Designer-facing palette metadata (presentation only)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DesignerButton {
    pub label: &'static str,
    pub icon: &'static str,
}

/// Behavior bundle for one field kind
pub trait FieldStrategy: Send + Sync {
    /// The kind this strategy handles
    fn kind(&self) -> FieldKind;

    /// Registry-defined default attributes
    fn default_attributes(&self) -> FieldAttributes;

    /// Palette button metadata
    fn designer_button(&self) -> DesignerButton;

    /// Check a submitted value against the element's attributes.
    ///
    /// Optional-and-empty values pass. Values for an element of another
    /// kind never pass.
    fn validate(&self, element: &Element, value: &str) -> bool;

    /// Whether elements of this kind collect a value on submission
    fn collects_input(&self) -> bool {
        false
    }

    /// New element with default attributes
    fn construct(&self, id: ElementId) -> Element {
        Element::new(id, self.default_attributes())
    }
}

/// Strategy for `kind`
pub fn strategy(kind: FieldKind) -> &'static dyn FieldStrategy {
    match kind {
        FieldKind::TextField => &TextField,
        FieldKind::TitleField => &TitleField,
        FieldKind::SubtitleField => &SubtitleField,
        FieldKind::ParagraphField => &ParagraphField,
        FieldKind::SeparatorField => &SeparatorField,
        FieldKind::SpacerField => &SpacerField,
        FieldKind::NumberField => &NumberField,
        FieldKind::PhoneNumberField => &PhoneNumberField,
        FieldKind::EmailField => &EmailField,
        FieldKind::TextAreaField => &TextAreaField,
        FieldKind::DateField => &DateField,
        FieldKind::SelectField => &SelectField,
        FieldKind::SingleSelectField => &SingleSelectField,
        FieldKind::MultiSelectField => &MultiSelectField,
        FieldKind::CheckboxField => &CheckboxField,
        FieldKind::ImageField => &ImageField,
        FieldKind::GenerateField => &GenerateField,
    }
}

/// Construct a default element of `kind`
pub fn construct(kind: FieldKind, id: ElementId) -> Element {
    strategy(kind).construct(id)
}

/// Validate `value` with the strategy of the element's own kind
pub fn validate(element: &Element, value: &str) -> bool {
    strategy(element.kind()).validate(element, value)
}

/// Palette entries in display order
pub fn palette() -> impl Iterator<Item = (FieldKind, DesignerButton)> {
    FieldKind::ALL
        .into_iter()
        .map(|kind| (kind, strategy(kind).designer_button()))
}
