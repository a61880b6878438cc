//! # Formcraft Fields
//!
//! The closed catalog of form building blocks.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ FieldKind: closed enum of block types       │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ registry: FieldKind → FieldStrategy         │
//! │  - construct(id) with default attributes    │
//! │  - validate(element, value)                 │
//! │  - designer button metadata                 │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ Element: {id, kind, attributes}             │
//! │  - attributes replaced wholesale on edit    │
//! │  - serialized document format               │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use formcraft_fields::{registry, ElementId, FieldKind};
//!
//! let element = registry::construct(FieldKind::NumberField, ElementId::new("n-1"));
//! assert!(registry::validate(&element, "42"));
//! assert!(!registry::validate(&element, "420"));
//! ```

mod attributes;
mod document;
mod element;
mod error;
mod id_generator;
mod kinds;
pub mod registry;

pub use attributes::{
    CheckboxAttributes, DateAttributes, EmptyAttributes, FieldAttributes, FieldKind,
    ImageAttributes, InputAttributes, NumberAttributes, ParagraphAttributes, SelectAttributes,
    SpacerAttributes, SubtitleAttributes, TextAreaAttributes, TitleAttributes,
};
pub use document::{deserialize_elements, serialize_elements};
pub use element::{Element, ElementDraft, ElementId};
pub use error::FieldError;
pub use id_generator::{get_form_seed, IdGenerator};
pub use registry::{DesignerButton, FieldStrategy};
