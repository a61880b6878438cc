//! # Elements
//!
//! One placed building block within a form design.
//!
//! An element's id is assigned at construction and never changes. Its kind is
//! fixed by its attributes; edits replace the attributes wholesale, so two
//! elements sharing the same attribute allocation are known equal without a
//! deep comparison.

use std::fmt;
use std::sync::Arc;

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::{FieldAttributes, FieldError, FieldKind};

/// Opaque, unique element identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ElementId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A placed field instance
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RawElement")]
pub struct Element {
    id: ElementId,
    attributes: Arc<FieldAttributes>,
}

impl Element {
    pub fn new(id: ElementId, attributes: FieldAttributes) -> Self {
        Self {
            id,
            attributes: Arc::new(attributes),
        }
    }

    pub fn id(&self) -> &ElementId {
        &self.id
    }

    pub fn kind(&self) -> FieldKind {
        self.attributes.kind()
    }

    pub fn attributes(&self) -> &FieldAttributes {
        &self.attributes
    }

    /// Copy of this element with its attributes replaced.
    ///
    /// The kind of an element is immutable, so `attributes` must be of the
    /// same kind.
    pub fn with_attributes(&self, attributes: FieldAttributes) -> Result<Element, FieldError> {
        if attributes.kind() != self.kind() {
            return Err(FieldError::KindMismatch {
                id: self.id.to_string(),
                from: self.kind(),
                to: attributes.kind(),
            });
        }

        Ok(Element::new(self.id.clone(), attributes))
    }

    /// Whether both elements point at the same attribute allocation
    pub fn shares_attributes(&self, other: &Element) -> bool {
        Arc::ptr_eq(&self.attributes, &other.attributes)
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && (self.shares_attributes(other) || self.attributes == other.attributes)
    }
}

impl Serialize for Element {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut record = serializer.serialize_struct("Element", 3)?;
        record.serialize_field("id", &self.id)?;
        record.serialize_field("kind", &self.kind())?;
        record.serialize_field("attributes", self.attributes.as_ref())?;
        record.end()
    }
}

/// An element without an id yet, as produced by the generation collaborator
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawElement")]
pub struct ElementDraft {
    attributes: FieldAttributes,
}

impl ElementDraft {
    pub fn new(attributes: FieldAttributes) -> Self {
        Self { attributes }
    }

    pub fn kind(&self) -> FieldKind {
        self.attributes.kind()
    }

    pub fn attributes(&self) -> &FieldAttributes {
        &self.attributes
    }

    /// Place the draft under a freshly assigned id
    pub fn into_element(self, id: ElementId) -> Element {
        Element::new(id, self.attributes)
    }
}

/// Wire shape accepted on input. Accepts both `{id, kind, attributes}` and
/// the older `{id, type, extraAttributes}` spelling.
#[derive(Deserialize)]
struct RawElement {
    #[serde(default)]
    id: Option<ElementId>,
    #[serde(alias = "type")]
    kind: FieldKind,
    #[serde(default, alias = "extraAttributes")]
    attributes: Value,
}

impl TryFrom<RawElement> for Element {
    type Error = FieldError;

    fn try_from(raw: RawElement) -> Result<Self, Self::Error> {
        let id = raw.id.ok_or(FieldError::MissingId)?;
        let attributes = FieldAttributes::from_value(raw.kind, raw.attributes)?;
        Ok(Element::new(id, attributes))
    }
}

impl TryFrom<RawElement> for ElementDraft {
    type Error = FieldError;

    fn try_from(raw: RawElement) -> Result<Self, Self::Error> {
        // Any id on a draft is discarded; drafts always get fresh ids.
        let attributes = FieldAttributes::from_value(raw.kind, raw.attributes)?;
        Ok(ElementDraft { attributes })
    }
}
