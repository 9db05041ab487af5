//! Tagged-variant representation of UML model elements.
//!
//! The modeling host's class hierarchy becomes a single `Element` struct
//! with a kind discriminant, mirroring the `_type`-tagged JSON the project
//! documents use on disk and on the wire. Fields this tool never touches
//! (views, documentation, host bookkeeping) survive round-trips in `extra`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementKind {
    Project,
    Model,
    Profile,
    Package,
    Class,
    Attribute,
    Association,
    AssociationEnd,
    Generalization,
    Stereotype,
    DataType,
    Tag,
    /// Any `_type` this tool does not interpret (diagrams, views, ...).
    Other(String),
}

impl ElementKind {
    pub fn as_str(&self) -> &str {
        match self {
            ElementKind::Project => "Project",
            ElementKind::Model => "UMLModel",
            ElementKind::Profile => "UMLProfile",
            ElementKind::Package => "UMLPackage",
            ElementKind::Class => "UMLClass",
            ElementKind::Attribute => "UMLAttribute",
            ElementKind::Association => "UMLAssociation",
            ElementKind::AssociationEnd => "UMLAssociationEnd",
            ElementKind::Generalization => "UMLGeneralization",
            ElementKind::Stereotype => "UMLStereotype",
            ElementKind::DataType => "UMLDataType",
            ElementKind::Tag => "Tag",
            ElementKind::Other(tag) => tag,
        }
    }
}

impl From<&str> for ElementKind {
    fn from(tag: &str) -> Self {
        match tag {
            "Project" => ElementKind::Project,
            "UMLModel" => ElementKind::Model,
            "UMLProfile" => ElementKind::Profile,
            "UMLPackage" => ElementKind::Package,
            "UMLClass" => ElementKind::Class,
            "UMLAttribute" => ElementKind::Attribute,
            "UMLAssociation" => ElementKind::Association,
            "UMLAssociationEnd" => ElementKind::AssociationEnd,
            "UMLGeneralization" => ElementKind::Generalization,
            "UMLStereotype" => ElementKind::Stereotype,
            "UMLDataType" => ElementKind::DataType,
            "Tag" => ElementKind::Tag,
            other => ElementKind::Other(other.to_string()),
        }
    }
}

impl Serialize for ElementKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ElementKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(ElementKind::from(tag.as_str()))
    }
}

/// A `{"$ref": id}` reference to another element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementRef {
    #[serde(rename = "$ref")]
    pub id: String,
}

impl ElementRef {
    pub fn to(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Element {
    #[serde(rename = "_type")]
    pub kind: ElementKind,

    #[serde(rename = "_id")]
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stereotype: Option<ElementRef>,

    /// Type of an attribute, e.g. a Keuze class reference.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_ref: Option<ElementRef>,

    /// Referenced classifier of an association end.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<ElementRef>,

    /// Source/target of a generalization.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<ElementRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<ElementRef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end1: Option<Box<Element>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end2: Option<Box<Element>>,

    #[serde(
        rename = "ownedElements",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub owned_elements: Vec<Element>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<Element>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Element>,

    /// Everything else, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

pub fn new_element_id() -> String {
    Uuid::new_v4().simple().to_string()
}

impl Element {
    pub fn new(kind: ElementKind, name: &str) -> Self {
        Self {
            kind,
            id: new_element_id(),
            name: Some(name.to_string()),
            stereotype: None,
            type_ref: None,
            reference: None,
            source: None,
            target: None,
            end1: None,
            end2: None,
            owned_elements: Vec::new(),
            attributes: Vec::new(),
            tags: Vec::new(),
            extra: Map::new(),
        }
    }

    pub fn reference_to(&self) -> ElementRef {
        ElementRef::to(self.id.clone())
    }

    /// Record the owning element, as the document format expects.
    pub fn set_parent(&mut self, parent_id: &str) {
        self.extra.insert(
            "_parent".to_string(),
            serde_json::json!({ "$ref": parent_id }),
        );
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    /// Depth-first walk over this element and everything it owns.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Element)) {
        visit(self);
        for child in self
            .owned_elements
            .iter()
            .chain(self.attributes.iter())
            .chain(self.tags.iter())
        {
            child.walk(visit);
        }
        if let Some(end) = &self.end1 {
            end.walk(visit);
        }
        if let Some(end) = &self.end2 {
            end.walk(visit);
        }
    }

    /// All elements in the tree matching a predicate.
    pub fn find_all<'a>(&'a self, predicate: impl Fn(&Element) -> bool) -> Vec<&'a Element> {
        let mut found = Vec::new();
        self.walk(&mut |element| {
            if predicate(element) {
                found.push(element);
            }
        });
        found
    }

    /// First directly owned element of the given kind.
    pub fn owned_of_kind(&self, kind: &ElementKind) -> Option<&Element> {
        self.owned_elements.iter().find(|el| &el.kind == kind)
    }

    pub fn owned_of_kind_mut(&mut self, kind: &ElementKind) -> Option<&mut Element> {
        self.owned_elements.iter_mut().find(|el| &el.kind == kind)
    }
}

/// Mutable lookup of a class by name anywhere under `root`.
pub fn find_class_mut<'a>(root: &'a mut Element, name: &str) -> Option<&'a mut Element> {
    if root.kind == ElementKind::Class && root.name() == name {
        return Some(root);
    }
    for child in root.owned_elements.iter_mut() {
        if let Some(found) = find_class_mut(child, name) {
            return Some(found);
        }
    }
    None
}
