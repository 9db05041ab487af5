//! UML element model and MIM element builders.
//!
//! - `element`: `_type`-tagged element tree, the local project document shape
//! - `factory`: stereotyped class/attribute/association/generalization builders

pub mod element;
pub mod factory;

use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::sync::source_data;

pub use element::{Element, ElementKind, ElementRef};

/// Load a project document from a local `.mdj` file.
pub fn load_project(path: &Path) -> Result<Element> {
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Write a project document back as tab-indented JSON.
pub fn save_project(path: &Path, root: &Element) -> Result<()> {
    fs::write(path, source_data::to_tabbed_json(root)?)?;
    Ok(())
}
