//! The three-way source data bundle and its JB64 encoding.
//!
//! A shared model project is version-controlled as three files under a fixed
//! relative path: the project root (its top-level fields only), the UML
//! model and the UML profile. On the wire a file body is base64-encoded
//! UTF-8 JSON ("JB64"); locally and in commits the body is plain
//! tab-indented JSON text.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Serialize;
use serde_json::Value;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::error::{AppError, Result};
use crate::models::CommitAction;

/// Repository directory holding the bundle. Process-wide constant, never a
/// per-call parameter.
pub const SOURCE_DATA_PATH: &str = "source-data";

pub const COMMON_ROOT_DATA_FILE: &str = "common-root-data.mdj";
pub const COMMON_MODEL_DATA_FILE: &str = "common-model-data.mfj";
pub const COMMON_PROFILE_DATA_FILE: &str = "common-profile-data.mfj";

pub fn root_file_path() -> String {
    format!("{SOURCE_DATA_PATH}/{COMMON_ROOT_DATA_FILE}")
}

pub fn model_file_path() -> String {
    format!("{SOURCE_DATA_PATH}/{COMMON_MODEL_DATA_FILE}")
}

pub fn profile_file_path() -> String {
    format!("{SOURCE_DATA_PATH}/{COMMON_PROFILE_DATA_FILE}")
}

/// Decode a JB64 file body into a JSON document. Whitespace in the base64
/// text (GitLab may wrap it) is ignored.
pub fn decode_jb64(content: &str) -> Result<Value> {
    let compact: String = content.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = BASE64.decode(compact)?;
    let text = String::from_utf8(bytes)?;
    Ok(serde_json::from_str(&text)?)
}

/// Serialize a document as tab-indented JSON text, the local storage format.
pub fn to_tabbed_json<T: Serialize>(value: &T) -> Result<String> {
    let mut out = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"\t");
    let mut serializer = Serializer::with_formatter(&mut out, formatter);
    value.serialize(&mut serializer)?;
    Ok(String::from_utf8(out)?)
}

/// Append an element under the document root's `ownedElements`.
pub fn attach_owned_element(root: &mut Value, element: Value) -> Result<()> {
    let object = root.as_object_mut().ok_or(AppError::InvalidDocument)?;
    object
        .entry("ownedElements")
        .or_insert_with(|| Value::Array(Vec::new()))
        .as_array_mut()
        .ok_or(AppError::InvalidDocument)?
        .push(element);
    Ok(())
}

/// One of the bundle's three payloads, with its user-facing stage name.
pub struct Payload<'a> {
    pub stage: &'static str,
    pub file_path: String,
    pub content: &'a Value,
}

/// The three payloads split out of one exported project document.
#[derive(Debug)]
pub struct SourceDataBundle {
    pub root: Value,
    pub model: Value,
    pub profile: Value,
}

impl SourceDataBundle {
    /// Split a full project document: root keeps every top-level field
    /// except `tags` and `ownedElements`; model and profile are the first
    /// `ownedElements` entries declaring `_type` `UMLModel` / `UMLProfile`,
    /// wherever they sit in the array.
    pub fn split(document: &Value) -> Result<Self> {
        let object = document.as_object().ok_or(AppError::InvalidDocument)?;

        let root: serde_json::Map<String, Value> = object
            .iter()
            .filter(|(key, _)| key.as_str() != "tags" && key.as_str() != "ownedElements")
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Ok(Self {
            root: Value::Object(root),
            model: extract_owned_element(document, "UMLModel")?,
            profile: extract_owned_element(document, "UMLProfile")?,
        })
    }

    /// Payloads in the fixed push order: root, model, profile.
    pub fn payloads(&self) -> [Payload<'_>; 3] {
        [
            Payload {
                stage: "Project Root Data",
                file_path: root_file_path(),
                content: &self.root,
            },
            Payload {
                stage: "UML Model Data",
                file_path: model_file_path(),
                content: &self.model,
            },
            Payload {
                stage: "UML Profile Data",
                file_path: profile_file_path(),
                content: &self.profile,
            },
        ]
    }

    /// The same three payloads as pending actions for one multi-file commit.
    pub fn commit_actions(&self) -> Result<Vec<CommitAction>> {
        self.payloads()
            .iter()
            .map(|payload| {
                Ok(CommitAction::new(
                    payload.file_path.clone(),
                    to_tabbed_json(payload.content)?,
                ))
            })
            .collect()
    }
}

fn extract_owned_element(document: &Value, type_tag: &'static str) -> Result<Value> {
    document
        .get("ownedElements")
        .and_then(Value::as_array)
        .and_then(|elements| {
            elements
                .iter()
                .find(|element| element.get("_type").and_then(Value::as_str) == Some(type_tag))
        })
        .cloned()
        .ok_or(AppError::MissingSection(type_tag))
}
