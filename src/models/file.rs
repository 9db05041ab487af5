use serde::{Deserialize, Serialize};

/// A single file fetched from a repository at a given ref.
///
/// The `content` field carries the file body base64-encoded ("JB64" when the
/// body is a JSON document).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoFile {
    pub file_name: String,
    pub file_path: String,
    #[serde(default)]
    pub encoding: String,
    pub content: String,
    #[serde(rename = "ref", default)]
    pub git_ref: String,
}

/// Request body for the single-file create/update endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct FileCommit {
    pub branch: String,
    pub content: String,
    pub commit_message: String,
}
