//! Commit actions for the multi-file commits endpoint.
//!
//! A pending `CommitAction` only names a path and its new content; whether
//! GitLab should `create` or `update` the file is decided by probing the
//! file's current existence on the target branch. A 404 probe means the file
//! does not exist yet (`create`), a 2xx probe means it does (`update`), and
//! any other failure propagates instead of silently defaulting to `create`.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::RepoFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileAction {
    Create,
    Update,
}

/// A pending file change, action not yet determined.
#[derive(Debug, Clone)]
pub struct CommitAction {
    pub file_path: String,
    pub content: String,
}

impl CommitAction {
    pub fn new(file_path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            content: content.into(),
        }
    }

    /// Determine the commit action from the outcome of an existence probe
    /// (a `get_file_from_repo` call for this path on the target branch).
    pub fn resolve(self, probe: Result<RepoFile>) -> Result<ResolvedCommitAction> {
        let action = match probe {
            Ok(_) => FileAction::Update,
            Err(err) if err.api_status() == Some(404) => FileAction::Create,
            Err(err) => return Err(err),
        };
        Ok(ResolvedCommitAction {
            file_path: self.file_path,
            content: self.content,
            action,
        })
    }
}

/// A file change with its create/update action determined, ready to submit.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedCommitAction {
    pub file_path: String,
    pub content: String,
    pub action: FileAction,
}

/// Request body for `POST /projects/{id}/repository/commits`.
#[derive(Debug, Clone, Serialize)]
pub struct CommitRequest {
    pub branch: String,
    pub commit_message: String,
    pub actions: Vec<ResolvedCommitAction>,
}
