use serde::{Deserialize, Serialize};

/// A GitLab group, as returned by `GET /groups?search=`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub full_path: String,
}

/// A project (repository) reference: immutable once listed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoProject {
    pub id: u64,
    pub name: String,
}

/// A branch reference. Only unprotected branches are offered as work targets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Branch {
    pub name: String,
    #[serde(default)]
    pub protected: bool,
}
