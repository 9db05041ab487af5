//! Data transfer objects for the GitLab REST API.
//!
//! These structs are deserialized from / serialized to the GitLab v4 JSON
//! wire format.
//! - `repo`: Group, RepoProject, Branch
//! - `file`: RepoFile, FileCommit
//! - `commit`: CommitAction, ResolvedCommitAction, CommitRequest

pub mod commit;
pub mod file;
pub mod repo;

pub use commit::*;
pub use file::*;
pub use repo::*;
