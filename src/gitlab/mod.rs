//! GitLab REST v4 access.
//!
//! - `client`: the reqwest-backed `GitLabClient`
//! - `ModelDataApi`: the trait the sync pipelines program against, so they
//!   can be exercised without a live server

pub mod client;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Branch, CommitAction, RepoFile, RepoProject};

pub use client::GitLabClient;

/// The slice of the GitLab API the sync pipelines need.
///
/// `GitLabClient` is the production implementation; tests substitute a
/// scripted fake.
#[async_trait]
pub trait ModelDataApi: Send + Sync {
    /// List the projects of the group with the given namespace, excluding
    /// the `gitlab-profile` housekeeping project.
    async fn list_projects_for_group(&self, namespace: &str) -> Result<Vec<RepoProject>>;

    /// List all branches of a project. Callers filter out protected ones.
    async fn list_repo_branches(&self, project_id: u64) -> Result<Vec<Branch>>;

    /// Fetch one file's metadata and base64 content at a given ref.
    async fn get_file_from_repo(
        &self,
        project_id: u64,
        file_path: &str,
        git_ref: &str,
    ) -> Result<RepoFile>;

    async fn create_new_file_in_repo(
        &self,
        project_id: u64,
        branch: &str,
        file_path: &str,
        content: &str,
        commit_message: &str,
    ) -> Result<()>;

    async fn update_existing_file_in_repo(
        &self,
        project_id: u64,
        branch: &str,
        file_path: &str,
        content: &str,
        commit_message: &str,
    ) -> Result<()>;

    /// Submit one multi-action commit. Each action's create/update decision
    /// is made by a per-file existence probe; the probes run concurrently
    /// and any probe failure other than 404 aborts the whole commit.
    async fn commit_to_repo(
        &self,
        project_id: u64,
        branch: &str,
        commit_message: &str,
        actions: Vec<CommitAction>,
    ) -> Result<()>;
}

/// Drop the `gitlab-profile` project from a group's project list; everything
/// else passes through unchanged.
pub fn filter_model_repos(projects: Vec<RepoProject>) -> Vec<RepoProject> {
    projects
        .into_iter()
        .filter(|project| project.name != "gitlab-profile")
        .collect()
}
