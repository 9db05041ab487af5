//! Reqwest-backed GitLab v4 client.
//!
//! Holds an explicit base URL and token instead of module-level state, so a
//! client is constructed once per configured endpoint and handed to the
//! pipelines. Single-shot semantics: no retries, no backoff; non-2xx
//! responses become `AppError::Api` with status and body text.

use async_trait::async_trait;
use futures::future;
use reqwest::{Client as HttpClient, Response};
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::gitlab::{ModelDataApi, filter_model_repos};
use crate::models::{
    Branch, CommitAction, CommitRequest, FileCommit, Group, RepoFile, RepoProject,
    ResolvedCommitAction,
};

const TOKEN_HEADER: &str = "PRIVATE-TOKEN";

#[derive(Debug, Clone)]
pub struct GitLabClient {
    http: HttpClient,
    base_url: Url,
    token: String,
}

impl GitLabClient {
    /// Build a client for the configured server. The API path is appended to
    /// the server URL, as in `https://host/api/v4/`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let base_url = Url::parse(&format!(
            "{}/api/v4/",
            config.server_url.trim_end_matches('/')
        ))?;
        let http = HttpClient::builder()
            .user_agent("model-sync/0.1")
            .build()
            .expect("failed to build HTTP client");
        Ok(Self {
            http,
            base_url,
            token: config.auth_token.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    /// Files endpoint for one path; the file path becomes a single
    /// percent-encoded path segment (slashes included).
    fn file_endpoint(&self, project_id: u64, file_path: &str) -> Result<Url> {
        let mut url = self.endpoint(&format!("projects/{project_id}/repository/files"))?;
        url.path_segments_mut()
            .expect("API base URL is always a valid base")
            .push(file_path);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        tracing::debug!(%url, "GET");
        let response = self
            .http
            .get(url)
            .header(TOKEN_HEADER, &self.token)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let text = response.text().await.unwrap_or_default();
            Err(AppError::Api {
                status: status.as_u16(),
                text,
            })
        }
    }

    /// Resolve a group namespace to its id. Takes the first search match;
    /// there is no disambiguation when several groups share a name prefix.
    async fn get_group_id(&self, namespace: &str) -> Result<u64> {
        let mut url = self.endpoint("groups")?;
        url.query_pairs_mut().append_pair("search", namespace);
        let groups: Vec<Group> = self.get_json(url).await?;
        groups
            .first()
            .map(|group| group.id)
            .ok_or_else(|| AppError::GroupNotFound(namespace.to_string()))
    }

    fn file_commit(branch: &str, content: &str, commit_message: &str) -> FileCommit {
        FileCommit {
            branch: branch.to_string(),
            content: content.to_string(),
            commit_message: commit_message.to_string(),
        }
    }
}

#[async_trait]
impl ModelDataApi for GitLabClient {
    async fn list_projects_for_group(&self, namespace: &str) -> Result<Vec<RepoProject>> {
        let group_id = self.get_group_id(namespace).await?;
        let mut url = self.endpoint(&format!("groups/{group_id}/projects"))?;
        url.query_pairs_mut()
            .append_pair("pagination", "keyset")
            .append_pair("per_page", "100")
            .append_pair("order_by", "id")
            .append_pair("sort", "asc")
            .append_pair("include_subgroups", "true");
        let projects: Vec<RepoProject> = self.get_json(url).await?;
        Ok(filter_model_repos(projects))
    }

    async fn list_repo_branches(&self, project_id: u64) -> Result<Vec<Branch>> {
        let url = self.endpoint(&format!("projects/{project_id}/repository/branches"))?;
        self.get_json(url).await
    }

    async fn get_file_from_repo(
        &self,
        project_id: u64,
        file_path: &str,
        git_ref: &str,
    ) -> Result<RepoFile> {
        let mut url = self.file_endpoint(project_id, file_path)?;
        url.query_pairs_mut().append_pair("ref", git_ref);
        self.get_json(url).await
    }

    async fn create_new_file_in_repo(
        &self,
        project_id: u64,
        branch: &str,
        file_path: &str,
        content: &str,
        commit_message: &str,
    ) -> Result<()> {
        let url = self.file_endpoint(project_id, file_path)?;
        tracing::debug!(%url, branch, "POST file");
        let response = self
            .http
            .post(url)
            .header(TOKEN_HEADER, &self.token)
            .json(&Self::file_commit(branch, content, commit_message))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn update_existing_file_in_repo(
        &self,
        project_id: u64,
        branch: &str,
        file_path: &str,
        content: &str,
        commit_message: &str,
    ) -> Result<()> {
        let url = self.file_endpoint(project_id, file_path)?;
        tracing::debug!(%url, branch, "PUT file");
        let response = self
            .http
            .put(url)
            .header(TOKEN_HEADER, &self.token)
            .json(&Self::file_commit(branch, content, commit_message))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn commit_to_repo(
        &self,
        project_id: u64,
        branch: &str,
        commit_message: &str,
        actions: Vec<CommitAction>,
    ) -> Result<()> {
        // Fan out one existence probe per file, collect all outcomes, then
        // resolve; the first non-404 probe failure aborts the commit.
        let probes = actions
            .iter()
            .map(|action| self.get_file_from_repo(project_id, &action.file_path, branch));
        let outcomes = future::join_all(probes).await;
        let resolved: Vec<ResolvedCommitAction> = actions
            .into_iter()
            .zip(outcomes)
            .map(|(action, probe)| action.resolve(probe))
            .collect::<Result<_>>()?;

        let url = self.endpoint(&format!("projects/{project_id}/repository/commits"))?;
        tracing::debug!(%url, branch, files = resolved.len(), "POST commit");
        let request = CommitRequest {
            branch: branch.to_string(),
            commit_message: commit_message.to_string(),
            actions: resolved,
        };
        let response = self
            .http
            .post(url)
            .header(TOKEN_HEADER, &self.token)
            .json(&request)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}
