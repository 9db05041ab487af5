//! Repository synchronization pipelines.
//!
//! - `retrieve`: repository/branch discovery, bundle download, local import
//! - `store`: commit message, bundle split, sequential or single-commit push
//! - `source_data`: fixed bundle paths, JB64 codec, root/model/profile split
//! - `sidecar`: repository binding of a local project file
//!
//! Both pipelines return their user-facing result string; cancellations and
//! empty results are normal terminations carrying a literal message, not
//! errors.

pub mod retrieve;
pub mod sidecar;
pub mod source_data;
pub mod store;

pub use retrieve::retrieve;
pub use sidecar::Sidecar;
pub use store::store;

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted stand-ins for the GitLab API and the prompt.

    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD as BASE64;

    use crate::error::{AppError, Result};
    use crate::gitlab::ModelDataApi;
    use crate::models::{Branch, CommitAction, RepoFile, RepoProject};
    use crate::prompt::Prompt;

    /// In-memory API double. `files` maps repository paths to plain JSON
    /// text; a missing path probes as 404. `push_failures` makes a write to
    /// that path fail with the given status. Every call is appended to
    /// `calls` for order assertions.
    #[derive(Default)]
    pub struct FakeApi {
        pub projects: Vec<RepoProject>,
        pub branches: Vec<Branch>,
        pub files: HashMap<String, String>,
        pub push_failures: HashMap<String, u16>,
        pub calls: Mutex<Vec<String>>,
        pub pushed: Mutex<Vec<(String, String)>>,
    }

    impl FakeApi {
        pub fn log(&self, call: impl Into<String>) {
            self.calls.lock().unwrap().push(call.into());
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        pub fn pushed(&self) -> Vec<(String, String)> {
            self.pushed.lock().unwrap().clone()
        }

        fn push(&self, file_path: &str, content: &str) -> Result<()> {
            if let Some(&status) = self.push_failures.get(file_path) {
                return Err(AppError::Api {
                    status,
                    text: "Server Error".into(),
                });
            }
            self.pushed
                .lock()
                .unwrap()
                .push((file_path.to_string(), content.to_string()));
            Ok(())
        }
    }

    #[async_trait]
    impl ModelDataApi for FakeApi {
        async fn list_projects_for_group(&self, _namespace: &str) -> Result<Vec<RepoProject>> {
            self.log("list_projects");
            Ok(self.projects.clone())
        }

        async fn list_repo_branches(&self, _project_id: u64) -> Result<Vec<Branch>> {
            self.log("list_branches");
            Ok(self.branches.clone())
        }

        async fn get_file_from_repo(
            &self,
            _project_id: u64,
            file_path: &str,
            git_ref: &str,
        ) -> Result<RepoFile> {
            self.log(format!("get {file_path}"));
            let text = self.files.get(file_path).ok_or(AppError::Api {
                status: 404,
                text: "404 File Not Found".into(),
            })?;
            Ok(RepoFile {
                file_name: file_path.rsplit('/').next().unwrap_or(file_path).into(),
                file_path: file_path.to_string(),
                encoding: "base64".into(),
                content: BASE64.encode(text),
                git_ref: git_ref.to_string(),
            })
        }

        async fn create_new_file_in_repo(
            &self,
            _project_id: u64,
            _branch: &str,
            file_path: &str,
            content: &str,
            _commit_message: &str,
        ) -> Result<()> {
            self.log(format!("create {file_path}"));
            self.push(file_path, content)
        }

        async fn update_existing_file_in_repo(
            &self,
            _project_id: u64,
            _branch: &str,
            file_path: &str,
            content: &str,
            _commit_message: &str,
        ) -> Result<()> {
            self.log(format!("update {file_path}"));
            self.push(file_path, content)
        }

        async fn commit_to_repo(
            &self,
            _project_id: u64,
            _branch: &str,
            _commit_message: &str,
            actions: Vec<CommitAction>,
        ) -> Result<()> {
            self.log(format!("commit {} files", actions.len()));
            for action in actions {
                self.push(&action.file_path, &action.content)?;
            }
            Ok(())
        }
    }

    /// Prompt double replaying pre-baked answers.
    #[derive(Default)]
    pub struct ScriptedPrompt {
        pub selections: VecDeque<Option<usize>>,
        pub inputs: VecDeque<Option<String>>,
    }

    impl ScriptedPrompt {
        pub fn selecting(selections: Vec<Option<usize>>) -> Self {
            Self {
                selections: selections.into(),
                inputs: VecDeque::new(),
            }
        }

        pub fn entering(inputs: Vec<Option<&str>>) -> Self {
            Self {
                selections: VecDeque::new(),
                inputs: inputs.into_iter().map(|i| i.map(String::from)).collect(),
            }
        }
    }

    impl Prompt for ScriptedPrompt {
        fn select(&mut self, _title: &str, _options: &[String]) -> Result<Option<usize>> {
            Ok(self.selections.pop_front().flatten())
        }

        fn input(&mut self, _title: &str, _default: &str) -> Result<Option<String>> {
            Ok(self.inputs.pop_front().flatten())
        }
    }
}
