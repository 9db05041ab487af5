//! Repository binding for a local project file.
//!
//! Retrieve records where a project came from (project id, name, branch) so
//! store knows where to push. This lives in a sidecar file next to the
//! project document instead of being smuggled into the document tree as
//! tags. A project without a sidecar was never retrieved and cannot be
//! stored.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sidecar {
    pub project_id: u64,
    pub project_name: String,
    pub branch: String,
    pub last_sync: DateTime<Utc>,
}

impl Sidecar {
    pub fn new(project_id: u64, project_name: &str, branch: &str) -> Self {
        Self {
            project_id,
            project_name: project_name.to_string(),
            branch: branch.to_string(),
            last_sync: Utc::now(),
        }
    }

    /// Sidecar location for a project file: same stem, `.sync.json` suffix.
    pub fn path_for(project_file: &Path) -> PathBuf {
        let mut name = project_file
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "project".to_string());
        name.push_str(".sync.json");
        project_file.with_file_name(name)
    }

    /// Load the binding for a project file; `None` when the project was
    /// never retrieved from a repository.
    pub fn load(project_file: &Path) -> Result<Option<Self>> {
        let path = Self::path_for(project_file);
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&contents)?))
    }

    pub fn save(&self, project_file: &Path) -> Result<()> {
        let path = Self::path_for(project_file);
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Refresh the last-sync timestamp.
    pub fn touch(&mut self) {
        self.last_sync = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sidecar_sits_next_to_project_file() {
        let path = Sidecar::path_for(Path::new("/work/common-model.mdj"));
        assert_eq!(path, Path::new("/work/common-model.sync.json"));
    }

    #[test]
    fn roundtrips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let project_file = dir.path().join("common-model.mdj");

        assert!(Sidecar::load(&project_file).unwrap().is_none());

        let sidecar = Sidecar::new(42, "zorgmodel", "werk-branch");
        sidecar.save(&project_file).unwrap();

        let loaded = Sidecar::load(&project_file).unwrap().unwrap();
        assert_eq!(loaded.project_id, 42);
        assert_eq!(loaded.project_name, "zorgmodel");
        assert_eq!(loaded.branch, "werk-branch");
    }
}
