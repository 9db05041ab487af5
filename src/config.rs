//! Tool preferences, loaded from a TOML file with per-field defaults.
//!
//! Mirrors the preference keys of the modeling tool this replaces: server
//! URL, auth token, model group path and the common-model-data slug. A
//! missing config file yields the defaults; a missing field falls back
//! per field.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::Result;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// GitLab repository server endpoint URL
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// GitLab private auth token, sent as PRIVATE-TOKEN header
    #[serde(default)]
    pub auth_token: String,

    /// Repository group path holding the model data
    #[serde(default = "default_model_group_path")]
    pub model_group_path: String,

    /// Slug of the common model data group, below the model group path
    #[serde(default = "default_common_model_data_slug")]
    pub common_model_data_slug: String,
}

fn default_server_url() -> String {
    "https://repository.istandaarden.nl".to_string()
}

fn default_model_group_path() -> String {
    "dgpi/modelleren/dgpi-model-data".to_string()
}

fn default_common_model_data_slug() -> String {
    "common-model-data".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            auth_token: String::new(),
            model_group_path: default_model_group_path(),
            common_model_data_slug: default_common_model_data_slug(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file. A nonexistent file is not an
    /// error: it yields the default configuration.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Full group namespace the common model data repositories live under.
    pub fn namespace(&self) -> String {
        format!("{}/{}", self.model_group_path, self.common_model_data_slug)
    }
}
