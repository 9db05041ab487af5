//! Store pipeline: split the local project document and push the bundle.
//!
//! Pushes go sequentially root, model, profile; each push is a full-file
//! overwrite with its create/update action decided by an existence probe.
//! The first non-2xx write aborts the remaining stages and reports the
//! failing stage with the HTTP status and text. There is no rollback: a
//! failure after the root push leaves the remote bundle inconsistent, which
//! is accepted. With `single_commit` the three files go out as one
//! multi-action commit instead.

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::error::{AppError, Result};
use crate::gitlab::ModelDataApi;
use crate::prompt::Prompt;
use crate::sync::sidecar::Sidecar;
use crate::sync::source_data::{self, Payload, SourceDataBundle};

const EMPTY_MESSAGE: &str = "De commit message mag niet leeg zijn!";

pub async fn store(
    api: &dyn ModelDataApi,
    prompt: &mut dyn Prompt,
    project_file: &Path,
    message: Option<&str>,
    single_commit: bool,
) -> Result<String> {
    // commit message first; nothing touches the network before it is known
    let entered = match message {
        Some(given) => Some(given.to_string()),
        None => prompt.input("Geef commit message op:", "Updating Common Data Project")?,
    };
    let Some(entered) = entered else {
        return Ok(EMPTY_MESSAGE.to_string());
    };
    let commit_message = entered.trim().to_string();
    if commit_message.is_empty() {
        return Ok(EMPTY_MESSAGE.to_string());
    }

    let mut sidecar = Sidecar::load(project_file)?.ok_or(AppError::NoBoundRepository)?;

    let document: Value = serde_json::from_str(&fs::read_to_string(project_file)?)?;
    let bundle = SourceDataBundle::split(&document)?;

    tracing::info!(
        project = %sidecar.project_name,
        branch = %sidecar.branch,
        single_commit,
        "storing source data bundle"
    );

    if single_commit {
        api.commit_to_repo(
            sidecar.project_id,
            &sidecar.branch,
            &commit_message,
            bundle.commit_actions()?,
        )
        .await?;
    } else {
        for payload in bundle.payloads() {
            if let Err(err) = push_payload(api, &sidecar, &payload, &commit_message).await {
                return match err {
                    AppError::Api { status, text } => Ok(format!(
                        "Bewaren {} in Repository gefaald! Foutmelding: {}-{}",
                        payload.stage, status, text
                    )),
                    other => Err(other),
                };
            }
        }
    }

    sidecar.touch();
    sidecar.save(project_file)?;

    Ok(format!(
        "Laatste wijzigingen van Project met Model and Profile bewaard in repository {} / branch {}",
        sidecar.project_name, sidecar.branch
    ))
}

/// Overwrite one payload file on the work branch. A 404 existence probe
/// means the file is new (create); any other probe failure propagates.
async fn push_payload(
    api: &dyn ModelDataApi,
    sidecar: &Sidecar,
    payload: &Payload<'_>,
    commit_message: &str,
) -> Result<()> {
    let content = source_data::to_tabbed_json(payload.content)?;
    let probe = api
        .get_file_from_repo(sidecar.project_id, &payload.file_path, &sidecar.branch)
        .await;
    match probe {
        Ok(_) => {
            api.update_existing_file_in_repo(
                sidecar.project_id,
                &sidecar.branch,
                &payload.file_path,
                &content,
                commit_message,
            )
            .await
        }
        Err(err) if err.api_status() == Some(404) => {
            api.create_new_file_in_repo(
                sidecar.project_id,
                &sidecar.branch,
                &payload.file_path,
                &content,
                commit_message,
            )
            .await
        }
        Err(err) => Err(err),
    }
}
