//! Retrieve pipeline: repository discovery, branch selection, bundle import.
//!
//! Sequential steps, each able to short-circuit with a literal user-facing
//! message. The assembled project document lands in the local project file
//! as tab-indented JSON and the origin repository/branch is recorded in the
//! sidecar for later stores.

use std::fs;
use std::path::Path;

use crate::config::Config;
use crate::error::Result;
use crate::gitlab::ModelDataApi;
use crate::models::Branch;
use crate::prompt::Prompt;
use crate::sync::sidecar::Sidecar;
use crate::sync::source_data;

pub async fn retrieve(
    api: &dyn ModelDataApi,
    prompt: &mut dyn Prompt,
    config: &Config,
    project_file: &Path,
) -> Result<String> {
    // (0) available model data repositories
    let repos = api.list_projects_for_group(&config.namespace()).await?;
    if repos.is_empty() {
        return Ok("Geen Model Data repository gevonden!!".to_string());
    }

    // (1.a) pick a repository
    let repo_names: Vec<String> = repos.iter().map(|repo| repo.name.clone()).collect();
    let Some(index) = prompt.select("Selecteer een Model Data repository.", &repo_names)? else {
        return Ok("Geen Model Data repository geselecteerd!!".to_string());
    };
    let project = &repos[index];

    // (1.b) pick a work branch; protected branches are never offered
    let branches = api.list_repo_branches(project.id).await?;
    let work_branches: Vec<Branch> = branches.into_iter().filter(|b| !b.protected).collect();
    if work_branches.is_empty() {
        return Ok("Geen (non-protected) werk-branches beschikbaar!".to_string());
    }

    let branch_names: Vec<String> = work_branches.iter().map(|b| b.name.clone()).collect();
    let title = format!("Selecteer \"werk-branche\" in repo \"{}\"", project.name);
    let Some(index) = prompt.select(&title, &branch_names)? else {
        return Ok("Geen werk-branche geselecteerd!".to_string());
    };
    let branch = &work_branches[index].name;

    tracing::info!(project = %project.name, %branch, "retrieving source data bundle");

    // (2) fetch and decode the bundle, model and profile under the root
    let root_file = api
        .get_file_from_repo(project.id, &source_data::root_file_path(), branch)
        .await?;
    let mut root = source_data::decode_jb64(&root_file.content)?;

    let model_file = api
        .get_file_from_repo(project.id, &source_data::model_file_path(), branch)
        .await?;
    source_data::attach_owned_element(&mut root, source_data::decode_jb64(&model_file.content)?)?;

    let profile_file = api
        .get_file_from_repo(project.id, &source_data::profile_file_path(), branch)
        .await?;
    source_data::attach_owned_element(&mut root, source_data::decode_jb64(&profile_file.content)?)?;

    fs::write(project_file, source_data::to_tabbed_json(&root)?)?;
    Sidecar::new(project.id, &project.name, branch).save(project_file)?;

    Ok(format!(
        "Project met Model and Profile opgehaald van repository {} / branch {}",
        project.name, branch
    ))
}
