//! Model Sync - synchronize Common Model Data with a GitLab repository
//!
//! # Usage
//! ```bash
//! model-sync retrieve                          # Pull root/model/profile from a repo
//! model-sync store -m "message"                # Push the local project back
//! model-sync create objecttype                 # New <<Objecttype>> class
//! model-sync add attribuut --class Persoon     # New <<Attribuutsoort>> attribute
//! ```

mod config;
mod error;
mod gitlab;
mod models;
mod prompt;
mod sync;
mod uml;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::Config;
use gitlab::GitLabClient;
use prompt::TermPrompt;

/// Model Sync - GitLab synchronization for shared MIM UML models
#[derive(Parser)]
#[command(name = "model-sync")]
#[command(about = "Synchronize Common Model Data with a GitLab repository", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the local project document
    #[arg(long, default_value = "common-model.mdj", global = true)]
    project: PathBuf,

    /// Path to the preferences file
    #[arg(long, default_value = "model-sync.toml", global = true)]
    config: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Retrieve root, model and profile data from a model data repository
    Retrieve,
    /// Store the local project back to its origin repository and branch
    Store {
        /// Commit message; prompted for when omitted
        #[arg(short, long)]
        message: Option<String>,
        /// Push all three files as one multi-action commit
        #[arg(long)]
        single_commit: bool,
    },
    /// Create a stereotyped UML element in the project
    Create {
        #[command(subcommand)]
        element: CreateElement,
    },
    /// Add a stereotyped UML element to an existing <<Objecttype>> class
    Add {
        #[command(subcommand)]
        element: AddElement,
    },
}

#[derive(Subcommand)]
enum CreateElement {
    /// New <<Objecttype>> class
    Objecttype,
    /// New <<Keuze>> class
    Keuze,
    /// New <<Relatiesoort>> association between two classes
    Relatiesoort {
        #[arg(long)]
        source: String,
        #[arg(long)]
        target: String,
    },
    /// New directed <<Relatiesoort>> association (navigable second end)
    DirectedRelatiesoort {
        #[arg(long)]
        source: String,
        #[arg(long)]
        target: String,
    },
    /// New <<Generalisatie>> from a subtype class to its supertype
    Generalisatie {
        #[arg(long)]
        subtype: String,
        #[arg(long)]
        supertype: String,
    },
}

#[derive(Subcommand)]
enum AddElement {
    /// New <<Attribuutsoort>> attribute on an <<Objecttype>> class
    Attribuut {
        #[arg(long)]
        class: String,
    },
    /// New <<Keuze>>-typed attribute on an <<Objecttype>> class
    Keuze {
        #[arg(long)]
        class: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;
    let mut prompt = TermPrompt;

    match cli.command {
        Commands::Retrieve => {
            let client = GitLabClient::from_config(&config)?;
            let message = sync::retrieve(&client, &mut prompt, &config, &cli.project).await?;
            println!("{message}");
        }
        Commands::Store {
            message,
            single_commit,
        } => {
            let client = GitLabClient::from_config(&config)?;
            let result = sync::store(
                &client,
                &mut prompt,
                &cli.project,
                message.as_deref(),
                single_commit,
            )
            .await?;
            println!("{result}");
        }
        Commands::Create { element } => {
            let mut root = uml::load_project(&cli.project)?;
            let id = match element {
                CreateElement::Objecttype => uml::factory::create_objecttype(&mut root)?,
                CreateElement::Keuze => uml::factory::create_keuze(&mut root)?,
                CreateElement::Relatiesoort { source, target } => {
                    uml::factory::create_relatiesoort(&mut root, &source, &target, false)?
                }
                CreateElement::DirectedRelatiesoort { source, target } => {
                    uml::factory::create_relatiesoort(&mut root, &source, &target, true)?
                }
                CreateElement::Generalisatie { subtype, supertype } => {
                    uml::factory::create_generalisatie(&mut root, &subtype, &supertype)?
                }
            };
            uml::save_project(&cli.project, &root)?;
            println!("Element aangemaakt: {id}");
        }
        Commands::Add { element } => {
            let mut root = uml::load_project(&cli.project)?;
            let created = match element {
                AddElement::Attribuut { class } => {
                    Some(uml::factory::add_attribuut(&mut root, &class)?)
                }
                AddElement::Keuze { class } => {
                    uml::factory::add_keuze(&mut root, &class, &mut prompt)?
                }
            };
            match created {
                Some(id) => {
                    uml::save_project(&cli.project, &root)?;
                    println!("Element aangemaakt: {id}");
                }
                None => println!("Geen <<Keuze>> geselecteerd!"),
            }
        }
    }

    Ok(())
}
