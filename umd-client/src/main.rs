//! umd-client - Command-line client for the UMD annotation backend
//!
//! Drives the backend's dataset/configuration/group endpoints: connection
//! check, video ingest, container refresh, filter-folder creation, TA2
//! configuration get/put, and tabular export download.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use umd_client::store::{AppStore, ANNOTATOR_ROLE, MANAGER_ROLE};
use umd_client::UmdClient;
use umd_common::api::Ta2Config;
use umd_common::ClientConfig;

#[derive(Parser)]
#[command(name = "umd-client", version, about = "UMD annotation backend client")]
struct Cli {
    /// Backend API root (overrides environment and config file)
    #[arg(long)]
    server: Option<String>,

    /// Authentication token (overrides environment and config file)
    #[arg(long)]
    token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the session user and their role-group memberships
    Whoami,
    /// List the backend's group-name to group-id mapping
    Groups,
    /// Trigger ingestion of the video items in a folder
    Ingest {
        /// Backend folder id
        folder_id: String,
    },
    /// Trigger a refresh of the backend's container folders
    UpdateContainers,
    /// Create a filter folder under the given folder
    Filter {
        /// Backend folder id
        folder_id: String,
    },
    /// Get or set the TA2 configuration
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Download the tabular annotation export of a folder
    Export {
        /// Backend folder id
        folder_id: String,
        /// Output zip path
        output: PathBuf,
    },
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print the TA2 configuration as JSON
    Get,
    /// Upload a TA2 configuration from a JSON file
    Put {
        /// Path to the configuration JSON
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting umd-client v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    if !env!("UMD_ERROR_REPORT_DSN").is_empty() {
        info!("Error reporting sink configured at build time");
    }

    let cli = Cli::parse();

    let config = ClientConfig::resolve(cli.server.as_deref(), cli.token.as_deref())?;
    info!("Backend: {}", config.server_url);

    let client = UmdClient::new(&config)?;

    match cli.command {
        Command::Whoami => whoami(&client).await?,
        Command::Groups => {
            let groups = client.get_group_ids().await?;
            let mut names: Vec<_> = groups.iter().collect();
            names.sort();
            for (name, id) in names {
                println!("{name}\t{id}");
            }
        }
        Command::Ingest { folder_id } => {
            let body = client.ingest_video(&folder_id).await?;
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        Command::UpdateContainers => {
            client.update_containers().await?;
            println!("container refresh triggered");
        }
        Command::Filter { folder_id } => match client.create_filter_folder(&folder_id).await? {
            Some(body) => println!("{}", serde_json::to_string_pretty(&body)?),
            None => println!("no result (backend did not answer 200)"),
        },
        Command::Config(ConfigCommand::Get) => {
            let config = client.get_ta2_config().await?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        Command::Config(ConfigCommand::Put { file }) => {
            let content = std::fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let parsed: Ta2Config =
                serde_json::from_str(&content).context("parsing TA2 configuration")?;
            client.put_ta2_config(&parsed).await?;
            println!("configuration updated ({} norms)", parsed.norm_map.len());
        }
        Command::Export { folder_id, output } => {
            let bytes = client.export_tabular(&folder_id).await?;
            std::fs::write(&output, &bytes)
                .with_context(|| format!("writing {}", output.display()))?;
            println!("wrote {} bytes to {}", bytes.len(), output.display());
        }
    }

    Ok(())
}

/// Show the session user together with resolved role memberships
async fn whoami(client: &UmdClient) -> Result<()> {
    let user = match client.current_user().await? {
        Some(user) => user,
        None => {
            println!("anonymous session (no token or token rejected)");
            return Ok(());
        }
    };

    let store = AppStore::new();
    store.groups.load_groups(client).await?;

    println!("login: {}", user.login);
    println!("id:    {}", user.id);
    println!("admin: {}", user.admin);
    for role in [ANNOTATOR_ROLE, MANAGER_ROLE] {
        let member = store
            .groups
            .group_id(role)
            .map(|id| user.groups.contains(&id))
            .unwrap_or(false);
        println!("{}: {}", role.to_lowercase(), member);
    }

    Ok(())
}
