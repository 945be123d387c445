//! clubhouse - command-line access to the Clubhouse API.
//!
//! Every command prints its result as JSON on stdout.

use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::json;

use clubhouse::api::{auth, ClubhouseClient, HttpTransport, StoryParam};
use clubhouse::config::{Config, Settings};
use clubhouse::tasks::{create_task_channel, ApiMessage};

/// Command-line client for the Clubhouse API.
#[derive(Parser)]
#[command(name = "clubhouse")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// API token (defaults to CLUBHOUSE_API_TOKEN, then the OS keyring)
    #[arg(long, global = true)]
    token: Option<String>,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the stored API token
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },

    /// List all epics
    Epics,

    /// Show one epic
    Epic { id: i64 },

    /// List all projects
    Projects,

    /// List the stories in a project
    Stories {
        #[arg(short, long)]
        project: i64,
    },

    /// Show one story with its tasks and comments
    Story { id: i64 },

    /// Search stories
    Search {
        #[arg(short, long)]
        project: Option<i64>,

        #[arg(short, long)]
        epic: Option<i64>,

        /// Story type (feature, bug, chore)
        #[arg(short = 't', long = "type")]
        story_type: Option<String>,

        /// Label name; repeat for several
        #[arg(short, long)]
        label: Vec<String>,

        #[arg(long)]
        archived: Option<bool>,
    },

    /// List workflows and their states
    Workflows,

    /// List users
    Users,

    /// List labels
    Labels,

    /// List uploaded files
    Files,

    /// Fetch epics, projects and workflows concurrently and summarize them
    Overview,
}

#[derive(Subcommand)]
enum AuthAction {
    /// Store an API token in the OS keyring
    Login {
        /// Token to store; read from stdin when omitted
        token: Option<String>,
    },

    /// Remove the stored API token
    Logout,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = clubhouse::logging::init(cli.verbose) {
        eprintln!("Warning: failed to initialize logging: {}", e);
    }

    let result = match cli.command {
        Commands::Auth { action } => run_auth(action),
        command => match build_client(cli.token) {
            Ok(client) => run(&client, command).await,
            Err(e) => Err(e),
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report(e);
            ExitCode::FAILURE
        }
    }
}

/// Print a failure for the user; the full chain goes to the log file.
fn report(err: anyhow::Error) {
    tracing::error!("Command failed: {:#}", err);
    match clubhouse::Error::from_anyhow(err) {
        Ok(err) => {
            eprintln!("Error: {}", err.user_message());
            if let Some(action) = err.suggested_action() {
                eprintln!("{}", action);
            }
        }
        Err(err) => eprintln!("Error: {:#}", err),
    }
    if let Some(dir) = clubhouse::logging::log_directory() {
        eprintln!("Details are logged under {}", dir.display());
    }
}

fn run_auth(action: AuthAction) -> Result<()> {
    match action {
        AuthAction::Login { token } => {
            let token = match token {
                Some(token) => token,
                None => prompt_token()?,
            };
            let token = token.trim();
            if token.is_empty() {
                anyhow::bail!("No token given");
            }
            auth::store_token(token)?;
            println!("Stored token {}", auth::mask_token(token));
        }
        AuthAction::Logout => {
            auth::delete_token()?;
            println!("Removed stored token");
        }
    }
    Ok(())
}

fn prompt_token() -> Result<String> {
    print!("Clubhouse API token: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read token from stdin")?;
    Ok(line)
}

fn build_client(token: Option<String>) -> Result<ClubhouseClient> {
    let token = token
        .or_else(auth::resolve_token)
        .context("No API token found; run 'clubhouse auth login' or set CLUBHOUSE_API_TOKEN")?;
    let settings = Settings::load().unwrap_or_else(|e| {
        tracing::warn!("Ignoring unreadable settings: {}", e);
        Settings::default()
    });

    let config = Config::from_settings(token, &settings)?;
    let transport = match settings.timeout_secs {
        Some(secs) => HttpTransport::with_timeout(Duration::from_secs(secs))?,
        None => HttpTransport::new()?,
    };
    Ok(ClubhouseClient::with_transport(config, transport))
}

async fn run(client: &ClubhouseClient, command: Commands) -> Result<()> {
    match command {
        Commands::Auth { action } => run_auth(action),
        Commands::Epics => print_json(&client.list_epics().await?),
        Commands::Epic { id } => print_json(&client.get_epic(id).await?),
        Commands::Projects => print_json(&client.list_projects().await?),
        Commands::Stories { project } => print_json(&client.list_stories(project).await?),
        Commands::Story { id } => print_json(&client.get_story(id).await?),
        Commands::Search {
            project,
            epic,
            story_type,
            label,
            archived,
        } => {
            let mut params = Vec::new();
            if let Some(id) = project {
                params.push(StoryParam::ProjectId(id));
            }
            if let Some(id) = epic {
                params.push(StoryParam::EpicId(id));
            }
            if let Some(kind) = story_type {
                params.push(StoryParam::StoryType(kind));
            }
            if !label.is_empty() {
                params.push(StoryParam::Labels(label));
            }
            if let Some(archived) = archived {
                params.push(StoryParam::Archived(archived));
            }
            print_json(&client.search_stories(&params).await?)
        }
        Commands::Workflows => print_json(&client.list_workflows().await?),
        Commands::Users => print_json(&client.list_users().await?),
        Commands::Labels => print_json(&client.list_labels().await?),
        Commands::Files => print_json(&client.list_files().await?),
        Commands::Overview => overview(client).await,
    }
}

async fn overview(client: &ClubhouseClient<HttpTransport>) -> Result<()> {
    let (mut rx, spawner) = create_task_channel(client.clone());
    spawner.spawn_fetch_epics();
    spawner.spawn_fetch_projects();
    spawner.spawn_fetch_workflows();
    drop(spawner);

    let mut summary = serde_json::Map::new();
    while let Some(message) = rx.recv().await {
        match message {
            ApiMessage::EpicsFetched(result) => {
                let epics = result.context("Failed to fetch epics")?;
                let done = epics
                    .iter()
                    .filter(|e| e.epic_state() == Some(clubhouse::api::EpicState::Done))
                    .count();
                summary.insert("epics".into(), json!({ "total": epics.len(), "done": done }));
            }
            ApiMessage::ProjectsFetched(result) => {
                let projects = result.context("Failed to fetch projects")?;
                let names: Vec<&str> = projects.iter().map(|p| p.name.as_str()).collect();
                summary.insert("projects".into(), json!(names));
            }
            ApiMessage::WorkflowsFetched(result) => {
                let workflows = result.context("Failed to fetch workflows")?;
                let states: usize = workflows
                    .iter()
                    .map(|w| w.states.as_ref().map_or(0, Vec::len))
                    .sum();
                summary.insert(
                    "workflows".into(),
                    json!({ "total": workflows.len(), "states": states }),
                );
            }
            other => tracing::debug!("Unexpected message: {:?}", other),
        }
    }

    print_json(&summary)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
