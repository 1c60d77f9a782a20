// crates/server/src/main.rs
//! `taskmgr`: file-based task management.
//!
//! Tasks are markdown files named `<id>_<name>_<status>.md` under
//! `docs/logs/tasks`. The CLI creates and moves them, regenerates the derived
//! artifacts and serves the board viewer.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use taskmgr_core::setup::{setup_project, SetupOptions, SetupOutcome};
use taskmgr_core::tasks::{change_status, create_task, list_tasks};
use taskmgr_core::{load_project_config, ProjectLayout};
use taskmgr_index::{generate_overview, refresh_all};
use taskmgr_server::{serve, start_viewer};
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "warn,taskmgr=info";
const VERBOSE_FILTER: &str = "warn,taskmgr=debug,tower_http=debug";

#[derive(Debug, Parser)]
#[command(name = "taskmgr", version, about = "File-based task management")]
struct Cli {
    /// Project root (defaults to the current directory)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create a task from the project template
    New {
        id: String,
        name: String,
        #[arg(short, long, default_value = "todo")]
        status: String,
    },
    /// Move a task to another status
    Status { id: String, new_status: String },
    /// List tasks grouped by status
    List {
        #[arg(short, long)]
        status: Option<String>,
    },
    /// Regenerate INDEX.md, TASK_SUMMARY.md, tasks.json and tasks_search.json
    Refresh,
    /// Serve the task board on 127.0.0.1
    Viewer {
        /// Port (defaults to the configured port)
        #[arg(short, long)]
        port: Option<u16>,
        /// Do not open a browser
        #[arg(long)]
        no_open: bool,
    },
    /// Initialize the task layout in the project
    Setup {
        /// Comma-separated custom statuses
        #[arg(long)]
        statuses: Option<String>,
        /// Re-initialize an existing project
        #[arg(long)]
        force: bool,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn resolve_root(root: Option<PathBuf>) -> Result<PathBuf> {
    match root {
        Some(root) => Ok(root),
        None => std::env::current_dir().context("Could not determine the current directory"),
    }
}

async fn run(cli: Cli) -> Result<()> {
    let layout = ProjectLayout::new(resolve_root(cli.root)?);

    match cli.command {
        Command::New { id, name, status } => {
            let config = load_project_config(layout.root());
            let created = create_task(&layout, &config, &id, &name, &status).await?;
            if !created.status_configured {
                eprintln!(
                    "⚠️  Status '{}' is not configured (configured: {})",
                    status,
                    config.status_keys().join(", ")
                );
            }
            println!("✅ Created: {}", created.path.display());
        }
        Command::Status { id, new_status } => {
            let change = change_status(&layout, &id, &new_status).await?;
            if change.from == change.to {
                println!("Task {} is already {}", id, new_status);
            } else {
                println!("✅ Status changed: {} → {}", change.from, change.to);
            }
        }
        Command::List { status } => {
            let groups = list_tasks(&layout, status.as_deref()).await?;
            if groups.is_empty() {
                println!("No tasks");
            }
            for group in groups {
                println!("\n[{}] ({})", group.status.to_uppercase(), group.tasks.len());
                for task in group.tasks {
                    match task.id {
                        Some(id) => println!("  #{} {}", id, task.name),
                        None => println!("  {}", task.name),
                    }
                }
            }
        }
        Command::Refresh => {
            let config = load_project_config(layout.root());
            for report in refresh_all(&layout, &config).await? {
                println!(
                    "✅ {} ({} tasks) → {}",
                    report.artifact,
                    report.tasks,
                    report.path.display()
                );
            }
        }
        Command::Viewer { port, no_open } => {
            let config = load_project_config(layout.root());
            let port = port.unwrap_or(config.port);
            let state = start_viewer(&layout);
            serve(state, port, |url| {
                eprintln!("\n📋 Task viewer: {url}\n   Press Ctrl+C to stop\n");
                if !no_open {
                    if let Err(e) = open::that(url) {
                        tracing::warn!(error = %e, url, "Could not open browser");
                    }
                }
            })
            .await
            .with_context(|| format!("Viewer failed on port {port}"))?;
        }
        Command::Setup { statuses, force } => {
            let options = SetupOptions { statuses, force };
            match setup_project(&layout, &options)? {
                SetupOutcome::AlreadyInitialized => {
                    println!(
                        "Already initialized: {} exists (use --force to re-run)",
                        layout.task_dir().display()
                    );
                }
                SetupOutcome::Initialized { config, written } => {
                    let index = generate_overview(&layout, &config).await?;
                    for path in written.iter().chain(std::iter::once(&index.path)) {
                        println!("  created {}", path.display());
                    }
                    println!(
                        "✅ Task management initialized with statuses: {}",
                        config.status_keys().join(", ")
                    );
                }
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("❌ {e:#}");
            ExitCode::FAILURE
        }
    }
}
