mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{config::ConfigSubcommand, project::ProjectSubcommand, task::TaskSubcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "zoom",
    about = "Plan across zoom levels: markdown project files from the next 15 minutes to life goals",
    version,
    propagate_version = true
)]
struct Cli {
    /// Root directory (default: auto-detect from .zoom/)
    #[arg(long, global = true, env = "ZOOM_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize zoom in the current directory
    Init,

    /// Create and list project files
    Project {
        #[command(subcommand)]
        subcommand: ProjectSubcommand,
    },

    /// Completion per project
    Status,

    /// Every project's tasks grouped by level
    Plan {
        /// Show one project only
        project: Option<String>,
    },

    /// One zoom level across all projects
    Level {
        /// 0-4, or a name: actions, today, week, quarter, life
        level: String,
        /// Hide completed tasks
        #[arg(long)]
        open: bool,
    },

    /// Complete, reopen, and add tasks
    Task {
        #[command(subcommand)]
        subcommand: TaskSubcommand,
    },

    /// Ask the configured LLM about your tasks
    Analyze {
        #[arg(required = true)]
        prompt: Vec<String>,
        /// Focus on one project and let the model see its files
        #[arg(long)]
        project: Option<String>,
        /// Apply the proposed file changes (snapshots go to .zoom/backups/)
        #[arg(long)]
        apply: bool,
    },

    /// Show or validate .zoom/config.yaml
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },

    /// Launch the dashboard API server
    Ui {
        /// Port to listen on (default: server.port from config; 0 = OS-assigned)
        #[arg(long)]
        port: Option<u16>,

        /// Don't open browser automatically
        #[arg(long)]
        no_open: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Ui { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Init => cmd::init::run(&root),
        Commands::Project { subcommand } => cmd::project::run(&root, subcommand, cli.json),
        Commands::Status => cmd::view::status(&root, cli.json),
        Commands::Plan { project } => cmd::view::plan(&root, project.as_deref(), cli.json),
        Commands::Level { level, open } => cmd::view::level(&root, &level, open, cli.json),
        Commands::Task { subcommand } => cmd::task::run(&root, subcommand, cli.json),
        Commands::Analyze {
            prompt,
            project,
            apply,
        } => cmd::analyze::run(&root, &prompt.join(" "), project.as_deref(), apply, cli.json),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
        Commands::Ui { port, no_open } => cmd::ui::run(&root, port, no_open),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
