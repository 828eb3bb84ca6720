// Operator tooling for inspecting authorization state

use clap::{Parser, Subcommand};
use depot_core::Permission;
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "depot")]
#[command(about = "Depot - inspect directory authorization against a state snapshot", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file; defaults apply when absent
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// JSON state snapshot with users, directories, files and grants
    #[arg(short, long, global = true, default_value = "state.json")]
    state: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Decide one action for one user on one directory
    Check {
        /// User id
        #[arg(short, long)]
        user: String,

        /// Directory id
        #[arg(short, long)]
        directory: String,

        /// read, write or delete
        #[arg(short, long)]
        action: Permission,
    },

    /// Show the capability set a user holds on a directory
    Permissions {
        /// User id
        #[arg(short, long)]
        user: String,

        /// Directory id
        #[arg(short, long)]
        directory: String,
    },

    /// Print the directory forest visible to a user
    Tree {
        /// User id
        #[arg(short, long)]
        user: String,
    },

    /// List what a cascade delete of a directory would remove
    PlanCascade {
        /// Directory id
        #[arg(short, long)]
        directory: String,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let session = commands::Session::open(cli.config.as_deref(), &cli.state).await?;

    let output = match cli.command {
        Commands::Check {
            user,
            directory,
            action,
        } => commands::check::decide(&session, &user, &directory, action).await?,
        Commands::Permissions { user, directory } => {
            commands::check::effective(&session, &user, &directory).await?
        }
        Commands::Tree { user } => commands::tree::show(&session, &user).await?,
        Commands::PlanCascade { directory } => {
            commands::cascade::plan(&session, &directory).await?
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
