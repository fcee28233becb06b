//! CLI command definitions and handlers.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use tasksync_client::ClientConfig;
use tasksync_core::session::model::Session;
use tasksync_core::session::{SessionStore, NAMESPACE};

pub mod auth;
pub mod task;
pub mod watch;

/// TaskSync - Collaborative Task Management
#[derive(Parser)]
#[command(name = "tasksync")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory for session state (defaults to the user config dir)
    #[arg(long, global = true, env = "TASKSYNC_HOME")]
    pub home: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and persist the session
    Login(auth::LoginArgs),

    /// Create a new account
    Register(auth::RegisterArgs),

    /// Sign out and clear the persisted session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Task management
    #[command(subcommand)]
    Task(task::TaskCommands),

    /// List employees available for assignment
    Employees,

    /// Show task statistics
    Stats,

    /// Stream live notifications
    Watch(watch::WatchArgs),
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        let home = self.home.unwrap_or_else(default_home);
        let mut store = SessionStore::open(&home)?;
        let config = ClientConfig::from_env();

        match self.command {
            Commands::Login(args) => auth::login(args, &config, &mut store).await,
            Commands::Register(args) => auth::register(args, &config, &mut store).await,
            Commands::Logout => auth::logout(&mut store),
            Commands::Whoami => auth::whoami(&store),
            Commands::Task(cmd) => task::execute(cmd, &config, &store).await,
            Commands::Employees => task::employees(&config, &store).await,
            Commands::Stats => task::stats(&config, &store).await,
            Commands::Watch(args) => watch::execute(args, &config, &store).await,
        }
    }
}

/// Default state directory: `<user config dir>/tasksync`.
fn default_home() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(NAMESPACE)
}

/// The active session, or a hint to sign in first.
pub(crate) fn signed_in(store: &SessionStore) -> Result<&Session> {
    store
        .require()
        .map_err(|_| anyhow::anyhow!("Not signed in. Run 'tasksync login' first."))
}
