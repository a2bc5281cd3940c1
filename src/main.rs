use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use roster_console::{
    AlwaysConfirm, Console, ConsoleConfig, RosterSynchronizer, SyncOutcome, TerminalConfirm,
};

#[derive(Parser)]
#[command(name = "roster", version)]
#[command(about = "Manage the student roster through the student API", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Base URL of the student API (overrides configuration)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Store a session token
    Login {
        /// Bearer token issued by the API
        token: String,
    },

    /// Forget the stored session token
    Logout,

    /// Show whether a session is stored
    Status,

    /// List all students
    List,

    /// Add a student
    Add {
        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Edit a student
    Edit {
        /// ID of the student to edit
        id: i64,

        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Delete a student
    Delete {
        /// ID of the student to delete
        id: i64,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Args)]
struct FieldArgs {
    /// Display name
    #[arg(long)]
    name: Option<String>,

    /// Gender (M, F, or any value the API accepts)
    #[arg(long)]
    gender: Option<String>,

    /// Age in years
    #[arg(long)]
    age: Option<String>,

    /// Education
    #[arg(long)]
    education: Option<String>,

    /// Academic year
    #[arg(long)]
    academic_year: Option<String>,
}

impl FieldArgs {
    fn pairs(&self) -> Vec<(&'static str, &str)> {
        [
            ("name", &self.name),
            ("gender", &self.gender),
            ("age", &self.age),
            ("education", &self.education),
            ("academicYear", &self.academic_year),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.as_deref().map(|v| (field, v)))
        .collect()
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive("info".parse().expect("valid log directive"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn build_console(config: ConsoleConfig, confirm_all: bool) -> Result<Console> {
    let builder = Console::builder().config(config);
    let builder = if confirm_all {
        builder.confirm(AlwaysConfirm)
    } else {
        builder.confirm(TerminalConfirm)
    };

    builder.build().await.context("failed to start console")
}

/// Fail with the roster's error message if it has one
fn ensure_no_error(roster: &RosterSynchronizer) -> Result<()> {
    match roster.error() {
        Some(error) => anyhow::bail!("{}", error),
        None => Ok(()),
    }
}

fn apply_fields(roster: &RosterSynchronizer, fields: &FieldArgs) -> Result<()> {
    for (field, value) in fields.pairs() {
        roster
            .set_field(field, value)
            .with_context(|| format!("failed to set {}", field))?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Precedence: CLI > env > project > global > defaults
    let mut config = ConsoleConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "failed to load config, using defaults");
        ConsoleConfig::default()
    });
    if let Some(url) = cli.api_url {
        config.api_url = url;
    }
    debug!(api_url = %config.api_url, "resolved configuration");

    let confirm_all = matches!(cli.command, Commands::Delete { yes: true, .. });
    let console = build_console(config, confirm_all).await?;
    let session = console.session();
    let roster = console.roster();

    match cli.command {
        Commands::Login { token } => {
            if let Err(e) = session.update(Some(token)).await {
                warn!(error = %e, "session token not persisted");
            }
            if session.has_session() {
                println!("Logged in.");
            } else {
                anyhow::bail!("token must not be empty");
            }
        }

        Commands::Logout => {
            if let Err(e) = session.clear().await {
                warn!(error = %e, "stored session token not removed");
            }
            println!("Logged out.");
        }

        Commands::Status => {
            if session.has_session() {
                println!("Session active.");
            } else {
                println!("No session.");
            }
        }

        Commands::List => {
            roster.mount().await;
            ensure_no_error(roster)?;
            println!("{}", roster.snapshot().view());
        }

        Commands::Add { fields } => {
            roster.mount().await;
            ensure_no_error(roster)?;

            roster.begin_add();
            apply_fields(roster, &fields)?;
            roster.submit().await?;
            ensure_no_error(roster)?;

            info!("student added");
            println!("{}", roster.snapshot().view());
        }

        Commands::Edit { id, fields } => {
            roster.mount().await;
            ensure_no_error(roster)?;

            roster.begin_edit(id)?;
            apply_fields(roster, &fields)?;
            roster.submit().await?;
            ensure_no_error(roster)?;

            println!("{}", roster.snapshot().view());
        }

        Commands::Delete { id, .. } => {
            roster.mount().await;
            ensure_no_error(roster)?;

            match roster.delete(id).await {
                SyncOutcome::Applied => println!("Deleted student {}.", id),
                SyncOutcome::Declined => println!("Delete cancelled."),
                SyncOutcome::Skipped | SyncOutcome::Failed => ensure_no_error(roster)?,
            }
        }
    }

    Ok(())
}
