//! Campus Lost & Found CLI - Database migrations and account management.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! lf-cli migrate
//!
//! # Create the default accounts if they are missing
//! lf-cli seed
//!
//! # Replace a seeded account's password
//! lf-cli user set-password -u admin -p 'a-much-better-password'
//! ```
//!
//! # Environment Variables
//!
//! - `LOSTFOUND_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL` connection string

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "lf-cli")]
#[command(author, version, about = "Campus Lost & Found CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Create the default admin and student accounts if missing
    Seed,
    /// Manage user accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Set a new password for an existing user
    SetPassword {
        /// Username of the account
        #[arg(short, long)]
        username: String,

        /// New password (at least 8 characters)
        #[arg(short, long)]
        password: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed => commands::seed::run().await?,
        Commands::User { action } => match action {
            UserAction::SetPassword { username, password } => {
                commands::user::set_password(&username, &password).await?;
            }
        },
    }
    Ok(())
}
