use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::*;
use tracing::info;

use larder_cli::{init_tracing, run_server, Config};
use larder_config::{LARDER_API_HOST, LARDER_API_PORT, LARDER_DATABASE_PATH};
use larder_security::{TokenStorage, UserCreateInput, UserStorage};

#[derive(Parser)]
#[command(name = "larder")]
#[command(about = "Larder - recipe management API server")]
#[command(version)]
struct Cli {
    /// SQLite database file (defaults to ~/.larder/larder.db)
    #[arg(long, global = true, env = LARDER_DATABASE_PATH)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve {
        #[arg(long, env = LARDER_API_HOST, help = "Address to bind")]
        host: Option<String>,
        #[arg(long, env = LARDER_API_PORT, help = "Port to listen on")]
        port: Option<String>,
    },
    /// Create the database and apply pending migrations
    Migrate,
    /// Register a user account
    CreateUser {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long, default_value = "")]
        name: String,
    },
    /// Issue an API token for an existing user
    CreateToken {
        #[arg(long)]
        email: String,
        #[arg(long, default_value = "cli")]
        name: String,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    if let Err(e) = handle_command(cli).await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

async fn handle_command(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::from_env()?;
    if let Some(database) = cli.database {
        config.database_path = database;
    }

    match cli.command {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.host = larder_cli::config::parse_host(&host)?;
            }
            if let Some(port) = port {
                config.port = larder_cli::config::parse_port(&port)?;
            }

            println!("{}", "Starting Larder API server...".green().bold());
            run_server(config).await
        }
        Commands::Migrate => {
            larder_storage::connect(&config.database_path)
                .await
                .context("Failed to migrate database")?;
            println!(
                "{} Database ready at {}",
                "✓".green(),
                config.database_path.display()
            );
            Ok(())
        }
        Commands::CreateUser {
            email,
            password,
            name,
        } => {
            let pool = larder_storage::connect(&config.database_path).await?;
            let user = UserStorage::new(pool)
                .create_user(UserCreateInput {
                    email,
                    password,
                    name,
                })
                .await
                .context("Failed to create user")?;

            info!("Created user {}", user.id);
            println!("{} Created user {}", "✓".green(), user.email.bold());
            Ok(())
        }
        Commands::CreateToken { email, name } => {
            let pool = larder_storage::connect(&config.database_path).await?;
            let user = UserStorage::new(pool.clone())
                .get_user_by_email(&email)
                .await?
                .with_context(|| format!("No user with email '{}'", email))?;

            let generated = TokenStorage::new(pool).create_token(user.id, &name).await?;

            println!("{} Token for {}:", "✓".green(), user.email.bold());
            println!("{}", generated.token);
            println!(
                "{}",
                "Store it now; it cannot be shown again.".yellow()
            );
            Ok(())
        }
    }
}
