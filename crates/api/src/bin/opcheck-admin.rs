//! Account bootstrap CLI.
//!
//! Talks to the database directly (`DATABASE_URL`), so it works before any
//! admin account exists to sign in with.

use anyhow::Context;
use clap::{Parser, Subcommand};
use opcheck_api::handlers::users::{register_user, CreateUserRequest};
use opcheck_db::repositories::UserRepo;

#[derive(Parser)]
#[command(name = "opcheck-admin")]
#[command(about = "Manage checklist service accounts")]
#[command(version)]
struct Cli {
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Create an account (username >= 3, password >= 5 characters)")]
    CreateUser {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
        #[arg(long, help = "Display name, defaults to the username")]
        name: Option<String>,
    },

    #[command(about = "List accounts ordered by username")]
    ListUsers,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let pool = opcheck_db::create_pool(&cli.database_url)
        .await
        .context("connecting to the database")?;
    opcheck_db::run_migrations(&pool)
        .await
        .context("applying migrations")?;

    match cli.command {
        Commands::CreateUser {
            username,
            password,
            name,
        } => {
            let input = CreateUserRequest {
                username,
                password,
                name,
            };
            let created = register_user(&pool, &input)
                .await
                .context("creating user")?;
            println!("Created user {} (id {})", created.username, created.id);
        }
        Commands::ListUsers => {
            let users = UserRepo::list(&pool).await.context("listing users")?;
            for user in users {
                println!("{}\t{}\t{}", user.id, user.username, user.name);
            }
        }
    }

    Ok(())
}
