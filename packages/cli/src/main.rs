// ABOUTME: Entry point for the plank binary
// ABOUTME: `plank server` boots the HTTP API, `plank seed` loads demo data

use std::net::SocketAddr;
use std::path::PathBuf;
use std::process;

use axum::http::{HeaderValue, Method};
use clap::{Parser, Subcommand};
use colored::*;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing_subscriber::EnvFilter;

use plank_tracker::storage::upload_dir;
use plank_tracker::DbState;

mod config;
mod seed;

use config::Config;

#[derive(Parser)]
#[command(name = "plank")]
#[command(about = "Plank - issue tracking and project management backend")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Server {
        /// Port to listen on (overrides PORT)
        #[arg(long)]
        port: Option<u16>,
        /// Database file path (overrides PLANK_DB_PATH)
        #[arg(long)]
        db_path: Option<PathBuf>,
    },
    /// Load demo data into the database
    Seed {
        /// Database file path (overrides PLANK_DB_PATH)
        #[arg(long)]
        db_path: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    match handle_command(cli.command).await {
        Ok(_) => {}
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            process::exit(1);
        }
    }
}

async fn handle_command(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Server { port, db_path } => start_server(port, db_path).await,
        Commands::Seed { db_path } => seed::run(db_path).await,
    }
}

async fn start_server(
    port_override: Option<u16>,
    db_path: Option<PathBuf>,
) -> anyhow::Result<()> {
    let config = Config::from_env()?;
    let port = port_override.unwrap_or(config.port);
    let db_path = db_path.or_else(|| config.db_path.clone());

    println!("{}", "🚀 Starting Plank server...".green().bold());

    let db = DbState::init_with_path(db_path).await?;

    let uploads = upload_dir();
    std::fs::create_dir_all(&uploads)?;

    let cors = CorsLayer::new()
        .allow_origin(config.cors_origin.parse::<HeaderValue>()?)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers(Any);

    let app = plank_api::create_app(db)
        .nest_service("/uploads", ServeDir::new(uploads))
        .layer(cors);

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    println!("📡 API listening on http://{}", addr);
    println!("🔗 CORS origin: {}", config.cors_origin);

    axum::serve(listener, app).await?;

    Ok(())
}
