//! mfg-quality - Quality service
//!
//! Issues, quality documents and gauges over the shared database.
//! Default port 5742.

use anyhow::Result;
use clap::Parser;
use mfg_common::config::{self, RootFolderResolver, Service, TomlConfig};
use mfg_common::storage::DocumentStore;
use mfg_quality::{build_router, AppState};
use std::path::PathBuf;
use tracing::{error, info};

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "mfg-quality")]
#[command(about = "MFG Quality service")]
#[command(version)]
struct Args {
    /// Root folder holding the database and attachments
    #[arg(short, long, env = "MFG_ROOT_FOLDER")]
    root_folder: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long, env = "MFG_QUALITY_PORT")]
    port: Option<u16>,

    /// Host to bind
    #[arg(long, env = "MFG_QUALITY_HOST")]
    host: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!(
        "Starting MFG Quality (mfg-quality) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();
    let toml_config = TomlConfig::load();
    let listen = toml_config
        .clone()
        .unwrap_or_default()
        .service(Service::Quality);

    let root_folder = RootFolderResolver::new()
        .with_cli_arg(args.root_folder)
        .with_config(toml_config)
        .resolve();
    config::ensure_root_folder(&root_folder)?;

    let db_path = config::database_path(&root_folder);
    info!("Database path: {}", db_path.display());

    let pool = match mfg_common::db::init_database(&db_path).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("Failed to open database: {}", e);
            return Err(e.into());
        }
    };

    let state = AppState::new(pool, DocumentStore::new(root_folder.clone()));
    let app = build_router(state);

    let host = args.host.unwrap_or(listen.host);
    let port = args.port.unwrap_or(listen.port);
    let addr = format!("{}:{}", host, port);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("mfg-quality listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
