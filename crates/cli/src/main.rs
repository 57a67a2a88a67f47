use anyhow::Result;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use herbarium_core::{Config, MemoryCache, SortOrder};
use herbarium_http::{create_router, AppState};
use herbarium_service::{HttpTranslateBackend, PlantService, Translator};
use herbarium_storage::{ImageStore, Storage};

#[derive(Parser)]
#[command(name = "herbarium")]
#[command(about = "Bilingual plant inventory service", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API server.
    Serve {
        #[arg(short, long)]
        port: Option<u16>,
        #[arg(short = 'H', long)]
        host: Option<String>,
    },
    /// Print all plants as JSON.
    List {
        #[arg(short, long, default_value = "insertion")]
        sort: SortOrder,
    },
    /// Print a single plant as JSON.
    Get { id: i64 },
    /// Delete a plant row (dimension rows and artifacts stay).
    Delete { id: i64 },
    /// Print row counts for the plant and dimension tables.
    Stats,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();

    if let Some(parent) = config.db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let storage = Arc::new(Storage::new(&config.db_path)?);
    let images = Arc::new(ImageStore::new(&config.upload_dir)?);
    let service = Arc::new(PlantService::new(Arc::clone(&storage), images));

    match cli.command {
        Commands::Serve { port, host } => {
            let translator = Translator::new(
                Box::new(MemoryCache::new()),
                Box::new(HttpTranslateBackend::new(config.translate_url.clone())),
            );
            let state = Arc::new(AppState {
                service,
                translator: Arc::new(translator),
                api_key: config.api_key.clone(),
            });
            if state.api_key.is_none() {
                tracing::warn!("HERBARIUM_API_KEY is not set; mutating routes will be refused");
            }
            let router = create_router(state);
            let addr = format!(
                "{}:{}",
                host.unwrap_or(config.host),
                port.unwrap_or(config.port)
            );
            tracing::info!("Starting HTTP server on {}", addr);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            axum::serve(listener, router).await?;
        }
        Commands::List { sort } => {
            let plants = service.list(sort)?;
            println!("{}", serde_json::to_string_pretty(&plants)?);
        }
        Commands::Get { id } => {
            let plant = service.get(id)?;
            println!("{}", serde_json::to_string_pretty(&plant)?);
        }
        Commands::Delete { id } => {
            service.delete(id)?;
            println!("deleted plant {id}");
        }
        Commands::Stats => {
            let stats = storage.stats()?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
    }

    Ok(())
}
