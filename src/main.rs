use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ecotourist::catalog::Catalog;
use ecotourist::config::AppConfig;
use ecotourist::session::SessionStore;
use ecotourist::{api, terminal};

#[derive(Parser)]
#[command(name = "ecotourist")]
#[command(about = "Pick a city, follow its eco rules, earn coins")]
struct Cli {
    /// Catalog file to use instead of the built-in cities and rules
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// How long the "+N Coins!" feedback stays visible, in milliseconds
    #[arg(long, global = true)]
    feedback_ms: Option<u64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API
    Serve {
        /// Address to bind
        #[arg(long)]
        host: Option<String>,

        /// Port for HTTP API
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Play in the terminal
    Play,
    /// Print the loaded catalog as JSON
    Catalog,
}

/// Initialize tracing with output to stderr (for terminal mode) or stdout
fn init_tracing(use_stderr: bool) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "ecotourist=debug,tower_http=debug".into()),
    );

    if use_stderr {
        // Terminal mode: log to stderr so stdout is clean for the screen
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

fn load_catalog(config: &AppConfig) -> anyhow::Result<Catalog> {
    match &config.catalog_path {
        Some(path) => Catalog::load(path)
            .with_context(|| format!("Failed to load catalog {}", path.display())),
        None => Catalog::reference().context("Built-in catalog is invalid"),
    }
}

async fn serve(config: &AppConfig, store: SessionStore) -> anyhow::Result<()> {
    let addr = config.bind_addr();
    tracing::info!("Starting EcoTourist server on {}", addr);

    let app = api::create_router(store);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("EcoTourist server listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Play mode needs stderr for logging since stdout is the screen
    let use_stderr = matches!(cli.command, Some(Commands::Play));
    init_tracing(use_stderr);

    let mut config = AppConfig::load();
    if let Some(path) = cli.catalog {
        config.catalog_path = Some(path);
    }
    if let Some(ms) = cli.feedback_ms {
        config.feedback_duration_ms = ms;
    }

    let catalog = Arc::new(load_catalog(&config)?);
    let store = SessionStore::new(catalog.clone(), config.feedback_duration());

    match cli.command {
        Some(Commands::Serve { host, port }) => {
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            serve(&config, store).await?;
        }
        Some(Commands::Play) => {
            let input = tokio::io::BufReader::new(tokio::io::stdin());
            terminal::run(store, input, tokio::io::stdout()).await?;
        }
        Some(Commands::Catalog) => {
            println!("{}", serde_json::to_string_pretty(catalog.as_ref())?);
        }
        None => {
            // Default: start server
            serve(&config, store).await?;
        }
    }

    Ok(())
}
