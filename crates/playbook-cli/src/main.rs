//! Playbook CLI - knowledge-graph chat viewer and backend proxy.
//!
//! Run `pb` (or `pb viz`) to open the desktop viewer; `pb serve` runs the
//! reverse proxy in front of the GraphRAG backend.

use std::net::SocketAddr;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use playbook_api::{create_proxy_router, create_proxy_state};
use playbook_viz::PlaybookApp;

mod config;

use config::Config;

/// Playbook - chat with a game-design knowledge graph and see each
/// answer's subgraph.
#[derive(Parser, Debug)]
#[command(
    name = "pb",
    author,
    version,
    about = "Playbook: knowledge-graph chat viewer",
    long_about = None
)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Launch the desktop viewer (default command).
    Viz {
        /// Chat backend base URL. Overrides PLAYBOOK_BACKEND_URL.
        #[arg(short, long)]
        backend: Option<String>,
    },

    /// Run the reverse proxy in front of the chat backend.
    Serve {
        /// Port to listen on. Overrides PLAYBOOK_PORT.
        #[arg(short, long)]
        port: Option<u16>,

        /// Chat backend base URL. Overrides PLAYBOOK_BACKEND_URL.
        #[arg(short, long)]
        backend: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let config = Config::load();
    match cli.command.unwrap_or(Commands::Viz { backend: None }) {
        Commands::Viz { backend } => run_viz(backend.unwrap_or(config.backend_url)),
        Commands::Serve { port, backend } => run_serve(
            port.unwrap_or(config.port),
            backend.unwrap_or(config.backend_url),
        ),
    }
}

fn init_tracing(verbose: bool, quiet: bool) {
    let default_level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();
}

fn run_viz(backend_url: String) -> Result<()> {
    info!(%backend_url, "launching viewer");

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_title("Playbook"),
        ..Default::default()
    };

    eframe::run_native(
        "Playbook",
        options,
        Box::new(move |cc| Ok(Box::new(PlaybookApp::new(cc, backend_url)))),
    )
    .map_err(|e| anyhow::anyhow!("failed to start viewer: {e}"))
}

fn run_serve(port: u16, backend_url: String) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
    runtime.block_on(async move {
        let state = create_proxy_state(backend_url.clone());
        let router = create_proxy_router(state);

        let addr = SocketAddr::from(([127, 0, 0, 1], port));
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind {}", addr))?;

        info!("proxy listening on http://{} -> {}", addr, backend_url);
        axum::serve(listener, router)
            .await
            .context("proxy server failed")
    })
}
