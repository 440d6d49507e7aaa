//! Minimax Server - CLI
//!
//! Serves the tic-tac-toe AI over HTTP, or answers a single board from the
//! command line.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use minimax_server::{AppState, GameService, ServerConfig, router};
use minimax_tictactoe::{Board, Searcher, StandardRules, classify};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = ServerConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    init_tracing(&config);

    match cli.command {
        Command::Serve {
            port,
            host,
            explain_depth,
        } => {
            let mut config = config;
            if let Some(host) = host {
                config = config.with_host(host);
            }
            if let Some(port) = port {
                config = config.with_port(port);
            }
            if let Some(depth) = explain_depth {
                config = config.with_explain_depth(depth);
            }
            run_http_server(config.validate()?).await
        }
        Command::Move { board } => print_move(&config, &board),
        Command::Explain { board, depth } => print_explanation(&config, &board, depth),
        Command::Status { board } => {
            println!("{}", classify(&StandardRules::new(), &board));
            Ok(())
        }
    }
}

fn init_tracing(config: &ServerConfig) {
    // Stdout carries command output, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_filter())),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Run the HTTP server until Ctrl-C.
#[instrument(skip(config), fields(addr = %config.bind_addr()))]
async fn run_http_server(config: ServerConfig) -> Result<()> {
    info!(
        explain_depth = config.explain_depth(),
        timeout_ms = ?config.request_timeout_ms(),
        policy = ?config.on_rule_failure(),
        "Starting minimax server"
    );

    let service = GameService::from_config(StandardRules::new(), &config);
    let app = router(AppState::new(service, config.request_timeout()));

    let listener = tokio::net::TcpListener::bind(config.bind_addr())
        .await
        .with_context(|| format!("binding {}", config.bind_addr()))?;
    info!("Server listening on http://{}", config.bind_addr());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}

/// Print the AI's reply as a grid plus status.
fn print_move(config: &ServerConfig, board: &Board) -> Result<()> {
    let service = GameService::from_config(StandardRules::new(), config);
    let response = service.play(board)?;
    let played = board.placed_between(response.new_board());

    println!("{}", response.new_board().display());
    println!();
    match played {
        Some(position) => println!("AI plays {}", position),
        None => println!("No move made"),
    }
    println!("Board:  {}", response.new_board());
    println!("Status: {}", response.status());
    Ok(())
}

/// Print the explanation tree as pretty JSON.
fn print_explanation(config: &ServerConfig, board: &Board, depth: Option<u8>) -> Result<()> {
    let depth = depth.unwrap_or(*config.explain_depth());
    let depth = ServerConfig::check_explain_depth(depth)?;
    let explanation = Searcher::with_options(&StandardRules::new(), config.search_options())
        .explain(board, depth)?;
    info!(
        nodes = explanation.stats().nodes_visited(),
        cutoffs = explanation.stats().cutoffs(),
        "Tree built"
    );
    println!("{}", serde_json::to_string_pretty(explanation.root())?);
    Ok(())
}
