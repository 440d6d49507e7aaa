//! Minimax server library - HTTP plumbing around the tic-tac-toe AI.
//!
//! # Architecture
//!
//! - **Config**: TOML server configuration with CLI overrides
//! - **Service**: classify, move and explain on the blocking pool
//! - **API**: axum routes for `/api/move` and `/api/explain`
//!
//! The game logic itself lives in [`minimax_tictactoe`].
//!
//! # Example
//!
//! ```no_run
//! use minimax_server::{AppState, GameService, ServerConfig, router};
//! use minimax_tictactoe::StandardRules;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ServerConfig::default();
//! let service = GameService::from_config(StandardRules::new(), &config);
//! let app = router(AppState::new(service, config.request_timeout()));
//! let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod api;
mod config;
mod service;

pub use api::{ApiError, BoardRequest, router};
pub use config::{ConfigError, ServerConfig};
pub use service::{AppState, GameService, MoveResponse, ServiceError};
