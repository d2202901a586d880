//! # Bond Yield Server
//!
//! REST front end for `bond-yield-core`.
//!
//! ## Endpoints
//!
//! - `POST /api/v1/bond/calculate` validates a bond and returns its yields,
//!   classification and cash flow schedule
//! - `GET /health`, `GET /api/v1/health`
//! - `GET /api/docs` Swagger UI over the generated OpenAPI document
//!
//! ## Usage
//!
//! ```ignore
//! use bond_yield_server::{Server, ServerConfig};
//!
//! let server = Server::new(ServerConfig::default());
//! server.start().await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod docs;
pub mod handlers;
pub mod routes;

use std::sync::Arc;

use axum::http::HeaderValue;
use axum::Router;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::handlers::AppState;

pub use config::{ConfigError, ServerConfig};

/// Errors that stop the server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Configuration could not be used.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Binding or serving failed.
    #[error("Server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// The bond yield server.
pub struct Server {
    config: ServerConfig,
}

impl Server {
    /// Create a new server.
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Build the router.
    pub fn router(&self) -> Router {
        let state = Arc::new(AppState {
            solver: self.config.solver.clone(),
        });

        routes::create_router(state)
            .layer(TraceLayer::new_for_http())
            .layer(cors_layer(self.config.cors_origin.as_deref()))
    }

    /// Start the server.
    pub async fn start(&self) -> Result<(), ServerError> {
        let addr = self.config.socket_addr()?;

        info!("Starting bond yield server on {}", addr);

        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, self.router()).await?;
        Ok(())
    }
}

/// Any origin unless one is configured; `*` also means any.
fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let allow_origin = match origin {
        None | Some("*") => AllowOrigin::from(Any),
        Some(origin) => match HeaderValue::from_str(origin) {
            Ok(value) => AllowOrigin::exact(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin {:?}; allowing any origin", origin);
                AllowOrigin::from(Any)
            }
        },
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}
