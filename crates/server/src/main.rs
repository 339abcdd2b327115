// crates/server/src/main.rs
//! Benchview server binary.
//!
//! Opens the job store, builds the shared state (store + hub + lifecycle
//! manager), and serves the API on localhost.

use std::net::SocketAddr;

use anyhow::Result;
use benchview_db::Database;
use benchview_server::{create_app, AppState};
use tracing_subscriber::EnvFilter;

/// Default port for the server.
const DEFAULT_PORT: u16 = 47911;

/// Get the server port from environment or use default.
fn get_port() -> u16 {
    std::env::var("BENCHVIEW_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Startup UX uses eprintln; everything after that is structured tracing.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).compact().init();

    eprintln!("\n\u{1f527} benchview v{}\n", env!("CARGO_PKG_VERSION"));

    let db = Database::open_default().await?;
    let state = AppState::new(db);
    let app = create_app(state);

    let port = get_port();
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    eprintln!("  \u{2713} Ready \u{2014} http://localhost:{}\n", port);

    axum::serve(listener, app).await?;

    Ok(())
}
