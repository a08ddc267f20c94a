//! Spiceglass CLI application
//!
//! Explore SpiceDB permission graphs from the command line: manage the
//! schema and relationships, run permission checks and lookups, and
//! render permission-expansion trees as GraphViz graphs.
//!
//! # Connection
//!
//! Every command talks to a SpiceDB HTTP gateway. The endpoint, preshared
//! key, and optional root certificate come from the global flags or the
//! `SPICEGLASS_ENDPOINT`, `SPICEGLASS_TOKEN`, and `SPICEGLASS_CA_CERT`
//! environment variables.
//!
//! # Getting started
//!
//! Against a local development server (`spicedb serve --grpc-preshared-key
//! somekey --http-enabled`):
//!
//! ```bash
//! export SPICEGLASS_TOKEN=somekey
//! spiceglass demo                # scripted tour: schema, tuples, checks, graphs
//! spiceglass check "starship_system:enterprise_bridge#operate@user:picard"
//! spiceglass graph starship_system:enterprise_bridge#operate --format png -o graph.png
//! ```

mod args;
mod commands;
mod console;
mod graphviz;
mod router;

use clap::Parser;

// Re-export for external use
pub use args::{Cli, Commands, SchemaAction};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with environment-based filtering
    // Set RUST_LOG=debug for verbose logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    router::route(cli).await?;
    Ok(())
}
