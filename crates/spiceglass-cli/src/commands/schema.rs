//! Schema management commands

use crate::console::CliConsole;
use spiceglass_client::SpiceDbClient;
use spiceglass_core::{Error, Result};
use std::path::Path;
use tokio::fs;

/// Print the stored schema
pub async fn read(client: &SpiceDbClient) -> Result<()> {
    let schema = client.read_schema().await?;
    println!("{schema}");
    Ok(())
}

/// Replace the stored schema with the contents of a file
pub async fn write(client: &SpiceDbClient, file: &Path) -> Result<()> {
    let console = CliConsole::new(true);

    let schema = fs::read_to_string(file).await.map_err(|e| {
        Error::io(format!("failed to read schema file {}: {e}", file.display()))
    })?;

    client.write_schema(&schema).await?;
    console.success(&format!("Schema written from {}", file.display()));
    Ok(())
}
