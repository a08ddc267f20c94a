//! Relationship write command

use crate::console::CliConsole;
use spiceglass_client::SpiceDbClient;
use spiceglass_core::{Relationship, Result};

/// Upsert the given relationship tuples
pub async fn execute(client: &SpiceDbClient, tuples: &[String]) -> Result<()> {
    let console = CliConsole::new(true);

    let relationships = tuples
        .iter()
        .map(|tuple| tuple.parse::<Relationship>())
        .collect::<Result<Vec<_>>>()?;

    client.write_relationships(&relationships).await?;

    let count = relationships.len();
    let plural = if count == 1 { "" } else { "s" };
    console.success(&format!("Wrote {count} relationship{plural}"));
    Ok(())
}
