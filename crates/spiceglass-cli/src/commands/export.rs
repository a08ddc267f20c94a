//! Relationship export command

use spiceglass_client::SpiceDbClient;
use spiceglass_core::Result;

/// Export stored relationships across all resource types, one tuple per line
pub async fn execute(client: &SpiceDbClient, limit: u32) -> Result<()> {
    let relationships = client.bulk_export_relationships(limit).await?;
    for relationship in &relationships {
        println!("{relationship}");
    }
    Ok(())
}
