//! Relationship listing command

use spiceglass_client::SpiceDbClient;
use spiceglass_core::Result;

/// List stored relationships for a resource type, one tuple per line
pub async fn execute(client: &SpiceDbClient, resource_type: &str) -> Result<()> {
    let relationships = client.read_relationships(resource_type).await?;
    for relationship in &relationships {
        println!("{relationship}");
    }
    Ok(())
}
