//! Permission tree expansion command

use spiceglass_client::SpiceDbClient;
use spiceglass_core::{ObjectRef, Result};

/// Expand `resource#permission`, simplify the tree, and print it as
/// pretty JSON. Prints `null` when the service returns no tree.
pub async fn execute(client: &SpiceDbClient, resource: &str, permission: &str) -> Result<()> {
    let resource: ObjectRef = resource.parse()?;
    match client.permission_tree(&resource, permission).await? {
        Some(tree) => println!("{}", serde_json::to_string_pretty(&tree)?),
        None => println!("null"),
    }
    Ok(())
}
