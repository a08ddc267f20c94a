//! Permission check commands

use colored::*;
use spiceglass_client::{BulkCheckResult, Permissionship, SpiceDbClient};
use spiceglass_core::{PermissionQuery, Result};

/// Check a single permission and print the verdict
pub async fn single(client: &SpiceDbClient, query: &str) -> Result<()> {
    let query: PermissionQuery = query.parse()?;
    let permissionship = client.check_permission(&query).await?;
    println!("{query} {}", verdict(permissionship));
    Ok(())
}

/// Check several permissions in one round trip and print one verdict
/// per line, in request order
pub async fn bulk(client: &SpiceDbClient, queries: &[String]) -> Result<()> {
    let queries = queries
        .iter()
        .map(|query| query.parse::<PermissionQuery>())
        .collect::<Result<Vec<_>>>()?;

    for outcome in client.bulk_check_permissions(&queries).await? {
        match &outcome.result {
            BulkCheckResult::Permissionship(permissionship) => {
                println!("{} {}", outcome.query, verdict(*permissionship));
            }
            BulkCheckResult::ServiceError { code, message } => {
                println!("{} {}", outcome.query, format!("error {code}: {message}").red());
            }
        }
    }
    Ok(())
}

/// Color a permissionship by its outcome: granted green, conditional
/// yellow, everything else red
pub(crate) fn verdict(permissionship: Permissionship) -> ColoredString {
    match permissionship {
        Permissionship::HasPermission => permissionship.to_string().green(),
        Permissionship::ConditionalPermission => permissionship.to_string().yellow(),
        _ => permissionship.to_string().red(),
    }
}
