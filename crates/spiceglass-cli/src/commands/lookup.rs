//! Subject and resource lookup commands

use spiceglass_client::SpiceDbClient;
use spiceglass_core::{ObjectRef, Result, SubjectRef};

/// List subjects of `subject_type` holding `permission` on `resource`
pub async fn subjects(
    client: &SpiceDbClient,
    resource: &str,
    permission: &str,
    subject_type: &str,
) -> Result<()> {
    let resource: ObjectRef = resource.parse()?;
    let entries = client.lookup_subjects(&resource, permission, subject_type).await?;
    for entry in &entries {
        println!("{subject_type}:{} {}", entry.object_id, entry.permissionship);
    }
    Ok(())
}

/// List resources of `resource_type` on which `subject` holds `permission`
pub async fn resources(
    client: &SpiceDbClient,
    resource_type: &str,
    permission: &str,
    subject: &str,
) -> Result<()> {
    let subject: SubjectRef = subject.parse()?;
    let entries = client.lookup_resources(resource_type, permission, &subject).await?;
    for entry in &entries {
        println!("{resource_type}:{} {}", entry.object_id, entry.permissionship);
    }
    Ok(())
}
