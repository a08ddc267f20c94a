//! Scripted demonstration tour
//!
//! Installs a small Star-Trek flavored schema on a development server,
//! seeds relationships, then walks through every read surface: listing,
//! checks, bulk check, export, lookups, tree expansion, and DOT output.
//!
//! The schema models bridge access control: a system can be operated by
//! users who hold the right role AND serve on the system's ship. Picard
//! is a captain and crew, so he can operate the bridge; Kirk is a
//! captain but not crew of the Enterprise, so he cannot.

use crate::commands::check::verdict;
use crate::console::CliConsole;
use crate::graphviz;
use spiceglass_client::{BulkCheckResult, SpiceDbClient};
use spiceglass_core::{
    render_dot, DotOptions, ObjectRef, PermissionQuery, Relationship, Result, SimplifiedTree,
    SubjectRef,
};

/// Schema installed by the tour.
const DEMO_SCHEMA: &str = include_str!("star_trek.zed");

/// Relationship tuples seeded by the tour.
const DEMO_TUPLES: [&str; 11] = [
    "starship_role:captain#user@user:picard",
    "starship_role:starfleet#user@user:picard",
    "starship_role:captain#user@user:kirk",
    "starship_role:starfleet#user@user:kirk",
    "starship_role:starfleet#user@user:wesley",
    "starship:enterprise#crew_member@user:picard",
    "starship:enterprise#crew_member@user:wesley",
    "starship_system:enterprise_bridge#starship@starship:enterprise",
    "starship_system:enterprise_bridge#role@starship_role:captain#user",
    "starship_system:sickbay#starship@starship:enterprise",
    "starship_system:sickbay#role@starship_role:starfleet#user",
];

/// Labelled permission checks. The first five hold, the last three do
/// not: Kirk is not crew of the Enterprise, and Wesley holds no captain
/// role.
const DEMO_CHECKS: [(&str, &str); 8] = [
    (
        "Is Picard a captain?",
        "starship_role:captain#user@user:picard",
    ),
    (
        "Can Picard operate the Enterprise Bridge?",
        "starship_system:enterprise_bridge#operate@user:picard",
    ),
    (
        "Can Picard operate the Enterprise Sickbay?",
        "starship_system:sickbay#operate@user:picard",
    ),
    (
        "Is Wesley a member of the crew?",
        "starship:enterprise#crew_member@user:wesley",
    ),
    (
        "Can Wesley operate the Enterprise Sickbay?",
        "starship_system:sickbay#operate@user:wesley",
    ),
    (
        "Can Kirk operate the Enterprise Bridge?",
        "starship_system:enterprise_bridge#operate@user:kirk",
    ),
    (
        "Can Kirk operate the Enterprise Sickbay?",
        "starship_system:sickbay#operate@user:kirk",
    ),
    (
        "Can Wesley operate the Enterprise Bridge?",
        "starship_system:enterprise_bridge#operate@user:wesley",
    ),
];

/// Run the scripted tour against a running server
pub async fn execute(client: &SpiceDbClient) -> Result<()> {
    let console = CliConsole::new(true);
    console.info(&format!("Using gateway at {}", client.config().endpoint));

    console.print_header("Schema");
    client.write_schema(DEMO_SCHEMA).await?;
    println!("{}", client.read_schema().await?);

    console.print_header("Relationships");
    let tuples = DEMO_TUPLES
        .iter()
        .map(|tuple| tuple.parse::<Relationship>())
        .collect::<Result<Vec<_>>>()?;
    client.write_relationships(&tuples).await?;
    console.success(&format!("Wrote {} relationships", tuples.len()));

    for resource_type in ["starship", "starship_role", "starship_system", "user"] {
        println!();
        println!("{resource_type}:");
        for relationship in client.read_relationships(resource_type).await? {
            println!("  {relationship}");
        }
    }

    console.print_header("Checks");
    for (label, query) in DEMO_CHECKS {
        let query: PermissionQuery = query.parse()?;
        let permissionship = client.check_permission(&query).await?;
        println!("{label} {}", verdict(permissionship));
    }

    console.print_header("Bulk check");
    let queries = DEMO_CHECKS
        .iter()
        .map(|(_, query)| query.parse::<PermissionQuery>())
        .collect::<Result<Vec<_>>>()?;
    for outcome in client.bulk_check_permissions(&queries).await? {
        match &outcome.result {
            BulkCheckResult::Permissionship(permissionship) => {
                println!("{} {}", outcome.query, verdict(*permissionship));
            }
            BulkCheckResult::ServiceError { code, message } => {
                println!("{} error {code}: {message}", outcome.query);
            }
        }
    }

    console.print_header("Export");
    for relationship in client.bulk_export_relationships(100).await? {
        println!("{relationship}");
    }

    let bridge = ObjectRef::new("starship_system", "enterprise_bridge");
    let sickbay = ObjectRef::new("starship_system", "sickbay");

    console.print_header("Lookups");
    for (label, resource) in [
        ("Which users can operate the Enterprise Bridge?", &bridge),
        ("Which users can operate the Sickbay?", &sickbay),
    ] {
        println!("{label}");
        for entry in client.lookup_subjects(resource, "operate", "user").await? {
            println!("  user:{} {}", entry.object_id, entry.permissionship);
        }
    }
    for user in ["picard", "wesley", "kirk"] {
        println!("Which starship systems can {user} operate?");
        let subject: SubjectRef = format!("user:{user}").parse()?;
        for entry in client
            .lookup_resources("starship_system", "operate", &subject)
            .await?
        {
            println!("  starship_system:{} {}", entry.object_id, entry.permissionship);
        }
    }

    console.print_header("Permission trees");
    let bridge_tree = client.permission_tree(&bridge, "operate").await?;
    let sickbay_tree = client.permission_tree(&sickbay, "operate").await?;
    for (resource, tree) in [(&bridge, &bridge_tree), (&sickbay, &sickbay_tree)] {
        println!("Permission tree of {resource}#operate");
        match tree {
            Some(tree) => println!("{}", serde_json::to_string_pretty(tree)?),
            None => println!("null"),
        }
    }

    console.print_header("Graph");
    let trees: Vec<SimplifiedTree> = [bridge_tree, sickbay_tree].into_iter().flatten().collect();
    let source = render_dot(&trees, DotOptions::default());
    println!("{source}");

    // Inline display needs GraphViz and an iTerm2-compatible terminal.
    if let Err(e) = graphviz::display_graph(&source).await {
        console.warn(&format!("Skipping inline graph display: {e}"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_schema_defines_all_resource_types() {
        for definition in [
            "definition user",
            "definition starship_role",
            "definition starship",
            "definition starship_system",
        ] {
            assert!(DEMO_SCHEMA.contains(definition), "missing `{definition}`");
        }
        assert!(DEMO_SCHEMA.contains("permission operate = role & starship->crew"));
    }

    #[test]
    fn test_demo_tuples_parse() {
        for tuple in DEMO_TUPLES {
            tuple.parse::<Relationship>().unwrap();
        }
    }

    #[test]
    fn test_demo_tuples_cover_subject_relations() {
        // The role tuples bind subject sets, not plain objects.
        let role_binding: Relationship = DEMO_TUPLES[8].parse().unwrap();
        assert_eq!(role_binding.subject().relation(), Some("user"));
    }

    #[test]
    fn test_demo_check_queries_parse() {
        for (_, query) in DEMO_CHECKS {
            query.parse::<PermissionQuery>().unwrap();
        }
    }
}
