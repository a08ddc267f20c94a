//! Graph rendering command

use crate::graphviz::{self, GraphFormat};
use spiceglass_client::SpiceDbClient;
use spiceglass_core::{render_dot, DotOptions, Error, ObjectRef, Result};
use std::io::Write;
use std::path::Path;
use tokio::fs;

/// Expand each target, render the combined trees as one DOT graph, and
/// emit it in the requested format
pub async fn execute(
    client: &SpiceDbClient,
    targets: &[String],
    compact: bool,
    format: GraphFormat,
    output: Option<&Path>,
    display: bool,
) -> Result<()> {
    let mut trees = Vec::new();
    for target in targets {
        let (resource, permission) = parse_target(target)?;
        if let Some(tree) = client.permission_tree(&resource, &permission).await? {
            trees.push(tree);
        }
    }

    let options = DotOptions {
        pretty: !compact,
        ..DotOptions::default()
    };
    let source = render_dot(&trees, options);

    if display {
        return graphviz::display_graph(&source).await;
    }

    let rendered = match format {
        GraphFormat::Dot => source.into_bytes(),
        GraphFormat::Png | GraphFormat::Svg => graphviz::render_with_dot(&source, format).await?,
    };

    match output {
        Some(path) => write_output(path, &rendered).await,
        None => {
            let mut stdout = std::io::stdout();
            stdout.write_all(&rendered)?;
            // Text formats get a trailing newline; PNG bytes go out as-is.
            if format != GraphFormat::Png {
                stdout.write_all(b"\n")?;
            }
            Ok(())
        }
    }
}

/// Split a graph target of the form `resource:id#permission`.
fn parse_target(target: &str) -> Result<(ObjectRef, String)> {
    let Some((resource, permission)) = target.split_once('#') else {
        return Err(Error::invalid_reference(format!(
            "expected `resource:id#permission`, got `{target}`"
        )));
    };
    if permission.is_empty() {
        return Err(Error::invalid_reference(format!(
            "expected `resource:id#permission`, got `{target}`"
        )));
    }
    Ok((resource.parse()?, permission.to_string()))
}

async fn write_output(path: &Path, rendered: &[u8]) -> Result<()> {
    fs::write(path, rendered)
        .await
        .map_err(|e| Error::io(format!("failed to write {}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_target() {
        let (resource, permission) = parse_target("starship_system:sickbay#operate").unwrap();
        assert_eq!(resource, ObjectRef::new("starship_system", "sickbay"));
        assert_eq!(permission, "operate");
    }

    #[test]
    fn test_parse_target_rejects_missing_permission() {
        assert!(parse_target("starship_system:sickbay").is_err());
        assert!(parse_target("starship_system:sickbay#").is_err());
    }

    #[test]
    fn test_parse_target_rejects_bare_type() {
        assert!(parse_target("sickbay#operate").is_err());
    }

    #[tokio::test]
    async fn test_write_output_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.dot");
        write_output(&path, b"digraph G {}").await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"digraph G {}");
    }

    #[tokio::test]
    async fn test_write_output_reports_path_on_failure() {
        let err = write_output(Path::new("/no/such/dir/graph.dot"), b"digraph G {}")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("/no/such/dir/graph.dot"));
    }
}
