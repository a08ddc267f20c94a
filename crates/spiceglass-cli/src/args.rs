//! CLI argument definitions using clap
//!
//! Every subcommand talks to the same SpiceDB HTTP gateway, so the
//! connection flags (`--endpoint`, `--token`, `--ca-cert`) are global and
//! fall back to `SPICEGLASS_*` environment variables.

use crate::graphviz::GraphFormat;
use clap::{Parser, Subcommand};
use spiceglass_client::config::{CA_CERT_ENV_VAR, DEFAULT_ENDPOINT, ENDPOINT_ENV_VAR, TOKEN_ENV_VAR};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "spiceglass")]
#[command(about = "Explore SpiceDB permission graphs: check, lookup, expand, and render")]
#[command(
    long_about = r#"Explore SpiceDB permission graphs from the command line.

USAGE:
  spiceglass schema write schema.zed          # Install a schema
  spiceglass relate "doc:1#reader@user:eve"   # Upsert relationship tuples
  spiceglass check "doc:1#view@user:eve"      # Check one permission
  spiceglass expand doc:1 view                # Simplified tree as JSON
  spiceglass graph doc:1#view --format png    # Render the tree with GraphViz
  spiceglass demo                             # Scripted tour on a dev server

CONNECTION:
  The gateway endpoint, preshared key, and optional root certificate come
  from --endpoint / --token / --ca-cert, or from the SPICEGLASS_ENDPOINT,
  SPICEGLASS_TOKEN, and SPICEGLASS_CA_CERT environment variables.

For detailed help: spiceglass --help"#
)]
#[command(version)]
pub struct Cli {
    /// SpiceDB HTTP gateway base URL
    #[arg(long, global = true, env = ENDPOINT_ENV_VAR, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Preshared key sent as a bearer token
    #[arg(long, global = true, env = TOKEN_ENV_VAR)]
    pub token: Option<String>,

    /// PEM root certificate for TLS endpoints with a custom CA
    #[arg(long, global = true, env = CA_CERT_ENV_VAR)]
    pub ca_cert: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Read or replace the stored schema
    Schema {
        #[command(subcommand)]
        action: SchemaAction,
    },

    /// Upsert relationship tuples
    Relate {
        /// Tuples in `resource:id#relation@subject` form
        #[arg(required = true)]
        tuples: Vec<String>,
    },

    /// List stored relationships for a resource type
    Relationships {
        /// Resource object type to filter on
        resource_type: String,
    },

    /// Export stored relationships across all resource types
    Export {
        /// Maximum number of relationships per result batch
        #[arg(long, default_value_t = 100)]
        limit: u32,
    },

    /// Check a single permission
    Check {
        /// Query in `resource:id#permission@subject` form
        query: String,
    },

    /// Check several permissions in one round trip
    BulkCheck {
        /// Queries in `resource:id#permission@subject` form
        #[arg(required = true)]
        queries: Vec<String>,
    },

    /// List subjects of a type holding a permission on a resource
    LookupSubjects {
        /// Resource in `type:id` form
        resource: String,

        /// Permission to test
        permission: String,

        /// Subject object type to return
        subject_type: String,
    },

    /// List resources of a type on which a subject holds a permission
    LookupResources {
        /// Resource object type to return
        resource_type: String,

        /// Permission to test
        permission: String,

        /// Subject in `type:id` or `type:id#relation` form
        subject: String,
    },

    /// Print the simplified permission tree as JSON
    Expand {
        /// Resource in `type:id` form
        resource: String,

        /// Permission to expand
        permission: String,
    },

    /// Render permission trees as a GraphViz graph
    Graph {
        /// Targets in `resource:id#permission` form
        #[arg(required = true)]
        targets: Vec<String>,

        /// Emit single-line DOT without indentation
        #[arg(long)]
        compact: bool,

        /// Output format; png and svg shell out to the `dot` tool
        #[arg(long, value_enum, default_value = "dot")]
        format: GraphFormat,

        /// Write the output to a file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Show the graph inline in the terminal (iTerm2 and compatible)
        #[arg(long, conflicts_with = "output")]
        display: bool,
    },

    /// Run a scripted tour against a development server
    Demo,
}

#[derive(Subcommand, Clone)]
pub enum SchemaAction {
    /// Print the stored schema
    Read,

    /// Replace the schema with the contents of a file
    Write {
        /// Path to the schema file
        file: PathBuf,
    },
}
