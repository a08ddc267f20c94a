//! Command routing logic for CLI

use crate::args::{Cli, Commands, SchemaAction};
use crate::commands;
use spiceglass_client::{ClientConfig, SpiceDbClient};
use spiceglass_core::{Error, Result};

/// Route CLI commands to their respective handlers
pub async fn route(cli: Cli) -> Result<()> {
    let client = build_client(&cli)?;

    match &cli.command {
        Commands::Schema { action } => match action {
            SchemaAction::Read => commands::schema::read(&client).await,
            SchemaAction::Write { file } => commands::schema::write(&client, file).await,
        },
        Commands::Relate { tuples } => commands::relate::execute(&client, tuples).await,
        Commands::Relationships { resource_type } => {
            commands::relationships::execute(&client, resource_type).await
        }
        Commands::Export { limit } => commands::export::execute(&client, *limit).await,
        Commands::Check { query } => commands::check::single(&client, query).await,
        Commands::BulkCheck { queries } => commands::check::bulk(&client, queries).await,
        Commands::LookupSubjects {
            resource,
            permission,
            subject_type,
        } => commands::lookup::subjects(&client, resource, permission, subject_type).await,
        Commands::LookupResources {
            resource_type,
            permission,
            subject,
        } => commands::lookup::resources(&client, resource_type, permission, subject).await,
        Commands::Expand {
            resource,
            permission,
        } => commands::expand::execute(&client, resource, permission).await,
        Commands::Graph {
            targets,
            compact,
            format,
            output,
            display,
        } => {
            commands::graph::execute(
                &client,
                targets,
                *compact,
                *format,
                output.as_deref(),
                *display,
            )
            .await
        }
        Commands::Demo => commands::demo::execute(&client).await,
    }
}

/// Build the gateway client from the global connection flags
fn build_client(cli: &Cli) -> Result<SpiceDbClient> {
    let token = cli.token.clone().ok_or_else(|| {
        Error::config("no token given; pass --token or set SPICEGLASS_TOKEN")
    })?;

    let mut config = ClientConfig::new(token).with_endpoint(&cli.endpoint);
    if let Some(ca_cert) = &cli.ca_cert {
        config = config.with_ca_cert(ca_cert);
    }
    SpiceDbClient::new(config)
}
