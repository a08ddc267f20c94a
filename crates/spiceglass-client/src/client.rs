//! HTTP client for SpiceDB's v1 gateway

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use spiceglass_core::error::{Error, Result};
use spiceglass_core::reference::{ObjectRef, PermissionQuery, Relationship, SubjectRef};
use spiceglass_core::tree::{simplify_tree, PermissionTree, SimplifiedTree, TreeExpander};

use crate::config::ClientConfig;
use crate::wire::{
    parse_stream_body, BulkCheckPair, BulkCheckRequest, BulkCheckResponse, BulkExportRequest,
    BulkExportResult, CheckPermissionRequest, CheckPermissionResponse,
    ExpandPermissionTreeRequest, ExpandPermissionTreeResponse, LookupPermissionship,
    LookupResourcesRequest, LookupResourcesResult, LookupSubjectsRequest, LookupSubjectsResult,
    Permissionship, ReadRelationshipsRequest, ReadRelationshipsResult, ReadSchemaRequest,
    ReadSchemaResponse, RelationshipFilter, RelationshipUpdate, WireStatus,
    WriteRelationshipsRequest, WriteSchemaRequest, OPERATION_TOUCH,
};

/// Outcome of one entry in a bulk permission check.
#[derive(Debug, Clone)]
pub struct BulkCheckOutcome {
    /// The query, as echoed back by the service.
    pub query: PermissionQuery,
    pub result: BulkCheckResult,
}

/// Per-entry result of a bulk check. The service answers each entry
/// independently, so one entry can fail while its neighbors succeed.
#[derive(Debug, Clone)]
pub enum BulkCheckResult {
    Permissionship(Permissionship),
    ServiceError { code: i32, message: String },
}

/// One row of a lookup-subjects or lookup-resources answer.
#[derive(Debug, Clone)]
pub struct LookupEntry {
    pub object_id: String,
    pub permissionship: LookupPermissionship,
}

/// Client for SpiceDB's v1 HTTP gateway.
///
/// Every operation POSTs a protobuf-JSON body with the preshared key as
/// a bearer token. Streaming endpoints are drained fully before the
/// call returns.
pub struct SpiceDbClient {
    config: ClientConfig,
    http_client: Client,
}

impl SpiceDbClient {
    /// Create a client, loading the CA certificate when one is
    /// configured.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut builder = Client::builder().timeout(config.timeout);
        if let Some(path) = &config.ca_cert_path {
            let pem = std::fs::read(path).map_err(|e| {
                Error::config(format!(
                    "failed to read CA certificate {}: {e}",
                    path.display()
                ))
            })?;
            let certificate = reqwest::Certificate::from_pem(&pem).map_err(|e| {
                Error::config(format!("invalid CA certificate {}: {e}", path.display()))
            })?;
            builder = builder.add_root_certificate(certificate);
        }
        let http_client = builder
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            config,
            http_client,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Write a schema, replacing the stored one.
    #[instrument(skip(self, schema), level = "debug")]
    pub async fn write_schema(&self, schema: &str) -> Result<()> {
        let _: serde_json::Value = self
            .post_json(
                "/v1/schema/write",
                &WriteSchemaRequest {
                    schema: schema.to_string(),
                },
            )
            .await?;
        Ok(())
    }

    /// Read the stored schema text.
    #[instrument(skip(self), level = "debug")]
    pub async fn read_schema(&self) -> Result<String> {
        let response: ReadSchemaResponse =
            self.post_json("/v1/schema/read", &ReadSchemaRequest {}).await?;
        Ok(response.schema_text)
    }

    /// Upsert relationships. Uses TOUCH semantics: existing tuples stay
    /// in place, missing ones get created.
    #[instrument(skip(self, relationships), fields(count = relationships.len()), level = "debug")]
    pub async fn write_relationships(&self, relationships: &[Relationship]) -> Result<()> {
        let updates = relationships
            .iter()
            .map(|relationship| RelationshipUpdate {
                operation: OPERATION_TOUCH.to_string(),
                relationship: relationship.into(),
            })
            .collect();
        let _: serde_json::Value = self
            .post_json(
                "/v1/relationships/write",
                &WriteRelationshipsRequest { updates },
            )
            .await?;
        Ok(())
    }

    /// Read all relationships whose resource has the given type.
    #[instrument(skip(self), level = "debug")]
    pub async fn read_relationships(&self, resource_type: &str) -> Result<Vec<Relationship>> {
        let request = ReadRelationshipsRequest {
            relationship_filter: RelationshipFilter {
                resource_type: resource_type.to_string(),
            },
        };
        let results: Vec<ReadRelationshipsResult> =
            self.post_stream("/v1/relationships/read", &request).await?;
        Ok(results
            .into_iter()
            .map(|result| Relationship::from(result.relationship))
            .collect())
    }

    /// Export relationships across all resource types, up to `limit`
    /// per result batch.
    #[instrument(skip(self), level = "debug")]
    pub async fn bulk_export_relationships(&self, limit: u32) -> Result<Vec<Relationship>> {
        let results: Vec<BulkExportResult> = self
            .post_stream(
                "/v1/experimental/relationships/bulkexport",
                &BulkExportRequest {
                    optional_limit: limit,
                },
            )
            .await?;
        Ok(results
            .into_iter()
            .flat_map(|result| result.relationships)
            .map(Relationship::from)
            .collect())
    }

    /// Check a single permission.
    #[instrument(skip(self), fields(query = %query), level = "debug")]
    pub async fn check_permission(&self, query: &PermissionQuery) -> Result<Permissionship> {
        let response: CheckPermissionResponse = self
            .post_json("/v1/permissions/check", &CheckPermissionRequest::from(query))
            .await?;
        Ok(response.permissionship)
    }

    /// Check many permissions in one round trip. Outcomes come back in
    /// request order.
    #[instrument(skip(self, queries), fields(count = queries.len()), level = "debug")]
    pub async fn bulk_check_permissions(
        &self,
        queries: &[PermissionQuery],
    ) -> Result<Vec<BulkCheckOutcome>> {
        let request = BulkCheckRequest {
            items: queries.iter().map(CheckPermissionRequest::from).collect(),
        };
        let response: BulkCheckResponse = self
            .post_json("/v1/permissions/checkbulk", &request)
            .await?;
        convert_bulk_pairs(response.pairs)
    }

    /// List subjects of a type holding a permission on a resource.
    #[instrument(skip(self), level = "debug")]
    pub async fn lookup_subjects(
        &self,
        resource: &ObjectRef,
        permission: &str,
        subject_type: &str,
    ) -> Result<Vec<LookupEntry>> {
        let request = LookupSubjectsRequest {
            resource: resource.into(),
            permission: permission.to_string(),
            subject_object_type: subject_type.to_string(),
        };
        let results: Vec<LookupSubjectsResult> =
            self.post_stream("/v1/permissions/subjects", &request).await?;
        Ok(results
            .into_iter()
            .map(|result| LookupEntry {
                object_id: result.subject.subject_object_id,
                permissionship: result.subject.permissionship,
            })
            .collect())
    }

    /// List resources of a type on which a subject holds a permission.
    #[instrument(skip(self), level = "debug")]
    pub async fn lookup_resources(
        &self,
        resource_type: &str,
        permission: &str,
        subject: &SubjectRef,
    ) -> Result<Vec<LookupEntry>> {
        let request = LookupResourcesRequest {
            resource_object_type: resource_type.to_string(),
            permission: permission.to_string(),
            subject: subject.into(),
        };
        let results: Vec<LookupResourcesResult> = self
            .post_stream("/v1/permissions/resources", &request)
            .await?;
        Ok(results
            .into_iter()
            .map(|result| LookupEntry {
                object_id: result.resource_object_id,
                permissionship: result.permissionship,
            })
            .collect())
    }

    /// Expand the full permission tree of `resource#permission`.
    #[instrument(skip(self), level = "debug")]
    pub async fn expand_permission_tree(
        &self,
        resource: &ObjectRef,
        permission: &str,
    ) -> Result<Option<PermissionTree>> {
        let request = ExpandPermissionTreeRequest {
            resource: resource.into(),
            permission: permission.to_string(),
        };
        let response: ExpandPermissionTreeResponse =
            self.post_json("/v1/permissions/expand", &request).await?;
        response.tree_root.map(PermissionTree::try_from).transpose()
    }

    /// Expand and simplify in one call. Indirect subjects resolve back
    /// through this same client.
    #[instrument(skip(self), level = "debug")]
    pub async fn permission_tree(
        &self,
        resource: &ObjectRef,
        permission: &str,
    ) -> Result<Option<SimplifiedTree>> {
        let tree = self.expand_permission_tree(resource, permission).await?;
        simplify_tree(self, tree.as_ref()).await
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let text = self.post_raw(path, body).await?;
        serde_json::from_str(&text)
            .map_err(|e| Error::api(format!("unexpected response from {path}: {e}")))
    }

    async fn post_stream<B, T>(&self, path: &str, body: &B) -> Result<Vec<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let text = self.post_raw(path, body).await?;
        parse_stream_body(&text)
    }

    async fn post_raw<B>(&self, path: &str, body: &B) -> Result<String>
    where
        B: Serialize + ?Sized,
    {
        let url = self.config.url(path);
        let response = self
            .http_client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.token))
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| Error::http(format!("POST {path} failed: {e}")))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Error::http(format!("failed to read response from {path}: {e}")))?;
        debug!(%url, %status, "gateway response");

        if !status.is_success() {
            return Err(service_error(path, status, &text));
        }
        Ok(text)
    }
}

/// Indirect subjects found during simplification expand through the
/// same gateway connection.
#[async_trait]
impl TreeExpander for SpiceDbClient {
    async fn expand(
        &self,
        object: &ObjectRef,
        permission: &str,
    ) -> Result<Option<PermissionTree>> {
        self.expand_permission_tree(object, permission).await
    }
}

pub(crate) fn convert_bulk_pairs(pairs: Vec<BulkCheckPair>) -> Result<Vec<BulkCheckOutcome>> {
    pairs
        .into_iter()
        .map(|pair| {
            let query = PermissionQuery::from(pair.request);
            let result = match (pair.item, pair.error) {
                (Some(item), _) => BulkCheckResult::Permissionship(item.permissionship),
                (None, Some(status)) => BulkCheckResult::ServiceError {
                    code: status.code,
                    message: status.message,
                },
                (None, None) => {
                    return Err(Error::api(format!(
                        "bulk check pair for {query} carries neither item nor error"
                    )));
                }
            };
            Ok(BulkCheckOutcome { query, result })
        })
        .collect()
}

/// The gateway reports errors as google.rpc.Status JSON; fall back to
/// the raw body when it is anything else.
fn service_error(path: &str, status: reqwest::StatusCode, body: &str) -> Error {
    match serde_json::from_str::<WireStatus>(body) {
        Ok(parsed) if !parsed.message.is_empty() => {
            Error::api(format!("{} (code {})", parsed.message, parsed.code))
        }
        _ => Error::api(format!("{path} returned {status}: {body}")),
    }
}
