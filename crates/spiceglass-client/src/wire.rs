//! Wire types for SpiceDB's v1 HTTP gateway
//!
//! The gateway speaks protobuf-JSON: camelCase field names, enum values
//! carried as prefixed SCREAMING_SNAKE strings, and oneof payloads
//! flattened into sibling keys (a tree node carries either a `leaf` or
//! an `intermediate` key, a bulk-check pair either an `item` or an
//! `error`). Streaming endpoints answer with a sequence of JSON
//! documents, each wrapping a `result` or an `error`.
//!
//! Everything here converts to and from the core reference and tree
//! types; the conversions are where malformed payloads get rejected.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use spiceglass_core::error::{Error, Result};
use spiceglass_core::reference::{ObjectRef, PermissionQuery, Relationship, SubjectRef};
use spiceglass_core::tree::{PermissionTree, SetOperation, TreeType};

/// `v1.ObjectReference`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireObject {
    pub object_type: String,
    pub object_id: String,
}

impl From<&ObjectRef> for WireObject {
    fn from(object: &ObjectRef) -> Self {
        Self {
            object_type: object.object_type().to_string(),
            object_id: object.object_id().to_string(),
        }
    }
}

impl From<WireObject> for ObjectRef {
    fn from(wire: WireObject) -> Self {
        ObjectRef::new(wire.object_type, wire.object_id)
    }
}

/// `v1.SubjectReference`. The wire carries a direct subject as an empty
/// `optionalRelation`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireSubject {
    pub object: WireObject,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub optional_relation: String,
}

impl From<&SubjectRef> for WireSubject {
    fn from(subject: &SubjectRef) -> Self {
        Self {
            object: subject.object().into(),
            optional_relation: subject.relation().unwrap_or_default().to_string(),
        }
    }
}

impl From<WireSubject> for SubjectRef {
    fn from(wire: WireSubject) -> Self {
        SubjectRef::with_relation(wire.object.into(), wire.optional_relation)
    }
}

/// `v1.Relationship`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireRelationship {
    pub resource: WireObject,
    pub relation: String,
    pub subject: WireSubject,
}

impl From<&Relationship> for WireRelationship {
    fn from(relationship: &Relationship) -> Self {
        Self {
            resource: relationship.resource().into(),
            relation: relationship.relation().to_string(),
            subject: relationship.subject().into(),
        }
    }
}

impl From<WireRelationship> for Relationship {
    fn from(wire: WireRelationship) -> Self {
        Relationship::new(wire.resource.into(), wire.relation, wire.subject.into())
    }
}

// =============================================================================
// Schema
// =============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteSchemaRequest {
    pub schema: String,
}

/// Empty request body; serializes as `{}`.
#[derive(Debug, Clone, Serialize)]
pub struct ReadSchemaRequest {}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadSchemaResponse {
    pub schema_text: String,
}

// =============================================================================
// Relationships
// =============================================================================

/// Upsert semantics: create the relationship or leave it in place.
pub const OPERATION_TOUCH: &str = "OPERATION_TOUCH";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipUpdate {
    pub operation: String,
    pub relationship: WireRelationship,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteRelationshipsRequest {
    pub updates: Vec<RelationshipUpdate>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipFilter {
    pub resource_type: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadRelationshipsRequest {
    pub relationship_filter: RelationshipFilter,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadRelationshipsResult {
    pub relationship: WireRelationship,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkExportRequest {
    pub optional_limit: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkExportResult {
    #[serde(default)]
    pub relationships: Vec<WireRelationship>,
}

// =============================================================================
// Permission checks
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckPermissionRequest {
    pub resource: WireObject,
    pub permission: String,
    pub subject: WireSubject,
}

impl From<&PermissionQuery> for CheckPermissionRequest {
    fn from(query: &PermissionQuery) -> Self {
        Self {
            resource: query.resource().into(),
            permission: query.permission().to_string(),
            subject: query.subject().into(),
        }
    }
}

impl From<CheckPermissionRequest> for PermissionQuery {
    fn from(wire: CheckPermissionRequest) -> Self {
        PermissionQuery::new(wire.resource.into(), wire.permission, wire.subject.into())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckPermissionResponse {
    pub permissionship: Permissionship,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkCheckRequest {
    pub items: Vec<CheckPermissionRequest>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkCheckResponse {
    #[serde(default)]
    pub pairs: Vec<BulkCheckPair>,
}

/// One request/answer pair of a bulk check. `item` and `error` are a
/// flattened oneof; exactly one of them should be present.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkCheckPair {
    pub request: CheckPermissionRequest,
    #[serde(default)]
    pub item: Option<BulkCheckItem>,
    #[serde(default)]
    pub error: Option<WireStatus>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkCheckItem {
    pub permissionship: Permissionship,
}

/// `google.rpc.Status`, as the gateway reports errors.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireStatus {
    #[serde(default)]
    pub code: i32,
    #[serde(default)]
    pub message: String,
}

// =============================================================================
// Lookups
// =============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupSubjectsRequest {
    pub resource: WireObject,
    pub permission: String,
    pub subject_object_type: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupSubjectsResult {
    pub subject: ResolvedSubject,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedSubject {
    pub subject_object_id: String,
    pub permissionship: LookupPermissionship,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupResourcesRequest {
    pub resource_object_type: String,
    pub permission: String,
    pub subject: WireSubject,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupResourcesResult {
    pub resource_object_id: String,
    pub permissionship: LookupPermissionship,
}

// =============================================================================
// Expansion
// =============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpandPermissionTreeRequest {
    pub resource: WireObject,
    pub permission: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpandPermissionTreeResponse {
    #[serde(default)]
    pub tree_root: Option<WireTreeNode>,
}

/// One node of the raw expansion tree. `leaf` and `intermediate` are a
/// flattened oneof.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireTreeNode {
    #[serde(default)]
    pub expanded_object: Option<WireObject>,
    #[serde(default)]
    pub expanded_relation: String,
    #[serde(default)]
    pub leaf: Option<WireLeaf>,
    #[serde(default)]
    pub intermediate: Option<WireIntermediate>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireLeaf {
    #[serde(default)]
    pub subjects: Vec<WireSubject>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireIntermediate {
    #[serde(default)]
    pub operation: String,
    #[serde(default)]
    pub children: Vec<WireTreeNode>,
}

impl TryFrom<WireTreeNode> for PermissionTree {
    type Error = Error;

    /// Converting rejects the shapes protobuf-JSON can carry but the
    /// core model cannot: a missing `expandedObject`, a node with both
    /// or neither oneof variant, and unknown or unspecified operations.
    fn try_from(node: WireTreeNode) -> Result<Self> {
        let expanded_object = node
            .expanded_object
            .ok_or_else(|| Error::malformed_tree("node is missing expandedObject"))?;

        let tree = match (node.leaf, node.intermediate) {
            (Some(leaf), None) => TreeType::Leaf {
                subjects: leaf.subjects.into_iter().map(SubjectRef::from).collect(),
            },
            (None, Some(intermediate)) => TreeType::Intermediate {
                operation: parse_operation(&intermediate.operation)?,
                children: intermediate
                    .children
                    .into_iter()
                    .map(PermissionTree::try_from)
                    .collect::<Result<_>>()?,
            },
            (Some(_), Some(_)) => {
                return Err(Error::malformed_tree(
                    "node carries both leaf and intermediate",
                ));
            }
            (None, None) => {
                return Err(Error::malformed_tree(
                    "node carries neither leaf nor intermediate",
                ));
            }
        };

        Ok(PermissionTree {
            expanded_object: expanded_object.into(),
            expanded_relation: node.expanded_relation,
            tree,
        })
    }
}

fn parse_operation(value: &str) -> Result<SetOperation> {
    match value {
        "OPERATION_UNION" => Ok(SetOperation::Union),
        "OPERATION_INTERSECTION" => Ok(SetOperation::Intersection),
        "OPERATION_EXCLUSION" => Ok(SetOperation::Exclusion),
        other => Err(Error::malformed_tree(format!(
            "unsupported set operation `{other}`"
        ))),
    }
}

// =============================================================================
// Enums
// =============================================================================

/// `v1.CheckPermissionResponse.Permissionship`. Displays without the
/// protobuf prefix, e.g. `HAS_PERMISSION`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Permissionship {
    #[serde(rename = "PERMISSIONSHIP_UNSPECIFIED")]
    Unspecified,
    #[serde(rename = "PERMISSIONSHIP_NO_PERMISSION")]
    NoPermission,
    #[serde(rename = "PERMISSIONSHIP_HAS_PERMISSION")]
    HasPermission,
    #[serde(rename = "PERMISSIONSHIP_CONDITIONAL_PERMISSION")]
    ConditionalPermission,
}

impl Permissionship {
    /// Whether the permission is granted outright.
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::HasPermission)
    }
}

impl fmt::Display for Permissionship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unspecified => "UNSPECIFIED",
            Self::NoPermission => "NO_PERMISSION",
            Self::HasPermission => "HAS_PERMISSION",
            Self::ConditionalPermission => "CONDITIONAL_PERMISSION",
        };
        write!(f, "{name}")
    }
}

/// `v1.LookupPermissionship`, the per-row permissionship of lookup
/// answers. Displays without the protobuf prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LookupPermissionship {
    #[serde(rename = "LOOKUP_PERMISSIONSHIP_UNSPECIFIED")]
    Unspecified,
    #[serde(rename = "LOOKUP_PERMISSIONSHIP_HAS_PERMISSION")]
    HasPermission,
    #[serde(rename = "LOOKUP_PERMISSIONSHIP_CONDITIONAL_PERMISSION")]
    ConditionalPermission,
}

impl LookupPermissionship {
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::HasPermission)
    }
}

impl fmt::Display for LookupPermissionship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unspecified => "UNSPECIFIED",
            Self::HasPermission => "HAS_PERMISSION",
            Self::ConditionalPermission => "CONDITIONAL_PERMISSION",
        };
        write!(f, "{name}")
    }
}

// =============================================================================
// Streaming
// =============================================================================

/// One document of a streaming response.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct StreamFrame<T> {
    #[serde(default)]
    pub result: Option<T>,
    #[serde(default)]
    pub error: Option<WireStatus>,
}

/// Parse a streaming response body: a sequence of JSON documents, each
/// wrapping a `result` or an `error`. An error document fails the whole
/// call.
pub fn parse_stream_body<T: DeserializeOwned>(body: &str) -> Result<Vec<T>> {
    let mut results = Vec::new();
    for frame in serde_json::Deserializer::from_str(body).into_iter::<StreamFrame<T>>() {
        let frame = frame?;
        if let Some(status) = frame.error {
            return Err(Error::api(format!(
                "{} (code {})",
                status.message, status.code
            )));
        }
        if let Some(result) = frame.result {
            results.push(result);
        }
    }
    Ok(results)
}
