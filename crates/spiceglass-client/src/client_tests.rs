//! Unit tests for the gateway client and wire types

#[cfg(test)]
mod tests {
    use serde_json::json;

    use spiceglass_core::error::Error;
    use spiceglass_core::reference::{PermissionQuery, Relationship};
    use spiceglass_core::tree::{PermissionTree, SetOperation, TreeType};

    use crate::client::{convert_bulk_pairs, BulkCheckResult};
    use crate::wire::{
        parse_stream_body, BulkCheckItem, BulkCheckPair, BulkExportRequest,
        CheckPermissionRequest, ExpandPermissionTreeResponse, LookupPermissionship,
        Permissionship, ReadRelationshipsRequest, ReadRelationshipsResult, RelationshipFilter,
        RelationshipUpdate, WireRelationship, WireStatus, WireTreeNode,
        WriteRelationshipsRequest, OPERATION_TOUCH,
    };

    fn query(s: &str) -> PermissionQuery {
        s.parse().unwrap()
    }

    #[test]
    fn test_check_request_body() {
        let request =
            CheckPermissionRequest::from(&query("starship_system:enterprise_bridge#operate@user:picard"));

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "resource": {
                    "objectType": "starship_system",
                    "objectId": "enterprise_bridge",
                },
                "permission": "operate",
                "subject": {
                    "object": {
                        "objectType": "user",
                        "objectId": "picard",
                    },
                },
            })
        );
    }

    #[test]
    fn test_check_request_body_with_subject_relation() {
        let request = CheckPermissionRequest::from(&query(
            "starship_system:sickbay#role@starship_role:starfleet#user",
        ));

        assert_eq!(
            serde_json::to_value(&request).unwrap()["subject"],
            json!({
                "object": {
                    "objectType": "starship_role",
                    "objectId": "starfleet",
                },
                "optionalRelation": "user",
            })
        );
    }

    #[test]
    fn test_write_relationships_body_uses_touch() {
        let relationship: Relationship = "starship_role:captain#user@user:picard".parse().unwrap();
        let request = WriteRelationshipsRequest {
            updates: vec![RelationshipUpdate {
                operation: OPERATION_TOUCH.to_string(),
                relationship: (&relationship).into(),
            }],
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "updates": [
                    {
                        "operation": "OPERATION_TOUCH",
                        "relationship": {
                            "resource": {
                                "objectType": "starship_role",
                                "objectId": "captain",
                            },
                            "relation": "user",
                            "subject": {
                                "object": {
                                    "objectType": "user",
                                    "objectId": "picard",
                                },
                            },
                        },
                    },
                ],
            })
        );
    }

    #[test]
    fn test_read_relationships_request_body() {
        let request = ReadRelationshipsRequest {
            relationship_filter: RelationshipFilter {
                resource_type: "starship".to_string(),
            },
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({ "relationshipFilter": { "resourceType": "starship" } })
        );
    }

    #[test]
    fn test_bulk_export_request_body() {
        let request = BulkExportRequest { optional_limit: 100 };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({ "optionalLimit": 100 })
        );
    }

    #[test]
    fn test_wire_relationship_round_trip() {
        let input = "starship_system:enterprise_bridge#role@starship_role:captain#user";
        let relationship: Relationship = input.parse().unwrap();
        let wire = WireRelationship::from(&relationship);
        let back = Relationship::from(wire);
        assert_eq!(back.to_string(), input);
    }

    #[test]
    fn test_permissionship_decode_and_display() {
        let permissionship: Permissionship =
            serde_json::from_value(json!("PERMISSIONSHIP_HAS_PERMISSION")).unwrap();
        assert_eq!(permissionship, Permissionship::HasPermission);
        assert_eq!(permissionship.to_string(), "HAS_PERMISSION");
        assert!(permissionship.is_granted());

        let permissionship: Permissionship =
            serde_json::from_value(json!("PERMISSIONSHIP_NO_PERMISSION")).unwrap();
        assert_eq!(permissionship.to_string(), "NO_PERMISSION");
        assert!(!permissionship.is_granted());

        let permissionship: Permissionship =
            serde_json::from_value(json!("PERMISSIONSHIP_CONDITIONAL_PERMISSION")).unwrap();
        assert_eq!(permissionship.to_string(), "CONDITIONAL_PERMISSION");
        assert!(!permissionship.is_granted());
    }

    #[test]
    fn test_lookup_permissionship_decode_and_display() {
        let permissionship: LookupPermissionship =
            serde_json::from_value(json!("LOOKUP_PERMISSIONSHIP_HAS_PERMISSION")).unwrap();
        assert_eq!(permissionship, LookupPermissionship::HasPermission);
        assert_eq!(permissionship.to_string(), "HAS_PERMISSION");
        assert!(permissionship.is_granted());
    }

    #[test]
    fn test_decode_expand_response() {
        let payload = json!({
            "expandedAt": { "token": "GhUKEzE3MDAwMDAwMDAwMDAwMDAwMDA=" },
            "treeRoot": {
                "expandedObject": {
                    "objectType": "starship_system",
                    "objectId": "enterprise_bridge",
                },
                "expandedRelation": "operate",
                "intermediate": {
                    "operation": "OPERATION_INTERSECTION",
                    "children": [
                        {
                            "expandedObject": {
                                "objectType": "starship_system",
                                "objectId": "enterprise_bridge",
                            },
                            "expandedRelation": "role",
                            "leaf": {
                                "subjects": [
                                    {
                                        "object": {
                                            "objectType": "starship_role",
                                            "objectId": "captain",
                                        },
                                        "optionalRelation": "user",
                                    },
                                ],
                            },
                        },
                        {
                            "expandedObject": {
                                "objectType": "starship",
                                "objectId": "enterprise",
                            },
                            "expandedRelation": "crew",
                            "leaf": {
                                "subjects": [
                                    {
                                        "object": {
                                            "objectType": "user",
                                            "objectId": "picard",
                                        },
                                    },
                                ],
                            },
                        },
                    ],
                },
            },
        });

        let response: ExpandPermissionTreeResponse = serde_json::from_value(payload).unwrap();
        let tree = PermissionTree::try_from(response.tree_root.unwrap()).unwrap();

        assert_eq!(tree.expanded_object.to_string(), "starship_system:enterprise_bridge");
        assert_eq!(tree.expanded_relation, "operate");
        match tree.tree {
            TreeType::Intermediate {
                operation,
                children,
            } => {
                assert_eq!(operation, SetOperation::Intersection);
                assert_eq!(children.len(), 2);
                match &children[0].tree {
                    TreeType::Leaf { subjects } => {
                        assert_eq!(subjects.len(), 1);
                        assert_eq!(subjects[0].to_string(), "starship_role:captain#user");
                        assert!(subjects[0].is_indirect());
                    }
                    other => panic!("expected leaf, got {other:?}"),
                }
                match &children[1].tree {
                    TreeType::Leaf { subjects } => {
                        assert_eq!(subjects[0].to_string(), "user:picard");
                        assert!(!subjects[0].is_indirect());
                    }
                    other => panic!("expected leaf, got {other:?}"),
                }
            }
            other => panic!("expected intermediate, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_rejects_missing_expanded_object() {
        let node: WireTreeNode = serde_json::from_value(json!({
            "expandedRelation": "operate",
            "leaf": { "subjects": [] },
        }))
        .unwrap();

        let error = PermissionTree::try_from(node).unwrap_err();
        assert!(matches!(error, Error::MalformedTree(_)));
        assert!(error.to_string().contains("expandedObject"));
    }

    #[test]
    fn test_decode_rejects_both_payloads() {
        let node: WireTreeNode = serde_json::from_value(json!({
            "expandedObject": { "objectType": "a", "objectId": "b" },
            "expandedRelation": "c",
            "leaf": { "subjects": [] },
            "intermediate": { "operation": "OPERATION_UNION", "children": [] },
        }))
        .unwrap();

        let error = PermissionTree::try_from(node).unwrap_err();
        assert!(error.to_string().contains("both leaf and intermediate"));
    }

    #[test]
    fn test_decode_rejects_neither_payload() {
        let node: WireTreeNode = serde_json::from_value(json!({
            "expandedObject": { "objectType": "a", "objectId": "b" },
            "expandedRelation": "c",
        }))
        .unwrap();

        let error = PermissionTree::try_from(node).unwrap_err();
        assert!(error.to_string().contains("neither leaf nor intermediate"));
    }

    #[test]
    fn test_decode_rejects_unspecified_operation() {
        let node: WireTreeNode = serde_json::from_value(json!({
            "expandedObject": { "objectType": "a", "objectId": "b" },
            "expandedRelation": "c",
            "intermediate": { "operation": "OPERATION_UNSPECIFIED", "children": [] },
        }))
        .unwrap();

        let error = PermissionTree::try_from(node).unwrap_err();
        assert!(error.to_string().contains("OPERATION_UNSPECIFIED"));
    }

    #[test]
    fn test_parse_stream_body_collects_results() {
        let body = concat!(
            r#"{"result":{"relationship":{"resource":{"objectType":"starship","objectId":"enterprise"},"relation":"crew_member","subject":{"object":{"objectType":"user","objectId":"picard"}}}}}"#,
            "\n",
            r#"{"result":{"relationship":{"resource":{"objectType":"starship","objectId":"enterprise"},"relation":"crew_member","subject":{"object":{"objectType":"user","objectId":"wesley"}}}}}"#,
            "\n",
        );

        let results: Vec<ReadRelationshipsResult> = parse_stream_body(body).unwrap();
        let relationships: Vec<String> = results
            .into_iter()
            .map(|result| Relationship::from(result.relationship).to_string())
            .collect();

        assert_eq!(
            relationships,
            vec![
                "starship:enterprise#crew_member@user:picard",
                "starship:enterprise#crew_member@user:wesley",
            ]
        );
    }

    #[test]
    fn test_parse_stream_body_error_frame_fails_the_call() {
        let body = concat!(
            r#"{"result":{"relationship":{"resource":{"objectType":"starship","objectId":"enterprise"},"relation":"crew_member","subject":{"object":{"objectType":"user","objectId":"picard"}}}}}"#,
            "\n",
            r#"{"error":{"code":7,"message":"permission denied","details":[]}}"#,
            "\n",
        );

        let error = parse_stream_body::<ReadRelationshipsResult>(body).unwrap_err();
        assert!(matches!(error, Error::Api(_)));
        assert!(error.to_string().contains("permission denied"));
        assert!(error.to_string().contains("code 7"));
    }

    #[test]
    fn test_parse_stream_body_rejects_garbage() {
        let error = parse_stream_body::<ReadRelationshipsResult>("not json").unwrap_err();
        assert!(matches!(error, Error::Json(_)));
    }

    #[test]
    fn test_parse_stream_body_empty_is_empty() {
        let results: Vec<ReadRelationshipsResult> = parse_stream_body("").unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_convert_bulk_pairs() {
        let pairs = vec![
            BulkCheckPair {
                request: CheckPermissionRequest::from(&query(
                    "starship_role:captain#user@user:picard",
                )),
                item: Some(BulkCheckItem {
                    permissionship: Permissionship::HasPermission,
                }),
                error: None,
            },
            BulkCheckPair {
                request: CheckPermissionRequest::from(&query(
                    "starship_system:sickbay#operate@user:q",
                )),
                item: None,
                error: Some(WireStatus {
                    code: 5,
                    message: "object not found".to_string(),
                }),
            },
        ];

        let outcomes = convert_bulk_pairs(pairs).unwrap();

        assert_eq!(outcomes.len(), 2);
        assert_eq!(
            outcomes[0].query.to_string(),
            "starship_role:captain#user@user:picard"
        );
        assert!(matches!(
            outcomes[0].result,
            BulkCheckResult::Permissionship(Permissionship::HasPermission)
        ));
        match &outcomes[1].result {
            BulkCheckResult::ServiceError { code, message } => {
                assert_eq!(*code, 5);
                assert_eq!(message, "object not found");
            }
            other => panic!("expected service error, got {other:?}"),
        }
    }

    #[test]
    fn test_convert_bulk_pairs_rejects_empty_pair() {
        let pairs = vec![BulkCheckPair {
            request: CheckPermissionRequest::from(&query(
                "starship_role:captain#user@user:picard",
            )),
            item: None,
            error: None,
        }];

        let error = convert_bulk_pairs(pairs).unwrap_err();
        assert!(error
            .to_string()
            .contains("starship_role:captain#user@user:picard"));
    }
}
