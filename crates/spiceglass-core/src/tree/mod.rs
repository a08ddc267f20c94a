//! Permission tree model and simplification
//!
//! An expand call answers with a tree describing who holds a permission
//! and through which set algebra. [`PermissionTree`] is that answer in
//! its raw shape. [`simplify_tree`] folds it into the much smaller
//! [`SimplifiedTree`], chasing indirect subjects through a
//! [`TreeExpander`] so the final tree bottoms out in plain subjects.

pub mod simplify;


pub use simplify::{simplify_tree, TreeExpander};

use serde::{Deserialize, Serialize};

use crate::reference::{ObjectRef, SubjectRef};

/// Set algebra combining the children of an intermediate tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SetOperation {
    Union,
    Intersection,
    Exclusion,
}

impl SetOperation {
    /// Lower-case name, as rendered on graph operator nodes.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Union => "union",
            Self::Intersection => "intersection",
            Self::Exclusion => "exclusion",
        }
    }
}

impl std::fmt::Display for SetOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Union => "UNION",
            Self::Intersection => "INTERSECTION",
            Self::Exclusion => "EXCLUSION",
        };
        write!(f, "{name}")
    }
}

/// One node of a raw permission expansion.
///
/// Every node names the object/relation pair it expands; the payload is
/// either a leaf holding subjects or an intermediate combining child
/// expansions under a [`SetOperation`].
#[derive(Debug, Clone, PartialEq)]
pub struct PermissionTree {
    pub expanded_object: ObjectRef,
    pub expanded_relation: String,
    pub tree: TreeType,
}

/// Payload of a [`PermissionTree`] node.
#[derive(Debug, Clone, PartialEq)]
pub enum TreeType {
    Leaf {
        subjects: Vec<SubjectRef>,
    },
    Intermediate {
        operation: SetOperation,
        children: Vec<PermissionTree>,
    },
}

impl PermissionTree {
    /// Build a leaf node.
    pub fn leaf(
        expanded_object: ObjectRef,
        expanded_relation: impl Into<String>,
        subjects: Vec<SubjectRef>,
    ) -> Self {
        Self {
            expanded_object,
            expanded_relation: expanded_relation.into(),
            tree: TreeType::Leaf { subjects },
        }
    }

    /// Build an intermediate node.
    pub fn intermediate(
        expanded_object: ObjectRef,
        expanded_relation: impl Into<String>,
        operation: SetOperation,
        children: Vec<PermissionTree>,
    ) -> Self {
        Self {
            expanded_object,
            expanded_relation: expanded_relation.into(),
            tree: TreeType::Intermediate {
                operation,
                children,
            },
        }
    }
}

/// A simplified permission tree.
///
/// `subjects` holds canonical reference strings of direct subjects;
/// `children` holds nested trees that arrived either as intermediate
/// children or as resolved indirect subjects. In the JSON form the
/// `operation` key is absent (not `null`) when there is no operation,
/// and empty `subjects`/`children` are omitted entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimplifiedTree {
    pub relation: String,
    pub object: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<SetOperation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subjects: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SimplifiedTree>,
}

impl SimplifiedTree {
    /// Build a tree with just a relation and object; callers fill in the
    /// rest field by field.
    pub fn new(relation: impl Into<String>, object: impl Into<String>) -> Self {
        Self {
            relation: relation.into(),
            object: object.into(),
            operation: None,
            subjects: Vec::new(),
            children: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_set_operation_serde_form() {
        assert_eq!(serde_json::to_value(SetOperation::Union).unwrap(), json!("UNION"));
        assert_eq!(
            serde_json::to_value(SetOperation::Intersection).unwrap(),
            json!("INTERSECTION")
        );
        assert_eq!(
            serde_json::to_value(SetOperation::Exclusion).unwrap(),
            json!("EXCLUSION")
        );
        let operation: SetOperation = serde_json::from_value(json!("EXCLUSION")).unwrap();
        assert_eq!(operation, SetOperation::Exclusion);
    }

    #[test]
    fn test_set_operation_labels() {
        assert_eq!(SetOperation::Union.label(), "union");
        assert_eq!(SetOperation::Intersection.label(), "intersection");
        assert_eq!(SetOperation::Exclusion.label(), "exclusion");
        assert_eq!(SetOperation::Union.to_string(), "UNION");
    }

    #[test]
    fn test_simplified_tree_omits_empty_fields() {
        let mut tree = SimplifiedTree::new("operate", "starship_system:enterprise_bridge");
        tree.subjects.push("user:picard".to_string());

        let value = serde_json::to_value(&tree).unwrap();
        assert_eq!(
            value,
            json!({
                "relation": "operate",
                "object": "starship_system:enterprise_bridge",
                "subjects": ["user:picard"],
            })
        );
        let object = value.as_object().unwrap();
        assert!(!object.contains_key("operation"));
        assert!(!object.contains_key("children"));
    }

    #[test]
    fn test_simplified_tree_round_trips() {
        let mut child = SimplifiedTree::new("user", "starship_role:captain");
        child.subjects.push("user:picard".to_string());
        let mut tree = SimplifiedTree::new("operate", "starship_system:phasers");
        tree.operation = Some(SetOperation::Intersection);
        tree.children.push(child);

        let encoded = serde_json::to_string(&tree).unwrap();
        let decoded: SimplifiedTree = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, tree);
    }
}
