//! Folding raw permission trees into simplified ones

use async_trait::async_trait;
use futures::future::BoxFuture;
use tracing::debug;

use crate::error::Result;
use crate::reference::ObjectRef;
use crate::tree::{PermissionTree, SetOperation, SimplifiedTree, TreeType};

/// Resolves the expansion of a permission on an object.
///
/// The simplifier calls back through this trait whenever a leaf holds an
/// indirect subject (one carrying a relation), so nested subject sets can
/// be expanded in turn. `Ok(None)` means the resolver has no expansion
/// for the pair, which contributes nothing to the simplified tree.
#[async_trait]
pub trait TreeExpander: Send + Sync {
    async fn expand(&self, object: &ObjectRef, permission: &str)
        -> Result<Option<PermissionTree>>;
}

/// Simplify a raw permission tree.
///
/// Leaf subjects split two ways: direct subjects become canonical
/// reference strings in `subjects`, while indirect subjects are expanded
/// through `expander` and their simplified trees appended to `children`,
/// both in source order. Intermediate nodes simplify each child in
/// sequence; a UNION left with exactly one child collapses to that child,
/// dropping the wrapper node. INTERSECTION and EXCLUSION never collapse,
/// whatever their child count.
///
/// The first resolver failure aborts the whole simplification; there are
/// no partial results.
pub async fn simplify_tree<E>(
    expander: &E,
    tree: Option<&PermissionTree>,
) -> Result<Option<SimplifiedTree>>
where
    E: TreeExpander + ?Sized,
{
    match tree {
        Some(node) => Ok(Some(simplify_node(expander, node).await?)),
        None => Ok(None),
    }
}

// Recursion goes through a boxed future: the recursive call sites (child
// nodes and resolver results) would otherwise make the future type
// infinitely sized.
fn simplify_node<'a, E>(
    expander: &'a E,
    node: &'a PermissionTree,
) -> BoxFuture<'a, Result<SimplifiedTree>>
where
    E: TreeExpander + ?Sized,
{
    Box::pin(async move {
        let mut operation = None;
        let mut subjects = Vec::new();
        let mut children = Vec::new();

        match &node.tree {
            TreeType::Leaf {
                subjects: leaf_subjects,
            } => {
                for subject in leaf_subjects {
                    match subject.relation() {
                        Some(relation) => {
                            debug!(subject = %subject, "expanding indirect subject");
                            let expanded = expander.expand(subject.object(), relation).await?;
                            if let Some(child) = simplify_tree(expander, expanded.as_ref()).await? {
                                children.push(child);
                            }
                        }
                        None => subjects.push(subject.to_string()),
                    }
                }
            }
            TreeType::Intermediate {
                operation: node_operation,
                children: node_children,
            } => {
                for child in node_children {
                    children.push(simplify_node(expander, child).await?);
                }
                if *node_operation == SetOperation::Union && children.len() == 1 {
                    if let Some(only_child) = children.pop() {
                        return Ok(only_child);
                    }
                }
                operation = Some(*node_operation);
            }
        }

        Ok(SimplifiedTree {
            relation: node.expanded_relation.clone(),
            object: node.expanded_object.to_string(),
            operation,
            subjects,
            children,
        })
    })
}
