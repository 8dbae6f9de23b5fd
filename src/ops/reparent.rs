use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::model::node::{DropTarget, Node};

/// Why a drop left the list unchanged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    #[error("node dropped on itself")]
    SelfDrop,
    #[error("dragged node not found")]
    UnknownNode,
    #[error("drop target not found")]
    UnknownTarget,
    #[error("node is already at the root")]
    AlreadyRoot,
    #[error("node is already a child of the target")]
    AlreadyChild,
    #[error("target is a descendant of the dragged node")]
    WouldCycle,
}

/// Result of a strict reparent
#[derive(Debug, Clone, PartialEq)]
pub enum ReparentOutcome {
    /// The new canonical flat list
    Applied(Vec<Node>),
    /// Nothing changed; the caller keeps its current list
    Unchanged(Rejection),
}

impl ReparentOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, ReparentOutcome::Applied(_))
    }

    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            ReparentOutcome::Applied(_) => None,
            ReparentOutcome::Unchanged(reason) => Some(*reason),
        }
    }

    /// Resolve to the new list, falling back to a copy of `original` when unchanged
    pub fn into_nodes(self, original: &[Node]) -> Vec<Node> {
        match self {
            ReparentOutcome::Applied(nodes) => nodes,
            ReparentOutcome::Unchanged(_) => original.to_vec(),
        }
    }
}

/// Move `dragged_id` under `target`, silently ignoring invalid drops.
///
/// The returned list is always safe to adopt as the new state: a rejected
/// drop returns the input unchanged.
pub fn reparent(nodes: &[Node], dragged_id: &str, target: &DropTarget) -> Vec<Node> {
    reparent_strict(nodes, dragged_id, target).into_nodes(nodes)
}

/// Move `dragged_id` under `target`, reporting why a drop was rejected.
pub fn reparent_strict(nodes: &[Node], dragged_id: &str, target: &DropTarget) -> ReparentOutcome {
    let outcome = plan(nodes, dragged_id, target).map(|new_parent| {
        nodes
            .iter()
            .map(|node| {
                if node.id == dragged_id {
                    Node {
                        parent_id: new_parent.clone(),
                        ..node.clone()
                    }
                } else {
                    node.clone()
                }
            })
            .collect::<Vec<Node>>()
    });

    match outcome {
        Ok(moved) => {
            tracing::debug!(dragged = dragged_id, target = %target, "reparent applied");
            ReparentOutcome::Applied(moved)
        }
        Err(reason) => {
            tracing::debug!(dragged = dragged_id, target = %target, %reason, "reparent rejected");
            ReparentOutcome::Unchanged(reason)
        }
    }
}

/// Validate a drop and return the dragged node's new parent reference.
fn plan(nodes: &[Node], dragged_id: &str, target: &DropTarget) -> Result<Option<String>, Rejection> {
    if target.as_id() == Some(dragged_id) {
        return Err(Rejection::SelfDrop);
    }

    let parents = parent_map(nodes);
    let current = parents.get(dragged_id).ok_or(Rejection::UnknownNode)?;

    match target {
        DropTarget::Root => {
            if current.is_none() {
                return Err(Rejection::AlreadyRoot);
            }
            Ok(None)
        }
        DropTarget::Node(target_id) => {
            if !parents.contains_key(target_id.as_str()) {
                return Err(Rejection::UnknownTarget);
            }
            if *current == Some(target_id.as_str()) {
                return Err(Rejection::AlreadyChild);
            }
            if is_descendant(&parents, target_id, dragged_id) {
                return Err(Rejection::WouldCycle);
            }
            Ok(Some(target_id.clone()))
        }
    }
}

/// id -> parent reference, first occurrence wins (matching `build_tree`)
fn parent_map(nodes: &[Node]) -> HashMap<&str, Option<&str>> {
    let mut parents = HashMap::with_capacity(nodes.len());
    for node in nodes {
        parents
            .entry(node.id.as_str())
            .or_insert(node.parent_id.as_deref());
    }
    parents
}

/// True when `ancestor` appears on the parent chain of `id`.
///
/// The walk ends at a root, a dangling reference, or an id already seen,
/// so a corrupt list with an existing cycle cannot hang it.
fn is_descendant(parents: &HashMap<&str, Option<&str>>, id: &str, ancestor: &str) -> bool {
    let mut seen = HashSet::new();
    let mut cursor = parents.get(id).copied().flatten();
    while let Some(parent) = cursor {
        if parent == ancestor {
            return true;
        }
        if !seen.insert(parent) {
            return false;
        }
        cursor = parents.get(parent).copied().flatten();
    }
    false
}
