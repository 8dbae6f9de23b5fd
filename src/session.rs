use crate::model::node::{DropEvent, Node};
use crate::model::tree::TreeNode;
use crate::ops::build::build_tree;
use crate::ops::reparent::{Rejection, ReparentOutcome, reparent_strict};

const UNDO_STACK_LIMIT: usize = 500;

/// A single accepted move, enough to replay it in either direction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Move {
    pub id: String,
    pub from: Option<String>,
    pub to: Option<String>,
}

/// The host's state: the canonical flat list plus its derived nested view.
///
/// The list only changes through an accepted drop (or undo/redo of one);
/// the tree is rebuilt from scratch after every change.
#[derive(Debug, Clone)]
pub struct Session {
    nodes: Vec<Node>,
    tree: Vec<TreeNode>,
    undo: Vec<Move>,
    redo: Vec<Move>,
}

impl Session {
    pub fn new(nodes: Vec<Node>) -> Self {
        let tree = build_tree(&nodes);
        Session {
            nodes,
            tree,
            undo: Vec::new(),
            redo: Vec::new(),
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn tree(&self) -> &[TreeNode] {
        &self.tree
    }

    pub fn into_nodes(self) -> Vec<Node> {
        self.nodes
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Apply one drop gesture. State is untouched when the drop is rejected.
    pub fn apply(&mut self, event: &DropEvent) -> Result<(), Rejection> {
        let from = self
            .nodes
            .iter()
            .find(|n| n.id == event.dragged)
            .and_then(|n| n.parent_id.clone());

        match reparent_strict(&self.nodes, &event.dragged, &event.target) {
            ReparentOutcome::Applied(nodes) => {
                tracing::info!(dragged = %event.dragged, target = %event.target, "drop accepted");
                self.nodes = nodes;
                self.tree = build_tree(&self.nodes);
                self.undo.push(Move {
                    id: event.dragged.clone(),
                    from,
                    to: event.target.as_id().map(str::to_string),
                });
                if self.undo.len() > UNDO_STACK_LIMIT {
                    self.undo.drain(..self.undo.len() - UNDO_STACK_LIMIT);
                }
                self.redo.clear();
                Ok(())
            }
            ReparentOutcome::Unchanged(reason) => Err(reason),
        }
    }

    /// Revert the last accepted move. Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(op) = self.undo.pop() else {
            return false;
        };
        self.set_parent(&op.id, op.from.clone());
        tracing::info!(id = %op.id, "undo move");
        self.redo.push(op);
        true
    }

    /// Re-apply the last undone move. Returns false when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(op) = self.redo.pop() else {
            return false;
        };
        self.set_parent(&op.id, op.to.clone());
        tracing::info!(id = %op.id, "redo move");
        self.undo.push(op);
        true
    }

    // History is linear, so restoring a recorded parent always lands on a
    // state that was valid before.
    fn set_parent(&mut self, id: &str, parent: Option<String>) {
        if let Some(node) = self.nodes.iter_mut().find(|n| n.id == id) {
            node.parent_id = parent;
        }
        self.tree = build_tree(&self.nodes);
    }
}
