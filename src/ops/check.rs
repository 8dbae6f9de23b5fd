use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::model::node::Node;

/// Structured result from `arbor check`, suitable for --json output.
#[derive(Debug, Default, Serialize)]
pub struct CheckResult {
    pub valid: bool,
    pub errors: Vec<CheckError>,
    pub warnings: Vec<CheckWarning>,
}

/// A structural error (the list violates an invariant).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum CheckError {
    /// The same id appears more than once
    #[serde(rename = "duplicate_id")]
    DuplicateId { id: String, count: usize },
    /// A node names itself as its parent
    #[serde(rename = "self_parent")]
    SelfParent { id: String },
    /// Parent references loop back on themselves; none of these nodes is displayed
    #[serde(rename = "cycle")]
    Cycle { ids: Vec<String> },
}

/// A non-critical issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum CheckWarning {
    /// Parent id does not exist; the node is displayed as a root
    #[serde(rename = "dangling_parent")]
    DanglingParent { id: String, parent_id: String },
}

impl std::fmt::Display for CheckError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckError::DuplicateId { id, count } => {
                write!(f, "duplicate id {} ({} occurrences)", id, count)
            }
            CheckError::SelfParent { id } => write!(f, "{} is its own parent", id),
            CheckError::Cycle { ids } => write!(f, "parent cycle: {}", ids.join(" -> ")),
        }
    }
}

impl std::fmt::Display for CheckWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckWarning::DanglingParent { id, parent_id } => {
                write!(f, "{} has unknown parent {} (shown as root)", id, parent_id)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Main check entry point
// ---------------------------------------------------------------------------

/// Validate a flat list and return structured results.
///
/// Read-only. Checks performed:
/// 1. No duplicate ids
/// 2. No node is its own parent
/// 3. No parent cycles (each reported once)
/// 4. Warnings for parent references that do not resolve
pub fn check_nodes(nodes: &[Node]) -> CheckResult {
    let mut result = CheckResult::default();

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for node in nodes {
        *counts.entry(node.id.as_str()).or_insert(0) += 1;
    }
    let mut reported = HashSet::new();
    for node in nodes {
        let count = counts[node.id.as_str()];
        if count > 1 && reported.insert(node.id.as_str()) {
            result.errors.push(CheckError::DuplicateId {
                id: node.id.clone(),
                count,
            });
        }
    }

    for node in nodes {
        match node.parent_id.as_deref() {
            Some(parent) if parent == node.id => {
                result
                    .errors
                    .push(CheckError::SelfParent { id: node.id.clone() });
            }
            Some(parent) if !counts.contains_key(parent) => {
                result.warnings.push(CheckWarning::DanglingParent {
                    id: node.id.clone(),
                    parent_id: parent.to_string(),
                });
            }
            _ => {}
        }
    }

    for ids in find_cycles(nodes) {
        result.errors.push(CheckError::Cycle { ids });
    }

    result.valid = result.errors.is_empty();
    result
}

// ---------------------------------------------------------------------------
// Cycle detection
// ---------------------------------------------------------------------------

/// Find every parent cycle longer than one node.
///
/// Each node has a single parent, so following parents from any start either
/// reaches a root, dangles, or enters exactly one cycle. Nodes are coloured as
/// they are walked; a walk that meets a node on its own path has found a new
/// cycle, a walk that meets a finished node stops.
fn find_cycles(nodes: &[Node]) -> Vec<Vec<String>> {
    let mut parents: HashMap<&str, Option<&str>> = HashMap::new();
    let mut first_index: HashMap<&str, usize> = HashMap::new();
    for (i, node) in nodes.iter().enumerate() {
        parents
            .entry(node.id.as_str())
            .or_insert(node.parent_id.as_deref());
        first_index.entry(node.id.as_str()).or_insert(i);
    }

    let mut done: HashSet<&str> = HashSet::new();
    let mut cycles = Vec::new();

    for node in nodes {
        let mut path: Vec<&str> = Vec::new();
        let mut on_path: HashMap<&str, usize> = HashMap::new();
        let mut cursor = Some(node.id.as_str());

        while let Some(id) = cursor {
            if done.contains(id) {
                break;
            }
            if let Some(&start) = on_path.get(id) {
                let cycle = &path[start..];
                // Self-parents are reported separately
                if cycle.len() > 1 {
                    // The walk may have entered through a tail; start at the first-listed member
                    let lead = (0..cycle.len())
                        .min_by_key(|&k| first_index[cycle[k]])
                        .unwrap_or(0);
                    cycles.push(
                        cycle[lead..]
                            .iter()
                            .chain(&cycle[..lead])
                            .map(|s| s.to_string())
                            .collect(),
                    );
                }
                break;
            }
            on_path.insert(id, path.len());
            path.push(id);
            cursor = parents.get(id).copied().flatten();
            // Dangling parents end the walk
            if let Some(next) = cursor {
                if !parents.contains_key(next) {
                    cursor = None;
                }
            }
        }

        done.extend(path);
    }

    cycles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::node::demo_seed;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_demo_seed_is_valid() {
        let result = check_nodes(&demo_seed());
        assert!(result.valid);
        assert!(result.errors.is_empty());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_duplicate_id_reported_once() {
        let nodes = vec![Node::new("a"), Node::new("b"), Node::new("a"), Node::new("a")];
        let result = check_nodes(&nodes);
        assert!(!result.valid);
        assert_eq!(
            result.errors,
            vec![CheckError::DuplicateId {
                id: "a".into(),
                count: 3
            }]
        );
    }

    #[test]
    fn test_self_parent() {
        let nodes = vec![Node::with_parent("a", "a")];
        let result = check_nodes(&nodes);
        assert_eq!(result.errors, vec![CheckError::SelfParent { id: "a".into() }]);
    }

    #[test]
    fn test_dangling_parent_is_warning() {
        let nodes = vec![Node::new("0"), Node::with_parent("1", "ghost")];
        let result = check_nodes(&nodes);
        assert!(result.valid);
        assert_eq!(
            result.warnings,
            vec![CheckWarning::DanglingParent {
                id: "1".into(),
                parent_id: "ghost".into()
            }]
        );
    }

    #[test]
    fn test_cycle_reported_once_in_chain_order() {
        let nodes = vec![
            Node::new("root"),
            Node::with_parent("a", "c"),
            Node::with_parent("b", "a"),
            Node::with_parent("c", "b"),
            // hangs off the cycle without being part of it
            Node::with_parent("tail", "b"),
        ];
        let result = check_nodes(&nodes);
        assert!(!result.valid);
        assert_eq!(
            result.errors,
            vec![CheckError::Cycle {
                ids: vec!["a".into(), "c".into(), "b".into()]
            }]
        );
    }

    #[test]
    fn test_cycle_starts_at_first_listed_member_when_tail_comes_first() {
        let nodes = vec![
            Node::with_parent("tail", "b"),
            Node::with_parent("a", "c"),
            Node::with_parent("b", "a"),
            Node::with_parent("c", "b"),
        ];
        let result = check_nodes(&nodes);
        assert_eq!(
            result.errors,
            vec![CheckError::Cycle {
                ids: vec!["a".into(), "c".into(), "b".into()]
            }]
        );
    }

    #[test]
    fn test_deep_chain_checks_clean() {
        let mut nodes = vec![Node::new("n0")];
        for i in 1..200_000 {
            nodes.push(Node::with_parent(format!("n{}", i), format!("n{}", i - 1)));
        }
        assert!(check_nodes(&nodes).valid);
    }

    #[test]
    fn test_two_separate_cycles() {
        let nodes = vec![
            Node::with_parent("a", "b"),
            Node::with_parent("b", "a"),
            Node::with_parent("x", "y"),
            Node::with_parent("y", "x"),
        ];
        let result = check_nodes(&nodes);
        assert_eq!(result.errors.len(), 2);
    }

    #[test]
    fn test_json_shape() {
        let nodes = vec![Node::with_parent("1", "ghost")];
        let json = serde_json::to_value(check_nodes(&nodes)).unwrap();
        assert_eq!(json["valid"], serde_json::json!(true));
        assert_eq!(json["warnings"][0]["type"], "dangling_parent");
        assert_eq!(json["warnings"][0]["parent_id"], "ghost");
    }

    #[test]
    fn test_display_messages() {
        let err = CheckError::Cycle {
            ids: vec!["a".into(), "b".into()],
        };
        assert_eq!(err.to_string(), "parent cycle: a -> b");
        let warn = CheckWarning::DanglingParent {
            id: "1".into(),
            parent_id: "ghost".into(),
        };
        assert_eq!(warn.to_string(), "1 has unknown parent ghost (shown as root)");
    }
}
