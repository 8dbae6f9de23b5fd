use std::collections::HashMap;

use crate::model::node::Node;
use crate::model::tree::TreeNode;

/// Build the nested view from the flat list.
///
/// Two passes over the input: the first indexes every id, the second
/// attaches each node to its parent's child list (or to the roots when the
/// parent is absent or dangling). A child listed before its parent is
/// therefore still attached. Children keep the relative order of the flat
/// list.
///
/// Only nodes reachable from a root are emitted. A node trapped in a parent
/// cycle always resolves to a parent, so it is never a root and is left out
/// rather than looping; `check::check_nodes` reports such nodes.
pub fn build_tree(nodes: &[Node]) -> Vec<TreeNode> {
    // First occurrence wins for duplicate ids
    let mut index: HashMap<&str, usize> = HashMap::with_capacity(nodes.len());
    for (i, node) in nodes.iter().enumerate() {
        index.entry(node.id.as_str()).or_insert(i);
    }

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
    let mut roots: Vec<usize> = Vec::new();
    for (i, node) in nodes.iter().enumerate() {
        match node.parent_id.as_deref().and_then(|p| index.get(p)) {
            Some(&parent) => children[parent].push(i),
            None => roots.push(i),
        }
    }

    // Post-order over an explicit stack: a node is assembled only after all
    // of its children, so depth never grows the call stack.
    let mut built: Vec<Option<TreeNode>> = Vec::with_capacity(nodes.len());
    built.resize_with(nodes.len(), || None);
    let mut stack: Vec<(usize, bool)> = roots.iter().rev().map(|&i| (i, false)).collect();
    while let Some((i, expanded)) = stack.pop() {
        if expanded {
            let kids: Vec<TreeNode> = children[i]
                .iter()
                .filter_map(|&c| built[c].take())
                .collect();
            built[i] = Some(TreeNode {
                id: nodes[i].id.clone(),
                disabled: nodes[i].disabled,
                children: kids,
            });
        } else {
            stack.push((i, true));
            stack.extend(children[i].iter().map(|&c| (c, false)));
        }
    }

    roots.into_iter().filter_map(|i| built[i].take()).collect()
}
