use serde::Serialize;

/// A node of the nested view. Derived from the flat list, never edited directly.
///
/// Every walk over the view uses an explicit stack, so a parent chain of any
/// depth is safe to build, compare, clone and drop.
#[derive(Debug, Serialize)]
pub struct TreeNode {
    pub id: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub disabled: bool,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn new(id: impl Into<String>) -> Self {
        TreeNode {
            id: id.into(),
            disabled: false,
            children: Vec::new(),
        }
    }

    pub fn child(mut self, child: TreeNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of nodes in this subtree, including self
    pub fn size(&self) -> usize {
        let mut total = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            total += 1;
            stack.extend(&node.children);
        }
        total
    }

    /// Height of this subtree (a leaf has depth 1)
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack = vec![(self, 1)];
        while let Some((node, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            stack.extend(node.children.iter().map(|c| (c, depth + 1)));
        }
        max_depth
    }
}

impl Drop for TreeNode {
    fn drop(&mut self) {
        // Detach descendants first so no child is dropped while holding its own subtree
        let mut stack = std::mem::take(&mut self.children);
        while let Some(mut node) = stack.pop() {
            stack.append(&mut node.children);
        }
    }
}

impl Clone for TreeNode {
    fn clone(&self) -> Self {
        // Post-order: a node is rebuilt once all of its children have been
        let mut done: Vec<TreeNode> = Vec::new();
        let mut stack = vec![(self, false)];
        while let Some((node, expanded)) = stack.pop() {
            if expanded {
                let children = done.split_off(done.len() - node.children.len());
                done.push(TreeNode {
                    id: node.id.clone(),
                    disabled: node.disabled,
                    children,
                });
            } else {
                stack.push((node, true));
                stack.extend(node.children.iter().rev().map(|c| (c, false)));
            }
        }
        done.pop().unwrap_or_else(|| TreeNode::new(self.id.clone()))
    }
}

impl PartialEq for TreeNode {
    fn eq(&self, other: &Self) -> bool {
        let mut stack = vec![(self, other)];
        while let Some((a, b)) = stack.pop() {
            if a.id != b.id || a.disabled != b.disabled || a.children.len() != b.children.len() {
                return false;
            }
            stack.extend(a.children.iter().zip(&b.children));
        }
        true
    }
}

impl Eq for TreeNode {}

/// Find a node anywhere in the forest (pre-order, first match)
pub fn find<'a>(roots: &'a [TreeNode], id: &str) -> Option<&'a TreeNode> {
    let mut stack: Vec<&TreeNode> = roots.iter().rev().collect();
    while let Some(node) = stack.pop() {
        if node.id == id {
            return Some(node);
        }
        stack.extend(node.children.iter().rev());
    }
    None
}

/// Walk the forest pre-order, yielding each id with its parent id.
pub fn flatten(roots: &[TreeNode]) -> Vec<(String, Option<String>)> {
    let mut out = Vec::new();
    let mut stack: Vec<(&TreeNode, Option<&str>)> = roots.iter().rev().map(|r| (r, None)).collect();
    while let Some((node, parent)) = stack.pop() {
        out.push((node.id.clone(), parent.map(str::to_string)));
        stack.extend(node.children.iter().rev().map(|c| (c, Some(node.id.as_str()))));
    }
    out
}

/// Total node count across the forest
pub fn count(roots: &[TreeNode]) -> usize {
    roots.iter().map(TreeNode::size).sum()
}

/// Height of the forest (0 when empty)
pub fn max_depth(roots: &[TreeNode]) -> usize {
    roots.iter().map(TreeNode::depth).max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Vec<TreeNode> {
        vec![
            TreeNode::new("0")
                .child(TreeNode::new("1"))
                .child(TreeNode::new("2").child(TreeNode::new("4"))),
            TreeNode::new("9"),
        ]
    }

    /// `n0 -> n1 -> ... -> n{len-1}`, built without recursion
    fn chain(len: usize) -> TreeNode {
        let mut node = TreeNode::new(format!("n{}", len - 1));
        for i in (0..len - 1).rev() {
            node = TreeNode::new(format!("n{}", i)).child(node);
        }
        node
    }

    #[test]
    fn test_flatten_pre_order_with_parents() {
        let flat = flatten(&sample());
        assert_eq!(
            flat,
            vec![
                ("0".to_string(), None),
                ("1".to_string(), Some("0".to_string())),
                ("2".to_string(), Some("0".to_string())),
                ("4".to_string(), Some("2".to_string())),
                ("9".to_string(), None),
            ]
        );
    }

    #[test]
    fn test_size_depth_count() {
        let roots = sample();
        assert_eq!(roots[0].size(), 4);
        assert_eq!(roots[0].depth(), 3);
        assert_eq!(roots[1].depth(), 1);
        assert!(roots[1].is_leaf());
        assert_eq!(count(&roots), 5);
        assert_eq!(max_depth(&roots), 3);
        assert_eq!(max_depth(&[]), 0);
    }

    #[test]
    fn test_find() {
        let roots = sample();
        assert_eq!(find(&roots, "4").map(|n| n.id.as_str()), Some("4"));
        assert_eq!(find(&roots, "2").map(|n| n.children.len()), Some(1));
        assert!(find(&roots, "nope").is_none());
    }

    #[test]
    fn test_clone_and_eq_keep_shape() {
        let roots = sample();
        let copy = roots.clone();
        assert_eq!(copy, roots);
        assert_eq!(flatten(&copy), flatten(&roots));

        let other = vec![TreeNode::new("0").child(TreeNode::new("1")), TreeNode::new("9")];
        assert_ne!(other, roots);
    }

    #[test]
    fn test_deep_chain_walks_without_overflow() {
        let len = 200_000;
        let root = chain(len);
        assert_eq!(root.size(), len);
        assert_eq!(root.depth(), len);

        let roots = vec![root];
        let last = format!("n{}", len - 1);
        assert!(find(&roots, &last).is_some_and(|n| n.is_leaf()));
        let flat = flatten(&roots);
        assert_eq!(flat.len(), len);
        assert_eq!(flat[len - 1].1.as_deref(), Some(format!("n{}", len - 2).as_str()));

        let copy = roots.clone();
        assert!(copy == roots);
        drop(copy);
        drop(roots);
    }

    #[test]
    fn test_json_omits_enabled_flag() {
        let json = serde_json::to_string(&TreeNode::new("1")).unwrap();
        assert_eq!(json, r#"{"id":"1","children":[]}"#);
    }
}
