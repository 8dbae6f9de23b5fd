use serde::Serialize;

use crate::model::config::{DisplayConfig, TreeStyle};
use crate::model::node::Node;
use crate::model::tree::{TreeNode, max_depth};
use crate::ops::reparent::Rejection;

/// Nesting limit for `--json` tree output. serde serializes nested values
/// recursively, so deeper views are refused instead of exhausting the stack.
pub const MAX_JSON_DEPTH: usize = 512;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct MoveJson {
    pub dragged: String,
    pub target: Option<String>,
    pub applied: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection: Option<Rejection>,
}

#[derive(Serialize)]
pub struct ReplayJson {
    pub moves: Vec<MoveJson>,
    pub tree: Vec<TreeNode>,
}

/// Refuse trees too deep for the recursive JSON serializer.
pub fn check_json_depth(roots: &[TreeNode]) -> Result<(), String> {
    let depth = max_depth(roots);
    if depth > MAX_JSON_DEPTH {
        return Err(format!(
            "tree is {} levels deep, --json supports at most {}; use `arbor list --json` for the flat list",
            depth, MAX_JSON_DEPTH
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

struct Glyphs {
    branch: &'static str,
    last: &'static str,
    pipe: &'static str,
    blank: &'static str,
    elided: &'static str,
}

fn glyphs(style: TreeStyle) -> Glyphs {
    match style {
        TreeStyle::Unicode => Glyphs {
            branch: "├─ ",
            last: "└─ ",
            pipe: "│  ",
            blank: "   ",
            elided: "⋯",
        },
        TreeStyle::Ascii => Glyphs {
            branch: "|- ",
            last: "`- ",
            pipe: "|  ",
            blank: "   ",
            elided: "...",
        },
    }
}

fn label(node: &TreeNode, display: &DisplayConfig) -> String {
    let mut text = display.label_for(&node.id);
    if node.disabled && display.show_disabled {
        text.push_str(" (disabled)");
    }
    text
}

/// Render the forest as an indented tree, one node per line.
///
/// Indentation is capped at `display.max_indent` levels; a deeper row keeps
/// the capped prefix and is marked with the number of hidden levels, so each
/// line stays bounded however deep the tree goes.
pub fn format_tree(roots: &[TreeNode], display: &DisplayConfig) -> String {
    let g = glyphs(display.style);
    let mut out = String::new();
    // Whether each ancestor (below the root) was the last of its siblings
    let mut lasts: Vec<bool> = Vec::new();
    let mut stack: Vec<(&TreeNode, usize, bool)> = roots.iter().rev().map(|r| (r, 0, true)).collect();

    while let Some((node, depth, is_last)) = stack.pop() {
        if depth == 0 {
            lasts.clear();
        } else {
            lasts.truncate(depth - 1);
            let shown = lasts.len().min(display.max_indent);
            for &ancestor_last in &lasts[..shown] {
                out.push_str(if ancestor_last { g.blank } else { g.pipe });
            }
            if lasts.len() > shown {
                out.push_str(&format!("{}{} ", g.elided, lasts.len() - shown));
            }
            out.push_str(if is_last { g.last } else { g.branch });
            lasts.push(is_last);
        }
        out.push_str(&label(node, display));
        out.push('\n');

        let n = node.children.len();
        stack.extend(
            node.children
                .iter()
                .enumerate()
                .rev()
                .map(|(i, c)| (c, depth + 1, i + 1 == n)),
        );
    }
    out
}

/// One line per node: `id` or `id <- parent`
pub fn format_flat(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        match &node.parent_id {
            Some(parent) => out.push_str(&format!("{} <- {}", node.id, parent)),
            None => out.push_str(&node.id),
        }
        if node.disabled {
            out.push_str(" (disabled)");
        }
        out.push('\n');
    }
    out
}

pub fn format_move(dragged: &str, target: Option<&str>, rejection: Option<Rejection>) -> String {
    match (rejection, target) {
        (Some(reason), _) => format!("unchanged: {}", reason),
        (None, Some(target)) => format!("moved {} under {}", dragged, target),
        (None, None) => format!("moved {} to root", dragged),
    }
}
