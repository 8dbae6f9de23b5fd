use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A single item of the flat list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Caller-assigned identifier, unique across the list
    pub id: String,
    /// Parent reference (`None` = root, written as `null`). May dangle; a dangling node renders as a root.
    #[serde(default)]
    pub parent_id: Option<String>,
    /// Carried through for the host; irrelevant to tree logic
    #[serde(default)]
    pub disabled: bool,
    /// Any other attributes, preserved verbatim and in order
    #[serde(flatten)]
    pub attrs: IndexMap<String, serde_json::Value>,
}

impl Node {
    /// Create a root node
    pub fn new(id: impl Into<String>) -> Self {
        Node {
            id: id.into(),
            parent_id: None,
            disabled: false,
            attrs: IndexMap::new(),
        }
    }

    /// Create a node attached to `parent`
    pub fn with_parent(id: impl Into<String>, parent: impl Into<String>) -> Self {
        Node {
            parent_id: Some(parent.into()),
            ..Node::new(id)
        }
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// True when the node carries no parent reference at all.
    ///
    /// A node whose parent dangles is still displayed as a root, but it is
    /// not a root reference: detaching it is a real change.
    pub fn is_root_ref(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Where a dragged node was dropped
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum DropTarget {
    /// The root container (detach)
    Root,
    /// Another node (attach as its child)
    Node(String),
}

impl DropTarget {
    /// The target node id, or `None` for the root container
    pub fn as_id(&self) -> Option<&str> {
        match self {
            DropTarget::Root => None,
            DropTarget::Node(id) => Some(id),
        }
    }
}

impl From<Option<String>> for DropTarget {
    fn from(target: Option<String>) -> Self {
        match target {
            Some(id) => DropTarget::Node(id),
            None => DropTarget::Root,
        }
    }
}

impl From<DropTarget> for Option<String> {
    fn from(target: DropTarget) -> Self {
        match target {
            DropTarget::Root => None,
            DropTarget::Node(id) => Some(id),
        }
    }
}

impl std::fmt::Display for DropTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DropTarget::Root => write!(f, "root"),
            DropTarget::Node(id) => write!(f, "{}", id),
        }
    }
}

/// One completed drag gesture, as emitted by the host's gesture layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropEvent {
    pub dragged: String,
    #[serde(default = "root_target")]
    pub target: DropTarget,
}

fn root_target() -> DropTarget {
    DropTarget::Root
}

impl DropEvent {
    pub fn new(dragged: impl Into<String>, target: DropTarget) -> Self {
        DropEvent {
            dragged: dragged.into(),
            target,
        }
    }

    pub fn onto(dragged: impl Into<String>, target: impl Into<String>) -> Self {
        DropEvent::new(dragged, DropTarget::Node(target.into()))
    }

    pub fn to_root(dragged: impl Into<String>) -> Self {
        DropEvent::new(dragged, DropTarget::Root)
    }
}

/// The demo hierarchy written by `arbor init`.
///
/// ```text
/// 0
/// ├─ 1
/// ├─ 2
/// │  ├─ 4
/// │  ├─ 5
/// │  └─ 6
/// │     └─ 7
/// │        └─ 8
/// └─ 3
/// 9
/// 10 (disabled)
/// ```
pub fn demo_seed() -> Vec<Node> {
    vec![
        Node::new("0"),
        Node::with_parent("1", "0"),
        Node::with_parent("2", "0"),
        Node::with_parent("3", "0"),
        Node::with_parent("4", "2"),
        Node::with_parent("5", "2"),
        Node::with_parent("6", "2"),
        Node::with_parent("7", "6"),
        Node::with_parent("8", "7"),
        Node::new("9"),
        Node::new("10").disabled(true),
    ]
}
