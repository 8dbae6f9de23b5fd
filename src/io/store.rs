use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::model::node::Node;

/// Error type for loading and saving the flat list
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("could not write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("invalid JSON node list: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid TOML node list: {0}")]
    TomlDe(#[from] toml::de::Error),
    #[error("could not serialize node list to TOML: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

/// On-disk format, picked from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreFormat {
    Json,
    Toml,
}

impl StoreFormat {
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => StoreFormat::Toml,
            _ => StoreFormat::Json,
        }
    }
}

/// TOML has no top-level arrays, so the list lives under `[[nodes]]`
#[derive(Serialize, Deserialize)]
struct TomlDoc {
    #[serde(default)]
    nodes: Vec<TomlNode>,
}

/// TOML has no null either; a root is a table without `parentId`
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TomlNode {
    id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    parent_id: Option<String>,
    #[serde(default)]
    disabled: bool,
    #[serde(flatten)]
    attrs: IndexMap<String, serde_json::Value>,
}

impl From<TomlNode> for Node {
    fn from(t: TomlNode) -> Self {
        Node {
            id: t.id,
            parent_id: t.parent_id,
            disabled: t.disabled,
            attrs: t.attrs,
        }
    }
}

impl From<&Node> for TomlNode {
    fn from(node: &Node) -> Self {
        TomlNode {
            id: node.id.clone(),
            parent_id: node.parent_id.clone(),
            disabled: node.disabled,
            attrs: node.attrs.clone(),
        }
    }
}

pub fn parse_nodes(text: &str, format: StoreFormat) -> Result<Vec<Node>, StoreError> {
    match format {
        StoreFormat::Json => Ok(serde_json::from_str(text)?),
        StoreFormat::Toml => Ok(toml::from_str::<TomlDoc>(text)?
            .nodes
            .into_iter()
            .map(Node::from)
            .collect()),
    }
}

pub fn serialize_nodes(nodes: &[Node], format: StoreFormat) -> Result<String, StoreError> {
    match format {
        StoreFormat::Json => {
            let mut text = serde_json::to_string_pretty(nodes)?;
            text.push('\n');
            Ok(text)
        }
        StoreFormat::Toml => Ok(toml::to_string(&TomlDoc {
            nodes: nodes.iter().map(TomlNode::from).collect(),
        })?),
    }
}

/// Read the flat list. No validation beyond parsing; see `ops::check`.
pub fn load_nodes(path: &Path) -> Result<Vec<Node>, StoreError> {
    let text = fs::read_to_string(path).map_err(|e| StoreError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    let nodes = parse_nodes(&text, StoreFormat::for_path(path))?;
    tracing::debug!(path = %path.display(), count = nodes.len(), "loaded nodes");
    Ok(nodes)
}

/// Write the flat list, replacing the file atomically.
pub fn save_nodes(path: &Path, nodes: &[Node]) -> Result<(), StoreError> {
    let text = serialize_nodes(nodes, StoreFormat::for_path(path))?;
    atomic_write(path, text.as_bytes()).map_err(|e| StoreError::Write {
        path: path.to_path_buf(),
        source: e,
    })?;
    tracing::debug!(path = %path.display(), count = nodes.len(), "saved nodes");
    Ok(())
}

/// Write via a temp file in the same directory, then rename over the target.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::node::demo_seed;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(StoreFormat::for_path(Path::new("a/nodes.toml")), StoreFormat::Toml);
        assert_eq!(StoreFormat::for_path(Path::new("nodes.TOML")), StoreFormat::Toml);
        assert_eq!(StoreFormat::for_path(Path::new("nodes.json")), StoreFormat::Json);
        assert_eq!(StoreFormat::for_path(Path::new("nodes")), StoreFormat::Json);
    }

    #[test]
    fn test_save_and_load_json() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nodes.json");
        save_nodes(&path, &demo_seed()).unwrap();
        assert_eq!(load_nodes(&path).unwrap(), demo_seed());
    }

    #[test]
    fn test_json_store_writes_null_parent_for_roots() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nodes.json");
        save_nodes(&path, &[Node::new("0"), Node::with_parent("1", "0")]).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value[0]["parentId"], serde_json::Value::Null);
        assert!(value[0].as_object().unwrap().contains_key("parentId"));
        assert_eq!(value[1]["parentId"], "0");
    }

    #[test]
    fn test_toml_store_omits_parent_for_roots() {
        let text = serialize_nodes(
            &[Node::new("0"), Node::with_parent("1", "0")],
            StoreFormat::Toml,
        )
        .unwrap();
        assert_eq!(text.matches("parentId").count(), 1, "{}", text);
        assert!(text.contains(r#"parentId = "0""#), "{}", text);
    }

    #[test]
    fn test_save_and_load_toml() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nodes.toml");
        save_nodes(&path, &demo_seed()).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("[[nodes]]"));
        assert_eq!(load_nodes(&path).unwrap(), demo_seed());
    }

    #[test]
    fn test_parse_legacy_json_shape() {
        let text = r#"[
            { "id": "0", "disabled": false, "parentId": null },
            { "id": "1", "disabled": false, "parentId": "0" },
            { "id": "10", "disabled": true, "parentId": null }
        ]"#;
        let nodes = parse_nodes(text, StoreFormat::Json).unwrap();
        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes[1].parent_id.as_deref(), Some("0"));
        assert!(nodes[2].disabled);
        assert!(nodes[0].attrs.is_empty());
    }

    #[test]
    fn test_parse_toml_with_extra_attrs() {
        let text = r#"
[[nodes]]
id = "a"
label = "Alpha"

[[nodes]]
id = "b"
parentId = "a"
"#;
        let nodes = parse_nodes(text, StoreFormat::Toml).unwrap();
        assert_eq!(nodes[0].attrs["label"], serde_json::json!("Alpha"));
        assert_eq!(nodes[1].parent_id.as_deref(), Some("a"));
    }

    #[test]
    fn test_load_missing_file_names_path() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("missing.json");
        let err = load_nodes(&path).unwrap_err();
        assert!(matches!(err, StoreError::Read { .. }));
        assert!(err.to_string().contains("missing.json"));
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let err = parse_nodes("{ not a list", StoreFormat::Json).unwrap_err();
        assert!(matches!(err, StoreError::Json(_)));
    }

    #[test]
    fn test_atomic_write_replaces_content() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out.json");
        fs::write(&path, "old").unwrap();
        atomic_write(&path, b"new").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    }
}
