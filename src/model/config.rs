use serde::{Deserialize, Serialize};

/// Configuration from arbor.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArborConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub reparent: ReparentConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Flat list location, relative to the directory holding arbor.toml
    #[serde(default = "default_store_file")]
    pub file: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            file: default_store_file(),
        }
    }
}

fn default_store_file() -> String {
    "nodes.json".to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReparentConfig {
    /// Treat a rejected drop as a failure (non-zero exit) instead of a silent no-op
    #[serde(default)]
    pub strict: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreeStyle {
    #[default]
    Unicode,
    Ascii,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default)]
    pub style: TreeStyle,
    /// Label template; `{id}` is replaced with the node id
    #[serde(default = "default_label")]
    pub label: String,
    #[serde(default = "default_true")]
    pub show_disabled: bool,
    /// Indentation stops growing past this many levels; deeper rows carry an elision mark
    #[serde(default = "default_max_indent")]
    pub max_indent: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            style: TreeStyle::Unicode,
            label: default_label(),
            show_disabled: true,
            max_indent: default_max_indent(),
        }
    }
}

fn default_label() -> String {
    "Item {id}".to_string()
}

fn default_max_indent() -> usize {
    64
}

fn default_true() -> bool {
    true
}

impl DisplayConfig {
    pub fn label_for(&self, id: &str) -> String {
        self.label.replace("{id}", id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: ArborConfig = toml::from_str("").unwrap();
        assert_eq!(config, ArborConfig::default());
        assert_eq!(config.store.file, "nodes.json");
        assert!(!config.reparent.strict);
        assert!(config.display.show_disabled);
        assert_eq!(config.display.max_indent, 64);
    }

    #[test]
    fn test_partial_sections() {
        let config: ArborConfig = toml::from_str(
            r#"
[reparent]
strict = true

[display]
style = "ascii"
"#,
        )
        .unwrap();
        assert!(config.reparent.strict);
        assert_eq!(config.display.style, TreeStyle::Ascii);
        assert_eq!(config.display.label, "Item {id}");
        assert_eq!(config.store.file, "nodes.json");
    }

    #[test]
    fn test_label_template() {
        let display = DisplayConfig {
            label: "<{id}>".into(),
            ..DisplayConfig::default()
        };
        assert_eq!(display.label_for("7"), "<7>");
        assert_eq!(DisplayConfig::default().label_for("7"), "Item 7");
    }
}
