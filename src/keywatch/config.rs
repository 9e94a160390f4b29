//! YAML shortcut files
//!
//! ```yaml
//! shortcuts:
//!   - keys: "!^s"
//!     action: save
//!   - sequence: ["ESC", "w", "+1", "ENTER"]
//!     action: write-quit
//! tree:
//!   "^":
//!     "s": save
//!     "+s": save-as
//! ```
//!
//! Tree keys are joined with a space, so the entries above bind `^ s` and
//! `^ +s`.
//!
//! Action names are resolved against an [`ActionTable`]; names with no entry
//! are skipped with a warning.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use serde_yaml::{Mapping, Value};

use super::error::ConfigError;
use super::unfold::{Definition, MapEntry, Reaction, Record, SequenceSpec, ShortcutMap};

/// Root structure of a shortcut YAML file
#[derive(Debug, Default, Deserialize)]
pub struct ShortcutsConfig {
    #[serde(default)]
    pub shortcuts: Vec<ShortcutConfig>,
    #[serde(default)]
    tree: Mapping,
}

/// A single shortcut entry from YAML
#[derive(Debug, Clone, Deserialize)]
pub struct ShortcutConfig {
    #[serde(alias = "key", alias = "sequence")]
    pub keys: KeysConfig,
    pub action: String,
}

/// Key text, or separate key tokens
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum KeysConfig {
    Text(String),
    Keys(Vec<String>),
}

impl From<KeysConfig> for SequenceSpec {
    fn from(keys: KeysConfig) -> Self {
        match keys {
            KeysConfig::Text(text) => SequenceSpec::Text(text),
            KeysConfig::Keys(keys) => SequenceSpec::Keys(keys),
        }
    }
}

/// A node of the `tree:` section
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeNode {
    Action(String),
    Nested(Vec<(String, TreeNode)>),
}

/// A parsed shortcut file: flat entries first, then the tree
#[derive(Debug, Clone, Default)]
pub struct ShortcutFile {
    pub shortcuts: Vec<ShortcutConfig>,
    pub tree: Vec<(String, TreeNode)>,
}

impl ShortcutFile {
    /// Every action name the file references, in file order, without duplicates
    pub fn action_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.shortcuts.iter().map(|e| e.action.as_str()).collect();
        collect_tree_actions(&self.tree, &mut names);

        let mut unique = Vec::with_capacity(names.len());
        for name in names {
            if !unique.contains(&name) {
                unique.push(name);
            }
        }
        unique
    }

    /// Every (keys, action) pair in file order, tree entries flattened
    pub fn entries(&self) -> Vec<(SequenceSpec, &str)> {
        let mut entries: Vec<(SequenceSpec, &str)> = self
            .shortcuts
            .iter()
            .map(|e| (e.keys.clone().into(), e.action.as_str()))
            .collect();
        flatten_tree(&self.tree, "", &mut entries);
        entries
    }

    /// Resolve action names into a definition ready to be watched
    pub fn to_definition(&self, actions: &ActionTable) -> Definition {
        let mut records = Vec::with_capacity(self.shortcuts.len());
        for entry in &self.shortcuts {
            let Some(reaction) = actions.resolve(&entry.action) else {
                continue;
            };
            records.push(Record::new(entry.keys.clone(), reaction));
        }

        let tree = build_map(&self.tree, actions);
        records.extend(tree.to_records());
        Definition::Records(records)
    }
}

/// Named reactions that shortcut files refer to
#[derive(Clone, Default)]
pub struct ActionTable {
    actions: HashMap<String, Reaction>,
}

impl ActionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an action (builder pattern)
    pub fn with(mut self, name: impl Into<String>, reaction: Reaction) -> Self {
        self.insert(name, reaction);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, reaction: Reaction) {
        self.actions.insert(name.into(), reaction);
    }

    pub fn get(&self, name: &str) -> Option<&Reaction> {
        self.actions.get(name)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    fn resolve(&self, name: &str) -> Option<Reaction> {
        let reaction = self.actions.get(name).cloned();
        if reaction.is_none() {
            tracing::warn!("Skipping shortcut bound to undefined action '{}'", name);
        }
        reaction
    }
}

impl std::fmt::Debug for ActionTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&String> = self.actions.keys().collect();
        names.sort();
        f.debug_struct("ActionTable").field("actions", &names).finish()
    }
}

/// Load a shortcut file from disk
pub fn load_shortcuts_file(path: &Path) -> Result<ShortcutFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    parse_shortcuts_yaml(&content)
}

/// Parse a shortcut file from a YAML string
pub fn parse_shortcuts_yaml(yaml: &str) -> Result<ShortcutFile, ConfigError> {
    // An empty document is an empty file, not an error
    if yaml.trim().is_empty() {
        return Ok(ShortcutFile::default());
    }

    let config: ShortcutsConfig = serde_yaml::from_str(yaml)?;
    let tree = parse_tree(&config.tree, "")?;

    Ok(ShortcutFile {
        shortcuts: config.shortcuts,
        tree,
    })
}

fn parse_tree(mapping: &Mapping, prefix: &str) -> Result<Vec<(String, TreeNode)>, ConfigError> {
    let mut nodes = Vec::with_capacity(mapping.len());
    for (key, value) in mapping {
        let key = scalar_text(key).ok_or_else(|| ConfigError::InvalidTree {
            path: prefix.trim().to_string(),
            reason: "keys must be strings".to_string(),
        })?;
        let path = format!("{prefix}{key}");

        let node = match value {
            Value::Mapping(children) => TreeNode::Nested(parse_tree(children, &format!("{path} "))?),
            other => TreeNode::Action(scalar_text(other).ok_or_else(|| ConfigError::InvalidTree {
                path: path.clone(),
                reason: "expected an action name or a nested mapping".to_string(),
            })?),
        };
        nodes.push((key, node));
    }
    Ok(nodes)
}

/// Text of a scalar; YAML turns bare `1` or `true` into non-strings
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn collect_tree_actions<'a>(nodes: &'a [(String, TreeNode)], out: &mut Vec<&'a str>) {
    for (_, node) in nodes {
        match node {
            TreeNode::Action(name) => out.push(name),
            TreeNode::Nested(children) => collect_tree_actions(children, out),
        }
    }
}

fn flatten_tree<'a>(
    nodes: &'a [(String, TreeNode)],
    prefix: &str,
    out: &mut Vec<(SequenceSpec, &'a str)>,
) {
    for (keys, node) in nodes {
        match node {
            TreeNode::Action(name) => {
                out.push((SequenceSpec::Text(format!("{prefix}{keys}")), name.as_str()))
            }
            TreeNode::Nested(children) => flatten_tree(children, &format!("{prefix}{keys} "), out),
        }
    }
}

fn build_map(nodes: &[(String, TreeNode)], actions: &ActionTable) -> ShortcutMap {
    let mut map = ShortcutMap::new();
    for (keys, node) in nodes {
        match node {
            TreeNode::Action(name) => {
                if let Some(reaction) = actions.resolve(name) {
                    map.insert(keys.clone(), MapEntry::Handler(reaction));
                }
            }
            TreeNode::Nested(children) => {
                map.insert(keys.clone(), MapEntry::Nested(build_map(children, actions)));
            }
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keywatch::unfold::{reaction, unfold};

    fn noop() -> Reaction {
        reaction(|_, _| {})
    }

    #[test]
    fn test_parse_shortcut_list() {
        let yaml = r#"
shortcuts:
  - keys: "!^s"
    action: save
  - key: "ESC,w,+1,ENTER"
    action: save
  - sequence: ["^k", "^c"]
    action: comment
"#;
        let file = parse_shortcuts_yaml(yaml).unwrap();
        assert_eq!(file.shortcuts.len(), 3);
        assert_eq!(file.shortcuts[0].keys, KeysConfig::Text("!^s".to_string()));
        assert_eq!(
            file.shortcuts[2].keys,
            KeysConfig::Keys(vec!["^k".to_string(), "^c".to_string()])
        );
        assert_eq!(file.action_names(), vec!["save", "comment"]);
    }

    #[test]
    fn test_parse_tree_keeps_order() {
        let yaml = r#"
tree:
  "^":
    "s": save
    "+s": save-as
  "g": top
"#;
        let file = parse_shortcuts_yaml(yaml).unwrap();
        assert_eq!(file.tree.len(), 2);
        assert_eq!(file.tree[0].0, "^");
        assert_eq!(file.tree[1], ("g".to_string(), TreeNode::Action("top".to_string())));
        assert_eq!(file.action_names(), vec!["save", "save-as", "top"]);

        let entries: Vec<(String, &str)> = file
            .entries()
            .into_iter()
            .map(|(spec, action)| (spec.describe(), action))
            .collect();
        assert_eq!(
            entries,
            vec![
                ("^ s".to_string(), "save"),
                ("^ +s".to_string(), "save-as"),
                ("g".to_string(), "top"),
            ]
        );
    }

    #[test]
    fn test_tree_rejects_lists() {
        let yaml = r#"
tree:
  "^":
    "k": [a, b]
"#;
        let err = parse_shortcuts_yaml(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTree { ref path, .. } if path == "^ k"));
    }

    #[test]
    fn test_empty_document() {
        let file = parse_shortcuts_yaml("").unwrap();
        assert!(file.shortcuts.is_empty());
        assert!(file.tree.is_empty());
    }

    #[test]
    fn test_invalid_yaml() {
        let err = parse_shortcuts_yaml("shortcuts: [").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn test_undefined_action_is_skipped() {
        let yaml = r#"
shortcuts:
  - keys: "^s"
    action: save
  - keys: "^q"
    action: quit
tree:
  "^":
    "+s": save-as
    "k": kill
"#;
        let file = parse_shortcuts_yaml(yaml).unwrap();
        let actions = ActionTable::new().with("save", noop()).with("save-as", noop());

        let bindings = unfold(file.to_definition(&actions), None);
        let rendered: Vec<String> = bindings
            .iter()
            .map(|b| b.sequence.to_string_with(true, crate::keywatch::Platform::Unix))
            .collect();
        assert_eq!(rendered, vec!["^s", "^+s"]);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_shortcuts_file(Path::new("/nonexistent/keywatch/shortcuts.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
