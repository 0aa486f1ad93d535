//! Raw tree payload exchanged with the analysis step.
//!
//! Fields are optional on purpose: a payload missing `path` or `type` must
//! still deserialize so that `tree_model::build` can report *where* it is
//! malformed instead of failing with a bare serde message.

use crate::error::{Result, SelectionError};
use serde::{Deserialize, Serialize};

pub const KIND_FILE: &str = "file";
pub const KIND_DIRECTORY: &str = "directory";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<RawNode>>,
}

impl RawNode {
    pub fn file(name: impl Into<String>, path: impl Into<String>) -> Self {
        RawNode {
            name: Some(name.into()),
            path: Some(path.into()),
            kind: Some(KIND_FILE.to_string()),
            children: None,
        }
    }

    pub fn directory(
        name: impl Into<String>,
        path: impl Into<String>,
        children: Vec<RawNode>,
    ) -> Self {
        RawNode {
            name: Some(name.into()),
            path: Some(path.into()),
            kind: Some(KIND_DIRECTORY.to_string()),
            children: Some(children),
        }
    }

    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text)
            .map_err(|e| SelectionError::malformed("<document>", format!("invalid JSON: {}", e)))
    }

    pub fn to_json_pretty(&self) -> String {
        // A RawNode only holds strings and vectors, serialization cannot fail.
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_payload_with_type_field() {
        let raw = RawNode::from_json(
            r#"{"name":"repo","path":"","type":"directory","children":[
                {"name":"main.rs","path":"main.rs","type":"file"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(raw.kind.as_deref(), Some(KIND_DIRECTORY));
        let children = raw.children.unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].path.as_deref(), Some("main.rs"));
        assert!(children[0].children.is_none());
    }

    #[test]
    fn missing_fields_still_deserialize() {
        let raw = RawNode::from_json(r#"{"name":"orphan"}"#).unwrap();
        assert!(raw.path.is_none());
        assert!(raw.kind.is_none());
    }

    #[test]
    fn broken_json_is_malformed() {
        let err = RawNode::from_json("{not json").unwrap_err();
        assert!(matches!(err, SelectionError::MalformedTree { .. }));
    }

    #[test]
    fn file_serializes_without_children() {
        let json = RawNode::file("a.py", "src/a.py").to_json_pretty();
        assert!(json.contains(r#""type": "file""#));
        assert!(!json.contains("children"));
    }
}
