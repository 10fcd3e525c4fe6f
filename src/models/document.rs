// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Rich-text document tree as saved by the post editor.

use serde::{Deserialize, Serialize};

/// Node type of a hyperlink element.
pub const LINK_NODE: &str = "a";
/// Node type of an embedded image element.
pub const IMAGE_NODE: &str = "img";

/// One node of a rich-text document.
///
/// Element nodes carry a `type` and `children`; text leaves carry `text`.
/// Any other fields the editor writes are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentNode {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<DocumentNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl DocumentNode {
    /// Element node with the given type and children.
    pub fn element(kind: &str, children: Vec<DocumentNode>) -> Self {
        Self {
            kind: Some(kind.to_string()),
            children: Some(children),
            ..Self::default()
        }
    }

    /// Text leaf.
    pub fn text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            ..Self::default()
        }
    }

    /// Hyperlink element wrapping some text.
    pub fn link(url: &str, text: &str) -> Self {
        Self {
            url: Some(url.to_string()),
            ..Self::element(LINK_NODE, vec![Self::text(text)])
        }
    }

    /// Image element.
    pub fn image(url: &str) -> Self {
        Self {
            url: Some(url.to_string()),
            ..Self::element(IMAGE_NODE, vec![Self::text("")])
        }
    }

    pub fn is_type(&self, kind: &str) -> bool {
        self.kind.as_deref() == Some(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_editor_json() {
        let json = r#"[{"type":"p","id":0,"children":[
            {"text":"see "},
            {"type":"a","url":"https://x.com","children":[{"text":"here"}]}
        ]}]"#;

        let nodes: Vec<DocumentNode> = serde_json::from_str(json).unwrap();
        assert_eq!(nodes.len(), 1);
        let children = nodes[0].children.as_ref().unwrap();
        assert_eq!(children[0].text.as_deref(), Some("see "));
        assert!(children[1].is_type(LINK_NODE));
        assert_eq!(children[1].url.as_deref(), Some("https://x.com"));
    }
}
