//! # QuillKit Markup
//!
//! The vector-markup element tree consumed by the QuillKit converter.
//!
//! ## Features
//!
//! - **Element tree**: owned `Node` values (tag, attributes, children)
//! - **XML front-end**: parse markup text into a `Node` tree
//! - **Attribute access**: string, float and required-float lookups

use thiserror::Error;

/// Errors that can occur while building or reading the element tree.
#[derive(Error, Debug)]
pub enum MarkupError {
    /// The input text did not resolve to a single root element.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A required numeric attribute is absent or non-numeric.
    #[error("malformed attribute {attr:?} on <{tag}>")]
    MalformedAttribute { tag: String, attr: String },
}

// ==================== Node ====================

/// A markup element: tag name, attributes and ordered children.
///
/// Immutable input to the converter. Build one with [`Node::parse_document`]
/// or construct it directly for pre-parsed trees.
#[derive(Debug, Clone, Default)]
pub struct Node {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
    pub id: Option<String>,
}

impl Node {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    /// Builder-style attribute insertion.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        if name == "id" {
            self.id = Some(value.clone());
        }
        self.attrs.push((name, value));
        self
    }

    /// Builder-style child insertion.
    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// Parse markup text into an element tree.
    ///
    /// Fails when the text is not well-formed XML with a single root
    /// element.
    pub fn parse_document(text: &str) -> Result<Node, MarkupError> {
        let doc = roxmltree::Document::parse(text)
            .map_err(|e| MarkupError::InvalidInput(e.to_string()))?;
        Ok(Self::from_xml(doc.root_element()))
    }

    fn from_xml(node: roxmltree::Node<'_, '_>) -> Node {
        Node {
            tag: node.tag_name().name().to_string(),
            attrs: node
                .attributes()
                .map(|a| (a.name().to_string(), a.value().to_string()))
                .collect(),
            children: node
                .children()
                .filter(|c| c.is_element())
                .map(Self::from_xml)
                .collect(),
            id: node.attribute("id").map(str::to_string),
        }
    }

    /// Look up an attribute value (first match wins).
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Look up a numeric attribute. Scientific notation is accepted;
    /// non-numeric values read as absent.
    pub fn float_attr(&self, name: &str) -> Option<f32> {
        self.attr(name).and_then(|v| v.trim().parse().ok())
    }

    /// Look up a numeric attribute that must be present and well-formed.
    pub fn require_float_attr(&self, name: &str) -> Result<f32, MarkupError> {
        self.float_attr(name)
            .ok_or_else(|| MarkupError::MalformedAttribute {
                tag: self.tag.clone(),
                attr: name.to_string(),
            })
    }
}

// ==================== Number Lists ====================

/// Parse a whitespace/comma separated list of numbers, as used by the
/// `points` attribute and transform parameter lists.
pub fn parse_number_list(s: &str) -> Vec<f32> {
    s.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|p| !p.is_empty())
        .filter_map(|p| p.parse().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_document() {
        let doc = r#"<svg width="10"><g><rect x="1" y="2"/></g></svg>"#;
        let root = Node::parse_document(doc).unwrap();
        assert_eq!(root.tag, "svg");
        assert_eq!(root.children.len(), 1);
        assert_eq!(root.children[0].children[0].tag, "rect");
        assert_eq!(root.children[0].children[0].attr("x"), Some("1"));
    }

    #[test]
    fn test_parse_document_invalid() {
        assert!(matches!(
            Node::parse_document("not markup"),
            Err(MarkupError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_id_captured() {
        let root = Node::parse_document(r#"<svg><circle id="dot"/></svg>"#).unwrap();
        assert_eq!(root.children[0].id.as_deref(), Some("dot"));
    }

    #[test]
    fn test_float_attr_scientific() {
        let node = Node::new("rect").with_attr("width", "1.5e2");
        assert_eq!(node.float_attr("width"), Some(150.0));
    }

    #[test]
    fn test_require_float_attr_missing() {
        let node = Node::new("rect");
        assert!(matches!(
            node.require_float_attr("width"),
            Err(MarkupError::MalformedAttribute { .. })
        ));
    }

    #[test]
    fn test_require_float_attr_non_numeric() {
        let node = Node::new("rect").with_attr("width", "wide");
        assert!(node.require_float_attr("width").is_err());
    }

    #[test]
    fn test_parse_number_list() {
        assert_eq!(
            parse_number_list("10,20 30,40"),
            vec![10.0, 20.0, 30.0, 40.0]
        );
        assert_eq!(parse_number_list("  1e1, -2.5 "), vec![10.0, -2.5]);
    }
}
