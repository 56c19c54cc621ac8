//! Per-node style resolution.
//!
//! A node's local style merges its presentation attributes with its inline
//! `style` shorthand (shorthand entries win). Inheritance is applied by the
//! document walker in a single top-down pass: the child's resolved style is
//! the parent's with the child's local values winning field by field.

use crate::Diagnostic;
use quillkit_markup::Node;
use tracing::warn;

/// Presentation attributes recognized but deliberately not applied.
const IGNORED_ATTRS: [&str; 3] = ["stroke-linejoin", "stroke-linecap", "fill-rule"];

/// The style fields a node can set. Unset fields inherit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocalStyle {
    pub fill: Option<String>,
    pub fill_opacity: Option<f32>,
    pub stroke: Option<String>,
    pub stroke_opacity: Option<f32>,
    pub stroke_width: Option<f32>,
    pub opacity: Option<f32>,
}

impl LocalStyle {
    /// Read a node's presentation attributes and inline style shorthand.
    ///
    /// Shorthand entries override same-named attributes. Recognized but
    /// unsupported attributes are reported as diagnostics.
    pub fn from_node(node: &Node, diagnostics: &mut Vec<Diagnostic>) -> Self {
        let mut style = LocalStyle::default();

        for (name, value) in &node.attrs {
            style.apply(name, value, &node.tag, diagnostics);
        }

        // Inline shorthand: ";"-joined "prop:value" pairs, later wins.
        if let Some(shorthand) = node.attr("style") {
            for entry in shorthand.split(';') {
                if let Some((name, value)) = entry.split_once(':') {
                    style.apply(name.trim(), value.trim(), &node.tag, diagnostics);
                }
            }
        }

        style
    }

    fn apply(&mut self, name: &str, value: &str, tag: &str, diagnostics: &mut Vec<Diagnostic>) {
        match name {
            "fill" => self.fill = Some(value.to_string()),
            "fill-opacity" => self.fill_opacity = value.trim().parse().ok(),
            "stroke" => self.stroke = Some(value.to_string()),
            "stroke-opacity" => self.stroke_opacity = value.trim().parse().ok(),
            "stroke-width" => self.stroke_width = value.trim().parse().ok(),
            "opacity" => self.opacity = value.trim().parse().ok(),
            _ if IGNORED_ATTRS.contains(&name) => {
                warn!(tag, attr = name, "ignoring unsupported style attribute");
                diagnostics.push(Diagnostic::IgnoredAttribute {
                    tag: tag.to_string(),
                    attr: name.to_string(),
                });
            }
            // Anything else is not a style attribute; the walker reads the
            // geometry attributes itself.
            _ => {}
        }
    }

    /// Merge this node's style on top of the inherited style.
    ///
    /// Local values win field by field; a node with nothing set resolves to
    /// exactly the parent's style.
    pub fn merged_onto(&self, parent: &LocalStyle) -> LocalStyle {
        LocalStyle {
            fill: self.fill.clone().or_else(|| parent.fill.clone()),
            fill_opacity: self.fill_opacity.or(parent.fill_opacity),
            stroke: self.stroke.clone().or_else(|| parent.stroke.clone()),
            stroke_opacity: self.stroke_opacity.or(parent.stroke_opacity),
            stroke_width: self.stroke_width.or(parent.stroke_width),
            opacity: self.opacity.or(parent.opacity),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attributes_read() {
        let node = Node::new("rect")
            .with_attr("fill", "red")
            .with_attr("stroke-width", "2.5")
            .with_attr("opacity", "0.5");
        let style = LocalStyle::from_node(&node, &mut Vec::new());
        assert_eq!(style.fill.as_deref(), Some("red"));
        assert_eq!(style.stroke_width, Some(2.5));
        assert_eq!(style.opacity, Some(0.5));
        assert_eq!(style.stroke, None);
    }

    #[test]
    fn test_shorthand_wins_over_attribute() {
        let node = Node::new("rect")
            .with_attr("fill", "red")
            .with_attr("style", "fill: blue; stroke-width: 3");
        let style = LocalStyle::from_node(&node, &mut Vec::new());
        assert_eq!(style.fill.as_deref(), Some("blue"));
        assert_eq!(style.stroke_width, Some(3.0));
    }

    #[test]
    fn test_ignored_attribute_diagnostic() {
        let node = Node::new("path").with_attr("stroke-linecap", "round");
        let mut diags = Vec::new();
        LocalStyle::from_node(&node, &mut diags);
        assert_eq!(
            diags,
            vec![Diagnostic::IgnoredAttribute {
                tag: "path".to_string(),
                attr: "stroke-linecap".to_string()
            }]
        );
    }

    #[test]
    fn test_merge_local_wins() {
        let parent = LocalStyle {
            fill: Some("red".to_string()),
            stroke: Some("blue".to_string()),
            ..Default::default()
        };
        let local = LocalStyle {
            fill: Some("green".to_string()),
            ..Default::default()
        };
        let merged = local.merged_onto(&parent);
        assert_eq!(merged.fill.as_deref(), Some("green"));
        assert_eq!(merged.stroke.as_deref(), Some("blue"));
    }

    #[test]
    fn test_merge_empty_is_identity() {
        // A node with no local attributes resolves to exactly the parent's
        // style.
        let parent = LocalStyle {
            fill: Some("red".to_string()),
            fill_opacity: Some(0.25),
            stroke: Some("blue".to_string()),
            stroke_opacity: Some(0.75),
            stroke_width: Some(4.0),
            opacity: Some(0.5),
        };
        let merged = LocalStyle::default().merged_onto(&parent);
        assert_eq!(merged, parent);
    }

    #[test]
    fn test_non_numeric_opacity_reads_as_unset() {
        let node = Node::new("rect").with_attr("fill-opacity", "cloudy");
        let style = LocalStyle::from_node(&node, &mut Vec::new());
        assert_eq!(style.fill_opacity, None);
    }
}
