//! The document walker: tree traversal, inheritance and per-tag dispatch.
//!
//! Each child is processed in document order: its local style merges onto
//! the inherited style, its transform composes onto the inherited matrix
//! (the node's transform is expressed in the parent's frame), the paint
//! state goes to the active sink, and the tag-specific builder emits
//! geometry. Recoverable per-node problems become diagnostics; the walk
//! never aborts.

use crate::paint::{resolve_fill, resolve_stroke};
use crate::sink::{RecordSink, ShapeSink};
use crate::style::LocalStyle;
use crate::transform::{compile, lex_transform};
use crate::{ConvertOptions, Diagnostic};
use quillkit_geom::{Matrix, Point};
use quillkit_markup::{parse_number_list, MarkupError, Node};
use quillkit_path::{tokenize, Pen};
use tracing::{debug, warn};

/// Recursion guard against pathologically deep trees.
const MAX_DEPTH: usize = 512;

/// Inherited context carried down the tree.
#[derive(Debug, Clone, Default)]
struct Inherited {
    style: LocalStyle,
    matrix: Option<Matrix>,
}

impl Inherited {
    /// Resolve a node's own context against this inherited one.
    fn for_node(&self, node: &Node, diagnostics: &mut Vec<Diagnostic>) -> Inherited {
        let style = LocalStyle::from_node(node, diagnostics).merged_onto(&self.style);
        let own = node
            .attr("transform")
            .map(|t| lex_transform(t))
            .and_then(|entries| compile(&entries, diagnostics));
        let matrix = match (self.matrix, own) {
            (Some(parent), Some(own)) => Some(parent.multiply(&own)),
            (parent, own) => own.or(parent),
        };
        Inherited { style, matrix }
    }
}

/// Convert a tree into a record sink (flat, or mirrored when unpacking).
pub(crate) fn convert_tree(
    root: &Node,
    options: &ConvertOptions,
    diagnostics: &mut Vec<Diagnostic>,
) -> RecordSink {
    let ctx = Inherited::default().for_node(root, diagnostics);
    let mut sink = RecordSink::new();
    if options.unpack_tree {
        walk_unpacked(root, &ctx, 0, options, &mut sink, diagnostics);
    } else {
        walk(root, &ctx, 0, options, &mut sink, diagnostics);
    }
    sink.finish();
    sink
}

/// Convert a tree into a host-provided sink (always flat).
pub(crate) fn convert_into<S: ShapeSink>(
    root: &Node,
    options: &ConvertOptions,
    sink: &mut S,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let ctx = Inherited::default().for_node(root, diagnostics);
    walk(root, &ctx, 0, options, sink, diagnostics);
}

fn walk<S: ShapeSink>(
    node: &Node,
    inherited: &Inherited,
    depth: usize,
    options: &ConvertOptions,
    sink: &mut S,
    diagnostics: &mut Vec<Diagnostic>,
) {
    if depth >= MAX_DEPTH {
        warn!(tag = %node.tag, "recursion depth limit reached");
        diagnostics.push(Diagnostic::DepthLimitReached {
            tag: node.tag.clone(),
        });
        return;
    }

    for child in &node.children {
        let ctx = inherited.for_node(child, diagnostics);
        emit_node(child, &ctx, options, sink, diagnostics);
        walk(child, &ctx, depth + 1, options, sink, diagnostics);
    }
}

fn walk_unpacked(
    node: &Node,
    inherited: &Inherited,
    depth: usize,
    options: &ConvertOptions,
    parent: &mut RecordSink,
    diagnostics: &mut Vec<Diagnostic>,
) {
    if depth >= MAX_DEPTH {
        warn!(tag = %node.tag, "recursion depth limit reached");
        diagnostics.push(Diagnostic::DepthLimitReached {
            tag: node.tag.clone(),
        });
        return;
    }

    for (index, child) in node.children.iter().enumerate() {
        let ctx = inherited.for_node(child, diagnostics);
        let name = child
            .id
            .clone()
            .unwrap_or_else(|| format!("node_{index}"));
        let mut child_sink = RecordSink::named(name, child.tag.clone());
        emit_node(child, &ctx, options, &mut child_sink, diagnostics);
        walk_unpacked(child, &ctx, depth + 1, options, &mut child_sink, diagnostics);
        child_sink.finish();
        parent.attach_child(child_sink);
    }
}

/// Set the drawing state and run the tag-specific builder for one node.
fn emit_node<S: ShapeSink>(
    node: &Node,
    ctx: &Inherited,
    options: &ConvertOptions,
    sink: &mut S,
    diagnostics: &mut Vec<Diagnostic>,
) {
    // Groups draw nothing themselves; skip the paint state churn.
    if node.tag == "g" {
        return;
    }

    let fill = resolve_fill(&ctx.style, options);
    sink.begin_fill(fill.color, fill.alpha);
    match resolve_stroke(&ctx.style, options) {
        Some(stroke) => sink.set_line_style(stroke.width, stroke.color, stroke.alpha),
        None => sink.set_line_style(0.0, options.line_color, 0.0),
    }
    sink.set_transform(ctx.matrix);

    let result = match node.tag.as_str() {
        "path" => {
            build_path(node, sink, diagnostics);
            Ok(())
        }
        "rect" => build_rect(node, sink),
        "circle" | "ellipse" => {
            build_ellipse(node, sink);
            Ok(())
        }
        "polygon" => {
            build_polygon(node, sink, true);
            Ok(())
        }
        "polyline" => {
            build_polygon(node, sink, false);
            Ok(())
        }
        other => {
            debug!(tag = other, "element has no builder");
            diagnostics.push(Diagnostic::UnsupportedElement {
                tag: other.to_string(),
            });
            Ok(())
        }
    };

    // A malformed required attribute skips the shape, not the walk.
    if let Err(MarkupError::MalformedAttribute { tag, attr }) = result {
        warn!(%tag, %attr, "skipping shape with malformed attribute");
        diagnostics.push(Diagnostic::MalformedAttribute { tag, attr });
    }
}

// ==================== Builders ====================

fn build_path<S: ShapeSink>(node: &Node, sink: &mut S, diagnostics: &mut Vec<Diagnostic>) {
    let Some(d) = node.attr("d") else {
        return;
    };
    let commands = tokenize(d);
    let mut pen = Pen::new();
    pen.replay(&commands, sink);
    for &code in pen.unsupported() {
        diagnostics.push(Diagnostic::UnsupportedPathCommand { code });
    }
}

fn build_rect<S: ShapeSink>(node: &Node, sink: &mut S) -> Result<(), MarkupError> {
    let x = node.float_attr("x").unwrap_or(0.0);
    let y = node.float_attr("y").unwrap_or(0.0);
    let width = node.require_float_attr("width")?;
    let height = node.require_float_attr("height")?;
    match node.float_attr("rx") {
        Some(rx) if rx != 0.0 => sink.draw_round_rect(x, y, width, height, rx),
        _ => sink.draw_rect(x, y, width, height),
    }
    Ok(())
}

/// Shared circle/ellipse builder: a circle reads `r` for both axes.
fn build_ellipse<S: ShapeSink>(node: &Node, sink: &mut S) {
    let cx = node.float_attr("cx").unwrap_or(0.0);
    let cy = node.float_attr("cy").unwrap_or(0.0);
    if node.tag == "circle" {
        sink.draw_circle(cx, cy, node.float_attr("r").unwrap_or(0.0));
    } else {
        sink.draw_ellipse(
            cx,
            cy,
            node.float_attr("rx").unwrap_or(0.0),
            node.float_attr("ry").unwrap_or(0.0),
        );
    }
}

fn build_polygon<S: ShapeSink>(node: &Node, sink: &mut S, close: bool) {
    let numbers = parse_number_list(node.attr("points").unwrap_or(""));
    let points: Vec<Point> = numbers
        .chunks_exact(2)
        .map(|pair| Point::new(pair[0], pair[1]))
        .collect();
    sink.draw_polygon(&points, close);
}
