//! # QuillKit Scene
//!
//! Converts a vector-markup element tree into renderable shape geometry.
//!
//! ## Features
//!
//! - **Style resolution**: presentation attributes, inline style shorthand,
//!   top-down inheritance
//! - **Transform composition**: transform-attribute lists to one affine matrix
//! - **Document walking**: per-tag shape builders feeding a [`ShapeSink`]
//! - **Shape records**: a reference sink accumulating hit-testable records
//! - **Hit testing**: point queries over the accumulated records
//!
//! ## Architecture
//!
//! ```text
//! markup text ── quillkit-markup ──► Node tree
//!                                      │  Converter::convert
//!                                      ▼
//!                            style + transform walker
//!                                      │  per-tag builders
//!                                      ▼
//!                       ShapeSink (host surface or RecordSink)
//! ```

use quillkit_color::Color;
use quillkit_markup::{MarkupError, Node};
use std::fmt;
use thiserror::Error;

pub mod hittest;
pub mod paint;
pub mod sink;
pub mod style;
pub mod transform;
mod walker;

pub use paint::{FillStyle, StrokeStyle};
pub use quillkit_geom::{Matrix, Point};
pub use quillkit_markup::Node as MarkupNode;
pub use quillkit_path::PathSink;
pub use sink::{Contour, RecordSink, ShapeRecord, ShapeSink};
pub use style::LocalStyle;

// ==================== Errors ====================

/// Errors that can occur during conversion.
#[derive(Error, Debug)]
pub enum SceneError {
    /// The input did not resolve to a single root element. Fatal.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A required numeric attribute is absent or non-numeric.
    #[error("malformed attribute {attr:?} on <{tag}>")]
    MalformedAttribute { tag: String, attr: String },
}

impl From<MarkupError> for SceneError {
    fn from(err: MarkupError) -> Self {
        match err {
            MarkupError::InvalidInput(msg) => SceneError::InvalidInput(msg),
            MarkupError::MalformedAttribute { tag, attr } => {
                SceneError::MalformedAttribute { tag, attr }
            }
        }
    }
}

// ==================== Diagnostics ====================

/// A structured diagnostic event collected during conversion.
///
/// Diagnostics never abort the walk: the affected feature's effect is
/// omitted and processing continues. Callers decide the reporting policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// Unrecognized transform-list command; the entry was skipped.
    UnsupportedTransform { name: String },
    /// Element tag with no builder; the element drew nothing.
    UnsupportedElement { tag: String },
    /// Recognized presentation attribute that is not applied.
    IgnoredAttribute { tag: String, attr: String },
    /// Path command letter outside the grammar; no geometry emitted.
    UnsupportedPathCommand { code: char },
    /// A required numeric attribute was absent or non-numeric; the shape
    /// was skipped rather than silently degenerated.
    MalformedAttribute { tag: String, attr: String },
    /// Recursion stopped at the depth guard.
    DepthLimitReached { tag: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnsupportedTransform { name } => {
                write!(f, "unsupported transform command {name:?}")
            }
            Diagnostic::UnsupportedElement { tag } => write!(f, "unsupported element <{tag}>"),
            Diagnostic::IgnoredAttribute { tag, attr } => {
                write!(f, "ignored attribute {attr:?} on <{tag}>")
            }
            Diagnostic::UnsupportedPathCommand { code } => {
                write!(f, "unsupported path command {code:?}")
            }
            Diagnostic::MalformedAttribute { tag, attr } => {
                write!(f, "malformed attribute {attr:?} on <{tag}>")
            }
            Diagnostic::DepthLimitReached { tag } => {
                write!(f, "depth limit reached below <{tag}>")
            }
        }
    }
}

// ==================== Options ====================

/// Conversion defaults and output mode.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Default stroke width when a stroke is present but no width is set.
    /// Clamped to at least 1.
    pub line_width: f32,
    /// Default stroke color.
    pub line_color: Color,
    /// Default stroke opacity.
    pub line_opacity: f32,
    /// Default fill color.
    pub fill_color: Color,
    /// Default fill opacity.
    pub fill_opacity: f32,
    /// Produce one named, tagged sink per markup node (a mirrored tree)
    /// instead of one flat sink.
    pub unpack_tree: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            line_width: 1.0,
            line_color: Color::BLACK,
            line_opacity: 1.0,
            fill_color: Color::BLACK,
            fill_opacity: 1.0,
            unpack_tree: false,
        }
    }
}

// ==================== Converter ====================

/// The public conversion entry point.
#[derive(Debug, Clone, Default)]
pub struct Converter {
    options: ConvertOptions,
}

impl Converter {
    pub fn new(mut options: ConvertOptions) -> Self {
        options.line_width = options.line_width.max(1.0);
        Self { options }
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Parse markup text and convert it.
    ///
    /// Fails with [`SceneError::InvalidInput`] when the text does not
    /// resolve to a single root element.
    pub fn convert_text(&self, text: &str) -> Result<Conversion, SceneError> {
        let root = Node::parse_document(text)?;
        Ok(self.convert(&root))
    }

    /// Convert a pre-parsed element tree into a record tree.
    pub fn convert(&self, root: &Node) -> Conversion {
        let mut diagnostics = Vec::new();
        let sink = walker::convert_tree(root, &self.options, &mut diagnostics);
        Conversion {
            root: sink,
            diagnostics,
        }
    }

    /// Convert a pre-parsed element tree directly into a host sink.
    ///
    /// The unpack-tree option does not apply here; all geometry accumulates
    /// into the one sink the host provided.
    pub fn convert_into<S: ShapeSink>(&self, root: &Node, sink: &mut S) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        walker::convert_into(root, &self.options, sink, &mut diagnostics);
        diagnostics
    }
}

/// The result of a conversion: the record tree plus collected diagnostics.
#[derive(Debug)]
pub struct Conversion {
    pub root: RecordSink,
    pub diagnostics: Vec<Diagnostic>,
}

impl Conversion {
    /// Return the shape records containing the point, in record order.
    ///
    /// With `all` false the search stops at the first qualifying record.
    /// See [`hittest::pick`] for the containment rules.
    pub fn pick_graphics_data(&self, point: Point, all: bool) -> Vec<&ShapeRecord> {
        hittest::pick(&self.root, point, all)
    }
}
