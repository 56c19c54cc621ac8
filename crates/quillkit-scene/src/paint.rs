//! Paint resolution: resolved style fields to concrete fill/stroke state.

use crate::{ConvertOptions, LocalStyle};
use quillkit_color::{self as color, Color};

/// Minimum width an explicit stroke-width is clamped to.
const MIN_STROKE_WIDTH: f32 = 0.5;

/// Resolved fill state for one shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FillStyle {
    pub color: Color,
    pub alpha: f32,
}

impl FillStyle {
    /// An invisible fill never matches hit tests.
    pub fn is_visible(&self) -> bool {
        self.alpha > 0.0
    }
}

/// Resolved stroke state for one shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub width: f32,
    pub color: Color,
    pub alpha: f32,
}

/// Resolve the fill paint for a node's merged style.
///
/// `none`/`transparent` force a fully transparent fill regardless of the
/// channel opacity; an unset fill uses the configured default color. An
/// explicit `opacity` overrides the channel opacity for this node.
pub fn resolve_fill(style: &LocalStyle, options: &ConvertOptions) -> FillStyle {
    let alpha = style
        .opacity
        .or(style.fill_opacity)
        .unwrap_or(options.fill_opacity);

    match style.fill.as_deref().map(str::trim) {
        Some("none") | Some("transparent") => FillStyle {
            color: Color::TRANSPARENT,
            alpha: 0.0,
        },
        Some(value) => FillStyle {
            color: color::resolve(value).unwrap_or(options.fill_color),
            alpha,
        },
        None => FillStyle {
            color: options.fill_color,
            alpha,
        },
    }
}

/// Resolve the stroke for a node's merged style.
///
/// An explicit width is clamped to at least 0.5; otherwise the configured
/// default width applies only when a stroke color is set. No width means no
/// stroke.
pub fn resolve_stroke(style: &LocalStyle, options: &ConvertOptions) -> Option<StrokeStyle> {
    let stroke = style
        .stroke
        .as_deref()
        .map(str::trim)
        .filter(|s| *s != "none");

    let width = match style.stroke_width {
        Some(w) => w.max(MIN_STROKE_WIDTH),
        None if stroke.is_some() => options.line_width,
        None => return None,
    };

    let alpha = style
        .opacity
        .or(style.stroke_opacity)
        .unwrap_or(options.line_opacity);

    Some(StrokeStyle {
        width,
        color: stroke
            .and_then(color::resolve)
            .unwrap_or(options.line_color),
        alpha,
    })
}
