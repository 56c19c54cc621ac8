//! The shape sink seam and the record-collecting reference sink.
//!
//! `ShapeSink` is the full drawing interface the walker talks to: the
//! geometry calls inherited from [`PathSink`] plus paint state and direct
//! shapes. Hosts with their own rasterizer implement it; `RecordSink`
//! implements it by accumulating flattened, hit-testable `ShapeRecord`s.

use crate::paint::{FillStyle, StrokeStyle};
use quillkit_color::Color;
use quillkit_geom::{cubic_points, ellipse_points, quad_points, Matrix, Point};
use quillkit_path::PathSink;

/// Subdivision used when flattening curves into contour points.
const CURVE_SEGMENTS: usize = 20;
/// Subdivision used for full ellipse outlines.
const ELLIPSE_SEGMENTS: usize = 32;
/// Subdivision used per rounded-rectangle corner.
const CORNER_SEGMENTS: usize = 8;

// ==================== ShapeSink ====================

/// The drawing interface a host surface implements.
///
/// The walker sets the paint state (`begin_fill`, `set_line_style`,
/// `set_transform`) before emitting geometry for each node.
pub trait ShapeSink: PathSink {
    /// Start filling subsequent geometry with the given color and alpha.
    fn begin_fill(&mut self, color: Color, alpha: f32);
    /// Set the stroke for subsequent geometry. A zero width disables the
    /// stroke.
    fn set_line_style(&mut self, width: f32, color: Color, alpha: f32);
    /// Set the composed transform for subsequent geometry (`None` when the
    /// node resolved no transform).
    fn set_transform(&mut self, matrix: Option<Matrix>);

    fn draw_rect(&mut self, x: f32, y: f32, width: f32, height: f32);
    fn draw_round_rect(&mut self, x: f32, y: f32, width: f32, height: f32, radius: f32);
    fn draw_ellipse(&mut self, cx: f32, cy: f32, rx: f32, ry: f32);
    fn draw_circle(&mut self, cx: f32, cy: f32, r: f32) {
        self.draw_ellipse(cx, cy, r, r);
    }
    /// Draw a connected point sequence; `close` joins the last point back
    /// to the first.
    fn draw_polygon(&mut self, points: &[Point], close: bool);
}

// ==================== Records ====================

/// One flattened contour of a shape, in the shape's local frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    pub points: Vec<Point>,
    pub closed: bool,
}

/// One accumulated shape: geometry plus the drawing state it was emitted
/// under.
///
/// `holes` are nested records whose containment excludes a point from the
/// parent during hit testing.
#[derive(Debug, Clone)]
pub struct ShapeRecord {
    pub fill: FillStyle,
    pub stroke: Option<StrokeStyle>,
    pub transform: Option<Matrix>,
    pub contours: Vec<Contour>,
    pub holes: Vec<ShapeRecord>,
}

// ==================== RecordSink ====================

/// Reference `ShapeSink` that accumulates shape records.
///
/// Curves are flattened into polyline contours so records can be
/// hit-tested. In unpack mode the converter arranges one named sink per
/// markup node as a tree of child sinks.
#[derive(Debug)]
pub struct RecordSink {
    /// Sink name: the element id, or a synthesized ordinal name.
    pub name: Option<String>,
    /// Tag of the element this sink mirrors (unpack mode).
    pub tag: Option<String>,

    records: Vec<ShapeRecord>,
    children: Vec<RecordSink>,

    fill: FillStyle,
    stroke: Option<StrokeStyle>,
    transform: Option<Matrix>,

    /// Completed contours of the record being built.
    pending: Vec<Contour>,
    /// Points of the contour being built.
    current: Vec<Point>,
}

impl Default for RecordSink {
    fn default() -> Self {
        Self {
            name: None,
            tag: None,
            records: Vec::new(),
            children: Vec::new(),
            fill: FillStyle {
                color: Color::BLACK,
                alpha: 1.0,
            },
            stroke: None,
            transform: None,
            pending: Vec::new(),
            current: Vec::new(),
        }
    }
}

impl RecordSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(name: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            tag: Some(tag.into()),
            ..Self::default()
        }
    }

    pub fn records(&self) -> &[ShapeRecord] {
        &self.records
    }

    pub fn children(&self) -> &[RecordSink] {
        &self.children
    }

    /// Total record count including child sinks.
    pub fn record_count(&self) -> usize {
        self.records.len() + self.children.iter().map(RecordSink::record_count).sum::<usize>()
    }

    /// Attach a child sink (unpack mode).
    pub fn attach_child(&mut self, child: RecordSink) {
        self.children.push(child);
    }

    /// Attach an explicit hole to the most recent record.
    ///
    /// For producers that run their own fill-rule analysis instead of the
    /// closed-subpath convention used for path geometry.
    pub fn attach_hole(&mut self, hole: ShapeRecord) {
        if let Some(last) = self.records.last_mut() {
            last.holes.push(hole);
        }
    }

    /// Finalize any in-progress geometry into a record.
    ///
    /// Called by the converter when a node's geometry is complete; a new
    /// `begin_fill` or `set_transform` also flushes implicitly.
    pub fn finish(&mut self) {
        self.end_contour();
        if self.pending.is_empty() {
            return;
        }

        let contours = std::mem::take(&mut self.pending);
        let (closed, open): (Vec<Contour>, Vec<Contour>) =
            contours.into_iter().partition(|c| c.closed);

        // First closed subpath is the outer outline; later closed subpaths
        // become holes. Open subpaths stay on the main record (stroke
        // geometry, never fill containment).
        let mut iter = closed.into_iter();
        let mut contours: Vec<Contour> = iter.next().into_iter().collect();
        let holes: Vec<ShapeRecord> = iter
            .map(|contour| ShapeRecord {
                fill: self.fill,
                stroke: self.stroke,
                transform: self.transform,
                contours: vec![contour],
                holes: Vec::new(),
            })
            .collect();
        contours.extend(open);

        self.records.push(ShapeRecord {
            fill: self.fill,
            stroke: self.stroke,
            transform: self.transform,
            contours,
            holes,
        });
    }

    fn end_contour(&mut self) {
        if self.current.len() >= 2 {
            let points = std::mem::take(&mut self.current);
            self.pending.push(Contour {
                points,
                closed: false,
            });
        } else {
            self.current.clear();
        }
    }

    fn cursor(&self) -> Point {
        self.current.last().copied().unwrap_or(Point::ZERO)
    }

    fn push_record(&mut self, contours: Vec<Contour>) {
        self.finish();
        self.records.push(ShapeRecord {
            fill: self.fill,
            stroke: self.stroke,
            transform: self.transform,
            contours,
            holes: Vec::new(),
        });
    }
}

impl PathSink for RecordSink {
    fn move_to(&mut self, x: f32, y: f32) {
        self.end_contour();
        self.current.push(Point::new(x, y));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.current.push(Point::new(x, y));
    }

    fn cubic_to(&mut self, c1x: f32, c1y: f32, c2x: f32, c2y: f32, x: f32, y: f32) {
        let from = self.cursor();
        self.current.extend(cubic_points(
            from,
            Point::new(c1x, c1y),
            Point::new(c2x, c2y),
            Point::new(x, y),
            CURVE_SEGMENTS,
        ));
    }

    fn quad_to(&mut self, cx: f32, cy: f32, x: f32, y: f32) {
        let from = self.cursor();
        self.current.extend(quad_points(
            from,
            Point::new(cx, cy),
            Point::new(x, y),
            CURVE_SEGMENTS,
        ));
    }

    fn close_path(&mut self) {
        let start = self.current.first().copied();
        if self.current.len() >= 3 {
            let points = std::mem::take(&mut self.current);
            self.pending.push(Contour {
                points,
                closed: true,
            });
        } else {
            self.current.clear();
        }
        // Geometry after a close (without an explicit move) continues from
        // the closed subpath's start; a following move drops the seed.
        if let Some(p) = start {
            self.current.push(p);
        }
    }
}

impl ShapeSink for RecordSink {
    fn begin_fill(&mut self, color: Color, alpha: f32) {
        self.finish();
        self.fill = FillStyle { color, alpha };
    }

    fn set_line_style(&mut self, width: f32, color: Color, alpha: f32) {
        self.stroke = if width > 0.0 {
            Some(StrokeStyle {
                width,
                color,
                alpha,
            })
        } else {
            None
        };
    }

    fn set_transform(&mut self, matrix: Option<Matrix>) {
        self.finish();
        self.transform = matrix;
    }

    fn draw_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        self.push_record(vec![Contour {
            points: vec![
                Point::new(x, y),
                Point::new(x + width, y),
                Point::new(x + width, y + height),
                Point::new(x, y + height),
            ],
            closed: true,
        }]);
    }

    fn draw_round_rect(&mut self, x: f32, y: f32, width: f32, height: f32, radius: f32) {
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        let r = radius.abs().min(width / 2.0).min(height / 2.0);
        if r == 0.0 {
            self.draw_rect(x, y, width, height);
            return;
        }
        self.push_record(vec![Contour {
            points: round_rect_outline(x, y, width, height, r),
            closed: true,
        }]);
    }

    fn draw_ellipse(&mut self, cx: f32, cy: f32, rx: f32, ry: f32) {
        if rx <= 0.0 || ry <= 0.0 {
            return;
        }
        self.push_record(vec![Contour {
            points: ellipse_points(Point::new(cx, cy), rx, ry, ELLIPSE_SEGMENTS),
            closed: true,
        }]);
    }

    fn draw_polygon(&mut self, points: &[Point], close: bool) {
        if points.len() < 2 {
            return;
        }
        self.push_record(vec![Contour {
            points: points.to_vec(),
            closed: close && points.len() >= 3,
        }]);
    }
}

/// Outline of a rounded rectangle with uniform corner radius, clockwise
/// from the top-left corner's end.
fn round_rect_outline(x: f32, y: f32, width: f32, height: f32, r: f32) -> Vec<Point> {
    use std::f32::consts::FRAC_PI_2;

    // Corner centers, with the parameter range sweeping each quarter turn.
    let corners = [
        (x + width - r, y + r, -FRAC_PI_2), // top-right
        (x + width - r, y + height - r, 0.0), // bottom-right
        (x + r, y + height - r, FRAC_PI_2), // bottom-left
        (x + r, y + r, 2.0 * FRAC_PI_2),    // top-left
    ];

    let mut points = Vec::with_capacity(4 * (CORNER_SEGMENTS + 1));
    for (cx, cy, start) in corners {
        for i in 0..=CORNER_SEGMENTS {
            let t = start + FRAC_PI_2 * i as f32 / CORNER_SEGMENTS as f32;
            points.push(Point::new(cx + r * t.cos(), cy + r * t.sin()));
        }
    }
    points
}
