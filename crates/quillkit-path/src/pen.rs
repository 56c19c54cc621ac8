//! The path interpreter: a stateful pen replaying commands into a sink.
//!
//! The pen tracks the cursor position, the current subpath's starting point
//! and the previous command's trailing control point. The control point is
//! tagged with its curve family because smooth commands may only reflect a
//! control point donated by their own family: a quadratic never feeds a
//! smooth cubic and vice versa.

use crate::{PathCommand, PathSink};
use quillkit_geom::{arc_to_cubics, Point};
use tracing::warn;

/// The previous command's trailing control point, tagged by curve family.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
enum PrevControl {
    #[default]
    None,
    Cubic(Point),
    Quad(Point),
}

/// Path interpreter state.
///
/// Starts at the origin with no previous command. One pen replays one
/// path's command list; create a fresh pen per path.
#[derive(Debug, Default)]
pub struct Pen {
    pos: Point,
    subpath_start: Point,
    prev: PrevControl,
    unsupported: Vec<char>,
}

impl Pen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current cursor position.
    pub fn position(&self) -> (f32, f32) {
        (self.pos.x, self.pos.y)
    }

    /// Command letters that were skipped as unsupported during replay.
    pub fn unsupported(&self) -> &[char] {
        &self.unsupported
    }

    /// Replay a command list into the sink.
    pub fn replay(&mut self, commands: &[PathCommand], sink: &mut impl PathSink) {
        for cmd in commands {
            self.step(*cmd, sink);
        }
    }

    /// Process a single command.
    pub fn step(&mut self, cmd: PathCommand, sink: &mut impl PathSink) {
        match cmd {
            PathCommand::MoveTo { abs, x, y } => {
                self.pos = self.resolve(abs, x, y);
                self.subpath_start = self.pos;
                sink.move_to(self.pos.x, self.pos.y);
                self.prev = PrevControl::None;
            }
            PathCommand::LineTo { abs, x, y } => {
                self.pos = self.resolve(abs, x, y);
                sink.line_to(self.pos.x, self.pos.y);
                self.prev = PrevControl::None;
            }
            PathCommand::HorizontalTo { abs, x } => {
                self.pos.x = if abs { x } else { self.pos.x + x };
                sink.line_to(self.pos.x, self.pos.y);
                self.prev = PrevControl::None;
            }
            PathCommand::VerticalTo { abs, y } => {
                self.pos.y = if abs { y } else { self.pos.y + y };
                sink.line_to(self.pos.x, self.pos.y);
                self.prev = PrevControl::None;
            }
            PathCommand::Close => {
                sink.close_path();
                // Subsequent relative commands measure from the subpath
                // start the close jumped back to.
                self.pos = self.subpath_start;
                self.prev = PrevControl::None;
            }
            PathCommand::CubicTo {
                abs,
                x1,
                y1,
                x2,
                y2,
                x,
                y,
            } => {
                let c1 = self.resolve(abs, x1, y1);
                let c2 = self.resolve(abs, x2, y2);
                let end = self.resolve(abs, x, y);
                sink.cubic_to(c1.x, c1.y, c2.x, c2.y, end.x, end.y);
                self.pos = end;
                self.prev = PrevControl::Cubic(c2);
            }
            PathCommand::SmoothCubicTo { abs, x2, y2, x, y } => {
                let c2 = self.resolve(abs, x2, y2);
                let end = self.resolve(abs, x, y);
                match (self.prev, abs) {
                    (PrevControl::Cubic(prev_c2), _) => {
                        let c1 = self.pos.reflect(prev_c2);
                        sink.cubic_to(c1.x, c1.y, c2.x, c2.y, end.x, end.y);
                    }
                    (_, true) => {
                        // No cubic predecessor: the first control point
                        // collapses to the current point.
                        sink.cubic_to(self.pos.x, self.pos.y, c2.x, c2.y, end.x, end.y);
                    }
                    (_, false) => {
                        // Relative form without a cubic predecessor draws a
                        // quadratic through the given control point.
                        sink.quad_to(c2.x, c2.y, end.x, end.y);
                    }
                }
                self.pos = end;
                self.prev = PrevControl::Cubic(c2);
            }
            PathCommand::QuadTo { abs, x1, y1, x, y } => {
                let c = self.resolve(abs, x1, y1);
                let end = self.resolve(abs, x, y);
                sink.quad_to(c.x, c.y, end.x, end.y);
                self.pos = end;
                self.prev = PrevControl::Quad(c);
            }
            PathCommand::SmoothQuadTo { abs, x, y } => {
                let end = self.resolve(abs, x, y);
                if let PrevControl::Quad(prev_c) = self.prev {
                    let c = self.pos.reflect(prev_c);
                    sink.quad_to(c.x, c.y, end.x, end.y);
                    self.prev = PrevControl::Quad(c);
                } else {
                    // No quadratic predecessor: degrade to a straight line.
                    sink.line_to(end.x, end.y);
                    self.prev = PrevControl::None;
                }
                self.pos = end;
            }
            PathCommand::ArcTo {
                abs,
                rx,
                ry,
                rotation,
                large_arc,
                sweep,
                x,
                y,
            } => {
                let end = self.resolve(abs, x, y);
                let segments = arc_to_cubics(self.pos, rx, ry, rotation, large_arc, sweep, end);
                if segments.is_empty() {
                    sink.line_to(end.x, end.y);
                } else {
                    for seg in &segments {
                        sink.cubic_to(
                            seg.c1.x, seg.c1.y, seg.c2.x, seg.c2.y, seg.to.x, seg.to.y,
                        );
                    }
                }
                self.pos = end;
                self.prev = PrevControl::None;
            }
            PathCommand::Unsupported(code) => {
                warn!(code = %code, "skipping unsupported path command");
                self.unsupported.push(code);
            }
        }
    }

    fn resolve(&self, abs: bool, x: f32, y: f32) -> Point {
        if abs {
            Point::new(x, y)
        } else {
            Point::new(self.pos.x + x, self.pos.y + y)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenize;

    /// Sink that records emitted primitives as readable strings.
    #[derive(Debug, Default)]
    struct Recorder {
        ops: Vec<String>,
    }

    impl PathSink for Recorder {
        fn move_to(&mut self, x: f32, y: f32) {
            self.ops.push(format!("M {x} {y}"));
        }
        fn line_to(&mut self, x: f32, y: f32) {
            self.ops.push(format!("L {x} {y}"));
        }
        fn cubic_to(&mut self, c1x: f32, c1y: f32, c2x: f32, c2y: f32, x: f32, y: f32) {
            self.ops
                .push(format!("C {c1x} {c1y} {c2x} {c2y} {x} {y}"));
        }
        fn quad_to(&mut self, cx: f32, cy: f32, x: f32, y: f32) {
            self.ops.push(format!("Q {cx} {cy} {x} {y}"));
        }
        fn close_path(&mut self) {
            self.ops.push("Z".to_string());
        }
    }

    fn replay(d: &str) -> Vec<String> {
        let mut pen = Pen::new();
        let mut rec = Recorder::default();
        pen.replay(&tokenize(d), &mut rec);
        rec.ops
    }

    #[test]
    fn test_absolute_relative_equivalence() {
        assert_eq!(replay("M 0 0 L 10 10"), replay("m 0 0 l 10 10"));
        assert_eq!(
            replay("M 5 5 C 10 5 15 10 15 15"),
            replay("m 5 5 c 5 0 10 5 10 10")
        );
        assert_eq!(replay("M 2 3 H 7 V 9"), replay("m 2 3 h 5 v 6"));
    }

    #[test]
    fn test_smooth_cubic_reflection() {
        let ops = replay("M 0 0 C 0 0 10 0 10 10 S 10 20 20 20");
        // Reflection of (10, 0) across (10, 10) is (10, 20).
        assert_eq!(ops[2], "C 10 20 10 20 20 20");
    }

    #[test]
    fn test_smooth_cubic_absolute_without_predecessor() {
        let ops = replay("M 5 5 S 10 20 20 20");
        // First control point collapses to the current point.
        assert_eq!(ops[1], "C 5 5 10 20 20 20");
    }

    #[test]
    fn test_smooth_cubic_relative_without_predecessor_degrades_to_quad() {
        let ops = replay("M 5 5 s 5 15 15 15");
        assert_eq!(ops[1], "Q 10 20 20 20");
    }

    #[test]
    fn test_smooth_cubic_after_quad_does_not_reflect() {
        // A quadratic predecessor never donates a reflection point to the
        // cubic family.
        let ops = replay("M 0 0 Q 5 10 10 0 S 20 10 20 0");
        assert_eq!(ops[2], "C 10 0 20 10 20 0");
    }

    #[test]
    fn test_smooth_quad_reflection() {
        let ops = replay("M 0 0 Q 5 10 10 0 T 20 0");
        // Reflection of (5, 10) across (10, 0) is (15, -10).
        assert_eq!(ops[2], "Q 15 -10 20 0");
    }

    #[test]
    fn test_smooth_quad_chain_keeps_reflecting() {
        let ops = replay("M 0 0 Q 5 10 10 0 T 20 0 T 30 0");
        assert_eq!(ops[3], "Q 25 10 30 0");
    }

    #[test]
    fn test_smooth_quad_without_predecessor_degrades_to_line() {
        let ops = replay("M 0 0 L 5 5 T 10 10");
        assert_eq!(ops[2], "L 10 10");
    }

    #[test]
    fn test_close_resets_cursor_for_relative_commands() {
        let ops = replay("M 10 10 L 20 10 Z l 5 5");
        // After close the cursor is back at the subpath start (10, 10).
        assert_eq!(ops[3], "L 15 15");
    }

    #[test]
    fn test_arc_emits_cubics_reaching_endpoint() {
        let ops = replay("M 0 0 A 5 5 0 0 1 10 0");
        assert!(ops.len() >= 2);
        let last = ops.last().unwrap();
        assert!(last.starts_with("C "));
        let parts: Vec<f32> = last[2..]
            .split_whitespace()
            .map(|p| p.parse().unwrap())
            .collect();
        assert!((parts[4] - 10.0).abs() < 1e-3);
        assert!(parts[5].abs() < 1e-3);
    }

    #[test]
    fn test_arc_degenerate_draws_line() {
        let ops = replay("M 0 0 A 0 5 0 0 1 10 0");
        assert_eq!(ops[1], "L 10 0");
    }

    #[test]
    fn test_unsupported_command_skipped() {
        let mut pen = Pen::new();
        let mut rec = Recorder::default();
        pen.replay(&tokenize("M 1 1 X 9 L 2 2"), &mut rec);
        assert_eq!(pen.unsupported(), &['X']);
        assert_eq!(rec.ops, vec!["M 1 1", "L 2 2"]);
        // Cursor untouched by the unsupported command.
        assert_eq!(pen.position(), (2.0, 2.0));
    }
}
