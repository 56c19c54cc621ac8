//! Golden primitive sequences per path command family.
//!
//! Each case replays tokenized path data through a recording sink and
//! checks the exact emitted primitive stream.

use quillkit_path::{tokenize, PathSink, Pen};

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
        self.ops.push(format!("C {c1x} {c1y} {c2x} {c2y} {x} {y}"));
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
fn test_line_family() {
    assert_eq!(
        replay("M 1 2 L 3 4 H 10 V 20 Z"),
        vec!["M 1 2", "L 3 4", "L 10 4", "L 10 20", "Z"]
    );
    assert_eq!(
        replay("m 1 2 l 3 4 h 10 v 20 z"),
        vec!["M 1 2", "L 4 6", "L 14 6", "L 14 26", "Z"]
    );
}

#[test]
fn test_cubic_family() {
    assert_eq!(
        replay("M 0 0 C 0 5 5 5 5 0 S 10 -5 10 0"),
        vec!["M 0 0", "C 0 5 5 5 5 0", "C 5 -5 10 -5 10 0"]
    );
    // Relative variant of the same geometry.
    assert_eq!(
        replay("m 0 0 c 0 5 5 5 5 0 s 5 -5 5 0"),
        vec!["M 0 0", "C 0 5 5 5 5 0", "C 5 -5 10 -5 10 0"]
    );
}

#[test]
fn test_quadratic_family() {
    assert_eq!(
        replay("M 0 0 Q 5 10 10 0 T 20 0"),
        vec!["M 0 0", "Q 5 10 10 0", "Q 15 -10 20 0"]
    );
    assert_eq!(
        replay("m 0 0 q 5 10 10 0 t 10 0"),
        vec!["M 0 0", "Q 5 10 10 0", "Q 15 -10 20 0"]
    );
}

#[test]
fn test_degradations() {
    // Smooth quadratic with no quadratic predecessor: straight line.
    assert_eq!(replay("M 0 0 T 10 10"), vec!["M 0 0", "L 10 10"]);
    // Relative smooth cubic with no cubic predecessor: quadratic through
    // the provided control point.
    assert_eq!(replay("M 0 0 s 5 5 10 0"), vec!["M 0 0", "Q 5 5 10 0"]);
    // Absolute smooth cubic with no cubic predecessor: first control point
    // collapses to the current point.
    assert_eq!(
        replay("M 0 0 S 5 5 10 0"),
        vec!["M 0 0", "C 0 0 5 5 10 0"]
    );
}

#[test]
fn test_multiple_subpaths() {
    assert_eq!(
        replay("M 0 0 L 4 0 L 4 4 Z M 10 10 L 14 10"),
        vec!["M 0 0", "L 4 0", "L 4 4", "Z", "M 10 10", "L 14 10"]
    );
}

#[test]
fn test_arc_family_endpoints() {
    // The arc decomposes into cubics whose final endpoint is exact.
    let ops = replay("M 0 0 A 5 5 0 0 1 10 0 L 10 5");
    assert!(ops.iter().skip(1).take(ops.len() - 2).all(|o| o.starts_with("C ")));
    assert_eq!(ops.last().unwrap(), "L 10 5");

    // Relative arc reaches the same endpoint.
    let rel = replay("M 0 0 a 5 5 0 0 1 10 0 L 10 5");
    assert_eq!(rel.len(), ops.len());
}

#[test]
fn test_mixed_document_path() {
    // A realistic icon path: lines, cubics and a close.
    let ops = replay("M2 4 C2 2.9 2.9 2 4 2 L12 2 C13.1 2 14 2.9 14 4 L14 12 Z");
    assert_eq!(ops.len(), 6);
    assert_eq!(ops[0], "M 2 4");
    assert!(ops[1].starts_with("C "));
    assert_eq!(ops.last().unwrap(), "Z");
}
