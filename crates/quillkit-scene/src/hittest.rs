//! Hit testing over accumulated shape records.
//!
//! A query point is given in the walker's root frame. Each record's
//! composed transform is inverted to bring the point into the record's
//! local frame before containment testing. Fill containment uses the
//! even-odd rule over the record's closed contours.

use crate::sink::{Contour, RecordSink, ShapeRecord};
use quillkit_geom::Point;

/// Return the records containing `point`, in record order.
///
/// Records with an invisible fill are skipped, as are records whose
/// composed transform is not invertible (a degenerate transform collapses
/// the shape to zero area). A point inside any of a record's holes does
/// not match that record. With `all` false the search stops at the first
/// match.
///
/// One call runs synchronously to completion; the scratch point it uses is
/// local to the call, so separate conversions can be queried from separate
/// threads.
pub fn pick<'a>(root: &'a RecordSink, point: Point, all: bool) -> Vec<&'a ShapeRecord> {
    let mut hits = Vec::new();
    pick_into(root, point, all, &mut hits);
    hits
}

/// Depth-first accumulation; returns `true` once the search should stop.
fn pick_into<'a>(
    sink: &'a RecordSink,
    point: Point,
    all: bool,
    hits: &mut Vec<&'a ShapeRecord>,
) -> bool {
    for record in sink.records() {
        // Scratch point in the record's local frame.
        let local = match record.transform {
            Some(matrix) => match matrix.invert() {
                Some(inverse) => inverse.apply(point),
                None => continue,
            },
            None => point,
        };

        if !record.fill.is_visible() {
            continue;
        }
        if !contains(record, local) {
            continue;
        }
        if record.holes.iter().any(|hole| contains(hole, local)) {
            continue;
        }

        hits.push(record);
        if !all {
            return true;
        }
    }

    for child in sink.children() {
        if pick_into(child, point, all, hits) {
            return true;
        }
    }
    false
}

/// Even-odd containment against a record's closed contours.
fn contains(record: &ShapeRecord, p: Point) -> bool {
    let mut inside = false;
    for contour in record.contours.iter().filter(|c| c.closed) {
        if crossings_toggle(contour, p) {
            inside = !inside;
        }
    }
    inside
}

/// Ray-cast parity of one contour: whether a ray to +x crosses an odd
/// number of edges.
fn crossings_toggle(contour: &Contour, p: Point) -> bool {
    let pts = &contour.points;
    if pts.len() < 3 {
        return false;
    }
    let mut odd = false;
    let mut j = pts.len() - 1;
    for i in 0..pts.len() {
        let (a, b) = (pts[i], pts[j]);
        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
            if p.x < x_cross {
                odd = !odd;
            }
        }
        j = i;
    }
    odd
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::FillStyle;
    use crate::sink::ShapeSink;
    use quillkit_color::Color;
    use quillkit_geom::Matrix;
    use quillkit_path::PathSink;

    fn square_record(size: f32) -> ShapeRecord {
        let mut sink = RecordSink::new();
        sink.begin_fill(Color::BLACK, 1.0);
        sink.draw_rect(0.0, 0.0, size, size);
        sink.finish();
        sink.records()[0].clone()
    }

    fn sink_of(records: Vec<ShapeRecord>) -> RecordSink {
        let mut sink = RecordSink::new();
        for record in records {
            sink.begin_fill(record.fill.color, record.fill.alpha);
            sink.set_transform(record.transform);
            // Re-emit the outline so the sink owns an equivalent record.
            let contour = &record.contours[0];
            sink.move_to(contour.points[0].x, contour.points[0].y);
            for p in &contour.points[1..] {
                sink.line_to(p.x, p.y);
            }
            sink.close_path();
            sink.finish();
            for hole in record.holes {
                sink.attach_hole(hole);
            }
        }
        sink
    }

    #[test]
    fn test_point_inside_square() {
        let sink = sink_of(vec![square_record(10.0)]);
        assert_eq!(pick(&sink, Point::new(5.0, 5.0), false).len(), 1);
        assert!(pick(&sink, Point::new(15.0, 5.0), false).is_empty());
    }

    #[test]
    fn test_invisible_fill_never_matches() {
        let mut record = square_record(10.0);
        record.fill = FillStyle {
            color: Color::TRANSPARENT,
            alpha: 0.0,
        };
        let sink = sink_of(vec![record]);
        assert!(pick(&sink, Point::new(5.0, 5.0), true).is_empty());
    }

    #[test]
    fn test_hole_excludes_point() {
        let mut record = square_record(10.0);
        let mut hole = square_record(2.0);
        // Hole covering (4,4)..(6,6).
        for p in &mut hole.contours[0].points {
            p.x += 4.0;
            p.y += 4.0;
        }
        record.holes.push(hole);
        let sink = sink_of(vec![record]);

        assert!(pick(&sink, Point::new(5.0, 5.0), true).is_empty());
        assert_eq!(pick(&sink, Point::new(1.0, 1.0), true).len(), 1);
    }

    #[test]
    fn test_first_vs_all_on_overlapping_fills() {
        let sink = sink_of(vec![square_record(10.0), square_record(8.0)]);
        let point = Point::new(4.0, 4.0);
        assert_eq!(pick(&sink, point, false).len(), 1);
        assert_eq!(pick(&sink, point, true).len(), 2);
    }

    #[test]
    fn test_transform_inverted_before_test() {
        let mut record = square_record(10.0);
        record.transform = Some(Matrix::translation(100.0, 0.0));
        let sink = sink_of(vec![record]);

        assert_eq!(pick(&sink, Point::new(105.0, 5.0), true).len(), 1);
        assert!(pick(&sink, Point::new(5.0, 5.0), true).is_empty());
    }

    #[test]
    fn test_degenerate_transform_skipped() {
        let mut record = square_record(10.0);
        record.transform = Some(Matrix::scaling(0.0, 0.0));
        let sink = sink_of(vec![record]);
        assert!(pick(&sink, Point::new(0.0, 0.0), true).is_empty());
    }
}
