//! Elliptical arc to cubic bezier conversion.
//!
//! Follows the SVG 1.1 implementation notes: convert the endpoint
//! parameterization to a center parameterization, then split the sweep into
//! segments of at most 90 degrees, each approximated by one cubic bezier.

use crate::Point;
use smallvec::SmallVec;
use std::f32::consts::PI;

/// One cubic bezier control-point set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicSegment {
    pub c1: Point,
    pub c2: Point,
    pub to: Point,
}

/// Convert an elliptical arc to an ordered list of cubic bezier segments.
///
/// A full 360-degree sweep needs four segments, so the list never spills.
/// Degenerate input (zero radius, or start coinciding with end) produces an
/// empty list; the caller is expected to draw a straight line instead.
#[allow(clippy::too_many_arguments)]
pub fn arc_to_cubics(
    start: Point,
    rx: f32,
    ry: f32,
    x_axis_rotation_deg: f32,
    large_arc: bool,
    sweep: bool,
    end: Point,
) -> SmallVec<[CubicSegment; 4]> {
    let mut rx = rx.abs();
    let mut ry = ry.abs();
    if rx == 0.0 || ry == 0.0 || start == end {
        return SmallVec::new();
    }

    let phi = x_axis_rotation_deg.to_radians();
    let sin_phi = phi.sin();
    let cos_phi = phi.cos();

    // Step 1: half the vector between endpoints, in the ellipse's frame.
    let dx2 = (start.x - end.x) / 2.0;
    let dy2 = (start.y - end.y) / 2.0;
    let x1p = cos_phi * dx2 + sin_phi * dy2;
    let y1p = -sin_phi * dx2 + cos_phi * dy2;

    // Step 2: scale radii up if they cannot span the endpoints.
    let lambda = (x1p * x1p) / (rx * rx) + (y1p * y1p) / (ry * ry);
    if lambda > 1.0 {
        let s = lambda.sqrt();
        rx *= s;
        ry *= s;
    }

    // Step 3: center in the ellipse's frame.
    let rx2 = rx * rx;
    let ry2 = ry * ry;
    let x1p2 = x1p * x1p;
    let y1p2 = y1p * y1p;
    let num = rx2 * ry2 - rx2 * y1p2 - ry2 * x1p2;
    let den = rx2 * y1p2 + ry2 * x1p2;
    let mut coef = 0.0;
    if den != 0.0 {
        let sign = if large_arc == sweep { -1.0 } else { 1.0 };
        coef = sign * (num / den).max(0.0).sqrt();
    }
    let cxp = coef * (rx * y1p / ry);
    let cyp = coef * (-ry * x1p / rx);

    // Step 4: center in user space.
    let cx = cos_phi * cxp - sin_phi * cyp + (start.x + end.x) / 2.0;
    let cy = sin_phi * cxp + cos_phi * cyp + (start.y + end.y) / 2.0;

    // Step 5: start angle and sweep extent.
    fn angle(ux: f32, uy: f32, vx: f32, vy: f32) -> f32 {
        let dot = ux * vx + uy * vy;
        let det = ux * vy - uy * vx;
        det.atan2(dot)
    }

    let ux = (x1p - cxp) / rx;
    let uy = (y1p - cyp) / ry;
    let vx = (-x1p - cxp) / rx;
    let vy = (-y1p - cyp) / ry;

    let mut theta = angle(1.0, 0.0, ux, uy);
    let mut dtheta = angle(ux, uy, vx, vy);
    if !sweep && dtheta > 0.0 {
        dtheta -= 2.0 * PI;
    } else if sweep && dtheta < 0.0 {
        dtheta += 2.0 * PI;
    }

    // Split into segments of at most 90 degrees.
    let count = (dtheta.abs() / (PI / 2.0)).ceil().max(1.0) as usize;
    let delta = dtheta / count as f32;

    let mut out = SmallVec::new();
    for _ in 0..count {
        out.push(segment_to_cubic(
            cx,
            cy,
            rx,
            ry,
            sin_phi,
            cos_phi,
            theta,
            theta + delta,
        ));
        theta += delta;
    }
    out
}

/// Approximate one elliptical arc segment `t1..t2` with a cubic bezier.
#[allow(clippy::too_many_arguments)]
fn segment_to_cubic(
    cx: f32,
    cy: f32,
    rx: f32,
    ry: f32,
    sin_phi: f32,
    cos_phi: f32,
    t1: f32,
    t2: f32,
) -> CubicSegment {
    let dt = t2 - t1;
    let k = (4.0 / 3.0) * (dt / 4.0).tan();

    let s1 = t1.sin();
    let c1 = t1.cos();
    let s2 = t2.sin();
    let c2 = t2.cos();

    // Control points on the unit circle, then mapped onto the ellipse.
    let map = |x: f32, y: f32| -> Point {
        let ex = x * rx;
        let ey = y * ry;
        Point {
            x: cos_phi * ex - sin_phi * ey + cx,
            y: sin_phi * ex + cos_phi * ey + cy,
        }
    };

    CubicSegment {
        c1: map(c1 - k * s1, s1 + k * c1),
        c2: map(c2 + k * s2, s2 - k * c2),
        to: map(c2, s2),
    }
}
