use crate::geom::Point;

/// Anything closer than this to a segment's supporting line is considered to lie on it
pub const POINT_TOLERANCE: f64 = 1e-9;

// Squared sine of the angle below which two directions are treated as parallel
const PARALLEL_SQR_EPSILON: f64 = 1e-14;

// Computed intersection points this close (squared) to an input endpoint are replaced by it
const SNAP_SQR_DISTANCE: f64 = POINT_TOLERANCE * POINT_TOLERANCE;

// Shewchuk's error bound for the non-robust orientation determinant
const HALF_EPSILON: f64 = f64::EPSILON * 0.5;
const CCW_ERRBOUND_A: f64 = (3.0 + 16.0 * HALF_EPSILON) * HALF_EPSILON;


// NOTE: everything here assumes the y axis points UP; positive area means counter-clockwise
pub fn signed_area(a: Point, b: Point, c: Point) -> f64 {
    return (a.x - c.x) * (b.y - c.y) - (a.y - c.y) * (b.x - c.x);
}

/// Sign of the area of the triangle (a, b, c): 1 if counter-clockwise, -1 if clockwise, 0 if the
/// three points are collinear.  Results too small to be trusted are snapped to 0.
pub fn orient2d(a: Point, b: Point, c: Point) -> i8 {
    let detleft = (a.x - c.x) * (b.y - c.y);
    let detright = (a.y - c.y) * (b.x - c.x);
    let det = detleft - detright;

    let detsum;
    if detleft > 0. {
        if detright <= 0. {
            return sign(det);
        }
        detsum = detleft + detright;
    }
    else if detleft < 0. {
        if detright >= 0. {
            return sign(det);
        }
        detsum = -detleft - detright;
    }
    else {
        return sign(det);
    }

    let errbound = CCW_ERRBOUND_A * detsum;
    if det >= errbound || -det >= errbound {
        return sign(det);
    }
    return 0;
}

fn sign(value: f64) -> i8 {
    if value > 0. {
        1
    }
    else if value < 0. {
        -1
    }
    else {
        0
    }
}


#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SegmentIntersection {
    None,
    Point(Point),
    /// The segments are collinear and share this stretch
    Overlap(Point, Point),
}

fn check_span_overlap(u0: f64, u1: f64, v0: f64, v1: f64) -> Option<(f64, f64)> {
    if u1 < v0 || u0 > v1 {
        return None;
    }
    if u1 > v0 {
        if u0 < v1 {
            return Some((u0.max(v0), u1.min(v1)));
        }
        else {
            // u0 == v1
            return Some((u0, u0));
        }
    }
    else {
        // u1 == v0
        return Some((u1, u1));
    }
}

fn snap_to_endpoint(point: Point, endpoints: &[Point; 4]) -> Point {
    for &endpoint in endpoints.iter() {
        if (point - endpoint).square_length() < SNAP_SQR_DISTANCE {
            return endpoint;
        }
    }
    return point;
}

/// Does p lie on the segment (s0, s1), within POINT_TOLERANCE of its line?
pub fn point_on_segment(p: Point, s0: Point, s1: Point) -> bool {
    let d = s1 - s0;
    let sqr_len = d.square_length();
    let e = p - s0;
    let t = e.dot(d) / sqr_len;
    if t < 0. || t > 1. {
        return false;
    }
    return e.cross(d).abs() / sqr_len.sqrt() <= POINT_TOLERANCE;
}

/// Intersect the segments (a0, a1) and (b0, b1).  Either may be degenerate (a single point).
pub fn intersect_segments(a0: Point, a1: Point, b0: Point, b1: Point) -> SegmentIntersection {
    let d0 = a1 - a0;
    let d1 = b1 - b0;
    let sqr_len0 = d0.square_length();
    let sqr_len1 = d1.square_length();

    if sqr_len0 == 0. {
        if sqr_len1 == 0. {
            return if a0 == b0 { SegmentIntersection::Point(a0) } else { SegmentIntersection::None };
        }
        return if point_on_segment(a0, b0, b1) { SegmentIntersection::Point(a0) } else { SegmentIntersection::None };
    }
    if sqr_len1 == 0. {
        return if point_on_segment(b0, a0, a1) { SegmentIntersection::Point(b0) } else { SegmentIntersection::None };
    }

    let endpoints = [a0, a1, b0, b1];
    let e = b0 - a0;
    let kross = d0.cross(d1);
    if kross * kross > PARALLEL_SQR_EPSILON * sqr_len0 * sqr_len1 {
        // Lines containing these segments intersect; check whether the segments themselves do
        let s = e.cross(d1) / kross;
        if s < 0. || s > 1. {
            return SegmentIntersection::None;
        }
        let t = e.cross(d0) / kross;
        if t < 0. || t > 1. {
            return SegmentIntersection::None;
        }
        return SegmentIntersection::Point(snap_to_endpoint(a0 + d0 * s, &endpoints));
    }

    // Segments are parallel; check if they're collinear
    let sqr_len_e = e.square_length();
    let kross = e.cross(d0);
    if kross * kross > PARALLEL_SQR_EPSILON * sqr_len0 * sqr_len_e {
        return SegmentIntersection::None;
    }

    // Collinear; project the second segment onto the first one's parameter line
    let s0 = d0.dot(e) / sqr_len0;
    let s1 = s0 + d0.dot(d1) / sqr_len0;
    let smin = s0.min(s1);
    let smax = s0.max(s1);
    match check_span_overlap(0., 1., smin, smax) {
        None => SegmentIntersection::None,
        Some((begin, end)) => {
            let first = snap_to_endpoint(a0 + d0 * begin, &endpoints);
            if begin == end {
                SegmentIntersection::Point(first)
            }
            else {
                SegmentIntersection::Overlap(first, snap_to_endpoint(a0 + d0 * end, &endpoints))
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn pt(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn orientation_signs() {
        assert_eq!(orient2d(pt(0., 0.), pt(1., 0.), pt(0., 1.)), 1);
        assert_eq!(orient2d(pt(0., 0.), pt(0., 1.), pt(1., 0.)), -1);
        assert_eq!(orient2d(pt(0., 0.), pt(1., 1.), pt(2., 2.)), 0);
        assert!(signed_area(pt(0., 0.), pt(1., 0.), pt(0., 1.)) > 0.);
    }

    #[test]
    fn orientation_of_nearly_collinear_points() {
        // 0.1 + 0.2 != 0.3 in floating point, but the points are on one line
        let a = pt(0.1, 0.1);
        let b = pt(0.2, 0.2);
        let c = pt(0.1 + 0.2, 0.3);
        assert_eq!(orient2d(a, b, c), 0);
    }

    #[test]
    fn crossing_segments() {
        let result = intersect_segments(pt(0., 0.), pt(2., 2.), pt(0., 2.), pt(2., 0.));
        assert_eq!(result, SegmentIntersection::Point(pt(1., 1.)));
    }

    #[test]
    fn segments_that_miss() {
        let result = intersect_segments(pt(0., 0.), pt(1., 1.), pt(0., 3.), pt(3., 2.));
        assert_eq!(result, SegmentIntersection::None);
        // parallel but not collinear
        let result = intersect_segments(pt(0., 0.), pt(2., 0.), pt(0., 1.), pt(2., 1.));
        assert_eq!(result, SegmentIntersection::None);
    }

    #[test]
    fn touching_at_an_endpoint() {
        let result = intersect_segments(pt(0., 0.), pt(1., 0.), pt(1., 0.), pt(1., 1.));
        assert_eq!(result, SegmentIntersection::Point(pt(1., 0.)));
        let result = intersect_segments(pt(0., 0.), pt(2., 0.), pt(1., 0.), pt(1., 1.));
        assert_eq!(result, SegmentIntersection::Point(pt(1., 0.)));
    }

    #[test]
    fn collinear_overlaps() {
        // partial overlap
        let result = intersect_segments(pt(0., 0.), pt(2., 0.), pt(1., 0.), pt(3., 0.));
        assert_eq!(result, SegmentIntersection::Overlap(pt(1., 0.), pt(2., 0.)));
        // containment gives back the contained segment
        let result = intersect_segments(pt(0., 0.), pt(4., 0.), pt(3., 0.), pt(1., 0.));
        assert_eq!(result, SegmentIntersection::Overlap(pt(1., 0.), pt(3., 0.)));
        // collinear, only touching
        let result = intersect_segments(pt(0., 0.), pt(1., 1.), pt(1., 1.), pt(2., 2.));
        assert_eq!(result, SegmentIntersection::Point(pt(1., 1.)));
        // collinear, disjoint
        let result = intersect_segments(pt(0., 0.), pt(1., 0.), pt(2., 0.), pt(3., 0.));
        assert_eq!(result, SegmentIntersection::None);
    }

    #[test]
    fn degenerate_segments() {
        let result = intersect_segments(pt(1., 1.), pt(1., 1.), pt(0., 0.), pt(2., 2.));
        assert_eq!(result, SegmentIntersection::Point(pt(1., 1.)));
        let result = intersect_segments(pt(0., 0.), pt(2., 0.), pt(1., 1e-12), pt(1., 1e-12));
        assert_eq!(result, SegmentIntersection::Point(pt(1., 1e-12)));
        let result = intersect_segments(pt(0., 0.), pt(2., 0.), pt(3., 0.), pt(3., 0.));
        assert_eq!(result, SegmentIntersection::None);
        let result = intersect_segments(pt(5., 5.), pt(5., 5.), pt(5., 5.), pt(5., 5.));
        assert_eq!(result, SegmentIntersection::Point(pt(5., 5.)));
    }
}
