use std::cell::Cell;
use std::ops;

use crate::geom::{BBox, BBoxExt, Point};
use super::event::{EventArena, EventId, PolygonType};
use super::status::StatusTree;

/// Sign of a contour's area.  Positive means counter-clockwise, with the y axis pointing up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Winding {
    Positive,
    Negative,
    Zero,
}

#[derive(Clone, Debug, Default)]
pub struct Contour {
    /** Set of points conforming the contour; the last one connects back to the first */
    points: Vec<Point>,
    /** Holes of the contour, as indexes of other contours in the same polygon */
    holes: Vec<usize>,
    // is the contour an external contour? (i.e., is it not a hole?)
    internal: bool,
    _bbox: Cell<Option<BBox>>,
    _signed_area: Cell<Option<f64>>,
}

impl Contour {
    pub fn new() -> Self {
        return Contour::default();
    }

    /// Build a contour from a run of points, dropping consecutive duplicates (including a last
    /// point that repeats the first)
    pub fn from_points<I: IntoIterator<Item = Point>>(points: I) -> Self {
        let mut contour = Contour::new();
        for point in points {
            contour.push(point);
        }
        if contour.points.len() > 1 && contour.points.first() == contour.points.last() {
            contour.points.pop();
        }
        return contour;
    }

    pub fn points(&self) -> &[Point] {
        return &self.points;
    }

    pub fn len(&self) -> usize {
        return self.points.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.points.is_empty();
    }

    pub fn push(&mut self, point: Point) {
        if self.points.last() == Some(&point) {
            return;
        }
        self.points.push(point);
        self.invalidate();
    }

    fn invalidate(&self) {
        self._bbox.set(None);
        self._signed_area.set(None);
    }

    pub fn bbox(&self) -> Option<BBox> {
        if let Some(bbox) = self._bbox.get() {
            return Some(bbox);
        }
        let bbox = BBox::around(&self.points);
        self._bbox.set(bbox);
        return bbox;
    }

    /// Shoelace area: positive when counter-clockwise
    pub fn signed_area(&self) -> f64 {
        if let Some(area) = self._signed_area.get() {
            return area;
        }
        let mut area = 0.;
        if let Some(last) = self.points.last() {
            area = last.to_vector().cross(self.points[0].to_vector());
            for (vertex0, vertex1) in self.points.iter().zip(self.points.iter().skip(1)) {
                area += vertex0.to_vector().cross(vertex1.to_vector());
            }
            area /= 2.;
        }
        self._signed_area.set(Some(area));
        return area;
    }

    pub fn area(&self) -> f64 {
        return self.signed_area().abs();
    }

    pub fn winding(&self) -> Winding {
        let area = self.signed_area();
        if area > 0. {
            Winding::Positive
        }
        else if area < 0. {
            Winding::Negative
        }
        else {
            Winding::Zero
        }
    }

    pub fn clockwise(&self) -> bool {
        return self.signed_area() < 0.;
    }
    pub fn counterclockwise(&self) -> bool {
        return ! self.clockwise();
    }

    pub fn reverse(&mut self) {
        self.points.reverse();
        if let Some(area) = self._signed_area.get() {
            self._signed_area.set(Some(-area));
        }
    }
    pub fn set_clockwise(&mut self) {
        if self.counterclockwise() {
            self.reverse();
        }
    }
    pub fn set_counterclockwise(&mut self) {
        if self.clockwise() {
            self.reverse();
        }
    }

    /// Edges in order, including the closing one
    pub fn segments(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let n = self.points.len();
        return (0 .. n).map(move |i| (self.points[i], self.points[(i + 1) % n]));
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        for point in self.points.iter_mut() {
            *point = Point::new(point.x + dx, point.y + dy);
        }
        self.invalidate();
    }

    pub fn holes(&self) -> &[usize] {
        return &self.holes;
    }

    pub fn external(&self) -> bool {
        return ! self.internal;
    }

    /// Same ring of points, regardless of which point it starts at or which way it runs
    pub fn same_ring(&self, other: &Contour) -> bool {
        let n = self.points.len();
        if n != other.points.len() {
            return false;
        }
        if n == 0 {
            return true;
        }
        let start = match other.points.iter().position(|&p| p == self.points[0]) {
            Some(start) => start,
            None => return false,
        };
        let forwards = (0 .. n).all(|i| self.points[i] == other.points[(start + i) % n]);
        let backwards = (0 .. n).all(|i| self.points[i] == other.points[(start + n - i) % n]);
        return forwards || backwards;
    }
}


#[derive(Clone, Debug, Default)]
pub struct Polygon {
    /** Set of contours conforming the polygon */
    contours: Vec<Contour>,
    _bbox: Cell<Option<BBox>>,
}

impl Polygon {
    pub fn new() -> Self {
        return Polygon::default();
    }

    pub fn from_contours<I: IntoIterator<Item = Contour>>(contours: I) -> Self {
        let mut polygon = Polygon::new();
        for contour in contours {
            polygon.push(contour);
        }
        return polygon;
    }

    pub fn push(&mut self, contour: Contour) {
        self.contours.push(contour);
        self._bbox.set(None);
    }

    pub fn contours(&self) -> &[Contour] {
        return &self.contours;
    }

    pub fn len(&self) -> usize {
        return self.contours.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.contours.is_empty();
    }

    /// Append another polygon's contours after ours
    pub fn join(&mut self, pol: Polygon) {
        let size = self.contours.len();
        for mut contour in pol.contours {
            for hole in &mut contour.holes {
                *hole += size;
            }
            self.contours.push(contour);
        }
        self._bbox.set(None);
    }

    pub fn nvertices(&self) -> usize {
        return self.contours.iter().map(|c| c.points.len()).sum();
    }

    pub fn bbox(&self) -> Option<BBox> {
        if let Some(bbox) = self._bbox.get() {
            return Some(bbox);
        }
        let mut bbox: Option<BBox> = None;
        for contour in &self.contours {
            if let Some(contour_bbox) = contour.bbox() {
                bbox = Some(match bbox {
                    Some(bbox) => bbox.merged(&contour_bbox),
                    None => contour_bbox,
                });
            }
        }
        self._bbox.set(bbox);
        return bbox;
    }

    /// Sum of the contours' signed areas, so holes wound the other way subtract
    pub fn area(&self) -> f64 {
        return self.contours.iter().map(|c| c.signed_area()).sum();
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        for contour in self.contours.iter_mut() {
            contour.translate(dx, dy);
        }
        self._bbox.set(None);
    }

    /// Work out which contours are holes of which others, and orient everything to match:
    /// outer contours counter-clockwise, their holes clockwise, islands inside holes
    /// counter-clockwise again, and so on.
    pub fn compute_holes(&mut self) {
        for contour in self.contours.iter_mut() {
            contour.holes.clear();
            contour.internal = false;
            // Initialize every contour to ccw; we'll fix them all in a moment
            contour.set_counterclockwise();
        }
        if self.contours.len() < 2 {
            return;
        }

        let mut events = EventArena::with_capacity(self.nvertices() * 2);
        // (contour, does the edge run right to left) for each event, by event index.  In a ccw
        // contour the edges running right to left are the top ones, with the outside above them
        let mut owners = Vec::with_capacity(self.nvertices() * 2);
        for (contour_id, contour) in self.contours.iter().enumerate() {
            for (p0, p1) in contour.segments() {
                // vertical segments are not processed
                if p0.x == p1.x {
                    continue;
                }
                if events.add_segment(p0, p1, PolygonType::Subject).is_some() {
                    let faces_outwards = p1.x < p0.x;
                    owners.push((contour_id, faces_outwards));
                    owners.push((contour_id, faces_outwards));
                }
            }
        }

        let mut order: Vec<EventId> = (0 .. events.len()).map(EventId).collect();
        order.sort_by(|&a, &b| events.compare_events(a, b));

        // Sweep until every contour has been seen.  When a contour's leftmost edge enters the
        // sweep line, the nearest active edge below it says where it sits: just above the bottom
        // edge of some contour means inside that contour; just above a top edge means beside it,
        // and so inside whatever contains it.
        let capacity = self.contours.len();
        let mut parent: Vec<Option<usize>> = vec![None; capacity];
        let mut depth: Vec<Option<usize>> = vec![None; capacity];
        let mut nprocessed = 0;
        let mut status = StatusTree::new();
        let cmp = |a: EventId, b: EventId| events.compare_segments(a, b);
        let mut nodes = vec![None; events.len()];
        for &id in &order {
            if nprocessed >= capacity {
                break;
            }

            if ! events[id].left {
                // This is a RIGHT endpoint; this segment is no longer active
                let twin = events[id].other;
                if let Some(node) = nodes[twin.0].take() {
                    status.remove(node);
                }
                continue;
            }

            let node = status.insert(id, &cmp);
            nodes[id.0] = Some(node);

            let (contour_id, _) = owners[id.0];
            if depth[contour_id].is_some() {
                continue;
            }
            nprocessed += 1;

            match status.prev(node) {
                None => {
                    depth[contour_id] = Some(0);
                }
                Some(below_node) => {
                    let (below_contour_id, below_faces_outwards) = owners[status.key(below_node).0];
                    let below_depth = depth[below_contour_id].unwrap_or(0);
                    if below_faces_outwards {
                        parent[contour_id] = parent[below_contour_id];
                        depth[contour_id] = Some(below_depth);
                    }
                    else {
                        parent[contour_id] = Some(below_contour_id);
                        depth[contour_id] = Some(below_depth + 1);
                    }
                }
            }
        }

        for contour_id in 0 .. capacity {
            if depth[contour_id].unwrap_or(0) % 2 == 0 {
                continue;
            }
            self.contours[contour_id].internal = true;
            self.contours[contour_id].set_clockwise();
            if let Some(parent_id) = parent[contour_id] {
                self.contours[parent_id].holes.push(contour_id);
            }
        }
    }
}

impl ops::Index<usize> for Polygon {
    type Output = Contour;

    fn index(&self, index: usize) -> &Self::Output {
        return &self.contours[index];
    }
}
impl ops::IndexMut<usize> for Polygon {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        self._bbox.set(None);
        return &mut self.contours[index];
    }
}

impl PartialEq for Polygon {
    /// Same contours in the same order, each compared with `same_ring`
    fn eq(&self, other: &Polygon) -> bool {
        return self.contours.len() == other.contours.len() &&
            self.contours.iter().zip(other.contours.iter()).all(|(a, b)| a.same_ring(b));
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn contour(points: &[(f64, f64)]) -> Contour {
        Contour::from_points(points.iter().map(|&(x, y)| Point::new(x, y)))
    }

    #[test]
    fn duplicates_are_dropped() {
        let c = contour(&[(0., 0.), (1., 0.), (1., 0.), (1., 1.), (0., 0.)]);
        assert_eq!(c.len(), 3);
        assert_eq!(c.segments().count(), 3);
    }

    #[test]
    fn area_and_winding() {
        let mut c = contour(&[(0., 0.), (2., 0.), (2., 2.), (0., 2.)]);
        assert_eq!(c.signed_area(), 4.);
        assert_eq!(c.winding(), Winding::Positive);
        assert!(c.counterclockwise());
        c.reverse();
        assert_eq!(c.signed_area(), -4.);
        assert_eq!(c.winding(), Winding::Negative);
        assert_eq!(c.area(), 4.);
        assert_eq!(contour(&[(0., 0.), (1., 1.), (2., 2.)]).winding(), Winding::Zero);
    }

    #[test]
    fn bbox_cache_follows_changes() {
        let mut c = contour(&[(0., 0.), (2., 0.), (2., 2.)]);
        assert_eq!(c.bbox().unwrap().max, Point::new(2., 2.));
        c.translate(1., -1.);
        assert_eq!(c.bbox().unwrap().min, Point::new(1., -1.));
        c.push(Point::new(5., 0.));
        assert_eq!(c.bbox().unwrap().max, Point::new(5., 1.));
        assert!(Contour::new().bbox().is_none());
    }

    #[test]
    fn same_ring_ignores_start_and_direction() {
        let a = contour(&[(0., 0.), (1., 0.), (1., 1.), (0., 1.)]);
        let b = contour(&[(1., 1.), (0., 1.), (0., 0.), (1., 0.)]);
        let c = contour(&[(1., 0.), (0., 0.), (0., 1.), (1., 1.)]);
        let d = contour(&[(1., 0.), (0., 0.), (1., 1.), (0., 1.)]);
        assert!(a.same_ring(&b));
        assert!(a.same_ring(&c));
        assert!(! a.same_ring(&d));
    }

    #[test]
    fn join_and_bbox() {
        let mut a = Polygon::from_contours(vec![contour(&[(0., 0.), (1., 0.), (1., 1.)])]);
        let b = Polygon::from_contours(vec![contour(&[(5., 5.), (6., 5.), (6., 7.)])]);
        assert_eq!(a.bbox().unwrap().max, Point::new(1., 1.));
        a.join(b);
        assert_eq!(a.len(), 2);
        assert_eq!(a.nvertices(), 6);
        assert_eq!(a.bbox().unwrap().max, Point::new(6., 7.));
        assert!(Polygon::new().bbox().is_none());
    }

    #[test]
    fn nested_holes() {
        // outer square, a hole in it, an island in the hole, and a separate square off to the side;
        // all given clockwise to make sure orientation gets fixed
        let mut polygon = Polygon::from_contours(vec![
            contour(&[(0., 0.), (0., 10.), (10., 10.), (10., 0.)]),
            contour(&[(2., 2.), (2., 8.), (8., 8.), (8., 2.)]),
            contour(&[(4., 4.), (4., 6.), (6., 6.), (6., 4.)]),
            contour(&[(20., 0.), (20., 10.), (30., 10.), (30., 0.)]),
        ]);
        polygon.compute_holes();

        assert!(polygon[0].external());
        assert!(polygon[0].counterclockwise());
        assert_eq!(polygon[0].holes(), &[1]);

        assert!(! polygon[1].external());
        assert!(polygon[1].clockwise());

        assert!(polygon[2].external());
        assert!(polygon[2].counterclockwise());

        assert!(polygon[3].external());
        assert!(polygon[3].holes().is_empty());

        assert_eq!(polygon.area(), 100. - 36. + 4. + 100.);
    }

    #[test]
    fn sibling_holes() {
        let mut polygon = Polygon::from_contours(vec![
            contour(&[(0., 0.), (10., 0.), (10., 10.), (0., 10.)]),
            contour(&[(1., 1.), (4., 1.), (4., 4.), (1., 4.)]),
            contour(&[(6., 1.), (9., 1.), (9., 9.), (6., 9.)]),
        ]);
        polygon.compute_holes();
        assert_eq!(polygon[0].holes(), &[1, 2]);
        assert!(polygon[1].clockwise());
        assert!(polygon[2].clockwise());
        assert_eq!(polygon.area(), 100. - 9. - 24.);
    }
}
