use std::cmp::Ordering;
use std::collections::{HashMap, VecDeque};
use std::mem;

use crate::geom::{Point, Vector};
use super::polygon::{Contour, Polygon};

/// A run of connected result edges, growing at both ends until it closes up
#[derive(Clone, Debug)]
pub struct PointChain {
    points: VecDeque<Point>,
    closed: bool,
}

impl PointChain {
    pub fn new(start: Point, end: Point) -> Self {
        let mut points = VecDeque::new();
        points.push_back(start);
        points.push_back(end);
        return PointChain{ points, closed: false };
    }

    pub fn len(&self) -> usize {
        return self.points.len();
    }

    pub fn is_closed(&self) -> bool {
        return self.closed;
    }

    pub fn points(&self) -> impl Iterator<Item = &Point> {
        return self.points.iter();
    }

    // A chain always holds at least two points, so these can't come up empty

    pub fn front(&self) -> Point {
        return self.points[0];
    }

    pub fn back(&self) -> Point {
        return self.points[self.points.len() - 1];
    }

    pub fn reverse(&mut self) {
        self.points.make_contiguous().reverse();
    }

    /// Try to attach the segment (a, b) to either end of the chain.  Returns false if it doesn't
    /// touch either end.
    pub fn link_segment(&mut self, a: Point, b: Point) -> bool {
        let front = self.front();
        let back = self.back();
        if a == front {
            if b == back {
                self.closed = true;
            }
            else {
                self.points.push_front(b);
            }
            return true;
        }
        if b == back {
            if a == front {
                self.closed = true;
            }
            else {
                self.points.push_back(a);
            }
            return true;
        }
        if b == front {
            if a == back {
                self.closed = true;
            }
            else {
                self.points.push_front(a);
            }
            return true;
        }
        if a == back {
            if b == front {
                self.closed = true;
            }
            else {
                self.points.push_back(b);
            }
            return true;
        }
        return false;
    }

    /// Could `link_point_chain` join these two?
    pub fn touches(&self, other: &PointChain) -> bool {
        let front = self.front();
        let back = self.back();
        return other.front() == back || other.back() == front || other.front() == front || other.back() == back;
    }

    /// Absorb another chain that shares an end with this one, reversing as necessary.  On
    /// success `other` is left empty.
    pub fn link_point_chain(&mut self, other: &mut PointChain) -> bool {
        let front = self.front();
        let back = self.back();
        if other.front() == back {
            self.points.pop_back();
            self.points.append(&mut other.points);
        }
        else if other.back() == front {
            self.points.pop_front();
            other.points.append(&mut self.points);
            mem::swap(&mut self.points, &mut other.points);
        }
        else if other.front() == front {
            self.points.pop_front();
            other.reverse();
            other.points.append(&mut self.points);
            mem::swap(&mut self.points, &mut other.points);
        }
        else if other.back() == back {
            self.points.pop_back();
            self.reverse();
            other.points.append(&mut self.points);
            mem::swap(&mut self.points, &mut other.points);
        }
        else {
            return false;
        }

        // The two chains may have formed a loop between them
        if self.points.len() > 2 && self.front() == self.back() {
            self.points.pop_back();
            self.closed = true;
        }
        return true;
    }

    pub fn into_contour(self) -> Contour {
        return Contour::from_points(self.points);
    }
}


// Points that compare equal need to hash equal; + 0. folds -0. into 0.
type PointKey = (u64, u64);

fn point_key(point: Point) -> PointKey {
    return ((point.x + 0.).to_bits(), (point.y + 0.).to_bits());
}

/// One end of an edge: (edge index, 0 for the first point or 1 for the second)
type EdgeEnd = (usize, usize);

fn end_point(edges: &[(Point, Point)], (edge, end): EdgeEnd) -> Point {
    return if end == 0 { edges[edge].0 } else { edges[edge].1 };
}

fn far_point(edges: &[(Point, Point)], (edge, end): EdgeEnd) -> Point {
    return end_point(edges, (edge, 1 - end));
}

/// Re-pair the edges of chains that meet at shared vertices, then trace them into simple rings.
///
/// Going around a vertex, the wedges between consecutive edges are alternately inside and outside
/// the area the edges bound.  The greedy chaining may pair edges across each other; pairing the
/// two edges of each filled wedge instead keeps touching pieces apart.
fn restitch(chains: &[PointChain]) -> Vec<Contour> {
    let mut edges = Vec::new();
    for chain in chains {
        let points: Vec<Point> = chain.points().cloned().collect();
        for (i, &point) in points.iter().enumerate() {
            edges.push((point, points[(i + 1) % points.len()]));
        }
    }

    let mut ends: HashMap<PointKey, Vec<EdgeEnd>> = HashMap::new();
    for (i, &(p0, p1)) in edges.iter().enumerate() {
        ends.entry(point_key(p0)).or_insert_with(Vec::new).push((i, 0));
        ends.entry(point_key(p1)).or_insert_with(Vec::new).push((i, 1));
    }

    let mut partner: Vec<[Option<EdgeEnd>; 2]> = vec![[None, None]; edges.len()];
    for around in ends.values_mut() {
        let vertex = end_point(&edges, around[0]);
        let angle = |end: EdgeEnd| {
            let d = far_point(&edges, end) - vertex;
            d.y.atan2(d.x)
        };
        around.sort_by(|&a, &b| angle(a).partial_cmp(&angle(b)).unwrap_or(Ordering::Equal));

        let n = around.len();
        let mut shift = 0;
        if n > 2 && ! wedge_is_filled(&edges, vertex, far_point(&edges, around[0]), far_point(&edges, around[1])) {
            shift = 1;
        }
        for k in (0 .. n - 1).step_by(2) {
            let a = around[(k + shift) % n];
            let b = around[(k + 1 + shift) % n];
            partner[a.0][a.1] = Some(b);
            partner[b.0][b.1] = Some(a);
        }
    }

    let mut contours = Vec::new();
    let mut used = vec![false; edges.len()];
    for first in 0 .. edges.len() {
        if used[first] {
            continue;
        }
        used[first] = true;

        let mut ring = vec![edges[first].0];
        let mut current = (first, 1);
        let closed = loop {
            let next = match partner[current.0][current.1] {
                Some(next) => next,
                None => break false,
            };
            if next == (first, 0) {
                break true;
            }
            ring.push(end_point(&edges, current));
            current = (next.0, 1 - next.1);
            if used[current.0] {
                break false;
            }
            used[current.0] = true;
        };
        if closed {
            contours.extend(split_rings(ring));
        }
        else {
            debug!("dropping a run of {} edges that doesn't close", ring.len());
        }
    }
    return contours;
}

/// Is the wedge swept counter-clockwise from the edge towards `from` to the edge towards `to`
/// inside the area bounded by `edges`?  Casts a ray from a point just inside the wedge.
fn wedge_is_filled(edges: &[(Point, Point)], vertex: Point, from: Point, to: Point) -> bool {
    let r0 = (from - vertex).normalize();
    let r1 = (to - vertex).normalize();
    let turn = r0.cross(r1);
    let bisector = if turn == 0. {
        Vector::new(-r0.y, r0.x)
    }
    else if turn > 0. {
        (r0 + r1).normalize()
    }
    else {
        -(r0 + r1).normalize()
    };

    // Stay closer to the vertex than anything that doesn't touch it
    let reach = edges.iter()
        .map(|&(a, b)| {
            if a == vertex || b == vertex {
                (b - a).length()
            }
            else {
                distance_to_segment(vertex, a, b)
            }
        })
        .fold(f64::INFINITY, f64::min);
    let sample = vertex + bisector * (reach * 0.5);

    let mut inside = false;
    for &(a, b) in edges {
        if (a.y > sample.y) != (b.y > sample.y) {
            let x = a.x + (sample.y - a.y) * (b.x - a.x) / (b.y - a.y);
            if x > sample.x {
                inside = ! inside;
            }
        }
    }
    return inside;
}

fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let d = b - a;
    let t = ((p - a).dot(d) / d.square_length()).max(0.).min(1.);
    return (p - (a + d * t)).length();
}

/// Cut a closed walk that passes through some vertex more than once into simple rings
fn split_rings(points: Vec<Point>) -> Vec<Contour> {
    let mut contours = Vec::new();
    let mut stack: Vec<Point> = Vec::with_capacity(points.len());
    let mut seen: HashMap<PointKey, usize> = HashMap::new();
    for point in points {
        if let Some(&start) = seen.get(&point_key(point)) {
            // Everything since the last visit is a loop of its own
            let ring = stack.split_off(start);
            for &p in ring.iter().skip(1) {
                seen.remove(&point_key(p));
            }
            push_ring(&mut contours, ring);
            stack.push(point);
            continue;
        }
        seen.insert(point_key(point), stack.len());
        stack.push(point);
    }
    push_ring(&mut contours, stack);
    return contours;
}

fn push_ring(contours: &mut Vec<Contour>, ring: Vec<Point>) {
    if ring.len() < 3 {
        trace!("dropping a degenerate loop of {} points", ring.len());
        return;
    }
    contours.push(Contour::from_points(ring));
}


/// Assembles an unordered pile of edges into closed contours
#[derive(Debug, Default)]
pub struct Connector {
    open: Vec<PointChain>,
    closed: Vec<PointChain>,
}

impl Connector {
    pub fn new() -> Self {
        return Connector{ open: Vec::new(), closed: Vec::new() };
    }

    pub fn open_chains(&self) -> &[PointChain] {
        return &self.open;
    }

    pub fn closed_chains(&self) -> &[PointChain] {
        return &self.closed;
    }

    pub fn add(&mut self, a: Point, b: Point) {
        for j in 0 .. self.open.len() {
            if ! self.open[j].link_segment(a, b) {
                continue;
            }

            if self.open[j].is_closed() {
                if self.open[j].len() == 2 {
                    // This was the chain's own single edge coming back the other way, which
                    // doesn't enclose anything
                    self.open[j].closed = false;
                    return;
                }
                let chain = self.open.remove(j);
                self.closed.push(chain);
                return;
            }

            // The new end might meet up with some other chain
            let found = (0 .. self.open.len())
                .find(|&k| k != j && self.open[j].touches(&self.open[k]));
            if let Some(k) = found {
                let mut other = self.open.remove(k);
                let j = if k < j { j - 1 } else { j };
                self.open[j].link_point_chain(&mut other);
                if self.open[j].is_closed() {
                    let chain = self.open.remove(j);
                    self.closed.push(chain);
                }
            }
            return;
        }

        self.open.push(PointChain::new(a, b));
    }

    /// Every closed chain becomes a contour.  Chains that share a vertex with another chain (or
    /// pass through one twice) are re-stitched around it, so every contour is a simple ring.
    /// Chains that never closed are dropped.
    pub fn into_polygon(self) -> Polygon {
        if ! self.open.is_empty() {
            debug!("dropping {} chains that never closed", self.open.len());
        }

        let mut visits: HashMap<PointKey, usize> = HashMap::new();
        for chain in &self.closed {
            for &point in chain.points() {
                *visits.entry(point_key(point)).or_insert(0) += 1;
            }
        }

        let mut polygon = Polygon::new();
        let mut tangled = Vec::new();
        for chain in self.closed {
            if chain.points().any(|&p| visits.get(&point_key(p)).map_or(false, |&n| n > 1)) {
                tangled.push(chain);
            }
            else {
                polygon.push(chain.into_contour());
            }
        }
        if ! tangled.is_empty() {
            debug!("re-stitching {} chains that meet at shared vertices", tangled.len());
            for contour in restitch(&tangled) {
                polygon.push(contour);
            }
        }
        return polygon;
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn pt(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn link_segment_at_each_end() {
        let mut chain = PointChain::new(pt(0., 0.), pt(1., 0.));
        assert!(chain.link_segment(pt(1., 1.), pt(1., 0.)));
        assert_eq!(chain.back(), pt(1., 1.));
        assert!(chain.link_segment(pt(0., 0.), pt(0., 1.)));
        assert_eq!(chain.front(), pt(0., 1.));
        assert!(! chain.link_segment(pt(5., 5.), pt(6., 6.)));
        assert!(! chain.is_closed());

        assert!(chain.link_segment(pt(1., 1.), pt(0., 1.)));
        assert!(chain.is_closed());
        assert_eq!(chain.len(), 4);
    }

    #[test]
    fn link_chains_with_reversal() {
        let mut a = PointChain::new(pt(0., 0.), pt(1., 0.));
        let mut b = PointChain::new(pt(2., 0.), pt(1., 0.));
        assert!(a.touches(&b));
        assert!(a.link_point_chain(&mut b));
        let points: Vec<_> = a.points().cloned().collect();
        assert_eq!(points, vec![pt(2., 0.), pt(1., 0.), pt(0., 0.)]);

        let mut c = PointChain::new(pt(3., 0.), pt(2., 0.));
        assert!(a.link_point_chain(&mut c));
        let points: Vec<_> = a.points().cloned().collect();
        assert_eq!(points, vec![pt(3., 0.), pt(2., 0.), pt(1., 0.), pt(0., 0.)]);

        let mut far = PointChain::new(pt(9., 9.), pt(8., 8.));
        assert!(! a.touches(&far));
        assert!(! a.link_point_chain(&mut far));
    }

    #[test]
    fn square_from_shuffled_edges() {
        let mut connector = Connector::new();
        connector.add(pt(0., 0.), pt(1., 0.));
        connector.add(pt(1., 1.), pt(0., 1.));
        // two separate chains so far
        assert_eq!(connector.open_chains().len(), 2);
        connector.add(pt(1., 0.), pt(1., 1.));
        // ... which that edge joins into one
        assert_eq!(connector.open_chains().len(), 1);
        connector.add(pt(0., 1.), pt(0., 0.));
        assert!(connector.open_chains().is_empty());
        assert_eq!(connector.closed_chains().len(), 1);

        let polygon = connector.into_polygon();
        assert_eq!(polygon.len(), 1);
        assert_eq!(polygon[0].points().len(), 4);
        assert_eq!(polygon[0].area(), 1.);
    }

    #[test]
    fn doubled_edge_does_not_close() {
        let mut connector = Connector::new();
        connector.add(pt(0., 0.), pt(1., 0.));
        connector.add(pt(1., 0.), pt(0., 0.));
        assert_eq!(connector.open_chains().len(), 1);
        assert!(connector.closed_chains().is_empty());
        assert!(connector.into_polygon().is_empty());
    }

    #[test]
    fn bridging_edge_merges_chains() {
        let mut connector = Connector::new();
        connector.add(pt(0., 0.), pt(1., 0.));
        connector.add(pt(1., 1.), pt(0., 1.));
        connector.add(pt(2., 2.), pt(3., 3.));
        assert_eq!(connector.open_chains().len(), 3);
        connector.add(pt(1., 0.), pt(1., 1.));
        assert_eq!(connector.open_chains().len(), 2);
        connector.add(pt(0., 1.), pt(0., 0.));
        assert_eq!(connector.closed_chains().len(), 1);
        // the stray edge never closes and is dropped
        assert_eq!(connector.open_chains().len(), 1);
        let polygon = connector.into_polygon();
        assert_eq!(polygon.len(), 1);
        assert_eq!(polygon[0].points().len(), 4);
    }

    #[test]
    fn figure_eight_is_split_into_rings() {
        // Two triangles meeting at (1, 6), walked as one chain through that vertex twice
        let mut connector = Connector::new();
        connector.add(pt(8., 4.), pt(1., 6.));
        connector.add(pt(1., 6.), pt(7., 1.));
        connector.add(pt(7., 1.), pt(3., 5.));
        connector.add(pt(3., 5.), pt(1., 6.));
        connector.add(pt(1., 6.), pt(3., 6.));
        connector.add(pt(3., 6.), pt(8., 4.));
        assert!(connector.open_chains().is_empty());

        let polygon = connector.into_polygon();
        assert_eq!(polygon.len(), 2);
        for contour in polygon.contours() {
            assert_eq!(contour.len(), 3);
            assert_eq!(contour.area(), 2.);
        }
    }

    #[test]
    fn doubled_back_spur_is_dropped() {
        let mut connector = Connector::new();
        connector.closed.push(PointChain{
            points: vec![pt(0., 0.), pt(2., 0.), pt(3., 0.), pt(2., 0.), pt(1., 1.)].into(),
            closed: true,
        });
        let polygon = connector.into_polygon();
        assert_eq!(polygon.len(), 1);
        assert_eq!(polygon[0].len(), 3);
        assert_eq!(polygon[0].area(), 1.);
    }

    #[test]
    fn crossing_loops_are_repaired() {
        // A triangle and a square's leftover, walked as one chain that crosses itself at both of
        // the vertices they share
        let mut connector = Connector::new();
        connector.closed.push(PointChain{
            points: vec![
                pt(6., 5.), pt(6., 6.), pt(5., 6.), pt(5., 3.), pt(6., 3.),
                pt(6., 5.), pt(5., 3.), pt(7., 0.), pt(7., 7.),
            ].into(),
            closed: true,
        });
        let polygon = connector.into_polygon();
        assert_eq!(polygon.len(), 2);
        let mut areas: Vec<f64> = polygon.contours().iter().map(|c| c.area()).collect();
        areas.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(areas, vec![2., 6.]);
    }

    #[test]
    fn corner_to_corner_squares_stay_apart() {
        let mut connector = Connector::new();
        for &(a, b) in [
            ((0., 0.), (1., 0.)), ((1., 0.), (1., 1.)), ((1., 1.), (0., 1.)), ((0., 1.), (0., 0.)),
            ((1., 1.), (2., 1.)), ((2., 1.), (2., 2.)), ((2., 2.), (1., 2.)), ((1., 2.), (1., 1.)),
        ].iter() {
            connector.add(pt(a.0, a.1), pt(b.0, b.1));
        }
        let polygon = connector.into_polygon();
        assert_eq!(polygon.len(), 2);
        for contour in polygon.contours() {
            assert_eq!(contour.len(), 4);
            assert_eq!(contour.area(), 1.);
        }
    }
}
