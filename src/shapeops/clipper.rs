use std::cmp::Ordering;

use crate::geom::{BBox, BBoxExt, Point};
use super::BooleanOpType;
use super::connector::Connector;
use super::event::{EdgeType, EventArena, EventId, PolygonType, SweepEvent};
use super::polygon::Polygon;
use super::predicates::{intersect_segments, SegmentIntersection};
use super::queue::EventQueue;
use super::status::StatusTree;

/// One Boolean operation between two polygons.
///
/// Every edge of both polygons becomes a pair of sweep events, and a vertical line sweeps across
/// the plane from left to right.  The segments currently crossing the line are kept in order,
/// and each segment is classified against its neighbor below when it enters the line: is it
/// inside the other polygon, and which side of it is inside its own polygon.  Intersecting
/// segments are split so that no two segments cross, and overlapping segments from different
/// polygons are marked so that only one copy can make it into the result.  When a segment
/// leaves the line, its classification decides whether it belongs to the result, and the
/// surviving segments are stitched back into contours.
///
/// A `Clipper` is good for exactly one operation; `compute` consumes it.
pub struct Clipper<'a> {
    subject: &'a Polygon,
    clipping: &'a Polygon,
    events: EventArena,
    queue: EventQueue,
    status: StatusTree,
    connector: Connector,
}

impl<'a> Clipper<'a> {
    pub fn new(subject: &'a Polygon, clipping: &'a Polygon) -> Self {
        let capacity = (subject.nvertices() + clipping.nvertices()) * 2;
        return Clipper{
            subject,
            clipping,
            events: EventArena::with_capacity(capacity),
            queue: EventQueue::with_capacity(capacity),
            status: StatusTree::new(),
            connector: Connector::new(),
        };
    }

    pub fn compute(mut self, operation: BooleanOpType) -> Polygon {
        let (subject_bbox, clipping_bbox) = match self.trivial_result(operation) {
            Ok(bboxes) => bboxes,
            Err(mut result) => {
                debug!("{:?}: trivial result with {} contours", operation, result.len());
                result.compute_holes();
                return result;
            }
        };

        self.build_events();
        debug!("{:?}: {} contours against {} contours, {} events",
            operation, self.subject.len(), self.clipping.len(), self.queue.len());

        let minmax_x = f64::min(subject_bbox.max.x, clipping_bbox.max.x);
        let mut nevents = 0;
        while let Some(event) = self.pop_event() {
            nevents += 1;
            let point = self.events[event].point;
            trace!("event {:?} at {:?} ({}, {:?}, {:?})", event, point,
                if self.events[event].left { "left" } else { "right" },
                self.events[event].polygon, self.events[event].edge_type);

            // Past this point, only one polygon has any edges left, so nothing else can change
            if (operation == BooleanOpType::Intersection && point.x > minmax_x) ||
                (operation == BooleanOpType::Difference && point.x > subject_bbox.max.x)
            {
                break;
            }
            if operation == BooleanOpType::Union && point.x > minmax_x {
                self.drain_union(event);
                break;
            }

            if self.events[event].left {
                self.process_left(event);
            }
            else {
                self.process_right(event, operation);
            }
        }

        debug!("sweep done after {} events; {} events created, {} chains closed, {} left open",
            nevents, self.events.len(),
            self.connector.closed_chains().len(), self.connector.open_chains().len());
        let mut result = self.connector.into_polygon();
        result.compute_holes();
        return result;
    }

    /// Check whether the answer is obvious without sweeping.  Otherwise, returns the two
    /// polygons' bounding boxes.
    fn trivial_result(&self, operation: BooleanOpType) -> Result<(BBox, BBox), Polygon> {
        let subject_bbox = self.subject.bbox();
        let clipping_bbox = self.clipping.bbox();
        let (subject_bbox, clipping_bbox) = match (subject_bbox, clipping_bbox) {
            (Some(subject_bbox), Some(clipping_bbox)) => (subject_bbox, clipping_bbox),
            (None, _) => {
                return Err(match operation {
                    BooleanOpType::Intersection | BooleanOpType::Difference => Polygon::new(),
                    BooleanOpType::Union | BooleanOpType::ExclusiveOr => self.clipping.clone(),
                });
            }
            (_, None) => {
                return Err(match operation {
                    BooleanOpType::Intersection => Polygon::new(),
                    _ => self.subject.clone(),
                });
            }
        };

        if ! subject_bbox.touches(&clipping_bbox) {
            return Err(match operation {
                BooleanOpType::Intersection => Polygon::new(),
                BooleanOpType::Difference => self.subject.clone(),
                BooleanOpType::Union | BooleanOpType::ExclusiveOr => {
                    let mut result = self.subject.clone();
                    result.join(self.clipping.clone());
                    result
                }
            });
        }

        return Ok((subject_bbox, clipping_bbox));
    }

    fn build_events(&mut self) {
        for &(polygon, polygon_type) in [
            (self.subject, PolygonType::Subject),
            (self.clipping, PolygonType::Clipping),
        ].iter() {
            for contour in polygon.contours() {
                for (p0, p1) in contour.segments() {
                    if let Some((left, right)) = self.events.add_segment(p0, p1, polygon_type) {
                        self.push_event(left);
                        self.push_event(right);
                    }
                }
            }
        }
    }

    fn push_event(&mut self, event: EventId) {
        let events = &self.events;
        self.queue.push(event, &|a, b| events.compare_events(a, b));
    }

    fn pop_event(&mut self) -> Option<EventId> {
        let events = &self.events;
        return self.queue.pop(&|a, b| events.compare_events(a, b));
    }

    fn neighbors(&self, event: EventId) -> (Option<EventId>, Option<EventId>) {
        let node = match self.events[event].status {
            Some(node) => node,
            None => return (None, None),
        };
        let prev = self.status.prev(node).map(|n| self.status.key(n));
        let next = self.status.next(node).map(|n| self.status.key(n));
        return (prev, next);
    }

    fn process_left(&mut self, event: EventId) {
        let node = {
            let events = &self.events;
            self.status.insert(event, &|a, b| events.compare_segments(a, b))
        };
        self.events[event].status = Some(node);

        let (prev, next) = self.neighbors(event);
        self.compute_fields(event, prev);
        if log_enabled!(log::Level::Trace) {
            trace!("status line: {:?}", self.status.keys());
        }

        if let Some(next) = next {
            self.possible_intersection(event, next);
        }
        if let Some(prev) = prev {
            self.possible_intersection(prev, event);
        }
    }

    /// Work out whether a segment that just entered the status line is inside the other polygon,
    /// and which side of it is inside its own polygon, from the segment immediately below it.
    fn compute_fields(&mut self, event: EventId, prev: Option<EventId>) {
        let polygon = self.events[event].polygon;
        let (inside, in_out) = match prev {
            None => (false, false),
            Some(prev) => {
                let below = &self.events[prev];
                let same_polygon = below.polygon == polygon;
                if below.edge_type != EdgeType::Normal {
                    // The segment below overlaps another one, so its own fields are only good for
                    // one polygon; look one further down
                    match self.neighbors(prev).0 {
                        None => (true, false),
                        Some(prevprev) => {
                            if same_polygon {
                                (self.inside_above(prevprev), ! below.in_out)
                            }
                            else {
                                (self.inside_above(prev), ! self.events[prevprev].in_out)
                            }
                        }
                    }
                }
                else if same_polygon {
                    (below.inside, ! below.in_out)
                }
                else {
                    (self.inside_above(prev), below.inside)
                }
            }
        };
        self.events[event].inside = inside;
        self.events[event].in_out = in_out;
    }

    /// Is the region just above this active segment inside the segment's own polygon?
    fn inside_above(&self, event: EventId) -> bool {
        // A vertical segment doesn't separate anything along the sweep line, so the region above
        // it is the one it has below it
        if self.events.is_vertical(event) {
            return self.events[event].in_out;
        }
        return ! self.events[event].in_out;
    }

    fn process_right(&mut self, event: EventId, operation: BooleanOpType) {
        if self.in_result(event, operation) {
            let (p0, p1) = self.events.segment(event);
            self.connector.add(p0, p1);
        }

        let twin = self.events[event].other;
        let (prev, next) = self.neighbors(twin);
        let node = match self.events[twin].status.take() {
            Some(node) => node,
            None => return,
        };
        self.status.remove(node);

        if let (Some(prev), Some(next)) = (prev, next) {
            self.possible_intersection(prev, next);
        }
    }

    /// Does the segment ending at this right event belong in the result?
    fn in_result(&self, event: EventId, operation: BooleanOpType) -> bool {
        let right = &self.events[event];
        let twin = &self.events[right.other];
        return match right.edge_type {
            EdgeType::Normal => match operation {
                BooleanOpType::Intersection => twin.inside,
                BooleanOpType::Union => ! twin.inside,
                BooleanOpType::Difference => match right.polygon {
                    PolygonType::Subject => ! twin.inside,
                    PolygonType::Clipping => twin.inside,
                },
                BooleanOpType::ExclusiveOr => true,
            },
            EdgeType::SameTransition =>
                operation == BooleanOpType::Intersection || operation == BooleanOpType::Union,
            EdgeType::DifferentTransition => operation == BooleanOpType::Difference,
            EdgeType::NonContributing => false,
        };
    }

    /// Everything left in the queue belongs to only one polygon, so it can go straight into the
    /// result without looking for intersections.  Segments that never entered the status line
    /// were never found to be inside anything.
    fn drain_union(&mut self, first: EventId) {
        let mut event = Some(first);
        while let Some(current) = event {
            if ! self.events[current].left && self.in_result(current, BooleanOpType::Union) {
                let (p0, p1) = self.events.segment(current);
                self.connector.add(p0, p1);
            }
            event = self.pop_event();
        }
    }

    fn possible_intersection(&mut self, e1: EventId, e2: EventId) {
        let (a0, a1) = self.events.segment(e1);
        let (b0, b1) = self.events.segment(e2);
        match intersect_segments(a0, a1, b0, b1) {
            SegmentIntersection::None => {}
            SegmentIntersection::Point(point) => {
                // Segments that only meet at an endpoint they share are fine as they are
                if a0 == b0 || a1 == b1 {
                    return;
                }
                trace!("segments {:?} and {:?} cross at {:?}", e1, e2, point);
                if point != a0 && point != a1 {
                    self.divide_segment(e1, point);
                }
                if point != b0 && point != b1 {
                    self.divide_segment(e2, point);
                }
            }
            SegmentIntersection::Overlap(..) => {
                // Overlapping edges of the same polygon are left alone
                if self.events[e1].polygon == self.events[e2].polygon {
                    return;
                }
                trace!("segments {:?} and {:?} overlap", e1, e2);
                self.resolve_overlap(e1, e2);
            }
        }
    }

    /// Split two overlapping segments from different polygons so that the overlap is a segment
    /// of its own in both, then mark one copy of it as never contributing and the other as a
    /// transition between the polygons.
    fn resolve_overlap(&mut self, e1: EventId, e2: EventId) {
        let transition = if self.events[e1].in_out == self.events[e2].in_out {
            EdgeType::SameTransition
        }
        else {
            EdgeType::DifferentTransition
        };

        // Both segments' endpoints in sweep order, with None standing in for a shared endpoint
        let mut sorted: Vec<Option<EventId>> = Vec::with_capacity(4);
        let r1 = self.events[e1].other;
        let r2 = self.events[e2].other;
        for &(a, b) in [(e1, e2), (r1, r2)].iter() {
            if self.events[a].point == self.events[b].point {
                sorted.push(None);
            }
            else if self.events.compare_events(a, b) == Ordering::Greater {
                sorted.push(Some(b));
                sorted.push(Some(a));
            }
            else {
                sorted.push(Some(a));
                sorted.push(Some(b));
            }
        }

        match sorted[..] {
            [None, None] => {
                // The same segment twice
                self.set_edge_type(e1, EdgeType::NonContributing);
                self.set_edge_type(r1, EdgeType::NonContributing);
                self.set_edge_type(e2, transition);
                self.set_edge_type(r2, transition);
            }
            [None, Some(shorter), Some(longer)] => {
                // Same left endpoint: the shorter segment is all overlap
                let shorter_left = self.events[shorter].other;
                self.set_edge_type(shorter, EdgeType::NonContributing);
                self.set_edge_type(shorter_left, EdgeType::NonContributing);
                let longer_left = self.events[longer].other;
                self.set_edge_type(longer_left, transition);
                let point = self.events[shorter].point;
                self.divide_segment(longer_left, point);
            }
            [Some(longer), Some(shorter), None] => {
                // Same right endpoint
                let shorter_right = self.events[shorter].other;
                self.set_edge_type(shorter, EdgeType::NonContributing);
                self.set_edge_type(shorter_right, EdgeType::NonContributing);
                let longer_right = self.events[longer].other;
                self.set_edge_type(longer_right, transition);
                let point = self.events[shorter].point;
                self.divide_segment(longer, point);
            }
            [Some(s0), Some(s1), Some(s2), Some(s3)] => {
                if self.events[s3].other != s0 {
                    // Partial overlap; neither segment contains the other
                    self.set_edge_type(s1, EdgeType::NonContributing);
                    self.set_edge_type(s2, transition);
                    let p1 = self.events[s1].point;
                    let p2 = self.events[s2].point;
                    self.divide_segment(s0, p1);
                    self.divide_segment(s1, p2);
                }
                else {
                    // One segment contains the other
                    let inner_right = self.events[s1].other;
                    self.set_edge_type(s1, EdgeType::NonContributing);
                    self.set_edge_type(inner_right, EdgeType::NonContributing);
                    let p1 = self.events[s1].point;
                    let p2 = self.events[s2].point;
                    self.divide_segment(s0, p1);
                    let rest = self.events[s3].other;
                    self.set_edge_type(rest, transition);
                    self.divide_segment(rest, p2);
                }
            }
            _ => unreachable!("overlapping segments with endpoints {:?}", sorted),
        }
    }

    fn set_edge_type(&mut self, event: EventId, edge_type: EdgeType) {
        self.events[event].edge_type = edge_type;
    }

    /// Split the segment whose left event is `event` at `point`, which must lie strictly inside
    /// it.  The left half keeps the original left event; the right half keeps the original right
    /// event.
    fn divide_segment(&mut self, event: EventId, point: Point) {
        let far = self.events[event].other;
        let polygon = self.events[event].polygon;
        let right_type = self.events[event].edge_type;
        let left_type = self.events[far].edge_type;
        let right = self.events.push(SweepEvent::new(point, event, false, polygon, right_type));
        let left = self.events.push(SweepEvent::new(point, far, true, polygon, left_type));
        trace!("divided {:?} at {:?} into {:?} and {:?}", event, point, right, left);

        if self.events.compare_events(left, far) == Ordering::Greater {
            // Rounding put the split point past the far end, so the second half runs backwards
            self.events[far].left = true;
            self.events[left].left = false;
            let events = &self.events;
            self.queue.rebuild(&|a, b| events.compare_events(a, b));
        }

        self.events[far].other = left;
        self.events[event].other = right;
        self.push_event(left);
        self.push_event(right);
    }
}
