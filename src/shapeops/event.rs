use std::cmp::Ordering;
use std::ops;

use crate::geom::Point;
use super::predicates::{orient2d, point_on_segment};
use super::status::NodeId;

/// Handle to a sweep event.  Events are never freed during a sweep, so handles stay valid, and
/// since they're handed out in creation order they double as a tiebreaker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EventId(pub usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum PolygonType {
    Subject = 0,
    Clipping = 1,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeType {
    Normal,
    NonContributing,
    SameTransition,
    DifferentTransition,
}

#[derive(Clone, Debug)]
pub struct SweepEvent {
    pub point: Point,
    /// Event at the opposite end of the same segment
    pub other: EventId,
    /// Is `point` the left endpoint of the segment (`point`, `other.point`)?
    pub left: bool,
    pub polygon: PolygonType,
    pub edge_type: EdgeType,

    // These two are only meaningful for left events, and are filled in once the event enters the
    // status line

    /// Is the segment inside the other polygon?
    pub inside: bool,
    /// Does a vertical ray going up cross from inside to outside of this segment's own polygon
    /// as it crosses the segment?
    pub in_out: bool,

    /// Node in the status line, while the segment is active
    pub status: Option<NodeId>,
}

impl SweepEvent {
    pub fn new(point: Point, other: EventId, left: bool, polygon: PolygonType, edge_type: EdgeType) -> Self {
        return SweepEvent{
            point,
            other,
            left,
            polygon,
            edge_type,
            inside: false,
            in_out: false,
            status: None,
        };
    }
}

/// Owns every event created during one sweep.  The two events for a segment point at each other
/// by index, so neither one owns the segment.
#[derive(Debug, Default)]
pub struct EventArena {
    events: Vec<SweepEvent>,
}

impl EventArena {
    pub fn new() -> Self {
        return EventArena{ events: Vec::new() };
    }

    pub fn with_capacity(capacity: usize) -> Self {
        return EventArena{ events: Vec::with_capacity(capacity) };
    }

    pub fn len(&self) -> usize {
        return self.events.len();
    }

    pub fn push(&mut self, event: SweepEvent) -> EventId {
        self.events.push(event);
        return EventId(self.events.len() - 1);
    }

    /// Create the pair of events for the segment (p0, p1), returning (left, right).  Zero-length
    /// segments are rejected.
    pub fn add_segment(&mut self, p0: Point, p1: Point, polygon: PolygonType) -> Option<(EventId, EventId)> {
        if p0 == p1 {
            return None;
        }

        let e0 = EventId(self.events.len());
        let e1 = EventId(self.events.len() + 1);
        self.events.push(SweepEvent::new(p0, e1, true, polygon, EdgeType::Normal));
        self.events.push(SweepEvent::new(p1, e0, false, polygon, EdgeType::Normal));
        if self.compare_events(e0, e1) == Ordering::Greater {
            self.events[e0.0].left = false;
            self.events[e1.0].left = true;
            return Some((e1, e0));
        }
        return Some((e0, e1));
    }

    pub fn other_point(&self, id: EventId) -> Point {
        return self[self[id].other].point;
    }

    /// The segment as (left point, right point)
    pub fn segment(&self, id: EventId) -> (Point, Point) {
        let event = &self[id];
        let other = self[event.other].point;
        if event.left {
            return (event.point, other);
        }
        else {
            return (other, event.point);
        }
    }

    /** Is the segment below point p */
    pub fn below(&self, id: EventId, p: Point) -> bool {
        let (left, right) = self.segment(id);
        return orient2d(left, right, p) > 0;
    }

    /** Is the segment above point p */
    pub fn above(&self, id: EventId, p: Point) -> bool {
        return ! self.below(id, p);
    }

    pub fn is_vertical(&self, id: EventId) -> bool {
        return self[id].point.x == self.other_point(id).x;
    }

    /// Order in which events leave the queue: by x, then by y; at the same point, right
    /// endpoints come first, and among endpoints of the same kind the lower segment comes first.
    pub fn compare_events(&self, a: EventId, b: EventId) -> Ordering {
        if a == b {
            return Ordering::Equal;
        }

        let ea = &self[a];
        let eb = &self[b];
        return ea.point.x.partial_cmp(&eb.point.x).unwrap_or(Ordering::Equal)
            .then(ea.point.y.partial_cmp(&eb.point.y).unwrap_or(Ordering::Equal))
            .then_with(|| {
                // If the points coincide, a right endpoint takes priority
                if ea.left == eb.left {
                    Ordering::Equal
                }
                else if ea.left {
                    Ordering::Greater
                }
                else {
                    Ordering::Less
                }
            })
            .then_with(|| {
                // Same point, same end of their respective segments.  Whichever segment passes
                // below the other's far end goes first
                let (left, right) = self.segment(a);
                match orient2d(left, right, self.other_point(b)) {
                    1 => Ordering::Less,
                    -1 => Ordering::Greater,
                    _ => Ordering::Equal,
                }
            })
            // Collinear!  Fall back to creation order
            .then(a.cmp(&b));
    }

    /// Order of segments in the status line, from bottom to top.  Only valid for two left events
    /// whose segments both cross the current sweep line.
    pub fn compare_segments(&self, a: EventId, b: EventId) -> Ordering {
        if a == b {
            return Ordering::Equal;
        }

        let (a0, a1) = self.segment(a);
        let (b0, b1) = self.segment(b);
        if orient2d(a0, a1, b0) != 0 || orient2d(a0, a1, b1) != 0 {
            if a0 == b0 {
                // Both segments have the same left endpoint.  Sort on the right endpoint
                return if self.below(a, b1) { Ordering::Less } else { Ordering::Greater };
            }
            if a0.x == b0.x {
                // Left endpoints are stacked vertically
                return if a0.y < b0.y { Ordering::Less } else { Ordering::Greater };
            }

            // Judge against whichever segment entered the sweep first.  A left endpoint lying on
            // the earlier segment says nothing, so use the far endpoint instead.  "On" uses the
            // same tolerance as intersect_segments, which will split the earlier segment there
            if self.compare_events(a, b) == Ordering::Greater {
                // b came first
                let p = if point_on_segment(a0, b0, b1) { a1 } else { a0 };
                return if self.above(b, p) { Ordering::Less } else { Ordering::Greater };
            }
            else {
                let p = if point_on_segment(b0, a0, a1) { b1 } else { b0 };
                return if self.below(a, p) { Ordering::Less } else { Ordering::Greater };
            }
        }

        // Segments are collinear.  Sort by some arbitrary consistent criteria
        return self[a].polygon.cmp(&self[b].polygon)
            .then_with(|| {
                if self[a].point == self[b].point {
                    a.cmp(&b)
                }
                else {
                    self.compare_events(a, b)
                }
            });
    }
}

impl ops::Index<EventId> for EventArena {
    type Output = SweepEvent;

    fn index(&self, id: EventId) -> &Self::Output {
        return &self.events[id.0];
    }
}
impl ops::IndexMut<EventId> for EventArena {
    fn index_mut(&mut self, id: EventId) -> &mut Self::Output {
        return &mut self.events[id.0];
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn pt(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn segment_endpoints_are_sorted() {
        let mut events = EventArena::new();
        let (left, right) = events.add_segment(pt(2., 1.), pt(0., 0.), PolygonType::Subject).unwrap();
        assert!(events[left].left);
        assert!(!events[right].left);
        assert_eq!(events[left].point, pt(0., 0.));
        assert_eq!(events[left].other, right);
        assert_eq!(events[right].other, left);
        assert_eq!(events.segment(right), (pt(0., 0.), pt(2., 1.)));

        // vertical segments go bottom to top
        let (left, _) = events.add_segment(pt(5., 3.), pt(5., 1.), PolygonType::Clipping).unwrap();
        assert_eq!(events[left].point, pt(5., 1.));
        assert!(events.is_vertical(left));

        assert!(events.add_segment(pt(1., 1.), pt(1., 1.), PolygonType::Subject).is_none());
    }

    #[test]
    fn event_order() {
        let mut events = EventArena::new();
        let (a_left, a_right) = events.add_segment(pt(0., 0.), pt(2., 0.), PolygonType::Subject).unwrap();
        let (b_left, _) = events.add_segment(pt(2., 0.), pt(3., 1.), PolygonType::Subject).unwrap();
        let (c_left, _) = events.add_segment(pt(0., 0.), pt(2., 2.), PolygonType::Clipping).unwrap();

        // by x
        assert_eq!(events.compare_events(a_left, a_right), Ordering::Less);
        // right endpoints before left endpoints at the same point
        assert_eq!(events.compare_events(a_right, b_left), Ordering::Less);
        assert_eq!(events.compare_events(b_left, a_right), Ordering::Greater);
        // same point, both left: the lower segment first
        assert_eq!(events.compare_events(a_left, c_left), Ordering::Less);
        assert_eq!(events.compare_events(c_left, a_left), Ordering::Greater);
    }

    #[test]
    fn segment_order() {
        let mut events = EventArena::new();
        let (low, _) = events.add_segment(pt(0., 0.), pt(4., 0.), PolygonType::Subject).unwrap();
        let (high, _) = events.add_segment(pt(1., 2.), pt(4., 3.), PolygonType::Subject).unwrap();
        let (fan, _) = events.add_segment(pt(0., 0.), pt(4., 1.), PolygonType::Clipping).unwrap();
        let (twin, _) = events.add_segment(pt(1., 0.), pt(3., 0.), PolygonType::Clipping).unwrap();

        assert_eq!(events.compare_segments(low, high), Ordering::Less);
        assert_eq!(events.compare_segments(high, low), Ordering::Greater);
        // shared left endpoint: decided by the right endpoint
        assert_eq!(events.compare_segments(low, fan), Ordering::Less);
        assert_eq!(events.compare_segments(fan, low), Ordering::Greater);
        // collinear: subject below clipping
        assert_eq!(events.compare_segments(low, twin), Ordering::Less);
        assert_eq!(events.compare_segments(twin, low), Ordering::Greater);
    }

    #[test]
    fn segment_starting_on_another() {
        let mut events = EventArena::new();
        let (low, _) = events.add_segment(pt(0., 0.), pt(4., 0.), PolygonType::Subject).unwrap();
        let (up, _) = events.add_segment(pt(2., 0.), pt(3., 2.), PolygonType::Clipping).unwrap();
        let (down, _) = events.add_segment(pt(2., 0.), pt(3., -2.), PolygonType::Clipping).unwrap();

        // Both start on `low`; which side they end up on decides
        assert_eq!(events.compare_segments(up, low), Ordering::Greater);
        assert_eq!(events.compare_segments(low, up), Ordering::Less);
        assert_eq!(events.compare_segments(down, low), Ordering::Less);
        assert_eq!(events.compare_segments(low, down), Ordering::Greater);

        // A vertex that only lands on `slope` after rounding counts as lying on it
        let (slope, _) = events.add_segment(pt(6., 8.), pt(8., 2.), PolygonType::Subject).unwrap();
        // what is left of `slope` after splitting it where it crosses y = 6
        let right = events[slope].other;
        let top = events.push(SweepEvent::new(pt(8. - 4. / 3., 6.), right, true, PolygonType::Subject, EdgeType::Normal));
        let (rising, _) = events.add_segment(pt(7., 5.), pt(7., 6.), PolygonType::Clipping).unwrap();
        assert_eq!(events.compare_segments(rising, top), Ordering::Greater);
    }
}
