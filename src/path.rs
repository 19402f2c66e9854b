// Bridge between the shape operations and anything that can be flattened into polylines.
use crate::geom::Point;
use crate::shapeops::{self, BooleanOpType, Contour, Polygon};

/// Something that can be approximated by polylines, one per subpath.  Curves are the
/// implementor's problem; `flatness` is the largest distance allowed between a curve and its
/// approximation.
pub trait Flatten {
    fn flatten(&self, flatness: f64) -> Vec<Vec<Point>>;
}

/// A polyline.  Open subpaths are treated as though their last point connects back to the first.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Subpath {
    pub points: Vec<Point>,
    pub closed: bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Path {
    pub subpaths: Vec<Subpath>,
}

impl Path {
    pub fn new() -> Self {
        return Path::default();
    }

    pub fn move_to(mut self, point: Point) -> Self {
        self.subpaths.push(Subpath{ points: vec![point], closed: false });
        return self;
    }

    /// Extend the current subpath, starting a new one if there isn't one to extend
    pub fn line_to(mut self, point: Point) -> Self {
        match self.subpaths.last_mut() {
            Some(subpath) if ! subpath.closed => {
                subpath.points.push(point);
                return self;
            }
            _ => {}
        }
        return self.move_to(point);
    }

    pub fn close(mut self) -> Self {
        if let Some(subpath) = self.subpaths.last_mut() {
            subpath.closed = true;
        }
        return self;
    }

    pub fn is_empty(&self) -> bool {
        return self.subpaths.is_empty();
    }
}

impl Flatten for Path {
    fn flatten(&self, _flatness: f64) -> Vec<Vec<Point>> {
        // Already nothing but straight lines
        return self.subpaths.iter().map(|subpath| subpath.points.clone()).collect();
    }
}

impl Flatten for Polygon {
    fn flatten(&self, _flatness: f64) -> Vec<Vec<Point>> {
        return self.contours().iter().map(|contour| contour.points().to_vec()).collect();
    }
}

impl Polygon {
    /// One contour per flattened subpath.  Runs of repeated points collapse to one, and whatever
    /// is left with fewer than two points is skipped.
    pub fn from_subpaths<F: Flatten + ?Sized>(source: &F, flatness: f64) -> Polygon {
        let mut polygon = Polygon::new();
        for points in source.flatten(flatness) {
            let contour = Contour::from_points(points);
            if contour.len() < 2 {
                continue;
            }
            polygon.push(contour);
        }
        return polygon;
    }
}

impl<'a> From<&'a Polygon> for Path {
    fn from(polygon: &'a Polygon) -> Path {
        let subpaths = polygon.contours().iter()
            .map(|contour| Subpath{ points: contour.points().to_vec(), closed: true })
            .collect();
        return Path{ subpaths };
    }
}

impl From<Polygon> for Path {
    fn from(polygon: Polygon) -> Path {
        return Path::from(&polygon);
    }
}

pub fn boolean<A, B>(a: &A, b: &B, flatness: f64, operation: BooleanOpType) -> Path
where A: Flatten + ?Sized, B: Flatten + ?Sized
{
    let subject = Polygon::from_subpaths(a, flatness);
    let clipping = Polygon::from_subpaths(b, flatness);
    return Path::from(shapeops::compute(&subject, &clipping, operation));
}

pub fn union<A: Flatten + ?Sized, B: Flatten + ?Sized>(a: &A, b: &B, flatness: f64) -> Path {
    return boolean(a, b, flatness, BooleanOpType::Union);
}

pub fn intersection<A: Flatten + ?Sized, B: Flatten + ?Sized>(a: &A, b: &B, flatness: f64) -> Path {
    return boolean(a, b, flatness, BooleanOpType::Intersection);
}

pub fn difference<A: Flatten + ?Sized, B: Flatten + ?Sized>(a: &A, b: &B, flatness: f64) -> Path {
    return boolean(a, b, flatness, BooleanOpType::Difference);
}

pub fn xor<A: Flatten + ?Sized, B: Flatten + ?Sized>(a: &A, b: &B, flatness: f64) -> Path {
    return boolean(a, b, flatness, BooleanOpType::ExclusiveOr);
}
