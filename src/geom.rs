use euclid::{Box2D, Point2D, Vector2D};

/// Unit tag for everything in the plane the shape operations work in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlaneSpace;
pub type Coord = f64;
pub type Point = Point2D<Coord, PlaneSpace>;
pub type Vector = Vector2D<Coord, PlaneSpace>;
pub type BBox = Box2D<Coord, PlaneSpace>;

pub trait BBoxExt: Sized {
    /// Like `intersects`, but boxes that merely share an edge or corner count as touching
    fn touches(&self, other: &Self) -> bool;
    /// Smallest box containing both; unlike euclid's own union, zero-area boxes are not dropped
    fn merged(&self, other: &Self) -> Self;
    fn around<'a, I: IntoIterator<Item = &'a Point>>(points: I) -> Option<Self>;
}

impl BBoxExt for BBox {
    fn touches(&self, other: &Self) -> bool {
        self.min.x <= other.max.x &&
       other.min.x <=  self.max.x &&
        self.min.y <= other.max.y &&
       other.min.y <=  self.max.y
    }

    fn merged(&self, other: &Self) -> Self {
        return BBox::new(
            Point::new(f64::min(self.min.x, other.min.x), f64::min(self.min.y, other.min.y)),
            Point::new(f64::max(self.max.x, other.max.x), f64::max(self.max.y, other.max.y)),
        );
    }

    fn around<'a, I: IntoIterator<Item = &'a Point>>(points: I) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        let mut min = first;
        let mut max = first;
        for point in iter {
            min.x = f64::min(min.x, point.x);
            min.y = f64::min(min.y, point.y);
            max.x = f64::max(max.x, point.x);
            max.y = f64::max(max.y, point.y);
        }
        return Some(BBox::new(min, max));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touching_boxes() {
        let a = BBox::new(Point::new(0., 0.), Point::new(1., 1.));
        let b = BBox::new(Point::new(1., 0.), Point::new(2., 1.));
        let c = BBox::new(Point::new(1.5, 2.), Point::new(2., 3.));
        assert!(a.touches(&b));
        assert!(b.touches(&a));
        assert!(!a.touches(&c));
    }

    #[test]
    fn box_around_points() {
        let points = [Point::new(3., -1.), Point::new(0., 2.), Point::new(1., 1.)];
        let bbox = BBox::around(&points).unwrap();
        assert_eq!(bbox.min, Point::new(0., -1.));
        assert_eq!(bbox.max, Point::new(3., 2.));
        assert!(BBox::around(&[]).is_none());

        // a vertical line still has a usable box
        let line = BBox::new(Point::new(0., 0.), Point::new(0., 4.));
        let merged = line.merged(&bbox);
        assert_eq!(merged.min, Point::new(0., -1.));
        assert_eq!(merged.max, Point::new(3., 4.));
    }
}
