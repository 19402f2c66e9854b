/*
 * Boolean operations on polygons: intersection, union, difference, and exclusive or.
 *
 * This is the sweep-line algorithm from "A new algorithm for computing Boolean operations on
 * polygons" by Martínez, Rueda, and Feito (2009).  It copes with self-intersecting contours,
 * contours with holes, and edges shared between the two polygons, and it's O((n + k) log n) for
 * n edges and k intersections.
 *
 * Results are normalized: outer contours run counter-clockwise, holes run clockwise, and every
 * contour knows which of the others are its holes.
 */
use std::fmt;
use std::str::FromStr;

use crate::errors::{Error, ErrorKind};

pub mod clipper;
pub mod connector;
pub mod event;
pub mod polygon;
pub mod predicates;
pub mod queue;
pub mod render;
pub mod status;

pub use self::clipper::Clipper;
pub use self::connector::{Connector, PointChain};
pub use self::polygon::{Contour, Polygon, Winding};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BooleanOpType {
    Intersection,
    Union,
    Difference,
    ExclusiveOr,
}

impl BooleanOpType {
    pub fn name(&self) -> &'static str {
        match *self {
            BooleanOpType::Intersection => "intersection",
            BooleanOpType::Union => "union",
            BooleanOpType::Difference => "difference",
            BooleanOpType::ExclusiveOr => "xor",
        }
    }
}

impl fmt::Display for BooleanOpType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BooleanOpType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "intersection" | "intersect" | "and" => Ok(BooleanOpType::Intersection),
            "union" | "or" => Ok(BooleanOpType::Union),
            "difference" | "diff" | "subtract" => Ok(BooleanOpType::Difference),
            "xor" | "exclusive-or" | "exclusiveor" => Ok(BooleanOpType::ExclusiveOr),
            _ => Err(ErrorKind::UnknownOperation(s.to_string()).into()),
        }
    }
}

/// Compute `subject <operation> clipping`
pub fn compute(subject: &Polygon, clipping: &Polygon, operation: BooleanOpType) -> Polygon {
    return Clipper::new(subject, clipping).compute(operation);
}

impl Polygon {
    pub fn union(&self, other: &Polygon) -> Polygon {
        return compute(self, other, BooleanOpType::Union);
    }
    pub fn intersection(&self, other: &Polygon) -> Polygon {
        return compute(self, other, BooleanOpType::Intersection);
    }
    pub fn difference(&self, other: &Polygon) -> Polygon {
        return compute(self, other, BooleanOpType::Difference);
    }
    pub fn xor(&self, other: &Polygon) -> Polygon {
        return compute(self, other, BooleanOpType::ExclusiveOr);
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_operation_names() {
        assert_eq!("union".parse::<BooleanOpType>().unwrap(), BooleanOpType::Union);
        assert_eq!("XOR".parse::<BooleanOpType>().unwrap(), BooleanOpType::ExclusiveOr);
        assert_eq!("diff".parse::<BooleanOpType>().unwrap(), BooleanOpType::Difference);
        for &op in [BooleanOpType::Intersection, BooleanOpType::Union, BooleanOpType::Difference, BooleanOpType::ExclusiveOr].iter() {
            assert_eq!(op.to_string().parse::<BooleanOpType>().unwrap(), op);
        }

        match "frobnicate".parse::<BooleanOpType>() {
            Err(Error(ErrorKind::UnknownOperation(name), _)) => assert_eq!(name, "frobnicate"),
            other => panic!("unexpected {:?}", other),
        }
    }
}
