#[macro_use]
extern crate error_chain;
#[macro_use]
extern crate log;

pub mod errors;
pub mod geom;
pub mod path;
pub mod shapeops;

pub use crate::errors::{Error, ErrorKind, Result};
pub use crate::geom::{BBox, Point};
pub use crate::shapeops::{compute, BooleanOpType, Clipper, Contour, Polygon};
