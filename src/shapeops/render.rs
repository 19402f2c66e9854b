// SVG dumps of polygons, for eyeballing what an operation did.
use std::path::Path as FilePath;

use svg::Document;
use svg::node::element::{Group, Path, Style};
use svg::node::element::path::Data;

use crate::errors::Result;
use crate::geom::{BBox, BBoxExt};
use super::polygon::Polygon;

// Empty space around the drawing, as a fraction of its larger dimension
const MARGIN: f64 = 0.05;

/// One path for a whole polygon, so that even-odd filling punches out the holes
pub fn polygon_path(polygon: &Polygon) -> Path {
    let mut data = Data::new();
    for contour in polygon.contours() {
        let (first, others) = match contour.points().split_first() {
            Some(split) => split,
            None => continue,
        };
        data = data.move_to((first.x, first.y));
        for point in others {
            data = data.line_to((point.x, point.y));
        }
        data = data.close();
    }
    return Path::new()
        .set("d", data)
        .set("fill-rule", "evenodd");
}

/// Draw several polygons on top of each other, in order.  Each layer's name becomes the CSS class
/// of its path.
pub fn document(layers: &[(&str, &Polygon)]) -> Document {
    let mut bbox: Option<BBox> = None;
    for &(_, polygon) in layers {
        if let Some(layer_bbox) = polygon.bbox() {
            bbox = Some(match bbox {
                Some(bbox) => bbox.merged(&layer_bbox),
                None => layer_bbox,
            });
        }
    }

    let mut group = Group::new();
    for &(name, polygon) in layers {
        group = group.add(
            polygon_path(polygon)
            .set("class", name)
        );
    }

    // Our y-axis points up, but SVG's points down, so flip the whole drawing
    group = group.set("transform", "scale(1 -1)");
    let mut doc = Document::new()
        .add(Style::new(include_str!("polygon-svg.css")))
        .add(group);
    if let Some(bbox) = bbox {
        let size = bbox.size();
        let margin = f64::max(f64::max(size.width, size.height) * MARGIN, 1.);
        doc = doc.set("viewBox", (
            bbox.min.x - margin,
            -bbox.max.y - margin,
            size.width + margin * 2.,
            size.height + margin * 2.,
        ));
    }
    return doc;
}

pub fn save<P: AsRef<FilePath>>(path: P, doc: &Document) -> Result<()> {
    svg::save(path, doc)?;
    return Ok(());
}
