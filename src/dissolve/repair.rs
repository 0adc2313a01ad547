use geo::{orient::Direction, LineString, MultiPolygon, Orient, Polygon};
use i_overlay::{core::fill_rule::FillRule, float::simplify::SimplifyShape};
use indicatif::ProgressBar;

use crate::geofile::feature::{Feature, FeatureMap};

use super::error::DissolveError;

/// A feature whose geometry went through `repair_geometry`. `None` when the input had no
/// geometry.
#[derive(Debug, Clone)]
pub struct RepairedFeature {
    pub geometry: Option<MultiPolygon>,
    pub attributes: Option<FeatureMap>,
}

fn geometry_type_name(geometry: &geo::Geometry) -> &'static str {
    match geometry {
        geo::Geometry::Point(_) => "Point",
        geo::Geometry::Line(_) => "Line",
        geo::Geometry::LineString(_) => "LineString",
        geo::Geometry::Polygon(_) => "Polygon",
        geo::Geometry::MultiPoint(_) => "MultiPoint",
        geo::Geometry::MultiLineString(_) => "MultiLineString",
        geo::Geometry::MultiPolygon(_) => "MultiPolygon",
        geo::Geometry::GeometryCollection(_) => "GeometryCollection",
        geo::Geometry::Rect(_) => "Rect",
        geo::Geometry::Triangle(_) => "Triangle",
    }
}

/// Rings are explicitly closed in geo, overlay contours are implicitly closed.
fn ring_to_contour(ring: &LineString) -> Vec<[f64; 2]> {
    let mut contour: Vec<[f64; 2]> = ring.coords().map(|coord| [coord.x, coord.y]).collect();
    if contour.len() > 1 && contour.first() == contour.last() {
        contour.pop();
    }
    contour
}

/// The first contour of an overlay shape is the exterior, the others are holes.
fn shape_to_polygon(shape: Vec<Vec<[f64; 2]>>) -> Option<Polygon> {
    let mut rings = shape.into_iter().map(|contour| {
        LineString::from(contour.into_iter().map(|[x, y]| (x, y)).collect::<Vec<_>>())
    });
    let exterior = rings.next()?;
    Some(Polygon::new(exterior, rings.collect()))
}

/// Rebuild a polygonal geometry so that it is valid.
///
/// Rings are first given the standard orientation (exterior counter-clockwise, interiors
/// clockwise), then all rings are re-noded together by the overlay engine with the non-zero fill
/// rule. Both lobes of a self-intersecting bow-tie are kept as separate polygons, holes stay holes
/// and overlapping parts of a multipolygon are merged. This is the `geo` counterpart of a
/// zero-distance buffer.
///
/// `index` only identifies the feature in the returned error.
pub fn repair_geometry(
    index: usize,
    geometry: &geo::Geometry,
) -> Result<MultiPolygon, DissolveError> {
    let multi_polygon = match geometry {
        geo::Geometry::Polygon(polygon) => MultiPolygon::new(vec![polygon.clone()]),
        geo::Geometry::MultiPolygon(multi_polygon) => multi_polygon.clone(),
        geo::Geometry::Rect(rect) => MultiPolygon::new(vec![rect.to_polygon()]),
        geo::Geometry::Triangle(triangle) => MultiPolygon::new(vec![triangle.to_polygon()]),
        other => {
            return Err(DissolveError::UnsupportedGeometry {
                index,
                geometry_type: geometry_type_name(other),
            })
        }
    };
    let contours: Vec<Vec<[f64; 2]>> = multi_polygon
        .orient(Direction::Default)
        .0
        .iter()
        .flat_map(|polygon| std::iter::once(polygon.exterior()).chain(polygon.interiors()))
        .map(ring_to_contour)
        .filter(|contour| contour.len() >= 3)
        .collect();
    if contours.is_empty() {
        return Ok(MultiPolygon::new(Vec::new()));
    }

    let shapes: Vec<Vec<Vec<[f64; 2]>>> = contours.simplify_shape(FillRule::NonZero, 0.0);
    let repaired: MultiPolygon = shapes.into_iter().filter_map(shape_to_polygon).collect();
    // Consistent winding across features keeps the later group union well defined.
    Ok(repaired.orient(Direction::Default))
}

/// Repair every feature independently.
pub fn repair_features(features: Vec<Feature>) -> Result<Vec<RepairedFeature>, DissolveError> {
    let bar = ProgressBar::new(features.len() as u64);
    let mut repaired = Vec::with_capacity(features.len());
    for (index, feature) in features.into_iter().enumerate() {
        let geometry = match &feature.geometry {
            Some(geometry) => Some(repair_geometry(index, geometry)?),
            None => {
                log::warn!("Feature {} has no geometry, it adds no area to its group", index);
                None
            }
        };
        repaired.push(RepairedFeature {
            geometry,
            attributes: feature.attributes,
        });
        bar.inc(1);
    }
    bar.finish_and_clear();
    Ok(repaired)
}
