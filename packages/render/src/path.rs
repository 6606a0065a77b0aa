//! SVG path data for projected geometries.

use std::fmt::Write as _;

use geo::{Centroid, Coord, Geometry, LineString, Point, Polygon};

use crate::svg::num;

/// Appends `M x,y L x,y ...` for `coords`, closing with `Z` when `close`.
fn write_line(d: &mut String, coords: &[Coord<f64>], close: bool) {
    let coords = if close && coords.len() > 1 && coords.first() == coords.last() {
        &coords[..coords.len() - 1]
    } else {
        coords
    };
    for (i, c) in coords.iter().enumerate() {
        let cmd = if i == 0 { 'M' } else { 'L' };
        let _ = write!(d, "{cmd}{},{}", num(c.x), num(c.y));
    }
    if close && !coords.is_empty() {
        d.push('Z');
    }
}

fn write_polygon(d: &mut String, polygon: &Polygon<f64>) {
    write_line(d, &polygon.exterior().0, true);
    for interior in polygon.interiors() {
        write_line(d, &interior.0, true);
    }
}

fn write_geometry(d: &mut String, geometry: &Geometry<f64>) {
    match geometry {
        Geometry::LineString(line) => write_line(d, &line.0, false),
        Geometry::Line(line) => write_line(d, &[line.start, line.end], false),
        Geometry::MultiLineString(lines) => {
            for line in lines {
                write_line(d, &line.0, false);
            }
        }
        Geometry::Polygon(polygon) => write_polygon(d, polygon),
        Geometry::MultiPolygon(polygons) => {
            for polygon in polygons {
                write_polygon(d, polygon);
            }
        }
        Geometry::Rect(rect) => write_polygon(d, &rect.to_polygon()),
        Geometry::Triangle(triangle) => write_polygon(d, &triangle.to_polygon()),
        Geometry::GeometryCollection(collection) => {
            for member in collection {
                write_geometry(d, member);
            }
        }
        Geometry::Point(_) | Geometry::MultiPoint(_) => {}
    }
}

/// SVG path data for an already projected geometry. Points produce no
/// path data; draw them as circles at [`centroid`].
#[must_use]
pub fn path_data(geometry: &Geometry<f64>) -> String {
    let mut d = String::new();
    write_geometry(&mut d, geometry);
    d
}

/// SVG path data for a projected line string.
#[must_use]
pub fn line_data(line: &LineString<f64>) -> String {
    let mut d = String::new();
    write_line(&mut d, &line.0, false);
    d
}

/// Planar centroid of an already projected geometry.
#[must_use]
pub fn centroid(geometry: &Geometry<f64>) -> Option<Point<f64>> {
    geometry.centroid()
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{MultiLineString, line_string, point, polygon};

    #[test]
    fn polygon_closes_without_repeating_first_point() {
        let square = polygon![
            (x: 0.0, y: 0.0),
            (x: 10.0, y: 0.0),
            (x: 10.0, y: 10.0),
            (x: 0.0, y: 10.0),
        ];
        assert_eq!(
            path_data(&Geometry::Polygon(square)),
            "M0,0L10,0L10,10L0,10Z"
        );
    }

    #[test]
    fn polygon_holes_are_subpaths() {
        let shape = polygon!(
            exterior: [(x: 0.0, y: 0.0), (x: 4.0, y: 0.0), (x: 4.0, y: 4.0)],
            interiors: [[(x: 1.0, y: 1.0), (x: 2.0, y: 1.0), (x: 2.0, y: 2.0)]],
        );
        assert_eq!(
            path_data(&Geometry::Polygon(shape)),
            "M0,0L4,0L4,4ZM1,1L2,1L2,2Z"
        );
    }

    #[test]
    fn lines_stay_open_and_round() {
        let lines = MultiLineString::new(vec![
            line_string![(x: 0.123_456, y: 1.0), (x: 2.0, y: 3.000_4)],
            line_string![(x: 5.0, y: 5.0), (x: 6.0, y: 6.0)],
        ]);
        assert_eq!(
            path_data(&Geometry::MultiLineString(lines)),
            "M0.123,1L2,3M5,5L6,6"
        );
    }

    #[test]
    fn points_have_no_path_but_a_centroid() {
        let p = Geometry::Point(point!(x: 3.0, y: 4.0));
        assert_eq!(path_data(&p), "");
        assert_eq!(centroid(&p), Some(point!(x: 3.0, y: 4.0)));
    }

    #[test]
    fn polygon_centroid_is_planar() {
        let square = Geometry::Polygon(polygon![
            (x: 0.0, y: 0.0),
            (x: 2.0, y: 0.0),
            (x: 2.0, y: 2.0),
            (x: 0.0, y: 2.0),
        ]);
        assert_eq!(centroid(&square), Some(point!(x: 1.0, y: 1.0)));
    }
}
