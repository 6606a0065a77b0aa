//! Topological union of polygons.

use std::collections::HashMap;

use geo::{Area, Contains, InteriorPoint, LineString, MultiPolygon, Polygon};

use crate::topojson::{GeometryObject, Shape, arc_index};
use crate::{Topology, TopologyError};

impl Topology {
    /// Merges every polygon of object `name` into one multipolygon.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown objects or dangling arc references.
    pub fn merge(&self, name: &str) -> Result<MultiPolygon<f64>, TopologyError> {
        let mut polygons = Vec::new();
        collect_polygons(self.object(name)?, &mut polygons);
        self.merge_polygons(&polygons)
    }

    /// Merges polygons given as rings of arc references.
    ///
    /// Arcs used exactly once across all rings form the boundary of the
    /// union; arcs used more than once are interior and dropped. The
    /// remaining arcs are stitched into rings, and each ring becomes an
    /// exterior or a hole depending on how many larger rings contain it.
    ///
    /// # Errors
    ///
    /// Returns an error for dangling arc references.
    pub fn merge_polygons(&self, polygons: &[&[Vec<i64>]]) -> Result<MultiPolygon<f64>, TopologyError> {
        let refs = || polygons.iter().flat_map(|rings| rings.iter().flatten().copied());

        let mut counts: HashMap<i64, usize> = HashMap::new();
        for reference in refs() {
            *counts.entry(arc_index(reference)).or_default() += 1;
        }

        let fragments = refs()
            .filter(|&r| counts.get(&arc_index(r)) == Some(&1))
            .map(|r| self.arc_coords(r))
            .collect::<Result<Vec<_>, _>>()?;

        let rings: Vec<LineString<f64>> = crate::stitch::stitch(fragments)
            .into_iter()
            .filter_map(|mut coords| {
                let (&first, &last) = (coords.first()?, coords.last()?);
                if first != last {
                    log::warn!("Merged boundary did not close; closing it");
                    coords.push(first);
                }
                (coords.len() >= 4).then(|| LineString::new(coords))
            })
            .collect();

        log::debug!(
            "Merged {} polygons: {} boundary arcs -> {} rings",
            polygons.len(),
            counts.values().filter(|&&n| n == 1).count(),
            rings.len()
        );

        Ok(nest_rings(rings))
    }
}

fn collect_polygons<'a>(object: &'a GeometryObject, out: &mut Vec<&'a [Vec<i64>]>) {
    match &object.shape {
        Shape::Polygon(rings) => out.push(rings),
        Shape::MultiPolygon(polygons) => out.extend(polygons.iter().map(Vec::as_slice)),
        Shape::GeometryCollection(members) => {
            for member in members {
                collect_polygons(member, out);
            }
        }
        _ => {}
    }
}

/// Builds polygons from unordered rings: a ring nested inside an odd
/// number of larger rings is a hole of its smallest container.
fn nest_rings(rings: Vec<LineString<f64>>) -> MultiPolygon<f64> {
    let mut shells: Vec<(Polygon<f64>, f64)> = rings
        .into_iter()
        .map(|ring| {
            let polygon = Polygon::new(ring, Vec::new());
            let area = polygon.unsigned_area();
            (polygon, area)
        })
        .collect();
    shells.sort_by(|a, b| b.1.total_cmp(&a.1));

    let mut hole_of: Vec<Option<usize>> = vec![None; shells.len()];
    for i in 0..shells.len() {
        let Some(probe) = shells[i].0.interior_point() else {
            continue;
        };
        let parent = (0..i).rev().find(|&j| shells[j].0.contains(&probe));
        hole_of[i] = parent.filter(|&j| hole_of[j].is_none());
    }

    let mut slots: Vec<Option<usize>> = vec![None; shells.len()];
    let mut polygons: Vec<Polygon<f64>> = Vec::new();
    for (i, (polygon, _)) in shells.iter().enumerate() {
        if hole_of[i].is_none() {
            slots[i] = Some(polygons.len());
            polygons.push(polygon.clone());
        }
    }
    for (i, (polygon, _)) in shells.iter().enumerate() {
        if let Some(slot) = hole_of[i].and_then(|j| slots[j]) {
            polygons[slot].interiors_push(polygon.exterior().clone());
        }
    }

    MultiPolygon::new(polygons)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn adjacent_squares_merge_into_one_polygon() {
        let topology = Topology::from_value(json!({
            "type": "Topology",
            "arcs": [
                [[1.0, 0.0], [1.0, 1.0]],
                [[1.0, 1.0], [0.0, 1.0], [0.0, 0.0], [1.0, 0.0]],
                [[1.0, 0.0], [2.0, 0.0], [2.0, 1.0], [1.0, 1.0]]
            ],
            "objects": {
                "counties": {
                    "type": "GeometryCollection",
                    "geometries": [
                        {"type": "Polygon", "arcs": [[0, 1]]},
                        {"type": "MultiPolygon", "arcs": [[[2, -1]]]}
                    ]
                }
            }
        }))
        .unwrap();

        let merged = topology.merge("counties").unwrap();
        assert_eq!(merged.0.len(), 1);
        assert!(merged.0[0].interiors().is_empty());
        assert!((merged.unsigned_area() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn enclosed_ring_becomes_hole() {
        let topology = Topology::from_value(json!({
            "type": "Topology",
            "arcs": [
                [[0.0, 0.0], [4.0, 0.0], [4.0, 4.0], [0.0, 4.0], [0.0, 0.0]],
                [[1.0, 1.0], [1.0, 3.0], [3.0, 3.0], [3.0, 1.0], [1.0, 1.0]],
                [[10.0, 0.0], [11.0, 0.0], [11.0, 1.0], [10.0, 0.0]]
            ],
            "objects": {
                "land": {
                    "type": "GeometryCollection",
                    "geometries": [
                        {"type": "Polygon", "arcs": [[0], [1]]},
                        {"type": "Polygon", "arcs": [[2]]}
                    ]
                }
            }
        }))
        .unwrap();

        let merged = topology.merge("land").unwrap();
        assert_eq!(merged.0.len(), 2);
        assert_eq!(merged.0[0].interiors().len(), 1);
        assert!(merged.0[1].interiors().is_empty());
        assert!((merged.unsigned_area() - 12.5).abs() < 1e-12);
    }

    #[test]
    fn non_polygon_objects_merge_to_nothing() {
        let topology = Topology::from_value(json!({
            "type": "Topology",
            "arcs": [[[0.0, 0.0], [1.0, 1.0]]],
            "objects": {"roads": {"type": "LineString", "arcs": [0]}}
        }))
        .unwrap();
        assert!(topology.merge("roads").unwrap().0.is_empty());
    }
}
