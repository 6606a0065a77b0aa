//! Boundary meshes: each shared arc drawn once.

use std::collections::BTreeMap;

use geo::{LineString, MultiLineString};

use crate::topojson::{GeometryObject, Shape, arc_index};
use crate::{Topology, TopologyError};

/// Filter selecting arcs shared by two different geometries.
#[must_use]
pub const fn interior(a: usize, b: usize) -> bool {
    a != b
}

/// Filter selecting arcs used by a single geometry (outer boundary).
#[must_use]
pub const fn exterior(a: usize, b: usize) -> bool {
    a == b
}

impl Topology {
    /// Every arc used by object `name`, stitched into lines.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown objects or dangling arc references.
    pub fn mesh_all(&self, name: &str) -> Result<MultiLineString<f64>, TopologyError> {
        self.mesh(name, |_, _| true)
    }

    /// The arcs of object `name` for which `filter(a, b)` holds, stitched
    /// into lines.
    ///
    /// `a` and `b` are the indices (in traversal order) of the first and
    /// last geometry that reference the arc; they are equal when only one
    /// geometry uses it. Each selected arc appears once, in the direction
    /// of its first use.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown objects or dangling arc references.
    pub fn mesh<F>(&self, name: &str, filter: F) -> Result<MultiLineString<f64>, TopologyError>
    where
        F: Fn(usize, usize) -> bool,
    {
        let mut uses: BTreeMap<i64, (i64, Vec<usize>)> = BTreeMap::new();
        let mut next = 0;
        collect_uses(self.object(name)?, &mut next, &mut uses);

        let fragments = uses
            .values()
            .filter(|(_, geoms)| match (geoms.first(), geoms.last()) {
                (Some(&a), Some(&b)) => filter(a, b),
                _ => false,
            })
            .map(|&(reference, _)| self.arc_coords(reference))
            .collect::<Result<Vec<_>, _>>()?;

        let lines: Vec<LineString<f64>> = crate::stitch::stitch(fragments)
            .into_iter()
            .map(LineString::new)
            .collect();

        log::debug!("Mesh of {name}: {} arcs -> {} lines", uses.len(), lines.len());

        Ok(MultiLineString::new(lines))
    }
}

/// Records, per arc, the first reference seen and the geometries using it.
/// Each non-collection geometry gets its own index.
fn collect_uses(object: &GeometryObject, next: &mut usize, uses: &mut BTreeMap<i64, (i64, Vec<usize>)>) {
    let refs: Vec<i64> = match &object.shape {
        Shape::GeometryCollection(members) => {
            for member in members {
                collect_uses(member, next, uses);
            }
            return;
        }
        Shape::Null | Shape::Point(_) | Shape::MultiPoint(_) => Vec::new(),
        Shape::LineString(refs) => refs.clone(),
        Shape::MultiLineString(lines) | Shape::Polygon(lines) => lines.concat(),
        Shape::MultiPolygon(polygons) => polygons.iter().flatten().flatten().copied().collect(),
    };

    let geom = *next;
    *next += 1;

    for reference in refs {
        uses.entry(arc_index(reference))
            .or_insert_with(|| (reference, Vec::new()))
            .1
            .push(geom);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Coord;
    use serde_json::json;

    fn squares() -> Topology {
        Topology::from_value(json!({
            "type": "Topology",
            "arcs": [
                [[1.0, 0.0], [1.0, 1.0]],
                [[1.0, 1.0], [0.0, 1.0], [0.0, 0.0], [1.0, 0.0]],
                [[1.0, 0.0], [2.0, 0.0], [2.0, 1.0], [1.0, 1.0]]
            ],
            "objects": {
                "tracts": {
                    "type": "GeometryCollection",
                    "geometries": [
                        {"type": "Polygon", "arcs": [[0, 1]]},
                        {"type": "Polygon", "arcs": [[2, -1]]}
                    ]
                }
            }
        }))
        .unwrap()
    }

    #[test]
    fn interior_mesh_keeps_shared_arcs_only() {
        let mesh = squares().mesh("tracts", interior).unwrap();
        assert_eq!(mesh.0.len(), 1);
        assert_eq!(
            mesh.0[0].0,
            vec![Coord { x: 1.0, y: 0.0 }, Coord { x: 1.0, y: 1.0 }]
        );
    }

    #[test]
    fn exterior_mesh_is_outer_boundary() {
        let mesh = squares().mesh("tracts", exterior).unwrap();
        let points: usize = mesh.0.iter().map(|l| l.0.len()).sum();
        assert_eq!(mesh.0.len(), 1);
        assert_eq!(points, 7);
        assert!(mesh.0[0].is_closed());
    }

    #[test]
    fn full_mesh_draws_each_arc_once() {
        let mesh = squares().mesh_all("tracts").unwrap();
        let segments: usize = mesh.0.iter().map(|l| l.0.len() - 1).sum();
        assert_eq!(segments, 7);
    }
}
