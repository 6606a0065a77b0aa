//! `TopoJSON` document model and arc decoding.

use geo::{
    Coord, Geometry, GeometryCollection, LineString, MultiLineString, MultiPoint, MultiPolygon,
    Point, Polygon,
};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::{Feature, TopologyError, id_string};

/// Quantization transform: `position = quantized * scale + translate`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Transform {
    /// Per-axis scale.
    pub scale: [f64; 2],
    /// Per-axis offset.
    pub translate: [f64; 2],
}

impl Transform {
    /// Maps a quantized position to absolute coordinates.
    #[must_use]
    pub fn apply(&self, x: f64, y: f64) -> Coord<f64> {
        Coord {
            x: x.mul_add(self.scale[0], self.translate[0]),
            y: y.mul_add(self.scale[1], self.translate[1]),
        }
    }
}

/// Decoded shape of a topology geometry. Line and polygon shapes keep
/// their arc references; arcs are resolved on demand.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Geometry with a `null` type.
    Null,
    /// Single position.
    Point(Coord<f64>),
    /// Several positions.
    MultiPoint(Vec<Coord<f64>>),
    /// Arc references of one line.
    LineString(Vec<i64>),
    /// Arc references of several lines.
    MultiLineString(Vec<Vec<i64>>),
    /// Rings of arc references; the first ring is the exterior.
    Polygon(Vec<Vec<i64>>),
    /// Several polygons.
    MultiPolygon(Vec<Vec<Vec<i64>>>),
    /// Nested geometries.
    GeometryCollection(Vec<GeometryObject>),
}

/// A geometry object of a topology with its id and properties.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryObject {
    /// Object id, numbers rendered as strings.
    pub id: Option<String>,
    /// Property map.
    pub properties: Map<String, Value>,
    /// Decoded shape.
    pub shape: Shape,
}

#[derive(Debug, Deserialize)]
struct RawTopology {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    transform: Option<Transform>,
    #[serde(default)]
    arcs: Vec<Vec<Vec<f64>>>,
    #[serde(default)]
    objects: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct RawGeometry {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    properties: Option<Map<String, Value>>,
    #[serde(default)]
    arcs: Option<Value>,
    #[serde(default)]
    coordinates: Option<Value>,
    #[serde(default)]
    geometries: Option<Vec<Value>>,
}

/// A decoded topology: absolute arc coordinates plus named objects in
/// document order.
#[derive(Debug, Clone, PartialEq)]
pub struct Topology {
    transform: Option<Transform>,
    arcs: Vec<Vec<Coord<f64>>>,
    objects: Vec<(String, GeometryObject)>,
}

impl Topology {
    /// Parses a `TopoJSON` document.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not JSON, not a topology, or
    /// contains malformed geometries.
    pub fn parse(text: &str) -> Result<Self, TopologyError> {
        Self::from_value(serde_json::from_str(text)?)
    }

    /// Decodes a `TopoJSON` document already parsed into a JSON value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not a topology or contains
    /// malformed geometries.
    pub fn from_value(value: Value) -> Result<Self, TopologyError> {
        let raw: RawTopology = serde_json::from_value(value)?;
        if raw.kind != "Topology" {
            return Err(TopologyError::NotATopology { kind: raw.kind });
        }

        let arcs = decode_arcs(raw.arcs, raw.transform)?;
        let objects = raw
            .objects
            .into_iter()
            .map(|(name, value)| Ok((name, decode_object(value, raw.transform)?)))
            .collect::<Result<Vec<_>, TopologyError>>()?;

        log::debug!(
            "Decoded topology: {} arcs, objects {:?}",
            arcs.len(),
            objects.iter().map(|(n, _)| n.as_str()).collect::<Vec<_>>()
        );

        Ok(Self {
            transform: raw.transform,
            arcs,
            objects,
        })
    }

    /// The quantization transform, if the topology is quantized.
    #[must_use]
    pub const fn transform(&self) -> Option<Transform> {
        self.transform
    }

    /// Decoded arcs in absolute coordinates.
    #[must_use]
    pub fn arcs(&self) -> &[Vec<Coord<f64>>] {
        &self.arcs
    }

    /// Object names in document order.
    pub fn object_names(&self) -> impl Iterator<Item = &str> {
        self.objects.iter().map(|(name, _)| name.as_str())
    }

    /// Looks up an object by name.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::UnknownObject`] if there is no such object.
    pub fn object(&self, name: &str) -> Result<&GeometryObject, TopologyError> {
        self.objects
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, object)| object)
            .ok_or_else(|| TopologyError::UnknownObject {
                name: name.to_string(),
            })
    }

    /// The first object in document order.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::NoObjects`] for an empty topology.
    pub fn first_object(&self) -> Result<(&str, &GeometryObject), TopologyError> {
        self.objects
            .first()
            .map(|(name, object)| (name.as_str(), object))
            .ok_or(TopologyError::NoObjects)
    }

    /// Converts the object `name` to features. A geometry collection
    /// yields one feature per member, anything else a single feature.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown objects or dangling arc references.
    pub fn feature(&self, name: &str) -> Result<Vec<Feature>, TopologyError> {
        self.features_of(self.object(name)?)
    }

    /// Converts `object` to features, see [`Self::feature`].
    ///
    /// # Errors
    ///
    /// Returns an error for dangling arc references.
    pub fn features_of(&self, object: &GeometryObject) -> Result<Vec<Feature>, TopologyError> {
        match &object.shape {
            Shape::GeometryCollection(members) => {
                members.iter().map(|m| self.to_feature(m)).collect()
            }
            _ => Ok(vec![self.to_feature(object)?]),
        }
    }

    fn to_feature(&self, object: &GeometryObject) -> Result<Feature, TopologyError> {
        Ok(Feature {
            id: object.id.clone(),
            properties: object.properties.clone(),
            geometry: self.geometry(object)?,
        })
    }

    /// Resolves the arcs of `object` into a [`Geometry`]; `None` for null
    /// geometries.
    ///
    /// # Errors
    ///
    /// Returns an error for dangling arc references.
    pub fn geometry(&self, object: &GeometryObject) -> Result<Option<Geometry<f64>>, TopologyError> {
        let geometry = match &object.shape {
            Shape::Null => return Ok(None),
            Shape::Point(c) => Geometry::Point(Point::from(*c)),
            Shape::MultiPoint(coords) => Geometry::MultiPoint(MultiPoint::new(
                coords.iter().copied().map(Point::from).collect(),
            )),
            Shape::LineString(refs) => Geometry::LineString(self.line(refs)?),
            Shape::MultiLineString(lines) => Geometry::MultiLineString(MultiLineString::new(
                lines
                    .iter()
                    .map(|l| self.line(l))
                    .collect::<Result<_, _>>()?,
            )),
            Shape::Polygon(rings) => Geometry::Polygon(self.polygon(rings)?),
            Shape::MultiPolygon(polygons) => Geometry::MultiPolygon(MultiPolygon::new(
                polygons
                    .iter()
                    .map(|p| self.polygon(p))
                    .collect::<Result<_, _>>()?,
            )),
            Shape::GeometryCollection(members) => {
                let geometries = members
                    .iter()
                    .filter_map(|m| self.geometry(m).transpose())
                    .collect::<Result<Vec<_>, _>>()?;
                Geometry::GeometryCollection(GeometryCollection(geometries))
            }
        };
        Ok(Some(geometry))
    }

    /// Coordinates of arc `reference`, reversed for negative (`~i`)
    /// references.
    pub(crate) fn arc_coords(&self, reference: i64) -> Result<Vec<Coord<f64>>, TopologyError> {
        let arc = self.arc(reference)?;
        if reference < 0 {
            Ok(arc.iter().rev().copied().collect())
        } else {
            Ok(arc.clone())
        }
    }

    fn arc(&self, reference: i64) -> Result<&Vec<Coord<f64>>, TopologyError> {
        let out_of_range = || TopologyError::ArcOutOfRange {
            index: reference,
            count: self.arcs.len(),
        };
        let index = usize::try_from(arc_index(reference)).map_err(|_| out_of_range())?;
        self.arcs.get(index).ok_or_else(out_of_range)
    }

    fn line(&self, refs: &[i64]) -> Result<LineString<f64>, TopologyError> {
        let mut coords = self.join(refs)?;
        if coords.len() == 1 {
            coords.push(coords[0]);
        }
        Ok(LineString::new(coords))
    }

    fn ring(&self, refs: &[i64]) -> Result<LineString<f64>, TopologyError> {
        let mut coords = self.join(refs)?;
        if let Some(&first) = coords.first() {
            while coords.len() < 4 {
                coords.push(first);
            }
        }
        Ok(LineString::new(coords))
    }

    fn polygon(&self, rings: &[Vec<i64>]) -> Result<Polygon<f64>, TopologyError> {
        let mut rings = rings.iter().map(|r| self.ring(r));
        let exterior = rings
            .next()
            .transpose()?
            .unwrap_or_else(|| LineString::new(Vec::new()));
        let interiors = rings.collect::<Result<Vec<_>, _>>()?;
        Ok(Polygon::new(exterior, interiors))
    }

    /// Concatenates arcs, dropping the duplicated joint between
    /// consecutive arcs.
    fn join(&self, refs: &[i64]) -> Result<Vec<Coord<f64>>, TopologyError> {
        let mut coords: Vec<Coord<f64>> = Vec::new();
        for &reference in refs {
            let arc = self.arc_coords(reference)?;
            let skip = usize::from(!coords.is_empty());
            coords.extend(arc.into_iter().skip(skip));
        }
        Ok(coords)
    }
}

/// Index into the arc table for a possibly reversed reference.
pub(crate) const fn arc_index(reference: i64) -> i64 {
    if reference < 0 { !reference } else { reference }
}

fn decode_arcs(
    arcs: Vec<Vec<Vec<f64>>>,
    transform: Option<Transform>,
) -> Result<Vec<Vec<Coord<f64>>>, TopologyError> {
    arcs.into_iter()
        .enumerate()
        .map(|(i, arc)| {
            let (mut x, mut y) = (0.0, 0.0);
            arc.into_iter()
                .map(|position| {
                    let [px, py, ..] = position[..] else {
                        return Err(TopologyError::Malformed {
                            kind: "arc".to_string(),
                            message: format!("arc {i} has a position with {} values", position.len()),
                        });
                    };
                    Ok(match transform {
                        Some(t) => {
                            x += px;
                            y += py;
                            t.apply(x, y)
                        }
                        None => Coord { x: px, y: py },
                    })
                })
                .collect()
        })
        .collect()
}

fn decode_object(value: Value, transform: Option<Transform>) -> Result<GeometryObject, TopologyError> {
    let raw: RawGeometry = serde_json::from_value(value)?;
    let kind = raw.kind.unwrap_or_default();

    let shape = match kind.as_str() {
        "" => Shape::Null,
        "Point" => Shape::Point(position(member(raw.coordinates, &kind, "coordinates")?, transform, &kind)?),
        "MultiPoint" => Shape::MultiPoint(
            member::<Vec<Vec<f64>>>(raw.coordinates, &kind, "coordinates")?
                .into_iter()
                .map(|p| position(p, transform, &kind))
                .collect::<Result<_, _>>()?,
        ),
        "LineString" => Shape::LineString(member(raw.arcs, &kind, "arcs")?),
        "MultiLineString" => Shape::MultiLineString(member(raw.arcs, &kind, "arcs")?),
        "Polygon" => Shape::Polygon(member(raw.arcs, &kind, "arcs")?),
        "MultiPolygon" => Shape::MultiPolygon(member(raw.arcs, &kind, "arcs")?),
        "GeometryCollection" => Shape::GeometryCollection(
            raw.geometries
                .unwrap_or_default()
                .into_iter()
                .map(|g| decode_object(g, transform))
                .collect::<Result<_, _>>()?,
        ),
        _ => return Err(TopologyError::UnsupportedType { kind }),
    };

    Ok(GeometryObject {
        id: raw.id.as_ref().and_then(id_string),
        properties: raw.properties.unwrap_or_default(),
        shape,
    })
}

fn member<T: DeserializeOwned>(value: Option<Value>, kind: &str, name: &str) -> Result<T, TopologyError> {
    let malformed = |message: String| TopologyError::Malformed {
        kind: kind.to_string(),
        message,
    };
    let value = value.ok_or_else(|| malformed(format!("missing `{name}`")))?;
    serde_json::from_value(value).map_err(|e| malformed(format!("`{name}`: {e}")))
}

fn position(
    position: Vec<f64>,
    transform: Option<Transform>,
    kind: &str,
) -> Result<Coord<f64>, TopologyError> {
    let [x, y, ..] = position[..] else {
        return Err(TopologyError::Malformed {
            kind: kind.to_string(),
            message: format!("position with {} values", position.len()),
        });
    };
    Ok(transform.map_or(Coord { x, y }, |t| t.apply(x, y)))
}
