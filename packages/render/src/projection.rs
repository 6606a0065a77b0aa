//! Lambert conformal conic projection fitted to a canvas.
//!
//! Matches the conventions of the usual web mapping toolkits: longitude is
//! rotated before projecting, screen `y` grows downward, and
//! [`ConicConformal::fit_size`] scales and centers the projected bounds of
//! a geometry inside the canvas.

use std::f64::consts::{FRAC_PI_2, PI};

use geo::{Coord, CoordsIter, MapCoords};

const EPSILON: f64 = 1e-6;

/// Conic conformal projection with a screen transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConicConformal {
    n: f64,
    f: f64,
    rotate: f64,
    k: f64,
    tx: f64,
    ty: f64,
}

fn tany(phi: f64) -> f64 {
    ((FRAC_PI_2 + phi) / 2.0).tan()
}

impl ConicConformal {
    /// Creates a projection with standard `parallels` and a longitude
    /// rotation `rotate`, all in degrees. Scale 1, no translation.
    #[must_use]
    pub fn new(parallels: [f64; 2], rotate: f64) -> Self {
        let phi0 = parallels[0].to_radians();
        let phi1 = parallels[1].to_radians();
        let cy0 = phi0.cos();
        let n = if (phi0 - phi1).abs() < EPSILON {
            phi0.sin()
        } else {
            (cy0 / phi1.cos()).ln() / (tany(phi1) / tany(phi0)).ln()
        };
        let f = cy0 * tany(phi0).powf(n) / n;

        Self {
            n,
            f,
            rotate: rotate.to_radians(),
            k: 1.0,
            tx: 0.0,
            ty: 0.0,
        }
    }

    /// California State Plane III parallels (37°04′, 38°26′) centered on
    /// 120°30′ W.
    #[must_use]
    pub fn bay_area() -> Self {
        Self::new(
            [37.0 + 4.0 / 60.0, 38.0 + 26.0 / 60.0],
            120.0 + 30.0 / 60.0,
        )
    }

    /// Projects rotated geographic radians to unscaled planar
    /// coordinates (`y` up).
    fn raw(&self, lambda: f64, phi: f64) -> (f64, f64) {
        let phi = if self.f > 0.0 {
            phi.max(-FRAC_PI_2 + EPSILON)
        } else {
            phi.min(FRAC_PI_2 - EPSILON)
        };
        let r = self.f / tany(phi).powf(self.n);
        let (sin, cos) = (self.n * lambda).sin_cos();
        (r * sin, r.mul_add(-cos, self.f))
    }

    fn rotated_raw(&self, lon: f64, lat: f64) -> (f64, f64) {
        let mut lambda = lon.to_radians() + self.rotate;
        if lambda > PI {
            lambda -= 2.0 * PI;
        } else if lambda < -PI {
            lambda += 2.0 * PI;
        }
        self.raw(lambda, lat.to_radians())
    }

    /// Projects a longitude/latitude pair (degrees) to screen pixels.
    #[must_use]
    pub fn project(&self, lon: f64, lat: f64) -> Coord<f64> {
        let (x, y) = self.rotated_raw(lon, lat);
        Coord {
            x: self.k.mul_add(x, self.tx),
            y: (-self.k).mul_add(y, self.ty),
        }
    }

    /// Projects every coordinate of `geometry`.
    #[must_use]
    pub fn project_geometry<G>(&self, geometry: &G) -> G::Output
    where
        G: MapCoords<f64, f64>,
    {
        geometry.map_coords(|c| self.project(c.x, c.y))
    }

    /// Scales and translates the projection so the projected bounds of
    /// `geometry` fill a `width` × `height` canvas, centered on the
    /// unconstrained axis. An empty geometry centers the origin instead.
    #[must_use]
    pub fn fit_size<G>(self, width: f64, height: f64, geometry: &G) -> Self
    where
        G: CoordsIter<Scalar = f64>,
    {
        let mut bounds: Option<(f64, f64, f64, f64)> = None;
        for c in geometry.coords_iter() {
            let (x, y) = self.rotated_raw(c.x, c.y);
            let y = -y;
            bounds = Some(match bounds {
                None => (x, y, x, y),
                Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
            });
        }

        let Some((x0, y0, x1, y1)) = bounds else {
            log::warn!("Fitting projection to empty geometry; centering origin");
            return Self {
                k: 1.0,
                tx: width / 2.0,
                ty: height / 2.0,
                ..self
            };
        };

        let k = (width / (x1 - x0)).min(height / (y1 - y0));
        let k = if k.is_finite() { k } else { 1.0 };

        Self {
            k,
            tx: k.mul_add(-(x1 + x0), width) / 2.0,
            ty: k.mul_add(-(y1 + y0), height) / 2.0,
            ..self
        }
    }

    /// Pixels per unprojected unit.
    #[must_use]
    pub const fn scale(&self) -> f64 {
        self.k
    }
}

impl Default for ConicConformal {
    fn default() -> Self {
        Self::bay_area()
    }
}
