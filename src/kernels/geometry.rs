//! Angular geometry between an observation point and an integration node.
//!
//! The local frame of the observation point is **x → north, y → east, z → down**.
//! Every kernel is expressed with `c = cos ψ` and its partial derivatives with respect to the
//! latitude `φ` and longitude `λ` of the observation point:
//!
//! ```text
//! c      = sin φ sin φ' + cos φ cos φ' cos(λ - λ')
//! ∂c/∂φ  = cos φ sin φ' - sin φ cos φ' cos(λ - λ')
//! ∂c/∂λ  = -cos φ cos φ' sin(λ - λ')
//! ```
//!
//! Near a node `c` rounds to 1, so `1 - c` is taken from the haversine formula instead:
//!
//! ```text
//! 1 - c = 2 [sin²((φ - φ')/2) + cos φ cos φ' sin²((λ - λ')/2)]
//! ```
//!
//! The east derivatives only appear divided by `cos φ`; they are stored in that form so that
//! nothing is divided by `cos φ` at the poles.
use nalgebra::Vector3;

use crate::constants::{Degree, Meter, Radian, MEAN_EARTH_RADIUS, RADEG};

/// Observation point in spherical coordinates, with its trigonometric terms precomputed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObservationPoint {
    pub lon: Radian,
    pub lat: Radian,
    pub sin_lat: f64,
    pub cos_lat: f64,
    /// Radius, `R + height`
    pub r: Meter,
}

impl ObservationPoint {
    pub fn new(lon: Degree, lat: Degree, height: Meter) -> Self {
        let (sin_lat, cos_lat) = (RADEG * lat).sin_cos();
        ObservationPoint {
            lon: RADEG * lon,
            lat: RADEG * lat,
            sin_lat,
            cos_lat,
            r: MEAN_EARTH_RADIUS + height,
        }
    }
}

/// Angular quadrature node of a tesseroid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntegrationNode {
    pub lon: Radian,
    pub lat: Radian,
    pub sin_lat: f64,
    pub cos_lat: f64,
}

impl IntegrationNode {
    pub fn new(lon: Radian, lat: Radian) -> Self {
        let (sin_lat, cos_lat) = lat.sin_cos();
        IntegrationNode {
            lon,
            lat,
            sin_lat,
            cos_lat,
        }
    }
}

/// `cos ψ` and its angular partials for one (point, node) pair.
#[derive(Debug, Clone, Copy)]
pub struct NodeGeometry {
    pub r: Meter,
    pub cos_psi: f64,
    /// `1 - cos ψ`, accurate close to the node
    pub one_minus_cos_psi: f64,
    /// `∂c/∂φ`
    pub c_lat: f64,
    /// `∂c/∂λ / cos φ = cos φ' sin(λ' - λ)`
    pub c_lon_sec: f64,
    /// `cos φ'`, the area element of the node
    pub cos_lat_node: f64,
    /// `sin(λ' - λ)`
    pub sin_dlon: f64,
}

impl NodeGeometry {
    #[inline]
    pub fn new(point: &ObservationPoint, node: &IntegrationNode) -> Self {
        let dlon = point.lon - node.lon;
        let (sin_d, cos_d) = dlon.sin_cos();
        let cc = point.cos_lat * node.cos_lat;
        let sc = point.sin_lat * node.cos_lat;
        let hav_lat = (0.5 * (point.lat - node.lat)).sin().powi(2);
        let hav_lon = (0.5 * dlon).sin().powi(2);

        NodeGeometry {
            r: point.r,
            cos_psi: point.sin_lat * node.sin_lat + cc * cos_d,
            one_minus_cos_psi: 2.0 * (hav_lat + cc * hav_lon),
            c_lat: point.cos_lat * node.sin_lat - sc * cos_d,
            c_lon_sec: -node.cos_lat * sin_d,
            cos_lat_node: node.cos_lat,
            sin_dlon: -sin_d,
        }
    }

    /// `∂²c/∂φ² = -c`
    #[inline]
    pub fn c_lat_lat(&self) -> f64 {
        -self.cos_psi
    }

    /// Mass element at radius `rl` seen from the observation point.
    #[inline]
    pub fn source_at(&self, rl: Meter) -> PointSource {
        let delta = Vector3::new(
            rl * self.c_lat,
            rl * self.cos_lat_node * self.sin_dlon,
            self.r - rl * self.cos_psi,
        );
        PointSource {
            distance: delta.norm(),
            delta,
            kappa: rl * rl * self.cos_lat_node,
        }
    }
}

/// Displacement from the observation point to a mass element, in the local north-east-down
/// frame, with the volume element `κ = r'² cos φ'`.
#[derive(Debug, Clone, Copy)]
pub struct PointSource {
    pub delta: Vector3<f64>,
    pub distance: f64,
    pub kappa: f64,
}

impl PointSource {
    /// `κ (3 Δᵢ Δⱼ - δᵢⱼ ℓ²) / ℓ⁵`
    #[inline]
    pub fn tensor(&self, i: usize, j: usize) -> f64 {
        let l2 = self.distance * self.distance;
        let diag = if i == j { l2 } else { 0.0 };
        self.kappa * (3.0 * self.delta[i] * self.delta[j] - diag) / (l2 * l2 * self.distance)
    }

    /// `κ Δᵢ / ℓ³`
    #[inline]
    pub fn gradient(&self, i: usize) -> f64 {
        self.kappa * self.delta[i] / self.distance.powi(3)
    }
}
