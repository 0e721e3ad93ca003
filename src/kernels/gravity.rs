//! Acceleration components, in mGal.
//!
//! With `K` the radially integrated potential kernel:
//!
//! ```text
//! gx =  cos φ' K_c ∂c/∂φ / r
//! gy =  cos φ' K_c (∂c/∂λ / cos φ) / r
//! gz = -cos φ' K_r
//! ```
use super::geometry::{NodeGeometry, PointSource};
use super::radial::RadialIntegrals;
use super::{FieldComponent, Kernel};

/// North component of the acceleration.
#[derive(Debug, Clone, Copy, Default)]
pub struct Gx;

/// East component of the acceleration.
#[derive(Debug, Clone, Copy, Default)]
pub struct Gy;

/// Downward component of the acceleration.
#[derive(Debug, Clone, Copy, Default)]
pub struct Gz;

impl Kernel for Gx {
    const COMPONENT: FieldComponent = FieldComponent::Gx;

    #[inline]
    fn kernel(geom: &NodeGeometry, radial: &RadialIntegrals) -> f64 {
        geom.cos_lat_node * geom.c_lat * radial.k_c() / geom.r
    }

    #[inline]
    fn kernel_3d(source: &PointSource) -> f64 {
        source.gradient(0)
    }
}

impl Kernel for Gy {
    const COMPONENT: FieldComponent = FieldComponent::Gy;

    #[inline]
    fn kernel(geom: &NodeGeometry, radial: &RadialIntegrals) -> f64 {
        geom.cos_lat_node * geom.c_lon_sec * radial.k_c() / geom.r
    }

    #[inline]
    fn kernel_3d(source: &PointSource) -> f64 {
        source.gradient(1)
    }
}

impl Kernel for Gz {
    const COMPONENT: FieldComponent = FieldComponent::Gz;

    #[inline]
    fn kernel(geom: &NodeGeometry, radial: &RadialIntegrals) -> f64 {
        -geom.cos_lat_node * radial.k_r()
    }

    #[inline]
    fn kernel_3d(source: &PointSource) -> f64 {
        source.gradient(2)
    }
}
