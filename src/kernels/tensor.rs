//! Gravity gradient tensor components, in Eötvös.
//!
//! Second derivatives of the potential in the north-east-down frame. Writing
//! `c_φ`, `c_φφ = -c` for the latitude partials of `cos ψ`, `s_λ = (∂c/∂λ) / cos φ`
//! and `K_*` for the partials of the radially integrated kernel:
//!
//! ```text
//! gxx =  cos φ' [(K_cc c_φ² + K_c c_φφ)/r² + K_r/r]
//! gxy =  cos φ' K_cc c_φ s_λ / r²
//! gxz = -cos φ' c_φ (K_rc/r - K_c/r²)
//! gyy =  cos φ' [(K_cc s_λ² - c K_c)/r² + K_r/r]
//! gyz = -cos φ' s_λ (K_rc/r - K_c/r²)
//! gzz =  cos φ' K_rr
//! ```
//!
//! `gxy` and `gyy` are the simplified forms of the chain rule on `(φ, λ)`: the `K_c` terms
//! reduce with `∂²c/∂φ∂λ + tan φ ∂c/∂λ = 0` and `∂²c/∂λ² / cos² φ - tan φ c_φ = -c`.
use super::geometry::{NodeGeometry, PointSource};
use super::radial::RadialIntegrals;
use super::{FieldComponent, Kernel};

#[derive(Debug, Clone, Copy, Default)]
pub struct Gxx;

#[derive(Debug, Clone, Copy, Default)]
pub struct Gxy;

#[derive(Debug, Clone, Copy, Default)]
pub struct Gxz;

#[derive(Debug, Clone, Copy, Default)]
pub struct Gyy;

#[derive(Debug, Clone, Copy, Default)]
pub struct Gyz;

#[derive(Debug, Clone, Copy, Default)]
pub struct Gzz;

impl Kernel for Gxx {
    const COMPONENT: FieldComponent = FieldComponent::Gxx;

    #[inline]
    fn kernel(geom: &NodeGeometry, radial: &RadialIntegrals) -> f64 {
        let r = geom.r;
        geom.cos_lat_node
            * ((radial.k_cc() * geom.c_lat * geom.c_lat + radial.k_c() * geom.c_lat_lat())
                / (r * r)
                + radial.k_r() / r)
    }

    #[inline]
    fn kernel_3d(source: &PointSource) -> f64 {
        source.tensor(0, 0)
    }
}

impl Kernel for Gxy {
    const COMPONENT: FieldComponent = FieldComponent::Gxy;

    #[inline]
    fn kernel(geom: &NodeGeometry, radial: &RadialIntegrals) -> f64 {
        let r = geom.r;
        geom.cos_lat_node * radial.k_cc() * geom.c_lat * geom.c_lon_sec / (r * r)
    }

    #[inline]
    fn kernel_3d(source: &PointSource) -> f64 {
        source.tensor(0, 1)
    }
}

impl Kernel for Gxz {
    const COMPONENT: FieldComponent = FieldComponent::Gxz;

    #[inline]
    fn kernel(geom: &NodeGeometry, radial: &RadialIntegrals) -> f64 {
        let r = geom.r;
        -geom.cos_lat_node * geom.c_lat * (radial.k_rc() / r - radial.k_c() / (r * r))
    }

    #[inline]
    fn kernel_3d(source: &PointSource) -> f64 {
        source.tensor(0, 2)
    }
}

impl Kernel for Gyy {
    const COMPONENT: FieldComponent = FieldComponent::Gyy;

    #[inline]
    fn kernel(geom: &NodeGeometry, radial: &RadialIntegrals) -> f64 {
        let r = geom.r;
        geom.cos_lat_node
            * ((radial.k_cc() * geom.c_lon_sec * geom.c_lon_sec - geom.cos_psi * radial.k_c())
                / (r * r)
                + radial.k_r() / r)
    }

    #[inline]
    fn kernel_3d(source: &PointSource) -> f64 {
        source.tensor(1, 1)
    }
}

impl Kernel for Gyz {
    const COMPONENT: FieldComponent = FieldComponent::Gyz;

    #[inline]
    fn kernel(geom: &NodeGeometry, radial: &RadialIntegrals) -> f64 {
        let r = geom.r;
        -geom.cos_lat_node * geom.c_lon_sec * (radial.k_rc() / r - radial.k_c() / (r * r))
    }

    #[inline]
    fn kernel_3d(source: &PointSource) -> f64 {
        source.tensor(1, 2)
    }
}

impl Kernel for Gzz {
    const COMPONENT: FieldComponent = FieldComponent::Gzz;

    #[inline]
    fn kernel(geom: &NodeGeometry, radial: &RadialIntegrals) -> f64 {
        geom.cos_lat_node * radial.k_rr()
    }

    #[inline]
    fn kernel_3d(source: &PointSource) -> f64 {
        source.tensor(2, 2)
    }
}
