use super::geometry::{NodeGeometry, PointSource};
use super::radial::RadialIntegrals;
use super::{FieldComponent, Kernel};

/// Gravitational potential, in m²/s².
#[derive(Debug, Clone, Copy, Default)]
pub struct Potential;

impl Kernel for Potential {
    const COMPONENT: FieldComponent = FieldComponent::Potential;

    #[inline]
    fn kernel(geom: &NodeGeometry, radial: &RadialIntegrals) -> f64 {
        geom.cos_lat_node * radial.k()
    }

    #[inline]
    fn kernel_3d(source: &PointSource) -> f64 {
        source.kappa / source.distance
    }
}
