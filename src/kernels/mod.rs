//! # Field kernels
//!
//! A kernel turns one angular quadrature node of a tesseroid into a contribution to one field
//! component at one observation point. Ten components are available:
//!
//! | Type | Component | Unit |
//! |------|-----------|------|
//! | [`Potential`] | gravitational potential | m²/s² |
//! | [`Gx`], [`Gy`], [`Gz`] | gravitational acceleration | mGal |
//! | [`Gxx`], [`Gxy`], [`Gxz`], [`Gyy`], [`Gyz`], [`Gzz`] | gravity gradient tensor | Eötvös |
//!
//! ## Two integration paths
//!
//! * **2-D path** – [`Kernel::kernel`]: the radial integral is done analytically
//!   ([`radial::RadialIntegrals`]) and only the longitude and latitude are integrated with
//!   Gauss–Legendre quadrature.
//! * **3-D path** – [`Kernel::kernel_3d`]: the Newtonian integrand of a single mass element,
//!   integrated by quadrature in all three directions.
//!
//! The closed forms of the 2-D path break down when the observation point sits on the vertical
//! of an angular node. [`Kernel::evaluate`] detects this and returns
//! [`KernelValue::Singular`]; the forward modeler then recomputes that (tesseroid, point) pair
//! with the 3-D path. Two triggers are honored:
//!
//! 1. the logarithm of the radial integral is undefined, which includes points closer to the
//!    vertical of the node than [`crate::constants::LOG_DOMAIN_TOLERANCE`], or the closed form
//!    is not finite;
//! 2. for the six tensor components only, `cos ψ >= max_cos_psi`, where the closed forms are
//!    still defined but have lost most of their significant digits.
//!
//! ## Sign convention
//!
//! The local frame of the observation point is x → north, y → east, z → down. A mass located
//! below the point gives a positive `gz` and a positive `gzz`.
//!
//! ## See also
//!
//! * [`crate::forward::TessGravity`] – Quadrature loops and fallback handling.
pub mod geometry;
pub mod radial;

mod gravity;
mod potential;
mod tensor;

use std::fmt;
use std::str::FromStr;

use crate::constants::{
    GRAVITY_SIZE_RATIO, POTENTIAL_SIZE_RATIO, SI2EOTVOS, SI2MGAL, TENSOR_SIZE_RATIO,
};
use crate::tess_errors::TessError;

use geometry::{IntegrationNode, NodeGeometry, ObservationPoint, PointSource};
use radial::RadialIntegrals;

pub use gravity::{Gx, Gy, Gz};
pub use potential::Potential;
pub use tensor::{Gxx, Gxy, Gxz, Gyy, Gyz, Gzz};

/// Why the 2-D closed form could not be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SingularityKind {
    /// A logarithm argument of the radial integral is zero to working precision.
    LogDomain,
    /// `cos ψ` above the proximity threshold of the tensor kernels.
    NearNode,
    /// The closed form evaluated to NaN or infinity.
    NonFinite,
}

/// Outcome of a 2-D kernel evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KernelValue {
    Value(f64),
    Singular(SingularityKind),
}

/// One field component.
pub trait Kernel: Send + Sync {
    const COMPONENT: FieldComponent;

    /// Radially integrated kernel for one angular node.
    fn kernel(geom: &NodeGeometry, radial: &RadialIntegrals) -> f64;

    /// Integrand of a single mass element.
    fn kernel_3d(source: &PointSource) -> f64;

    /// Evaluate the 2-D kernel of the node, reporting singular configurations.
    ///
    /// Arguments
    /// -----------------
    /// * `point` – Observation point.
    /// * `node` – Angular quadrature node.
    /// * `r1`, `r2` – Inner and outer radii of the tesseroid.
    /// * `max_cos_psi` – Proximity threshold of the tensor components.
    #[inline]
    fn evaluate(
        point: &ObservationPoint,
        node: &IntegrationNode,
        r1: f64,
        r2: f64,
        max_cos_psi: f64,
    ) -> KernelValue {
        let geom = NodeGeometry::new(point, node);
        if Self::COMPONENT.is_tensor() && geom.cos_psi >= max_cos_psi {
            return KernelValue::Singular(SingularityKind::NearNode);
        }
        let radial = match RadialIntegrals::at_node(&geom, r1, r2) {
            Ok(radial) => radial,
            Err(kind) => return KernelValue::Singular(kind),
        };
        let value = Self::kernel(&geom, &radial);
        if value.is_finite() {
            KernelValue::Value(value)
        } else {
            KernelValue::Singular(SingularityKind::NonFinite)
        }
    }
}

/// Runtime selector of a field component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldComponent {
    Potential,
    Gx,
    Gy,
    Gz,
    Gxx,
    Gxy,
    Gxz,
    Gyy,
    Gyz,
    Gzz,
}

impl FieldComponent {
    pub const ALL: [FieldComponent; 10] = [
        FieldComponent::Potential,
        FieldComponent::Gx,
        FieldComponent::Gy,
        FieldComponent::Gz,
        FieldComponent::Gxx,
        FieldComponent::Gxy,
        FieldComponent::Gxz,
        FieldComponent::Gyy,
        FieldComponent::Gyz,
        FieldComponent::Gzz,
    ];

    /// Short name, as accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            FieldComponent::Potential => "pot",
            FieldComponent::Gx => "gx",
            FieldComponent::Gy => "gy",
            FieldComponent::Gz => "gz",
            FieldComponent::Gxx => "gxx",
            FieldComponent::Gxy => "gxy",
            FieldComponent::Gxz => "gxz",
            FieldComponent::Gyy => "gyy",
            FieldComponent::Gyz => "gyz",
            FieldComponent::Gzz => "gzz",
        }
    }

    pub fn is_tensor(self) -> bool {
        matches!(
            self,
            FieldComponent::Gxx
                | FieldComponent::Gxy
                | FieldComponent::Gxz
                | FieldComponent::Gyy
                | FieldComponent::Gyz
                | FieldComponent::Gzz
        )
    }

    /// SI → output unit.
    pub fn unit_factor(self) -> f64 {
        match self {
            FieldComponent::Potential => 1.0,
            FieldComponent::Gx | FieldComponent::Gy | FieldComponent::Gz => SI2MGAL,
            _ => SI2EOTVOS,
        }
    }

    pub fn unit_label(self) -> &'static str {
        match self {
            FieldComponent::Potential => "m²/s²",
            FieldComponent::Gx | FieldComponent::Gy | FieldComponent::Gz => "mGal",
            _ => "Eötvös",
        }
    }

    /// Default distance/size ratio of the adaptive discretization.
    pub fn size_ratio(self) -> f64 {
        match self {
            FieldComponent::Potential => POTENTIAL_SIZE_RATIO,
            FieldComponent::Gx | FieldComponent::Gy | FieldComponent::Gz => GRAVITY_SIZE_RATIO,
            _ => TENSOR_SIZE_RATIO,
        }
    }
}

impl fmt::Display for FieldComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for FieldComponent {
    type Err = TessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        if lower == "potential" {
            return Ok(FieldComponent::Potential);
        }
        FieldComponent::ALL
            .iter()
            .copied()
            .find(|c| c.name() == lower)
            .ok_or_else(|| TessError::UnknownComponent(s.to_string()))
    }
}
