//! # Forward modelling parameters
//!
//! This module defines the [`GravityParams`] configuration struct and its builder, which control
//! the quadrature orders, the singularity threshold of the tensor kernels and the optional
//! adaptive discretization used by [`crate::forward::TessGravity`].
//!
//! ## Overview
//!
//! | Parameter | Default | Meaning |
//! |-----------|---------|---------|
//! | `order_lon`, `order_lat`, `order_r` | 2 | GLQ order in each direction |
//! | `max_cos_psi` | 0.99999999 | `cos ψ` above which tensor kernels use the 3-D path |
//! | `glq_max_error` | 1e-15 | Newton convergence threshold of the root finder |
//! | `glq_max_iterations` | 10000 | Newton iteration cap |
//! | `adaptive` | `false` | Split tesseroids that are too close to the point |
//! | `size_ratio` | per component | Distance/size ratio of the adaptive discretization |
//! | `max_split_depth` | 12 | Recursion limit of the adaptive discretization |
//!
//! ## Example
//!
//! ```rust
//! use tesseroids::forward::params::GravityParams;
//!
//! let params = GravityParams::builder()
//!     .order_lon(4)
//!     .order_lat(4)
//!     .order_r(3)
//!     .adaptive(true)
//!     .build()
//!     .unwrap();
//!
//! println!("{params:#}");
//! ```
use std::cmp::Ordering::{Equal, Greater, Less};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_GLQ_ORDER, GLQ_MAX_ERROR, GLQ_MAX_ITERATIONS, MAX_COS_PSI, MAX_SPLIT_DEPTH,
};
use crate::tess_errors::TessError;

/// Configuration of a forward modelling run.
///
/// The [`Default`] implementation reproduces the classic setup: order 2 in every direction,
/// no adaptive discretization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GravityParams {
    /// GLQ order in longitude.
    pub order_lon: usize,
    /// GLQ order in latitude.
    pub order_lat: usize,
    /// GLQ order in radius, only used by the 3-D path.
    pub order_r: usize,
    /// Proximity threshold of the tensor components.
    pub max_cos_psi: f64,
    /// Newton convergence threshold of the Legendre root finder.
    pub glq_max_error: f64,
    /// Newton iteration cap of the Legendre root finder.
    pub glq_max_iterations: usize,
    /// Split tesseroids closer than `size_ratio × size` to the observation point.
    pub adaptive: bool,
    /// Override of the per-component distance/size ratio.
    pub size_ratio: Option<f64>,
    /// Maximum number of successive splits of one tesseroid.
    pub max_split_depth: usize,
}

impl GravityParams {
    /// Construct a new [`GravityParams`] with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new [`GravityParamsBuilder`] to configure custom parameters.
    pub fn builder() -> GravityParamsBuilder {
        GravityParamsBuilder::new()
    }
}

impl Default for GravityParams {
    fn default() -> Self {
        GravityParams {
            order_lon: DEFAULT_GLQ_ORDER,
            order_lat: DEFAULT_GLQ_ORDER,
            order_r: DEFAULT_GLQ_ORDER,
            max_cos_psi: MAX_COS_PSI,
            glq_max_error: GLQ_MAX_ERROR,
            glq_max_iterations: GLQ_MAX_ITERATIONS,
            adaptive: false,
            size_ratio: None,
            max_split_depth: MAX_SPLIT_DEPTH,
        }
    }
}

/// Builder for [`GravityParams`], with validation.
#[derive(Debug, Clone, Default)]
pub struct GravityParamsBuilder {
    params: GravityParams,
}

impl GravityParamsBuilder {
    /// Create a new builder initialized with default values.
    pub fn new() -> Self {
        Self {
            params: GravityParams::default(),
        }
    }

    // --- Quadrature ---
    pub fn order_lon(mut self, v: usize) -> Self {
        self.params.order_lon = v;
        self
    }
    pub fn order_lat(mut self, v: usize) -> Self {
        self.params.order_lat = v;
        self
    }
    pub fn order_r(mut self, v: usize) -> Self {
        self.params.order_r = v;
        self
    }
    /// Same order in the three directions.
    pub fn orders(self, v: usize) -> Self {
        self.order_lon(v).order_lat(v).order_r(v)
    }
    pub fn glq_max_error(mut self, v: f64) -> Self {
        self.params.glq_max_error = v;
        self
    }
    pub fn glq_max_iterations(mut self, v: usize) -> Self {
        self.params.glq_max_iterations = v;
        self
    }

    // --- Singularity handling ---
    pub fn max_cos_psi(mut self, v: f64) -> Self {
        self.params.max_cos_psi = v;
        self
    }

    // --- Adaptive discretization ---
    pub fn adaptive(mut self, v: bool) -> Self {
        self.params.adaptive = v;
        self
    }
    pub fn size_ratio(mut self, v: f64) -> Self {
        self.params.size_ratio = Some(v);
        self
    }
    pub fn max_split_depth(mut self, v: usize) -> Self {
        self.params.max_split_depth = v;
        self
    }

    /// Return true iff x > 0.0 and comparable (i.e., not NaN).
    #[inline]
    fn gt0(x: f64) -> bool {
        x.partial_cmp(&0.0) == Some(Greater)
    }

    /// Return true iff x >= 0.0 and comparable (i.e., not NaN).
    #[inline]
    fn ge0(x: f64) -> bool {
        matches!(x.partial_cmp(&0.0), Some(Greater) | Some(Equal))
    }

    /// Return true iff a <= b and comparable (i.e., not NaN).
    #[inline]
    fn le(a: f64, b: f64) -> bool {
        matches!(a.partial_cmp(&b), Some(Less) | Some(Equal))
    }

    /// Finalize the builder and produce a [`GravityParams`] instance.
    ///
    /// Validation rules
    /// -----------------
    /// * `order_lon`, `order_lat`, `order_r` ≥ 2.
    /// * `0 < max_cos_psi ≤ 1`.
    /// * `glq_max_error ≥ 0`, `glq_max_iterations ≥ 1`.
    /// * `size_ratio > 0` when set.
    ///
    /// Return
    /// ----------
    /// * `Err(TessError::InvalidOrder)` for an order below 2.
    /// * `Err(TessError::InvalidParameter)` if any other rule fails.
    pub fn build(self) -> Result<GravityParams, TessError> {
        let p = &self.params;

        for order in [p.order_lon, p.order_lat, p.order_r] {
            if order < 2 {
                return Err(TessError::InvalidOrder(order));
            }
        }

        if !(Self::gt0(p.max_cos_psi) && Self::le(p.max_cos_psi, 1.0)) {
            return Err(TessError::InvalidParameter(
                "require 0 < max_cos_psi <= 1".into(),
            ));
        }
        if !Self::ge0(p.glq_max_error) {
            return Err(TessError::InvalidParameter(
                "glq_max_error must be >= 0".into(),
            ));
        }
        if p.glq_max_iterations == 0 {
            return Err(TessError::InvalidParameter(
                "glq_max_iterations must be >= 1".into(),
            ));
        }
        if let Some(ratio) = p.size_ratio {
            if !Self::gt0(ratio) {
                return Err(TessError::InvalidParameter(
                    "size_ratio must be > 0".into(),
                ));
            }
        }

        Ok(self.params)
    }
}

impl fmt::Display for GravityParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            const PARAM_COL: usize = 40;
            writeln!(f, "Tesseroid Forward Modelling Parameters")?;
            writeln!(f, "--------------------------------------")?;

            macro_rules! line {
                ($fmt:expr, $val:expr, $comment:expr) => {{
                    let s = format!($fmt, $val);
                    let pad = if s.len() < PARAM_COL {
                        " ".repeat(PARAM_COL - s.len())
                    } else {
                        " ".to_string()
                    };
                    writeln!(f, "  {}{}# {}", s, pad, $comment)
                }};
            }

            writeln!(f, "[Quadrature]")?;
            line!("order_lon          = {}", self.order_lon, "GLQ nodes in longitude")?;
            line!("order_lat          = {}", self.order_lat, "GLQ nodes in latitude")?;
            line!("order_r            = {}", self.order_r, "GLQ nodes in radius (3-D path)")?;
            line!(
                "glq_max_error      = {:.1e}",
                self.glq_max_error,
                "Newton convergence threshold"
            )?;
            line!(
                "glq_max_iterations = {}",
                self.glq_max_iterations,
                "Newton iteration cap"
            )?;

            writeln!(f, "\n[Singularities]")?;
            line!(
                "max_cos_psi        = {:.8}",
                self.max_cos_psi,
                "Tensor proximity threshold"
            )?;

            writeln!(f, "\n[Adaptive discretization]")?;
            line!("adaptive           = {}", self.adaptive, "Split close tesseroids")?;
            match self.size_ratio {
                Some(ratio) => line!("size_ratio         = {:.2}", ratio, "Distance/size ratio")?,
                None => line!(
                    "size_ratio         = {}",
                    "default",
                    "Per component (1, 1.5, 8)"
                )?,
            }
            line!(
                "max_split_depth    = {}",
                self.max_split_depth,
                "Recursion limit"
            )?;
            Ok(())
        } else {
            write!(
                f,
                "GravityParams(order=({}, {}, {}), max_cos_psi={}, adaptive={})",
                self.order_lon, self.order_lat, self.order_r, self.max_cos_psi, self.adaptive
            )
        }
    }
}
