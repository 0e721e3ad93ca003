//! # Constants and type definitions for tesseroids
//!
//! This module centralizes the **physical constants**, **conversion factors**, the
//! **quadrature defaults** and the **common type aliases** used throughout the crate.
//!
//! ## Overview
//!
//! - Gravitational constant and reference sphere radius
//! - Unit conversions (SI → mGal, SI → Eötvös, degrees → radians)
//! - Gauss–Legendre root finder defaults
//! - Distance/size ratios used by the adaptive discretization
//! - Core type aliases used across the crate

use crate::tesseroid::Tesseroid;

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// Mean Earth radius in meters, used as the reference sphere
pub const MEAN_EARTH_RADIUS: f64 = 6_378_137.0;

/// Gravitational constant (m³ kg⁻¹ s⁻²)
pub const G: f64 = 0.00000000006673;

/// m/s² → mGal
pub const SI2MGAL: f64 = 100_000.0;

/// 1/s² → Eötvös
pub const SI2EOTVOS: f64 = 1_000_000_000.0;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Above this value of cos(ψ) the closed-form tensor kernels lose too many digits
pub const MAX_COS_PSI: f64 = 0.99999999;

/// Below this value of `1 - cos ψ` the logarithm of the radial integral is treated as undefined
pub const LOG_DOMAIN_TOLERANCE: f64 = 1e-10;

// -------------------------------------------------------------------------------------------------
// Gauss–Legendre quadrature defaults
// -------------------------------------------------------------------------------------------------

/// Convergence threshold on the Newton update of a Legendre root
pub const GLQ_MAX_ERROR: f64 = 1e-15;

/// Iteration cap of the Newton root search
pub const GLQ_MAX_ITERATIONS: usize = 10_000;

/// Default quadrature order used in each direction
pub const DEFAULT_GLQ_ORDER: usize = 2;

// -------------------------------------------------------------------------------------------------
// Adaptive discretization
// -------------------------------------------------------------------------------------------------

/// Distance/size ratio below which a tesseroid is split, potential
pub const POTENTIAL_SIZE_RATIO: f64 = 1.0;

/// Distance/size ratio below which a tesseroid is split, acceleration components
pub const GRAVITY_SIZE_RATIO: f64 = 1.5;

/// Distance/size ratio below which a tesseroid is split, gradient tensor components
pub const TENSOR_SIZE_RATIO: f64 = 8.0;

/// Recursion guard for the adaptive discretization
pub const MAX_SPLIT_DEPTH: usize = 12;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;

/// Angle in radians
pub type Radian = f64;

/// Distance in meters
pub type Meter = f64;

/// Density in kg/m³
pub type Density = f64;

/// A mass model: an ordered collection of tesseroids
pub type Model = Vec<Tesseroid>;
