//! # Gauss–Legendre quadrature
//!
//! This module provides the quadrature primitives used by every kernel of the crate:
//! the roots of the Legendre polynomials ([`abscissas::GlqAbscissas`]), their weights
//! ([`weights::GlqWeights`]) and the [`GlqRule`] which bundles both for a given order.
//!
//! ## Overview
//!
//! A rule of order `N` integrates exactly any polynomial of degree `2N - 1` over `[-1, 1]`:
//!
//! ```text
//! ∫₋₁¹ f(x) dx ≈ Σᵢ wᵢ f(xᵢ)
//! ```
//!
//! For an arbitrary interval `[a, b]` the nodes are mapped with the affine change of variable
//! `x' = (b + a)/2 + (b - a)/2 · x` and the sum is multiplied by the Jacobian `(b - a)/2`.
//! The unscaled roots are computed once (an expensive Newton solve) and never modified:
//! [`GlqRule::scaled`] returns a fresh [`ScaledRule`] every time it is called, so the same rule
//! can be shared between threads and reused for every tesseroid.
//!
//! ## Example
//!
//! ```rust
//! use tesseroids::glq::GlqRule;
//!
//! let rule = GlqRule::new(3).unwrap();
//! // x⁴ is integrated exactly by an order-3 rule
//! let integral = rule.integrate(0.0, 2.0, |x| x.powi(4));
//! assert!((integral - 32.0 / 5.0).abs() < 1e-12);
//! ```
//!
//! ## See also
//! ------------
//! * [`crate::forward::TessGravity`] – Owns one rule per integration direction.
pub mod abscissas;
pub mod weights;

use smallvec::SmallVec;

use crate::constants::{GLQ_MAX_ERROR, GLQ_MAX_ITERATIONS};
use crate::tess_errors::TessError;

use abscissas::GlqAbscissas;
use weights::GlqWeights;

/// Scaled nodes are kept inline for the usual low orders.
pub type Nodes = SmallVec<[f64; 8]>;

/// Evaluate `P_n(x)` and `P_{n-1}(x)` with the three-term recurrence
///
/// `P_k = ((2k - 1)·x·P_{k-1} - (k - 1)·P_{k-2}) / k`, starting from `P_0 = 1` and `P_1 = x`.
#[inline]
pub(crate) fn legendre(order: usize, x: f64) -> (f64, f64) {
    let mut p_prev = 1.0;
    let mut p = x;
    for k in 2..=order {
        let kf = k as f64;
        let p_next = ((2.0 * kf - 1.0) * x * p - (kf - 1.0) * p_prev) / kf;
        p_prev = p;
        p = p_next;
    }
    (p, p_prev)
}

/// First derivative of `P_n` at `x`, from `P_n' = n(x·P_n - P_{n-1})/(x² - 1)`.
#[inline]
pub(crate) fn legendre_derivative(order: usize, x: f64, p_n: f64, p_n1: f64) -> f64 {
    order as f64 * (x * p_n - p_n1) / (x * x - 1.0)
}

/// A Gauss–Legendre rule: the unscaled abscissas of one order and their weights.
#[derive(Debug, Clone, PartialEq)]
pub struct GlqRule {
    abscissas: GlqAbscissas,
    weights: GlqWeights,
}

/// Nodes of a [`GlqRule`] mapped onto `[lower, upper]`.
///
/// The weights are borrowed from the rule (they do not depend on the interval);
/// `half_width` is the Jacobian `(upper - lower)/2` of the change of variable.
#[derive(Debug, Clone)]
pub struct ScaledRule<'a> {
    pub nodes: Nodes,
    pub weights: &'a [f64],
    pub half_width: f64,
}

impl GlqRule {
    /// Build the rule of the given order with the default Newton tolerance.
    ///
    /// Arguments
    /// -----------------
    /// * `order` – Number of nodes, must be `>= 2`.
    ///
    /// Return
    /// ----------
    /// * `Err(TessError::InvalidOrder)` if `order < 2`.
    /// * `Err(TessError::MaxIterations)` if a root did not converge.
    pub fn new(order: usize) -> Result<Self, TessError> {
        Self::with_tolerance(order, GLQ_MAX_ERROR, GLQ_MAX_ITERATIONS)
    }

    /// Same as [`GlqRule::new`] with an explicit Newton tolerance and iteration cap.
    pub fn with_tolerance(
        order: usize,
        max_error: f64,
        max_iterations: usize,
    ) -> Result<Self, TessError> {
        let abscissas = GlqAbscissas::with_tolerance(order, max_error, max_iterations)?;
        let weights = GlqWeights::new(&abscissas);
        Ok(GlqRule { abscissas, weights })
    }

    /// Assemble a rule from separately computed abscissas and weights.
    ///
    /// Return
    /// ----------
    /// * `Err(TessError::TypeMismatch)` if the two sets were computed for different orders.
    pub fn from_parts(abscissas: GlqAbscissas, weights: GlqWeights) -> Result<Self, TessError> {
        if abscissas.order() != weights.order() {
            return Err(TessError::TypeMismatch(format!(
                "abscissas of order {} paired with weights of order {}",
                abscissas.order(),
                weights.order()
            )));
        }
        Ok(GlqRule { abscissas, weights })
    }

    pub fn order(&self) -> usize {
        self.abscissas.order()
    }

    pub fn abscissas(&self) -> &GlqAbscissas {
        &self.abscissas
    }

    pub fn weights(&self) -> &GlqWeights {
        &self.weights
    }

    /// Map the nodes onto `[lower, upper]`.
    pub fn scaled(&self, lower: f64, upper: f64) -> ScaledRule<'_> {
        ScaledRule {
            nodes: self.abscissas.scale(lower, upper),
            weights: self.weights.as_slice(),
            half_width: 0.5 * (upper - lower),
        }
    }

    /// Approximate `∫ f` over `[lower, upper]`.
    pub fn integrate<F>(&self, lower: f64, upper: f64, f: F) -> f64
    where
        F: Fn(f64) -> f64,
    {
        let scaled = self.scaled(lower, upper);
        scaled.half_width
            * scaled
                .nodes
                .iter()
                .zip(scaled.weights)
                .map(|(&x, &w)| w * f(x))
                .sum::<f64>()
    }
}

impl ScaledRule<'_> {
    /// Iterate over `(node, weight)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.nodes.iter().copied().zip(self.weights.iter().copied())
    }
}

#[cfg(test)]
mod glq_rule_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_legendre_low_degrees() {
        let x = 0.3;
        let (p2, p1) = legendre(2, x);
        assert_relative_eq!(p1, x, epsilon = 1e-15);
        assert_relative_eq!(p2, 0.5 * (3.0 * x * x - 1.0), epsilon = 1e-15);

        let (p3, _) = legendre(3, x);
        assert_relative_eq!(p3, 0.5 * (5.0 * x.powi(3) - 3.0 * x), epsilon = 1e-15);
    }

    #[test]
    fn test_integrate_polynomials_exactly() {
        for order in 2..=10 {
            let rule = GlqRule::new(order).unwrap();
            let degree = 2 * order as i32 - 1;
            let got = rule.integrate(-1.0, 3.0, |x| x.powi(degree));
            let expected = (3f64.powi(degree + 1) - 1.0) / (degree + 1) as f64;
            assert_relative_eq!(got, expected, max_relative = 1e-11);
        }
    }

    #[test]
    fn test_scaled_rule_does_not_touch_unscaled_roots() {
        let rule = GlqRule::new(5).unwrap();
        let before = rule.abscissas().unscaled().to_vec();

        let a = rule.scaled(10.0, 20.0);
        let b = rule.scaled(-1.0, 1.0);

        assert_eq!(rule.abscissas().unscaled(), before.as_slice());
        assert_eq!(b.nodes.as_slice(), before.as_slice());
        assert_relative_eq!(a.half_width, 5.0);
        assert!(a.nodes.iter().all(|&x| (10.0..=20.0).contains(&x)));
    }

    #[test]
    fn test_from_parts_rejects_mismatched_orders() {
        let a3 = GlqAbscissas::new(3).unwrap();
        let a4 = GlqAbscissas::new(4).unwrap();
        let w4 = GlqWeights::new(&a4);

        let err = GlqRule::from_parts(a3, w4).unwrap_err();
        assert!(matches!(err, TessError::TypeMismatch(_)));

        let ok = GlqRule::from_parts(a4.clone(), GlqWeights::new(&a4)).unwrap();
        assert_eq!(ok.order(), 4);
    }

    #[test]
    fn test_invalid_order() {
        assert_eq!(GlqRule::new(1).unwrap_err(), TessError::InvalidOrder(1));
        assert_eq!(GlqRule::new(0).unwrap_err(), TessError::InvalidOrder(0));
    }
}
