//! Roots of the Legendre polynomials.
//!
//! The `N` roots of `P_N` on `(-1, 1)` are found one at a time with a **deflated Newton
//! iteration**. Each root is seeded with the classical asymptotic guess
//!
//! ```text
//! x₀ = cos(π (i + 1 - 1/4) / (N + 1/2))
//! ```
//!
//! and the Newton denominator is corrected with the sum of reciprocals of the distances to
//! the roots already found:
//!
//! ```text
//! x₁ = x₀ - P_N(x₀) / (P_N'(x₀) - P_N(x₀) Σₖ 1/(x₀ - rₖ))
//! ```
//!
//! which prevents adjacent seeds from collapsing onto an already-found root.
//! The roots are stored in descending order.
use std::f64::consts::PI;

use crate::constants::{GLQ_MAX_ERROR, GLQ_MAX_ITERATIONS};
use crate::tess_errors::TessError;

use super::{legendre, legendre_derivative, Nodes};

/// Unscaled Gauss–Legendre abscissas of a given order.
#[derive(Debug, Clone, PartialEq)]
pub struct GlqAbscissas {
    order: usize,
    roots: Vec<f64>,
}

impl GlqAbscissas {
    /// Compute the roots of `P_order` with the default tolerance
    /// ([`GLQ_MAX_ERROR`]) and iteration cap ([`GLQ_MAX_ITERATIONS`]).
    pub fn new(order: usize) -> Result<Self, TessError> {
        Self::with_tolerance(order, GLQ_MAX_ERROR, GLQ_MAX_ITERATIONS)
    }

    /// Compute the roots of `P_order`.
    ///
    /// Arguments
    /// -----------------
    /// * `order` – Degree of the Legendre polynomial, `>= 2`.
    /// * `max_error` – The iteration stops once `|x₁ - x₀| <= max_error`.
    /// * `max_iterations` – Maximum number of Newton steps per root.
    ///
    /// Return
    /// ----------
    /// * `Err(TessError::InvalidOrder)` for `order < 2`.
    /// * `Err(TessError::MaxIterations)` if one root did not converge; the rule is unusable
    ///   in that case since the kernels assume converged nodes.
    pub fn with_tolerance(
        order: usize,
        max_error: f64,
        max_iterations: usize,
    ) -> Result<Self, TessError> {
        if order < 2 {
            return Err(TessError::InvalidOrder(order));
        }

        let n = order as f64;
        let mut roots: Vec<f64> = Vec::with_capacity(order);

        for i in 0..order {
            let mut x0 = (PI * ((i + 1) as f64 - 0.25) / (n + 0.5)).cos();
            let mut converged = false;

            for _ in 0..max_iterations {
                let (p_n, p_n1) = legendre(order, x0);
                let dp_n = legendre_derivative(order, x0, p_n, p_n1);
                let deflation: f64 = roots.iter().map(|r| 1.0 / (x0 - r)).sum();

                let x1 = x0 - p_n / (dp_n - p_n * deflation);
                let step = (x1 - x0).abs();
                x0 = x1;

                if step <= max_error {
                    converged = true;
                    break;
                }
            }

            if !converged {
                return Err(TessError::MaxIterations { order, root: i });
            }
            roots.push(x0);
        }

        // P_N is odd for odd N: its middle root is exactly zero.
        if order % 2 == 1 {
            roots[order / 2] = 0.0;
        }

        Ok(GlqAbscissas { order, roots })
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// The roots on `[-1, 1]`, in descending order.
    pub fn unscaled(&self) -> &[f64] {
        &self.roots
    }

    /// Unscaled root at `index`.
    ///
    /// Return
    /// ----------
    /// * `Err(TessError::IndexOutOfRange)` unless `index < order`.
    pub fn get(&self, index: usize) -> Result<f64, TessError> {
        self.roots
            .get(index)
            .copied()
            .ok_or(TessError::IndexOutOfRange {
                index,
                order: self.order,
            })
    }

    /// Map the roots onto `[lower, upper]`.
    ///
    /// Always computed from the unscaled roots, so successive calls with different bounds are
    /// independent of each other.
    pub fn scale(&self, lower: f64, upper: f64) -> Nodes {
        let tau_p = (upper + lower) / 2.0;
        let tau_m = (upper - lower) / 2.0;
        self.roots.iter().map(|r| tau_p + tau_m * r).collect()
    }
}
