use crate::glq::abscissas::GlqAbscissas;

use super::{legendre, legendre_derivative};

/// Gauss–Legendre weights `wᵢ = 2 / ((1 - xᵢ²) P_N'(xᵢ)²)`.
///
/// Weights only depend on the unscaled roots: rescaling the abscissas to another interval
/// leaves them unchanged, the caller applies the Jacobian of the interval itself.
#[derive(Debug, Clone, PartialEq)]
pub struct GlqWeights {
    order: usize,
    weights: Vec<f64>,
}

impl GlqWeights {
    pub fn new(abscissas: &GlqAbscissas) -> Self {
        let order = abscissas.order();
        let weights = abscissas
            .unscaled()
            .iter()
            .map(|&x| {
                let (p_n, p_n1) = legendre(order, x);
                let dp_n = legendre_derivative(order, x, p_n, p_n1);
                2.0 / ((1.0 - x * x) * dp_n * dp_n)
            })
            .collect();

        GlqWeights { order, weights }
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.weights
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.weights.get(index).copied()
    }
}
