//! Analytic radial integration of the Newtonian kernel.
//!
//! For an observation point at radius `r` and an integration node at angular distance `ψ`
//! (with `c = cos ψ`), the potential kernel integrated along the radius of a tesseroid is
//!
//! ```text
//! K(r, c) = ∫_{r1}^{r2} r'² / ℓ(r') dr'        ℓ² = r² + r'² - 2 r r' c
//! ```
//!
//! Every field component is a combination of partial derivatives of `K` with respect to `r`
//! and `c` (the angular partials of `c` are handled by [`super::geometry::NodeGeometry`]).
//! All of them share the chord lengths `l1 = ℓ(r1)`, `l2 = ℓ(r2)` and the logarithm
//!
//! ```text
//! ln | (l2 + r2 - r c) / (l1 + r1 - r c) |
//! ```
//!
//! which is undefined when the observation point lies on the vertical of the node
//! (`c = 1` and `r >= r1`). Close to that vertical both arguments shrink like `1 - c` and the
//! terms of the derivatives grow like `1 / (1 - c)` while cancelling each other. The chord
//! lengths and the arguments are therefore built from an accurate `1 - c`:
//!
//! ```text
//! ℓ²           = (r - r')² + 2 r r' (1 - c)
//! ℓ + r' - r c = r² (1 - c)(1 + c) / (ℓ + r c - r')      when r c > r'
//! ```
//!
//! and the configuration is reported as singular once `1 - c` drops below
//! [`LOG_DOMAIN_TOLERANCE`], see [`RadialIntegrals::new`].
use crate::constants::LOG_DOMAIN_TOLERANCE;

use super::geometry::NodeGeometry;
use super::SingularityKind;

#[derive(Debug, Clone, Copy)]
pub struct RadialIntegrals {
    r: f64,
    c: f64,
    r1: f64,
    r2: f64,
    l1: f64,
    l2: f64,
    /// l1 + r1 - r c
    den1: f64,
    /// l2 + r2 - r c
    den2: f64,
    ln: f64,
}

/// Chord length to the radius `rp` and the logarithm argument `ℓ + rp - r c`.
#[inline]
fn chord_and_argument(r: f64, c: f64, one_minus_c: f64, rp: f64) -> (f64, f64) {
    let l = ((r - rp) * (r - rp) + 2.0 * r * rp * one_minus_c).sqrt();
    let above = r * c - rp;
    let arg = if above > 0.0 {
        r * r * one_minus_c * (1.0 + c) / (l + above)
    } else {
        l - above
    };
    (l, arg)
}

impl RadialIntegrals {
    /// Prepare the shared terms for the radial limits `[r1, r2]`, with `1 - c` taken from
    /// `cos_psi`. Use [`RadialIntegrals::at_node`] close to a node.
    ///
    /// Return
    /// ----------
    /// * `Err(SingularityKind::LogDomain)` if the point is on the vertical of the node.
    #[inline]
    pub fn new(r: f64, cos_psi: f64, r1: f64, r2: f64) -> Result<Self, SingularityKind> {
        Self::with_complement(r, cos_psi, 1.0 - cos_psi, r1, r2)
    }

    /// Same as [`RadialIntegrals::new`] with the haversine `1 - cos ψ` of the node geometry.
    #[inline]
    pub fn at_node(geom: &NodeGeometry, r1: f64, r2: f64) -> Result<Self, SingularityKind> {
        Self::with_complement(geom.r, geom.cos_psi, geom.one_minus_cos_psi, r1, r2)
    }

    /// Arguments
    /// -----------------
    /// * `r` – Radius of the observation point.
    /// * `cos_psi`, `one_minus_cos_psi` – `c` and `1 - c`.
    /// * `r1`, `r2` – Radial limits.
    ///
    /// Return
    /// ----------
    /// * `Err(SingularityKind::LogDomain)` if `1 - c <= LOG_DOMAIN_TOLERANCE` with `r >= r1`,
    ///   or if a logarithm argument is zero.
    #[inline]
    pub fn with_complement(
        r: f64,
        cos_psi: f64,
        one_minus_cos_psi: f64,
        r1: f64,
        r2: f64,
    ) -> Result<Self, SingularityKind> {
        let c = cos_psi;
        if r >= r1 && one_minus_cos_psi <= LOG_DOMAIN_TOLERANCE {
            return Err(SingularityKind::LogDomain);
        }
        let (l1, den1) = chord_and_argument(r, c, one_minus_cos_psi, r1);
        let (l2, den2) = chord_and_argument(r, c, one_minus_cos_psi, r2);

        if den1 == 0.0 || den2 == 0.0 {
            return Err(SingularityKind::LogDomain);
        }

        Ok(RadialIntegrals {
            r,
            c,
            r1,
            r2,
            l1,
            l2,
            den1,
            den2,
            ln: (den2 / den1).abs().ln(),
        })
    }

    #[inline]
    pub fn cos_psi(&self) -> f64 {
        self.c
    }

    /// `3c² - 1`
    #[inline]
    fn c21(&self) -> f64 {
        3.0 * self.c * self.c - 1.0
    }

    /// `l2 - l1 + r c (r1/l1 - r2/l2)`, the c-derivative of `r c (l2 - l1)` divided by `r`.
    #[inline]
    fn s3(&self) -> f64 {
        let Self { r, c, r1, r2, l1, l2, .. } = *self;
        l2 - l1 + r * c * (r1 / l1 - r2 / l2)
    }

    /// c-derivative of the logarithm divided by `r`.
    #[inline]
    fn s6(&self) -> f64 {
        let Self { r1, r2, l1, l2, den1, den2, .. } = *self;
        (r1 + l1) / (l1 * den1) - (r2 + l2) / (l2 * den2)
    }

    /// `K`
    pub fn k(&self) -> f64 {
        let Self { r, c, r1, r2, l1, l2, ln, .. } = *self;
        0.5 * (r2 * l2 - r1 * l1 + 3.0 * r * c * (l2 - l1) + r * r * self.c21() * ln)
    }

    /// `∂K/∂c`
    pub fn k_c(&self) -> f64 {
        let Self { r, c, r1, r2, l1, l2, ln, .. } = *self;
        0.5 * (r * (r1 * r1 / l1 - r2 * r2 / l2)
            + 3.0 * r * self.s3()
            + 6.0 * r * r * c * ln
            + r.powi(3) * self.c21() * self.s6())
    }

    /// `∂K/∂r`
    pub fn k_r(&self) -> f64 {
        let Self { r, c, r1, r2, l1, l2, ln, .. } = *self;
        (r2 * l2 - r1 * l1 + 3.0 * r * c * (l2 - l1) + r * r * self.c21() * ln
            - r2.powi(3) / l2
            + r1.powi(3) / l1)
            / r
    }

    /// `∂²K/∂c²`
    pub fn k_cc(&self) -> f64 {
        let Self { r, c, r1, r2, l1, l2, den1, den2, ln } = *self;
        let t1 = (r1 * den1 - (r1 + l1) * (r1 / l1 * den1 + r1 + l1)) / (l1 * l1 * den1 * den1);
        let t2 = (r2 * den2 - (r2 + l2) * (r2 / l2 * den2 + r2 + l2)) / (l2 * l2 * den2 * den2);
        let (l1_3, l2_3) = (l1.powi(3), l2.powi(3));

        0.5 * (r * r * (r1.powi(3) / l1_3 - r2.powi(3) / l2_3)
            + 3.0 * r * r * (2.0 * (r1 / l1 - r2 / l2) + r * c * (r1 * r1 / l1_3 - r2 * r2 / l2_3))
            + 6.0 * r * r * ln
            + 12.0 * r.powi(3) * c * self.s6()
            - r.powi(4) * self.c21() * (t1 - t2))
    }

    /// `∂²K/∂r∂c`
    pub fn k_rc(&self) -> f64 {
        let Self { r, c, r1, r2, l1, l2, ln, .. } = *self;
        (r * r1.powi(4) / l1.powi(3) - r * r2.powi(4) / l2.powi(3) + r * r1 * r1 / l1
            - r * r2 * r2 / l2
            + 3.0 * r * self.s3()
            + 6.0 * r * r * c * ln
            + r.powi(3) * self.c21() * self.s6())
            / r
    }

    /// `∂²K/∂r²`
    pub fn k_rr(&self) -> f64 {
        let Self { r, c, r1, r2, l1, l2, ln, .. } = *self;
        let a1 = r1.powi(3) / (2.0 * l1);
        let a2 = r2.powi(3) / (2.0 * l2);
        (a1 - a2 - r1 * l1 + r2 * l2 - a1 * (r * r - r1 * r1) / (l1 * l1)
            + a2 * (r * r - r2 * r2) / (l2 * l2)
            + 3.0 * r * c * (l2 - l1)
            + r * r * self.c21() * ln)
            / (r * r)
    }
}

#[cfg(test)]
mod radial_test {
    use super::*;
    use crate::glq::GlqRule;
    use approx::assert_relative_eq;

    const R1: f64 = 6_348_137.0;
    const R2: f64 = 6_373_137.0;

    fn ell(r: f64, rp: f64, c: f64) -> f64 {
        (r * r + rp * rp - 2.0 * r * rp * c).sqrt()
    }

    #[test]
    fn test_k_matches_numerical_integral() {
        let rule = GlqRule::new(40).unwrap();
        for (r, c) in [(6_400_000.0, 0.9999), (6_500_000.0, 0.99), (6_380_000.0, 0.5)] {
            let rad = RadialIntegrals::new(r, c, R1, R2).unwrap();
            let num = rule.integrate(R1, R2, |rp| rp * rp / ell(r, rp, c));
            assert_relative_eq!(rad.k(), num, max_relative = 1e-10);
        }
    }

    #[test]
    fn test_derivatives_match_finite_differences() {
        let (r, c) = (6_450_000.0, 0.9995);
        let rad = RadialIntegrals::new(r, c, R1, R2).unwrap();
        let at = |r: f64, c: f64| RadialIntegrals::new(r, c, R1, R2).unwrap();

        let hc = 1e-7;
        let hr = 1.0;

        let k_c = (at(r, c + hc).k() - at(r, c - hc).k()) / (2.0 * hc);
        let k_r = (at(r + hr, c).k() - at(r - hr, c).k()) / (2.0 * hr);
        let k_cc = (at(r, c + hc).k_c() - at(r, c - hc).k_c()) / (2.0 * hc);
        let k_rc = (at(r + hr, c).k_c() - at(r - hr, c).k_c()) / (2.0 * hr);
        let k_rr = (at(r + hr, c).k_r() - at(r - hr, c).k_r()) / (2.0 * hr);

        assert_relative_eq!(rad.k_c(), k_c, max_relative = 1e-5);
        assert_relative_eq!(rad.k_r(), k_r, max_relative = 1e-5);
        assert_relative_eq!(rad.k_cc(), k_cc, max_relative = 1e-4);
        assert_relative_eq!(rad.k_rc(), k_rc, max_relative = 1e-4);
        assert_relative_eq!(rad.k_rr(), k_rr, max_relative = 1e-4);
    }

    #[test]
    fn test_vertical_of_node_is_singular() {
        let err = RadialIntegrals::new(3.0, 1.0, 1.0, 2.0).unwrap_err();
        assert_eq!(err, SingularityKind::LogDomain);
        assert!(RadialIntegrals::new(3.0, 0.5, 1.0, 2.0).is_ok());
    }

    #[test]
    fn test_close_to_the_vertical() {
        let rule = GlqRule::new(40).unwrap();
        let r = 6_400_000.0;
        let exact = |om: f64| {
            move |rp: f64| rp * rp / ((r - rp) * (r - rp) + 2.0 * r * rp * om).sqrt()
        };

        // cos ψ = 1 in floating point but the complement is known
        let err = RadialIntegrals::with_complement(r, 1.0, 1e-20, R1, R2).unwrap_err();
        assert_eq!(err, SingularityKind::LogDomain);

        let om = 1e-9;
        let rad = RadialIntegrals::with_complement(r, 1.0 - om, om, R1, R2).unwrap();
        assert_relative_eq!(rad.k(), rule.integrate(R1, R2, exact(om)), max_relative = 1e-9);

        // Below the tesseroid the logarithm stays defined on the vertical
        let below = 6_300_000.0;
        let rad = RadialIntegrals::with_complement(below, 1.0, 0.0, R1, R2).unwrap();
        let num = rule.integrate(R1, R2, |rp| rp * rp / (rp - below));
        assert_relative_eq!(rad.k(), num, max_relative = 1e-9);
    }
}
