//! # Forward modelling of tesseroid models
//!
//! [`TessGravity`] computes one field component of a tesseroid model on a grid of observation
//! points.
//!
//! ## Algorithm
//!
//! For every tesseroid the longitude and latitude nodes of the GLQ rules are mapped onto the
//! tesseroid boundaries (in radians), then for every observation point:
//!
//! ```text
//! field = f₂ Σ_lon Σ_lat w_lon w_lat K(r, λ, φ, r1, r2, λ', φ')
//! f₂    = (Δλ/2)(Δφ/2) ρ G unit
//! ```
//!
//! where `K` is the radially integrated kernel of the component. When `K` reports a singular
//! configuration (see [`crate::kernels`]) the partial sum of that tesseroid is discarded and the
//! tesseroid is integrated again, **for that point only**, with a full 3-D quadrature:
//!
//! ```text
//! field = f₃ Σ_lon Σ_lat Σ_r w_lon w_lat w_r k(r, λ, φ, r', λ', φ')
//! f₃    = f₂ (r2 - r1)/2
//! ```
//!
//! Contributions of all tesseroids are summed per point. Points are independent and are
//! evaluated in parallel when the `parallel` feature is enabled; the `progress` feature displays
//! a progress bar over the points.
//!
//! ## Adaptive discretization
//!
//! With [`GravityParams::adaptive`], a tesseroid whose distance to the point is smaller than
//! `ratio × size` along one of its dimensions is halved along that dimension and the halves are
//! processed recursively, up to [`GravityParams::max_split_depth`] levels.
//!
//! ## Example
//!
//! ```rust
//! use tesseroids::forward::TessGravity;
//! use tesseroids::grid::Grid;
//! use tesseroids::kernels::Gz;
//! use tesseroids::tesseroid::Tesseroid;
//!
//! let model = vec![Tesseroid::new(-0.5, 0.5, -0.5, 0.5, 0.0, 1000.0, 2670.0).unwrap()];
//! let grid = Grid::point(0.0, 0.0, 100_000.0);
//!
//! let gz = TessGravity::default_orders().unwrap().calculate::<Gz>(&model, &grid).unwrap();
//! assert!(gz[0] > 0.0);
//! ```
pub mod params;

use std::iter::Sum;
use std::ops::{Add, AddAssign};

use log::{debug, info, warn};

use crate::constants::{G, MEAN_EARTH_RADIUS, RADEG};
use crate::glq::{GlqRule, ScaledRule};
use crate::grid::Grid;
use crate::kernels::geometry::{IntegrationNode, NodeGeometry, ObservationPoint};
use crate::kernels::{
    FieldComponent, Gx, Gxx, Gxy, Gxz, Gy, Gyy, Gyz, Gz, Gzz, Kernel, KernelValue, Potential,
};
use crate::parallel::{is_parallel_available, parallel_map, parallel_map_indexed};
use crate::tess_errors::TessError;
use crate::tesseroid::Tesseroid;

use params::GravityParams;

#[cfg(feature = "progress")]
use indicatif::{ProgressBar, ProgressStyle};

/// Number of (tesseroid, point) integrations, how many of them used the 3-D path and how many
/// had the point inside the tesseroid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FallbackStats {
    pub evaluations: usize,
    pub fallbacks: usize,
    pub inside: usize,
}

impl Add for FallbackStats {
    type Output = FallbackStats;

    fn add(self, rhs: Self) -> Self::Output {
        FallbackStats {
            evaluations: self.evaluations + rhs.evaluations,
            fallbacks: self.fallbacks + rhs.fallbacks,
            inside: self.inside + rhs.inside,
        }
    }
}

impl AddAssign for FallbackStats {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for FallbackStats {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(FallbackStats::default(), Add::add)
    }
}

/// Field values, in grid order, with the integration statistics of the run.
#[derive(Debug, Clone, PartialEq)]
pub struct ForwardResult {
    pub field: Vec<f64>,
    pub stats: FallbackStats,
}

/// A tesseroid with its quadrature nodes mapped onto its boundaries.
struct PreparedTesseroid<'a> {
    /// Angular nodes with the product of their longitude and latitude weights
    nodes: Vec<(IntegrationNode, f64)>,
    radial: ScaledRule<'a>,
    r1: f64,
    r2: f64,
    factor_2d: f64,
    factor_3d: f64,
}

/// Forward modeler: three GLQ rules (longitude, latitude, radius) and the run parameters.
///
/// The modeler holds no state between calls and can be shared between threads.
#[derive(Debug, Clone)]
pub struct TessGravity {
    params: GravityParams,
    lon: GlqRule,
    lat: GlqRule,
    radial: GlqRule,
}

impl TessGravity {
    /// Build the quadrature rules described by `params`.
    ///
    /// Return
    /// ----------
    /// * `Err(TessError::InvalidOrder)` or `Err(TessError::MaxIterations)` from the GLQ
    ///   root finder.
    pub fn new(params: GravityParams) -> Result<Self, TessError> {
        let rule = |order| {
            GlqRule::with_tolerance(order, params.glq_max_error, params.glq_max_iterations)
        };
        let lon = rule(params.order_lon)?;
        let lat = rule(params.order_lat)?;
        let radial = rule(params.order_r)?;
        Ok(TessGravity {
            params,
            lon,
            lat,
            radial,
        })
    }

    /// Order 2 in every direction.
    pub fn default_orders() -> Result<Self, TessError> {
        Self::new(GravityParams::default())
    }

    pub fn params(&self) -> &GravityParams {
        &self.params
    }

    /// Compute the component `K` of the model on the grid.
    ///
    /// Arguments
    /// -----------------
    /// * `model` – Tesseroids, in any order.
    /// * `grid` – Observation points.
    ///
    /// Return
    /// ----------
    /// * One value per grid point, in grid order, in the unit of the component
    ///   (m²/s², mGal or Eötvös).
    ///
    /// See also
    /// ------------
    /// * [`TessGravity::calculate_with_stats`] – Same computation, with fallback statistics.
    /// * [`TessGravity::calculate_component`] – Component selected at runtime.
    pub fn calculate<K: Kernel>(
        &self,
        model: &[Tesseroid],
        grid: &Grid,
    ) -> Result<Vec<f64>, TessError> {
        Ok(self.calculate_with_stats::<K>(model, grid)?.field)
    }

    /// Compute the component `K` of the model on the grid and count the 3-D fallbacks.
    pub fn calculate_with_stats<K: Kernel>(
        &self,
        model: &[Tesseroid],
        grid: &Grid,
    ) -> Result<ForwardResult, TessError> {
        let points = grid.observation_points();

        let per_point: Vec<(f64, FallbackStats)> = if self.params.adaptive {
            let ratio = self
                .params
                .size_ratio
                .unwrap_or_else(|| K::COMPONENT.size_ratio());
            self.map_points(points.len(), |i| {
                let (lon, lat, height) = grid.get(i);
                let mut stats = FallbackStats::default();
                let value = model
                    .iter()
                    .map(|tess| {
                        let at = (lon, lat, height);
                        self.adaptive_sum::<K>(tess, at, &points[i], ratio, 0, &mut stats)
                    })
                    .sum::<f64>();
                (value, stats)
            })
        } else {
            let prepared = self.prepare_model::<K>(model);
            self.map_points(points.len(), |i| {
                let at = grid.get(i);
                let mut stats = FallbackStats::default();
                let value = model
                    .iter()
                    .zip(&prepared)
                    .map(|(tess, prep)| {
                        check_inside(tess, at, &mut stats);
                        self.integrate::<K>(prep, &points[i], &mut stats)
                    })
                    .sum::<f64>();
                (value, stats)
            })
        };

        let (field, stats): (Vec<f64>, Vec<FallbackStats>) = per_point.into_iter().unzip();
        let stats: FallbackStats = stats.into_iter().sum();

        info!(
            "{}: {} points, {} tesseroids, {} integrations, {} used the 3-D quadrature, {} inside a tesseroid (parallel: {})",
            K::COMPONENT,
            grid.len(),
            model.len(),
            stats.evaluations,
            stats.fallbacks,
            stats.inside,
            is_parallel_available()
        );
        Ok(ForwardResult { field, stats })
    }

    /// Compute the component `K` with the 3-D quadrature for every (tesseroid, point) pair.
    ///
    /// Slower and less accurate than [`TessGravity::calculate`] for the same orders; used as a
    /// reference for the singular configurations.
    pub fn calculate_3d<K: Kernel>(
        &self,
        model: &[Tesseroid],
        grid: &Grid,
    ) -> Result<Vec<f64>, TessError> {
        let prepared = self.prepare_model::<K>(model);
        let points = grid.observation_points();
        Ok(self.map_points(points.len(), |i| {
            prepared
                .iter()
                .map(|tess| self.integrate_3d::<K>(tess, &points[i]))
                .sum::<f64>()
        }))
    }

    /// Compute a component selected at runtime.
    pub fn calculate_component(
        &self,
        component: FieldComponent,
        model: &[Tesseroid],
        grid: &Grid,
    ) -> Result<ForwardResult, TessError> {
        match component {
            FieldComponent::Potential => self.calculate_with_stats::<Potential>(model, grid),
            FieldComponent::Gx => self.calculate_with_stats::<Gx>(model, grid),
            FieldComponent::Gy => self.calculate_with_stats::<Gy>(model, grid),
            FieldComponent::Gz => self.calculate_with_stats::<Gz>(model, grid),
            FieldComponent::Gxx => self.calculate_with_stats::<Gxx>(model, grid),
            FieldComponent::Gxy => self.calculate_with_stats::<Gxy>(model, grid),
            FieldComponent::Gxz => self.calculate_with_stats::<Gxz>(model, grid),
            FieldComponent::Gyy => self.calculate_with_stats::<Gyy>(model, grid),
            FieldComponent::Gyz => self.calculate_with_stats::<Gyz>(model, grid),
            FieldComponent::Gzz => self.calculate_with_stats::<Gzz>(model, grid),
        }
    }

    fn prepare_model<K: Kernel>(&self, model: &[Tesseroid]) -> Vec<PreparedTesseroid<'_>> {
        parallel_map(model, |tess| self.prepare::<K>(tess))
    }

    /// Map the quadrature nodes onto the boundaries of `tess`.
    fn prepare<K: Kernel>(&self, tess: &Tesseroid) -> PreparedTesseroid<'_> {
        let lon = self.lon.scaled(RADEG * tess.west(), RADEG * tess.east());
        let lat = self.lat.scaled(RADEG * tess.south(), RADEG * tess.north());
        let (r1, r2) = tess.radii();
        let radial = self.radial.scaled(r1, r2);

        let nodes = lon
            .iter()
            .flat_map(|(lon_node, w_lon)| {
                lat.iter().map(move |(lat_node, w_lat)| {
                    (IntegrationNode::new(lon_node, lat_node), w_lon * w_lat)
                })
            })
            .collect();

        let factor_2d =
            lon.half_width * lat.half_width * tess.density() * G * K::COMPONENT.unit_factor();

        PreparedTesseroid {
            nodes,
            factor_3d: factor_2d * radial.half_width,
            radial,
            r1,
            r2,
            factor_2d,
        }
    }

    /// 2-D quadrature of one tesseroid at one point, falling back to 3-D on a singularity.
    fn integrate<K: Kernel>(
        &self,
        tess: &PreparedTesseroid,
        point: &ObservationPoint,
        stats: &mut FallbackStats,
    ) -> f64 {
        stats.evaluations += 1;

        let mut sum = 0.0;
        for (node, weight) in &tess.nodes {
            match K::evaluate(point, node, tess.r1, tess.r2, self.params.max_cos_psi) {
                KernelValue::Value(v) => sum += weight * v,
                KernelValue::Singular(kind) => {
                    debug!(
                        "{}: {kind:?} singularity at (lon {:.6}°, r {:.3} m), using the 3-D quadrature",
                        K::COMPONENT,
                        point.lon / RADEG,
                        point.r
                    );
                    stats.fallbacks += 1;
                    return self.integrate_3d::<K>(tess, point);
                }
            }
        }
        sum * tess.factor_2d
    }

    fn integrate_3d<K: Kernel>(&self, tess: &PreparedTesseroid, point: &ObservationPoint) -> f64 {
        let sum: f64 = tess
            .nodes
            .iter()
            .map(|(node, weight)| {
                let geom = NodeGeometry::new(point, node);
                weight
                    * tess
                        .radial
                        .iter()
                        .map(|(rl, w_r)| w_r * K::kernel_3d(&geom.source_at(rl)))
                        .sum::<f64>()
            })
            .sum();
        sum * tess.factor_3d
    }

    /// Recursive integration of `tess`, split until it is small enough seen from the point.
    fn adaptive_sum<K: Kernel>(
        &self,
        tess: &Tesseroid,
        (lon, lat, height): (f64, f64, f64),
        point: &ObservationPoint,
        ratio: f64,
        depth: usize,
        stats: &mut FallbackStats,
    ) -> f64 {
        if check_inside(tess, (lon, lat, height), stats) {
            return self.integrate::<K>(&self.prepare::<K>(tess), point, stats);
        }

        let (nlon, nlat, nr) = split_counts(tess, point, ratio);
        if (nlon, nlat, nr) == (1, 1, 1) {
            return self.integrate::<K>(&self.prepare::<K>(tess), point, stats);
        }
        if depth >= self.params.max_split_depth {
            warn!(
                "Tesseroid {} still too close to ({lon} {lat} {height}) after {depth} splits",
                tess.tag()
            );
            return self.integrate::<K>(&self.prepare::<K>(tess), point, stats);
        }

        tess.split(nlon, nlat, nr)
            .iter()
            .map(|part| {
                let at = (lon, lat, height);
                self.adaptive_sum::<K>(part, at, point, ratio, depth + 1, stats)
            })
            .sum()
    }

    #[cfg(feature = "progress")]
    fn map_points<U, F>(&self, count: usize, f: F) -> Vec<U>
    where
        U: Send,
        F: Fn(usize) -> U + Sync + Send,
    {
        let pb = ProgressBar::new(count.max(1) as u64);
        if let Ok(style) = ProgressStyle::with_template(
            "{bar:40.cyan/blue} {pos}/{len} ({percent:>3}%) \
             | {per_sec} | ETA {eta_precise} | {msg}",
        ) {
            pb.set_style(style);
        }
        pb.set_message("observation points");

        let out = parallel_map_indexed(count, |i| {
            let value = f(i);
            pb.inc(1);
            value
        });

        pb.finish_and_clear();
        out
    }

    #[cfg(not(feature = "progress"))]
    fn map_points<U, F>(&self, count: usize, f: F) -> Vec<U>
    where
        U: Send,
        F: Fn(usize) -> U + Sync + Send,
    {
        parallel_map_indexed(count, f)
    }
}

/// Warn and count when the point lies inside `tess`.
fn check_inside(
    tess: &Tesseroid,
    (lon, lat, height): (f64, f64, f64),
    stats: &mut FallbackStats,
) -> bool {
    let inside = tess.contains(lon, lat, height);
    if inside {
        warn!(
            "Point ({lon} {lat} {height}) is inside tesseroid {} ({tess}), accuracy is not guaranteed",
            tess.tag()
        );
        stats.inside += 1;
    }
    inside
}

/// Number of divisions in longitude, latitude and radius required for `tess` seen from
/// `point`: 2 along each dimension larger than `distance / ratio`, 1 otherwise.
fn split_counts(tess: &Tesseroid, point: &ObservationPoint, ratio: f64) -> (usize, usize, usize) {
    let (lon_c, lat_c, r_top) = tess.top_center();
    let center = ObservationPoint::new(lon_c, lat_c, r_top - MEAN_EARTH_RADIUS);
    let cos_psi = point.sin_lat * center.sin_lat
        + point.cos_lat * center.cos_lat * (point.lon - center.lon).cos();
    let distance = (point.r * point.r + r_top * r_top - 2.0 * point.r * r_top * cos_psi)
        .max(0.0)
        .sqrt();

    // Great-circle widths (Vincenty) of the tesseroid at its central latitude
    let (sin_lat, cos_lat) = (center.sin_lat, center.cos_lat);
    let (sin_dlon, cos_dlon) = (RADEG * (tess.east() - tess.west())).sin_cos();
    let dlon = MEAN_EARTH_RADIUS
        * ((cos_lat * sin_dlon).hypot(cos_lat * sin_lat - sin_lat * cos_lat * cos_dlon))
            .atan2(sin_lat * sin_lat + cos_lat * cos_lat * cos_dlon);
    let dlat = MEAN_EARTH_RADIUS * RADEG * (tess.north() - tess.south());
    let dr = tess.bottom() - tess.top();

    let count = |size: f64| if distance < ratio * size { 2 } else { 1 };
    (count(dlon), count(dlat), count(dr))
}
