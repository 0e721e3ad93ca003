//! # Tesseroid mass elements
//!
//! A **tesseroid** (spherical prism) is the volume bounded by two meridians, two parallels and
//! two concentric spheres. It is the mass primitive of every model handled by this crate.
//!
//! ## Overview
//!
//! - [`Tesseroid`] – Validated, immutable boundaries plus a constant density.
//! - [`TessTag`] – Opaque identifier used in diagnostics only.
//! - [`total_mass`] / [`range_mass`] – Mass of a whole model, or of the part of a model whose
//!   density lies in a given range.
//!
//! ## Conventions
//!
//! - `west`, `east`, `south`, `north` are in degrees.
//! - `top` and `bottom` are **depths** in meters, measured from the surface of the reference
//!   sphere ([`MEAN_EARTH_RADIUS`]) towards its center, so `top < bottom`. A negative `top`
//!   describes topography above the reference sphere.
//! - Longitudes are stored without discontinuity: a tesseroid crossing the 180° meridian such as
//!   `(179, -179)` is stored as `(179, 181)` because the quadrature cannot integrate across a
//!   360 → 0 jump.
//!
//! ## Example
//!
//! ```rust
//! use tesseroids::tesseroid::Tesseroid;
//!
//! let tess = Tesseroid::new(179.0, -179.0, -1.0, 1.0, 10.0, 100.0, 1.5).unwrap();
//! assert_eq!((tess.west(), tess.east()), (179.0, 181.0));
//! ```
use std::fmt;
use std::str::FromStr;

use log::debug;
use smallvec::SmallVec;

use crate::constants::{Degree, Density, Meter, MEAN_EARTH_RADIUS, RADEG};
use crate::tess_errors::TessError;

/// Identifier attached to a tesseroid, either a number (line or index in a model file) or a name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TessTag {
    Int(u32),
    Name(String),
}

impl Default for TessTag {
    fn default() -> Self {
        TessTag::Int(0)
    }
}

impl fmt::Display for TessTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TessTag::Int(n) => write!(f, "{n}"),
            TessTag::Name(s) => write!(f, "{s}"),
        }
    }
}

impl From<u32> for TessTag {
    fn from(n: u32) -> Self {
        TessTag::Int(n)
    }
}

impl From<&str> for TessTag {
    fn from(s: &str) -> Self {
        TessTag::Name(s.to_string())
    }
}

impl From<String> for TessTag {
    fn from(s: String) -> Self {
        TessTag::Name(s)
    }
}

impl FromStr for TessTag {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.parse::<u32>() {
            Ok(n) => TessTag::Int(n),
            Err(_) => TessTag::Name(s.to_string()),
        })
    }
}

/// A spherical prism of constant density.
#[derive(Debug, Clone, PartialEq)]
pub struct Tesseroid {
    west: Degree,
    east: Degree,
    south: Degree,
    north: Degree,
    top: Meter,
    bottom: Meter,
    density: Density,
    tag: TessTag,
}

impl Tesseroid {
    /// Build a tesseroid with the default tag.
    ///
    /// See [`Tesseroid::with_tag`] for the validation rules.
    pub fn new(
        west: Degree,
        east: Degree,
        south: Degree,
        north: Degree,
        top: Meter,
        bottom: Meter,
        density: Density,
    ) -> Result<Self, TessError> {
        Self::with_tag(
            west,
            east,
            south,
            north,
            top,
            bottom,
            density,
            TessTag::default(),
        )
    }

    /// Build and validate a tesseroid.
    ///
    /// Validation rules
    /// -----------------
    /// * All boundaries must be finite, the density must be a finite number.
    /// * `west` and `east` must lie in `[-180, 360]` and differ.
    /// * Negative longitudes are shifted into `[0, 360)`; if `west > east` afterwards,
    ///   `west` is shifted down by 360° so that `west < east` with no discontinuity.
    /// * `south` and `north` must lie in `[-90, 90]` with `south < north`.
    /// * `top < bottom`.
    ///
    /// Return
    /// ----------
    /// * `Err(TessError::InvalidBoundary)` or `Err(TessError::InvalidDensity)` when a rule fails.
    #[allow(clippy::too_many_arguments)]
    pub fn with_tag(
        west: Degree,
        east: Degree,
        south: Degree,
        north: Degree,
        top: Meter,
        bottom: Meter,
        density: Density,
        tag: TessTag,
    ) -> Result<Self, TessError> {
        let invalid = |reason: String| TessError::InvalidBoundary {
            tag: tag.to_string(),
            reason,
        };

        if ![west, east, south, north, top, bottom]
            .iter()
            .all(|v| v.is_finite())
        {
            return Err(invalid("boundaries must be finite numbers".into()));
        }
        if !density.is_finite() {
            return Err(TessError::InvalidDensity {
                tag: tag.to_string(),
                value: density,
            });
        }

        if !(-180.0..=360.0).contains(&west) || !(-180.0..=360.0).contains(&east) {
            return Err(invalid(format!(
                "longitudes must be in [-180, 360], got west={west} east={east}"
            )));
        }
        if west == east {
            return Err(invalid(format!("west and east are equal ({west})")));
        }

        let mut w = west;
        let mut e = east;
        if w < 0.0 {
            w += 360.0;
        }
        if e < 0.0 {
            e += 360.0;
        }
        if w > e {
            w -= 360.0;
        }
        if w != west || e != east {
            debug!("Tesseroid {tag}: longitudes ({west}, {east}) normalized to ({w}, {e})");
        }
        if w == e {
            return Err(invalid(format!(
                "west ({west}) and east ({east}) describe the same meridian"
            )));
        }

        if !(-90.0..=90.0).contains(&south) || !(-90.0..=90.0).contains(&north) {
            return Err(invalid(format!(
                "latitudes must be in [-90, 90], got south={south} north={north}"
            )));
        }
        if south >= north {
            return Err(invalid(format!(
                "south ({south}) must be smaller than north ({north})"
            )));
        }
        if top >= bottom {
            return Err(invalid(format!(
                "top ({top}) must be smaller than bottom ({bottom})"
            )));
        }

        Ok(Tesseroid {
            west: w,
            east: e,
            south,
            north,
            top,
            bottom,
            density,
            tag,
        })
    }

    pub fn west(&self) -> Degree {
        self.west
    }

    pub fn east(&self) -> Degree {
        self.east
    }

    pub fn south(&self) -> Degree {
        self.south
    }

    pub fn north(&self) -> Degree {
        self.north
    }

    pub fn top(&self) -> Meter {
        self.top
    }

    pub fn bottom(&self) -> Meter {
        self.bottom
    }

    pub fn density(&self) -> Density {
        self.density
    }

    pub fn tag(&self) -> &TessTag {
        &self.tag
    }

    /// Inner and outer radii `(r1, r2) = (R - bottom, R - top)`.
    #[inline]
    pub fn radii(&self) -> (Meter, Meter) {
        (MEAN_EARTH_RADIUS - self.bottom, MEAN_EARTH_RADIUS - self.top)
    }

    /// Volume in m³: `Δλ (r2³ - r1³)(sin n - sin s)/3`.
    pub fn volume(&self) -> f64 {
        let (r1, r2) = self.radii();
        RADEG * (self.east - self.west) * (r2.powi(3) - r1.powi(3))
            * ((RADEG * self.north).sin() - (RADEG * self.south).sin())
            / 3.0
    }

    /// Mass in kg.
    pub fn mass(&self) -> f64 {
        self.density * self.volume()
    }

    /// Longitude, latitude and radius of the center of the top face.
    pub fn top_center(&self) -> (Degree, Degree, Meter) {
        (
            0.5 * (self.west + self.east),
            0.5 * (self.south + self.north),
            MEAN_EARTH_RADIUS - self.top,
        )
    }

    /// Whether the point `(lon, lat, height)` lies inside the tesseroid (boundaries included).
    ///
    /// The longitude is compared modulo 360°.
    pub fn contains(&self, lon: Degree, lat: Degree, height: Meter) -> bool {
        let depth = -height;
        if lat < self.south || lat > self.north || depth < self.top || depth > self.bottom {
            return false;
        }
        [lon - 360.0, lon, lon + 360.0]
            .iter()
            .any(|&l| l >= self.west && l <= self.east)
    }

    /// Split into `nlon × nlat × nr` equal tesseroids of the same density.
    ///
    /// Sub-tesseroids are ordered depth first, then latitude, then longitude, and keep the tag
    /// of their parent. The split of a valid tesseroid is always valid, so no validation is
    /// performed.
    ///
    /// Arguments
    /// -----------------
    /// * `nlon`, `nlat`, `nr` – Number of divisions in each direction, values of 0 count as 1.
    pub fn split(&self, nlon: usize, nlat: usize, nr: usize) -> SmallVec<[Tesseroid; 8]> {
        let (nlon, nlat, nr) = (nlon.max(1), nlat.max(1), nr.max(1));
        let dlon = (self.east - self.west) / nlon as f64;
        let dlat = (self.north - self.south) / nlat as f64;
        let ddepth = (self.bottom - self.top) / nr as f64;

        // Outer boundaries are copied from the parent to avoid round-off gaps.
        let edge = |start: f64, step: f64, i: usize, n: usize, end: f64| {
            if i == n {
                end
            } else {
                start + step * i as f64
            }
        };

        let mut parts = SmallVec::with_capacity(nlon * nlat * nr);
        for k in 0..nr {
            let top = edge(self.top, ddepth, k, nr, self.bottom);
            let bottom = edge(self.top, ddepth, k + 1, nr, self.bottom);
            for j in 0..nlat {
                let south = edge(self.south, dlat, j, nlat, self.north);
                let north = edge(self.south, dlat, j + 1, nlat, self.north);
                for i in 0..nlon {
                    parts.push(Tesseroid {
                        west: edge(self.west, dlon, i, nlon, self.east),
                        east: edge(self.west, dlon, i + 1, nlon, self.east),
                        south,
                        north,
                        top,
                        bottom,
                        density: self.density,
                        tag: self.tag.clone(),
                    });
                }
            }
        }
        parts
    }
}

impl fmt::Display for Tesseroid {
    /// Same layout as a line of a model file: `W E S N Top Bottom Density`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {} {}",
            self.west, self.east, self.south, self.north, self.top, self.bottom, self.density
        )
    }
}

/// Total mass of a model, in kg.
pub fn total_mass(model: &[Tesseroid]) -> f64 {
    model.iter().map(Tesseroid::mass).sum()
}

/// Mass of the tesseroids whose density lies in `[low, high]`, in kg.
pub fn range_mass(model: &[Tesseroid], low: Density, high: Density) -> f64 {
    model
        .iter()
        .filter(|t| t.density >= low && t.density <= high)
        .map(Tesseroid::mass)
        .sum()
}
