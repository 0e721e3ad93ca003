//! # Observation grids
//!
//! A [`Grid`] is the list of observation points of a forward modelling run, stored as three
//! parallel arrays (longitude and latitude in degrees, height in meters above the reference
//! sphere). The order of the points is the order of the computed field.
//!
//! ## Construction
//!
//! * [`Grid::regular`] – Regular grid over a region, latitude rows of longitude points, both
//!   borders included.
//! * [`Grid::point`] – A single point.
//! * [`Grid::from_arrays`] – Existing coordinate arrays.
//! * [`Grid::from_csv`] – A CSV file with `lon,lat,height` columns.
//! * [`crate::parsers::parse_points`] – Whitespace separated text, one point per line.
use camino::Utf8Path;
use itertools::izip;
use serde::Deserialize;

use crate::constants::{Degree, Meter};
use crate::kernels::geometry::ObservationPoint;
use crate::tess_errors::TessError;

/// Geographic bounding box `west / east / south / north`, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub west: Degree,
    pub east: Degree,
    pub south: Degree,
    pub north: Degree,
}

impl Region {
    pub fn new(west: Degree, east: Degree, south: Degree, north: Degree) -> Self {
        Region {
            west,
            east,
            south,
            north,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Grid {
    lons: Vec<Degree>,
    lats: Vec<Degree>,
    heights: Vec<Meter>,
}

#[derive(Debug, Deserialize)]
struct CsvPoint {
    lon: Degree,
    lat: Degree,
    height: Meter,
}

/// `count` equally spaced values from `start` to `end`, both included.
///
/// Values are computed from their index so the last one is exactly `end`.
fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    if count == 1 {
        return vec![start];
    }
    let step = (end - start) / (count - 1) as f64;
    (0..count)
        .map(|i| {
            if i == count - 1 {
                end
            } else {
                start + step * i as f64
            }
        })
        .collect()
}

impl Grid {
    /// Build a grid from coordinate arrays of equal length.
    pub fn from_arrays(
        lons: Vec<Degree>,
        lats: Vec<Degree>,
        heights: Vec<Meter>,
    ) -> Result<Self, TessError> {
        if lons.len() != lats.len() || lons.len() != heights.len() {
            return Err(TessError::GridLengthMismatch {
                lons: lons.len(),
                lats: lats.len(),
                heights: heights.len(),
            });
        }
        Ok(Grid {
            lons,
            lats,
            heights,
        })
    }

    /// A grid made of a single point.
    pub fn point(lon: Degree, lat: Degree, height: Meter) -> Self {
        Grid {
            lons: vec![lon],
            lats: vec![lat],
            heights: vec![height],
        }
    }

    /// Regular grid of `nlon × nlat` points at constant height.
    ///
    /// Points are ordered by latitude row (south to north), then longitude (west to east).
    ///
    /// Arguments
    /// -----------------
    /// * `region` – Borders of the grid, included in the grid.
    /// * `nlon`, `nlat` – Number of points in each direction; a count of 1 requires the
    ///   corresponding borders to be equal.
    /// * `height` – Height of every point.
    ///
    /// Return
    /// ----------
    /// * `Err(TessError::InvalidGridSpec)` for inverted borders or inconsistent counts.
    pub fn regular(
        region: Region,
        nlon: usize,
        nlat: usize,
        height: Meter,
    ) -> Result<Self, TessError> {
        let Region {
            west,
            east,
            south,
            north,
        } = region;
        if west > east || south > north {
            return Err(TessError::InvalidGridSpec(format!(
                "inverted region {west}/{east}/{south}/{north}"
            )));
        }
        for (count, lo, hi, name) in [(nlon, west, east, "nlon"), (nlat, south, north, "nlat")] {
            if count == 0 || (count == 1 && lo != hi) {
                return Err(TessError::InvalidGridSpec(format!(
                    "{name} = {count} does not fit the region {lo} to {hi}"
                )));
            }
        }

        let lon_axis = linspace(west, east, nlon);
        let lat_axis = linspace(south, north, nlat);

        let mut grid = Grid::with_capacity(nlon * nlat);
        for &lat in &lat_axis {
            for &lon in &lon_axis {
                grid.push(lon, lat, height);
            }
        }
        Ok(grid)
    }

    /// Read a CSV file with a `lon,lat,height` header.
    pub fn from_csv(path: &Utf8Path) -> Result<Self, TessError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .comment(Some(b'#'))
            .from_path(path)?;

        let mut grid = Grid::default();
        for record in reader.deserialize() {
            let p: CsvPoint = record?;
            grid.push(p.lon, p.lat, p.height);
        }
        Ok(grid)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Grid {
            lons: Vec::with_capacity(capacity),
            lats: Vec::with_capacity(capacity),
            heights: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, lon: Degree, lat: Degree, height: Meter) {
        self.lons.push(lon);
        self.lats.push(lat);
        self.heights.push(height);
    }

    pub fn len(&self) -> usize {
        self.lons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lons.is_empty()
    }

    pub fn lons(&self) -> &[Degree] {
        &self.lons
    }

    pub fn lats(&self) -> &[Degree] {
        &self.lats
    }

    pub fn heights(&self) -> &[Meter] {
        &self.heights
    }

    /// `(lon, lat, height)` of point `index`.
    ///
    /// Panics if `index >= self.len()`, like slice indexing.
    pub fn get(&self, index: usize) -> (Degree, Degree, Meter) {
        (self.lons[index], self.lats[index], self.heights[index])
    }

    /// Iterate over `(lon, lat, height)` in grid order.
    pub fn iter(&self) -> impl Iterator<Item = (Degree, Degree, Meter)> + '_ {
        izip!(&self.lons, &self.lats, &self.heights).map(|(&lon, &lat, &h)| (lon, lat, h))
    }

    /// Points in the form used by the kernels.
    pub fn observation_points(&self) -> Vec<ObservationPoint> {
        self.iter()
            .map(|(lon, lat, h)| ObservationPoint::new(lon, lat, h))
            .collect()
    }
}
