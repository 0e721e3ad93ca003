//! # Field output
//!
//! Text output of a computed field, one observation point per line:
//!
//! ```text
//! # lon lat height gz (mGal)
//! -1 10 250000 0.01376
//! 0 10 250000 0.01377
//!
//! -1 11 250000 0.01374
//! ```
//!
//! A blank line separates latitude rows so regular grids can be plotted directly as surfaces.
//! Values are written with the shortest representation that reads back to the same `f64`.
use std::io::Write;

use itertools::izip;

use crate::grid::Grid;
use crate::kernels::FieldComponent;
use crate::tess_errors::TessError;

/// Unit label of a component, as written in the output header.
pub fn field_unit(component: FieldComponent) -> &'static str {
    component.unit_label()
}

/// Write `lon lat height value` lines.
///
/// Arguments
/// -----------------
/// * `writer` – Destination, buffered by the caller if needed.
/// * `grid` – Observation points of the field.
/// * `field` – One value per grid point, in grid order.
///
/// Return
/// ----------
/// * `Err(TessError::InvalidParameter)` if `field` and `grid` have different lengths.
/// * `Err(TessError::IoError)` on a write failure.
pub fn write_field<W: Write>(writer: &mut W, grid: &Grid, field: &[f64]) -> Result<(), TessError> {
    if field.len() != grid.len() {
        return Err(TessError::InvalidParameter(format!(
            "{} field values for {} observation points",
            field.len(),
            grid.len()
        )));
    }

    let mut previous_lat: Option<f64> = None;
    for (&lon, &lat, &height, value) in izip!(grid.lons(), grid.lats(), grid.heights(), field) {
        if previous_lat.is_some_and(|prev| prev != lat) {
            writeln!(writer)?;
        }
        writeln!(writer, "{lon} {lat} {height} {value}")?;
        previous_lat = Some(lat);
    }
    Ok(())
}

/// Same as [`write_field`], preceded by a `#` header naming the columns and the unit.
pub fn write_component<W: Write>(
    writer: &mut W,
    component: FieldComponent,
    grid: &Grid,
    field: &[f64],
) -> Result<(), TessError> {
    writeln!(
        writer,
        "# lon lat height {} ({})",
        component.name(),
        field_unit(component)
    )?;
    write_field(writer, grid, field)
}
