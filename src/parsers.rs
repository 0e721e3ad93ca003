//! # Text parsers for models and observation points
//!
//! ## Model files
//!
//! One tesseroid per line, seven whitespace separated columns:
//!
//! ```text
//! # West East South North Top Bottom Density
//! -10 10 -5 5 0 35000 2670
//! ```
//!
//! Everything after a `#` is a comment; blank lines are skipped. Each tesseroid is tagged with
//! the line number it was read from.
//!
//! ## Point files
//!
//! One observation point per line, `lon lat height` followed by any number of extra columns,
//! which are ignored. Comments and blank lines follow the model file rules.
use camino::Utf8Path;
use log::info;
use nom::{
    character::complete::{space0, space1},
    combinator::{eof, opt, rest},
    number::complete::double,
    sequence::{preceded, terminated},
    IResult, Parser,
};

use crate::grid::Grid;
use crate::tess_errors::TessError;
use crate::tesseroid::{TessTag, Tesseroid};

fn parse_field(input: &str) -> IResult<&str, f64> {
    preceded(space0, double).parse(input)
}

fn parse_next_field(input: &str) -> IResult<&str, f64> {
    preceded(space1, double).parse(input)
}

/// Parse `W E S N Top Bottom Density`, nothing else on the line.
pub fn parse_tesseroid_line(input: &str) -> IResult<&str, [f64; 7]> {
    let (input, (w, e, s, n, top, bottom, density)) = terminated(
        (
            parse_field,
            parse_next_field,
            parse_next_field,
            parse_next_field,
            parse_next_field,
            parse_next_field,
            parse_next_field,
        ),
        (space0, eof),
    )
    .parse(input)?;
    Ok((input, [w, e, s, n, top, bottom, density]))
}

/// Parse `lon lat height [ignored columns...]`.
pub fn parse_point_line(input: &str) -> IResult<&str, (f64, f64, f64)> {
    let (input, (lon, lat, height)) =
        (parse_field, parse_next_field, parse_next_field).parse(input)?;
    let (input, _) = opt(preceded(space1, rest)).parse(input)?;
    let (input, _) = (space0, eof).parse(input)?;
    Ok((input, (lon, lat, height)))
}

/// Content of a line without its comment, `None` when nothing is left.
fn strip_comment(line: &str) -> Option<&str> {
    let content = match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    };
    let content = content.trim();
    (!content.is_empty()).then_some(content)
}

/// Parse a whole model.
///
/// Return
/// ----------
/// * `Err(TessError::ModelParse)` for a malformed line.
/// * `Err(TessError::InvalidModelLine)` for a well formed line describing an invalid tesseroid.
pub fn parse_model(text: &str) -> Result<Vec<Tesseroid>, TessError> {
    text.lines()
        .enumerate()
        .filter_map(|(i, line)| strip_comment(line).map(|content| (i + 1, content)))
        .map(|(line, content)| {
            let (_, [w, e, s, n, top, bottom, density]) = parse_tesseroid_line(content)
                .map_err(|_| TessError::ModelParse {
                    line,
                    content: content.to_string(),
                })?;
            let tag = TessTag::Int(u32::try_from(line).unwrap_or(u32::MAX));
            Tesseroid::with_tag(w, e, s, n, top, bottom, density, tag).map_err(|source| {
                TessError::InvalidModelLine {
                    line,
                    source: Box::new(source),
                }
            })
        })
        .collect()
}

/// Read a model file.
pub fn read_model_file(path: &Utf8Path) -> Result<Vec<Tesseroid>, TessError> {
    let text = std::fs::read_to_string(path)?;
    let model = parse_model(&text)?;
    info!("Read {} tesseroids from {path}", model.len());
    Ok(model)
}

/// Parse observation points.
///
/// Return
/// ----------
/// * `Err(TessError::PointParse)` for a line without three leading numbers.
pub fn parse_points(text: &str) -> Result<Grid, TessError> {
    let mut grid = Grid::default();
    for (i, line) in text.lines().enumerate() {
        let Some(content) = strip_comment(line) else {
            continue;
        };
        let (_, (lon, lat, height)) =
            parse_point_line(content).map_err(|_| TessError::PointParse {
                line: i + 1,
                content: content.to_string(),
            })?;
        grid.push(lon, lat, height);
    }
    Ok(grid)
}

/// Read an observation point file.
pub fn read_points_file(path: &Utf8Path) -> Result<Grid, TessError> {
    let text = std::fs::read_to_string(path)?;
    let grid = parse_points(&text)?;
    info!("Read {} observation points from {path}", grid.len());
    Ok(grid)
}
