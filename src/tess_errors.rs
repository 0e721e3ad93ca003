use thiserror::Error;

#[derive(Error, Debug)]
pub enum TessError {
    #[error("Invalid GLQ order {0}: the order must be >= 2")]
    InvalidOrder(usize),

    #[error("Newton iteration did not converge for root {root} of the Legendre polynomial of order {order}")]
    MaxIterations { order: usize, root: usize },

    #[error("Abscissa index {index} out of range for a GLQ rule of order {order}")]
    IndexOutOfRange { index: usize, order: usize },

    #[error("GLQ abscissas and weights do not match: {0}")]
    TypeMismatch(String),

    #[error("Invalid boundary for tesseroid {tag}: {reason}")]
    InvalidBoundary { tag: String, reason: String },

    #[error("Invalid density for tesseroid {tag}: {value}")]
    InvalidDensity { tag: String, value: f64 },

    #[error("Invalid forward modelling parameter: {0}")]
    InvalidParameter(String),

    #[error("Grid arrays must have the same length (lon: {lons}, lat: {lats}, height: {heights})")]
    GridLengthMismatch {
        lons: usize,
        lats: usize,
        heights: usize,
    },

    #[error("Invalid grid specification: {0}")]
    InvalidGridSpec(String),

    #[error("Unable to parse the model at line {line}: {content}")]
    ModelParse { line: usize, content: String },

    #[error("Unable to parse the observation point at line {line}: {content}")]
    PointParse { line: usize, content: String },

    #[error("Invalid tesseroid at line {line}: {source}")]
    InvalidModelLine {
        line: usize,
        #[source]
        source: Box<TessError>,
    },

    #[error("Unknown field component: {0}")]
    UnknownComponent(String),

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}

impl PartialEq for TessError {
    fn eq(&self, other: &Self) -> bool {
        use TessError::*;
        match (self, other) {
            (InvalidOrder(a), InvalidOrder(b)) => a == b,
            (
                MaxIterations {
                    order: o1,
                    root: r1,
                },
                MaxIterations {
                    order: o2,
                    root: r2,
                },
            ) => o1 == o2 && r1 == r2,
            (
                IndexOutOfRange {
                    index: i1,
                    order: o1,
                },
                IndexOutOfRange {
                    index: i2,
                    order: o2,
                },
            ) => i1 == i2 && o1 == o2,
            (TypeMismatch(a), TypeMismatch(b)) => a == b,
            (
                InvalidBoundary {
                    tag: t1,
                    reason: r1,
                },
                InvalidBoundary {
                    tag: t2,
                    reason: r2,
                },
            ) => t1 == t2 && r1 == r2,
            (InvalidDensity { tag: t1, value: v1 }, InvalidDensity { tag: t2, value: v2 }) => {
                t1 == t2 && (v1 == v2 || (v1.is_nan() && v2.is_nan()))
            }
            (InvalidParameter(a), InvalidParameter(b)) => a == b,
            (
                GridLengthMismatch {
                    lons: a1,
                    lats: b1,
                    heights: c1,
                },
                GridLengthMismatch {
                    lons: a2,
                    lats: b2,
                    heights: c2,
                },
            ) => a1 == a2 && b1 == b2 && c1 == c2,
            (InvalidGridSpec(a), InvalidGridSpec(b)) => a == b,
            (
                ModelParse {
                    line: l1,
                    content: c1,
                },
                ModelParse {
                    line: l2,
                    content: c2,
                },
            ) => l1 == l2 && c1 == c2,
            (
                PointParse {
                    line: l1,
                    content: c1,
                },
                PointParse {
                    line: l2,
                    content: c2,
                },
            ) => l1 == l2 && c1 == c2,
            (
                InvalidModelLine {
                    line: l1,
                    source: s1,
                },
                InvalidModelLine {
                    line: l2,
                    source: s2,
                },
            ) => l1 == l2 && s1 == s2,
            (UnknownComponent(a), UnknownComponent(b)) => a == b,

            // Not comparable: equal when the variant matches
            (IoError(_), IoError(_)) => true,
            (CsvError(_), CsvError(_)) => true,

            _ => false,
        }
    }
}
