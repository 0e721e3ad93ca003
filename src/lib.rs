pub mod constants;
pub mod forward;
pub mod glq;
pub mod grid;
pub mod kernels;
pub mod output;
pub mod parallel;
pub mod parsers;
pub mod tess_errors;
pub mod tesseroid;
