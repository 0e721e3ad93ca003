//! Feature-gated parallel helpers.
//!
//! With the `parallel` feature (enabled by default) the maps below run on the rayon thread
//! pool; without it they fall back to plain sequential iterators with the same signature.

/// Check if parallel processing is available
#[cfg(feature = "parallel")]
pub fn is_parallel_available() -> bool {
    true
}

/// Check if parallel processing is available
#[cfg(not(feature = "parallel"))]
pub fn is_parallel_available() -> bool {
    false
}

/// Parallel map over `0..count`, results in index order
#[cfg(feature = "parallel")]
pub(crate) fn parallel_map_indexed<U, F>(count: usize, f: F) -> Vec<U>
where
    U: Send,
    F: Fn(usize) -> U + Sync + Send,
{
    use rayon::prelude::*;
    (0..count).into_par_iter().map(f).collect()
}

/// Sequential map with index (fallback)
#[cfg(not(feature = "parallel"))]
pub(crate) fn parallel_map_indexed<U, F>(count: usize, f: F) -> Vec<U>
where
    F: Fn(usize) -> U,
{
    (0..count).map(f).collect()
}

/// Parallel map over a slice
#[cfg(feature = "parallel")]
pub(crate) fn parallel_map<T, U, F>(data: &[T], f: F) -> Vec<U>
where
    T: Sync,
    U: Send,
    F: Fn(&T) -> U + Sync + Send,
{
    use rayon::prelude::*;
    data.par_iter().map(f).collect()
}

/// Sequential map (fallback)
#[cfg(not(feature = "parallel"))]
pub(crate) fn parallel_map<T, U, F>(data: &[T], f: F) -> Vec<U>
where
    F: Fn(&T) -> U,
{
    data.iter().map(f).collect()
}
