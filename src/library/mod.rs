//! CPU implementations of the catalog functions.
//!
//! Each family mirrors the signature of its shader fragments so the reference pipeline and
//! the generated program agree on parameter order and meaning.

pub(crate) mod blend;
pub(crate) mod colorize;
pub(crate) mod noise;
pub(crate) mod warp;

/// Flat parameter `i`, or `0` when the array is shorter.
pub(crate) fn param_at(params: &[f64], i: usize) -> f64 {
    params.get(i).copied().unwrap_or(0.0)
}

#[cfg(test)]
#[path = "../../tests/unit/library/catalog_parity.rs"]
mod tests;
