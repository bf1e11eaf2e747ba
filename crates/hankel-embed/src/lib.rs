//! # Hankel Embedding Library
//!
//! Time-delay (Hankel) embedding of multivariate time series, used to expose
//! the dynamics of a signal to rank and subspace estimators.
//!
//! Given a data matrix `X` with one row per time step and `m` feature columns,
//! an embedding of depth `d` and stride `s` stacks `d` time-shifted copies of
//! each row side by side:
//!
//! ```text
//! row t  ->  [ X[t] | X[t - s] | X[t - 2s] | ... | X[t - (d-1)s] ]
//! ```
//!
//! Only rows with a complete history are kept, so the embedded matrix has
//! `n - (d-1)s` rows and `d * m` columns.
//!
//! ## Basic Usage
//!
//! ```rust
//! use hankel_embed::hankel;
//! use nalgebra::DMatrix;
//!
//! // Single feature, five time steps
//! let x = DMatrix::from_column_slice(5, 1, &[1.0, 2.0, 3.0, 4.0, 5.0]);
//! let h = hankel(&x, 2, 1).unwrap();
//!
//! assert_eq!(h.shape(), (4, 2));
//! assert_eq!(h[(0, 0)], 2.0); // X[1]
//! assert_eq!(h[(0, 1)], 1.0); // X[0]
//! ```

use nalgebra::DMatrix;
use thiserror::Error;

/// Error types for embedding operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EmbeddingError {
    /// Embedding depth must be at least one
    #[error("Embedding depth must be positive")]
    InvalidDepth,
    /// Stride between delayed copies must be at least one
    #[error("Embedding stride must be positive")]
    InvalidStride,
    /// Not enough rows to build a single embedded row
    #[error("Signal too short for embedding: {rows} rows, at least {required} required")]
    SignalTooShort { rows: usize, required: usize },
}

/// Result type for embedding operations
pub type EmbeddingResult<T> = Result<T, EmbeddingError>;

/// A time-delay embedding of a data matrix
///
/// Implementations decide how delayed copies are arranged; consumers such as
/// rank estimators only depend on receiving a matrix with one row per
/// embedded time step.
pub trait Embedding {
    /// Embed `x` (rows = time) using `depth` delayed copies spaced by `stride`
    fn embed(&self, x: &DMatrix<f64>, depth: usize, stride: usize)
        -> EmbeddingResult<DMatrix<f64>>;
}

/// Standard Hankel embedding with the newest sample in the leading block
#[derive(Debug, Clone, Copy, Default)]
pub struct HankelEmbedding;

impl Embedding for HankelEmbedding {
    fn embed(
        &self,
        x: &DMatrix<f64>,
        depth: usize,
        stride: usize,
    ) -> EmbeddingResult<DMatrix<f64>> {
        hankel(x, depth, stride)
    }
}

/// Number of embedded rows produced for `rows` input rows
///
/// Returns `None` when there is not enough history for a single row.
pub fn embedded_rows(rows: usize, depth: usize, stride: usize) -> Option<usize> {
    let span = depth.checked_sub(1)?.checked_mul(stride)?;
    rows.checked_sub(span).filter(|&r| r > 0)
}

/// Build the Hankel (time-delay) embedding of `x`
///
/// # Arguments
/// * `x` - Data matrix, one row per time step
/// * `depth` - Number of delayed copies (including lag zero)
/// * `stride` - Step between consecutive delays
///
/// # Errors
/// Returns an error when `depth` or `stride` is zero, or when `x` has fewer
/// than `(depth - 1) * stride + 1` rows.
pub fn hankel(x: &DMatrix<f64>, depth: usize, stride: usize) -> EmbeddingResult<DMatrix<f64>> {
    if depth == 0 {
        return Err(EmbeddingError::InvalidDepth);
    }
    if stride == 0 {
        return Err(EmbeddingError::InvalidStride);
    }

    let (n, m) = x.shape();
    let span = (depth - 1) * stride;
    let rows = embedded_rows(n, depth, stride).ok_or(EmbeddingError::SignalTooShort {
        rows: n,
        required: span + 1,
    })?;

    let mut out = DMatrix::zeros(rows, depth * m);
    for r in 0..rows {
        let t = r + span;
        for k in 0..depth {
            let src = t - k * stride;
            for j in 0..m {
                out[(r, k * m + j)] = x[(src, j)];
            }
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(n: usize, m: usize) -> DMatrix<f64> {
        DMatrix::from_fn(n, m, |i, j| (i * 10 + j) as f64)
    }

    #[test]
    fn test_shape() {
        let x = ramp(10, 3);
        let h = hankel(&x, 4, 2).unwrap();
        assert_eq!(h.shape(), (10 - 3 * 2, 12));
    }

    #[test]
    fn test_delayed_blocks() {
        let x = ramp(6, 2);
        let h = hankel(&x, 3, 1).unwrap();
        // First embedded row corresponds to t = 2
        assert_eq!(h[(0, 0)], 20.0);
        assert_eq!(h[(0, 1)], 21.0);
        assert_eq!(h[(0, 2)], 10.0);
        assert_eq!(h[(0, 3)], 11.0);
        assert_eq!(h[(0, 4)], 0.0);
        assert_eq!(h[(0, 5)], 1.0);
        // Last embedded row corresponds to t = 5
        assert_eq!(h[(3, 0)], 50.0);
        assert_eq!(h[(3, 4)], 30.0);
    }

    #[test]
    fn test_stride() {
        let x = ramp(7, 1);
        let h = hankel(&x, 3, 3).unwrap();
        assert_eq!(h.shape(), (1, 3));
        assert_eq!(h.row(0).iter().copied().collect::<Vec<_>>(), vec![60.0, 30.0, 0.0]);
    }

    #[test]
    fn test_depth_one_is_identity() {
        let x = ramp(5, 2);
        assert_eq!(hankel(&x, 1, 4).unwrap(), x);
    }

    #[test]
    fn test_errors() {
        let x = ramp(3, 1);
        assert_eq!(hankel(&x, 0, 1), Err(EmbeddingError::InvalidDepth));
        assert_eq!(hankel(&x, 2, 0), Err(EmbeddingError::InvalidStride));
        assert_eq!(
            hankel(&x, 4, 1),
            Err(EmbeddingError::SignalTooShort { rows: 3, required: 4 })
        );
    }

    #[test]
    fn test_trait_matches_function() {
        let x = ramp(8, 2);
        let via_trait = HankelEmbedding.embed(&x, 3, 2).unwrap();
        assert_eq!(via_trait, hankel(&x, 3, 2).unwrap());
    }
}
