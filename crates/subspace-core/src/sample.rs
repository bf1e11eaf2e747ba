//! Sample and projection types
//!
//! A [`Sample`] is one observation of a multivariate signal, keyed by feature
//! name. A [`Projection`] is the image of a sample under a subspace model; its
//! coordinates are complex so that spectral (eigen-based) transforms can be
//! represented without loss.

use crate::error::{Error, Result};
use nalgebra::DMatrix;
use num_complex::Complex64;
use std::collections::BTreeMap;

/// One observation: feature name to value
pub type Sample = BTreeMap<String, f64>;

/// Coordinates of a sample in a model's subspace
pub type Projection = Vec<Complex64>;

/// Build a sample from `(name, value)` pairs
pub fn sample<'a, I>(pairs: I) -> Sample
where
    I: IntoIterator<Item = (&'a str, f64)>,
{
    pairs
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
}

/// Sum of squared feature values of a sample
#[inline]
pub fn sum_of_squares(x: &Sample) -> f64 {
    x.values().map(|v| v * v).sum()
}

/// Sum of complex squares `z * z` of a projection
///
/// Not `|z|^2`: imaginary parts carry through, so rotating spectral
/// coordinates show up in the residual.
#[inline]
pub fn complex_sum_of_squares(p: &[Complex64]) -> Complex64 {
    p.iter().map(|z| z * z).sum()
}

/// Stack samples into a matrix (rows = samples, columns = features)
///
/// Column order follows the sorted feature names of the first sample.
/// Every sample must carry exactly the same features.
pub fn to_matrix(samples: &[Sample]) -> Result<DMatrix<f64>> {
    let first = samples.first().ok_or_else(|| Error::empty_input("to_matrix"))?;
    let names: Vec<&String> = first.keys().collect();

    let mut out = DMatrix::zeros(samples.len(), names.len());
    for (i, x) in samples.iter().enumerate() {
        if x.len() != names.len() {
            return Err(Error::size_mismatch(names.len(), x.len(), "sample features"));
        }
        for (j, name) in names.iter().enumerate() {
            out[(i, j)] = *x.get(*name).ok_or_else(|| {
                Error::InvalidInput(format!("sample {i} is missing feature '{name}'"))
            })?;
        }
    }
    Ok(out)
}
