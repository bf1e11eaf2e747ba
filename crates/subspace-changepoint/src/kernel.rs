//! Residual and score kernels
//!
//! The residual of a window is the energy of the raw samples minus the
//! energy retained by their projections. No back-projection to the original
//! basis is performed.

use crate::types::{DistancePair, ScoreEntry};
use num_complex::Complex64;
use subspace_core::{
    complex_sum_of_squares, sum_of_squares, Error, Projection, Result, Sample, SlidingBuffer,
};

/// Kernel computing window residuals, scores and drift decisions
#[derive(Clone, Copy, Debug, Default)]
pub struct ResidualKernel;

impl ResidualKernel {
    pub fn new() -> Self {
        Self
    }

    /// Unnormalized residual `Σ x² − Σ z²` over paired samples and projections
    pub fn residual<'a, X, P>(&self, samples: X, projections: P) -> Complex64
    where
        X: IntoIterator<Item = &'a Sample>,
        P: IntoIterator<Item = &'a Projection>,
    {
        let raw: f64 = samples.into_iter().map(sum_of_squares).sum();
        let kept: Complex64 = projections
            .into_iter()
            .map(|p| complex_sum_of_squares(p))
            .sum();
        Complex64::new(raw, 0.0) - kept
    }

    /// Reference and test residuals, each normalized by its window size
    ///
    /// The reference window is the oldest `ref_size` entries, the test window
    /// the newest `test_size` entries.
    pub fn distances(
        &self,
        samples: &SlidingBuffer<Sample>,
        projections: &SlidingBuffer<Projection>,
        ref_size: usize,
        test_size: usize,
    ) -> Result<DistancePair> {
        if projections.len() != samples.len() {
            return Err(Error::size_mismatch(
                samples.len(),
                projections.len(),
                "projection buffer",
            ));
        }

        let ref_range = samples.front_range(ref_size);
        let test_range = samples.back_range(test_size);

        let train = self.residual(
            samples.range(ref_range.clone()),
            projections.range(ref_range),
        ) / ref_size as f64;
        let test = self.residual(
            samples.range(test_range.clone()),
            projections.range(test_range),
        ) / test_size as f64;

        Ok(DistancePair::new(train, test))
    }

    /// Score `D_test / D_train − 1`, collapsed to a non-negative real
    ///
    /// A complex ratio collapses to `re + |im|`. Negative scores (lower test
    /// noise, running normalization) clamp to zero. A zero reference residual
    /// scores zero against a zero test residual and infinity otherwise.
    pub fn score(&self, distances: &DistancePair) -> f64 {
        let zero = Complex64::new(0.0, 0.0);
        if distances.train == zero {
            return if distances.test == zero { 0.0 } else { f64::INFINITY };
        }
        let ratio = distances.test / distances.train - Complex64::new(1.0, 0.0);
        let collapsed = ratio.re + ratio.im.abs();
        // f64::max drops NaN in favour of the other operand
        collapsed.max(0.0)
    }

    /// Full entry for a distance pair
    pub fn evaluate(&self, distances: DistancePair, threshold: f64) -> ScoreEntry {
        let score = self.score(&distances);
        ScoreEntry {
            distances,
            score,
            drift_detected: score > threshold,
        }
    }
}
