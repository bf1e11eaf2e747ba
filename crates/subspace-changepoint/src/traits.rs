//! Core traits for subspace change detection
//!
//! Detectors are split along two seams:
//! - the streaming protocol callers drive ([`OnlineChangeDetector`])
//! - the strategy turning the raw buffer into projections ([`TransformPolicy`])
//!
//! The subspace model itself is supplied by the caller through
//! [`subspace_core::SubspaceModel`].

use crate::dispatch::ModelDispatch;
use crate::types::{ChangePoint, ChangePointResult};
use subspace_core::{Projection, Result, Sample, SlidingBuffer, SubspaceModel};

/// Properties of a change detector that don't depend on the data
pub trait ChangePointDetectorProperties {
    /// Get the name of the detection algorithm
    fn algorithm_name(&self) -> &'static str;

    /// Number of samples needed before a non-neutral score can appear
    fn minimum_sample_size(&self) -> usize;
}

/// Streaming change detection, one sample or one batch at a time
pub trait OnlineChangeDetector: ChangePointDetectorProperties {
    /// Ingest a sample, possibly training the model on a delayed one
    fn learn_one(&mut self, x: &Sample) -> Result<()>;

    /// Ingest a batch in order
    fn learn_many(&mut self, batch: &[Sample]) -> Result<()>;

    /// Score `x` as if it were the next sample, leaving no trace
    fn score_one(&mut self, x: &Sample) -> Result<f64>;

    /// Most recent drift decision
    fn predict_one(&mut self) -> Result<bool>;

    /// Detection threshold on the score
    fn threshold(&self) -> f64;

    /// Samples ingested so far
    fn n_seen(&self) -> usize;

    /// Replay a finite stream with the progressive protocol
    ///
    /// Each sample is scored before it is learned. Indices where the score
    /// exceeds the threshold are reported as change-points; the score of
    /// every sample is kept as the result statistics.
    fn scan(&mut self, samples: &[Sample]) -> Result<ChangePointResult> {
        let threshold = self.threshold();
        let mut changepoints = Vec::new();
        let mut statistics = Vec::with_capacity(samples.len());

        for (i, x) in samples.iter().enumerate() {
            let score = self.score_one(x)?;
            if score > threshold {
                let confidence = if threshold > 0.0 {
                    (score / (2.0 * threshold)).min(1.0)
                } else {
                    1.0
                };
                changepoints.push(ChangePoint::new(i, confidence, score));
            }
            statistics.push(score);
            self.learn_one(x)?;
        }

        Ok(ChangePointResult::new(
            changepoints,
            self.algorithm_name().to_string(),
            samples.len(),
            statistics,
        ))
    }
}

/// Strategy producing projections aligned with the raw sample buffer
///
/// The returned buffer has exactly one projection per buffered sample, in
/// the same order.
pub trait TransformPolicy {
    /// Create a policy for buffers of the given capacity
    fn with_capacity(capacity: usize) -> Self
    where
        Self: Sized;

    /// Short name used in results and logs
    fn name(&self) -> &'static str;

    /// Project every buffered sample
    fn project<'a, M: SubspaceModel>(
        &'a mut self,
        model: &mut M,
        dispatch: &ModelDispatch,
        samples: &SlidingBuffer<Sample>,
    ) -> Result<&'a SlidingBuffer<Projection>>;
}
