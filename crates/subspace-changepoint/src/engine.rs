//! Streaming change detection engine
//!
//! The engine buffers the most recent `ref_size + lag + test_size` samples,
//! trains the model on samples once they have left the test window, and
//! compares the subspace residual of the oldest `ref_size` samples with that
//! of the newest `test_size` samples.

use crate::dispatch::ModelDispatch;
use crate::kernel::ResidualKernel;
use crate::params::{DetectorParameters, WindowGeometry};
use crate::traits::{ChangePointDetectorProperties, OnlineChangeDetector, TransformPolicy};
use crate::types::{ChangePointResult, DistancePair, ScoreCache, ScoreEntry};
use subspace_core::{Error, Projection, Result, Sample, SlidingBuffer, SubspaceModel};
use tracing::{debug, trace};

/// Transform policy projecting the whole buffer on every request
#[derive(Debug, Clone)]
pub struct FullTransform {
    projections: SlidingBuffer<Projection>,
}

impl TransformPolicy for FullTransform {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            projections: SlidingBuffer::new(capacity),
        }
    }

    fn name(&self) -> &'static str {
        "SubID"
    }

    fn project<'a, M: SubspaceModel>(
        &'a mut self,
        model: &mut M,
        dispatch: &ModelDispatch,
        samples: &SlidingBuffer<Sample>,
    ) -> Result<&'a SlidingBuffer<Projection>> {
        dispatch.transform_all(model, samples, &mut self.projections)?;
        Ok(&self.projections)
    }
}

/// Subspace change detector
///
/// Generic over the subspace model `M` it owns and the [`TransformPolicy`]
/// `P` deciding how buffered samples are projected.
///
/// # Example
///
/// ```rust
/// use subspace_changepoint::{ChangeDetectionEngine, DetectorParameters};
/// use subspace_core::{sample, Projection, Result, Sample, SubspaceModel};
/// use num_complex::Complex64;
///
/// // Keeps half of the energy of every sample
/// struct Halving;
///
/// impl SubspaceModel for Halving {
///     fn learn_one(&mut self, _x: &Sample) -> Result<()> {
///         Ok(())
///     }
///
///     fn transform_one(&mut self, x: &Sample) -> Result<Projection> {
///         Ok(x.values().map(|v| Complex64::new(v * 0.5_f64.sqrt(), 0.0)).collect())
///     }
/// }
///
/// let params = DetectorParameters::new(5).with_threshold(0.25);
/// let mut detector = ChangeDetectionEngine::new(Halving, params).unwrap();
/// for _ in 0..10 {
///     detector.update(&sample([("x", 1.0)])).unwrap();
/// }
/// assert!(detector.score().unwrap() < 1e-12);
/// assert!(!detector.drift_detected().unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct ChangeDetectionEngine<M, P = FullTransform> {
    model: M,
    params: DetectorParameters,
    geometry: WindowGeometry,
    dispatch: ModelDispatch,
    samples: SlidingBuffer<Sample>,
    policy: P,
    kernel: ResidualKernel,
    cache: ScoreCache,
    n_seen: usize,
    warmed_up: bool,
}

impl<M: SubspaceModel> ChangeDetectionEngine<M, FullTransform> {
    /// Create a detector that retransforms the whole buffer on every score
    pub fn new(model: M, params: DetectorParameters) -> Result<Self> {
        Self::with_policy(model, params)
    }
}

impl<M: SubspaceModel, P: TransformPolicy> ChangeDetectionEngine<M, P> {
    /// Create a detector with an explicit transform policy
    ///
    /// A `ref_size` of 0 takes the window size of a windowed adapter model.
    pub fn with_policy(model: M, mut params: DetectorParameters) -> Result<Self> {
        let dispatch = ModelDispatch::resolve(&model)?;
        if params.ref_size == 0 {
            params.ref_size = inferred_ref_size(&model, &dispatch)?;
        }
        let geometry = params.validate()?;
        let policy = P::with_capacity(geometry.capacity);

        debug!(
            algorithm = policy.name(),
            ref_size = geometry.ref_size,
            test_size = geometry.test_size,
            lag = params.lag,
            capacity = geometry.capacity,
            threshold = params.threshold,
            grace_period = params.grace_period,
            start_soon = params.start_soon,
            capabilities = ?dispatch.model_capabilities(),
            target_capabilities = ?dispatch.target_capabilities(),
            "created change detector"
        );

        Ok(Self {
            model,
            params,
            geometry,
            dispatch,
            samples: SlidingBuffer::new(geometry.capacity),
            policy,
            kernel: ResidualKernel::new(),
            cache: ScoreCache::Unset,
            n_seen: 0,
            warmed_up: false,
        })
    }

    /// Ingest a sample, training the model on the sample `learn_delay`
    /// positions behind it
    ///
    /// The sample is buffered and counted in `n_seen` before training, so a
    /// training error leaves it ingested.
    pub fn update(&mut self, x: &Sample) -> Result<()> {
        self.samples.push_back(x.clone());
        self.invalidate();

        let delay = self.learn_delay();
        let len = self.samples.len();
        let learning = self.learning_enabled();
        self.n_seen += 1;

        if learning && len > delay {
            let index = len - delay - 1;
            trace!(index, delay, n_seen = self.n_seen, "training on delayed sample");
            self.dispatch.train_one(&mut self.model, &self.samples[index])?;
        }
        Ok(())
    }

    /// Alias of [`update`](Self::update)
    pub fn learn_one(&mut self, x: &Sample) -> Result<()> {
        self.update(x)
    }

    /// Ingest a batch, training once on the contiguous slice that has left
    /// the test window
    ///
    /// Batches longer than the buffer are processed in capacity-sized chunks.
    /// Training cadence differs from repeated [`update`](Self::update) calls:
    /// the model sees at most one slice per call, and only when the whole
    /// slice is at least `learn_delay` positions behind the tail. As with
    /// `update`, a batch is buffered and counted before training.
    pub fn learn_many(&mut self, batch: &[Sample]) -> Result<()> {
        if batch.is_empty() {
            return Ok(());
        }
        let capacity = self.samples.capacity();
        if batch.len() > capacity {
            for chunk in batch.chunks(capacity) {
                self.learn_many(chunk)?;
            }
            return Ok(());
        }

        let n = batch.len();
        self.samples.extend(batch.iter().cloned());
        self.invalidate();

        let delay = self.learn_delay();
        let len = self.samples.len();
        let learning = self.learning_enabled();
        self.n_seen += n;

        if learning && len >= delay + n {
            let start = len - delay - n;
            trace!(start, end = start + n, delay, "training on delayed slice");
            let slice = self.samples.slice_to_vec(start..start + n);
            self.dispatch.train_many(&mut self.model, &slice)?;
        }
        Ok(())
    }

    /// Score `x` as if it were the next sample
    ///
    /// The buffer, including any sample evicted by the probe, and `n_seen`
    /// are restored before returning; the model is not trained. Every call
    /// recomputes the transform of the buffer.
    pub fn score_one(&mut self, x: &Sample) -> Result<f64> {
        let evicted = self.samples.push_back(x.clone());
        self.invalidate();

        let outcome = self.refresh();

        self.samples.pop_back();
        if let Some(oldest) = evicted {
            self.samples.push_front(oldest);
        }
        self.invalidate();

        outcome.map(|entry| entry.score)
    }

    /// Most recent drift decision, computed only if nothing is cached
    pub fn predict_one(&mut self) -> Result<bool> {
        match self.cache.last() {
            Some(entry) => Ok(entry.drift_detected),
            None => Ok(self.refresh()?.drift_detected),
        }
    }

    /// Normalized reference and test residuals for the current buffer
    pub fn distances(&mut self) -> Result<DistancePair> {
        Ok(self.refresh()?.distances)
    }

    /// Score for the current buffer
    pub fn score(&mut self) -> Result<f64> {
        Ok(self.refresh()?.score)
    }

    /// Drift decision for the current buffer
    pub fn drift_detected(&mut self) -> Result<bool> {
        Ok(self.refresh()?.drift_detected)
    }

    /// Mark the cached distances, score and decision as out of date
    pub fn invalidate(&mut self) {
        self.cache.invalidate();
    }

    /// Last computed distances, without recomputing
    pub fn last_distances(&self) -> Option<DistancePair> {
        self.cache.last().map(|entry| entry.distances)
    }

    /// Last computed score, without recomputing
    pub fn last_score(&self) -> Option<f64> {
        self.cache.last().map(|entry| entry.score)
    }

    /// Delay between ingesting a sample and training on it
    pub fn learn_delay(&self) -> usize {
        if self.params.start_soon {
            self.samples.len().saturating_sub(self.geometry.learn_delay)
        } else {
            self.geometry.learn_delay
        }
    }

    /// Replay a finite stream, scoring each sample before learning it
    pub fn scan(&mut self, samples: &[Sample]) -> Result<ChangePointResult> {
        OnlineChangeDetector::scan(self, samples)
    }

    pub fn n_seen(&self) -> usize {
        self.n_seen
    }

    /// Samples currently buffered
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.geometry.capacity
    }

    /// Parameters with `ref_size` resolved
    pub fn parameters(&self) -> &DetectorParameters {
        &self.params
    }

    pub fn geometry(&self) -> WindowGeometry {
        self.geometry
    }

    pub fn threshold(&self) -> f64 {
        self.params.threshold
    }

    /// Buffered samples, oldest first
    pub fn buffer(&self) -> &SlidingBuffer<Sample> {
        &self.samples
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Mutable access to the model; cached results are invalidated
    pub fn model_mut(&mut self) -> &mut M {
        self.invalidate();
        &mut self.model
    }

    pub fn into_model(self) -> M {
        self.model
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    fn learning_enabled(&self) -> bool {
        self.params.learn_after_grace || self.n_seen < self.params.grace_period
    }

    fn is_ready(&self) -> bool {
        let len = self.samples.len();
        let filled = if self.params.start_soon {
            len > self.geometry.ref_size.max(self.geometry.test_size)
        } else {
            len == self.geometry.capacity
        };
        filled && self.n_seen >= self.params.grace_period
    }

    fn refresh(&mut self) -> Result<ScoreEntry> {
        if let Some(entry) = self.cache.valid() {
            return Ok(*entry);
        }
        let entry = self.compute()?;
        Ok(self.cache.store(entry))
    }

    fn compute(&mut self) -> Result<ScoreEntry> {
        let distances = if self.is_ready() {
            let projections =
                self.policy
                    .project(&mut self.model, &self.dispatch, &self.samples)?;
            let distances = self.kernel.distances(
                &self.samples,
                projections,
                self.geometry.ref_size,
                self.geometry.test_size,
            )?;
            if !self.warmed_up {
                self.warmed_up = true;
                debug!(
                    n_seen = self.n_seen,
                    len = self.samples.len(),
                    "warm-up complete"
                );
            }
            distances
        } else {
            DistancePair::NEUTRAL
        };

        let entry = self.kernel.evaluate(distances, self.params.threshold);
        trace!(%distances, score = entry.score, "recomputed score");

        let was_drifting = self.cache.last().is_some_and(|last| last.drift_detected);
        if entry.drift_detected && !was_drifting {
            debug!(
                n_seen = self.n_seen,
                score = entry.score,
                threshold = self.params.threshold,
                "drift detected"
            );
        }
        Ok(entry)
    }
}

fn inferred_ref_size<M: SubspaceModel>(model: &M, dispatch: &ModelDispatch) -> Result<usize> {
    if !dispatch.is_windowed() {
        return Err(Error::InvalidParameter(
            "ref_size is 0 and the model is not a windowed adapter".to_string(),
        ));
    }
    match model.window_size() {
        Some(size) if size > 0 => Ok(size),
        _ => Err(Error::InvalidParameter(
            "ref_size is 0 and the windowed adapter has no window size".to_string(),
        )),
    }
}

impl<M: SubspaceModel, P: TransformPolicy> ChangePointDetectorProperties
    for ChangeDetectionEngine<M, P>
{
    fn algorithm_name(&self) -> &'static str {
        self.policy.name()
    }

    fn minimum_sample_size(&self) -> usize {
        let filled = if self.params.start_soon {
            self.geometry.ref_size.max(self.geometry.test_size) + 1
        } else {
            self.geometry.capacity
        };
        filled.max(self.params.grace_period)
    }
}

impl<M: SubspaceModel, P: TransformPolicy> OnlineChangeDetector for ChangeDetectionEngine<M, P> {
    fn learn_one(&mut self, x: &Sample) -> Result<()> {
        self.update(x)
    }

    fn learn_many(&mut self, batch: &[Sample]) -> Result<()> {
        ChangeDetectionEngine::learn_many(self, batch)
    }

    fn score_one(&mut self, x: &Sample) -> Result<f64> {
        ChangeDetectionEngine::score_one(self, x)
    }

    fn predict_one(&mut self) -> Result<bool> {
        ChangeDetectionEngine::predict_one(self)
    }

    fn threshold(&self) -> f64 {
        self.params.threshold
    }

    fn n_seen(&self) -> usize {
        self.n_seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_models::{CountingModel, ScaledModel};
    use approx::assert_relative_eq;
    use num_complex::Complex64;
    use subspace_core::{sample, Capabilities, Rolling};

    fn constant(v: f64, n: usize) -> Vec<Sample> {
        (0..n).map(|_| sample([("x", v)])).collect()
    }

    fn ramp(n: usize) -> Vec<Sample> {
        (0..n).map(|i| sample([("x", i as f64)])).collect()
    }

    #[test]
    fn test_rejects_invalid_parameters() {
        assert!(ChangeDetectionEngine::new(ScaledModel::identity(), DetectorParameters::new(0)).is_err());
        let params = DetectorParameters::new(3).with_test_size(2).with_lag(-3);
        assert!(ChangeDetectionEngine::new(ScaledModel::identity(), params).is_err());
    }

    #[test]
    fn test_ref_size_inferred_from_adapter() {
        let model = Rolling::new(CountingModel::new(), 6);
        let detector = ChangeDetectionEngine::new(model, DetectorParameters::default()).unwrap();
        assert_eq!(detector.parameters().ref_size, 6);
        assert_eq!(detector.capacity(), 12);
        let geometry = detector.geometry();
        assert_eq!(geometry.test_size, 6);
        assert_eq!(geometry.learn_delay, 6);

        let unbounded = Rolling::unbounded(CountingModel::new());
        assert!(ChangeDetectionEngine::new(unbounded, DetectorParameters::default()).is_err());
    }

    #[test]
    fn test_neutral_until_buffer_full() {
        let params = DetectorParameters::new(3).with_lag(1);
        let mut detector = ChangeDetectionEngine::new(ScaledModel::new(0.5), params).unwrap();
        let xs = ramp(7);

        for x in &xs[..6] {
            detector.update(x).unwrap();
            assert_eq!(detector.distances().unwrap(), DistancePair::NEUTRAL);
            assert!(!detector.drift_detected().unwrap());
        }
        detector.update(&xs[6]).unwrap();
        assert!(!detector.distances().unwrap().is_neutral());
        assert_eq!(detector.minimum_sample_size(), 7);
    }

    #[test]
    fn test_start_soon_scores_earlier() {
        let params = DetectorParameters::new(3).with_lag(1).with_start_soon(true);
        let mut detector = ChangeDetectionEngine::new(ScaledModel::new(0.5), params).unwrap();
        let xs = ramp(4);

        for x in &xs[..3] {
            detector.update(x).unwrap();
            assert!(detector.distances().unwrap().is_neutral());
        }
        detector.update(&xs[3]).unwrap();
        assert!(!detector.distances().unwrap().is_neutral());
        assert_eq!(detector.minimum_sample_size(), 4);
    }

    #[test]
    fn test_grace_period_delays_scoring() {
        let params = DetectorParameters::new(2).with_grace_period(6);
        let mut detector = ChangeDetectionEngine::new(ScaledModel::new(0.5), params).unwrap();
        for x in ramp(6) {
            detector.update(&x).unwrap();
        }
        assert!(!detector.distances().unwrap().is_neutral());

        let params = DetectorParameters::new(2).with_grace_period(7);
        let mut detector = ChangeDetectionEngine::new(ScaledModel::new(0.5), params).unwrap();
        for x in ramp(6) {
            detector.update(&x).unwrap();
        }
        assert!(detector.distances().unwrap().is_neutral());
    }

    #[test]
    fn test_update_trains_delayed_sample() {
        let params = DetectorParameters::new(2).with_test_size(2).with_lag(1);
        let mut detector = ChangeDetectionEngine::new(CountingModel::new(), params).unwrap();
        assert_eq!(detector.learn_delay(), 3);

        for x in ramp(6) {
            detector.update(&x).unwrap();
        }
        // Each update from the fourth on trains the sample 3 positions behind the tail
        let learned: Vec<f64> = detector.model().learned().iter().map(|s| s["x"]).collect();
        assert_eq!(learned, vec![0.0, 1.0, 2.0]);
        assert_eq!(detector.n_seen(), 6);
        assert_eq!(detector.len(), 5);
    }

    #[test]
    fn test_start_soon_learn_delay_grows_with_buffer() {
        let params = DetectorParameters::new(3).with_lag(1).with_start_soon(true);
        let mut detector = ChangeDetectionEngine::new(CountingModel::new(), params).unwrap();
        assert_eq!(detector.learn_delay(), 0);
        for x in ramp(6) {
            detector.update(&x).unwrap();
        }
        assert_eq!(detector.learn_delay(), 2);
    }

    #[test]
    fn test_learning_stops_after_grace() {
        let params = DetectorParameters::new(1)
            .with_grace_period(3)
            .with_learn_after_grace(false);
        let mut detector = ChangeDetectionEngine::new(CountingModel::new(), params).unwrap();
        for x in ramp(10) {
            detector.update(&x).unwrap();
        }
        // Delay 1: samples 0 and 1 are trained while n_seen is 1 and 2
        assert_eq!(detector.model().learned().len(), 2);
    }

    #[test]
    fn test_learn_many_trains_one_slice() {
        let params = DetectorParameters::new(2).with_test_size(2);
        let mut detector = ChangeDetectionEngine::new(CountingModel::new(), params).unwrap();

        detector.learn_many(&ramp(3)).unwrap();
        // len 3 < delay 2 + n 3
        assert!(detector.model().learned().is_empty());

        let batch: Vec<Sample> = (3..4).map(|i| sample([("x", i as f64)])).collect();
        detector.learn_many(&batch).unwrap();
        let learned: Vec<f64> = detector.model().learned().iter().map(|s| s["x"]).collect();
        assert_eq!(learned, vec![1.0]);
        assert_eq!(detector.n_seen(), 4);
        assert_eq!(detector.model().batch_calls(), 0);
    }

    #[test]
    fn test_learn_many_uses_batch_training() {
        let params = DetectorParameters::new(2).with_test_size(1);
        let model = CountingModel::with_capabilities(Capabilities::BATCH_TRAIN);
        let mut detector = ChangeDetectionEngine::new(model, params).unwrap();
        detector.learn_many(&ramp(2)).unwrap();
        detector.learn_many(&ramp(2)).unwrap();
        assert_eq!(detector.model().batch_calls(), 1);
        let learned: Vec<f64> = detector.model().learned().iter().map(|s| s["x"]).collect();
        assert_eq!(learned, vec![1.0, 0.0]);
    }

    #[test]
    fn test_learn_many_splits_large_batches() {
        let params = DetectorParameters::new(2).with_test_size(1);
        let mut detector = ChangeDetectionEngine::new(CountingModel::new(), params).unwrap();
        let xs = ramp(10);
        detector.learn_many(&xs).unwrap();
        assert_eq!(detector.n_seen(), 10);
        assert_eq!(detector.len(), 3);
        assert_eq!(detector.buffer().to_vec(), xs[7..].to_vec());
    }

    #[test]
    fn test_learn_many_through_adapter() {
        let params = DetectorParameters::new(2).with_test_size(1);
        let model = Rolling::new(CountingModel::new(), 2);
        let mut detector = ChangeDetectionEngine::new(model, params).unwrap();
        let xs = ramp(6);
        for batch in xs.chunks(2) {
            detector.learn_many(batch).unwrap();
        }
        // Slices [1, 2] and [3, 4] were trained; the adapter keeps the last two
        assert_eq!(detector.model().window_len(), 2);
        let reverted: Vec<f64> = detector.model().inner().reverted().iter().map(|s| s["x"]).collect();
        assert_eq!(reverted, vec![1.0, 2.0]);
        assert_eq!(detector.model().inner().learned().len(), 4);
    }

    #[test]
    fn test_score_one_restores_state() {
        let params = DetectorParameters::new(3).with_threshold(0.1);
        let mut detector = ChangeDetectionEngine::new(CountingModel::new(), params).unwrap();
        let xs = ramp(8);
        for x in &xs {
            detector.update(x).unwrap();
        }
        let before = detector.buffer().clone();
        let trained = detector.model().learned().len();

        let score = detector.score_one(&sample([("x", 100.0)])).unwrap();
        assert!(score > 0.0);
        assert_eq!(detector.buffer(), &before);
        assert_eq!(detector.n_seen(), 8);
        assert_eq!(detector.model().learned().len(), trained);
        // The probe decision stays readable until the next recomputation
        assert_eq!(detector.last_score(), Some(score));
        assert!(detector.predict_one().unwrap());
    }

    #[test]
    fn test_repeated_reads_use_cache() {
        let params = DetectorParameters::new(2);
        let mut detector = ChangeDetectionEngine::new(CountingModel::new(), params).unwrap();
        for x in ramp(4) {
            detector.update(&x).unwrap();
        }
        let first = detector.distances().unwrap();
        let transforms = detector.model().transform_calls();
        assert_eq!(detector.distances().unwrap(), first);
        assert_eq!(detector.score().unwrap(), detector.score().unwrap());
        assert_eq!(detector.model().transform_calls(), transforms);

        detector.invalidate();
        assert_eq!(detector.distances().unwrap(), first);
        assert_eq!(detector.model().transform_calls(), transforms + 4);
    }

    #[test]
    fn test_model_change_invalidates_cache() {
        let params = DetectorParameters::new(2);
        let mut detector = ChangeDetectionEngine::new(ScaledModel::new(0.5), params).unwrap();
        for x in ramp(4) {
            detector.update(&x).unwrap();
        }
        let before = detector.distances().unwrap();
        assert_relative_eq!(before.train.re, 0.375);

        detector.model_mut().set_factor(0.9);
        let after = detector.distances().unwrap();
        // (1 - 0.81) * (0 + 1) / 2 and (1 - 0.81) * (4 + 9) / 2
        assert_relative_eq!(after.train.re, 0.095, epsilon = 1e-12);
        assert_relative_eq!(after.test.re, 1.235, epsilon = 1e-12);
    }

    #[test]
    fn test_failed_training_still_counts_sample() {
        let params = DetectorParameters::new(1);
        let mut detector = ChangeDetectionEngine::new(CountingModel::new(), params).unwrap();
        let xs = ramp(3);
        detector.update(&xs[0]).unwrap();

        detector.model_mut().fail_next_learns(1);
        assert!(detector.update(&xs[1]).is_err());
        assert_eq!(detector.n_seen(), 2);
        assert_eq!(detector.buffer().to_vec(), xs[..2].to_vec());

        detector.update(&xs[2]).unwrap();
        let learned: Vec<f64> = detector.model().learned().iter().map(|s| s["x"]).collect();
        assert_eq!(learned, vec![1.0]);
        assert_eq!(detector.n_seen(), 3);
    }

    #[test]
    fn test_failed_batch_training_still_counts_batch() {
        let params = DetectorParameters::new(1);
        let mut detector = ChangeDetectionEngine::new(CountingModel::new(), params).unwrap();
        detector.learn_many(&ramp(1)).unwrap();

        detector.model_mut().fail_next_learns(1);
        let batch = vec![sample([("x", 1.0)])];
        assert!(detector.learn_many(&batch).is_err());
        assert_eq!(detector.n_seen(), 2);
        assert_eq!(detector.len(), 2);
    }

    #[test]
    fn test_predict_one_computes_when_unset() {
        let mut detector =
            ChangeDetectionEngine::new(ScaledModel::identity(), DetectorParameters::new(2)).unwrap();
        assert!(detector.last_distances().is_none());
        assert!(!detector.predict_one().unwrap());
        assert_eq!(detector.last_distances(), Some(DistancePair::NEUTRAL));
    }

    #[test]
    fn test_constant_signal_scores_zero() {
        let params = DetectorParameters::new(5).with_threshold(0.25);
        let mut detector = ChangeDetectionEngine::new(ScaledModel::new(0.5), params).unwrap();
        for x in constant(2.0, 30) {
            detector.update(&x).unwrap();
            assert!(!detector.drift_detected().unwrap());
        }
        assert_relative_eq!(detector.score().unwrap(), 0.0, epsilon = 1e-12);
        let d = detector.distances().unwrap();
        assert_relative_eq!(d.train.re, 3.0, epsilon = 1e-12);
        assert_relative_eq!(d.test.re, 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_complex_projections_flow_through() {
        let model = ScaledModel::complex(Complex64::new(0.0, 0.5));
        let mut detector = ChangeDetectionEngine::new(model, DetectorParameters::new(1)).unwrap();
        detector.update(&sample([("x", 1.0)])).unwrap();
        detector.update(&sample([("x", 2.0)])).unwrap();
        // (0.5i x)^2 = -0.25 x^2, so D = 1.25 x^2
        let d = detector.distances().unwrap();
        assert_relative_eq!(d.train.re, 1.25);
        assert_relative_eq!(d.test.re, 5.0);
        assert_relative_eq!(detector.score().unwrap(), 3.0);
    }
}
