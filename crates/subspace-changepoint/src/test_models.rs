//! Reference models and signals for testing detectors
//!
//! The models here are deliberately simple so that distances and scores can
//! be worked out by hand. None of them fits a subspace.

use num_complex::Complex64;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use subspace_core::{
    sample, Capabilities, Error, Projection, Result, Revert, Sample, SubspaceModel,
};

/// Projects every feature onto `factor * x`
///
/// The residual of a sample is `(1 - factor²) Σ x²`, so a constant signal
/// scores zero and a pure scale change scores its energy ratio.
#[derive(Debug, Clone)]
pub struct ScaledModel {
    factor: Complex64,
    capabilities: Capabilities,
    stable: bool,
    failing_transforms: usize,
    transform_calls: usize,
    stability_checks: usize,
}

impl ScaledModel {
    pub fn new(factor: f64) -> Self {
        Self::complex(Complex64::new(factor, 0.0))
    }

    /// Keeps every sample as is; residuals are zero
    pub fn identity() -> Self {
        Self::new(1.0)
    }

    pub fn complex(factor: Complex64) -> Self {
        Self {
            factor,
            capabilities: Capabilities::empty(),
            stable: false,
            failing_transforms: 0,
            transform_calls: 0,
            stability_checks: 0,
        }
    }

    /// Advertise a stability signal reporting `stable`
    pub fn with_stability(mut self, stable: bool) -> Self {
        self.capabilities |= Capabilities::STABILITY_SIGNAL;
        self.stable = stable;
        self
    }

    pub fn set_stable(&mut self, stable: bool) {
        self.stable = stable;
    }

    pub fn set_factor(&mut self, factor: f64) {
        self.factor = Complex64::new(factor, 0.0);
    }

    /// Make the next `n` calls to `transform_one` fail
    pub fn fail_next_transforms(&mut self, n: usize) {
        self.failing_transforms = n;
    }

    pub fn transform_calls(&self) -> usize {
        self.transform_calls
    }

    pub fn stability_checks(&self) -> usize {
        self.stability_checks
    }
}

impl SubspaceModel for ScaledModel {
    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    fn learn_one(&mut self, _x: &Sample) -> Result<()> {
        Ok(())
    }

    fn transform_one(&mut self, x: &Sample) -> Result<Projection> {
        if self.failing_transforms > 0 {
            self.failing_transforms -= 1;
            return Err(Error::model("transient transform failure"));
        }
        self.transform_calls += 1;
        Ok(x.values().map(|&v| self.factor * v).collect())
    }

    fn operator_unchanged(&mut self) -> bool {
        self.stability_checks += 1;
        self.stable
    }
}

impl Revert for ScaledModel {
    fn revert(&mut self, _x: &Sample) -> Result<()> {
        Ok(())
    }
}

/// Reconstructs samples near a baseline level and nothing else
///
/// Features within `tolerance` of `baseline` project onto `factor * x`;
/// anything else projects onto zero, leaving its whole energy as residual.
#[derive(Debug, Clone)]
pub struct BaselineModel {
    baseline: f64,
    tolerance: f64,
    factor: f64,
}

impl BaselineModel {
    pub fn new(baseline: f64) -> Self {
        Self {
            baseline,
            tolerance: 0.5,
            factor: 0.5,
        }
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }
}

impl SubspaceModel for BaselineModel {
    fn learn_one(&mut self, _x: &Sample) -> Result<()> {
        Ok(())
    }

    fn transform_one(&mut self, x: &Sample) -> Result<Projection> {
        Ok(x.values()
            .map(|&v| {
                if (v - self.baseline).abs() <= self.tolerance {
                    Complex64::new(self.factor * v, 0.0)
                } else {
                    Complex64::new(0.0, 0.0)
                }
            })
            .collect())
    }
}

/// Records every call made by a detector
///
/// Projections are empty, so residuals equal the raw sample energy.
#[derive(Debug, Clone, Default)]
pub struct CountingModel {
    capabilities: Capabilities,
    learned: Vec<Sample>,
    reverted: Vec<Sample>,
    failing_learns: usize,
    batch_calls: usize,
    transform_calls: usize,
    batch_transform_calls: usize,
}

impl CountingModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capabilities(capabilities: Capabilities) -> Self {
        Self {
            capabilities,
            ..Self::default()
        }
    }

    /// Make the next `n` calls to `learn_one` fail
    pub fn fail_next_learns(&mut self, n: usize) {
        self.failing_learns = n;
    }

    /// Samples learned so far, in order
    pub fn learned(&self) -> &[Sample] {
        &self.learned
    }

    pub fn reverted(&self) -> &[Sample] {
        &self.reverted
    }

    /// Calls to `learn_many`
    pub fn batch_calls(&self) -> usize {
        self.batch_calls
    }

    /// Samples passed to `transform_one`
    pub fn transform_calls(&self) -> usize {
        self.transform_calls
    }

    pub fn batch_transform_calls(&self) -> usize {
        self.batch_transform_calls
    }
}

impl SubspaceModel for CountingModel {
    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    fn learn_one(&mut self, x: &Sample) -> Result<()> {
        if self.failing_learns > 0 {
            self.failing_learns -= 1;
            return Err(Error::model("transient learn failure"));
        }
        self.learned.push(x.clone());
        Ok(())
    }

    fn learn_many(&mut self, batch: &[Sample]) -> Result<()> {
        self.batch_calls += 1;
        self.learned.extend_from_slice(batch);
        Ok(())
    }

    fn transform_one(&mut self, _x: &Sample) -> Result<Projection> {
        self.transform_calls += 1;
        Ok(Vec::new())
    }

    fn transform_many(&mut self, batch: &[Sample]) -> Result<Vec<Projection>> {
        self.batch_transform_calls += 1;
        batch.iter().map(|x| self.transform_one(x)).collect()
    }
}

impl Revert for CountingModel {
    fn revert(&mut self, x: &Sample) -> Result<()> {
        self.reverted.push(x.clone());
        Ok(())
    }
}

/// Standard test signals
pub struct TestSignals;

impl TestSignals {
    /// `n` samples of feature `x` at `baseline`, switching to `shifted` at `shift_at`
    pub fn mean_shift(n: usize, shift_at: usize, baseline: f64, shifted: f64) -> Vec<Sample> {
        (0..n)
            .map(|i| {
                let v = if i < shift_at { baseline } else { shifted };
                sample([("x", v)])
            })
            .collect()
    }

    /// Two-feature sine wave with Gaussian noise, reproducible from `seed`
    pub fn noisy_sine(n: usize, noise: f64, seed: u64) -> Vec<Sample> {
        let mut rng = StdRng::seed_from_u64(seed);
        let normal = Normal::new(0.0, noise).unwrap();
        (0..n)
            .map(|i| {
                let t = i as f64 * 0.3;
                sample([
                    ("sin", t.sin() + normal.sample(&mut rng)),
                    ("cos", t.cos() + normal.sample(&mut rng)),
                ])
            })
            .collect()
    }
}
