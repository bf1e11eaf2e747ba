//! Data-driven default parameters
//!
//! Window sizes follow the singular spectrum analysis convention of
//! Moskvina & Zhigljavsky (2003): reference and test windows equal to the
//! window size, embedding depth of half a window. The subspace rank is the
//! number of singular values of the Hankel-embedded data above the optimal
//! hard threshold of Gavish & Donoho (2014).

use crate::params::DetectorParameters;
use hankel_embed::{Embedding, HankelEmbedding};
use nalgebra::DMatrix;
use subspace_core::{Error, Result};
use tracing::{debug, instrument};

/// Cap on the embedding depth used when deriving time delays
pub const DEFAULT_MAX_DELAYS: usize = 100;

/// Embedded column count below which the rank is estimated from data
pub const RANK_ESTIMATION_LIMIT: usize = 100;

/// Default upper bound on the selected rank
pub const DEFAULT_MAX_RANK: usize = 10;

/// Embedding depth and stride for a half-window of `h` samples
///
/// Without a cap, or when `h` is below it, every lag up to `h` is used.
/// Otherwise the depth is capped and the stride spreads the lags over `h`.
pub fn default_time_delays(h: usize, n_features_max: Option<usize>) -> (usize, usize) {
    match n_features_max {
        None => (h, 1),
        Some(cap) if h < cap => (h, 1),
        Some(cap) => (cap, h / cap),
    }
}

/// Optimal hard threshold rank estimator
#[derive(Debug, Clone, Copy, Default)]
pub struct RankEstimator {
    noise_variance: Option<f64>,
}

impl RankEstimator {
    /// Estimator for unknown noise variance
    pub fn new() -> Self {
        Self::default()
    }

    /// Estimator for a known noise variance
    pub fn with_noise_variance(noise_variance: f64) -> Self {
        Self {
            noise_variance: Some(noise_variance),
        }
    }

    /// `ω(β) ≈ 0.56β³ − 0.95β² + 1.82β + 1.43`, the unknown-noise coefficient
    pub fn omega(beta: f64) -> f64 {
        0.56 * beta.powi(3) - 0.95 * beta.powi(2) + 1.82 * beta + 1.43
    }

    /// `λ*(β)`, the known-noise coefficient
    pub fn lambda(beta: f64) -> f64 {
        let denom = (beta + 1.0) + (beta * beta + 14.0 * beta + 1.0).sqrt();
        (2.0 * (beta + 1.0) + 8.0 * beta / denom).sqrt()
    }

    /// Cutoff `τ` for a matrix with `rows` samples, aspect ratio `beta`
    /// and the given singular values
    fn cutoff(&self, rows: usize, beta: f64, singular_values: &[f64]) -> Result<f64> {
        match self.noise_variance {
            None => Ok(Self::omega(beta) * median(singular_values)),
            Some(var) if var.is_finite() && var >= 0.0 => {
                Ok(Self::lambda(beta) * (rows as f64 * var).sqrt())
            }
            Some(var) => Err(Error::InvalidParameter(format!(
                "noise variance must be finite and non-negative, got {var}"
            ))),
        }
    }

    /// Number of singular values of `xᵀ` strictly above the cutoff
    ///
    /// `x` has one row per sample. The result never exceeds
    /// `min(rows, cols)`.
    pub fn estimate(&self, x: &DMatrix<f64>) -> Result<usize> {
        let (n, m) = x.shape();
        if n == 0 || m == 0 {
            return Err(Error::empty_input("rank estimation"));
        }
        let beta = m as f64 / n as f64;

        let singular_values: Vec<f64> = x.transpose().singular_values().iter().copied().collect();
        let tau = self.cutoff(n, beta, &singular_values)?;

        Ok(singular_values.iter().filter(|&&s| s > tau).count())
    }
}

/// Median of a non-empty slice, averaging the middle pair for even lengths
fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_unstable_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let n = sorted.len();
    if n == 0 {
        return 0.0;
    }
    if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    }
}

/// Parameters selected from data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultParameters {
    pub window_size: usize,
    pub ref_size: usize,
    pub test_size: usize,
    pub lag: isize,
    /// Rank of the signal subspace
    pub rank_x: usize,
    /// Rank of the exogenous input subspace, when inputs were given
    pub rank_u: Option<usize>,
}

impl DefaultParameters {
    /// Detector parameters using the selected window sizes
    pub fn detector_parameters(&self) -> DetectorParameters {
        DetectorParameters::new(self.ref_size)
            .with_test_size(self.test_size)
            .with_lag(self.lag)
    }
}

impl From<DefaultParameters> for DetectorParameters {
    fn from(defaults: DefaultParameters) -> Self {
        defaults.detector_parameters()
    }
}

/// Selects window size, lag and ranks from raw data
#[derive(Debug, Clone)]
pub struct DefaultParameterSelector<E = HankelEmbedding> {
    embedding: E,
    window_size: Option<usize>,
    max_rank: usize,
    max_delays: Option<usize>,
    rank_estimator: RankEstimator,
}

impl Default for DefaultParameterSelector<HankelEmbedding> {
    fn default() -> Self {
        Self::new()
    }
}

impl DefaultParameterSelector<HankelEmbedding> {
    /// Selector using the Hankel embedding and default limits
    pub fn new() -> Self {
        Self::with_embedding(HankelEmbedding)
    }
}

impl<E: Embedding> DefaultParameterSelector<E> {
    /// Selector using a custom time-delay embedding
    pub fn with_embedding(embedding: E) -> Self {
        Self {
            embedding,
            window_size: None,
            max_rank: DEFAULT_MAX_RANK,
            max_delays: Some(DEFAULT_MAX_DELAYS),
            rank_estimator: RankEstimator::new(),
        }
    }

    /// Fix the window size; `0` means the length of the data
    pub fn window_size(mut self, window_size: usize) -> Self {
        self.window_size = (window_size > 0).then_some(window_size);
        self
    }

    pub fn max_rank(mut self, max_rank: usize) -> Self {
        self.max_rank = max_rank;
        self
    }

    /// Cap on the embedding depth; `None` embeds every lag
    pub fn max_delays(mut self, max_delays: Option<usize>) -> Self {
        self.max_delays = max_delays;
        self
    }

    pub fn rank_estimator(mut self, rank_estimator: RankEstimator) -> Self {
        self.rank_estimator = rank_estimator;
        self
    }

    /// Rank for one data matrix under the chosen embedding
    fn select_rank(&self, data: &DMatrix<f64>, depth: usize, stride: usize) -> Result<usize> {
        if depth * data.ncols() >= RANK_ESTIMATION_LIMIT {
            return Ok(self.max_rank);
        }
        if depth == 0 {
            return Err(Error::InsufficientData {
                expected: 2,
                actual: data.nrows(),
            });
        }
        let embedded = self.embedding.embed(data, depth, stride)?;
        let rank = self.rank_estimator.estimate(&embedded)?;
        Ok(rank.min(self.max_rank))
    }

    /// Select parameters for signal `x` and optional exogenous input `u`
    ///
    /// Both matrices have one row per time step.
    #[instrument(skip(self, x, u), fields(rows = x.nrows(), features = x.ncols()))]
    pub fn select(&self, x: &DMatrix<f64>, u: Option<&DMatrix<f64>>) -> Result<DefaultParameters> {
        let window_size = self.window_size.unwrap_or_else(|| x.nrows());
        let (depth, stride) = default_time_delays(window_size / 2, self.max_delays);

        let rank_x = self.select_rank(x, depth, stride)?;
        let rank_u = u
            .map(|u| self.select_rank(u, depth, stride))
            .transpose()?;

        debug!(
            window_size,
            depth, stride, rank_x, ?rank_u, "selected default parameters"
        );

        Ok(DefaultParameters {
            window_size,
            ref_size: window_size,
            test_size: window_size,
            lag: 0,
            rank_x,
            rank_u,
        })
    }
}

/// Default parameters for `x` (and `u`) with the standard selector
///
/// `window_size == 0` uses the length of `x`.
pub fn default_params(
    x: &DMatrix<f64>,
    u: Option<&DMatrix<f64>>,
    window_size: usize,
    max_rank: usize,
) -> Result<DefaultParameters> {
    DefaultParameterSelector::new()
        .window_size(window_size)
        .max_rank(max_rank)
        .select(x, u)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::{rngs::StdRng, SeedableRng};
    use rand_distr::{Distribution, Normal};

    /// Rank-2 signal plus small Gaussian noise
    fn low_rank_signal(n: usize) -> DMatrix<f64> {
        let mut rng = StdRng::seed_from_u64(7);
        let noise = Normal::new(0.0, 0.01).unwrap();
        DMatrix::from_fn(n, 1, |i, _| {
            let t = i as f64;
            (0.3 * t).sin() + noise.sample(&mut rng)
        })
    }

    #[test]
    fn test_time_delays() {
        assert_eq!(default_time_delays(40, None), (40, 1));
        assert_eq!(default_time_delays(40, Some(100)), (40, 1));
        assert_eq!(default_time_delays(250, Some(100)), (100, 2));
        assert_eq!(default_time_delays(100, Some(100)), (100, 1));
    }

    #[test]
    fn test_coefficients() {
        // Square matrices: ω(1) = 2.86, λ*(1) = 4/√3
        assert_relative_eq!(RankEstimator::omega(1.0), 2.86, epsilon = 1e-12);
        assert_relative_eq!(RankEstimator::lambda(1.0), 4.0 / 3f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_rank_of_exact_low_rank_matrix() {
        // Outer product of two vectors plus a tiny diagonal: rank 1 signal
        let u = DMatrix::from_fn(30, 1, |i, _| (i as f64 + 1.0).ln());
        let v = DMatrix::from_fn(1, 10, |_, j| j as f64 + 1.0);
        let mut x = &u * &v;
        for k in 0..10 {
            x[(k, k)] += 1e-6;
        }
        let rank = RankEstimator::new().estimate(&x).unwrap();
        assert_eq!(rank, 1);
    }

    #[test]
    fn test_rank_is_deterministic_and_bounded() {
        let x = DMatrix::from_fn(12, 5, |i, j| ((i * 7 + j * 3) % 11) as f64);
        let estimator = RankEstimator::new();
        let a = estimator.estimate(&x).unwrap();
        let b = estimator.estimate(&x).unwrap();
        assert_eq!(a, b);
        assert!(a <= 5);
    }

    #[test]
    fn test_known_noise_variance() {
        let x = DMatrix::from_fn(20, 4, |i, j| if i % 4 == j { 10.0 } else { 0.0 });
        // All four singular values equal sqrt(500) ≈ 22.4
        assert_eq!(RankEstimator::with_noise_variance(0.01).estimate(&x).unwrap(), 4);
        assert_eq!(RankEstimator::with_noise_variance(100.0).estimate(&x).unwrap(), 0);
        assert!(RankEstimator::with_noise_variance(-1.0).estimate(&x).is_err());
    }

    #[test]
    fn test_rank_empty_matrix() {
        let x = DMatrix::<f64>::zeros(0, 3);
        assert!(matches!(
            RankEstimator::new().estimate(&x),
            Err(Error::InsufficientData { .. })
        ));
    }

    #[test]
    fn test_select_small_embedding_estimates_rank() {
        let x = low_rank_signal(60);
        let params = default_params(&x, None, 0, 10).unwrap();
        assert_eq!(params.window_size, 60);
        assert_eq!(params.ref_size, 60);
        assert_eq!(params.test_size, 60);
        assert_eq!(params.lag, 0);
        // A noisy sinusoid occupies a two-dimensional subspace
        assert_eq!(params.rank_x, 2);
        assert_eq!(params.rank_u, None);
    }

    #[test]
    fn test_select_large_embedding_uses_max_rank() {
        let x = DMatrix::from_fn(400, 3, |i, j| (i + j) as f64);
        let params = default_params(&x, None, 200, 7).unwrap();
        // depth 100 * 3 features >= 100
        assert_eq!(params.rank_x, 7);
        assert_eq!(params.window_size, 200);
    }

    #[test]
    fn test_select_with_inputs() {
        let x = low_rank_signal(40);
        let u = DMatrix::from_fn(40, 1, |i, _| if i % 2 == 0 { 1.0 } else { -1.0 });
        let params = default_params(&x, Some(&u), 0, 1).unwrap();
        assert_eq!(params.rank_x, 1);
        assert_eq!(params.rank_u, Some(1));
    }

    #[test]
    fn test_select_too_short() {
        let x = DMatrix::from_fn(1, 1, |_, _| 1.0);
        assert!(default_params(&x, None, 0, 10).is_err());
    }

    #[test]
    fn test_detector_parameters_conversion() {
        let defaults = DefaultParameters {
            window_size: 30,
            ref_size: 30,
            test_size: 30,
            lag: 0,
            rank_x: 3,
            rank_u: None,
        };
        let params: DetectorParameters = defaults.into();
        assert_eq!(params.ref_size, 30);
        assert_eq!(params.effective_test_size(), 30);
        assert!(params.validate().is_ok());
    }
}
