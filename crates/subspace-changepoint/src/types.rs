//! Types used for subspace change detection

use num_complex::Complex64;
use std::fmt;

/// Normalized residuals of the reference and test windows
///
/// Complex-valued so that spectral projections pass through unchanged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistancePair {
    /// Residual of the reference (training) window
    pub train: Complex64,
    /// Residual of the test window
    pub test: Complex64,
}

impl DistancePair {
    /// Value reported while the detector is warming up
    pub const NEUTRAL: Self = Self {
        train: Complex64::new(1.0, 0.0),
        test: Complex64::new(1.0, 0.0),
    };

    pub fn new(train: Complex64, test: Complex64) -> Self {
        Self { train, test }
    }

    /// Whether this is the warm-up placeholder
    pub fn is_neutral(&self) -> bool {
        *self == Self::NEUTRAL
    }
}

impl Default for DistancePair {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

impl From<DistancePair> for (Complex64, Complex64) {
    fn from(pair: DistancePair) -> Self {
        (pair.train, pair.test)
    }
}

impl fmt::Display for DistancePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(D_train: {:.4}, D_test: {:.4})", self.train, self.test)
    }
}

/// Distances, score and drift decision computed together for one buffer state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreEntry {
    pub distances: DistancePair,
    pub score: f64,
    pub drift_detected: bool,
}

/// Cached score state
///
/// `Stale` keeps the last entry readable after a mutation; accessors that
/// need a current value recompute it, while `predict_one` reports it as is.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ScoreCache {
    /// Nothing computed yet
    #[default]
    Unset,
    /// Computed for an earlier buffer state
    Stale(ScoreEntry),
    /// Computed for the current buffer state
    Valid(ScoreEntry),
}

impl ScoreCache {
    /// Entry for the current buffer state, if any
    pub fn valid(&self) -> Option<&ScoreEntry> {
        match self {
            ScoreCache::Valid(entry) => Some(entry),
            _ => None,
        }
    }

    /// Most recently computed entry, current or not
    pub fn last(&self) -> Option<&ScoreEntry> {
        match self {
            ScoreCache::Unset => None,
            ScoreCache::Stale(entry) | ScoreCache::Valid(entry) => Some(entry),
        }
    }

    /// Mark the entry as belonging to an earlier state
    pub fn invalidate(&mut self) {
        if let ScoreCache::Valid(entry) = *self {
            *self = ScoreCache::Stale(entry);
        }
    }

    /// Store a freshly computed entry
    pub fn store(&mut self, entry: ScoreEntry) -> ScoreEntry {
        *self = ScoreCache::Valid(entry);
        entry
    }
}

/// Represents a detected changepoint
#[derive(Debug, Clone, PartialEq)]
pub struct ChangePoint {
    /// Index in the stream where drift was declared
    pub index: usize,
    /// Confidence score for this changepoint (0.0 to 1.0)
    pub confidence: f64,
    /// Raw detector score at this index
    pub score: f64,
}

impl ChangePoint {
    /// Create a new changepoint
    pub fn new(index: usize, confidence: f64, score: f64) -> Self {
        Self {
            index,
            confidence,
            score,
        }
    }
}

impl fmt::Display for ChangePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ChangePoint {{ index: {}, confidence: {:.3}, score: {:.3} }}",
            self.index, self.confidence, self.score
        )
    }
}

/// Result of replaying a stream through a detector
#[derive(Debug, Clone)]
pub struct ChangePointResult {
    /// List of detected changepoints
    changepoints: Vec<ChangePoint>,
    /// Algorithm used for detection
    algorithm: String,
    /// Total number of data points analyzed
    sample_size: usize,
    /// Score recorded for every sample
    statistics: Vec<f64>,
}

impl ChangePointResult {
    /// Create a new changepoint result
    pub fn new(
        changepoints: Vec<ChangePoint>,
        algorithm: String,
        sample_size: usize,
        statistics: Vec<f64>,
    ) -> Self {
        Self {
            changepoints,
            algorithm,
            sample_size,
            statistics,
        }
    }

    /// Get the detected changepoints
    pub fn changepoints(&self) -> &[ChangePoint] {
        &self.changepoints
    }

    /// Get the number of detected changepoints
    pub fn count(&self) -> usize {
        self.changepoints.len()
    }

    /// Check if any changepoints were detected
    pub fn has_changepoints(&self) -> bool {
        !self.changepoints.is_empty()
    }

    /// Get the algorithm name used for detection
    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }

    /// Get the sample size that was analyzed
    pub fn sample_size(&self) -> usize {
        self.sample_size
    }

    /// Per-sample scores
    pub fn statistics(&self) -> &[f64] {
        &self.statistics
    }

    /// Index of the first declared drift
    pub fn first_drift(&self) -> Option<usize> {
        self.changepoints.first().map(|cp| cp.index)
    }

    /// Get changepoints with confidence above a threshold
    pub fn confident_changepoints(&self, min_confidence: f64) -> Vec<&ChangePoint> {
        self.changepoints
            .iter()
            .filter(|cp| cp.confidence >= min_confidence)
            .collect()
    }

    /// Get the most confident changepoint
    pub fn most_confident(&self) -> Option<&ChangePoint> {
        self.changepoints
            .iter()
            .max_by(|a, b| a.confidence.total_cmp(&b.confidence))
    }
}

impl fmt::Display for ChangePointResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ChangePoint Detection Result:")?;
        writeln!(f, "  Algorithm: {}", self.algorithm)?;
        writeln!(f, "  Sample size: {}", self.sample_size)?;
        writeln!(f, "  Changepoints detected: {}", self.count())?;

        if !self.changepoints.is_empty() {
            writeln!(f, "  Detected changepoints:")?;
            for cp in &self.changepoints {
                writeln!(f, "    {}", cp)?;
            }
        }

        Ok(())
    }
}
