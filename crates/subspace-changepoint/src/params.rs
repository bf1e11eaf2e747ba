//! Detector configuration

use serde::{Deserialize, Serialize};
use subspace_core::{Error, Result};

/// Parameters of a subspace change detector
///
/// Window layout for `ref_size = test_size = 3`, `lag = 1`
/// (`x` reference, `o` test, `w` both, `.` neither):
///
/// ```text
/// start_soon = true            start_soon = false
///  4: xwwo  (started)           4: .ooo
///  5: xxwoo                     5: x.ooo
///  6: xxxooo                    6: xx.ooo
///  7: xxx.ooo                   7: xxx.ooo  (started)
///  8: .xxx.ooo                  8: .xxx.ooo
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorParameters {
    /// Reference window size; 0 takes the window of a windowed adapter
    pub ref_size: usize,
    /// Test window size; `None` uses `ref_size`
    pub test_size: Option<usize>,
    /// Drift is declared when the score exceeds this value
    pub threshold: f64,
    /// Gap between the reference and test windows
    pub lag: isize,
    /// Samples to ingest before any score is produced
    pub grace_period: usize,
    /// Keep training the model once the grace period is over
    pub learn_after_grace: bool,
    /// Score with overlapping windows before the buffer is full
    pub start_soon: bool,
}

impl Default for DetectorParameters {
    fn default() -> Self {
        Self {
            ref_size: 0,
            test_size: None,
            threshold: 0.25,
            lag: 0,
            grace_period: 0,
            learn_after_grace: true,
            start_soon: false,
        }
    }
}

impl DetectorParameters {
    /// Parameters with the given reference window and defaults elsewhere
    pub fn new(ref_size: usize) -> Self {
        Self {
            ref_size,
            ..Self::default()
        }
    }

    pub fn with_test_size(mut self, test_size: usize) -> Self {
        self.test_size = Some(test_size);
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_lag(mut self, lag: isize) -> Self {
        self.lag = lag;
        self
    }

    pub fn with_grace_period(mut self, grace_period: usize) -> Self {
        self.grace_period = grace_period;
        self
    }

    pub fn with_learn_after_grace(mut self, learn_after_grace: bool) -> Self {
        self.learn_after_grace = learn_after_grace;
        self
    }

    pub fn with_start_soon(mut self, start_soon: bool) -> Self {
        self.start_soon = start_soon;
        self
    }

    /// Test window size after defaulting
    pub fn effective_test_size(&self) -> usize {
        self.test_size.unwrap_or(self.ref_size)
    }

    /// Check sizes and lag, returning the resolved window geometry
    pub fn validate(&self) -> Result<WindowGeometry> {
        if self.ref_size == 0 {
            return Err(Error::InvalidParameter(
                "ref_size must be positive".to_string(),
            ));
        }
        let test_size = self.effective_test_size();
        if test_size == 0 {
            return Err(Error::InvalidParameter(
                "test_size must be positive".to_string(),
            ));
        }
        let test_span = test_size as isize + self.lag;
        if test_span < 0 {
            return Err(Error::InvalidParameter(format!(
                "test_size + lag must be non-negative, got {test_size} + {}",
                self.lag
            )));
        }
        if self.threshold.is_nan() {
            return Err(Error::InvalidParameter(format!(
                "threshold must be a number, got {}",
                self.threshold
            )));
        }

        let learn_delay = test_span as usize;
        Ok(WindowGeometry {
            ref_size: self.ref_size,
            test_size,
            learn_delay,
            capacity: self.ref_size + learn_delay,
        })
    }
}

/// Validated window sizes derived from [`DetectorParameters`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowGeometry {
    pub ref_size: usize,
    pub test_size: usize,
    /// Fixed training delay `lag + test_size`
    pub learn_delay: usize,
    /// Buffer capacity `ref_size + lag + test_size`
    pub capacity: usize,
}
