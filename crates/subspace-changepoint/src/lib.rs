//! Subspace change-point detection
//!
//! This crate detects distribution changes in multivariate streams by fitting
//! a low-dimensional subspace on a reference window and measuring how much
//! worse the same subspace explains a trailing test window.
//!
//! # Detectors
//!
//! - **ChangeDetectionEngine**: buffers `ref_size + lag + test_size` samples,
//!   trains the model on samples that have left the test window, and scores
//!   `D_test / D_train - 1`
//! - **CachedTransformChangeDetector**: the same engine reusing projections
//!   while the model reports a stable operator
//!
//! # Parameter selection
//!
//! - **DefaultParameterSelector**: window sizes and subspace ranks from data,
//!   using a Hankel embedding and the optimal hard threshold
//! - **RankEstimator**: singular value counting with the Gavish–Donoho threshold
//!
//! The subspace model is supplied by the caller through
//! [`subspace_core::SubspaceModel`].
//!
//! ## Usage
//!
//! ```rust
//! use subspace_changepoint::{ChangeDetectionEngine, DetectorParameters};
//! use subspace_core::{sample, Complex64, Projection, Result, Sample, SubspaceModel};
//!
//! // Explains values close to 1.0 and nothing else
//! struct Baseline;
//!
//! impl SubspaceModel for Baseline {
//!     fn learn_one(&mut self, _x: &Sample) -> Result<()> {
//!         Ok(())
//!     }
//!
//!     fn transform_one(&mut self, x: &Sample) -> Result<Projection> {
//!         Ok(x.values()
//!             .map(|&v| if (v - 1.0).abs() < 0.5 { Complex64::new(0.5 * v, 0.0) } else { Complex64::new(0.0, 0.0) })
//!             .collect())
//!     }
//! }
//!
//! let stream: Vec<_> = (0..100)
//!     .map(|i| sample([("x", if i < 50 { 1.0 } else { 3.0 })]))
//!     .collect();
//!
//! let params = DetectorParameters::new(20).with_threshold(10.7);
//! let mut detector = ChangeDetectionEngine::new(Baseline, params).unwrap();
//! let result = detector.scan(&stream).unwrap();
//!
//! assert_eq!(result.first_drift(), Some(69));
//! ```

pub mod cached;
pub mod defaults;
pub mod dispatch;
pub mod engine;
pub mod kernel;
pub mod params;
pub mod traits;
pub mod types;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_models;

pub use cached::{CachedTransform, CachedTransformChangeDetector};
pub use defaults::{
    default_params, default_time_delays, DefaultParameterSelector, DefaultParameters,
    RankEstimator, DEFAULT_MAX_DELAYS, DEFAULT_MAX_RANK, RANK_ESTIMATION_LIMIT,
};
pub use dispatch::ModelDispatch;
pub use engine::{ChangeDetectionEngine, FullTransform};
pub use kernel::ResidualKernel;
pub use params::{DetectorParameters, WindowGeometry};

// Core traits
pub use traits::{ChangePointDetectorProperties, OnlineChangeDetector, TransformPolicy};

pub use types::{ChangePoint, ChangePointResult, DistancePair, ScoreCache, ScoreEntry};
