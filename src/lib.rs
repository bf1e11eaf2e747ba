//! Streaming drift detection with subspace identification models
//!
//! This crate re-exports the workspace crates:
//!
//! - [`types`]: samples, the sliding buffer, the `SubspaceModel` contract and
//!   the `Rolling` adapter
//! - [`embed`]: Hankel time-delay embedding
//! - [`changepoint`]: the change detectors and data-driven defaults
//!
//! # Example
//!
//! ```rust
//! use subspace_drift::prelude::*;
//!
//! // Keeps a fixed share of every sample's energy
//! struct Shrink;
//!
//! impl SubspaceModel for Shrink {
//!     fn learn_one(&mut self, _x: &Sample) -> Result<()> {
//!         Ok(())
//!     }
//!
//!     fn transform_one(&mut self, x: &Sample) -> Result<Projection> {
//!         Ok(x.values().map(|&v| Complex64::new(0.5 * v, 0.0)).collect())
//!     }
//! }
//!
//! let mut detector = ChangeDetectionEngine::new(Shrink, DetectorParameters::new(4)).unwrap();
//! for i in 0..10 {
//!     detector.learn_one(&sample([("x", 1.0 + (i % 2) as f64)])).unwrap();
//! }
//! assert!(!detector.drift_detected().unwrap());
//! ```

pub use hankel_embed as embed;
pub use subspace_changepoint as changepoint;
pub use subspace_core as types;

pub use subspace_changepoint::{
    default_params, CachedTransformChangeDetector, ChangeDetectionEngine, ChangePointResult,
    DefaultParameterSelector, DetectorParameters, DistancePair, OnlineChangeDetector,
    RankEstimator,
};
pub use subspace_core::{Capabilities, Error, Result, Rolling, Sample, SubspaceModel};

/// Prelude module for convenient imports
pub mod prelude {
    pub use subspace_changepoint::{
        CachedTransformChangeDetector, ChangeDetectionEngine, ChangePointDetectorProperties,
        DetectorParameters, OnlineChangeDetector,
    };
    pub use subspace_core::prelude::*;
}
