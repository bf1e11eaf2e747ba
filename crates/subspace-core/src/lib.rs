//! Core types for subspace-based change detection
//!
//! This crate provides the building blocks shared by the detectors in
//! `subspace-changepoint`:
//!
//! - **Samples and projections**: keyed observations and their complex-valued
//!   subspace coordinates
//! - **SlidingBuffer**: a fixed-capacity ring buffer with exact undo support
//! - **SubspaceModel**: the capability contract an external model implements
//! - **Rolling**: an adapter retraining a revertible model over a trailing window
//!
//! # Example
//!
//! ```rust
//! use subspace_core::{sample, SlidingBuffer};
//!
//! let mut buffer = SlidingBuffer::new(2);
//! buffer.push_back(sample([("x", 1.0)]));
//! buffer.push_back(sample([("x", 2.0)]));
//! let evicted = buffer.push_back(sample([("x", 3.0)]));
//!
//! assert_eq!(evicted.unwrap()["x"], 1.0);
//! assert_eq!(buffer.len(), 2);
//! ```

pub mod buffer;
pub mod error;
pub mod rolling;
pub mod sample;
pub mod traits;

// Re-export core types
pub use buffer::SlidingBuffer;
pub use error::{Error, Result};
pub use rolling::Rolling;
pub use sample::{
    complex_sum_of_squares, sample, sum_of_squares, to_matrix, Projection, Sample,
};
pub use traits::{Capabilities, Revert, SubspaceModel};

pub use num_complex::Complex64;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        sample, Capabilities, Complex64, Error, Projection, Result, Revert, Rolling, Sample,
        SlidingBuffer, SubspaceModel,
    };
}
