//! Subspace model capability contract
//!
//! Change detectors drive an externally supplied model through this trait.
//! Optional behaviour (batch training, batch transform, a stability signal,
//! the windowed-retraining adapter shape) is advertised through
//! [`Capabilities`] and resolved once when a detector is constructed, so
//! dispatch never inspects the model's type per call.

use crate::error::Result;
use crate::sample::{Projection, Sample};
use bitflags::bitflags;

bitflags! {
    /// Optional behaviour a subspace model supports
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Capabilities: u8 {
        /// `learn_many` trains on a whole batch in one call
        const BATCH_TRAIN = 0b0001;
        /// `transform_many` is cheaper than repeated `transform_one`
        const BATCH_TRANSFORM = 0b0010;
        /// `operator_unchanged` reports whether the fitted operator moved
        const STABILITY_SIGNAL = 0b0100;
        /// The model retrains a wrapped model over a trailing window
        const WINDOWED_ADAPTER = 0b1000;
    }
}

/// An incrementally trainable subspace transform
///
/// Only `learn_one` and `transform_one` are required. The remaining methods
/// have default implementations and are consulted by detectors only when
/// the matching [`Capabilities`] flag is advertised.
pub trait SubspaceModel {
    /// Capabilities this model supports
    fn capabilities(&self) -> Capabilities {
        Capabilities::empty()
    }

    /// Train on a single sample
    fn learn_one(&mut self, x: &Sample) -> Result<()>;

    /// Train on a contiguous batch
    fn learn_many(&mut self, batch: &[Sample]) -> Result<()> {
        for x in batch {
            self.learn_one(x)?;
        }
        Ok(())
    }

    /// Project a single sample onto the model's subspace
    fn transform_one(&mut self, x: &Sample) -> Result<Projection>;

    /// Project a batch of samples, preserving order
    fn transform_many(&mut self, batch: &[Sample]) -> Result<Vec<Projection>> {
        batch.iter().map(|x| self.transform_one(x)).collect()
    }

    /// Whether the fitted operator is numerically unchanged since the last check
    fn operator_unchanged(&mut self) -> bool {
        false
    }

    /// Trailing window length of a windowed adapter (`None` = unbounded)
    fn window_size(&self) -> Option<usize> {
        None
    }

    /// Windowed adapter entry point for a single sample
    fn update(&mut self, x: &Sample) -> Result<()> {
        self.learn_one(x)
    }

    /// Windowed adapter entry point for a batch
    fn update_many(&mut self, batch: &[Sample]) -> Result<()> {
        for x in batch {
            self.update(x)?;
        }
        Ok(())
    }

    /// The model wrapped by a windowed adapter
    fn wrapped(&self) -> Option<&dyn SubspaceModel> {
        None
    }

    /// Mutable access to the model wrapped by a windowed adapter
    fn wrapped_mut(&mut self) -> Option<&mut dyn SubspaceModel> {
        None
    }
}

/// Models that can unlearn a previously learned sample
///
/// Required by [`crate::Rolling`] to keep a model fitted over a trailing
/// window only.
pub trait Revert {
    /// Remove the contribution of a sample learned earlier
    fn revert(&mut self, x: &Sample) -> Result<()>;
}

impl<M: SubspaceModel + ?Sized> SubspaceModel for Box<M> {
    fn capabilities(&self) -> Capabilities {
        (**self).capabilities()
    }

    fn learn_one(&mut self, x: &Sample) -> Result<()> {
        (**self).learn_one(x)
    }

    fn learn_many(&mut self, batch: &[Sample]) -> Result<()> {
        (**self).learn_many(batch)
    }

    fn transform_one(&mut self, x: &Sample) -> Result<Projection> {
        (**self).transform_one(x)
    }

    fn transform_many(&mut self, batch: &[Sample]) -> Result<Vec<Projection>> {
        (**self).transform_many(batch)
    }

    fn operator_unchanged(&mut self) -> bool {
        (**self).operator_unchanged()
    }

    fn window_size(&self) -> Option<usize> {
        (**self).window_size()
    }

    fn update(&mut self, x: &Sample) -> Result<()> {
        (**self).update(x)
    }

    fn update_many(&mut self, batch: &[Sample]) -> Result<()> {
        (**self).update_many(batch)
    }

    fn wrapped(&self) -> Option<&dyn SubspaceModel> {
        (**self).wrapped()
    }

    fn wrapped_mut(&mut self) -> Option<&mut dyn SubspaceModel> {
        (**self).wrapped_mut()
    }
}
