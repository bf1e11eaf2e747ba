//! Windowed retraining adapter
//!
//! [`Rolling`] turns any revertible model into one fitted over a trailing
//! window: each new sample is learned, and the sample falling out of the
//! window is reverted.

use crate::error::Result;
use crate::sample::{Projection, Sample};
use crate::traits::{Capabilities, Revert, SubspaceModel};
use std::collections::VecDeque;
use tracing::trace;

/// Adapter retraining a wrapped model over a trailing window
#[derive(Debug, Clone)]
pub struct Rolling<M> {
    model: M,
    window_size: Option<usize>,
    window: VecDeque<Sample>,
}

impl<M: SubspaceModel + Revert> Rolling<M> {
    /// Wrap `model`, keeping it fitted on the last `window_size` samples
    pub fn new(model: M, window_size: usize) -> Self {
        Self {
            model,
            window_size: Some(window_size),
            window: VecDeque::with_capacity(window_size + 1),
        }
    }

    /// Wrap `model` without a window; nothing is ever reverted
    pub fn unbounded(model: M) -> Self {
        Self {
            model,
            window_size: None,
            window: VecDeque::new(),
        }
    }

    pub fn inner(&self) -> &M {
        &self.model
    }

    pub fn inner_mut(&mut self) -> &mut M {
        &mut self.model
    }

    pub fn into_inner(self) -> M {
        self.model
    }

    /// Number of samples currently inside the trailing window
    pub fn window_len(&self) -> usize {
        self.window.len()
    }

    fn push_and_revert(&mut self, x: &Sample) -> Result<()> {
        let Some(limit) = self.window_size else {
            return Ok(());
        };
        self.window.push_back(x.clone());
        while self.window.len() > limit {
            if let Some(old) = self.window.pop_front() {
                trace!(window = limit, "reverting sample leaving the window");
                self.model.revert(&old)?;
            }
        }
        Ok(())
    }
}

impl<M: SubspaceModel + Revert> SubspaceModel for Rolling<M> {
    fn capabilities(&self) -> Capabilities {
        Capabilities::WINDOWED_ADAPTER | (self.model.capabilities() & Capabilities::BATCH_TRANSFORM)
    }

    fn learn_one(&mut self, x: &Sample) -> Result<()> {
        self.update(x)
    }

    fn learn_many(&mut self, batch: &[Sample]) -> Result<()> {
        self.update_many(batch)
    }

    fn transform_one(&mut self, x: &Sample) -> Result<Projection> {
        self.model.transform_one(x)
    }

    fn transform_many(&mut self, batch: &[Sample]) -> Result<Vec<Projection>> {
        self.model.transform_many(batch)
    }

    fn operator_unchanged(&mut self) -> bool {
        self.model.operator_unchanged()
    }

    fn window_size(&self) -> Option<usize> {
        self.window_size
    }

    fn update(&mut self, x: &Sample) -> Result<()> {
        self.model.learn_one(x)?;
        self.push_and_revert(x)
    }

    fn update_many(&mut self, batch: &[Sample]) -> Result<()> {
        if self.model.capabilities().contains(Capabilities::BATCH_TRAIN) {
            self.model.learn_many(batch)?;
            for x in batch {
                self.push_and_revert(x)?;
            }
            return Ok(());
        }
        for x in batch {
            self.update(x)?;
        }
        Ok(())
    }

    fn wrapped(&self) -> Option<&dyn SubspaceModel> {
        Some(&self.model)
    }

    fn wrapped_mut(&mut self) -> Option<&mut dyn SubspaceModel> {
        Some(&mut self.model)
    }
}
