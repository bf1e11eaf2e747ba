//! Capability dispatch resolved once per detector
//!
//! The engine asks a [`ModelDispatch`] how to train and transform; the
//! capability flags are read at construction and never again.

use subspace_core::{
    Capabilities, Error, Projection, Result, Sample, SlidingBuffer, SubspaceModel,
};
use tracing::trace;

/// Capabilities of a model and of its stability target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelDispatch {
    model: Capabilities,
    target: Capabilities,
}

impl ModelDispatch {
    /// Read the capabilities of `model`
    ///
    /// For a windowed adapter the stability target is the wrapped model; an
    /// adapter that exposes none is a configuration error.
    pub fn resolve<M: SubspaceModel>(model: &M) -> Result<Self> {
        let caps = model.capabilities();
        let target = if caps.contains(Capabilities::WINDOWED_ADAPTER) {
            model
                .wrapped()
                .ok_or_else(|| {
                    Error::InvalidParameter(
                        "windowed adapter does not expose a wrapped model".to_string(),
                    )
                })?
                .capabilities()
        } else {
            caps
        };
        Ok(Self {
            model: caps,
            target,
        })
    }

    pub fn model_capabilities(&self) -> Capabilities {
        self.model
    }

    /// Capabilities of the model whose operator stability is tracked
    pub fn target_capabilities(&self) -> Capabilities {
        self.target
    }

    pub fn is_windowed(&self) -> bool {
        self.model.contains(Capabilities::WINDOWED_ADAPTER)
    }

    /// Whether the stability target reports `operator_unchanged`
    pub fn has_stability_signal(&self) -> bool {
        self.target.contains(Capabilities::STABILITY_SIGNAL)
    }

    /// Train on one sample
    pub fn train_one<M: SubspaceModel>(&self, model: &mut M, x: &Sample) -> Result<()> {
        if self.is_windowed() {
            model.update(x)
        } else {
            model.learn_one(x)
        }
    }

    /// Train on a contiguous slice
    pub fn train_many<M: SubspaceModel>(&self, model: &mut M, batch: &[Sample]) -> Result<()> {
        if self.is_windowed() {
            model.update_many(batch)
        } else if self.model.contains(Capabilities::BATCH_TRAIN) {
            model.learn_many(batch)
        } else {
            batch.iter().try_for_each(|x| model.learn_one(x))
        }
    }

    /// Replace `out` with the projection of every sample in `samples`
    pub fn transform_all<M: SubspaceModel>(
        &self,
        model: &mut M,
        samples: &SlidingBuffer<Sample>,
        out: &mut SlidingBuffer<Projection>,
    ) -> Result<()> {
        out.clear();
        if self.model.contains(Capabilities::BATCH_TRANSFORM) {
            let batch = samples.to_vec();
            let projections = model.transform_many(&batch)?;
            if projections.len() != batch.len() {
                return Err(Error::size_mismatch(
                    batch.len(),
                    projections.len(),
                    "transform_many output",
                ));
            }
            out.extend(projections);
        } else {
            for x in samples.iter() {
                out.push_back(model.transform_one(x)?);
            }
        }
        trace!(count = out.len(), "transformed buffer");
        Ok(())
    }

    /// The model whose operator stability is tracked
    pub fn stability_target<'m, M: SubspaceModel>(
        &self,
        model: &'m mut M,
    ) -> Result<&'m mut dyn SubspaceModel> {
        if self.is_windowed() {
            model.wrapped_mut().ok_or_else(|| {
                Error::InvalidParameter(
                    "windowed adapter does not expose a wrapped model".to_string(),
                )
            })
        } else {
            Ok(model)
        }
    }
}
