//! Detector variant reusing projections across score requests
//!
//! When the model reports that its fitted operator has not moved, the
//! projections of samples already in the buffer are still valid and only the
//! newest sample needs transforming. Any other situation falls back to a full
//! retransform.

use crate::dispatch::ModelDispatch;
use crate::engine::ChangeDetectionEngine;
use crate::params::DetectorParameters;
use crate::traits::TransformPolicy;
use subspace_core::{Projection, Result, Sample, SlidingBuffer, SubspaceModel};
use tracing::trace;

/// Transform policy keeping a secondary buffer of projections
#[derive(Debug, Clone)]
pub struct CachedTransform {
    projections: SlidingBuffer<Projection>,
    /// Raw samples behind `projections`, same order
    inputs: SlidingBuffer<Sample>,
    full_transforms: usize,
    incremental_transforms: usize,
}

impl CachedTransform {
    /// Number of times the whole buffer was retransformed
    pub fn full_transforms(&self) -> usize {
        self.full_transforms
    }

    /// Number of times only the newest sample was transformed
    pub fn incremental_transforms(&self) -> usize {
        self.incremental_transforms
    }

    /// Whether the cached projections match every raw sample but the newest
    fn covers_all_but_newest(&self, samples: &SlidingBuffer<Sample>) -> bool {
        let len = samples.len();
        if len == 0 || self.inputs.is_empty() {
            return false;
        }
        // A full cache drops its oldest entry when the newest is appended
        let skip = if self.inputs.len() + 1 == len {
            0
        } else if self.inputs.len() == len && self.inputs.is_full() {
            1
        } else {
            return false;
        };
        self.inputs
            .range(skip..self.inputs.len())
            .eq(samples.range(0..len - 1))
    }
}

impl TransformPolicy for CachedTransform {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            projections: SlidingBuffer::new(capacity),
            inputs: SlidingBuffer::new(capacity),
            full_transforms: 0,
            incremental_transforms: 0,
        }
    }

    fn name(&self) -> &'static str {
        "SubID (cached transforms)"
    }

    fn project<'a, M: SubspaceModel>(
        &'a mut self,
        model: &mut M,
        dispatch: &ModelDispatch,
        samples: &SlidingBuffer<Sample>,
    ) -> Result<&'a SlidingBuffer<Projection>> {
        let stable = dispatch.has_stability_signal()
            && dispatch.stability_target(model)?.operator_unchanged();

        if stable && self.covers_all_but_newest(samples) {
            if let Some(newest) = samples.back() {
                let projection = dispatch.stability_target(model)?.transform_one(newest)?;
                self.projections.push_back(projection);
                self.inputs.push_back(newest.clone());
                self.incremental_transforms += 1;
                trace!(cached = self.projections.len(), "transformed newest sample only");
                return Ok(&self.projections);
            }
        }

        // Projections are cleared before the retransform, so the inputs go too
        self.inputs.clear();
        dispatch.transform_all(model, samples, &mut self.projections)?;
        self.inputs.extend(samples.iter().cloned());
        self.full_transforms += 1;
        trace!(stable, "retransformed whole buffer");
        Ok(&self.projections)
    }
}

/// Change detector that avoids retransforming samples under a stable operator
pub type CachedTransformChangeDetector<M> = ChangeDetectionEngine<M, CachedTransform>;

impl<M: SubspaceModel> ChangeDetectionEngine<M, CachedTransform> {
    /// Create a detector that reuses projections while the operator is stable
    pub fn cached(model: M, params: DetectorParameters) -> Result<Self> {
        Self::with_policy(model, params)
    }

    pub fn full_transforms(&self) -> usize {
        self.policy().full_transforms()
    }

    pub fn incremental_transforms(&self) -> usize {
        self.policy().incremental_transforms()
    }
}
