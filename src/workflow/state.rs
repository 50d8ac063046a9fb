use std::time::Instant;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::artifact::{ModelType, ModelVersion};
use crate::model::registry::ModelRegistry;
use crate::workflow::input::InputRecord;

/// One model's committed prediction. Both results of a run share the same
/// latency_ms and input_summary.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PredictionResult {
    pub model_version: ModelVersion,
    pub model_type: ModelType,
    pub prediction: f64,
    pub latency_ms: f64,
    pub input_summary: String,
}

/// Session-scoped workflow state. Starts not-ready; becomes ready on the
/// first successful prediction run and stays ready for the rest of the
/// session. Re-runs overwrite the whole state, never parts of it.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct WorkflowState {
    pub ready: bool,
    pub old_result: Option<PredictionResult>,
    pub new_result: Option<PredictionResult>,
}

impl WorkflowState {
    /// Run both models against the captured input and return the next
    /// state. The caller commits the returned state wholesale; on error
    /// nothing is committed and the prior state stays in place.
    ///
    /// Both invocations are timed as one span. The logged latency is the
    /// combined measurement, not a per-model one.
    pub fn run_prediction(
        &self,
        registry: &ModelRegistry,
        input: &InputRecord,
    ) -> Result<WorkflowState> {
        let started = Instant::now();

        let old_prediction = registry
            .baseline()
            .predict(input)
            .with_context(|| "Baseline model prediction failed")?;

        let new_prediction = registry
            .improved()
            .predict(input)
            .with_context(|| "Improved model prediction failed")?;

        let latency_ms = started.elapsed().as_secs_f64() * 1000.0;
        let input_summary = input.summary();

        Ok(WorkflowState {
            ready: true,
            old_result: Some(PredictionResult {
                model_version: registry.baseline().version,
                model_type: registry.baseline().model_type,
                prediction: old_prediction,
                latency_ms,
                input_summary: input_summary.clone(),
            }),
            new_result: Some(PredictionResult {
                model_version: registry.improved().version,
                model_type: registry.improved().model_type,
                prediction: new_prediction,
                latency_ms,
                input_summary,
            }),
        })
    }

    /// Both results, present only once the state is ready.
    pub fn results(&self) -> Option<(&PredictionResult, &PredictionResult)> {
        match (self.ready, &self.old_result, &self.new_result) {
            (true, Some(old), Some(new)) => Some((old, new)),
            _ => None,
        }
    }
}
