use serde::{Deserialize, Serialize};

use crate::model::artifact::{ModelType, ModelVersion};
use crate::workflow::feedback::Feedback;
use crate::workflow::state::PredictionResult;

/// One appended monitoring entry: the model's identity and stored
/// prediction together with the user's feedback on it. The sink assigns
/// the timestamp at append time.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MonitoringRecord {
    pub model_version: ModelVersion,
    pub model_type: ModelType,
    pub input_summary: String,
    pub prediction: f64,
    pub latency_ms: f64,
    pub feedback_score: i32,
    pub feedback_text: String,
}

impl MonitoringRecord {
    pub fn from_result(result: &PredictionResult, feedback: &Feedback) -> Self {
        Self {
            model_version: result.model_version,
            model_type: result.model_type,
            input_summary: result.input_summary.clone(),
            prediction: result.prediction,
            latency_ms: result.latency_ms,
            feedback_score: feedback.score,
            feedback_text: feedback.text.clone().unwrap_or_default(),
        }
    }
}
