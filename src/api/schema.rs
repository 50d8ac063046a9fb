use serde::{Deserialize, Serialize};

use crate::workflow::feedback::DEFAULT_FEEDBACK_SCORE;
use crate::workflow::input::{DEFAULT_START_HOUR, DEFAULT_TURN_AROUND_TIME};

fn default_start_hour() -> i32 {
    DEFAULT_START_HOUR
}

fn default_turn_around_time() -> i32 {
    DEFAULT_TURN_AROUND_TIME
}

fn default_feedback_score() -> i32 {
    DEFAULT_FEEDBACK_SCORE
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PredictRequest {
    pub session_id: String,
    #[serde(default = "default_start_hour")]
    pub start_hour: i32,
    #[serde(default = "default_turn_around_time")]
    pub turn_around_time: i32,
    pub display_value: String,
    pub proposed_procedure: String,
}

/// One model's feedback controls. Defaults mirror the widget defaults so
/// the pair is always readable.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct FeedbackPair {
    #[serde(default = "default_feedback_score")]
    pub score: i32,
    #[serde(default)]
    pub text: Option<String>,
}

impl Default for FeedbackPair {
    fn default() -> Self {
        Self {
            score: DEFAULT_FEEDBACK_SCORE,
            text: None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct FeedbackRequest {
    pub session_id: String,
    #[serde(default)]
    pub baseline: FeedbackPair,
    #[serde(default)]
    pub improved: FeedbackPair,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PredictionQuery {
    pub session_id: String,
}
