use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use tracing::error;

use crate::api::route::AppState;
use crate::api::schema::{FeedbackRequest, PredictRequest, PredictionQuery};
use crate::logger::schema::MonitoringRecord;
use crate::workflow::feedback::{
    Feedback, DEFAULT_FEEDBACK_SCORE, FEEDBACK_SCORE_MAX, FEEDBACK_SCORE_MIN,
};
use crate::workflow::input::{
    InputRecord, DEFAULT_START_HOUR, DEFAULT_TURN_AROUND_TIME, DISPLAY_VALUES,
    PROPOSED_PROCEDURES, START_HOUR_MAX, START_HOUR_MIN, TURN_AROUND_TIME_MAX,
    TURN_AROUND_TIME_MIN,
};

pub async fn health_check() -> impl IntoResponse {
    const MESSAGE: &str = "Alive";

    let json_response = serde_json::json!({
        "status": "success",
        "message": MESSAGE
    });

    Json(json_response)
}

/// Input domains and defaults, so a client can render the controls.
pub async fn get_schema() -> impl IntoResponse {
    Json(json!({
        "status": "success",
        "data": {
            "start_hour": {
                "min": START_HOUR_MIN,
                "max": START_HOUR_MAX,
                "default": DEFAULT_START_HOUR
            },
            "turn_around_time": {
                "min": TURN_AROUND_TIME_MIN,
                "max": TURN_AROUND_TIME_MAX,
                "default": DEFAULT_TURN_AROUND_TIME
            },
            "display_values": DISPLAY_VALUES,
            "proposed_procedures": PROPOSED_PROCEDURES,
            "feedback_score": {
                "min": FEEDBACK_SCORE_MIN,
                "max": FEEDBACK_SCORE_MAX,
                "default": DEFAULT_FEEDBACK_SCORE
            }
        }
    }))
}

pub async fn get_models(State(data): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({
        "status": "success",
        "data": [
            data.registry.baseline().info(),
            data.registry.improved().info()
        ]
    }))
}

pub async fn run_prediction(
    State(data): State<Arc<AppState>>,
    Json(body): Json<PredictRequest>,
) -> Result<impl IntoResponse, (StatusCode, Json<serde_json::Value>)> {
    let input = match InputRecord::new(
        body.start_hour,
        body.turn_around_time,
        &body.display_value,
        &body.proposed_procedure,
    ) {
        Ok(input) => input,
        Err(e) => {
            let json_response = json!({
                "status": "error",
                "message": format!("{}", e)
            });
            return Err((StatusCode::BAD_REQUEST, Json(json_response)));
        }
    };

    let current = data.sessions.get(&body.session_id).await;

    match current.run_prediction(&data.registry, &input) {
        Ok(next) => {
            data.sessions.commit(&body.session_id, next.clone()).await;

            Ok(Json(json!({
                "status": "success",
                "data": next
            })))
        }
        Err(e) => {
            error!(
                "Prediction failed for session {}: {:?}",
                body.session_id, e
            );
            let json_response = json!({
                "status": "error",
                "message": format!("{:?}", e)
            });
            Err((StatusCode::INTERNAL_SERVER_ERROR, Json(json_response)))
        }
    }
}

/// Current workflow state for display. Survives any number of reads.
pub async fn get_prediction(
    State(data): State<Arc<AppState>>,
    params: Query<PredictionQuery>,
) -> impl IntoResponse {
    let state = data.sessions.get(&params.session_id).await;

    if state.ready {
        Json(json!({
            "status": "success",
            "data": state
        }))
    } else {
        Json(json!({
            "status": "success",
            "data": state,
            "message": "Run a prediction to see model outputs before giving feedback"
        }))
    }
}

pub async fn submit_feedback(
    State(data): State<Arc<AppState>>,
    Json(body): Json<FeedbackRequest>,
) -> Result<impl IntoResponse, (StatusCode, Json<serde_json::Value>)> {
    let baseline_feedback = Feedback::new(body.baseline.score, body.baseline.text.clone());
    let improved_feedback = Feedback::new(body.improved.score, body.improved.text.clone());

    let (baseline_feedback, improved_feedback) = match (baseline_feedback, improved_feedback) {
        (Ok(baseline), Ok(improved)) => (baseline, improved),
        (Err(e), _) | (_, Err(e)) => {
            let json_response = json!({
                "status": "error",
                "message": format!("{}", e)
            });
            return Err((StatusCode::BAD_REQUEST, Json(json_response)));
        }
    };

    let state = data.sessions.get(&body.session_id).await;

    let Some((old_result, new_result)) = state.results() else {
        let json_response = json!({
            "status": "error",
            "message": "Run the prediction first, then submit your feedback"
        });
        return Err((StatusCode::CONFLICT, Json(json_response)));
    };

    // one record per model, sharing the stored summary and latency
    let records = [
        MonitoringRecord::from_result(old_result, &baseline_feedback),
        MonitoringRecord::from_result(new_result, &improved_feedback),
    ];

    for record in &records {
        if let Err(e) = data.sink.append(record).await {
            error!(
                "Failed to log feedback for session {}: {:?}",
                body.session_id, e
            );
            let json_response = json!({
                "status": "error",
                "message": format!("{:?}", e)
            });
            return Err((StatusCode::INTERNAL_SERVER_ERROR, Json(json_response)));
        }
    }

    Ok(Json(json!({
        "status": "success",
        "message": format!(
            "Feedback and predictions have been saved to {}",
            data.sink.describe()
        )
    })))
}
