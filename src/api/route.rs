use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use crate::api::handler::{
    get_models, get_prediction, get_schema, health_check, run_prediction, submit_feedback,
};
use crate::logger::sink::FeedbackSink;
use crate::model::registry::ModelRegistry;
use crate::workflow::store::SessionStore;

pub struct AppState {
    pub registry: ModelRegistry,
    pub sessions: SessionStore,
    pub sink: FeedbackSink,
}

pub fn create_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthcheck", get(health_check))
        .route("/schema", get(get_schema))
        .route("/models", get(get_models))
        .route("/predict", post(run_prediction))
        .route("/predictions", get(get_prediction))
        .route("/feedback", post(submit_feedback))
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
