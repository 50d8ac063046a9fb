use anyhow::Context;
use surgical_predict_server::api::route::create_router;
use surgical_predict_server::api::setup::{build_app_state, init_tracing};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    init_tracing();

    let app_state = build_app_state()?;
    let app = create_router(app_state);

    info!("🚀 Server started successfully");

    let port = std::env::var("SERVER_PORT").unwrap_or_else(|_| "8000".to_string());

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .with_context(|| format!("Failed to bind to port {}", port))?;

    axum::serve(listener, app)
        .await
        .with_context(|| "Server error")?;

    Ok(())
}
