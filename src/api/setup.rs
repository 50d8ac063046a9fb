use std::io;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::fmt::time::UtcTime;

use crate::api::route::AppState;
use crate::logger::sink::{CsvSink, FeedbackSink};
use crate::model::registry::ModelRegistry;
use crate::workflow::store::SessionStore;

const DEFAULT_TIME_PATTERN: &str =
    "[year]-[month]-[day]T[hour repr:24]:[minute]:[second]::[subsecond digits:4]";

/// Install the global JSON log collector, configured via RUST_LOG.
pub fn init_tracing() {
    let time_format = time::format_description::parse(DEFAULT_TIME_PATTERN).unwrap();

    tracing_subscriber::fmt()
        .json()
        .with_target(false)
        .flatten_event(true)
        .with_thread_ids(true)
        .with_timer(UtcTime::new(time_format))
        .with_writer(io::stdout)
        .init();
}

/// Build the shared application state: both models loaded once for the
/// process lifetime, an empty session store, and the monitoring log sink.
pub fn build_app_state() -> Result<Arc<AppState>, anyhow::Error> {
    let registry =
        ModelRegistry::load(None, None).with_context(|| "Failed to load prediction models")?;

    let sink = CsvSink::new(None).with_context(|| "Failed to open monitoring log")?;

    Ok(Arc::new(AppState {
        registry,
        sessions: SessionStore::new(),
        sink: FeedbackSink::Csv(sink),
    }))
}
