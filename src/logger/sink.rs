use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::error;

use crate::logger::schema::MonitoringRecord;

const CSV_HEADER: &str =
    "timestamp,model_version,model_type,input_summary,prediction,latency_ms,feedback_score,feedback_text";

/// Append-only CSV sink. Each append writes one full line in a single
/// write call; interleaved partial records cannot occur within a process.
#[derive(Debug, Clone)]
pub struct CsvSink {
    path: PathBuf,
}

impl CsvSink {
    /// Open (and create if needed) the monitoring log. The path falls back
    /// to the `MONITORING_LOG_PATH` env var, then to `monitoring_logs.csv`
    /// in the working directory. The header is written when the file is
    /// created, never repeated.
    pub fn new(path: Option<PathBuf>) -> Result<Self> {
        let path = path.unwrap_or_else(|| {
            PathBuf::from(
                std::env::var("MONITORING_LOG_PATH")
                    .unwrap_or_else(|_| "monitoring_logs.csv".to_string()),
            )
        });

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open monitoring log {}", path.display()))?;

        if file
            .metadata()
            .with_context(|| "Failed to stat monitoring log")?
            .len()
            == 0
        {
            let mut file = file;
            file.write_all(format!("{}\n", CSV_HEADER).as_bytes())
                .with_context(|| "Failed to write monitoring log header")?;
        }

        Ok(Self { path })
    }

    pub fn append(&self, record: &MonitoringRecord) -> Result<()> {
        let timestamp = Utc::now().naive_utc();

        let line = format!(
            "{},{},{},{},{},{},{},{}\n",
            timestamp,
            record.model_version.as_str(),
            record.model_type.as_str(),
            escape_field(&record.input_summary),
            record.prediction,
            record.latency_ms,
            record.feedback_score,
            escape_field(&record.feedback_text),
        );

        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open monitoring log {}", self.path.display()))?;

        file.write_all(line.as_bytes())
            .with_context(|| "Failed to append monitoring record")?;

        Ok(())
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

/// In-memory sink for tests. Records every append so callers can assert
/// on count and content.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    records: Arc<Mutex<Vec<MonitoringRecord>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&self, record: &MonitoringRecord) -> Result<()> {
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }

    pub fn records(&self) -> Vec<MonitoringRecord> {
        self.records.lock().unwrap().clone()
    }
}

pub enum FeedbackSink {
    Csv(CsvSink),
    Memory(MemorySink),
}

impl FeedbackSink {
    pub async fn append(&self, record: &MonitoringRecord) -> Result<()> {
        let result = match self {
            Self::Csv(sink) => sink.append(record),
            Self::Memory(sink) => sink.append(record),
        };

        if let Err(e) = &result {
            error!("Failed to append monitoring record: {:?}", e);
        }

        result
    }

    /// Where feedback ends up, for user-facing confirmation messages.
    pub fn describe(&self) -> String {
        match self {
            Self::Csv(sink) => sink.path().display().to_string(),
            Self::Memory(_) => "the in-memory monitoring log".to_string(),
        }
    }
}

fn escape_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::artifact::{ModelType, ModelVersion};

    fn test_record() -> MonitoringRecord {
        MonitoringRecord {
            model_version: ModelVersion::V1Old,
            model_type: ModelType::Baseline,
            input_summary: "StartHour=8, TurnAroundTime=15, DisplayValue=OR 1, ProposedProcedure=COLOSCP - COLONOSCOPY;".to_string(),
            prediction: 36.0,
            latency_ms: 2.5,
            feedback_score: 5,
            feedback_text: "great".to_string(),
        }
    }

    #[test]
    fn test_escape_field() {
        assert_eq!(escape_field("plain"), "plain");
        assert_eq!(escape_field("a,b"), "\"a,b\"");
        assert_eq!(escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_csv_header_written_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("monitoring_logs.csv");

        let sink = CsvSink::new(Some(path.clone())).unwrap();
        sink.append(&test_record()).unwrap();

        // reopening an existing log must not repeat the header
        let sink = CsvSink::new(Some(path.clone())).unwrap();
        sink.append(&test_record()).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], CSV_HEADER);
        assert!(lines[1].contains("v1_old,baseline"));
        assert!(lines[1].contains("\"StartHour=8, TurnAroundTime=15"));
        assert!(lines[1].ends_with(",5,great"));
    }

    #[test]
    fn test_memory_sink_records_appends() {
        let sink = MemorySink::new();

        sink.append(&test_record()).unwrap();
        sink.append(&test_record()).unwrap();

        let records = sink.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].feedback_text, "great");
    }

    #[tokio::test]
    async fn test_sink_append_fails_when_log_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("monitoring_logs.csv");

        let sink = CsvSink::new(Some(path.clone())).unwrap();
        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();

        let sink = FeedbackSink::Csv(sink);
        assert!(sink.append(&test_record()).await.is_err());
    }
}
