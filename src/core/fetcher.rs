use crate::domain::model::{ExtractedDataset, FetchOutcome, FetchReport};
use crate::domain::ports::{EventSource, Storage};
use crate::utils::error::Result;
use std::ops::RangeInclusive;
use std::time::Duration;

/// Sequential, self-throttled walk over an event id range.
pub struct Fetcher<E: EventSource, S: Storage> {
    source: E,
    storage: S,
    output_path: String,
}

impl<E: EventSource, S: Storage> Fetcher<E, S> {
    pub fn new(source: E, storage: S, output_path: impl Into<String>) -> Self {
        Self {
            source,
            storage,
            output_path: output_path.into(),
        }
    }

    pub fn output_path(&self) -> &str {
        &self.output_path
    }

    /// Attempts a single id and logs how it went. Never fails.
    pub async fn fetch_event(&self, id: u32) -> FetchOutcome {
        let outcome = self.source.fetch(id).await;
        match &outcome {
            FetchOutcome::Success(payload) => {
                tracing::info!(id, empty = payload.is_null(), "SUCCESS")
            }
            FetchOutcome::Skipped => tracing::info!(id, "SKIPPED (400)"),
            FetchOutcome::Error { status } => tracing::warn!(id, status, "ERROR"),
            FetchOutcome::NetworkError { message } => {
                tracing::warn!(id, error = %message, "NETWORK ERROR")
            }
        }
        outcome
    }

    /// Attempts every id once, in ascending order, pausing `delay` after each attempt.
    pub async fn collect(
        &self,
        ids: RangeInclusive<u32>,
        delay: Duration,
    ) -> (ExtractedDataset, FetchReport) {
        let mut dataset = Vec::new();
        let mut report = FetchReport::default();

        for id in ids {
            let outcome = self.fetch_event(id).await;
            report.record(&outcome);
            if let Some(payload) = outcome.into_payload() {
                dataset.push(payload);
            }
            tokio::time::sleep(delay).await;
        }

        (dataset, report)
    }

    /// Collects the range and overwrites the output file with the pretty-printed dataset.
    pub async fn run(&self, ids: RangeInclusive<u32>, delay: Duration) -> Result<FetchReport> {
        tracing::info!(
            "Fetching events {}..={} with {:?} between requests",
            ids.start(),
            ids.end(),
            delay
        );

        let (dataset, report) = self.collect(ids, delay).await;

        let json = serde_json::to_string_pretty(&dataset)?;
        self.storage
            .write_file(&self.output_path, json.as_bytes())
            .await?;

        tracing::info!(
            attempted = report.attempted,
            succeeded = report.succeeded,
            skipped = report.skipped,
            errors = report.errors,
            network_errors = report.network_errors,
            "Fetch finished, {} records written to {}",
            dataset.len(),
            self.output_path
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::EtlError;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            self.files.lock().unwrap().get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            self.get_file(path).ok_or_else(|| {
                EtlError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            self.files
                .lock()
                .unwrap()
                .insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    /// Answers by `id % 4`: success, skipped, error, network error. Id 9 is an empty success.
    #[derive(Default)]
    struct ScriptedSource {
        calls: Mutex<Vec<u32>>,
    }

    #[async_trait]
    impl EventSource for ScriptedSource {
        async fn fetch(&self, id: u32) -> FetchOutcome {
            self.calls.lock().unwrap().push(id);
            if id == 9 {
                return FetchOutcome::Success(serde_json::Value::Null);
            }
            match id % 4 {
                1 => FetchOutcome::Success(json!({"event": {"eventId": id}})),
                2 => FetchOutcome::Skipped,
                3 => FetchOutcome::Error { status: 500 },
                _ => FetchOutcome::NetworkError {
                    message: "connection reset".to_string(),
                },
            }
        }
    }

    fn scripted_fetcher(storage: MockStorage, path: &str) -> Fetcher<ScriptedSource, MockStorage> {
        Fetcher::new(ScriptedSource::default(), storage, path)
    }

    #[tokio::test]
    async fn test_every_id_attempted_once_in_order() {
        let fetcher = scripted_fetcher(MockStorage::default(), "data.json");

        let (_, report) = fetcher.collect(1..=12, Duration::ZERO).await;

        let calls = fetcher.source.calls.lock().unwrap().clone();
        assert_eq!(calls, (1..=12).collect::<Vec<_>>());
        assert_eq!(report.attempted, 12);
    }

    #[tokio::test]
    async fn test_dataset_holds_only_successes() {
        let fetcher = scripted_fetcher(MockStorage::default(), "data.json");

        let (dataset, report) = fetcher.collect(1..=8, Duration::ZERO).await;

        assert_eq!(
            dataset,
            vec![
                json!({"event": {"eventId": 1}}),
                json!({"event": {"eventId": 5}})
            ]
        );
        assert_eq!(report.succeeded, 2);
        assert_eq!(report.skipped, 2);
        assert_eq!(report.errors, 2);
        assert_eq!(report.network_errors, 2);
    }

    #[tokio::test]
    async fn test_empty_success_counts_but_is_not_stored() {
        let fetcher = scripted_fetcher(MockStorage::default(), "data.json");

        let (dataset, report) = fetcher.collect(9..=9, Duration::ZERO).await;

        assert!(dataset.is_empty());
        assert_eq!(report.succeeded, 1);
        assert_eq!(report.skipped, 0);
    }

    #[tokio::test]
    async fn test_run_writes_pretty_json_array() {
        let storage = MockStorage::default();
        let fetcher = scripted_fetcher(storage.clone(), "src/func/data.json");

        let report = fetcher.run(1..=5, Duration::ZERO).await.unwrap();
        assert_eq!(report.succeeded, 2);

        let written = storage.get_file("src/func/data.json").unwrap();
        let text = String::from_utf8(written).unwrap();
        assert!(text.starts_with("[\n"));
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pauses_after_every_attempt() {
        let fetcher = scripted_fetcher(MockStorage::default(), "data.json");
        let started = tokio::time::Instant::now();

        fetcher.collect(1..=4, Duration::from_millis(1200)).await;

        assert!(started.elapsed() >= Duration::from_millis(4800));
    }
}
