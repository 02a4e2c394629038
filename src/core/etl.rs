use crate::core::fetcher::Fetcher;
use crate::core::transformer::Transformer;
use crate::domain::model::FetchReport;
use crate::domain::ports::{EventSource, Storage};
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;
use std::ops::RangeInclusive;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EtlSummary {
    pub fetch: FetchReport,
    pub rows_written: usize,
    pub csv_path: String,
}

/// Runs the fetch phase, then the transform phase over the file it wrote.
pub struct EtlEngine<E: EventSource, S: Storage> {
    fetcher: Fetcher<E, S>,
    transformer: Transformer<S>,
    monitor: SystemMonitor,
}

impl<E: EventSource, S: Storage> EtlEngine<E, S> {
    pub fn new(fetcher: Fetcher<E, S>, transformer: Transformer<S>) -> Self {
        Self::new_with_monitoring(fetcher, transformer, false)
    }

    pub fn new_with_monitoring(
        fetcher: Fetcher<E, S>,
        transformer: Transformer<S>,
        monitor_enabled: bool,
    ) -> Self {
        Self {
            fetcher,
            transformer,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(
        &self,
        ids: RangeInclusive<u32>,
        delay: Duration,
        csv_path: &str,
    ) -> Result<EtlSummary> {
        tracing::info!("Starting ETL process...");
        self.monitor.log_stats("Start");

        let fetch = self.fetcher.run(ids, delay).await?;
        self.monitor.log_stats("Fetch");

        let rows_written = self
            .transformer
            .run(self.fetcher.output_path(), csv_path)
            .await?;
        self.monitor.log_stats("Transform");
        self.monitor.log_final_stats();

        Ok(EtlSummary {
            fetch,
            rows_written,
            csv_path: csv_path.to_string(),
        })
    }
}
