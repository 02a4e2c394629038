use crate::domain::model::FetchOutcome;
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Remote lookup of a single event by id. Implementations classify failures
/// into the returned outcome instead of erroring.
#[async_trait]
pub trait EventSource: Send + Sync {
    async fn fetch(&self, id: u32) -> FetchOutcome;
}
