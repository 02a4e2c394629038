#[cfg(feature = "cli")]
pub mod cli;
pub mod keywords;

use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{validate_id_range, validate_path, validate_url, Validate};
use std::ops::RangeInclusive;
use std::time::Duration;

pub use keywords::KeywordTable;

pub const BASE_URL_ENV: &str = "WAHIS_API";
pub const DEFAULT_FIRST_ID: u32 = 1;
pub const DEFAULT_LAST_ID: u32 = 7260;
pub const DEFAULT_DELAY_MS: u64 = 1200;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_JSON_PATH: &str = "src/func/data.json";
pub const DEFAULT_CSV_PATH: &str = "src/data/dataset.csv";

/// Loads `.env` from the working directory if there is one.
pub fn load_dotenv() {
    if let Err(e) = dotenvy::dotenv() {
        if !matches!(e, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound)
        {
            eprintln!("Warning: Failed to load .env file: {e}");
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchConfig {
    pub base_url: String,
    pub first_id: u32,
    pub last_id: u32,
    pub delay: Duration,
    pub request_timeout: Duration,
    pub output_path: String,
}

impl FetchConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            first_id: DEFAULT_FIRST_ID,
            last_id: DEFAULT_LAST_ID,
            delay: Duration::from_millis(DEFAULT_DELAY_MS),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            output_path: DEFAULT_JSON_PATH.to_string(),
        }
    }

    /// Reads the base URL from `WAHIS_API`; its absence is fatal.
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var(BASE_URL_ENV).map_err(|_| EtlError::MissingConfig {
            field: BASE_URL_ENV.to_string(),
        })?;
        Ok(Self::new(base_url))
    }

    pub fn id_range(&self) -> RangeInclusive<u32> {
        self.first_id..=self.last_id
    }
}

impl Validate for FetchConfig {
    fn validate(&self) -> Result<()> {
        validate_url("base_url", &self.base_url)?;
        validate_id_range(self.first_id, self.last_id)?;
        validate_path("output_path", &self.output_path)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransformConfig {
    pub input_path: String,
    pub output_path: String,
    pub keywords_path: Option<String>,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            input_path: DEFAULT_JSON_PATH.to_string(),
            output_path: DEFAULT_CSV_PATH.to_string(),
            keywords_path: None,
        }
    }
}

impl TransformConfig {
    pub fn keyword_table(&self) -> Result<KeywordTable> {
        match &self.keywords_path {
            Some(path) => {
                tracing::info!("Loading intervention keywords from {}", path);
                KeywordTable::from_file(path)
            }
            None => Ok(KeywordTable::default()),
        }
    }
}

impl Validate for TransformConfig {
    fn validate(&self) -> Result<()> {
        validate_path("input_path", &self.input_path)?;
        validate_path("output_path", &self.output_path)?;
        if let Some(path) = &self.keywords_path {
            validate_path("keywords_path", path)?;
        }
        Ok(())
    }
}
