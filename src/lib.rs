pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::cli::Cli;

pub use crate::adapters::{HttpEventSource, LocalStorage};
pub use crate::config::{FetchConfig, KeywordTable, TransformConfig};
pub use crate::core::{
    etl::{EtlEngine, EtlSummary},
    fetcher::Fetcher,
    transformer::{extract_interventions, format_value, render_csv, transform, Transformer},
};
pub use crate::domain::model::COLUMNS;
pub use crate::utils::error::{EtlError, Result};
