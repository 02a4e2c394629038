use crate::config::{
    FetchConfig, TransformConfig, DEFAULT_CSV_PATH, DEFAULT_DELAY_MS, DEFAULT_FIRST_ID,
    DEFAULT_JSON_PATH, DEFAULT_LAST_ID, DEFAULT_TIMEOUT_SECS,
};
use crate::utils::error::Result;
use clap::{Args, Parser, Subcommand};
use std::time::Duration;

#[derive(Debug, Clone, Parser)]
#[command(name = "wahis-etl")]
#[command(about = "Fetch WAHIS disease events and flatten them into a CSV dataset")]
pub struct Cli {
    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log CPU and memory usage per phase")]
    pub monitor: bool,

    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Download every event in the id range into the JSON dataset
    Fetch(FetchArgs),
    /// Flatten the JSON dataset into CSV
    Transform(TransformArgs),
    /// Fetch, then transform
    Run(RunArgs),
}

#[derive(Debug, Clone, Args)]
pub struct FetchArgs {
    /// API base URL; falls back to the WAHIS_API environment variable
    #[arg(long)]
    pub base_url: Option<String>,

    #[arg(long, default_value_t = DEFAULT_FIRST_ID)]
    pub first_id: u32,

    #[arg(long, default_value_t = DEFAULT_LAST_ID)]
    pub last_id: u32,

    /// Pause after every request, in milliseconds
    #[arg(long, default_value_t = DEFAULT_DELAY_MS)]
    pub delay_ms: u64,

    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    #[arg(long, default_value = DEFAULT_JSON_PATH)]
    pub json_path: String,
}

impl FetchArgs {
    pub fn into_config(self) -> Result<FetchConfig> {
        let mut config = match self.base_url {
            Some(base_url) => FetchConfig::new(base_url),
            None => FetchConfig::from_env()?,
        };
        config.first_id = self.first_id;
        config.last_id = self.last_id;
        config.delay = Duration::from_millis(self.delay_ms);
        config.request_timeout = Duration::from_secs(self.timeout_secs);
        config.output_path = self.json_path;
        Ok(config)
    }
}

#[derive(Debug, Clone, Args)]
pub struct TransformArgs {
    #[arg(long, default_value = DEFAULT_JSON_PATH)]
    pub json_path: String,

    #[arg(long, default_value = DEFAULT_CSV_PATH)]
    pub csv_path: String,

    /// TOML file overriding the intervention keyword table
    #[arg(long)]
    pub keywords: Option<String>,
}

impl From<TransformArgs> for TransformConfig {
    fn from(args: TransformArgs) -> Self {
        Self {
            input_path: args.json_path,
            output_path: args.csv_path,
            keywords_path: args.keywords,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub fetch: FetchArgs,

    #[arg(long, default_value = DEFAULT_CSV_PATH)]
    pub csv_path: String,

    #[arg(long)]
    pub keywords: Option<String>,
}

impl RunArgs {
    pub fn into_configs(self) -> Result<(FetchConfig, TransformConfig)> {
        let fetch = self.fetch.into_config()?;
        let transform = TransformConfig {
            input_path: fetch.output_path.clone(),
            output_path: self.csv_path,
            keywords_path: self.keywords,
        };
        Ok((fetch, transform))
    }
}
