use clap::Parser;
use wahis_etl::config::cli::{Cli, Command};
use wahis_etl::config::{self, FetchConfig, TransformConfig};
use wahis_etl::utils::monitor::SystemMonitor;
use wahis_etl::utils::{logger, validation::Validate};
use wahis_etl::{EtlEngine, EtlError, Fetcher, HttpEventSource, LocalStorage, Transformer};

#[tokio::main]
async fn main() {
    config::load_dotenv();

    let cli = Cli::parse();

    if cli.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting wahis-etl");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Err(e) = run(cli).await {
        tracing::error!("❌ Process failed: {} (Category: {:?})", e, e.category());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli) -> Result<(), EtlError> {
    let monitor_enabled = cli.monitor;
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    match cli.command {
        Command::Fetch(args) => {
            let config = args.into_config()?;
            config.validate()?;

            let monitor = SystemMonitor::new(monitor_enabled);
            let report = build_fetcher(&config)?
                .run(config.id_range(), config.delay)
                .await?;
            monitor.log_final_stats();

            tracing::info!(
                "✅ Fetched {} of {} events",
                report.succeeded,
                report.attempted
            );
            println!("DONE");
        }
        Command::Transform(args) => {
            let config = TransformConfig::from(args);
            config.validate()?;

            let monitor = SystemMonitor::new(monitor_enabled);
            let transformer = Transformer::new(LocalStorage::default(), config.keyword_table()?);
            transformer
                .run(&config.input_path, &config.output_path)
                .await?;
            monitor.log_final_stats();

            println!("CSV Generated: {}", config.output_path);
        }
        Command::Run(args) => {
            let (fetch_config, transform_config) = args.into_configs()?;
            fetch_config.validate()?;
            transform_config.validate()?;

            let transformer =
                Transformer::new(LocalStorage::default(), transform_config.keyword_table()?);
            let engine = EtlEngine::new_with_monitoring(
                build_fetcher(&fetch_config)?,
                transformer,
                monitor_enabled,
            );

            let summary = engine
                .run(
                    fetch_config.id_range(),
                    fetch_config.delay,
                    &transform_config.output_path,
                )
                .await?;

            tracing::info!(
                "✅ ETL process completed: {} events fetched, {} rows written",
                summary.fetch.succeeded,
                summary.rows_written
            );
            println!("DONE");
            println!("CSV Generated: {}", summary.csv_path);
        }
    }

    Ok(())
}

fn build_fetcher(config: &FetchConfig) -> Result<Fetcher<HttpEventSource, LocalStorage>, EtlError> {
    let source = HttpEventSource::new(config.base_url.clone(), config.request_timeout)?;
    Ok(Fetcher::new(
        source,
        LocalStorage::default(),
        config.output_path.clone(),
    ))
}
