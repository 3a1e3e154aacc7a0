use clap::Parser;
use tweet_etl::utils::error::ErrorSeverity;
use tweet_etl::utils::{logger, validation::Validate};
use tweet_etl::{CliConfig, EtlEngine, EtlError, EtlSettings, TomlConfig, TweetPipeline};

fn resolve_settings(
    cli: &CliConfig,
    file_config: Option<&TomlConfig>,
) -> Result<(EtlSettings, bool), EtlError> {
    match file_config {
        Some(config) => {
            config.validate()?;
            Ok((config.settings(), cli.monitor || config.monitoring_enabled()))
        }
        None => {
            cli.validate()?;
            Ok((cli.settings(), cli.monitor))
        }
    }
}

fn exit_code(e: &EtlError) -> i32 {
    match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let file_config = match cli.config.as_ref().map(TomlConfig::from_file).transpose() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    // --log-file wins over the TOML warnings_log
    let warnings_log = cli
        .log_file
        .clone()
        .or_else(|| file_config.as_ref()?.warnings_log().map(|p| p.to_path_buf()));

    if cli.json_logs {
        logger::init_json_logger();
    } else if let Err(e) = logger::init_cli_logger(cli.verbose, warnings_log.as_deref()) {
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(exit_code(&e));
    }

    tracing::info!("Starting tweet-etl");
    tracing::debug!("CLI config: {:?}", cli);

    let (settings, monitor_enabled) = match resolve_settings(&cli, file_config.as_ref()) {
        Ok(resolved) => resolved,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    tracing::info!(
        "📁 {} -> {} ({:?} schema, {} file(s) at a time)",
        settings.source_dir.display(),
        settings.output_dir.display(),
        settings.schema,
        settings.concurrent_files
    );

    let concurrent_files = settings.concurrent_files;
    let engine = EtlEngine::new_with_monitoring(TweetPipeline::new(settings), monitor_enabled)
        .with_concurrency(concurrent_files);

    match engine.run().await {
        Ok(report) => {
            println!(
                "✅ Converted {} file(s): {} row(s) written, {} record(s) skipped, {} file(s) abandoned",
                report.files.len(),
                report.rows_written(),
                report.records_skipped(),
                report.abandoned_files()
            );
        }
        Err(e) => {
            tracing::error!(
                "❌ Conversion failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());

            let code = exit_code(&e);
            if code > 0 {
                std::process::exit(code);
            }
        }
    }

    Ok(())
}
