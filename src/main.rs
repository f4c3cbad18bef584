use clap::Parser;
use nfl_edge::cli::{self, output, Cli, Commands};
use nfl_edge::config::{AppConfig, LoggingConfig};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match AppConfig::load_from(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            output::print_error(&format!("Failed to load config from {:?}: {}", cli.config, e));
            return Err(e.into());
        }
    };

    if cli.is_long_running() {
        init_logging(&config.logging);
    } else {
        init_logging_simple();
    }

    if let Err(errors) = config.validate() {
        for e in &errors {
            output::print_error(&format!("config: {e}"));
        }
        anyhow::bail!("invalid configuration ({} problems)", errors.len());
    }
    debug!("Loaded config from {:?}", cli.config);

    let mode = cli.output_mode();
    let result = match cli.command {
        Commands::Live { watch, interval } => cli::live::run(&config, watch, interval, mode).await,
        Commands::Picks { all, min_score } => cli::picks::run(&config, all, min_score, mode).await,
        Commands::Games => cli::games::run(&config, mode).await,
        Commands::Positions(cmd) => cli::positions::run(cmd, &config, mode).await,
        Commands::Url { away, home, date } => cli::run_url(&config, &away, &home, date, mode),
    };

    if let Err(ref e) = result {
        warn!("command failed: {e:#}");
        output::print_error(&format!("✗ {e}"));
    }
    result
}

fn init_logging(cfg: &LoggingConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},nfl_edge=debug", cfg.level)));

    // File logging only when NFL_EDGE_LOG_DIR is set.
    //
    // `tracing_appender::rolling::daily` panics if it cannot create the first
    // log file, so check the directory is writable first.
    let log_dir = std::env::var("NFL_EDGE_LOG_DIR").ok();
    let file_layer = log_dir.as_deref().and_then(|dir| {
        if let Err(e) = std::fs::create_dir_all(dir) {
            eprintln!("Warning: Could not create log directory {dir} ({e}), file logging disabled");
            return None;
        }
        let probe = std::path::Path::new(dir).join(".nfl_edge_write_test");
        match std::fs::OpenOptions::new().create(true).append(true).open(&probe) {
            Ok(_) => {
                let _ = std::fs::remove_file(&probe);
                let appender = tracing_appender::rolling::daily(dir, "nfl-edge.log");
                let (non_blocking, guard) = tracing_appender::non_blocking(appender);
                // Keep the guard for the life of the process
                Box::leak(Box::new(guard));
                Some(
                    tracing_subscriber::fmt::layer()
                        .with_writer(non_blocking)
                        .with_ansi(false)
                        .with_target(true),
                )
            }
            Err(e) => {
                eprintln!("Warning: Could not write to log directory {dir} ({e}), file logging disabled");
                None
            }
        }
    });

    let (json_layer, text_layer) = if cfg.json {
        (
            Some(tracing_subscriber::fmt::layer().json().with_target(true)),
            None,
        )
    } else {
        (
            None,
            Some(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            ),
        )
    };

    let file_logging_enabled = file_layer.is_some();
    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .with(file_layer)
        .init();

    if let (true, Some(dir)) = (file_logging_enabled, log_dir) {
        eprintln!("Logging to: {dir}/nfl-edge.log");
    }
}

fn init_logging_simple() {
    // Minimal logging for one-shot commands
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .try_init();
}
