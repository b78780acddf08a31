use config::LogConfig;
use rolling_file::{BasicRollingFileAppender, RollingConditionBasic};
use std::path::PathBuf;
use thiserror::Error;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Invalid log level '{level}': {source}")]
    InvalidLogLevel {
        level: String,
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },

    #[error("Failed to create log directory or file appender: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse Loki URL '{url}': {source}")]
    InvalidLokiUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Failed to configure Loki integration: {0}")]
    LokiError(#[from] tracing_loki::Error),
}

/// Filter directive for a configured level; `http` enables request logs on top of `info`.
pub fn filter_directive(level: &str) -> &str {
    if level == "http" { "info,http=debug" } else { level }
}

/// Install the global subscriber: console output, optionally a size-rotated file and Loki.
///
/// Rotation keeps `logs.log` plus `write_max_files - 1` numbered files. Loki entries carry the
/// `service` label and the process id.
pub fn init(config: &LogConfig) -> Result<(), LoggingError> {
    let filter = EnvFilter::try_new(filter_directive(&config.level)).map_err(|source| {
        LoggingError::InvalidLogLevel {
            level: config.level.clone(),
            source,
        }
    })?;

    let mut layers: Vec<BoxedLayer> = vec![console_layer(config)];

    if config.write {
        layers.push(file_layer(config)?);
    }

    if let Some(url) = &config.loki_url {
        let parsed = url::Url::parse(url).map_err(|source| LoggingError::InvalidLokiUrl {
            url: url.clone(),
            source,
        })?;
        let (loki, task) = tracing_loki::builder()
            .label("service", "polkadot-block-api")?
            .extra_field("pid", std::process::id().to_string())?
            .build_url(parsed)?;
        tokio::spawn(task);
        layers.push(Box::new(loki));
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .init();

    Ok(())
}

fn console_layer(config: &LogConfig) -> BoxedLayer {
    if config.json {
        fmt::layer().json().boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(!config.strip_ansi)
            .boxed()
    }
}

fn file_layer(config: &LogConfig) -> Result<BoxedLayer, LoggingError> {
    std::fs::create_dir_all(&config.write_path)?;

    let appender = BasicRollingFileAppender::new(
        PathBuf::from(&config.write_path).join("logs.log"),
        RollingConditionBasic::new().max_size(config.write_max_file_size),
        config.write_max_files.saturating_sub(1),
    )?;
    let (writer, guard) = tracing_appender::non_blocking(appender);
    // The writer stops flushing once the guard drops
    std::mem::forget(guard);

    let layer = if config.json {
        fmt::layer().json().with_writer(writer).boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .with_writer(writer)
            .boxed()
    };
    Ok(layer)
}
