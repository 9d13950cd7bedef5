use std::sync::Once;

use log::LevelFilter;

/// Where [`init_logging`] takes its level filter from, in order: `env_filter`,
/// then `RUST_LOG`, then plain `info`.
///
/// Filters use the `env_logger` directive syntax. Useful targets here are
/// `ocular_gl` (handle allocation and release at `debug`, every driver error
/// check that trips at `trace`) and `ocular_gl::texture` on its own when only
/// camera latching is of interest.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

impl LoggingConfig {
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    fn builder(&self) -> env_logger::Builder {
        let mut builder = env_logger::Builder::new();
        match self
            .env_filter
            .clone()
            .or_else(|| std::env::var("RUST_LOG").ok())
        {
            Some(filter) => builder.parse_filters(&filter),
            None => builder.filter_level(LevelFilter::Info),
        };
        builder.write_style(self.write_style);
        builder
    }
}

static INIT: Once = Once::new();

/// Installs `env_logger` as the `log` backend for a binary or test harness.
///
/// Runs at most once per process. When the host already installed its own
/// logger (an Android bridge, a test harness), that logger is kept and this
/// call only records the fact at `debug`.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| match config.builder().try_init() {
        Ok(()) => log::debug!("env_logger installed"),
        Err(_) => log::debug!("host logger already installed; leaving it in place"),
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_defers_to_environment() {
        let config = LoggingConfig::default();
        assert!(config.env_filter.is_none());
        assert!(matches!(config.write_style, env_logger::WriteStyle::Auto));
    }

    #[test]
    fn explicit_filter_wins() {
        let logger = LoggingConfig::default().with_filter("warn").builder().build();
        assert_eq!(logger.filter(), LevelFilter::Warn);

        let logger = LoggingConfig::default()
            .with_filter("ocular_gl=trace")
            .builder()
            .build();
        assert_eq!(logger.filter(), LevelFilter::Trace);
    }

    #[test]
    fn repeated_init_is_ignored() {
        init_logging(LoggingConfig::default().with_filter("warn"));
        init_logging(LoggingConfig::default().with_filter("trace"));
        assert!(INIT.is_completed());
    }
}
