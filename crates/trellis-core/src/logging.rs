use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// Install the global `tracing` subscriber using the default configuration.
pub fn init() {
    init_with(&Config::default());
}

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence over `config.log_filter`. Calling this more
/// than once keeps the first subscriber.
pub fn init_with(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));

    if tracing_subscriber::fmt().with_env_filter(filter).try_init().is_err() {
        tracing::trace!("tracing subscriber already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_is_harmless() {
        init();
        init_with(&Config::default().with_log_filter("debug"));
    }
}
