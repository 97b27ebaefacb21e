/// Configuration shared by the Trellis crates.
#[derive(Debug, Clone)]
pub struct Config {
    /// Default `tracing` filter directive, used when `RUST_LOG` is unset.
    pub log_filter: String,
    pub profiling: ProfilingMode,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            log_filter: "info,trellis_ui=debug".to_string(),
            profiling: ProfilingMode::Off,
        }
    }
}

impl Config {
    /// Replace the default log filter directive.
    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }

    pub fn with_profiling(mut self, profiling: ProfilingMode) -> Self {
        self.profiling = profiling;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfilingMode {
    /// Profiling scopes are compiled in but not recorded
    Off,
    /// Scopes are recorded and can be inspected in-process
    On,
    /// Scopes are recorded and served to external tools such as `puffin_viewer`
    WithWebserver,
}
