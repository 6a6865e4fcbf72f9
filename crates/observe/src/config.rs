#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Filters spans and events based on a set of filter directives
    /// https://docs.rs/tracing-subscriber/latest/tracing_subscriber/filter/struct.EnvFilter.html
    pub(crate) env_filter: String,
    /// Output log events as JSON
    pub(crate) use_json_format: bool,
}

impl Config {
    pub fn new(env_filter: &str, use_json_format: bool) -> Self {
        Self {
            env_filter: env_filter.into(),
            use_json_format,
        }
    }

    /// Create a Config with JSON format enabled
    pub fn with_json_format(mut self) -> Self {
        self.use_json_format = true;
        self
    }

    pub fn with_env_filter(mut self, env_filter: &str) -> Self {
        self.env_filter = env_filter.to_string();
        self
    }

    pub fn env_filter(&self) -> &str {
        &self.env_filter
    }

    pub fn use_json_format(&self) -> bool {
        self.use_json_format
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            env_filter: "warn".to_string(),
            use_json_format: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_defaults() {
        let config = Config::default();
        assert_eq!(config.env_filter(), "warn");
        assert!(!config.use_json_format());

        let config = config
            .with_env_filter("info,pharma_deploy=debug")
            .with_json_format();
        assert_eq!(config, Config::new("info,pharma_deploy=debug", true));
    }
}
