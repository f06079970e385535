//! Configuration Model

use config::builder::DefaultState;
use config::{
    Config as ConfigRaw,
    ConfigBuilder,
    ConfigError,
    Environment,
    File,
    FileFormat,
};
use connect::{Compression, HandlerOptions};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct MainConfig {
    pub prometheus_address: Option<String>,
    pub prometheus_port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub address: Option<String>,
    pub port: u16,
    /// Largest request body accepted, before and after decompression.
    pub read_max_bytes: usize,
    /// Replies smaller than this are never compressed.
    pub compress_min_bytes: usize,
    pub require_protocol_header: bool,
    /// How long in-flight requests get to finish once shutdown starts.
    pub shutdown_timeout_s: u64,
}

impl ApiConfig {
    pub fn handler_options(&self) -> HandlerOptions {
        HandlerOptions::new()
            .compressions(vec![Compression::Gzip])
            .read_max_bytes(self.read_max_bytes)
            .compress_min_bytes(self.compress_min_bytes)
            .require_protocol_header(self.require_protocol_header)
    }
}

#[derive(Debug, Clone, Deserialize)]
///
///
/// * `main`: Process-wide settings (metrics exporter)
/// * `api`: Configuration of the public API server
pub struct Config {
    pub main: MainConfig,
    pub api: ApiConfig,
}

#[derive(Debug)]
pub struct ConfigLoader {
    builder: ConfigBuilder<DefaultState>,
}

impl ConfigLoader {
    /// Loads a fresh copy of the configuration from source.
    pub fn load(&self) -> Result<Config, ConfigError> {
        self.builder.build_cloned()?.try_deserialize()
    }

    /// creates a new loader configured to load the default and overlays
    /// the user supplied config (if supplied). Environment variables such as
    /// `PUBLIC_API__API__PORT` take precedence over both.
    ///
    /// * `path`: The path of the configuration file to load.
    pub fn from_path(path: &Option<String>) -> ConfigLoader {
        let raw = include_str!("default.toml");
        let mut builder = ConfigRaw::builder()
            .add_source(File::from_str(raw, FileFormat::Toml));
        if let Some(path) = path {
            builder = builder.add_source(File::with_name(path));
        }
        builder = builder.add_source(
            Environment::with_prefix("PUBLIC_API")
                .try_parsing(true)
                .separator("__"),
        );
        ConfigLoader { builder }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults_are_complete() {
        let config = ConfigLoader::from_path(&None).load().unwrap();

        assert_eq!(config.main.prometheus_port, 9000);
        assert_eq!(config.api.address.as_deref(), Some("0.0.0.0"));
        assert_eq!(config.api.port, 8888);
        assert_eq!(config.api.read_max_bytes, 4 * 1024 * 1024);
        assert_eq!(config.api.compress_min_bytes, 1024);
        assert!(!config.api.require_protocol_header);
        assert_eq!(config.api.shutdown_timeout_s, 10);
    }

    #[test]
    fn user_file_overlays_defaults() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(
            file,
            "[api]\nport = 3001\nrequire_protocol_header = true\n\n[main]\n\
             prometheus_port = 9100"
        )
        .unwrap();

        let path = file.path().to_str().map(str::to_owned);
        let loader = ConfigLoader::from_path(&path);
        let config = loader.load().unwrap();

        assert_eq!(config.api.port, 3001);
        assert!(config.api.require_protocol_header);
        // Untouched keys keep their default.
        assert_eq!(config.api.compress_min_bytes, 1024);
        assert_eq!(config.main.prometheus_port, 9100);
    }

    #[test]
    fn missing_user_file_is_an_error() {
        let loader = ConfigLoader::from_path(&Some(
            "/definitely/not/here/public-api.toml".to_owned(),
        ));
        assert!(loader.load().is_err());
    }
}
