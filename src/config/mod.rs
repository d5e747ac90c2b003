// Configuration module entry point
// Loads layered configuration and builds the shared application state

mod state;
mod types;

use std::env;
use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{Config, PerformanceConfig};

/// Environment variable holding the config file path (without extension)
pub const CONFIG_PATH_ENV: &str = "SOUNDSHELF_CONFIG";

const DEFAULT_CONFIG_PATH: &str = "config";

impl Config {
    /// Load configuration from `$SOUNDSHELF_CONFIG`, or "config.toml" when unset
    pub fn load() -> Result<Self, config::ConfigError> {
        let path = env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(&path)
    }

    /// Load configuration from specified file path (extension optional)
    ///
    /// Values from `SOUNDSHELF__SECTION__KEY` environment variables override the file.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("SOUNDSHELF")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 5000)?
            .set_default("library.audio_dir", "audio_data")?
            .set_default("library.title", "Audio Files")?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.connection_timeout", 0)?
            .set_default("http.server_name", "soundshelf")?
            .set_default("http.enable_cors", false)?
            .set_default("http.max_body_size", 1_048_576)? // 1MB
            .set_default("http.cache_max_age", 3600)?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_defaults_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent");
        let cfg = Config::load_from(missing.to_str().unwrap()).unwrap();

        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, 5000);
        assert_eq!(cfg.server.workers, None);
        assert_eq!(cfg.library.audio_dir, PathBuf::from("audio_data"));
        assert_eq!(cfg.logging.access_log_format, "combined");
        assert!(cfg.logging.access_log_file.is_none());
        assert_eq!(cfg.performance.max_connections, None);
        assert_eq!(cfg.performance.read_timeout, 30);
        assert_eq!(cfg.performance.connection_timeout, 0);
        assert_eq!(cfg.http.cache_max_age, 3600);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg_path = dir.path().join("soundshelf.toml");
        std::fs::write(
            &cfg_path,
            r#"
[server]
port = 8088
workers = 2

[library]
audio_dir = "/srv/music"
title = "Rehearsals"

[logging]
access_log_format = "json"

[performance]
max_connections = 64
"#,
        )
        .unwrap();

        let cfg = Config::load_from(cfg_path.to_str().unwrap()).unwrap();
        assert_eq!(cfg.server.port, 8088);
        assert_eq!(cfg.server.workers, Some(2));
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.library.audio_dir, PathBuf::from("/srv/music"));
        assert_eq!(cfg.library.title, "Rehearsals");
        assert_eq!(cfg.logging.access_log_format, "json");
        assert_eq!(cfg.performance.max_connections, Some(64));
    }

    #[test]
    fn test_socket_addr() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = Config::load_from(dir.path().join("none").to_str().unwrap()).unwrap();
        assert_eq!(
            cfg.get_socket_addr().unwrap(),
            "0.0.0.0:5000".parse::<SocketAddr>().unwrap()
        );

        cfg.server.host = "not a host".to_string();
        assert!(cfg.get_socket_addr().is_err());
    }
}
