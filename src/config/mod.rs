// Configuration module entry point
// Manages application configuration and the shared per-process state

mod state;
mod types;

use std::net::{AddrParseError, SocketAddr};

// Re-export public types
pub use state::AppState;
pub use types::Config;

impl Config {
    /// Load configuration from specified file path (without extension)
    /// Missing file is fine: defaults serve pages from the working directory on :8080
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("WIKI")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.server_name", "wiki-server/0.1")?
            .set_default("http.max_body_size", 10_485_760)? // 10MB
            .set_default("pages.data_dir", ".")?
            .set_default("pages.template_dir", ".")?
            .build()?;

        settings.try_deserialize()
    }

    /// Listen address built from `server.host` and `server.port`
    pub fn socket_addr(&self) -> Result<SocketAddr, AddrParseError> {
        format!("{}:{}", self.server.host, self.server.port).parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_config_file() {
        let cfg = Config::load_from("does-not-exist/config").unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.pages.data_dir, ".");
        assert_eq!(cfg.pages.template_dir, ".");
        assert_eq!(cfg.logging.access_log_format, "combined");
        assert!(cfg.logging.access_log_file.is_none());
    }

    #[test]
    fn test_socket_addr() {
        let mut cfg = Config::load_from("does-not-exist/config").unwrap();
        cfg.server.host = "127.0.0.1".to_string();
        cfg.server.port = 9090;
        assert_eq!(
            cfg.socket_addr().unwrap(),
            "127.0.0.1:9090".parse::<SocketAddr>().unwrap()
        );

        cfg.server.host = "not a host".to_string();
        assert!(cfg.socket_addr().is_err());
    }
}
