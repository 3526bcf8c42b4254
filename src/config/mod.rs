// Configuration module entry point
// Loads layered configuration and holds the shared application state

mod state;
mod types;

use std::net::SocketAddr;

use crate::error::{Result, ServerError};

// Re-export public types
pub use state::AppState;
pub use types::{Config, HealthConfig, LoggingConfig};

/// Config file looked up when no path is given on the command line
pub const DEFAULT_CONFIG_PATH: &str = "config";

/// Environment variable prefix, e.g. `CLIENTS_SERVER__PORT=9090`
const ENV_PREFIX: &str = "CLIENTS";

impl Config {
    /// Load configuration from the given file path (extension optional).
    ///
    /// Sources, lowest priority first: built-in defaults, the file if it
    /// exists, then `CLIENTS_*` environment variables.
    pub fn load_from(config_path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let addr = format!("{}:{}", self.server.host, self.server.port);
        addr.parse()
            .map_err(|source| ServerError::InvalidAddress { addr, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Mutex, MutexGuard, PoisonError};

    // Tests that load configuration read the process environment
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn env_lock() -> MutexGuard<'static, ()> {
        ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_temp_config(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!(
            "clients_rest_{name}_{}.toml",
            std::process::id()
        ));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let _env = env_lock();
        let cfg = Config::load_from("/nonexistent/clients_rest_config").unwrap();
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 8080);
        assert!(cfg.server.workers.is_none());
        assert_eq!(cfg.logging.access_log_format, "combined");
        assert_eq!(cfg.http.max_body_size, 1_048_576);
        assert!(cfg.health.enabled);
        assert_eq!(cfg.health.liveness_path, "/healthz");
    }

    #[test]
    fn test_file_overrides_defaults() {
        let _env = env_lock();
        let path = write_temp_config(
            "override",
            r#"
[server]
port = 9191
workers = 2

[http]
server_name = "test-server"

[health]
enabled = false
"#,
        );

        let cfg = Config::load_from(path.to_str().unwrap()).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(cfg.server.port, 9191);
        assert_eq!(cfg.server.workers, Some(2));
        // Untouched keys in a partially given section keep their default
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.http.server_name, "test-server");
        assert_eq!(cfg.http.max_body_size, 1_048_576);
        assert!(!cfg.health.enabled);
        assert_eq!(cfg.performance.read_timeout, 30);
    }

    #[test]
    fn test_invalid_value_is_an_error() {
        let _env = env_lock();
        let path = write_temp_config("invalid", "[server]\nport = \"not-a-port\"\n");
        let result = Config::load_from(path.to_str().unwrap());
        std::fs::remove_file(&path).ok();

        assert!(matches!(result, Err(ServerError::Config(_))));
    }

    #[test]
    fn test_environment_overrides_file() {
        let _env = env_lock();
        let path = write_temp_config("env", "[server]\nport = 9191\nhost = \"0.0.0.0\"\n");

        std::env::set_var("CLIENTS_SERVER__PORT", "9292");
        std::env::set_var("CLIENTS_HTTP__MAX_BODY_SIZE", "2048");
        let result = Config::load_from(path.to_str().unwrap());
        std::env::remove_var("CLIENTS_SERVER__PORT");
        std::env::remove_var("CLIENTS_HTTP__MAX_BODY_SIZE");
        std::fs::remove_file(&path).ok();

        let cfg = result.unwrap();
        assert_eq!(cfg.server.port, 9292);
        assert_eq!(cfg.http.max_body_size, 2048);
        // Keys without a variable still come from the file
        assert_eq!(cfg.server.host, "0.0.0.0");
    }

    #[test]
    fn test_socket_addr() {
        let cfg = Config::default();
        assert_eq!(cfg.socket_addr().unwrap(), "127.0.0.1:8080".parse().unwrap());

        let mut bad = Config::default();
        bad.server.host = "not a host".to_string();
        assert!(matches!(
            bad.socket_addr(),
            Err(ServerError::InvalidAddress { .. })
        ));
    }
}
