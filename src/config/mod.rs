// Configuration module entry point
// Manages application configuration and shared runtime state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{AssetsConfig, Config, HttpConfig, LoggingConfig, PerformanceConfig, ServerConfig};

impl Config {
    /// Load configuration from an optional `config.toml`, `SERVER_*`
    /// environment overrides, and built-in defaults. The `PORT` environment
    /// variable, when set, overrides the listen port last.
    pub fn load() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::with_prefix("SERVER"))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.server_name", "Roster/0.1")?
            .set_default("http.max_body_size", 1_048_576)? // 1MB
            .set_default("assets.client_file", "static/client.html")?
            .set_default("assets.stylesheet_file", "static/style.css")?
            .build()?;

        let mut cfg: Self = settings.try_deserialize()?;

        if let Ok(port) = std::env::var("PORT") {
            cfg.server.port = port.parse().map_err(|e| {
                config::ConfigError::Message(format!("invalid PORT value '{port}': {e}"))
            })?;
        }

        Ok(cfg)
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}
