use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub uploads: UploadsConfig,
    #[serde(default)]
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// Empty means a random secret per process start.
    #[serde(default)]
    pub jwt_secret: String,
    pub token_lifetime_hours: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UploadsConfig {
    pub dir: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CorsConfig {
    /// Allowed origins; empty allows any origin.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[server]
host = "127.0.0.1"
port = 8000

[auth]
jwt_secret = ""
token_lifetime_hours = 24

[uploads]
dir = "uploads"

[cors]
allowed_origins = []
"#;

impl Config {
    pub fn bind_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr = format!("{}:{}", self.server.host, self.server.port).parse()?;
        Ok(addr)
    }
}

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
pub fn load_config() -> anyhow::Result<Config> {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                let config: Config = toml::from_str(&contents)?;
                return Ok(config);
            } else {
                tracing::warn!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    tracing::info!("Using default embedded configuration");
    default_config()
}

pub fn default_config() -> anyhow::Result<Config> {
    let config: Config = toml::from_str(DEFAULT_CONFIG)?;
    Ok(config)
}

/// Resolves a configured path. Relative paths are taken relative to the
/// executable directory.
pub fn resolve_path(configured: &str) -> PathBuf {
    let path = Path::new(configured);
    if path.is_absolute() {
        return path.to_path_buf();
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            return exe_dir.join(path);
        }
    }

    PathBuf::from(configured)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config = default_config().unwrap();
        assert_eq!(config.server.port, 8000);
        assert!(config.auth.jwt_secret.is_empty());
        assert_eq!(config.auth.token_lifetime_hours, 24);
        assert_eq!(config.uploads.dir, "uploads");
        assert!(config.cors.allowed_origins.is_empty());
        assert_eq!(config.bind_addr().unwrap().to_string(), "127.0.0.1:8000");
    }

    #[test]
    fn test_cors_section_is_optional() {
        let config: Config = toml::from_str(
            r#"
            [server]
            host = "0.0.0.0"
            port = 9000
            [auth]
            token_lifetime_hours = 1
            [uploads]
            dir = "/srv/uploads"
            "#,
        )
        .unwrap();
        assert!(config.cors.allowed_origins.is_empty());
        assert!(config.auth.jwt_secret.is_empty());
        assert_eq!(resolve_path(&config.uploads.dir), PathBuf::from("/srv/uploads"));
    }
}
