use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Which airport to report and how to reach the METAR feed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherSection {
    /// ADDS station string, e.g. "KBOS"
    pub airport: String,
    pub adds_url: Option<String>,
    pub hours_before_now: Option<u32>,
    pub timeout_secs: Option<u64>,
}

/// Where to publish the finished message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MuckSection {
    pub host: String,
    pub port: u16,
    /// Forwarded as the auth value of the weather-set call
    pub auth_token: String,
    pub use_ssl: Option<bool>,
    pub package: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub weather: WeatherSection,
    pub muck: MuckSection,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(String),
    #[error("Invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppConfig {
    /// Load configuration from the MUCKWX_CONFIG path (TOML), default
    /// "config.toml". The file must exist: a publisher with no MUCK
    /// address and no airport has nothing to do.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("MUCKWX_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
        Self::from_path(&path)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let s = fs::read_to_string(path)?;
        Ok(toml::from_str::<AppConfig>(&s)?)
    }

    /// Whether the MUCK connection gets TLS-wrapped (default off)
    pub fn use_ssl(&self) -> bool {
        self.muck.use_ssl.unwrap_or(false)
    }

    /// MCP package the server-side softcode registered for weather
    pub fn package(&self) -> String {
        self.muck
            .package
            .clone()
            .unwrap_or_else(|| "net-muckwx-weather".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const FULL: &str = r#"
[weather]
airport = "KBOS"
hours_before_now = 6

[muck]
host = "muck.example.net"
port = 8888
auth_token = "sekrit"
use_ssl = true
package = "net-example-weather"
"#;

    const MINIMAL: &str = r#"
[weather]
airport = "SCIP"

[muck]
host = "127.0.0.1"
port = 4201
auth_token = "hunter2"
"#;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn parses_a_full_config() {
        let file = write_config(FULL);
        let cfg = AppConfig::from_path(file.path()).unwrap();

        assert_eq!(cfg.weather.airport, "KBOS");
        assert_eq!(cfg.weather.hours_before_now, Some(6));
        assert_eq!(cfg.muck.host, "muck.example.net");
        assert_eq!(cfg.muck.port, 8888);
        assert!(cfg.use_ssl());
        assert_eq!(cfg.package(), "net-example-weather");
    }

    #[test]
    fn optional_keys_have_defaults() {
        let file = write_config(MINIMAL);
        let cfg = AppConfig::from_path(file.path()).unwrap();

        assert!(!cfg.use_ssl());
        assert_eq!(cfg.package(), "net-muckwx-weather");
        assert_eq!(cfg.weather.adds_url, None);
        assert_eq!(cfg.weather.timeout_secs, None);
    }

    #[test]
    fn missing_required_key_is_a_toml_error() {
        // No airport
        let file = write_config(
            r#"
[weather]

[muck]
host = "muck.example.net"
port = 8888
auth_token = "sekrit"
"#,
        );
        let err = AppConfig::from_path(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
        assert!(err.to_string().contains("airport"));
    }

    #[test]
    fn missing_file_is_its_own_error() {
        let err = AppConfig::from_path("/nonexistent/muckwx.toml").unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }
}
