//! Configuration file support
//!
//! Loads server configuration from TOML files.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::{ConverterConfig, LimitsConfig, LogFormat, ServerConfig};
use crate::decoder::Utf8Mode;

/// Configuration file format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Server settings
    pub server: ServerSettings,
    /// Converter settings
    pub converter: Option<ConverterSettings>,
    /// Logging settings
    pub logging: Option<LoggingSettings>,
    /// Limits settings
    pub limits: Option<LimitsSettings>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Host address to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Enable CORS
    pub cors_enabled: Option<bool>,
    /// Externally visible base URL of the track endpoint
    pub public_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConverterSettings {
    /// `lenient` or `strict`
    pub utf8_mode: Option<Utf8Mode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Output format (json, pretty)
    pub format: Option<LogFormat>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsSettings {
    /// Maximum upload size in MB
    pub max_upload_mb: Option<usize>,
    /// Maximum number of live tracks
    pub max_tracks: Option<usize>,
}

impl ConfigFile {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: ConfigFile = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), content)?;
        Ok(())
    }

    /// Generate default configuration file
    pub fn default_config() -> Self {
        Self {
            server: ServerSettings {
                host: "0.0.0.0".to_string(),
                port: 3000,
                cors_enabled: Some(true),
                public_url: None,
            },
            converter: Some(ConverterSettings {
                utf8_mode: Some(Utf8Mode::Lenient),
            }),
            logging: Some(LoggingSettings {
                level: "info".to_string(),
                format: Some(LogFormat::Pretty),
            }),
            limits: Some(LimitsSettings {
                max_upload_mb: Some(10),
                max_tracks: Some(1000),
            }),
        }
    }

    /// Convert to ServerConfig
    pub fn into_server_config(self) -> ServerConfig {
        let limit_defaults = LimitsConfig::default();

        ServerConfig {
            host: self.server.host,
            port: self.server.port,
            public_url: self.server.public_url,
            cors_enabled: self.server.cors_enabled.unwrap_or(true),
            log_level: self
                .logging
                .as_ref()
                .map(|l| l.level.clone())
                .unwrap_or_else(|| "info".to_string()),
            log_format: self
                .logging
                .as_ref()
                .and_then(|l| l.format)
                .unwrap_or_default(),
            converter: ConverterConfig {
                utf8_mode: self
                    .converter
                    .and_then(|c| c.utf8_mode)
                    .unwrap_or_default(),
            },
            limits: LimitsConfig {
                max_upload_mb: self
                    .limits
                    .as_ref()
                    .and_then(|l| l.max_upload_mb)
                    .unwrap_or(limit_defaults.max_upload_mb),
                max_tracks: self
                    .limits
                    .as_ref()
                    .and_then(|l| l.max_tracks)
                    .unwrap_or(limit_defaults.max_tracks),
            },
        }
    }
}

/// Generate default configuration file at the specified path
pub fn generate_default_config<P: AsRef<Path>>(path: P) -> Result<(), Box<dyn std::error::Error>> {
    let config = ConfigFile::default_config();
    config.to_file(path)?;
    Ok(())
}
