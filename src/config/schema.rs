//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the collector.
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration for the data collector.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct CollectorConfig {
    /// Message broker connection and exchange.
    pub broker: BrokerConfig,

    /// Device-management server REST API.
    pub server: ServerConfig,

    /// Retry limits for every outbound call.
    pub retries: RetryConfig,

    /// Calls issued for each newly registered client.
    pub provisioning: ProvisioningConfig,

    /// Log destination and level.
    pub logging: LoggingConfig,

    /// Metrics settings.
    pub observability: ObservabilityConfig,
}

/// AMQP broker configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct BrokerConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,

    /// Virtual host (default "/").
    pub vhost: String,

    /// Fanout exchange carrying registration events.
    pub exchange: String,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5672,
            username: "guest".to_string(),
            password: "guest".to_string(),
            vhost: "/".to_string(),
            exchange: "json_reg".to_string(),
        }
    }
}

/// Device-management server configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,

    /// Path of the clients collection, e.g. "/api/clients/".
    pub api_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 8080,
            api_path: "/api/clients/".to_string(),
        }
    }
}

/// Retry configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of attempts per call, including the first.
    pub max_attempts: u32,

    /// Backoff step in milliseconds; the n-th failure waits n steps.
    pub step_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            step_delay_ms: 200,
        }
    }
}

/// Provisioning sequence run for each registration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ProvisioningConfig {
    /// Write the current time to the client's Device object first.
    pub sync_time: bool,

    /// Object instance observed on each object.
    pub instance: u16,

    /// Object ids to observe, in call order.
    pub objects: Vec<u16>,
}

impl Default for ProvisioningConfig {
    fn default() -> Self {
        Self {
            sync_time: true,
            instance: 0,
            objects: vec![3301, 3303, 3304, 3324, 3325, 3330, 3348],
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log file; rotated daily.
    pub file: PathBuf,

    /// Log level (trace, debug, info, warn, error).
    pub level: String,

    /// Rotated files kept on disk.
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from("/var/log/datacollector.log"),
            level: "info".to_string(),
            max_files: 3,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// The flat JSON layout used by existing deployments (`myconfig.json`).
#[derive(Debug, Clone, Deserialize)]
pub struct LegacyConfig {
    #[serde(rename = "RabbitHost")]
    pub rabbit_host: String,
    #[serde(rename = "RabbitPort")]
    pub rabbit_port: u16,
    #[serde(rename = "RabbitUsername")]
    pub rabbit_username: String,
    #[serde(rename = "RabbitPassword")]
    pub rabbit_password: String,
    #[serde(rename = "LWM2MServer")]
    pub lwm2m_server: String,
    #[serde(rename = "LWM2MServerPort")]
    pub lwm2m_server_port: u16,
}

impl From<LegacyConfig> for CollectorConfig {
    fn from(legacy: LegacyConfig) -> Self {
        Self {
            broker: BrokerConfig {
                host: legacy.rabbit_host,
                port: legacy.rabbit_port,
                username: legacy.rabbit_username,
                password: legacy.rabbit_password,
                ..BrokerConfig::default()
            },
            server: ServerConfig {
                host: legacy.lwm2m_server,
                port: legacy.lwm2m_server_port,
                ..ServerConfig::default()
            },
            ..CollectorConfig::default()
        }
    }
}
