use anyhow::{Context, Result};
use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::{
    api_observability::{HttpServerConfig, ObservabilityConfig},
    database::DatabaseConfig,
    message_queue::RabbitMqConfig,
};
use crate::validation::ConfigValidator;

/// Prefix of environment variable overrides, e.g. `ASSIGNMENT_CONSUMER__RABBITMQ__MAX_RETRY`
pub const ENV_PREFIX: &str = "ASSIGNMENT_CONSUMER";

const DEFAULT_CONFIG_PATHS: [&str; 2] = [
    "config/assignment-consumer.toml",
    "assignment-consumer.toml",
];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub rabbitmq: RabbitMqConfig,
    pub database: DatabaseConfig,
    pub http_server: HttpServerConfig,
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    /// Load defaults, then the TOML file, then `ASSIGNMENT_CONSUMER__*` environment overrides.
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut builder = Self::defaults()?;

        if let Some(path) = config_path {
            if !Path::new(path).exists() {
                return Err(anyhow::anyhow!("配置文件不存在: {}", path));
            }
            builder = builder.add_source(File::new(path, FileFormat::Toml));
        } else if let Some(path) = DEFAULT_CONFIG_PATHS
            .iter()
            .find(|path| Path::new(path).exists())
        {
            builder = builder.add_source(File::new(path, FileFormat::Toml));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config: AppConfig = builder
            .build()
            .context("构建配置失败")?
            .try_deserialize()
            .context("反序列化配置失败")?;

        config.validate()?;

        Ok(config)
    }

    fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>> {
        let defaults = AppConfig::default();
        let rabbitmq = &defaults.rabbitmq;
        let database = &defaults.database;
        let http_server = &defaults.http_server;
        let observability = &defaults.observability;

        let builder = ConfigBuilder::builder()
            .set_default("rabbitmq.url", rabbitmq.url.as_str())?
            .set_default(
                "rabbitmq.assignment_exchange",
                rabbitmq.assignment_exchange.as_str(),
            )?
            .set_default(
                "rabbitmq.dead_letter_exchange",
                rabbitmq.dead_letter_exchange.as_str(),
            )?
            .set_default(
                "rabbitmq.assignment_create_queue",
                rabbitmq.assignment_create_queue.as_str(),
            )?
            .set_default("rabbitmq.max_retry", i64::from(rabbitmq.max_retry))?
            .set_default("rabbitmq.prefetch_count", i64::from(rabbitmq.prefetch_count))?
            .set_default("rabbitmq.concurrency", rabbitmq.concurrency as i64)?
            .set_default("rabbitmq.consumer_tag", rabbitmq.consumer_tag.as_str())?
            .set_default("database.url", database.url.as_str())?
            .set_default(
                "database.max_connections",
                i64::from(database.max_connections),
            )?
            .set_default(
                "database.connection_timeout_seconds",
                database.connection_timeout_seconds as i64,
            )?
            .set_default("http_server.host", http_server.host.as_str())?
            .set_default("http_server.port", i64::from(http_server.port))?
            .set_default(
                "observability.log_level",
                observability.log_level.to_string(),
            )?
            .set_default(
                "observability.log_format",
                observability.log_format.to_string(),
            )?
            .set_default(
                "observability.metrics_enabled",
                observability.metrics_enabled,
            )?;

        Ok(builder)
    }

    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(toml_str).context("解析TOML配置失败")?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("序列化配置为TOML失败")
    }
}

impl ConfigValidator for AppConfig {
    fn validate(&self) -> crate::ConfigResult<()> {
        self.rabbitmq.validate()?;
        self.database.validate()?;
        self.http_server.validate()?;
        self.observability.validate()?;
        Ok(())
    }
}
