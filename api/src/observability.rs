use anyhow::Result;
use prometheus::Registry;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{AppConfig, LogFormat};
use crate::metrics;

const DEFAULT_LOG_FILTER: &str = "cc_api=debug,tower_http=debug";

pub struct Observability {
    pub registry: Registry,
}

impl Observability {
    pub fn init(config: &AppConfig) -> Result<Self> {
        let registry = Registry::new_custom(Some("cc".into()), None)?;
        metrics::register_all(&registry)?;

        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
        let subscriber = tracing_subscriber::registry().with(env_filter);

        match config.log_format {
            LogFormat::Json => subscriber.with(fmt::layer().json()).try_init()?,
            LogFormat::Text => subscriber.with(fmt::layer()).try_init()?,
        }

        tracing::info!(log_format = ?config.log_format, "Observability stack initialized");
        Ok(Self { registry })
    }
}
