//! Environment configuration for the storefront harness.

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;
use validator::Validate;

use crate::domain::VariantId;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
    #[error("invalid configuration: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

#[derive(Clone, Debug, Validate)]
pub struct StorefrontConfig {
    #[validate(url)]
    pub catalog_url: String,
    #[validate(range(min = 1, max = 300))]
    pub catalog_timeout_secs: u64,
    #[validate(length(min = 1))]
    pub user_agent: String,
    /// When set, a fixture catalog is served locally and used instead of `catalog_url`.
    pub fixture_path: Option<PathBuf>,
    pub fixture_addr: SocketAddr,
    pub initial_variant: Option<VariantId>,
}

impl StorefrontConfig {
    /// Loads `.env` (if present) and then reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::build(|key| std::env::var(key))
    }

    pub fn catalog_base_url(&self) -> String {
        match self.fixture_path {
            Some(_) => format!("http://{}", self.fixture_addr),
            None => self.catalog_url.clone(),
        }
    }

    fn build<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Result<String, std::env::VarError>,
    {
        let or_default = |var: &str, default: &str| lookup(var).unwrap_or_else(|_| default.to_string());
        let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar { var: var.to_string(), reason };

        let catalog_timeout_secs = or_default("CATALOG_TIMEOUT_SECS", "15")
            .parse::<u64>()
            .map_err(|e| invalid("CATALOG_TIMEOUT_SECS", e.to_string()))?;
        let fixture_addr = or_default("FIXTURE_ADDR", "127.0.0.1:8083")
            .parse::<SocketAddr>()
            .map_err(|e| invalid("FIXTURE_ADDR", e.to_string()))?;
        let fixture_path = lookup("CATALOG_FIXTURE").ok().filter(|p| !p.trim().is_empty()).map(PathBuf::from);

        let catalog_url = match lookup("CATALOG_URL") {
            Ok(url) => url,
            Err(_) if fixture_path.is_some() => format!("http://{fixture_addr}"),
            Err(_) => return Err(ConfigError::MissingEnvVar("CATALOG_URL".to_string())),
        };

        let config = Self {
            catalog_url,
            catalog_timeout_secs,
            user_agent: or_default("CATALOG_USER_AGENT", concat!("opensase-storefront/", env!("CARGO_PKG_VERSION"))),
            fixture_path,
            fixture_addr,
            initial_variant: lookup("INITIAL_VARIANT").ok().filter(|v| !v.trim().is_empty()).map(VariantId::new),
        };
        config.validate()?;
        Ok(config)
    }
}
