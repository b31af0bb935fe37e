//! Configuration module
//!
//! This module provides configuration structures for the import service,
//! including server, authentication, and upload-pipeline settings.

use std::env;
use std::path::Path;

// Common constants
const JWT_EXPIRY_HOURS: i64 = 24;
const MAX_CONCURRENT_IMPORTS: usize = 8;

/// Base configuration shared by the HTTP surface
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub jwt_secret: String,
    pub jwt_expiry_hours: i64,
    pub environment: String,
}

/// Import service configuration
#[derive(Clone, Debug)]
pub struct ImportServiceConfig {
    pub base: BaseConfig,
    // Service API key (for service-to-service auth)
    pub service_api_key: Option<String>,
    // Upload pipeline configuration
    pub uploads_root: String,
    pub max_import_size_bytes: usize,
    pub import_allowed_extensions: Vec<String>,
    pub max_concurrent_imports: usize,
    /// Age in hours after which an unclaimed scratch extraction tree is removed.
    pub scratch_ttl_hours: u64,
    /// Interval in seconds between runs of the scratch sweeper. 0 = disabled.
    pub scratch_sweep_interval_secs: u64,
}

/// Application configuration (import service).
#[derive(Clone, Debug)]
pub struct Config(pub Box<ImportServiceConfig>);

impl Config {
    fn as_import(&self) -> &ImportServiceConfig {
        &self.0
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        self.as_import()
            .base
            .environment
            .to_lowercase()
            .eq("production")
            || self.as_import().base.environment.to_lowercase().eq("prod")
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = ImportServiceConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.as_import().validate()
    }

    // Convenience getters for common fields
    pub fn server_port(&self) -> u16 {
        self.as_import().base.server_port
    }

    pub fn jwt_secret(&self) -> &str {
        &self.as_import().base.jwt_secret
    }

    pub fn jwt_expiry_hours(&self) -> i64 {
        self.as_import().base.jwt_expiry_hours
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.as_import().base.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.as_import().base.environment
    }

    pub fn service_api_key(&self) -> Option<&str> {
        self.as_import().service_api_key.as_deref()
    }

    pub fn uploads_root(&self) -> &Path {
        Path::new(&self.as_import().uploads_root)
    }

    pub fn max_import_size_bytes(&self) -> usize {
        self.as_import().max_import_size_bytes
    }

    pub fn import_allowed_extensions(&self) -> &[String] {
        &self.as_import().import_allowed_extensions
    }

    pub fn max_concurrent_imports(&self) -> usize {
        self.as_import().max_concurrent_imports
    }

    pub fn scratch_ttl_hours(&self) -> u64 {
        self.as_import().scratch_ttl_hours
    }

    pub fn scratch_sweep_interval_secs(&self) -> u64 {
        self.as_import().scratch_sweep_interval_secs
    }
}

impl ImportServiceConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        const MAX_IMPORT_SIZE_MB: usize = 250;
        const SCRATCH_TTL_HOURS: u64 = 24;
        const SCRATCH_SWEEP_INTERVAL_SECS: u64 = 3600;

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        let is_production =
            environment.to_lowercase() == "production" || environment.to_lowercase() == "prod";
        if is_production && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .collect();

        let max_import_size_mb = env::var("MAX_IMPORT_SIZE_MB")
            .unwrap_or_else(|_| MAX_IMPORT_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(MAX_IMPORT_SIZE_MB);

        let import_allowed_extensions = env::var("IMPORT_ALLOWED_EXTENSIONS")
            .unwrap_or_else(|_| "csv,xlsx,xls,zip".to_string())
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .collect();

        let base = BaseConfig {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| "4000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            jwt_secret: env::var("JWT_SECRET")
                .map_err(|_| anyhow::anyhow!("JWT_SECRET must be set for authentication"))?,
            jwt_expiry_hours: env::var("JWT_EXPIRY_HOURS")
                .unwrap_or_else(|_| JWT_EXPIRY_HOURS.to_string())
                .parse()
                .unwrap_or(JWT_EXPIRY_HOURS),
            environment: environment.clone(),
        };

        let config = ImportServiceConfig {
            base,
            service_api_key: env::var("SERVICE_API_KEY").ok(),
            uploads_root: env::var("UPLOADS_ROOT").unwrap_or_else(|_| "./uploads".to_string()),
            max_import_size_bytes: max_import_size_mb * 1024 * 1024,
            import_allowed_extensions,
            max_concurrent_imports: env::var("MAX_CONCURRENT_IMPORTS")
                .unwrap_or_else(|_| MAX_CONCURRENT_IMPORTS.to_string())
                .parse()
                .unwrap_or(MAX_CONCURRENT_IMPORTS),
            scratch_ttl_hours: env::var("SCRATCH_TTL_HOURS")
                .unwrap_or_else(|_| SCRATCH_TTL_HOURS.to_string())
                .parse()
                .unwrap_or(SCRATCH_TTL_HOURS),
            scratch_sweep_interval_secs: env::var("SCRATCH_SWEEP_INTERVAL_SECS")
                .unwrap_or_else(|_| SCRATCH_SWEEP_INTERVAL_SECS.to_string())
                .parse()
                .unwrap_or(SCRATCH_SWEEP_INTERVAL_SECS),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.base.jwt_secret.len() < 32 {
            return Err(anyhow::anyhow!(
                "JWT_SECRET must be at least 32 characters long"
            ));
        }

        if self.uploads_root.trim().is_empty() {
            return Err(anyhow::anyhow!("UPLOADS_ROOT cannot be empty"));
        }

        if self.max_import_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_IMPORT_SIZE_MB must be greater than 0"));
        }

        if self.import_allowed_extensions.is_empty() {
            return Err(anyhow::anyhow!(
                "IMPORT_ALLOWED_EXTENSIONS cannot be empty"
            ));
        }

        Ok(())
    }
}
