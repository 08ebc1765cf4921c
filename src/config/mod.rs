//! Configuration for the Edura API.
//!
//! Each submodule owns one slice of configuration, loaded from environment
//! variables. Required credentials are checked at startup so a missing
//! secret fails the process before it binds the listener, never at first
//! use inside a handler.
//!
//! # Modules
//!
//! - [`auth`]: auth provider credentials and session token secret
//! - [`cors`]: allowed browser origins
//! - [`database`]: PostgreSQL connection pool initialization
//! - [`media`]: media host credentials
//! - [`payments`]: payment processor credentials

pub mod auth;
pub mod cors;
pub mod database;
pub mod media;
pub mod payments;

use std::sync::OnceLock;

use anyhow::{Context, Result, bail};

use crate::config::auth::AuthConfig;
use crate::config::cors::CorsConfig;
use crate::config::database::DatabaseConfig;
use crate::config::media::MediaConfig;
use crate::config::payments::PaymentConfig;

/// Deployment environment flag, parsed from `APP_ENV`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

static CURRENT_ENV: OnceLock<Environment> = OnceLock::new();

impl Environment {
    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("production") {
            Environment::Production
        } else {
            Environment::Development
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }

    /// Record the environment resolved at startup. First caller wins.
    pub fn make_current(self) {
        let _ = CURRENT_ENV.set(self);
    }

    /// The environment recorded at startup, falling back to `APP_ENV`.
    pub fn current() -> Self {
        *CURRENT_ENV.get_or_init(|| {
            std::env::var("APP_ENV")
                .map(|v| Self::parse(&v))
                .unwrap_or_default()
        })
    }
}

/// Aggregate configuration assembled once during bootstrap and carried in
/// the application state.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub environment: Environment,
    pub port: u16,
    pub database: DatabaseConfig,
    pub cors: CorsConfig,
    pub auth: AuthConfig,
    pub media: MediaConfig,
    pub payments: PaymentConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(&|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    /// Production deployments must name a frontend origin for CORS.
    pub fn from_lookup(get: &dyn Fn(&str) -> Option<String>) -> Result<Self> {
        let environment = get("APP_ENV")
            .map(|v| Environment::parse(&v))
            .unwrap_or_default();

        let port = get("PORT")
            .map(|p| p.parse::<u16>())
            .transpose()
            .context("PORT must be a valid port number")?
            .unwrap_or(5000);

        Ok(Self {
            environment,
            port,
            database: DatabaseConfig::from_lookup(get)?,
            cors: CorsConfig::from_lookup(get, environment)?,
            auth: AuthConfig::from_lookup(get)?,
            media: MediaConfig::from_lookup(get)?,
            payments: PaymentConfig::from_lookup(get)?,
        })
    }
}

/// Fetch a required variable, rejecting empty values so a blank line in a
/// `.env` file does not pass as configured.
pub(crate) fn required(get: &dyn Fn(&str) -> Option<String>, key: &str) -> Result<String> {
    match get(key) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => bail!("{key} is not set"),
    }
}
