// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded from the environment
//! once at startup into an immutable [`AppConfig`].
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `APP_ENV` | `development` or `production` | `development` |
//! | `DATABASE_URL` | SQLite connection string | `sqlite::memory:` |
//! | `JWT_SECRET` | HMAC signing key (at least 32 bytes) | Required in production |
//! | `JWT_ISSUER` | Issuer claim set and checked on tokens | Optional |
//! | `JWT_AUDIENCE` | Audience claim set and checked on tokens | Optional |
//! | `JWT_TTL_SECS` | Lifetime of issued access tokens | `3600` |
//! | `JWT_LEEWAY_SECS` | Clock skew tolerance on `exp`/`nbf` | `0` |
//! | `ENABLE_SWAGGER` | Mount Swagger UI and the OpenAPI document | `true` in development |
//! | `SEED_ADMIN_USERNAME` | Admin account created at boot | Optional |
//! | `SEED_ADMIN_PASSWORD` | Password of the seeded admin | Optional |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const APP_ENV_ENV: &str = "APP_ENV";
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";
pub const JWT_ISSUER_ENV: &str = "JWT_ISSUER";
pub const JWT_AUDIENCE_ENV: &str = "JWT_AUDIENCE";
pub const JWT_TTL_ENV: &str = "JWT_TTL_SECS";
pub const JWT_LEEWAY_ENV: &str = "JWT_LEEWAY_SECS";
pub const ENABLE_SWAGGER_ENV: &str = "ENABLE_SWAGGER";
pub const SEED_ADMIN_USERNAME_ENV: &str = "SEED_ADMIN_USERNAME";
pub const SEED_ADMIN_PASSWORD_ENV: &str = "SEED_ADMIN_PASSWORD";

/// Logging format selector. Read directly by `main` before the config exists.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DATABASE_URL: &str = "sqlite::memory:";
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 3600;
pub const DEFAULT_LEEWAY_SECS: u64 = 0;

/// Shortest accepted HMAC key. HS256 keys below the hash width are weak.
pub const MIN_SECRET_LEN: usize = 32;

/// Signing key used when `APP_ENV=development` and no `JWT_SECRET` is set.
const DEVELOPMENT_SECRET: &str = "development-only-signing-key-change-me-please";

/// Errors raised while loading configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },

    #[error("JWT_SECRET must be at least {MIN_SECRET_LEN} bytes")]
    WeakSecret,
}

/// Deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "development" | "dev" => Some(Self::Development),
            "production" | "prod" => Some(Self::Production),
            _ => None,
        }
    }

    pub fn is_development(&self) -> bool {
        *self == Self::Development
    }
}

/// Token signing settings shared by the verifier and the issuer.
///
/// Built once at startup and never mutated afterwards. The `Debug` impl
/// redacts the secret so the struct can be logged.
#[derive(Clone)]
pub struct JwtSettings {
    pub secret: Arc<[u8]>,
    pub issuer: Option<String>,
    pub audience: Option<String>,
    pub ttl_secs: u64,
    pub leeway_secs: u64,
}

impl JwtSettings {
    /// Settings with the given secret and default lifetimes.
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            secret: Arc::from(secret.as_ref()),
            issuer: None,
            audience: None,
            ttl_secs: DEFAULT_TOKEN_TTL_SECS,
            leeway_secs: DEFAULT_LEEWAY_SECS,
        }
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = Some(audience.into());
        self
    }
}

impl std::fmt::Debug for JwtSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtSettings")
            .field("secret", &"[REDACTED]")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("ttl_secs", &self.ttl_secs)
            .field("leeway_secs", &self.leeway_secs)
            .finish()
    }
}

/// Credentials for the admin account created at boot.
#[derive(Clone)]
pub struct SeedAdmin {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for SeedAdmin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeedAdmin")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Process-wide configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub database_url: String,
    pub jwt: JwtSettings,
    pub enable_swagger: bool,
    pub seed_admin: Option<SeedAdmin>,
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let environment = match var(APP_ENV_ENV) {
            Some(value) => Environment::parse(&value).ok_or(ConfigError::Invalid {
                name: APP_ENV_ENV,
                value,
            })?,
            None => Environment::Development,
        };

        let secret = match var(JWT_SECRET_ENV) {
            Some(secret) => secret,
            None if environment.is_development() => {
                tracing::warn!("JWT_SECRET not set, using the built-in development key");
                DEVELOPMENT_SECRET.to_string()
            }
            None => return Err(ConfigError::Missing(JWT_SECRET_ENV)),
        };
        if secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::WeakSecret);
        }

        let jwt = JwtSettings {
            secret: Arc::from(secret.as_bytes()),
            issuer: var(JWT_ISSUER_ENV),
            audience: var(JWT_AUDIENCE_ENV),
            ttl_secs: parse_or(var(JWT_TTL_ENV), JWT_TTL_ENV, DEFAULT_TOKEN_TTL_SECS)?,
            leeway_secs: parse_or(var(JWT_LEEWAY_ENV), JWT_LEEWAY_ENV, DEFAULT_LEEWAY_SECS)?,
        };
        if jwt.ttl_secs == 0 {
            return Err(ConfigError::Invalid {
                name: JWT_TTL_ENV,
                value: "0".to_string(),
            });
        }

        let enable_swagger = match var(ENABLE_SWAGGER_ENV) {
            Some(value) => parse_bool(&value).ok_or(ConfigError::Invalid {
                name: ENABLE_SWAGGER_ENV,
                value,
            })?,
            None => environment.is_development(),
        };

        let seed_admin = match (var(SEED_ADMIN_USERNAME_ENV), var(SEED_ADMIN_PASSWORD_ENV)) {
            (Some(username), Some(password)) => Some(SeedAdmin { username, password }),
            (None, None) => None,
            (Some(_), None) => return Err(ConfigError::Missing(SEED_ADMIN_PASSWORD_ENV)),
            (None, Some(_)) => return Err(ConfigError::Missing(SEED_ADMIN_USERNAME_ENV)),
        };

        Ok(Self {
            host: var(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: parse_or(var(PORT_ENV), PORT_ENV, DEFAULT_PORT)?,
            environment,
            database_url: var(DATABASE_URL_ENV).unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            jwt,
            enable_swagger,
            seed_admin,
        })
    }

    /// Socket address to bind.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| ConfigError::Invalid {
                name: HOST_ENV,
                value: self.host.clone(),
            })
    }
}

fn parse_or<T: std::str::FromStr>(
    value: Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
