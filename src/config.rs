//! Server configuration read from environment variables.

use std::env;

use thiserror::Error;

const DEFAULT_DATABASE_URL: &str = "app.db";
const DEFAULT_ADDRESS: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_JWT_ISSUER: &str = "catalog-service";
const DEFAULT_JWT_AUDIENCE: &str = "catalog-web";
const DEFAULT_JWT_DURATION_MINUTES: i64 = 30;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} environment variable not set")]
    Missing(&'static str),
    #[error("{name} has invalid value `{value}`")]
    Invalid { name: &'static str, value: String },
}

/// Settings used to issue and verify access tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audiences: Vec<String>,
    pub duration_minutes: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub database_url: String,
    pub address: String,
    pub port: u16,
    pub jwt: JwtConfig,
    /// Lowercased e-mail addresses that receive the admin role on registration.
    pub admin_emails: Vec<String>,
}

impl ServerConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Read the configuration through `lookup`, which returns the value of a
    /// variable when it is set.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        let address = lookup("ADDRESS").unwrap_or_else(|| DEFAULT_ADDRESS.to_string());
        let port = parse_or("PORT", lookup("PORT"), DEFAULT_PORT)?;

        let secret = lookup("JWT_SECRET")
            .filter(|value| !value.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;
        let issuer = lookup("JWT_ISSUER").unwrap_or_else(|| DEFAULT_JWT_ISSUER.to_string());
        let mut audiences = split_list(lookup("JWT_AUDIENCES").as_deref());
        if audiences.is_empty() {
            audiences.push(DEFAULT_JWT_AUDIENCE.to_string());
        }
        let duration_minutes = parse_or(
            "JWT_DURATION_MINUTES",
            lookup("JWT_DURATION_MINUTES"),
            DEFAULT_JWT_DURATION_MINUTES,
        )?;
        if duration_minutes <= 0 {
            return Err(ConfigError::Invalid {
                name: "JWT_DURATION_MINUTES",
                value: duration_minutes.to_string(),
            });
        }

        let admin_emails = split_list(lookup("ADMIN_EMAILS").as_deref())
            .into_iter()
            .map(|email| email.to_lowercase())
            .collect();

        Ok(Self {
            database_url,
            address,
            port,
            jwt: JwtConfig {
                secret,
                issuer,
                audiences,
                duration_minutes,
            },
            admin_emails,
        })
    }

    /// Whether an account registered with `email` gets the admin role.
    pub fn is_admin_email(&self, email: &str) -> bool {
        let email = email.trim().to_lowercase();
        self.admin_emails.iter().any(|admin| *admin == email)
    }
}

fn parse_or<T: std::str::FromStr>(
    name: &'static str,
    value: Option<String>,
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

fn split_list(value: Option<&str>) -> Vec<String> {
    value
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
