//! Configuration module
//!
//! Loads configuration from environment variables.

use std::env;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::domain::{round_money, AccountKind, DomainError};

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Database connection URL
    pub database_url: String,

    /// Maximum database connections in pool
    pub database_max_connections: u32,

    /// Environment (development, production)
    pub environment: String,

    pub ledger: LedgerConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = env::var("DATABASE_URL")
            .map_err(|_| ConfigError::MissingEnv("DATABASE_URL"))?;

        let database_max_connections = env_or("DATABASE_MAX_CONNECTIONS", 10)?;

        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        Ok(Self {
            database_url,
            database_max_connections,
            environment,
            ledger: LedgerConfig::from_env()?,
        })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Deposit rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerConfig {
    /// Added on top of qualifying deposits (0.10 = 10%)
    pub deposit_surcharge_rate: Decimal,

    /// Smallest deposit that qualifies for the surcharge
    pub deposit_surcharge_threshold: Decimal,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            deposit_surcharge_rate: Decimal::new(10, 2),
            deposit_surcharge_threshold: Decimal::ONE_HUNDRED,
        }
    }
}

impl LedgerConfig {
    /// Load ledger settings, falling back to the defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let config = Self {
            deposit_surcharge_rate: env_or("DEPOSIT_SURCHARGE_RATE", defaults.deposit_surcharge_rate)?,
            deposit_surcharge_threshold: env_or(
                "DEPOSIT_SURCHARGE_THRESHOLD",
                defaults.deposit_surcharge_threshold,
            )?,
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.deposit_surcharge_rate < Decimal::ZERO {
            return Err(ConfigError::InvalidValue("DEPOSIT_SURCHARGE_RATE"));
        }
        if self.deposit_surcharge_threshold < Decimal::ZERO {
            return Err(ConfigError::InvalidValue("DEPOSIT_SURCHARGE_THRESHOLD"));
        }
        Ok(())
    }

    /// Amount actually credited for a deposit of `amount` into an account
    /// of `kind`. The surcharge is added to the deposit, not taken from it.
    pub fn surcharged_amount(&self, kind: AccountKind, amount: Decimal) -> Result<Decimal, DomainError> {
        if !kind.has_deposit_surcharge() || amount < self.deposit_surcharge_threshold {
            return Ok(amount);
        }

        Decimal::ONE
            .checked_add(self.deposit_surcharge_rate)
            .and_then(|factor| amount.checked_mul(factor))
            .map(round_money)
            .ok_or_else(|| DomainError::InvalidAmount(format!("surcharge on {amount} overflows")))
    }
}

fn env_or<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue(name)),
        Err(_) => Ok(default),
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(&'static str),
}
