//! Process configuration, read once at startup from the environment.

use std::net::SocketAddr;

use thiserror::Error;

use coffeeshop_auth::VerifierConfig;

pub const DEFAULT_AUDIENCE: &str = "drinks";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var}={value:?} is invalid: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Auth0 tenant domain, e.g. `coffeeshop.us.auth0.com`.
    pub auth0_domain: String,
    pub audience: String,
    pub bind_addr: SocketAddr,
    /// `None` keeps drinks in process memory.
    pub database_url: Option<String>,
    /// Drop and re-seed the drinks table before serving.
    pub reset_database: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let auth0_domain = var("AUTH0_DOMAIN").ok_or(ConfigError::Missing("AUTH0_DOMAIN"))?;
        let audience = var("API_AUDIENCE").unwrap_or_else(|| DEFAULT_AUDIENCE.to_string());

        let raw_addr = var("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = raw_addr.parse().map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
            var: "BIND_ADDR",
            value: raw_addr.clone(),
            reason: e.to_string(),
        })?;

        let reset_database = match var("RESET_DATABASE") {
            None => false,
            Some(raw) => parse_flag(&raw).ok_or_else(|| ConfigError::Invalid {
                var: "RESET_DATABASE",
                value: raw.clone(),
                reason: "expected true/false".to_string(),
            })?,
        };

        Ok(Self {
            auth0_domain,
            audience,
            bind_addr,
            database_url: var("DATABASE_URL"),
            reset_database,
        })
    }

    pub fn verifier_config(&self) -> VerifierConfig {
        VerifierConfig::for_auth0_domain(&self.auth0_domain, self.audience.clone())
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn domain_is_required() {
        assert_eq!(config(&[]), Err(ConfigError::Missing("AUTH0_DOMAIN")));
        assert_eq!(
            config(&[("AUTH0_DOMAIN", "  ")]),
            Err(ConfigError::Missing("AUTH0_DOMAIN"))
        );
    }

    #[test]
    fn defaults_apply() {
        let cfg = config(&[("AUTH0_DOMAIN", "shop.eu.auth0.com")]).unwrap();
        assert_eq!(cfg.audience, "drinks");
        assert_eq!(cfg.bind_addr, "0.0.0.0:5000".parse().unwrap());
        assert_eq!(cfg.database_url, None);
        assert!(!cfg.reset_database);
    }

    #[test]
    fn overrides_are_read() {
        let cfg = config(&[
            ("AUTH0_DOMAIN", "shop.eu.auth0.com"),
            ("API_AUDIENCE", "coffee"),
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("DATABASE_URL", "sqlite://drinks.db"),
            ("RESET_DATABASE", "TRUE"),
        ])
        .unwrap();

        assert_eq!(cfg.audience, "coffee");
        assert_eq!(cfg.bind_addr.port(), 8080);
        assert_eq!(cfg.database_url.as_deref(), Some("sqlite://drinks.db"));
        assert!(cfg.reset_database);
    }

    #[test]
    fn bad_values_are_rejected() {
        let err = config(&[("AUTH0_DOMAIN", "d"), ("BIND_ADDR", "nowhere")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "BIND_ADDR", .. }));

        let err = config(&[("AUTH0_DOMAIN", "d"), ("RESET_DATABASE", "maybe")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "RESET_DATABASE", .. }));
    }

    #[test]
    fn verifier_expects_auth0_issuer() {
        let cfg = config(&[("AUTH0_DOMAIN", "shop.eu.auth0.com")]).unwrap();
        let verifier = cfg.verifier_config();
        assert_eq!(verifier.issuer, "https://shop.eu.auth0.com/");
        assert_eq!(verifier.audience, "drinks");
    }
}
