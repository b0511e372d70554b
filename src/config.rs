//! Configuration for the PDF processing service

use std::env;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8001;
const DEFAULT_CORS_ORIGINS: &[&str] = &["http://localhost:3000", "http://127.0.0.1:3000"];
const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Network and upload configuration for the service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    /// Origins allowed to call the API with credentials
    pub cors_origins: Vec<String>,
    /// Maximum accepted request body size in bytes (default: 50MB)
    pub max_upload_bytes: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            cors_origins: DEFAULT_CORS_ORIGINS.iter().map(|o| o.to_string()).collect(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl ServiceConfig {
    /// Read configuration from `PDF_PROCESSOR_*` environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let host = lookup("PDF_PROCESSOR_HOST").unwrap_or(defaults.host);
        let port = parse_or_default(&lookup, "PDF_PROCESSOR_PORT", defaults.port);
        let max_upload_bytes = parse_or_default(
            &lookup,
            "PDF_PROCESSOR_MAX_UPLOAD_BYTES",
            defaults.max_upload_bytes,
        );
        let cors_origins = match lookup("PDF_PROCESSOR_CORS_ORIGINS") {
            Some(value) => value
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_string)
                .collect(),
            None => defaults.cors_origins,
        };

        Self {
            host,
            port,
            cors_origins,
            max_upload_bytes,
        }
    }

    /// Socket address string to bind to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or_default<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr + Copy + std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid value {:?} for {}, using default {}", raw, key, default);
            default
        }),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServiceConfig::from_lookup(lookup_from(&[]));
        assert_eq!(config, ServiceConfig::default());
        assert_eq!(config.bind_address(), "0.0.0.0:8001");
        assert_eq!(config.cors_origins.len(), 2);
    }

    #[test]
    fn test_overrides() {
        let config = ServiceConfig::from_lookup(lookup_from(&[
            ("PDF_PROCESSOR_HOST", "127.0.0.1"),
            ("PDF_PROCESSOR_PORT", "9000"),
            ("PDF_PROCESSOR_CORS_ORIGINS", "https://app.example.com, ,https://admin.example.com"),
            ("PDF_PROCESSOR_MAX_UPLOAD_BYTES", "1024"),
        ]));

        assert_eq!(config.bind_address(), "127.0.0.1:9000");
        assert_eq!(
            config.cors_origins,
            vec!["https://app.example.com", "https://admin.example.com"]
        );
        assert_eq!(config.max_upload_bytes, 1024);
    }

    #[test]
    fn test_invalid_numbers_fall_back_to_defaults() {
        let config = ServiceConfig::from_lookup(lookup_from(&[
            ("PDF_PROCESSOR_PORT", "not-a-port"),
            ("PDF_PROCESSOR_MAX_UPLOAD_BYTES", "-5"),
        ]));

        assert_eq!(config.port, 8001);
        assert_eq!(config.max_upload_bytes, 50 * 1024 * 1024);
    }
}
