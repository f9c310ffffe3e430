use std::{env, path::PathBuf};

use anyhow::{Context, Result};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";
const DEFAULT_APP_URL: &str = "http://localhost";
const DEFAULT_STORAGE_ROOT: &str = "storage";

/// Environment-derived settings, read once at startup.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub port: u16,
    /// Single origin allowed by the CORS layer.
    pub cors_origin: String,
    /// Public base URL used for sitemap entries, no trailing slash.
    pub app_url: String,
    /// Directory that receives submission uploads and media files.
    pub storage_root: PathBuf,
    pub recaptcha_secret: Option<String>,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL env var is missing")?;

        Ok(Self {
            database_url,
            port: parse_port(env::var("PORT").ok()),
            cors_origin: env::var("CORS_ORIGIN")
                .unwrap_or_else(|_| DEFAULT_CORS_ORIGIN.to_string()),
            app_url: normalize_base_url(
                env::var("APP_URL").unwrap_or_else(|_| DEFAULT_APP_URL.to_string()),
            ),
            storage_root: env::var("STORAGE_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_STORAGE_ROOT)),
            recaptcha_secret: non_empty(env::var("RECAPTCHA_SECRET").ok()),
            admin_email: non_empty(env::var("ADMIN_EMAIL").ok()),
            admin_password: non_empty(env::var("ADMIN_PASSWORD").ok()),
        })
    }
}

fn parse_port(raw: Option<String>) -> u16 {
    raw.and_then(|port| port.parse().ok()).unwrap_or(DEFAULT_PORT)
}

fn normalize_base_url(url: String) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn non_empty(raw: Option<String>) -> Option<String> {
    raw.map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_port_defaults_when_unset_or_invalid() {
        assert_eq!(parse_port(None), DEFAULT_PORT);
        assert_eq!(parse_port(Some("not-a-port".to_string())), DEFAULT_PORT);
        assert_eq!(parse_port(Some("3005".to_string())), 3005);
    }

    #[test]
    fn normalize_base_url_strips_trailing_slash() {
        assert_eq!(
            normalize_base_url("https://example.org/".to_string()),
            "https://example.org"
        );
        assert_eq!(
            normalize_base_url("https://example.org".to_string()),
            "https://example.org"
        );
    }

    #[test]
    fn non_empty_filters_blank_values() {
        assert_eq!(non_empty(None), None);
        assert_eq!(non_empty(Some("  ".to_string())), None);
        assert_eq!(non_empty(Some(" secret ".to_string())), Some("secret".to_string()));
    }
}
