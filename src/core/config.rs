use anyhow::{Context, Result};
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub path_prefix: String, // "/public" on most deployments, "" on bare layouts
    pub username: String,
    pub password: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let config = Config {
            base_url: env::var("TILECHECK_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            path_prefix: env::var("TILECHECK_PATH_PREFIX")
                .unwrap_or_else(|_| "/public".to_string()),
            username: env::var("TILECHECK_USERNAME").unwrap_or_else(|_| "admin".to_string()),
            password: env::var("TILECHECK_PASSWORD").unwrap_or_else(|_| "admin123".to_string()),
            timeout_secs: env::var("TILECHECK_TIMEOUT_SECS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .context("Invalid TILECHECK_TIMEOUT_SECS value")?,
            user_agent: env::var("TILECHECK_USER_AGENT").unwrap_or_else(|_| {
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string()
            }),
        };

        if !config.base_url.starts_with("http://") && !config.base_url.starts_with("https://") {
            return Err(anyhow::anyhow!(
                "Invalid TILECHECK_BASE_URL: {} (must start with http:// or https://)",
                config.base_url
            ));
        }

        Ok(config)
    }

    /// Absolute URL for a page name like `tiles_purchase.php`.
    pub fn page_url(&self, page: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let prefix = self.path_prefix.trim_end_matches('/');
        if prefix.is_empty() {
            format!("{}/{}", base, page)
        } else {
            format!("{}{}/{}", base, prefix, page)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(base_url: &str, prefix: &str) -> Config {
        Config {
            base_url: base_url.to_string(),
            path_prefix: prefix.to_string(),
            username: "admin".to_string(),
            password: "admin123".to_string(),
            timeout_secs: 10,
            user_agent: "test".to_string(),
        }
    }

    #[test]
    fn test_page_url_with_prefix() {
        let cfg = config_with("http://localhost:8080", "/public");
        assert_eq!(
            cfg.page_url("login_clean.php"),
            "http://localhost:8080/public/login_clean.php"
        );
    }

    #[test]
    fn test_page_url_without_prefix() {
        let cfg = config_with("http://localhost:8080/", "");
        assert_eq!(
            cfg.page_url("invoice_list.php"),
            "http://localhost:8080/invoice_list.php"
        );
    }

    #[test]
    fn test_page_url_trailing_slashes_collapse() {
        let cfg = config_with("http://localhost:8080/", "/public/");
        assert_eq!(
            cfg.page_url("reports_dashboard.php"),
            "http://localhost:8080/public/reports_dashboard.php"
        );
    }
}
