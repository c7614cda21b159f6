use reqwest::header::LOCATION;
use reqwest::redirect::Policy;
use std::time::Duration;

use crate::core::config::Config;
use crate::core::error::{Error, Result};
use crate::client::page::Page;

const LOGIN_PAGE: &str = "login_clean.php";
const PROTECTED_PROBE: &str = "reports_dashboard.php";
const MAX_REDIRECTS: usize = 5;

/// Cookie-backed session against the application under test.
///
/// Redirects are never followed by the client itself; the session follows
/// them manually so that 302-based assertions (login, quotation creation)
/// can see the raw redirect.
pub struct Session {
    http: reqwest::Client,
    config: Config,
    username: String,
    password: String,
    authenticated: Option<bool>,
    auth_failure: Option<String>,
}

impl Session {
    pub fn new(config: &Config) -> Result<Self> {
        let username = config.username.clone();
        let password = config.password.clone();
        Self::with_credentials(config, &username, &password)
    }

    /// Session with explicit credentials, for probing rejected logins.
    pub fn with_credentials(config: &Config, username: &str, password: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .redirect(Policy::none())
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            config: config.clone(),
            username: username.to_string(),
            password: password.to_string(),
            authenticated: None,
            auth_failure: None,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated == Some(true)
    }

    /// Why the last login attempt failed, if it did.
    pub fn auth_failure(&self) -> Option<&str> {
        self.auth_failure.as_deref()
    }

    /// Authenticate against the login form. Idempotent: both outcomes are
    /// memoized, so a second call performs no network I/O.
    pub async fn login(&mut self) -> Result<bool> {
        if let Some(done) = self.authenticated {
            return Ok(done);
        }

        let outcome = self.do_login().await?;
        self.authenticated = Some(outcome);
        Ok(outcome)
    }

    async fn do_login(&mut self) -> Result<bool> {
        let login_url = self.config.page_url(LOGIN_PAGE);

        // GET first so the server hands out its session cookie.
        let login_page = self.get(LOGIN_PAGE).await?;
        if login_page.status != 200 {
            self.auth_failure = Some(format!(
                "Cannot access login page: HTTP {}",
                login_page.status
            ));
            return Ok(false);
        }

        let form = [
            ("username".to_string(), self.username.clone()),
            ("password".to_string(), self.password.clone()),
        ];
        let resp = self
            .http
            .post(login_url.as_str())
            .header("Referer", login_url.as_str())
            .form(&form)
            .send()
            .await
            .map_err(|e| Error::Transport(format!("Login POST failed: {}", e)))?;

        let status = resp.status();
        let location = resp
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());
        let body = resp
            .text()
            .await
            .map_err(|e| Error::Transport(format!("Failed to read login response: {}", e)))?;

        // Redirect away from the login page is the normal success signal.
        if status.is_redirection() {
            match location {
                Some(ref loc) if !loc.to_lowercase().contains("login") => {
                    log::debug!("Login redirect to {}", loc);
                    return Ok(true);
                }
                _ => {
                    self.auth_failure =
                        Some(format!("Login redirected back to login page ({})", status));
                    return Ok(false);
                }
            }
        }

        if body.contains("Invalid username or password") {
            self.auth_failure = Some("Invalid username or password".to_string());
            return Ok(false);
        }

        // Some deployments answer the POST with 200; fall back to probing a
        // protected page.
        let probe = self.get(PROTECTED_PROBE).await?;
        if probe.status == 200 && !probe.is_login_page() {
            return Ok(true);
        }

        self.auth_failure = Some(format!(
            "Login POST returned HTTP {} and protected page probe was bounced",
            status
        ));
        Ok(false)
    }

    /// GET a page, following redirects manually.
    pub async fn get(&self, page: &str) -> Result<Page> {
        self.get_url(&self.config.page_url(page), None).await
    }

    /// GET a page with query parameters.
    pub async fn get_with_query(&self, page: &str, query: &[(String, String)]) -> Result<Page> {
        self.get_url(&self.config.page_url(page), Some(query)).await
    }

    async fn get_url(&self, url: &str, query: Option<&[(String, String)]>) -> Result<Page> {
        let mut req = self.http.get(url);
        if let Some(q) = query {
            req = req.query(q);
        }
        let resp = req
            .send()
            .await
            .map_err(|e| Error::Transport(format!("GET {} failed: {}", url, e)))?;
        self.follow(resp).await
    }

    /// POST a form and return the raw response without following redirects.
    pub async fn post_form(&self, page: &str, form: &[(String, String)]) -> Result<Page> {
        let url = self.config.page_url(page);
        let resp = self
            .http
            .post(url.as_str())
            .form(form)
            .send()
            .await
            .map_err(|e| Error::Transport(format!("POST {} failed: {}", url, e)))?;
        Self::snapshot(resp).await
    }

    /// POST a form and follow any redirect chain to the final page, the way
    /// a browser would (GET after 302).
    pub async fn post_form_followed(&self, page: &str, form: &[(String, String)]) -> Result<Page> {
        let url = self.config.page_url(page);
        let resp = self
            .http
            .post(url.as_str())
            .form(form)
            .send()
            .await
            .map_err(|e| Error::Transport(format!("POST {} failed: {}", url, e)))?;
        self.follow(resp).await
    }

    async fn follow(&self, mut resp: reqwest::Response) -> Result<Page> {
        let mut hops = 0;
        while resp.status().is_redirection() && hops < MAX_REDIRECTS {
            let current = resp.url().to_string();
            let Some(loc) = resp
                .headers()
                .get(LOCATION)
                .and_then(|v| v.to_str().ok())
                .map(|v| v.to_string())
            else {
                break;
            };
            let next = resolve_location(&current, &loc);
            log::debug!("Following redirect {} -> {}", current, next);
            resp = self
                .http
                .get(next.as_str())
                .send()
                .await
                .map_err(|e| Error::Transport(format!("GET {} failed: {}", next, e)))?;
            hops += 1;
        }
        Self::snapshot(resp).await
    }

    async fn snapshot(resp: reqwest::Response) -> Result<Page> {
        let status = resp.status().as_u16();
        let final_url = resp.url().to_string();
        let location = resp
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());
        let body = resp
            .text()
            .await
            .map_err(|e| Error::Transport(format!("Failed to read response body: {}", e)))?;
        Ok(Page {
            status,
            final_url,
            location,
            body,
        })
    }
}

/// Resolve a Location header value against the URL it was served from.
fn resolve_location(current: &str, location: &str) -> String {
    if location.starts_with("http://") || location.starts_with("https://") {
        return location.to_string();
    }

    if let Some(rest) = location.strip_prefix('/') {
        return format!("{}/{}", origin(current), rest);
    }

    // Relative to the current page's directory.
    match current.rfind('/') {
        Some(idx) if idx > current.find("//").map(|i| i + 1).unwrap_or(0) => {
            format!("{}/{}", &current[..idx], location)
        }
        _ => format!("{}/{}", current.trim_end_matches('/'), location),
    }
}

/// Scheme and authority of a URL, without any path.
fn origin(url: &str) -> String {
    let scheme_end = url.find("//").map(|i| i + 2).unwrap_or(0);
    match url[scheme_end..].find('/') {
        Some(idx) => url[..scheme_end + idx].to_string(),
        None => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_absolute_location() {
        assert_eq!(
            resolve_location(
                "http://localhost:8080/public/login_clean.php",
                "http://localhost:8080/public/index.php"
            ),
            "http://localhost:8080/public/index.php"
        );
    }

    #[test]
    fn test_resolve_root_relative_location() {
        assert_eq!(
            resolve_location("http://localhost:8080/public/login_clean.php", "/index.php"),
            "http://localhost:8080/index.php"
        );
    }

    #[test]
    fn test_resolve_page_relative_location() {
        assert_eq!(
            resolve_location(
                "http://localhost:8080/public/login_clean.php",
                "quotation_enhanced.php?id=13"
            ),
            "http://localhost:8080/public/quotation_enhanced.php?id=13"
        );
    }

    #[test]
    fn test_origin_without_path() {
        assert_eq!(origin("http://localhost:8080"), "http://localhost:8080");
        assert_eq!(
            origin("https://shop.example.com/public/x.php"),
            "https://shop.example.com"
        );
    }
}
