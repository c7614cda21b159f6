//! Fixture HTTP server for harness tests.
//!
//! Serves literal, hand-constructed HTTP/1.1 responses over a local
//! listener so harness logic can be exercised without a live deployment.
//! Requests are counted per method+path so tests can assert on how much
//! network I/O an operation performed.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::Mutex;

use tilecheck::core::config::Config;

pub struct Route {
    pub method: &'static str,
    /// Matched against the request path with any query string stripped.
    pub path: &'static str,
    pub response: String,
}

impl Route {
    pub fn get(path: &'static str, response: String) -> Self {
        Self {
            method: "GET",
            path,
            response,
        }
    }

    pub fn post(path: &'static str, response: String) -> Self {
        Self {
            method: "POST",
            path,
            response,
        }
    }
}

pub struct FixtureServer {
    pub base_url: String,
    hits: Arc<Mutex<HashMap<String, usize>>>,
}

impl FixtureServer {
    pub async fn start(routes: Vec<Route>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fixture listener");
        let addr = listener.local_addr().expect("fixture local addr");
        let hits: Arc<Mutex<HashMap<String, usize>>> = Arc::new(Mutex::new(HashMap::new()));
        let routes = Arc::new(routes);

        let accept_hits = Arc::clone(&hits);
        tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    break;
                };
                let routes = Arc::clone(&routes);
                let hits = Arc::clone(&accept_hits);
                tokio::spawn(async move {
                    serve_connection(stream, &routes, &hits).await;
                });
            }
        });

        Self {
            base_url: format!("http://{}", addr),
            hits,
        }
    }

    /// Harness config pointing at this fixture server, bare path layout.
    pub fn config(&self) -> Config {
        Config {
            base_url: self.base_url.clone(),
            path_prefix: String::new(),
            username: "admin".to_string(),
            password: "admin123".to_string(),
            timeout_secs: 5,
            user_agent: "tilecheck-tests".to_string(),
        }
    }

    pub async fn hits(&self, method: &str, path: &str) -> usize {
        let hits = self.hits.lock().await;
        hits.get(&format!("{} {}", method, path)).copied().unwrap_or(0)
    }

    pub async fn total_hits(&self) -> usize {
        let hits = self.hits.lock().await;
        hits.values().sum()
    }
}

async fn serve_connection(
    mut stream: tokio::net::TcpStream,
    routes: &[Route],
    hits: &Mutex<HashMap<String, usize>>,
) {
    let mut data = Vec::new();
    let mut buf = [0u8; 8192];

    loop {
        let n = match stream.read(&mut buf).await {
            Ok(0) | Err(_) => break,
            Ok(n) => n,
        };
        data.extend_from_slice(&buf[..n]);

        if let Some(header_end) = find_subsequence(&data, b"\r\n\r\n") {
            let headers = String::from_utf8_lossy(&data[..header_end]);
            let content_length = headers
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    if name.eq_ignore_ascii_case("content-length") {
                        value.trim().parse::<usize>().ok()
                    } else {
                        None
                    }
                })
                .unwrap_or(0);
            if data.len() - (header_end + 4) >= content_length {
                break;
            }
        }
    }

    let request = String::from_utf8_lossy(&data);
    let request_line = request.lines().next().unwrap_or("");
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or("");
    let target = parts.next().unwrap_or("");
    let path = target.split('?').next().unwrap_or("");

    {
        let mut hits = hits.lock().await;
        *hits.entry(format!("{} {}", method, path)).or_insert(0) += 1;
    }

    let response = routes
        .iter()
        .find(|r| r.method == method && r.path == path)
        .map(|r| r.response.clone())
        .unwrap_or_else(|| html_response(404, "<html>not found</html>"));

    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.shutdown().await;
}

fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

pub fn html_response(status: u16, body: &str) -> String {
    let reason = match status {
        200 => "OK",
        302 => "Found",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "OK",
    };
    format!(
        "HTTP/1.1 {} {}\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        reason,
        body.len(),
        body
    )
}

pub fn redirect_response(location: &str) -> String {
    format!(
        "HTTP/1.1 302 Found\r\nLocation: {}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        location
    )
}

/// The login form every fixture deployment serves.
pub fn login_form_response() -> String {
    html_response(
        200,
        r#"<html><body><form method="post">
            <input type="text" name="username">
            <input type="password" name="password">
            <button type="submit">Login</button>
        </form></body></html>"#,
    )
}
