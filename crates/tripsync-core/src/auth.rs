//! One-time-authorization OAuth flow for the Trip Source API.
//!
//! 1. Prints the authorization URL for the operator to open
//! 2. Starts a tiny localhost HTTP server to receive the redirect
//! 3. Persists the captured authorization code to a plain file
//! 4. Exchanges the code for a short-lived bearer token each run
//!
//! The bearer token itself is never stored; its lifetime ends with the
//! process. Only the authorization code survives between runs.

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener};
use std::path::PathBuf;

use reqwest::Client;
use tracing::{error, info};

use crate::config::{ListenerConfig, TripSourceConfig};
use crate::error::AuthError;

/// A run-scoped bearer session.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub access_token: String,
}

/// Plain-file store for the authorization code.
#[derive(Debug, Clone)]
pub struct AuthCodeStore {
    path: PathBuf,
}

impl AuthCodeStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Stored code, if any. Surrounding whitespace is stripped.
    pub fn load(&self) -> Result<Option<String>, std::io::Error> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => {
                let code = content.trim().to_string();
                Ok(if code.is_empty() { None } else { Some(code) })
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub fn save(&self, code: &str) -> Result<(), std::io::Error> {
        std::fs::write(&self.path, code)
    }

    /// Remove the stored code. Absence is not an error.
    pub fn clear(&self) -> Result<(), std::io::Error> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

/// Single-shot listener for the authorization redirect.
///
/// Holds the bound socket as a scoped resource: it is released when the
/// value drops, on every exit path.
pub struct CodeListener {
    listener: TcpListener,
}

impl CodeListener {
    pub fn bind(host: &str, port: u16) -> Result<Self, AuthError> {
        let listener = TcpListener::bind((host, port))?;
        Ok(Self { listener })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, AuthError> {
        Ok(self.listener.local_addr()?)
    }

    /// Block until exactly one request arrives, answer it with a static
    /// HTML page, and return the `code` query parameter.
    ///
    /// Waits indefinitely: the flow expects a human completing the grant in
    /// a browser. Non-interactive environments must not reach this path.
    pub fn wait_for_code(self) -> Result<String, AuthError> {
        let (mut stream, peer) = self.listener.accept()?;
        info!(%peer, "authorization redirect received");

        let mut buf = [0u8; 4096];
        let n = stream.read(&mut buf)?;
        let request = String::from_utf8_lossy(&buf[..n]);

        let code = extract_code(&request);
        let body = match &code {
            Some(_) => "Authentication successful. You can close this window.",
            None => "Failed to authenticate.",
        };
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: {}\r\n\r\n{}",
            body.len(),
            body
        );
        stream.write_all(response.as_bytes())?;

        code.ok_or_else(|| {
            AuthError::InvalidCallback("redirect request carried no code parameter".to_string())
        })
    }
}

/// Pull the `code` query parameter out of the request line.
fn extract_code(request: &str) -> Option<String> {
    let first_line = request.lines().next()?;
    let path = first_line.split_whitespace().nth(1)?;
    let url = url::Url::parse(&format!("http://localhost{path}")).ok()?;
    url.query_pairs()
        .find(|(k, _)| k == "code")
        .map(|(_, v)| v.to_string())
}

/// Owns the authorization-code lifecycle: load-from-disk or interactive
/// capture, then token exchange.
pub struct AuthFlow {
    config: TripSourceConfig,
    listener: ListenerConfig,
    store: AuthCodeStore,
}

impl AuthFlow {
    pub fn new(config: TripSourceConfig, listener: ListenerConfig) -> Self {
        let store = AuthCodeStore::new(config.auth_code_file.clone());
        Self {
            config,
            listener,
            store,
        }
    }

    /// The URL the operator opens to grant access.
    pub fn authorize_url(&self) -> String {
        format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&scope=basic",
            self.config.auth_url,
            urlencoding::encode(&self.config.client_id),
            urlencoding::encode(&self.config.redirect_uri),
        )
    }

    pub fn has_stored_code(&self) -> Result<bool, AuthError> {
        Ok(self.store.load()?.is_some())
    }

    pub fn clear_stored_code(&self) -> Result<(), AuthError> {
        Ok(self.store.clear()?)
    }

    /// Produce a bearer session for this run.
    ///
    /// Uses the stored authorization code when one exists; otherwise runs
    /// the interactive capture and persists the code before exchanging it.
    ///
    /// # Errors
    ///
    /// Fatal for the run: no token means nothing downstream can proceed.
    pub async fn obtain_session(&self, client: &Client) -> Result<AuthSession, AuthError> {
        let code = match self.store.load()? {
            Some(code) => {
                info!("found stored authorization code");
                code
            }
            None => {
                let code = self.capture_code()?;
                self.store.save(&code)?;
                info!("authorization code captured and persisted");
                code
            }
        };

        self.exchange_code(client, &code).await
    }

    /// Interactive capture: print the grant URL and block on the one-shot
    /// redirect listener.
    fn capture_code(&self) -> Result<String, AuthError> {
        println!("Please navigate to the following URL to authorize:");
        println!("{}", self.authorize_url());

        let listener = CodeListener::bind(&self.listener.host, self.listener.port)?;
        println!(
            "Listening on {}:{} for the authorization redirect...",
            self.listener.host, self.listener.port
        );
        listener.wait_for_code()
    }

    async fn exchange_code(&self, client: &Client, code: &str) -> Result<AuthSession, AuthError> {
        let body = serde_json::json!({
            "client_id": self.config.client_id,
            "client_secret": self.config.client_secret,
            "grant_type": "authorization_code",
            "code": code,
            "redirect_uri": self.config.redirect_uri,
        });

        let resp = client.post(&self.config.token_url).json(&body).send().await?;
        let status = resp.status();
        if !status.is_success() {
            error!(
                endpoint = %self.config.token_url,
                status = status.as_u16(),
                "token exchange failed"
            );
            return Err(AuthError::TokenExchangeFailed {
                status: status.as_u16(),
            });
        }

        let tokens: serde_json::Value = resp.json().await?;
        let access_token = tokens["access_token"]
            .as_str()
            .ok_or(AuthError::MissingAccessToken)?;

        Ok(AuthSession {
            access_token: access_token.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ListenerConfig;

    fn flow_with(auth_code_file: PathBuf) -> AuthFlow {
        AuthFlow::new(
            TripSourceConfig {
                client_id: "id with spaces".to_string(),
                client_secret: "secret".to_string(),
                redirect_uri: "http://localhost:8080/callback".to_string(),
                auth_url: "https://auth.example.com/authorize".to_string(),
                token_url: "https://auth.example.com/token".to_string(),
                endpoint_url: "https://api.example.com".to_string(),
                auth_code_file,
            },
            ListenerConfig::default(),
        )
    }

    #[test]
    fn extract_code_from_redirect_request() {
        let request = "GET /callback?code=abc123&state=xyz HTTP/1.1\r\nHost: localhost\r\n\r\n";
        assert_eq!(extract_code(request).as_deref(), Some("abc123"));
    }

    #[test]
    fn extract_code_missing_parameter() {
        let request = "GET /callback?error=access_denied HTTP/1.1\r\n\r\n";
        assert_eq!(extract_code(request), None);
    }

    #[test]
    fn authorize_url_encodes_parameters() {
        let dir = tempfile::tempdir().unwrap();
        let flow = flow_with(dir.path().join("auth_code.txt"));
        let url = flow.authorize_url();
        assert!(url.starts_with("https://auth.example.com/authorize?client_id=id%20with%20spaces"));
        assert!(url.contains("redirect_uri=http%3A%2F%2Flocalhost%3A8080%2Fcallback"));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("scope=basic"));
    }

    #[test]
    fn code_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = AuthCodeStore::new(dir.path().join("auth_code.txt"));

        assert_eq!(store.load().unwrap(), None);
        store.save("grant-code").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("grant-code"));
        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
        // Clearing twice stays quiet.
        store.clear().unwrap();
    }

    #[test]
    fn code_store_strips_whitespace() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("auth_code.txt");
        std::fs::write(&path, "  grant-code\n").unwrap();
        let store = AuthCodeStore::new(path);
        assert_eq!(store.load().unwrap().as_deref(), Some("grant-code"));
    }

    #[test]
    fn listener_captures_single_redirect() {
        let listener = CodeListener::bind("127.0.0.1", 0).unwrap();
        let addr = listener.local_addr().unwrap();

        let sender = std::thread::spawn(move || {
            let mut stream = std::net::TcpStream::connect(addr).unwrap();
            stream
                .write_all(b"GET /callback?code=thread-code HTTP/1.1\r\nHost: localhost\r\n\r\n")
                .unwrap();
            let mut response = String::new();
            stream.read_to_string(&mut response).unwrap();
            response
        });

        let code = listener.wait_for_code().unwrap();
        assert_eq!(code, "thread-code");

        let response = sender.join().unwrap();
        assert!(response.starts_with("HTTP/1.1 200 OK"));
        assert!(response.contains("Authentication successful"));
    }

    #[test]
    fn listener_rejects_redirect_without_code() {
        let listener = CodeListener::bind("127.0.0.1", 0).unwrap();
        let addr = listener.local_addr().unwrap();

        let sender = std::thread::spawn(move || {
            let mut stream = std::net::TcpStream::connect(addr).unwrap();
            stream
                .write_all(b"GET /callback?error=denied HTTP/1.1\r\n\r\n")
                .unwrap();
            let mut response = String::new();
            stream.read_to_string(&mut response).unwrap();
            response
        });

        let result = listener.wait_for_code();
        assert!(matches!(result, Err(AuthError::InvalidCallback(_))));

        let response = sender.join().unwrap();
        assert!(response.contains("Failed to authenticate"));
    }
}
