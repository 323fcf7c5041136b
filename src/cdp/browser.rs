//! CDP browser control implementation
//!
//! Talks to the DevTools HTTP endpoint of an already running Chrome to open
//! and close page targets, and attaches WebSocket clients to them.

use super::client::CdpClientImpl;
use super::connection::CdpWebSocketConnection;
use super::traits::*;
use super::types::{TargetDescription, VersionDescription};
use crate::Error;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// CDP browser implementation
#[derive(Debug)]
pub struct CdpBrowserImpl {
    /// Browser endpoint (e.g., "ws://localhost:9222")
    endpoint: String,
    http: reqwest::Client,
    /// Active connections (target ws url -> connection)
    connections: tokio::sync::Mutex<HashMap<String, Arc<dyn CdpConnection>>>,
}

impl CdpBrowserImpl {
    /// Create a new CDP browser controller
    ///
    /// # Arguments
    /// * `endpoint` - Browser endpoint, `ws://` or `http://` (e.g., "ws://localhost:9222")
    pub fn new<S: Into<String>>(endpoint: S) -> Self {
        let endpoint = endpoint.into();
        info!("Creating CDP browser controller for endpoint: {}", endpoint);
        Self {
            endpoint,
            http: reqwest::Client::new(),
            connections: tokio::sync::Mutex::new(HashMap::new()),
        }
    }

    /// HTTP base of the DevTools endpoint
    pub fn http_endpoint(&self) -> String {
        let http = if let Some(rest) = self.endpoint.strip_prefix("ws://") {
            format!("http://{}", rest)
        } else if let Some(rest) = self.endpoint.strip_prefix("wss://") {
            format!("https://{}", rest)
        } else {
            self.endpoint.clone()
        };
        http.trim_end_matches('/').to_string()
    }

    fn unreachable(&self, e: reqwest::Error) -> Error {
        Error::cdp(format!(
            r#"Failed to reach Chrome DevTools endpoint at {}.
Start Chrome with remote debugging enabled, for example:
  google-chrome --headless=new --remote-debugging-port=9222 --user-data-dir=/tmp/paylink-e2e
Original error: {}"#,
            self.endpoint, e
        ))
    }
}

#[async_trait]
impl CdpBrowser for CdpBrowserImpl {
    async fn create_client(&self, target_ws_url: &str) -> Result<Arc<dyn CdpClient>, Error> {
        info!("Creating CDP client for target: {}", target_ws_url);

        let connection = CdpWebSocketConnection::connect(target_ws_url).await?;
        self.connections
            .lock()
            .await
            .insert(target_ws_url.to_string(), connection.clone() as Arc<dyn CdpConnection>);

        let client = Arc::new(CdpClientImpl::new(connection));
        client.enable_domain("Page").await?;
        client.enable_domain("Runtime").await?;

        Ok(client)
    }

    async fn create_target(&self, url: &str) -> Result<TargetInfo, Error> {
        let new_url = format!("{}/json/new?{}", self.http_endpoint(), url);
        debug!("Creating new page via HTTP API: {}", new_url);

        let response = self
            .http
            .put(&new_url)
            .send()
            .await
            .map_err(|e| self.unreachable(e))?;

        let target: TargetDescription = response
            .json()
            .await
            .map_err(|e| Error::cdp(format!("Failed to parse new target response: {}", e)))?;

        debug!("Created target {} at {}", target.id, target.web_socket_debugger_url);

        Ok(TargetInfo {
            target_id: target.id,
            url: target.url,
            ws_url: target.web_socket_debugger_url,
        })
    }

    async fn close_target(&self, target_id: &str) -> Result<(), Error> {
        let url = format!("{}/json/close/{}", self.http_endpoint(), target_id);
        debug!("Closing target via HTTP API: {}", url);

        self.http
            .get(&url)
            .send()
            .await
            .map_err(|e| self.unreachable(e))?;

        let mut connections = self.connections.lock().await;
        let closed: Vec<String> = connections
            .keys()
            .filter(|ws_url| ws_url.ends_with(target_id))
            .cloned()
            .collect();
        for ws_url in closed {
            if let Some(connection) = connections.remove(&ws_url) {
                let _ = connection.close().await;
            }
        }

        Ok(())
    }

    async fn get_version(&self) -> Result<BrowserVersion, Error> {
        let url = format!("{}/json/version", self.http_endpoint());
        debug!("Fetching browser version from {}", url);

        let version: VersionDescription = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| self.unreachable(e))?
            .json()
            .await
            .map_err(|e| Error::cdp(format!("Failed to parse version: {}", e)))?;

        Ok(BrowserVersion {
            protocol_version: version.protocol_version,
            product: version.browser,
            user_agent: version.user_agent,
        })
    }

    async fn close(&self) -> Result<(), Error> {
        let mut connections = self.connections.lock().await;
        info!("Closing {} CDP connections", connections.len());

        for (target, connection) in connections.drain() {
            if let Err(e) = connection.close().await {
                warn!("Failed to close connection to {}: {}", target, e);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_endpoint_conversion() {
        assert_eq!(
            CdpBrowserImpl::new("ws://localhost:9222").http_endpoint(),
            "http://localhost:9222"
        );
        assert_eq!(
            CdpBrowserImpl::new("wss://remote.example.com:9222/").http_endpoint(),
            "https://remote.example.com:9222"
        );
        assert_eq!(
            CdpBrowserImpl::new("http://127.0.0.1:9222").http_endpoint(),
            "http://127.0.0.1:9222"
        );
    }
}
