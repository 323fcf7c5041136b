//! Mock CDP connection for testing
//!
//! Records every command and answers from canned or computed responses, so
//! the client and the CDP page driver can be exercised without a browser.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

use crate::cdp::traits::*;
use crate::Error;

/// 1x1 transparent PNG, base64
pub const MOCK_PNG_BASE64: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNk+M9QDwADhgGAWjR9awAAAABJRU5ErkJggg==";

/// Main frame id reported by `Page.getFrameTree`
pub const MOCK_FRAME_ID: &str = "mock-main-frame";

type Responder = Box<dyn Fn(&Value) -> Value + Send + Sync>;

/// Mock CDP connection
pub struct MockCdpConnection {
    is_active: AtomicBool,
    next_id: AtomicU64,
    calls: Mutex<Vec<(String, Value)>>,
    responders: Mutex<HashMap<String, Responder>>,
    listeners: Mutex<Vec<mpsc::UnboundedSender<CdpEvent>>>,
}

impl fmt::Debug for MockCdpConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockCdpConnection")
            .field("is_active", &self.is_active)
            .field("calls", &self.calls.lock().map(|c| c.len()).unwrap_or(0))
            .finish()
    }
}

impl MockCdpConnection {
    /// Create a new mock CDP connection
    pub fn new() -> Self {
        Self {
            is_active: AtomicBool::new(true),
            next_id: AtomicU64::new(1),
            calls: Mutex::new(Vec::new()),
            responders: Mutex::new(HashMap::new()),
            listeners: Mutex::new(Vec::new()),
        }
    }

    /// Answer `method` with a fixed result
    pub fn respond(&self, method: &str, result: Value) {
        self.respond_with(method, move |_| result.clone());
    }

    /// Answer `method` with a result computed from the params
    pub fn respond_with<F>(&self, method: &str, responder: F)
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        if let Ok(mut responders) = self.responders.lock() {
            responders.insert(method.to_string(), Box::new(responder));
        }
    }

    /// Answer `Runtime.evaluate` with a by-value remote object built from `value`
    pub fn respond_to_evaluate_with<F>(&self, responder: F)
    where
        F: Fn(&str) -> Value + Send + Sync + 'static,
    {
        self.respond_with("Runtime.evaluate", move |params| {
            let expression = params.get("expression").and_then(Value::as_str).unwrap_or_default();
            json!({ "result": remote_object(responder(expression)) })
        });
    }

    /// Deliver an event to every listener
    pub fn emit(&self, method: &str, params: Value) {
        let event = CdpEvent {
            method: method.to_string(),
            params,
        };
        if let Ok(mut listeners) = self.listeners.lock() {
            listeners.retain(|l| l.send(event.clone()).is_ok());
        }
    }

    /// Every command sent so far, with params
    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Every method sent so far
    pub fn methods(&self) -> Vec<String> {
        self.calls().into_iter().map(|(m, _)| m).collect()
    }

    /// Expressions passed to `Runtime.evaluate`
    pub fn evaluated_scripts(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|(m, _)| m == "Runtime.evaluate")
            .filter_map(|(_, p)| p.get("expression").and_then(Value::as_str).map(str::to_string))
            .collect()
    }

    fn default_result(method: &str) -> Value {
        match method {
            "Page.navigate" => json!({
                "frameId": MOCK_FRAME_ID,
                "loaderId": uuid::Uuid::new_v4().to_string(),
            }),
            "Page.getFrameTree" => json!({
                "frameTree": { "frame": { "id": MOCK_FRAME_ID, "loaderId": "mock-loader-0", "url": "about:blank" } }
            }),
            "Runtime.evaluate" => json!({ "result": { "type": "undefined" } }),
            "Page.captureScreenshot" => json!({ "data": MOCK_PNG_BASE64 }),
            _ => json!({}),
        }
    }
}

impl Default for MockCdpConnection {
    fn default() -> Self {
        Self::new()
    }
}

/// Wrap a JSON value the way `Runtime.evaluate` returns it by value
pub fn remote_object(value: Value) -> Value {
    match value {
        Value::Null => json!({ "type": "object", "subtype": "null", "value": null }),
        Value::Bool(b) => json!({ "type": "boolean", "value": b }),
        Value::Number(n) => json!({ "type": "number", "value": n }),
        Value::String(s) => json!({ "type": "string", "value": s }),
        other => json!({ "type": "object", "value": other }),
    }
}

#[async_trait]
impl CdpConnection for MockCdpConnection {
    async fn send_command(&self, method: &str, params: Value) -> Result<CdpResponse, Error> {
        if !self.is_active.load(Ordering::Relaxed) {
            return Err(Error::websocket("Connection is closed"));
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((method.to_string(), params.clone()));
        }

        let result = self
            .responders
            .lock()
            .map_err(|e| Error::internal(format!("Lock error: {}", e)))?
            .get(method)
            .map(|responder| responder(&params))
            .unwrap_or_else(|| Self::default_result(method));

        Ok(CdpResponse {
            id,
            result: Some(result),
            error: None,
        })
    }

    async fn listen_events(&self) -> Result<mpsc::Receiver<CdpEvent>, Error> {
        let (tx, rx) = mpsc::channel(256);
        let (unbounded_tx, mut unbounded_rx) = mpsc::unbounded_channel();
        self.listeners
            .lock()
            .map_err(|e| Error::internal(format!("Lock error: {}", e)))?
            .push(unbounded_tx);

        tokio::spawn(async move {
            while let Some(event) = unbounded_rx.recv().await {
                if tx.send(event).await.is_err() {
                    break;
                }
            }
        });

        Ok(rx)
    }

    async fn close(&self) -> Result<(), Error> {
        self.is_active.store(false, Ordering::Relaxed);
        Ok(())
    }

    fn is_active(&self) -> bool {
        self.is_active.load(Ordering::Relaxed)
    }
}

/// Mock CDP browser handing out clients over fresh mock connections
#[derive(Debug, Default)]
pub struct MockCdpBrowser {
    connections: Mutex<Vec<Arc<MockCdpConnection>>>,
}

impl MockCdpBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Connections created so far, in order
    pub fn connections(&self) -> Vec<Arc<MockCdpConnection>> {
        self.connections.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl CdpBrowser for MockCdpBrowser {
    async fn create_client(&self, _target_ws_url: &str) -> Result<Arc<dyn CdpClient>, Error> {
        let connection = Arc::new(MockCdpConnection::new());
        self.connections
            .lock()
            .map_err(|e| Error::internal(format!("Lock error: {}", e)))?
            .push(connection.clone());
        Ok(Arc::new(crate::cdp::client::CdpClientImpl::new(connection)))
    }

    async fn create_target(&self, url: &str) -> Result<TargetInfo, Error> {
        let target_id = uuid::Uuid::new_v4().to_string();
        Ok(TargetInfo {
            ws_url: format!("ws://mock/devtools/page/{}", target_id),
            target_id,
            url: url.to_string(),
        })
    }

    async fn close_target(&self, _target_id: &str) -> Result<(), Error> {
        Ok(())
    }

    async fn get_version(&self) -> Result<BrowserVersion, Error> {
        Ok(BrowserVersion {
            protocol_version: "1.3".to_string(),
            product: "MockChrome/1.0".to_string(),
            user_agent: "Mozilla/5.0 (Mock)".to_string(),
        })
    }

    async fn close(&self) -> Result<(), Error> {
        for connection in self.connections() {
            connection.close().await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_records_and_responds() {
        let connection = MockCdpConnection::new();
        connection.respond("DOM.enable", json!({ "ok": 1 }));

        let response = connection.send_command("DOM.enable", json!({})).await.unwrap();
        assert_eq!(response.result.unwrap()["ok"], 1);
        assert_eq!(connection.methods(), vec!["DOM.enable"]);
    }

    #[tokio::test]
    async fn test_mock_emit_reaches_listener() {
        let connection = MockCdpConnection::new();
        let mut rx = connection.listen_events().await.unwrap();

        connection.emit("Page.loadEventFired", json!({}));

        let event = rx.recv().await.unwrap();
        assert_eq!(event.method, "Page.loadEventFired");
    }

    #[tokio::test]
    async fn test_closed_mock_rejects_commands() {
        let connection = MockCdpConnection::new();
        connection.close().await.unwrap();
        assert!(connection.send_command("Page.enable", json!({})).await.is_err());
    }

    #[test]
    fn test_remote_object_shapes() {
        assert_eq!(remote_object(json!(3))["type"], "number");
        assert_eq!(remote_object(Value::Null)["subtype"], "null");
        assert_eq!(remote_object(json!(["a"]))["type"], "object");
    }
}
