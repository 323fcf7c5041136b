//! CDP (Chrome DevTools Protocol) type definitions
//!
//! This module defines the wire structures exchanged with the browser.

use serde::{Deserialize, Serialize};

/// CDP JSON-RPC request
#[derive(Debug, Clone, Serialize)]
pub struct CdpRequest {
    /// Request ID
    pub id: u64,
    /// Method name (e.g., "Page.navigate")
    pub method: String,
    /// Method parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<serde_json::Value>,
}

/// Incoming message: a response when `id` is present, an event otherwise
#[derive(Debug, Clone, Deserialize)]
pub struct CdpIncoming {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub params: serde_json::Value,
    #[serde(default)]
    pub result: serde_json::Value,
    #[serde(default)]
    pub error: Option<CdpErrorDetail>,
}

/// CDP error detail
#[derive(Debug, Clone, Deserialize)]
pub struct CdpErrorDetail {
    /// Error code
    pub code: i32,
    /// Error message
    pub message: String,
    /// Additional error data
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

/// Page navigation parameters
#[derive(Debug, Clone, Serialize)]
pub struct NavigateParams {
    /// URL to navigate to
    pub url: String,
}

/// JavaScript evaluation parameters
#[derive(Debug, Clone, Serialize)]
pub struct EvaluateParams {
    /// JavaScript expression to evaluate
    pub expression: String,
    /// Whether to await promise
    #[serde(rename = "awaitPromise")]
    pub await_promise: bool,
    /// Whether to return as value
    #[serde(rename = "returnByValue")]
    pub return_by_value: bool,
}

/// Remote object (evaluation result)
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteObject {
    /// Object type
    pub r#type: String,
    /// Object subtype
    #[serde(default)]
    pub subtype: Option<String>,
    /// Object value
    #[serde(default)]
    pub value: Option<serde_json::Value>,
    /// Object description
    #[serde(default)]
    pub description: Option<String>,
}

/// `Runtime.evaluate` response
#[derive(Debug, Clone, Deserialize)]
pub struct EvaluateResponse {
    pub result: RemoteObject,
    #[serde(default, rename = "exceptionDetails")]
    pub exception_details: Option<ExceptionDetails>,
}

/// Exception thrown by an evaluated script
#[derive(Debug, Clone, Deserialize)]
pub struct ExceptionDetails {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub exception: Option<RemoteObject>,
}

impl ExceptionDetails {
    /// Best human-readable message
    pub fn message(&self) -> String {
        self.exception
            .as_ref()
            .and_then(|e| e.description.clone())
            .unwrap_or_else(|| self.text.clone())
    }
}

/// `Page.lifecycleEvent` parameters
#[derive(Debug, Clone, Deserialize)]
pub struct LifecycleEventParams {
    #[serde(rename = "frameId")]
    pub frame_id: String,
    #[serde(rename = "loaderId")]
    pub loader_id: String,
    /// e.g. `init`, `DOMContentLoaded`, `load`, `networkIdle`
    pub name: String,
}

/// Entry of the DevTools HTTP `/json/new` response
#[derive(Debug, Clone, Deserialize)]
pub struct TargetDescription {
    pub id: String,
    #[serde(default)]
    pub url: String,
    #[serde(rename = "webSocketDebuggerUrl")]
    pub web_socket_debugger_url: String,
}

/// DevTools HTTP `/json/version` response
#[derive(Debug, Clone, Deserialize)]
pub struct VersionDescription {
    #[serde(rename = "Protocol-Version", default)]
    pub protocol_version: String,
    #[serde(rename = "Browser", default)]
    pub browser: String,
    #[serde(rename = "User-Agent", default)]
    pub user_agent: String,
}
