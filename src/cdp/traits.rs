//! CDP (Chrome DevTools Protocol) layer traits
//!
//! This module defines the abstract interfaces for CDP communication.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// CDP event representation
#[derive(Debug, Clone)]
pub struct CdpEvent {
    /// Event method (e.g., "Page.lifecycleEvent")
    pub method: String,
    /// Event parameters
    pub params: Value,
}

/// CDP response representation
#[derive(Debug, Clone)]
pub struct CdpResponse {
    /// Response ID (matches request ID)
    pub id: u64,
    /// Response result
    pub result: Option<Value>,
    /// Error if any
    pub error: Option<CdpError>,
}

/// CDP error representation
#[derive(Debug, Clone)]
pub struct CdpError {
    /// Error code
    pub code: i32,
    /// Error message
    pub message: String,
    /// Additional error data
    pub data: Option<Value>,
}

/// CDP connection trait
///
/// Represents a WebSocket connection to a Chrome DevTools Protocol target.
#[async_trait]
pub trait CdpConnection: Send + Sync + std::fmt::Debug {
    /// Send a CDP command and wait for response
    async fn send_command(&self, method: &str, params: Value) -> Result<CdpResponse, crate::Error>;

    /// Subscribe to CDP events
    async fn listen_events(&self) -> Result<tokio::sync::mpsc::Receiver<CdpEvent>, crate::Error>;

    /// Close the connection
    async fn close(&self) -> Result<(), crate::Error>;

    /// Check if connection is active
    fn is_active(&self) -> bool;
}

/// CDP client trait
///
/// High-level CDP client that provides typed methods for the commands the
/// page driver issues.
#[async_trait]
pub trait CdpClient: Send + Sync + std::fmt::Debug {
    /// Navigate to a URL; returns as soon as the navigation is committed
    async fn navigate(&self, url: &str) -> Result<NavigationResult, crate::Error>;

    /// Evaluate JavaScript in the page
    async fn evaluate(&self, script: &str, await_promise: bool) -> Result<EvaluationResult, crate::Error>;

    /// Capture a screenshot
    async fn screenshot(&self, full_page: bool) -> Result<Vec<u8>, crate::Error>;

    /// Reload the page
    async fn reload(&self, ignore_cache: bool) -> Result<(), crate::Error>;

    /// Enable a domain
    async fn enable_domain(&self, domain: &str) -> Result<(), crate::Error>;

    /// Call a raw CDP method (returns JSON Value)
    async fn call_method(&self, method: &str, params: Value) -> Result<Value, crate::Error>;

    /// Subscribe to events of one method, or `*` for all
    async fn subscribe_events(&self, event_type: &str) -> Result<tokio::sync::mpsc::Receiver<CdpEvent>, crate::Error>;

    /// Close the underlying connection
    async fn close(&self) -> Result<(), crate::Error>;
}

/// Navigation result
#[derive(Debug, Clone)]
pub struct NavigationResult {
    /// Frame that navigated
    pub frame_id: Option<String>,
    /// Loader of the new document; absent for same-document navigations
    pub loader_id: Option<String>,
    /// Error text reported by the browser, e.g. `net::ERR_NAME_NOT_RESOLVED`
    pub error_text: Option<String>,
}

/// JavaScript evaluation result
#[derive(Debug, Clone, PartialEq)]
pub enum EvaluationResult {
    /// String value
    String(String),
    /// Number value
    Number(f64),
    /// Boolean value
    Bool(bool),
    /// Null value
    Null,
    /// Object/Array (as JSON)
    Object(Value),
}

impl EvaluationResult {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            EvaluationResult::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            EvaluationResult::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn into_string(self) -> Option<String> {
        match self {
            EvaluationResult::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, EvaluationResult::Null)
    }
}

/// CDP browser trait
///
/// Controls browser-level operations via the DevTools HTTP endpoint.
#[async_trait]
pub trait CdpBrowser: Send + Sync + std::fmt::Debug {
    /// Create a new CDP client attached to a target WebSocket URL
    async fn create_client(&self, target_ws_url: &str) -> Result<Arc<dyn CdpClient>, crate::Error>;

    /// Create a new page target; returns its description
    async fn create_target(&self, url: &str) -> Result<TargetInfo, crate::Error>;

    /// Close one page target
    async fn close_target(&self, target_id: &str) -> Result<(), crate::Error>;

    /// Get browser version
    async fn get_version(&self) -> Result<BrowserVersion, crate::Error>;

    /// Close all connections opened through this browser
    async fn close(&self) -> Result<(), crate::Error>;
}

/// Browser version information
#[derive(Debug, Clone)]
pub struct BrowserVersion {
    /// Protocol version
    pub protocol_version: String,
    /// Product name
    pub product: String,
    /// User agent
    pub user_agent: String,
}

/// Target information
#[derive(Debug, Clone)]
pub struct TargetInfo {
    /// Target ID
    pub target_id: String,
    /// Target URL
    pub url: String,
    /// WebSocket URL to attach a client to
    pub ws_url: String,
}
