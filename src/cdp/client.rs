//! CDP client implementation
//!
//! This module provides a high-level CDP client with typed methods for common operations.

use super::traits::*;
use super::types::*;
use crate::Error;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use std::sync::Arc;
use tracing::{debug, info};

/// CDP client implementation
#[derive(Debug, Clone)]
pub struct CdpClientImpl {
    /// Underlying CDP connection
    connection: Arc<dyn CdpConnection>,
}

impl CdpClientImpl {
    /// Create a new CDP client
    ///
    /// # Arguments
    /// * `connection` - CDP connection instance
    pub fn new(connection: Arc<dyn CdpConnection>) -> Self {
        Self { connection }
    }

    /// Parse remote object value to evaluation result
    fn parse_remote_object(obj: &RemoteObject) -> EvaluationResult {
        match obj.r#type.as_str() {
            "string" => EvaluationResult::String(
                obj.value
                    .as_ref()
                    .and_then(|v| v.as_str())
                    .unwrap_or_default()
                    .to_string(),
            ),
            "number" => EvaluationResult::Number(
                obj.value.as_ref().and_then(|v| v.as_f64()).unwrap_or(0.0),
            ),
            "boolean" => EvaluationResult::Bool(
                obj.value.as_ref().and_then(|v| v.as_bool()).unwrap_or(false),
            ),
            "object" if obj.subtype.as_deref() == Some("null") => EvaluationResult::Null,
            "object" => obj
                .value
                .clone()
                .map(EvaluationResult::Object)
                .unwrap_or(EvaluationResult::Null),
            _ => EvaluationResult::Null,
        }
    }
}

#[async_trait]
impl CdpClient for CdpClientImpl {
    async fn navigate(&self, url: &str) -> Result<NavigationResult, Error> {
        info!("Navigating to {}", url);

        let params = serde_json::to_value(NavigateParams { url: url.to_string() })?;
        let result = self.call_method("Page.navigate", params).await?;

        let field = |name: &str| result.get(name).and_then(|v| v.as_str()).map(str::to_string);
        let nav = NavigationResult {
            frame_id: field("frameId"),
            loader_id: field("loaderId"),
            error_text: field("errorText"),
        };

        if let Some(error_text) = &nav.error_text {
            return Err(Error::navigation_failed(format!("{}: {}", url, error_text)));
        }

        Ok(nav)
    }

    async fn evaluate(&self, script: &str, await_promise: bool) -> Result<EvaluationResult, Error> {
        debug!("Evaluating script ({} bytes)", script.len());

        let params = serde_json::to_value(EvaluateParams {
            expression: script.to_string(),
            await_promise,
            return_by_value: true,
        })?;

        let result = self.call_method("Runtime.evaluate", params).await?;
        let response: EvaluateResponse = serde_json::from_value(result)
            .map_err(|e| Error::cdp(format!("Failed to parse EvaluateResponse: {}", e)))?;

        if let Some(exception) = response.exception_details {
            return Err(Error::script_execution_failed(exception.message()));
        }

        Ok(Self::parse_remote_object(&response.result))
    }

    async fn screenshot(&self, full_page: bool) -> Result<Vec<u8>, Error> {
        debug!("Capturing screenshot (full_page: {})", full_page);

        let mut params = serde_json::json!({ "format": "png" });
        if full_page {
            params["captureBeyondViewport"] = serde_json::json!(true);
        }

        let result = self.call_method("Page.captureScreenshot", params).await?;

        let data = result
            .get("data")
            .and_then(|v| v.as_str())
            .ok_or_else(|| Error::cdp("No data in screenshot result"))?;

        BASE64
            .decode(data)
            .map_err(|e| Error::cdp(format!("Failed to decode screenshot: {}", e)))
    }

    async fn reload(&self, ignore_cache: bool) -> Result<(), Error> {
        info!("Reloading page (ignore_cache: {})", ignore_cache);
        self.call_method("Page.reload", serde_json::json!({ "ignoreCache": ignore_cache }))
            .await?;
        Ok(())
    }

    async fn enable_domain(&self, domain: &str) -> Result<(), Error> {
        debug!("Enabling domain: {}", domain);
        self.call_method(&format!("{}.enable", domain), serde_json::json!({}))
            .await?;
        Ok(())
    }

    async fn call_method(&self, method: &str, params: serde_json::Value) -> Result<serde_json::Value, Error> {
        let response = self.connection.send_command(method, params).await?;
        let id = response.id;
        response
            .result
            .ok_or_else(|| Error::cdp(format!("No result in response {} to {}", id, method)))
    }

    async fn subscribe_events(&self, event_type: &str) -> Result<tokio::sync::mpsc::Receiver<CdpEvent>, Error> {
        debug!("Subscribing to events: {}", event_type);

        let mut event_receiver = self.connection.listen_events().await?;

        // Filter events by type
        let (tx, rx) = tokio::sync::mpsc::channel(256);
        let filter_event_type = event_type.to_string();

        tokio::spawn(async move {
            while let Some(event) = event_receiver.recv().await {
                if (event.method == filter_event_type || filter_event_type == "*")
                    && tx.send(event).await.is_err()
                {
                    break;
                }
            }
        });

        Ok(rx)
    }

    async fn close(&self) -> Result<(), Error> {
        self.connection.close().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cdp::mock::MockCdpConnection;

    fn remote(kind: &str, subtype: Option<&str>, value: Option<serde_json::Value>) -> RemoteObject {
        RemoteObject {
            r#type: kind.to_string(),
            subtype: subtype.map(str::to_string),
            value,
            description: None,
        }
    }

    #[test]
    fn test_parse_remote_object() {
        let parse = CdpClientImpl::parse_remote_object;

        assert_eq!(
            parse(&remote("string", None, Some(serde_json::json!("test")))),
            EvaluationResult::String("test".to_string())
        );
        assert_eq!(
            parse(&remote("number", None, Some(serde_json::json!(42.5)))),
            EvaluationResult::Number(42.5)
        );
        assert_eq!(
            parse(&remote("boolean", None, Some(serde_json::json!(true)))),
            EvaluationResult::Bool(true)
        );
        assert_eq!(parse(&remote("undefined", None, None)), EvaluationResult::Null);
        assert_eq!(parse(&remote("object", Some("null"), None)), EvaluationResult::Null);
        assert!(matches!(
            parse(&remote("object", Some("array"), Some(serde_json::json!(["a"])))),
            EvaluationResult::Object(_)
        ));
    }

    #[tokio::test]
    async fn test_navigate_reports_loader() {
        let connection = Arc::new(MockCdpConnection::new());
        connection.respond(
            "Page.navigate",
            serde_json::json!({ "frameId": "F1", "loaderId": "L9" }),
        );
        let client = CdpClientImpl::new(connection.clone());

        let nav = client.navigate("https://qat.paylink.example.com").await.unwrap();
        assert_eq!(nav.loader_id.as_deref(), Some("L9"));
        assert_eq!(connection.methods(), vec!["Page.navigate"]);
    }

    #[tokio::test]
    async fn test_navigate_error_text() {
        let connection = Arc::new(MockCdpConnection::new());
        connection.respond(
            "Page.navigate",
            serde_json::json!({ "frameId": "F1", "errorText": "net::ERR_NAME_NOT_RESOLVED" }),
        );
        let client = CdpClientImpl::new(connection);

        let result = client.navigate("https://nowhere.invalid").await;
        assert!(matches!(result, Err(Error::NavigationFailed(_))));
    }

    #[tokio::test]
    async fn test_evaluate_exception() {
        let connection = Arc::new(MockCdpConnection::new());
        connection.respond(
            "Runtime.evaluate",
            serde_json::json!({
                "result": { "type": "object" },
                "exceptionDetails": { "text": "Uncaught", "exception": { "type": "object", "description": "ReferenceError: foo" } }
            }),
        );
        let client = CdpClientImpl::new(connection);

        let err = client.evaluate("foo()", false).await.unwrap_err();
        assert!(err.to_string().contains("ReferenceError"));
    }

    #[tokio::test]
    async fn test_screenshot_decodes_base64() {
        let connection = Arc::new(MockCdpConnection::new());
        let client = CdpClientImpl::new(connection.clone());

        let png = client.screenshot(true).await.unwrap();
        assert_eq!(&png[1..4], b"PNG");
        assert_eq!(connection.calls()[0].1["format"], "png");
        assert_eq!(connection.calls()[0].1["captureBeyondViewport"], true);
    }
}
