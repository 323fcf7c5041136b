//! Page driver over a CDP client
//!
//! DOM queries and edits run as `Runtime.evaluate` scripts built by
//! [`ScriptBuilder`]. Clicks and keystrokes go through `Input.*` so the page
//! sees trusted events. Load states come from `Page.lifecycleEvent`.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, instrument, trace};
use uuid::Uuid;

use super::js::ScriptBuilder;
use super::traits::{LoadState, PageDriver};
use crate::cdp::traits::{CdpClient, EvaluationResult};
use crate::cdp::types::LifecycleEventParams;
use crate::locator::Locator;
use crate::{Error, Result};

const READY_STATE_POLL: Duration = Duration::from_millis(100);

/// Lifecycle events seen for the main frame's current document
#[derive(Debug, Clone, Default)]
struct LifecycleSnapshot {
    loader_id: String,
    events: HashSet<String>,
}

/// Which document a load-state wait applies to
#[derive(Debug, Clone, PartialEq, Eq)]
enum LoaderExpectation {
    /// Whatever document is current
    Current,
    /// The document created by a specific navigation
    Loader(String),
    /// Any document other than this one
    Replacing(String),
}

impl LoaderExpectation {
    fn accepts(&self, loader_id: &str) -> bool {
        match self {
            LoaderExpectation::Current => true,
            LoaderExpectation::Loader(id) => id == loader_id,
            LoaderExpectation::Replacing(old) => old != loader_id,
        }
    }
}

/// Page driver backed by a live CDP target
#[derive(Debug)]
pub struct CdpPageDriver {
    id: String,
    client: Arc<dyn CdpClient>,
    lifecycle: watch::Receiver<LifecycleSnapshot>,
    /// Set by `reload`, consumed by the next load-state wait
    pending: Mutex<Option<LoaderExpectation>>,
    is_active: AtomicBool,
}

impl CdpPageDriver {
    /// Attach to the page behind `client` and start tracking its lifecycle
    pub async fn attach(client: Arc<dyn CdpClient>) -> Result<Self> {
        let tree = client.call_method("Page.getFrameTree", json!({})).await?;
        let frame = &tree["frameTree"]["frame"];
        let main_frame_id = frame["id"]
            .as_str()
            .ok_or_else(|| Error::cdp("Page.getFrameTree returned no main frame"))?
            .to_string();
        let loader_id = frame["loaderId"].as_str().unwrap_or_default().to_string();

        client
            .call_method("Page.setLifecycleEventsEnabled", json!({ "enabled": true }))
            .await?;

        // Attaching to an existing document: assume it already finished loading
        let initial = LifecycleSnapshot {
            loader_id,
            events: [LoadState::DomContentLoaded, LoadState::Load, LoadState::NetworkIdle]
                .iter()
                .map(|s| s.lifecycle_name().to_string())
                .collect(),
        };
        let (tx, rx) = watch::channel(initial);

        let mut events = client.subscribe_events("Page.lifecycleEvent").await?;
        let tracked_frame = main_frame_id.clone();
        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                let Ok(params) = serde_json::from_value::<LifecycleEventParams>(event.params) else {
                    continue;
                };
                if params.frame_id != tracked_frame {
                    continue;
                }
                trace!("Lifecycle {} for loader {}", params.name, params.loader_id);
                tx.send_modify(|snapshot| {
                    if params.name == "init" || snapshot.loader_id != params.loader_id {
                        snapshot.loader_id = params.loader_id.clone();
                        snapshot.events.clear();
                    }
                    if params.name != "init" {
                        snapshot.events.insert(params.name.clone());
                    }
                });
            }
            debug!("Lifecycle tracking for frame {} ended", tracked_frame);
        });

        let id = Uuid::new_v4().to_string();
        debug!("Attached page driver {} to frame {}", id, main_frame_id);

        Ok(Self {
            id,
            client,
            lifecycle: rx,
            pending: Mutex::new(None),
            is_active: AtomicBool::new(true),
        })
    }

    fn ensure_active(&self) -> Result<()> {
        if self.is_active.load(Ordering::Relaxed) {
            Ok(())
        } else {
            Err(Error::page_closed(&self.id))
        }
    }

    fn set_pending(&self, expectation: Option<LoaderExpectation>) -> Result<()> {
        let mut pending = self
            .pending
            .lock()
            .map_err(|e| Error::internal(format!("Lock error: {}", e)))?;
        *pending = expectation;
        Ok(())
    }

    fn take_pending(&self) -> Result<LoaderExpectation> {
        let mut pending = self
            .pending
            .lock()
            .map_err(|e| Error::internal(format!("Lock error: {}", e)))?;
        Ok(pending.take().unwrap_or(LoaderExpectation::Current))
    }

    async fn eval(&self, script: String) -> Result<EvaluationResult> {
        self.ensure_active()?;
        self.client.evaluate(&script, false).await
    }

    /// Evaluate a per-element script; null means nothing matched
    async fn eval_on(&self, locator: &Locator, script: String) -> Result<EvaluationResult> {
        let result = self.eval(script).await?;
        if result.is_null() {
            return Err(Error::element_not_found(locator.to_string()));
        }
        Ok(result)
    }

    async fn eval_bool(&self, locator: &Locator, script: String) -> Result<bool> {
        self.eval_on(locator, script)
            .await?
            .as_bool()
            .ok_or_else(|| Error::script_execution_failed(format!("Expected boolean for {}", locator)))
    }

    async fn eval_string(&self, locator: &Locator, script: String) -> Result<String> {
        self.eval_on(locator, script)
            .await?
            .into_string()
            .ok_or_else(|| Error::script_execution_failed(format!("Expected string for {}", locator)))
    }

    async fn dispatch_mouse(&self, kind: &str, x: f64, y: f64) -> Result<()> {
        self.client
            .call_method(
                "Input.dispatchMouseEvent",
                json!({ "type": kind, "x": x, "y": y, "button": "left", "clickCount": 1 }),
            )
            .await?;
        Ok(())
    }

    /// Poll `document.readyState` of whatever document is current
    async fn ready_state_reached(&self) -> Result<()> {
        loop {
            let state = self.eval("document.readyState".to_string()).await?;
            if matches!(state.into_string().as_deref(), Some("interactive") | Some("complete")) {
                return Ok(());
            }
            tokio::time::sleep(READY_STATE_POLL).await;
        }
    }

    async fn lifecycle_reached(&self, expectation: &LoaderExpectation, state: LoadState) -> Result<()> {
        let name = state.lifecycle_name();
        let mut rx = self.lifecycle.clone();

        loop {
            let reached = {
                let snapshot = rx.borrow_and_update();
                expectation.accepts(&snapshot.loader_id) && snapshot.events.contains(name)
            };
            if reached {
                return Ok(());
            }
            if rx.changed().await.is_err() {
                return Err(Error::page_closed(&self.id));
            }
        }
    }

    async fn wait_until(&self, expectation: LoaderExpectation, state: LoadState, timeout: Duration) -> Result<()> {
        let wait = async {
            if state == LoadState::DomContentLoaded && expectation == LoaderExpectation::Current {
                // Either signal is enough for DOM readiness
                tokio::select! {
                    r = self.lifecycle_reached(&expectation, state) => r,
                    r = self.ready_state_reached() => r,
                }
            } else {
                self.lifecycle_reached(&expectation, state).await
            }
        };

        match tokio::time::timeout(timeout, wait).await {
            Ok(result) => result,
            Err(_) => Err(Error::timeout(format!(
                "waiting for load state {:?} ({}ms)",
                state,
                timeout.as_millis()
            ))),
        }
    }
}

/// `Input.dispatchKeyEvent` parameters for a named key
fn key_definition(key: &str) -> Result<Value> {
    let (code, key_code, text) = match key {
        "Enter" => ("Enter", 13, Some("\r")),
        "Tab" => ("Tab", 9, None),
        "Escape" => ("Escape", 27, None),
        "Backspace" => ("Backspace", 8, None),
        "Delete" => ("Delete", 46, None),
        "ArrowDown" => ("ArrowDown", 40, None),
        "ArrowUp" => ("ArrowUp", 38, None),
        "ArrowLeft" => ("ArrowLeft", 37, None),
        "ArrowRight" => ("ArrowRight", 39, None),
        other => return Err(Error::cdp(format!("Unsupported key: {}", other))),
    };
    let mut params = json!({
        "key": key,
        "code": code,
        "windowsVirtualKeyCode": key_code,
        "nativeVirtualKeyCode": key_code,
    });
    if let Some(text) = text {
        params["text"] = json!(text);
    }
    Ok(params)
}

#[async_trait]
impl PageDriver for CdpPageDriver {
    fn id(&self) -> &str {
        &self.id
    }

    #[instrument(skip(self), fields(page = %self.id))]
    async fn goto(&self, url: &str, wait_until: LoadState, timeout: Duration) -> Result<()> {
        self.ensure_active()?;
        self.set_pending(None)?;
        let nav = self.client.navigate(url).await?;
        let expectation = match nav.loader_id {
            Some(loader_id) => LoaderExpectation::Loader(loader_id),
            // Same-document navigation: nothing new to load
            None => LoaderExpectation::Current,
        };
        self.wait_until(expectation, wait_until, timeout).await
    }

    async fn current_url(&self) -> Result<String> {
        Ok(self
            .eval("window.location.href".to_string())
            .await?
            .into_string()
            .unwrap_or_default())
    }

    async fn title(&self) -> Result<String> {
        Ok(self
            .eval("document.title".to_string())
            .await?
            .into_string()
            .unwrap_or_default())
    }

    async fn reload(&self) -> Result<()> {
        self.ensure_active()?;
        let old_loader = self.lifecycle.borrow().loader_id.clone();
        self.set_pending(Some(LoaderExpectation::Replacing(old_loader)))?;
        self.client.reload(false).await
    }

    async fn go_back(&self) -> Result<()> {
        self.ensure_active()?;
        self.set_pending(None)?;
        let history = self
            .client
            .call_method("Page.getNavigationHistory", json!({}))
            .await?;
        let current = history["currentIndex"].as_i64().unwrap_or(0);
        if current == 0 {
            debug!("No history entry to go back to");
            return Ok(());
        }
        let entry_id = history["entries"][(current - 1) as usize]["id"]
            .as_i64()
            .ok_or_else(|| Error::cdp("Malformed navigation history"))?;
        self.client
            .call_method("Page.navigateToHistoryEntry", json!({ "entryId": entry_id }))
            .await?;
        Ok(())
    }

    #[instrument(skip(self), fields(page = %self.id))]
    async fn wait_for_load_state(&self, state: LoadState, timeout: Duration) -> Result<()> {
        self.ensure_active()?;
        let expectation = self.take_pending()?;
        self.wait_until(expectation, state, timeout).await
    }

    async fn count(&self, locator: &Locator) -> Result<usize> {
        let script = ScriptBuilder::new(locator).count();
        Ok(self.eval(script).await?.as_f64().unwrap_or(0.0) as usize)
    }

    async fn is_visible(&self, locator: &Locator) -> Result<bool> {
        let script = ScriptBuilder::new(locator).is_visible();
        Ok(self.eval(script).await?.as_bool().unwrap_or(false))
    }

    async fn is_enabled(&self, locator: &Locator) -> Result<bool> {
        self.eval_bool(locator, ScriptBuilder::new(locator).is_enabled()).await
    }

    async fn is_checked(&self, locator: &Locator) -> Result<bool> {
        self.eval_bool(locator, ScriptBuilder::new(locator).is_checked()).await
    }

    async fn inner_text(&self, locator: &Locator) -> Result<String> {
        self.eval_string(locator, ScriptBuilder::new(locator).inner_text()).await
    }

    async fn all_inner_texts(&self, locator: &Locator) -> Result<Vec<String>> {
        let script = ScriptBuilder::new(locator).all_inner_texts();
        match self.eval(script).await? {
            EvaluationResult::Object(Value::Array(items)) => Ok(items
                .into_iter()
                .map(|v| v.as_str().unwrap_or_default().to_string())
                .collect()),
            _ => Ok(Vec::new()),
        }
    }

    async fn input_value(&self, locator: &Locator) -> Result<String> {
        self.eval_string(locator, ScriptBuilder::new(locator).input_value()).await
    }

    #[instrument(skip(self), fields(page = %self.id, locator = %locator))]
    async fn click(&self, locator: &Locator) -> Result<()> {
        let point = self
            .eval_on(locator, ScriptBuilder::new(locator).scroll_and_center())
            .await?;
        let (x, y) = match point {
            EvaluationResult::Object(v) => (
                v["x"].as_f64().unwrap_or_default(),
                v["y"].as_f64().unwrap_or_default(),
            ),
            _ => return Err(Error::script_execution_failed(format!("No position for {}", locator))),
        };

        self.dispatch_mouse("mouseMoved", x, y).await?;
        self.dispatch_mouse("mousePressed", x, y).await?;
        self.dispatch_mouse("mouseReleased", x, y).await?;
        Ok(())
    }

    async fn fill(&self, locator: &Locator, value: &str) -> Result<()> {
        self.eval_on(locator, ScriptBuilder::new(locator).fill(value)).await?;
        Ok(())
    }

    async fn insert_text(&self, locator: &Locator, text: &str) -> Result<()> {
        self.eval_on(locator, ScriptBuilder::new(locator).focus_end()).await?;
        for ch in text.chars() {
            self.client
                .call_method(
                    "Input.dispatchKeyEvent",
                    json!({ "type": "char", "text": ch.to_string() }),
                )
                .await?;
        }
        Ok(())
    }

    async fn select_option(&self, locator: &Locator, value: &str) -> Result<()> {
        let selected = self
            .eval_bool(locator, ScriptBuilder::new(locator).select_option(value))
            .await?;
        if !selected {
            return Err(Error::element_not_found(format!(
                "option '{}' in {}",
                value, locator
            )));
        }
        Ok(())
    }

    async fn set_checked(&self, locator: &Locator, checked: bool) -> Result<()> {
        let now = self
            .eval_bool(locator, ScriptBuilder::new(locator).set_checked(checked))
            .await?;
        if now != checked {
            return Err(Error::script_execution_failed(format!(
                "{} did not become {}",
                locator,
                if checked { "checked" } else { "unchecked" }
            )));
        }
        Ok(())
    }

    async fn scroll_into_view(&self, locator: &Locator) -> Result<()> {
        self.eval_on(locator, ScriptBuilder::new(locator).scroll_into_view()).await?;
        Ok(())
    }

    async fn set_highlight(&self, locator: &Locator, on: bool) -> Result<()> {
        self.eval_on(locator, ScriptBuilder::new(locator).set_highlight(on)).await?;
        Ok(())
    }

    async fn press_key(&self, key: &str) -> Result<()> {
        self.ensure_active()?;
        let definition = key_definition(key)?;

        let mut down = definition.clone();
        down["type"] = json!(if definition.get("text").is_some() { "keyDown" } else { "rawKeyDown" });
        self.client.call_method("Input.dispatchKeyEvent", down).await?;

        let mut up = definition;
        up["type"] = json!("keyUp");
        if let Some(obj) = up.as_object_mut() {
            obj.remove("text");
        }
        self.client.call_method("Input.dispatchKeyEvent", up).await?;
        Ok(())
    }

    async fn screenshot(&self, full_page: bool) -> Result<Vec<u8>> {
        self.ensure_active()?;
        self.client.screenshot(full_page).await
    }

    async fn close(&self) -> Result<()> {
        if self.is_active.swap(false, Ordering::Relaxed) {
            debug!("Closing page driver {}", self.id);
            self.client.close().await?;
        }
        Ok(())
    }
}
