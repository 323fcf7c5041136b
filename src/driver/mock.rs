//! Mock page driver for testing
//!
//! Holds a scriptable in-memory DOM. Elements are registered under the CSS
//! selector they should answer to, and hooks mutate the DOM when the page
//! navigates, when something is clicked or when a key is pressed.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use uuid::Uuid;

use super::traits::{LoadState, PageDriver};
use crate::cdp::mock::MOCK_PNG_BASE64;
use crate::locator::Locator;
use crate::{Error, Result};

const LOAD_STATE_POLL: Duration = Duration::from_millis(10);

/// Callback that rewrites the mock DOM
pub type DomHook = Arc<dyn Fn(&mut MockDom) + Send + Sync>;

/// One element in the mock DOM
#[derive(Debug, Clone, PartialEq)]
pub struct MockElement {
    pub text: String,
    pub value: String,
    pub visible: bool,
    pub enabled: bool,
    pub checked: bool,
    pub options: Vec<String>,
    pub highlighted: bool,
}

impl Default for MockElement {
    fn default() -> Self {
        Self {
            text: String::new(),
            value: String::new(),
            visible: true,
            enabled: true,
            checked: false,
            options: Vec::new(),
            highlighted: false,
        }
    }
}

impl MockElement {
    /// Visible, enabled, empty element
    pub fn new() -> Self {
        Self::default()
    }

    /// Visible element with text content
    pub fn text<S: Into<String>>(text: S) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Visible input with a value
    pub fn input<S: Into<String>>(value: S) -> Self {
        Self {
            value: value.into(),
            ..Self::default()
        }
    }

    /// `<select>` with the given option values; the first is selected
    pub fn select<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let options: Vec<String> = options.into_iter().map(Into::into).collect();
        Self {
            value: options.first().cloned().unwrap_or_default(),
            options,
            ..Self::default()
        }
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }
}

/// In-memory page state
#[derive(Debug, Clone)]
pub struct MockDom {
    pub url: String,
    pub title: String,
    /// Whether DOMContentLoaded has been reached
    pub dom_ready: bool,
    /// Whether the network is quiet
    pub network_idle: bool,
    elements: Vec<(String, MockElement)>,
    history: Vec<String>,
}

impl Default for MockDom {
    fn default() -> Self {
        Self {
            url: "about:blank".to_string(),
            title: String::new(),
            dom_ready: true,
            network_idle: true,
            elements: Vec::new(),
            history: Vec::new(),
        }
    }
}

impl MockDom {
    /// Append an element answering to `selector`
    pub fn insert<S: Into<String>>(&mut self, selector: S, element: MockElement) -> &mut Self {
        self.elements.push((selector.into(), element));
        self
    }

    /// Remove every element registered under `selector`
    pub fn remove(&mut self, selector: &str) -> &mut Self {
        self.elements.retain(|(s, _)| s != selector);
        self
    }

    /// Replace every element under `selector` with `elements`
    pub fn replace<I>(&mut self, selector: &str, elements: I) -> &mut Self
    where
        I: IntoIterator<Item = MockElement>,
    {
        self.remove(selector);
        for element in elements {
            self.insert(selector, element);
        }
        self
    }

    /// Drop every element
    pub fn clear(&mut self) {
        self.elements.clear();
    }

    /// First element under `selector`
    pub fn get(&self, selector: &str) -> Option<&MockElement> {
        self.elements.iter().find(|(s, _)| s == selector).map(|(_, e)| e)
    }

    /// First element under `selector`, mutably
    pub fn get_mut(&mut self, selector: &str) -> Option<&mut MockElement> {
        self.elements
            .iter_mut()
            .find(|(s, _)| s == selector)
            .map(|(_, e)| e)
    }

    /// Every element under `selector`
    pub fn all(&self, selector: &str) -> Vec<&MockElement> {
        self.elements
            .iter()
            .filter(|(s, _)| s == selector)
            .map(|(_, e)| e)
            .collect()
    }

    /// URLs navigated to, oldest first
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Positions of the elements a locator resolves to, in insertion order
    fn resolve(&self, locator: &Locator) -> Vec<usize> {
        let parts: HashSet<&str> = locator.parts().collect();
        let matches: Vec<usize> = self
            .elements
            .iter()
            .enumerate()
            .filter(|(_, (s, _))| parts.contains(s.as_str()))
            .map(|(i, _)| i)
            .collect();
        match locator.index() {
            Some(n) => matches.get(n).copied().into_iter().collect(),
            None => matches,
        }
    }

    fn first(&self, locator: &Locator) -> Option<&MockElement> {
        self.resolve(locator).first().map(|&i| &self.elements[i].1)
    }

    fn first_mut(&mut self, locator: &Locator) -> Result<&mut MockElement> {
        let index = self
            .resolve(locator)
            .first()
            .copied()
            .ok_or_else(|| Error::element_not_found(locator.to_string()))?;
        Ok(&mut self.elements[index].1)
    }
}

/// Page driver over an in-memory DOM
pub struct MockPageDriver {
    id: String,
    dom: Arc<Mutex<MockDom>>,
    navigate_hooks: Mutex<Vec<(String, DomHook)>>,
    click_hooks: Mutex<HashMap<String, DomHook>>,
    key_hooks: Mutex<HashMap<String, DomHook>>,
    actions: Mutex<Vec<String>>,
    is_active: AtomicBool,
}

impl fmt::Debug for MockPageDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockPageDriver")
            .field("id", &self.id)
            .field("is_active", &self.is_active)
            .finish()
    }
}

impl Default for MockPageDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl MockPageDriver {
    /// Empty page at `about:blank`
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            dom: Arc::new(Mutex::new(MockDom::default())),
            navigate_hooks: Mutex::new(Vec::new()),
            click_hooks: Mutex::new(HashMap::new()),
            key_hooks: Mutex::new(HashMap::new()),
            actions: Mutex::new(Vec::new()),
            is_active: AtomicBool::new(true),
        }
    }

    /// Mutate the DOM directly
    pub fn update<F: FnOnce(&mut MockDom)>(&self, f: F) {
        if let Ok(mut dom) = self.dom.lock() {
            f(&mut *dom);
        }
    }

    /// Copy of the current DOM
    pub fn snapshot(&self) -> MockDom {
        self.dom.lock().map(|d| d.clone()).unwrap_or_default()
    }

    /// Run `hook` after every navigation to a URL containing `fragment`
    pub fn on_navigate<F>(&self, fragment: &str, hook: F)
    where
        F: Fn(&mut MockDom) + Send + Sync + 'static,
    {
        if let Ok(mut hooks) = self.navigate_hooks.lock() {
            hooks.push((fragment.to_string(), Arc::new(hook)));
        }
    }

    /// Run `hook` whenever a locator with exactly this selector is clicked
    pub fn on_click<F>(&self, selector: &str, hook: F)
    where
        F: Fn(&mut MockDom) + Send + Sync + 'static,
    {
        if let Ok(mut hooks) = self.click_hooks.lock() {
            hooks.insert(selector.to_string(), Arc::new(hook));
        }
    }

    /// Run `hook` whenever `key` is pressed
    pub fn on_key<F>(&self, key: &str, hook: F)
    where
        F: Fn(&mut MockDom) + Send + Sync + 'static,
    {
        if let Ok(mut hooks) = self.key_hooks.lock() {
            hooks.insert(key.to_string(), Arc::new(hook));
        }
    }

    /// Apply `hook` once after `delay`
    pub fn schedule<F>(&self, delay: Duration, hook: F)
    where
        F: FnOnce(&mut MockDom) + Send + 'static,
    {
        let dom = self.dom.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Ok(mut dom) = dom.lock() {
                hook(&mut *dom);
            }
        });
    }

    /// Every action performed so far, e.g. `click #login-button`
    pub fn actions(&self) -> Vec<String> {
        self.actions.lock().map(|a| a.clone()).unwrap_or_default()
    }

    /// Actions starting with `prefix`
    pub fn actions_matching(&self, prefix: &str) -> Vec<String> {
        self.actions()
            .into_iter()
            .filter(|a| a.starts_with(prefix))
            .collect()
    }

    pub fn is_closed(&self) -> bool {
        !self.is_active.load(Ordering::Relaxed)
    }

    fn record(&self, action: String) {
        if let Ok(mut actions) = self.actions.lock() {
            actions.push(action);
        }
    }

    fn dom(&self) -> Result<MutexGuard<'_, MockDom>> {
        if self.is_closed() {
            return Err(Error::page_closed(&self.id));
        }
        self.dom
            .lock()
            .map_err(|e| Error::internal(format!("Lock error: {}", e)))
    }

    fn run_navigate_hooks(&self, dom: &mut MockDom) -> Result<()> {
        let hooks: Vec<DomHook> = self
            .navigate_hooks
            .lock()
            .map_err(|e| Error::internal(format!("Lock error: {}", e)))?
            .iter()
            .filter(|(fragment, _)| dom.url.contains(fragment.as_str()))
            .map(|(_, hook)| hook.clone())
            .collect();
        for hook in hooks {
            hook(&mut *dom);
        }
        Ok(())
    }

    async fn load_state_reached(&self, state: LoadState) -> Result<()> {
        loop {
            let reached = {
                let dom = self.dom()?;
                match state {
                    LoadState::DomContentLoaded | LoadState::Load => dom.dom_ready,
                    LoadState::NetworkIdle => dom.dom_ready && dom.network_idle,
                }
            };
            if reached {
                return Ok(());
            }
            tokio::time::sleep(LOAD_STATE_POLL).await;
        }
    }

    fn hook_for(hooks: &Mutex<HashMap<String, DomHook>>, key: &str) -> Result<Option<DomHook>> {
        Ok(hooks
            .lock()
            .map_err(|e| Error::internal(format!("Lock error: {}", e)))?
            .get(key)
            .cloned())
    }
}

#[async_trait]
impl PageDriver for MockPageDriver {
    fn id(&self) -> &str {
        &self.id
    }

    async fn goto(&self, url: &str, wait_until: LoadState, timeout: Duration) -> Result<()> {
        self.record(format!("goto {}", url));
        {
            let mut dom = self.dom()?;
            dom.url = url.to_string();
            dom.history.push(url.to_string());
            self.run_navigate_hooks(&mut dom)?;
        }
        self.wait_for_load_state(wait_until, timeout).await
    }

    async fn current_url(&self) -> Result<String> {
        Ok(self.dom()?.url.clone())
    }

    async fn title(&self) -> Result<String> {
        Ok(self.dom()?.title.clone())
    }

    async fn reload(&self) -> Result<()> {
        self.record("reload".to_string());
        let mut dom = self.dom()?;
        self.run_navigate_hooks(&mut dom)
    }

    async fn go_back(&self) -> Result<()> {
        self.record("back".to_string());
        let mut dom = self.dom()?;
        if dom.history.len() > 1 {
            dom.history.pop();
            if let Some(previous) = dom.history.last().cloned() {
                dom.url = previous;
                self.run_navigate_hooks(&mut dom)?;
            }
        }
        Ok(())
    }

    async fn wait_for_load_state(&self, state: LoadState, timeout: Duration) -> Result<()> {
        match tokio::time::timeout(timeout, self.load_state_reached(state)).await {
            Ok(result) => result,
            Err(_) => Err(Error::timeout(format!(
                "waiting for load state {:?} ({}ms)",
                state,
                timeout.as_millis()
            ))),
        }
    }

    async fn count(&self, locator: &Locator) -> Result<usize> {
        Ok(self.dom()?.resolve(locator).len())
    }

    async fn is_visible(&self, locator: &Locator) -> Result<bool> {
        Ok(self.dom()?.first(locator).is_some_and(|e| e.visible))
    }

    async fn is_enabled(&self, locator: &Locator) -> Result<bool> {
        self.dom()?
            .first(locator)
            .map(|e| e.enabled)
            .ok_or_else(|| Error::element_not_found(locator.to_string()))
    }

    async fn is_checked(&self, locator: &Locator) -> Result<bool> {
        self.dom()?
            .first(locator)
            .map(|e| e.checked)
            .ok_or_else(|| Error::element_not_found(locator.to_string()))
    }

    async fn inner_text(&self, locator: &Locator) -> Result<String> {
        self.dom()?
            .first(locator)
            .map(|e| e.text.clone())
            .ok_or_else(|| Error::element_not_found(locator.to_string()))
    }

    async fn all_inner_texts(&self, locator: &Locator) -> Result<Vec<String>> {
        let dom = self.dom()?;
        Ok(dom
            .resolve(locator)
            .into_iter()
            .map(|i| dom.elements[i].1.text.clone())
            .collect())
    }

    async fn input_value(&self, locator: &Locator) -> Result<String> {
        self.dom()?
            .first(locator)
            .map(|e| e.value.clone())
            .ok_or_else(|| Error::element_not_found(locator.to_string()))
    }

    async fn click(&self, locator: &Locator) -> Result<()> {
        let hook = Self::hook_for(&self.click_hooks, locator.selector())?;
        let mut dom = self.dom()?;
        dom.first_mut(locator)?;
        self.record(format!("click {}", locator));
        if let Some(hook) = hook {
            hook(&mut *dom);
        }
        Ok(())
    }

    async fn fill(&self, locator: &Locator, value: &str) -> Result<()> {
        self.dom()?.first_mut(locator)?.value = value.to_string();
        self.record(format!("fill {} = {}", locator, value));
        Ok(())
    }

    async fn insert_text(&self, locator: &Locator, text: &str) -> Result<()> {
        self.dom()?.first_mut(locator)?.value.push_str(text);
        self.record(format!("type {} {}", locator, text));
        Ok(())
    }

    async fn select_option(&self, locator: &Locator, value: &str) -> Result<()> {
        let mut dom = self.dom()?;
        let element = dom.first_mut(locator)?;
        if !element.options.iter().any(|o| o == value) {
            return Err(Error::element_not_found(format!(
                "option '{}' in {}",
                value, locator
            )));
        }
        element.value = value.to_string();
        self.record(format!("select {} = {}", locator, value));
        Ok(())
    }

    async fn set_checked(&self, locator: &Locator, checked: bool) -> Result<()> {
        self.dom()?.first_mut(locator)?.checked = checked;
        self.record(format!("{} {}", if checked { "check" } else { "uncheck" }, locator));
        Ok(())
    }

    async fn scroll_into_view(&self, locator: &Locator) -> Result<()> {
        self.dom()?.first_mut(locator)?;
        self.record(format!("scroll {}", locator));
        Ok(())
    }

    async fn set_highlight(&self, locator: &Locator, on: bool) -> Result<()> {
        self.dom()?.first_mut(locator)?.highlighted = on;
        self.record(format!("highlight {} {}", if on { "on" } else { "off" }, locator));
        Ok(())
    }

    async fn press_key(&self, key: &str) -> Result<()> {
        let hook = Self::hook_for(&self.key_hooks, key)?;
        let mut dom = self.dom()?;
        self.record(format!("press {}", key));
        if let Some(hook) = hook {
            hook(&mut *dom);
        }
        Ok(())
    }

    async fn screenshot(&self, full_page: bool) -> Result<Vec<u8>> {
        self.dom()?;
        self.record(format!("screenshot full_page={}", full_page));
        BASE64
            .decode(MOCK_PNG_BASE64)
            .map_err(|e| Error::internal(format!("Bad mock PNG: {}", e)))
    }

    async fn close(&self) -> Result<()> {
        self.is_active.store(false, Ordering::Relaxed);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_union_locator_resolves_in_insertion_order() {
        let driver = MockPageDriver::new();
        driver.update(|dom| {
            dom.insert(".b", MockElement::text("first"));
            dom.insert(".a", MockElement::text("second"));
            dom.insert(".c", MockElement::text("ignored"));
        });

        let locator = Locator::any_of([".a", ".b"]);
        assert_eq!(driver.count(&locator).await.unwrap(), 2);
        assert_eq!(
            driver.all_inner_texts(&locator).await.unwrap(),
            vec!["first", "second"]
        );
        assert_eq!(driver.inner_text(&locator.nth(1)).await.unwrap(), "second");
    }

    #[tokio::test]
    async fn test_navigate_hook_builds_page() {
        let driver = MockPageDriver::new();
        driver.on_navigate("#/login", |dom| {
            dom.clear();
            dom.insert("#username", MockElement::input(""));
        });

        driver
            .goto("https://qat.paylink.example.com/#/login", LoadState::DomContentLoaded, Duration::from_secs(1))
            .await
            .unwrap();

        assert!(driver.is_visible(&Locator::css("#username")).await.unwrap());
        assert_eq!(driver.snapshot().history().len(), 1);
    }

    #[tokio::test]
    async fn test_click_hook_and_action_log() {
        let driver = MockPageDriver::new();
        driver.update(|dom| {
            dom.insert("#go", MockElement::new());
        });
        driver.on_click("#go", |dom| {
            dom.insert(".toast", MockElement::text("done"));
        });

        driver.click(&Locator::css("#go")).await.unwrap();

        assert_eq!(driver.actions(), vec!["click #go"]);
        assert_eq!(driver.inner_text(&Locator::css(".toast")).await.unwrap(), "done");
    }

    #[tokio::test]
    async fn test_missing_element_errors() {
        let driver = MockPageDriver::new();
        let err = driver.click(&Locator::css("#nope")).await.unwrap_err();
        assert!(matches!(err, Error::ElementNotFound(_)));
        assert!(!driver.is_visible(&Locator::css("#nope")).await.unwrap());
    }

    #[tokio::test]
    async fn test_network_idle_never_reached() {
        let driver = MockPageDriver::new();
        driver.update(|dom| dom.network_idle = false);

        let err = driver
            .wait_for_load_state(LoadState::NetworkIdle, Duration::from_millis(50))
            .await
            .unwrap_err();
        assert!(err.is_timeout());
        driver
            .wait_for_load_state(LoadState::DomContentLoaded, Duration::from_millis(50))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_select_requires_known_option() {
        let driver = MockPageDriver::new();
        driver.update(|dom| {
            dom.insert("select#size", MockElement::select(["10", "25", "50"]));
        });
        let select = Locator::css("select#size");

        driver.select_option(&select, "25").await.unwrap();
        assert_eq!(driver.input_value(&select).await.unwrap(), "25");
        assert!(driver.select_option(&select, "999").await.is_err());
    }

    #[tokio::test]
    async fn test_closed_driver_rejects_calls() {
        let driver = MockPageDriver::new();
        driver.close().await.unwrap();
        assert!(matches!(driver.title().await, Err(Error::PageClosed(_))));
    }
}
