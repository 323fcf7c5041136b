//! Interaction and wait primitives
//!
//! Every interaction waits for its element to reach the required state,
//! optionally flashes an outline on it, then acts. Reads other than
//! [`Actions::get_text`] and [`Actions::get_all_texts`] do not wait.

pub mod screenshot;
pub mod wait;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::config::Config;
use crate::driver::{ElementState, LoadState, PageDriver};
use crate::locator::Locator;
use crate::Result;

pub use wait::{ElementWaiter, POLL_INTERVAL};

/// Per-call overrides
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionOptions {
    /// Flash an outline before acting; `None` uses the operation default
    pub highlight: Option<bool>,
    /// Wait bound; `None` uses the configured default
    pub timeout: Option<Duration>,
}

impl ActionOptions {
    pub fn highlight(mut self, on: bool) -> Self {
        self.highlight = Some(on);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Interaction primitives bound to one page
#[derive(Debug, Clone)]
pub struct Actions {
    driver: Arc<dyn PageDriver>,
    config: Arc<Config>,
    waiter: ElementWaiter,
}

impl Actions {
    pub fn new(driver: Arc<dyn PageDriver>, config: Arc<Config>) -> Self {
        Self {
            waiter: ElementWaiter::new(driver.clone()),
            driver,
            config,
        }
    }

    pub fn driver(&self) -> &Arc<dyn PageDriver> {
        &self.driver
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn timeout_or_default(&self, options: ActionOptions) -> Duration {
        options.timeout.unwrap_or_else(|| self.config.default_timeout())
    }

    /// Outline the element, pause, then restore it
    async fn flash(&self, locator: &Locator) -> Result<()> {
        self.driver.set_highlight(locator, true).await?;
        tokio::time::sleep(self.config.highlight_pause()).await;
        self.driver.set_highlight(locator, false).await
    }

    /// Wait for visibility, then flash if requested
    async fn prepare(&self, locator: &Locator, options: ActionOptions, highlight_default: bool) -> Result<()> {
        self.waiter
            .wait_for(locator, ElementState::Visible, self.timeout_or_default(options))
            .await?;
        if options.highlight.unwrap_or(highlight_default && self.config.highlight) {
            self.flash(locator).await?;
        }
        Ok(())
    }

    // Element waits

    /// Wait for `state`, failing with `Error::Timeout`
    pub async fn wait_for_element(&self, locator: &Locator, state: ElementState, timeout: Option<Duration>) -> Result<()> {
        let timeout = timeout.unwrap_or_else(|| self.config.default_timeout());
        self.waiter.wait_for(locator, state, timeout).await
    }

    /// Wait for `state`; `Ok(false)` instead of a timeout error
    pub async fn wait_for_element_best_effort(
        &self,
        locator: &Locator,
        state: ElementState,
        timeout: Option<Duration>,
    ) -> Result<bool> {
        let timeout = timeout.unwrap_or_else(|| self.config.default_timeout());
        self.waiter.wait_for_best_effort(locator, state, timeout).await
    }

    /// Wait until all locators are visible together
    pub async fn wait_for_all_visible(&self, locators: &[&Locator], timeout: Option<Duration>) -> Result<()> {
        let timeout = timeout.unwrap_or_else(|| self.config.default_timeout());
        self.waiter
            .wait_for_all(locators, ElementState::Visible, timeout)
            .await
    }

    pub async fn wait_for_visible(&self, locator: &Locator) -> Result<()> {
        self.wait_for_element(locator, ElementState::Visible, None).await
    }

    pub async fn wait_for_hidden(&self, locator: &Locator) -> Result<()> {
        self.wait_for_element(locator, ElementState::Hidden, None).await
    }

    /// Wait until the current URL contains `pattern`
    pub async fn wait_for_url(&self, pattern: &str, timeout: Option<Duration>) -> Result<String> {
        let timeout = timeout.unwrap_or_else(|| self.config.default_timeout());
        self.waiter.wait_for_url(pattern, timeout).await
    }

    // Interactions

    pub async fn click(&self, locator: &Locator) -> Result<()> {
        self.click_with(locator, ActionOptions::default()).await
    }

    #[instrument(skip(self, options), fields(locator = %locator))]
    pub async fn click_with(&self, locator: &Locator, options: ActionOptions) -> Result<()> {
        self.prepare(locator, options, true).await?;
        self.driver.click(locator).await
    }

    /// Replace the field's whole value
    pub async fn fill(&self, locator: &Locator, value: &str) -> Result<()> {
        self.fill_with(locator, value, ActionOptions::default()).await
    }

    #[instrument(skip(self, value, options), fields(locator = %locator))]
    pub async fn fill_with(&self, locator: &Locator, value: &str, options: ActionOptions) -> Result<()> {
        self.prepare(locator, options, true).await?;
        self.driver.fill(locator, value).await
    }

    /// Type character by character with the configured delay between keys
    #[instrument(skip(self, text), fields(locator = %locator))]
    pub async fn type_text(&self, locator: &Locator, text: &str) -> Result<()> {
        self.prepare(locator, ActionOptions::default(), false).await?;
        let delay = self.config.type_delay();
        for (i, ch) in text.chars().enumerate() {
            if i > 0 && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            let mut buf = [0u8; 4];
            self.driver.insert_text(locator, ch.encode_utf8(&mut buf)).await?;
        }
        Ok(())
    }

    /// Select an `<option>` by value
    #[instrument(skip(self), fields(locator = %locator))]
    pub async fn select_option(&self, locator: &Locator, value: &str) -> Result<()> {
        self.prepare(locator, ActionOptions::default(), false).await?;
        self.driver.select_option(locator, value).await
    }

    pub async fn clear(&self, locator: &Locator) -> Result<()> {
        self.prepare(locator, ActionOptions::default(), false).await?;
        self.driver.fill(locator, "").await
    }

    pub async fn check(&self, locator: &Locator) -> Result<()> {
        self.prepare(locator, ActionOptions::default(), false).await?;
        self.driver.set_checked(locator, true).await
    }

    pub async fn uncheck(&self, locator: &Locator) -> Result<()> {
        self.prepare(locator, ActionOptions::default(), false).await?;
        self.driver.set_checked(locator, false).await
    }

    // Reads

    /// Text of the element once it is visible
    pub async fn get_text(&self, locator: &Locator) -> Result<String> {
        self.wait_for_visible(locator).await?;
        self.driver.inner_text(locator).await
    }

    /// Texts of every match; only the first match is waited for, so matches
    /// rendered after it may be missing from the result
    pub async fn get_all_texts(&self, locator: &Locator) -> Result<Vec<String>> {
        self.wait_for_visible(&locator.first()).await?;
        self.driver.all_inner_texts(locator).await
    }

    pub async fn is_visible(&self, locator: &Locator) -> Result<bool> {
        self.driver.is_visible(locator).await
    }

    pub async fn is_enabled(&self, locator: &Locator) -> Result<bool> {
        self.driver.is_enabled(locator).await
    }

    pub async fn is_checked(&self, locator: &Locator) -> Result<bool> {
        self.driver.is_checked(locator).await
    }

    pub async fn get_count(&self, locator: &Locator) -> Result<usize> {
        self.driver.count(locator).await
    }

    pub async fn input_value(&self, locator: &Locator) -> Result<String> {
        self.driver.input_value(locator).await
    }

    // Page-level

    pub async fn wait_for_network_idle(&self, timeout: Option<Duration>) -> Result<()> {
        let timeout = timeout.unwrap_or_else(|| self.config.default_timeout());
        self.driver.wait_for_load_state(LoadState::NetworkIdle, timeout).await
    }

    pub async fn wait_for_dom_ready(&self, timeout: Option<Duration>) -> Result<()> {
        let timeout = timeout.unwrap_or_else(|| self.config.default_timeout());
        self.driver.wait_for_load_state(LoadState::DomContentLoaded, timeout).await
    }

    /// Capture the page to `<screenshot_dir>/<label>-<timestamp>.png`
    pub async fn take_screenshot(&self, label: &str) -> Result<PathBuf> {
        let png = self.driver.screenshot(true).await?;
        screenshot::write_screenshot(&self.config.screenshot_dir, label, &png).await
    }

    pub async fn press_key(&self, key: &str) -> Result<()> {
        debug!("Pressing {}", key);
        self.driver.press_key(key).await
    }

    pub async fn scroll_into_view(&self, locator: &Locator) -> Result<()> {
        self.wait_for_element(locator, ElementState::Attached, None).await?;
        self.driver.scroll_into_view(locator).await
    }

    /// Fixed sleep
    pub async fn pause(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[cfg(test)]
mod tests;
