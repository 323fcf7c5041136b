//! Browser automation engine interface
//!
//! Everything the harness asks of the browser goes through [`PageDriver`].
//! Implementations resolve locators against the live page on every call.

use async_trait::async_trait;
use std::time::Duration;

use crate::locator::Locator;
use crate::Result;

/// Page load state, as signalled by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadState {
    /// The DOM has been parsed
    DomContentLoaded,
    /// The load event fired
    Load,
    /// No network activity for the engine's quiescence interval
    NetworkIdle,
}

impl LoadState {
    /// Name of the matching CDP `Page.lifecycleEvent`
    pub fn lifecycle_name(&self) -> &'static str {
        match self {
            LoadState::DomContentLoaded => "DOMContentLoaded",
            LoadState::Load => "load",
            LoadState::NetworkIdle => "networkIdle",
        }
    }
}

/// Element state a wait can require
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementState {
    /// Present and rendered with a non-empty box
    Visible,
    /// Absent or not rendered
    Hidden,
    /// Present in the DOM, rendered or not
    Attached,
    /// Absent from the DOM
    Detached,
}

/// One browser page (tab) as seen by the harness
#[async_trait]
pub trait PageDriver: Send + Sync + std::fmt::Debug {
    /// Driver instance id, for logs
    fn id(&self) -> &str;

    /// Navigate and wait for `wait_until`
    async fn goto(&self, url: &str, wait_until: LoadState, timeout: Duration) -> Result<()>;

    /// Current page URL
    async fn current_url(&self) -> Result<String>;

    /// Document title
    async fn title(&self) -> Result<String>;

    /// Reload the page; does not wait
    async fn reload(&self) -> Result<()>;

    /// Go back in history; does not wait
    async fn go_back(&self) -> Result<()>;

    /// Wait until the engine reports `state` for the current document
    async fn wait_for_load_state(&self, state: LoadState, timeout: Duration) -> Result<()>;

    /// Number of matching elements
    async fn count(&self, locator: &Locator) -> Result<usize>;

    /// Whether the (first or indexed) match exists and is rendered
    async fn is_visible(&self, locator: &Locator) -> Result<bool>;

    /// Whether the match is enabled; errors if absent
    async fn is_enabled(&self, locator: &Locator) -> Result<bool>;

    /// Whether the checkbox/radio match is checked; errors if absent
    async fn is_checked(&self, locator: &Locator) -> Result<bool>;

    /// Rendered text of the match; errors if absent
    async fn inner_text(&self, locator: &Locator) -> Result<String>;

    /// Rendered text of every match, in document order
    async fn all_inner_texts(&self, locator: &Locator) -> Result<Vec<String>>;

    /// Current value of an input, textarea or select
    async fn input_value(&self, locator: &Locator) -> Result<String>;

    /// Click the centre of the match
    async fn click(&self, locator: &Locator) -> Result<()>;

    /// Replace the value of an input
    async fn fill(&self, locator: &Locator, value: &str) -> Result<()>;

    /// Focus the match and type `text` at the end of its value
    async fn insert_text(&self, locator: &Locator, text: &str) -> Result<()>;

    /// Select the `<option>` with the given value
    async fn select_option(&self, locator: &Locator, value: &str) -> Result<()>;

    /// Check or uncheck a checkbox/radio
    async fn set_checked(&self, locator: &Locator, checked: bool) -> Result<()>;

    async fn scroll_into_view(&self, locator: &Locator) -> Result<()>;

    /// Add or remove the debugging outline
    async fn set_highlight(&self, locator: &Locator, on: bool) -> Result<()>;

    /// Press a key on the focused element, e.g. `Enter`, `Tab`, `Escape`
    async fn press_key(&self, key: &str) -> Result<()>;

    /// PNG screenshot
    async fn screenshot(&self, full_page: bool) -> Result<Vec<u8>>;

    /// Close the page
    async fn close(&self) -> Result<()>;
}
