//! Operations every page shares
//!
//! Concrete pages hold a [`BasePage`] and call through it. Widgets that look
//! the same across the portal (spinner, toast, error banner, data table,
//! search box) are located here once.

use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, instrument};

use crate::actions::Actions;
use crate::driver::{ElementState, LoadState};
use crate::locator::Locator;
use crate::session::PageSession;
use crate::{Error, Result};

/// Locators of the portal-wide widgets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseLocators {
    pub loading_indicator: Locator,
    pub toast: Locator,
    pub error_banner: Locator,
    pub table_rows: Locator,
    pub items_per_page: Locator,
    pub search_input: Locator,
}

impl Default for BaseLocators {
    fn default() -> Self {
        Self {
            loading_indicator: Locator::any_of([
                ".loading-spinner",
                ".spinner",
                ".mat-progress-spinner",
                ".ant-spin-spinning",
                "[role='progressbar']",
            ]),
            toast: Locator::any_of([
                ".toast-message",
                ".toast",
                ".mat-mdc-snack-bar-container",
                ".ant-message-notice",
            ]),
            error_banner: Locator::any_of([".alert-danger", ".error-banner", ".ant-alert-error"]),
            table_rows: Locator::css("table tbody tr"),
            items_per_page: Locator::any_of(["select.items-per-page", ".pagination select"]),
            search_input: Locator::any_of(["input[type='search']", "input.search-input"]),
        }
    }
}

/// Shared page capabilities
#[derive(Debug, Clone)]
pub struct BasePage {
    session: PageSession,
    actions: Actions,
    locators: BaseLocators,
}

impl BasePage {
    pub fn new(session: &PageSession) -> Self {
        Self::with_locators(session, BaseLocators::default())
    }

    pub fn with_locators(session: &PageSession, locators: BaseLocators) -> Self {
        Self {
            actions: session.actions(),
            session: session.clone(),
            locators,
        }
    }

    pub fn session(&self) -> &PageSession {
        &self.session
    }

    pub fn actions(&self) -> &Actions {
        &self.actions
    }

    pub fn locators(&self) -> &BaseLocators {
        &self.locators
    }

    fn default_timeout(&self) -> Duration {
        self.session.config().default_timeout()
    }

    // Navigation

    /// Navigate and wait for the DOM only
    pub async fn goto(&self, url: &str) -> Result<()> {
        self.goto_until(url, LoadState::DomContentLoaded).await
    }

    #[instrument(skip(self))]
    pub async fn goto_until(&self, url: &str, state: LoadState) -> Result<()> {
        info!("Navigating to {}", url);
        self.session
            .driver()
            .goto(url, state, self.default_timeout())
            .await
    }

    pub async fn current_url(&self) -> Result<String> {
        self.session.driver().current_url().await
    }

    /// Wait until the URL contains `pattern`
    pub async fn wait_for_url(&self, pattern: &str, timeout: Option<Duration>) -> Result<String> {
        self.actions.wait_for_url(pattern, timeout).await
    }

    pub async fn title(&self) -> Result<String> {
        self.session.driver().title().await
    }

    /// Reload, then wait for the DOM
    pub async fn refresh(&self) -> Result<()> {
        self.session.driver().reload().await?;
        self.actions.wait_for_dom_ready(None).await
    }

    /// History back, then wait for the DOM
    pub async fn go_back(&self) -> Result<()> {
        self.session.driver().go_back().await?;
        self.actions.wait_for_dom_ready(None).await
    }

    // Primitives

    pub async fn click(&self, locator: &Locator) -> Result<()> {
        self.actions.click(locator).await
    }

    pub async fn fill(&self, locator: &Locator, value: &str) -> Result<()> {
        self.actions.fill(locator, value).await
    }

    pub async fn type_text(&self, locator: &Locator, text: &str) -> Result<()> {
        self.actions.type_text(locator, text).await
    }

    pub async fn select_option(&self, locator: &Locator, value: &str) -> Result<()> {
        self.actions.select_option(locator, value).await
    }

    pub async fn clear(&self, locator: &Locator) -> Result<()> {
        self.actions.clear(locator).await
    }

    pub async fn check(&self, locator: &Locator) -> Result<()> {
        self.actions.check(locator).await
    }

    pub async fn uncheck(&self, locator: &Locator) -> Result<()> {
        self.actions.uncheck(locator).await
    }

    pub async fn is_visible(&self, locator: &Locator) -> Result<bool> {
        self.actions.is_visible(locator).await
    }

    pub async fn is_enabled(&self, locator: &Locator) -> Result<bool> {
        self.actions.is_enabled(locator).await
    }

    pub async fn is_checked(&self, locator: &Locator) -> Result<bool> {
        self.actions.is_checked(locator).await
    }

    pub async fn get_count(&self, locator: &Locator) -> Result<usize> {
        self.actions.get_count(locator).await
    }

    pub async fn get_text(&self, locator: &Locator) -> Result<String> {
        self.actions.get_text(locator).await
    }

    pub async fn get_all_texts(&self, locator: &Locator) -> Result<Vec<String>> {
        self.actions.get_all_texts(locator).await
    }

    pub async fn input_value(&self, locator: &Locator) -> Result<String> {
        self.actions.input_value(locator).await
    }

    pub async fn wait_for_visible(&self, locator: &Locator) -> Result<()> {
        self.actions.wait_for_visible(locator).await
    }

    // Widgets

    /// Wait for the spinner to go away; a spinner that never leaves is not an error
    pub async fn wait_for_loading_complete(&self) -> Result<()> {
        let done = self
            .actions
            .wait_for_element_best_effort(&self.locators.loading_indicator, ElementState::Hidden, None)
            .await?;
        if !done {
            debug!("Loading indicator still shown after {:?}", self.default_timeout());
        }
        Ok(())
    }

    pub async fn wait_for_toast(&self) -> Result<()> {
        self.actions.wait_for_visible(&self.locators.toast).await
    }

    /// Text of the toast once it is shown
    pub async fn get_toast_message(&self) -> Result<String> {
        self.actions.get_text(&self.locators.toast).await
    }

    /// Fails with `Error::Assertion` unless the toast contains `expected`
    #[instrument(skip(self))]
    pub async fn verify_toast_message(&self, expected: &str) -> Result<()> {
        let actual = self.get_toast_message().await?;
        if actual.contains(expected) {
            Ok(())
        } else {
            Err(Error::assertion(format!(
                "toast '{}' does not contain '{}'",
                actual, expected
            )))
        }
    }

    /// Wait for the toast to go away; a toast that stays is not an error
    pub async fn wait_for_toast_to_disappear(&self) -> Result<()> {
        let gone = self
            .actions
            .wait_for_element_best_effort(&self.locators.toast, ElementState::Hidden, None)
            .await?;
        if !gone {
            debug!("Toast still shown");
        }
        Ok(())
    }

    /// Text of the error banner, if one is shown
    pub async fn get_error_message(&self) -> Result<Option<String>> {
        if self.actions.is_visible(&self.locators.error_banner).await? {
            Ok(Some(self.actions.get_text(&self.locators.error_banner).await?))
        } else {
            Ok(None)
        }
    }

    // Tables

    pub async fn get_table_row_count(&self) -> Result<usize> {
        self.actions.get_count(&self.locators.table_rows).await
    }

    /// Wait for at least one visible row
    pub async fn wait_for_table_data(&self) -> Result<()> {
        self.actions
            .wait_for_visible(&self.locators.table_rows.first())
            .await
    }

    /// Change the page size and wait for the table to repopulate
    #[instrument(skip(self))]
    pub async fn select_items_per_page(&self, count: &str) -> Result<()> {
        self.actions
            .select_option(&self.locators.items_per_page, count)
            .await?;
        self.wait_for_loading_complete().await?;
        self.wait_for_table_data().await
    }

    /// Enter `term`, submit with Enter, wait for loading to finish
    #[instrument(skip(self))]
    pub async fn search(&self, term: &str) -> Result<()> {
        self.actions.fill(&self.locators.search_input, term).await?;
        self.actions.press_key("Enter").await?;
        self.wait_for_loading_complete().await
    }

    pub async fn clear_search(&self) -> Result<()> {
        self.actions.clear(&self.locators.search_input).await?;
        self.actions.press_key("Enter").await?;
        self.wait_for_loading_complete().await
    }

    // Utilities

    pub async fn take_screenshot(&self, label: &str) -> Result<PathBuf> {
        self.actions.take_screenshot(label).await
    }

    pub async fn scroll_into_view(&self, locator: &Locator) -> Result<()> {
        self.actions.scroll_into_view(locator).await
    }

    pub async fn press_key(&self, key: &str) -> Result<()> {
        self.actions.press_key(key).await
    }

    /// Fixed wait
    pub async fn wait(&self, duration: Duration) {
        self.actions.pause(duration).await
    }
}
