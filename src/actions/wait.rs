//! Bounded waits on element state and page URL

use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, instrument};

use crate::driver::{ElementState, PageDriver};
use crate::locator::Locator;
use crate::{Error, Result};

/// Interval between state checks
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

impl fmt::Display for ElementState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ElementState::Visible => "visible",
            ElementState::Hidden => "hidden",
            ElementState::Attached => "attached",
            ElementState::Detached => "detached",
        })
    }
}

/// Polls the driver until an element or URL condition holds
#[derive(Debug, Clone)]
pub struct ElementWaiter {
    driver: Arc<dyn PageDriver>,
}

impl ElementWaiter {
    pub fn new(driver: Arc<dyn PageDriver>) -> Self {
        Self { driver }
    }

    /// Whether `locator` is currently in `state`
    pub async fn in_state(&self, locator: &Locator, state: ElementState) -> Result<bool> {
        Ok(match state {
            ElementState::Visible => self.driver.is_visible(locator).await?,
            ElementState::Hidden => !self.driver.is_visible(locator).await?,
            ElementState::Attached => self.driver.count(locator).await? > 0,
            ElementState::Detached => self.driver.count(locator).await? == 0,
        })
    }

    /// Wait until `locator` is in `state`; `Error::Timeout` if it never is
    #[instrument(skip(self), fields(locator = %locator))]
    pub async fn wait_for(&self, locator: &Locator, state: ElementState, timeout: Duration) -> Result<()> {
        let start = Instant::now();

        loop {
            if self.in_state(locator, state).await? {
                return Ok(());
            }
            let elapsed = start.elapsed();
            if elapsed >= timeout {
                break;
            }
            tokio::time::sleep(POLL_INTERVAL.min(timeout - elapsed)).await;
        }

        Err(Error::timeout(format!(
            "{} did not become {} within {}ms",
            locator,
            state,
            timeout.as_millis()
        )))
    }

    /// Wait until every locator is in `state` at the same check
    #[instrument(skip(self, locators))]
    pub async fn wait_for_all(&self, locators: &[&Locator], state: ElementState, timeout: Duration) -> Result<()> {
        let start = Instant::now();
        let mut pending: Vec<String> = Vec::new();

        loop {
            pending.clear();
            for locator in locators {
                if !self.in_state(locator, state).await? {
                    pending.push(locator.to_string());
                }
            }
            if pending.is_empty() {
                return Ok(());
            }
            let elapsed = start.elapsed();
            if elapsed >= timeout {
                break;
            }
            tokio::time::sleep(POLL_INTERVAL.min(timeout - elapsed)).await;
        }

        Err(Error::timeout(format!(
            "[{}] did not become {} within {}ms",
            pending.join("; "),
            state,
            timeout.as_millis()
        )))
    }

    /// Like [`wait_for`](Self::wait_for) but a timeout yields `Ok(false)`
    pub async fn wait_for_best_effort(
        &self,
        locator: &Locator,
        state: ElementState,
        timeout: Duration,
    ) -> Result<bool> {
        match self.wait_for(locator, state, timeout).await {
            Ok(()) => Ok(true),
            Err(e) if e.is_timeout() => {
                debug!("Best-effort wait gave up: {}", e);
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Wait until the current URL contains `pattern`
    #[instrument(skip(self))]
    pub async fn wait_for_url(&self, pattern: &str, timeout: Duration) -> Result<String> {
        let start = Instant::now();
        let mut last = String::new();

        loop {
            last = self.driver.current_url().await.unwrap_or(last);
            if last.contains(pattern) {
                return Ok(last);
            }
            let elapsed = start.elapsed();
            if elapsed >= timeout {
                break;
            }
            tokio::time::sleep(POLL_INTERVAL.min(timeout - elapsed)).await;
        }

        Err(Error::timeout(format!(
            "URL did not match '{}' within {}ms (last seen: {})",
            pattern,
            timeout.as_millis(),
            last
        )))
    }
}
