//! Page session
//!
//! One browser tab plus the configuration and environment it was opened
//! with. Page objects are built from it.

use std::sync::Arc;
use tracing::debug;

use crate::actions::Actions;
use crate::config::Config;
use crate::driver::PageDriver;
use crate::environment::ResolvedEnvironment;
use crate::Result;

/// A browser tab owned by one test case
#[derive(Debug, Clone)]
pub struct PageSession {
    driver: Arc<dyn PageDriver>,
    config: Arc<Config>,
    environment: Arc<ResolvedEnvironment>,
}

impl PageSession {
    pub fn new(driver: Arc<dyn PageDriver>, config: Arc<Config>, environment: ResolvedEnvironment) -> Self {
        debug!(
            "Page session {} for environment {}",
            driver.id(),
            environment.label()
        );
        Self {
            driver,
            config,
            environment: Arc::new(environment),
        }
    }

    pub fn id(&self) -> &str {
        self.driver.id()
    }

    pub fn driver(&self) -> &Arc<dyn PageDriver> {
        &self.driver
    }

    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    pub fn environment(&self) -> &ResolvedEnvironment {
        &self.environment
    }

    /// Interaction primitives for this tab
    pub fn actions(&self) -> Actions {
        Actions::new(self.driver.clone(), self.config.clone())
    }

    /// Close the tab
    pub async fn close(&self) -> Result<()> {
        self.driver.close().await
    }
}
