//! Browser session
//!
//! Connects to a running Chrome through its DevTools endpoint and opens one
//! tab per [`PageSession`].

use std::sync::{Arc, RwLock};
use tracing::{info, warn};
use uuid::Uuid;

use super::page::PageSession;
use crate::cdp::{CdpBrowser, CdpBrowserImpl};
use crate::config::Config;
use crate::driver::CdpPageDriver;
use crate::environment::ResolvedEnvironment;
use crate::{Error, Result};

/// Connection to one browser process
#[derive(Debug)]
pub struct BrowserSession {
    id: String,
    config: Arc<Config>,
    environment: ResolvedEnvironment,
    cdp_browser: Arc<dyn CdpBrowser>,
    targets: RwLock<Vec<String>>,
    is_active: RwLock<bool>,
}

impl BrowserSession {
    /// Connect to the DevTools endpoint in `config`
    pub async fn connect(config: Config, environment: ResolvedEnvironment) -> Result<Self> {
        let cdp_browser = Arc::new(CdpBrowserImpl::new(config.cdp_endpoint.clone()));
        let version = cdp_browser.get_version().await?;
        info!(
            "Connected to {} (protocol {})",
            version.product, version.protocol_version
        );
        Ok(Self::with_browser(cdp_browser, config, environment))
    }

    /// Use an already constructed CDP browser
    pub fn with_browser(cdp_browser: Arc<dyn CdpBrowser>, config: Config, environment: ResolvedEnvironment) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            config: Arc::new(config),
            environment,
            cdp_browser,
            targets: RwLock::new(Vec::new()),
            is_active: RwLock::new(true),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    pub fn environment(&self) -> &ResolvedEnvironment {
        &self.environment
    }

    /// Open a blank tab
    pub async fn new_page(&self) -> Result<PageSession> {
        let active = *self
            .is_active
            .read()
            .map_err(|e| Error::internal(format!("Lock error: {}", e)))?;
        if !active {
            return Err(Error::page_closed(format!("browser session {}", self.id)));
        }

        let target = self.cdp_browser.create_target("about:blank").await?;
        let client = self.cdp_browser.create_client(&target.ws_url).await?;
        let driver = CdpPageDriver::attach(client).await?;

        self.targets
            .write()
            .map_err(|e| Error::internal(format!("Lock error: {}", e)))?
            .push(target.target_id.clone());

        info!("Opened tab {}", target.target_id);
        Ok(PageSession::new(
            Arc::new(driver),
            self.config.clone(),
            self.environment.clone(),
        ))
    }

    /// Number of tabs opened and not yet closed
    pub fn page_count(&self) -> usize {
        self.targets.read().map(|t| t.len()).unwrap_or(0)
    }

    /// Close every tab opened by this session and disconnect
    pub async fn close(&self) -> Result<()> {
        {
            let mut active = self
                .is_active
                .write()
                .map_err(|e| Error::internal(format!("Lock error: {}", e)))?;
            if !*active {
                return Ok(());
            }
            *active = false;
        }

        let targets: Vec<String> = self
            .targets
            .write()
            .map_err(|e| Error::internal(format!("Lock error: {}", e)))?
            .drain(..)
            .collect();

        for target_id in targets {
            if let Err(e) = self.cdp_browser.close_target(&target_id).await {
                warn!("Failed to close tab {}: {}", target_id, e);
            }
        }

        self.cdp_browser.close().await
    }
}
