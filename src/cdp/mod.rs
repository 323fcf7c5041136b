//! # Chrome DevTools Protocol (CDP) layer
//!
//! Transport to the external browser automation engine: a running Chrome or
//! Chromium with `--remote-debugging-port`.
//!
//! ## Modules
//! - `traits`: connection, client and browser interfaces
//! - `types`: wire structures
//! - `connection`: WebSocket JSON-RPC connection
//! - `client`: typed client over a connection
//! - `browser`: DevTools HTTP endpoint (open/close targets)
//! - `mock`: recording mock for tests
//!
//! ## Example
//! ```rust,no_run
//! use paylink_e2e::cdp::{CdpBrowser, CdpBrowserImpl};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let browser = CdpBrowserImpl::new("ws://localhost:9222");
//! let target = browser.create_target("about:blank").await?;
//! let client = browser.create_client(&target.ws_url).await?;
//! client.navigate("https://qat.paylink.example.com/#/login").await?;
//! # Ok(())
//! # }
//! ```

pub mod traits;
pub mod types;
pub mod connection;
pub mod client;
pub mod browser;
pub mod mock;

pub use traits::{
    BrowserVersion, CdpBrowser, CdpClient, CdpConnection, CdpError, CdpEvent, CdpResponse,
    EvaluationResult, NavigationResult, TargetInfo,
};

pub use browser::CdpBrowserImpl;
pub use client::CdpClientImpl;
pub use connection::CdpWebSocketConnection;
pub use mock::{MockCdpBrowser, MockCdpConnection};
