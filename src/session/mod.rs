//! # Sessions
//!
//! A [`BrowserSession`] is the connection to one Chrome process. Each test
//! case opens its own tab from it as a [`PageSession`], which carries the
//! driver, the configuration and the resolved environment.
//!
//! ## Example
//! ```rust,no_run
//! use paylink_e2e::config::Config;
//! use paylink_e2e::environment::ResolvedEnvironment;
//! use paylink_e2e::session::BrowserSession;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let browser = BrowserSession::connect(Config::from_env()?, ResolvedEnvironment::from_env()).await?;
//! let page = browser.new_page().await?;
//! page.actions().wait_for_dom_ready(None).await?;
//! browser.close().await?;
//! # Ok(())
//! # }
//! ```

pub mod browser;
pub mod page;

pub use browser::BrowserSession;
pub use page::PageSession;
