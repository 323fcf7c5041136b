//! paylink-e2e: Page Object Model browser test harness for the payment-link portal
//!
//! Drives a Chrome instance over the Chrome DevTools Protocol. Tests build a
//! [`PageObjectManager`](manager::PageObjectManager) from a
//! [`PageSession`](session::PageSession) and work through page objects.

pub mod error;
pub mod config;
pub mod environment;
pub mod locator;
pub mod data;

pub mod cdp;
pub mod driver;
pub mod actions;
pub mod pages;
pub mod manager;
pub mod session;

// Re-exports
pub use error::{Error, Result};
pub use locator::Locator;

/// paylink-e2e library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
