//! # Page objects
//!
//! Each page declares its locators when it is built and resolves them only
//! when an operation runs. Shared widgets and primitives live in
//! [`BasePage`], which every page holds.
//!
//! ## Example
//! ```rust,no_run
//! use paylink_e2e::manager::PageObjectManager;
//! use paylink_e2e::session::PageSession;
//!
//! # async fn example(session: PageSession) -> Result<(), Box<dyn std::error::Error>> {
//! let pages = PageObjectManager::new(session);
//! let login = pages.login_page()?;
//! login.navigate().await?;
//! login.verify_login_page_displayed().await?;
//! login.login("merchant.admin@paylink.test", "secret").await?;
//! pages.dashboard_page()?.verify_dashboard_displayed().await?;
//! # Ok(())
//! # }
//! ```

pub mod base;
pub mod dashboard;
pub mod login;
pub mod payment_links;


pub use base::{BaseLocators, BasePage};
pub use dashboard::{DashboardPage, DASHBOARD_ROUTE};
pub use login::{LoginPage, LOGIN_ROUTE};
pub use payment_links::{PaymentLinksPage, PAYMENT_LINKS_ROUTE};
