//! Landing page after sign-in

use tracing::instrument;

use super::base::BasePage;
use super::login::LOGIN_ROUTE;
use crate::locator::Locator;
use crate::manager::PageObject;
use crate::session::PageSession;
use crate::Result;

pub const DASHBOARD_ROUTE: &str = "#/dashboard";

#[derive(Debug, Clone)]
pub struct DashboardPage {
    base: BasePage,
    pub header: Locator,
    pub welcome_message: Locator,
    pub user_menu: Locator,
    pub logout_button: Locator,
}

impl PageObject for DashboardPage {
    fn from_session(session: &PageSession) -> Self {
        Self {
            base: BasePage::new(session),
            header: Locator::any_of([".dashboard-header", "[data-testid='dashboard-title']"]),
            welcome_message: Locator::any_of([".welcome-message", "[data-testid='welcome']"]),
            user_menu: Locator::any_of([".user-menu", "[data-testid='user-menu']"]),
            logout_button: Locator::any_of([".logout-button", "[data-testid='logout']"]),
        }
    }
}

impl DashboardPage {
    pub fn base(&self) -> &BasePage {
        &self.base
    }

    pub async fn navigate(&self) -> Result<()> {
        let url = self.base.session().environment().route(DASHBOARD_ROUTE);
        self.base.goto(&url).await?;
        self.base.wait_for_loading_complete().await
    }

    /// On the dashboard route with the header shown
    pub async fn verify_dashboard_displayed(&self) -> Result<()> {
        self.base.wait_for_url(DASHBOARD_ROUTE, None).await?;
        self.base.wait_for_visible(&self.header).await
    }

    pub async fn welcome_text(&self) -> Result<String> {
        self.base.get_text(&self.welcome_message).await
    }

    /// Sign out through the user menu and wait for the login route
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<()> {
        self.base.click(&self.user_menu).await?;
        self.base.click(&self.logout_button).await?;
        self.base.wait_for_url(LOGIN_ROUTE, None).await?;
        Ok(())
    }
}
