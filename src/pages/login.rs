//! Login page

use tracing::{info, instrument};

use super::base::BasePage;
use crate::data::TestData;
use crate::driver::LoadState;
use crate::locator::Locator;
use crate::manager::PageObject;
use crate::session::PageSession;
use crate::Result;

/// Hash route of the login screen
pub const LOGIN_ROUTE: &str = "#/login";

/// The portal's sign-in form
#[derive(Debug, Clone)]
pub struct LoginPage {
    base: BasePage,
    pub username_input: Locator,
    pub password_input: Locator,
    pub login_button: Locator,
    /// Any of the configured validation-message conventions
    pub validation_message: Locator,
}

impl PageObject for LoginPage {
    fn from_session(session: &PageSession) -> Self {
        Self {
            base: BasePage::new(session),
            username_input: Locator::any_of(["#username", "input[name='username']"]),
            password_input: Locator::any_of(["#password", "input[name='password']"]),
            login_button: Locator::any_of(["#login-button", "button[type='submit']"]),
            validation_message: Locator::any_of(&session.config().validation_selectors),
        }
    }
}

impl LoginPage {
    pub fn base(&self) -> &BasePage {
        &self.base
    }

    /// Open the environment's login URL, wait for the network to settle,
    /// then give the client framework the configured settle delay
    #[instrument(skip(self))]
    pub async fn navigate(&self) -> Result<()> {
        let session = self.base.session();
        let url = session.environment().base_url.clone();
        self.base.goto_until(&url, LoadState::NetworkIdle).await?;
        self.base.wait(session.config().settle_delay()).await;
        Ok(())
    }

    /// Fill both fields, submit, wait for the network to settle
    ///
    /// Does not check the outcome.
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<()> {
        info!("Logging in as {}", username);
        self.base.fill(&self.username_input, username).await?;
        self.base.fill(&self.password_input, password).await?;
        self.base.click(&self.login_button).await?;
        self.base.actions().wait_for_network_idle(None).await
    }

    /// Log in with the record at `index`
    pub async fn login_with_test_data(&self, data: &TestData, index: usize) -> Result<()> {
        let credentials = data.credentials(index)?;
        self.login(&credentials.username, &credentials.password).await
    }

    /// Log in with the first record
    pub async fn login_as_default_user(&self, data: &TestData) -> Result<()> {
        let credentials = data.default_user()?;
        self.login(&credentials.username, &credentials.password).await
    }

    /// Username, password and submit all visible within the default timeout
    pub async fn verify_login_page_displayed(&self) -> Result<()> {
        self.base
            .actions()
            .wait_for_all_visible(
                &[&self.username_input, &self.password_input, &self.login_button],
                None,
            )
            .await
    }

    pub async fn is_validation_message_visible(&self) -> Result<bool> {
        self.base.is_visible(&self.validation_message).await
    }

    /// Text of the first validation message, once one is shown
    pub async fn get_validation_message(&self) -> Result<String> {
        self.base.get_text(&self.validation_message).await
    }

    /// Empty both credential fields
    pub async fn clear_form(&self) -> Result<()> {
        self.base.clear(&self.username_input).await?;
        self.base.clear(&self.password_input).await
    }

    pub async fn is_on_login_page(&self) -> Result<bool> {
        Ok(self.base.current_url().await?.contains(LOGIN_ROUTE))
    }

    pub async fn username_value(&self) -> Result<String> {
        self.base.input_value(&self.username_input).await
    }

    pub async fn password_value(&self) -> Result<String> {
        self.base.input_value(&self.password_input).await
    }

    pub async fn is_login_button_enabled(&self) -> Result<bool> {
        self.base.is_enabled(&self.login_button).await
    }
}
