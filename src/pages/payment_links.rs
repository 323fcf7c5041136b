//! Payment link list

use tracing::instrument;

use super::base::BasePage;
use crate::locator::Locator;
use crate::manager::PageObject;
use crate::session::PageSession;
use crate::Result;

pub const PAYMENT_LINKS_ROUTE: &str = "#/payment-links";

#[derive(Debug, Clone)]
pub struct PaymentLinksPage {
    base: BasePage,
    pub title: Locator,
    pub create_button: Locator,
    pub create_form: Locator,
    /// Reference column of the links table
    pub reference_cells: Locator,
}

impl PageObject for PaymentLinksPage {
    fn from_session(session: &PageSession) -> Self {
        let base = BasePage::new(session);
        let reference_cells = base.locators().table_rows.descendant("td.link-reference");
        Self {
            base,
            title: Locator::any_of([".payment-links-title", "[data-testid='payment-links-title']"]),
            create_button: Locator::any_of(["button.create-link", "[data-testid='create-link']"]),
            create_form: Locator::any_of(["form.payment-link-form", "[data-testid='payment-link-form']"]),
            reference_cells,
        }
    }
}

impl PaymentLinksPage {
    pub fn base(&self) -> &BasePage {
        &self.base
    }

    /// Open the list and wait for it to finish loading
    #[instrument(skip(self))]
    pub async fn navigate(&self) -> Result<()> {
        let url = self.base.session().environment().route(PAYMENT_LINKS_ROUTE);
        self.base.goto(&url).await?;
        self.base.wait_for_visible(&self.title).await?;
        self.base.wait_for_loading_complete().await
    }

    pub async fn search_link(&self, term: &str) -> Result<()> {
        self.base.search(term).await
    }

    pub async fn clear_search(&self) -> Result<()> {
        self.base.clear_search().await
    }

    /// Rows currently shown
    pub async fn link_count(&self) -> Result<usize> {
        self.base.get_table_row_count().await
    }

    pub async fn set_page_size(&self, size: u32) -> Result<()> {
        self.base.select_items_per_page(&size.to_string()).await
    }

    /// References of the shown rows, once the first row is visible
    pub async fn link_references(&self) -> Result<Vec<String>> {
        self.base.get_all_texts(&self.reference_cells).await
    }

    pub async fn open_create_form(&self) -> Result<()> {
        self.base.click(&self.create_button).await?;
        self.base.wait_for_visible(&self.create_form).await
    }
}
