//! Page object manager
//!
//! Builds each page object the first time it is asked for and hands out the
//! same instance afterwards, for the lifetime of the manager.

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::debug;

use crate::pages::{DashboardPage, LoginPage, PaymentLinksPage};
use crate::session::PageSession;
use crate::{Error, Result};

/// A page object buildable from a session
pub trait PageObject: Send + Sync + 'static {
    fn from_session(session: &PageSession) -> Self
    where
        Self: Sized;
}

type CachedPage = Arc<dyn Any + Send + Sync>;

/// Session-scoped page object cache keyed by type
#[derive(Debug)]
pub struct PageObjectManager {
    session: PageSession,
    pages: RwLock<HashMap<TypeId, CachedPage>>,
}

impl PageObjectManager {
    pub fn new(session: PageSession) -> Self {
        Self {
            session,
            pages: RwLock::new(HashMap::new()),
        }
    }

    pub fn session(&self) -> &PageSession {
        &self.session
    }

    /// The page object of type `P`, built on first access
    pub fn get<P: PageObject>(&self) -> Result<Arc<P>> {
        let key = TypeId::of::<P>();

        let cached = self
            .pages
            .read()
            .map_err(|e| Error::internal(format!("Lock error: {}", e)))?
            .get(&key)
            .cloned();
        if let Some(page) = cached {
            return Self::downcast(page);
        }

        let page = self
            .pages
            .write()
            .map_err(|e| Error::internal(format!("Lock error: {}", e)))?
            .entry(key)
            .or_insert_with(|| {
                debug!("Creating page object {}", type_name::<P>());
                Arc::new(P::from_session(&self.session)) as CachedPage
            })
            .clone();
        Self::downcast(page)
    }

    fn downcast<P: PageObject>(page: CachedPage) -> Result<Arc<P>> {
        page.downcast::<P>().map_err(|_| {
            Error::internal(format!("Cached page is not a {}", type_name::<P>()))
        })
    }

    /// Number of page objects built so far
    pub fn cached_count(&self) -> usize {
        self.pages.read().map(|p| p.len()).unwrap_or(0)
    }

    pub fn login_page(&self) -> Result<Arc<LoginPage>> {
        self.get()
    }

    pub fn dashboard_page(&self) -> Result<Arc<DashboardPage>> {
        self.get()
    }

    pub fn payment_links_page(&self) -> Result<Arc<PaymentLinksPage>> {
        self.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::driver::MockPageDriver;
    use crate::environment::ResolvedEnvironment;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static BUILT: AtomicUsize = AtomicUsize::new(0);

    struct CountingPage;

    impl PageObject for CountingPage {
        fn from_session(_session: &PageSession) -> Self {
            BUILT.fetch_add(1, Ordering::SeqCst);
            CountingPage
        }
    }

    fn manager() -> PageObjectManager {
        PageObjectManager::new(PageSession::new(
            Arc::new(MockPageDriver::new()),
            Arc::new(Config::default()),
            ResolvedEnvironment::default(),
        ))
    }

    #[test]
    fn test_same_instance_on_repeat_access() {
        let pages = manager();
        let first = pages.login_page().unwrap();
        let second = pages.login_page().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(pages.cached_count(), 1);
    }

    #[test]
    fn test_built_once_and_only_on_demand() {
        let pages = manager();
        assert_eq!(BUILT.load(Ordering::SeqCst), 0);

        pages.get::<CountingPage>().unwrap();
        pages.get::<CountingPage>().unwrap();

        assert_eq!(BUILT.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_types_cached_separately() {
        let pages = manager();
        pages.login_page().unwrap();
        pages.dashboard_page().unwrap();
        pages.payment_links_page().unwrap();
        assert_eq!(pages.cached_count(), 3);
    }

    #[test]
    fn test_managers_do_not_share() {
        let a = manager();
        let b = manager();
        assert!(!Arc::ptr_eq(&a.login_page().unwrap(), &b.login_page().unwrap()));
    }
}
