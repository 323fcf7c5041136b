//! Page object manager behavior across a session

mod common;

use common::*;
use std::sync::Arc;

#[test]
fn test_accessors_return_cached_instances() {
    let (_driver, pages) = portal();

    assert_eq!(pages.cached_count(), 0);

    let login = pages.login_page().unwrap();
    let dashboard = pages.dashboard_page().unwrap();
    let links = pages.payment_links_page().unwrap();

    assert!(Arc::ptr_eq(&login, &pages.login_page().unwrap()));
    assert!(Arc::ptr_eq(&dashboard, &pages.dashboard_page().unwrap()));
    assert!(Arc::ptr_eq(&links, &pages.payment_links_page().unwrap()));
    assert_eq!(pages.cached_count(), 3);
}

#[tokio::test]
async fn test_cached_page_sees_live_dom() {
    let (driver, pages) = portal();
    let login = pages.login_page().unwrap();

    assert!(!login.is_validation_message_visible().await.unwrap());

    driver.update(|dom| {
        dom.insert(
            ".invalid-feedback",
            paylink_e2e::driver::MockElement::text("Password is required"),
        );
    });

    let again = pages.login_page().unwrap();
    assert!(again.is_validation_message_visible().await.unwrap());
}

#[tokio::test]
async fn test_parallel_sessions_are_isolated() {
    let run = |user: &'static str, password: &'static str| async move {
        let (driver, pages) = portal();
        let login = pages.login_page().unwrap();
        login.navigate().await.unwrap();
        login.login(user, password).await.unwrap();
        driver.snapshot().url
    };

    let (ok, rejected) = tokio::join!(
        run(VALID_USER, VALID_PASSWORD),
        run(VALID_USER, "bad")
    );

    assert!(ok.ends_with("#/dashboard"));
    assert!(rejected.ends_with("#/login"));
}
