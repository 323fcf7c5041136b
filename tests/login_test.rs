//! Login scenarios against the mock portal

mod common;

use common::*;
use paylink_e2e::pages::LOGIN_ROUTE;
use std::sync::Arc;
use std::time::Duration;
use tokio_test::{assert_err, assert_ok};

#[tokio::test]
async fn test_login_page_displayed() {
    let (_driver, pages) = portal();
    let login = pages.login_page().unwrap();

    assert_ok!(login.navigate().await);
    assert_ok!(login.verify_login_page_displayed().await);
    assert!(login.is_on_login_page().await.unwrap());
    assert_eq!(login.base().title().await.unwrap(), "Paylink - Sign in");
}

#[tokio::test]
async fn test_login_page_not_displayed_times_out() {
    let (driver, pages) = portal();
    let login = pages.login_page().unwrap();
    login.navigate().await.unwrap();
    driver.update(|dom| {
        if let Some(button) = dom.get_mut("#login-button") {
            button.visible = false;
        }
    });

    let err = assert_err!(login.verify_login_page_displayed().await);
    assert!(err.is_timeout());
}

#[tokio::test]
async fn test_valid_login_reaches_dashboard() {
    let (_driver, pages) = portal();
    let login = pages.login_page().unwrap();
    login.navigate().await.unwrap();

    assert_ok!(login.login(VALID_USER, VALID_PASSWORD).await);
    assert_ok!(
        login
            .base()
            .actions()
            .wait_for_network_idle(Some(Duration::from_millis(200)))
            .await
    );

    let dashboard = pages.dashboard_page().unwrap();
    assert_ok!(dashboard.verify_dashboard_displayed().await);
    assert_eq!(dashboard.welcome_text().await.unwrap(), "Welcome, Merchant Admin");
}

#[tokio::test]
async fn test_invalid_login_shows_validation_or_stays() {
    let (_driver, pages) = portal();
    let login = pages.login_page().unwrap();
    login.navigate().await.unwrap();

    assert_ok!(login.login("merchant.admin@paylink.test", "nope").await);

    let message_shown = login.is_validation_message_visible().await.unwrap()
        && !login.get_validation_message().await.unwrap().is_empty();
    let still_on_login = login
        .base()
        .current_url()
        .await
        .unwrap()
        .contains(LOGIN_ROUTE);
    assert!(message_shown || still_on_login);
    assert_eq!(
        login.get_validation_message().await.unwrap(),
        INVALID_CREDENTIALS_MESSAGE
    );
}

#[tokio::test]
async fn test_login_with_test_data() {
    let (_driver, pages) = portal();
    let data = test_data();
    let login = pages.login_page().unwrap();

    login.navigate().await.unwrap();
    login.login_with_test_data(&data, 1).await.unwrap();
    assert!(login.is_validation_message_visible().await.unwrap());

    login.navigate().await.unwrap();
    login.login_as_default_user(&data).await.unwrap();
    assert_ok!(pages.dashboard_page().unwrap().verify_dashboard_displayed().await);
}

#[tokio::test]
async fn test_clear_form_after_typing() {
    let (_driver, pages) = portal();
    let login = pages.login_page().unwrap();
    login.navigate().await.unwrap();

    login
        .base()
        .type_text(&login.username_input, "typed.user")
        .await
        .unwrap();
    login
        .base()
        .fill(&login.password_input, "typed-password")
        .await
        .unwrap();
    assert_eq!(login.username_value().await.unwrap(), "typed.user");

    login.clear_form().await.unwrap();

    assert_eq!(login.username_value().await.unwrap(), "");
    assert_eq!(login.password_value().await.unwrap(), "");
}

#[tokio::test]
async fn test_logout_round_trip() {
    let (_driver, pages) = portal();
    let login = pages.login_page().unwrap();
    login.navigate().await.unwrap();
    login.login(VALID_USER, VALID_PASSWORD).await.unwrap();

    let dashboard = pages.dashboard_page().unwrap();
    dashboard.verify_dashboard_displayed().await.unwrap();
    dashboard.logout().await.unwrap();

    assert_ok!(login.verify_login_page_displayed().await);
    assert!(Arc::ptr_eq(&login, &pages.login_page().unwrap()));
}

#[tokio::test]
async fn test_screenshot_after_login() {
    let dir = std::env::temp_dir().join(format!("paylink-login-{}", uuid::Uuid::new_v4()));
    let driver = portal_driver();
    let mut config = fast_config();
    config.screenshot_dir = dir.clone();
    let session = paylink_e2e::session::PageSession::new(
        driver,
        Arc::new(config),
        paylink_e2e::environment::ResolvedEnvironment::default(),
    );
    let pages = paylink_e2e::manager::PageObjectManager::new(session);
    let login = pages.login_page().unwrap();
    login.navigate().await.unwrap();

    let path = login.base().take_screenshot("login-page").await.unwrap();

    assert!(path.starts_with(&dir));
    assert!(path.exists());
    std::fs::remove_dir_all(&dir).unwrap();
}
