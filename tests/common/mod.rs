//! Common test utilities
//!
//! A mock payment-link portal: a login form that accepts the users in
//! [`test_data`] and a dashboard behind it.

#![allow(dead_code)]

use paylink_e2e::{
    config::Config,
    data::{Credentials, TestData},
    driver::{MockDom, MockElement, MockPageDriver},
    environment::ResolvedEnvironment,
    manager::PageObjectManager,
    session::PageSession,
};
use std::sync::Arc;

pub const VALID_USER: &str = "merchant.admin@paylink.test";
pub const VALID_PASSWORD: &str = "Corr3ct-Horse";
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid username or password";

const LOGIN_BUTTON: &str = "#login-button, button[type='submit']";
const USER_MENU: &str = ".user-menu, [data-testid='user-menu']";
const LOGOUT_BUTTON: &str = ".logout-button, [data-testid='logout']";

/// Config with short waits and no pauses
pub fn fast_config() -> Config {
    Config {
        default_timeout_ms: 500,
        highlight_pause_ms: 0,
        type_delay_ms: 0,
        settle_delay_ms: 0,
        ..Config::default()
    }
}

pub fn test_data() -> TestData {
    TestData::new(vec![
        Credentials::new(VALID_USER, VALID_PASSWORD),
        Credentials::new("merchant.viewer@paylink.test", "wrong-password"),
    ])
}

pub fn render_login(dom: &mut MockDom) {
    dom.clear();
    dom.title = "Paylink - Sign in".to_string();
    dom.insert("#username", MockElement::input(""));
    dom.insert("#password", MockElement::input(""));
    dom.insert("#login-button", MockElement::text("Sign in"));
}

pub fn render_dashboard(dom: &mut MockDom) {
    dom.clear();
    dom.title = "Paylink - Dashboard".to_string();
    dom.insert(".dashboard-header", MockElement::text("Dashboard"));
    dom.insert(".welcome-message", MockElement::text("Welcome, Merchant Admin"));
    dom.insert(".user-menu", MockElement::new());
}

fn submit_login(dom: &mut MockDom) {
    let field = |dom: &MockDom, selector: &str| {
        dom.get(selector).map(|e| e.value.clone()).unwrap_or_default()
    };
    let username = field(dom, "#username");
    let password = field(dom, "#password");

    if username == VALID_USER && password == VALID_PASSWORD {
        let origin = dom.url.split('#').next().unwrap_or_default().to_string();
        dom.url = format!("{}#/dashboard", origin);
        render_dashboard(dom);
    } else {
        dom.replace(".error-message", vec![MockElement::text(INVALID_CREDENTIALS_MESSAGE)]);
    }
}

/// Mock portal with login and dashboard wired up
pub fn portal_driver() -> Arc<MockPageDriver> {
    let driver = Arc::new(MockPageDriver::new());
    driver.on_navigate("#/login", render_login);
    driver.on_navigate("#/dashboard", render_dashboard);
    driver.on_click(LOGIN_BUTTON, submit_login);
    driver.on_click(USER_MENU, |dom| {
        dom.insert(".logout-button", MockElement::text("Log out"));
    });
    driver.on_click(LOGOUT_BUTTON, |dom| {
        let origin = dom.url.split('#').next().unwrap_or_default().to_string();
        dom.url = format!("{}#/login", origin);
        render_login(dom);
    });
    driver
}

pub fn session(driver: Arc<MockPageDriver>, environment: Option<&str>) -> PageSession {
    PageSession::new(
        driver,
        Arc::new(fast_config()),
        ResolvedEnvironment::resolve(environment),
    )
}

/// Portal driver plus a manager over it
pub fn portal() -> (Arc<MockPageDriver>, PageObjectManager) {
    let driver = portal_driver();
    let pages = PageObjectManager::new(session(driver.clone(), None));
    (driver, pages)
}
