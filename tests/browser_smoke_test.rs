//! Real-browser checks of the CDP driver
//!
//! Needs Chrome listening on `PAYLINK_CDP_ENDPOINT` (default ws://localhost:9222):
//!
//! ```text
//! google-chrome --headless=new --remote-debugging-port=9222 --user-data-dir=/tmp/paylink-e2e
//! cargo test --test browser_smoke_test -- --ignored
//! ```

use paylink_e2e::{
    config::Config,
    environment::ResolvedEnvironment,
    manager::PageObjectManager,
    session::BrowserSession,
};

const LOGIN_HTML: &str = r#"<!doctype html>
<html><head><title>Paylink - Sign in</title></head>
<body>
  <form onsubmit="event.preventDefault();
    const ok = document.getElementById('username').value === 'merchant.admin'
      && document.getElementById('password').value === 'secret';
    document.getElementById('err').style.display = ok ? 'none' : 'block';">
    <input id="username" name="username">
    <input id="password" name="password" type="password">
    <button id="login-button" type="submit">Sign in</button>
    <div id="err" class="error-message" style="display:none">Invalid username or password</div>
  </form>
</body></html>"#;

fn login_page_url() -> String {
    format!("data:text/html,{}", urlencoding::encode(LOGIN_HTML))
}

async fn connect() -> BrowserSession {
    let config = Config {
        highlight_pause_ms: 50,
        type_delay_ms: 10,
        ..Config::from_env().unwrap()
    };
    BrowserSession::connect(config, ResolvedEnvironment::default())
        .await
        .unwrap()
}

#[tokio::test]
#[ignore]
async fn test_login_form_in_real_chrome() {
    let browser = connect().await;
    let pages = PageObjectManager::new(browser.new_page().await.unwrap());
    let login = pages.login_page().unwrap();

    login.base().goto(&login_page_url()).await.unwrap();
    login.verify_login_page_displayed().await.unwrap();
    assert_eq!(login.base().title().await.unwrap(), "Paylink - Sign in");

    login
        .base()
        .type_text(&login.username_input, "merchant.admin")
        .await
        .unwrap();
    assert_eq!(login.username_value().await.unwrap(), "merchant.admin");

    login.login("merchant.admin", "wrong").await.unwrap();
    assert!(login.is_validation_message_visible().await.unwrap());
    assert_eq!(
        login.get_validation_message().await.unwrap(),
        "Invalid username or password"
    );

    login.clear_form().await.unwrap();
    assert_eq!(login.username_value().await.unwrap(), "");
    assert_eq!(login.password_value().await.unwrap(), "");

    browser.close().await.unwrap();
}

#[tokio::test]
#[ignore]
async fn test_reload_waits_for_new_document() {
    let browser = connect().await;
    let pages = PageObjectManager::new(browser.new_page().await.unwrap());
    let login = pages.login_page().unwrap();

    login.base().goto(&login_page_url()).await.unwrap();
    login
        .base()
        .fill(&login.username_input, "left over")
        .await
        .unwrap();

    login.base().refresh().await.unwrap();

    login.verify_login_page_displayed().await.unwrap();
    assert_eq!(login.username_value().await.unwrap(), "");

    browser.close().await.unwrap();
}
