use super::*;
use crate::driver::{MockElement, MockPageDriver};
use crate::Error;

fn fast_config() -> Config {
    Config {
        default_timeout_ms: 500,
        highlight_pause_ms: 0,
        type_delay_ms: 0,
        ..Config::default()
    }
}

fn actions_with(config: Config) -> (Arc<MockPageDriver>, Actions) {
    let driver = Arc::new(MockPageDriver::new());
    let actions = Actions::new(driver.clone(), Arc::new(config));
    (driver, actions)
}

#[tokio::test]
async fn test_click_highlights_then_clicks() {
    let (driver, actions) = actions_with(fast_config());
    driver.update(|dom| {
        dom.insert("#submit", MockElement::new());
    });

    actions.click(&Locator::css("#submit")).await.unwrap();

    assert_eq!(
        driver.actions(),
        vec!["highlight on #submit", "highlight off #submit", "click #submit"]
    );
    assert!(!driver.snapshot().get("#submit").unwrap().highlighted);
}

#[tokio::test]
async fn test_highlight_can_be_disabled() {
    let (driver, actions) = actions_with(Config {
        highlight: false,
        ..fast_config()
    });
    driver.update(|dom| {
        dom.insert("#submit", MockElement::new());
    });

    actions.click(&Locator::css("#submit")).await.unwrap();
    actions
        .click_with(&Locator::css("#submit"), ActionOptions::default().highlight(true))
        .await
        .unwrap();

    assert_eq!(driver.actions_matching("highlight").len(), 2);
    assert_eq!(driver.actions_matching("click").len(), 2);
}

#[tokio::test]
async fn test_click_on_invisible_element_times_out() {
    let (driver, actions) = actions_with(fast_config());
    driver.update(|dom| {
        dom.insert("#submit", MockElement::new().hidden());
    });

    let err = actions
        .click_with(
            &Locator::css("#submit"),
            ActionOptions::default().timeout(Duration::from_millis(200)),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Timeout(_)));
    assert!(driver.actions_matching("click").is_empty());
}

#[tokio::test]
async fn test_fill_replaces_value() {
    let (driver, actions) = actions_with(fast_config());
    driver.update(|dom| {
        dom.insert("#username", MockElement::input("old"));
    });
    let field = Locator::css("#username");

    actions.fill(&field, "alice").await.unwrap();
    assert_eq!(actions.input_value(&field).await.unwrap(), "alice");
}

#[tokio::test]
async fn test_type_text_sends_each_character_without_highlight() {
    let (driver, actions) = actions_with(fast_config());
    driver.update(|dom| {
        dom.insert("#search", MockElement::input("PL-"));
    });
    let field = Locator::css("#search");

    actions.type_text(&field, "42").await.unwrap();

    assert_eq!(actions.input_value(&field).await.unwrap(), "PL-42");
    assert_eq!(driver.actions(), vec!["type #search 4", "type #search 2"]);
}

#[tokio::test(start_paused = true)]
async fn test_type_text_waits_between_characters() {
    let (driver, actions) = actions_with(Config {
        type_delay_ms: 100,
        ..fast_config()
    });
    driver.update(|dom| {
        dom.insert("#search", MockElement::input(""));
    });

    let start = tokio::time::Instant::now();
    actions.type_text(&Locator::css("#search"), "abc").await.unwrap();
    assert!(start.elapsed() >= Duration::from_millis(200));
}

#[tokio::test]
async fn test_select_check_and_clear() {
    let (driver, actions) = actions_with(fast_config());
    driver.update(|dom| {
        dom.insert("select", MockElement::select(["10", "25"]));
        dom.insert("#remember", MockElement::new());
        dom.insert("#note", MockElement::input("draft"));
    });

    actions.select_option(&Locator::css("select"), "25").await.unwrap();
    actions.check(&Locator::css("#remember")).await.unwrap();
    actions.clear(&Locator::css("#note")).await.unwrap();

    assert_eq!(actions.input_value(&Locator::css("select")).await.unwrap(), "25");
    assert!(actions.is_checked(&Locator::css("#remember")).await.unwrap());
    assert_eq!(actions.input_value(&Locator::css("#note")).await.unwrap(), "");

    actions.uncheck(&Locator::css("#remember")).await.unwrap();
    assert!(!actions.is_checked(&Locator::css("#remember")).await.unwrap());
}

#[tokio::test]
async fn test_get_all_texts_waits_only_for_first() {
    let (driver, actions) = actions_with(fast_config());
    driver.update(|dom| {
        dom.insert("td.ref", MockElement::text("PL-1"));
    });
    driver.schedule(Duration::from_millis(300), |dom| {
        dom.insert("td.ref", MockElement::text("PL-2"));
    });

    let texts = actions.get_all_texts(&Locator::css("td.ref")).await.unwrap();
    assert_eq!(texts, vec!["PL-1"]);
}

#[tokio::test]
async fn test_get_text_waits_for_visibility() {
    let (driver, actions) = actions_with(fast_config());
    driver.schedule(Duration::from_millis(100), |dom| {
        dom.insert(".toast", MockElement::text("Saved"));
    });

    assert_eq!(actions.get_text(&Locator::css(".toast")).await.unwrap(), "Saved");
}

#[tokio::test]
async fn test_reads_do_not_wait() {
    let (_driver, actions) = actions_with(fast_config());
    let missing = Locator::css("#missing");

    assert!(!actions.is_visible(&missing).await.unwrap());
    assert_eq!(actions.get_count(&missing).await.unwrap(), 0);
}

#[tokio::test]
async fn test_network_idle_wait_times_out() {
    let (driver, actions) = actions_with(fast_config());
    driver.update(|dom| dom.network_idle = false);

    let err = actions
        .wait_for_network_idle(Some(Duration::from_millis(100)))
        .await
        .unwrap_err();
    assert!(err.is_timeout());
    actions.wait_for_dom_ready(None).await.unwrap();
}

#[tokio::test]
async fn test_take_screenshot_writes_png() {
    let dir = std::env::temp_dir().join(format!("paylink-actions-{}", uuid::Uuid::new_v4()));
    let (_driver, actions) = actions_with(Config {
        screenshot_dir: dir.clone(),
        ..fast_config()
    });

    let path = actions.take_screenshot("login").await.unwrap();

    let name = path.file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("login-"));
    assert!(name.ends_with(".png"));
    assert_eq!(&std::fs::read(&path).unwrap()[1..4], b"PNG");
    std::fs::remove_dir_all(&dir).unwrap();
}
