//! # paylink-smoke
//!
//! Smoke check against a running Chrome: opens the login page of the
//! resolved environment, verifies the form, optionally signs in with a
//! test-data user and saves screenshots along the way.
//!
//! ## Usage
//! ```text
//! paylink-smoke [--config <file.toml>] [--login] [--user <index>]
//! ```
//!
//! ## Environment variables
//! - `TEST_ENV`: `dev`, `qat`, `uat` or a literal URL (default: qat)
//! - `PAYLINK_CDP_ENDPOINT`: DevTools endpoint (default: ws://localhost:9222)
//! - `PAYLINK_CONFIG`: config file, same as `--config`
//! - `RUST_LOG` / `PAYLINK_LOG_LEVEL`: log filter

use anyhow::{bail, Context};
use clap::Parser;
use paylink_e2e::{
    config::Config,
    data::TestData,
    environment::ResolvedEnvironment,
    manager::PageObjectManager,
    session::BrowserSession,
};
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Login smoke check for the payment-link portal
#[derive(Parser, Debug)]
#[command(name = "paylink-smoke")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML config file; PAYLINK_* variables are used when absent
    #[arg(long, env = "PAYLINK_CONFIG")]
    config: Option<PathBuf>,

    /// Sign in with a test-data user after checking the form
    #[arg(long)]
    login: bool,

    /// Index of the test-data user to sign in as
    #[arg(long, default_value_t = 0)]
    user: usize,
}

async fn run(browser: &BrowserSession, args: &Args) -> anyhow::Result<()> {
    let page = browser.new_page().await?;
    let pages = PageObjectManager::new(page);

    let login = pages.login_page()?;
    login.navigate().await.context("opening login page")?;
    login
        .verify_login_page_displayed()
        .await
        .context("login form not displayed")?;
    login.base().take_screenshot("login-page").await?;
    info!("Login page verified");

    if args.login {
        let data = TestData::load(&browser.config().test_data_path)?;
        login.login_with_test_data(&data, args.user).await?;

        if login.is_validation_message_visible().await? {
            let message = login.get_validation_message().await?;
            login.base().take_screenshot("login-rejected").await?;
            bail!("login rejected: {}", message);
        }

        pages
            .dashboard_page()?
            .verify_dashboard_displayed()
            .await
            .context("dashboard not displayed after login")?;
        login.base().take_screenshot("dashboard").await?;
        info!("Signed in as test user {}", args.user);
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env()?,
    };

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("paylink-smoke v{}", paylink_e2e::VERSION);

    let environment = ResolvedEnvironment::resolve(config.environment.as_deref());
    info!("Environment: {} ({})", environment.label(), environment.base_url);

    let browser = BrowserSession::connect(config, environment).await?;

    let outcome = tokio::select! {
        result = run(&browser, &args) => result,
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted");
            Ok(())
        }
    };

    if let Err(e) = browser.close().await {
        error!("Failed to close browser session: {}", e);
    }

    match &outcome {
        Ok(()) => info!("Smoke check passed"),
        Err(e) => error!("Smoke check failed: {:#}", e),
    }
    outcome
}
