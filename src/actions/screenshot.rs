//! Screenshot artifact naming and writing

use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::Result;

/// Timestamp format used in artifact names, e.g. `20261016_142501_093`
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S_%3f";

/// `<dir>/<label>-<timestamp>.png`; path separators in `label` become `_`
pub fn screenshot_path(dir: &Path, label: &str, at: DateTime<Local>) -> PathBuf {
    let label: String = label
        .trim()
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | ':') || c.is_whitespace() { '_' } else { c })
        .collect();
    let label = if label.is_empty() { "screenshot".to_string() } else { label };
    dir.join(format!("{}-{}.png", label, at.format(TIMESTAMP_FORMAT)))
}

/// Write `png` under `dir`, creating it if needed
pub async fn write_screenshot(dir: &Path, label: &str, png: &[u8]) -> Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;
    let path = screenshot_path(dir, label, Local::now());
    tokio::fs::write(&path, png).await?;
    info!("Screenshot saved: {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_screenshot_path_format() {
        let at = Local.with_ymd_and_hms(2026, 3, 4, 5, 6, 7).unwrap();
        let path = screenshot_path(Path::new("out"), "login page", at);
        assert_eq!(path, PathBuf::from("out/login_page-20260304_050607_000.png"));
    }

    #[test]
    fn test_blank_label() {
        let at = Local.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let path = screenshot_path(Path::new("out"), "  ", at);
        assert!(path.to_string_lossy().starts_with("out/screenshot-"));
    }

    #[tokio::test]
    async fn test_write_creates_directory() {
        let dir = std::env::temp_dir().join(format!("paylink-shots-{}", uuid::Uuid::new_v4()));
        let path = write_screenshot(&dir, "smoke", b"\x89PNG").await.unwrap();

        assert!(path.starts_with(&dir));
        assert_eq!(std::fs::read(&path).unwrap(), b"\x89PNG");
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
