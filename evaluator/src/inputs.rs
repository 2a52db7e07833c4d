//! Resolution of test-case input/expected values.
//!
//! A value lives inline on the row (`*_text`) or in a file under the
//! storage root (`*_path`). Inline text wins when both are present.

use std::path::PathBuf;
use util::config;

/// Resolves a text-or-path pair to its contents.
///
/// Returns `None` when neither source is present, or when the referenced
/// file cannot be read; evaluation treats both as "not runnable" rather
/// than substituting empty input.
pub fn resolve(text: Option<&str>, path: Option<&str>) -> Option<String> {
    if let Some(text) = text {
        return Some(text.to_string());
    }

    let rel = path?;
    let full: PathBuf = PathBuf::from(config::storage_root()).join(rel);
    match std::fs::read_to_string(&full) {
        Ok(contents) => Some(contents),
        Err(err) => {
            tracing::warn!(path = %full.display(), %err, "test case file unreadable");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn inline_text_wins_over_path() {
        assert_eq!(
            resolve(Some("inline"), Some("does/not/exist.txt")),
            Some("inline".to_string())
        );
    }

    #[test]
    fn absent_both_is_none() {
        assert_eq!(resolve(None, None), None);
    }

    #[test]
    #[serial]
    fn unreadable_path_is_none() {
        unsafe {
            std::env::set_var("DATABASE_PATH", "data/test.db");
            std::env::set_var("JWT_SECRET", "test-secret");
        }
        util::config::AppConfig::set_storage_root("/nonexistent-root");
        assert_eq!(resolve(None, Some("missing.txt")), None);
    }

    #[test]
    #[serial]
    fn file_backed_value_is_read_from_storage_root() {
        unsafe {
            std::env::set_var("DATABASE_PATH", "data/test.db");
            std::env::set_var("JWT_SECRET", "test-secret");
        }
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("input.txt"), "7\n").unwrap();
        util::config::AppConfig::set_storage_root(dir.path().to_string_lossy().to_string());

        assert_eq!(resolve(None, Some("input.txt")), Some("7\n".to_string()));
    }
}
