//! Session material naming and upload limits.

use crate::error::CoreError;
use crate::types::DbId;

/// Default upload limit (25 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Maximum sanitized file name length in characters.
pub const MAX_FILE_NAME_LEN: usize = 200;

/// Replace path separators and control characters, trim, and truncate.
///
/// Falls back to `"file"` when nothing printable remains.
pub fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let trimmed = cleaned.trim().trim_start_matches('.');
    let truncated: String = trimmed.chars().take(MAX_FILE_NAME_LEN).collect();
    if truncated.is_empty() {
        "file".to_string()
    } else {
        truncated
    }
}

/// Object key for a session material: `sessions/{session_id}/{unique}-{name}`.
pub fn storage_key(session_id: DbId, unique: &str, file_name: &str) -> String {
    format!(
        "sessions/{session_id}/{unique}-{}",
        sanitize_file_name(file_name)
    )
}

/// Reject empty uploads and uploads over `max_bytes`.
pub fn validate_upload_size(size: usize, max_bytes: usize) -> Result<(), CoreError> {
    if size == 0 {
        return Err(CoreError::Validation("Uploaded file is empty".into()));
    }
    if size > max_bytes {
        return Err(CoreError::Validation(format!(
            "Uploaded file is {size} bytes, limit is {max_bytes}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separators_are_replaced() {
        assert_eq!(sanitize_file_name("../etc/passwd"), "_etc_passwd");
        assert_eq!(sanitize_file_name("a\\b:c.pdf"), "a_b_c.pdf");
    }

    #[test]
    fn blank_names_fall_back() {
        assert_eq!(sanitize_file_name("   "), "file");
        assert_eq!(sanitize_file_name("..."), "file");
    }

    #[test]
    fn long_names_are_truncated() {
        assert_eq!(sanitize_file_name(&"a".repeat(500)).chars().count(), MAX_FILE_NAME_LEN);
    }

    #[test]
    fn key_is_scoped_by_session() {
        assert_eq!(
            storage_key(42, "abc", "Sound cards.pdf"),
            "sessions/42/abc-Sound cards.pdf"
        );
    }

    #[test]
    fn upload_size_limits() {
        assert!(validate_upload_size(0, 10).is_err());
        assert!(validate_upload_size(11, 10).is_err());
        assert!(validate_upload_size(10, 10).is_ok());
    }
}
