//! Admin/parent message rules.

use crate::error::CoreError;

pub const SENDER_ADMIN: &str = "admin";
pub const SENDER_PARENT: &str = "parent";

const VALID_SENDERS: &[&str] = &[SENDER_ADMIN, SENDER_PARENT];

/// Maximum message body length in characters.
pub const MAX_BODY_LEN: usize = 5000;

/// Validate that `sender` is `"admin"` or `"parent"`.
pub fn validate_sender(sender: &str) -> Result<(), CoreError> {
    if VALID_SENDERS.contains(&sender) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid sender '{sender}'. Must be one of: {VALID_SENDERS:?}"
        )))
    }
}

/// Trim a message body and check it is non-empty and within the limit.
pub fn normalize_body(body: &str) -> Result<String, CoreError> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Message body must not be empty".into()));
    }
    if trimmed.chars().count() > MAX_BODY_LEN {
        return Err(CoreError::Validation(format!(
            "Message body must be at most {MAX_BODY_LEN} characters"
        )));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn senders() {
        assert!(validate_sender("admin").is_ok());
        assert!(validate_sender("parent").is_ok());
        assert!(validate_sender("student").is_err());
    }

    #[test]
    fn bodies_are_trimmed() {
        assert_eq!(normalize_body("  See you Tuesday \n").unwrap(), "See you Tuesday");
        assert!(normalize_body(" \t ").is_err());
        assert!(normalize_body(&"x".repeat(MAX_BODY_LEN + 1)).is_err());
    }
}
