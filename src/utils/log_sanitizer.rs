//! Log sanitization utilities for masking sensitive data.
//!
//! Emails and nicknames are personal data; log lines carry only enough of
//! them to correlate events.

/// Keep at most the first three characters of `value`, char-boundary safe.
fn visible_prefix(value: &str) -> &str {
    match value.char_indices().nth(3) {
        Some((idx, _)) => &value[..idx],
        None => value,
    }
}

/// Mask an email address for safe logging.
///
/// # Examples
/// ```ignore
/// assert_eq!(mask_email("user@example.com"), "use***@example.com");
/// ```
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => format!("{}***@{}", visible_prefix(local), domain),
        None => format!("{}***", visible_prefix(email)),
    }
}

/// Mask a nickname for safe logging.
pub fn mask_nickname(nickname: &str) -> String {
    format!("{}***", visible_prefix(nickname))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_email_normal() {
        assert_eq!(mask_email("user@example.com"), "use***@example.com");
        assert_eq!(mask_email("johndoe@test.org"), "joh***@test.org");
    }

    #[test]
    fn test_mask_email_short_local_part() {
        assert_eq!(mask_email("ab@test.org"), "ab***@test.org");
        assert_eq!(mask_email("a@test.org"), "a***@test.org");
    }

    #[test]
    fn test_mask_email_invalid() {
        assert_eq!(mask_email("notanemail"), "not***");
    }

    #[test]
    fn test_mask_handles_multibyte() {
        assert_eq!(mask_nickname("żółw_99"), "żół***");
        assert_eq!(mask_email("éa@x.fr"), "éa***@x.fr");
    }

    #[test]
    fn test_mask_nickname() {
        assert_eq!(mask_nickname("brave_lion"), "bra***");
        assert_eq!(mask_nickname("ab"), "ab***");
    }
}
