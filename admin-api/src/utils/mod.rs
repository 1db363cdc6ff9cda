// Utility functions for admin API

/// Keep only digits and `+`: `"010-1234-5678"` becomes `"01012345678"`.
///
/// Input without any digit normalizes to an empty string.
pub fn normalize_phone(raw: &str) -> String {
    if !raw.chars().any(|c| c.is_ascii_digit()) {
        return String::new();
    }

    raw.chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect()
}

/// Map a user id to its auth email under `domain`.
///
/// An existing `@domain` suffix is stripped before appending, so the result
/// is the same for `"alice"` and `"alice@domain"`.
pub fn canonical_email(user_id: &str, domain: &str) -> String {
    let user_id = user_id.trim();
    let suffix = format!("@{}", domain);

    let split = user_id
        .len()
        .checked_sub(suffix.len())
        .filter(|&at| user_id.is_char_boundary(at));

    let local = match split {
        Some(at) if user_id[at..].eq_ignore_ascii_case(&suffix) => &user_id[..at],
        _ => user_id,
    };

    format!("{}{}", local, suffix)
}

/// Mask sensitive data like phone numbers
pub fn mask_phone(phone: &str) -> String {
    let chars: Vec<char> = phone.chars().collect();
    if chars.len() < 7 {
        return phone.to_string();
    }

    let visible_start = 3;
    let visible_end = 4;
    let masked_len = chars.len() - visible_start - visible_end;

    format!(
        "{}{}{}",
        chars[..visible_start].iter().collect::<String>(),
        "*".repeat(masked_len),
        chars[chars.len() - visible_end..].iter().collect::<String>()
    )
}

/// Mask email address
pub fn mask_email(email: &str) -> String {
    if let Some(at_pos) = email.find('@') {
        let local = &email[..at_pos];
        let domain = &email[at_pos..];

        if local.chars().count() <= 2 {
            return email.to_string();
        }

        format!("{}***{}", local.chars().take(2).collect::<String>(), domain)
    } else {
        email.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_phone() {
        assert_eq!(normalize_phone("010-1234-5678"), "01012345678");
        assert_eq!(normalize_phone("+82 10 1234 5678"), "+821012345678");
        assert_eq!(normalize_phone("(010) 1234.5678 ext"), "01012345678");
        assert_eq!(normalize_phone("---"), "");
        assert_eq!(normalize_phone("+"), "");
        assert_eq!(normalize_phone("+-"), "");
        assert_eq!(normalize_phone(""), "");
    }

    #[test]
    fn test_canonical_email() {
        assert_eq!(canonical_email("alice", "myapp.com"), "alice@myapp.com");
        assert_eq!(canonical_email("alice@myapp.com", "myapp.com"), "alice@myapp.com");
        assert_eq!(
            canonical_email("alice", "myapp.com"),
            canonical_email("alice@myapp.com", "myapp.com")
        );
        assert_eq!(canonical_email("  bob  ", "myapp.com"), "bob@myapp.com");
    }

    #[test]
    fn test_canonical_email_is_idempotent() {
        let once = canonical_email("carol", "myapp.com");
        let twice = canonical_email(&once, "myapp.com");
        assert_eq!(once, twice);
    }

    #[test]
    fn test_canonical_email_keeps_other_domains_local() {
        assert_eq!(
            canonical_email("dave@other.org", "myapp.com"),
            "dave@other.org@myapp.com"
        );
    }

    #[test]
    fn test_mask_phone() {
        assert_eq!(mask_phone("01012345678"), "010****5678");
        assert_eq!(mask_phone("12345"), "12345");
    }

    #[test]
    fn test_mask_email() {
        assert_eq!(mask_email("admin@moim.org"), "ad***@moim.org");
        assert_eq!(mask_email("ab@moim.org"), "ab@moim.org");
        assert_eq!(mask_email(""), "");
    }
}
