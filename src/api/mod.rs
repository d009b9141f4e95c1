// API layer - HTTP endpoints
pub mod admin;
pub mod health;
pub mod items;

pub use admin::AdminApi;
pub use health::HealthApi;
pub use items::ItemsApi;

/// Minimal well-formedness check for submitted email addresses: one `@`,
/// non-empty local part, dotted domain, no whitespace.
pub(crate) fn is_well_formed_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let mut parts = email.splitn(2, '@');
    let (Some(local), Some(domain)) = (parts.next(), parts.next()) else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains('@')
}

#[cfg(test)]
mod tests {
    use super::is_well_formed_email;

    #[test]
    fn accepts_plain_addresses() {
        assert!(is_well_formed_email("ana@x.com"));
        assert!(is_well_formed_email("first.last@sub.example.org"));
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(!is_well_formed_email(""));
        assert!(!is_well_formed_email("ana"));
        assert!(!is_well_formed_email("@x.com"));
        assert!(!is_well_formed_email("ana@"));
        assert!(!is_well_formed_email("ana@localhost"));
        assert!(!is_well_formed_email("ana@.com"));
        assert!(!is_well_formed_email("a na@x.com"));
    }
}
