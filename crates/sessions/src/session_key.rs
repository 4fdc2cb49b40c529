//! Session id resolution for inbound requests.
//!
//! Clients may supply their own id; anything that is not a short, printable
//! token is replaced with a fresh UUIDv4 so it can never collide with or
//! smuggle data into another session.

const MAX_LEN: usize = 128;

/// Return the client-supplied id if it is acceptable, otherwise mint one.
/// The boolean is `true` when a new id was generated.
pub fn resolve_session_id(requested: Option<&str>) -> (String, bool) {
    match requested.map(str::trim) {
        Some(id) if is_valid_session_id(id) => (id.to_owned(), false),
        _ => (uuid::Uuid::new_v4().to_string(), true),
    }
}

/// 1..=128 characters from `[A-Za-z0-9_.:-]`.
pub fn is_valid_session_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_LEN
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | ':' | '-'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_valid_ids() {
        let (id, minted) = resolve_session_id(Some("web:guest-42.a_b"));
        assert_eq!(id, "web:guest-42.a_b");
        assert!(!minted);
    }

    #[test]
    fn mints_for_missing_or_invalid() {
        for input in [None, Some(""), Some("has space"), Some("ñandú"), Some("a/b")] {
            let (id, minted) = resolve_session_id(input);
            assert!(minted, "{input:?} should be replaced");
            assert!(uuid::Uuid::parse_str(&id).is_ok());
        }
    }

    #[test]
    fn rejects_overlong_ids() {
        let long = "x".repeat(129);
        assert!(!is_valid_session_id(&long));
        assert!(is_valid_session_id(&"x".repeat(128)));
    }
}
