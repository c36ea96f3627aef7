//! Row identifier utilities

use uuid::Uuid;

/// Generate a new opaque row identifier (UUIDv4, hyphenated lowercase)
pub fn generate() -> String {
    Uuid::new_v4().to_string()
}

/// Check that an identifier supplied by a caller is a well-formed UUID
pub fn is_valid(id: &str) -> bool {
    Uuid::parse_str(id).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_is_unique_and_valid() {
        let a = generate();
        let b = generate();
        assert_ne!(a, b);
        assert!(is_valid(&a));
        assert_eq!(a.len(), 36);
    }
}
