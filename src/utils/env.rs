/// Get environment variable with VERDANT_ prefix, falling back to the
/// unprefixed version
///
/// This helper checks for `VERDANT_{key}` first, then falls back to
/// `{key}` for compatibility with standard environment variable naming.
///
/// # Examples
///
/// ```rust
/// use verdant::utils::get_env_with_prefix;
///
/// // Checks VERDANT_MAX_FREE_PLANTS first, then MAX_FREE_PLANTS
/// let ceiling = get_env_with_prefix("MAX_FREE_PLANTS");
/// ```
pub fn get_env_with_prefix(key: &str) -> Option<String> {
    std::env::var(format!("VERDANT_{}", key))
        .or_else(|_| std::env::var(key))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_env_with_prefix() {
        // Test with VERDANT_ prefix
        std::env::set_var("VERDANT_UTILS_TEST_VAR", "prefixed_value");
        assert_eq!(
            get_env_with_prefix("UTILS_TEST_VAR"),
            Some("prefixed_value".to_string())
        );
        std::env::remove_var("VERDANT_UTILS_TEST_VAR");

        // Test with unprefixed fallback
        std::env::set_var("UTILS_FALLBACK_VAR", "unprefixed_value");
        assert_eq!(
            get_env_with_prefix("UTILS_FALLBACK_VAR"),
            Some("unprefixed_value".to_string())
        );
        std::env::remove_var("UTILS_FALLBACK_VAR");

        // Test non-existent variable
        assert_eq!(get_env_with_prefix("UTILS_NON_EXISTENT_VAR"), None);
    }
}
