//! Key names recognized in raw `alter` arguments.

pub const METHOD: &str = "METHOD";
pub const NAME: &str = "NAME";
pub const FAMILY: &str = "FAMILY";
pub const CONFIGURATION: &str = "CONFIGURATION";
pub const METADATA: &str = "METADATA";
pub const COPROCESSOR: &str = "COPROCESSOR";
pub const CLASSNAME: &str = "CLASSNAME";
pub const JAR_PATH: &str = "JAR_PATH";
pub const PRIORITY: &str = "PRIORITY";
pub const PROPERTIES: &str = "PROPERTIES";

/// Legacy `{'delete' => family}` shorthand, after key normalization.
pub const LEGACY_DELETE: &str = "DELETE";

/// Prefix of the attribute key under which a coprocessor is stored.
pub const COPROCESSOR_KEY_PREFIX: &str = "coprocessor$";

/// Table-scope attribute keys accepted in a table-level mapping.
pub const TABLE_ATTRIBUTES: &[&str] = &[
    "MAX_FILESIZE",
    "READONLY",
    "MEMSTORE_FLUSHSIZE",
    "DURABILITY",
    "REGION_REPLICATION",
    "REGION_MEMSTORE_REPLICATION",
    "SPLIT_ENABLED",
    "MERGE_ENABLED",
    "COMPACTION_ENABLED",
    "NORMALIZATION_ENABLED",
    "NORMALIZER_TARGET_REGION_COUNT",
    "NORMALIZER_TARGET_REGION_SIZE",
    "NORMALIZER_TARGET_REGION_SIZE_MB",
    "PRIORITY",
    "FLUSH_POLICY",
    "SPLIT_POLICY",
    "OWNER",
];

/// Normalizes an attribute or directive key (case-insensitive, trimmed).
pub fn normalize_key(key: &str) -> String {
    key.trim().to_ascii_uppercase()
}

/// Returns true if the (normalized) key is a recognized table attribute.
pub fn is_table_attribute(key: &str) -> bool {
    TABLE_ATTRIBUTES.contains(&key)
}

/// Returns the attribute key for a coprocessor sequence number.
pub fn coprocessor_key(sequence: u32) -> String {
    format!("{}{}", COPROCESSOR_KEY_PREFIX, sequence)
}

/// Extracts the sequence number from a `coprocessor$N` key.
///
/// The prefix is matched case-insensitively.
///
/// # Examples
///
/// ```
/// use tablealter_core::directive::parse_coprocessor_key;
///
/// assert_eq!(parse_coprocessor_key("coprocessor$3"), Some(3));
/// assert_eq!(parse_coprocessor_key("COPROCESSOR$12"), Some(12));
/// assert_eq!(parse_coprocessor_key("MAX_FILESIZE"), None);
/// ```
pub fn parse_coprocessor_key(key: &str) -> Option<u32> {
    let prefix_len = COPROCESSOR_KEY_PREFIX.len();
    if key.len() <= prefix_len || !key.is_char_boundary(prefix_len) {
        return None;
    }
    let (prefix, sequence) = key.split_at(prefix_len);
    if !prefix.eq_ignore_ascii_case(COPROCESSOR_KEY_PREFIX)
        || !sequence.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }
    sequence.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key("versions"), "VERSIONS");
        assert_eq!(normalize_key("  Max_FileSize "), "MAX_FILESIZE");
    }

    #[test]
    fn test_is_table_attribute() {
        assert!(is_table_attribute("MAX_FILESIZE"));
        assert!(is_table_attribute("REGION_REPLICATION"));
        assert!(!is_table_attribute("VERSIONS"));
        assert!(!is_table_attribute("max_filesize"));
    }

    #[test]
    fn test_coprocessor_key_round_trip() {
        assert_eq!(coprocessor_key(1), "coprocessor$1");
        assert_eq!(parse_coprocessor_key(&coprocessor_key(42)), Some(42));
    }

    #[test]
    fn test_parse_coprocessor_key_rejects_garbage() {
        assert_eq!(parse_coprocessor_key("coprocessor$"), None);
        assert_eq!(parse_coprocessor_key("coprocessor$x"), None);
        assert_eq!(parse_coprocessor_key("coproc"), None);
        assert_eq!(parse_coprocessor_key("observer$1"), None);
    }

    #[test]
    fn test_parse_coprocessor_key_requires_plain_digits() {
        assert_eq!(parse_coprocessor_key("coprocessor$+1"), None);
        assert_eq!(parse_coprocessor_key("coprocessor$ 1"), None);
        assert_eq!(parse_coprocessor_key("coprocessor$-1"), None);
        assert_eq!(parse_coprocessor_key("coprocessor$007"), Some(7));
    }
}
