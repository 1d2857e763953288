//! # System Constants
//!
//! Operational defaults for the harvester. Configuration overrides all of
//! these except the identifier rules.

/// Checkpoint record defaults
pub mod checkpoint {
    /// Key of the single checkpoint row
    pub const DEFAULT_RECORD_KEY: &str = "checkpoint";
    /// Table holding the checkpoint row
    pub const DEFAULT_TABLE_NAME: &str = "search_checkpoints";
}

/// Search paging defaults
pub mod search {
    /// Items requested per page
    pub const DEFAULT_PAGE_LIMIT: usize = 100;
}

/// Downstream dispatch defaults
pub mod dispatch {
    /// Items per dispatched batch
    pub const DEFAULT_BATCH_SIZE: usize = 20;
    /// PGMQ queue receiving batches
    pub const DEFAULT_PROCESSOR_QUEUE: &str = "harvested_batches";
}

/// Database defaults
pub mod database {
    pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
}

/// Identifier rules shared by table and queue names
pub mod identifiers {
    /// PostgreSQL truncates identifiers past this length
    pub const MAX_IDENTIFIER_LENGTH: usize = 63;

    /// Whether `name` is safe to interpolate as an unquoted SQL identifier.
    pub fn is_valid_identifier(name: &str) -> bool {
        let mut chars = name.chars();
        match chars.next() {
            Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
            _ => return false,
        }
        name.len() <= MAX_IDENTIFIER_LENGTH
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
    }
}

#[cfg(test)]
mod tests {
    use super::identifiers::is_valid_identifier;

    #[test]
    fn test_identifier_validation() {
        assert!(is_valid_identifier("search_checkpoints"));
        assert!(is_valid_identifier("_private2"));
        assert!(!is_valid_identifier(""));
        assert!(!is_valid_identifier("2fast"));
        assert!(!is_valid_identifier("checkpoints; DROP TABLE users"));
        assert!(!is_valid_identifier(&"a".repeat(64)));
    }
}
