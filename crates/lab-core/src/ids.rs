//! ID prefixes and generation.
//!
//! IDs look like `att-a3f8b2c1`: a short entity prefix followed by eight hex
//! characters. The database generates attempt IDs with `randomblob(4)`; entities
//! created in memory (notebook entries, local-only attempts) use [`generate_id`].

use crate::errors::CoreError;

pub const PREFIX_ATTEMPT: &str = "att";
pub const PREFIX_NOTE: &str = "nte";

/// Generate a prefixed random ID, e.g. `"nte-0f3a9c12"`.
///
/// # Errors
///
/// Returns `CoreError::Other` if the OS random source is unavailable.
pub fn generate_id(prefix: &str) -> Result<String, CoreError> {
    let mut bytes = [0u8; 4];
    getrandom::fill(&mut bytes)
        .map_err(|e| CoreError::Other(anyhow::anyhow!("random source unavailable: {e}")))?;
    let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
    Ok(format!("{prefix}-{hex}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_id_has_prefix_and_eight_hex_chars() {
        let id = generate_id(PREFIX_NOTE).unwrap();
        let (prefix, hex) = id.split_once('-').unwrap();
        assert_eq!(prefix, "nte");
        assert_eq!(hex.len(), 8);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn generated_ids_differ() {
        let a = generate_id(PREFIX_ATTEMPT).unwrap();
        let b = generate_id(PREFIX_ATTEMPT).unwrap();
        assert_ne!(a, b);
    }
}
