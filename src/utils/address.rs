//! Address handling helpers.
//!
//! Signer identity is compared case-insensitively everywhere; the lowercased
//! 0x-prefixed form is the canonical map key.

/// Normalize an address to its canonical lowercased, 0x-prefixed form
pub fn normalize_address(address: &str) -> String {
    let trimmed = address.trim();
    if let Some(rest) = trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")) {
        format!("0x{}", rest.to_ascii_lowercase())
    } else {
        format!("0x{}", trimmed.to_ascii_lowercase())
    }
}

/// Check that a string is a plausible 20-byte hex address
pub fn is_valid_address(address: &str) -> bool {
    let hex = address.strip_prefix("0x").unwrap_or(address);
    hex.len() == 40 && hex.chars().all(|c| c.is_ascii_hexdigit())
}

/// Shorten an address or hash for log output, e.g. `0x12345678…`
pub fn short(address: &str) -> String {
    if address.len() > 10 {
        format!("{}…", &address[..10])
    } else {
        address.to_string()
    }
}
