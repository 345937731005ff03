use crate::error::EngineError;
use crate::memory::{Address, TABLE_SIZE};

/// Four hex digit display form used for row addresses, `0000`..`00FF`
pub fn format_address(address: Address) -> String {
    format!("{:04X}", address)
}

/// Parse a hex address with or without a `0x` prefix and check it against the table
pub fn parse_address(text: &str) -> Result<Address, EngineError> {
    let trimmed = text.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    let value = usize::from_str_radix(digits, 16)
        .map_err(|_| EngineError::InvalidAddress(text.to_string()))?;
    if value >= TABLE_SIZE {
        return Err(EngineError::OutOfRange(value));
    }
    Ok(value as Address)
}

/// Parse a cell value as typed: one or two hex digits, case-insensitive.
/// Blank text means "no value".
pub fn parse_hex_byte(text: &str) -> Result<Option<u8>, EngineError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed.len() > 2 || !trimmed.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(EngineError::InvalidByte(text.to_string()));
    }
    u8::from_str_radix(trimmed, 16)
        .map(Some)
        .map_err(|_| EngineError::InvalidByte(text.to_string()))
}
