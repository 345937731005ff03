// Engine error handling

use crate::memory::Address;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Address outside the fixed table
    OutOfRange(usize),
    /// Direct edit of a cell owned by the instruction at `owner`
    ReadOnly { address: Address, owner: Address },
    /// Address text that is not hexadecimal
    InvalidAddress(String),
    /// Value text that is not a one or two digit hex byte
    InvalidByte(String),
    /// Mnemonic text that matches neither the registry nor any operand pattern
    UnknownMnemonic(String),
    /// Configuration could not be read or parsed
    Config(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EngineError::OutOfRange(address) => {
                write!(f, "Address {:#06x} is outside the memory table", address)
            }
            EngineError::ReadOnly { address, owner } => {
                write!(
                    f,
                    "Cell {:04X} is an operand of the instruction at {:04X}",
                    address, owner
                )
            }
            EngineError::InvalidAddress(text) => write!(f, "Invalid address '{}'", text),
            EngineError::InvalidByte(text) => write!(f, "Invalid byte value '{}'", text),
            EngineError::UnknownMnemonic(text) => write!(f, "Unknown mnemonic '{}'", text),
            EngineError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for EngineError {}

impl From<std::io::Error> for EngineError {
    fn from(error: std::io::Error) -> Self {
        EngineError::Config(format!("I/O error: {}", error))
    }
}

impl From<toml::de::Error> for EngineError {
    fn from(error: toml::de::Error) -> Self {
        EngineError::Config(error.to_string())
    }
}
