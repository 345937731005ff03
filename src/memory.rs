//! Memory store for the editable table
//!
//! A fixed array of byte cells. Each cell carries the resolved byte, the
//! mnemonic text shown next to it and, for operand bytes, the address of the
//! instruction that owns it. The table is never resized.

use crate::disassembler;
use crate::error::EngineError;
use log::trace;
use std::fmt::{Display, Error, Formatter};

/// Row address inside the table
pub type Address = u16;

/// Number of rows, `0000`..`00FF`
pub const TABLE_SIZE: usize = 256;

/// One addressable byte slot plus its display and ownership metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryCell {
    pub address: Address,
    /// Resolved byte, `None` when unset or invalid
    pub value: Option<u8>,
    /// Instruction text; only set on rows where an instruction begins
    pub mnemonic: String,
    /// Start address of the instruction whose operand this cell holds
    pub owner: Option<Address>,
}

impl MemoryCell {
    fn new(address: Address) -> Self {
        MemoryCell {
            address,
            value: None,
            mnemonic: String::new(),
            owner: None,
        }
    }

    /// Owned cells cannot be edited independently
    pub fn is_read_only(&self) -> bool {
        self.owner.is_some()
    }

    /// Back to an editable, empty row
    pub(crate) fn reset(&mut self) {
        self.value = None;
        self.mnemonic.clear();
        self.owner = None;
    }
}

impl Display for MemoryCell {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "{:04X}  ", self.address)?;
        match self.value {
            Some(byte) => write!(f, "{:02X}", byte)?,
            None => write!(f, "--")?,
        }
        if let Some(owner) = self.owner {
            write!(f, "  ^{:04X}", owner)
        } else if !self.mnemonic.is_empty() {
            write!(f, "  {}", self.mnemonic)
        } else {
            Ok(())
        }
    }
}

/// Result of a store write: the byte written and what it decodes to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellChange {
    pub address: Address,
    pub value: u8,
    /// Zero-operand mnemonic for `value`, empty if none
    pub decoded: String,
}

#[derive(Debug, Clone)]
pub struct Memory {
    cells: Vec<MemoryCell>,
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl Memory {
    pub fn new() -> Self {
        Memory {
            cells: (0..TABLE_SIZE).map(|a| MemoryCell::new(a as Address)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, address: Address) -> bool {
        (address as usize) < self.cells.len()
    }

    /// `address + delta` if it is still inside the table. Never wraps.
    pub fn offset(&self, address: Address, delta: usize) -> Option<Address> {
        let target = (address as usize).checked_add(delta)?;
        if target < self.cells.len() {
            Some(target as Address)
        } else {
            None
        }
    }

    fn index(&self, address: Address) -> Result<usize, EngineError> {
        if self.contains(address) {
            Ok(address as usize)
        } else {
            Err(EngineError::OutOfRange(address as usize))
        }
    }

    pub fn get_cell(&self, address: Address) -> Result<&MemoryCell, EngineError> {
        let i = self.index(address)?;
        Ok(&self.cells[i])
    }

    pub(crate) fn cell_mut(&mut self, address: Address) -> Result<&mut MemoryCell, EngineError> {
        let i = self.index(address)?;
        Ok(&mut self.cells[i])
    }

    /// Write a byte and run the reverse decoder over it. The decoded text is
    /// returned, not stored: callers decide what the row's mnemonic becomes.
    pub fn set_value(&mut self, address: Address, value: u8) -> Result<CellChange, EngineError> {
        let cell = self.cell_mut(address)?;
        cell.value = Some(value);
        let decoded = disassembler::decode_byte(value);
        trace!("set {:04X} = {:02X} ({})", address, value, decoded);
        Ok(CellChange {
            address,
            value,
            decoded,
        })
    }

    pub fn clear_value(&mut self, address: Address) -> Result<(), EngineError> {
        trace!("clear {:04X}", address);
        self.cell_mut(address)?.value = None;
        Ok(())
    }

    /// Store display text as-is
    pub fn set_mnemonic(&mut self, address: Address, text: impl Into<String>) -> Result<(), EngineError> {
        self.cell_mut(address)?.mnemonic = text.into();
        Ok(())
    }

    pub fn cells(&self) -> impl Iterator<Item = &MemoryCell> {
        self.cells.iter()
    }

    pub(crate) fn cells_mut(&mut self) -> impl Iterator<Item = &mut MemoryCell> {
        self.cells.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn test_new_table_is_empty() {
        let memory = Memory::new();
        assert_eq!(memory.len(), TABLE_SIZE);
        for (i, cell) in memory.cells().enumerate() {
            assert_eq!(cell.address as usize, i);
            assert_eq!(cell.value, None);
            assert!(cell.mnemonic.is_empty());
            assert!(!cell.is_read_only());
        }
    }

    #[test]
    fn test_set_value_decodes() {
        let mut memory = Memory::new();
        let change = memory.set_value(20, 0x00).unwrap();
        assert_eq!(change.decoded, "NOP");
        assert_eq!(memory.get_cell(20).unwrap().value, Some(0x00));
        // the store does not touch the mnemonic on its own
        assert!(memory.get_cell(20).unwrap().mnemonic.is_empty());

        let change = memory.set_value(21, 0x3E).unwrap();
        assert_eq!(change.decoded, "");
    }

    #[test]
    fn test_out_of_range() {
        let mut memory = Memory::new();
        assert_eq!(memory.set_value(256, 1), Err(EngineError::OutOfRange(256)));
        assert_eq!(memory.get_cell(300).unwrap_err(), EngineError::OutOfRange(300));
        assert!(memory.set_mnemonic(256, "NOP").is_err());
        assert!(memory.clear_value(256).is_err());
    }

    #[test]
    fn test_offset_never_wraps() {
        let memory = Memory::new();
        assert_eq!(memory.offset(10, 2), Some(12));
        assert_eq!(memory.offset(254, 1), Some(255));
        assert_eq!(memory.offset(254, 2), None);
        assert_eq!(memory.offset(255, 1), None);
    }

    #[test]
    fn test_cell_display() {
        let mut memory = Memory::new();
        memory.set_value(5, 0x01).unwrap();
        memory.set_mnemonic(5, "LXI B,1A2B").unwrap();
        assert_eq!(memory.get_cell(5).unwrap().to_string(), "0005  01  LXI B,1A2B");
        assert_eq!(memory.get_cell(6).unwrap().to_string(), "0006  --");
    }
}
