//! UI-facing entry points
//!
//! A front end calls `on_value_edited` when a value cell changes and
//! `on_mnemonic_edited` when a mnemonic cell changes, then redraws the rows
//! it gets back. `is_read_only` / `owner_of` drive locking, and the
//! `next_editable_*` helpers let focus skip operand rows.

use crate::config::EditorConfig;
use crate::disassembler::Listing;
use crate::error::EngineError;
use crate::instruction::{self, CellReport, EditOutcome};
use crate::memory::{Address, Memory, MemoryCell};
use crate::util::parse_hex_byte;
use log::debug;

pub struct Editor {
    memory: Memory,
    config: EditorConfig,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Editor {
    pub fn new(config: EditorConfig) -> Self {
        Editor {
            memory: Memory::new(),
            config,
        }
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn cell(&self, address: Address) -> Result<&MemoryCell, EngineError> {
        self.memory.get_cell(address)
    }

    pub fn cells(&self) -> impl Iterator<Item = &MemoryCell> {
        self.memory.cells()
    }

    /// A value cell was edited. Only this row changes: its byte, and its
    /// mnemonic becomes whatever the byte decodes to. Blank text clears it.
    pub fn on_value_edited(&mut self, address: Address, hex: &str) -> Result<CellReport, EngineError> {
        let cell = self.memory.get_cell(address)?;
        if let Some(owner) = cell.owner {
            return Err(EngineError::ReadOnly { address, owner });
        }

        let decoded = match parse_hex_byte(hex)? {
            Some(value) => self.memory.set_value(address, value)?.decoded,
            None => {
                self.memory.clear_value(address)?;
                String::new()
            }
        };
        debug!("{:04X}: value '{}' decodes to '{}'", address, hex.trim(), decoded);
        self.memory.set_mnemonic(address, decoded)?;

        Ok(CellReport::from(self.memory.get_cell(address)?))
    }

    /// A mnemonic cell was edited: release, match, write and claim
    pub fn on_mnemonic_edited(&mut self, address: Address, text: &str) -> Result<EditOutcome, EngineError> {
        instruction::assemble_at(&mut self.memory, address, text, self.config.display_case())
    }

    pub fn is_read_only(&self, address: Address) -> bool {
        self.memory
            .get_cell(address)
            .map(MemoryCell::is_read_only)
            .unwrap_or(false)
    }

    pub fn owner_of(&self, address: Address) -> Option<Address> {
        self.memory.get_cell(address).ok().and_then(|c| c.owner)
    }

    /// Nearest row after `address` that is not read-only
    pub fn next_editable_below(&self, address: Address) -> Option<Address> {
        self.memory
            .cells()
            .skip(address as usize + 1)
            .find(|c| !c.is_read_only())
            .map(|c| c.address)
    }

    /// Nearest row before `address` that is not read-only
    pub fn next_editable_above(&self, address: Address) -> Option<Address> {
        let upto = (address as usize).min(self.memory.len());
        self.memory
            .cells()
            .take(upto)
            .filter(|c| !c.is_read_only())
            .last()
            .map(|c| c.address)
    }

    pub fn listing(&self) -> Listing<'_> {
        Listing::new(&self.memory, &self.config.listing)
    }
}
