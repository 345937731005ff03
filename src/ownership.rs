//! Ownership tracking for operand rows
//!
//! An instruction with operand bytes claims the rows that follow it. Claimed
//! rows are read-only until the claim is released. Claims are all-or-nothing
//! per owner: when a new claim overlaps an existing one, the existing owner
//! loses every row it held, not just the overlapping one.
//!
//! State lives in `MemoryCell::owner`; the tracker only borrows the store.

use crate::error::EngineError;
use crate::memory::{Address, Memory};
use log::debug;

/// Widest operand any instruction carries (`d16` / `a16`)
pub const MAX_OPERAND_WIDTH: usize = 2;

pub struct OwnershipTracker<'a> {
    memory: &'a mut Memory,
}

impl<'a> OwnershipTracker<'a> {
    pub fn new(memory: &'a mut Memory) -> Self {
        OwnershipTracker { memory }
    }

    pub fn owner_of(&self, address: Address) -> Option<Address> {
        self.memory.get_cell(address).ok().and_then(|c| c.owner)
    }

    /// Rows currently claimed by `owner`, ascending
    pub fn rows_owned_by(&self, owner: Address) -> Vec<Address> {
        self.memory
            .cells()
            .filter(|c| c.owner == Some(owner))
            .map(|c| c.address)
            .collect()
    }

    /// Drop every claim held by `owner`. Released rows go back to editable
    /// and empty. Releasing an owner with no claim does nothing.
    pub fn release(&mut self, owner: Address) -> Vec<Address> {
        let mut released = Vec::new();
        for cell in self.memory.cells_mut().filter(|c| c.owner == Some(owner)) {
            cell.reset();
            released.push(cell.address);
        }
        if !released.is_empty() {
            debug!("released {:04X}: {:04X?}", owner, released);
        }
        released
    }

    /// Claim `rows` for the instruction at `owner`.
    ///
    /// The owner's previous claim is dropped first, as is the claim of any
    /// instruction holding the owner's own row. A row held by another
    /// instruction costs that instruction its whole claim. A row that is
    /// itself an instruction start loses its own claim, so owners are never
    /// owned. Rows outside the table and the owner's own row are skipped.
    ///
    /// Returns every row whose state changed, ascending and deduplicated.
    pub fn claim(&mut self, owner: Address, rows: &[Address]) -> Result<Vec<Address>, EngineError> {
        if !self.memory.contains(owner) {
            return Err(EngineError::OutOfRange(owner as usize));
        }

        let mut touched = self.release(owner);
        if let Some(parent) = self.owner_of(owner) {
            debug!("{:04X} becomes an owner; releasing {:04X}", owner, parent);
            touched.extend(self.release(parent));
        }

        let rows: Vec<Address> = rows
            .iter()
            .copied()
            .filter(|&row| row != owner && self.memory.contains(row))
            .collect();

        for &row in &rows {
            if let Some(other) = self.owner_of(row) {
                if other != owner {
                    debug!(
                        "claim by {:04X} overlaps {:04X} held by {:04X}",
                        owner, row, other
                    );
                    touched.extend(self.release(other));
                }
            }
            touched.extend(self.release(row));
        }

        for &row in &rows {
            let cell = self.memory.cell_mut(row)?;
            cell.owner = Some(owner);
            cell.mnemonic.clear();
            touched.push(row);
        }
        if !rows.is_empty() {
            debug!("claimed {:04X?} for {:04X}", rows, owner);
        }

        touched.sort_unstable();
        touched.dedup();
        Ok(touched)
    }

    /// Before a new instruction is written at `edited`, release any other
    /// instruction holding one of the `max_width` rows after it. This keeps a
    /// short instruction from leaving fragments of a longer neighbour behind.
    pub fn unclaim_if_occupied(&mut self, edited: Address, max_width: usize) -> Vec<Address> {
        let mut touched = Vec::new();
        for delta in 1..=max_width {
            let Some(row) = self.memory.offset(edited, delta) else {
                continue;
            };
            if let Some(other) = self.owner_of(row) {
                if other != edited {
                    touched.extend(self.release(other));
                }
            }
        }
        touched
    }
}
