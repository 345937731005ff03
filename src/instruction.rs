//! Mnemonic text to opcode and operand bytes
//!
//! Matching runs an ordered list of matchers over the normalized text. Each
//! one either declines or returns an `Encoding`; the first success wins.
//! Priority:
//!
//! 1. literal registry entry (`NOP`, `MOV A,B`)
//! 2. `MVI r,XX`
//! 3. one-byte immediate command (`ADI XX`, `OUT XX`)
//! 4. register pair with 16-bit immediate (`LXI B,XXXX`)
//! 5. 16-bit address command (`JMP XXXX`, `STA XXXX`)
//!
//! Four digit operands are split textually: the first two characters go to
//! the row after the opcode, the last two to the row after that. No numeric
//! byte swapping is done.

use crate::error::EngineError;
use crate::memory::{Address, Memory, MemoryCell};
use crate::opcode_tables;
use crate::ownership::{OwnershipTracker, MAX_OPERAND_WIDTH};
use log::{debug, warn};
use regex::Regex;
use std::fmt::{Display, Error, Formatter};

lazy_static! {
    static ref COMMA_SPACE: Regex = Regex::new(r",\s+").expect("comma pattern");
    static ref MVI_PATTERN: Regex =
        Regex::new(r"^MVI\s+([A-Z]),([0-9A-F]{2})$").expect("MVI pattern");
    static ref D8_PATTERN: Regex = Regex::new(r"^(\w+)\s+([0-9A-F]{2})$").expect("d8 pattern");
    static ref D16_PATTERN: Regex =
        Regex::new(r"^(\w+)\s+([A-Z]{1,2}),([0-9A-F]{4})$").expect("d16 pattern");
    static ref A16_PATTERN: Regex = Regex::new(r"^(\w+)\s+([0-9A-F]{4})$").expect("a16 pattern");
}

/// Which matcher produced an encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Literal,
    MoveImmediate,
    Immediate8,
    RegisterPair16,
    Address16,
}

/// Opcode plus operand bytes for one instruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoding {
    pub kind: MatchKind,
    /// Registry key that resolved, e.g. `MVI A,d8`
    pub template: String,
    pub opcode: u8,
    pub operands: Vec<u8>,
}

impl Encoding {
    fn new(kind: MatchKind, template: String, opcode: u8, operands: Vec<u8>) -> Self {
        Encoding {
            kind,
            template,
            opcode,
            operands,
        }
    }

    /// Total size in bytes
    pub fn size(&self) -> usize {
        1 + self.operands.len()
    }
}

impl Display for Encoding {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "{:02X}", self.opcode)?;
        for op in &self.operands {
            write!(f, " {:02X}", op)?;
        }
        write!(f, " ({})", self.template)
    }
}

type Matcher = fn(&str) -> Option<Encoding>;

const MATCHERS: [Matcher; 5] = [
    match_literal,
    match_move_immediate,
    match_immediate8,
    match_register_pair16,
    match_address16,
];

/// Collapse `", "` to `","`, trim and uppercase
pub fn normalize(text: &str) -> String {
    COMMA_SPACE.replace_all(text, ",").trim().to_uppercase()
}

/// Two hex characters to a byte. Callers pass regex-validated text.
fn hex_pair(text: &str) -> Option<u8> {
    u8::from_str_radix(text, 16).ok()
}

/// Four hex characters as typed, first pair then second pair
fn split_word(text: &str) -> Option<Vec<u8>> {
    let first = hex_pair(text.get(0..2)?)?;
    let second = hex_pair(text.get(2..4)?)?;
    Some(vec![first, second])
}

fn match_literal(text: &str) -> Option<Encoding> {
    let opcode = opcode_tables::lookup_by_mnemonic(text)?;
    Some(Encoding::new(MatchKind::Literal, text.to_string(), opcode, Vec::new()))
}

fn match_move_immediate(text: &str) -> Option<Encoding> {
    let caps = MVI_PATTERN.captures(text)?;
    let template = format!("MVI {},d8", &caps[1]);
    let opcode = opcode_tables::lookup_by_mnemonic(&template)?;
    let data = hex_pair(&caps[2])?;
    Some(Encoding::new(MatchKind::MoveImmediate, template, opcode, vec![data]))
}

fn match_immediate8(text: &str) -> Option<Encoding> {
    let caps = D8_PATTERN.captures(text)?;
    let command = &caps[1];
    if !opcode_tables::is_d8_command(command) {
        return None;
    }
    let template = format!("{} d8", command);
    let opcode = opcode_tables::lookup_by_mnemonic(&template)?;
    let data = hex_pair(&caps[2])?;
    Some(Encoding::new(MatchKind::Immediate8, template, opcode, vec![data]))
}

fn match_register_pair16(text: &str) -> Option<Encoding> {
    let caps = D16_PATTERN.captures(text)?;
    let template = format!("{} {},d16", &caps[1], &caps[2]);
    let opcode = opcode_tables::lookup_by_mnemonic(&template)?;
    let data = split_word(&caps[3])?;
    Some(Encoding::new(MatchKind::RegisterPair16, template, opcode, data))
}

fn match_address16(text: &str) -> Option<Encoding> {
    let caps = A16_PATTERN.captures(text)?;
    let command = &caps[1];
    if !opcode_tables::is_a16_command(command) {
        return None;
    }
    let template = format!("{} a16", command);
    let opcode = opcode_tables::lookup_by_mnemonic(&template)?;
    let data = split_word(&caps[2])?;
    Some(Encoding::new(MatchKind::Address16, template, opcode, data))
}

/// Encode mnemonic text without touching memory
pub fn encode(text: &str) -> Result<Encoding, EngineError> {
    let normalized = normalize(text);
    MATCHERS
        .iter()
        .find_map(|matcher| matcher(normalized.as_str()))
        .ok_or(EngineError::UnknownMnemonic(normalized))
}

/// Snapshot of one row after an edit, as the UI needs it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellReport {
    pub address: Address,
    pub value: Option<u8>,
    pub mnemonic: String,
    pub owner: Option<Address>,
    pub read_only: bool,
}

impl From<&MemoryCell> for CellReport {
    fn from(cell: &MemoryCell) -> Self {
        CellReport {
            address: cell.address,
            value: cell.value,
            mnemonic: cell.mnemonic.clone(),
            owner: cell.owner,
            read_only: cell.is_read_only(),
        }
    }
}

/// Everything a mnemonic edit changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOutcome {
    pub address: Address,
    /// The encoding written, or `UnknownMnemonic` when the row was cleared
    pub resolution: Result<Encoding, EngineError>,
    /// Operand bytes that fell past the end of the table
    pub dropped_operands: usize,
    /// Affected rows, ascending, no duplicates
    pub rows: Vec<CellReport>,
}

impl EditOutcome {
    pub fn row(&self, address: Address) -> Option<&CellReport> {
        self.rows.iter().find(|r| r.address == address)
    }
}

/// Display text stored on the instruction row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayCase {
    /// Keep the user's casing (trimmed)
    #[default]
    AsTyped,
    /// Store the normalized uppercase form
    Normalized,
}

/// Assemble `text` at `address`: release stale claims, match, write the
/// opcode and operands, and claim the operand rows. Unknown text clears the
/// row's value; nothing is surfaced as an error except a bad or read-only
/// address.
pub fn assemble_at(
    memory: &mut Memory,
    address: Address,
    text: &str,
    case: DisplayCase,
) -> Result<EditOutcome, EngineError> {
    let cell = memory.get_cell(address)?;
    if let Some(owner) = cell.owner {
        return Err(EngineError::ReadOnly { address, owner });
    }

    let mut touched = vec![address];
    {
        let mut tracker = OwnershipTracker::new(memory);
        touched.extend(tracker.unclaim_if_occupied(address, MAX_OPERAND_WIDTH));
        touched.extend(tracker.release(address));
    }

    let display = match case {
        DisplayCase::AsTyped => text.trim().to_string(),
        DisplayCase::Normalized => normalize(text),
    };
    memory.set_mnemonic(address, display)?;

    let resolution = encode(text);
    let mut dropped_operands = 0;
    match &resolution {
        Ok(encoding) => {
            debug!("{:04X}: '{}' -> {}", address, text.trim(), encoding);

            let mut operand_rows = Vec::with_capacity(encoding.operands.len());
            for delta in 1..=encoding.operands.len() {
                match memory.offset(address, delta) {
                    Some(row) => operand_rows.push(row),
                    None => dropped_operands += 1,
                }
            }
            if dropped_operands > 0 {
                warn!(
                    "{:04X}: {} operand byte(s) of '{}' fall past the end of memory",
                    address,
                    dropped_operands,
                    text.trim()
                );
            }

            // claim before writing so conflict releases cannot wipe new bytes
            let mut tracker = OwnershipTracker::new(memory);
            touched.extend(tracker.claim(address, &operand_rows)?);

            memory.set_value(address, encoding.opcode)?;
            for (&row, &byte) in operand_rows.iter().zip(&encoding.operands) {
                memory.set_value(row, byte)?;
            }
        }
        Err(e) => {
            debug!("{:04X}: {}; clearing value", address, e);
            memory.clear_value(address)?;
        }
    }

    touched.sort_unstable();
    touched.dedup();
    let rows = touched
        .iter()
        .map(|&a| memory.get_cell(a).map(CellReport::from))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(EditOutcome {
        address,
        resolution,
        dropped_operands,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  mvi a,  3c "), "MVI A,3C");
        assert_eq!(normalize("mov a,\tb"), "MOV A,B");
        assert_eq!(normalize("NOP"), "NOP");
    }

    #[test]
    fn test_encode_literal() {
        let enc = encode("mov a, b").unwrap();
        assert_eq!(enc.kind, MatchKind::Literal);
        assert_eq!(enc.opcode, 0x78);
        assert!(enc.operands.is_empty());
        assert_eq!(enc.size(), 1);
    }

    #[test]
    fn test_encode_move_immediate() {
        let enc = encode("MVI A,3C").unwrap();
        assert_eq!(enc.kind, MatchKind::MoveImmediate);
        assert_eq!(enc.template, "MVI A,d8");
        assert_eq!(enc.opcode, 0x3E);
        assert_eq!(enc.operands, vec![0x3C]);
        assert_eq!(encode("mvi   m, ff").unwrap().opcode, 0x36);
    }

    #[test]
    fn test_encode_immediate8() {
        let enc = encode("ADI 05").unwrap();
        assert_eq!(enc.kind, MatchKind::Immediate8);
        assert_eq!(enc.opcode, 0xC6);
        assert_eq!(enc.operands, vec![0x05]);
        assert_eq!(encode("out fe").unwrap().opcode, 0xD3);
    }

    #[test]
    fn test_encode_register_pair16() {
        let enc = encode("LXI B,1A2B").unwrap();
        assert_eq!(enc.kind, MatchKind::RegisterPair16);
        assert_eq!(enc.template, "LXI B,d16");
        assert_eq!(enc.opcode, 0x01);
        assert_eq!(enc.operands, vec![0x1A, 0x2B]);
        assert_eq!(encode("lxi sp, ffee").unwrap().opcode, 0x31);
    }

    #[test]
    fn test_encode_address16() {
        let enc = encode("JMP 1234").unwrap();
        assert_eq!(enc.kind, MatchKind::Address16);
        assert_eq!(enc.opcode, 0xC3);
        // textual split, not little-endian conversion
        assert_eq!(enc.operands, vec![0x12, 0x34]);
        assert_eq!(encode("call 0010").unwrap().opcode, 0xCD);
        assert_eq!(encode("SHLD 00F0").unwrap().opcode, 0x22);
    }

    #[test]
    fn test_template_text_reads_as_hex() {
        // "d8" uppercases to the hex byte D8
        let enc = encode("mvi a,d8").unwrap();
        assert_eq!(enc.kind, MatchKind::MoveImmediate);
        assert_eq!(enc.opcode, 0x3E);
        assert_eq!(enc.operands, vec![0xD8]);
    }

    #[test]
    fn test_encode_rejects() {
        for text in [
            "FOO BAR",
            "",
            "MVI Q,3C",
            "MVI A,3",
            "ADI 123",
            "ADI ZZ",
            "CP 12",
            "CPI 1234",
            "LXI X,1234",
            "JMP 12",
            "MVI A,D",
            "JMP a16",
        ] {
            assert!(
                matches!(encode(text), Err(EngineError::UnknownMnemonic(_))),
                "{:?} should not encode",
                text
            );
        }
    }

    #[test]
    fn test_assemble_writes_and_claims() {
        let mut memory = Memory::new();
        let outcome = assemble_at(&mut memory, 10, "MVI A,3C", DisplayCase::AsTyped).unwrap();
        assert_eq!(outcome.rows.len(), 2);
        assert_eq!(outcome.dropped_operands, 0);
        let op = outcome.row(10).unwrap();
        assert_eq!(op.value, Some(0x3E));
        assert_eq!(op.mnemonic, "MVI A,3C");
        assert!(!op.read_only);
        let data = outcome.row(11).unwrap();
        assert_eq!(data.value, Some(0x3C));
        assert_eq!(data.owner, Some(10));
        assert!(data.read_only);
        assert!(data.mnemonic.is_empty());
    }

    #[test]
    fn test_assemble_display_case() {
        let mut memory = Memory::new();
        assemble_at(&mut memory, 0, "  mov a, b ", DisplayCase::AsTyped).unwrap();
        assert_eq!(memory.get_cell(0).unwrap().mnemonic, "mov a, b");
        assemble_at(&mut memory, 1, "  mov a, b ", DisplayCase::Normalized).unwrap();
        assert_eq!(memory.get_cell(1).unwrap().mnemonic, "MOV A,B");
    }

    #[test]
    fn test_assemble_unknown_clears_value() {
        let mut memory = Memory::new();
        memory.set_value(3, 0x76).unwrap();
        let outcome = assemble_at(&mut memory, 3, "BOGUS", DisplayCase::AsTyped).unwrap();
        assert!(outcome.resolution.is_err());
        let cell = memory.get_cell(3).unwrap();
        assert_eq!(cell.value, None);
        assert_eq!(cell.mnemonic, "BOGUS");
    }

    #[test]
    fn test_assemble_refuses_owned_row() {
        let mut memory = Memory::new();
        assemble_at(&mut memory, 10, "JMP 0000", DisplayCase::AsTyped).unwrap();
        assert_eq!(
            assemble_at(&mut memory, 11, "NOP", DisplayCase::AsTyped),
            Err(EngineError::ReadOnly {
                address: 11,
                owner: 10
            })
        );
        assert_eq!(
            assemble_at(&mut memory, 256, "NOP", DisplayCase::AsTyped),
            Err(EngineError::OutOfRange(256))
        );
    }

    #[test]
    fn test_assemble_at_last_row() {
        let mut memory = Memory::new();
        let outcome = assemble_at(&mut memory, 255, "MVI B,01", DisplayCase::AsTyped).unwrap();
        assert_eq!(outcome.dropped_operands, 1);
        assert_eq!(memory.get_cell(255).unwrap().value, Some(0x06));
        assert!(memory.cells().all(|c| c.owner.is_none()));
    }

    #[test]
    fn test_short_instruction_releases_longer_neighbour() {
        let mut memory = Memory::new();
        // 11 owns 12 and 13
        assemble_at(&mut memory, 11, "LXI H,0102", DisplayCase::AsTyped).unwrap();
        // 10 now takes 11 as its operand; 11's claim must not survive
        let outcome = assemble_at(&mut memory, 10, "MVI C,07", DisplayCase::AsTyped).unwrap();
        assert_eq!(memory.get_cell(11).unwrap().owner, Some(10));
        assert_eq!(memory.get_cell(11).unwrap().value, Some(0x07));
        assert!(memory.get_cell(11).unwrap().mnemonic.is_empty());
        for row in [12, 13] {
            let cell = memory.get_cell(row).unwrap();
            assert_eq!(cell.owner, None);
            assert_eq!(cell.value, None);
        }
        let reported: Vec<Address> = outcome.rows.iter().map(|r| r.address).collect();
        assert_eq!(reported, vec![10, 11, 12, 13]);
    }
}
