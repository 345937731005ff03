//! i8080pad - author a 256-byte Intel 8080 memory table as hex bytes or
//! as mnemonics, with both views kept in sync.

#[macro_use]
extern crate lazy_static;

pub mod config;
pub mod disassembler;
pub mod editor;
pub mod error;
pub mod instruction;
pub mod memory;
pub mod opcode_tables;
pub mod ownership;
pub mod util;

pub use config::EditorConfig;
pub use editor::Editor;
pub use error::EngineError;
pub use instruction::{CellReport, EditOutcome, Encoding, MatchKind};
pub use memory::{Address, Memory, MemoryCell, TABLE_SIZE};
