use crate::config::ListingConfig;
use crate::memory::{Address, Memory, MemoryCell};
use crate::opcode_tables;
use crate::util::parse_hex_byte;

/// Reverse decode a single byte. Only zero-operand mnemonics resolve;
/// anything else, operand bytes included, decodes to an empty string.
pub fn decode_byte(value: u8) -> String {
    opcode_tables::lookup_by_opcode(value)
        .map(str::to_string)
        .unwrap_or_default()
}

/// Decode a byte as typed into a value cell. Text that is not a valid hex
/// byte decodes to an empty string.
pub fn decode_hex(text: &str) -> String {
    match parse_hex_byte(text) {
        Ok(Some(value)) => decode_byte(value),
        _ => String::new(),
    }
}

/// Text listing of the memory table
pub struct Listing<'a> {
    memory: &'a Memory,
    config: &'a ListingConfig,
}

impl<'a> Listing<'a> {
    pub fn new(memory: &'a Memory, config: &'a ListingConfig) -> Self {
        Listing { memory, config }
    }

    fn is_blank(cell: &MemoryCell) -> bool {
        cell.value.is_none() && cell.mnemonic.is_empty() && cell.owner.is_none()
    }

    /// Format a single row as `AAAA  VV  MNEMONIC`, owned rows as `AAAA  VV  ^OWNER`
    pub fn format_cell(cell: &MemoryCell) -> String {
        cell.to_string()
    }

    /// Render rows `start..=end`, clamped to the table
    pub fn render_range(&self, start: Address, end: Address) -> String {
        let mut output = String::new();
        let mut shown = 0;
        for cell in self
            .memory
            .cells()
            .filter(|c| c.address >= start && c.address <= end)
        {
            if !self.config.show_empty && Self::is_blank(cell) {
                continue;
            }
            output.push_str(&Self::format_cell(cell));
            output.push('\n');
            shown += 1;
        }
        if shown == 0 {
            output.push_str(&format!("<no cells in {:04X}-{:04X}>\n", start, end));
        }
        output
    }

    /// Render the configured window
    pub fn render(&self) -> String {
        self.render_range(self.config.start, self.config.end)
    }
}
