//! Editor configuration
//!
//! Read from a TOML file, every key optional:
//!
//! ```toml
//! [listing]
//! show_empty = false
//! start = "0000"
//! end = "00FF"
//!
//! [editor]
//! uppercase_display = false
//! ```

use crate::error::EngineError;
use crate::instruction::DisplayCase;
use crate::memory::{Address, TABLE_SIZE};
use crate::util::parse_address;
use log::debug;
use serde::{Deserialize, Deserializer};
use std::fs;
use std::path::Path;

/// Environment variable naming a config file when `--config` is not given
pub const CONFIG_ENV: &str = "I8080PAD_CONFIG";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ListingConfig {
    /// Include rows with no value, no mnemonic and no owner
    pub show_empty: bool,
    #[serde(deserialize_with = "hex_address")]
    pub start: Address,
    #[serde(deserialize_with = "hex_address")]
    pub end: Address,
}

impl Default for ListingConfig {
    fn default() -> Self {
        ListingConfig {
            show_empty: false,
            start: 0,
            end: (TABLE_SIZE - 1) as Address,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EditorSection {
    /// Store mnemonics in normalized uppercase instead of as typed
    pub uppercase_display: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub listing: ListingConfig,
    pub editor: EditorSection,
}

fn hex_address<'de, D>(deserializer: D) -> Result<Address, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    parse_address(&text).map_err(serde::de::Error::custom)
}

impl EditorConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, EngineError> {
        let config: EditorConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, EngineError> {
        debug!("loading config from {}", path.display());
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Load `path` if given, else the file named by `I8080PAD_CONFIG`,
    /// else defaults
    pub fn resolve(path: Option<&Path>) -> Result<Self, EngineError> {
        if let Some(path) = path {
            return Self::load(path);
        }
        match std::env::var_os(CONFIG_ENV) {
            Some(env_path) => Self::load(Path::new(&env_path)),
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> Result<(), EngineError> {
        if self.listing.start > self.listing.end {
            return Err(EngineError::Config(format!(
                "listing start {:04X} is after end {:04X}",
                self.listing.start, self.listing.end
            )));
        }
        Ok(())
    }

    pub fn display_case(&self) -> DisplayCase {
        if self.editor.uppercase_display {
            DisplayCase::Normalized
        } else {
            DisplayCase::AsTyped
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn test_empty_config_is_default() {
        let config = EditorConfig::from_toml_str("").unwrap();
        assert_eq!(config, EditorConfig::default());
        assert_eq!(config.listing.end, 0xFF);
        assert_eq!(config.display_case(), DisplayCase::AsTyped);
    }

    #[test]
    fn test_full_config() {
        let config = EditorConfig::from_toml_str(
            r#"
            [listing]
            show_empty = true
            start = "0x10"
            end = "001F"

            [editor]
            uppercase_display = true
            "#,
        )
        .unwrap();
        assert!(config.listing.show_empty);
        assert_eq!(config.listing.start, 0x10);
        assert_eq!(config.listing.end, 0x1F);
        assert_eq!(config.display_case(), DisplayCase::Normalized);
    }

    #[test]
    fn test_bad_configs() {
        for text in [
            "[listing]\nstart = \"0100\"",
            "[listing]\nstart = \"0020\"\nend = \"0010\"",
            "[listing]\nshow_empty = \"yes\"",
            "[listing",
        ] {
            assert!(
                matches!(EditorConfig::from_toml_str(text), Err(EngineError::Config(_))),
                "{:?}",
                text
            );
        }
    }

    #[test]
    fn test_missing_file() {
        let result = EditorConfig::load(Path::new("/nonexistent/i8080pad.toml"));
        assert!(matches!(result, Err(EngineError::Config(_))));
    }
}
