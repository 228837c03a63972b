// ============================================================
// LOAD OPTIONS
// ============================================================
// Construction parameters for the ingestion pipeline

use serde::{Deserialize, Serialize};

/// Configuration for loading a delimited file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadOptions {
    /// Ordered delimiter candidates considered during detection
    /// (default: comma, semicolon, pipe, tab).
    pub candidates: Vec<u8>,

    /// Whether row 0 of the file is a header (default: true).
    pub has_header: bool,

    /// Drop fully-empty rows while parsing (default: true).
    pub skip_empty: bool,

    /// Cast raw cells to typed values; when false every cell stays a
    /// string (default: true).
    pub auto_cast: bool,

    /// Normalize header names to canonical identifiers; when false raw
    /// names are used verbatim but still made unique (default: true).
    pub normalize_header: bool,

    /// Number of leading lines sampled for delimiter detection
    /// (default: 20).
    pub sample_lines: usize,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            candidates: vec![b',', b';', b'|', b'\t'],
            has_header: true,
            skip_empty: true,
            auto_cast: true,
            normalize_header: true,
            sample_lines: 20,
        }
    }
}

impl LoadOptions {
    /// Create options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Options for headerless files (columns addressed by index only).
    pub fn headerless() -> Self {
        Self {
            has_header: false,
            ..Default::default()
        }
    }

    /// Options that keep every cell as a raw string.
    pub fn raw_strings() -> Self {
        Self {
            auto_cast: false,
            normalize_header: false,
            ..Default::default()
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.candidates.is_empty() {
            return Err("candidates must not be empty".to_string());
        }
        if self.sample_lines == 0 {
            return Err("sample_lines must be > 0".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = LoadOptions::default();
        assert_eq!(options.candidates, vec![b',', b';', b'|', b'\t']);
        assert!(options.has_header);
        assert!(options.skip_empty);
        assert!(options.auto_cast);
        assert!(options.normalize_header);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut options = LoadOptions::default();
        options.candidates.clear();
        assert!(options.validate().is_err());

        let mut options = LoadOptions::default();
        options.sample_lines = 0;
        assert!(options.validate().is_err());
    }
}
