// ============================================================
// FILE STORAGE
// ============================================================
// The byte-level collaborator the table core reads and writes through

use std::fs;
use std::path::Path;

use crate::domain::error::{Result, TableError};

/// Byte-level file access seam.
///
/// Everything above this trait works on decoded text and tables;
/// implementations own paths, permissions, and atomicity concerns
/// (write-then-rename is the implementor's job if needed).
pub trait FileStorage {
    fn read_bytes(&self, path: &Path) -> Result<Vec<u8>>;
    fn write_bytes(&self, path: &Path, bytes: &[u8]) -> Result<()>;
}

/// Plain std::fs implementation.
#[derive(Debug, Clone, Default)]
pub struct LocalFileStorage;

impl LocalFileStorage {
    pub fn new() -> Self {
        Self
    }
}

impl FileStorage for LocalFileStorage {
    fn read_bytes(&self, path: &Path) -> Result<Vec<u8>> {
        fs::read(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                TableError::FileNotFound(path.display().to_string())
            } else {
                TableError::IoError(format!("Failed to read {}: {}", path.display(), e))
            }
        })
    }

    fn write_bytes(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        fs::write(path, bytes)
            .map_err(|e| TableError::IoError(format!("Failed to write {}: {}", path.display(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_missing_file_is_not_found() {
        let storage = LocalFileStorage::new();
        let err = storage
            .read_bytes(Path::new("/no/such/file.csv"))
            .unwrap_err();
        assert!(matches!(err, TableError::FileNotFound(_)));
    }

    #[test]
    fn test_write_then_read_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        let storage = LocalFileStorage::new();
        storage.write_bytes(&path, b"a,b\n1,2\n").unwrap();
        assert_eq!(storage.read_bytes(&path).unwrap(), b"a,b\n1,2\n");
    }
}
