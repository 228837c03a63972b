// ============================================================
// CSV SESSION USE CASE
// ============================================================
// Orchestrate ingestion (decode, detect, parse, cast) and write-back

use std::fmt;
use std::path::{Path, PathBuf};

use crate::domain::error::{Result, TableError};
use crate::domain::table::{build_header, Cell, ColumnRef, LoadOptions, Row, RowPatch, Table};
use crate::infrastructure::csv::{detect_and_decode, detect_delimiter, parse_rows, writer};
use crate::infrastructure::storage::FileStorage;

/// An owned table bound to its source path and storage collaborator.
///
/// Loading runs the full inference pipeline; mutations happen in memory
/// and are written back on demand. The table is the source of truth: a
/// failed save reports an error but never rolls back in-memory state.
pub struct CsvSession<S: FileStorage> {
    storage: S,
    path: PathBuf,
    options: LoadOptions,
    table: Table,
}

impl<S: FileStorage> CsvSession<S> {
    /// Load a delimited file of unknown encoding and delimiter.
    pub fn load(storage: S, path: impl Into<PathBuf>, options: LoadOptions) -> Result<Self> {
        options.validate().map_err(TableError::ValidationError)?;

        let path = path.into();
        let bytes = storage.read_bytes(&path)?;
        let decoded = detect_and_decode(&bytes);
        let delimiter = detect_delimiter(&decoded.text, &options.candidates, options.sample_lines);
        tracing::debug!(
            path = %path.display(),
            encoding = %decoded.encoding,
            delimiter = %(delimiter as char),
            "detected source format"
        );

        let mut raw_rows = parse_rows(&decoded.text, delimiter, options.skip_empty)?;
        let header = if options.has_header && !raw_rows.is_empty() {
            Some(build_header(&raw_rows.remove(0), options.normalize_header))
        } else {
            None
        };
        let rows: Vec<Row> = raw_rows
            .into_iter()
            .map(|raw| {
                raw.into_iter()
                    .map(|field| {
                        if options.auto_cast {
                            Cell::cast(&field)
                        } else {
                            Cell::Str(field)
                        }
                    })
                    .collect()
            })
            .collect();

        let table = Table::new(header, rows).with_format(delimiter, decoded.encoding);
        tracing::info!(
            path = %path.display(),
            rows = table.len(),
            columns = table.column_count(),
            "loaded table"
        );
        Ok(Self {
            storage,
            path,
            options,
            table,
        })
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut Table {
        &mut self.table
    }

    pub fn into_table(self) -> Table {
        self.table
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn options(&self) -> &LoadOptions {
        &self.options
    }

    /// One-line session summary for logs and debugging.
    pub fn summary(&self) -> String {
        format!(
            "<CsvSession path={} rows={} columns={} delimiter='{}'>",
            self.path.display(),
            self.table.len(),
            self.table.column_count(),
            self.table.delimiter() as char
        )
    }

    // ---------- Mutation ----------

    // Raw string values in patches follow the session's auto_cast: with it
    // on they go back through the type caster, with it off they stay
    // strings like every loaded cell.

    pub fn update_row(&mut self, index: usize, patch: RowPatch) -> Result<()> {
        let patch = self.incoming(patch);
        self.table.update_row(index, patch)
    }

    pub fn update_cell(
        &mut self,
        row_index: usize,
        column: impl Into<ColumnRef>,
        value: impl Into<Cell>,
    ) -> Result<()> {
        let value = self.incoming_cell(value.into());
        self.table.update_cell(row_index, column, value)
    }

    pub fn add_row(&mut self, patch: RowPatch) -> Result<()> {
        let patch = self.incoming(patch);
        self.table.add_row(patch)
    }

    pub fn delete_row(&mut self, index: usize) -> Result<()> {
        self.table.delete_row(index)
    }

    fn incoming(&self, patch: RowPatch) -> RowPatch {
        if self.options.auto_cast {
            patch.cast()
        } else {
            patch
        }
    }

    fn incoming_cell(&self, value: Cell) -> Cell {
        match value {
            Cell::Str(s) if self.options.auto_cast => Cell::cast(&s),
            other => other,
        }
    }

    // ---------- Persistence ----------

    /// Serialize the table and write it through the storage collaborator,
    /// to `path` when given and to the original source path otherwise.
    pub fn save(&self, path: Option<&Path>) -> Result<()> {
        let target = path.unwrap_or(&self.path);
        let bytes = writer::to_bytes(&self.table)?;
        self.storage.write_bytes(target, &bytes)?;
        tracing::info!(path = %target.display(), rows = self.table.len(), "saved table");
        Ok(())
    }

    // Mutate-then-save wrappers. In-memory state stays mutated even when
    // the save fails; callers see the IoError and can retry the save.

    pub fn update_row_and_save(
        &mut self,
        index: usize,
        patch: RowPatch,
        path: Option<&Path>,
    ) -> Result<()> {
        self.update_row(index, patch)?;
        self.save(path)
    }

    pub fn update_cell_and_save(
        &mut self,
        row_index: usize,
        column: impl Into<ColumnRef>,
        value: impl Into<Cell>,
        path: Option<&Path>,
    ) -> Result<()> {
        self.update_cell(row_index, column, value)?;
        self.save(path)
    }

    pub fn add_row_and_save(&mut self, patch: RowPatch, path: Option<&Path>) -> Result<()> {
        self.add_row(patch)?;
        self.save(path)
    }

    pub fn delete_row_and_save(&mut self, index: usize, path: Option<&Path>) -> Result<()> {
        self.delete_row(index)?;
        self.save(path)
    }
}

// Manual impl: the storage collaborator need not be Debug itself.
impl<S: FileStorage> fmt::Debug for CsvSession<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CsvSession")
            .field("path", &self.path)
            .field("rows", &self.table.len())
            .field("columns", &self.table.column_count())
            .field("delimiter", &(self.table.delimiter() as char))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::table::Operator;
    use crate::infrastructure::storage::LocalFileStorage;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// In-memory storage double for pipeline tests.
    struct MemoryStorage {
        files: RefCell<HashMap<PathBuf, Vec<u8>>>,
        fail_writes: bool,
    }

    impl MemoryStorage {
        fn with(path: &str, bytes: &[u8]) -> Self {
            let mut files = HashMap::new();
            files.insert(PathBuf::from(path), bytes.to_vec());
            Self {
                files: RefCell::new(files),
                fail_writes: false,
            }
        }

        fn failing(path: &str, bytes: &[u8]) -> Self {
            let mut storage = Self::with(path, bytes);
            storage.fail_writes = true;
            storage
        }

        fn read(&self, path: &str) -> Vec<u8> {
            self.files.borrow()[&PathBuf::from(path)].clone()
        }
    }

    impl FileStorage for &MemoryStorage {
        fn read_bytes(&self, path: &Path) -> Result<Vec<u8>> {
            self.files
                .borrow()
                .get(path)
                .cloned()
                .ok_or_else(|| TableError::FileNotFound(path.display().to_string()))
        }

        fn write_bytes(&self, path: &Path, bytes: &[u8]) -> Result<()> {
            if self.fail_writes {
                return Err(TableError::IoError("disk full".to_string()));
            }
            self.files
                .borrow_mut()
                .insert(path.to_path_buf(), bytes.to_vec());
            Ok(())
        }
    }

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("flatfile=debug")
            .with_test_writer()
            .try_init();
    }

    #[test]
    fn test_load_scenario() {
        init_tracing();
        let storage = MemoryStorage::with("people.csv", b"name,age\nJohn,25\nJane,30\n");
        let session =
            CsvSession::load(&storage, "people.csv", LoadOptions::default()).unwrap();

        let table = session.table();
        assert_eq!(table.header().unwrap(), ["name", "age"]);
        assert_eq!(
            table.rows()[0],
            vec![Cell::Str("John".to_string()), Cell::Int(25)]
        );

        let filtered = table.filter_by_column("age", 26i64, Operator::Ge).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.rows()[0][0], Cell::Str("Jane".to_string()));
    }

    #[test]
    fn test_update_row_then_to_dicts_scenario() {
        let storage = MemoryStorage::with("people.csv", b"name,age\nJohn,25\nJane,30\n");
        let mut session =
            CsvSession::load(&storage, "people.csv", LoadOptions::default()).unwrap();

        session.update_row(0, RowPatch::named([("age", 26i64)])).unwrap();
        let dicts = session.table().to_dicts().unwrap();
        assert_eq!(dicts[0]["name"], Cell::Str("John".to_string()));
        assert_eq!(dicts[0]["age"], Cell::Int(26));
        assert_eq!(dicts[1]["name"], Cell::Str("Jane".to_string()));
        assert_eq!(dicts[1]["age"], Cell::Int(30));
    }

    #[test]
    fn test_add_then_delete_scenario() {
        let storage = MemoryStorage::with("people.csv", b"name,age\nJohn,25\nJane,30\n");
        let mut session =
            CsvSession::load(&storage, "people.csv", LoadOptions::default()).unwrap();

        session.add_row(RowPatch::positional(["Bob", "40"])).unwrap();
        session.delete_row(0).unwrap();
        assert_eq!(session.table().len(), 2);
        assert_eq!(
            session.table().rows()[0][0],
            Cell::Str("Jane".to_string())
        );
        assert_eq!(
            session.table().rows()[1],
            vec![Cell::Str("Bob".to_string()), Cell::Int(40)]
        );
    }

    #[test]
    fn test_mutations_honour_raw_string_sessions() {
        let storage = MemoryStorage::with("raw.csv", b"name,age\nJohn,25\n");
        let mut session =
            CsvSession::load(&storage, "raw.csv", LoadOptions::raw_strings()).unwrap();

        session.add_row(RowPatch::positional(["Jane", "30"])).unwrap();
        session.update_cell(0, "age", "26").unwrap();
        let rows = session.table().rows();
        assert_eq!(rows[0][1], Cell::Str("26".to_string()));
        assert_eq!(rows[1][1], Cell::Str("30".to_string()));
    }

    #[test]
    fn test_ragged_rows_scenario() {
        let storage = MemoryStorage::with("ragged.csv", b"a,b,c\n1,2\n3,4,5,6\n");
        let session =
            CsvSession::load(&storage, "ragged.csv", LoadOptions::default()).unwrap();

        let rows = session.table().rows();
        assert_eq!(rows[0], vec![Cell::Int(1), Cell::Int(2), Cell::Empty]);
        assert_eq!(rows[1], vec![Cell::Int(3), Cell::Int(4), Cell::Int(5)]);
    }

    #[test]
    fn test_headerless_and_raw_string_options() {
        let storage = MemoryStorage::with("nums.csv", b"1,2\n3,4\n");
        let session =
            CsvSession::load(&storage, "nums.csv", LoadOptions::headerless()).unwrap();
        assert!(session.table().header().is_none());
        assert_eq!(session.table().len(), 2);
        assert!(session.table().to_dicts().is_err());

        let storage = MemoryStorage::with("raw.csv", b"name,age\nJohn,25\n");
        let session =
            CsvSession::load(&storage, "raw.csv", LoadOptions::raw_strings()).unwrap();
        assert_eq!(session.table().rows()[0][1], Cell::Str("25".to_string()));
    }

    #[test]
    fn test_semicolon_format_detected_and_preserved() {
        let storage = MemoryStorage::with("semi.csv", b"name;age\nJohn;25\n");
        let mut session =
            CsvSession::load(&storage, "semi.csv", LoadOptions::default()).unwrap();
        assert_eq!(session.table().delimiter(), b';');

        session
            .add_row_and_save(RowPatch::positional(["Jane", "30"]), None)
            .unwrap();
        assert_eq!(storage.read("semi.csv"), b"name;age\nJohn;25\nJane;30\n");
    }

    #[test]
    fn test_save_then_reload_round_trip() {
        let storage = MemoryStorage::with(
            "people.csv",
            b"name,age,note\nJohn,25,\"with, comma\"\nJane,30,plain\n",
        );
        let mut session =
            CsvSession::load(&storage, "people.csv", LoadOptions::default()).unwrap();
        session.update_cell(0, "age", Cell::Float(25.5)).unwrap();
        session.save(Some(Path::new("copy.csv"))).unwrap();

        let reloaded =
            CsvSession::load(&storage, "copy.csv", LoadOptions::default()).unwrap();
        assert_eq!(reloaded.table().header(), session.table().header());
        assert_eq!(reloaded.table().rows(), session.table().rows());
    }

    #[test]
    fn test_latin1_round_trip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("latin.csv");
        std::fs::write(&path, b"name,city\nJos\xe9,Par\xeds\n").unwrap();

        let session =
            CsvSession::load(LocalFileStorage::new(), &path, LoadOptions::default()).unwrap();
        assert_eq!(session.table().encoding(), "latin-1");
        assert_eq!(
            session.table().rows()[0][0],
            Cell::Str("José".to_string())
        );

        session.save(None).unwrap();
        assert_eq!(
            std::fs::read(&path).unwrap(),
            b"name,city\nJos\xe9,Par\xeds\n"
        );
    }

    #[test]
    fn test_failed_save_does_not_roll_back() {
        let storage = MemoryStorage::failing("people.csv", b"name,age\nJohn,25\n");
        let mut session =
            CsvSession::load(&storage, "people.csv", LoadOptions::default()).unwrap();

        let err = session
            .update_cell_and_save(0, "age", Cell::Int(26), None)
            .unwrap_err();
        assert!(matches!(err, TableError::IoError(_)));
        // The in-memory table keeps the mutation; memory is the source of truth
        assert_eq!(session.table().rows()[0][1], Cell::Int(26));
    }

    #[test]
    fn test_missing_file_surfaces_not_found() {
        let storage = MemoryStorage::with("a.csv", b"x\n");
        let err = CsvSession::load(&storage, "missing.csv", LoadOptions::default()).unwrap_err();
        assert!(matches!(err, TableError::FileNotFound(_)));
    }

    #[test]
    fn test_debug_output_summarises_the_session() {
        let storage = MemoryStorage::with("people.csv", b"name,age\nJohn,25\nJane,30\n");
        let session =
            CsvSession::load(&storage, "people.csv", LoadOptions::default()).unwrap();
        let rendered = format!("{session:?}");
        assert!(rendered.contains("people.csv"));
        assert!(rendered.contains("rows: 2"));
    }

    #[test]
    fn test_summary_names_the_source() {
        let storage = MemoryStorage::with("people.csv", b"name,age\nJohn,25\n");
        let session =
            CsvSession::load(&storage, "people.csv", LoadOptions::default()).unwrap();
        let summary = session.summary();
        assert!(summary.contains("people.csv"));
        assert!(summary.contains("rows=1"));
    }
}
