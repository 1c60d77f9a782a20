// crates/search/src/store.rs
//! The in-memory Task Record Store.

use taskmgr_core::TaskRecord;

/// Ordered records for one load cycle.
///
/// A reload replaces the whole collection; only `content` is ever patched
/// in place, by the content loader.
#[derive(Debug, Clone, Default)]
pub struct TaskRecordStore {
    records: Vec<TaskRecord>,
}

impl TaskRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build records from a filename listing.
    pub fn from_filenames<'a>(filenames: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            records: filenames.into_iter().map(TaskRecord::from_filename).collect(),
        }
    }

    pub fn replace_all(&mut self, records: Vec<TaskRecord>) {
        self.records = records;
    }

    pub fn records(&self) -> &[TaskRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, filename: &str) -> Option<&TaskRecord> {
        self.records.iter().find(|r| r.filename == filename)
    }

    /// Attach document text to the record for `filename`.
    ///
    /// Returns `false` when no such record exists.
    pub fn set_content(&mut self, filename: &str, content: String) -> bool {
        match self.records.iter_mut().find(|r| r.filename == filename) {
            Some(record) => {
                record.content = Some(content);
                true
            }
            None => false,
        }
    }

    /// Filenames of records whose content has not been loaded.
    pub fn missing_content(&self) -> Vec<String> {
        self.records
            .iter()
            .filter(|r| !r.has_content())
            .map(|r| r.filename.clone())
            .collect()
    }
}
