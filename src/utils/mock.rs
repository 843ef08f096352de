use std::{
    fs,
    path::{Path, PathBuf},
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::{SystemTime, UNIX_EPOCH},
};

use tempfile::env::temp_dir;

use crate::{
    storage::{encoder::HeapFileEncoder, heap_file::HeapFile},
    types::{PageNumber, error::DatabaseError, page::HeapPage, row::Row, schema::Schema},
};

static TEMP_FILE_COUNTER: AtomicU64 = AtomicU64::new(0);

pub fn get_unix_timestamp_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or(0)
}

/// Unique path in the system temp dir. Tests run in parallel, so the
/// timestamp alone is not enough.
pub fn create_temp_heap_path_with_prefix(prefix: &str) -> PathBuf {
    let mut temp_path = temp_dir();
    temp_path.push(format!(
        "{}_{}_{}_{}.dat",
        prefix,
        std::process::id(),
        get_unix_timestamp_millis(),
        TEMP_FILE_COUNTER.fetch_add(1, Ordering::Relaxed)
    ));
    temp_path
}

/// A table file in the temp dir, removed on drop.
pub struct TempHeapFile {
    pub path: PathBuf,
    pub heap_file: Option<Arc<HeapFile>>,
}

impl TempHeapFile {
    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            path: create_temp_heap_path_with_prefix(prefix),
            heap_file: None,
        }
    }

    /// Bulk loads `rows` and opens the resulting file.
    pub fn create_with_rows(
        &mut self,
        schema: Arc<Schema>,
        rows: Vec<Row>,
    ) -> Result<(Arc<HeapFile>, PageNumber), DatabaseError> {
        let pages = HeapFileEncoder::write(&self.path, schema.clone(), rows)?;
        Ok((self.open(schema)?, pages))
    }

    pub fn create_with_pages(
        &mut self,
        schema: Arc<Schema>,
        pages: &[HeapPage],
    ) -> Result<Arc<HeapFile>, DatabaseError> {
        HeapFileEncoder::write_pages(&self.path, pages)?;
        self.open(schema)
    }

    /// Writes raw bytes, for files that are not a whole number of pages.
    pub fn create_with_bytes(
        &mut self,
        schema: Arc<Schema>,
        bytes: &[u8],
    ) -> Result<Arc<HeapFile>, DatabaseError> {
        fs::write(&self.path, bytes)?;
        self.open(schema)
    }

    pub fn open(&mut self, schema: Arc<Schema>) -> Result<Arc<HeapFile>, DatabaseError> {
        let heap_file = Arc::new(HeapFile::new(&self.path, schema)?);
        self.heap_file = Some(heap_file.clone());
        Ok(heap_file)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempHeapFile {
    fn drop(&mut self) {
        self.heap_file = None;
        if self.path.exists() {
            let _ = fs::remove_file(&self.path);
        }
    }
}
