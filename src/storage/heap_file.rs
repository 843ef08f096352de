use std::{
    fs::{self, File},
    io::{Read, Seek, SeekFrom},
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::{
    executor::sequential_scan::HeapFileIterator,
    storage::buffer_pool::PageCache,
    types::{
        PAGE_SIZE, PageNumber, TableId, TransactionId,
        error::{DatabaseError, Result},
        page::HeapPage,
        page_id::HeapPageId,
        row::Row,
        schema::Schema,
    },
    utils::hash::table_id_for_path,
};

/// A table stored as an unordered collection of rows in fixed-size pages.
///
/// Page `n` occupies bytes `[n * PAGE_SIZE, (n + 1) * PAGE_SIZE)` of the
/// backing file; there is no file header. The handle is read-only: pages are
/// read through [`HeapFile::read_page`], usually on behalf of a page cache,
/// and every write operation reports [`DatabaseError::Unsupported`].
#[derive(Debug, Clone)]
pub struct HeapFile {
    path: PathBuf,
    schema: Arc<Schema>,
}

impl HeapFile {
    /// Binds `schema` to the file at `path`. The path is resolved to its
    /// canonical form here; the file itself does not need to exist yet.
    pub fn new<P: AsRef<Path>>(path: P, schema: Arc<Schema>) -> Result<Self> {
        let path = path.as_ref();
        let path = match fs::canonicalize(path) {
            Ok(canonical) => canonical,
            Err(_) => std::path::absolute(path)?,
        };
        Ok(Self { path, schema })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn table_id(&self) -> TableId {
        table_id_for_path(&self.path)
    }

    /// Number of pages in the file, counting a partially written last page.
    /// That partial page cannot be read: `read_page_bytes` rejects it with
    /// [`DatabaseError::InvalidPageAddress`].
    pub fn page_count(&self) -> Result<PageNumber> {
        let file_len = fs::metadata(&self.path)?.len();
        Ok(file_len.div_ceil(PAGE_SIZE as u64) as PageNumber)
    }

    /// Reads the raw bytes of one page. The page must lie entirely inside the
    /// file. The file is opened for this read only.
    pub fn read_page_bytes(&self, page_id: HeapPageId) -> Result<Vec<u8>> {
        let mut file = File::open(&self.path)?;
        let file_len = file.metadata()?.len();
        let offset = page_id.page_number() as u64 * PAGE_SIZE as u64;
        if offset + PAGE_SIZE as u64 > file_len {
            return Err(DatabaseError::InvalidPageAddress {
                table_id: page_id.table_id(),
                page_number: page_id.page_number(),
                file_len,
            });
        }
        let mut buffer = vec![0u8; PAGE_SIZE];
        file.seek(SeekFrom::Start(offset))?;
        file.read_exact(&mut buffer)?;
        Ok(buffer)
    }

    pub fn read_page(&self, page_id: HeapPageId) -> Result<HeapPage> {
        let bytes = self.read_page_bytes(page_id)?;
        HeapPage::from_bytes(page_id, &bytes, self.schema.clone())
    }

    pub fn write_page(&self, page: &HeapPage) -> Result<()> {
        Err(unsupported(format!("write_page({})", page.id())))
    }

    pub fn insert_row(&self, _tx: TransactionId, _row: Row) -> Result<Vec<HeapPageId>> {
        Err(unsupported("insert_row".to_string()))
    }

    pub fn delete_row(&self, _tx: TransactionId, row: &Row) -> Result<HeapPageId> {
        let target = row
            .record_id()
            .map_or_else(|| "unplaced row".to_string(), |rid| rid.to_string());
        Err(unsupported(format!("delete_row({})", target)))
    }

    /// Sequential scan over every row of the table, fetched through `cache`.
    pub fn iter<'a, C: PageCache>(
        &'a self,
        tx: TransactionId,
        cache: &'a C,
    ) -> HeapFileIterator<'a, C> {
        HeapFileIterator::new(self, tx, cache)
    }
}

fn unsupported(operation: String) -> DatabaseError {
    DatabaseError::Unsupported { operation }
}
