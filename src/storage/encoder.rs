use std::{
    fs::{File, OpenOptions},
    io::Write,
    path::Path,
    sync::Arc,
};

use crate::{
    storage::heap_file::HeapFile,
    types::{
        PageNumber,
        error::{DatabaseError, Result},
        page::HeapPage,
        page_id::HeapPageId,
        row::Row,
        schema::Schema,
    },
};

/// Bulk loader that lays rows out into a fresh heap file.
///
/// This is how table files come into existence; the [`HeapFile`] handle
/// itself never writes.
pub struct HeapFileEncoder;

impl HeapFileEncoder {
    /// Writes `rows` in order into consecutive pages of a new file at `path`,
    /// truncating any existing file, and returns the number of pages written.
    pub fn write<P, I>(path: P, schema: Arc<Schema>, rows: I) -> Result<PageNumber>
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = Row>,
    {
        let path = path.as_ref();
        let mut file = Self::create_file(path)?;
        let table_id = HeapFile::new(path, schema.clone())?.table_id();

        let mut page_count: PageNumber = 0;
        let mut page = HeapPage::new(HeapPageId::new(table_id, page_count), schema.clone());
        for row in rows {
            let size = row.size();
            if size > HeapPage::max_cell_size() {
                return Err(DatabaseError::RowTooLarge { size });
            }
            if !page.can_fit(size) {
                file.write_all(&page.to_bytes())?;
                page_count += 1;
                page = HeapPage::new(HeapPageId::new(table_id, page_count), schema.clone());
            }
            page.insert_row(row)?;
        }
        if page.num_records() > 0 {
            file.write_all(&page.to_bytes())?;
            page_count += 1;
        }
        file.flush()?;
        Ok(page_count)
    }

    /// Writes already built pages verbatim, page `i` at offset `i * PAGE_SIZE`.
    pub fn write_pages<P: AsRef<Path>>(path: P, pages: &[HeapPage]) -> Result<()> {
        let mut file = Self::create_file(path.as_ref())?;
        for page in pages {
            file.write_all(&page.to_bytes())?;
        }
        file.flush()?;
        Ok(())
    }

    fn create_file(path: &Path) -> Result<File> {
        println!("Writing heap file at path: {}", path.display());
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;
        Ok(file)
    }
}
