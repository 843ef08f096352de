use std::sync::Arc;

use crate::{
    executor::scan::TupleIterator,
    storage::{
        buffer_pool::{PageCache, Permissions},
        heap_file::HeapFile,
    },
    types::{
        PageNumber, SlotNumber, TableId, TransactionId,
        error::{DatabaseError, Result},
        page::HeapPage,
        page_id::HeapPageId,
        row::Row,
    },
};

enum ScanState {
    Closed,
    /// `cursor` is the slot of the next row to return; it always holds one.
    Positioned {
        page_number: PageNumber,
        page: Arc<HeapPage>,
        cursor: usize,
    },
    Exhausted,
}

/// Walks every row of a heap file, page by page, through a page cache.
///
/// Pages are requested read-only in ascending page order. After each row the
/// scanner moves on to the next row-bearing page right away, so `has_next`
/// never has to touch the cache.
pub struct SequentialScanner<'a, C: PageCache> {
    file: &'a HeapFile,
    cache: &'a C,
    tx: TransactionId,
    table_id: TableId,
    num_pages: PageNumber,
    state: ScanState,
}

pub type HeapFileIterator<'a, C> = SequentialScanner<'a, C>;

impl<'a, C: PageCache> SequentialScanner<'a, C> {
    pub fn new(file: &'a HeapFile, tx: TransactionId, cache: &'a C) -> Self {
        Self {
            file,
            cache,
            tx,
            table_id: file.table_id(),
            num_pages: 0,
            state: ScanState::Closed,
        }
    }

    pub fn is_open(&self) -> bool {
        !matches!(self.state, ScanState::Closed)
    }

    /// Page the scanner is positioned on, if any.
    pub fn current_page(&self) -> Option<PageNumber> {
        match self.state {
            ScanState::Positioned { page_number, .. } => Some(page_number),
            _ => None,
        }
    }

    fn advance_from(&mut self, start: PageNumber) -> Result<()> {
        self.state = ScanState::Exhausted;
        for page_number in start..self.num_pages {
            let page_id = HeapPageId::new(self.table_id, page_number);
            let page = self
                .cache
                .get_page(self.tx, page_id, Permissions::ReadOnly)?;
            if let Some(cursor) = page.occupied_slot_from(0) {
                self.state = ScanState::Positioned {
                    page_number,
                    page,
                    cursor,
                };
                return Ok(());
            }
        }
        Ok(())
    }
}

impl<C: PageCache> TupleIterator for SequentialScanner<'_, C> {
    fn open(&mut self) -> Result<()> {
        self.close();
        self.num_pages = self.file.page_count()?;
        self.advance_from(0)
    }

    fn has_next(&self) -> bool {
        matches!(self.state, ScanState::Positioned { .. })
    }

    fn next(&mut self) -> Result<Row> {
        let ScanState::Positioned {
            page_number,
            page,
            cursor,
        } = &mut self.state
        else {
            return Err(DatabaseError::NoSuchElement);
        };
        let row = page
            .get_row(*cursor as SlotNumber)
            .cloned()
            .ok_or(DatabaseError::NoSuchElement)?;
        match page.occupied_slot_from(*cursor + 1) {
            Some(slot) => *cursor = slot,
            None => {
                let next_page = *page_number + 1;
                self.advance_from(next_page)?;
            }
        }
        Ok(row)
    }

    fn rewind(&mut self) -> Result<()> {
        if !self.is_open() {
            return Err(DatabaseError::IteratorNotOpen);
        }
        self.close();
        self.open()
    }

    fn close(&mut self) {
        self.state = ScanState::Closed;
    }
}
