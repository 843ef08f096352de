use crate::types::{error::DatabaseError, row::Row};

/// Open/next/rewind/close protocol shared by record iterators.
pub trait TupleIterator {
    fn open(&mut self) -> Result<(), DatabaseError>;
    fn has_next(&self) -> bool;
    fn next(&mut self) -> Result<Row, DatabaseError>;
    fn rewind(&mut self) -> Result<(), DatabaseError>;
    fn close(&mut self);

    fn next_batch(&mut self, batch_size: usize) -> Result<Vec<Row>, DatabaseError> {
        let mut rows = Vec::with_capacity(batch_size);
        while rows.len() < batch_size && self.has_next() {
            rows.push(self.next()?);
        }
        Ok(rows)
    }
}

/// Adapts an opened [`TupleIterator`] to [`Iterator`].
pub struct ScanIterator<S: TupleIterator> {
    scanner: S,
}

impl<S: TupleIterator> ScanIterator<S> {
    pub fn new(scanner: S) -> Self {
        Self { scanner }
    }

    pub fn into_inner(self) -> S {
        self.scanner
    }
}

impl<S: TupleIterator> Iterator for ScanIterator<S> {
    type Item = Result<Row, DatabaseError>;
    fn next(&mut self) -> Option<Self::Item> {
        if !self.scanner.has_next() {
            return None;
        }
        Some(self.scanner.next())
    }
}
