use thiserror::Error;

use crate::types::{PageNumber, TableId};

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(
        "Invalid page address: table {table_id}, page {page_number} lies beyond file length {file_len}"
    )]
    InvalidPageAddress {
        table_id: TableId,
        page_number: PageNumber,
        file_len: u64,
    },

    #[error("No such element")]
    NoSuchElement,

    #[error("Iterator has not been opened")]
    IteratorNotOpen,

    #[error("Field index {index} out of bounds (fields: {len})")]
    FieldIndexOutOfBounds { index: usize, len: usize },

    #[error("Operation not supported: {operation}")]
    Unsupported { operation: String },

    #[error("Row has {actual} values but the schema has {expected} fields")]
    ArityMismatch { expected: usize, actual: usize },

    #[error("Invalid schema: {details}")]
    InvalidSchema { details: String },

    #[error("Field '{name}' not found")]
    FieldNotFound { name: String },

    #[error("Type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },

    #[error("Page is full (table: {table_id}, page: {page_number})")]
    PageFull {
        table_id: TableId,
        page_number: PageNumber,
    },

    #[error("Row of {size} bytes does not fit in an empty page")]
    RowTooLarge { size: usize },

    #[error("Serialization/deserialization error: {details}")]
    SerializationError { details: String },

    #[error("Invalid page size: {expected} bytes, got {actual} bytes")]
    InvalidPageSize { expected: usize, actual: usize },

    #[error("Corrupted page: table={table_id}, page={page_number}, reason={reason}")]
    CorruptedPage {
        table_id: TableId,
        page_number: PageNumber,
        reason: String,
    },

    #[error("Table {table_id} not found")]
    TableNotFound { table_id: TableId },

    #[error("Buffer pool exhausted")]
    BufferPoolExhausted,

    #[error("Transaction aborted: {reason}")]
    TransactionAborted { reason: String },
}

pub type Result<T> = std::result::Result<T, DatabaseError>;
