use std::fmt;

use bincode::{Decode, Encode, config};
use serde::{Deserialize, Serialize};

use crate::types::{
    PageNumber, TableId,
    error::{DatabaseError, Result},
};

/// Identifies one page of one table file.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Encode, Decode,
)]
pub struct HeapPageId {
    table_id: TableId,
    page_number: PageNumber,
}

impl HeapPageId {
    pub fn new(table_id: TableId, page_number: PageNumber) -> Self {
        Self {
            table_id,
            page_number,
        }
    }

    pub fn table_id(&self) -> TableId {
        self.table_id
    }

    pub fn page_number(&self) -> PageNumber {
        self.page_number
    }

    /// Fixed-width encoding suitable for writing the identity to disk.
    pub fn serialize(&self) -> Result<Vec<u8>> {
        encode_identity(self)
    }

    pub fn deserialize(bytes: &[u8]) -> Result<Self> {
        decode_identity(bytes)
    }
}

impl fmt::Display for HeapPageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.table_id, self.page_number)
    }
}

pub(crate) fn encode_identity<T: Encode>(value: &T) -> Result<Vec<u8>> {
    bincode::encode_to_vec(value, config::standard().with_fixed_int_encoding()).map_err(|e| {
        DatabaseError::SerializationError {
            details: e.to_string(),
        }
    })
}

pub(crate) fn decode_identity<T: Decode<()>>(bytes: &[u8]) -> Result<T> {
    let (value, consumed) =
        bincode::decode_from_slice(bytes, config::standard().with_fixed_int_encoding()).map_err(
            |e| DatabaseError::SerializationError {
                details: e.to_string(),
            },
        )?;
    if consumed != bytes.len() {
        return Err(DatabaseError::SerializationError {
            details: format!("{} trailing bytes after identity", bytes.len() - consumed),
        });
    }
    Ok(value)
}
