use std::fmt;

use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::types::{
    SlotNumber,
    error::Result,
    page_id::{HeapPageId, decode_identity, encode_identity},
};

/// Address of one stored record: the page holding it and its slot there.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Encode, Decode,
)]
pub struct RecordId {
    page_id: HeapPageId,
    slot: SlotNumber,
}

impl RecordId {
    pub fn new(page_id: HeapPageId, slot: SlotNumber) -> Self {
        Self { page_id, slot }
    }

    pub fn page_id(&self) -> HeapPageId {
        self.page_id
    }

    pub fn slot(&self) -> SlotNumber {
        self.slot
    }

    pub fn serialize(&self) -> Result<Vec<u8>> {
        encode_identity(self)
    }

    pub fn deserialize(bytes: &[u8]) -> Result<Self> {
        decode_identity(bytes)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.page_id, self.slot)
    }
}
