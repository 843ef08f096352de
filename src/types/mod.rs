pub mod error;
pub mod page;
pub mod page_id;
pub mod record_id;
pub mod row;
pub mod schema;
pub mod value;

// Common type aliases
pub type TableId = u32;
pub type PageNumber = u32;
pub type SlotNumber = u16;
pub type TransactionId = u64;

pub const PAGE_SIZE: usize = 4096;
pub const PAGE_HEADER_SIZE: usize = 16; // slot_count(2) + free_space_offset(2) + checksum(4) + reserved(8)
pub const SLOT_DIRECTORY_ENTRY_SIZE: usize = 4; // offset (2 bytes) + length (2 bytes)

// Pages a buffer pool holds when no capacity is given
pub const DEFAULT_POOL_PAGES: usize = 50;
