//! Paged heap-table storage: page and record addressing, raw page reads from
//! table files, and a restartable sequential scan through a page cache.

pub mod executor;
pub mod storage;
pub mod types;
pub mod utils;
