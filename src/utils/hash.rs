use std::path::Path;

use crc32fast::Hasher;

use crate::types::TableId;

/// CRC-32 over a page body (everything after the page header).
pub fn calculate_page_checksum(body: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(body);
    hasher.finalize()
}

pub fn verify_page_checksum(body: &[u8], expected_checksum: u32) -> bool {
    calculate_page_checksum(body) == expected_checksum
}

/// Table identifier derived from a file path. Distinct paths may collide; the
/// same path always yields the same id.
pub fn table_id_for_path(path: &Path) -> TableId {
    let mut hasher = Hasher::new();
    hasher.update(path.as_os_str().as_encoded_bytes());
    hasher.finalize()
}
