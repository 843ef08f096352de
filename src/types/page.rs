use std::sync::Arc;

use crate::{
    types::{
        PAGE_HEADER_SIZE, PAGE_SIZE, SLOT_DIRECTORY_ENTRY_SIZE, SlotNumber,
        error::{DatabaseError, Result},
        page_id::HeapPageId,
        record_id::RecordId,
        row::Row,
        schema::Schema,
    },
    utils::hash::{calculate_page_checksum, verify_page_checksum},
};

/*
 * Heap Page Layout on Disk (Slotted Page Structure)
 * ┌─────────────────────────────────────────────────────────────────┐
 * │                    PAGE HEADER (16 bytes)                       │
 * │  slot_count(2) | free_space_offset(2) | checksum(4) |          │
 * │  reserved(8)                                                    │
 * ├─────────────────────────────────────────────────────────────────┤
 * │                  SLOT DIRECTORY                                 │
 * │  [slot0: offset(2)|len(2)] [slot1: offset(2)|len(2)] ...       │
 * ├─────────────────────────────────────────────────────────────────┤
 * │                    FREE SPACE                                   │
 * ├─────────────────────────────────────────────────────────────────┤
 * │                   CELL DATA                                     │
 * │  [...cell N...] [...cell 2...] [...cell 1...] [...cell 0...]   │
 * └─────────────────────────────────────────────────────────────────┘
 *
 * A slot with length 0 is empty. The checksum covers everything after the
 * header. A page of all zero bytes has never been written and is empty.
 */

#[derive(Debug, Clone, PartialEq)]
pub struct HeapPage {
    page_id: HeapPageId,
    schema: Arc<Schema>,
    slots: Vec<Option<Row>>,
}

impl HeapPage {
    pub fn new(page_id: HeapPageId, schema: Arc<Schema>) -> Self {
        Self {
            page_id,
            schema,
            slots: Vec::new(),
        }
    }

    pub fn id(&self) -> HeapPageId {
        self.page_id
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Builds a page from the raw bytes read at `page_id`'s offset.
    pub fn from_bytes(page_id: HeapPageId, bytes: &[u8], schema: Arc<Schema>) -> Result<Self> {
        if bytes.len() != PAGE_SIZE {
            return Err(DatabaseError::InvalidPageSize {
                expected: PAGE_SIZE,
                actual: bytes.len(),
            });
        }
        if bytes.iter().all(|byte| *byte == 0) {
            return Ok(Self::new(page_id, schema));
        }

        let corrupted = |reason: String| DatabaseError::CorruptedPage {
            table_id: page_id.table_id(),
            page_number: page_id.page_number(),
            reason,
        };

        let slot_count = u16::from_le_bytes([bytes[0], bytes[1]]) as usize;
        let free_space_offset = u16::from_le_bytes([bytes[2], bytes[3]]) as usize;
        let checksum = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);

        let directory_end = PAGE_HEADER_SIZE + slot_count * SLOT_DIRECTORY_ENTRY_SIZE;
        if directory_end > PAGE_SIZE {
            return Err(corrupted(format!(
                "Slot directory of {} entries extends beyond page boundary",
                slot_count
            )));
        }
        if free_space_offset < directory_end || free_space_offset > PAGE_SIZE {
            return Err(corrupted(format!(
                "Invalid free_space_offset: {}",
                free_space_offset
            )));
        }
        if !verify_page_checksum(&bytes[PAGE_HEADER_SIZE..], checksum) {
            return Err(corrupted("Checksum mismatch".to_string()));
        }

        let mut cells = Vec::with_capacity(slot_count);
        for slot in 0..slot_count {
            let entry = PAGE_HEADER_SIZE + slot * SLOT_DIRECTORY_ENTRY_SIZE;
            let offset = u16::from_le_bytes([bytes[entry], bytes[entry + 1]]) as usize;
            let length = u16::from_le_bytes([bytes[entry + 2], bytes[entry + 3]]) as usize;
            if length == 0 {
                cells.push(None);
                continue;
            }
            if offset < free_space_offset || offset + length > PAGE_SIZE {
                return Err(corrupted(format!(
                    "Slot {} at offset {} with length {} exceeds cell area",
                    slot, offset, length
                )));
            }
            cells.push(Some(offset..offset + length));
        }

        // Occupied cells must not overlap.
        let mut ranges: Vec<_> = cells.iter().flatten().collect();
        ranges.sort_by_key(|range| range.start);
        if let Some(pair) = ranges.windows(2).find(|pair| pair[0].end > pair[1].start) {
            return Err(corrupted(format!(
                "Cells at {:?} and {:?} overlap",
                pair[0], pair[1]
            )));
        }

        let mut page = Self::new(page_id, schema);
        page.slots.reserve(slot_count);
        for (slot, cell) in cells.into_iter().enumerate() {
            let Some(range) = cell else {
                page.slots.push(None);
                continue;
            };
            let mut row = Row::from_bytes(page.schema.clone(), &bytes[range])?;
            row.set_record_id(Some(RecordId::new(page_id, slot as SlotNumber)));
            page.slots.push(Some(row));
        }
        Ok(page)
    }

    /// Serializes the page following the documented layout. Cells are packed
    /// against the end of the page in slot order.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buffer = vec![0u8; PAGE_SIZE];
        let mut cell_offset = PAGE_SIZE;

        for (slot, row) in self.slots.iter().enumerate() {
            let entry = PAGE_HEADER_SIZE + slot * SLOT_DIRECTORY_ENTRY_SIZE;
            let (offset, length) = match row {
                Some(row) => {
                    let cell = row.to_bytes();
                    cell_offset -= cell.len();
                    buffer[cell_offset..cell_offset + cell.len()].copy_from_slice(&cell);
                    (cell_offset as u16, cell.len() as u16)
                }
                None => (0, 0),
            };
            buffer[entry..entry + 2].copy_from_slice(&offset.to_le_bytes());
            buffer[entry + 2..entry + 4].copy_from_slice(&length.to_le_bytes());
        }

        buffer[0..2].copy_from_slice(&(self.slots.len() as u16).to_le_bytes());
        buffer[2..4].copy_from_slice(&(cell_offset as u16).to_le_bytes());
        let checksum = calculate_page_checksum(&buffer[PAGE_HEADER_SIZE..]);
        buffer[4..8].copy_from_slice(&checksum.to_le_bytes());
        buffer
    }

    pub fn num_slots(&self) -> usize {
        self.slots.len()
    }

    pub fn num_records(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn available_space(&self) -> usize {
        let slot_directory_size = self.slots.len() * SLOT_DIRECTORY_ENTRY_SIZE;
        let used_data_space: usize = self.slots.iter().flatten().map(Row::size).sum();
        PAGE_SIZE - PAGE_HEADER_SIZE - slot_directory_size - used_data_space
    }

    pub fn can_fit(&self, data_size: usize) -> bool {
        let directory_growth = if self.first_empty_slot().is_some() {
            0
        } else {
            SLOT_DIRECTORY_ENTRY_SIZE
        };
        self.available_space() >= data_size + directory_growth
    }

    /// Largest cell an empty page can hold.
    pub fn max_cell_size() -> usize {
        PAGE_SIZE - PAGE_HEADER_SIZE - SLOT_DIRECTORY_ENTRY_SIZE
    }

    /// Places `row` in the first empty slot, or a new one, and stamps it with
    /// its record id.
    pub fn insert_row(&mut self, mut row: Row) -> Result<SlotNumber> {
        if row.schema() != &self.schema {
            return Err(DatabaseError::TypeMismatch {
                expected: self.schema.to_string(),
                actual: row.schema().to_string(),
            });
        }
        if !self.can_fit(row.size()) {
            return Err(DatabaseError::PageFull {
                table_id: self.page_id.table_id(),
                page_number: self.page_id.page_number(),
            });
        }
        let slot = match self.first_empty_slot() {
            Some(slot) => slot,
            None => {
                self.slots.push(None);
                self.slots.len() - 1
            }
        };
        let slot = slot as SlotNumber;
        row.set_record_id(Some(RecordId::new(self.page_id, slot)));
        self.slots[slot as usize] = Some(row);
        Ok(slot)
    }

    pub fn get_row(&self, slot: SlotNumber) -> Option<&Row> {
        self.slots.get(slot as usize).and_then(Option::as_ref)
    }

    /// Records in slot order, skipping empty slots.
    pub fn iter(&self) -> impl Iterator<Item = &Row> {
        self.slots.iter().flatten()
    }

    /// First slot at or after `slot` that holds a record.
    pub fn occupied_slot_from(&self, slot: usize) -> Option<usize> {
        self.slots
            .iter()
            .enumerate()
            .skip(slot)
            .find_map(|(index, row)| row.as_ref().map(|_| index))
    }

    fn first_empty_slot(&self) -> Option<usize> {
        self.slots.iter().position(Option::is_none)
    }
}
