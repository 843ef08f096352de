use std::{
    collections::HashMap,
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use serde::{Deserialize, Serialize};

use crate::{
    storage::catalog::Catalog,
    types::{
        DEFAULT_POOL_PAGES, TransactionId,
        error::{DatabaseError, Result},
        page::HeapPage,
        page_id::HeapPageId,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Permissions {
    ReadOnly,
    ReadWrite,
}

/// Source of in-memory pages for scans. Implementations own the page
/// contents; callers only hold shared, immutable handles.
pub trait PageCache {
    /// May block on disk I/O or on the cache's own concurrency control.
    fn get_page(
        &self,
        tx: TransactionId,
        page_id: HeapPageId,
        permissions: Permissions,
    ) -> Result<Arc<HeapPage>>;
}

/// Fixed-capacity page cache over the tables of a [`Catalog`].
///
/// Pages are loaded on first request and kept until discarded. There is no
/// eviction: once `capacity` pages are resident, requests for any other page
/// fail with [`DatabaseError::BufferPoolExhausted`].
#[derive(Debug)]
pub struct BufferPool {
    catalog: Arc<Catalog>,
    capacity: usize,
    pages: RwLock<HashMap<HeapPageId, Arc<HeapPage>>>,
}

impl BufferPool {
    pub fn new(catalog: Arc<Catalog>, capacity: usize) -> Self {
        Self {
            catalog,
            capacity,
            pages: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_default_capacity(catalog: Arc<Catalog>) -> Self {
        Self::new(catalog, DEFAULT_POOL_PAGES)
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn contains_page(&self, page_id: HeapPageId) -> bool {
        self.read_pages().contains_key(&page_id)
    }

    pub fn cached_pages(&self) -> usize {
        self.read_pages().len()
    }

    /// Drops one page from the pool. Handles already given out stay valid.
    pub fn discard_page(&self, page_id: HeapPageId) -> bool {
        self.write_pages().remove(&page_id).is_some()
    }

    pub fn clear(&self) {
        self.write_pages().clear();
    }

    fn load_page(&self, page_id: HeapPageId) -> Result<Arc<HeapPage>> {
        let file = self.catalog.get_table(page_id.table_id())?;
        if self.read_pages().len() >= self.capacity {
            return Err(DatabaseError::BufferPoolExhausted);
        }
        let page = Arc::new(file.read_page(page_id)?);

        let mut pages = self.write_pages();
        // Another reader may have loaded it while we were reading.
        if let Some(page) = pages.get(&page_id) {
            return Ok(page.clone());
        }
        if pages.len() >= self.capacity {
            return Err(DatabaseError::BufferPoolExhausted);
        }
        pages.insert(page_id, page.clone());
        Ok(page)
    }

    fn read_pages(&self) -> RwLockReadGuard<'_, HashMap<HeapPageId, Arc<HeapPage>>> {
        self.pages.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_pages(&self) -> RwLockWriteGuard<'_, HashMap<HeapPageId, Arc<HeapPage>>> {
        self.pages.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl PageCache for BufferPool {
    fn get_page(
        &self,
        _tx: TransactionId,
        page_id: HeapPageId,
        permissions: Permissions,
    ) -> Result<Arc<HeapPage>> {
        if permissions == Permissions::ReadWrite {
            return Err(DatabaseError::Unsupported {
                operation: format!("read-write access to page {}", page_id),
            });
        }
        if let Some(page) = self.read_pages().get(&page_id) {
            return Ok(page.clone());
        }
        self.load_page(page_id)
    }
}
