use std::{collections::HashMap, sync::Arc};

use crate::{
    storage::heap_file::HeapFile,
    types::{
        TableId,
        error::{DatabaseError, Result},
        schema::Schema,
    },
};

#[derive(Debug, Clone)]
struct CatalogEntry {
    name: String,
    file: Arc<HeapFile>,
}

/// Registry of the table files known to the engine, keyed by table id.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    tables: HashMap<TableId, CatalogEntry>,
    names: HashMap<String, TableId>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `file` under `name`. An earlier table with the same name or
    /// the same id is replaced.
    pub fn add_table(&mut self, name: &str, file: Arc<HeapFile>) -> TableId {
        let table_id = file.table_id();
        if let Some(previous) = self.names.remove(name) {
            self.tables.remove(&previous);
        }
        if let Some(previous) = self.tables.remove(&table_id) {
            self.names.remove(&previous.name);
        }
        println!(
            "Registering table '{}' (id {}) at path: {}",
            name,
            table_id,
            file.path().display()
        );
        self.names.insert(name.to_string(), table_id);
        self.tables.insert(
            table_id,
            CatalogEntry {
                name: name.to_string(),
                file,
            },
        );
        table_id
    }

    pub fn get_table(&self, table_id: TableId) -> Result<&Arc<HeapFile>> {
        self.entry(table_id).map(|entry| &entry.file)
    }

    pub fn table_id(&self, name: &str) -> Option<TableId> {
        self.names.get(name).copied()
    }

    pub fn table_name(&self, table_id: TableId) -> Result<&str> {
        self.entry(table_id).map(|entry| entry.name.as_str())
    }

    pub fn schema(&self, table_id: TableId) -> Result<&Arc<Schema>> {
        self.entry(table_id).map(|entry| entry.file.schema())
    }

    pub fn table_ids(&self) -> Vec<TableId> {
        self.tables.keys().copied().collect()
    }

    pub fn table_exists(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    pub fn remove_table(&mut self, name: &str) -> Option<Arc<HeapFile>> {
        let table_id = self.names.remove(name)?;
        self.tables.remove(&table_id).map(|entry| entry.file)
    }

    fn entry(&self, table_id: TableId) -> Result<&CatalogEntry> {
        self.tables
            .get(&table_id)
            .ok_or(DatabaseError::TableNotFound { table_id })
    }
}
