use std::{sync::Arc, thread};

use tumpuk::{
    storage::{
        buffer_pool::{BufferPool, PageCache, Permissions},
        catalog::Catalog,
        heap_file::HeapFile,
    },
    types::{
        DEFAULT_POOL_PAGES,
        error::DatabaseError,
        page_id::HeapPageId,
        row::Row,
        schema::Schema,
        value::{DataType, Value},
    },
    utils::mock::TempHeapFile,
};

fn test_schema() -> Arc<Schema> {
    Arc::new(Schema::from_pairs([("id", DataType::Integer), ("label", DataType::Text)]).unwrap())
}

fn create_rows(schema: &Arc<Schema>, count: i64) -> Vec<Row> {
    (0..count)
        .map(|id| {
            Row::with_values(
                schema.clone(),
                vec![Value::Integer(id), Value::Text(format!("label_{:05}", id))],
            )
            .unwrap()
        })
        .collect()
}

fn setup_pool(
    temp: &mut TempHeapFile,
    rows: i64,
    capacity: usize,
) -> Result<(Arc<HeapFile>, BufferPool, u32), DatabaseError> {
    let schema = test_schema();
    let (file, pages) = temp.create_with_rows(schema.clone(), create_rows(&schema, rows))?;
    let mut catalog = Catalog::new();
    catalog.add_table("items", file.clone());
    Ok((file, BufferPool::new(Arc::new(catalog), capacity), pages))
}

#[test]
fn test_catalog_lookup() -> Result<(), DatabaseError> {
    let schema = test_schema();
    let mut temp = TempHeapFile::with_prefix("catalog");
    let file = temp.create_with_bytes(schema.clone(), &[])?;

    let mut catalog = Catalog::new();
    let table_id = catalog.add_table("items", file.clone());
    assert_eq!(table_id, file.table_id());
    assert_eq!(catalog.table_id("items"), Some(table_id));
    assert_eq!(catalog.table_name(table_id)?, "items");
    assert_eq!(catalog.schema(table_id)?, &schema);
    assert!(catalog.table_exists("items"));
    assert_eq!(catalog.table_ids(), vec![table_id]);

    // Re-registering the same file under a new name replaces the entry.
    catalog.add_table("renamed", file.clone());
    assert!(!catalog.table_exists("items"));
    assert_eq!(catalog.table_name(table_id)?, "renamed");

    assert!(catalog.remove_table("renamed").is_some());
    assert!(matches!(
        catalog.get_table(table_id),
        Err(DatabaseError::TableNotFound { .. })
    ));
    Ok(())
}

#[test]
fn test_get_page_caches_shared_handles() -> Result<(), DatabaseError> {
    let mut temp = TempHeapFile::with_prefix("pool_shared");
    let (file, pool, pages) = setup_pool(&mut temp, 300, DEFAULT_POOL_PAGES)?;
    assert!(pages >= 2);
    let pid = HeapPageId::new(file.table_id(), 1);

    assert!(!pool.contains_page(pid));
    let first = pool.get_page(1, pid, Permissions::ReadOnly)?;
    let second = pool.get_page(2, pid, Permissions::ReadOnly)?;
    assert!(Arc::ptr_eq(&first, &second));
    assert!(pool.contains_page(pid));
    assert_eq!(pool.cached_pages(), 1);
    assert_eq!(first.id(), pid);
    Ok(())
}

#[test]
fn test_unknown_table_is_reported() -> Result<(), DatabaseError> {
    let mut temp = TempHeapFile::with_prefix("pool_unknown");
    let (file, pool, _) = setup_pool(&mut temp, 10, 4)?;
    let pid = HeapPageId::new(file.table_id().wrapping_add(1), 0);
    assert!(matches!(
        pool.get_page(1, pid, Permissions::ReadOnly),
        Err(DatabaseError::TableNotFound { .. })
    ));
    Ok(())
}

#[test]
fn test_read_write_access_is_refused() -> Result<(), DatabaseError> {
    let mut temp = TempHeapFile::with_prefix("pool_rw");
    let (file, pool, _) = setup_pool(&mut temp, 10, 4)?;
    let pid = HeapPageId::new(file.table_id(), 0);
    assert!(matches!(
        pool.get_page(1, pid, Permissions::ReadWrite),
        Err(DatabaseError::Unsupported { .. })
    ));
    assert!(!pool.contains_page(pid));
    Ok(())
}

#[test]
fn test_pool_reports_exhaustion_without_evicting() -> Result<(), DatabaseError> {
    let mut temp = TempHeapFile::with_prefix("pool_full");
    let (file, pool, pages) = setup_pool(&mut temp, 600, 2)?;
    assert!(pages >= 3);
    let table_id = file.table_id();

    pool.get_page(1, HeapPageId::new(table_id, 0), Permissions::ReadOnly)?;
    pool.get_page(1, HeapPageId::new(table_id, 1), Permissions::ReadOnly)?;
    assert!(matches!(
        pool.get_page(1, HeapPageId::new(table_id, 2), Permissions::ReadOnly),
        Err(DatabaseError::BufferPoolExhausted)
    ));
    // Resident pages are still served.
    assert!(pool.get_page(1, HeapPageId::new(table_id, 0), Permissions::ReadOnly).is_ok());

    assert!(pool.discard_page(HeapPageId::new(table_id, 0)));
    assert!(!pool.discard_page(HeapPageId::new(table_id, 0)));
    assert!(pool.get_page(1, HeapPageId::new(table_id, 2), Permissions::ReadOnly).is_ok());

    pool.clear();
    assert_eq!(pool.cached_pages(), 0);
    Ok(())
}

#[test]
fn test_pool_is_shareable_across_threads() -> Result<(), DatabaseError> {
    let mut temp = TempHeapFile::with_prefix("pool_threads");
    let (file, pool, pages) = setup_pool(&mut temp, 500, DEFAULT_POOL_PAGES)?;
    let pool = Arc::new(pool);
    let table_id = file.table_id();

    let handles: Vec<_> = (0..4)
        .map(|tx| {
            let pool = pool.clone();
            thread::spawn(move || -> Result<usize, DatabaseError> {
                let mut records = 0;
                for page_number in 0..pages {
                    let page = pool.get_page(
                        tx,
                        HeapPageId::new(table_id, page_number),
                        Permissions::ReadOnly,
                    )?;
                    records += page.num_records();
                }
                Ok(records)
            })
        })
        .collect();

    for handle in handles {
        let records = handle.join().expect("reader thread panicked")?;
        assert_eq!(records, 500);
    }
    assert_eq!(pool.cached_pages(), pages as usize);
    Ok(())
}

#[test]
fn test_full_pool_refuses_before_reading_the_file() -> Result<(), DatabaseError> {
    let mut temp = TempHeapFile::with_prefix("pool_full_no_read");
    let (file, pool, pages) = setup_pool(&mut temp, 10, 1)?;
    let table_id = file.table_id();
    pool.get_page(1, HeapPageId::new(table_id, 0), Permissions::ReadOnly)?;

    // The page lies past the end of the file, so a read would fail with an
    // addressing error; the full pool answers first.
    assert!(matches!(
        pool.get_page(1, HeapPageId::new(table_id, pages + 5), Permissions::ReadOnly),
        Err(DatabaseError::BufferPoolExhausted)
    ));
    assert_eq!(pool.cached_pages(), 1);
    Ok(())
}
