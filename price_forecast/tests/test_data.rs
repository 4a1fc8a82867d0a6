use polars::prelude::*;
use price_forecast::data::{Column, DataLoader, DatasetCache, RawDataset};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_csv(lines: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    file.flush().unwrap();
    file
}

#[test]
fn test_data_loader_from_csv() {
    let file = write_csv(&[
        "date,price",
        "2023-01-01,100.0",
        "2023-01-02,",
        "2023-01-03,108.5",
    ]);

    let data = DataLoader::from_csv(file.path()).unwrap();

    assert_eq!(data.len(), 3);
    assert_eq!(data.column_names(), vec!["date", "price"]);
    assert_eq!(
        data.column("price"),
        Some(&Column::Numeric(vec![Some(100.0), None, Some(108.5)]))
    );
    match data.column("date") {
        Some(Column::Text(cells)) => assert_eq!(cells[0].as_deref(), Some("2023-01-01")),
        other => panic!("expected a text date column, got {:?}", other),
    }
}

#[test]
fn test_text_price_column_kept_as_text() {
    let file = write_csv(&["date,price", "2023-01-01,100.0", "2023-01-02,NA"]);

    let data = DataLoader::from_csv(file.path()).unwrap();

    match data.column("price") {
        Some(Column::Text(cells)) => assert_eq!(cells[1].as_deref(), Some("NA")),
        other => panic!("expected a text price column, got {:?}", other),
    }
}

#[test]
fn test_data_loader_error_handling() {
    assert!(DataLoader::from_csv("nonexistent_file.csv").is_err());
}

#[test]
fn test_from_dataframe_casts_integers() {
    let df = df!(
        "date" => &["2023-01-01", "2023-01-02"],
        "price" => &[100i64, 101]
    )
    .unwrap();

    let data = DataLoader::from_dataframe(&df).unwrap();

    assert_eq!(
        data.column("price"),
        Some(&Column::Numeric(vec![Some(100.0), Some(101.0)]))
    );
}

#[test]
fn test_cache_hits_on_identical_content() {
    let file = write_csv(&["date,price", "2023-01-01,100.0"]);
    let mut cache = DatasetCache::new();

    let (first_key, first) = cache.load_csv(file.path()).unwrap();
    let (second_key, second) = cache.load_csv(file.path()).unwrap();

    assert_eq!(first_key, second_key);
    assert!(std::sync::Arc::ptr_eq(&first, &second));
    assert_eq!(cache.stats(), (1, 1));
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_cache_keys_follow_content() {
    let mut cache = DatasetCache::new();

    let (a, _) = cache
        .load_csv_bytes(b"date,price\n2023-01-01,100.0\n")
        .unwrap();
    let (b, _) = cache
        .load_csv_bytes(b"date,price\n2023-01-01,101.0\n")
        .unwrap();

    assert_ne!(a, b);
    assert_eq!(cache.len(), 2);

    assert!(cache.invalidate(a));
    assert!(!cache.invalidate(a));
    assert!(cache.get(a).is_none());
    assert!(cache.get(b).is_some());

    cache.clear();
    assert!(cache.is_empty());
}

#[test]
fn test_cache_evicts_least_recently_used() {
    let mut cache = DatasetCache::with_capacity(2).unwrap();
    assert_eq!(cache.capacity(), 2);

    let (a, _) = cache.load_csv_bytes(b"date,price\n2023-01-01,1.0\n").unwrap();
    let (b, _) = cache.load_csv_bytes(b"date,price\n2023-01-01,2.0\n").unwrap();
    // Touch `a` so `b` becomes the oldest entry
    cache.load_csv_bytes(b"date,price\n2023-01-01,1.0\n").unwrap();
    let (c, _) = cache.load_csv_bytes(b"date,price\n2023-01-01,3.0\n").unwrap();

    assert_eq!(cache.len(), 2);
    assert!(cache.get(a).is_some());
    assert!(cache.get(b).is_none());
    assert!(cache.get(c).is_some());
    assert_eq!(cache.stats(), (1, 3));

    assert!(DatasetCache::with_capacity(0).is_err());
    assert_eq!(DatasetCache::new().capacity(), DatasetCache::DEFAULT_CAPACITY);
}

#[test]
fn test_programmatic_dataset() {
    let data = RawDataset::new()
        .with_column("date", Column::text(&[Some("2023-01-01"), None]))
        .unwrap()
        .with_column("price", Column::Numeric(vec![Some(1.0), Some(2.0)]))
        .unwrap();

    assert_eq!(data.len(), 2);
    assert!(data.column("volume").is_none());
}
