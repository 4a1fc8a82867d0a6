//! Raw tabular input and its loaders
//!
//! [`RawDataset`] is the hand-off point from ingestion: named columns of
//! possibly-missing cells, in file order, with no interpretation applied yet.
//! [`DataLoader`] builds one from CSV (via polars) or from an existing
//! `DataFrame`; [`DatasetCache`] memoizes loads by content fingerprint.

use crate::error::{ForecastError, Result};
use polars::prelude::*;
use std::collections::hash_map::DefaultHasher;
use std::collections::{HashMap, VecDeque};
use std::fs;
use std::hash::{Hash, Hasher};
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// A single raw column
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    /// Text cells, e.g. timestamps or prices with missing-value markers
    Text(Vec<Option<String>>),
    /// Numeric cells
    Numeric(Vec<Option<f64>>),
}

impl Column {
    /// Build a text column from string slices
    pub fn text<S: AsRef<str>>(cells: &[Option<S>]) -> Self {
        Column::Text(
            cells
                .iter()
                .map(|c| c.as_ref().map(|s| s.as_ref().to_string()))
                .collect(),
        )
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        match self {
            Column::Text(cells) => cells.len(),
            Column::Numeric(cells) => cells.len(),
        }
    }

    /// Whether the column has no cells
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn hash_into<H: Hasher>(&self, state: &mut H) {
        match self {
            Column::Text(cells) => {
                0u8.hash(state);
                cells.hash(state);
            }
            Column::Numeric(cells) => {
                1u8.hash(state);
                for cell in cells {
                    cell.map(f64::to_bits).hash(state);
                }
            }
        }
    }
}

/// Named columns of equal length, in source row order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawDataset {
    columns: Vec<(String, Column)>,
}

impl RawDataset {
    /// Create an empty dataset
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a column. All columns must have the same length.
    pub fn with_column(mut self, name: impl Into<String>, column: Column) -> Result<Self> {
        let name = name.into();
        if let Some((other, existing)) = self.columns.iter().find(|(n, _)| *n != name) {
            if existing.len() != column.len() {
                return Err(ForecastError::InvalidSpec(format!(
                    "Column '{}' has {} rows but column '{}' has {}",
                    name,
                    column.len(),
                    other,
                    existing.len()
                )));
            }
        }

        match self.columns.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = column,
            None => self.columns.push((name, column)),
        }
        Ok(self)
    }

    /// Look up a column by name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, column)| column)
    }

    /// Column names in insertion order
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.columns.first().map_or(0, |(_, c)| c.len())
    }

    /// Whether the dataset has no rows
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Content fingerprint of names and cells.
    ///
    /// Only meaningful within one process; do not persist it.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        for (name, column) in &self.columns {
            name.hash(&mut hasher);
            column.hash_into(&mut hasher);
        }
        hasher.finish()
    }
}

/// Data loader for raw price tables
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load a CSV file with a header row
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<RawDataset> {
        let bytes = fs::read(path)?;
        Self::from_csv_bytes(&bytes)
    }

    /// Parse CSV content held in memory
    pub fn from_csv_bytes(bytes: &[u8]) -> Result<RawDataset> {
        let df = CsvReader::new(Cursor::new(bytes.to_vec()))
            .infer_schema(None)
            .has_header(true)
            .finish()?;

        Self::from_dataframe(&df)
    }

    /// Convert an existing DataFrame, keeping every column.
    ///
    /// Text and temporal columns become [`Column::Text`]; numeric columns are
    /// cast to `f64`.
    pub fn from_dataframe(df: &DataFrame) -> Result<RawDataset> {
        let mut dataset = RawDataset::new();
        for series in df.get_columns() {
            let column = Self::convert_series(series)?;
            dataset = dataset.with_column(series.name(), column)?;
        }

        debug!(
            rows = dataset.len(),
            columns = dataset.column_names().len(),
            "loaded raw dataset"
        );
        Ok(dataset)
    }

    fn convert_series(series: &Series) -> Result<Column> {
        if series.dtype().is_numeric() {
            let floats = series.cast(&DataType::Float64)?;
            return Ok(Column::Numeric(floats.f64()?.into_iter().collect()));
        }

        let text = match series.dtype() {
            DataType::Utf8 => series.clone(),
            _ => series.cast(&DataType::Utf8)?,
        };
        Ok(Column::Text(
            text.utf8()?
                .into_iter()
                .map(|cell| cell.map(str::to_string))
                .collect(),
        ))
    }
}

/// Memoizes parsed datasets by the fingerprint of their raw bytes.
///
/// The cache belongs to whoever does the ingestion; nothing in the analysis
/// core consults it. It holds at most `capacity` datasets and evicts the
/// least recently used one when full.
#[derive(Debug)]
pub struct DatasetCache {
    entries: HashMap<u64, Arc<RawDataset>>,
    /// Fingerprints from least to most recently used
    recency: VecDeque<u64>,
    capacity: usize,
    hits: usize,
    misses: usize,
}

impl Default for DatasetCache {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            recency: VecDeque::new(),
            capacity: Self::DEFAULT_CAPACITY,
            hits: 0,
            misses: 0,
        }
    }
}

impl DatasetCache {
    /// Datasets kept by [`new`](Self::new)
    pub const DEFAULT_CAPACITY: usize = 16;

    /// Create an empty cache holding up to [`DEFAULT_CAPACITY`](Self::DEFAULT_CAPACITY) datasets
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty cache holding up to `capacity` datasets
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(ForecastError::InvalidSpec(
                "Dataset cache capacity must be positive".to_string(),
            ));
        }
        Ok(Self {
            capacity,
            ..Self::default()
        })
    }

    /// Maximum number of cached datasets
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn touch(&mut self, fingerprint: u64) {
        self.recency.retain(|key| *key != fingerprint);
        self.recency.push_back(fingerprint);
    }

    /// Fingerprint of raw input bytes
    pub fn fingerprint(bytes: &[u8]) -> u64 {
        let mut hasher = DefaultHasher::new();
        bytes.hash(&mut hasher);
        hasher.finish()
    }

    /// Parse CSV bytes unless identical content was parsed before.
    ///
    /// Returns the fingerprint together with the shared dataset.
    pub fn load_csv_bytes(&mut self, bytes: &[u8]) -> Result<(u64, Arc<RawDataset>)> {
        let key = Self::fingerprint(bytes);
        if let Some(dataset) = self.entries.get(&key).cloned() {
            self.hits += 1;
            self.touch(key);
            debug!(fingerprint = key, "dataset cache hit");
            return Ok((key, dataset));
        }

        self.misses += 1;
        let dataset = Arc::new(DataLoader::from_csv_bytes(bytes)?);
        if self.entries.len() >= self.capacity {
            if let Some(evicted) = self.recency.pop_front() {
                self.entries.remove(&evicted);
                debug!(fingerprint = evicted, "dataset cache eviction");
            }
        }
        self.entries.insert(key, Arc::clone(&dataset));
        self.touch(key);
        Ok((key, dataset))
    }

    /// Read a file and load it through the cache; a changed file gets a new entry
    pub fn load_csv<P: AsRef<Path>>(&mut self, path: P) -> Result<(u64, Arc<RawDataset>)> {
        let bytes = fs::read(path)?;
        self.load_csv_bytes(&bytes)
    }

    /// Cached dataset for a fingerprint
    pub fn get(&self, fingerprint: u64) -> Option<Arc<RawDataset>> {
        self.entries.get(&fingerprint).cloned()
    }

    /// Drop one entry; returns whether it existed
    pub fn invalidate(&mut self, fingerprint: u64) -> bool {
        self.recency.retain(|key| *key != fingerprint);
        self.entries.remove(&fingerprint).is_some()
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        self.entries.clear();
        self.recency.clear();
    }

    /// Number of cached datasets
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(hits, misses)` since creation
    pub fn stats(&self) -> (usize, usize) {
        (self.hits, self.misses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mismatched_column_lengths_rejected() {
        let result = RawDataset::new()
            .with_column("date", Column::text(&[Some("2023-01-01")]))
            .and_then(|d| d.with_column("price", Column::Numeric(vec![Some(1.0), None])));
        assert!(matches!(result, Err(ForecastError::InvalidSpec(_))));
    }

    #[test]
    fn test_fingerprint_tracks_content() {
        let a = RawDataset::new()
            .with_column("price", Column::Numeric(vec![Some(1.0), None]))
            .unwrap();
        let b = RawDataset::new()
            .with_column("price", Column::Numeric(vec![Some(1.0), None]))
            .unwrap();
        let c = RawDataset::new()
            .with_column("price", Column::Numeric(vec![Some(1.5), None]))
            .unwrap();

        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_ne!(a.fingerprint(), c.fingerprint());
    }

    #[test]
    fn test_replacing_a_column_keeps_order() {
        let dataset = RawDataset::new()
            .with_column("date", Column::text(&[Some("2023-01-01")]))
            .unwrap()
            .with_column("price", Column::Numeric(vec![Some(1.0)]))
            .unwrap()
            .with_column("date", Column::text(&[Some("2023-01-02")]))
            .unwrap();

        assert_eq!(dataset.column_names(), vec!["date", "price"]);
        assert_eq!(dataset.len(), 1);
    }
}
