//! Read-only record stores for the pedigree datasets
//!
//! Two flat tables back the engine:
//! - horse name → sire / damsire names ([`HorseStore`])
//! - stallion name → trait vector plus optional surface scores ([`AttributeStore`])
//!
//! Both are loaded fully into memory and never written after load. A reload
//! builds a complete new table and swaps it in one step, so readers see either
//! the old snapshot or the new one, never a mix.
//!
//! # Example
//!
//! ```rust
//! use bloodline::attributes::TraitVector;
//! use bloodline::store::{AttributeRecord, AttributeStore, RecordStore};
//!
//! let store = AttributeStore::from_records(vec![AttributeRecord::new(
//!     "Deep Impact",
//!     TraitVector::from_array([5.0, 4.0, 3.0, 3.0, 2.0, 5.0]),
//! )]);
//!
//! assert!(store.get("Deep Impact").is_some());
//! assert!(store.get("deep impact").is_none());
//! ```

mod csv;

pub use self::csv::CsvRecord;

use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::attributes::TraitVector;
use crate::Result;

/// A dataset row identified by a unique name.
pub trait Record: Send + Sync {
    /// Identity of the record (exact, case-sensitive).
    fn name(&self) -> &str;
}

/// Stallion attribute record: six base traits plus optional surface scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeRecord {
    name: String,
    traits: TraitVector,
    turf: Option<f64>,
    dirt: Option<f64>,
}

impl AttributeRecord {
    /// Create a record without surface scores.
    #[must_use]
    pub fn new(name: impl Into<String>, traits: TraitVector) -> Self {
        Self {
            name: name.into(),
            traits,
            turf: None,
            dirt: None,
        }
    }

    /// Attach precomputed turf/dirt aptitude scores.
    #[must_use]
    pub const fn with_surface(mut self, turf: Option<f64>, dirt: Option<f64>) -> Self {
        self.turf = turf;
        self.dirt = dirt;
        self
    }

    /// Base trait scores.
    #[must_use]
    pub const fn traits(&self) -> &TraitVector {
        &self.traits
    }

    /// Precomputed turf aptitude, if the dataset has one.
    #[must_use]
    pub const fn turf(&self) -> Option<f64> {
        self.turf
    }

    /// Precomputed dirt aptitude, if the dataset has one.
    #[must_use]
    pub const fn dirt(&self) -> Option<f64> {
        self.dirt
    }
}

impl Record for AttributeRecord {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Horse record: names of the sire and the damsire.
///
/// Parent names are foreign keys into the [`AttributeStore`] and are not
/// guaranteed to resolve; a blank cell in the dataset is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HorseRecord {
    name: String,
    sire: Option<String>,
    damsire: Option<String>,
}

impl HorseRecord {
    /// Create a horse record with both parents known.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        sire: impl Into<String>,
        damsire: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            sire: Some(sire.into()),
            damsire: Some(damsire.into()),
        }
    }

    /// Create a horse record where either parent may be unknown.
    #[must_use]
    pub fn with_parents(
        name: impl Into<String>,
        sire: Option<String>,
        damsire: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            sire,
            damsire,
        }
    }

    /// Sire name, if recorded.
    #[must_use]
    pub fn sire(&self) -> Option<&str> {
        self.sire.as_deref()
    }

    /// Damsire (maternal grandsire) name, if recorded.
    #[must_use]
    pub fn damsire(&self) -> Option<&str> {
        self.damsire.as_deref()
    }
}

impl Record for HorseRecord {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Read-only lookup by exact name.
///
/// This is the seam the analyzer is generic over, so tests can hand it
/// in-memory fixtures instead of loaded datasets.
pub trait RecordStore: Send + Sync {
    /// Record type held by the store.
    type Record: Record;

    /// Get a record by exact name. Returns `None` if absent.
    fn get(&self, name: &str) -> Option<Arc<Self::Record>>;

    /// Number of records.
    fn len(&self) -> usize;

    /// Check if a name exists.
    fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Check if the store is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<S: RecordStore> RecordStore for Arc<S> {
    type Record = S::Record;

    fn get(&self, name: &str) -> Option<Arc<Self::Record>> {
        (**self).get(name)
    }

    fn len(&self) -> usize {
        (**self).len()
    }
}

/// One immutable generation of a table.
#[derive(Debug)]
pub struct Snapshot<R> {
    records: FxHashMap<String, Arc<R>>,
    loaded_at: DateTime<Utc>,
}

impl<R: Record> Snapshot<R> {
    fn build(records: impl IntoIterator<Item = R>) -> Self {
        let mut table: FxHashMap<String, Arc<R>> = FxHashMap::default();
        for record in records {
            let name = record.name().to_string();
            if table.contains_key(&name) {
                // First row wins, same as a first-match dataset lookup.
                tracing::warn!(name = %name, "duplicate record name ignored");
                continue;
            }
            table.insert(name, Arc::new(record));
        }
        Self {
            records: table,
            loaded_at: Utc::now(),
        }
    }

    /// Get a record by exact name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<R>> {
        self.records.get(name)
    }

    /// Number of records in this generation.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if this generation is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// When this generation was built.
    #[must_use]
    pub const fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }
}

/// In-memory, read-only record table with atomic whole-table reload.
///
/// Lookups clone the current snapshot `Arc` and release the lock
/// immediately; [`replace`](Self::replace) swaps in a fully built table.
#[derive(Debug)]
pub struct MemoryStore<R> {
    current: RwLock<Arc<Snapshot<R>>>,
}

/// Stallion name → attribute record.
pub type AttributeStore = MemoryStore<AttributeRecord>;

/// Horse name → parent names.
pub type HorseStore = MemoryStore<HorseRecord>;

impl<R: Record> MemoryStore<R> {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::from_records(Vec::new())
    }

    /// Create a store from in-memory records.
    #[must_use]
    pub fn from_records(records: impl IntoIterator<Item = R>) -> Self {
        Self {
            current: RwLock::new(Arc::new(Snapshot::build(records))),
        }
    }

    /// Current table generation.
    #[must_use]
    pub fn snapshot(&self) -> Arc<Snapshot<R>> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Swap in a new table built from `records`.
    ///
    /// The new table is built before the lock is taken; readers never
    /// observe a partially loaded table.
    pub fn replace(&self, records: impl IntoIterator<Item = R>) {
        let next = Arc::new(Snapshot::build(records));
        tracing::info!(records = next.len(), "store reloaded");
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *guard = next;
    }

    /// When the current table was built.
    #[must_use]
    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.snapshot().loaded_at()
    }
}

impl<R: CsvRecord> MemoryStore<R> {
    /// Load a store from a CSV dataset.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or lacks required columns.
    pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let records = csv::read_records::<R, _>(path)?;
        Ok(Self::from_records(records))
    }

    /// Re-read the CSV dataset and swap it in atomically.
    ///
    /// On error the current table is left untouched.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or lacks required columns.
    pub fn reload_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let records = csv::read_records::<R, _>(path)?;
        self.replace(records);
        Ok(())
    }
}

impl<R: Record> Default for MemoryStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> RecordStore for MemoryStore<R> {
    type Record = R;

    fn get(&self, name: &str) -> Option<Arc<R>> {
        self.snapshot().get(name).cloned()
    }

    fn len(&self) -> usize {
        self.snapshot().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stallion(name: &str, speed: f64) -> AttributeRecord {
        AttributeRecord::new(
            name,
            TraitVector::from_array([speed, 3.0, 3.0, 3.0, 3.0, 3.0]),
        )
    }

    #[test]
    fn test_memory_store_get() {
        let store = AttributeStore::from_records(vec![stallion("A", 4.0), stallion("B", 2.0)]);

        assert_eq!(store.len(), 2);
        assert!(store.contains("A"));
        assert_eq!(store.get("B").unwrap().name(), "B");
        assert!(store.get("C").is_none());
    }

    #[test]
    fn test_memory_store_lookup_is_case_sensitive() {
        let store = HorseStore::from_records(vec![HorseRecord::new("Equinox", "Kitasan", "King")]);

        assert!(store.get("Equinox").is_some());
        assert!(store.get("equinox").is_none());
        assert!(store.get("Equinox ").is_none());
    }

    #[test]
    fn test_memory_store_duplicate_keeps_first() {
        let store = AttributeStore::from_records(vec![stallion("A", 4.0), stallion("A", 1.0)]);

        assert_eq!(store.len(), 1);
        let record = store.get("A").unwrap();
        assert_eq!(record.traits().value(crate::attributes::TraitKey::Speed), Some(4.0));
    }

    #[test]
    fn test_memory_store_default_is_empty() {
        let store: HorseStore = HorseStore::default();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_replace_swaps_whole_table() {
        let store = AttributeStore::from_records(vec![stallion("A", 4.0), stallion("B", 2.0)]);
        let before = store.snapshot();

        store.replace(vec![stallion("C", 5.0)]);

        // Old snapshot is still intact for anyone holding it
        assert_eq!(before.len(), 2);
        assert!(before.get("A").is_some());

        assert_eq!(store.len(), 1);
        assert!(store.get("A").is_none());
        assert!(store.get("C").is_some());
        assert!(store.loaded_at() >= before.loaded_at());
    }

    #[test]
    fn test_arc_store_delegates() {
        let store = Arc::new(HorseStore::from_records(vec![HorseRecord::new("X", "S", "D")]));
        assert_eq!(RecordStore::len(&store), 1);
        assert!(RecordStore::get(&store, "X").is_some());
    }

    #[test]
    fn test_horse_record_optional_parents() {
        let horse = HorseRecord::with_parents("X", Some("S".into()), None);
        assert_eq!(horse.sire(), Some("S"));
        assert_eq!(horse.damsire(), None);
    }

    #[test]
    fn test_attribute_record_surface() {
        let record = stallion("A", 4.0).with_surface(Some(4.5), None);
        assert_eq!(record.turf(), Some(4.5));
        assert_eq!(record.dirt(), None);
    }
}
