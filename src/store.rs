//! The collection store module
//! Owns every named collection in a data directory, with load/flush and lease handling

use crate::config::Config;
use crate::error::{Result, VecDbError};
use crate::lease::{self, LeasePolicy, LeaseState, DATA_EXTENSION, LEASE_EXTENSION};
use crate::table::VectorTable;
use indexmap::IndexMap;
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

const GENERATED_ID_LEN: usize = 12;
const MAX_ID_LEN: usize = 64;

/// A named [`VectorTable`].
#[derive(Debug, Clone, PartialEq)]
pub struct Collection {
    id: String,
    table: VectorTable,
}

impl Collection {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn table(&self) -> &VectorTable {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut VectorTable {
        &mut self.table
    }
}

/// Collection ids double as file stems: 1-64 characters of `[A-Za-z0-9_-]`.
pub fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_ID_LEN
        && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// All collections persisted in one directory, owned by this process.
///
/// Loading takes a lease on every collection; [`close`](CollectionStore::close)
/// flushes them and gives the leases back. Dropping an unclosed store closes it
/// on a best-effort basis.
#[derive(Debug)]
pub struct CollectionStore {
    dir: PathBuf,
    collections: BTreeMap<String, Collection>,
    persist_on_write: bool,
    id_counter: u64,
    reclaimed: Vec<String>,
    orphaned: Vec<String>,
    released: bool,
}

impl CollectionStore {
    /// Loads the store described by `config`.
    pub fn open(config: &Config) -> Result<Self> {
        Self::load(&config.data_dir, config.lease_policy, config.persist_on_write)
    }

    /// Scans `dir` for `*.vec` files and loads each one as a collection named
    /// after the file stem.
    ///
    /// The directory is created if missing. Nothing is leased or removed until
    /// every lease has been checked and every file decoded, so a failed load
    /// leaves the directory as it found it.
    ///
    /// # Errors
    ///
    /// * `DirectoryUnavailable` - `dir` cannot be created or listed
    /// * `LeaseHeld` - a lease exists and `policy` is [`LeasePolicy::Fail`]
    /// * `CorruptData` - a collection file cannot be decoded
    pub fn load(dir: &Path, policy: LeasePolicy, persist_on_write: bool) -> Result<Self> {
        let unavailable = |source| VecDbError::DirectoryUnavailable { path: dir.to_path_buf(), source };

        std::fs::create_dir_all(dir).map_err(unavailable)?;

        let mut data_ids = BTreeSet::new();
        let mut lease_ids = BTreeSet::new();
        let mut interrupted = Vec::new();
        for entry in std::fs::read_dir(dir).map_err(unavailable)? {
            let path = entry.map_err(unavailable)?.path();
            if !path.is_file() {
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };

            if name.ends_with(&format!(".{}.tmp", DATA_EXTENSION)) {
                interrupted.push(path);
                continue;
            }

            let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
            let extension = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
            if extension != DATA_EXTENSION && extension != LEASE_EXTENSION {
                continue;
            }
            if !is_valid_id(stem) {
                tracing::warn!(path = ?path, "ignoring file with invalid collection id");
                continue;
            }
            if extension == DATA_EXTENSION {
                data_ids.insert(stem.to_string());
            } else {
                lease_ids.insert(stem.to_string());
            }
        }

        let mut reclaimed = Vec::new();
        let mut orphaned = Vec::new();
        for id in &lease_ids {
            if policy == LeasePolicy::Fail {
                return Err(VecDbError::LeaseHeld { id: id.clone(), path: lease::lease_path(dir, id) });
            }
            let owner = match lease::read(dir, id)? {
                LeaseState::Held(owner) => owner,
                LeaseState::Absent => None,
            };
            if data_ids.contains(id) {
                tracing::warn!(collection = %id, owner = ?owner, "reclaiming stale lease");
                reclaimed.push(id.clone());
            } else {
                tracing::warn!(collection = %id, owner = ?owner, "lease without data file, collection was never flushed");
                orphaned.push(id.clone());
            }
        }

        let mut collections = BTreeMap::new();
        for id in data_ids {
            let table = VectorTable::load(&lease::data_path(dir, &id))?;
            collections.insert(id.clone(), Collection { id, table });
        }

        for path in &interrupted {
            tracing::warn!(path = ?path, "removing interrupted write");
            std::fs::remove_file(path)?;
        }
        for id in orphaned.iter().chain(&reclaimed) {
            lease::release(dir, id)?;
        }
        acquire_all(dir, collections.keys())?;

        tracing::info!(dir = ?dir, collections = collections.len(), "collection store loaded");

        Ok(CollectionStore {
            dir: dir.to_path_buf(),
            collections,
            persist_on_write,
            id_counter: 0,
            reclaimed,
            orphaned,
            released: false,
        })
    }

    /// Creates a new collection and returns its id.
    ///
    /// Without an explicit id a short hex id is generated, regenerating on
    /// collision. With `initial_data` the collection starts populated.
    ///
    /// # Errors
    ///
    /// * `InvalidId` - the explicit id is not a valid collection id
    /// * `DuplicateId` - the explicit id is already taken
    /// * `DimensionMismatch` - `initial_data` mixes vector lengths
    pub fn create(
        &mut self,
        id: Option<String>,
        initial_data: Option<IndexMap<String, Vec<f32>>>,
    ) -> Result<String> {
        let id = match id {
            Some(id) => {
                if !is_valid_id(&id) {
                    return Err(VecDbError::InvalidId(id));
                }
                if self.collections.contains_key(&id) {
                    return Err(VecDbError::DuplicateId(id));
                }
                id
            }
            None => self.generate_id(),
        };

        let table = match initial_data {
            Some(data) => VectorTable::from_entries(data)?,
            None => VectorTable::new(),
        };

        lease::acquire(&self.dir, &id)?;
        if self.persist_on_write {
            if let Err(e) = table.save(&lease::data_path(&self.dir, &id)) {
                lease::release(&self.dir, &id)?;
                return Err(e);
            }
        }

        tracing::info!(collection = %id, entries = table.len(), "collection created");
        self.collections.insert(id.clone(), Collection { id: id.clone(), table });

        Ok(id)
    }

    fn generate_id(&mut self) -> String {
        loop {
            self.id_counter += 1;
            let nanos = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos())
                .unwrap_or_default();

            let mut hasher = Sha256::new();
            hasher.update(format!("{:x}-{}", nanos, self.id_counter).as_bytes());
            let id = hex_string(&hasher.finalize())[..GENERATED_ID_LEN].to_string();

            if !self.collections.contains_key(&id) {
                return id;
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&Collection> {
        self.collections.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.collections.contains_key(id)
    }

    /// Applies `mutation` to collection `id`, then writes the collection back
    /// if the store persists on write.
    ///
    /// The collection is written even when `mutation` fails part-way, so disk
    /// never lags behind memory.
    pub fn update<R>(
        &mut self,
        id: &str,
        mutation: impl FnOnce(&mut Collection) -> Result<R>,
    ) -> Result<R> {
        let collection = self
            .collections
            .get_mut(id)
            .ok_or_else(|| VecDbError::collection_not_found(id))?;

        let outcome = mutation(collection);
        if self.persist_on_write {
            collection.table.save(&lease::data_path(&self.dir, id))?;
        }
        outcome
    }

    /// Removes a collection from memory and disk.
    ///
    /// If the data file cannot be removed the collection stays in memory.
    pub fn delete(&mut self, id: &str) -> Result<()> {
        if !self.collections.contains_key(id) {
            return Err(VecDbError::collection_not_found(id));
        }

        match std::fs::remove_file(lease::data_path(&self.dir, id)) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        self.collections.remove(id);
        lease::release(&self.dir, id)?;

        tracing::info!(collection = %id, "collection deleted");
        Ok(())
    }

    /// Collection ids in sorted order.
    pub fn names(&self) -> Vec<String> {
        self.collections.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.collections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Collections whose stale lease was taken over at load.
    pub fn reclaimed_leases(&self) -> &[String] {
        &self.reclaimed
    }

    /// Leases found at load with no data file behind them.
    pub fn orphaned_leases(&self) -> &[String] {
        &self.orphaned
    }

    /// Writes every collection to disk.
    pub fn flush(&self) -> Result<()> {
        for (id, collection) in &self.collections {
            collection.table.save(&lease::data_path(&self.dir, id))?;
        }
        tracing::debug!(dir = ?self.dir, collections = self.collections.len(), "flushed");
        Ok(())
    }

    /// Removes the lease of every owned collection.
    pub fn release_leases(&mut self) -> Result<()> {
        for id in self.collections.keys() {
            lease::release(&self.dir, id)?;
        }
        self.released = true;
        Ok(())
    }

    /// Flushes everything and releases the leases.
    pub fn close(&mut self) -> Result<()> {
        self.flush()?;
        self.release_leases()?;
        tracing::info!(dir = ?self.dir, "collection store closed");
        Ok(())
    }
}

impl Drop for CollectionStore {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(e) = self.close() {
            tracing::warn!(dir = ?self.dir, error = %e, "failed to close collection store");
        }
    }
}

/// Leases every id, or none: a lease that turns out to be held gives back
/// the ones already taken.
fn acquire_all<'a>(dir: &Path, ids: impl IntoIterator<Item = &'a String>) -> Result<()> {
    let mut taken: Vec<&String> = Vec::new();
    for id in ids {
        if let Err(e) = lease::acquire(dir, id) {
            for id in taken {
                if let Err(release_err) = lease::release(dir, id) {
                    tracing::warn!(collection = %id, error = %release_err, "failed to give back lease");
                }
            }
            return Err(e);
        }
        taken.push(id);
    }
    Ok(())
}

fn hex_string(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        out.push_str(&format!("{:02x}", b));
    }
    out
}

#[cfg(test)]
mod store_test {
    use super::*;
    use std::collections::HashSet;

    fn data(entries: &[(&str, &[f32])]) -> IndexMap<String, Vec<f32>> {
        entries.iter().map(|(k, v)| (k.to_string(), v.to_vec())).collect()
    }

    fn open(dir: &Path) -> CollectionStore {
        CollectionStore::load(dir, LeasePolicy::Fail, true).unwrap()
    }

    // ========== Create Tests ==========

    #[test]
    fn test_create_with_id_and_data() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open(dir.path());

        let id = store
            .create(Some("t1".to_string()), Some(data(&[("a", &[1.0, 0.0]), ("b", &[0.0, 1.0])])))
            .unwrap();

        assert_eq!(id, "t1");
        let collection = store.get("t1").unwrap();
        assert_eq!(collection.id(), "t1");
        assert_eq!(collection.table().len(), 2);
        assert!(lease::data_path(dir.path(), "t1").exists());
        assert!(lease::lease_path(dir.path(), "t1").exists());
    }

    #[test]
    fn test_create_duplicate_id() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open(dir.path());

        store.create(Some("t1".to_string()), None).unwrap();
        let result = store.create(Some("t1".to_string()), None);
        assert!(matches!(result, Err(VecDbError::DuplicateId(id)) if id == "t1"));
    }

    #[test]
    fn test_create_invalid_id() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open(dir.path());

        let too_long = "x".repeat(65);
        for bad in ["", "../escape", "a.b", "has space", too_long.as_str()] {
            let result = store.create(Some(bad.to_string()), None);
            assert!(matches!(result, Err(VecDbError::InvalidId(_))), "accepted {:?}", bad);
        }
        assert!(store.is_empty());
    }

    #[test]
    fn test_create_mixed_dimensions_leaves_nothing_behind() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open(dir.path());

        let result = store.create(Some("t1".to_string()), Some(data(&[("a", &[1.0]), ("b", &[1.0, 2.0])])));
        assert!(matches!(result, Err(VecDbError::DimensionMismatch { .. })));
        assert!(!store.contains("t1"));
        assert!(!lease::lease_path(dir.path(), "t1").exists());
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = CollectionStore::load(dir.path(), LeasePolicy::Fail, false).unwrap();

        let mut seen = HashSet::new();
        for _ in 0..200 {
            let id = store.create(None, None).unwrap();
            assert_eq!(id.len(), GENERATED_ID_LEN);
            assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
            assert!(seen.insert(id), "generated a duplicate id");
        }
        assert_eq!(store.len(), 200);
    }

    // ========== Update / Delete Tests ==========

    #[test]
    fn test_update_persists_on_write() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open(dir.path());
        store.create(Some("t1".to_string()), None).unwrap();

        store
            .update("t1", |c| c.table_mut().set("doc".to_string(), vec![0.5, 0.5]))
            .unwrap();

        let on_disk = VectorTable::load(&lease::data_path(dir.path(), "t1")).unwrap();
        assert_eq!(on_disk.get("doc"), Some(&[0.5, 0.5][..]));
    }

    #[test]
    fn test_update_unknown_collection() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open(dir.path());
        let result = store.update("nope", |_| Ok(()));
        assert!(matches!(result, Err(VecDbError::NotFound(_))));
    }

    #[test]
    fn test_delete_removes_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open(dir.path());
        store.create(Some("t1".to_string()), None).unwrap();

        store.delete("t1").unwrap();

        assert!(store.get("t1").is_none());
        assert!(!lease::data_path(dir.path(), "t1").exists());
        assert!(!lease::lease_path(dir.path(), "t1").exists());
    }

    #[test]
    fn test_delete_unknown_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open(dir.path());
        let result = store.delete("does-not-exist");
        assert!(matches!(result, Err(VecDbError::NotFound(_))));
    }

    #[test]
    fn test_names_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open(dir.path());
        for id in ["zeta", "alpha", "mid"] {
            store.create(Some(id.to_string()), None).unwrap();
        }
        assert_eq!(store.names(), vec!["alpha", "mid", "zeta"]);
    }

    // ========== Load / Close Tests ==========

    #[test]
    fn test_close_then_reload() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut store = CollectionStore::load(dir.path(), LeasePolicy::Fail, false).unwrap();
            store.create(Some("t1".to_string()), Some(data(&[("a", &[1.0, 2.0])]))).unwrap();
            store.update("t1", |c| c.table_mut().set("b".to_string(), vec![3.0, 4.0])).unwrap();
            store.close().unwrap();
            assert!(!lease::lease_path(dir.path(), "t1").exists());
        }

        let store = open(dir.path());
        let table = store.get("t1").unwrap().table();
        assert_eq!(table.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(table.get("b"), Some(&[3.0, 4.0][..]));
    }

    #[test]
    fn test_drop_closes() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut store = CollectionStore::load(dir.path(), LeasePolicy::Fail, false).unwrap();
            store.create(Some("t1".to_string()), Some(data(&[("a", &[1.0])]))).unwrap();
        }

        assert!(!lease::lease_path(dir.path(), "t1").exists());
        let store = open(dir.path());
        assert!(store.get("t1").unwrap().table().contains("a"));
    }

    #[test]
    fn test_load_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let store = open(&nested);
        assert!(nested.is_dir());
        assert!(store.is_empty());
    }

    #[test]
    fn test_load_directory_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("not-a-dir");
        std::fs::write(&file, b"").unwrap();

        let result = CollectionStore::load(&file, LeasePolicy::Fail, true);
        match result {
            Err(e) => {
                assert!(matches!(e, VecDbError::DirectoryUnavailable { .. }));
                assert!(e.is_fatal());
            }
            Ok(_) => panic!("Expected DirectoryUnavailable"),
        }
    }

    #[test]
    fn test_load_corrupt_file_fails_loudly() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(lease::data_path(dir.path(), "broken"), b"\x00\x01garbage").unwrap();

        let result = CollectionStore::load(dir.path(), LeasePolicy::Fail, true);
        assert!(matches!(result, Err(VecDbError::CorruptData { .. })));
        // No lease was taken
        assert!(!lease::lease_path(dir.path(), "broken").exists());
    }

    #[test]
    fn test_second_store_sees_lease() {
        let dir = tempfile::tempdir().unwrap();
        let mut first = open(dir.path());
        first.create(Some("t1".to_string()), None).unwrap();

        let result = CollectionStore::load(dir.path(), LeasePolicy::Fail, true);
        assert!(matches!(result, Err(VecDbError::LeaseHeld { ref id, .. }) if id == "t1"));

        first.close().unwrap();
        assert!(CollectionStore::load(dir.path(), LeasePolicy::Fail, true).is_ok());
    }

    #[test]
    fn test_reclaim_stale_lease() {
        let dir = tempfile::tempdir().unwrap();
        VectorTable::new().save(&lease::data_path(dir.path(), "t1")).unwrap();
        std::fs::write(lease::lease_path(dir.path(), "t1"), br#"{"pid":1,"acquired_at":0}"#).unwrap();

        let store = CollectionStore::load(dir.path(), LeasePolicy::Reclaim, true).unwrap();
        assert_eq!(store.reclaimed_leases(), &["t1".to_string()]);
        assert!(store.contains("t1"));

        match lease::read(dir.path(), "t1").unwrap() {
            LeaseState::Held(Some(record)) => assert_eq!(record.pid, std::process::id()),
            other => panic!("Expected a readable lease, got {:?}", other),
        }
    }

    #[test]
    fn test_orphaned_lease_is_reported_and_removed() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(lease::lease_path(dir.path(), "lost"), b"{}").unwrap();

        assert!(matches!(
            CollectionStore::load(dir.path(), LeasePolicy::Fail, true),
            Err(VecDbError::LeaseHeld { .. })
        ));

        let store = CollectionStore::load(dir.path(), LeasePolicy::Reclaim, true).unwrap();
        assert_eq!(store.orphaned_leases(), &["lost".to_string()]);
        assert!(!store.contains("lost"));
        assert!(!lease::lease_path(dir.path(), "lost").exists());
    }

    #[test]
    fn test_load_removes_interrupted_write_and_ignores_strays() {
        let dir = tempfile::tempdir().unwrap();
        let tmp = dir.path().join("t1.vec.tmp");
        std::fs::write(&tmp, b"partial").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"hello").unwrap();
        std::fs::create_dir(dir.path().join("sub.vec")).unwrap();

        let store = open(dir.path());
        assert!(store.is_empty());
        assert!(!tmp.exists());
        assert!(dir.path().join("notes.txt").exists());
    }

    #[test]
    fn test_failed_load_keeps_live_owners_staging_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut first = open(dir.path());
        first.create(Some("t1".to_string()), None).unwrap();
        let tmp = dir.path().join("t1.vec.tmp");
        std::fs::write(&tmp, b"in flight").unwrap();

        let result = CollectionStore::load(dir.path(), LeasePolicy::Fail, true);
        assert!(matches!(result, Err(VecDbError::LeaseHeld { .. })));
        assert!(tmp.exists());

        std::fs::remove_file(&tmp).unwrap();
        first.close().unwrap();
    }

    #[test]
    fn test_reclaim_removes_interrupted_write() {
        let dir = tempfile::tempdir().unwrap();
        VectorTable::new().save(&lease::data_path(dir.path(), "t1")).unwrap();
        std::fs::write(lease::lease_path(dir.path(), "t1"), b"{}").unwrap();
        let tmp = dir.path().join("t1.vec.tmp");
        std::fs::write(&tmp, b"partial").unwrap();

        let store = CollectionStore::load(dir.path(), LeasePolicy::Reclaim, true).unwrap();
        assert!(store.contains("t1"));
        assert!(!tmp.exists());
    }

    #[test]
    fn test_create_refuses_foreign_lease() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open(dir.path());
        // Another process created "t1" after this store loaded
        std::fs::write(lease::lease_path(dir.path(), "t1"), br#"{"pid":1,"acquired_at":0}"#).unwrap();

        let result = store.create(Some("t1".to_string()), None);
        assert!(matches!(result, Err(VecDbError::LeaseHeld { ref id, .. }) if id == "t1"));
        assert!(!store.contains("t1"));
        assert!(!lease::data_path(dir.path(), "t1").exists());

        // The foreign lease is left alone
        store.close().unwrap();
        assert!(lease::lease_path(dir.path(), "t1").exists());
    }

    #[test]
    fn test_acquire_all_gives_back_on_conflict() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(lease::lease_path(dir.path(), "b"), b"{}").unwrap();
        let ids = ["a".to_string(), "b".to_string(), "c".to_string()];

        let result = acquire_all(dir.path(), &ids);
        assert!(matches!(result, Err(VecDbError::LeaseHeld { ref id, .. }) if id == "b"));
        assert!(!lease::lease_path(dir.path(), "a").exists());
        assert!(lease::lease_path(dir.path(), "b").exists());
        assert!(!lease::lease_path(dir.path(), "c").exists());
    }

    #[test]
    fn test_delete_keeps_collection_when_file_removal_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = CollectionStore::load(dir.path(), LeasePolicy::Fail, false).unwrap();
        store.create(Some("t1".to_string()), Some(data(&[("a", &[1.0])]))).unwrap();
        // A directory where the data file should be cannot be removed as a file
        let data_path = lease::data_path(dir.path(), "t1");
        std::fs::create_dir(&data_path).unwrap();

        assert!(matches!(store.delete("t1"), Err(VecDbError::Io(_))));
        assert!(store.contains("t1"));
        assert!(lease::lease_path(dir.path(), "t1").exists());

        std::fs::remove_dir(&data_path).unwrap();
        store.delete("t1").unwrap();
        assert!(!store.contains("t1"));
        assert!(!lease::lease_path(dir.path(), "t1").exists());
    }

    #[test]
    fn test_hex_string() {
        assert_eq!(hex_string(&[0x00, 0xab, 0x10]), "00ab10");
    }

    #[test]
    fn test_is_valid_id() {
        assert!(is_valid_id("t1"));
        assert!(is_valid_id("d54390c9161b"));
        assert!(is_valid_id("my_collection-2"));
        assert!(!is_valid_id("a/b"));
        assert!(!is_valid_id("a.pkl"));
    }
}
