//! The vector table module
//! Provide get/set/delete over an ordered key -> vector map and its durable encoding

use crate::error::{Result, VecDbError};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::{
    ffi::OsString,
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

const FORMAT_TAG: [u8; 4] = *b"VTBL";
const FORMAT_VERSION: u32 = 1;

#[derive(Serialize)]
struct TableFileRef<'a> {
    tag: [u8; 4],
    version: u32,
    entries: &'a IndexMap<String, Vec<f32>>,
}

#[derive(Deserialize)]
struct TableFile {
    tag: [u8; 4],
    version: u32,
    entries: IndexMap<String, Vec<f32>>,
}

/// In-memory mapping from document key to vector.
///
/// Entries keep insertion order, which is the order they are serialized in
/// and the order ties are broken in during similarity ranking. Every vector
/// in a table has the same length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VectorTable {
    entries: IndexMap<String, Vec<f32>>,
}

impl VectorTable {
    /// Creates a new empty table.
    ///
    /// The table has no dimension until the first vector is set.
    ///
    /// # Examples
    ///
    /// ```
    /// use vecdb::VectorTable;
    ///
    /// let table = VectorTable::new();
    /// assert!(table.is_empty());
    /// assert_eq!(table.dimension(), None);
    /// ```
    pub fn new() -> VectorTable {
        VectorTable { entries: IndexMap::new() }
    }

    /// Builds a table from initial entries, checking that all vectors share
    /// one dimension. A repeated key overwrites the earlier value in place.
    pub fn from_entries<I>(entries: I) -> Result<VectorTable>
    where
        I: IntoIterator<Item = (String, Vec<f32>)>,
    {
        let mut table = VectorTable::new();
        for (key, vector) in entries {
            table.set(key, vector)?;
        }
        Ok(table)
    }

    /// Retrieves the vector stored under `key`, or `None` if the key is unknown.
    pub fn get(&self, key: &str) -> Option<&[f32]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    /// Inserts or overwrites a vector.
    ///
    /// Overwriting keeps the key's original position.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(previous))` - The key existed and its vector was replaced
    /// * `Ok(None)` - The key was new
    /// * `Err(DimensionMismatch)` - The table already holds vectors of a different length
    ///
    /// # Examples
    ///
    /// ```
    /// use vecdb::VectorTable;
    ///
    /// let mut table = VectorTable::new();
    /// assert!(table.set("a".to_string(), vec![1.0, 0.0]).unwrap().is_none());
    /// assert!(table.set("a".to_string(), vec![0.0, 1.0]).unwrap().is_some());
    ///
    /// // Dimension mismatch error
    /// assert!(table.set("b".to_string(), vec![1.0, 2.0, 3.0]).is_err());
    /// ```
    pub fn set(&mut self, key: String, vector: Vec<f32>) -> Result<Option<Vec<f32>>> {
        if let Some(dim) = self.dimension() {
            // A lone entry being overwritten may change the dimension.
            let sole_entry = self.entries.len() == 1 && self.entries.contains_key(&key);
            if vector.len() != dim && !sole_entry {
                return Err(VecDbError::DimensionMismatch { expected: dim, found: vector.len() });
            }
        }

        Ok(self.entries.insert(key, vector))
    }

    /// Removes `key` if present. Removing an unknown key is a no-op.
    ///
    /// The remaining entries keep their relative order.
    pub fn delete(&mut self, key: &str) -> Option<Vec<f32>> {
        self.entries.shift_remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns the number of entries in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Length shared by every vector in the table, `None` while empty.
    pub fn dimension(&self) -> Option<usize> {
        self.entries.values().next().map(Vec::len)
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f32])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Borrows the underlying ordered map.
    pub fn entries(&self) -> &IndexMap<String, Vec<f32>> {
        &self.entries
    }

    /// Serializes the table with bincode.
    ///
    /// The encoding carries a format tag and version followed by the entries in
    /// insertion order. Floats are stored bit-for-bit.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let file = TableFileRef { tag: FORMAT_TAG, version: FORMAT_VERSION, entries: &self.entries };
        bincode::serialize(&file)
            .map_err(|e| VecDbError::Io(std::io::Error::other(format!("Serialization failed: {}", e))))
    }

    /// Decodes bytes produced by [`to_bytes`](VectorTable::to_bytes).
    ///
    /// Fails with `CorruptData` on a wrong tag, unknown version, undecodable
    /// payload or vectors of mixed length.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::decode(bincode::deserialize::<TableFile>(bytes), Path::new("<bytes>"))
    }

    /// Writes the table to `path` atomically.
    ///
    /// The bytes go to `<path>.tmp` first, which is synced and then renamed
    /// over `path`, so a crash mid-write never leaves a truncated table behind.
    pub fn save(&self, path: &Path) -> Result<()> {
        let tmp_path = tmp_path_for(path);

        let file = File::create(&tmp_path)?;
        let mut writer = BufWriter::new(file);
        let contents = TableFileRef { tag: FORMAT_TAG, version: FORMAT_VERSION, entries: &self.entries };
        bincode::serialize_into(&mut writer, &contents)
            .map_err(|e| VecDbError::Io(std::io::Error::other(format!("Serialization failed: {}", e))))?;
        writer.flush()?;
        writer
            .into_inner()
            .map_err(|e| VecDbError::Io(e.into_error()))?
            .sync_all()?;

        std::fs::rename(&tmp_path, path)?;
        sync_parent(path)?;

        Ok(())
    }

    /// Loads a table previously written with [`save`](VectorTable::save).
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        Self::decode(bincode::deserialize_from::<_, TableFile>(reader), path)
    }

    fn decode(raw: bincode::Result<TableFile>, origin: &Path) -> Result<Self> {
        let file = raw.map_err(|e| VecDbError::corrupt(origin, format!("Deserialization failed: {}", e)))?;

        if file.tag != FORMAT_TAG {
            return Err(VecDbError::corrupt(origin, "not a vector table file"));
        }
        if file.version != FORMAT_VERSION {
            return Err(VecDbError::corrupt(origin, format!("unsupported format version {}", file.version)));
        }

        let mut dims = file.entries.values().map(Vec::len);
        if let Some(first) = dims.next() {
            if let Some(bad) = dims.find(|&d| d != first) {
                return Err(VecDbError::corrupt(
                    origin,
                    format!("mixed vector lengths {} and {}", first, bad),
                ));
            }
        }

        Ok(VectorTable { entries: file.entries })
    }
}

/// `<path>.tmp`, the staging file used by [`VectorTable::save`].
pub(crate) fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

pub(crate) fn sync_parent(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                File::open(parent)?.sync_all()?;
            }
        }
    }
    #[cfg(not(unix))]
    let _ = path;
    Ok(())
}
