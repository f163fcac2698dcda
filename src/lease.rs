//! Sidecar lease markers.
//!
//! A `<id>.lease` file next to `<id>.vec` records that a live process owns the
//! collection. It is written when a store takes ownership and removed on clean
//! close. A lease still on disk at load time means another process holds the
//! collection or a previous one crashed.

use crate::error::{Result, VecDbError};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

pub const DATA_EXTENSION: &str = "vec";
pub const LEASE_EXTENSION: &str = "lease";

/// What to do when a collection's lease is already present at load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeasePolicy {
    /// Refuse to load; surfaces as `LeaseHeld`.
    #[default]
    Fail,
    /// Take the lease over and log a warning.
    Reclaim,
}

/// Contents of a lease file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaseRecord {
    pub pid: u32,
    /// Seconds since the unix epoch.
    pub acquired_at: u64,
}

impl LeaseRecord {
    pub fn current() -> LeaseRecord {
        let acquired_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        LeaseRecord { pid: std::process::id(), acquired_at }
    }
}

/// What [`read`] found on disk for a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeaseState {
    Absent,
    /// A lease file exists. The record is `None` when the file can't be parsed.
    Held(Option<LeaseRecord>),
}

pub fn data_path(dir: &Path, id: &str) -> PathBuf {
    dir.join(format!("{}.{}", id, DATA_EXTENSION))
}

pub fn lease_path(dir: &Path, id: &str) -> PathBuf {
    dir.join(format!("{}.{}", id, LEASE_EXTENSION))
}

/// Writes a lease for `id` owned by the current process.
///
/// Fails with `LeaseHeld` if a lease file already exists; an existing lease
/// is never overwritten.
pub fn acquire(dir: &Path, id: &str) -> Result<LeaseRecord> {
    let record = LeaseRecord::current();
    let body = serde_json::to_vec(&record).map_err(std::io::Error::other)?;

    let path = lease_path(dir, id);
    let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            return Err(VecDbError::LeaseHeld { id: id.to_string(), path });
        }
        Err(e) => return Err(e.into()),
    };
    file.write_all(&body)?;
    Ok(record)
}

/// Reads the lease for `id`. An unparsable file still counts as held, with
/// an unknown owner.
pub fn read(dir: &Path, id: &str) -> Result<LeaseState> {
    match std::fs::read(lease_path(dir, id)) {
        Ok(bytes) => Ok(LeaseState::Held(serde_json::from_slice(&bytes).ok())),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(LeaseState::Absent),
        Err(e) => Err(e.into()),
    }
}

/// Removes the lease for `id`. A missing lease is not an error.
pub fn release(dir: &Path, id: &str) -> Result<()> {
    match std::fs::remove_file(lease_path(dir, id)) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}
