// Captured-color history: most-recent-first, bounded, deduplicated by hex,
// and written through a durable key-value collaborator on every mutation.
// The on-disk value is a JSON array of entries under a fixed key, the same
// blob shape the store hands back on startup.

use crate::color::{hex_to_rgb, ColorSample};
use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Durable key-value collaborator. `load` returns `None` for a key that was
/// never written; the manager treats that as an empty history.
pub trait HistoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, Error>;
    fn save(&self, key: &str, payload: &str) -> Result<(), Error>;
}

/// One `<key>.json` file per key under a directory.
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl HistoryStore for JsonFileStore {
    fn load(&self, key: &str) -> Result<Option<String>, Error> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(payload) => Ok(Some(payload)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::HistoryLoad(format!("{}: {e}", self.path_for(key).display()))),
        }
    }

    fn save(&self, key: &str, payload: &str) -> Result<(), Error> {
        fs::create_dir_all(&self.dir)
            .map_err(|e| Error::HistorySave(format!("{}: {e}", self.dir.display())))?;
        fs::write(self.path_for(key), payload)
            .map_err(|e| Error::HistorySave(format!("{}: {e}", self.path_for(key).display())))
    }
}

/// In-memory store for headless runs and tests. Clones share one backing
/// map, so a reopened history sees what an earlier one persisted.
#[derive(Clone, Default)]
pub struct MemoryStore {
    cells: Rc<RefCell<HashMap<String, String>>>,
}

impl HistoryStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, Error> {
        Ok(self.cells.borrow().get(key).cloned())
    }

    fn save(&self, key: &str, payload: &str) -> Result<(), Error> {
        self.cells.borrow_mut().insert(key.to_string(), payload.to_string());
        Ok(())
    }
}

/// A captured color plus when it was captured and a handle to delete it by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: u64,
    pub timestamp_ms: u64,
    #[serde(flatten)]
    pub color: ColorSample,
}

/// What `capture` did. A duplicate is an everyday outcome (hover, click,
/// click again), so it is not an `Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureOutcome {
    Saved(u64),
    Duplicate,
}

pub struct ColorHistory {
    entries: Vec<HistoryEntry>, // index 0 = most recent
    capacity: usize,
    key: String,
    store: Box<dyn HistoryStore>,
    next_id: u64,
}

impl ColorHistory {
    /// Load whatever the store holds under `key`. Missing or malformed data
    /// starts an empty history; persistence problems must never take the
    /// picker down.
    pub fn open(capacity: usize, key: impl Into<String>, store: Box<dyn HistoryStore>) -> Self {
        let key = key.into();
        let mut entries = match store.load(&key) {
            Ok(Some(payload)) => match serde_json::from_str::<Vec<HistoryEntry>>(&payload) {
                Ok(entries) => entries,
                Err(e) => {
                    log::warn!("history {key:?}: malformed blob ({e}), starting empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                log::warn!("history {key:?}: load failed ({e}), starting empty");
                Vec::new()
            }
        };

        // Entries whose hex no longer matches their channels were tampered
        // with or truncated; drop them rather than display lies.
        entries.retain(|e| match hex_to_rgb(&e.color.hex) {
            Ok(rgb) => rgb == (e.color.r, e.color.g, e.color.b),
            Err(err) => {
                log::warn!("history {key:?}: dropping entry {}: {err}", e.id);
                false
            }
        });
        entries.truncate(capacity);

        let next_id = entries.iter().map(|e| e.id).max().map_or(1, |m| m + 1);
        Self { entries, capacity, key, store, next_id }
    }

    /// Insert at the front unless the hex is already present; evict the
    /// oldest past capacity; persist.
    pub fn capture(&mut self, sample: &ColorSample) -> Result<CaptureOutcome, Error> {
        if self.entries.iter().any(|e| e.color.hex == sample.hex) {
            return Ok(CaptureOutcome::Duplicate);
        }
        let id = self.next_id;
        self.next_id += 1;
        self.entries.insert(0, HistoryEntry { id, timestamp_ms: now_ms(), color: sample.clone() });
        self.entries.truncate(self.capacity);
        self.persist()?;
        Ok(CaptureOutcome::Saved(id))
    }

    /// Remove one entry by id. Returns whether anything was removed.
    pub fn remove(&mut self, id: u64) -> Result<bool, Error> {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        if self.entries.len() == before {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    pub fn clear(&mut self) -> Result<(), Error> {
        self.entries.clear();
        self.persist()
    }

    /// Entries, most recent first.
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn newest(&self) -> Option<&HistoryEntry> {
        self.entries.first()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn persist(&self) -> Result<(), Error> {
        let payload = serde_json::to_string(&self.entries)
            .map_err(|e| Error::HistorySave(e.to_string()))?;
        self.store.save(&self.key, &payload)
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_mem(capacity: usize, store: &MemoryStore) -> ColorHistory {
        ColorHistory::open(capacity, "colors", Box::new(store.clone()))
    }

    #[test]
    fn starts_empty_without_stored_data() {
        let h = open_mem(12, &MemoryStore::default());
        assert!(h.is_empty());
        assert_eq!(h.capacity(), 12);
    }

    #[test]
    fn captures_newest_first() {
        let store = MemoryStore::default();
        let mut h = open_mem(12, &store);
        h.capture(&ColorSample::new(1, 2, 3)).unwrap();
        h.capture(&ColorSample::new(4, 5, 6)).unwrap();
        let hexes: Vec<_> = h.iter().map(|e| e.color.hex.as_str()).collect();
        assert_eq!(hexes, ["#040506", "#010203"]);
        assert_eq!(h.newest().unwrap().color.hex, "#040506");
    }

    #[test]
    fn duplicate_hex_is_rejected_without_change() {
        let store = MemoryStore::default();
        let mut h = open_mem(12, &store);
        assert!(matches!(h.capture(&ColorSample::new(7, 7, 7)), Ok(CaptureOutcome::Saved(_))));
        h.capture(&ColorSample::new(9, 9, 9)).unwrap();
        assert_eq!(h.capture(&ColorSample::new(7, 7, 7)).unwrap(), CaptureOutcome::Duplicate);
        assert_eq!(h.len(), 2);
        // Order untouched: the duplicate did not jump to the front.
        assert_eq!(h.newest().unwrap().color.hex, "#090909");
    }

    #[test]
    fn evicts_oldest_past_capacity() {
        let store = MemoryStore::default();
        let mut h = open_mem(3, &store);
        for v in 1..=5u8 {
            h.capture(&ColorSample::new(v, 0, 0)).unwrap();
        }
        let hexes: Vec<_> = h.iter().map(|e| e.color.hex.as_str()).collect();
        assert_eq!(hexes, ["#050000", "#040000", "#030000"]);
    }

    #[test]
    fn removes_by_id() {
        let store = MemoryStore::default();
        let mut h = open_mem(12, &store);
        let CaptureOutcome::Saved(id) = h.capture(&ColorSample::new(1, 1, 1)).unwrap() else {
            panic!("first capture must save");
        };
        h.capture(&ColorSample::new(2, 2, 2)).unwrap();
        assert!(h.remove(id).unwrap());
        assert!(!h.remove(id).unwrap());
        assert_eq!(h.len(), 1);
        assert_eq!(h.newest().unwrap().color.hex, "#020202");
    }

    #[test]
    fn clear_empties_and_persists() {
        let store = MemoryStore::default();
        let mut h = open_mem(12, &store);
        h.capture(&ColorSample::new(1, 1, 1)).unwrap();
        h.clear().unwrap();
        assert!(h.is_empty());
        let reopened = open_mem(12, &store);
        assert!(reopened.is_empty());
    }

    #[test]
    fn round_trips_through_the_store() {
        let store = MemoryStore::default();
        let mut h = open_mem(12, &store);
        for (r, g, b) in [(10, 20, 30), (40, 50, 60), (70, 80, 90)] {
            h.capture(&ColorSample::new(r, g, b)).unwrap();
        }
        let before: Vec<_> = h.iter().cloned().collect();

        let reopened = open_mem(12, &store);
        let after: Vec<_> = reopened.iter().cloned().collect();
        assert_eq!(before, after);
    }

    #[test]
    fn reopened_history_continues_unique_ids() {
        let store = MemoryStore::default();
        let mut h = open_mem(12, &store);
        h.capture(&ColorSample::new(1, 1, 1)).unwrap();
        h.capture(&ColorSample::new(2, 2, 2)).unwrap();
        let max_id = h.iter().map(|e| e.id).max().unwrap();

        let mut reopened = open_mem(12, &store);
        let CaptureOutcome::Saved(id) = reopened.capture(&ColorSample::new(3, 3, 3)).unwrap()
        else {
            panic!("capture must save");
        };
        assert!(id > max_id);
    }

    #[test]
    fn malformed_blob_starts_empty() {
        let store = MemoryStore::default();
        store.save("colors", "definitely not json").unwrap();
        let h = open_mem(12, &store);
        assert!(h.is_empty());
    }

    #[test]
    fn inconsistent_entries_are_dropped_on_load() {
        let store = MemoryStore::default();
        // hex says red, channels say green.
        store
            .save(
                "colors",
                r##"[{"id":1,"timestamp_ms":0,"r":0,"g":255,"b":0,"hex":"#FF0000","hsl":{"h":0,"s":100,"l":50}}]"##,
            )
            .unwrap();
        let h = open_mem(12, &store);
        assert!(h.is_empty());
    }

    #[test]
    fn file_store_round_trips() {
        let dir = std::env::temp_dir().join(format!("color-dropper-test-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);

        let store = JsonFileStore::new(&dir);
        assert_eq!(store.load("colors").unwrap(), None);

        {
            let mut h = ColorHistory::open(12, "colors", Box::new(JsonFileStore::new(&dir)));
            h.capture(&ColorSample::new(12, 34, 56)).unwrap();
        }
        let reopened = ColorHistory::open(12, "colors", Box::new(JsonFileStore::new(&dir)));
        assert_eq!(reopened.len(), 1);
        assert_eq!(reopened.newest().unwrap().color.hex, "#0C2238");

        let _ = fs::remove_dir_all(&dir);
    }
}
