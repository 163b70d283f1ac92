use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::data::{FAVORITES_CAPACITY, FAVORITES_KEY};
use crate::error::{PassportError, Result};

/// Key/value string storage. Encoding the values is the caller's business.
pub trait Storage {
    fn get(&self, key: &str) -> Option<String>;

    /// Overwrites the slot. Must be durable when it returns `Ok`.
    fn set(&mut self, key: &str, value: String) -> Result<()>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slots: HashMap<String, String>,
    writes: usize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_slot(key: &str, value: impl Into<String>) -> Self {
        let mut storage = Self::default();
        storage.slots.insert(key.to_string(), value.into());
        storage
    }

    /// Number of successful `set` calls.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.slots.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        self.slots.insert(key.to_string(), value);
        self.writes += 1;
        Ok(())
    }
}

/// All slots kept in one JSON object on disk, rewritten atomically on every `set`.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    slots: BTreeMap<String, String>,
}

impl FileStorage {
    pub const FILE_NAME: &'static str = "storage.json";

    pub fn open_in(dir: &Path) -> Result<Self> {
        Self::open(dir.join(Self::FILE_NAME))
    }

    /// A missing file is an empty store. An unreadable one is logged and treated as empty.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let slots = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                tracing::warn!("Ignoring unreadable store {}: {}", path.display(), e);
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, slots })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, slots: &BTreeMap<String, String>) -> Result<()> {
        let parent_dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent_dir)?;

        let temp_file = NamedTempFile::new_in(parent_dir)?;
        let mut writer = BufWriter::new(&temp_file);
        serde_json::to_writer_pretty(&mut writer, slots).map_err(std::io::Error::from)?;
        writer.flush()?;
        drop(writer);

        temp_file.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.slots.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        let mut slots = self.slots.clone();
        slots.insert(key.to_string(), value);
        self.persist(&slots)?;
        self.slots = slots;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggled {
    Added,
    Removed,
}

/// Bookmarked country names, oldest first, capped at [`FAVORITES_CAPACITY`].
#[derive(Debug)]
pub struct FavoritesStore<S: Storage> {
    names: Vec<String>,
    storage: S,
}

impl<S: Storage> FavoritesStore<S> {
    /// Reads the favorites slot once. Absent or corrupt data starts an empty list.
    pub fn load(storage: S) -> Self {
        let names = match read_slot(&storage) {
            Ok(names) => names,
            Err(e) => {
                tracing::warn!("{}; starting with no favorites", e);
                Vec::new()
            }
        };
        Self { names, storage }
    }

    pub fn is_favorite(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn list(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Removes `name` if present, otherwise appends it. Full lists reject new
    /// names and nothing is evicted. Every change is written through before returning.
    pub fn toggle(&mut self, name: &str) -> Result<Toggled> {
        if let Some(index) = self.names.iter().position(|n| n == name) {
            let removed = self.names.remove(index);
            if let Err(e) = self.save() {
                self.names.insert(index, removed);
                return Err(e);
            }
            tracing::debug!("Removed {} from favorites", name);
            return Ok(Toggled::Removed);
        }

        if self.names.len() >= FAVORITES_CAPACITY {
            tracing::info!("Favorites full, rejected {}", name);
            return Err(PassportError::FavoritesCapacityExceeded {
                capacity: FAVORITES_CAPACITY,
            });
        }

        self.names.push(name.to_string());
        if let Err(e) = self.save() {
            self.names.pop();
            return Err(e);
        }
        tracing::debug!("Added {} to favorites", name);
        Ok(Toggled::Added)
    }

    fn save(&mut self) -> Result<()> {
        let value = serde_json::to_string(&self.names).map_err(std::io::Error::from)?;
        self.storage.set(FAVORITES_KEY, value)
    }
}

fn read_slot(storage: &impl Storage) -> Result<Vec<String>> {
    let Some(text) = storage.get(FAVORITES_KEY) else {
        return Ok(Vec::new());
    };
    let stored: Vec<String> = serde_json::from_str(&text).map_err(PassportError::StorageCorrupt)?;

    let mut names: Vec<String> = Vec::with_capacity(stored.len().min(FAVORITES_CAPACITY));
    for name in stored {
        if names.len() == FAVORITES_CAPACITY {
            tracing::warn!("Stored favorites exceed {}, dropping the rest", FAVORITES_CAPACITY);
            break;
        }
        if !names.contains(&name) {
            names.push(name);
        }
    }
    Ok(names)
}
