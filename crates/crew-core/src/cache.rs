//! Persisted persona metadata, keyed by agent identifier.
//!
//! The whole cache is one JSON document. Every mutation re-reads the stored
//! document, applies the change, and writes the result back. There is no
//! locking: two processes writing at once can lose an update. Acceptable for
//! a single-user tool; do not rely on it for anything shared.

use crate::agent::Agent;
use crate::config::Config;
use crate::error::Result;
use crate::io::atomic_write;
use crate::persona::Persona;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub type Entries = BTreeMap<String, Persona>;

// ---------------------------------------------------------------------------
// Storage backends
// ---------------------------------------------------------------------------

/// Where the serialized cache document lives.
pub trait CacheStore {
    /// The stored document, or `None` if nothing has been written yet.
    fn read(&self) -> Result<Option<String>>;
    fn write(&self, contents: &str) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CacheStore for FileStore {
    fn read(&self) -> Result<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, contents: &str) -> Result<()> {
        atomic_write(&self.path, contents.as_bytes())
    }
}

/// In-process store for tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    contents: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self {
            contents: Mutex::new(Some(contents.into())),
        }
    }

    pub fn contents(&self) -> Option<String> {
        self.contents.lock().ok().and_then(|c| c.clone())
    }
}

impl CacheStore for MemoryStore {
    fn read(&self) -> Result<Option<String>> {
        Ok(self.contents())
    }

    fn write(&self, contents: &str) -> Result<()> {
        if let Ok(mut slot) = self.contents.lock() {
            *slot = Some(contents.to_string());
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MetadataCache
// ---------------------------------------------------------------------------

pub struct MetadataCache<S> {
    store: S,
    loaded: Option<Entries>,
}

impl MetadataCache<FileStore> {
    /// The file-backed cache configured for `root`.
    pub fn open(root: &Path, config: &Config) -> Self {
        Self::new(FileStore::new(config.cache_path(root)))
    }
}

impl<S: CacheStore> MetadataCache<S> {
    /// Wrap `store`. Nothing is read until first use.
    pub fn new(store: S) -> Self {
        Self { store, loaded: None }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Re-read the stored document, replacing anything held in memory.
    pub fn load(&mut self) -> &Entries {
        let doc = self.read_document();
        self.loaded.insert(doc)
    }

    /// Forget the in-memory copy; the next access reads the store again.
    pub fn invalidate(&mut self) {
        self.loaded = None;
    }

    pub fn entries(&mut self) -> &Entries {
        if self.loaded.is_none() {
            self.loaded = Some(self.read_document());
        }
        self.loaded.get_or_insert_with(Entries::new)
    }

    pub fn get(&mut self, name: &str) -> Option<&Persona> {
        self.entries().get(name)
    }

    /// Agent identifiers with an entry.
    pub fn names(&mut self) -> Vec<String> {
        self.entries().keys().cloned().collect()
    }

    /// Display names claimed by persisted entries.
    pub fn display_names(&mut self) -> Vec<String> {
        self.entries()
            .values()
            .map(|p| p.display_name.clone())
            .collect()
    }

    /// Fill in `persona` on every agent that has an entry.
    pub fn attach(&mut self, agents: &mut [Agent]) {
        let entries = self.entries();
        for agent in agents.iter_mut() {
            if let Some(persona) = entries.get(&agent.name) {
                agent.persona = Some(persona.clone());
            }
        }
    }

    pub fn set(&mut self, name: &str, persona: Persona) -> Result<()> {
        let mut doc = self.read_document();
        doc.insert(name.to_string(), persona);
        self.write_document(doc)
    }

    /// Remove one entry. Returns false if there was nothing to remove.
    pub fn delete(&mut self, name: &str) -> Result<bool> {
        let mut doc = self.read_document();
        let removed = doc.remove(name).is_some();
        if removed {
            self.write_document(doc)?;
        } else {
            self.loaded = Some(doc);
        }
        Ok(removed)
    }

    /// Drop every entry. Returns how many were removed.
    pub fn clear(&mut self) -> Result<usize> {
        let count = self.read_document().len();
        self.write_document(Entries::new())?;
        Ok(count)
    }

    fn read_document(&self) -> Entries {
        let raw = match self.store.read() {
            Ok(Some(raw)) => raw,
            Ok(None) => return Entries::new(),
            Err(e) => {
                tracing::warn!(error = %e, "could not read metadata cache; treating as empty");
                return Entries::new();
            }
        };
        if raw.trim().is_empty() {
            return Entries::new();
        }
        match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(error = %e, "metadata cache is not valid JSON; treating as empty");
                Entries::new()
            }
        }
    }

    fn write_document(&mut self, doc: Entries) -> Result<()> {
        let mut json = serde_json::to_string_pretty(&doc)?;
        json.push('\n');
        self.store.write(&json)?;
        self.loaded = Some(doc);
        Ok(())
    }
}

/// A store whose writes always fail, for exercising error propagation.
#[cfg(test)]
pub(crate) struct ReadOnlyStore;

#[cfg(test)]
impl CacheStore for ReadOnlyStore {
    fn read(&self) -> Result<Option<String>> {
        Ok(None)
    }

    fn write(&self, _contents: &str) -> Result<()> {
        Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only store").into())
    }
}
