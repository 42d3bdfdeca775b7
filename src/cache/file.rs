//! JSON-file backed key-value store.

use dashmap::DashMap;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cache::{CacheResult, KeyValueStore};

/// Key-value store that survives restarts.
///
/// Reads and writes go to memory; `save_to_file` writes the whole map.
#[derive(Debug, Clone)]
pub struct FileStore {
    inner: Arc<DashMap<String, String>>,
    path: PathBuf,
}

impl FileStore {
    /// Open the store at `path`, loading existing entries if the file exists.
    ///
    /// A file that is not valid JSON is ignored with a warning and replaced on the
    /// next save; I/O failures are errors.
    pub fn load_from_file(path: impl AsRef<Path>) -> CacheResult<Self> {
        let path = path.as_ref().to_path_buf();
        let inner = Arc::new(DashMap::new());

        if path.exists() {
            let reader = BufReader::new(File::open(&path)?);
            match serde_json::from_reader::<_, BTreeMap<String, String>>(reader) {
                Ok(map) => {
                    for (k, v) in map {
                        inner.insert(k, v);
                    }
                    tracing::info!(path = %path.display(), entries = inner.len(), "Loaded cache file");
                }
                Err(e) if e.is_io() => return Err(e.into()),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Ignoring unreadable cache file");
                }
            }
        }

        Ok(Self { inner, path })
    }

    /// Persist every entry.
    ///
    /// Regular files are replaced atomically through a `.tmp` sibling.
    pub fn save_to_file(&self) -> CacheResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let map: BTreeMap<_, _> = self
            .inner
            .iter()
            .map(|r| (r.key().clone(), r.value().clone()))
            .collect();

        // Device nodes and other special files cannot be renamed over.
        let in_place = self.path.exists() && !self.path.is_file();
        let target = if in_place { self.path.clone() } else { self.tmp_path() };

        let mut writer = BufWriter::new(File::create(&target)?);
        serde_json::to_writer(&mut writer, &map)?;
        writer.flush()?;
        let file = writer.into_inner().map_err(|e| e.into_error())?;
        if !in_place {
            file.sync_all()?;
            std::fs::rename(&target, &self.path)?;
        }

        tracing::debug!(path = %self.path.display(), entries = map.len(), "Saved cache file");
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key).map(|r| r.value().clone())
    }

    fn set(&self, key: &str, value: String) {
        self.inner.insert(key.to_string(), value);
    }

    fn len(&self) -> usize {
        self.inner.len()
    }
}
