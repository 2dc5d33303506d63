//! Key/value persistence primitive the config store sits on.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// String-in, string-out persistence (values are JSON text).
pub trait KeyValueStore {
    /// Stored value for `key`, or None if nothing was ever written.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite the value for `key`.
    fn set_item(&mut self, key: &str, value: &str) -> Result<()>;
}

// ============================================================================
// MemoryStore
// ============================================================================

/// In-process store. Used by tests and by sessions that should not touch disk.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    items: HashMap<String, String>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_item(mut self, key: &str, value: &str) -> Self {
        self.items.insert(key.to_string(), value.to_string());
        self
    }

    /// Number of `set_item` calls so far.
    pub fn writes(&self) -> usize {
        self.writes
    }

    pub fn raw(&self, key: &str) -> Option<&str> {
        self.items.get(key).map(String::as_str)
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.writes += 1;
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// ============================================================================
// JsonFileStore
// ============================================================================

/// One `<key>.json` file per key inside a state directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    directory: PathBuf,
}

impl JsonFileStore {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        // Keys are namespaced with dots; keep them readable but never let them escape the dir
        let file_stem: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-' { c } else { '_' })
            .collect();
        self.directory.join(format!("{}.json", file_stem))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e).context(format!("Failed to open state file: {:?}", path)),
        };
        let mut reader = BufReader::new(file);
        let mut content = String::new();
        reader
            .read_to_string(&mut content)
            .context(format!("Failed to read state file: {:?}", path))?;
        Ok(Some(content))
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        std::fs::create_dir_all(&self.directory).context(format!(
            "Failed to create directory: {}",
            self.directory.display()
        ))?;
        let path = self.path_for(key);
        let file =
            File::create(&path).context(format!("Failed to create file: {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        writer
            .write_all(value.as_bytes())
            .and_then(|_| writer.flush())
            .context(format!("Failed to write state to: {}", path.display()))
    }
}
