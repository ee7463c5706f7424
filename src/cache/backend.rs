//! Storage Backend Module
//!
//! Host-provided key/value media the durable layer writes through.

use std::collections::HashMap;
use std::fmt::Debug;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;

use crate::error::StorageError;

// == Storage Backend ==
/// String key/value storage shared by every namespace that uses it.
pub trait StorageBackend: Send + Sync + Debug {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes `key`, returning whether it existed.
    fn remove_item(&self, key: &str) -> Result<bool, StorageError>;

    /// Every key in the medium, regardless of namespace.
    fn keys(&self) -> Result<Vec<String>, StorageError>;
}

// == Memory Backend ==
/// In-process backend with an optional byte quota.
///
/// Used when no storage directory is configured, and by tests to simulate
/// quota and availability failures.
#[derive(Debug)]
pub struct MemoryBackend {
    items: RwLock<HashMap<String, String>>,
    quota_bytes: Option<usize>,
    available: AtomicBool,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self {
            items: RwLock::new(HashMap::new()),
            quota_bytes: None,
            available: AtomicBool::new(true),
        }
    }

    /// Limits the summed length of all keys and values to `quota_bytes`.
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            quota_bytes: Some(quota_bytes),
            ..Self::new()
        }
    }

    /// Toggles availability; while unavailable every call fails.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn ensure_available(&self) -> Result<(), StorageError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StorageError::Unavailable("memory backend disabled".to_string()))
        }
    }
}

impl StorageBackend for MemoryBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.ensure_available()?;
        Ok(self.items.read().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.ensure_available()?;
        let mut items = self.items.write();

        if let Some(quota) = self.quota_bytes {
            let used: usize = items
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum::<usize>()
                + key.len()
                + value.len();
            if used > quota {
                return Err(StorageError::QuotaExceeded { used, quota });
            }
        }

        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<bool, StorageError> {
        self.ensure_available()?;
        Ok(self.items.write().remove(key).is_some())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        self.ensure_available()?;
        Ok(self.items.read().keys().cloned().collect())
    }
}

// == File Backend ==
/// One file per key inside a directory.
///
/// File names are the hex encoding of the key, so any key is a valid name.
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    /// Opens (creating if needed) a storage directory.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(encode_hex(key))
    }
}

impl StorageBackend for FileBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::write(self.path_for(key), value)?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<bool, StorageError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        let mut keys = Vec::new();
        for dir_entry in fs::read_dir(&self.dir)? {
            let dir_entry = dir_entry?;
            if !dir_entry.file_type()?.is_file() {
                continue;
            }
            // Files we didn't write are skipped
            if let Some(key) = dir_entry.file_name().to_str().and_then(decode_hex) {
                keys.push(key);
            }
        }
        Ok(keys)
    }
}

fn encode_hex(key: &str) -> String {
    key.bytes().map(|b| format!("{:02x}", b)).collect()
}

fn decode_hex(name: &str) -> Option<String> {
    if name.is_empty() || name.len() % 2 != 0 {
        return None;
    }
    let bytes = (0..name.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(name.get(i..i + 2)?, 16).ok())
        .collect::<Option<Vec<u8>>>()?;
    String::from_utf8(bytes).ok()
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    static DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

    fn scratch_dir() -> PathBuf {
        let n = DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
        std::env::temp_dir().join(format!(
            "travel_cache_backend_{}_{}_{}",
            std::process::id(),
            crate::cache::current_timestamp_ms(),
            n
        ))
    }

    #[test]
    fn test_hex_roundtrip_for_cache_keys() {
        let key = "travel_cache_weather:39.9,116.4";
        let encoded = encode_hex(key);

        assert!(encoded.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(decode_hex(&encoded).as_deref(), Some(key));
    }

    #[test]
    fn test_decode_rejects_foreign_names() {
        assert_eq!(decode_hex(""), None);
        assert_eq!(decode_hex("abc"), None);
        assert_eq!(decode_hex("zz"), None);
        assert_eq!(decode_hex(".DS_Store"), None);
    }

    #[test]
    fn test_memory_backend_basic_ops() {
        let backend = MemoryBackend::new();

        backend.set_item("a", "1").unwrap();
        assert_eq!(backend.get_item("a").unwrap().as_deref(), Some("1"));
        assert_eq!(backend.keys().unwrap(), vec!["a".to_string()]);
        assert!(backend.remove_item("a").unwrap());
        assert!(!backend.remove_item("a").unwrap());
        assert_eq!(backend.get_item("a").unwrap(), None);
    }

    #[test]
    fn test_memory_backend_quota() {
        let backend = MemoryBackend::with_quota(10);

        backend.set_item("ab", "1234").unwrap();
        // Overwriting the same key only counts the new value
        backend.set_item("ab", "12345678").unwrap();

        let result = backend.set_item("cd", "123");
        assert!(matches!(result, Err(StorageError::QuotaExceeded { .. })));
        assert_eq!(backend.get_item("cd").unwrap(), None);
    }

    #[test]
    fn test_memory_backend_unavailable() {
        let backend = MemoryBackend::new();
        backend.set_available(false);

        assert!(matches!(
            backend.get_item("a"),
            Err(StorageError::Unavailable(_))
        ));
        assert!(backend.set_item("a", "1").is_err());

        backend.set_available(true);
        assert!(backend.set_item("a", "1").is_ok());
    }

    #[test]
    fn test_file_backend_basic_ops() {
        let dir = scratch_dir();
        let backend = FileBackend::open(&dir).unwrap();

        backend.set_item("travel_cache_a:1", "{\"x\":1}").unwrap();
        backend.set_item("other_b", "2").unwrap();

        assert_eq!(
            backend.get_item("travel_cache_a:1").unwrap().as_deref(),
            Some("{\"x\":1}")
        );
        assert_eq!(backend.get_item("missing").unwrap(), None);

        let mut keys = backend.keys().unwrap();
        keys.sort();
        assert_eq!(keys, vec!["other_b".to_string(), "travel_cache_a:1".to_string()]);

        assert!(backend.remove_item("other_b").unwrap());
        assert!(!backend.remove_item("other_b").unwrap());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_file_backend_ignores_foreign_files() {
        let dir = scratch_dir();
        let backend = FileBackend::open(&dir).unwrap();

        fs::write(dir.join("README.txt"), "not ours").unwrap();
        // Hex-looking directory, as a nested store would create
        fs::create_dir_all(dir.join("abcd")).unwrap();
        backend.set_item("k", "v").unwrap();

        assert_eq!(backend.keys().unwrap(), vec!["k".to_string()]);

        fs::remove_dir_all(&dir).unwrap();
    }
}
