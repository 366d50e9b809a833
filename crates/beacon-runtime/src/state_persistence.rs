//! Persisted widget and tour state over a flat key-value store.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      PersistedState                           │
//! │   - Typed accessors (closed flag, position, tour step, ...)   │
//! │   - JSON values via serde_json                                │
//! │   - Falls back to memory when the backend fails               │
//! └──────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      KeyValueStore                            │
//! │   - MemoryStore: in-memory (tests, ephemeral hosts)           │
//! │   - FileStore: JSON file (requires state-persistence)         │
//! │   - UnavailableStore: storage disabled by the host            │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Design Invariants
//!
//! 1. **Absence is a default**: a missing key always reads as the default
//!    value, never as an error.
//! 2. **Graceful degradation**: the first backend failure switches the state
//!    to memory-only mode for the rest of the session; nothing panics.
//! 3. **Atomic writes**: file storage uses write-then-rename.
//! 4. **Corrupt values are skipped**: an unparsable value reads as absent.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | `StorageError::Io` | File I/O failure | Degrade to memory, logged once |
//! | `StorageError::Unavailable` | Host disabled storage | Degrade to memory, logged once |
//! | `StorageError::Corruption` | Unreadable store file | Degrade to memory, logged once |
//! | Bad JSON value | Manual edit, schema drift | Key reads as absent |

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use beacon_core::error::BeaconError;
use beacon_core::geometry::Point;
use serde::Serialize;
use serde::de::DeserializeOwned;

// ─────────────────────────────────────────────────────────────────────────────
// Error Types
// ─────────────────────────────────────────────────────────────────────────────

/// Errors that can occur in a key-value store.
#[derive(Debug)]
pub enum StorageError {
    /// I/O error during file operations.
    Io(std::io::Error),
    /// A value could not be encoded or decoded.
    Serialization(String),
    /// The backing file is not a valid store.
    Corruption(String),
    /// The store is disabled or blocked by the host.
    Unavailable(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Io(e) => write!(f, "I/O error: {e}"),
            StorageError::Serialization(msg) => write!(f, "serialization error: {msg}"),
            StorageError::Corruption(msg) => write!(f, "storage corruption: {msg}"),
            StorageError::Unavailable(msg) => write!(f, "storage unavailable: {msg}"),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        StorageError::Io(e)
    }
}

impl From<StorageError> for BeaconError {
    fn from(e: StorageError) -> Self {
        BeaconError::PersistenceUnavailable(e.to_string())
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

// ─────────────────────────────────────────────────────────────────────────────
// Key-Value Store Trait
// ─────────────────────────────────────────────────────────────────────────────

/// A flat string-to-string store, the shape of browser `localStorage`.
///
/// Implementations must be thread-safe (`Send + Sync`) so a store can be
/// shared behind an `Arc` by every component of one widget instance.
pub trait KeyValueStore: Send + Sync {
    /// Human-readable name for logging.
    fn name(&self) -> &str;

    /// Read a raw value. `Ok(None)` when the key is absent.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Write a raw value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Remove a key. Removing an absent key succeeds.
    fn remove(&self, key: &str) -> StorageResult<()>;

    /// Check if the store is usable.
    fn is_available(&self) -> bool {
        true
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Memory Store (always available)
// ─────────────────────────────────────────────────────────────────────────────

/// In-memory store. State is lost when the process exits.
#[derive(Default)]
pub struct MemoryStore {
    data: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create a new empty memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a memory store pre-populated with raw entries.
    #[must_use]
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            data: RwLock::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.read().map(|g| g.len()).unwrap_or(0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn name(&self) -> &str {
        "MemoryStore"
    }

    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let guard = self
            .data
            .read()
            .map_err(|_| StorageError::Corruption("lock poisoned".into()))?;
        Ok(guard.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut guard = self
            .data
            .write()
            .map_err(|_| StorageError::Corruption("lock poisoned".into()))?;
        guard.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let mut guard = self
            .data
            .write()
            .map_err(|_| StorageError::Corruption("lock poisoned".into()))?;
        guard.remove(key);
        Ok(())
    }
}

impl fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryStore")
            .field("entries", &self.len())
            .finish()
    }
}

/// A store that rejects every operation, as when the host blocks storage
/// (private browsing, quota exhausted, sandboxed iframe).
#[derive(Debug, Clone, Default)]
pub struct UnavailableStore {
    reason: String,
}

impl UnavailableStore {
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    fn error(&self) -> StorageError {
        StorageError::Unavailable(self.reason.clone())
    }
}

impl KeyValueStore for UnavailableStore {
    fn name(&self) -> &str {
        "UnavailableStore"
    }

    fn get(&self, _key: &str) -> StorageResult<Option<String>> {
        Err(self.error())
    }

    fn set(&self, _key: &str, _value: &str) -> StorageResult<()> {
        Err(self.error())
    }

    fn remove(&self, _key: &str) -> StorageResult<()> {
        Err(self.error())
    }

    fn is_available(&self) -> bool {
        false
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File Store (requires state-persistence feature)
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(feature = "state-persistence")]
mod file_store {
    use super::*;
    use serde::Deserialize;
    use std::fs::{self, File};
    use std::io::{BufReader, BufWriter, Write};
    use std::path::{Path, PathBuf};

    /// On-disk layout.
    #[derive(Serialize, Deserialize)]
    struct StoreFile {
        format_version: u32,
        entries: HashMap<String, String>,
    }

    impl StoreFile {
        const FORMAT_VERSION: u32 = 1;
    }

    /// File-backed store using one JSON document.
    ///
    /// ```json
    /// {
    ///   "format_version": 1,
    ///   "entries": {
    ///     "beacon.position": "{\"x\":120.0,\"y\":48.0}",
    ///     "beacon.closed": "true"
    ///   }
    /// }
    /// ```
    ///
    /// The file is read once, on first access; every write rewrites it via
    /// `{path}.tmp` + rename.
    pub struct FileStore {
        path: PathBuf,
        cache: RwLock<Option<HashMap<String, String>>>,
    }

    impl FileStore {
        /// Create a store at `path`. The file is created on first write.
        #[must_use]
        pub fn new(path: impl AsRef<Path>) -> Self {
            Self {
                path: path.as_ref().to_path_buf(),
                cache: RwLock::new(None),
            }
        }

        /// Store at `$XDG_STATE_HOME/beacon/{app_name}/state.json`, falling
        /// back to `~/.local/state` and then the current directory.
        #[must_use]
        pub fn default_for_app(app_name: &str) -> Self {
            let base = std::env::var_os("XDG_STATE_HOME")
                .map(PathBuf::from)
                .or_else(|| {
                    std::env::var_os("HOME")
                        .map(|home| PathBuf::from(home).join(".local").join("state"))
                })
                .unwrap_or_else(|| PathBuf::from("."));
            Self::new(base.join("beacon").join(app_name).join("state.json"))
        }

        /// Path of the backing file.
        #[must_use]
        pub fn path(&self) -> &Path {
            &self.path
        }

        fn read_file(&self) -> StorageResult<HashMap<String, String>> {
            if !self.path.exists() {
                return Ok(HashMap::new());
            }
            let reader = BufReader::new(File::open(&self.path)?);
            let file: StoreFile = serde_json::from_reader(reader)
                .map_err(|e| StorageError::Corruption(format!("unreadable store file: {e}")))?;
            if file.format_version != StoreFile::FORMAT_VERSION {
                tracing::warn!(
                    stored = file.format_version,
                    expected = StoreFile::FORMAT_VERSION,
                    "store format version mismatch, ignoring stored state"
                );
                return Ok(HashMap::new());
            }
            Ok(file.entries)
        }

        fn write_file(&self, entries: &HashMap<String, String>) -> StorageResult<()> {
            if let Some(parent) = self.path.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut tmp = self.path.clone();
            tmp.set_extension("json.tmp");
            {
                let mut writer = BufWriter::new(File::create(&tmp)?);
                let file = StoreFile {
                    format_version: StoreFile::FORMAT_VERSION,
                    entries: entries.clone(),
                };
                serde_json::to_writer_pretty(&mut writer, &file)
                    .map_err(|e| StorageError::Serialization(e.to_string()))?;
                writer.flush()?;
                writer.get_ref().sync_all()?;
            }
            fs::rename(&tmp, &self.path)?;
            tracing::debug!(path = %self.path.display(), entries = entries.len(), "saved store file");
            Ok(())
        }

        fn with_entries<R>(
            &self,
            f: impl FnOnce(&mut HashMap<String, String>) -> StorageResult<R>,
        ) -> StorageResult<R> {
            let mut guard = self
                .cache
                .write()
                .map_err(|_| StorageError::Corruption("lock poisoned".into()))?;
            if guard.is_none() {
                *guard = Some(self.read_file()?);
            }
            match guard.as_mut() {
                Some(entries) => f(entries),
                None => Err(StorageError::Corruption("store cache missing".into())),
            }
        }
    }

    impl KeyValueStore for FileStore {
        fn name(&self) -> &str {
            "FileStore"
        }

        fn get(&self, key: &str) -> StorageResult<Option<String>> {
            self.with_entries(|entries| Ok(entries.get(key).cloned()))
        }

        fn set(&self, key: &str, value: &str) -> StorageResult<()> {
            self.with_entries(|entries| {
                entries.insert(key.to_owned(), value.to_owned());
                self.write_file(entries)
            })
        }

        fn remove(&self, key: &str) -> StorageResult<()> {
            self.with_entries(|entries| {
                if entries.remove(key).is_some() {
                    self.write_file(entries)?;
                }
                Ok(())
            })
        }

        fn is_available(&self) -> bool {
            match self.path.parent() {
                Some(parent) if parent.as_os_str().is_empty() => true,
                Some(parent) => fs::create_dir_all(parent).is_ok(),
                None => false,
            }
        }
    }

    impl fmt::Debug for FileStore {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("FileStore").field("path", &self.path).finish()
        }
    }
}

#[cfg(feature = "state-persistence")]
pub use file_store::FileStore;

// ─────────────────────────────────────────────────────────────────────────────
// Persisted Keys
// ─────────────────────────────────────────────────────────────────────────────

/// The small, fixed key space owned by one widget instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PersistedKey {
    /// Widget closed by the user (`bool`). Closed implies pinned.
    Closed,
    /// Free anchor position (`{x, y}`).
    Position,
    /// Automatic tour offers suppressed (`bool`).
    TourSkipped,
    /// Current guided-tour step (`usize`).
    GuidedStep,
    /// Element inspection mode enabled (`bool`).
    DynamicTour,
}

impl PersistedKey {
    pub const ALL: [PersistedKey; 5] = [
        Self::Closed,
        Self::Position,
        Self::TourSkipped,
        Self::GuidedStep,
        Self::DynamicTour,
    ];

    /// Storage key string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Closed => "beacon.closed",
            Self::Position => "beacon.position",
            Self::TourSkipped => "beacon.tour_skipped",
            Self::GuidedStep => "beacon.guided_step",
            Self::DynamicTour => "beacon.dynamic_tour",
        }
    }
}

impl fmt::Display for PersistedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Persisted State
// ─────────────────────────────────────────────────────────────────────────────

/// Typed, failure-tolerant view over a [`KeyValueStore`].
///
/// Boolean flags are stored only while `true`; clearing a flag removes the
/// key so absence and `false` are indistinguishable.
///
/// # Example
///
/// ```
/// use beacon_runtime::state_persistence::PersistedState;
/// use beacon_core::geometry::Point;
///
/// let state = PersistedState::in_memory();
/// assert_eq!(state.position(), None);
/// state.set_position(Point::new(40.0, 80.0));
/// assert_eq!(state.position(), Some(Point::new(40.0, 80.0)));
/// ```
pub struct PersistedState {
    backend: Box<dyn KeyValueStore>,
    fallback: MemoryStore,
    degraded: AtomicBool,
}

impl PersistedState {
    /// Wrap a backend.
    #[must_use]
    pub fn new(backend: Box<dyn KeyValueStore>) -> Self {
        Self {
            backend,
            fallback: MemoryStore::new(),
            degraded: AtomicBool::new(false),
        }
    }

    /// Memory-only state (tests, hosts without storage).
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStore::new()))
    }

    /// File-backed state.
    #[cfg(feature = "state-persistence")]
    #[must_use]
    pub fn with_file(path: impl AsRef<std::path::Path>) -> Self {
        Self::new(Box::new(FileStore::new(path)))
    }

    /// Wrap in `Arc` for sharing between shell, drag and tour controllers.
    #[must_use]
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// True once a backend failure has switched the state to memory-only.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.degraded.load(Ordering::Acquire)
    }

    /// Backend name for logging.
    #[must_use]
    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    // ── Generic access ──────────────────────────────────────────────────

    /// Read and decode a value. Absent, unreadable or corrupt values yield `None`.
    pub fn read<T: DeserializeOwned>(&self, key: PersistedKey) -> Option<T> {
        let raw = if self.is_degraded() {
            self.fallback.get(key.as_str()).ok().flatten()
        } else {
            match self.backend.get(key.as_str()) {
                Ok(raw) => raw,
                Err(e) => {
                    self.degrade(&e);
                    self.fallback.get(key.as_str()).ok().flatten()
                }
            }
        }?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::debug!(key = %key, error = %e, "ignoring corrupt persisted value");
                None
            }
        }
    }

    /// Encode and write a value.
    pub fn write<T: Serialize>(&self, key: PersistedKey, value: &T) {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "failed to encode persisted value");
                return;
            }
        };
        // The fallback mirrors every write so degrading mid-session keeps the
        // latest values.
        let _ = self.fallback.set(key.as_str(), &raw);
        if !self.is_degraded()
            && let Err(e) = self.backend.set(key.as_str(), &raw)
        {
            self.degrade(&e);
        }
    }

    /// Remove a key.
    pub fn remove(&self, key: PersistedKey) {
        let _ = self.fallback.remove(key.as_str());
        if !self.is_degraded()
            && let Err(e) = self.backend.remove(key.as_str())
        {
            self.degrade(&e);
        }
    }

    /// Remove every key this widget owns.
    pub fn clear(&self) {
        for key in PersistedKey::ALL {
            self.remove(key);
        }
    }

    fn degrade(&self, error: &StorageError) {
        if !self.degraded.swap(true, Ordering::AcqRel) {
            let err = BeaconError::PersistenceUnavailable(error.to_string());
            tracing::warn!(
                backend = %self.backend.name(),
                error = %err,
                error_type = err.error_type(),
                "persistence unavailable, continuing in memory"
            );
        }
    }

    fn flag(&self, key: PersistedKey) -> bool {
        self.read::<bool>(key).unwrap_or(false)
    }

    fn set_flag(&self, key: PersistedKey, on: bool) {
        if on {
            self.write(key, &true);
        } else {
            self.remove(key);
        }
    }

    // ── Typed accessors ─────────────────────────────────────────────────

    /// Widget closed by the user.
    #[must_use]
    pub fn closed(&self) -> bool {
        self.flag(PersistedKey::Closed)
    }

    pub fn set_closed(&self, closed: bool) {
        self.set_flag(PersistedKey::Closed, closed);
    }

    /// Last free anchor position.
    #[must_use]
    pub fn position(&self) -> Option<Point> {
        self.read(PersistedKey::Position)
    }

    pub fn set_position(&self, position: Point) {
        self.write(PersistedKey::Position, &position);
    }

    /// Automatic tour offers suppressed.
    #[must_use]
    pub fn tour_skipped(&self) -> bool {
        self.flag(PersistedKey::TourSkipped)
    }

    pub fn set_tour_skipped(&self, skipped: bool) {
        self.set_flag(PersistedKey::TourSkipped, skipped);
    }

    /// Guided-tour step to resume at.
    #[must_use]
    pub fn guided_step(&self) -> Option<usize> {
        self.read(PersistedKey::GuidedStep)
    }

    pub fn set_guided_step(&self, index: usize) {
        self.write(PersistedKey::GuidedStep, &index);
    }

    pub fn clear_guided_step(&self) {
        self.remove(PersistedKey::GuidedStep);
    }

    /// Element inspection mode enabled.
    #[must_use]
    pub fn dynamic_tour(&self) -> bool {
        self.flag(PersistedKey::DynamicTour)
    }

    pub fn set_dynamic_tour(&self, enabled: bool) {
        self.set_flag(PersistedKey::DynamicTour, enabled);
    }
}

impl Default for PersistedState {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl fmt::Debug for PersistedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistedState")
            .field("backend", &self.backend.name())
            .field("degraded", &self.is_degraded())
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
