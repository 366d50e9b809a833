#![forbid(unsafe_code)]

//! Beacon Runtime
//!
//! Host-facing services shared by the tour and the floating widget.
//!
//! # Key Components
//!
//! - [`PersistedState`] - Typed view over a key-value store, degrading to memory
//! - [`KeyValueStore`] - Storage backend trait (`MemoryStore`, `FileStore`, ...)
//! - [`CancellationSource`] - Trips in-flight target polls on skip
//! - [`Clock`] - Monotonic time, real or manual
//!
//! # Role in Beacon
//! `beacon-runtime` sits between `beacon-core` and the controllers. It owns
//! nothing visual; it only remembers, waits and cancels.

pub mod cancellation;
pub mod clock;
pub mod state_persistence;

pub use cancellation::{CancellationSource, CancellationToken};
pub use clock::{Clock, ManualClock, SystemClock};
#[cfg(feature = "state-persistence")]
pub use state_persistence::FileStore;
pub use state_persistence::{
    KeyValueStore, MemoryStore, PersistedKey, PersistedState, StorageError, StorageResult,
    UnavailableStore,
};
