#![forbid(unsafe_code)]

//! Cooperative cancellation for in-flight tour transitions.
//!
//! A pending transition (navigate, then poll for the target) holds a
//! [`CancellationToken`]. Skipping the tour, or starting another one, cancels
//! the matching [`CancellationSource`]; the poller observes the flag on its
//! next attempt and any sleep in progress wakes immediately.
//!
//! ```
//! use beacon_runtime::cancellation::CancellationSource;
//! use std::time::Duration;
//!
//! let source = CancellationSource::new();
//! let token = source.token();
//! let waiter = std::thread::spawn(move || token.wait_timeout(Duration::from_secs(5)));
//! source.cancel();
//! assert!(waiter.join().unwrap());
//! ```

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use web_time::Duration;

struct Shared {
    cancelled: AtomicBool,
    lock: Mutex<()>,
    wake: Condvar,
}

/// Observer side. Cheap to clone and `Send + Sync`.
#[derive(Clone)]
pub struct CancellationToken {
    shared: Arc<Shared>,
}

/// Control side. Dropping a source leaves its tokens live; only
/// [`cancel`](Self::cancel) trips them.
pub struct CancellationSource {
    shared: Arc<Shared>,
}

impl CancellationSource {
    #[must_use]
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                cancelled: AtomicBool::new(false),
                lock: Mutex::new(()),
                wake: Condvar::new(),
            }),
        }
    }

    /// A token observing this source.
    #[must_use]
    pub fn token(&self) -> CancellationToken {
        CancellationToken {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Trip every token and wake all waiters. Idempotent.
    pub fn cancel(&self) {
        if self.shared.cancelled.swap(true, Ordering::AcqRel) {
            return;
        }
        let _guard = self.shared.lock.lock().unwrap_or_else(|e| e.into_inner());
        self.shared.wake.notify_all();
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.shared.cancelled.load(Ordering::Acquire)
    }
}

impl Default for CancellationSource {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CancellationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancellationSource")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

impl CancellationToken {
    /// A token that is never cancelled.
    #[must_use]
    pub fn never() -> Self {
        CancellationSource::new().token()
    }

    #[inline]
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.shared.cancelled.load(Ordering::Acquire)
    }

    /// Sleep for up to `duration`, waking early on cancellation.
    ///
    /// Returns `true` if cancelled, `false` if the full duration elapsed.
    pub fn wait_timeout(&self, duration: Duration) -> bool {
        if self.is_cancelled() {
            return true;
        }
        let deadline = web_time::Instant::now() + duration;
        let mut guard = self.shared.lock.lock().unwrap_or_else(|e| e.into_inner());
        loop {
            if self.is_cancelled() {
                return true;
            }
            let now = web_time::Instant::now();
            if now >= deadline {
                return false;
            }
            // Spurious wakeups loop back and re-check against the deadline.
            let (next, _) = self
                .shared
                .wake
                .wait_timeout(guard, deadline - now)
                .unwrap_or_else(|e| e.into_inner());
            guard = next;
        }
    }
}

impl fmt::Debug for CancellationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancellationToken")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}
