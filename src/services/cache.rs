//! In-process TTL cache for slowly-changing IPMA metadata.
//!
//! Each `TtlSlot` holds one whole value (e.g. the full locations list) and
//! the time it was fetched. Reads within the TTL return the same `Arc`; a
//! stale or empty slot is refreshed by exactly one upstream call.
//!
//! Two locks are involved. The refresh mutex is held across the upstream
//! fetch so concurrent readers of a stale slot wait for the in-flight fetch
//! instead of issuing their own. The entry itself sits behind an `RwLock`
//! that is only held for a copy or a swap, so `clear` never waits on IPMA.

use chrono::{DateTime, Utc};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tokio::sync::Mutex;

/// Source of the current time. Injected so cache expiry is testable.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

struct Entry<T> {
    value: Arc<T>,
    fetched_at: DateTime<Utc>,
}

/// A single cached value with a fixed time-to-live.
pub struct TtlSlot<T> {
    name: &'static str,
    ttl: chrono::Duration,
    clock: Arc<dyn Clock>,
    entry: RwLock<Option<Entry<T>>>,
    refresh: Mutex<()>,
    // Bumped by `clear`; a refresh that started before the bump must not
    // repopulate the slot.
    generation: AtomicU64,
}

impl<T> TtlSlot<T> {
    pub fn new(name: &'static str, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            name,
            ttl: chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX),
            clock,
            entry: RwLock::new(None),
            refresh: Mutex::new(()),
            generation: AtomicU64::new(0),
        }
    }

    /// The cached value, if present and younger than the TTL.
    fn fresh_value(&self) -> Option<Arc<T>> {
        let entry = self.entry.read().unwrap_or_else(PoisonError::into_inner);
        entry
            .as_ref()
            .filter(|cached| self.clock.now() - cached.fetched_at < self.ttl)
            .map(|cached| Arc::clone(&cached.value))
    }

    /// Return the cached value if fresh, otherwise run `refresh` once and
    /// cache its result.
    ///
    /// A failed refresh leaves the previous entry in place and is not cached.
    pub async fn get_or_refresh<F, Fut, E>(&self, refresh: F) -> Result<Arc<T>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(value) = self.fresh_value() {
            tracing::debug!("Using cached {} data", self.name);
            return Ok(value);
        }

        let _guard = self.refresh.lock().await;

        // Another reader may have refreshed while we waited.
        if let Some(value) = self.fresh_value() {
            tracing::debug!("Using cached {} data", self.name);
            return Ok(value);
        }

        let generation = self.generation.load(Ordering::SeqCst);
        tracing::info!("Fetching {} data from IPMA", self.name);
        let value = Arc::new(refresh().await?);

        let mut entry = self.entry.write().unwrap_or_else(PoisonError::into_inner);
        if self.generation.load(Ordering::SeqCst) == generation {
            *entry = Some(Entry {
                value: Arc::clone(&value),
                fetched_at: self.clock.now(),
            });
        } else {
            tracing::debug!("Cache cleared during {} refresh, not storing", self.name);
        }
        Ok(value)
    }

    /// Drop the cached value so the next read refetches.
    ///
    /// Does not wait for an in-flight refresh. That caller still gets its
    /// result, but the result is not stored.
    pub fn clear(&self) {
        let mut entry = self.entry.write().unwrap_or_else(PoisonError::into_inner);
        self.generation.fetch_add(1, Ordering::SeqCst);
        *entry = None;
    }
}
