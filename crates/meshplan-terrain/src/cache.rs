use std::collections::HashMap;
use std::sync::Arc;

use meshplan_common::telemetry::{metric_defs, metrics};
use meshplan_common::TileKey;
use parking_lot::Mutex as SyncMutex;
use tokio::sync::{watch, Mutex as AsyncMutex};

use crate::decoded::DecodedTile;
use crate::error::TerrainError;

/// Process-local LRU of decoded tiles: a plain `HashMap` plus an explicit
/// access-order `Vec`, rather than pulling in a dedicated LRU crate.
pub struct TileLru {
    entries: HashMap<TileKey, Arc<DecodedTile>>,
    access_order: Vec<TileKey>,
    max_size: usize,
}

impl TileLru {
    pub fn new(max_size: usize) -> Self {
        Self {
            entries: HashMap::new(),
            access_order: Vec::new(),
            max_size,
        }
    }

    pub fn get(&mut self, key: &TileKey) -> Option<Arc<DecodedTile>> {
        if let Some(tile) = self.entries.get(key).cloned() {
            self.touch(key);
            metrics::counter!(metric_defs::TERRAIN_TILE_CACHE_HIT).increment(1);
            Some(tile)
        } else {
            None
        }
    }

    pub fn insert(&mut self, key: TileKey, tile: Arc<DecodedTile>) {
        if !self.entries.contains_key(&key) && self.entries.len() >= self.max_size {
            if !self.access_order.is_empty() {
                let oldest = self.access_order.remove(0);
                self.entries.remove(&oldest);
            }
        }
        self.entries.insert(key, tile);
        self.touch(&key);
    }

    fn touch(&mut self, key: &TileKey) {
        self.access_order.retain(|k| k != key);
        self.access_order.push(*key);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Key formatting for the shared byte cache, per the persisted state layout.
pub fn byte_cache_key(key: TileKey) -> String {
    format!("tile:{}:{}:{}", key.z, key.x, key.y)
}

/// Stand-in for an external KV store of encoded (still-compressed) tile
/// bytes, shared across "workers" within a process. Bounded by entry count
/// like the process-local LRU.
pub struct SharedByteCache {
    entries: SyncMutex<HashMap<String, Vec<u8>>>,
    max_size: usize,
}

impl SharedByteCache {
    pub fn new(max_size: usize) -> Self {
        Self {
            entries: SyncMutex::new(HashMap::new()),
            max_size,
        }
    }

    pub fn get(&self, key: TileKey) -> Option<Vec<u8>> {
        self.entries.lock().get(&byte_cache_key(key)).cloned()
    }

    pub fn insert(&self, key: TileKey, bytes: Vec<u8>) {
        let mut entries = self.entries.lock();
        if entries.len() >= self.max_size && !entries.contains_key(&byte_cache_key(key)) {
            // Simplicity over eviction precision: shared cache eviction is
            // not load-bearing for correctness, only for memory bounds.
            if let Some(k) = entries.keys().next().cloned() {
                entries.remove(&k);
            }
        }
        entries.insert(byte_cache_key(key), bytes);
    }
}

/// Outcome of an in-flight fetch, published once via a `watch` channel.
/// `None` is the not-yet-done initial value; `Some` is terminal.
type FetchOutcome = Option<Result<Arc<DecodedTile>, Arc<TerrainError>>>;

/// Async single-flight coalescing for concurrent requests to the same
/// missing tile. Each in-flight key maps to a `watch::Sender<FetchOutcome>`;
/// a waiter subscribes (capturing a `Receiver` that already holds whatever
/// value is current) *before* releasing the `states` lock, so a completion
/// racing with the subscription can never be missed the way it could with a
/// bare `Notify`. Waiters never re-query `states` after waking — they only
/// ever read their own `Receiver` — so only the instigator calls `fetch`;
/// no waiter can see a removed entry and restart the fetch itself.
pub struct InFlightTracker {
    states: AsyncMutex<HashMap<TileKey, watch::Sender<FetchOutcome>>>,
}

impl Default for InFlightTracker {
    fn default() -> Self {
        Self {
            states: AsyncMutex::new(HashMap::new()),
        }
    }
}

impl InFlightTracker {
    /// Runs `fetch` for `key`, coalescing concurrent callers into a single
    /// execution. All callers that arrive while a fetch is in progress
    /// receive the same success or failure, as the same `TerrainError`
    /// variant the instigator saw.
    pub async fn run<F, Fut>(&self, key: TileKey, fetch: F) -> Result<Arc<DecodedTile>, TerrainError>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<DecodedTile, TerrainError>>,
    {
        let mut states = self.states.lock().await;
        if let Some(tx) = states.get(&key) {
            let mut rx = tx.subscribe();
            drop(states);
            metrics::counter!(metric_defs::TERRAIN_TILE_FETCH_COALESCED).increment(1);
            return loop {
                if let Some(outcome) = rx.borrow().clone() {
                    break outcome.map_err(|e| (*e).clone());
                }
                if rx.changed().await.is_err() {
                    break Err(TerrainError::Io(
                        "in-flight tile fetch ended without a result".to_string(),
                    ));
                }
            };
        }

        let (tx, _rx): (watch::Sender<FetchOutcome>, watch::Receiver<FetchOutcome>) =
            watch::channel(None);
        states.insert(key, tx.clone());
        drop(states);

        metrics::counter!(metric_defs::TERRAIN_TILE_FETCH_TOTAL).increment(1);
        let outcome: FetchOutcome = Some(match fetch().await {
            Ok(tile) => Ok(Arc::new(tile)),
            Err(err) => {
                metrics::counter!(metric_defs::TERRAIN_TILE_FETCH_FAILED).increment(1);
                Err(Arc::new(err))
            }
        });
        let _ = tx.send(outcome.clone());

        self.states.lock().await.remove(&key);

        outcome
            .expect("just constructed as Some above")
            .map_err(|e| (*e).clone())
    }
}
