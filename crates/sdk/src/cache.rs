/// Cache of contract reads
///
/// Entries hold a [`ChainValue`] and go stale either by age or by explicit
/// invalidation after a transaction touched them. Stale entries stay
/// readable so a caller can keep showing the last value while refetching,
/// until they outlive the retention window and are pruned.

use std::collections::HashMap;
use std::fmt;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use tracing::debug;

use lendgine_types::{Address, ChainValue, DEFAULT_GC_TIME_MS, DEFAULT_STALE_TIME_MS};

/// Identity of one cached read. Every key is scoped to a chain since the
/// same contract address can be deployed on several chains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKey {
    LendgineInfo {
        chain_id: u64,
        lendgine: Address,
    },
    Position {
        chain_id: u64,
        owner: Address,
        lendgine: Address,
    },
    Balance {
        chain_id: u64,
        token: Address,
        owner: Address,
    },
    Allowance {
        chain_id: u64,
        token: Address,
        owner: Address,
        spender: Address,
    },
}

impl QueryKey {
    pub fn chain_id(&self) -> u64 {
        match self {
            QueryKey::LendgineInfo { chain_id, .. }
            | QueryKey::Position { chain_id, .. }
            | QueryKey::Balance { chain_id, .. }
            | QueryKey::Allowance { chain_id, .. } => *chain_id,
        }
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryKey::LendgineInfo { chain_id, lendgine } => {
                write!(f, "lendgine_info@{}({})", chain_id, lendgine)
            }
            QueryKey::Position {
                chain_id,
                owner,
                lendgine,
            } => write!(f, "position@{}({}, {})", chain_id, owner, lendgine),
            QueryKey::Balance { chain_id, token, owner } => {
                write!(f, "balance@{}({}, {})", chain_id, token, owner)
            }
            QueryKey::Allowance {
                chain_id,
                token,
                owner,
                spender,
            } => write!(f, "allowance@{}({}, {}, {})", chain_id, token, owner, spender),
        }
    }
}

#[derive(Debug, Clone)]
struct Entry {
    value: ChainValue,
    fetched_at: Instant,
    invalidated: bool,
}

pub struct QueryCache {
    stale_time: Duration,
    gc_time: Duration,
    entries: Mutex<HashMap<QueryKey, Entry>>,
}

impl QueryCache {
    pub fn new(stale_time: Duration) -> Self {
        Self {
            stale_time,
            gc_time: Duration::from_millis(DEFAULT_GC_TIME_MS).max(stale_time),
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Override how long entries are kept after their last fetch
    pub fn with_gc_time(mut self, gc_time: Duration) -> Self {
        self.gc_time = gc_time;
        self
    }

    /// Store a fresh value, dropping entries older than the retention window
    pub async fn insert(&self, key: QueryKey, value: ChainValue) {
        let entry = Entry {
            value,
            fetched_at: Instant::now(),
            invalidated: false,
        };
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        entries.retain(|_, e| e.fetched_at.elapsed() < self.gc_time);
        let pruned = before - entries.len();
        if pruned > 0 {
            debug!(pruned, "Pruned expired cached reads");
        }
        entries.insert(key, entry);
    }

    /// Last fetched value, stale or not
    pub async fn get(&self, key: &QueryKey) -> Option<ChainValue> {
        self.entries.lock().await.get(key).map(|e| e.value.clone())
    }

    /// Value only if it is still fresh
    pub async fn get_fresh(&self, key: &QueryKey) -> Option<ChainValue> {
        let entries = self.entries.lock().await;
        entries
            .get(key)
            .filter(|e| !self.entry_is_stale(e))
            .map(|e| e.value.clone())
    }

    /// Whether `key` needs a refetch; missing entries count as stale
    pub async fn is_stale(&self, key: &QueryKey) -> bool {
        self.entries
            .lock()
            .await
            .get(key)
            .map_or(true, |e| self.entry_is_stale(e))
    }

    /// Mark `keys` stale. Other entries are left untouched.
    pub async fn invalidate(&self, keys: &[QueryKey]) {
        let mut entries = self.entries.lock().await;
        for key in keys {
            if let Some(entry) = entries.get_mut(key) {
                entry.invalidated = true;
                debug!(key = %key, "Invalidated cached read");
            }
        }
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    fn entry_is_stale(&self, entry: &Entry) -> bool {
        entry.invalidated || entry.fetched_at.elapsed() >= self.stale_time
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_STALE_TIME_MS))
    }
}
