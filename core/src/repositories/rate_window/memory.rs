//! In-process sliding-window log

use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::errors::DomainResult;

use super::r#trait::WindowRepository;

/// Request log for one key with the window it was last trimmed against
#[derive(Debug)]
struct WindowLog {
    window: Duration,
    entries: VecDeque<Instant>,
}

impl WindowLog {
    fn trim(&mut self, now: Instant) {
        while let Some(oldest) = self.entries.front() {
            if now.duration_since(*oldest) >= self.window {
                self.entries.pop_front();
            } else {
                break;
            }
        }
    }

    /// Nothing left inside the window
    fn is_stale(&self, now: Instant) -> bool {
        self.entries
            .back()
            .map_or(true, |newest| now.duration_since(*newest) >= self.window)
    }
}

/// Per-key request logs guarded by a single lock, so trim, count and insert
/// happen as one step for concurrent callers in this process.
/// Keys whose whole log has aged out are dropped on the next write.
#[derive(Debug, Default)]
pub struct MemoryWindowRepository {
    windows: Mutex<HashMap<String, WindowLog>>,
}

impl MemoryWindowRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries currently recorded for `key` inside `window`
    pub fn count(&self, key: &str, window: Duration) -> usize {
        let now = Instant::now();
        self.windows
            .lock()
            .get(key)
            .map(|log| {
                log.entries
                    .iter()
                    .filter(|t| now.duration_since(**t) < window)
                    .count()
            })
            .unwrap_or(0)
    }

    /// Number of keys currently tracked
    pub fn len(&self) -> usize {
        self.windows.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl WindowRepository for MemoryWindowRepository {
    async fn try_acquire(&self, key: &str, limit: u32, window: Duration) -> DomainResult<bool> {
        let now = Instant::now();
        let mut windows = self.windows.lock();
        windows.retain(|k, log| k == key || !log.is_stale(now));

        let log = windows.entry(key.to_string()).or_insert_with(|| WindowLog {
            window,
            entries: VecDeque::new(),
        });
        log.window = window;
        log.trim(now);

        if log.entries.len() < limit as usize {
            log.entries.push_back(now);
            Ok(true)
        } else {
            if log.entries.is_empty() {
                windows.remove(key);
            }
            Ok(false)
        }
    }
}
