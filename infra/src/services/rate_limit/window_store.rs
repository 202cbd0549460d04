//! Redis implementation of the sliding-window repository
//!
//! Each rate-limit key is a sorted set of admitted requests scored by their
//! arrival time in milliseconds. Trimming, counting and recording run inside
//! one Lua script, so concurrent callers on different service instances can
//! never admit more than the limit between them.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use redis::Script;
use tracing::debug;

use sso_core::{DomainResult, WindowRepository};

use crate::cache::redis_client::RedisClient;

/// Trim, count and conditionally record one request
///
/// KEYS[1] window key, ARGV[1] limit, ARGV[2] window in ms, ARGV[3] member salt.
/// The clock is the server's `TIME` so every instance agrees on "now".
/// Returns 1 when the request was recorded and 0 when the window is full.
pub const SLIDING_WINDOW_SCRIPT: &str = r#"
if redis.replicate_commands then
  redis.replicate_commands()
end

local key = KEYS[1]
local limit = tonumber(ARGV[1])
local window_ms = tonumber(ARGV[2])
local salt = ARGV[3]

local t = redis.call('TIME')
local now_ms = tonumber(t[1]) * 1000 + math.floor(tonumber(t[2]) / 1000)

redis.call('ZREMRANGEBYSCORE', key, '-inf', now_ms - window_ms)

local count = redis.call('ZCARD', key)
if count < limit then
  redis.call('ZADD', key, now_ms, t[1] .. '.' .. t[2] .. '-' .. salt)
  redis.call('PEXPIRE', key, window_ms)
  return 1
end

return 0
"#;

/// Sliding-window store shared by every service instance
pub struct RedisWindowRepository {
    client: Arc<RedisClient>,
    script: Script,
}

impl RedisWindowRepository {
    pub fn new(client: Arc<RedisClient>) -> Self {
        Self {
            client,
            script: Script::new(SLIDING_WINDOW_SCRIPT),
        }
    }
}

#[async_trait]
impl WindowRepository for RedisWindowRepository {
    async fn try_acquire(&self, key: &str, limit: u32, window: Duration) -> DomainResult<bool> {
        let window_ms = window_millis(window);
        let salt = member_salt();
        let script = &self.script;

        let admitted = self
            .client
            .run("sliding_window", |mut conn| async move {
                script
                    .key(key)
                    .arg(limit)
                    .arg(window_ms)
                    .arg(salt)
                    .invoke_async::<_, i64>(&mut conn)
                    .await
            })
            .await?;

        debug!(key = %key, limit, window_ms, admitted = admitted == 1, "sliding window evaluated");
        Ok(admitted == 1)
    }
}

/// Window length in whole milliseconds, at least one
pub(crate) fn window_millis(window: Duration) -> u64 {
    u64::try_from(window.as_millis()).unwrap_or(u64::MAX).max(1)
}

/// Random suffix keeping members distinct when two requests share a microsecond
pub(crate) fn member_salt() -> String {
    format!("{:016x}", rand::random::<u64>())
}
