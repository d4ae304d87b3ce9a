//! Redis-backed key-value store using a `bb8` connection pool.

use std::time::Duration;

use async_trait::async_trait;
use bb8_redis::RedisConnectionManager;
use bb8_redis::bb8::{Pool, PooledConnection};
use bb8_redis::redis;
use tracing::debug;

use crate::domain::ports::{KeyValueStore, KeyValueStoreError};
use crate::domain::{KeyPrefix, StoreKey};

const SCAN_BATCH: usize = 200;
const DEFAULT_POOL_SIZE: u32 = 16;
const DEFAULT_CONNECTION_TIMEOUT: Duration = Duration::from_secs(5);

/// Store adapter that maps each port call onto a single Redis command.
///
/// Prefix listing walks the keyspace with `SCAN MATCH`, so results are
/// sorted and deduplicated before being returned.
#[derive(Clone)]
pub struct RedisKeyValueStore {
    pool: Pool<RedisConnectionManager>,
}

impl RedisKeyValueStore {
    /// Build a pool against `url` (for example `redis://127.0.0.1:6379/0`).
    pub async fn connect(url: &str) -> Result<Self, KeyValueStoreError> {
        let manager = RedisConnectionManager::new(url)
            .map_err(|err| KeyValueStoreError::backend(format!("invalid redis url: {err}")))?;
        let pool = Pool::builder()
            .max_size(DEFAULT_POOL_SIZE)
            .connection_timeout(DEFAULT_CONNECTION_TIMEOUT)
            .build(manager)
            .await
            .map_err(|err| KeyValueStoreError::backend(err.to_string()))?;
        Ok(Self { pool })
    }

    async fn connection(
        &self,
    ) -> Result<PooledConnection<'_, RedisConnectionManager>, KeyValueStoreError> {
        self.pool
            .get()
            .await
            .map_err(|err| KeyValueStoreError::backend(format!("pool checkout failed: {err}")))
    }
}

fn map_redis_error(err: redis::RedisError) -> KeyValueStoreError {
    if matches!(err.kind(), redis::ErrorKind::UnexpectedReturnType) {
        KeyValueStoreError::serialization(err.to_string())
    } else {
        KeyValueStoreError::backend(err.to_string())
    }
}

/// Escape glob metacharacters so the prefix matches literally.
fn match_pattern(prefix: &KeyPrefix) -> String {
    let mut pattern = String::with_capacity(prefix.as_str().len() + 1);
    for c in prefix.as_str().chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('*');
    pattern
}

/// Seconds for `EX`, rounding sub-second remainders up so a TTL never
/// collapses to zero.
fn expiry_seconds(ttl: Duration) -> u64 {
    let secs = ttl.as_secs();
    if ttl.subsec_nanos() > 0 || secs == 0 {
        secs + 1
    } else {
        secs
    }
}

#[async_trait]
impl KeyValueStore for RedisKeyValueStore {
    async fn get(&self, key: &StoreKey) -> Result<Option<String>, KeyValueStoreError> {
        let mut conn = self.connection().await?;
        let value: Option<String> = redis::cmd("GET")
            .arg(key.as_str())
            .query_async(&mut *conn)
            .await
            .map_err(map_redis_error)?;
        Ok(value)
    }

    async fn put(
        &self,
        key: &StoreKey,
        value: &str,
        ttl: Option<Duration>,
    ) -> Result<(), KeyValueStoreError> {
        let mut conn = self.connection().await?;
        let mut cmd = redis::cmd("SET");
        cmd.arg(key.as_str()).arg(value);
        if let Some(ttl) = ttl {
            cmd.arg("EX").arg(expiry_seconds(ttl));
        }
        let () = cmd.query_async(&mut *conn).await.map_err(map_redis_error)?;
        Ok(())
    }

    async fn delete(&self, key: &StoreKey) -> Result<(), KeyValueStoreError> {
        let mut conn = self.connection().await?;
        let removed: i64 = redis::cmd("DEL")
            .arg(key.as_str())
            .query_async(&mut *conn)
            .await
            .map_err(map_redis_error)?;
        debug!(key = %key, removed, "redis delete");
        Ok(())
    }

    async fn list(&self, prefix: &KeyPrefix) -> Result<Vec<StoreKey>, KeyValueStoreError> {
        let mut conn = self.connection().await?;
        let pattern = match_pattern(prefix);
        let mut cursor: u64 = 0;
        let mut raw_keys: Vec<String> = Vec::new();
        loop {
            let (next, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut *conn)
                .await
                .map_err(map_redis_error)?;
            raw_keys.extend(batch);
            if next == 0 {
                break;
            }
            cursor = next;
        }
        raw_keys.sort();
        raw_keys.dedup();
        raw_keys
            .into_iter()
            .map(|key| {
                StoreKey::new(key).map_err(|err| KeyValueStoreError::serialization(err.to_string()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RouteId;
    use rstest::rstest;

    #[rstest]
    fn match_pattern_appends_wildcard() {
        let route = RouteId::new("ab12").expect("route id");
        assert_eq!(
            match_pattern(&KeyPrefix::route_delivery_photos(&route)),
            "delivery_photo:ab12:*"
        );
    }

    #[rstest]
    #[case(Duration::from_secs(86_400), 86_400)]
    #[case(Duration::from_millis(1_500), 2)]
    #[case(Duration::ZERO, 1)]
    fn expiry_never_rounds_to_zero(#[case] ttl: Duration, #[case] expected: u64) {
        assert_eq!(expiry_seconds(ttl), expected);
    }

    #[rstest]
    fn unexpected_reply_types_are_serialization_errors() {
        let err = redis::RedisError::from((
            redis::ErrorKind::UnexpectedReturnType,
            "expected a bulk string",
        ));
        assert!(matches!(
            map_redis_error(err),
            KeyValueStoreError::Serialization { .. }
        ));
    }

    #[rstest]
    fn other_redis_failures_are_backend_errors() {
        let err = redis::RedisError::from((redis::ErrorKind::Io, "connection reset"));
        assert!(matches!(map_redis_error(err), KeyValueStoreError::Backend { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn connect_rejects_malformed_url() {
        let result = RedisKeyValueStore::connect("not a url").await;
        assert!(matches!(result, Err(KeyValueStoreError::Backend { .. })));
    }
}
