//! Redis backends for [`RankStore`](podium_store::RankStore) and
//! [`DistributedLock`](podium_lock::DistributedLock).
//!
//! Both share one auto-reconnecting [`ConnectionManager`]; open it with
//! [`connect`] and hand clones to [`RedisStore::new`] and [`RedisLock::new`].

mod lock;
mod store;

pub use lock::RedisLock;
pub use redis::aio::ConnectionManager;
pub use store::RedisStore;

use podium_store::{StoreError, StoreResult};
use tracing::info;

/// Open a managed connection to the Redis server at `url`.
pub async fn connect(url: &str) -> StoreResult<ConnectionManager> {
    let client = redis::Client::open(url).map_err(store_error)?;
    let manager = client.get_connection_manager().await.map_err(store_error)?;
    info!(server = %client.get_connection_info().addr, "connected to redis");
    Ok(manager)
}

/// Whether the failure was in reaching the server rather than in a command.
fn is_connection_error(err: &redis::RedisError) -> bool {
    err.is_io_error()
        || err.is_connection_dropped()
        || err.is_connection_refusal()
        || err.is_timeout()
}

pub(crate) fn store_error(err: redis::RedisError) -> StoreError {
    if is_connection_error(&err) {
        StoreError::Connection(err.to_string())
    } else {
        StoreError::Command(err.to_string())
    }
}
