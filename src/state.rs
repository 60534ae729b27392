use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use uuid::Uuid;

use crate::clients::runner::RunnerClient;
use crate::config::Config;
use crate::db::store::Store;
use crate::ws::hub::BroadcastHub;
use crate::ws::registry::RoomRegistry;

/// Positive room-existence lookups are cached this long. Rooms are never
/// deleted, so a cached hit cannot go stale.
const ROOM_CACHE_TTL: Duration = Duration::from_secs(300);
const ROOM_CACHE_CAPACITY: u64 = 10_000;

/// Shared service state, injected into every handler.
pub struct AppState {
    pub config: Config,
    pub store: Store,
    pub registry: Arc<RoomRegistry>,
    pub hub: BroadcastHub,
    pub runner: Option<RunnerClient>,
    room_cache: Cache<Uuid, ()>,
}

impl AppState {
    pub fn new(config: Config, store: Store) -> Self {
        let registry = Arc::new(RoomRegistry::new());
        let hub = BroadcastHub::new(registry.clone());
        let runner = config.runner_url.clone().map(|base_url| {
            RunnerClient::new(
                base_url,
                Duration::from_secs(config.execution_timeout_secs),
                config.max_output_length,
            )
        });
        let room_cache = Cache::builder()
            .max_capacity(ROOM_CACHE_CAPACITY)
            .time_to_idle(ROOM_CACHE_TTL)
            .build();

        Self {
            config,
            store,
            registry,
            hub,
            runner,
            room_cache,
        }
    }

    /// Room-existence check backing the WebSocket handshake. Only positive
    /// results are cached so a just-created room is visible immediately.
    pub async fn room_exists(&self, room_id: Uuid) -> Result<bool, sqlx::Error> {
        if self.room_cache.get(&room_id).await.is_some() {
            return Ok(true);
        }
        let exists = self.store.room_exists(room_id).await?;
        if exists {
            self.room_cache.insert(room_id, ()).await;
        }
        Ok(exists)
    }
}
