use std::sync::Arc;

use tokio::sync::RwLock;

use crate::db::models::SensorReading;

/// In-memory copy of the most recently stored `SensorReading`.
///
/// The acquisition loop overwrites it after every successful append; the
/// HTTP API serves "latest" lookups from it without touching the database.
/// Wrapped in `Arc` so it can be cheaply cloned and shared across tasks.
#[derive(Clone, Default)]
pub struct ReadingCache {
    inner: Arc<RwLock<Option<SensorReading>>>,
}

impl ReadingCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the cached reading.
    pub async fn update(&self, reading: SensorReading) {
        *self.inner.write().await = Some(reading);
    }

    /// The most recent reading, if any tick has stored one yet.
    pub async fn latest(&self) -> Option<SensorReading> {
        self.inner.read().await.clone()
    }
}
