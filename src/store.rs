//! Append-only time-series storage.
//!
//! The acquisition loop appends one row per complete tick; the read API and
//! any external display process query windows of recent rows. Rows are never
//! updated or deleted here; retention is somebody else's problem.

use anyhow::Result;
use sqlx::PgPool;

use crate::db::models::{Measurement, SensorReading};

/// Storage contract for the sensor time series.
///
/// `recent` returns the newest rows first (descending id); callers that want
/// a chronological window reverse the result. This fetch-newest-then-reverse
/// shape is the standard access path for plots and latest-value lookups.
#[allow(async_fn_in_trait)]
pub trait TimeSeriesStore {
    /// Insert one row. `id` and `recorded_at` are assigned by the store;
    /// the stored row is returned.
    async fn append(&self, measurement: &Measurement) -> Result<SensorReading>;

    /// The most recent `limit` rows, newest first.
    async fn recent(&self, limit: i64) -> Result<Vec<SensorReading>>;

    /// The single most recent row, if any.
    async fn latest(&self) -> Result<Option<SensorReading>>;
}

/// Postgres-backed store over the `sensor_readings` table.
#[derive(Clone)]
pub struct PgTimeSeriesStore {
    pool: PgPool,
}

impl PgTimeSeriesStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl TimeSeriesStore for PgTimeSeriesStore {
    async fn append(&self, measurement: &Measurement) -> Result<SensorReading> {
        let row = sqlx::query_as::<_, SensorReading>(
            r#"
            INSERT INTO sensor_readings
                (temperature, pressure, humidity, gas_resistance, air_quality)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, recorded_at, temperature, pressure, humidity,
                      gas_resistance, air_quality
            "#,
        )
        .bind(measurement.temperature)
        .bind(measurement.pressure)
        .bind(measurement.humidity)
        .bind(measurement.gas.map(|g| g.gas_resistance))
        .bind(measurement.gas.map(|g| g.air_quality))
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn recent(&self, limit: i64) -> Result<Vec<SensorReading>> {
        let rows = sqlx::query_as::<_, SensorReading>(
            r#"
            SELECT id, recorded_at, temperature, pressure, humidity,
                   gas_resistance, air_quality
            FROM sensor_readings
            ORDER BY id DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn latest(&self) -> Result<Option<SensorReading>> {
        Ok(self.recent(1).await?.into_iter().next())
    }
}
