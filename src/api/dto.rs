use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::db::models::SensorReading;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SensorReadingDto {
    pub id: i64,
    pub recorded_at: DateTime<Utc>,
    /// Degrees Celsius.
    pub temperature: f64,
    /// Hectopascals.
    pub pressure: f64,
    /// Percent relative humidity.
    pub humidity: f64,
    /// Ohms. `null` for partial readings taken before the gas heater was
    /// stable.
    pub gas_resistance: Option<f64>,
    /// Percentage score. `null` whenever `gas_resistance` is.
    pub air_quality: Option<f64>,
}

impl From<SensorReading> for SensorReadingDto {
    fn from(r: SensorReading) -> Self {
        Self {
            id: r.id,
            recorded_at: r.recorded_at,
            temperature: r.temperature,
            pressure: r.pressure,
            humidity: r.humidity,
            gas_resistance: r.gas_resistance,
            air_quality: r.air_quality,
        }
    }
}
