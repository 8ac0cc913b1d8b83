use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One stored row of the `sensor_readings` time series.
///
/// `id` and `recorded_at` are server-assigned on insert. `gas_resistance`
/// and `air_quality` are `NULL` for partial readings (gas heater not yet
/// stable at sample time); they are always both present or both absent.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct SensorReading {
    pub id: i64,
    pub recorded_at: DateTime<Utc>,
    /// Degrees Celsius.
    pub temperature: f64,
    /// Hectopascals.
    pub pressure: f64,
    /// Percent relative humidity.
    pub humidity: f64,
    /// Ohms. Only meaningful for complete readings.
    pub gas_resistance: Option<f64>,
    /// Percentage score, typically near [0, 100] but not clamped.
    pub air_quality: Option<f64>,
}

/// A sample as produced by the acquisition loop, before it is stored.
///
/// The gas pair is `None` when the heater was not heat-stable for this
/// sample — a valid partial reading, not an error.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub temperature: f64,
    pub pressure: f64,
    pub humidity: f64,
    pub gas: Option<GasMeasurement>,
}

/// Gas resistance together with the air-quality score derived from it.
/// The two only exist together: the score is computed exactly when the
/// resistance reading is meaningful.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GasMeasurement {
    pub gas_resistance: f64,
    pub air_quality: f64,
}

impl Measurement {
    /// True when the reading carries all five fields (gas heater was stable).
    pub fn is_complete(&self) -> bool {
        self.gas.is_some()
    }
}
