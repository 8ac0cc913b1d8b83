pub mod simulated;

use thiserror::Error;

pub use simulated::SimulatedBme680;

/// Highest gas-heater profile slot supported by the BME680.
pub const MAX_HEATER_PROFILE: u8 = 9;

#[derive(Debug, Error)]
pub enum SensorError {
    /// Bus-level failure talking to the device. The acquisition loop treats
    /// this as recoverable and retries on the next tick.
    #[error("sensor i/o failure: {0}")]
    Io(String),
    /// Heater profile slot outside the device's 0..=9 range.
    #[error("unsupported gas heater profile {0} (device has slots 0..=9)")]
    InvalidHeaterProfile(u8),
}

/// Oversampling level for one measurement channel. Higher oversampling
/// trades response time for less noise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Oversample {
    Skip,
    X1,
    X2,
    X4,
    X8,
    X16,
}

/// Gas-heater run parameters for one measurement cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaterConfig {
    /// Target hot-plate temperature, °C.
    pub temperature_c: u16,
    /// Heating time before the resistance is read, ms.
    pub duration_ms: u16,
    /// Heater profile slot to store the settings in, 0..=9.
    pub profile: u8,
}

/// Full measurement configuration applied once before sampling starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorSettings {
    pub humidity_oversample: Oversample,
    pub pressure_oversample: Oversample,
    pub temperature_oversample: Oversample,
    /// IIR filter size; damps momentary environment changes such as a door
    /// slamming.
    pub filter_size: u8,
    pub heater: HeaterConfig,
}

impl Default for SensorSettings {
    /// The configuration the service runs with: 2x/4x/8x oversampling for
    /// humidity/pressure/temperature, filter size 3, heater at 320 °C for
    /// 150 ms on profile 0.
    fn default() -> Self {
        Self {
            humidity_oversample: Oversample::X2,
            pressure_oversample: Oversample::X4,
            temperature_oversample: Oversample::X8,
            filter_size: 3,
            heater: HeaterConfig {
                temperature_c: 320,
                duration_ms: 150,
                profile: 0,
            },
        }
    }
}

/// One raw measurement as reported by the device.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawSample {
    /// Degrees Celsius.
    pub temperature: f64,
    /// Hectopascals.
    pub pressure: f64,
    /// Percent relative humidity.
    pub humidity: f64,
    /// Ohms. Only meaningful when `heat_stable` is true.
    pub gas_resistance: f64,
    /// Whether the gas heater had reached its target temperature for this
    /// measurement cycle.
    pub heat_stable: bool,
}

/// The BME680 device boundary.
///
/// The device is a singleton resource: a handle is owned by exactly one
/// caller at a time (the calibrator during burn-in, then the sampler), so
/// overlapping reads cannot happen. A read may block for the device's
/// internal measurement latency (low hundreds of milliseconds with the
/// default heater settings) but never spins indefinitely.
///
/// Implementations: [`SimulatedBme680`] for off-device runs and tests; the
/// I²C hardware adapter is deployment-specific and plugs in behind this
/// trait.
pub trait Bme680 {
    /// Apply oversampling, filter and gas-heater settings.
    fn configure(&mut self, settings: &SensorSettings) -> Result<(), SensorError>;

    /// Trigger one measurement.
    ///
    /// Returns `Ok(None)` when the device has no new data this tick — a
    /// transient condition, not a fault; the caller simply retries on its
    /// next tick.
    fn sample(&mut self) -> Result<Option<RawSample>, SensorError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_match_deployment_configuration() {
        let s = SensorSettings::default();
        assert_eq!(s.humidity_oversample, Oversample::X2);
        assert_eq!(s.pressure_oversample, Oversample::X4);
        assert_eq!(s.temperature_oversample, Oversample::X8);
        assert_eq!(s.filter_size, 3);
        assert_eq!(s.heater.temperature_c, 320);
        assert_eq!(s.heater.duration_ms, 150);
        assert_eq!(s.heater.profile, 0);
    }
}
