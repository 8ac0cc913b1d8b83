//! Deterministic stand-in for the physical BME680.
//!
//! Produces a plausible indoor climate trace: the first samples report
//! `heat_stable = false` while the virtual hot plate warms up, after which
//! gas resistance climbs towards a plateau the way a real sensor drifts
//! during burn-in. All variation is derived from the sample counter, so a
//! given instance always produces the same sequence.

use super::{Bme680, RawSample, SensorError, SensorSettings, MAX_HEATER_PROFILE};

/// Number of samples before the virtual heater reports stability.
const WARM_UP_SAMPLES: u64 = 5;

/// Gas resistance the virtual sensor settles towards, ohms.
const GAS_PLATEAU_OHMS: f64 = 250_000.0;

pub struct SimulatedBme680 {
    ticks: u64,
    configured: bool,
}

impl SimulatedBme680 {
    pub fn new() -> Self {
        Self {
            ticks: 0,
            configured: false,
        }
    }
}

impl Default for SimulatedBme680 {
    fn default() -> Self {
        Self::new()
    }
}

impl Bme680 for SimulatedBme680 {
    fn configure(&mut self, settings: &SensorSettings) -> Result<(), SensorError> {
        if settings.heater.profile > MAX_HEATER_PROFILE {
            return Err(SensorError::InvalidHeaterProfile(settings.heater.profile));
        }
        self.configured = true;
        Ok(())
    }

    fn sample(&mut self) -> Result<Option<RawSample>, SensorError> {
        self.ticks += 1;
        let t = self.ticks as f64;

        // Slow sinusoidal wander around comfortable indoor values.
        let temperature = 21.5 + 1.5 * (t / 600.0).sin();
        let pressure = 1013.0 + 2.0 * (t / 1800.0).sin();
        let humidity = 42.0 + 6.0 * (t / 900.0).sin();

        // Exponential approach to the plateau, mimicking the burn-in drift
        // the calibration procedure exists to discount.
        let gas_resistance = GAS_PLATEAU_OHMS * (1.0 - (-t / 120.0).exp());

        Ok(Some(RawSample {
            temperature,
            pressure,
            humidity,
            gas_resistance,
            // Without a configured heater profile the hot plate never runs,
            // so stability is never reported.
            heat_stable: self.configured && self.ticks > WARM_UP_SAMPLES,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensor::HeaterConfig;

    #[test]
    fn heater_is_unstable_during_warm_up() {
        let mut sensor = SimulatedBme680::new();
        sensor.configure(&SensorSettings::default()).unwrap();
        for _ in 0..WARM_UP_SAMPLES {
            let s = sensor.sample().unwrap().unwrap();
            assert!(!s.heat_stable);
        }
        let s = sensor.sample().unwrap().unwrap();
        assert!(s.heat_stable);
    }

    #[test]
    fn gas_resistance_drifts_upward_towards_plateau() {
        let mut sensor = SimulatedBme680::new();
        let mut prev = 0.0;
        for _ in 0..300 {
            let s = sensor.sample().unwrap().unwrap();
            assert!(s.gas_resistance > prev);
            assert!(s.gas_resistance < GAS_PLATEAU_OHMS);
            prev = s.gas_resistance;
        }
    }

    #[test]
    fn never_heat_stable_without_heater_configuration() {
        let mut sensor = SimulatedBme680::new();
        for _ in 0..(WARM_UP_SAMPLES * 4) {
            assert!(!sensor.sample().unwrap().unwrap().heat_stable);
        }
    }

    #[test]
    fn sequence_is_deterministic() {
        let mut a = SimulatedBme680::new();
        let mut b = SimulatedBme680::new();
        for _ in 0..50 {
            assert_eq!(a.sample().unwrap(), b.sample().unwrap());
        }
    }

    #[test]
    fn rejects_out_of_range_heater_profile() {
        let mut sensor = SimulatedBme680::new();
        let settings = SensorSettings {
            heater: HeaterConfig {
                profile: 10,
                ..SensorSettings::default().heater
            },
            ..SensorSettings::default()
        };
        let err = sensor.configure(&settings).unwrap_err();
        assert!(matches!(err, SensorError::InvalidHeaterProfile(10)));
    }

    #[test]
    fn accepts_default_settings() {
        let mut sensor = SimulatedBme680::new();
        assert!(sensor.configure(&SensorSettings::default()).is_ok());
    }
}
