//! Burn-in calibration.
//!
//! Runs the sensor for a fixed wall-clock window so the gas hot plate can
//! settle, then derives the gas-resistance baseline the air-quality scorer
//! measures against. Only heat-stable samples are retained, and only the
//! tail of the run is averaged: resistance drifts upward while the sensor
//! warms, and the early transient would drag the baseline down.

use std::time::Duration;

use anyhow::{bail, Result};
use tokio::time;
use tracing::{debug, info, warn};

use crate::sensor::Bme680;

/// Number of trailing stable samples averaged into the baseline.
pub const BASELINE_WINDOW: usize = 50;

/// Recommended burn-in duration for a settled baseline.
pub const DEFAULT_BURN_IN: Duration = Duration::from_secs(300);

/// Mean of the last [`BASELINE_WINDOW`] values, or of all of them when fewer
/// were collected. `None` when no stable samples were collected at all.
///
/// Dividing by the actual tail length rather than a fixed 50 keeps the
/// result a true mean when the sensor was slow to stabilise.
pub fn baseline_from(samples: &[f64]) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }
    let tail = &samples[samples.len().saturating_sub(BASELINE_WINDOW)..];
    Some(tail.iter().sum::<f64>() / tail.len() as f64)
}

/// Sample `sensor` at ~1 Hz for `duration` and return the gas baseline.
///
/// Always terminates once `duration` has elapsed, whatever the sensor does.
/// Errors only when not a single heat-stable sample was seen in the whole
/// window — a zero baseline would be invalid scorer input, so the caller
/// should fail fast rather than start the acquisition loop.
///
/// The calibrator borrows the device exclusively for the whole window;
/// regular sampling must not start until it returns.
pub async fn burn_in<D: Bme680>(sensor: &mut D, duration: Duration) -> Result<f64> {
    info!(duration_secs = duration.as_secs(), "Gas baseline burn-in started");

    let window = time::sleep(duration);
    tokio::pin!(window);
    let mut ticker = time::interval(Duration::from_secs(1));
    let mut retained: Vec<f64> = Vec::new();

    loop {
        tokio::select! {
            _ = &mut window => break,
            _ = ticker.tick() => match sensor.sample() {
                Ok(Some(s)) if s.heat_stable => retained.push(s.gas_resistance),
                Ok(Some(_)) => debug!("Heater not yet stable; discarding burn-in sample"),
                Ok(None) => debug!("No new sensor data this burn-in tick"),
                Err(e) => warn!(error = %e, "Sensor read failed during burn-in"),
            },
        }
    }

    match baseline_from(&retained) {
        Some(baseline) => {
            if retained.len() < BASELINE_WINDOW {
                warn!(
                    samples = retained.len(),
                    "Burn-in collected fewer stable samples than the baseline window; \
                     averaging what was collected"
                );
            }
            info!(
                samples = retained.len(),
                gas_baseline = baseline,
                "Burn-in complete"
            );
            Ok(baseline)
        }
        None => bail!(
            "burn-in collected no heat-stable samples in {}s; cannot establish a gas baseline",
            duration.as_secs()
        ),
    }
}
