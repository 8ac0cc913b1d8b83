//! The acquisition loop.
//!
//! One sample per tick, strictly sequential: read the sensor, score the
//! sample if the gas heater was stable, append to the store, wait for the
//! next tick. The device handle is owned exclusively by this service, so
//! overlapping reads (undefined on the hardware) cannot happen.

use std::time::Duration;

use anyhow::Result;
use tokio::sync::watch;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::{
    air_quality,
    db::models::{GasMeasurement, Measurement},
    reading_cache::ReadingCache,
    sensor::Bme680,
    store::TimeSeriesStore,
};

pub struct SamplerService<D: Bme680, S: TimeSeriesStore> {
    sensor: D,
    store: S,
    cache: ReadingCache,
    /// Burn-in gas baseline; immutable for the life of the loop.
    gas_baseline: f64,
    interval: Duration,
}

impl<D: Bme680, S: TimeSeriesStore> SamplerService<D, S> {
    /// `gas_baseline` must be positive; the scorer has no meaningful output
    /// for a zero or negative baseline.
    pub fn new(
        sensor: D,
        store: S,
        cache: ReadingCache,
        gas_baseline: f64,
        interval: Duration,
    ) -> Result<Self> {
        anyhow::ensure!(
            gas_baseline > 0.0,
            "gas baseline must be positive, got {gas_baseline}"
        );
        Ok(Self {
            sensor,
            store,
            cache,
            gas_baseline,
            interval,
        })
    }

    /// Read the sensor once and assemble a `Measurement`.
    ///
    /// `Ok(None)` means the device had no new data this tick; the caller
    /// retries next tick. A heat-unstable sample yields a partial
    /// measurement (`gas: None`); the scorer runs only for stable ones.
    pub fn read_once(&mut self) -> Result<Option<Measurement>> {
        let Some(raw) = self.sensor.sample()? else {
            return Ok(None);
        };

        let gas = raw.heat_stable.then(|| GasMeasurement {
            gas_resistance: raw.gas_resistance,
            air_quality: air_quality::score(raw.gas_resistance, raw.humidity, self.gas_baseline),
        });

        Ok(Some(Measurement {
            temperature: raw.temperature,
            pressure: raw.pressure,
            humidity: raw.humidity,
            gas,
        }))
    }

    /// One full tick: read, score, persist, cache.
    ///
    /// A failed append is logged and swallowed; the reading for this tick is
    /// lost but acquisition must survive transient storage outages.
    pub async fn tick(&mut self) {
        let measurement = match self.read_once() {
            Ok(Some(m)) => m,
            Ok(None) => {
                debug!("No new sensor data this tick");
                return;
            }
            Err(e) => {
                warn!(error = %e, "Sensor read failed; retrying next tick");
                return;
            }
        };

        if !measurement.is_complete() {
            debug!("Gas heater not yet stable; storing partial reading");
        }

        match self.store.append(&measurement).await {
            Ok(stored) => self.cache.update(stored).await,
            Err(e) => error!(error = %e, "Failed to append reading; continuing"),
        }
    }

    /// Runs the sampling loop until `shutdown` flips to `true`.
    /// Spawn this via `tokio::spawn`. Stops at tick granularity: a tick in
    /// progress always completes before the loop exits.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        info!(
            interval_secs = self.interval.as_secs(),
            gas_baseline = self.gas_baseline,
            "Sampling loop started"
        );

        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => self.tick().await,
                changed = shutdown.changed() => {
                    // A dropped sender also means nobody will ask us to
                    // keep running.
                    if changed.is_err() || *shutdown.borrow() {
                        info!("Sampling loop stopping");
                        break;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensor::{RawSample, SensorError, SensorSettings};
    use crate::store::memory::MemoryTimeSeriesStore;

    struct FakeSensor {
        responses: Vec<Result<Option<RawSample>, SensorError>>,
    }

    impl FakeSensor {
        fn new(mut responses: Vec<Result<Option<RawSample>, SensorError>>) -> Self {
            // Pop from the back in order.
            responses.reverse();
            Self { responses }
        }
    }

    impl Bme680 for FakeSensor {
        fn configure(&mut self, _settings: &SensorSettings) -> Result<(), SensorError> {
            Ok(())
        }

        fn sample(&mut self) -> Result<Option<RawSample>, SensorError> {
            self.responses.pop().unwrap_or(Ok(None))
        }
    }

    fn raw(heat_stable: bool) -> RawSample {
        RawSample {
            temperature: 22.0,
            pressure: 1011.0,
            humidity: 40.0,
            gas_resistance: 80_000.0,
            heat_stable,
        }
    }

    fn sampler(
        sensor: FakeSensor,
        store: MemoryTimeSeriesStore,
    ) -> SamplerService<FakeSensor, MemoryTimeSeriesStore> {
        SamplerService::new(
            sensor,
            store,
            ReadingCache::new(),
            160_000.0,
            Duration::from_secs(1),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn complete_sample_is_scored_and_stored() {
        let store = MemoryTimeSeriesStore::new();
        let mut s = sampler(FakeSensor::new(vec![Ok(Some(raw(true)))]), store.clone());

        s.tick().await;

        let stored = store.latest().await.unwrap().unwrap();
        assert_eq!(stored.temperature, 22.0);
        assert_eq!(stored.gas_resistance, Some(80_000.0));
        // humidity at its 40 % baseline → 25 points; gas at half the
        // baseline → 37.5 points.
        assert_eq!(stored.air_quality, Some(62.5));
    }

    #[tokio::test]
    async fn unstable_heater_yields_partial_reading_not_an_error() {
        let store = MemoryTimeSeriesStore::new();
        let mut s = sampler(FakeSensor::new(vec![Ok(Some(raw(false)))]), store.clone());

        s.tick().await;

        let stored = store.latest().await.unwrap().unwrap();
        assert_eq!(stored.temperature, 22.0);
        assert_eq!(stored.humidity, 40.0);
        assert_eq!(stored.gas_resistance, None);
        assert_eq!(stored.air_quality, None);
    }

    #[tokio::test]
    async fn no_data_tick_stores_nothing() {
        let store = MemoryTimeSeriesStore::new();
        let mut s = sampler(FakeSensor::new(vec![Ok(None)]), store.clone());

        s.tick().await;

        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn sensor_error_is_swallowed_and_loop_continues() {
        let store = MemoryTimeSeriesStore::new();
        let mut s = sampler(
            FakeSensor::new(vec![
                Err(SensorError::Io("bus timeout".into())),
                Ok(Some(raw(true))),
            ]),
            store.clone(),
        );

        s.tick().await;
        assert_eq!(store.len().await, 0);

        s.tick().await;
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn store_outage_is_swallowed_and_recovers() {
        let store = MemoryTimeSeriesStore::new();
        let mut s = sampler(
            FakeSensor::new(vec![Ok(Some(raw(true))), Ok(Some(raw(true)))]),
            store.clone(),
        );

        store.set_fail_appends(true).await;
        s.tick().await;
        assert_eq!(store.len().await, 0);

        store.set_fail_appends(false).await;
        s.tick().await;
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn cache_tracks_last_stored_reading() {
        let store = MemoryTimeSeriesStore::new();
        let cache = ReadingCache::new();
        let mut s = SamplerService::new(
            FakeSensor::new(vec![Ok(Some(raw(true)))]),
            store,
            cache.clone(),
            160_000.0,
            Duration::from_secs(1),
        )
        .unwrap();

        assert!(cache.latest().await.is_none());
        s.tick().await;
        assert_eq!(cache.latest().await.unwrap().temperature, 22.0);
    }

    #[tokio::test]
    async fn rejects_non_positive_baseline() {
        let err = SamplerService::new(
            FakeSensor::new(vec![]),
            MemoryTimeSeriesStore::new(),
            ReadingCache::new(),
            0.0,
            Duration::from_secs(1),
        )
        .err()
        .unwrap();
        assert!(err.to_string().contains("must be positive"));
    }

    #[tokio::test(start_paused = true)]
    async fn run_finishes_current_tick_then_stops_on_shutdown() {
        let store = MemoryTimeSeriesStore::new();
        let responses = (0..100).map(|_| Ok(Some(raw(true)))).collect();
        let s = sampler(FakeSensor::new(responses), store.clone());

        let (tx, rx) = watch::channel(false);
        let handle = tokio::spawn(s.run(rx));

        // Let a few ticks elapse on paused time.
        time::sleep(Duration::from_secs(3)).await;
        let before = store.len().await;
        assert!(before >= 1);

        tx.send(true).unwrap();
        handle.await.unwrap();

        // Nothing is stored after the loop exits.
        time::sleep(Duration::from_secs(5)).await;
        assert_eq!(store.len().await, before);
    }
}
