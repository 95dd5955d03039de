use chrono::Utc;
use indexmap::IndexMap;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::models::{Sensor, SensorDraft};

pub(crate) mod fleet;
mod reading;

pub use fleet::default_fleet;

struct EngineState {
    sensors: IndexMap<u32, Sensor>,
    running: bool,
    next_id: u32,
}

/// Drives the simulated sensor fleet. Each sensor gets its own periodic
/// task, phased independently of the others: adding or removing a sensor
/// never disturbs another sensor's timer, and pausing cancels every task
/// until the next resume re-arms them from a fresh phase.
///
/// All mutation funnels through one mutex, so a committed tick is visible
/// to the very next [`SimulationEngine::sensors`] call.
pub struct SimulationEngine {
    state: Arc<Mutex<EngineState>>,
    tasks: IndexMap<u32, JoinHandle<()>>,
    seed: u64,
}

impl SimulationEngine {
    /// Create an engine seeded from entropy, already running.
    pub fn new(fleet: Vec<SensorDraft>) -> Self {
        Self::with_seed(fleet, rand::random())
    }

    /// Create a running engine with a fixed seed, so every sensor's reading
    /// stream is reproducible. Must be called from within a tokio runtime.
    pub fn with_seed(fleet: Vec<SensorDraft>, seed: u64) -> Self {
        let mut engine = Self {
            state: Arc::new(Mutex::new(EngineState {
                sensors: IndexMap::new(),
                running: true,
                next_id: 1,
            })),
            tasks: IndexMap::new(),
            seed,
        };
        for draft in fleet {
            engine.add_sensor(draft);
        }
        engine
    }

    /// Current snapshot of the fleet, in insertion order.
    pub fn sensors(&self) -> Vec<Sensor> {
        let state = self.state.lock().expect("sensor state lock poisoned");
        state.sensors.values().cloned().collect()
    }

    pub fn is_running(&self) -> bool {
        self.state.lock().expect("sensor state lock poisoned").running
    }

    /// Resume ticking. Every sensor restarts from a fresh phase: its first
    /// tick lands one full period after this call, not immediately.
    /// A no-op when already running.
    pub fn start(&mut self) {
        let restart: Vec<(u32, u64)> = {
            let mut state = self.state.lock().expect("sensor state lock poisoned");
            if state.running {
                return;
            }
            state.running = true;
            state
                .sensors
                .values()
                .map(|s| (s.id, s.frequency_ms))
                .collect()
        };

        for (id, frequency_ms) in restart {
            self.spawn_sensor_task(id, frequency_ms);
        }
        info!("Simulation resumed");
    }

    /// Pause ticking. Cancels every outstanding per-sensor timer; no tick
    /// lands after this returns. A no-op when already stopped.
    pub fn stop(&mut self) {
        {
            let mut state = self.state.lock().expect("sensor state lock poisoned");
            if !state.running {
                return;
            }
            state.running = false;
        }

        for (_, handle) in self.tasks.drain(..) {
            handle.abort();
        }
        info!("Simulation paused");
    }

    pub fn toggle(&mut self) {
        if self.is_running() {
            self.stop();
        } else {
            self.start();
        }
    }

    /// Insert a sensor built from `draft`, with defaults substituted for
    /// anything missing or malformed. The id is engine-assigned and never
    /// reused. When the engine is running the sensor's timer is armed
    /// immediately, first tick one full period out; when paused it stays
    /// dormant until the next `start()`.
    pub fn add_sensor(&mut self, draft: SensorDraft) -> Sensor {
        let (sensor, running) = {
            let mut state = self.state.lock().expect("sensor state lock poisoned");
            let id = state.next_id;
            state.next_id += 1;
            let sensor = draft.into_sensor(id, Utc::now());
            state.sensors.insert(id, sensor.clone());
            (sensor, state.running)
        };

        debug!(
            "Added sensor {} ({}, every {}ms)",
            sensor.name, sensor.kind, sensor.frequency_ms
        );
        if running {
            self.spawn_sensor_task(sensor.id, sensor.frequency_ms);
        }
        sensor
    }

    /// Remove a sensor and cancel its timer. Other sensors' phases are
    /// untouched. Returns the removed record, if the id was known.
    pub fn remove_sensor(&mut self, id: u32) -> Option<Sensor> {
        if let Some(handle) = self.tasks.shift_remove(&id) {
            handle.abort();
        }
        let mut state = self.state.lock().expect("sensor state lock poisoned");
        state.sensors.shift_remove(&id)
    }

    fn spawn_sensor_task(&mut self, id: u32, frequency_ms: u64) {
        let state = Arc::clone(&self.state);
        // Derive a per-sensor stream from the engine seed so runs replay
        let mut rng = StdRng::seed_from_u64(self.seed.wrapping_add(id as u64));
        let period = Duration::from_millis(frequency_ms);
        // Anchor the phase at arming time, not at the task's first poll
        let first_tick = Instant::now() + period;

        let handle = tokio::spawn(async move {
            let mut interval = interval_at(first_tick, period);
            // No catch-up of missed ticks
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                interval.tick().await;

                let mut state = state.lock().expect("sensor state lock poisoned");
                if !state.running {
                    break;
                }
                let Some(sensor) = state.sensors.get_mut(&id) else {
                    break;
                };

                let value = reading::random_value(&mut rng, sensor.min, sensor.max);
                let status = reading::classify(value, sensor.min, sensor.max, rng.gen());
                sensor.value = sensor.kind.format_value(value, &sensor.unit);
                sensor.status = status;
                sensor.last_updated = Utc::now();
                debug!("Sensor {} reads {} ({})", sensor.name, sensor.value, status);
            }
        });
        self.tasks.insert(id, handle);
    }
}

impl Drop for SimulationEngine {
    fn drop(&mut self) {
        for (_, handle) in self.tasks.drain(..) {
            handle.abort();
        }
    }
}
