use std::time::Duration;

use boid_core::{EntityKind, SimConfig, SimError, Simulation, Vector2D};
use boid_shared::{SimSettings, StatusResponse, WorldSnapshot};
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
fn console_warn(message: &str) {
    web_sys::console::warn_1(&JsValue::from_str(message));
}

#[cfg(target_arch = "wasm32")]
fn console_info(message: &str) {
    web_sys::console::log_1(&JsValue::from_str(message));
}

// Off the browser there is no console to talk to.
#[cfg(not(target_arch = "wasm32"))]
fn console_warn(message: &str) {
    log::warn!("{}", message);
}

#[cfg(not(target_arch = "wasm32"))]
fn console_info(message: &str) {
    log::info!("{}", message);
}

macro_rules! console_log {
    ($($t:tt)*) => (console_info(&format_args!($($t)*).to_string()))
}

macro_rules! console_warn {
    ($($t:tt)*) => (console_warn(&format_args!($($t)*).to_string()))
}

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Page clock in milliseconds as a `Duration`; `None` for negative or NaN.
fn page_time(now_ms: f64) -> Option<Duration> {
    Duration::try_from_secs_f64(now_ms / 1000.0).ok()
}

/// Browser-facing handle on a [`Simulation`].
///
/// The page owns the animation loop and the canvas; it calls `tick` once per
/// frame and draws whatever `snapshot_json` returns.
#[wasm_bindgen]
pub struct BoidSimulation {
    simulation: Simulation,
}

#[wasm_bindgen]
impl BoidSimulation {
    /// `now_ms` is the page clock at creation, the same clock later passed
    /// to `tick`, so lifespans of objects spawned before the first frame are
    /// counted from it.
    #[wasm_bindgen(constructor)]
    pub fn new(
        width: f32,
        height: f32,
        boid_count: usize,
        now_ms: f64,
    ) -> Result<BoidSimulation, JsValue> {
        let config = SimConfig {
            width,
            height,
            initial_boids: boid_count,
            ..SimConfig::default()
        };
        Self::from_config(config, now_ms).map_err(to_js)
    }

    /// Build from a JSON settings document; missing fields take defaults.
    pub fn with_settings(json: &str, now_ms: f64) -> Result<BoidSimulation, JsValue> {
        let settings = SimSettings::from_json(json).map_err(to_js)?;
        let config = SimConfig::try_from(settings).map_err(to_js)?;
        Self::from_config(config, now_ms).map_err(to_js)
    }

    /// Spawn `kind` at `(x, y)`. Unknown kinds are reported and ignored.
    pub fn spawn(&mut self, kind: &str, x: f32, y: f32) -> bool {
        match kind.parse::<EntityKind>() {
            Ok(kind) => {
                self.simulation.spawn(kind, Vector2D::new(x, y));
                true
            }
            Err(err) => {
                console_warn!("{}. Nothing spawned!", err);
                false
            }
        }
    }

    /// Remove objects of `kind` within the configured despawn radius of
    /// `(x, y)`, returning how many went.
    pub fn despawn(&mut self, kind: &str, x: f32, y: f32) -> usize {
        let result = kind
            .parse::<EntityKind>()
            .and_then(|kind| self.simulation.despawn_near(kind, Vector2D::new(x, y)));
        match result {
            Ok(removed) => removed,
            Err(err) => {
                console_warn!("{}. Nothing despawned!", err);
                0
            }
        }
    }

    /// Advance one step. `now_ms` is the page clock, e.g. `performance.now()`.
    pub fn tick(&mut self, now_ms: f64) {
        let now = page_time(now_ms).unwrap_or(self.simulation.clock());
        self.simulation.tick(now);
    }

    pub fn resize(&mut self, width: f32, height: f32) -> bool {
        match self.simulation.resize(width, height) {
            Ok(()) => true,
            Err(err) => {
                console_warn!("{}", err);
                false
            }
        }
    }

    pub fn set_wrap(&mut self, wrap: bool) {
        self.simulation.set_wrap(wrap);
    }

    pub fn boid_count(&self) -> usize {
        self.simulation.boids().len()
    }

    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        WorldSnapshot::from(self.simulation.snapshot())
            .to_json()
            .map_err(to_js)
    }

    pub fn status_json(&self) -> Result<String, JsValue> {
        let status = StatusResponse::from(self.simulation.snapshot());
        serde_json::to_string(&status).map_err(to_js)
    }
}

impl BoidSimulation {
    fn from_config(config: SimConfig, now_ms: f64) -> Result<Self, SimError> {
        let mut simulation = Simulation::new(config)?;
        if let Some(now) = page_time(now_ms) {
            simulation.set_clock(now);
        }
        let bounds = simulation.bounds();
        console_log!(
            "Initializing boid simulation {}x{} with {} boids",
            bounds.x,
            bounds.y,
            simulation.boids().len()
        );
        Ok(Self { simulation })
    }

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }
}
