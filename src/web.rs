//! Browser facade
//!
//! The page owns the canvas, the code editor and the animation frame loop.
//! It hands us a brain callback and calls `advance` every frame; everything
//! else here is read-only views for drawing.

use js_sys::Function;
use wasm_bindgen::prelude::*;

use crate::brain::{Brain, CarControls};
use crate::sim::level::SENSOR_COLOR;
use crate::sim::{GameEvent, Level, Polygon, Session};
use crate::tuning::Tuning;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    // Keeps the first logger if the module is initialized twice
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Park It starting...");
}

/// Brain backed by a page callback taking and returning `CarControls` JSON
struct JsBrain {
    callback: Function,
}

impl Brain for JsBrain {
    fn drive(&mut self, car: &mut CarControls) {
        let input = match serde_json::to_string(car) {
            Ok(json) => json,
            Err(e) => {
                log::error!("Failed to encode brain input: {}", e);
                return;
            }
        };

        let output = match self.callback.call1(&JsValue::NULL, &JsValue::from_str(&input)) {
            Ok(output) => output,
            Err(e) => {
                log::warn!("Car brain threw: {:?}", e);
                return;
            }
        };

        let Some(json) = output.as_string() else {
            log::warn!("Car brain must return a JSON string");
            return;
        };
        match serde_json::from_str::<CarControls>(&json) {
            Ok(reply) => car.apply_reply(reply),
            Err(e) => log::warn!("Ignoring malformed brain reply: {}", e),
        }
    }
}

fn parse_tuning(tuning_json: Option<String>) -> Result<Tuning, JsError> {
    match tuning_json.as_deref() {
        Some(json) if !json.trim().is_empty() => Ok(Tuning::from_json(json)?),
        _ => Ok(Tuning::default()),
    }
}

fn flatten(polygon: &Polygon) -> Vec<f32> {
    polygon.world_points().flat_map(|p| [p.x, p.y]).collect()
}

/// A game running in the page
#[wasm_bindgen]
pub struct WebGame {
    tuning: Tuning,
    initial_level: Level,
    callback: Function,
    session: Session<JsBrain>,
}

impl WebGame {
    fn with_level(level: Level, tuning: Tuning, callback: Function) -> WebGame {
        let session = Session::start(
            level.clone(),
            &tuning,
            JsBrain {
                callback: callback.clone(),
            },
        );
        WebGame {
            tuning,
            initial_level: level,
            callback,
            session,
        }
    }
}

#[wasm_bindgen]
impl WebGame {
    /// Start built-in level `level_id`, optionally with a tuning JSON override
    #[wasm_bindgen(constructor)]
    pub fn new(level_id: u32, brain: Function, tuning_json: Option<String>) -> Result<WebGame, JsError> {
        let tuning = parse_tuning(tuning_json)?;
        let level = Level::by_id(level_id, &tuning)
            .ok_or_else(|| JsError::new(&format!("No level with id {}", level_id)))?;
        Ok(Self::with_level(level, tuning, brain))
    }

    /// Start a level described by a JSON `LevelSpec`
    #[wasm_bindgen(js_name = fromLevelJson)]
    pub fn from_level_json(
        level_json: &str,
        brain: Function,
        tuning_json: Option<String>,
    ) -> Result<WebGame, JsError> {
        let tuning = parse_tuning(tuning_json)?;
        let level = Level::from_json(level_json, &tuning)?;
        Ok(Self::with_level(level, tuning, brain))
    }

    /// Run the ticks due after `dt` seconds; returns "crashed" or "parked"
    /// on the frame the run ends
    pub fn advance(&mut self, dt: f32) -> Option<String> {
        self.session.advance(dt).map(|event| {
            match event {
                GameEvent::Crashed(_) => "crashed",
                GameEvent::Parked => "parked",
            }
            .to_string()
        })
    }

    /// Throw the current run away and start the level over
    pub fn restart(&mut self) {
        let fresh = Session::start(
            self.initial_level.clone(),
            &self.tuning,
            JsBrain {
                callback: self.callback.clone(),
            },
        );
        std::mem::replace(&mut self.session, fresh).stop();
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.session.is_running()
    }

    pub fn phase(&self) -> String {
        format!("{:?}", self.session.state().phase)
    }

    #[wasm_bindgen(js_name = playerPoints)]
    pub fn player_points(&self) -> Vec<f32> {
        flatten(self.session.state().level.player.polygon())
    }

    #[wasm_bindgen(js_name = playerColor)]
    pub fn player_color(&self) -> String {
        self.session.state().level.player.body.color.clone()
    }

    #[wasm_bindgen(js_name = obstacleCount)]
    pub fn obstacle_count(&self) -> usize {
        self.session.state().level.obstacles.len()
    }

    /// Flattened `[x0, y0, x1, y1, ..]` world points; empty for a bad index
    #[wasm_bindgen(js_name = obstaclePoints)]
    pub fn obstacle_points(&self, index: usize) -> Vec<f32> {
        self.session
            .state()
            .level
            .obstacles
            .get(index)
            .map(|body| flatten(&body.polygon))
            .unwrap_or_default()
    }

    #[wasm_bindgen(js_name = obstacleColor)]
    pub fn obstacle_color(&self, index: usize) -> Option<String> {
        self.session
            .state()
            .level
            .obstacles
            .get(index)
            .map(|body| body.color.clone())
    }

    #[wasm_bindgen(js_name = groundPoints)]
    pub fn ground_points(&self) -> Vec<f32> {
        flatten(&self.session.state().level.ground.polygon)
    }

    #[wasm_bindgen(js_name = goalAreaPoints)]
    pub fn goal_area_points(&self) -> Vec<f32> {
        flatten(&self.session.state().level.goal_area.polygon)
    }

    #[wasm_bindgen(js_name = sensorColor)]
    pub fn sensor_color() -> String {
        SENSOR_COLOR.to_string()
    }

    #[wasm_bindgen(js_name = sensorCount)]
    pub fn sensor_count(&self) -> usize {
        self.session.state().level.player.sensors().len()
    }

    /// Flattened sample points of sensor `id` (ids start at 1)
    #[wasm_bindgen(js_name = sensorSamples)]
    pub fn sensor_samples(&self, id: usize) -> Vec<f32> {
        self.session
            .state()
            .level
            .player
            .sensors()
            .get(id)
            .map(|sensor| {
                sensor
                    .sample_points()
                    .iter()
                    .flat_map(|p| [p.x, p.y])
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Readings from the last brain tick, in sensor id order
    #[wasm_bindgen(js_name = sensorReadings)]
    pub fn sensor_readings(&self) -> Vec<u32> {
        self.session
            .state()
            .sensor_readings
            .iter()
            .map(|&reading| reading as u32)
            .collect()
    }
}
