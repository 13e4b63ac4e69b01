//! Render and brain ticks
//!
//! The render tick checks the goal, moves the car and runs the collision
//! pass. The brain tick refreshes the sensor readings and lets the brain
//! pick new targets. Both are no-ops once the run has ended.

use serde::{Deserialize, Serialize};

use super::level::Level;
use super::scene::{CollisionPair, first_collision};
use crate::brain::{Brain, CarControls, Memory};

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Car is being driven by the brain
    Driving,
    /// Car hit something; run ended
    Crashed,
    /// Car stopped inside the goal area; run ended
    Parked,
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Crashed(CollisionPair),
    Parked,
}

/// Everything that changes during a run
#[derive(Debug, Clone)]
pub struct GameState {
    pub level: Level,
    pub phase: GamePhase,
    /// Render ticks run so far
    pub time_ticks: u64,
    /// Brain ticks run so far
    pub brain_ticks: u64,
    /// The brain's scratch storage
    pub memory: Memory,
    /// Sensor readings the brain last saw, in id order
    ///
    /// Render ticks rebuild the sensors and clear their live readings, so
    /// displays read these instead.
    pub sensor_readings: Vec<usize>,
}

impl GameState {
    pub fn new(level: Level) -> Self {
        let sensor_readings = level.player.sensors().readings();
        Self {
            sensor_readings,
            level,
            phase: GamePhase::Driving,
            time_ticks: 0,
            brain_ticks: 0,
            memory: Memory::new(),
        }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Driving
    }
}

/// Advance the car one render tick
///
/// Order: goal check (before any motion), kinematics, collision pass over
/// `[obstacles.., player, limits..]`. Returns the event that ended the run,
/// if this tick ended it.
pub fn render_tick(state: &mut GameState) -> Option<GameEvent> {
    if !state.is_running() {
        return None;
    }
    state.time_ticks += 1;

    if state.level.check_goal() {
        state.phase = GamePhase::Parked;
        log::info!("Parked after {} ticks", state.time_ticks);
        return Some(GameEvent::Parked);
    }

    state.level.player.update();

    let collision = first_collision(&state.level.collision_bodies());
    if let Some(pair) = collision {
        state.phase = GamePhase::Crashed;
        log::info!(
            "Crashed after {} ticks: body {} hit body {}",
            state.time_ticks,
            pair.a,
            pair.b
        );
        return Some(GameEvent::Crashed(pair));
    }

    None
}

/// Run the brain once and store its targets on the car
pub fn brain_tick<B: Brain + ?Sized>(state: &mut GameState, brain: &mut B) {
    if !state.is_running() {
        return;
    }
    state.brain_ticks += 1;

    state.level.refresh_player_sensors();
    let player = &mut state.level.player;
    state.sensor_readings = player.sensors().readings();

    let mut controls = CarControls::snapshot(player, std::mem::take(&mut state.memory));
    brain.drive(&mut controls);

    player.set_targets(controls.targets());
    state.memory = controls.memory;

    log::debug!(
        "Brain tick {}: angle {:.2}, speed {:.2}, brake {}",
        state.brain_ticks,
        player.targets().heading,
        player.targets().speed,
        player.targets().parking_brake
    );
}
