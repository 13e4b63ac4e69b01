//! Tick scheduling and the owned game session
//!
//! The host (browser animation frame or native loop) reports elapsed time;
//! the scheduler turns it into render and brain ticks at their configured
//! rates, in timestamp order.

use serde::{Deserialize, Serialize};

use super::level::Level;
use super::tick::{GameEvent, GameState, brain_tick, render_tick};
use crate::brain::Brain;
use crate::consts::{MAX_FRAME_DT, MAX_TICKS_PER_ADVANCE};
use crate::tuning::Tuning;

/// Which tick is due
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TickKind {
    Render,
    Brain,
}

/// Converts elapsed time into a sequence of due ticks
#[derive(Debug, Clone)]
pub struct Scheduler {
    render_period: f64,
    brain_period: f64,
    /// Seconds since start
    now: f64,
    render_ticks: u64,
    brain_ticks: u64,
}

impl Scheduler {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            render_period: tuning.render_period(),
            brain_period: tuning.brain_period(),
            now: 0.0,
            render_ticks: 0,
            brain_ticks: 0,
        }
    }

    #[inline]
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Advance the clock by `dt` seconds and return the ticks now due
    ///
    /// `dt` is clamped to `[0, MAX_FRAME_DT]`. When render and brain ticks
    /// fall on the same instant the render tick goes first. At most
    /// `MAX_TICKS_PER_ADVANCE` ticks are returned; any backlog beyond that
    /// is dropped.
    pub fn advance(&mut self, dt: f32) -> Vec<TickKind> {
        let dt = if dt.is_finite() {
            dt.clamp(0.0, MAX_FRAME_DT)
        } else {
            0.0
        };
        self.now += f64::from(dt);

        let mut due = Vec::new();
        while due.len() < MAX_TICKS_PER_ADVANCE as usize {
            let next_render = (self.render_ticks + 1) as f64 * self.render_period;
            let next_brain = (self.brain_ticks + 1) as f64 * self.brain_period;

            let (kind, at) = if next_render <= next_brain {
                (TickKind::Render, next_render)
            } else {
                (TickKind::Brain, next_brain)
            };
            if at > self.now {
                return due;
            }

            match kind {
                TickKind::Render => self.render_ticks += 1,
                TickKind::Brain => self.brain_ticks += 1,
            }
            due.push(kind);
        }

        let render_behind = (self.now / self.render_period) as u64;
        let brain_behind = (self.now / self.brain_period) as u64;
        if render_behind > self.render_ticks || brain_behind > self.brain_ticks {
            log::debug!(
                "Dropping tick backlog: {} render, {} brain",
                render_behind.saturating_sub(self.render_ticks),
                brain_behind.saturating_sub(self.brain_ticks)
            );
            self.render_ticks = self.render_ticks.max(render_behind);
            self.brain_ticks = self.brain_ticks.max(brain_behind);
        }
        due
    }
}

/// A running game: state, clock and brain, owned together
pub struct Session<B: Brain> {
    state: GameState,
    scheduler: Scheduler,
    brain: B,
}

impl<B: Brain> Session<B> {
    /// Begin a run on `level`
    pub fn start(level: Level, tuning: &Tuning, brain: B) -> Self {
        log::info!("Session started on {:?}", level.name);
        Self {
            state: GameState::new(level),
            scheduler: Scheduler::new(tuning),
            brain,
        }
    }

    /// Run every tick due after `dt` more seconds
    ///
    /// Returns the event that ended the run if it ended during this call;
    /// ticks scheduled after the ending tick are not run.
    pub fn advance(&mut self, dt: f32) -> Option<GameEvent> {
        if !self.state.is_running() {
            return None;
        }

        for kind in self.scheduler.advance(dt) {
            match kind {
                TickKind::Render => {
                    if let Some(event) = render_tick(&mut self.state) {
                        return Some(event);
                    }
                }
                TickKind::Brain => brain_tick(&mut self.state, &mut self.brain),
            }
        }
        None
    }

    #[inline]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    /// Seconds of game time elapsed
    #[inline]
    pub fn elapsed(&self) -> f64 {
        self.scheduler.now()
    }

    /// End the run and hand back the final state
    pub fn stop(self) -> GameState {
        log::info!(
            "Session stopped: {:?} after {} render / {} brain ticks",
            self.state.phase,
            self.state.time_ticks,
            self.state.brain_ticks
        );
        self.state
    }
}
