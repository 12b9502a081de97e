//! Fixed timestep simulation tick
//!
//! One call advances the clock, fires due timers, runs the round state
//! machine, then moves the herdsman and every animal.

use glam::Vec2;

use super::animal::{Flock, update_animal};
use super::round::RoundPhase;
use super::state::GameState;
use crate::camera::ScreenProjection;
use crate::error::SimResult;

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer went down this tick, in world coordinates
    pub pointer_down: Option<Vec2>,
    /// Pen the group now (for hosts that detect pen entry themselves)
    pub unload: bool,
}

impl TickInput {
    /// Pointer-down at a screen position
    pub fn pointer_from_screen(projection: &impl ScreenProjection, screen: Vec2) -> Self {
        Self {
            pointer_down: Some(projection.screen_to_world(screen)),
            ..Default::default()
        }
    }

    pub fn pointer_at(world: Vec2) -> Self {
        Self {
            pointer_down: Some(world),
            ..Default::default()
        }
    }
}

/// Advance the game state by one timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> SimResult<()> {
    state.scheduler.advance(dt);
    state.run_due_timers();

    let mut pointer = input.pointer_down;
    match state.phase() {
        RoundPhase::Waiting => {
            // The starting tap is not also a move order
            if pointer.take().is_some() {
                state.start_round()?;
            }
        }
        RoundPhase::Playing => state.update_spawning(dt)?,
        RoundPhase::GameOver => {}
    }

    update_herdsman(state, pointer, dt);
    if input.unload {
        state.request_unload();
    }
    update_animals(state, dt)?;

    state.time_ticks += 1;
    Ok(())
}

fn update_herdsman(state: &mut GameState, pointer: Option<Vec2>, dt: f32) {
    if state.phase() != RoundPhase::Playing || !state.herdsman.is_active() {
        state.herdsman.motion.halt();
        return;
    }

    // At most one capture per tick
    if state.animals.group().len() < state.settings.max_group_size {
        if let Some(id) = state
            .herdsman
            .animal_in_range(&state.animals, state.settings.capture_range)
        {
            if state.let_animal_follow(id) {
                state
                    .herdsman
                    .absorb_capture(id, &mut state.animals, &state.settings.animal_types);
            }
        }
    }

    if let Some(target) = pointer {
        state.herdsman.set_target(target);
    }
    state
        .herdsman
        .motion
        .advance(state.settings.arrival_tolerance, dt);

    let pen = state.settings.pen.rect();
    if state.herdsman.entered_pen(&pen) && state.settings.unload_on_pen_entry {
        state.request_unload();
    }
}

fn update_animals(state: &mut GameState, dt: f32) -> SimResult<()> {
    if state.phase() != RoundPhase::Playing {
        for (_, animal) in state.animals.iter_mut() {
            animal.motion.halt();
        }
        return Ok(());
    }

    let flock = Flock {
        leader: state.herdsman.pos(),
        leader_speed: state.herdsman.speed(),
        sampler: &state.sampler,
        types: &state.settings.animal_types,
    };
    let tolerance = state.settings.arrival_tolerance;
    for (_, animal) in state.animals.iter_mut() {
        update_animal(animal, &flock, tolerance, dt, &mut state.rng)?;
    }
    Ok(())
}
