//! Demo mode: the game plays itself
//!
//! Chases the nearest field animal until the group is full (or the round is
//! nearly over), then walks the group into the pen.

use glam::Vec2;

use crate::sim::{GameState, RoundPhase, TickInput};

/// Seconds of slack kept when deciding to head home before the clock runs out
const RETURN_MARGIN: f32 = 2.0;

/// Produce this tick's input from the current state
pub fn steer(state: &GameState) -> TickInput {
    match state.phase() {
        // Any tap starts the round
        RoundPhase::Waiting => TickInput::pointer_at(state.herdsman.pos()),
        RoundPhase::GameOver => TickInput::default(),
        RoundPhase::Playing if !state.herdsman.is_active() => TickInput::default(),
        RoundPhase::Playing => herd(state),
    }
}

fn herd(state: &GameState) -> TickInput {
    let herdsman = state.herdsman.pos();
    let pen = state.settings.pen.rect();
    let grouped = state.animals.group().len();

    if grouped > 0 && pen.contains(herdsman) {
        return TickInput {
            unload: true,
            ..Default::default()
        };
    }

    let seconds_home = herdsman.distance(pen.center) / state.herdsman.speed().max(f32::EPSILON);
    let out_of_time = state.time_left() as f32 <= seconds_home + RETURN_MARGIN;
    let full = grouped >= state.settings.max_group_size;

    if grouped > 0 && (full || out_of_time) {
        return TickInput::pointer_at(pen.center);
    }

    match nearest_field_animal(state, herdsman) {
        Some(target) => TickInput::pointer_at(target),
        None if grouped > 0 => TickInput::pointer_at(pen.center),
        None => TickInput::default(),
    }
}

fn nearest_field_animal(state: &GameState, from: Vec2) -> Option<Vec2> {
    state
        .animals
        .field()
        .iter()
        .filter_map(|&id| state.animals.get(id))
        .map(|animal| animal.motion.pos)
        .min_by(|a, b| a.distance_squared(from).total_cmp(&b.distance_squared(from)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::settings::GameSettings;
    use crate::sim::tick;

    #[test]
    fn test_autopilot_starts_the_round() {
        let mut state = GameState::new(GameSettings::default(), 5).unwrap();
        let input = steer(&state);
        tick(&mut state, &input, SIM_DT).unwrap();
        assert_eq!(state.phase(), RoundPhase::Playing);
    }

    #[test]
    fn test_autopilot_scores_in_a_full_round() {
        let mut state = GameState::new(GameSettings::default(), 5).unwrap();
        let mut ticks = 0;
        loop {
            let input = steer(&state);
            tick(&mut state, &input, SIM_DT).unwrap();
            ticks += 1;
            if state.phase() == RoundPhase::GameOver || ticks > 60 * 60 {
                break;
            }
        }
        assert_eq!(state.phase(), RoundPhase::GameOver);
        assert!(state.final_score() > 0);
    }
}
