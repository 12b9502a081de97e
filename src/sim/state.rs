//! Simulation root
//!
//! `GameState` owns everything a round touches: settings, the RNG, the
//! herdsman, the animal arena, the timer queue and the observable signals.
//! Agents never reach for a global; they get what they need passed in.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::geometry::PositionSampler;
use super::herdsman::Herdsman;
use super::registry::AnimalRegistry;
use super::round::RoundPhase;
use super::scheduler::Scheduler;
use crate::error::SimResult;
use crate::settings::GameSettings;
use crate::signals::RoundSignals;

#[derive(Debug)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub settings: GameSettings,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Seconds since the last spawn while playing
    pub time_since_spawn: f32,
    pub herdsman: Herdsman,
    pub animals: AnimalRegistry,
    pub scheduler: Scheduler,
    /// Score, time, final score and phase as seen by the presentation layer
    pub signals: RoundSignals,
    pub(crate) phase: RoundPhase,
    /// Bumped at every round start; timers armed in older epochs are stale
    pub(crate) epoch: u64,
    pub(crate) sampler: PositionSampler,
    pub(crate) rng: Pcg32,
}

impl GameState {
    /// Build a waiting game. Fails if the settings do not validate.
    pub fn new(settings: GameSettings, seed: u64) -> SimResult<Self> {
        settings.validate()?;
        log::info!(
            "New game (seed {seed}): {}s rounds, {} animal types",
            settings.total_time,
            settings.animal_types.len()
        );
        Ok(Self {
            seed,
            time_ticks: 0,
            time_since_spawn: 0.0,
            herdsman: Herdsman::new(settings.player_start, settings.player_speed),
            animals: AnimalRegistry::with_capacity(settings.pool_size),
            scheduler: Scheduler::new(),
            signals: RoundSignals::new(settings.total_time),
            phase: RoundPhase::Waiting,
            epoch: 0,
            sampler: settings.position_sampler(),
            rng: Pcg32::seed_from_u64(seed),
            settings,
        })
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    /// Rounds started so far
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn score(&self) -> u32 {
        self.signals.score.get()
    }

    /// Whole seconds left in the round
    pub fn time_left(&self) -> u32 {
        self.signals.time.get()
    }

    /// Score at the end of the last finished round
    pub fn final_score(&self) -> u32 {
        self.signals.final_score.get()
    }

    pub fn sampler(&self) -> &PositionSampler {
        &self.sampler
    }

    pub(crate) fn set_phase(&mut self, phase: RoundPhase) {
        if self.phase != phase {
            log::info!("Round phase {:?} -> {:?}", self.phase, phase);
        }
        self.phase = phase;
        self.signals.state.set(phase);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    #[test]
    fn test_new_game_is_waiting() {
        let state = GameState::new(GameSettings::default(), 1).unwrap();
        assert_eq!(state.phase(), RoundPhase::Waiting);
        assert_eq!(state.score(), 0);
        assert_eq!(state.time_left(), 30);
        assert!(state.animals.is_empty());
        assert!(!state.herdsman.is_active());
    }

    #[test]
    fn test_new_game_rejects_invalid_settings() {
        let settings = GameSettings {
            total_time: 0,
            ..Default::default()
        };
        assert!(matches!(
            GameState::new(settings, 1),
            Err(ConfigError::Invalid { field: "total_time", .. })
        ));
    }
}
