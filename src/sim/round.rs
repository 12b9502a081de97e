//! Round state machine
//!
//! Waiting -> Playing -> GameOver -> Waiting. Starting a round resets score,
//! clock and animals; the countdown ends it; a delay returns to waiting.
//! Unloading the group into the pen is a delayed action that only lands if
//! the same round is still being played when the delay runs out.

use serde::{Deserialize, Serialize};

use super::herdsman::PlayerState;
use super::registry::AnimalId;
use super::scheduler::{Scheduled, TimerKind};
use super::state::GameState;
use crate::consts::COUNTDOWN_STEP;
use crate::error::SimResult;

/// Current phase of the round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Waiting for a tap to start
    Waiting,
    /// Active gameplay
    Playing,
    /// Round ended, showing the final score
    GameOver,
}

impl GameState {
    /// Reset everything and start a new round. Only a waiting game starts.
    pub fn start_round(&mut self) -> SimResult<()> {
        if self.phase != RoundPhase::Waiting {
            log::warn!("Start ignored in {:?}", self.phase);
            return Ok(());
        }
        self.epoch += 1;
        let epoch = self.epoch;

        self.signals.time.set(self.settings.total_time);
        self.signals.score.set(0);

        self.animals.clear();
        for _ in 0..self.settings.initial_population {
            self.spawn_animal()?;
        }
        self.time_since_spawn = 0.0;

        self.herdsman.reset(self.settings.player_speed);
        self.set_phase(RoundPhase::Playing);

        self.scheduler.schedule(COUNTDOWN_STEP, epoch, TimerKind::CountdownTick);
        self.scheduler.schedule(
            self.settings.speed_increment_interval,
            epoch,
            TimerKind::SpeedIncrement,
        );
        log::info!(
            "Round {epoch} started with {} animals on the field",
            self.animals.field().len()
        );
        Ok(())
    }

    /// Spawn one animal unless the field is full
    pub fn spawn_animal(&mut self) -> SimResult<Option<AnimalId>> {
        if self.animals.field().len() >= self.settings.max_field_population {
            return Ok(None);
        }
        let id = self.animals.spawn(
            &self.settings.animal_types,
            &self.sampler,
            self.settings.offset_radius,
            &mut self.rng,
        )?;
        Ok(Some(id))
    }

    /// Spawn cadence while playing
    pub(crate) fn update_spawning(&mut self, dt: f32) -> SimResult<()> {
        if self.time_since_spawn >= self.settings.spawn_interval
            && self.animals.field().len() < self.settings.max_field_population
        {
            self.spawn_animal()?;
            self.time_since_spawn = 0.0;
        }
        self.time_since_spawn += dt;
        Ok(())
    }

    /// Move a field animal into the herdsman's group
    pub fn let_animal_follow(&mut self, id: AnimalId) -> bool {
        let joined = self.animals.let_follow(id);
        if joined {
            log::debug!(
                "Animal joined the group ({}/{})",
                self.animals.group().len(),
                self.settings.max_group_size
            );
        }
        joined
    }

    /// Herdsman asks to pen the group: start the unload and drop back to base speed
    pub fn request_unload(&mut self) {
        if self.phase != RoundPhase::Playing || !self.herdsman.is_active() {
            log::debug!("Unload request ignored in {:?}", self.phase);
            return;
        }
        self.unload_animals();
        self.herdsman.reset_speed();
    }

    /// Freeze the herdsman and resolve the unload after the configured delay
    pub fn unload_animals(&mut self) {
        if self.phase != RoundPhase::Playing {
            log::warn!("Unload outside of play ignored");
            return;
        }
        if self.animals.group().is_empty() {
            return;
        }
        self.herdsman.state = PlayerState::Passive;
        self.scheduler.schedule(
            self.settings.unload_delay,
            self.epoch,
            TimerKind::UnloadResolve,
        );
        log::debug!("Unloading {} animals", self.animals.group().len());
    }

    /// The group reached the pen: score it and free the herdsman
    fn resolve_unload(&mut self) {
        let penned = self.animals.drain_group();
        for animal in &penned {
            let points = self.settings.animal_types[animal.kind].points;
            self.signals.score.update(|score| score.saturating_add(points));
        }
        // Empty group: back to base speed
        self.herdsman.reset_speed();
        self.herdsman.state = PlayerState::Active;
        log::debug!("Penned {} animals, score {}", penned.len(), self.score());
    }

    fn game_over(&mut self) {
        self.signals.final_score.set(self.score());
        self.set_phase(RoundPhase::GameOver);
        self.herdsman.state = PlayerState::Passive;
        self.scheduler.schedule(
            self.settings.game_over_delay,
            self.epoch,
            TimerKind::GameOverDelay,
        );
        log::info!("Round {} over: {} points", self.epoch, self.final_score());
    }

    /// Fire every due timer. Timers from another round, or whose phase has
    /// passed, are dropped without touching anything.
    pub(crate) fn run_due_timers(&mut self) {
        while let Some(timer) = self.scheduler.pop_due() {
            if timer.epoch != self.epoch {
                log::trace!("Dropping stale {:?} from round {}", timer.kind, timer.epoch);
                continue;
            }
            self.fire(timer);
        }
    }

    fn fire(&mut self, timer: Scheduled) {
        match (timer.kind, self.phase) {
            (TimerKind::CountdownTick, RoundPhase::Playing) => {
                let left = self.time_left().saturating_sub(1);
                self.signals.time.set(left);
                if left == 0 {
                    self.game_over();
                } else {
                    self.scheduler.schedule_at(
                        timer.fire_at + f64::from(COUNTDOWN_STEP),
                        timer.epoch,
                        TimerKind::CountdownTick,
                    );
                }
            }
            (TimerKind::SpeedIncrement, RoundPhase::Playing) => {
                self.herdsman.increase_speed(
                    self.settings.speed_increment,
                    &mut self.animals,
                    &self.settings.animal_types,
                );
                self.scheduler.schedule_at(
                    timer.fire_at + f64::from(self.settings.speed_increment_interval),
                    timer.epoch,
                    TimerKind::SpeedIncrement,
                );
            }
            (TimerKind::GameOverDelay, RoundPhase::GameOver) => {
                self.set_phase(RoundPhase::Waiting);
            }
            (TimerKind::UnloadResolve, RoundPhase::Playing) => self.resolve_unload(),
            (kind, phase) => {
                log::trace!("Ignoring {kind:?} in {phase:?}");
            }
        }
    }
}
