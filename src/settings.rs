//! Game settings
//!
//! Loaded from a JSON file at startup and validated before the simulation
//! is built. Every field has a playable default, so partial files work.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::MIN_FREE_FIELD_FRACTION;
use crate::error::{ConfigError, SimResult};
use crate::sim::geometry::{PositionSampler, Rect};

/// One kind of animal. Referenced by index from every animal of that kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimalType {
    pub name: String,
    /// Visual reference, opaque to the simulation
    pub prefab: String,
    /// Points awarded when penned
    pub points: u32,
    /// Speed while following the herdsman
    pub speed: f32,
    /// Speed while wandering the field
    pub patrol_speed: f32,
}

impl Default for AnimalType {
    fn default() -> Self {
        Self {
            name: "animal".to_string(),
            prefab: String::new(),
            points: 1,
            speed: 1.0,
            patrol_speed: 1.0,
        }
    }
}

impl AnimalType {
    pub fn new(name: &str, points: u32, speed: f32, patrol_speed: f32) -> Self {
        Self {
            name: name.to_string(),
            prefab: format!("prefabs/{name}"),
            points,
            speed,
            patrol_speed,
        }
    }
}

/// Orthographic camera framing the playfield
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Half of the visible height in world units
    pub ortho_size: f32,
    /// Width / height
    pub aspect: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            ortho_size: 5.0,
            aspect: 16.0 / 9.0,
        }
    }
}

impl CameraSettings {
    /// Visible half-width and half-height in world units
    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(self.aspect * self.ortho_size, self.ortho_size)
    }
}

/// The pen: animals never spawn or wander inside it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForbiddenZone {
    pub center: Vec2,
    pub half_extents: Vec2,
}

impl Default for ForbiddenZone {
    fn default() -> Self {
        Self {
            center: Vec2::ZERO,
            half_extents: Vec2::new(1.5, 1.5),
        }
    }
}

impl ForbiddenZone {
    pub fn rect(&self) -> Rect {
        Rect::new(self.center, self.half_extents)
    }
}

/// Complete game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    // === Round ===
    /// Round length in whole seconds
    pub total_time: u32,
    /// Seconds from game over back to waiting
    pub game_over_delay: f32,

    // === Herdsman ===
    pub player_speed: f32,
    pub player_start: Vec2,
    /// Distance under which a field animal joins the group
    pub capture_range: f32,
    /// Base speed increases every this many seconds
    pub speed_increment_interval: f32,
    pub speed_increment: f32,

    // === Movement ===
    /// Per-axis distance at which an agent counts as arrived
    pub arrival_tolerance: f32,

    // === Animals ===
    pub animal_types: Vec<AnimalType>,
    /// Arena slots reserved up front
    pub pool_size: usize,
    /// Seconds between spawns while playing
    pub spawn_interval: f32,
    pub max_field_population: usize,
    pub max_group_size: usize,
    pub initial_population: usize,
    /// Radius of the disk each grouped animal's personal offset is drawn from
    pub offset_radius: f32,

    // === Playfield ===
    pub camera: CameraSettings,
    /// Share of the visible area animals may use (keeps them off the edges)
    pub bound_multiplier: f32,
    pub pen: ForbiddenZone,

    // === Unloading ===
    /// Seconds the herdsman stays passive while the group is penned
    pub unload_delay: f32,
    /// Walking into the pen requests an unload
    pub unload_on_pen_entry: bool,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            total_time: 30,
            game_over_delay: 3.0,

            player_speed: 3.0,
            player_start: Vec2::new(0.0, -3.0),
            capture_range: 1.0,
            speed_increment_interval: 10.0,
            speed_increment: 0.5,

            arrival_tolerance: 0.05,

            animal_types: vec![
                AnimalType::new("sheep", 1, 2.5, 0.8),
                AnimalType::new("goat", 2, 3.5, 1.2),
                AnimalType::new("cow", 3, 1.5, 0.5),
            ],
            pool_size: 20,
            spawn_interval: 2.0,
            max_field_population: 10,
            max_group_size: 5,
            initial_population: 5,
            offset_radius: 0.8,

            camera: CameraSettings::default(),
            bound_multiplier: 0.9,
            pen: ForbiddenZone::default(),

            unload_delay: 0.5,
            unload_on_pen_entry: true,
        }
    }
}

impl GameSettings {
    /// Area animals may occupy, before the pen is cut out
    pub fn playfield(&self) -> Rect {
        Rect::new(Vec2::ZERO, self.camera.half_extents() * self.bound_multiplier)
    }

    /// Reject configurations the simulation cannot run with
    pub fn validate(&self) -> SimResult<()> {
        if self.total_time == 0 {
            return Err(ConfigError::invalid(
                "total_time",
                "round must last at least one second",
            ));
        }
        positive("player_speed", self.player_speed)?;
        positive("capture_range", self.capture_range)?;
        positive("speed_increment_interval", self.speed_increment_interval)?;
        non_negative("speed_increment", self.speed_increment)?;
        non_negative("arrival_tolerance", self.arrival_tolerance)?;
        non_negative("spawn_interval", self.spawn_interval)?;
        non_negative("offset_radius", self.offset_radius)?;
        non_negative("unload_delay", self.unload_delay)?;
        non_negative("game_over_delay", self.game_over_delay)?;
        positive("camera.ortho_size", self.camera.ortho_size)?;
        positive("camera.aspect", self.camera.aspect)?;
        positive("bound_multiplier", self.bound_multiplier)?;
        non_negative("pen.half_extents.x", self.pen.half_extents.x)?;
        non_negative("pen.half_extents.y", self.pen.half_extents.y)?;

        if self.animal_types.is_empty() {
            return Err(ConfigError::invalid(
                "animal_types",
                "at least one animal type is required",
            ));
        }
        for animal_type in &self.animal_types {
            positive("animal_types.speed", animal_type.speed)?;
            positive("animal_types.patrol_speed", animal_type.patrol_speed)?;
        }

        if self.initial_population > self.max_field_population {
            return Err(ConfigError::invalid(
                "initial_population",
                format!(
                    "{} exceeds max_field_population {}",
                    self.initial_population, self.max_field_population
                ),
            ));
        }

        let free = self.playfield().free_fraction(&self.pen.rect());
        if free < MIN_FREE_FIELD_FRACTION {
            return Err(ConfigError::invalid(
                "pen",
                format!("pen leaves only {:.2}% of the playfield free", free * 100.0),
            ));
        }

        Ok(())
    }

    /// Sampler for random animal positions
    pub fn position_sampler(&self) -> PositionSampler {
        PositionSampler::new(self.playfield(), self.pen.rect())
    }

    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> SimResult<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load and validate settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> SimResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn to_json_pretty(&self) -> SimResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn positive(field: &'static str, value: f32) -> SimResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("{value} must be positive")))
    }
}

fn non_negative(field: &'static str, value: f32) -> SimResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(
            field,
            format!("{value} must not be negative"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invalid_field(settings: &GameSettings) -> Option<&'static str> {
        match settings.validate() {
            Err(ConfigError::Invalid { field, .. }) => Some(field),
            _ => None,
        }
    }

    #[test]
    fn test_default_settings_are_valid() {
        assert!(GameSettings::default().validate().is_ok());
    }

    #[test]
    fn test_zero_total_time_rejected() {
        let settings = GameSettings {
            total_time: 0,
            ..Default::default()
        };
        assert_eq!(invalid_field(&settings), Some("total_time"));
    }

    #[test]
    fn test_negative_delay_rejected() {
        let settings = GameSettings {
            unload_delay: -0.5,
            ..Default::default()
        };
        assert_eq!(invalid_field(&settings), Some("unload_delay"));
    }

    #[test]
    fn test_initial_population_above_max_rejected() {
        let settings = GameSettings {
            initial_population: 11,
            max_field_population: 10,
            ..Default::default()
        };
        assert_eq!(invalid_field(&settings), Some("initial_population"));
    }

    #[test]
    fn test_pen_covering_playfield_rejected() {
        let mut settings = GameSettings::default();
        settings.pen.half_extents = Vec2::new(100.0, 100.0);
        assert_eq!(invalid_field(&settings), Some("pen"));
    }

    #[test]
    fn test_empty_animal_types_rejected() {
        let settings = GameSettings {
            animal_types: Vec::new(),
            ..Default::default()
        };
        assert_eq!(invalid_field(&settings), Some("animal_types"));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = GameSettings::from_json(r#"{ "total_time": 45 }"#).unwrap();
        assert_eq!(settings.total_time, 45);
        assert_eq!(settings.max_field_population, 10);
        assert_eq!(settings.animal_types.len(), 3);
    }

    #[test]
    fn test_invalid_json_reports_parse_error() {
        let result = GameSettings::from_json("{ total_time: ");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_json_round_trip_preserves_settings() {
        let settings = GameSettings::default();
        let json = settings.to_json_pretty().unwrap();
        assert_eq!(GameSettings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_missing_file_reports_path() {
        let result = GameSettings::load("/nonexistent/herd-rush.json");
        match result {
            Err(ConfigError::Io { path, .. }) => {
                assert!(path.ends_with("herd-rush.json"));
            }
            other => panic!("expected Io error, got {other:?}"),
        }
    }
}
