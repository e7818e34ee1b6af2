//! Tunable hero parameters.
//!
//! Every field has a default so a RON file only needs to list what it
//! overrides:
//!
//! ```ron
//! (running_speed: 240.0, run_wind_up_ms: 400)
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Speeds are in pixels per second, distances in pixels, durations in
/// milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeroConfig {
    pub walking_speed: f32,
    /// Walking speed multiplier on grass, shallow water and ladders.
    pub slow_ground_factor: f32,
    pub swimming_speed_factor: f32,
    pub fast_swim_ms: u32,
    /// How long the hero keeps sliding on ice after the direction is released.
    pub ice_slide_ms: u32,
    pub push_delay_ms: u32,

    pub running_speed: f32,
    pub run_wind_up_ms: u32,
    pub run_max_distance: f32,
    pub run_bounce_distance: f32,
    pub run_bounce_speed: f32,

    pub sword_animation_ms: u32,
    pub sword_reach: f32,
    pub sword_push_distance: f32,
    pub sword_push_speed: f32,
    pub spin_attack_delay_ms: u32,
    pub spin_attack_ms: u32,
    pub crystal_hit_delay_ms: u32,
    pub enemy_recovery_ms: u32,

    pub lifting_animation_ms: u32,
    pub object_lift_ms: u32,
    pub lift_reach: f32,
    pub throw_distance: f32,
    pub throw_speed: f32,

    pub hurt_distance: f32,
    pub hurt_speed: f32,
    pub invincibility_ms: u32,
    pub fall_ms: u32,
    pub bad_ground_damage: i32,
    pub prickle_damage: i32,
}

impl Default for HeroConfig {
    fn default() -> Self {
        Self {
            walking_speed: 88.0,
            slow_ground_factor: 0.8,
            swimming_speed_factor: 0.5,
            fast_swim_ms: 400,
            ice_slide_ms: 300,
            push_delay_ms: 800,

            running_speed: 300.0,
            run_wind_up_ms: 500,
            run_max_distance: 3000.0,
            run_bounce_distance: 32.0,
            run_bounce_speed: 160.0,

            sword_animation_ms: 300,
            sword_reach: 12.0,
            sword_push_distance: 24.0,
            sword_push_speed: 120.0,
            spin_attack_delay_ms: 1000,
            spin_attack_ms: 600,
            crystal_hit_delay_ms: 1000,
            enemy_recovery_ms: 500,

            lifting_animation_ms: 300,
            object_lift_ms: 240,
            lift_reach: 8.0,
            throw_distance: 64.0,
            throw_speed: 200.0,

            hurt_distance: 24.0,
            hurt_speed: 120.0,
            invincibility_ms: 2000,
            fall_ms: 1000,
            bad_ground_damage: 2,
            prickle_damage: 2,
        }
    }
}

impl HeroConfig {
    pub fn from_ron(text: &str, path: &Path) -> Result<Self> {
        ron::from_str(text).map_err(|source| Error::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_ron(&text, path)?;
        tracing::info!(path = %path.display(), "loaded hero config");
        Ok(config)
    }

    /// Walking speed once the slow-ground penalty is applied.
    pub fn slowed_walking_speed(&self) -> f32 {
        self.walking_speed * self.slow_ground_factor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_ron_keeps_defaults() {
        let config =
            HeroConfig::from_ron("(running_speed: 240.0)", Path::new("inline.ron")).unwrap();
        assert_eq!(config.running_speed, 240.0);
        assert_eq!(config.run_wind_up_ms, 500);
        assert_eq!(config.walking_speed, 88.0);
    }

    #[test]
    fn malformed_ron_is_a_parse_error() {
        let err = HeroConfig::from_ron("(running_speed: ", Path::new("bad.ron")).unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = HeroConfig::load_from_file(Path::new("/nonexistent/hero.ron")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
