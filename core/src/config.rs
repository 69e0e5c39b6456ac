//! Immutable tuning surface injected into every system.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Aggregated tuning knobs controlling every adjustable aspect of a run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Side length of a square tile in pixels.
    pub tile_size: f32,
    /// Movement, meter and interaction parameters.
    pub player: PlayerTuning,
    /// Maze dimensions, algorithm post-processing and feature placement.
    pub maze: MazeTuning,
    /// Fog of war, flicker, distortion and post-processing.
    pub visibility: VisibilityTuning,
    /// Level progression timing.
    pub session: SessionTuning,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tile_size: 64.0,
            player: PlayerTuning::default(),
            maze: MazeTuning::default(),
            visibility: VisibilityTuning::default(),
            session: SessionTuning::default(),
        }
    }
}

impl GameConfig {
    /// Rejects tunables that would break generation or the meter invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("tile_size", self.tile_size)?;

        let player = &self.player;
        non_negative("player.speed", player.speed)?;
        positive("player.size_ratio", player.size_ratio)?;
        positive("player.stamina_max", player.stamina_max)?;
        positive("player.sanity_max", player.sanity_max)?;
        non_negative("player.stamina_regen", player.stamina_regen)?;
        non_negative("player.stamina_sprint_cost", player.stamina_sprint_cost)?;
        non_negative("player.sanity_drain", player.sanity_drain)?;
        non_negative("player.sanity_recovery", player.sanity_recovery)?;
        non_negative("player.exit_cooldown", player.exit_cooldown)?;
        non_negative("player.pickup_cooldown", player.pickup_cooldown)?;
        if player.sprint_multiplier < 1.0 {
            return Err(ConfigError::OutOfRange {
                field: "player.sprint_multiplier",
                value: player.sprint_multiplier,
            });
        }

        let maze = &self.maze;
        if maze.base_width < 3 || maze.base_height < 3 {
            return Err(ConfigError::MazeTooSmall {
                width: maze.base_width,
                height: maze.base_height,
            });
        }
        non_negative("maze.complexity_multiplier", maze.complexity_multiplier)?;
        non_negative("maze.item_density", maze.item_density)?;
        non_negative("maze.feature_min_distance", maze.feature_min_distance)?;
        non_negative("maze.clue_angle_jitter", maze.clue_angle_jitter)?;
        fraction("maze.division_block_fraction", maze.division_block_fraction)?;
        fraction("maze.growing_tree_block_fraction", maze.growing_tree_block_fraction)?;
        fraction("maze.start_region", maze.start_region)?;
        fraction("maze.exit_region", maze.exit_region)?;
        fraction("maze.item_jitter", maze.item_jitter)?;

        let visibility = &self.visibility;
        positive("visibility.view_distance", visibility.view_distance)?;
        positive("visibility.flicker_interval", visibility.flicker_interval)?;
        fraction("visibility.min_sanity_brightness", visibility.min_sanity_brightness)?;
        if visibility.flicker_min > visibility.flicker_max {
            return Err(ConfigError::OutOfRange {
                field: "visibility.flicker_min",
                value: visibility.flicker_min,
            });
        }

        non_negative("session.transition_delay", self.session.transition_delay)?;
        positive("session.max_frame_delta", self.session.max_frame_delta)?;
        non_negative("session.shake_intensity", self.session.shake_intensity)?;
        non_negative("session.shake_duration", self.session.shake_duration)?;
        non_negative(
            "session.pickup_shake_intensity",
            self.session.pickup_shake_intensity,
        )?;
        non_negative(
            "session.pickup_shake_duration",
            self.session.pickup_shake_duration,
        )?;
        Ok(())
    }
}

/// Player movement and meter parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    /// Walking speed in pixels per second.
    pub speed: f32,
    /// Collision box side as a fraction of the tile size.
    pub size_ratio: f32,
    /// Upper bound of the stamina meter.
    pub stamina_max: f32,
    /// Stamina regained per second while sprint is released.
    pub stamina_regen: f32,
    /// Stamina spent per second while sprinting.
    pub stamina_sprint_cost: f32,
    /// Speed multiplier applied while sprinting. Must be at least 1.
    pub sprint_multiplier: f32,
    /// Upper bound of the sanity meter.
    pub sanity_max: f32,
    /// Sanity lost per second, moving or not.
    pub sanity_drain: f32,
    /// Sanity restored by a single item.
    pub sanity_recovery: f32,
    /// Seconds during which interactions are suppressed after reaching the exit.
    pub exit_cooldown: f32,
    /// Seconds during which interactions are suppressed after an item or clue.
    pub pickup_cooldown: f32,
    /// Scale applied to pixels travelled before they are added to run statistics.
    pub distance_scale: f32,
    /// Walk animation frames advanced per second of movement.
    pub animation_rate: f32,
    /// Seconds an interaction message stays on screen.
    pub message_duration: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            speed: 500.0,
            size_ratio: 0.7,
            stamina_max: 100.0,
            stamina_regen: 15.0,
            stamina_sprint_cost: 25.0,
            sprint_multiplier: 1.7,
            sanity_max: 100.0,
            sanity_drain: 0.5,
            sanity_recovery: 10.0,
            exit_cooldown: 1.0,
            pickup_cooldown: 0.5,
            distance_scale: 0.01,
            animation_rate: 10.0,
            message_duration: 3.0,
        }
    }
}

/// Maze dimension, post-processing and placement parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MazeTuning {
    /// Width of a level-zero maze in tiles.
    pub base_width: u32,
    /// Height of a level-zero maze in tiles.
    pub base_height: u32,
    /// Tiles added to each dimension per level, floored after multiplication.
    pub complexity_multiplier: f32,
    /// Items placed per tile of maze area.
    pub item_density: f32,
    /// Hard cap on the number of items per level.
    pub max_items: u32,
    /// Fraction of each dimension, from the top-left, where the start search is seeded.
    pub start_region: f32,
    /// Fraction of each dimension from which the exit search is seeded.
    pub exit_region: f32,
    /// Positional jitter applied to item targets as a fraction of each dimension.
    pub item_jitter: f32,
    /// Maximum rotation in radians applied to the start-to-exit vector for clues.
    pub clue_angle_jitter: f32,
    /// Clues placed on every level before the per-level bonus.
    pub clue_base_count: u32,
    /// Minimum distance in tiles between a feature and both the start and the exit.
    pub feature_min_distance: f32,
    /// Largest ring searched around a feature target.
    pub feature_search_radius: u32,
    /// Fraction of corridor cells blocked after a division carve.
    pub division_block_fraction: f32,
    /// Fraction of corridor cells blocked after a growing-tree carve.
    pub growing_tree_block_fraction: f32,
    /// Verifies that both neighbours of a two-way corridor cell stay connected before blocking it.
    pub strict_island_check: bool,
}

impl Default for MazeTuning {
    fn default() -> Self {
        Self {
            base_width: 100,
            base_height: 100,
            complexity_multiplier: 5.0,
            item_density: 0.01,
            max_items: 50,
            start_region: 0.3,
            exit_region: 0.7,
            item_jitter: 0.2,
            clue_angle_jitter: 0.35,
            clue_base_count: 3,
            feature_min_distance: 5.0,
            feature_search_radius: 5,
            division_block_fraction: 0.3,
            growing_tree_block_fraction: 0.2,
            strict_island_check: false,
        }
    }
}

impl MazeTuning {
    /// Dimensions of the maze generated for the provided level.
    #[must_use]
    pub fn dimensions_for(&self, level: u32) -> (u32, u32) {
        let growth = (level as f32 * self.complexity_multiplier).floor() as u32;
        (
            self.base_width.saturating_add(growth),
            self.base_height.saturating_add(growth),
        )
    }
}

/// Fog of war, flicker, distortion and post-processing parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisibilityTuning {
    /// Distance in tiles at which tiles fade out completely.
    pub view_distance: f32,
    /// Brightness floor applied however low sanity falls.
    pub min_sanity_brightness: f32,
    /// Seconds between flicker re-rolls.
    pub flicker_interval: f32,
    /// Lower bound of the flicker band.
    pub flicker_min: f32,
    /// Upper bound of the flicker band.
    pub flicker_max: f32,
    /// Whether the wave distortion is applied to tile positions.
    pub distortion_enabled: bool,
    /// Distortion amplitude as a fraction of the tile size.
    pub distortion_intensity: f32,
    /// Inner vignette radius as a fraction of the smaller viewport side.
    pub vignette_inner: f32,
    /// Outer vignette radius as a fraction of the smaller viewport side.
    pub vignette_outer: f32,
    /// Darkness reached at the outer vignette radius.
    pub vignette_strength: f32,
    /// Sanity fraction below which chromatic aberration kicks in.
    pub aberration_threshold: f32,
    /// Aberration intensity applied at the threshold.
    pub aberration_base: f32,
    /// Additional aberration intensity reached at zero sanity.
    pub aberration_scale: f32,
}

impl Default for VisibilityTuning {
    fn default() -> Self {
        Self {
            view_distance: 6.0,
            min_sanity_brightness: 0.5,
            flicker_interval: 0.1,
            flicker_min: 0.8,
            flicker_max: 1.2,
            distortion_enabled: true,
            distortion_intensity: 0.03,
            vignette_inner: 0.3,
            vignette_outer: 0.7,
            vignette_strength: 0.7,
            aberration_threshold: 0.5,
            aberration_base: 0.005,
            aberration_scale: 0.01,
        }
    }
}

/// Level progression parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionTuning {
    /// Seconds between reaching an exit and the next level starting.
    pub transition_delay: f32,
    /// Largest frame delta fed to the simulation, in seconds.
    pub max_frame_delta: f32,
    /// Seconds the welcome message stays on screen.
    pub welcome_duration: f32,
    /// Seconds level announcements stay on screen.
    pub announcement_duration: f32,
    /// Largest screen shake offset in pixels when an exit is reached.
    pub shake_intensity: f32,
    /// Seconds the screen shakes after an exit is reached.
    pub shake_duration: f32,
    /// Largest screen shake offset in pixels when an item is collected.
    pub pickup_shake_intensity: f32,
    /// Seconds the screen shakes after an item is collected.
    pub pickup_shake_duration: f32,
}

impl Default for SessionTuning {
    fn default() -> Self {
        Self {
            transition_delay: 3.0,
            max_frame_delta: 0.1,
            welcome_duration: 5.0,
            announcement_duration: 3.0,
            shake_intensity: 10.0,
            shake_duration: 1.0,
            pickup_shake_intensity: 2.0,
            pickup_shake_duration: 0.2,
        }
    }
}

/// Reasons a configuration is rejected.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// A tunable lies outside its permitted range.
    #[error("{field} is out of range (received {value})")]
    OutOfRange {
        /// Dotted path of the offending field.
        field: &'static str,
        /// Value that failed validation.
        value: f32,
    },
    /// The base maze dimensions cannot hold a maze.
    #[error("base maze dimensions must be at least 3x3 (received {width}x{height})")]
    MazeTooSmall {
        /// Configured base width.
        width: u32,
        /// Configured base height.
        height: u32,
    },
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { field, value })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { field, value })
    }
}

fn fraction(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { field, value })
    }
}
