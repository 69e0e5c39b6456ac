#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Player simulation: movement, meters, collision and tile interactions.

use std::time::Duration;

use glam::Vec2;
use sanity_maze_core::{
    ClueHint, Direction, Event, Facing, GameConfig, InputState, PlayerTuning, TileCoord, TileKind,
};
use sanity_maze_world::Maze;

/// Message shown when an item is collected.
pub const ITEM_MESSAGE: &str = "You found an item that soothes your mind.";

/// Clues closer than this share of the maze diagonal report the exit as very close.
pub const VERY_CLOSE_RATIO: f32 = 0.2;

/// Clues closer than this share of the maze diagonal point towards the exit.
pub const DIRECTIONAL_RATIO: f32 = 0.4;

const ANIMATION_FRAMES: u8 = 4;
const FRAME_THRESHOLD: f32 = 4.0;

/// Meter levels expressed as percentages for HUD adapters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerStatus {
    /// Sanity as a percentage of its maximum.
    pub sanity_percent: f32,
    /// Stamina as a percentage of its maximum.
    pub stamina_percent: f32,
}

/// The player avatar.
///
/// Positions are expressed in pixels. The collision box is a square centred
/// on the position whose side is a fraction of the tile size.
#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    position: Vec2,
    velocity: Vec2,
    facing: Facing,
    stamina: f32,
    sanity: f32,
    is_sprinting: bool,
    is_moving: bool,
    distance_traveled: f32,
    interaction_cooldown: f32,
    frame_timer: f32,
    animation_frame: u8,
    size: f32,
    tile_size: f32,
    tuning: PlayerTuning,
}

impl Player {
    /// Creates a rested player at `position` with full meters.
    #[must_use]
    pub fn new(position: Vec2, config: &GameConfig) -> Self {
        let tuning = config.player.clone();
        Self {
            position,
            velocity: Vec2::ZERO,
            facing: Facing::default(),
            stamina: tuning.stamina_max,
            sanity: tuning.sanity_max,
            is_sprinting: false,
            is_moving: false,
            distance_traveled: 0.0,
            interaction_cooldown: 0.0,
            frame_timer: 0.0,
            animation_frame: 0,
            size: config.tile_size * tuning.size_ratio,
            tile_size: config.tile_size,
            tuning,
        }
    }

    /// Creates a player standing on the start of `maze`.
    #[must_use]
    pub fn spawn(maze: &Maze, config: &GameConfig) -> Self {
        Self::new(maze.start(), config)
    }

    /// Replaces the sanity meter, clamped to its range.
    #[must_use]
    pub fn with_sanity(mut self, sanity: f32) -> Self {
        self.sanity = sanity.clamp(0.0, self.tuning.sanity_max);
        self
    }

    /// Replaces the stamina meter, clamped to its range.
    #[must_use]
    pub fn with_stamina(mut self, stamina: f32) -> Self {
        self.stamina = stamina.clamp(0.0, self.tuning.stamina_max);
        self
    }

    /// Centre of the player in pixels.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Velocity chosen during the last update in pixels per second.
    #[must_use]
    pub const fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Direction the player is facing.
    #[must_use]
    pub const fn facing(&self) -> Facing {
        self.facing
    }

    /// Current stamina.
    #[must_use]
    pub const fn stamina(&self) -> f32 {
        self.stamina
    }

    /// Current sanity.
    #[must_use]
    pub const fn sanity(&self) -> f32 {
        self.sanity
    }

    /// Maximum sanity.
    #[must_use]
    pub const fn sanity_max(&self) -> f32 {
        self.tuning.sanity_max
    }

    /// Whether the last update was a sprint.
    #[must_use]
    pub const fn is_sprinting(&self) -> bool {
        self.is_sprinting
    }

    /// Whether any direction was held during the last update.
    #[must_use]
    pub const fn is_moving(&self) -> bool {
        self.is_moving
    }

    /// Distance accumulated while moving.
    #[must_use]
    pub const fn distance_traveled(&self) -> f32 {
        self.distance_traveled
    }

    /// Seconds until tile interactions resume.
    #[must_use]
    pub const fn interaction_cooldown(&self) -> f32 {
        self.interaction_cooldown
    }

    /// Walk cycle frame in `0..4`.
    #[must_use]
    pub const fn animation_frame(&self) -> u8 {
        self.animation_frame
    }

    /// Side of the collision box in pixels.
    #[must_use]
    pub const fn size(&self) -> f32 {
        self.size
    }

    /// Tile under the player centre.
    #[must_use]
    pub fn tile(&self) -> TileCoord {
        TileCoord::from_pixel(self.position, self.tile_size)
    }

    /// Whether sanity has run out.
    #[must_use]
    pub fn is_insane(&self) -> bool {
        self.sanity <= 0.0
    }

    /// Meter percentages for the HUD.
    #[must_use]
    pub fn status(&self) -> PlayerStatus {
        PlayerStatus {
            sanity_percent: percent(self.sanity, self.tuning.sanity_max),
            stamina_percent: percent(self.stamina, self.tuning.stamina_max),
        }
    }

    /// Advances the player by `dt` seconds using the held keys in `input`.
    ///
    /// Negative deltas are treated as zero.
    pub fn update(&mut self, dt: f32, input: InputState, maze: &Maze) {
        let dt = dt.max(0.0);

        if input.up {
            self.facing = Facing::Up;
        }
        if input.down {
            self.facing = Facing::Down;
        }
        if input.left {
            self.facing = Facing::Left;
        }
        if input.right {
            self.facing = Facing::Right;
        }

        let direction = input.intent().normalize_or_zero();
        self.is_moving = direction != Vec2::ZERO;

        let mut speed = self.tuning.speed;
        self.is_sprinting = input.sprint && self.stamina > 0.0 && self.is_moving;
        if self.is_sprinting {
            speed *= self.tuning.sprint_multiplier;
            self.stamina = (self.stamina - self.tuning.stamina_sprint_cost * dt).max(0.0);
        } else if !input.sprint {
            self.stamina =
                (self.stamina + self.tuning.stamina_regen * dt).min(self.tuning.stamina_max);
        }

        self.velocity = direction * speed;
        self.slide(self.velocity * dt, maze);

        self.sanity = (self.sanity - self.tuning.sanity_drain * dt).max(0.0);

        if self.is_moving {
            self.frame_timer += dt * self.tuning.animation_rate;
            if self.frame_timer >= FRAME_THRESHOLD {
                self.frame_timer = 0.0;
                self.animation_frame = (self.animation_frame + 1) % ANIMATION_FRAMES;
            }
            self.distance_traveled += speed * dt * self.tuning.distance_scale;
        }

        self.interaction_cooldown = (self.interaction_cooldown - dt).max(0.0);
    }

    /// Reports whether the collision box centred on `position` overlaps a wall.
    #[must_use]
    pub fn collides_at(&self, position: Vec2, maze: &Maze) -> bool {
        let half = self.size / 2.0;
        [
            Vec2::new(position.x - half, position.y - half),
            Vec2::new(position.x + half, position.y - half),
            Vec2::new(position.x - half, position.y + half),
            Vec2::new(position.x + half, position.y + half),
        ]
        .into_iter()
        .any(|corner| {
            maze.tile_at(TileCoord::from_pixel(corner, self.tile_size))
                .blocks_movement()
        })
    }

    /// Resolves the tile under the player centre, emitting events into `out`.
    ///
    /// Nothing happens while the interaction cooldown is running.
    pub fn check_interactions(&mut self, maze: &mut Maze, out: &mut Vec<Event>) {
        if self.interaction_cooldown > 0.0 {
            return;
        }

        let tile = self.tile();
        match maze.tile_at(tile) {
            TileKind::Exit => {
                out.push(Event::LevelCompleted {
                    level: maze.level(),
                });
                self.interaction_cooldown = self.tuning.exit_cooldown;
            }
            TileKind::Item => {
                self.sanity =
                    (self.sanity + self.tuning.sanity_recovery).min(self.tuning.sanity_max);
                maze.set_tile(tile, TileKind::Floor);
                out.push(Event::ItemCollected {
                    tile,
                    sanity: self.sanity,
                });
                out.push(self.message(ITEM_MESSAGE.to_owned()));
                self.interaction_cooldown = self.tuning.pickup_cooldown;
            }
            TileKind::Clue => {
                let hint = clue_hint(tile, maze.exit(), maze.diagonal());
                maze.set_tile(tile, TileKind::Floor);
                out.push(Event::ClueRevealed { tile, hint });
                out.push(self.message(hint.message()));
                self.interaction_cooldown = self.tuning.pickup_cooldown;
            }
            TileKind::Empty | TileKind::Wall | TileKind::Floor => {}
        }
    }

    fn slide(&mut self, step: Vec2, maze: &Maze) {
        if step == Vec2::ZERO {
            return;
        }

        let blocked_x = self.collides_at(self.position + Vec2::new(step.x, 0.0), maze);
        let blocked_y = self.collides_at(self.position + Vec2::new(0.0, step.y), maze);
        let applied = if blocked_x && blocked_y {
            step * 0.5
        } else {
            step
        };

        // Axes resolve one after the other so diagonal steps cannot clip a corner.
        let along_x = self.position + Vec2::new(applied.x, 0.0);
        if !self.collides_at(along_x, maze) {
            self.position = along_x;
        }
        let along_y = self.position + Vec2::new(0.0, applied.y);
        if !self.collides_at(along_y, maze) {
            self.position = along_y;
        }
    }

    fn message(&self, text: String) -> Event {
        Event::Message {
            text,
            duration: Duration::try_from_secs_f32(self.tuning.message_duration)
                .unwrap_or_default(),
        }
    }
}

/// Hint revealed by a clue at `tile` for an exit at `exit`.
///
/// The distance is measured against `diagonal`, the length of the maze
/// diagonal in tiles. Directional hints name the dominant axis, preferring
/// north or south when both axes are equal.
#[must_use]
pub fn clue_hint(tile: TileCoord, exit: TileCoord, diagonal: f32) -> ClueHint {
    let distance = tile.distance(exit);
    if distance < diagonal * VERY_CLOSE_RATIO {
        return ClueHint::VeryClose;
    }
    if distance >= diagonal * DIRECTIONAL_RATIO {
        return ClueHint::Far;
    }

    let dx = exit.x() - tile.x();
    let dy = exit.y() - tile.y();
    let direction = if dx.abs() > dy.abs() {
        if dx > 0 {
            Direction::East
        } else {
            Direction::West
        }
    } else if dy > 0 {
        Direction::South
    } else {
        Direction::North
    };
    ClueHint::Toward(direction)
}

fn percent(value: f32, max: f32) -> f32 {
    if max <= 0.0 {
        0.0
    } else {
        value / max * 100.0
    }
}
