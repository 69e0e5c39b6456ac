#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Sanity Maze engine.
//!
//! This crate defines the vocabulary that connects the maze generator, the
//! player simulation, the visibility model and the adapters. Systems never
//! talk to a presentation surface directly: they report what happened through
//! [`Event`] values, read tunables from an injected [`GameConfig`] and draw
//! randomness from an injected [`RandomSource`].

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

mod config;
mod random;

pub use config::{
    ConfigError, GameConfig, MazeTuning, PlayerTuning, SessionTuning, VisibilityTuning,
};
pub use random::RandomSource;

/// Canonical banner emitted when a run begins.
pub const WELCOME_BANNER: &str =
    "Welcome to the maze. Find the exit before you lose your mind...";

/// Kinds of tile that compose a maze level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TileKind {
    /// Void outside the playable area. Never rendered or collided with.
    Empty,
    /// Solid wall that blocks movement.
    #[default]
    Wall,
    /// Traversable floor.
    Floor,
    /// Level exit. Remains in place once reached.
    Exit,
    /// Sanity-restoring item that reverts to floor once collected.
    Item,
    /// Hint about the exit location that reverts to floor once read.
    Clue,
}

impl TileKind {
    /// Reports whether the tile blocks player movement.
    #[must_use]
    pub const fn blocks_movement(self) -> bool {
        matches!(self, Self::Wall)
    }

    /// Reports whether the player may stand on the tile.
    #[must_use]
    pub const fn is_traversable(self) -> bool {
        matches!(self, Self::Floor | Self::Exit | Self::Item | Self::Clue)
    }

    /// Reports whether the tile is drawn at all.
    #[must_use]
    pub const fn is_rendered(self) -> bool {
        !matches!(self, Self::Empty)
    }

    /// Single character used by text adapters.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Self::Empty => ' ',
            Self::Wall => '#',
            Self::Floor => '.',
            Self::Exit => 'E',
            Self::Item => '*',
            Self::Clue => '?',
        }
    }
}

/// Location of a tile expressed as signed column and row indices.
///
/// Coordinates are signed so that callers may probe outside the grid; every
/// grid accessor treats those probes as walls.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoord {
    x: i32,
    y: i32,
}

impl TileCoord {
    /// Creates a new tile coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Column index of the tile.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Row index of the tile.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Returns the coordinate shifted by the provided deltas.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }

    /// Orthogonal neighbours in north, east, south, west order.
    #[must_use]
    pub const fn neighbors(self) -> [TileCoord; 4] {
        [
            self.offset(0, -1),
            self.offset(1, 0),
            self.offset(0, 1),
            self.offset(-1, 0),
        ]
    }

    /// Straight-line distance to another tile, measured in tiles.
    #[must_use]
    pub fn distance(self, other: TileCoord) -> f32 {
        let dx = (other.x - self.x) as f32;
        let dy = (other.y - self.y) as f32;
        dx.hypot(dy)
    }

    /// Converts a pixel-space position into the tile that contains it.
    #[must_use]
    pub fn from_pixel(position: Vec2, tile_size: f32) -> Self {
        Self::new(
            (position.x / tile_size).floor() as i32,
            (position.y / tile_size).floor() as i32,
        )
    }

    /// Pixel-space centre of the tile.
    #[must_use]
    pub fn center(self, tile_size: f32) -> Vec2 {
        Vec2::new(
            self.x as f32 * tile_size + tile_size / 2.0,
            self.y as f32 * tile_size + tile_size / 2.0,
        )
    }

    /// Pixel-space position of the tile's upper-left corner.
    #[must_use]
    pub fn origin(self, tile_size: f32) -> Vec2 {
        Vec2::new(self.x as f32 * tile_size, self.y as f32 * tile_size)
    }
}

/// Direction the player is facing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Facing {
    /// Towards decreasing rows.
    Up,
    /// Towards increasing rows.
    #[default]
    Down,
    /// Towards decreasing columns.
    Left,
    /// Towards increasing columns.
    Right,
}

/// Compass directions used when describing where the exit lies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Towards decreasing rows.
    North,
    /// Towards increasing columns.
    East,
    /// Towards increasing rows.
    South,
    /// Towards decreasing columns.
    West,
}

impl Direction {
    /// Lower-case English name of the direction.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::North => "north",
            Self::East => "east",
            Self::South => "south",
            Self::West => "west",
        }
    }
}

/// Held-key snapshot captured by an adapter before each frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct InputState {
    /// Whether the up key is held.
    pub up: bool,
    /// Whether the down key is held.
    pub down: bool,
    /// Whether the left key is held.
    pub left: bool,
    /// Whether the right key is held.
    pub right: bool,
    /// Whether the sprint key is held.
    pub sprint: bool,
}

impl InputState {
    /// Snapshot with no key held. Used to freeze the player.
    pub const IDLE: Self = Self {
        up: false,
        down: false,
        left: false,
        right: false,
        sprint: false,
    };

    /// Raw directional intent with each axis in `{-1, 0, 1}`.
    #[must_use]
    pub fn intent(&self) -> Vec2 {
        let horizontal = i32::from(self.right) - i32::from(self.left);
        let vertical = i32::from(self.down) - i32::from(self.up);
        Vec2::new(horizontal as f32, vertical as f32)
    }
}

/// Tiered hint revealed by reading a clue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClueHint {
    /// The exit is within a fifth of the maze diagonal.
    VeryClose,
    /// The exit is within two fifths of the maze diagonal in the given direction.
    Toward(Direction),
    /// The exit is still far away.
    Far,
}

impl ClueHint {
    /// Text displayed to the player when the clue is read.
    #[must_use]
    pub fn message(self) -> String {
        match self {
            Self::VeryClose => {
                "An inscription on the wall says the exit is very close...".to_owned()
            }
            Self::Toward(direction) => format!(
                "A symbol points toward the exit. It lies to the {}.",
                direction.name()
            ),
            Self::Far => {
                "A faint marking on the wall suggests the exit is still far away...".to_owned()
            }
        }
    }
}

/// Statistics accumulated across a run.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct RunStats {
    /// Number of runs started in this session.
    pub attempts: u32,
    /// Distance travelled across every finished run.
    pub total_distance: f32,
    /// Levels whose exit was reached during the current run.
    pub levels_completed: u32,
}

/// Events emitted by systems for the orchestrator and presentation adapters.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// A new level has been generated and the player placed at its start.
    LevelStarted {
        /// Level that became active.
        level: u32,
    },
    /// The player stepped onto the exit of the current level.
    LevelCompleted {
        /// Level whose exit was reached.
        level: u32,
    },
    /// A text message should be shown for the provided duration.
    Message {
        /// Text to display.
        text: String,
        /// How long the message stays visible.
        duration: Duration,
    },
    /// The player collected an item.
    ItemCollected {
        /// Tile that held the item.
        tile: TileCoord,
        /// Sanity after the recovery was applied.
        sanity: f32,
    },
    /// The player read a clue.
    ClueRevealed {
        /// Tile that held the clue.
        tile: TileCoord,
        /// Hint derived from the distance to the exit.
        hint: ClueHint,
    },
    /// Sanity reached zero and the run ended.
    GameOver {
        /// Statistics captured when the run ended.
        stats: RunStats,
    },
}
