#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Level generation system.
//!
//! Turns a level number and a random source into a finished [`Maze`]. The
//! level selects one of four layout strategies, the carved lattice is
//! converted into gameplay tiles, and the start, exit, items and clues are
//! placed on floor tiles that share one connected region.

mod error;
mod placement;
mod sections;
mod walls;

use sanity_maze_core::{GameConfig, MazeTuning, RandomSource, TileCoord, TileKind};
use sanity_maze_system_carving::{Algorithm, CarveGrid, PASSAGE};
use sanity_maze_world::{Grid, Maze};
use tracing::{debug, info};

pub use error::{GenerationError, SectionBorder};
pub use placement::{find_feature_tile, Placement};
pub use sections::{compose_sections, SectionLayout, MIN_SECTIONED_DIMENSION};
pub use walls::{add_additional_walls, would_create_island, IslandCheck};

/// Smallest width or height accepted for any level.
pub const MIN_DIMENSION: u32 = 3;

/// Layout recipe chosen for a level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LevelStrategy {
    /// Carve the whole grid with one algorithm, then block a share of corridors.
    Carve {
        /// Carving algorithm applied to the full grid.
        algorithm: Algorithm,
        /// Share of candidate corridor cells turned back into walls.
        block_fraction: f32,
    },
    /// Carve each quadrant separately and join them across their borders.
    Sectioned,
}

impl LevelStrategy {
    /// Name used in logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Carve { algorithm, .. } => algorithm.name(),
            Self::Sectioned => "sectioned",
        }
    }
}

/// Builds mazes for successive levels.
#[derive(Clone, Debug)]
pub struct MazeGenerator {
    tuning: MazeTuning,
    tile_size: f32,
}

impl MazeGenerator {
    /// Creates a generator from the maze tunables and tile size in `config`.
    #[must_use]
    pub fn new(config: &GameConfig) -> Self {
        Self {
            tuning: config.maze.clone(),
            tile_size: config.tile_size,
        }
    }

    /// Tunables the generator was created with.
    #[must_use]
    pub const fn tuning(&self) -> &MazeTuning {
        &self.tuning
    }

    /// Strategy used for `level`, cycling through four layout classes.
    #[must_use]
    pub fn strategy_for(&self, level: u32) -> LevelStrategy {
        match level % 4 {
            0 => LevelStrategy::Carve {
                algorithm: Algorithm::Division,
                block_fraction: self.tuning.division_block_fraction,
            },
            1 => LevelStrategy::Carve {
                algorithm: Algorithm::Backtracking,
                block_fraction: 0.0,
            },
            2 => LevelStrategy::Carve {
                algorithm: Algorithm::GrowingTree,
                block_fraction: self.tuning.growing_tree_block_fraction,
            },
            _ => LevelStrategy::Sectioned,
        }
    }

    /// Generates the maze for `level`. Levels start at one.
    pub fn generate<R>(&self, level: u32, rng: &mut R) -> Result<Maze, GenerationError>
    where
        R: RandomSource + ?Sized,
    {
        if level == 0 {
            return Err(GenerationError::InvalidLevel);
        }

        let (width, height) = self.tuning.dimensions_for(level);
        let strategy = self.strategy_for(level);
        let minimum = match strategy {
            LevelStrategy::Sectioned => MIN_SECTIONED_DIMENSION,
            LevelStrategy::Carve { .. } => MIN_DIMENSION,
        };
        if width < minimum || height < minimum {
            return Err(GenerationError::DimensionsTooSmall {
                width,
                height,
                minimum,
            });
        }

        let mut carved = CarveGrid::walled(width, height);
        match strategy {
            LevelStrategy::Carve {
                algorithm,
                block_fraction,
            } => {
                algorithm.carve(&mut carved, rng);
                if block_fraction > 0.0 {
                    let blocked =
                        add_additional_walls(&mut carved, block_fraction, self.island_check(), rng);
                    debug!(level, blocked, "blocked additional corridor cells");
                }
            }
            LevelStrategy::Sectioned => {
                let layout = compose_sections(&mut carved, rng)?;
                debug!(
                    level,
                    bottom_right = layout.bottom_right().name(),
                    crossings = ?layout.crossings(),
                    "composed sectioned layout"
                );
            }
        }

        let mut grid = convert(&carved);
        let placement = placement::place_features(&mut grid, level, &self.tuning, rng)?;

        info!(
            level,
            width,
            height,
            strategy = strategy.name(),
            items = placement.items().len(),
            clues = placement.clues().len(),
            "generated maze"
        );

        let start = placement.start().center(self.tile_size);
        let exit = placement.exit();
        let (items, clues) = placement.into_features();
        Ok(Maze::new(level, grid, start, exit, items, clues))
    }

    fn island_check(&self) -> IslandCheck {
        if self.tuning.strict_island_check {
            IslandCheck::Strict
        } else {
            IslandCheck::Heuristic
        }
    }
}

/// Converts a carved lattice into gameplay tiles: passages become floor and
/// everything else becomes wall.
#[must_use]
pub fn convert(carved: &CarveGrid) -> Grid {
    let mut grid = Grid::filled(carved.width(), carved.height(), TileKind::Wall);
    for y in 0..carved.height() as i32 {
        for x in 0..carved.width() as i32 {
            if carved.get(x, y) == PASSAGE {
                grid.set(TileCoord::new(x, y), TileKind::Floor);
            }
        }
    }
    grid
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_cycles_through_four_classes() {
        let generator = MazeGenerator::new(&GameConfig::default());

        assert!(matches!(
            generator.strategy_for(4),
            LevelStrategy::Carve {
                algorithm: Algorithm::Division,
                ..
            }
        ));
        assert_eq!(
            generator.strategy_for(1),
            LevelStrategy::Carve {
                algorithm: Algorithm::Backtracking,
                block_fraction: 0.0,
            }
        );
        assert!(matches!(
            generator.strategy_for(6),
            LevelStrategy::Carve {
                algorithm: Algorithm::GrowingTree,
                ..
            }
        ));
        assert_eq!(generator.strategy_for(3), LevelStrategy::Sectioned);
        assert_eq!(generator.strategy_for(7), LevelStrategy::Sectioned);
    }

    #[test]
    fn convert_maps_passages_to_floor() {
        let carved = CarveGrid::from_rows(&["###", "#.#", "###"]);
        let grid = convert(&carved);

        assert_eq!(grid.to_rows(), vec!["###", "#.#", "###"]);
        assert_eq!(grid.count(TileKind::Floor), 1);
    }
}
