#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative level state for Sanity Maze.
//!
//! A [`Maze`] is produced once per level by the generator and owns its
//! [`Grid`] exclusively. After generation only item and clue tiles change,
//! reverting to floor when the player consumes them.

use glam::Vec2;
use sanity_maze_core::{TileCoord, TileKind};

mod reachability;

pub use reachability::{ReachabilityField, RegionMap};

/// Bounds-checked two-dimensional tile buffer stored in row-major order.
///
/// Reads outside the grid report [`TileKind::Wall`] and writes outside the
/// grid are ignored, so the world is closed without callers checking bounds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: u32,
    height: u32,
    tiles: Vec<TileKind>,
}

impl Grid {
    /// Creates a grid where every tile holds `kind`.
    #[must_use]
    pub fn filled(width: u32, height: u32, kind: TileKind) -> Self {
        let capacity = usize::try_from(u64::from(width) * u64::from(height)).unwrap_or(0);
        Self {
            width,
            height,
            tiles: vec![kind; capacity],
        }
    }

    /// Builds a grid from rows of [`TileKind::glyph`] characters.
    ///
    /// Rows shorter than the widest row are padded with walls and unknown
    /// characters become walls.
    #[must_use]
    pub fn from_rows(rows: &[&str]) -> Self {
        let width = rows
            .iter()
            .map(|row| row.chars().count())
            .max()
            .unwrap_or(0);
        let mut grid = Self::filled(width as u32, rows.len() as u32, TileKind::Wall);
        for (y, row) in rows.iter().enumerate() {
            for (x, glyph) in row.chars().enumerate() {
                grid.set(TileCoord::new(x as i32, y as i32), kind_for_glyph(glyph));
            }
        }
        grid
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Reports whether the coordinate lies inside the grid.
    #[must_use]
    pub fn contains(&self, tile: TileCoord) -> bool {
        self.index(tile).is_some()
    }

    /// Tile stored at the coordinate, or a wall when out of bounds.
    #[must_use]
    pub fn get(&self, tile: TileCoord) -> TileKind {
        self.index(tile)
            .and_then(|index| self.tiles.get(index).copied())
            .unwrap_or(TileKind::Wall)
    }

    /// Stores `kind` at the coordinate. Out-of-bounds writes are ignored.
    pub fn set(&mut self, tile: TileCoord, kind: TileKind) {
        if let Some(slot) = self.index(tile).and_then(|index| self.tiles.get_mut(index)) {
            *slot = kind;
        }
    }

    /// Iterates over every tile in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (TileCoord, TileKind)> + '_ {
        let width = self.width.max(1) as usize;
        self.tiles.iter().enumerate().map(move |(index, kind)| {
            (
                TileCoord::new((index % width) as i32, (index / width) as i32),
                *kind,
            )
        })
    }

    /// Number of tiles holding `kind`.
    #[must_use]
    pub fn count(&self, kind: TileKind) -> usize {
        self.tiles.iter().filter(|tile| **tile == kind).count()
    }

    /// Renders the grid as rows of [`TileKind::glyph`] characters.
    #[must_use]
    pub fn to_rows(&self) -> Vec<String> {
        self.tiles
            .chunks(self.width.max(1) as usize)
            .map(|row| row.iter().map(|kind| kind.glyph()).collect())
            .collect()
    }

    fn index(&self, tile: TileCoord) -> Option<usize> {
        let column = u32::try_from(tile.x()).ok()?;
        let row = u32::try_from(tile.y()).ok()?;
        if column >= self.width || row >= self.height {
            return None;
        }
        Some(row as usize * self.width as usize + column as usize)
    }
}

fn kind_for_glyph(glyph: char) -> TileKind {
    match glyph {
        ' ' => TileKind::Empty,
        '.' => TileKind::Floor,
        'E' => TileKind::Exit,
        '*' => TileKind::Item,
        '?' => TileKind::Clue,
        _ => TileKind::Wall,
    }
}

/// Layout and features of a single level.
#[derive(Clone, Debug, PartialEq)]
pub struct Maze {
    level: u32,
    grid: Grid,
    start: Vec2,
    exit: TileCoord,
    items: Vec<TileCoord>,
    clues: Vec<TileCoord>,
}

impl Maze {
    /// Assembles a level from a finished grid and its placed features.
    ///
    /// `start` is expressed in pixels, every other position in tiles.
    #[must_use]
    pub fn new(
        level: u32,
        grid: Grid,
        start: Vec2,
        exit: TileCoord,
        items: Vec<TileCoord>,
        clues: Vec<TileCoord>,
    ) -> Self {
        Self {
            level,
            grid,
            start,
            exit,
            items,
            clues,
        }
    }

    /// Level the maze was generated for.
    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    /// Number of columns in the maze.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.grid.width()
    }

    /// Number of rows in the maze.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.grid.height()
    }

    /// Tile at the coordinate; walls outside the maze.
    #[must_use]
    pub fn tile_at(&self, tile: TileCoord) -> TileKind {
        self.grid.get(tile)
    }

    /// Replaces the tile at the coordinate. Out-of-bounds writes are ignored.
    pub fn set_tile(&mut self, tile: TileCoord, kind: TileKind) {
        self.grid.set(tile, kind);
    }

    /// Player spawn point in pixels, at the centre of its tile.
    #[must_use]
    pub const fn start(&self) -> Vec2 {
        self.start
    }

    /// Exit tile.
    #[must_use]
    pub const fn exit(&self) -> TileCoord {
        self.exit
    }

    /// Tiles that held an item when the level was generated.
    #[must_use]
    pub fn items(&self) -> &[TileCoord] {
        &self.items
    }

    /// Tiles that held a clue when the level was generated.
    #[must_use]
    pub fn clues(&self) -> &[TileCoord] {
        &self.clues
    }

    /// Read-only access to the underlying grid.
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Length of the maze diagonal in tiles.
    #[must_use]
    pub fn diagonal(&self) -> f32 {
        (self.width() as f32).hypot(self.height() as f32)
    }
}

/// Query functions that provide read-only analysis of a level.
pub mod query {
    use sanity_maze_core::{TileCoord, TileKind};

    use super::{Maze, ReachabilityField};

    /// Tile containing the player spawn point.
    #[must_use]
    pub fn start_tile(maze: &Maze, tile_size: f32) -> TileCoord {
        TileCoord::from_pixel(maze.start(), tile_size)
    }

    /// Breadth-first distances over traversable tiles from `origin`.
    #[must_use]
    pub fn reachability_from(maze: &Maze, origin: TileCoord) -> ReachabilityField {
        let mut field = ReachabilityField::default();
        field.rebuild_with(maze.width(), maze.height(), &[origin], |tile| {
            !maze.tile_at(tile).is_traversable()
        });
        field
    }

    /// Breadth-first distances over traversable tiles towards the exit.
    #[must_use]
    pub fn distance_to_exit(maze: &Maze) -> ReachabilityField {
        reachability_from(maze, maze.exit())
    }

    /// Reports whether the exit can be reached from the spawn point.
    #[must_use]
    pub fn exit_reachable(maze: &Maze, tile_size: f32) -> bool {
        reachability_from(maze, start_tile(maze, tile_size)).is_reachable(maze.exit())
    }

    /// Traversable tiles that cannot be reached from the spawn point.
    #[must_use]
    pub fn unreachable_tiles(maze: &Maze, tile_size: f32) -> Vec<TileCoord> {
        let field = reachability_from(maze, start_tile(maze, tile_size));
        maze.grid()
            .iter()
            .filter(|(tile, kind)| kind.is_traversable() && !field.is_reachable(*tile))
            .map(|(tile, _)| tile)
            .collect()
    }

    /// Items still waiting to be collected.
    #[must_use]
    pub fn remaining_items(maze: &Maze) -> usize {
        maze.grid().count(TileKind::Item)
    }

    /// Clues still waiting to be read.
    #[must_use]
    pub fn remaining_clues(maze: &Maze) -> usize {
        maze.grid().count(TileKind::Clue)
    }
}
