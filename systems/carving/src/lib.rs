#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Maze carving primitives operating on a binary passage/wall buffer.
//!
//! Carvers only promise a perfect-maze topology: every passage cell is
//! reachable from every other passage cell, and the outer ring stays solid.
//! Passages are laid out on the odd lattice, so cells with two odd
//! coordinates are rooms and the cells between them are either knocked
//! through or left standing.

use sanity_maze_core::RandomSource;

/// Encoding of an open cell.
pub const PASSAGE: u8 = 0;
/// Encoding of a solid cell.
pub const WALL: u8 = 1;

/// Binary grid consumed and produced by carvers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CarveGrid {
    width: u32,
    height: u32,
    cells: Vec<u8>,
}

impl CarveGrid {
    /// Creates a grid made entirely of walls.
    #[must_use]
    pub fn walled(width: u32, height: u32) -> Self {
        let capacity = usize::try_from(u64::from(width) * u64::from(height)).unwrap_or(0);
        Self {
            width,
            height,
            cells: vec![WALL; capacity],
        }
    }

    /// Builds a grid from text rows where `#` is a wall and anything else a passage.
    #[must_use]
    pub fn from_rows(rows: &[&str]) -> Self {
        let width = rows
            .iter()
            .map(|row| row.chars().count())
            .max()
            .unwrap_or(0);
        let mut grid = Self::walled(width as u32, rows.len() as u32);
        for (y, row) in rows.iter().enumerate() {
            for (x, glyph) in row.chars().enumerate() {
                if glyph != '#' {
                    grid.set(x as i32, y as i32, PASSAGE);
                }
            }
        }
        grid
    }

    /// Number of columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Raw cells in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// Cell value at the coordinate, or [`WALL`] outside the grid.
    #[must_use]
    pub fn get(&self, x: i32, y: i32) -> u8 {
        self.index(x, y)
            .and_then(|index| self.cells.get(index).copied())
            .unwrap_or(WALL)
    }

    /// Reports whether the coordinate holds a passage.
    #[must_use]
    pub fn is_passage(&self, x: i32, y: i32) -> bool {
        self.get(x, y) == PASSAGE
    }

    /// Stores a cell value. Writes outside the grid are ignored.
    pub fn set(&mut self, x: i32, y: i32, value: u8) {
        if let Some(slot) = self.index(x, y).and_then(|index| self.cells.get_mut(index)) {
            *slot = value;
        }
    }

    /// Overwrites every cell with `value`.
    pub fn fill(&mut self, value: u8) {
        self.cells.fill(value);
    }

    /// Copies `source` into this grid with its upper-left corner at the offset.
    ///
    /// Cells falling outside this grid are dropped.
    pub fn blit(&mut self, source: &CarveGrid, offset_x: u32, offset_y: u32) {
        for y in 0..source.height {
            for x in 0..source.width {
                let value = source.get(x as i32, y as i32);
                self.set((x + offset_x) as i32, (y + offset_y) as i32, value);
            }
        }
    }

    /// Number of passage cells.
    #[must_use]
    pub fn passage_count(&self) -> usize {
        self.cells.iter().filter(|cell| **cell == PASSAGE).count()
    }

    /// Number of orthogonal neighbours of the coordinate that are passages.
    #[must_use]
    pub fn passage_neighbors(&self, x: i32, y: i32) -> usize {
        NEIGHBOR_OFFSETS
            .iter()
            .filter(|(dx, dy)| self.is_passage(x + dx, y + dy))
            .count()
    }

    /// Number of orthogonal neighbours of the coordinate that are walls.
    #[must_use]
    pub fn wall_neighbors(&self, x: i32, y: i32) -> usize {
        NEIGHBOR_OFFSETS.len() - self.passage_neighbors(x, y)
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        let column = u32::try_from(x).ok()?;
        let row = u32::try_from(y).ok()?;
        if column >= self.width || row >= self.height {
            return None;
        }
        Some(row as usize * self.width as usize + column as usize)
    }
}

/// Orthogonal neighbour offsets in north, east, south, west order.
pub const NEIGHBOR_OFFSETS: [(i32, i32); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

/// Algorithm that fills a [`CarveGrid`] with a perfect maze.
pub trait MazeCarver {
    /// Replaces the grid contents with a freshly carved maze.
    ///
    /// Grids narrower or shorter than three cells are left entirely walled.
    fn carve<R>(&self, grid: &mut CarveGrid, rng: &mut R)
    where
        R: RandomSource + ?Sized;
}

/// Selector for the carving algorithms shipped with this crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// Depth-first backtracking. Long, winding, low-branching paths.
    Backtracking,
    /// Recursive rectangular division. Long straight corridors.
    Division,
    /// Growing tree with mixed newest/random selection. Asymmetric branching.
    GrowingTree,
}

impl Algorithm {
    /// Human readable name used in logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Backtracking => "recursive-backtrack",
            Self::Division => "recursive-division",
            Self::GrowingTree => "growing-tree",
        }
    }

    /// Carves the grid with the selected algorithm.
    pub fn carve<R>(self, grid: &mut CarveGrid, rng: &mut R)
    where
        R: RandomSource + ?Sized,
    {
        match self {
            Self::Backtracking => RecursiveBacktrack.carve(grid, rng),
            Self::Division => RecursiveDivision.carve(grid, rng),
            Self::GrowingTree => GrowingTree::default().carve(grid, rng),
        }
    }
}

/// Depth-first backtracking carver.
#[derive(Clone, Copy, Debug, Default)]
pub struct RecursiveBacktrack;

impl MazeCarver for RecursiveBacktrack {
    fn carve<R>(&self, grid: &mut CarveGrid, rng: &mut R)
    where
        R: RandomSource + ?Sized,
    {
        grid.fill(WALL);
        let Some(lattice) = Lattice::of(grid) else {
            return;
        };

        let mut visited = vec![false; lattice.len()];
        let start = lattice.random_room(rng);
        lattice.open_room(grid, &mut visited, start);
        let mut stack = vec![start];

        while let Some(&current) = stack.last() {
            let (options, count) = lattice.unvisited_neighbors(current, &visited);
            if count == 0 {
                let _ = stack.pop();
                continue;
            }
            let next = options[rng.index(count)];
            lattice.knock_through(grid, &mut visited, current, next);
            stack.push(next);
        }
    }
}

/// Growing-tree carver.
#[derive(Clone, Copy, Debug)]
pub struct GrowingTree {
    newest_bias: f64,
}

impl GrowingTree {
    /// Creates a carver that extends the newest active room with probability
    /// `newest_bias` and a uniformly random active room otherwise.
    #[must_use]
    pub fn new(newest_bias: f64) -> Self {
        Self {
            newest_bias: newest_bias.clamp(0.0, 1.0),
        }
    }
}

impl Default for GrowingTree {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl MazeCarver for GrowingTree {
    fn carve<R>(&self, grid: &mut CarveGrid, rng: &mut R)
    where
        R: RandomSource + ?Sized,
    {
        grid.fill(WALL);
        let Some(lattice) = Lattice::of(grid) else {
            return;
        };

        let mut visited = vec![false; lattice.len()];
        let start = lattice.random_room(rng);
        lattice.open_room(grid, &mut visited, start);
        let mut active = vec![start];

        while !active.is_empty() {
            let index = if rng.chance(self.newest_bias) {
                active.len() - 1
            } else {
                rng.index(active.len())
            };
            let current = active[index];
            let (options, count) = lattice.unvisited_neighbors(current, &visited);
            if count == 0 {
                let _ = active.remove(index);
                continue;
            }
            let next = options[rng.index(count)];
            lattice.knock_through(grid, &mut visited, current, next);
            active.push(next);
        }
    }
}

/// Recursive division carver.
#[derive(Clone, Copy, Debug, Default)]
pub struct RecursiveDivision;

#[derive(Clone, Copy, Debug)]
struct Chamber {
    left: i32,
    top: i32,
    right: i32,
    bottom: i32,
}

impl MazeCarver for RecursiveDivision {
    fn carve<R>(&self, grid: &mut CarveGrid, rng: &mut R)
    where
        R: RandomSource + ?Sized,
    {
        grid.fill(WALL);
        if grid.width() < 3 || grid.height() < 3 {
            return;
        }

        let right = grid.width() as i32 - 2;
        let bottom = grid.height() as i32 - 2;
        for y in 1..=bottom {
            for x in 1..=right {
                grid.set(x, y, PASSAGE);
            }
        }

        let mut chambers = vec![Chamber {
            left: 1,
            top: 1,
            right,
            bottom,
        }];

        while let Some(chamber) = chambers.pop() {
            let rows = even_between(chamber.top, chamber.bottom);
            let columns = even_between(chamber.left, chamber.right);
            let width = chamber.right - chamber.left + 1;
            let height = chamber.bottom - chamber.top + 1;

            let split_horizontally = match (rows.is_empty(), columns.is_empty()) {
                (true, true) => continue,
                (false, true) => true,
                (true, false) => false,
                (false, false) if width < height => true,
                (false, false) if height < width => false,
                (false, false) => rng.chance(0.5),
            };

            if split_horizontally {
                let wall_y = rows[rng.index(rows.len())];
                let gaps = odd_within(chamber.left, chamber.right);
                let gap_x = gaps[rng.index(gaps.len())];
                for x in chamber.left..=chamber.right {
                    if x != gap_x {
                        grid.set(x, wall_y, WALL);
                    }
                }
                chambers.push(Chamber {
                    bottom: wall_y - 1,
                    ..chamber
                });
                chambers.push(Chamber {
                    top: wall_y + 1,
                    ..chamber
                });
            } else {
                let wall_x = columns[rng.index(columns.len())];
                let gaps = odd_within(chamber.top, chamber.bottom);
                let gap_y = gaps[rng.index(gaps.len())];
                for y in chamber.top..=chamber.bottom {
                    if y != gap_y {
                        grid.set(wall_x, y, WALL);
                    }
                }
                chambers.push(Chamber {
                    right: wall_x - 1,
                    ..chamber
                });
                chambers.push(Chamber {
                    left: wall_x + 1,
                    ..chamber
                });
            }
        }
    }
}

/// Even coordinates strictly between `low` and `high`.
fn even_between(low: i32, high: i32) -> Vec<i32> {
    ((low + 1)..high).filter(|value| value % 2 == 0).collect()
}

/// Odd coordinates within `low..=high`.
fn odd_within(low: i32, high: i32) -> Vec<i32> {
    (low..=high).filter(|value| value % 2 != 0).collect()
}

/// Rooms on the odd lattice, indexed by `(column, row)` room coordinates.
#[derive(Clone, Copy, Debug)]
struct Lattice {
    columns: i32,
    rows: i32,
}

type Room = (i32, i32);

impl Lattice {
    fn of(grid: &CarveGrid) -> Option<Self> {
        if grid.width() < 3 || grid.height() < 3 {
            return None;
        }
        Some(Self {
            columns: (grid.width() as i32 - 1) / 2,
            rows: (grid.height() as i32 - 1) / 2,
        })
    }

    fn len(&self) -> usize {
        (self.columns * self.rows) as usize
    }

    fn slot(&self, room: Room) -> usize {
        (room.1 * self.columns + room.0) as usize
    }

    fn random_room<R>(&self, rng: &mut R) -> Room
    where
        R: RandomSource + ?Sized,
    {
        (rng.range_i32(0, self.columns), rng.range_i32(0, self.rows))
    }

    fn unvisited_neighbors(&self, room: Room, visited: &[bool]) -> ([Room; 4], usize) {
        let mut options = [(0, 0); 4];
        let mut count = 0;
        for (dx, dy) in NEIGHBOR_OFFSETS {
            let next = (room.0 + dx, room.1 + dy);
            if next.0 < 0 || next.1 < 0 || next.0 >= self.columns || next.1 >= self.rows {
                continue;
            }
            if visited[self.slot(next)] {
                continue;
            }
            options[count] = next;
            count += 1;
        }
        (options, count)
    }

    fn open_room(&self, grid: &mut CarveGrid, visited: &mut [bool], room: Room) {
        visited[self.slot(room)] = true;
        grid.set(room.0 * 2 + 1, room.1 * 2 + 1, PASSAGE);
    }

    fn knock_through(&self, grid: &mut CarveGrid, visited: &mut [bool], from: Room, to: Room) {
        grid.set(from.0 + to.0 + 1, from.1 + to.1 + 1, PASSAGE);
        self.open_room(grid, visited, to);
    }
}
