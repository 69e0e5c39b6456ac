//! Start, exit, item and clue placement on a converted grid.

use glam::Vec2;
use sanity_maze_core::{MazeTuning, RandomSource, TileCoord, TileKind};
use sanity_maze_world::{Grid, RegionMap};
use tracing::debug;

use crate::error::GenerationError;

/// Feature positions chosen for a level.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Placement {
    start: TileCoord,
    exit: TileCoord,
    items: Vec<TileCoord>,
    clues: Vec<TileCoord>,
}

impl Placement {
    /// Tile holding the player spawn point.
    #[must_use]
    pub const fn start(&self) -> TileCoord {
        self.start
    }

    /// Exit tile.
    #[must_use]
    pub const fn exit(&self) -> TileCoord {
        self.exit
    }

    /// Item tiles in placement order.
    #[must_use]
    pub fn items(&self) -> &[TileCoord] {
        &self.items
    }

    /// Clue tiles in placement order.
    #[must_use]
    pub fn clues(&self) -> &[TileCoord] {
        &self.clues
    }

    /// Splits the placement into its item and clue lists.
    #[must_use]
    pub fn into_features(self) -> (Vec<TileCoord>, Vec<TileCoord>) {
        (self.items, self.clues)
    }
}

/// Places every feature on `grid`, writing exit, item and clue tiles.
///
/// Start and exit are confined to the largest connected floor region so the
/// exit is always reachable from the spawn point.
pub(crate) fn place_features<R>(
    grid: &mut Grid,
    level: u32,
    tuning: &MazeTuning,
    rng: &mut R,
) -> Result<Placement, GenerationError>
where
    R: RandomSource + ?Sized,
{
    let width = grid.width();
    let height = grid.height();
    let regions = RegionMap::label(width, height, |tile| grid.get(tile) == TileKind::Floor);
    let region = regions
        .largest_region()
        .ok_or(GenerationError::NoStartTile { width, height })?;

    let start = find_start(grid, &regions, region, tuning.start_region, rng)
        .ok_or(GenerationError::NoStartTile { width, height })?;
    let exit = find_exit(grid, &regions, region, start, tuning.exit_region, rng)
        .ok_or(GenerationError::NoExitTile { width, height })?;
    grid.set(exit, TileKind::Exit);
    debug!(?start, ?exit, region_size = regions.region_size(region), "placed start and exit");

    let items = place_items(grid, start, exit, tuning, rng);
    let clues = place_clues(grid, start, exit, level, tuning, rng);

    Ok(Placement {
        start,
        exit,
        items,
        clues,
    })
}

fn find_start<R>(
    grid: &Grid,
    regions: &RegionMap,
    region: u32,
    start_region: f32,
    rng: &mut R,
) -> Option<TileCoord>
where
    R: RandomSource + ?Sized,
{
    let width = grid.width() as i32;
    let height = grid.height() as i32;
    let mut x = rng.range_i32(1, (width as f32 * start_region).floor() as i32);
    let mut y = rng.range_i32(1, (height as f32 * start_region).floor() as i32);

    for _ in 0..width * height {
        let tile = TileCoord::new(x, y);
        if grid.get(tile) == TileKind::Floor && regions.region_of(tile) == Some(region) {
            return Some(tile);
        }
        x = (x + 1) % width;
        if x == 0 {
            y = (y + 1) % height;
        }
    }
    None
}

fn find_exit<R>(
    grid: &Grid,
    regions: &RegionMap,
    region: u32,
    start: TileCoord,
    exit_region: f32,
    rng: &mut R,
) -> Option<TileCoord>
where
    R: RandomSource + ?Sized,
{
    let width = grid.width() as i32;
    let height = grid.height() as i32;
    let mut x = rng.range_i32((width as f32 * exit_region).floor() as i32, width - 2);
    let mut y = rng.range_i32((height as f32 * exit_region).floor() as i32, height - 2);

    for _ in 0..width * height {
        let tile = TileCoord::new(x, y);
        if tile != start
            && grid.get(tile) == TileKind::Floor
            && regions.region_of(tile) == Some(region)
        {
            return Some(tile);
        }
        x = (x - 1).rem_euclid(width);
        if x == width - 1 {
            y = (y - 1).rem_euclid(height);
        }
    }
    None
}

fn place_items<R>(
    grid: &mut Grid,
    start: TileCoord,
    exit: TileCoord,
    tuning: &MazeTuning,
    rng: &mut R,
) -> Vec<TileCoord>
where
    R: RandomSource + ?Sized,
{
    let width = grid.width() as f32;
    let height = grid.height() as f32;
    let count = ((width * height * tuning.item_density).floor() as u32).min(tuning.max_items);
    let from = as_vec(start);
    let to = as_vec(exit);
    let jitter = tuning.item_jitter;

    let mut items = Vec::new();
    for index in 0..count {
        let progress = (index + 1) as f32 / (count + 1) as f32;
        let offset = Vec2::new(
            rng.range_f32(-jitter, jitter) * width,
            rng.range_f32(-jitter, jitter) * height,
        );
        let target = nearest_tile(from.lerp(to, progress) + offset);
        match find_feature_tile(
            grid,
            target,
            &[start, exit],
            tuning.feature_min_distance,
            tuning.feature_search_radius,
        ) {
            Some(tile) => {
                grid.set(tile, TileKind::Item);
                items.push(tile);
            }
            None => debug!(?target, "no floor tile for item"),
        }
    }
    items
}

fn place_clues<R>(
    grid: &mut Grid,
    start: TileCoord,
    exit: TileCoord,
    level: u32,
    tuning: &MazeTuning,
    rng: &mut R,
) -> Vec<TileCoord>
where
    R: RandomSource + ?Sized,
{
    let count = tuning.clue_base_count + level / 2;
    let from = as_vec(start);
    let direction = as_vec(exit) - from;
    let jitter = tuning.clue_angle_jitter;

    let mut clues = Vec::new();
    for index in 0..count {
        let progress = (index + 1) as f32 / (count + 1) as f32;
        let (sin, cos) = rng.range_f32(-jitter, jitter).sin_cos();
        let rotated = Vec2::new(
            direction.x * cos - direction.y * sin,
            direction.x * sin + direction.y * cos,
        );
        let target = nearest_tile(from + rotated * progress);
        match find_feature_tile(
            grid,
            target,
            &[start, exit],
            tuning.feature_min_distance,
            tuning.feature_search_radius,
        ) {
            Some(tile) => {
                grid.set(tile, TileKind::Clue);
                clues.push(tile);
            }
            None => debug!(?target, "no floor tile for clue"),
        }
    }
    clues
}

/// Finds the floor tile nearest to `target` that keeps at least
/// `min_distance` from every tile in `avoid`.
///
/// The target is clamped inside the outer wall, then square rings of growing
/// radius are searched up to `radius`. Within the first ring that holds a
/// qualifying tile the one closest to the target wins, ties going to the
/// earliest in row-major order.
#[must_use]
pub fn find_feature_tile(
    grid: &Grid,
    target: TileCoord,
    avoid: &[TileCoord],
    min_distance: f32,
    radius: u32,
) -> Option<TileCoord> {
    let max_x = (grid.width() as i32 - 2).max(1);
    let max_y = (grid.height() as i32 - 2).max(1);
    let target = TileCoord::new(target.x().clamp(1, max_x), target.y().clamp(1, max_y));

    for ring in 0..=radius as i32 {
        let mut best: Option<(f32, TileCoord)> = None;
        for dy in -ring..=ring {
            for dx in -ring..=ring {
                if dx.abs().max(dy.abs()) != ring {
                    continue;
                }
                let tile = target.offset(dx, dy);
                if tile.x() < 1 || tile.y() < 1 || tile.x() > max_x || tile.y() > max_y {
                    continue;
                }
                if grid.get(tile) != TileKind::Floor
                    || avoid.iter().any(|other| tile.distance(*other) < min_distance)
                {
                    continue;
                }
                let distance = tile.distance(target);
                if best.map_or(true, |(current, _)| distance < current) {
                    best = Some((distance, tile));
                }
            }
        }
        if let Some((_, tile)) = best {
            return Some(tile);
        }
    }
    None
}

fn as_vec(tile: TileCoord) -> Vec2 {
    Vec2::new(tile.x() as f32, tile.y() as f32)
}

fn nearest_tile(position: Vec2) -> TileCoord {
    TileCoord::new(position.x.round() as i32, position.y.round() as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(f64);

    impl RandomSource for Fixed {
        fn next_unit(&mut self) -> f64 {
            self.0
        }
    }

    fn open_room(width: u32, height: u32) -> Grid {
        let mut grid = Grid::filled(width, height, TileKind::Wall);
        for y in 1..height as i32 - 1 {
            for x in 1..width as i32 - 1 {
                grid.set(TileCoord::new(x, y), TileKind::Floor);
            }
        }
        grid
    }

    #[test]
    fn feature_search_prefers_target_tile() {
        let grid = open_room(20, 20);

        assert_eq!(
            find_feature_tile(&grid, TileCoord::new(10, 10), &[], 5.0, 5),
            Some(TileCoord::new(10, 10))
        );
    }

    #[test]
    fn feature_search_clamps_target_inside_outer_wall() {
        let grid = open_room(12, 12);

        assert_eq!(
            find_feature_tile(&grid, TileCoord::new(-40, 99), &[], 0.0, 0),
            Some(TileCoord::new(1, 10))
        );
    }

    #[test]
    fn feature_search_keeps_distance_from_avoided_tiles() {
        let grid = open_room(20, 20);
        let start = TileCoord::new(10, 10);

        let tile = find_feature_tile(&grid, start, &[start], 5.0, 5).expect("ring holds a tile");

        assert!(tile.distance(start) >= 5.0);
        assert_eq!(tile.x().abs_diff(10).max(tile.y().abs_diff(10)), 4);
    }

    #[test]
    fn feature_search_gives_up_beyond_radius() {
        let mut grid = Grid::filled(30, 30, TileKind::Wall);
        grid.set(TileCoord::new(25, 25), TileKind::Floor);

        assert_eq!(
            find_feature_tile(&grid, TileCoord::new(5, 5), &[], 0.0, 5),
            None
        );
    }

    #[test]
    fn start_scan_wraps_to_the_next_row() {
        let grid = Grid::from_rows(&[
            "####", //
            "####", //
            "#..#", //
            "####",
        ]);
        let regions = RegionMap::label(4, 4, |tile| grid.get(tile) == TileKind::Floor);

        // The seed lands on the wall at (1, 1).
        assert_eq!(
            find_start(&grid, &regions, 0, 0.3, &mut Fixed(0.0)),
            Some(TileCoord::new(1, 2))
        );
    }

    #[test]
    fn exit_skips_the_start_tile_and_other_regions() {
        let grid = Grid::from_rows(&[
            "#######", //
            "#..#..#", //
            "#..#..#", //
            "#######",
        ]);
        let regions = RegionMap::label(7, 4, |tile| grid.get(tile) == TileKind::Floor);
        let left = regions
            .region_of(TileCoord::new(1, 1))
            .expect("left room is floor");

        let start = TileCoord::new(2, 2);

        let exit = find_exit(&grid, &regions, left, start, 0.7, &mut Fixed(0.0))
            .expect("left room has several tiles");

        assert_eq!(regions.region_of(exit), Some(left));
        assert_ne!(exit, start);
    }

    #[test]
    fn single_floor_tile_has_no_exit() {
        let mut grid = Grid::from_rows(&["###", "#.#", "###"]);
        let tuning = MazeTuning::default();

        assert_eq!(
            place_features(&mut grid, 1, &tuning, &mut Fixed(0.5)),
            Err(GenerationError::NoExitTile {
                width: 3,
                height: 3
            })
        );
    }

    #[test]
    fn solid_grid_has_no_start() {
        let mut grid = Grid::filled(5, 5, TileKind::Wall);

        assert_eq!(
            place_features(&mut grid, 1, &MazeTuning::default(), &mut Fixed(0.5)),
            Err(GenerationError::NoStartTile {
                width: 5,
                height: 5
            })
        );
    }

    #[test]
    fn sparse_corridor_receives_no_items() {
        let mut grid = Grid::from_rows(&[
            "##########",
            "#........#",
            "##########",
            "##########",
            "##########",
            "##########",
            "##########",
            "##########",
            "##########",
            "##########",
        ]);
        let tuning = MazeTuning {
            item_density: 0.009,
            clue_base_count: 0,
            ..MazeTuning::default()
        };

        let placement =
            place_features(&mut grid, 1, &tuning, &mut Fixed(0.5)).expect("corridor has room");

        assert!(placement.items().is_empty());
        assert_eq!(grid.count(TileKind::Item), 0);
        assert_eq!(grid.count(TileKind::Exit), 1);
    }
}
