//! Extra wall injection applied after carving.

use sanity_maze_core::{RandomSource, TileCoord};
use sanity_maze_system_carving::{CarveGrid, NEIGHBOR_OFFSETS, WALL};
use sanity_maze_world::ReachabilityField;

/// Rule deciding whether a passage cell may be turned into a wall.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IslandCheck {
    /// Local neighbour count only. Cheap, but may split corridors in two.
    #[default]
    Heuristic,
    /// Heuristic plus a search proving the cell's open neighbours stay connected.
    Strict,
}

impl IslandCheck {
    fn permits(self, grid: &CarveGrid, x: i32, y: i32, scratch: &mut ReachabilityField) -> bool {
        if would_create_island(grid, x, y) {
            return false;
        }
        match self {
            Self::Heuristic => true,
            Self::Strict => neighbours_stay_connected(grid, x, y, scratch),
        }
    }
}

/// Reports whether walling `(x, y)` is rejected by the local island rule.
///
/// Cells with zero or one open neighbour are dead ends and cells with two are
/// corridor links; both may be walled. Junctions with three or more open
/// neighbours are kept open.
#[must_use]
pub fn would_create_island(grid: &CarveGrid, x: i32, y: i32) -> bool {
    grid.passage_neighbors(x, y) > 2
}

/// Turns a share of interior passage cells with at least two wall neighbours
/// back into walls, returning how many cells were blocked.
///
/// The candidate set is collected once. Candidates are drawn at random and
/// discarded when `check` rejects them against the current grid, until
/// `floor(candidates * block_fraction)` cells are blocked or the candidates
/// run out.
pub fn add_additional_walls<R>(
    grid: &mut CarveGrid,
    block_fraction: f32,
    check: IslandCheck,
    rng: &mut R,
) -> usize
where
    R: RandomSource + ?Sized,
{
    let width = grid.width() as i32;
    let height = grid.height() as i32;
    let mut candidates = Vec::new();
    for y in 1..height - 1 {
        for x in 1..width - 1 {
            if grid.is_passage(x, y) && grid.wall_neighbors(x, y) >= 2 {
                candidates.push((x, y));
            }
        }
    }

    let target = (candidates.len() as f32 * block_fraction.clamp(0.0, 1.0)).floor() as usize;
    let mut scratch = ReachabilityField::default();
    let mut blocked = 0;
    while blocked < target && !candidates.is_empty() {
        let (x, y) = candidates.swap_remove(rng.index(candidates.len()));
        if !check.permits(grid, x, y, &mut scratch) {
            continue;
        }
        grid.set(x, y, WALL);
        blocked += 1;
    }
    blocked
}

fn neighbours_stay_connected(
    grid: &CarveGrid,
    x: i32,
    y: i32,
    scratch: &mut ReachabilityField,
) -> bool {
    let open: Vec<TileCoord> = NEIGHBOR_OFFSETS
        .iter()
        .map(|(dx, dy)| TileCoord::new(x + dx, y + dy))
        .filter(|tile| grid.is_passage(tile.x(), tile.y()))
        .collect();
    let Some((first, rest)) = open.split_first() else {
        return true;
    };
    if rest.is_empty() {
        return true;
    }

    let blocked = TileCoord::new(x, y);
    scratch.rebuild_with(grid.width(), grid.height(), &[*first], |tile| {
        tile == blocked || !grid.is_passage(tile.x(), tile.y())
    });
    rest.iter().all(|tile| scratch.is_reachable(*tile))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sanity_maze_system_carving::PASSAGE;

    struct Cycle(Vec<f64>, usize);

    impl RandomSource for Cycle {
        fn next_unit(&mut self) -> f64 {
            let value = self.0[self.1 % self.0.len()];
            self.1 += 1;
            value
        }
    }

    #[test]
    fn island_rule_follows_open_neighbour_count() {
        let grid = CarveGrid::from_rows(&[
            "#######", //
            "#.#...#", //
            "#.#.#.#", //
            "#.....#", //
            "#######",
        ]);

        // Dead end.
        assert!(!would_create_island(&grid, 1, 1));
        // Corridor link.
        assert!(!would_create_island(&grid, 1, 2));
        // Junction.
        assert!(would_create_island(&grid, 3, 3));
        // Wall cell with no open neighbours.
        assert!(!would_create_island(&CarveGrid::walled(5, 5), 2, 2));
    }

    #[test]
    fn strict_check_keeps_cycle_links_only() {
        let grid = CarveGrid::from_rows(&[
            "#######", //
            "#.....#", //
            "#.###.#", //
            "#.....#", //
            "#.#####", //
            "#.#####", //
            "#######",
        ]);
        let mut scratch = ReachabilityField::default();

        // Part of the loop: removing it leaves the rest connected.
        assert!(IslandCheck::Strict.permits(&grid, 3, 1, &mut scratch));
        // The corridor below the loop hangs off a single cell.
        assert!(!IslandCheck::Strict.permits(&grid, 1, 4, &mut scratch));
        assert!(IslandCheck::Heuristic.permits(&grid, 1, 4, &mut scratch));
    }

    #[test]
    fn zero_fraction_blocks_nothing() {
        let mut grid = CarveGrid::from_rows(&["#####", "#...#", "#####"]);
        let before = grid.clone();

        let blocked = add_additional_walls(
            &mut grid,
            0.0,
            IslandCheck::Heuristic,
            &mut Cycle(vec![0.0], 0),
        );

        assert_eq!(blocked, 0);
        assert_eq!(grid, before);
    }

    #[test]
    fn blocks_floor_of_candidate_share() {
        // Every interior passage of a straight corridor has two wall neighbours.
        let mut grid = CarveGrid::from_rows(&["##########", "#........#", "##########"]);

        let blocked = add_additional_walls(
            &mut grid,
            0.5,
            IslandCheck::Heuristic,
            &mut Cycle(vec![0.3, 0.7, 0.1], 0),
        );

        assert_eq!(blocked, 4);
        assert_eq!(
            grid.cells().iter().filter(|cell| **cell == PASSAGE).count(),
            4
        );
    }

    #[test]
    fn strict_check_never_splits_a_tree() {
        let mut grid = CarveGrid::from_rows(&[
            "#########", //
            "#.......#", //
            "#.#.#.#.#", //
            "#.#.#.#.#", //
            "#########",
        ]);

        let blocked = add_additional_walls(
            &mut grid,
            1.0,
            IslandCheck::Strict,
            &mut Cycle(vec![0.5, 0.2, 0.9], 0),
        );

        let open: Vec<TileCoord> = (0..9)
            .flat_map(|x| (0..5).map(move |y| TileCoord::new(x, y)))
            .filter(|tile| grid.is_passage(tile.x(), tile.y()))
            .collect();
        let mut field = ReachabilityField::default();
        field.rebuild_with(9, 5, &open[..1], |tile| !grid.is_passage(tile.x(), tile.y()));
        assert!(open.iter().all(|tile| field.is_reachable(*tile)));
        assert!(blocked > 0);
    }
}
