use std::collections::VecDeque;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sanity_maze_system_carving::{
    Algorithm, CarveGrid, GrowingTree, MazeCarver, RecursiveBacktrack, NEIGHBOR_OFFSETS, PASSAGE,
};

const ALGORITHMS: [Algorithm; 3] = [
    Algorithm::Backtracking,
    Algorithm::Division,
    Algorithm::GrowingTree,
];

#[test]
fn every_algorithm_connects_all_passages() {
    for algorithm in ALGORITHMS {
        for (width, height) in [(5, 5), (21, 15), (22, 17), (30, 30), (3, 9)] {
            let mut rng = ChaCha8Rng::seed_from_u64(u64::from(width * 31 + height));
            let mut grid = CarveGrid::walled(width, height);
            algorithm.carve(&mut grid, &mut rng);

            assert!(
                grid.passage_count() > 0,
                "{} carved nothing into {width}x{height}",
                algorithm.name()
            );
            assert_eq!(
                flood_count(&grid),
                grid.passage_count(),
                "{} left disconnected passages in {width}x{height}",
                algorithm.name()
            );
        }
    }
}

#[test]
fn outer_ring_stays_solid() {
    for algorithm in ALGORITHMS {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut grid = CarveGrid::walled(18, 13);
        algorithm.carve(&mut grid, &mut rng);

        for x in 0..18 {
            assert!(!grid.is_passage(x, 0), "{}", algorithm.name());
            assert!(!grid.is_passage(x, 12), "{}", algorithm.name());
        }
        for y in 0..13 {
            assert!(!grid.is_passage(0, y), "{}", algorithm.name());
            assert!(!grid.is_passage(17, y), "{}", algorithm.name());
        }
    }
}

#[test]
fn lattice_carvers_produce_trees() {
    let carvers: [(&str, fn(&mut CarveGrid, &mut ChaCha8Rng)); 2] = [
        ("backtrack", |grid, rng| RecursiveBacktrack.carve(grid, rng)),
        ("growing-tree", |grid, rng| {
            GrowingTree::new(0.25).carve(grid, rng)
        }),
    ];

    for (name, carve) in carvers {
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let mut grid = CarveGrid::walled(25, 19);
        carve(&mut grid, &mut rng);

        let passages = grid.passage_count();
        assert_eq!(
            adjacent_passage_pairs(&grid),
            passages - 1,
            "{name} produced a cycle"
        );
    }
}

#[test]
fn carving_is_deterministic_for_a_seed() {
    for algorithm in ALGORITHMS {
        let mut first = CarveGrid::walled(31, 23);
        let mut second = CarveGrid::walled(31, 23);
        algorithm.carve(&mut first, &mut ChaCha8Rng::seed_from_u64(5));
        algorithm.carve(&mut second, &mut ChaCha8Rng::seed_from_u64(5));
        assert_eq!(first, second, "{} diverged", algorithm.name());
    }
}

#[test]
fn undersized_grids_stay_walled() {
    for algorithm in ALGORITHMS {
        let mut grid = CarveGrid::walled(2, 9);
        algorithm.carve(&mut grid, &mut ChaCha8Rng::seed_from_u64(1));
        assert_eq!(grid.passage_count(), 0, "{}", algorithm.name());
    }
}

#[test]
fn division_leaves_long_corridors() {
    let mut grid = CarveGrid::walled(41, 41);
    Algorithm::Division.carve(&mut grid, &mut ChaCha8Rng::seed_from_u64(3));

    let longest_run = (0..41)
        .map(|y| {
            let mut best = 0;
            let mut run = 0;
            for x in 0..41 {
                if grid.is_passage(x, y) {
                    run += 1;
                    best = best.max(run);
                } else {
                    run = 0;
                }
            }
            best
        })
        .max()
        .unwrap_or(0);

    assert!(longest_run >= 5, "expected a straight corridor, longest run {longest_run}");
}

fn flood_count(grid: &CarveGrid) -> usize {
    let width = grid.width() as i32;
    let height = grid.height() as i32;
    let Some(seed) = (0..height)
        .flat_map(|y| (0..width).map(move |x| (x, y)))
        .find(|(x, y)| grid.is_passage(*x, *y))
    else {
        return 0;
    };

    let mut seen = vec![false; grid.cells().len()];
    let mut queue = VecDeque::from([seed]);
    seen[(seed.1 * width + seed.0) as usize] = true;
    let mut count = 0;
    while let Some((x, y)) = queue.pop_front() {
        count += 1;
        for (dx, dy) in NEIGHBOR_OFFSETS {
            let (nx, ny) = (x + dx, y + dy);
            if !grid.is_passage(nx, ny) {
                continue;
            }
            let index = (ny * width + nx) as usize;
            if !seen[index] {
                seen[index] = true;
                queue.push_back((nx, ny));
            }
        }
    }
    count
}

fn adjacent_passage_pairs(grid: &CarveGrid) -> usize {
    let mut pairs = 0;
    for y in 0..grid.height() as i32 {
        for x in 0..grid.width() as i32 {
            if grid.get(x, y) != PASSAGE {
                continue;
            }
            if grid.is_passage(x + 1, y) {
                pairs += 1;
            }
            if grid.is_passage(x, y + 1) {
                pairs += 1;
            }
        }
    }
    pairs
}
