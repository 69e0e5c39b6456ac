//! Breadth-first reachability fields over the tile grid.

use std::collections::VecDeque;

use sanity_maze_core::TileCoord;

/// Dense breadth-first distance grid seeded from one or more origins.
///
/// Distances count orthogonal steps and default to `u32::MAX` for cells that
/// cannot be reached, so callers can tell walls and islands apart from
/// traversable tiles.
#[derive(Clone, Debug, Default)]
pub struct ReachabilityField {
    width: u32,
    height: u32,
    distances: Vec<u32>,
}

impl ReachabilityField {
    /// Rebuilds the distances using a breadth-first search from `origins`.
    pub fn rebuild_with<F>(&mut self, width: u32, height: u32, origins: &[TileCoord], mut is_blocked: F)
    where
        F: FnMut(TileCoord) -> bool,
    {
        let cell_count = usize::try_from(u64::from(width) * u64::from(height)).unwrap_or(0);
        self.width = width;
        self.height = height;

        if cell_count == 0 {
            self.distances.clear();
            return;
        }

        if self.distances.len() != cell_count {
            self.distances = vec![u32::MAX; cell_count];
        } else {
            self.distances.fill(u32::MAX);
        }

        let mut queue = VecDeque::new();
        for &origin in origins {
            if is_blocked(origin) {
                continue;
            }
            let Some(index) = self.index(origin) else {
                continue;
            };
            if self.distances[index] == 0 {
                continue;
            }
            self.distances[index] = 0;
            queue.push_back(origin);
        }

        while let Some(cell) = queue.pop_front() {
            let Some(current_index) = self.index(cell) else {
                continue;
            };
            let next_distance = self.distances[current_index].saturating_add(1);

            for neighbor in cell.neighbors() {
                let Some(neighbor_index) = self.index(neighbor) else {
                    continue;
                };
                if self.distances[neighbor_index] <= next_distance || is_blocked(neighbor) {
                    continue;
                }
                self.distances[neighbor_index] = next_distance;
                queue.push_back(neighbor);
            }
        }
    }

    /// Width of the field in tiles.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height of the field in tiles.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Steps from the nearest origin, if the tile was reached.
    #[must_use]
    pub fn distance(&self, tile: TileCoord) -> Option<u32> {
        self.index(tile)
            .and_then(|index| self.distances.get(index).copied())
            .filter(|distance| *distance != u32::MAX)
    }

    /// Reports whether the tile was reached from any origin.
    #[must_use]
    pub fn is_reachable(&self, tile: TileCoord) -> bool {
        self.distance(tile).is_some()
    }

    /// Number of tiles reached, origins included.
    #[must_use]
    pub fn reached_count(&self) -> usize {
        self.distances
            .iter()
            .filter(|distance| **distance != u32::MAX)
            .count()
    }

    fn index(&self, tile: TileCoord) -> Option<usize> {
        let column = u32::try_from(tile.x()).ok()?;
        let row = u32::try_from(tile.y()).ok()?;
        if column >= self.width || row >= self.height {
            return None;
        }
        let width = usize::try_from(self.width).ok()?;
        usize::try_from(row)
            .ok()?
            .checked_mul(width)?
            .checked_add(usize::try_from(column).ok()?)
    }
}

/// Connected-region labelling of the traversable tiles.
#[derive(Clone, Debug, Default)]
pub struct RegionMap {
    width: u32,
    height: u32,
    labels: Vec<Option<u32>>,
    sizes: Vec<usize>,
}

impl RegionMap {
    /// Labels every open tile with the index of its orthogonally connected region.
    #[must_use]
    pub fn label<F>(width: u32, height: u32, mut is_open: F) -> Self
    where
        F: FnMut(TileCoord) -> bool,
    {
        let cell_count = usize::try_from(u64::from(width) * u64::from(height)).unwrap_or(0);
        let mut map = Self {
            width,
            height,
            labels: vec![None; cell_count],
            sizes: Vec::new(),
        };

        let mut queue = VecDeque::new();
        for y in 0..height {
            for x in 0..width {
                let seed = TileCoord::new(x as i32, y as i32);
                let Some(seed_index) = map.index(seed) else {
                    continue;
                };
                if map.labels[seed_index].is_some() || !is_open(seed) {
                    continue;
                }

                let label = map.sizes.len() as u32;
                let mut size = 0;
                map.labels[seed_index] = Some(label);
                queue.push_back(seed);

                while let Some(cell) = queue.pop_front() {
                    size += 1;
                    for neighbor in cell.neighbors() {
                        let Some(index) = map.index(neighbor) else {
                            continue;
                        };
                        if map.labels[index].is_some() || !is_open(neighbor) {
                            continue;
                        }
                        map.labels[index] = Some(label);
                        queue.push_back(neighbor);
                    }
                }
                map.sizes.push(size);
            }
        }

        map
    }

    /// Region that contains the tile, if it is open.
    #[must_use]
    pub fn region_of(&self, tile: TileCoord) -> Option<u32> {
        self.index(tile)
            .and_then(|index| self.labels.get(index).copied().flatten())
    }

    /// Number of distinct regions.
    #[must_use]
    pub fn region_count(&self) -> usize {
        self.sizes.len()
    }

    /// Region holding the most tiles. Ties resolve to the region labelled first.
    #[must_use]
    pub fn largest_region(&self) -> Option<u32> {
        self.sizes
            .iter()
            .enumerate()
            .max_by(|(left_label, left), (right_label, right)| {
                left.cmp(right).then(right_label.cmp(left_label))
            })
            .map(|(label, _)| label as u32)
    }

    /// Number of tiles in the provided region.
    #[must_use]
    pub fn region_size(&self, region: u32) -> usize {
        self.sizes.get(region as usize).copied().unwrap_or(0)
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
