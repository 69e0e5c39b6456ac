//! Four-quadrant composition used by sectioned levels.

use sanity_maze_core::RandomSource;
use sanity_maze_system_carving::{Algorithm, CarveGrid, PASSAGE, WALL};

use crate::error::{GenerationError, SectionBorder};

/// Smallest width or height that leaves every quadrant room for a passage.
pub const MIN_SECTIONED_DIMENSION: u32 = 6;

/// Tunnels up to this many cells are accepted without looking further.
const SHORT_TUNNEL: usize = 4;

/// Summary of a composed sectioned layout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SectionLayout {
    mid_x: u32,
    mid_y: u32,
    bottom_right: Algorithm,
    crossings: [usize; 4],
}

impl SectionLayout {
    /// First column of the right-hand quadrants.
    #[must_use]
    pub const fn mid_x(&self) -> u32 {
        self.mid_x
    }

    /// First row of the bottom quadrants.
    #[must_use]
    pub const fn mid_y(&self) -> u32 {
        self.mid_y
    }

    /// Algorithm drawn for the bottom-right quadrant.
    #[must_use]
    pub const fn bottom_right(&self) -> Algorithm {
        self.bottom_right
    }

    /// Crossings carved per border, in [`SectionBorder::ALL`] order.
    #[must_use]
    pub const fn crossings(&self) -> [usize; 4] {
        self.crossings
    }
}

/// Carves the four quadrants of `grid` with different algorithms and joins
/// them with one or two passages across each shared border.
///
/// Top-left uses backtracking, top-right division, bottom-left growing tree
/// and bottom-right a random choice of backtracking or growing tree.
pub fn compose_sections<R>(
    grid: &mut CarveGrid,
    rng: &mut R,
) -> Result<SectionLayout, GenerationError>
where
    R: RandomSource + ?Sized,
{
    let width = grid.width();
    let height = grid.height();
    if width < MIN_SECTIONED_DIMENSION || height < MIN_SECTIONED_DIMENSION {
        return Err(GenerationError::DimensionsTooSmall {
            width,
            height,
            minimum: MIN_SECTIONED_DIMENSION,
        });
    }

    grid.fill(WALL);
    let mid_x = width / 2;
    let mid_y = height / 2;
    let bottom_right = if rng.chance(0.5) {
        Algorithm::Backtracking
    } else {
        Algorithm::GrowingTree
    };

    let quadrants = [
        (0, 0, mid_x, mid_y, Algorithm::Backtracking),
        (mid_x, 0, width - mid_x, mid_y, Algorithm::Division),
        (0, mid_y, mid_x, height - mid_y, Algorithm::GrowingTree),
        (mid_x, mid_y, width - mid_x, height - mid_y, bottom_right),
    ];
    for (offset_x, offset_y, section_width, section_height, algorithm) in quadrants {
        let mut section = CarveGrid::walled(section_width, section_height);
        algorithm.carve(&mut section, rng);
        grid.blit(&section, offset_x, offset_y);
    }

    let seam = Seam {
        mid_x: mid_x as i32,
        mid_y: mid_y as i32,
        width: width as i32,
        height: height as i32,
    };
    let mut crossings = [0; 4];
    for (slot, border) in SectionBorder::ALL.into_iter().enumerate() {
        let wanted = 1 + usize::from(rng.chance(0.5));
        let carved = seam.connect(grid, border, wanted, rng);
        if carved == 0 {
            return Err(GenerationError::SectionsDisconnected { border });
        }
        crossings[slot] = carved;
    }

    Ok(SectionLayout {
        mid_x,
        mid_y,
        bottom_right,
        crossings,
    })
}

struct Seam {
    mid_x: i32,
    mid_y: i32,
    width: i32,
    height: i32,
}

impl Seam {
    /// Carves up to `wanted` crossings across `border`, returning how many succeeded.
    fn connect<R>(
        &self,
        grid: &mut CarveGrid,
        border: SectionBorder,
        wanted: usize,
        rng: &mut R,
    ) -> usize
    where
        R: RandomSource + ?Sized,
    {
        let offsets = self.offsets(border);
        let mut used = Vec::new();
        for _ in 0..wanted {
            let available: Vec<i32> = offsets
                .clone()
                .filter(|offset| !used.contains(offset))
                .collect();
            if available.is_empty() {
                break;
            }
            let first = rng.index(available.len());
            let mut best: Option<(i32, Vec<(i32, i32)>)> = None;
            for step in 0..available.len() {
                let offset = available[(first + step) % available.len()];
                let Some(cells) = self.crossing(grid, border, offset) else {
                    continue;
                };
                let shorter = best
                    .as_ref()
                    .map_or(true, |(_, current)| cells.len() < current.len());
                if shorter {
                    let done = cells.len() <= SHORT_TUNNEL;
                    best = Some((offset, cells));
                    if done {
                        break;
                    }
                }
            }
            let Some((offset, cells)) = best else {
                break;
            };
            for (x, y) in cells {
                grid.set(x, y, PASSAGE);
            }
            used.push(offset);
        }
        used.len()
    }

    /// Positions along the seam strictly inside the border segment.
    fn offsets(&self, border: SectionBorder) -> std::ops::Range<i32> {
        match border {
            SectionBorder::Top => 1..self.mid_y - 1,
            SectionBorder::Bottom => self.mid_y + 1..self.height - 1,
            SectionBorder::Left => 1..self.mid_x - 1,
            SectionBorder::Right => self.mid_x + 1..self.width - 1,
        }
    }

    /// Wall cells to open so that both quadrants meet at `offset`, if each
    /// side reaches a passage before the outer wall.
    fn crossing(
        &self,
        grid: &CarveGrid,
        border: SectionBorder,
        offset: i32,
    ) -> Option<Vec<(i32, i32)>> {
        let (near, far, step) = match border {
            SectionBorder::Top | SectionBorder::Bottom => {
                ((self.mid_x - 1, offset), (self.mid_x, offset), (1, 0))
            }
            SectionBorder::Left | SectionBorder::Right => {
                ((offset, self.mid_y - 1), (offset, self.mid_y), (0, 1))
            }
        };
        let mut cells = self.tunnel(grid, near, (-step.0, -step.1))?;
        cells.extend(self.tunnel(grid, far, step)?);
        Some(cells)
    }

    fn tunnel(
        &self,
        grid: &CarveGrid,
        start: (i32, i32),
        step: (i32, i32),
    ) -> Option<Vec<(i32, i32)>> {
        let mut cells = Vec::new();
        let (mut x, mut y) = start;
        loop {
            if x < 1 || y < 1 || x > self.width - 2 || y > self.height - 2 {
                return None;
            }
            if grid.is_passage(x, y) {
                return Some(cells);
            }
            cells.push((x, y));
            x += step.0;
            y += step.1;
        }
    }
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

    #[test]
    fn rejects_grids_without_room_for_quadrants() {
        let mut grid = CarveGrid::walled(5, 12);
        assert_eq!(
            compose_sections(&mut grid, &mut Fixed(0.5)),
            Err(GenerationError::DimensionsTooSmall {
                width: 5,
                height: 12,
                minimum: MIN_SECTIONED_DIMENSION,
            })
        );
    }

    #[test]
    fn crossing_opens_seam_between_passages() {
        let grid = CarveGrid::from_rows(&[
            "########", //
            "#..##..#", //
            "#......#", //
            "########",
        ]);
        let seam = Seam {
            mid_x: 4,
            mid_y: 2,
            width: 8,
            height: 4,
        };

        assert_eq!(
            seam.crossing(&grid, SectionBorder::Top, 1),
            Some(vec![(3, 1), (4, 1)])
        );
        assert_eq!(seam.crossing(&grid, SectionBorder::Top, 2), Some(Vec::new()));
    }

    #[test]
    fn tunnel_gives_up_at_outer_wall() {
        let grid = CarveGrid::walled(8, 8);
        let seam = Seam {
            mid_x: 4,
            mid_y: 4,
            width: 8,
            height: 8,
        };

        assert_eq!(seam.crossing(&grid, SectionBorder::Left, 2), None);
        assert_eq!(
            seam.connect(&mut grid.clone(), SectionBorder::Left, 2, &mut Fixed(0.0)),
            0
        );
    }
}
