use std::ops::Range;

use glam::Vec2;
use sanity_maze_core::TileCoord;

/// Viewport that follows the player across the maze.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    offset: Vec2,
    viewport: Vec2,
}

impl Camera {
    /// Creates a camera for a viewport measured in pixels.
    #[must_use]
    pub fn new(viewport: Vec2) -> Self {
        Self {
            offset: Vec2::ZERO,
            viewport: viewport.max(Vec2::ZERO),
        }
    }

    /// Centres the viewport on `target`.
    pub fn follow(&mut self, target: Vec2) {
        self.offset = target - self.viewport / 2.0;
    }

    /// Resizes the viewport, keeping the current centre.
    pub fn resize(&mut self, viewport: Vec2) {
        let centre = self.offset + self.viewport / 2.0;
        self.viewport = viewport.max(Vec2::ZERO);
        self.follow(centre);
    }

    /// World position of the viewport's top-left corner.
    #[must_use]
    pub const fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Viewport size in pixels.
    #[must_use]
    pub const fn viewport(&self) -> Vec2 {
        self.viewport
    }

    /// Converts a world position into viewport coordinates.
    #[must_use]
    pub fn to_screen(&self, world: Vec2) -> Vec2 {
        world - self.offset
    }

    /// Tiles overlapped by the viewport, clipped to a `width` by `height` maze.
    #[must_use]
    pub fn visible_tiles(&self, tile_size: f32, width: u32, height: u32) -> TileRange {
        let start = (self.offset / tile_size).floor();
        let end = ((self.offset + self.viewport) / tile_size).ceil();
        let clip = |from: f32, to: f32, limit: u32| {
            let limit = i32::try_from(limit).unwrap_or(i32::MAX);
            let from = (from as i32).max(0);
            let to = (to as i32).min(limit);
            from..to.max(from)
        };
        TileRange {
            columns: clip(start.x, end.x, width),
            rows: clip(start.y, end.y, height),
        }
    }
}

/// Rectangular block of tiles.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileRange {
    /// Columns in the block.
    pub columns: Range<i32>,
    /// Rows in the block.
    pub rows: Range<i32>,
}

impl TileRange {
    /// Iterates over the tiles in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = TileCoord> + '_ {
        self.rows
            .clone()
            .flat_map(move |y| self.columns.clone().map(move |x| TileCoord::new(x, y)))
    }

    /// Number of tiles in the block.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len() * self.rows.len()
    }

    /// Whether the block holds no tile.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn follow_centres_viewport_on_target() {
        let mut camera = Camera::new(Vec2::new(800.0, 600.0));
        camera.follow(Vec2::new(1000.0, 1000.0));

        assert_eq!(camera.offset(), Vec2::new(600.0, 700.0));
        assert_eq!(camera.to_screen(Vec2::new(1000.0, 1000.0)), Vec2::new(400.0, 300.0));
    }

    #[test]
    fn visible_range_covers_partial_tiles() {
        let mut camera = Camera::new(Vec2::new(640.0, 320.0));
        camera.follow(Vec2::new(500.0, 500.0));

        // Offset (180, 340) to (820, 660) in 64 px tiles.
        let range = camera.visible_tiles(64.0, 100, 100);
        assert_eq!(range.columns, 2..13);
        assert_eq!(range.rows, 5..11);
        assert_eq!(range.len(), 66);
    }

    #[test]
    fn visible_range_is_clipped_to_maze() {
        let mut camera = Camera::new(Vec2::new(640.0, 640.0));
        camera.follow(Vec2::new(32.0, 32.0));

        let range = camera.visible_tiles(64.0, 4, 3);
        assert_eq!(range.columns, 0..4);
        assert_eq!(range.rows, 0..3);
        assert_eq!(range.iter().next(), Some(TileCoord::new(0, 0)));
        assert_eq!(range.iter().last(), Some(TileCoord::new(3, 2)));
    }

    #[test]
    fn viewport_far_outside_maze_sees_nothing() {
        let mut camera = Camera::new(Vec2::new(100.0, 100.0));
        camera.follow(Vec2::new(-5000.0, 20.0));

        assert!(camera.visible_tiles(64.0, 10, 10).is_empty());
    }
}
