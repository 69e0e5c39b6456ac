#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Distance and sanity driven visibility for the maze.
//!
//! The model never draws anything. Each frame it reports which tiles fall
//! inside the camera, how opaque each one is and where it lands on screen,
//! together with the screen-space effects an adapter should apply on top.

mod camera;
mod effects;
mod post;

use glam::Vec2;
use sanity_maze_core::{GameConfig, RandomSource, TileCoord, TileKind, VisibilityTuning};
use sanity_maze_system_movement::Player;
use sanity_maze_world::Maze;

pub use camera::{Camera, TileRange};
pub use effects::{Distortion, Flicker};
pub use post::{Aberration, PostProcessing, Vignette};

/// Opacity from distance alone.
///
/// Tiles within half of `view_distance` are fully visible; beyond that the
/// opacity falls linearly, reaching zero at `view_distance`.
#[must_use]
pub fn fog_alpha(distance: f32, view_distance: f32) -> f32 {
    let half = view_distance * 0.5;
    if distance <= half || half <= 0.0 {
        return 1.0;
    }
    (1.0 - (distance - half) / half).max(0.0)
}

/// Global brightness multiplier for the player's sanity, never below `floor`.
#[must_use]
pub fn sanity_brightness(sanity: f32, sanity_max: f32, floor: f32) -> f32 {
    if sanity_max <= 0.0 {
        return floor;
    }
    (sanity / sanity_max).max(floor)
}

/// A tile that should be drawn this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisibleTile {
    /// Maze coordinate.
    pub tile: TileCoord,
    /// Tile contents.
    pub kind: TileKind,
    /// Opacity in `[0, 1]`.
    pub alpha: f32,
    /// Top-left corner in viewport pixels, distortion included.
    pub screen: Vec2,
}

/// Everything an adapter needs to draw one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct VisibilityFrame {
    /// World position of the viewport's top-left corner.
    pub camera_offset: Vec2,
    /// Viewport size in pixels.
    pub viewport: Vec2,
    /// Tiles inside the viewport in row-major order. Empty tiles are omitted.
    pub tiles: Vec<VisibleTile>,
    /// Player centre in viewport pixels.
    pub player_screen: Vec2,
    /// Screen-space effects.
    pub post: PostProcessing,
}

/// Fog of war, flicker and distortion state for the active level.
#[derive(Clone, Debug)]
pub struct VisibilityModel {
    tuning: VisibilityTuning,
    tile_size: f32,
    camera: Camera,
    flicker: Flicker,
    distortion: Distortion,
}

impl VisibilityModel {
    /// Creates the model for a viewport of `viewport` pixels.
    #[must_use]
    pub fn new(config: &GameConfig, viewport: Vec2) -> Self {
        Self {
            tuning: config.visibility.clone(),
            tile_size: config.tile_size,
            camera: Camera::new(viewport),
            flicker: Flicker::new(&config.visibility),
            distortion: Distortion::new(&config.visibility),
        }
    }

    /// Camera following the player.
    #[must_use]
    pub const fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Current flicker state.
    #[must_use]
    pub const fn flicker(&self) -> &Flicker {
        &self.flicker
    }

    /// Mutable access to the distortion, to toggle it.
    pub fn distortion_mut(&mut self) -> &mut Distortion {
        &mut self.distortion
    }

    /// Resizes the viewport.
    pub fn resize(&mut self, viewport: Vec2) {
        self.camera.resize(viewport);
    }

    /// Advances flicker and distortion by `dt` seconds.
    pub fn advance<R>(&mut self, dt: f32, rng: &mut R)
    where
        R: RandomSource + ?Sized,
    {
        self.flicker.advance(dt, rng);
        self.distortion.advance(dt);
    }

    /// Opacity of `tile` holding `kind` for a player at `player` pixels.
    #[must_use]
    pub fn tile_alpha(
        &self,
        tile: TileCoord,
        kind: TileKind,
        player: Vec2,
        sanity: f32,
        sanity_max: f32,
    ) -> f32 {
        let distance = tile.center(self.tile_size).distance(player);
        let mut alpha = fog_alpha(distance, self.tuning.view_distance * self.tile_size);
        alpha *= sanity_brightness(sanity, sanity_max, self.tuning.min_sanity_brightness);
        if kind == TileKind::Item {
            alpha *= self.flicker.intensity();
        }
        alpha.clamp(0.0, 1.0)
    }

    /// Centres the camera on the player and computes the frame.
    pub fn frame(&mut self, maze: &Maze, player: &Player) -> VisibilityFrame {
        self.camera.follow(player.position());

        let range = self
            .camera
            .visible_tiles(self.tile_size, maze.width(), maze.height());
        let tiles = range
            .iter()
            .filter_map(|tile| {
                let kind = maze.tile_at(tile);
                if !kind.is_rendered() {
                    return None;
                }
                let screen = self.camera.to_screen(tile.origin(self.tile_size))
                    + self.distortion.offset(tile, self.tile_size);
                Some(VisibleTile {
                    tile,
                    kind,
                    alpha: self.tile_alpha(
                        tile,
                        kind,
                        player.position(),
                        player.sanity(),
                        player.sanity_max(),
                    ),
                    screen,
                })
            })
            .collect();

        VisibilityFrame {
            camera_offset: self.camera.offset(),
            viewport: self.camera.viewport(),
            tiles,
            player_screen: self.camera.to_screen(player.position()),
            post: PostProcessing::for_sanity(
                self.camera.viewport(),
                player.sanity(),
                player.sanity_max(),
                &self.tuning,
            ),
        }
    }
}
