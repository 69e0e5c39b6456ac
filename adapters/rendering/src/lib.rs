#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Sanity Maze adapters.
//!
//! Adapters never look at the simulation directly. They receive a
//! [`Presentation`] whose [`Scene`] already holds tile colours with their
//! fog-of-war opacity, the player avatar, the heads-up display and the
//! screen-space effects for the frame.

use anyhow::Result as AnyResult;
use glam::Vec2;
use sanity_maze_core::{Event, Facing, TileCoord, TileKind};
use sanity_maze_system_movement::Player;
use sanity_maze_system_session::{HudSnapshot, Phase};
use sanity_maze_system_visibility::{PostProcessing, VisibilityFrame};
use std::time::Duration;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns the same color with its alpha replaced.
    #[must_use]
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0),
            ..self
        }
    }
}

/// Fill colours for every rendered tile kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TilePalette {
    /// Wall fill.
    pub wall: Color,
    /// Floor fill.
    pub floor: Color,
    /// Exit fill.
    pub exit: Color,
    /// Item fill.
    pub item: Color,
    /// Clue fill.
    pub clue: Color,
}

impl Default for TilePalette {
    fn default() -> Self {
        Self {
            wall: Color::from_rgb_u8(0x33, 0x33, 0x33),
            floor: Color::from_rgb_u8(0x44, 0x44, 0x44),
            exit: Color::from_rgb_u8(0xaa, 0xaa, 0xaa),
            item: Color::from_rgb_u8(0xff, 0xff, 0xbb),
            clue: Color::from_rgb_u8(0xff, 0x55, 0x55),
        }
    }
}

impl TilePalette {
    /// Fill for `kind`, or `None` for tiles that are never drawn.
    #[must_use]
    pub const fn color_for(&self, kind: TileKind) -> Option<Color> {
        match kind {
            TileKind::Empty => None,
            TileKind::Wall => Some(self.wall),
            TileKind::Floor => Some(self.floor),
            TileKind::Exit => Some(self.exit),
            TileKind::Item => Some(self.item),
            TileKind::Clue => Some(self.clue),
        }
    }
}

/// A single tile quad in viewport pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneTile {
    /// Maze coordinate of the tile.
    pub tile: TileCoord,
    /// Tile contents, for adapters that draw glyphs instead of quads.
    pub kind: TileKind,
    /// Top-left corner in viewport pixels.
    pub position: Vec2,
    /// Fill whose alpha carries the fog-of-war opacity.
    pub color: Color,
}

/// Player avatar: a disc with an eye looking towards the facing direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerPresentation {
    /// Centre of the body in viewport pixels.
    pub centre: Vec2,
    /// Body radius.
    pub radius: f32,
    /// Body fill.
    pub body: Color,
    /// Centre of the eye in viewport pixels.
    pub eye: Vec2,
    /// Eye radius.
    pub eye_radius: f32,
    /// Eye fill.
    pub eye_color: Color,
    /// Radius of the light glow around the player.
    pub glow_radius: f32,
    /// Glow opacity at the centre, fading to zero at `glow_radius`.
    pub glow_alpha: f32,
    /// Walk animation frame.
    pub animation_frame: u8,
    /// Ring drawn around the body while sprinting.
    pub sprint_ring: Option<Ring>,
    /// Breathing outline drawn while standing still.
    pub idle_outline: Option<Ring>,
}

/// Stroked circle around the avatar.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ring {
    /// Circle radius in pixels.
    pub radius: f32,
    /// Stroke colour.
    pub color: Color,
    /// Stroke width in pixels.
    pub width: f32,
}

impl PlayerPresentation {
    /// Avatar of width `size` centred on `centre` and looking towards `facing`.
    #[must_use]
    pub fn new(centre: Vec2, size: f32, facing: Facing, animation_frame: u8) -> Self {
        let look = match facing {
            Facing::Up => Vec2::new(0.0, -1.0),
            Facing::Down => Vec2::new(0.0, 1.0),
            Facing::Left => Vec2::new(-1.0, 0.0),
            Facing::Right => Vec2::new(1.0, 0.0),
        };
        Self {
            centre,
            radius: size / 2.0,
            body: Color::from_rgb_u8(0xdd, 0xdd, 0xdd),
            eye: centre + look * (size / 4.0),
            eye_radius: size / 6.0,
            eye_color: Color::from_rgb_u8(0x33, 0x33, 0x33),
            glow_radius: size * 2.0,
            glow_alpha: 0.3,
            animation_frame,
            sprint_ring: None,
            idle_outline: None,
        }
    }

    /// Adds the sprint ring or the breathing outline.
    ///
    /// The outline has the body radius; backends pulse it by a few percent.
    #[must_use]
    pub fn with_motion(mut self, moving: bool, sprinting: bool) -> Self {
        self.idle_outline = (!moving).then(|| Ring {
            radius: self.radius,
            color: Color::new(1.0, 1.0, 1.0, 0.3),
            width: 2.0,
        });
        self.sprint_ring = sprinting.then(|| Ring {
            radius: self.radius * 4.0 / 3.0,
            color: Color::new(1.0, 200.0 / 255.0, 0.0, 0.5),
            width: 3.0,
        });
        self
    }
}

/// Summary shown once the run is over.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeathScreen {
    /// Whole units of distance travelled across the session.
    pub distance: u32,
    /// Runs started in the session.
    pub attempts: u32,
}

/// Heads-up display content.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HudPresentation {
    /// Level label.
    pub level: u32,
    /// Sanity bar fill in percent.
    pub sanity_percent: f32,
    /// Stamina bar fill in percent.
    pub stamina_percent: f32,
    /// Whether the next level is being prepared.
    pub transitioning: bool,
    /// Death screen, once sanity has run out.
    pub death_screen: Option<DeathScreen>,
}

impl HudPresentation {
    /// Derives the display from a session snapshot.
    #[must_use]
    pub fn from_snapshot(snapshot: &HudSnapshot) -> Self {
        let death_screen = (snapshot.phase == Phase::GameOver).then(|| DeathScreen {
            distance: snapshot.stats.total_distance.max(0.0).floor() as u32,
            attempts: snapshot.stats.attempts,
        });
        Self {
            level: snapshot.level,
            sanity_percent: snapshot.status.sanity_percent.clamp(0.0, 100.0),
            stamina_percent: snapshot.status.stamina_percent.clamp(0.0, 100.0),
            transitioning: matches!(snapshot.phase, Phase::Transitioning { .. }),
            death_screen,
        }
    }
}

/// Single-line message area. A newer message replaces the one on screen.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MessageBoard {
    text: Option<String>,
    remaining: Duration,
}

impl MessageBoard {
    /// Shows the text carried by a [`Event::Message`]; other events are ignored.
    pub fn post(&mut self, event: &Event) {
        if let Event::Message { text, duration } = event {
            self.text = Some(text.clone());
            self.remaining = *duration;
        }
    }

    /// Counts the current message down, hiding it once its time is up.
    pub fn advance(&mut self, elapsed: Duration) {
        self.remaining = self.remaining.saturating_sub(elapsed);
        if self.remaining.is_zero() {
            self.text = None;
        }
    }

    /// Message currently on screen.
    #[must_use]
    pub fn current(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

/// Everything drawn for one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Viewport size in pixels.
    pub viewport: Vec2,
    /// Side length of a tile quad.
    pub tile_size: f32,
    /// Tile quads in drawing order.
    pub tiles: Vec<SceneTile>,
    /// Player avatar drawn above the tiles.
    pub player: PlayerPresentation,
    /// Vignette and aberration applied last.
    pub post: PostProcessing,
    /// Offset applied to the whole viewport while the screen shakes.
    pub shake_offset: Vec2,
    /// Heads-up display, once a level exists.
    pub hud: Option<HudPresentation>,
    /// Message on screen, if any.
    pub message: Option<String>,
}

impl Scene {
    /// Builds the scene for a visibility frame and the player it was computed for.
    #[must_use]
    pub fn compose(
        frame: &VisibilityFrame,
        player: &Player,
        palette: &TilePalette,
        tile_size: f32,
    ) -> Self {
        let tiles = frame
            .tiles
            .iter()
            .filter_map(|visible| {
                let color = palette.color_for(visible.kind)?;
                Some(SceneTile {
                    tile: visible.tile,
                    kind: visible.kind,
                    position: visible.screen,
                    color: color.with_alpha(visible.alpha),
                })
            })
            .collect();

        Self {
            viewport: frame.viewport,
            tile_size,
            tiles,
            player: PlayerPresentation::new(
                frame.player_screen,
                player.size(),
                player.facing(),
                player.animation_frame(),
            )
            .with_motion(player.is_moving(), player.is_sprinting()),
            post: frame.post,
            shake_offset: Vec2::ZERO,
            hud: None,
            message: None,
        }
    }

    /// Attaches the heads-up display.
    #[must_use]
    pub fn with_hud(mut self, hud: HudPresentation) -> Self {
        self.hud = Some(hud);
        self
    }

    /// Attaches the message on screen.
    #[must_use]
    pub fn with_message(mut self, message: Option<&str>) -> Self {
        self.message = message.map(str::to_owned);
        self
    }

    /// Shifts the whole frame by a screen shake offset.
    #[must_use]
    pub fn with_shake(mut self, offset: Vec2) -> Self {
        self.shake_offset = offset;
        self
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Background behind the maze.
    pub const CLEAR_COLOR: Color = Color::from_rgb_u8(0x22, 0x22, 0x22);

    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Sanity Maze frames.
pub trait RenderingBackend {
    /// Draws one frame.
    fn present(&mut self, presentation: &Presentation) -> AnyResult<()>;
}
