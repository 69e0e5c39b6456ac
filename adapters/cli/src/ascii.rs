use std::io::Write;

use anyhow::Result;
use sanity_maze_rendering::{Presentation, RenderingBackend};

/// Tiles fainter than this are drawn as fog.
const FOG_CUTOFF: f32 = 0.1;

/// Draws scenes as text, one glyph per tile.
pub(crate) struct AsciiBackend<W> {
    out: W,
}

impl<W: Write> AsciiBackend<W> {
    pub(crate) fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> RenderingBackend for AsciiBackend<W> {
    fn present(&mut self, presentation: &Presentation) -> Result<()> {
        let scene = &presentation.scene;
        let tile_size = scene.tile_size.max(1.0);
        let columns = (scene.viewport.x / tile_size).ceil().max(0.0) as usize;
        let rows = (scene.viewport.y / tile_size).ceil().max(0.0) as usize;
        let mut canvas = vec![vec![' '; columns]; rows];

        let cell_of = |x: f32, y: f32| {
            let column = (x / tile_size).floor();
            let row = (y / tile_size).floor();
            (column >= 0.0 && row >= 0.0 && (column as usize) < columns && (row as usize) < rows)
                .then(|| (column as usize, row as usize))
        };

        for tile in &scene.tiles {
            if tile.color.alpha < FOG_CUTOFF {
                continue;
            }
            let centre = tile.position + tile_size / 2.0;
            if let Some((column, row)) = cell_of(centre.x, centre.y) {
                canvas[row][column] = tile.kind.glyph();
            }
        }
        if let Some((column, row)) = cell_of(scene.player.centre.x, scene.player.centre.y) {
            canvas[row][column] = '@';
        }

        if let Some(hud) = &scene.hud {
            write!(
                self.out,
                "level {} | sanity {:>3.0}% | stamina {:>3.0}%",
                hud.level, hud.sanity_percent, hud.stamina_percent
            )?;
            if hud.transitioning {
                write!(self.out, " | next level incoming")?;
            }
            writeln!(self.out)?;
            if let Some(death) = hud.death_screen {
                writeln!(
                    self.out,
                    "you lost your mind after {} steps (attempt {})",
                    death.distance, death.attempts
                )?;
            }
        }
        for row in &canvas {
            let line: String = row.iter().collect();
            writeln!(self.out, "{}", line.trim_end())?;
        }
        if let Some(message) = &scene.message {
            writeln!(self.out, "> {message}")?;
        }
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use sanity_maze_core::GameConfig;
    use sanity_maze_rendering::{HudPresentation, Scene, TilePalette};
    use sanity_maze_system_session::Session;

    use super::*;

    #[test]
    fn draws_player_hud_and_message() {
        let mut config = GameConfig::default();
        config.maze.base_width = 21;
        config.maze.base_height = 17;
        let tile_size = config.tile_size;
        let mut session = Session::new(config, Vec2::new(640.0, 448.0)).expect("valid config");
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut events = Vec::new();
        session.start(&mut rng, &mut events).expect("level one generates");

        let frame = session.visibility_frame().expect("level is active");
        let player = session.player().expect("level is active");
        let hud = session.hud().expect("level is active");
        let scene = Scene::compose(&frame, player, &TilePalette::default(), tile_size)
            .with_hud(HudPresentation::from_snapshot(&hud))
            .with_message(Some("hello"));
        let presentation = Presentation::new("Sanity Maze", Presentation::CLEAR_COLOR, scene);

        let mut text = Vec::new();
        AsciiBackend::new(&mut text)
            .present(&presentation)
            .expect("writing to memory succeeds");

        let text = String::from_utf8(text).expect("ascii output");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "level 1 | sanity 100% | stamina 100%");
        assert_eq!(lines[1 + 3].chars().nth(5), Some('@'));
        assert_eq!(text.matches('@').count(), 1);
        assert!(text.contains("> hello"));
    }
}
