use std::io::Write;

use anyhow::Result;
use sanity_maze_core::{Event, RunStats, TileCoord};
use sanity_maze_system_session::{Phase, Session};
use sanity_maze_world::{query, Maze};
use serde::Serialize;

/// Printable description of a generated level.
#[derive(Debug, Serialize)]
pub(crate) struct MazeReport {
    pub(crate) seed: u64,
    pub(crate) level: u32,
    pub(crate) strategy: &'static str,
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) start: TileCoord,
    pub(crate) exit: TileCoord,
    pub(crate) items: Vec<TileCoord>,
    pub(crate) clues: Vec<TileCoord>,
    pub(crate) exit_distance: Option<u32>,
    pub(crate) rows: Vec<String>,
}

impl MazeReport {
    pub(crate) fn new(maze: &Maze, strategy: &'static str, seed: u64, tile_size: f32) -> Self {
        let start = query::start_tile(maze, tile_size);
        Self {
            seed,
            level: maze.level(),
            strategy,
            width: maze.width(),
            height: maze.height(),
            start,
            exit: maze.exit(),
            items: maze.items().to_vec(),
            clues: maze.clues().to_vec(),
            exit_distance: query::distance_to_exit(maze).distance(start),
            rows: maze.grid().to_rows(),
        }
    }

    /// Writes the level as text with the spawn tile drawn as `@`.
    pub(crate) fn write_ascii<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(
            out,
            "level {} ({}) {}x{} seed {}",
            self.level, self.strategy, self.width, self.height, self.seed
        )?;
        for (y, row) in self.rows.iter().enumerate() {
            let line: String = row
                .chars()
                .enumerate()
                .map(|(x, glyph)| {
                    if TileCoord::new(x as i32, y as i32) == self.start {
                        '@'
                    } else {
                        glyph
                    }
                })
                .collect();
            writeln!(out, "{line}")?;
        }
        match self.exit_distance {
            Some(steps) => writeln!(
                out,
                "items {} clues {} exit {} steps away",
                self.items.len(),
                self.clues.len(),
                steps
            )?,
            None => writeln!(
                out,
                "items {} clues {} exit unreachable",
                self.items.len(),
                self.clues.len()
            )?,
        }
        Ok(())
    }
}

/// One event observed during a simulation.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub(crate) struct EventRecord {
    pub(crate) frame: u32,
    pub(crate) kind: &'static str,
    pub(crate) detail: String,
}

impl EventRecord {
    pub(crate) fn new(frame: u32, event: &Event) -> Self {
        let (kind, detail) = match event {
            Event::LevelStarted { level } => ("level-started", level.to_string()),
            Event::LevelCompleted { level } => ("level-completed", level.to_string()),
            Event::Message { text, .. } => ("message", text.clone()),
            Event::ItemCollected { tile, sanity } => (
                "item",
                format!("({}, {}) sanity {sanity:.1}", tile.x(), tile.y()),
            ),
            Event::ClueRevealed { tile, hint } => (
                "clue",
                format!("({}, {}) {}", tile.x(), tile.y(), hint.message()),
            ),
            Event::GameOver { stats } => (
                "game-over",
                format!(
                    "attempts {} distance {:.0}",
                    stats.attempts, stats.total_distance
                ),
            ),
        };
        Self {
            frame,
            kind,
            detail,
        }
    }
}

/// Outcome of a headless run.
#[derive(Debug, Serialize)]
pub(crate) struct SimulationReport {
    pub(crate) seed: u64,
    pub(crate) start_level: u32,
    pub(crate) frames: u32,
    pub(crate) level: u32,
    pub(crate) phase: &'static str,
    pub(crate) stats: RunStats,
    pub(crate) sanity_percent: Option<f32>,
    pub(crate) stamina_percent: Option<f32>,
    pub(crate) events: Vec<EventRecord>,
}

impl SimulationReport {
    pub(crate) fn new(
        seed: u64,
        start_level: u32,
        frames: u32,
        session: &Session,
        events: Vec<EventRecord>,
    ) -> Self {
        let hud = session.hud();
        Self {
            seed,
            start_level,
            frames,
            level: session.level(),
            phase: phase_name(session.phase()),
            stats: session.stats(),
            sanity_percent: hud.map(|hud| hud.status.sanity_percent),
            stamina_percent: hud.map(|hud| hud.status.stamina_percent),
            events,
        }
    }

    pub(crate) fn write_text<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(out, "seed {} from level {}", self.seed, self.start_level)?;
        writeln!(
            out,
            "ran {} frames, now on level {} ({})",
            self.frames, self.level, self.phase
        )?;
        writeln!(
            out,
            "levels completed {} distance {:.1}",
            self.stats.levels_completed, self.stats.total_distance
        )?;
        if let (Some(sanity), Some(stamina)) = (self.sanity_percent, self.stamina_percent) {
            writeln!(out, "sanity {sanity:.0}% stamina {stamina:.0}%")?;
        }
        for record in &self.events {
            writeln!(out, "[{:>6}] {:<16} {}", record.frame, record.kind, record.detail)?;
        }
        Ok(())
    }
}

const fn phase_name(phase: Phase) -> &'static str {
    match phase {
        Phase::Idle => "idle",
        Phase::Playing => "playing",
        Phase::Transitioning { .. } => "transitioning",
        Phase::GameOver => "game-over",
    }
}

#[cfg(test)]
mod tests {
    use sanity_maze_core::ClueHint;
    use sanity_maze_world::Grid;

    use super::*;

    #[test]
    fn ascii_marks_spawn_and_reports_distance() {
        let maze = Maze::new(
            3,
            Grid::from_rows(&["#####", "#..E#", "#####"]),
            TileCoord::new(1, 1).center(64.0),
            TileCoord::new(3, 1),
            Vec::new(),
            Vec::new(),
        );
        let report = MazeReport::new(&maze, "backtracking", 7, 64.0);
        let mut text = Vec::new();

        report.write_ascii(&mut text).expect("writing to memory succeeds");

        let text = String::from_utf8(text).expect("ascii output");
        assert!(text.starts_with("level 3 (backtracking) 5x3 seed 7\n"));
        assert!(text.contains("#@.E#"));
        assert!(text.ends_with("items 0 clues 0 exit 2 steps away\n"));
    }

    #[test]
    fn clue_records_carry_hint_text() {
        let record = EventRecord::new(
            12,
            &Event::ClueRevealed {
                tile: TileCoord::new(4, 2),
                hint: ClueHint::Far,
            },
        );

        assert_eq!(record.kind, "clue");
        assert!(record.detail.starts_with("(4, 2) A faint marking"));
    }
}
