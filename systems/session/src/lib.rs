#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Run orchestration for Sanity Maze.
//!
//! A [`Session`] owns the active maze and player, drives them one frame at a
//! time and sequences level progression: a reached exit starts a transition
//! during which the player is frozen, after which the next level is
//! generated. Running out of sanity ends the run exactly once.

mod autopilot;
mod shake;

use std::time::Duration;

use glam::Vec2;
use sanity_maze_core::{
    ConfigError, Event, GameConfig, InputState, RandomSource, RunStats, WELCOME_BANNER,
};
use sanity_maze_system_generation::{GenerationError, MazeGenerator};
use sanity_maze_system_movement::{Player, PlayerStatus};
use sanity_maze_system_visibility::{VisibilityFrame, VisibilityModel};
use sanity_maze_world::Maze;
use thiserror::Error;
use tracing::{debug, info, warn};

pub use autopilot::Autopilot;
pub use shake::ScreenShake;

/// Message shown when the player reaches an exit.
pub const COMPLETION_MESSAGE: &str = "You found the exit! Get ready for the next level...";

/// Stage of the run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Phase {
    /// No run has been started.
    Idle,
    /// The player is exploring the active level.
    Playing,
    /// The exit was reached and the next level is pending.
    Transitioning {
        /// Seconds until the next level is generated.
        remaining: f32,
    },
    /// Sanity ran out. Only a new run leaves this phase.
    GameOver,
}

/// Failures that stop a session from running.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum SessionError {
    /// The injected configuration was rejected.
    #[error("invalid configuration")]
    Config(#[from] ConfigError),
    /// A level could not be generated.
    #[error("failed to generate level {level}")]
    Generation {
        /// Level that was being generated.
        level: u32,
        /// Underlying generator failure.
        #[source]
        source: GenerationError,
    },
}

/// Values shown by the heads-up display.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HudSnapshot {
    /// Current level number.
    pub level: u32,
    /// Meter percentages.
    pub status: PlayerStatus,
    /// Statistics for the session so far.
    pub stats: RunStats,
    /// Stage of the run.
    pub phase: Phase,
}

#[derive(Clone, Debug)]
struct ActiveLevel {
    maze: Maze,
    player: Player,
}

/// Orchestrates a run: generation, per-frame updates and progression.
#[derive(Debug)]
pub struct Session {
    config: GameConfig,
    generator: MazeGenerator,
    visibility: VisibilityModel,
    phase: Phase,
    level: u32,
    active: Option<ActiveLevel>,
    stats: RunStats,
    shake: Option<ScreenShake>,
}

impl Session {
    /// Creates an idle session after validating `config`.
    pub fn new(config: GameConfig, viewport: Vec2) -> Result<Self, SessionError> {
        config.validate()?;
        Ok(Self {
            generator: MazeGenerator::new(&config),
            visibility: VisibilityModel::new(&config, viewport),
            config,
            phase: Phase::Idle,
            level: 0,
            active: None,
            stats: RunStats::default(),
            shake: None,
        })
    }

    /// Starts a new run at level one.
    ///
    /// Statistics other than the distance travelled in earlier runs are reset
    /// and the attempt counter is incremented.
    pub fn start<R>(&mut self, rng: &mut R, out: &mut Vec<Event>) -> Result<(), SessionError>
    where
        R: RandomSource + ?Sized,
    {
        self.start_at(1, rng, out)
    }

    /// Starts a new run directly at `level`.
    pub fn start_at<R>(
        &mut self,
        level: u32,
        rng: &mut R,
        out: &mut Vec<Event>,
    ) -> Result<(), SessionError>
    where
        R: RandomSource + ?Sized,
    {
        self.stats.attempts += 1;
        self.stats.levels_completed = 0;
        self.level = level;
        self.shake = None;

        self.load_level(rng, out)?;
        out.push(message(WELCOME_BANNER, self.config.session.welcome_duration));
        info!(attempt = self.stats.attempts, level, "run started");
        Ok(())
    }

    /// Advances the run by one frame.
    ///
    /// The frame delta is clamped to the configured maximum. While a level
    /// transition is pending the player receives no input and tiles are not
    /// interacted with. Nothing happens before [`Session::start`] or after
    /// the run is over.
    pub fn advance<R>(
        &mut self,
        frame: Duration,
        input: InputState,
        rng: &mut R,
        out: &mut Vec<Event>,
    ) -> Result<(), SessionError>
    where
        R: RandomSource + ?Sized,
    {
        let dt = frame
            .as_secs_f32()
            .min(self.config.session.max_frame_delta);
        let transitioning = match self.phase {
            Phase::Playing => false,
            Phase::Transitioning { .. } => true,
            Phase::Idle | Phase::GameOver => return Ok(()),
        };
        let Some(active) = self.active.as_mut() else {
            return Ok(());
        };

        let mut completed = false;
        let mut collected = false;
        if transitioning {
            active.player.update(dt, InputState::IDLE, &active.maze);
        } else {
            active.player.update(dt, input, &active.maze);
            let first = out.len();
            active.player.check_interactions(&mut active.maze, out);
            for event in &out[first..] {
                match event {
                    Event::LevelCompleted { .. } => completed = true,
                    Event::ItemCollected { .. } => collected = true,
                    _ => {}
                }
            }
        }
        let insane = active.player.is_insane();
        let distance = active.player.distance_traveled();

        self.visibility.advance(dt, rng);
        if let Some(shake) = self.shake.as_mut() {
            shake.advance(dt);
        }

        if collected {
            self.shake = Some(ScreenShake::new(
                self.config.session.pickup_shake_intensity,
                self.config.session.pickup_shake_duration,
            ));
        }
        if completed {
            self.begin_transition(out);
        }
        if insane {
            self.end_run(distance, out);
            return Ok(());
        }

        if let (true, Phase::Transitioning { remaining }) = (transitioning, self.phase) {
            let remaining = remaining - dt;
            if remaining <= 0.0 {
                self.load_level(rng, out)?;
            } else {
                self.phase = Phase::Transitioning { remaining };
            }
        }
        Ok(())
    }

    /// Computes what should be drawn for the current frame.
    ///
    /// Returns `None` until a level has been generated.
    pub fn visibility_frame(&mut self) -> Option<VisibilityFrame> {
        let active = self.active.as_ref()?;
        Some(self.visibility.frame(&active.maze, &active.player))
    }

    /// Values for the heads-up display, once a level exists.
    #[must_use]
    pub fn hud(&self) -> Option<HudSnapshot> {
        let active = self.active.as_ref()?;
        Some(HudSnapshot {
            level: self.level,
            status: active.player.status(),
            stats: self.stats,
            phase: self.phase,
        })
    }

    /// Resizes the viewport used by the visibility model.
    pub fn resize(&mut self, viewport: Vec2) {
        self.visibility.resize(viewport);
    }

    /// Stage of the run.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Level number shown to the player.
    ///
    /// Increments as soon as an exit is reached, before the next maze exists.
    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    /// Statistics accumulated by the session.
    #[must_use]
    pub const fn stats(&self) -> RunStats {
        self.stats
    }

    /// Injected configuration.
    #[must_use]
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Active maze.
    #[must_use]
    pub fn maze(&self) -> Option<&Maze> {
        self.active.as_ref().map(|active| &active.maze)
    }

    /// Active player.
    #[must_use]
    pub fn player(&self) -> Option<&Player> {
        self.active.as_ref().map(|active| &active.player)
    }

    /// Screen shake still running, if any.
    #[must_use]
    pub fn screen_shake(&self) -> Option<&ScreenShake> {
        self.shake.as_ref().filter(|shake| shake.is_active())
    }

    /// Visibility model, for toggling effects.
    pub fn visibility_mut(&mut self) -> &mut VisibilityModel {
        &mut self.visibility
    }

    fn load_level<R>(&mut self, rng: &mut R, out: &mut Vec<Event>) -> Result<(), SessionError>
    where
        R: RandomSource + ?Sized,
    {
        let level = self.level;
        let maze = match self.generator.generate(level, rng) {
            Ok(maze) => maze,
            Err(source) => {
                warn!(level, error = %source, "level generation failed");
                self.phase = Phase::Idle;
                self.active = None;
                return Err(SessionError::Generation { level, source });
            }
        };

        info!(
            level,
            width = maze.width(),
            height = maze.height(),
            "level started"
        );
        let player = Player::spawn(&maze, &self.config);
        self.active = Some(ActiveLevel { maze, player });
        self.phase = Phase::Playing;

        out.push(Event::LevelStarted { level });
        out.push(message(
            format!("Level {level}"),
            self.config.session.announcement_duration,
        ));
        Ok(())
    }

    fn begin_transition(&mut self, out: &mut Vec<Event>) {
        self.stats.levels_completed += 1;
        info!(
            level = self.level,
            completed = self.stats.levels_completed,
            "level completed"
        );
        self.level += 1;
        self.phase = Phase::Transitioning {
            remaining: self.config.session.transition_delay,
        };
        self.shake = Some(ScreenShake::new(
            self.config.session.shake_intensity,
            self.config.session.shake_duration,
        ));
        out.push(message(
            COMPLETION_MESSAGE,
            self.config.session.announcement_duration,
        ));
        debug!(
            next = self.level,
            delay = self.config.session.transition_delay,
            "transition scheduled"
        );
    }

    fn end_run(&mut self, distance: f32, out: &mut Vec<Event>) {
        self.stats.total_distance += distance;
        self.phase = Phase::GameOver;
        info!(
            attempts = self.stats.attempts,
            distance = self.stats.total_distance,
            levels = self.stats.levels_completed,
            "game over"
        );
        out.push(Event::GameOver { stats: self.stats });
    }
}

fn message(text: impl Into<String>, seconds: f32) -> Event {
    Event::Message {
        text: text.into(),
        duration: Duration::try_from_secs_f32(seconds).unwrap_or_default(),
    }
}
