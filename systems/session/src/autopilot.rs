use glam::Vec2;
use sanity_maze_core::{InputState, TileCoord};
use sanity_maze_system_movement::Player;
use sanity_maze_world::{query, Maze, ReachabilityField};

/// Scripted driver that walks the player down the distance gradient to the exit.
///
/// Used by headless simulations and tests. The field is rebuilt whenever the
/// level or its exit changes; call [`Autopilot::reset`] after restarting a run.
#[derive(Clone, Debug)]
pub struct Autopilot {
    field: ReachabilityField,
    built_for: Option<(u32, TileCoord)>,
    tolerance: f32,
}

impl Autopilot {
    /// Creates an autopilot that stops steering along an axis once the
    /// player centre is within `tolerance` pixels of the next waypoint.
    #[must_use]
    pub fn new(tolerance: f32) -> Self {
        Self {
            field: ReachabilityField::default(),
            built_for: None,
            tolerance: tolerance.max(0.0),
        }
    }

    /// Forgets the cached distance field.
    pub fn reset(&mut self) {
        self.built_for = None;
    }

    /// Keys to hold this frame.
    ///
    /// Returns [`InputState::IDLE`] when the player stands on a tile from
    /// which the exit cannot be reached.
    pub fn steer(&mut self, maze: &Maze, player: &Player, tile_size: f32) -> InputState {
        let key = (maze.level(), maze.exit());
        if self.built_for != Some(key) {
            self.field = query::distance_to_exit(maze);
            self.built_for = Some(key);
        }

        let Some(waypoint) = self.next_waypoint(player.tile()) else {
            return InputState::IDLE;
        };
        let delta = waypoint.center(tile_size) - player.position();
        self.keys_towards(delta)
    }

    fn next_waypoint(&self, tile: TileCoord) -> Option<TileCoord> {
        let current = self.field.distance(tile)?;
        if current == 0 {
            return Some(tile);
        }
        tile.neighbors()
            .into_iter()
            .filter_map(|neighbor| Some((neighbor, self.field.distance(neighbor)?)))
            .filter(|(_, distance)| *distance < current)
            .min_by_key(|(_, distance)| *distance)
            .map(|(neighbor, _)| neighbor)
    }

    fn keys_towards(&self, delta: Vec2) -> InputState {
        InputState {
            up: delta.y < -self.tolerance,
            down: delta.y > self.tolerance,
            left: delta.x < -self.tolerance,
            right: delta.x > self.tolerance,
            sprint: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use sanity_maze_core::GameConfig;
    use sanity_maze_world::Grid;

    use super::*;

    fn corridor() -> Maze {
        let config = GameConfig::default();
        Maze::new(
            1,
            Grid::from_rows(&["#####", "#...#", "###.#", "###E#", "#####"]),
            TileCoord::new(1, 1).center(config.tile_size),
            TileCoord::new(3, 3),
            Vec::new(),
            Vec::new(),
        )
    }

    #[test]
    fn steers_along_corridor_then_turns() {
        let config = GameConfig::default();
        let maze = corridor();
        let mut autopilot = Autopilot::new(6.4);

        let player = Player::spawn(&maze, &config);
        let input = autopilot.steer(&maze, &player, config.tile_size);
        assert!(input.right && !input.up && !input.down && !input.left);

        let corner = Player::new(TileCoord::new(3, 1).center(config.tile_size), &config);
        let input = autopilot.steer(&maze, &corner, config.tile_size);
        assert!(input.down && !input.left && !input.right);
    }

    #[test]
    fn idles_when_exit_unreachable() {
        let config = GameConfig::default();
        let maze = corridor();
        let mut autopilot = Autopilot::new(6.4);
        let walled = Player::new(TileCoord::new(0, 0).center(config.tile_size), &config);

        assert_eq!(
            autopilot.steer(&maze, &walled, config.tile_size),
            InputState::IDLE
        );
    }
}
