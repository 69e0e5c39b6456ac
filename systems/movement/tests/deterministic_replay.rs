use sanity_maze_core::{ClueHint, Event, GameConfig, InputState, TileCoord, TileKind};
use sanity_maze_system_movement::Player;
use sanity_maze_world::{Grid, Maze};

const FRAME: f32 = 1.0 / 30.0;

#[test]
fn deterministic_replay_produces_identical_traces() {
    let first = replay(scripted_inputs());
    let second = replay(scripted_inputs());

    assert_eq!(first, second, "replay diverged between runs");
}

#[test]
fn scripted_walk_collects_features_in_order() {
    let outcome = replay(scripted_inputs());

    let kinds: Vec<&str> = outcome
        .events
        .iter()
        .map(|record| record.kind.as_str())
        .collect();
    assert_eq!(
        kinds,
        vec!["item", "message", "clue", "message", "level-completed"]
    );
    assert_eq!(outcome.events[0].frame, 1);
    assert_eq!(outcome.events[2].hint, Some(ClueHint::VeryClose));
    assert_eq!(outcome.final_tile, TileCoord::new(13, 1));
    assert_eq!(outcome.remaining, (0, 0));
}

fn scripted_inputs() -> Vec<InputState> {
    let right = InputState {
        right: true,
        ..InputState::IDLE
    };
    let mut inputs = vec![right; 60];
    inputs.extend([InputState::IDLE; 10]);
    inputs
}

fn replay(inputs: Vec<InputState>) -> ReplayOutcome {
    let config = GameConfig::default();
    let grid = Grid::from_rows(&[
        "###############", //
        "#.*.......?..E#", //
        "###############",
    ]);
    let mut maze = Maze::new(
        1,
        grid,
        TileCoord::new(1, 1).center(config.tile_size),
        TileCoord::new(13, 1),
        vec![TileCoord::new(2, 1)],
        vec![TileCoord::new(10, 1)],
    );
    let mut player = Player::spawn(&maze, &config);
    let mut events = Vec::new();
    let mut log = Vec::new();
    let mut positions = Vec::new();

    for (frame, input) in inputs.into_iter().enumerate() {
        player.update(FRAME, input, &maze);
        player.check_interactions(&mut maze, &mut events);
        for event in events.drain(..) {
            log.push(EventRecord::new(frame, &event));
        }
        positions.push((player.position().x.to_bits(), player.position().y.to_bits()));
    }

    ReplayOutcome {
        events: log,
        positions,
        final_tile: player.tile(),
        sanity: player.sanity().to_bits(),
        remaining: (
            maze.grid().count(TileKind::Item),
            maze.grid().count(TileKind::Clue),
        ),
    }
}

#[derive(Debug, PartialEq)]
struct ReplayOutcome {
    events: Vec<EventRecord>,
    positions: Vec<(u32, u32)>,
    final_tile: TileCoord,
    sanity: u32,
    remaining: (usize, usize),
}

#[derive(Debug, PartialEq)]
struct EventRecord {
    frame: usize,
    kind: String,
    hint: Option<ClueHint>,
}

impl EventRecord {
    fn new(frame: usize, event: &Event) -> Self {
        let (kind, hint) = match event {
            Event::ItemCollected { .. } => ("item", None),
            Event::ClueRevealed { hint, .. } => ("clue", Some(*hint)),
            Event::Message { .. } => ("message", None),
            Event::LevelCompleted { .. } => ("level-completed", None),
            Event::LevelStarted { .. } => ("level-started", None),
            Event::GameOver { .. } => ("game-over", None),
        };
        Self {
            frame,
            kind: kind.to_owned(),
            hint,
        }
    }
}
