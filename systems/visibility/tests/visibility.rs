use glam::Vec2;
use sanity_maze_core::{GameConfig, RandomSource, TileCoord, TileKind};
use sanity_maze_system_movement::Player;
use sanity_maze_system_visibility::VisibilityModel;
use sanity_maze_world::{Grid, Maze};

struct Fixed(f64);

impl RandomSource for Fixed {
    fn next_unit(&mut self) -> f64 {
        self.0
    }
}

fn chamber(config: &GameConfig) -> Maze {
    Maze::new(
        1,
        Grid::from_rows(&[
            "#######", //
            "#..*. #", //
            "#.....#", //
            "#?...E#", //
            "#######",
        ]),
        TileCoord::new(1, 2).center(config.tile_size),
        TileCoord::new(5, 3),
        vec![TileCoord::new(3, 1)],
        vec![TileCoord::new(1, 3)],
    )
}

fn viewport() -> Vec2 {
    Vec2::new(640.0, 480.0)
}

#[test]
fn frame_lists_rendered_tiles_in_row_major_order() {
    let config = GameConfig::default();
    let maze = chamber(&config);
    let player = Player::spawn(&maze, &config);
    let mut model = VisibilityModel::new(&config, viewport());

    let frame = model.frame(&maze, &player);

    assert_eq!(frame.tiles.len(), 34);
    assert!(frame.tiles.iter().all(|tile| tile.kind != TileKind::Empty));
    assert_eq!(frame.tiles[0].tile, TileCoord::new(0, 0));
    assert!(frame
        .tiles
        .windows(2)
        .all(|pair| (pair[0].tile.y(), pair[0].tile.x()) < (pair[1].tile.y(), pair[1].tile.x())));
    assert!(frame
        .tiles
        .iter()
        .all(|tile| (0.0..=1.0).contains(&tile.alpha)));
}

#[test]
fn nearby_tiles_are_clear_and_distant_tiles_fade() {
    let config = GameConfig::default();
    let maze = chamber(&config);
    let player = Player::spawn(&maze, &config);
    let mut model = VisibilityModel::new(&config, viewport());

    let frame = model.frame(&maze, &player);
    let alpha_of = |x, y| {
        frame
            .tiles
            .iter()
            .find(|tile| tile.tile == TileCoord::new(x, y))
            .map(|tile| tile.alpha)
    };

    assert_eq!(alpha_of(1, 2), Some(1.0));
    assert_eq!(alpha_of(2, 2), Some(1.0));
    let far = alpha_of(6, 4).expect("corner wall is visible");
    assert!(far > 0.0 && far < 1.0, "far alpha was {far}");
}

#[test]
fn low_sanity_dims_to_floor_brightness() {
    let config = GameConfig::default();
    let maze = chamber(&config);
    let player = Player::spawn(&maze, &config).with_sanity(10.0);
    let mut model = VisibilityModel::new(&config, viewport());

    let frame = model.frame(&maze, &player);
    let own = frame
        .tiles
        .iter()
        .find(|tile| tile.tile == TileCoord::new(1, 2))
        .map(|tile| tile.alpha);

    assert_eq!(own, Some(0.5));
    assert!(frame.post.aberration.is_some());
}

#[test]
fn flicker_only_changes_item_tiles() {
    let config = GameConfig::default();
    let maze = chamber(&config);
    let player = Player::spawn(&maze, &config);
    let mut model = VisibilityModel::new(&config, viewport());
    model.advance(0.2, &mut Fixed(0.0));

    let tile = TileCoord::new(3, 1);
    let floor = model.tile_alpha(tile, TileKind::Floor, player.position(), 100.0, 100.0);
    let item = model.tile_alpha(tile, TileKind::Item, player.position(), 100.0, 100.0);
    assert_eq!(floor, 1.0);
    assert!((item - 0.8).abs() < 1e-6);

    model.advance(0.2, &mut Fixed(0.999));
    let bright = model.tile_alpha(tile, TileKind::Item, player.position(), 100.0, 100.0);
    assert_eq!(bright, 1.0);
}

#[test]
fn distortion_shifts_tiles_only_while_enabled() {
    let config = GameConfig::default();
    let maze = chamber(&config);
    let player = Player::spawn(&maze, &config);
    let mut model = VisibilityModel::new(&config, viewport());
    model.advance(0.05, &mut Fixed(0.5));

    let amplitude = config.visibility.distortion_intensity * config.tile_size;
    let wobbly = model.frame(&maze, &player);
    for tile in &wobbly.tiles {
        let straight = tile.tile.origin(config.tile_size) - wobbly.camera_offset;
        let shift = tile.screen - straight;
        assert!(shift.x.abs() <= amplitude + 1e-4);
        assert!(shift.y.abs() <= amplitude + 1e-4);
    }

    model.distortion_mut().set_enabled(false);
    let steady = model.frame(&maze, &player);
    for tile in &steady.tiles {
        assert_eq!(
            tile.screen,
            tile.tile.origin(config.tile_size) - steady.camera_offset
        );
    }
}
