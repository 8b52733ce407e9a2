use glam::{IVec2, Vec2};
use pretty_assertions::assert_eq;
use pursuit::entity::ghost::Mode;
use pursuit::error::{GameError, SaveError};
use pursuit::game::save::SaveState;
use pursuit::game::{Phase, World};
use pursuit::map::grid::{CellKind, FruitKind};
use speculoos::prelude::*;

mod common;

fn restore(save: SaveState) -> Result<World, GameError> {
    World::from_save(common::default_grid(), common::seeded_config(), save, common::rng())
}

#[test]
fn test_frightened_pursuer_restored_with_countdown() {
    let world = common::default_world();
    let mut save = world.to_save();
    save.pursuers[1].mode = 2;
    save.pursuers[1].frighten_countdown = 45;

    let restored = restore(save).unwrap();
    let pursuer = restored.pursuer(1).unwrap();
    assert_eq!(pursuer.mode(), Mode::Frightened);
    assert_eq!(pursuer.frighten_countdown(), 45);
}

#[test]
fn test_restored_world_matches_saved_state() {
    let mut world = common::default_world();
    common::finish_countdown(&mut world);
    for _ in 0..20 {
        world.tick().unwrap();
    }

    let save = world.to_save();
    let json = save.to_json().unwrap();
    let restored = restore(SaveState::from_json(&json).unwrap()).unwrap();

    assert_eq!(restored.to_save(), save);
    assert_eq!(restored.grid(), world.grid());
    assert_eq!(restored.player().position(), world.player().position());
    assert!(matches!(
        restored.phase(),
        Phase::Countdown {
            release_leader: false,
            ..
        }
    ));
}

#[test]
fn test_unknown_mode_is_corrupt() {
    let mut save = common::default_world().to_save();
    save.pursuers[2].mode = 7;

    let result = restore(save);
    assert!(matches!(result, Err(GameError::Save(SaveError::CorruptSaveState(_)))));
}

#[test]
fn test_wrong_pursuer_count_is_corrupt() {
    let mut save = common::default_world().to_save();
    save.pursuers.pop();

    assert!(matches!(restore(save), Err(GameError::Save(SaveError::CorruptSaveState(_)))));
}

#[test]
fn test_off_grid_position_is_corrupt() {
    let mut save = common::default_world().to_save();
    save.player.position = Vec2::new(-500.0, 12.0);

    assert!(matches!(restore(save), Err(GameError::Save(SaveError::CorruptSaveState(_)))));
}

#[test]
fn test_grid_mismatch_is_corrupt() {
    let mut save = common::default_world().to_save();
    // Turn a wall into a pellet
    save.grid[0][0] = CellKind::Pellet { eaten: false };

    assert!(matches!(restore(save), Err(GameError::Save(SaveError::CorruptSaveState(_)))));
}

#[test]
fn test_fruit_restored_in_socket() {
    let world = common::default_world();
    let mut save = world.to_save();
    let socket = world.grid().fruit_socket();
    save.grid[socket.y as usize][socket.x as usize] = CellKind::Fruit {
        fruit: FruitKind::Apple,
        remaining_ticks: 12,
    };

    let restored = restore(save).unwrap();
    assert_eq!(restored.grid().fruit(), Some((FruitKind::Apple, 12)));
}

#[test]
fn test_eaten_pellets_survive_restore() {
    let world = common::default_world();
    let mut save = world.to_save();
    save.grid[1][1] = CellKind::Pellet { eaten: true };
    save.score = 10;

    let restored = restore(save).unwrap();
    assert_eq!(restored.grid().classify(IVec2::new(1, 1)).unwrap(), CellKind::Pellet { eaten: true });
    assert_eq!(restored.grid().pellets_eaten(), 1);
    assert_eq!(restored.score(), 10);
}

#[test]
fn test_restore_or_new_falls_back_on_garbage() {
    let world = World::restore_or_new(common::default_grid(), common::seeded_config(), "{not json").unwrap();
    assert_eq!(world.level(), 0);
    assert_eq!(world.score(), 0);
    assert_that(&world.grid().pellets_eaten()).is_equal_to(0);
}

#[test]
fn test_restore_or_new_uses_valid_save() {
    let mut save = common::default_world().to_save();
    save.level = 2;
    save.score = 1234;
    let json = save.to_json().unwrap();

    let world = World::restore_or_new(common::default_grid(), common::seeded_config(), &json).unwrap();
    assert_eq!(world.level(), 2);
    assert_eq!(world.score(), 1234);
    assert_eq!(world.speed(), 4.0);
}

#[test]
fn test_save_during_countdown_still_releases_leader() {
    let world = common::default_world();
    let mut restored = restore(world.to_save()).unwrap();
    assert!(matches!(
        restored.phase(),
        Phase::Countdown {
            release_leader: true,
            ..
        }
    ));

    common::finish_countdown(&mut restored);
    assert_eq!(restored.pursuer(0).unwrap().mode(), Mode::Chasing);
}
