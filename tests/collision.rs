use glam::IVec2;
use pretty_assertions::assert_eq;
use pursuit::entity::ghost::Mode;
use pursuit::entity::player::Player;
use pursuit::events::GameEvent;
use pursuit::game::collision::resolve;
use pursuit::map::direction::Direction;
use speculoos::prelude::*;

mod common;

#[test]
fn test_three_captures_double_the_award() {
    let grid = common::open_grid();
    let mut player = Player::new(&grid, 3.0, 3);
    let cell = grid.player_start();
    let mut pursuers: Vec<_> = (0..3)
        .map(|id| common::pursuer_at(&grid, id, cell, Direction::Left, Mode::Frightened))
        .collect();
    let mut captures = 0;

    let events = resolve(&grid, &mut player, &mut pursuers, &mut captures).unwrap();

    assert_eq!(
        events,
        vec![
            GameEvent::PursuerCaptured { id: 0, award: 200 },
            GameEvent::PursuerCaptured { id: 1, award: 400 },
            GameEvent::PursuerCaptured { id: 2, award: 800 },
        ]
    );
    assert_eq!(captures, 3);
    assert!(pursuers.iter().all(|pursuer| pursuer.mode() == Mode::Returning));
    assert_that(&player.is_alive()).is_true();
}

#[test]
fn test_capture_chain_continues_across_calls() {
    let grid = common::open_grid();
    let mut player = Player::new(&grid, 3.0, 3);
    let mut pursuers = vec![common::pursuer_at(&grid, 3, grid.player_start(), Direction::Up, Mode::Frightened)];
    let mut captures = 3;

    let events = resolve(&grid, &mut player, &mut pursuers, &mut captures).unwrap();
    assert_eq!(events, vec![GameEvent::PursuerCaptured { id: 3, award: 1600 }]);
}

#[test]
fn test_chasing_pursuer_catches_player_once() {
    let grid = common::open_grid();
    let mut player = Player::new(&grid, 3.0, 3);
    let cell = grid.player_start();
    let mut pursuers = vec![
        common::pursuer_at(&grid, 0, cell, Direction::Left, Mode::Chasing),
        common::pursuer_at(&grid, 1, cell, Direction::Right, Mode::Chasing),
    ];
    let mut captures = 0;

    let events = resolve(&grid, &mut player, &mut pursuers, &mut captures).unwrap();

    assert_eq!(events, vec![GameEvent::PlayerCaught { by: 0 }]);
    assert_eq!(player.lives(), 2);
    assert_that(&player.is_alive()).is_false();
}

#[test]
fn test_caged_and_returning_pass_through() {
    let grid = common::open_grid();
    let mut player = Player::new(&grid, 3.0, 3);
    let cell = grid.player_start();
    let mut returning = common::pursuer_at(&grid, 1, cell, Direction::Left, Mode::Frightened);
    returning.capture().unwrap();
    let mut pursuers = vec![common::pursuer_at(&grid, 0, cell, Direction::Left, Mode::Caged), returning];
    let mut captures = 0;

    let events = resolve(&grid, &mut player, &mut pursuers, &mut captures).unwrap();

    assert_that(&events).is_empty();
    assert_that(&player.is_alive()).is_true();
    assert_eq!(captures, 0);
}

#[test]
fn test_different_cells_do_not_collide() {
    let grid = common::open_grid();
    let mut player = Player::new(&grid, 3.0, 3);
    let next_door = grid.player_start() + IVec2::X;
    let mut pursuers = vec![common::pursuer_at(&grid, 0, next_door, Direction::Left, Mode::Chasing)];
    let mut captures = 0;

    let events = resolve(&grid, &mut player, &mut pursuers, &mut captures).unwrap();
    assert_that(&events).is_empty();
}
