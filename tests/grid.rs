use glam::{IVec2, Vec2};
use pretty_assertions::assert_eq;
use pursuit::constants::{BOARD_CELL_SIZE, CELL_SIZE, RAW_BOARD};
use pursuit::error::{GameError, MapError, ParseError};
use pursuit::map::grid::{CellKind, Grid, Pickup};
use speculoos::prelude::*;

mod common;

#[test]
fn test_default_board_dimensions() {
    let grid = common::default_grid();
    assert_eq!(grid.width(), BOARD_CELL_SIZE.x);
    assert_eq!(grid.height(), BOARD_CELL_SIZE.y);
    assert_that(&grid.pellets_remaining()).is_greater_than(170);
}

#[test]
fn test_cell_position_round_trip() {
    let grid = common::default_grid();
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            let cell = IVec2::new(x, y);
            assert_eq!(grid.to_cell(grid.to_position(cell)), cell);
        }
    }
}

#[test]
fn test_to_cell_floors_towards_negative() {
    let grid = common::default_grid();
    let origin_center = grid.to_position(IVec2::ZERO);

    // Half a cell left of the first column's center is the edge; anything past it is column -1
    assert_eq!(grid.to_cell(origin_center - Vec2::new(CELL_SIZE / 2.0 + 0.5, 0.0)), IVec2::new(-1, 0));
    assert_that(&grid.contains(IVec2::new(-1, 0))).is_false();
}

#[test]
fn test_neighbors_symmetric_for_open_cells() {
    let grid = common::default_grid();
    let interior = |cell: IVec2| cell.x > 0 && cell.x < grid.width() - 1;

    for (cell, kind) in grid.cells() {
        if kind.is_wall() || !interior(cell) {
            continue;
        }

        for neighbor in grid.neighbors(cell, false).unwrap() {
            if !interior(neighbor) {
                continue;
            }
            let back = grid.neighbors(neighbor, false).unwrap();
            assert!(back.contains(&cell), "{neighbor} does not lead back to {cell}");
        }
    }
}

#[test]
fn test_neighbor_order_is_down_right_up_left() {
    let grid = common::open_grid();
    let neighbors = grid.neighbors(IVec2::new(5, 5), false).unwrap();
    assert_eq!(
        neighbors.as_slice(),
        &[IVec2::new(5, 6), IVec2::new(6, 5), IVec2::new(5, 4), IVec2::new(4, 5)]
    );
}

#[test]
fn test_tunnel_seams_wrap_both_ways() {
    let grid = common::default_grid();
    let row = 13;

    let from_left = grid.neighbors(IVec2::new(0, row), false).unwrap();
    assert_eq!(from_left.as_slice(), &[IVec2::new(grid.width() - 1, row)]);

    let from_right = grid.neighbors(IVec2::new(grid.width() - 1, row), false).unwrap();
    assert_eq!(from_right.as_slice(), &[IVec2::new(0, row)]);
}

#[test]
fn test_pen_entrance_only_for_reentry() {
    let grid = common::default_grid();
    let exit = grid.pen_exit();

    assert_that(&grid.neighbors(exit, false).unwrap().contains(&grid.pen_entrance())).is_false();
    assert_that(&grid.neighbors(exit, true).unwrap().contains(&grid.pen_entrance())).is_true();
}

#[test]
fn test_neighbors_out_of_bounds() {
    let grid = common::default_grid();
    let result = grid.neighbors(IVec2::new(3, -1), false);
    assert_eq!(result.unwrap_err(), MapError::OutOfBounds(IVec2::new(3, -1)));
}

#[test]
fn test_consume_updates_counts() {
    let mut grid = common::default_grid();
    let remaining = grid.pellets_remaining();

    assert_eq!(grid.consume(IVec2::new(1, 1)).unwrap(), Some(Pickup::Pellet));
    assert_eq!(grid.consume(IVec2::new(1, 1)).unwrap(), None);
    assert_eq!(grid.pellets_eaten(), 1);
    assert_eq!(grid.pellets_remaining(), remaining - 1);

    // Power pellets do not count towards the pellet total
    assert_eq!(grid.consume(IVec2::new(1, 2)).unwrap(), Some(Pickup::PowerPellet));
    assert_eq!(grid.pellets_eaten(), 1);
    assert_eq!(grid.classify(IVec2::new(1, 2)).unwrap(), CellKind::PowerPellet { eaten: true });
}

#[test]
fn test_grid_rejects_bad_board() {
    let mut board = RAW_BOARD;
    board[11] = "___#.# ####### #.#___";

    let result = Grid::new(&board);
    assert!(matches!(
        result,
        Err(GameError::MapParse(ParseError::InvalidHouseDoorCount(0)))
    ));
}

#[test]
fn test_grid_rejects_blocked_pen_exit() {
    let mut board = RAW_BOARD;
    board[10] = "___#.#    #    #.#___";

    let result = Grid::new(&board);
    assert!(matches!(result, Err(GameError::MapParse(ParseError::InvalidPen(_)))));
}
