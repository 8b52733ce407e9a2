//! The static cell grid that every entity moves across.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use strum_macros::{AsRefStr, EnumIter, FromRepr};
use tracing::debug;

use crate::constants::{BOARD_ORIGIN, CELL_SIZE};
use crate::error::{GameResult, MapError};
use crate::map::direction::Direction;
use crate::map::parser::{MapTileParser, ParsedMap};

/// The bonus fruits that can appear in the fruit socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, EnumIter, FromRepr, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum FruitKind {
    Cherry,
    Banana,
    Strawberry,
    Apple,
    Key,
}

impl FruitKind {
    /// The fruit offered on a given level; the sequence repeats every five levels.
    pub fn for_level(level: u32) -> FruitKind {
        FruitKind::from_repr((level % 5) as u8).unwrap_or(FruitKind::Cherry)
    }

    pub const fn score_bonus(self) -> u32 {
        match self {
            FruitKind::Cherry => 100,
            FruitKind::Banana => 200,
            FruitKind::Strawberry => 400,
            FruitKind::Apple => 750,
            FruitKind::Key => 1000,
        }
    }
}

/// The contents of a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CellKind {
    Wall,
    /// Open floor with nothing on it.
    Empty,
    Pellet {
        eaten: bool,
    },
    PowerPellet {
        eaten: bool,
    },
    /// A transient bonus; only ever found in the fruit socket.
    Fruit {
        fruit: FruitKind,
        remaining_ticks: u32,
    },
    /// Space outside the playable maze. Walkable, but unreachable on a well-formed board.
    Void,
}

impl CellKind {
    pub const fn is_wall(self) -> bool {
        matches!(self, CellKind::Wall)
    }
}

/// Something the player picked up by entering a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pickup {
    Pellet,
    PowerPellet,
    Fruit(FruitKind),
}

impl Pickup {
    pub const fn score(self) -> u32 {
        match self {
            Pickup::Pellet => crate::constants::scoring::PELLET,
            Pickup::PowerPellet => crate::constants::scoring::POWER_PELLET,
            Pickup::Fruit(fruit) => fruit.score_bonus(),
        }
    }
}

/// The maze for a single level.
///
/// Cell kinds are fixed for the lifetime of the level, except for the `eaten` flags and the
/// fruit socket. Cells are addressed by `(column, row)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    width: i32,
    height: i32,
    /// Row-major cell contents.
    cells: Vec<CellKind>,
    pen_entrance: IVec2,
    pen_cells: Vec<IVec2>,
    player_start: IVec2,
    pursuer_starts: [IVec2; 4],
}

impl Grid {
    /// Builds a grid from a raw board layout.
    pub fn new<S: AsRef<str>>(raw_board: &[S]) -> GameResult<Grid> {
        let parsed = MapTileParser::parse_board(raw_board)?;
        let grid = Grid::from(parsed);
        debug!(
            width = grid.width,
            height = grid.height,
            pellets = grid.pellets_remaining(),
            "Grid built"
        );
        Ok(grid)
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Returns `true` if the cell lies within `[0, width) x [0, height)`.
    pub fn contains(&self, cell: IVec2) -> bool {
        cell.x >= 0 && cell.x < self.width && cell.y >= 0 && cell.y < self.height
    }

    fn index(&self, cell: IVec2) -> Result<usize, MapError> {
        if self.contains(cell) {
            Ok((cell.y * self.width + cell.x) as usize)
        } else {
            Err(MapError::OutOfBounds(cell))
        }
    }

    /// Returns the contents of a cell.
    pub fn classify(&self, cell: IVec2) -> Result<CellKind, MapError> {
        self.index(cell).map(|index| self.cells[index])
    }

    pub fn is_wall(&self, cell: IVec2) -> Result<bool, MapError> {
        self.classify(cell).map(CellKind::is_wall)
    }

    /// Returns the cells that can be moved into from `cell`, in the order down, right, up, left.
    ///
    /// Walls are excluded, except for the pen entrance when `allow_home_reentry` is set.
    /// Cells on the left or right edge only lead to the wrap-around cell on the opposite edge.
    pub fn neighbors(&self, cell: IVec2, allow_home_reentry: bool) -> Result<SmallVec<[IVec2; 4]>, MapError> {
        self.index(cell)?;

        let mut possibles = SmallVec::new();

        // The edges of the map only lead through the tunnel
        if cell.x == 0 {
            possibles.push(IVec2::new(self.width - 1, cell.y));
            return Ok(possibles);
        }
        if cell.x == self.width - 1 {
            possibles.push(IVec2::new(0, cell.y));
            return Ok(possibles);
        }

        for direction in Direction::NEIGHBOR_ORDER {
            let neighbor = cell + direction.as_ivec2();
            let Ok(kind) = self.classify(neighbor) else {
                continue;
            };

            if !kind.is_wall() || (allow_home_reentry && neighbor == self.pen_entrance) {
                possibles.push(neighbor);
            }
        }

        Ok(possibles)
    }

    /// Converts a world position into the index of the cell containing it.
    ///
    /// The result may lie outside the grid; check it with [`Grid::contains`].
    pub fn to_cell(&self, position: Vec2) -> IVec2 {
        ((position - BOARD_ORIGIN) / CELL_SIZE).floor().as_ivec2()
    }

    /// Converts a cell index into the world position of the cell's center.
    pub fn to_position(&self, cell: IVec2) -> Vec2 {
        BOARD_ORIGIN + (cell.as_vec2() + Vec2::splat(0.5)) * CELL_SIZE
    }

    /// The wall cell Returning pursuers pass through to get home.
    pub fn pen_entrance(&self) -> IVec2 {
        self.pen_entrance
    }

    /// The cell just outside the pen that released pursuers head for.
    pub fn pen_exit(&self) -> IVec2 {
        self.pen_entrance + Direction::Up.as_ivec2()
    }

    /// The cell inside the pen that Returning pursuers head for.
    pub fn home(&self) -> IVec2 {
        self.pen_entrance + Direction::Down.as_ivec2()
    }

    pub fn pen_cells(&self) -> &[IVec2] {
        &self.pen_cells
    }

    pub fn is_in_pen(&self, cell: IVec2) -> bool {
        self.pen_cells.contains(&cell)
    }

    pub fn player_start(&self) -> IVec2 {
        self.player_start
    }

    pub fn pursuer_start(&self, id: usize) -> Option<IVec2> {
        self.pursuer_starts.get(id).copied()
    }

    /// The only cell a fruit can appear in.
    pub fn fruit_socket(&self) -> IVec2 {
        self.player_start
    }

    /// Iterates over every cell and its contents in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (IVec2, CellKind)> + '_ {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .map(move |(index, kind)| (IVec2::new(index as i32 % width, index as i32 / width), *kind))
    }

    /// Number of regular pellets eaten so far. Power pellets are not counted.
    pub fn pellets_eaten(&self) -> usize {
        self.cells
            .iter()
            .filter(|kind| matches!(kind, CellKind::Pellet { eaten: true }))
            .count()
    }

    /// Number of regular pellets still on the board.
    pub fn pellets_remaining(&self) -> usize {
        self.cells
            .iter()
            .filter(|kind| matches!(kind, CellKind::Pellet { eaten: false }))
            .count()
    }

    /// Eats whatever is in the cell, returning what was picked up.
    pub fn consume(&mut self, cell: IVec2) -> Result<Option<Pickup>, MapError> {
        let index = self.index(cell)?;
        let slot = &mut self.cells[index];

        let pickup = match *slot {
            CellKind::Pellet { eaten: false } => {
                *slot = CellKind::Pellet { eaten: true };
                Some(Pickup::Pellet)
            }
            CellKind::PowerPellet { eaten: false } => {
                *slot = CellKind::PowerPellet { eaten: true };
                Some(Pickup::PowerPellet)
            }
            CellKind::Fruit { fruit, .. } => {
                *slot = CellKind::Empty;
                Some(Pickup::Fruit(fruit))
            }
            _ => None,
        };

        Ok(pickup)
    }

    /// The fruit currently in the socket and its remaining lifetime in ticks.
    pub fn fruit(&self) -> Option<(FruitKind, u32)> {
        match self.classify(self.fruit_socket()) {
            Ok(CellKind::Fruit { fruit, remaining_ticks }) => Some((fruit, remaining_ticks)),
            _ => None,
        }
    }

    /// Places a fruit in the socket. Returns `false` if the socket already holds one.
    pub fn place_fruit(&mut self, fruit: FruitKind, remaining_ticks: u32) -> bool {
        if self.fruit().is_some() {
            return false;
        }

        let socket = self.fruit_socket();
        // The socket is always a valid cell; it came from the parsed board.
        if let Ok(index) = self.index(socket) {
            self.cells[index] = CellKind::Fruit { fruit, remaining_ticks };
            return true;
        }
        false
    }

    /// Counts down the fruit's lifetime, removing it when it runs out. Returns the fruit that expired.
    pub fn tick_fruit(&mut self) -> Option<FruitKind> {
        let index = self.index(self.fruit_socket()).ok()?;
        let slot = &mut self.cells[index];

        if let CellKind::Fruit { fruit, remaining_ticks } = slot {
            *remaining_ticks = remaining_ticks.saturating_sub(1);
            if *remaining_ticks == 0 {
                let expired = *fruit;
                *slot = CellKind::Empty;
                return Some(expired);
            }
        }
        None
    }

    /// Overwrites a cell. Used when restoring persisted state.
    pub(crate) fn set(&mut self, cell: IVec2, kind: CellKind) -> Result<(), MapError> {
        let index = self.index(cell)?;
        self.cells[index] = kind;
        Ok(())
    }
}

impl From<ParsedMap> for Grid {
    fn from(parsed: ParsedMap) -> Self {
        Grid {
            width: parsed.width,
            height: parsed.height,
            cells: parsed.cells,
            pen_entrance: parsed.pen_entrance,
            pen_cells: parsed.pen_cells,
            player_start: parsed.player_start,
            pursuer_starts: parsed.pursuer_starts,
        }
    }
}
