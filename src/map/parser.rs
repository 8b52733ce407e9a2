//! Map parsing functionality for converting raw board layouts into structured data.

use glam::IVec2;

use crate::error::ParseError;
use crate::map::grid::CellKind;

/// A single parsed character of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapTile {
    /// A cell with a fixed kind and no further meaning.
    Plain(CellKind),
    /// The pen door: a wall that Returning pursuers may pass.
    PenDoor,
    /// An empty cell inside the pen.
    Pen,
    /// An empty cell inside the pen where the given pursuer starts.
    PursuerStart(u8),
    /// The player's start, which doubles as the fruit socket.
    PlayerStart,
}

impl MapTile {
    /// The cell kind this tile occupies in the grid.
    pub fn kind(self) -> CellKind {
        match self {
            MapTile::Plain(kind) => kind,
            MapTile::PenDoor => CellKind::Wall,
            MapTile::Pen | MapTile::PursuerStart(_) | MapTile::PlayerStart => CellKind::Empty,
        }
    }
}

/// Represents the parsed data from a raw board layout.
#[derive(Debug, Clone)]
pub struct ParsedMap {
    pub width: i32,
    pub height: i32,
    /// Row-major cell kinds.
    pub cells: Vec<CellKind>,
    /// The wall cell that Returning pursuers may pass through.
    pub pen_entrance: IVec2,
    /// Every cell inside the pen, in row-major order.
    pub pen_cells: Vec<IVec2>,
    pub player_start: IVec2,
    pub pursuer_starts: [IVec2; 4],
}

/// Parser for converting raw board layouts into structured map data.
pub struct MapTileParser;

impl MapTileParser {
    /// Parses a single character into a map tile.
    ///
    /// | char | tile |
    /// |------|------|
    /// | `#` | wall |
    /// | `.` | pellet |
    /// | `o` | power pellet |
    /// | ` ` | empty floor |
    /// | `_` | void, outside the playable maze |
    /// | `=` | pen door |
    /// | `H` | pen interior |
    /// | `0`-`3` | pen interior, start of that pursuer |
    /// | `P` | player start and fruit socket |
    pub fn parse_character(c: char) -> Result<MapTile, ParseError> {
        match c {
            '#' => Ok(MapTile::Plain(CellKind::Wall)),
            '.' => Ok(MapTile::Plain(CellKind::Pellet { eaten: false })),
            'o' => Ok(MapTile::Plain(CellKind::PowerPellet { eaten: false })),
            ' ' => Ok(MapTile::Plain(CellKind::Empty)),
            '_' => Ok(MapTile::Plain(CellKind::Void)),
            '=' => Ok(MapTile::PenDoor),
            'H' => Ok(MapTile::Pen),
            '0'..='3' => Ok(MapTile::PursuerStart(c as u8 - b'0')),
            'P' => Ok(MapTile::PlayerStart),
            _ => Err(ParseError::UnknownCharacter(c)),
        }
    }

    /// Parses a raw board layout into structured map data.
    ///
    /// # Errors
    ///
    /// Returns an error if the board contains unknown characters, has rows of differing widths,
    /// or if the pen, its door, or the start positions are missing or malformed.
    pub fn parse_board<S: AsRef<str>>(raw_board: &[S]) -> Result<ParsedMap, ParseError> {
        let height = raw_board.len();
        let width = raw_board.first().map(|line| line.as_ref().chars().count()).unwrap_or(0);
        if height == 0 || width == 0 {
            return Err(ParseError::EmptyBoard);
        }

        let mut cells = Vec::with_capacity(width * height);
        let mut doors = Vec::new();
        let mut pen_cells = Vec::new();
        let mut player_starts = Vec::new();
        let mut pursuer_starts: [Option<IVec2>; 4] = [None; 4];

        for (y, line) in raw_board.iter().enumerate() {
            let line = line.as_ref();
            let found = line.chars().count();
            if found != width {
                return Err(ParseError::RaggedRow {
                    row: y,
                    expected: width,
                    found,
                });
            }

            for (x, character) in line.chars().enumerate() {
                let tile = Self::parse_character(character)?;
                let position = IVec2::new(x as i32, y as i32);

                // Track special positions
                match tile {
                    MapTile::PenDoor => doors.push(position),
                    MapTile::Pen => pen_cells.push(position),
                    MapTile::PursuerStart(id) => {
                        pen_cells.push(position);
                        pursuer_starts[id as usize] = Some(position);
                    }
                    MapTile::PlayerStart => player_starts.push(position),
                    MapTile::Plain(_) => {}
                }

                cells.push(tile.kind());
            }
        }

        if doors.len() != 1 {
            return Err(ParseError::InvalidHouseDoorCount(doors.len()));
        }
        if player_starts.len() != 1 {
            return Err(ParseError::InvalidPlayerStartCount(player_starts.len()));
        }

        let mut starts = [IVec2::ZERO; 4];
        for (id, start) in pursuer_starts.iter().enumerate() {
            starts[id] = start.ok_or(ParseError::MissingPursuerStart(id as u8))?;
        }

        let parsed = ParsedMap {
            width: width as i32,
            height: height as i32,
            cells,
            pen_entrance: doors[0],
            pen_cells,
            player_start: player_starts[0],
            pursuer_starts: starts,
        };
        Self::validate_pen(&parsed)?;

        Ok(parsed)
    }

    /// The pen must be entered from above: the door's upper neighbour is the exit and its lower neighbour is home.
    fn validate_pen(parsed: &ParsedMap) -> Result<(), ParseError> {
        let door = parsed.pen_entrance;
        let exit = door - IVec2::Y;
        let home = door + IVec2::Y;

        if exit.y < 0 {
            return Err(ParseError::InvalidPen(format!("door at {door} has no cell above it")));
        }
        let exit_kind = parsed.cells[(exit.y * parsed.width + exit.x) as usize];
        if exit_kind.is_wall() {
            return Err(ParseError::InvalidPen(format!("pen exit {exit} is a wall")));
        }
        if !parsed.pen_cells.contains(&home) {
            return Err(ParseError::InvalidPen(format!("cell {home} below the door is not inside the pen")));
        }
        Ok(())
    }
}
