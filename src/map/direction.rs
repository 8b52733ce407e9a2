use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, EnumIter};

/// The four cardinal directions.
///
/// Screen coordinates grow downwards, so `Up` is `-Y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, AsRefStr, EnumIter, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    #[default]
    Right,
}

impl Direction {
    /// The four cardinal directions.
    /// This is just a convenience constant for iterating over the directions.
    pub const DIRECTIONS: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    /// The order in which neighbouring cells are enumerated.
    ///
    /// Ties between equally good candidates go to whichever comes first here.
    pub const NEIGHBOR_ORDER: [Direction; 4] = [Direction::Down, Direction::Right, Direction::Up, Direction::Left];

    /// Returns the opposite direction. Constant time.
    pub const fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Returns the direction as a unit cell offset.
    pub fn as_ivec2(self) -> IVec2 {
        self.into()
    }

    /// Returns the direction as a unit world-space vector.
    pub fn as_vec2(self) -> Vec2 {
        self.as_ivec2().as_vec2()
    }
}

impl From<Direction> for IVec2 {
    fn from(dir: Direction) -> Self {
        match dir {
            Direction::Up => -IVec2::Y,
            Direction::Down => IVec2::Y,
            Direction::Left => -IVec2::X,
            Direction::Right => IVec2::X,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_opposite() {
        assert_eq!(Direction::Up.opposite(), Direction::Down);
        assert_eq!(Direction::Down.opposite(), Direction::Up);
        assert_eq!(Direction::Left.opposite(), Direction::Right);
        assert_eq!(Direction::Right.opposite(), Direction::Left);
    }

    #[test]
    fn test_direction_as_ivec2() {
        assert_eq!(Direction::Up.as_ivec2(), -IVec2::Y);
        assert_eq!(Direction::Down.as_ivec2(), IVec2::Y);
        assert_eq!(Direction::Left.as_ivec2(), -IVec2::X);
        assert_eq!(Direction::Right.as_ivec2(), IVec2::X);
    }

    #[test]
    fn test_direction_as_vec2_is_unit() {
        for dir in Direction::DIRECTIONS {
            assert_eq!(dir.as_vec2().length(), 1.0);
        }
    }

    #[test]
    fn test_neighbor_order_covers_all_directions() {
        for dir in Direction::DIRECTIONS {
            assert!(Direction::NEIGHBOR_ORDER.contains(&dir));
        }
        assert_eq!(Direction::NEIGHBOR_ORDER[0], Direction::Down);
    }

    #[test]
    fn test_direction_as_ref_str() {
        assert_eq!(Direction::Up.as_ref(), "up");
        assert_eq!(Direction::Right.as_ref(), "right");
    }
}
