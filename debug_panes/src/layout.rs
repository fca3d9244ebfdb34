//! Split directions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MuxError;

/// Where a new pane is placed relative to the pane being split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Above the target (vertical split, placed before).
    Above,
    /// Below the target (vertical split).
    Below,
    /// Left of the target (horizontal split, placed before).
    Left,
    /// Right of the target (horizontal split).
    Right,
}

impl Direction {
    /// All directions, in the order they are documented.
    pub const ALL: [Direction; 4] =
        [Direction::Above, Direction::Below, Direction::Left, Direction::Right];

    /// Layout flag selecting a top/bottom (`-v`) or left/right (`-h`) split.
    pub fn layout_flag(self) -> &'static str {
        match self {
            Direction::Above | Direction::Below => "-v",
            Direction::Left | Direction::Right => "-h",
        }
    }

    /// Whether the new pane goes before the target (`-b`).
    pub fn before(self) -> bool {
        matches!(self, Direction::Above | Direction::Left)
    }
}

impl FromStr for Direction {
    type Err = MuxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "above" | "k" => Ok(Direction::Above),
            "below" | "j" => Ok(Direction::Below),
            "left" | "h" => Ok(Direction::Left),
            "right" | "l" => Ok(Direction::Right),
            other => Err(MuxError::InvalidDirection(other.to_string())),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Above => "above",
            Direction::Below => "below",
            Direction::Left => "left",
            Direction::Right => "right",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vim_aliases_map_to_directions() {
        assert_eq!("k".parse::<Direction>().unwrap(), Direction::Above);
        assert_eq!("j".parse::<Direction>().unwrap(), Direction::Below);
        assert_eq!("h".parse::<Direction>().unwrap(), Direction::Left);
        assert_eq!("l".parse::<Direction>().unwrap(), Direction::Right);
    }

    #[test]
    fn display_parses_back() {
        for dir in Direction::ALL {
            assert_eq!(dir.to_string().parse::<Direction>().unwrap(), dir);
        }
    }

    #[test]
    fn unknown_direction_rejected() {
        assert!(matches!("up".parse::<Direction>(), Err(MuxError::InvalidDirection(_))));
    }

    #[test]
    fn before_side_for_above_and_left() {
        assert!(Direction::Above.before());
        assert!(Direction::Left.before());
        assert!(!Direction::Below.before());
        assert!(!Direction::Right.before());
        assert_eq!(Direction::Above.layout_flag(), "-v");
        assert_eq!(Direction::Right.layout_flag(), "-h");
    }
}
