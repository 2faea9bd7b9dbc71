use std::{fmt, str::FromStr};

use serde::Serialize;

use crate::error::ParseDirectionError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up = 0,
    Down = 1,
    Right = 2,
    Left = 3,
}

impl Direction {
    pub fn iter() -> impl Iterator<Item = Self> + Clone {
        [Self::Up, Self::Down, Self::Right, Self::Left].into_iter()
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Right => "right",
            Self::Left => "left",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Accepts the full name, `u`/`d`/`r`, or the vi keys `hjkl` (case-insensitive).
impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "up" | "u" | "k" => Ok(Self::Up),
            "down" | "d" | "j" => Ok(Self::Down),
            "right" | "r" | "l" => Ok(Self::Right),
            "left" | "h" => Ok(Self::Left),
            _ => Err(ParseDirectionError(s.to_owned())),
        }
    }
}
