use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::GameError;

macro_rules! id_newtype {
    ($name:ident, $inner:ty) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub $inner);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(TokenId, u32);
id_newtype!(RoundGeneration, u64);

impl RoundGeneration {
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// Number of tokens in a round. Only values in `[MIN, MAX]` can be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u32")]
pub struct RoundSize(u32);

impl RoundSize {
    pub const MIN: u32 = 3;
    pub const MAX: u32 = 7;

    pub fn new(value: i64) -> Result<Self, GameError> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&value) {
            Ok(Self(value as u32))
        } else {
            Err(GameError::InvalidRoundSize {
                input: value.to_string(),
            })
        }
    }

    pub fn parse(raw: &str) -> Result<Self, GameError> {
        let trimmed = raw.trim();
        trimmed
            .parse::<i64>()
            .map_err(|_| GameError::InvalidRoundSize {
                input: trimmed.to_string(),
            })
            .and_then(Self::new)
    }

    pub fn get(self) -> u32 {
        self.0
    }

    pub fn token_ids(self) -> impl Iterator<Item = TokenId> {
        (1..=self.0).map(TokenId)
    }
}

impl FromStr for RoundSize {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<i64> for RoundSize {
    type Error = GameError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RoundSize> for u32 {
    fn from(value: RoundSize) -> Self {
        value.0
    }
}

impl fmt::Display for RoundSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: u32,
    pub y: u32,
}

impl Position {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// 24-bit RGB display color, rendered as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Color(u32);

impl Color {
    pub const MAX_RGB24: u32 = 0x00FF_FFFF;

    pub fn from_rgb24(value: u32) -> Self {
        Self(value & Self::MAX_RGB24)
    }

    pub fn rgb24(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.0)
    }
}

impl From<Color> for String {
    fn from(value: Color) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let hex = value
            .strip_prefix('#')
            .filter(|hex| hex.len() == 6)
            .ok_or_else(|| format!("expected #rrggbb color, got '{value}'"))?;
        u32::from_str_radix(hex, 16)
            .map(Self)
            .map_err(|err| format!("invalid color '{value}': {err}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Populating,
    Waiting,
    Scrambling {
        completed: u32,
    },
    Testing,
    Won,
    Failed,
}

impl Phase {
    pub fn is_scrambling(self) -> bool {
        matches!(self, Self::Scrambling { .. })
    }

    pub fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Failed)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Populating => "populating",
            Self::Waiting => "waiting",
            Self::Scrambling { .. } => "scrambling",
            Self::Testing => "testing",
            Self::Won => "won",
            Self::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Won,
    Failed,
}
