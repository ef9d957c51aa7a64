use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub width: Coord,
    pub height: Coord,
    pub mines: CellCount,
}

impl GameConfig {
    pub const BEGINNER: Self = Self::new_unchecked(9, 9, 10);
    pub const INTERMEDIATE: Self = Self::new_unchecked(16, 16, 40);
    pub const EXPERT: Self = Self::new_unchecked(30, 16, 99);

    /// Smallest side length accepted for a custom board.
    pub const CUSTOM_MIN_SIDE: Coord = 8;
    /// Largest side length accepted for a custom board.
    pub const CUSTOM_MAX_SIDE: Coord = 30;

    pub const fn new_unchecked(width: Coord, height: Coord, mines: CellCount) -> Self {
        Self {
            width,
            height,
            mines,
        }
    }

    /// Validated config: non-empty board with `0 < mines < width * height`.
    pub fn new(width: Coord, height: Coord, mines: CellCount) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(GameError::InvalidDimensions);
        }
        if mines == 0 {
            return Err(GameError::NoMines);
        }
        if mines >= mult(width, height) {
            return Err(GameError::TooManyMines);
        }
        Ok(Self::new_unchecked(width, height, mines))
    }

    /// Clamps user supplied values into a playable custom board.
    pub fn custom(width: Coord, height: Coord, mines: CellCount) -> Self {
        let width = width.clamp(Self::CUSTOM_MIN_SIDE, Self::CUSTOM_MAX_SIDE);
        let height = height.clamp(Self::CUSTOM_MIN_SIDE, Self::CUSTOM_MAX_SIDE);
        let mines = mines.clamp(1, mult(width, height) - 1);
        Self::new_unchecked(width, height, mines)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.width, self.height)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::BEGINNER
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Expert,
    Custom {
        width: Coord,
        height: Coord,
        mines: CellCount,
    },
}

impl Difficulty {
    pub fn config(self) -> GameConfig {
        use Difficulty::*;
        match self {
            Beginner => GameConfig::BEGINNER,
            Intermediate => GameConfig::INTERMEDIATE,
            Expert => GameConfig::EXPERT,
            Custom {
                width,
                height,
                mines,
            } => GameConfig::custom(width, height, mines),
        }
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::Beginner
    }
}

/// Player preferences, persisted separately from the game.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub difficulty: Difficulty,
    pub haptics: bool,
    pub first_click_safe: bool,
}

impl Settings {
    pub fn game_config(&self) -> GameConfig {
        self.difficulty.config()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default(),
            haptics: true,
            first_click_safe: true,
        }
    }
}
