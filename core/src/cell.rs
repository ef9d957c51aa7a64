use serde::{Deserialize, Serialize};

/// Player-visible state of a single cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellState {
    Hidden,
    Revealed,
    Flagged,
    Question,
}

impl CellState {
    /// Whether a reveal (direct or flood) may open a cell in this state.
    pub const fn is_revealable(self) -> bool {
        matches!(self, Self::Hidden | Self::Question)
    }

    /// Next state in the mark cycle, `None` for revealed cells.
    pub const fn next_mark(self) -> Option<Self> {
        use CellState::*;
        match self {
            Hidden => Some(Flagged),
            Flagged => Some(Question),
            Question => Some(Hidden),
            Revealed => None,
        }
    }
}

impl Default for CellState {
    fn default() -> Self {
        Self::Hidden
    }
}

/// One square of the board.
///
/// `is_mine` and `adjacent_mines` are fixed when mines are placed; only the
/// state moves afterwards.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    pub(crate) is_mine: bool,
    pub(crate) adjacent_mines: u8,
    pub(crate) state: CellState,
}

impl Cell {
    pub const fn is_mine(&self) -> bool {
        self.is_mine
    }

    pub const fn adjacent_mines(&self) -> u8 {
        self.adjacent_mines
    }

    pub const fn state(&self) -> CellState {
        self.state
    }

    pub const fn is_revealed(&self) -> bool {
        matches!(self.state, CellState::Revealed)
    }

    pub const fn is_flagged(&self) -> bool {
        matches!(self.state, CellState::Flagged)
    }
}
