use chrono::prelude::*;
use serde::{Deserialize, Serialize};

use crate::*;

/// Plain JSON shape of a saved game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub board: Vec<Vec<Cell>>,
    pub width: Coord,
    pub height: Coord,
    pub mines: CellCount,
    pub flags_placed: CellCount,
    pub revealed_count: CellCount,
    pub game_status: GameStatus,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

impl GameSnapshot {
    pub fn to_json(&self) -> core::result::Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> core::result::Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Game {
    pub fn snapshot(&self) -> GameSnapshot {
        let board = self.board();
        GameSnapshot {
            board: board.rows(),
            width: board.width(),
            height: board.height(),
            mines: self.total_mines(),
            flags_placed: self.flags_placed(),
            revealed_count: self.revealed_count(),
            game_status: self.status(),
            start_time: self.started_at(),
            end_time: self.ended_at(),
        }
    }

    /// Rebuilds a game from a snapshot, only if it matches the current
    /// settings and is internally coherent. Stored counters are ignored and
    /// recomputed from the board.
    pub fn restore(snapshot: GameSnapshot, settings: &Settings) -> Result<Self> {
        let config = settings.game_config();
        if (snapshot.width, snapshot.height, snapshot.mines)
            != (config.width, config.height, config.mines)
        {
            return Err(GameError::SettingsMismatch);
        }

        let board = Board::from_rows(snapshot.board, snapshot.width, snapshot.height)?;

        if !board.adjacency_consistent() {
            return Err(GameError::InvalidSnapshot(
                "adjacent mine counts disagree with the mine layout",
            ));
        }

        match (board.mine_count(), snapshot.start_time) {
            (0, None) => {}
            (count, _) if count == config.mines => {}
            _ => return Err(GameError::InvalidSnapshot("wrong number of mines")),
        }

        let status = snapshot.game_status;
        match (status, snapshot.start_time, snapshot.end_time) {
            (GameStatus::Playing, None, None) if board.count_revealed() == 0 => {}
            (GameStatus::Playing, Some(_), None) => {}
            (GameStatus::Won | GameStatus::Lost, Some(started), Some(ended))
                if started <= ended => {}
            _ => return Err(GameError::InvalidSnapshot("status and timestamps disagree")),
        }

        let revealed_mines = board
            .iter_coords()
            .filter(|&coords| board[coords].is_mine() && board[coords].is_revealed())
            .count();
        let revealed_safe = board.count_revealed() as usize - revealed_mines;
        let consistent = match status {
            GameStatus::Playing => {
                revealed_mines == 0 && revealed_safe < usize::from(board.safe_cell_count())
            }
            GameStatus::Won => revealed_safe == usize::from(board.safe_cell_count()),
            GameStatus::Lost => revealed_mines == usize::from(board.mine_count()),
        };
        if !consistent {
            return Err(GameError::InvalidSnapshot("board does not match game status"));
        }

        if snapshot.flags_placed != board.count_flags()
            || snapshot.revealed_count != board.count_revealed()
        {
            log::debug!("Snapshot counters were stale, recomputed from board");
        }

        Ok(Game::from_parts(
            config,
            board,
            settings.first_click_safe,
            status,
            snapshot.start_time,
            snapshot.end_time,
        ))
    }

    /// Decodes and restores in one step.
    pub fn restore_json(
        json: &str,
        settings: &Settings,
    ) -> core::result::Result<Self, SnapshotError> {
        let snapshot = GameSnapshot::from_json(json)?;
        Ok(Self::restore(snapshot, settings)?)
    }
}
