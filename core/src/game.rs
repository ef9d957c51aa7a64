use chrono::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - Playing -> Won
/// - Playing -> Lost
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Playing,
    Won,
    Lost,
}

impl GameStatus {
    /// Indicates the game has ended and no moves can be made anymore
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for GameStatus {
    fn default() -> Self {
        Self::Playing
    }
}

/// Represents a game from start to finish
#[derive(Clone, Debug, PartialEq)]
pub struct Game {
    config: GameConfig,
    first_click_safe: bool,
    board: Board,
    flags_placed: CellCount,
    revealed_count: CellCount,
    status: GameStatus,
    started_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
    triggered_mine: Option<Coord2>,
}

impl Game {
    /// A fresh game, mines are placed on the first reveal.
    pub fn new(config: GameConfig, first_click_safe: bool) -> Result<Self> {
        let board = Board::new(config.width, config.height)?;
        Ok(Self::with_board(config, board, first_click_safe))
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(settings.game_config(), settings.first_click_safe)
    }

    /// A game over a prepared board. If the board already has mines they are
    /// kept on the first reveal instead of being generated.
    pub fn with_board(config: GameConfig, board: Board, first_click_safe: bool) -> Self {
        let mut game = Self {
            config,
            first_click_safe,
            board,
            flags_placed: 0,
            revealed_count: 0,
            status: Default::default(),
            started_at: None,
            ended_at: None,
            triggered_mine: None,
        };
        game.recount();
        game
    }

    pub(crate) fn from_parts(
        config: GameConfig,
        board: Board,
        first_click_safe: bool,
        status: GameStatus,
        started_at: Option<DateTime<Utc>>,
        ended_at: Option<DateTime<Utc>>,
    ) -> Self {
        let mut game = Self::with_board(config, board, first_click_safe);
        game.status = status;
        game.started_at = started_at;
        game.ended_at = ended_at;
        game
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn first_click_safe(&self) -> bool {
        self.first_click_safe
    }

    /// Only affects a game whose first reveal has not happened yet.
    pub fn set_first_click_safe(&mut self, first_click_safe: bool) {
        self.first_click_safe = first_click_safe;
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }

    pub fn is_started(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn width(&self) -> Coord {
        self.board.width()
    }

    pub fn height(&self) -> Coord {
        self.board.height()
    }

    pub fn total_mines(&self) -> CellCount {
        self.config.mines
    }

    pub fn flags_placed(&self) -> CellCount {
        self.flags_placed
    }

    pub fn revealed_count(&self) -> CellCount {
        self.revealed_count
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    pub fn cell(&self, coords: Coord2) -> Option<Cell> {
        self.board.get(coords).copied()
    }

    /// How many mines have not been flagged yet, negative when over-flagged
    pub fn remaining_mines(&self) -> isize {
        (self.config.mines as isize) - (self.flags_placed as isize)
    }

    /// How many seconds have passed since game started, 0 if it hasn't started
    pub fn elapsed_secs(&self, now: DateTime<Utc>) -> u32 {
        match self.started_at {
            Some(started_at) => (self.ended_at.unwrap_or(now) - started_at)
                .num_seconds()
                .clamp(0, u32::MAX.into()) as u32,
            None => 0,
        }
    }

    pub fn reveal<R: Rng + ?Sized>(
        &mut self,
        coords: Coord2,
        rng: &mut R,
    ) -> Result<RevealOutcome> {
        self.reveal_at(coords, rng, Utc::now())
    }

    /// Runs the reveal protocol with an explicit clock reading.
    ///
    /// Input on a finished game or on a cell that is not hidden or
    /// question-marked is ignored.
    pub fn reveal_at<R: Rng + ?Sized>(
        &mut self,
        coords: Coord2,
        rng: &mut R,
        now: DateTime<Utc>,
    ) -> Result<RevealOutcome> {
        let coords = self.board.validate_coords(coords)?;

        if self.status.is_finished() || !self.board[coords].state().is_revealable() {
            return Ok(RevealOutcome::NoChange);
        }

        if self.started_at.is_none() {
            self.start(coords, rng, now);
        }

        self.board.reveal_cell(coords)?;

        if self.board[coords].is_mine() {
            log::debug!("Hit mine at {:?}", coords);
            self.triggered_mine = Some(coords);
            self.board.reveal_all_mines();
            self.recount();
            self.mark_ended(GameStatus::Lost, now);
            return Ok(RevealOutcome::HitMine);
        }

        self.recount();
        if self.revealed_count == self.board.safe_cell_count() {
            self.mark_ended(GameStatus::Won, now);
            Ok(RevealOutcome::Won)
        } else {
            Ok(RevealOutcome::Revealed)
        }
    }

    /// Cycles the mark on a cell, never touches status or timestamps.
    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        let coords = self.board.validate_coords(coords)?;

        if self.status.is_finished() {
            return Ok(MarkOutcome::NoChange);
        }

        let outcome = self.board.toggle_flag(coords)?;
        self.recount();
        Ok(outcome)
    }

    /// Populates mines for the first reveal and records the start time.
    fn start<R: Rng + ?Sized>(&mut self, coords: Coord2, rng: &mut R, now: DateTime<Utc>) {
        let mut board = if self.board.has_mines() {
            self.board.clone()
        } else {
            self.board.place_mines(self.config.mines, None, rng)
        };

        if self.first_click_safe && board[coords].is_mine() {
            log::debug!("First reveal at {:?} is a mine, regenerating", coords);
            board = self.board.place_mines(board.mine_count(), Some(coords), rng);
        }

        self.board = board;
        self.started_at = Some(now);
        log::debug!("started at {}", now);
    }

    fn mark_ended(&mut self, status: GameStatus, now: DateTime<Utc>) {
        if self.status.is_finished() {
            return;
        }

        self.status = status;
        self.ended_at = Some(now);
        log::debug!("ended at {} ({:?})", now, status);
    }

    fn recount(&mut self) {
        self.flags_placed = self.board.count_flags();
        self.revealed_count = self.board.count_revealed();
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(0x5eed)
    }

    fn fixed_game(width: Coord, height: Coord, mines: &[Coord2], first_click_safe: bool) -> Game {
        let board = Board::new(width, height)
            .unwrap()
            .with_mine_coords(mines)
            .unwrap();
        let config = GameConfig::new(width, height, board.mine_count()).unwrap();
        Game::with_board(config, board, first_click_safe)
    }

    #[test]
    fn new_game_has_no_mines_until_first_reveal() {
        let game = Game::new(GameConfig::BEGINNER, true).unwrap();

        assert_eq!(game.status(), GameStatus::Playing);
        assert!(!game.is_started());
        assert!(!game.board().has_mines());
        assert_eq!(game.remaining_mines(), 10);
        assert_eq!(game.elapsed_secs(Utc::now()), 0);
    }

    #[test]
    fn first_reveal_places_mines_and_starts_clock() {
        let mut game = Game::new(GameConfig::INTERMEDIATE, true).unwrap();
        let now = Utc::now();

        let outcome = game.reveal_at((8, 8), &mut rng(), now).unwrap();

        assert!(outcome.has_update());
        assert_ne!(outcome, RevealOutcome::HitMine);
        assert_eq!(game.board().mine_count(), 40);
        assert_eq!(game.started_at(), Some(now));
        assert!(game.board().adjacency_consistent());
    }

    #[test]
    fn first_click_is_never_a_mine_when_safe_mode_is_on() {
        let mut rng = rng();
        for _ in 0..200 {
            let mut game = Game::new(GameConfig::BEGINNER, true).unwrap();
            let outcome = game.reveal((4, 4), &mut rng).unwrap();

            assert_ne!(outcome, RevealOutcome::HitMine);
            assert!(matches!(game.status(), GameStatus::Playing | GameStatus::Won));
            assert!(!game.board()[(4, 4)].is_mine());
            assert_eq!(game.board().mine_count(), 10);
        }
    }

    #[test]
    fn first_click_on_preplaced_mine_regenerates_board() {
        let mut game = fixed_game(3, 3, &[(0, 0)], true);

        let outcome = game.reveal((0, 0), &mut rng()).unwrap();

        assert_ne!(outcome, RevealOutcome::HitMine);
        assert!(!game.board()[(0, 0)].is_mine());
        assert_eq!(game.board().mine_count(), 1);
        assert!(game.board().adjacency_consistent());
    }

    #[test]
    fn first_click_on_mine_loses_without_safe_mode() {
        let mut game = fixed_game(3, 3, &[(0, 0)], false);

        let outcome = game.reveal((0, 0), &mut rng()).unwrap();

        assert_eq!(outcome, RevealOutcome::HitMine);
        assert_eq!(game.status(), GameStatus::Lost);
    }

    #[test]
    fn hitting_a_mine_reveals_every_mine() {
        let mut game = fixed_game(4, 4, &[(0, 0), (3, 3), (0, 3)], false);
        game.reveal((1, 1), &mut rng()).unwrap();
        game.toggle_flag((3, 3)).unwrap();
        let now = Utc::now();

        let outcome = game.reveal_at((0, 0), &mut rng(), now).unwrap();

        assert_eq!(outcome, RevealOutcome::HitMine);
        assert_eq!(game.status(), GameStatus::Lost);
        assert_eq!(game.ended_at(), Some(now));
        assert_eq!(game.triggered_mine(), Some((0, 0)));
        for coords in [(0, 0), (3, 3), (0, 3)] {
            assert!(game.board()[coords].is_revealed(), "{:?}", coords);
        }
        assert_eq!(game.flags_placed(), 0);
    }

    #[test]
    fn revealing_every_safe_cell_wins_regardless_of_flags() {
        let mut game = fixed_game(2, 1, &[(0, 0)], true);

        let outcome = game.reveal((0, 1), &mut rng()).unwrap();

        assert_eq!(outcome, RevealOutcome::Won);
        assert_eq!(game.status(), GameStatus::Won);
        assert_eq!(game.board()[(0, 1)].adjacent_mines(), 1);
        assert_eq!(game.board()[(0, 0)].state(), CellState::Hidden);
        assert!(game.ended_at().is_some());
    }

    #[test]
    fn wrong_flags_do_not_block_a_win() {
        let mut game = fixed_game(3, 1, &[(0, 0)], true);
        game.toggle_flag((0, 2)).unwrap();
        game.reveal((0, 1), &mut rng()).unwrap();
        assert_eq!(game.status(), GameStatus::Playing);

        // a flagged safe cell must be unflagged before it can be revealed
        game.toggle_flag((0, 2)).unwrap();
        assert_eq!(game.cell((0, 2)).unwrap().state(), CellState::Question);
        assert_eq!(game.reveal((0, 2), &mut rng()).unwrap(), RevealOutcome::Won);
    }

    #[test]
    fn flood_reveal_can_win_in_one_click() {
        let mut game = fixed_game(3, 3, &[(2, 2)], true);

        assert_eq!(game.reveal((0, 0), &mut rng()).unwrap(), RevealOutcome::Won);
        assert_eq!(game.revealed_count(), 8);
    }

    #[test]
    fn finished_game_ignores_input() {
        let mut game = fixed_game(3, 3, &[(0, 0)], false);
        game.reveal((0, 0), &mut rng()).unwrap();
        let ended_at = game.ended_at();

        assert_eq!(game.reveal((2, 2), &mut rng()), Ok(RevealOutcome::NoChange));
        assert_eq!(game.toggle_flag((2, 2)), Ok(MarkOutcome::NoChange));
        assert_eq!(game.ended_at(), ended_at);
        assert_eq!(game.status(), GameStatus::Lost);
    }

    #[test]
    fn reveal_ignores_flagged_and_revealed_cells() {
        let mut game = fixed_game(3, 3, &[(0, 0)], false);
        game.toggle_flag((2, 2)).unwrap();

        assert_eq!(game.reveal((2, 2), &mut rng()), Ok(RevealOutcome::NoChange));
        assert!(!game.is_started());

        assert_eq!(game.reveal((1, 1), &mut rng()), Ok(RevealOutcome::Revealed));
        assert_eq!(game.reveal((1, 1), &mut rng()), Ok(RevealOutcome::NoChange));
    }

    #[test]
    fn toggle_flag_does_not_start_the_game() {
        let mut game = Game::new(GameConfig::BEGINNER, true).unwrap();

        let mut seen = Vec::new();
        for _ in 0..3 {
            assert_eq!(game.toggle_flag((0, 0)), Ok(MarkOutcome::Changed));
            seen.push(game.cell((0, 0)).unwrap().state());
        }

        assert_eq!(
            seen,
            vec![CellState::Flagged, CellState::Question, CellState::Hidden]
        );
        assert!(!game.is_started());
        assert_eq!(game.status(), GameStatus::Playing);
        assert_eq!(game.ended_at(), None);
    }

    #[test]
    fn remaining_mines_goes_negative_when_over_flagged() {
        let mut game = fixed_game(3, 3, &[(0, 0)], true);
        game.toggle_flag((1, 1)).unwrap();
        game.toggle_flag((2, 2)).unwrap();

        assert_eq!(game.flags_placed(), 2);
        assert_eq!(game.remaining_mines(), -1);
    }

    #[test]
    fn first_click_safe_can_be_switched_off_before_start() {
        let mut game = fixed_game(3, 3, &[(1, 1)], true);
        game.set_first_click_safe(false);

        assert_eq!(game.reveal((1, 1), &mut rng()), Ok(RevealOutcome::HitMine));
        assert_eq!(game.status(), GameStatus::Lost);
    }

    #[test]
    fn out_of_bounds_input_is_an_error() {
        let mut game = Game::new(GameConfig::BEGINNER, true).unwrap();
        assert_eq!(game.reveal((9, 0), &mut rng()), Err(GameError::InvalidCoords));
        assert_eq!(game.toggle_flag((0, 9)), Err(GameError::InvalidCoords));
        assert!(!game.is_started());
    }

    #[test]
    fn elapsed_time_freezes_when_game_ends() {
        let mut game = fixed_game(3, 3, &[(0, 0)], true);
        let start = Utc::now();
        game.reveal_at((1, 1), &mut rng(), start).unwrap();

        assert_eq!(game.elapsed_secs(start + TimeDelta::seconds(5)), 5);

        game.reveal_at((0, 0), &mut rng(), start + TimeDelta::seconds(12))
            .unwrap();
        assert_eq!(game.status(), GameStatus::Lost);
        assert_eq!(game.elapsed_secs(start + TimeDelta::seconds(100)), 12);
    }
}
