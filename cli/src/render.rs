use std::fmt;

use chrono::{DateTime, Utc};
use sweeper_core::{Cell, CellState, Coord2, Game, GameStatus, RevealOutcome, Settings};

/// Three character counter as shown on the classic LED display.
pub fn format_for_counter(num: i64) -> String {
    match num {
        ..-99 => "-99".to_string(),
        -99..0 => format!("-{:02}", -num),
        0..1000 => format!("{:03}", num),
        1000.. => "999".to_string(),
    }
}

fn cell_glyph(cell: &Cell, coords: Coord2, triggered: Option<Coord2>) -> char {
    match cell.state() {
        CellState::Hidden => '#',
        CellState::Flagged => 'F',
        CellState::Question => '?',
        CellState::Revealed if cell.is_mine() && triggered == Some(coords) => 'X',
        CellState::Revealed if cell.is_mine() => '*',
        CellState::Revealed => match cell.adjacent_mines() {
            0 => '.',
            count => char::from(b'0' + count),
        },
    }
}

fn status_label(status: GameStatus) -> &'static str {
    match status {
        GameStatus::Playing => "playing",
        GameStatus::Won => "you win",
        GameStatus::Lost => "boom",
    }
}

/// Header with mine counter, timer and status, followed by the grid.
struct GameView<'a> {
    game: &'a Game,
    now: DateTime<Utc>,
}

impl fmt::Display for GameView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let game = self.game;
        writeln!(
            f,
            "mines {}  time {}  {}",
            format_for_counter(game.remaining_mines() as i64),
            format_for_counter(game.elapsed_secs(self.now).into()),
            status_label(game.status())
        )?;

        let board = game.board();
        f.write_str("   ")?;
        for col in 0..board.width() {
            write!(f, "{:>2}", col)?;
        }
        writeln!(f)?;

        for row in 0..board.height() {
            write!(f, "{:>2} ", row)?;
            for col in 0..board.width() {
                let coords = (row, col);
                write!(f, " {}", cell_glyph(&board[coords], coords, game.triggered_mine()))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

pub fn render_game(game: &Game, now: DateTime<Utc>) -> String {
    GameView { game, now }.to_string()
}

/// Terminal bell standing in for a vibration on game end.
pub fn haptic_feedback(outcome: RevealOutcome, settings: &Settings) -> Option<&'static str> {
    match outcome {
        RevealOutcome::HitMine | RevealOutcome::Won if settings.haptics => Some("\x07"),
        _ => None,
    }
}
