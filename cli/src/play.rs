use std::io::{BufRead, Write};

use chrono::Utc;
use rand::Rng;
use sweeper_core::{Coord, Coord2, RevealOutcome};

use crate::render::{haptic_feedback, render_game};
use crate::session::Session;

const HELP: &str = "\
commands:
  r ROW COL   reveal a cell
  f ROW COL   cycle flag / question mark
  n           new game
  s           show the board
  h           this help
  q           quit
";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Command {
    Reveal(Coord2),
    Flag(Coord2),
    NewGame,
    Show,
    Help,
    Quit,
}

fn parse_coords<'a>(mut parts: impl Iterator<Item = &'a str>) -> Option<Coord2> {
    let row: Coord = parts.next()?.parse().ok()?;
    let col: Coord = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((row, col))
}

fn parse_command(line: &str) -> Option<Command> {
    let mut parts = line.split_whitespace();
    let command = match parts.next()? {
        "r" | "reveal" => Command::Reveal(parse_coords(parts)?),
        "f" | "flag" => Command::Flag(parse_coords(parts)?),
        "n" | "new" => Command::NewGame,
        "s" | "show" => Command::Show,
        "h" | "help" | "?" => Command::Help,
        "q" | "quit" | "exit" => Command::Quit,
        _ => return None,
    };
    Some(command)
}

/// Reads commands line by line until `q` or end of input.
pub fn run<R: Rng>(
    session: &mut Session<R>,
    input: impl BufRead,
    mut output: impl Write,
) -> anyhow::Result<()> {
    write!(output, "{}", render_game(session.game(), Utc::now()))?;
    write!(output, "> ")?;
    output.flush()?;

    for line in input.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            write!(output, "> ")?;
            output.flush()?;
            continue;
        }

        let show = match parse_command(line) {
            Some(Command::Reveal(coords)) => match session.reveal(coords) {
                Ok(outcome) => {
                    if let Some(bell) = haptic_feedback(outcome, session.settings()) {
                        write!(output, "{}", bell)?;
                    }
                    if outcome == RevealOutcome::NoChange {
                        writeln!(output, "nothing to reveal there")?;
                    }
                    outcome.has_update()
                }
                Err(err) => {
                    writeln!(output, "error: {}", err)?;
                    false
                }
            },
            Some(Command::Flag(coords)) => match session.toggle_flag(coords) {
                Ok(outcome) => outcome.has_update(),
                Err(err) => {
                    writeln!(output, "error: {}", err)?;
                    false
                }
            },
            Some(Command::NewGame) => {
                session.new_game()?;
                true
            }
            Some(Command::Show) => true,
            Some(Command::Help) => {
                write!(output, "{}", HELP)?;
                false
            }
            Some(Command::Quit) => break,
            None => {
                writeln!(output, "unknown command, try h")?;
                false
            }
        };

        if show {
            write!(output, "{}", render_game(session.game(), Utc::now()))?;
        }
        write!(output, "> ")?;
        output.flush()?;
    }

    Ok(())
}
