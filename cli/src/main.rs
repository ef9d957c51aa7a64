use std::path::PathBuf;

use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use sweeper_core::{CellCount, Coord, Difficulty, MarkOutcome, RevealOutcome, Settings};

use crate::render::{haptic_feedback, render_game};
use crate::session::Session;
use crate::store::Store;

mod play;
mod render;
mod session;
mod store;

#[derive(Parser, Debug)]
#[command(name = "sweeper", version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: Verbosity<WarnLevel>,

    /// Directory holding the settings and the saved game
    #[arg(long, default_value = ".sweeper")]
    data_dir: PathBuf,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the current board (default)
    Show,
    /// Start a new game with the current settings
    New,
    /// Reveal a cell
    Reveal { row: Coord, col: Coord },
    /// Cycle flag and question mark on a cell
    Flag { row: Coord, col: Coord },
    /// Show or change settings, a different board size starts a new game
    Settings(SettingsArgs),
    /// Interactive session reading commands from stdin
    Play,
}

#[derive(clap::Args, Debug)]
struct SettingsArgs {
    #[arg(long, value_enum)]
    difficulty: Option<DifficultyArg>,

    /// Custom board width (8-30)
    #[arg(long)]
    width: Option<Coord>,

    /// Custom board height (8-30)
    #[arg(long)]
    height: Option<Coord>,

    /// Custom mine count
    #[arg(long)]
    mines: Option<CellCount>,

    #[arg(long)]
    haptics: Option<bool>,

    /// Move the mine away when the first reveal would hit one
    #[arg(long)]
    first_click_safe: Option<bool>,
}

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq)]
enum DifficultyArg {
    Beginner,
    Intermediate,
    Expert,
    Custom,
}

impl SettingsArgs {
    fn is_empty(&self) -> bool {
        self.difficulty.is_none()
            && self.width.is_none()
            && self.height.is_none()
            && self.mines.is_none()
            && self.haptics.is_none()
            && self.first_click_safe.is_none()
    }

    fn apply(&self, current: Settings) -> Settings {
        let config = current.game_config();
        let custom = Difficulty::Custom {
            width: self.width.unwrap_or(config.width),
            height: self.height.unwrap_or(config.height),
            mines: self.mines.unwrap_or(config.mines),
        };
        let has_custom_fields =
            self.width.is_some() || self.height.is_some() || self.mines.is_some();

        let difficulty = match self.difficulty {
            Some(DifficultyArg::Beginner) => Difficulty::Beginner,
            Some(DifficultyArg::Intermediate) => Difficulty::Intermediate,
            Some(DifficultyArg::Expert) => Difficulty::Expert,
            Some(DifficultyArg::Custom) => custom,
            None if has_custom_fields => custom,
            None => current.difficulty,
        };

        Settings {
            difficulty,
            haptics: self.haptics.unwrap_or(current.haptics),
            first_click_safe: self.first_click_safe.unwrap_or(current.first_click_safe),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.verbose.tracing_level_filter())
        .with_writer(std::io::stderr)
        .init();

    let seed = args.seed.unwrap_or_else(rand::random);
    log::debug!("seed: {}", seed);

    let store = Store::new(args.data_dir);
    log::debug!("data dir: {}", store.dir().display());
    let mut session = Session::open(store, SmallRng::seed_from_u64(seed))?;

    match args.command.unwrap_or(Commands::Show) {
        Commands::Show => {}
        Commands::New => session.new_game()?,
        Commands::Reveal { row, col } => {
            let outcome = session.reveal((row, col))?;
            if let Some(bell) = haptic_feedback(outcome, session.settings()) {
                print!("{}", bell);
            }
            if outcome == RevealOutcome::NoChange {
                println!("nothing to reveal at ({}, {})", row, col);
            }
        }
        Commands::Flag { row, col } => {
            if session.toggle_flag((row, col))? == MarkOutcome::NoChange {
                println!("cannot mark ({}, {})", row, col);
            }
        }
        Commands::Settings(settings_args) => {
            if !settings_args.is_empty() {
                let settings = settings_args.apply(*session.settings());
                session.update_settings(settings)?;
            }
            println!("{}", serde_json::to_string_pretty(session.settings())?);
            return Ok(());
        }
        Commands::Play => {
            let stdin = std::io::stdin();
            return play::run(&mut session, stdin.lock(), std::io::stdout());
        }
    }

    print!("{}", render_game(session.game(), Utc::now()));
    Ok(())
}
