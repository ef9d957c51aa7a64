use rand::Rng;
use sweeper_core::{Coord2, Game, MarkOutcome, RevealOutcome, Settings};

use crate::store::Store;

/// Owns the current game and settings, persisting after every change.
#[derive(Debug)]
pub struct Session<R> {
    store: Store,
    settings: Settings,
    game: Game,
    rng: R,
}

impl<R: Rng> Session<R> {
    /// Loads settings and the saved game, starting fresh when the saved game
    /// is missing or does not fit the settings.
    pub fn open(store: Store, rng: R) -> anyhow::Result<Self> {
        let settings = store.load_settings();
        let game = match store.load_game(&settings) {
            Some(game) => game,
            None => {
                log::debug!("No usable saved game, starting a new one");
                Game::from_settings(&settings)?
            }
        };

        Ok(Self {
            store,
            settings,
            game,
            rng,
        })
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn reveal(&mut self, coords: Coord2) -> anyhow::Result<RevealOutcome> {
        let outcome = self.game.reveal(coords, &mut self.rng)?;
        if outcome.has_update() {
            self.store.save_game(&self.game);
        }
        Ok(outcome)
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> anyhow::Result<MarkOutcome> {
        let outcome = self.game.toggle_flag(coords)?;
        if outcome.has_update() {
            self.store.save_game(&self.game);
        }
        Ok(outcome)
    }

    pub fn new_game(&mut self) -> anyhow::Result<()> {
        self.game = Game::from_settings(&self.settings)?;
        self.store.save_game(&self.game);
        Ok(())
    }

    /// Stores new settings; a different board shape discards the current game.
    pub fn update_settings(&mut self, settings: Settings) -> anyhow::Result<()> {
        let board_changed = settings.game_config() != self.settings.game_config();
        self.settings = settings;
        self.store.save_settings(&self.settings);

        if board_changed {
            log::info!("Board changed to {:?}, starting a new game", settings.game_config());
            self.new_game()?;
        } else if self.game.first_click_safe() != settings.first_click_safe {
            self.game.set_first_click_safe(settings.first_click_safe);
            self.store.save_game(&self.game);
        }
        Ok(())
    }
}
