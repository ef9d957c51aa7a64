use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Serialize;
use serde::de::DeserializeOwned;
use sweeper_core::{Game, GameSnapshot, Settings};

/// JSON files on disk standing in for the browser's local storage.
#[derive(Clone, Debug)]
pub struct Store {
    dir: PathBuf,
}

impl Store {
    const GAME_KEY: &'static str = "game.json";
    const SETTINGS_KEY: &'static str = "settings.json";

    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Saved settings, or the defaults when missing or unreadable.
    pub fn load_settings(&self) -> Settings {
        if !self.path(Self::SETTINGS_KEY).exists() {
            return Settings::default();
        }
        self.read(Self::SETTINGS_KEY).unwrap_or_else(|err| {
            log::warn!("Could not load settings, using defaults: {:#}", err);
            Settings::default()
        })
    }

    pub fn save_settings(&self, settings: &Settings) {
        if let Err(err) = self.write(Self::SETTINGS_KEY, settings) {
            log::error!("Could not save settings: {:#}", err);
        }
    }

    /// The saved game if it exists and is valid for `settings`.
    pub fn load_game(&self, settings: &Settings) -> Option<Game> {
        if !self.path(Self::GAME_KEY).exists() {
            return None;
        }

        let snapshot: GameSnapshot = match self.read(Self::GAME_KEY) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                log::warn!("Discarding unreadable saved game: {:#}", err);
                return None;
            }
        };

        match Game::restore(snapshot, settings) {
            Ok(game) => Some(game),
            Err(err) => {
                log::warn!("Discarding saved game: {}", err);
                None
            }
        }
    }

    pub fn save_game(&self, game: &Game) {
        if let Err(err) = self.write(Self::GAME_KEY, &game.snapshot()) {
            log::error!("Could not save game: {:#}", err);
        }
    }

    pub fn clear_game(&self) {
        let path = self.path(Self::GAME_KEY);
        if path.exists() {
            if let Err(err) = fs::remove_file(&path) {
                log::error!("Could not remove {}: {}", path.display(), err);
            }
        }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> anyhow::Result<T> {
        let path = self.path(key);
        let json =
            fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str(&json).with_context(|| format!("parsing {}", path.display()))
    }

    fn write<T: Serialize>(&self, key: &str, value: &T) -> anyhow::Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating {}", self.dir.display()))?;
        let path = self.path(key);
        let json = serde_json::to_string_pretty(value)?;
        fs::write(&path, json).with_context(|| format!("writing {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use sweeper_core::{Difficulty, GameConfig};

    use super::*;

    fn started_game() -> Game {
        let mut game = Game::new(GameConfig::BEGINNER, true).unwrap();
        game.toggle_flag((8, 8)).unwrap();
        game.reveal((0, 0), &mut SmallRng::seed_from_u64(3)).unwrap();
        game
    }

    #[test]
    fn missing_files_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path().join("nested"));

        assert_eq!(store.load_settings(), Settings::default());
        assert!(store.load_game(&Settings::default()).is_none());
    }

    #[test]
    fn settings_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path());
        let settings = Settings {
            difficulty: Difficulty::Expert,
            haptics: false,
            first_click_safe: false,
        };

        store.save_settings(&settings);

        assert_eq!(store.load_settings(), settings);
    }

    #[test]
    fn game_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path());
        let game = started_game();

        store.save_game(&game);
        let loaded = store.load_game(&Settings::default()).unwrap();

        assert_eq!(loaded.board(), game.board());
        assert_eq!(loaded.status(), game.status());
    }

    #[test]
    fn game_for_other_settings_is_discarded() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path());
        store.save_game(&started_game());

        let expert = Settings {
            difficulty: Difficulty::Expert,
            ..Default::default()
        };
        assert!(store.load_game(&expert).is_none());
    }

    #[test]
    fn corrupt_files_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path());
        fs::write(dir.path().join(Store::GAME_KEY), "{\"board\": 12").unwrap();
        fs::write(dir.path().join(Store::SETTINGS_KEY), "{{{").unwrap();

        assert_eq!(store.load_settings(), Settings::default());
        assert!(store.load_game(&Settings::default()).is_none());
    }

    #[test]
    fn clear_game_removes_saved_game() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path());
        store.save_game(&started_game());

        store.clear_game();

        assert!(store.load_game(&Settings::default()).is_none());
    }
}
