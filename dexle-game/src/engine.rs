//! Command surface tying catalog, sessions, statistics and storage together.
use chrono::NaiveDate;
use rand::Rng;
use thiserror::Error;

use crate::catalog::{Catalog, Entity};
use crate::record::SessionRecord;
use crate::session::{GameMode, GuessError, GuessOutcome, Session};
use crate::share::share_text;
use crate::stats::StatsStore;
use crate::storage::{PersistenceFailure, RecordKind};
use crate::{CatalogLoader, GameStorage};

/// Errors surfaced to front ends. Persistence problems are absorbed, not returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("catalog unavailable: {0}")]
    CatalogUnavailable(String),
    #[error(transparent)]
    Guess(#[from] GuessError),
    #[error("free play unlocks after today's daily game ({today}) is finished")]
    ModeSwitchDenied { today: NaiveDate },
}

/// Main game engine owning one player's sessions and statistics.
pub struct GameEngine<S, R>
where
    S: GameStorage,
    R: Rng,
{
    catalog: Catalog,
    storage: S,
    rng: R,
    today: NaiveDate,
    stats: StatsStore,
    daily: Session,
    free_play: Option<Session>,
    mode: GameMode,
    warnings: Vec<PersistenceFailure>,
}

impl<S, R> GameEngine<S, R>
where
    S: GameStorage,
    R: Rng,
{
    /// Load the catalog and resume or begin today's game.
    ///
    /// # Errors
    ///
    /// Returns `GameError::CatalogUnavailable` if the catalog cannot be loaded.
    pub fn start<L: CatalogLoader>(
        loader: &L,
        storage: S,
        rng: R,
        today: NaiveDate,
    ) -> Result<Self, GameError> {
        let catalog = loader.load_catalog().map_err(|err| {
            log::error!("catalog failed to load: {err}");
            GameError::CatalogUnavailable(err.to_string())
        })?;
        Ok(Self::with_catalog(catalog, storage, rng, today))
    }

    /// Resume or begin today's game against an already loaded catalog.
    pub fn with_catalog(catalog: Catalog, storage: S, rng: R, today: NaiveDate) -> Self {
        let daily = Session::daily(&catalog, today);
        let mut engine = Self {
            catalog,
            storage,
            rng,
            today,
            stats: StatsStore::default(),
            daily,
            free_play: None,
            mode: GameMode::Daily,
            warnings: Vec::new(),
        };
        engine.load_stats();
        engine.daily = engine.load_daily_session();
        engine
    }

    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    #[must_use]
    pub const fn today(&self) -> NaiveDate {
        self.today
    }

    #[must_use]
    pub const fn mode(&self) -> GameMode {
        self.mode
    }

    #[must_use]
    pub const fn stats(&self) -> &StatsStore {
        &self.stats
    }

    #[must_use]
    pub const fn daily_session(&self) -> &Session {
        &self.daily
    }

    #[must_use]
    pub const fn free_play_session(&self) -> Option<&Session> {
        self.free_play.as_ref()
    }

    /// The session commands currently apply to.
    #[must_use]
    pub fn session(&self) -> &Session {
        match (self.mode, self.free_play.as_ref()) {
            (GameMode::FreePlay, Some(session)) => session,
            _ => &self.daily,
        }
    }

    /// Free play opens once today's daily game has reached a terminal state.
    #[must_use]
    pub fn free_play_unlocked(&self) -> bool {
        let finished_today = self.daily.is_over() && self.daily.date() == Some(self.today);
        finished_today || self.stats.daily.played_on(self.today)
    }

    #[must_use]
    pub fn suggest(&self, term: &str) -> Vec<&Entity> {
        self.catalog
            .suggest(term, None)
            .into_iter()
            .filter(|entity| !self.session().has_guessed(&entity.name))
            .collect()
    }

    #[must_use]
    pub fn share_text(&self) -> String {
        share_text(self.session(), &self.today.format("%Y-%m-%d").to_string())
    }

    /// Drain persistence failures absorbed since the last call.
    pub fn take_persistence_warnings(&mut self) -> Vec<PersistenceFailure> {
        std::mem::take(&mut self.warnings)
    }

    /// Submit a guess to the active session.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Guess` for rejected guesses; nothing is mutated then.
    pub fn submit_guess(&mut self, name: &str) -> Result<GuessOutcome, GameError> {
        let session = match (self.mode, self.free_play.as_mut()) {
            (GameMode::FreePlay, Some(session)) => session,
            _ => &mut self.daily,
        };
        let outcome = session.submit_guess(&self.catalog, name)?;
        let mode = session.mode();
        let attempts = session.attempt_count();

        if mode == GameMode::Daily {
            let record = SessionRecord::from_session(session);
            self.persist(RecordKind::Session, |storage| storage.save_session(&record));
        }

        if outcome.status.is_over() {
            log::info!(
                "{mode} game over after {attempts} attempts: {:?}",
                outcome.status
            );
            self.stats.record(mode, outcome.status, attempts, self.today);
            self.save_stats(mode);
        }

        Ok(outcome)
    }

    /// Discard a session and start over.
    ///
    /// `Some(Daily)` replays today's daily target, `Some(FreePlay)` draws a
    /// new free-play target, and `None` is a full reset back to daily.
    ///
    /// # Errors
    ///
    /// Returns `GameError::ModeSwitchDenied` when resetting into a locked free play.
    pub fn reset(&mut self, mode: Option<GameMode>) -> Result<(), GameError> {
        match mode {
            Some(GameMode::FreePlay) => {
                self.ensure_free_play_unlocked()?;
                self.free_play = Some(Session::free_play(&self.catalog, &mut self.rng));
                self.mode = GameMode::FreePlay;
            }
            Some(GameMode::Daily) => {
                self.clear_daily();
                self.mode = GameMode::Daily;
            }
            None => {
                self.clear_daily();
                self.free_play = None;
                self.mode = GameMode::Daily;
            }
        }
        log::debug!("reset to {}", self.mode);
        Ok(())
    }

    /// Change the active mode.
    ///
    /// Switching to daily always succeeds. Switching to free play keeps an
    /// unfinished free-play game, or draws a new target.
    ///
    /// # Errors
    ///
    /// Returns `GameError::ModeSwitchDenied` if today's daily game is not finished.
    pub fn switch_mode(&mut self, mode: GameMode) -> Result<(), GameError> {
        if mode == GameMode::FreePlay {
            self.ensure_free_play_unlocked()?;
            let resumable = self.free_play.as_ref().is_some_and(|s| !s.is_over());
            if !resumable {
                self.free_play = Some(Session::free_play(&self.catalog, &mut self.rng));
            }
        }
        self.mode = mode;
        Ok(())
    }

    /// Move the engine to `date`. A new calendar day starts a new daily game.
    pub fn set_today(&mut self, date: NaiveDate) {
        if date == self.today {
            return;
        }
        log::info!("calendar day changed from {} to {date}", self.today);
        self.today = date;
        self.daily = self.load_daily_session();
        self.free_play = None;
        self.mode = GameMode::Daily;
    }

    fn ensure_free_play_unlocked(&self) -> Result<(), GameError> {
        if self.free_play_unlocked() {
            Ok(())
        } else {
            Err(GameError::ModeSwitchDenied { today: self.today })
        }
    }

    fn clear_daily(&mut self) {
        self.persist(RecordKind::Session, S::clear_session);
        self.daily = Session::daily(&self.catalog, self.today);
    }

    fn load_stats(&mut self) {
        match self.storage.load_daily_stats() {
            Ok(stats) => self.stats.daily = stats.unwrap_or_default(),
            Err(err) => self.absorb_read(RecordKind::DailyStats, &err),
        }
        match self.storage.load_free_play_stats() {
            Ok(stats) => self.stats.free_play = stats.unwrap_or_default(),
            Err(err) => self.absorb_read(RecordKind::FreePlayStats, &err),
        }
    }

    fn load_daily_session(&mut self) -> Session {
        match self.storage.load_session() {
            Ok(Some(record)) => match record.restore(&self.catalog, self.today) {
                Ok(session) => {
                    log::debug!(
                        "resumed daily session with {} guesses",
                        session.attempt_count()
                    );
                    return session;
                }
                Err(err) => log::info!("starting a fresh daily session: {err}"),
            },
            Ok(None) => {}
            Err(err) => self.absorb_read(RecordKind::Session, &err),
        }
        Session::daily(&self.catalog, self.today)
    }

    fn save_stats(&mut self, mode: GameMode) {
        match mode {
            GameMode::Daily => {
                let stats = self.stats.daily.clone();
                self.persist(RecordKind::DailyStats, |storage| {
                    storage.save_daily_stats(&stats)
                });
            }
            GameMode::FreePlay => {
                let stats = self.stats.free_play.clone();
                self.persist(RecordKind::FreePlayStats, |storage| {
                    storage.save_free_play_stats(&stats)
                });
            }
        }
    }

    fn persist(&mut self, record: RecordKind, write: impl FnOnce(&S) -> Result<(), S::Error>) {
        if let Err(err) = write(&self.storage) {
            log::warn!("skipping save of {record}: {err}");
            self.warnings.push(PersistenceFailure::Write {
                record,
                message: err.to_string(),
            });
        }
    }

    fn absorb_read(&mut self, record: RecordKind, err: &S::Error) {
        log::warn!("could not read {record}, using defaults: {err}");
        self.warnings.push(PersistenceFailure::Read {
            record,
            message: err.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use crate::{BundledCatalog, CatalogError};
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    struct BrokenLoader;

    impl CatalogLoader for BrokenLoader {
        type Error = CatalogError;

        fn load_catalog(&self) -> Result<Catalog, Self::Error> {
            Catalog::from_json("[]")
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, 9).unwrap()
    }

    fn engine(storage: MemoryStorage) -> GameEngine<MemoryStorage, ChaCha20Rng> {
        GameEngine::start(
            &BundledCatalog,
            storage,
            ChaCha20Rng::seed_from_u64(5),
            date(),
        )
        .unwrap()
    }

    fn wrong_guesses(engine: &GameEngine<MemoryStorage, ChaCha20Rng>, count: usize) -> Vec<String> {
        let target = engine.session().target().name.clone();
        engine
            .catalog()
            .iter()
            .filter(|e| e.name != target)
            .take(count)
            .map(|e| e.name.clone())
            .collect()
    }

    #[test]
    fn empty_catalog_is_fatal() {
        let result = GameEngine::start(
            &BrokenLoader,
            MemoryStorage::new(),
            ChaCha20Rng::seed_from_u64(1),
            date(),
        );
        assert!(matches!(result, Err(GameError::CatalogUnavailable(_))));
    }

    #[test]
    fn accepted_guesses_are_saved_and_resumed() {
        let storage = MemoryStorage::new();
        let mut engine = engine(storage.clone());
        let guesses = wrong_guesses(&engine, 2);
        for guess in &guesses {
            engine.submit_guess(guess).unwrap();
        }
        let record = storage.session().unwrap();
        assert_eq!(record.history, guesses);

        let resumed = self::engine(storage);
        assert_eq!(resumed.session().attempt_count(), 2);
        assert_eq!(resumed.session().target(), engine.session().target());
    }

    #[test]
    fn rejected_guess_does_not_touch_storage() {
        let storage = MemoryStorage::new();
        let mut engine = engine(storage.clone());
        let err = engine.submit_guess("Agumon").unwrap_err();
        assert!(matches!(
            err,
            GameError::Guess(GuessError::InvalidGuess { .. })
        ));
        assert!(storage.session().is_none());
        assert_eq!(engine.session().attempt_count(), 0);
    }

    #[test]
    fn free_play_is_gated_on_finishing_daily() {
        let mut engine = engine(MemoryStorage::new());
        assert_eq!(
            engine.switch_mode(GameMode::FreePlay),
            Err(GameError::ModeSwitchDenied { today: date() })
        );
        assert_eq!(engine.mode(), GameMode::Daily);
        assert!(engine.reset(Some(GameMode::FreePlay)).is_err());

        let target = engine.session().target().name.clone();
        engine.submit_guess(&target).unwrap();
        assert!(engine.free_play_unlocked());
        engine.switch_mode(GameMode::FreePlay).unwrap();
        assert_eq!(engine.mode(), GameMode::FreePlay);
        assert_eq!(engine.session().mode(), GameMode::FreePlay);
        assert!(engine.daily_session().is_won());
        assert!(engine.free_play_session().is_some());

        engine.switch_mode(GameMode::Daily).unwrap();
        assert!(engine.session().is_won());
    }

    #[test]
    fn daily_termination_updates_stats_once() {
        let storage = MemoryStorage::new();
        let mut engine = engine(storage.clone());
        for guess in wrong_guesses(&engine, 6) {
            engine.submit_guess(&guess).unwrap();
        }
        assert!(engine.session().is_over());
        assert!(!engine.session().is_won());
        let extra = engine.submit_guess(&engine.session().target().name.clone());
        assert_eq!(extra, Err(GameError::Guess(GuessError::SessionOver)));

        let stats = storage.daily_stats().unwrap();
        assert_eq!(stats.games_played, 1);
        assert_eq!(stats.current_streak, 0);
        assert_eq!(stats.last_played_date, Some(date()));
    }

    #[test]
    fn persistence_failures_never_break_play() {
        let storage = MemoryStorage::new();
        storage.fail_reads(true);
        storage.fail_writes(true);
        let mut engine = engine(storage);
        let read_warnings = engine.take_persistence_warnings();
        assert_eq!(read_warnings.len(), 3);

        let target = engine.session().target().name.clone();
        let outcome = engine.submit_guess(&target).unwrap();
        assert!(outcome.status.is_over());
        assert_eq!(engine.stats().daily.games_won, 1);
        let write_warnings = engine.take_persistence_warnings();
        assert!(write_warnings
            .iter()
            .all(|w| matches!(w, PersistenceFailure::Write { .. })));
        assert_eq!(write_warnings.len(), 2);
    }

    #[test]
    fn restored_finished_daily_unlocks_free_play_without_stats() {
        let storage = MemoryStorage::new();
        let mut first = engine(storage.clone());
        let target = first.session().target().name.clone();
        first.submit_guess(&target).unwrap();

        let session_only = MemoryStorage::new();
        session_only.save_session(&storage.session().unwrap()).unwrap();
        let mut second = engine(session_only);
        assert!(second.daily_session().is_won());
        assert_eq!(second.stats().daily.games_played, 0);
        assert!(second.free_play_unlocked());
        second.switch_mode(GameMode::FreePlay).unwrap();
        assert_eq!(second.mode(), GameMode::FreePlay);
    }

    #[test]
    fn record_with_foreign_target_starts_todays_game() {
        let seeded = engine(MemoryStorage::new()).session().target().clone();
        let (other, guess) = {
            let catalog = Catalog::bundled().unwrap();
            let mut names = catalog
                .iter()
                .filter(|e| e.name != seeded.name)
                .map(|e| e.name.clone());
            (names.next().unwrap(), names.next().unwrap())
        };
        let storage = MemoryStorage::new();
        storage
            .save_session(&SessionRecord {
                date: Some(date()),
                mode: Some(GameMode::Daily),
                target: Some(other),
                attempt_count: 1,
                history: vec![guess],
                is_over: false,
                is_won: false,
            })
            .unwrap();

        let engine = engine(storage);
        assert_eq!(engine.session().target(), &seeded);
        assert_eq!(engine.session().attempt_count(), 0);
    }

    #[test]
    fn full_reset_clears_record_and_free_play() {
        let storage = MemoryStorage::new();
        let mut engine = engine(storage.clone());
        let target = engine.session().target().name.clone();
        engine.submit_guess(&target).unwrap();
        engine.switch_mode(GameMode::FreePlay).unwrap();

        engine.reset(None).unwrap();
        assert_eq!(engine.mode(), GameMode::Daily);
        assert!(engine.free_play_session().is_none());
        assert!(storage.session().is_none());
        assert_eq!(engine.session().attempt_count(), 0);
        assert_eq!(engine.session().target().name, target);
        assert_eq!(engine.stats().daily.games_won, 1);
    }

    #[test]
    fn new_day_replaces_daily_session() {
        let storage = MemoryStorage::new();
        let mut engine = engine(storage);
        let target = engine.session().target().name.clone();
        engine.submit_guess(&target).unwrap();
        engine.switch_mode(GameMode::FreePlay).unwrap();

        let tomorrow = date().succ_opt().unwrap();
        engine.set_today(tomorrow);
        assert_eq!(engine.mode(), GameMode::Daily);
        assert_eq!(engine.session().date(), Some(tomorrow));
        assert_eq!(engine.session().attempt_count(), 0);
        assert!(!engine.free_play_unlocked());
    }

    #[test]
    fn suggestions_skip_guessed_names() {
        let mut engine = engine(MemoryStorage::new());
        let first = wrong_guesses(&engine, 1).remove(0);
        engine.submit_guess(&first).unwrap();
        let term = first.to_lowercase();
        assert!(engine
            .suggest(&term)
            .iter()
            .all(|entity| entity.name != first));
    }
}
