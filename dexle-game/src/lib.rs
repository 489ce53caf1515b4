//! Dexle Game Engine
//!
//! Platform-agnostic core logic for the Dexle daily deduction game.
//! This crate provides target selection, guess scoring, the session state
//! machine and statistics without UI or platform-specific dependencies.

pub mod catalog;
pub mod compare;
pub mod constants;
pub mod engine;
pub mod numbers;
pub mod record;
pub mod seed;
pub mod session;
pub mod share;
pub mod stats;
pub mod storage;

// Re-export commonly used types
pub use catalog::{Catalog, CatalogError, Entity};
pub use compare::{
    Attribute, AttributeFeedback, AttributeReport, AttributeValue, Direction, MatchStatus, compare,
};
pub use engine::{GameEngine, GameError};
pub use record::{RestoreError, SessionRecord};
pub use seed::{daily_index, daily_seed, free_play_index, select_index};
pub use session::{AttemptLimit, GameMode, GuessError, GuessOutcome, Session, SessionStatus};
pub use share::{report_row, share_text};
pub use stats::{DailyStats, FreePlayStats, GuessDistribution, StatsStore};
pub use storage::{MemoryStorage, PersistenceFailure, RecordKind, StorageError};

/// Trait for abstracting catalog loading.
/// Platform-specific implementations should provide this
pub trait CatalogLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the full entity catalog
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog source is missing, malformed or empty.
    fn load_catalog(&self) -> Result<Catalog, Self::Error>;
}

/// Loads the catalog compiled into this crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledCatalog;

impl CatalogLoader for BundledCatalog {
    type Error = CatalogError;

    fn load_catalog(&self) -> Result<Catalog, Self::Error> {
        Catalog::bundled()
    }
}

/// Trait for abstracting save/load of the day's session and the statistics.
/// Platform-specific implementations should provide this
pub trait GameStorage {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the persisted daily session, if any
    ///
    /// # Errors
    ///
    /// Returns an error if the record exists but cannot be read.
    fn load_session(&self) -> Result<Option<SessionRecord>, Self::Error>;

    /// Persist the daily session
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be written.
    fn save_session(&self, record: &SessionRecord) -> Result<(), Self::Error>;

    /// Remove the persisted daily session
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be removed.
    fn clear_session(&self) -> Result<(), Self::Error>;

    /// Load daily statistics, if any
    ///
    /// # Errors
    ///
    /// Returns an error if the record exists but cannot be read.
    fn load_daily_stats(&self) -> Result<Option<DailyStats>, Self::Error>;

    /// Persist daily statistics
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be written.
    fn save_daily_stats(&self, stats: &DailyStats) -> Result<(), Self::Error>;

    /// Load free-play statistics, if any
    ///
    /// # Errors
    ///
    /// Returns an error if the record exists but cannot be read.
    fn load_free_play_stats(&self) -> Result<Option<FreePlayStats>, Self::Error>;

    /// Persist free-play statistics
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be written.
    fn save_free_play_stats(&self, stats: &FreePlayStats) -> Result<(), Self::Error>;
}
