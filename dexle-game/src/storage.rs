//! In-memory storage gateway and the persistence failure vocabulary.
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use thiserror::Error;

use crate::GameStorage;
use crate::record::SessionRecord;
use crate::stats::{DailyStats, FreePlayStats};

/// The three independently persisted records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Session,
    DailyStats,
    FreePlayStats,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Session => f.write_str("daily session"),
            Self::DailyStats => f.write_str("daily statistics"),
            Self::FreePlayStats => f.write_str("free-play statistics"),
        }
    }
}

/// A gateway failure the engine absorbed instead of propagating.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PersistenceFailure {
    #[error("could not read {record}: {message}")]
    Read { record: RecordKind, message: String },
    #[error("could not write {record}: {message}")]
    Write { record: RecordKind, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("storage is unavailable for reads")]
    ReadUnavailable,
    #[error("storage is unavailable for writes")]
    WriteUnavailable,
}

#[derive(Debug, Default)]
struct MemorySlots {
    session: Option<SessionRecord>,
    daily: Option<DailyStats>,
    free_play: Option<FreePlayStats>,
    fail_reads: bool,
    fail_writes: bool,
}

/// Shared in-memory store. Clones observe the same records.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slots: Rc<RefCell<MemorySlots>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent read fail.
    pub fn fail_reads(&self, fail: bool) {
        self.slots.borrow_mut().fail_reads = fail;
    }

    /// Make every subsequent write fail.
    pub fn fail_writes(&self, fail: bool) {
        self.slots.borrow_mut().fail_writes = fail;
    }

    #[must_use]
    pub fn session(&self) -> Option<SessionRecord> {
        self.slots.borrow().session.clone()
    }

    #[must_use]
    pub fn daily_stats(&self) -> Option<DailyStats> {
        self.slots.borrow().daily.clone()
    }

    #[must_use]
    pub fn free_play_stats(&self) -> Option<FreePlayStats> {
        self.slots.borrow().free_play.clone()
    }

    fn read<T>(&self, pick: impl FnOnce(&MemorySlots) -> Option<T>) -> Result<Option<T>, StorageError> {
        let slots = self.slots.borrow();
        if slots.fail_reads {
            return Err(StorageError::ReadUnavailable);
        }
        Ok(pick(&slots))
    }

    fn write(&self, put: impl FnOnce(&mut MemorySlots)) -> Result<(), StorageError> {
        let mut slots = self.slots.borrow_mut();
        if slots.fail_writes {
            return Err(StorageError::WriteUnavailable);
        }
        put(&mut slots);
        Ok(())
    }
}

impl GameStorage for MemoryStorage {
    type Error = StorageError;

    fn load_session(&self) -> Result<Option<SessionRecord>, Self::Error> {
        self.read(|slots| slots.session.clone())
    }

    fn save_session(&self, record: &SessionRecord) -> Result<(), Self::Error> {
        self.write(|slots| slots.session = Some(record.clone()))
    }

    fn clear_session(&self) -> Result<(), Self::Error> {
        self.write(|slots| slots.session = None)
    }

    fn load_daily_stats(&self) -> Result<Option<DailyStats>, Self::Error> {
        self.read(|slots| slots.daily.clone())
    }

    fn save_daily_stats(&self, stats: &DailyStats) -> Result<(), Self::Error> {
        self.write(|slots| slots.daily = Some(stats.clone()))
    }

    fn load_free_play_stats(&self) -> Result<Option<FreePlayStats>, Self::Error> {
        self.read(|slots| slots.free_play.clone())
    }

    fn save_free_play_stats(&self, stats: &FreePlayStats) -> Result<(), Self::Error> {
        self.write(|slots| slots.free_play = Some(stats.clone()))
    }
}
