//! Session state machine: one daily or free-play game.
use chrono::NaiveDate;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::catalog::{Catalog, Entity};
use crate::compare::{AttributeReport, compare};
use crate::constants::DAILY_ATTEMPT_LIMIT;
use crate::seed::{daily_index, free_play_index};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum GameMode {
    #[default]
    Daily,
    FreePlay,
}

impl GameMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::FreePlay => "free-play",
        }
    }

    #[must_use]
    pub const fn attempt_limit(self) -> AttemptLimit {
        match self {
            Self::Daily => AttemptLimit::Bounded(DAILY_ATTEMPT_LIMIT),
            Self::FreePlay => AttemptLimit::Unbounded,
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Guess ceiling. Free play has none rather than an infinite sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AttemptLimit {
    Bounded(u8),
    Unbounded,
}

impl AttemptLimit {
    #[must_use]
    pub fn is_reached(self, attempts: u32) -> bool {
        match self {
            Self::Bounded(limit) => attempts >= u32::from(limit),
            Self::Unbounded => false,
        }
    }

    #[must_use]
    pub const fn bound(self) -> Option<u8> {
        match self {
            Self::Bounded(limit) => Some(limit),
            Self::Unbounded => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    #[default]
    Active,
    Won,
    Lost,
}

impl SessionStatus {
    #[must_use]
    pub const fn is_over(self) -> bool {
        !matches!(self, Self::Active)
    }
}

/// Rejections from `Session::submit_guess`. None of them mutate the session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuessError {
    #[error("enter a name to guess")]
    EmptyGuess,
    #[error("'{name}' is not in the catalog")]
    InvalidGuess { name: String },
    #[error("'{name}' was already guessed")]
    DuplicateGuess { name: String },
    #[error("this game is already over")]
    SessionOver,
}

/// Result of an accepted guess.
#[derive(Debug, Clone, PartialEq)]
pub struct GuessOutcome {
    pub entity: Entity,
    pub report: AttributeReport,
    pub attempt: u32,
    pub status: SessionStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    mode: GameMode,
    date: Option<NaiveDate>,
    target: Entity,
    attempt_limit: AttemptLimit,
    history: Vec<Entity>,
    status: SessionStatus,
}

impl Session {
    /// Daily session with the date-seeded target.
    #[must_use]
    pub fn daily(catalog: &Catalog, date: NaiveDate) -> Self {
        let index = daily_index(date, catalog.len());
        let target = catalog.get(index).cloned().unwrap_or_default();
        log::debug!("daily target for {date} is catalog index {index}");
        Self::with_target(GameMode::Daily, target, Some(date))
    }

    /// Free-play session with a uniformly drawn target.
    pub fn free_play<R: Rng + ?Sized>(catalog: &Catalog, rng: &mut R) -> Self {
        let index = free_play_index(rng, catalog.len());
        let target = catalog.get(index).cloned().unwrap_or_default();
        log::debug!("free-play target drawn at catalog index {index}");
        Self::with_target(GameMode::FreePlay, target, None)
    }

    /// Fresh session against an explicit target.
    #[must_use]
    pub fn with_target(mode: GameMode, target: Entity, date: Option<NaiveDate>) -> Self {
        Self {
            mode,
            date,
            target,
            attempt_limit: mode.attempt_limit(),
            history: Vec::new(),
            status: SessionStatus::Active,
        }
    }

    /// Rebuild a session from stored parts, recomputing its status.
    pub(crate) fn from_parts(
        mode: GameMode,
        date: Option<NaiveDate>,
        target: Entity,
        history: Vec<Entity>,
    ) -> Self {
        let mut session = Self::with_target(mode, target, date);
        session.history = history;
        session.status = session.evaluate();
        session
    }

    #[must_use]
    pub const fn mode(&self) -> GameMode {
        self.mode
    }

    #[must_use]
    pub const fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    #[must_use]
    pub const fn target(&self) -> &Entity {
        &self.target
    }

    #[must_use]
    pub const fn attempt_limit(&self) -> AttemptLimit {
        self.attempt_limit
    }

    #[must_use]
    pub fn history(&self) -> &[Entity] {
        &self.history
    }

    #[must_use]
    pub fn attempt_count(&self) -> u32 {
        u32::try_from(self.history.len()).unwrap_or(u32::MAX)
    }

    #[must_use]
    pub fn remaining_attempts(&self) -> Option<u32> {
        self.attempt_limit
            .bound()
            .map(|limit| u32::from(limit).saturating_sub(self.attempt_count()))
    }

    #[must_use]
    pub const fn status(&self) -> SessionStatus {
        self.status
    }

    #[must_use]
    pub const fn is_over(&self) -> bool {
        self.status.is_over()
    }

    #[must_use]
    pub const fn is_won(&self) -> bool {
        matches!(self.status, SessionStatus::Won)
    }

    #[must_use]
    pub fn has_guessed(&self, name: &str) -> bool {
        self.history.iter().any(|entity| entity.same_name(name))
    }

    /// Validate, record and score a guess.
    ///
    /// # Errors
    ///
    /// Returns a `GuessError` without touching the session when the game is
    /// over, the name is blank or unknown, or the entity was already guessed.
    pub fn submit_guess(
        &mut self,
        catalog: &Catalog,
        name: &str,
    ) -> Result<GuessOutcome, GuessError> {
        if self.is_over() {
            return Err(GuessError::SessionOver);
        }
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(GuessError::EmptyGuess);
        }
        let entity = catalog
            .find(trimmed)
            .ok_or_else(|| GuessError::InvalidGuess {
                name: trimmed.to_string(),
            })?;
        if self.has_guessed(&entity.name) {
            return Err(GuessError::DuplicateGuess {
                name: entity.name.clone(),
            });
        }

        self.history.push(entity.clone());
        let report = compare(entity, &self.target);
        self.status = self.evaluate();
        log::debug!(
            "{} guess {} '{}' -> {:?}",
            self.mode,
            self.attempt_count(),
            entity.name,
            self.status
        );

        Ok(GuessOutcome {
            entity: entity.clone(),
            report,
            attempt: self.attempt_count(),
            status: self.status,
        })
    }

    /// Reports for every guess so far, recomputed against the target.
    #[must_use]
    pub fn reports(&self) -> Vec<(&Entity, AttributeReport)> {
        self.history
            .iter()
            .map(|guess| (guess, compare(guess, &self.target)))
            .collect()
    }

    fn evaluate(&self) -> SessionStatus {
        let won = self
            .history
            .last()
            .is_some_and(|last| last.same_name(&self.target.name));
        if won {
            SessionStatus::Won
        } else if self.attempt_limit.is_reached(self.attempt_count()) {
            SessionStatus::Lost
        } else {
            SessionStatus::Active
        }
    }
}
