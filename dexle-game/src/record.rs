//! Persisted daily-session record and its validation on reload.
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{Catalog, Entity};
use crate::seed::daily_index;
use crate::session::{GameMode, Session};

/// Shape written after every accepted daily guess. Entities are stored by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionRecord {
    pub date: Option<NaiveDate>,
    pub mode: Option<GameMode>,
    pub target: Option<String>,
    pub attempt_count: u32,
    pub history: Vec<String>,
    pub is_over: bool,
    pub is_won: bool,
}

/// Why a stored record cannot be resumed. The caller starts a fresh session instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RestoreError {
    #[error("record has no mode")]
    MissingMode,
    #[error("record mode {0} is not resumable")]
    NotDaily(GameMode),
    #[error("record belongs to {recorded:?}, today is {today}")]
    Stale {
        recorded: Option<NaiveDate>,
        today: NaiveDate,
    },
    #[error("record has no target")]
    MissingTarget,
    #[error("record target '{recorded}' is not today's target")]
    TargetMismatch { recorded: String },
    #[error("'{0}' is not in the catalog")]
    UnknownEntity(String),
    #[error("'{0}' appears twice in the history")]
    RepeatedGuess(String),
    #[error("attempt count {recorded} does not match {actual} history entries")]
    CountMismatch { recorded: u32, actual: u32 },
    #[error("history continues past the end of the game")]
    PlayedPastEnd,
    #[error("stored outcome does not match the replayed history")]
    OutcomeMismatch,
}

impl SessionRecord {
    #[must_use]
    pub fn from_session(session: &Session) -> Self {
        Self {
            date: session.date(),
            mode: Some(session.mode()),
            target: Some(session.target().name.clone()),
            attempt_count: session.attempt_count(),
            history: session.history().iter().map(|e| e.name.clone()).collect(),
            is_over: session.is_over(),
            is_won: session.is_won(),
        }
    }

    /// Rebuild today's daily session, re-resolving every name against `catalog`.
    ///
    /// # Errors
    ///
    /// Returns a `RestoreError` when the record is for another day or mode,
    /// names a target other than today's seeded pick, references unknown
    /// entities, or contradicts its own history.
    pub fn restore(&self, catalog: &Catalog, today: NaiveDate) -> Result<Session, RestoreError> {
        match self.mode {
            None => return Err(RestoreError::MissingMode),
            Some(GameMode::Daily) => {}
            Some(other) => return Err(RestoreError::NotDaily(other)),
        }
        if self.date != Some(today) {
            return Err(RestoreError::Stale {
                recorded: self.date,
                today,
            });
        }
        let target_name = self.target.as_deref().ok_or(RestoreError::MissingTarget)?;
        let target = resolve(catalog, target_name)?;
        let seeded = catalog.get(daily_index(today, catalog.len()));
        if !seeded.is_some_and(|seeded| seeded.same_name(&target.name)) {
            return Err(RestoreError::TargetMismatch {
                recorded: target.name,
            });
        }

        let mut history: Vec<Entity> = Vec::with_capacity(self.history.len());
        for name in &self.history {
            let entity = resolve(catalog, name)?;
            if history.iter().any(|seen| seen.same_name(&entity.name)) {
                return Err(RestoreError::RepeatedGuess(entity.name));
            }
            history.push(entity);
        }

        let actual = u32::try_from(history.len()).unwrap_or(u32::MAX);
        if actual != self.attempt_count {
            return Err(RestoreError::CountMismatch {
                recorded: self.attempt_count,
                actual,
            });
        }
        let ended_early = history
            .iter()
            .rev()
            .skip(1)
            .any(|guess| guess.same_name(&target.name));
        let limit = GameMode::Daily.attempt_limit().bound().map(u32::from);
        if ended_early || limit.is_some_and(|limit| actual > limit) {
            return Err(RestoreError::PlayedPastEnd);
        }

        let session = Session::from_parts(GameMode::Daily, Some(today), target, history);
        if session.is_over() != self.is_over || session.is_won() != self.is_won {
            return Err(RestoreError::OutcomeMismatch);
        }
        Ok(session)
    }
}

fn resolve(catalog: &Catalog, name: &str) -> Result<Entity, RestoreError> {
    catalog
        .find(name)
        .cloned()
        .ok_or_else(|| RestoreError::UnknownEntity(name.to_string()))
}
