//! Aggregate statistics for daily and free-play games.
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::constants::DAILY_ATTEMPT_LIMIT;
use crate::numbers::{rounded_percentage, u32_to_f64};
use crate::session::{GameMode, SessionStatus};

/// Wins bucketed by attempt count, `1..=DAILY_ATTEMPT_LIMIT`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GuessDistribution(BTreeMap<u8, u32>);

impl Default for GuessDistribution {
    fn default() -> Self {
        Self((1..=DAILY_ATTEMPT_LIMIT).map(|bucket| (bucket, 0)).collect())
    }
}

impl GuessDistribution {
    #[must_use]
    pub fn get(&self, bucket: u8) -> u32 {
        self.0.get(&bucket).copied().unwrap_or(0)
    }

    /// Count one win. Attempts outside `1..=limit` are ignored.
    pub fn increment(&mut self, attempts: u32) {
        let Ok(bucket) = u8::try_from(attempts) else {
            return;
        };
        if (1..=DAILY_ATTEMPT_LIMIT).contains(&bucket) {
            *self.0.entry(bucket).or_insert(0) += 1;
        }
    }

    /// Every bucket in order, including empty ones.
    pub fn buckets(&self) -> impl Iterator<Item = (u8, u32)> + '_ {
        (1..=DAILY_ATTEMPT_LIMIT).map(|bucket| (bucket, self.get(bucket)))
    }

    #[must_use]
    pub fn peak(&self) -> u32 {
        self.buckets().map(|(_, count)| count).max().unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct DailyStats {
    pub games_played: u32,
    pub games_won: u32,
    pub current_streak: u32,
    pub max_streak: u32,
    pub guess_distribution: GuessDistribution,
    pub last_played_date: Option<NaiveDate>,
}

impl DailyStats {
    pub fn record(&mut self, won: bool, attempts: u32, date: NaiveDate) {
        self.games_played += 1;
        if won {
            self.games_won += 1;
            self.current_streak += 1;
            self.guess_distribution.increment(attempts);
        } else {
            self.current_streak = 0;
        }
        self.max_streak = self.max_streak.max(self.current_streak);
        self.last_played_date = Some(date);
    }

    #[must_use]
    pub fn win_percentage(&self) -> u32 {
        rounded_percentage(self.games_won, self.games_played)
    }

    #[must_use]
    pub fn played_on(&self, date: NaiveDate) -> bool {
        self.last_played_date == Some(date)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct FreePlayStats {
    pub games_played: u32,
    pub games_won: u32,
    pub total_winning_attempts: u64,
    /// Fewest attempts across wins; absent until the first win.
    pub best_score: Option<u32>,
}

impl FreePlayStats {
    pub fn record(&mut self, won: bool, attempts: u32) {
        self.games_played += 1;
        if won {
            self.games_won += 1;
            self.total_winning_attempts += u64::from(attempts);
            self.best_score = Some(self.best_score.map_or(attempts, |best| best.min(attempts)));
        }
    }

    #[must_use]
    pub fn win_percentage(&self) -> u32 {
        rounded_percentage(self.games_won, self.games_played)
    }

    #[must_use]
    pub fn average_winning_attempts(&self) -> Option<f64> {
        if self.games_won == 0 {
            return None;
        }
        let total = u32::try_from(self.total_winning_attempts).unwrap_or(u32::MAX);
        Some(u32_to_f64(total) / u32_to_f64(self.games_won))
    }
}

/// Both aggregates, owned by the engine for the process lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatsStore {
    pub daily: DailyStats,
    pub free_play: FreePlayStats,
}

impl StatsStore {
    /// Fold a finished game into the aggregate for `mode`.
    pub fn record(&mut self, mode: GameMode, status: SessionStatus, attempts: u32, date: NaiveDate) {
        let won = matches!(status, SessionStatus::Won);
        match mode {
            GameMode::Daily => self.daily.record(won, attempts, date),
            GameMode::FreePlay => self.free_play.record(won, attempts),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
    }

    #[test]
    fn daily_win_on_third_guess_updates_one_bucket() {
        let mut stats = DailyStats::default();
        stats.guess_distribution.increment(1);
        let before = stats.guess_distribution.clone();

        stats.record(true, 3, day(1));

        for (bucket, count) in stats.guess_distribution.buckets() {
            let expected = before.get(bucket) + u32::from(bucket == 3);
            assert_eq!(count, expected, "bucket {bucket}");
        }
        assert_eq!(stats.current_streak, 1);
        assert!(stats.max_streak >= stats.current_streak);
        assert!(stats.played_on(day(1)));
    }

    #[test]
    fn loss_resets_current_streak_but_keeps_max() {
        let mut stats = DailyStats::default();
        stats.record(true, 2, day(1));
        stats.record(true, 4, day(2));
        stats.record(false, 6, day(3));
        assert_eq!(stats.games_played, 3);
        assert_eq!(stats.games_won, 2);
        assert_eq!(stats.current_streak, 0);
        assert_eq!(stats.max_streak, 2);
        assert_eq!(stats.win_percentage(), 67);
        assert_eq!(stats.guess_distribution.peak(), 1);
    }

    #[test]
    fn free_play_tracks_best_and_average() {
        let mut stats = FreePlayStats::default();
        assert!(stats.best_score.is_none());
        assert!(stats.average_winning_attempts().is_none());
        stats.record(true, 9);
        stats.record(true, 4);
        stats.record(true, 7);
        assert_eq!(stats.best_score, Some(4));
        assert_eq!(stats.total_winning_attempts, 20);
        let avg = stats.average_winning_attempts().unwrap();
        assert!((avg - 20.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn records_serialize_without_infinity_sentinel() {
        let stats = FreePlayStats::default();
        let json = serde_json::to_value(&stats).unwrap();
        assert!(json["bestScore"].is_null());

        let daily: DailyStats = serde_json::from_str(
            r#"{"gamesPlayed":4,"guessDistribution":{"1":0,"2":3,"3":1,"4":0,"5":0,"6":0}}"#,
        )
        .unwrap();
        assert_eq!(daily.games_played, 4);
        assert_eq!(daily.guess_distribution.get(2), 3);
        assert_eq!(daily.current_streak, 0);
        assert!(daily.last_played_date.is_none());
    }

    #[test]
    fn out_of_range_attempts_are_not_bucketed() {
        let mut dist = GuessDistribution::default();
        dist.increment(0);
        dist.increment(7);
        assert_eq!(dist.peak(), 0);
        assert_eq!(dist.buckets().count(), usize::from(DAILY_ATTEMPT_LIMIT));
    }

    #[test]
    fn store_routes_by_mode() {
        let mut store = StatsStore::default();
        store.record(GameMode::FreePlay, SessionStatus::Won, 12, day(5));
        store.record(GameMode::Daily, SessionStatus::Lost, 6, day(5));
        assert_eq!(store.free_play.games_won, 1);
        assert_eq!(store.daily.games_played, 1);
        assert_eq!(store.daily.games_won, 0);
        assert!(store.daily.played_on(day(5)));
    }
}
