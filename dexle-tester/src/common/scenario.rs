use anyhow::{Context, Result, ensure};
use chrono::NaiveDate;
use dexle_game::{
    BundledCatalog, Catalog, GameEngine, GameError, GameMode, GuessError, MemoryStorage,
    SessionStatus, daily_index,
};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::logic::GuessStrategy;

/// Number of consecutive days the stats scenario plays.
const STATS_RUN_DAYS: u32 = 7;

pub type Engine = GameEngine<MemoryStorage, ChaCha20Rng>;

/// Inputs for one scenario iteration.
pub struct ScenarioCtx<'a> {
    pub catalog: &'a Catalog,
    pub date: NaiveDate,
    pub seed: u64,
    pub verbose: bool,
}

impl ScenarioCtx<'_> {
    /// Fresh engine with in-memory storage, seeded for this iteration.
    pub fn engine(&self, storage: &MemoryStorage) -> Engine {
        GameEngine::with_catalog(
            self.catalog.clone(),
            storage.clone(),
            ChaCha20Rng::seed_from_u64(self.seed),
            self.date,
        )
    }

    pub fn rng(&self) -> ChaCha20Rng {
        ChaCha20Rng::seed_from_u64(self.seed.rotate_left(17))
    }
}

pub type ScenarioFn = fn(&ScenarioCtx<'_>) -> Result<()>;

#[derive(Clone)]
pub struct TestScenario {
    pub key: &'static str,
    pub name: &'static str,
    pub run: ScenarioFn,
}

const SCENARIOS: &[TestScenario] = &[
    TestScenario {
        key: "smoke",
        name: "Smoke Test",
        run: smoke,
    },
    TestScenario {
        key: "daily-determinism",
        name: "Daily Target Determinism",
        run: daily_determinism,
    },
    TestScenario {
        key: "eliminator-solves",
        name: "Eliminator Solves Free Play",
        run: eliminator_solves,
    },
    TestScenario {
        key: "stats-consistency",
        name: "Statistics Consistency",
        run: stats_consistency,
    },
    TestScenario {
        key: "duplicate-rejection",
        name: "Duplicate Guess Rejection",
        run: duplicate_rejection,
    },
];

#[must_use]
pub fn get_scenario(key: &str) -> Option<&'static TestScenario> {
    let key = key.to_lowercase();
    SCENARIOS.iter().find(|scenario| scenario.key == key)
}

#[must_use]
pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    SCENARIOS.iter().map(|s| (s.key, s.name)).collect()
}

#[must_use]
pub fn all_scenario_keys() -> Vec<String> {
    SCENARIOS.iter().map(|s| s.key.to_string()).collect()
}

/// Play the active session to its end. Returns the final status.
fn play_out(engine: &mut Engine, strategy: GuessStrategy, ctx: &ScenarioCtx<'_>) -> Result<SessionStatus> {
    let mut rng = ctx.rng();
    while !engine.session().is_over() {
        let guess = strategy
            .next_guess(engine.catalog(), engine.session(), &mut rng)
            .context("strategy ran out of guesses before the game ended")?
            .name
            .clone();
        let outcome = engine.submit_guess(&guess)?;
        if ctx.verbose {
            println!(
                "    {} #{} {} -> {:?}",
                strategy.label(),
                outcome.attempt,
                guess,
                outcome.status
            );
        }
    }
    Ok(engine.session().status())
}

fn smoke(ctx: &ScenarioCtx<'_>) -> Result<()> {
    let storage = MemoryStorage::new();
    let mut engine = ctx.engine(&storage);
    let status = play_out(&mut engine, GuessStrategy::Random, ctx)?;
    ensure!(status.is_over(), "daily game should end");
    ensure!(
        engine.session().attempt_count() <= 6,
        "daily game took {} attempts",
        engine.session().attempt_count()
    );
    let stats = storage
        .daily_stats()
        .context("daily statistics were not saved")?;
    ensure!(stats.games_played == 1, "expected one daily game recorded");
    ensure!(
        engine.free_play_unlocked(),
        "free play should unlock after the daily game"
    );
    Ok(())
}

fn daily_determinism(ctx: &ScenarioCtx<'_>) -> Result<()> {
    let first = ctx.engine(&MemoryStorage::new());
    let second = GameEngine::start(
        &BundledCatalog,
        MemoryStorage::new(),
        ChaCha20Rng::seed_from_u64(ctx.seed.wrapping_add(1)),
        ctx.date,
    )?;
    let expected = ctx
        .catalog
        .get(daily_index(ctx.date, ctx.catalog.len()))
        .context("daily index out of range")?;
    ensure!(
        first.session().target() == expected,
        "target {} differs from seeded selection {}",
        first.session().target(),
        expected
    );
    if ctx.catalog == second.catalog() {
        ensure!(
            second.session().target() == expected,
            "independent engines disagree on the daily target"
        );
    }
    Ok(())
}

fn eliminator_solves(ctx: &ScenarioCtx<'_>) -> Result<()> {
    let storage = MemoryStorage::new();
    let mut engine = ctx.engine(&storage);
    match engine.switch_mode(GameMode::FreePlay) {
        Err(GameError::ModeSwitchDenied { .. }) => {}
        other => anyhow::bail!("free play should be locked first, got {other:?}"),
    }
    play_out(&mut engine, GuessStrategy::Eliminator, ctx)?;
    engine.switch_mode(GameMode::FreePlay)?;

    let status = play_out(&mut engine, GuessStrategy::Eliminator, ctx)?;
    ensure!(status == SessionStatus::Won, "free play must end in a win");
    let attempts = engine.session().attempt_count();
    let free = &engine.stats().free_play;
    ensure!(free.games_won == 1, "free-play win not recorded");
    ensure!(
        free.best_score == Some(attempts),
        "best score {:?} does not match {attempts}",
        free.best_score
    );
    Ok(())
}

fn stats_consistency(ctx: &ScenarioCtx<'_>) -> Result<()> {
    let storage = MemoryStorage::new();
    let mut engine = ctx.engine(&storage);
    let mut wins = 0;
    for day in ctx.date.iter_days().take(STATS_RUN_DAYS as usize) {
        engine.set_today(day);
        let strategy = if ctx.seed % 2 == 0 {
            GuessStrategy::Random
        } else {
            GuessStrategy::Eliminator
        };
        if play_out(&mut engine, strategy, ctx)? == SessionStatus::Won {
            wins += 1;
        }
    }

    let stats = &engine.stats().daily;
    ensure!(
        stats.games_played == STATS_RUN_DAYS,
        "played {}",
        stats.games_played
    );
    ensure!(stats.games_won == wins, "won {} vs {wins}", stats.games_won);
    ensure!(stats.max_streak >= stats.current_streak, "streak ordering");
    let bucketed: u32 = stats.guess_distribution.buckets().map(|(_, n)| n).sum();
    ensure!(bucketed == stats.games_won, "distribution sums to {bucketed}");
    ensure!(
        storage.daily_stats().as_ref() == Some(stats),
        "persisted statistics diverged from memory"
    );
    Ok(())
}

fn duplicate_rejection(ctx: &ScenarioCtx<'_>) -> Result<()> {
    let storage = MemoryStorage::new();
    let mut engine = ctx.engine(&storage);
    let target = engine.session().target().name.clone();
    let decoy = ctx
        .catalog
        .iter()
        .find(|entity| entity.name != target)
        .context("catalog has a single entity")?
        .name
        .clone();
    engine.submit_guess(&decoy)?;
    let before = storage.session();

    let again = engine.submit_guess(&decoy.to_uppercase());
    ensure!(
        matches!(
            again,
            Err(GameError::Guess(GuessError::DuplicateGuess { .. }))
        ),
        "duplicate accepted: {again:?}"
    );
    ensure!(engine.session().attempt_count() == 1, "attempt consumed");
    ensure!(storage.session() == before, "duplicate touched storage");
    Ok(())
}
