use chrono::NaiveDate;
use colored::Colorize;
use dexle_game::Catalog;
use serde::Serialize;
use std::time::{Duration, Instant};

use crate::common::scenario::{ScenarioCtx, TestScenario};

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioResult {
    pub scenario_name: String,
    pub date: NaiveDate,
    pub passed: bool,
    pub iterations_run: usize,
    pub successful_iterations: usize,
    pub failures: Vec<String>,
    #[serde(serialize_with = "duration_serde::serialize")]
    pub average_duration: Duration,
    #[serde(serialize_with = "duration_vec_serde::serialize")]
    pub performance_data: Vec<Duration>,
}

pub struct LogicTester {
    catalog: Catalog,
    verbose: bool,
}

impl LogicTester {
    pub const fn new(catalog: Catalog, verbose: bool) -> Self {
        Self { catalog, verbose }
    }

    pub fn run_scenario(
        &self,
        scenario: &TestScenario,
        dates: &[NaiveDate],
        iterations: usize,
    ) -> Vec<ScenarioResult> {
        dates
            .iter()
            .map(|&date| {
                if self.verbose {
                    println!(
                        "🧪 Testing scenario: {} (date: {date})",
                        scenario.name.bright_white()
                    );
                }
                self.run_single_scenario(scenario, date, iterations)
            })
            .collect()
    }

    fn run_single_scenario(
        &self,
        scenario: &TestScenario,
        date: NaiveDate,
        iterations: usize,
    ) -> ScenarioResult {
        let mut successes = 0;
        let mut failures = Vec::new();
        let mut performance_data = Vec::new();

        for i in 0..iterations {
            let ctx = ScenarioCtx {
                catalog: &self.catalog,
                date,
                seed: u64::try_from(i).unwrap_or(u64::MAX),
                verbose: self.verbose,
            };
            let start_time = Instant::now();
            match (scenario.run)(&ctx) {
                Ok(()) => {
                    successes += 1;
                    let duration = start_time.elapsed();
                    performance_data.push(duration);
                    if self.verbose {
                        println!("  ✅ Iteration {}/{iterations} passed ({duration:?})", i + 1);
                    }
                }
                Err(err) => {
                    log::debug!("{} iteration {} failed: {err:#}", scenario.key, i + 1);
                    if self.verbose {
                        println!(
                            "  ❌ Iteration {}/{iterations} failed: {}",
                            i + 1,
                            format!("{err:#}").red()
                        );
                    }
                    failures.push(format!("Iteration {} (seed {}): {err:#}", i + 1, ctx.seed));
                }
            }
        }

        let average_duration = if performance_data.is_empty() {
            Duration::ZERO
        } else {
            performance_data.iter().sum::<Duration>()
                / u32::try_from(performance_data.len()).unwrap_or(1)
        };

        ScenarioResult {
            scenario_name: scenario.name.to_string(),
            date,
            passed: failures.is_empty(),
            iterations_run: iterations,
            successful_iterations: successes,
            failures,
            average_duration,
            performance_data,
        }
    }
}

mod duration_serde {
    use serde::{Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_micros().serialize(serializer)
    }
}

mod duration_vec_serde {
    use serde::{Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(durations: &[Duration], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let micros: Vec<u128> = durations.iter().map(Duration::as_micros).collect();
        micros.serialize(serializer)
    }
}
