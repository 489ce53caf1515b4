pub mod reports;
pub mod strategy;
pub mod tester;

pub use strategy::GuessStrategy;
pub use tester::{LogicTester, ScenarioResult};
