use anyhow::{Result, ensure};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use crate::common::scenario::TestScenario;
use crate::logic::simulation::{SimulationPlan, SimulationSummary, run_plan};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario_name: String,
    pub seed: u64,
    pub passed: bool,
    pub iterations_run: usize,
    pub successful_iterations: usize,
    /// Extra attempts spent on rejected games.
    pub retries: u32,
    /// Winning faction label ("Town", "Mafia" or "Stalemate") to game count.
    pub outcomes: BTreeMap<String, usize>,
    pub failures: Vec<String>,
    #[serde(with = "duration_serde")]
    pub average_duration: Duration,
    #[serde(with = "duration_vec_serde")]
    pub performance_data: Vec<Duration>,
}

impl ScenarioResult {
    /// Synthetic failed result for harness-level problems.
    #[must_use]
    pub fn harness_failure(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            scenario_name: name.into(),
            seed: 0,
            passed: false,
            iterations_run: 0,
            successful_iterations: 0,
            retries: 0,
            outcomes: BTreeMap::new(),
            failures: vec![message.into()],
            average_duration: Duration::ZERO,
            performance_data: Vec::new(),
        }
    }
}

/// Runtime knobs shared by every scenario in a batch.
#[derive(Debug, Clone)]
pub struct TesterOptions {
    pub roster: Vec<String>,
    pub attempts: u32,
    pub verbose: bool,
    pub print_transcripts: bool,
}

pub struct LogicTester {
    options: TesterOptions,
}

impl LogicTester {
    pub const fn new(options: TesterOptions) -> Self {
        Self { options }
    }

    pub fn run_scenario(
        &self,
        scenario: &TestScenario,
        seeds: &[u64],
        iterations: usize,
    ) -> Vec<ScenarioResult> {
        let mut results = Vec::new();

        for &seed in seeds {
            if self.options.verbose {
                println!(
                    "🧪 Testing scenario: {} (seed: {})",
                    scenario.name.bright_white(),
                    seed
                );
            }
            results.push(self.run_single_scenario(scenario, seed, iterations));
        }

        results
    }

    fn run_single_scenario(
        &self,
        scenario: &TestScenario,
        seed: u64,
        iterations: usize,
    ) -> ScenarioResult {
        let mut successes = 0;
        let mut retries = 0;
        let mut failures = Vec::new();
        let mut performance_data = Vec::new();
        let mut outcomes: BTreeMap<String, usize> = BTreeMap::new();
        let roster = scenario.plan.roster(&self.options.roster);

        for i in 0..iterations {
            let start_time = Instant::now();
            let iteration_seed = seed.wrapping_add(u64::try_from(i).unwrap_or(u64::MAX));

            let summary = match run_plan(
                &scenario.plan,
                roster.clone(),
                iteration_seed,
                self.options.attempts,
            ) {
                Ok(summary) => summary,
                Err(err) => {
                    failures.push(format!("Iteration {}: {err:#}", i + 1));
                    if self.options.verbose {
                        println!("  ❌ Iteration {}/{} aborted: {}", i + 1, iterations, err);
                    }
                    continue;
                }
            };
            retries += summary.attempts.saturating_sub(1);
            *outcomes.entry(outcome_label(&summary)).or_default() += 1;

            if self.options.print_transcripts {
                print_transcript(&scenario.name, &summary);
            }

            if let Some(err) = evaluate_expectations(&scenario.plan, &summary) {
                failures.push(format!(
                    "Iteration {} (seed {}, effective seed {}, days {}, outcome {}): {}",
                    i + 1,
                    summary.requested_seed,
                    summary.effective_seed(),
                    summary.outcome.days,
                    outcome_label(&summary),
                    err
                ));
                if self.options.verbose {
                    println!(
                        "  ❌ Iteration {}/{} failed: {}",
                        i + 1,
                        iterations,
                        err.clone().red()
                    );
                }
            } else {
                successes += 1;
                let duration = start_time.elapsed();
                performance_data.push(duration);
                if self.options.verbose {
                    println!(
                        "  ✅ Iteration {}/{} passed ({duration:?}) days:{} outcome:{}",
                        i + 1,
                        iterations,
                        summary.outcome.days,
                        outcome_label(&summary)
                    );
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
            scenario_name: scenario.name.clone(),
            seed,
            passed: failures.is_empty(),
            iterations_run: iterations,
            successful_iterations: successes,
            retries,
            outcomes,
            failures,
            average_duration,
            performance_data,
        }
    }
}

/// Fail when a batch ran longer than its wall-clock budget.
pub fn ensure_within_budget(elapsed: Duration, budget: Duration) -> Result<()> {
    ensure!(
        elapsed <= budget,
        "simulations exceeded time budget: {:.2}s > {:.2}s",
        elapsed.as_secs_f64(),
        budget.as_secs_f64()
    );
    Ok(())
}

fn outcome_label(summary: &SimulationSummary) -> String {
    summary
        .outcome
        .winner
        .map_or_else(|| "Stalemate".to_string(), |f| f.to_string())
}

fn evaluate_expectations(plan: &SimulationPlan, summary: &SimulationSummary) -> Option<String> {
    for expectation in &plan.expectations {
        if let Err(err) = expectation.evaluate(summary) {
            return Some(err.to_string());
        }
    }
    None
}

fn print_transcript(scenario: &str, summary: &SimulationSummary) {
    println!(
        "{} {} (seed {})",
        "📜 Transcript".bright_magenta().bold(),
        scenario,
        summary.effective_seed()
    );
    for line in summary.outcome.transcript.lines() {
        println!("   {line}");
    }
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_millis().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u128::deserialize(deserializer)?;
        Ok(Duration::from_millis(u64::try_from(millis).unwrap_or(0)))
    }
}

mod duration_vec_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(durations: &[Duration], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let millis: Vec<u128> = durations.iter().map(Duration::as_millis).collect();
        millis.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = Vec::<u128>::deserialize(deserializer)?;
        Ok(millis
            .into_iter()
            .map(|m| Duration::from_millis(u64::try_from(m).unwrap_or(0)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::simulation::SimulationPlan;

    fn options() -> TesterOptions {
        TesterOptions {
            roster: Vec::new(),
            attempts: 3,
            verbose: false,
            print_transcripts: false,
        }
    }

    #[test]
    fn passing_scenario_counts_every_iteration() {
        let scenario = TestScenario::simulation("Plain", SimulationPlan::new());
        let tester = LogicTester::new(options());
        let results = tester.run_scenario(&scenario, &[1, 2], 3);
        assert_eq!(results.len(), 2);
        for result in &results {
            assert!(result.passed);
            assert_eq!(result.successful_iterations, 3);
            assert_eq!(result.outcomes.values().sum::<usize>(), 3);
        }
    }

    #[test]
    fn failing_expectation_is_reported() {
        let plan = SimulationPlan::new().with_expectation(|_: &SimulationSummary| -> Result<()> {
            anyhow::bail!("always wrong")
        });
        let scenario = TestScenario::simulation("Broken", plan);
        let tester = LogicTester::new(options());
        let results = tester.run_scenario(&scenario, &[7], 2);
        assert!(!results[0].passed);
        assert_eq!(results[0].failures.len(), 2);
        assert!(results[0].failures[0].contains("always wrong"));
    }

    #[test]
    fn budget_check_flags_overruns() {
        assert!(ensure_within_budget(Duration::from_millis(10), Duration::from_secs(1)).is_ok());
        let err = ensure_within_budget(Duration::from_secs(6), Duration::from_secs(5)).unwrap_err();
        assert!(err.to_string().contains("exceeded time budget"));
    }

    #[test]
    fn results_serialize_durations_as_millis() {
        let mut result = ScenarioResult::harness_failure("Budget", "too slow");
        result.average_duration = Duration::from_millis(25);
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains(r#""average_duration":25"#));
        let back: ScenarioResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back.average_duration, Duration::from_millis(25));
    }
}
