use anyhow::{Context, Result, anyhow};
use log::warn;
use salem_game::{Game, GameOutcome, RulesConfig, derive_stream_seed};
use std::sync::Arc;

/// What a scenario runs and how its result is judged.
#[derive(Debug, Clone, Default)]
pub struct SimulationPlan {
    /// Fixed roster; `None` defers to the CLI roster, then the default one.
    pub players: Option<Vec<String>>,
    pub rules: RulesConfig,
    pub expectations: Vec<SimulationExpectation>,
}

impl SimulationPlan {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_players(mut self, players: Vec<String>) -> Self {
        self.players = Some(players);
        self
    }

    #[must_use]
    pub fn with_rules(mut self, rules: RulesConfig) -> Self {
        self.rules = rules;
        self
    }

    #[must_use]
    pub fn with_expectation(mut self, expectation: impl Into<SimulationExpectation>) -> Self {
        self.expectations.push(expectation.into());
        self
    }

    /// Roster for a run: the plan's own, else `fallback`.
    #[must_use]
    pub fn roster(&self, fallback: &[String]) -> Vec<String> {
        self.players.clone().unwrap_or_else(|| fallback.to_vec())
    }
}

/// Assertion hook run after a simulation completes.
type SimulationExpectationFn =
    Arc<dyn Fn(&SimulationSummary) -> Result<()> + Send + Sync + 'static>;

#[derive(Clone)]
pub struct SimulationExpectation(SimulationExpectationFn);

impl std::fmt::Debug for SimulationExpectation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationExpectation").finish()
    }
}

impl SimulationExpectation {
    pub fn evaluate(&self, summary: &SimulationSummary) -> Result<()> {
        (self.0)(summary)
    }
}

impl<F> From<F> for SimulationExpectation
where
    F: Fn(&SimulationSummary) -> Result<()> + Send + Sync + 'static,
{
    fn from(f: F) -> Self {
        Self(Arc::new(f))
    }
}

/// Complete record of one simulated game.
#[derive(Debug, Clone)]
pub struct SimulationSummary {
    /// Seed the iteration asked for.
    pub requested_seed: u64,
    /// Attempts spent, including the successful one.
    pub attempts: u32,
    pub roster: Vec<String>,
    pub rules: RulesConfig,
    pub outcome: GameOutcome,
}

impl SimulationSummary {
    /// Seed that actually produced `outcome`.
    #[must_use]
    pub const fn effective_seed(&self) -> u64 {
        self.outcome.seed
    }
}

/// Seed for retry `attempt` of `seed`. Attempt zero uses the seed itself.
#[must_use]
pub fn attempt_seed(seed: u64, attempt: u32) -> u64 {
    if attempt == 0 {
        seed
    } else {
        derive_stream_seed(seed, format!("retry-{attempt}").as_bytes())
    }
}

/// Run one game, retrying with a fresh derived seed when the engine rejects
/// a night.
///
/// # Errors
///
/// Fails when the plan's rules are invalid, or once `max_attempts` games
/// have all been rejected.
pub fn run_plan(
    plan: &SimulationPlan,
    roster: Vec<String>,
    seed: u64,
    max_attempts: u32,
) -> Result<SimulationSummary> {
    plan.rules
        .validate()
        .context("simulation plan carries invalid rules")?;
    let max_attempts = max_attempts.max(1);
    let mut last_error = None;
    for attempt in 0..max_attempts {
        let game_seed = attempt_seed(seed, attempt);
        match Game::with_config(roster.clone(), Some(game_seed), plan.rules.clone()).run() {
            Ok(outcome) => {
                return Ok(SimulationSummary {
                    requested_seed: seed,
                    attempts: attempt + 1,
                    roster,
                    rules: plan.rules.clone(),
                    outcome,
                });
            }
            Err(err) => {
                warn!("seed {seed} attempt {} rejected: {err}", attempt + 1);
                last_error = Some(err);
            }
        }
    }
    let cause = last_error.map_or_else(|| "no attempts made".to_string(), |e| e.to_string());
    Err(anyhow!(
        "seed {seed}: simulation failed to stabilise after {max_attempts} attempt(s): {cause}"
    ))
}
