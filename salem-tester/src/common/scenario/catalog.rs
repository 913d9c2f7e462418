use anyhow::{Result, ensure};
use std::collections::HashSet;

use crate::common::scenario::TestScenario;
use crate::logic::{SimulationPlan, SimulationSummary};
use salem_game::{DeathCause, EventKind, Faction, Game, RulesConfig, SeatPlan};

/// Table size used by the roster-scaling scenario; lands in the large-game bracket.
pub const SCALING_TABLE: usize = 20;
/// Below the smallest sensible table; the Mafia should own it after one night.
pub const SMALL_TABLE: usize = 5;
/// Day cap for the short-game scenario.
pub const SHORT_DAY_CAP: u32 = 2;

pub fn catalog_scenarios() -> Vec<TestScenario> {
    vec![
        TestScenario::simulation(
            "Smoke Test",
            SimulationPlan::new().with_expectation(completion_expectation),
        ),
        TestScenario::simulation(
            "Deterministic Replay",
            SimulationPlan::new().with_expectation(replay_expectation),
        ),
        TestScenario::simulation(
            "Roster Scaling",
            SimulationPlan::new()
                .with_players(table(SCALING_TABLE))
                .with_expectation(seat_plan_expectation)
                .with_expectation(completion_expectation),
        ),
        TestScenario::simulation(
            "Engine Invariants",
            SimulationPlan::new()
                .with_expectation(death_consistency_expectation)
                .with_expectation(winner_consistency_expectation)
                .with_expectation(charge_limit_expectation),
        ),
        TestScenario::simulation(
            "Small Table",
            SimulationPlan::new()
                .with_players(table(SMALL_TABLE))
                .with_expectation(small_table_expectation),
        ),
        TestScenario::simulation(
            "Day Cap",
            SimulationPlan::new()
                .with_rules(short_rules())
                .with_expectation(day_cap_expectation)
                .with_expectation(winner_consistency_expectation),
        ),
    ]
}

pub fn find_catalog_scenario(name: &str) -> Option<TestScenario> {
    catalog_scenarios()
        .into_iter()
        .find(|scenario| scenario.name == name)
}

fn table(count: usize) -> Vec<String> {
    (1..=count).map(|idx| format!("Seat{idx:02}")).collect()
}

fn short_rules() -> RulesConfig {
    RulesConfig {
        max_days: SHORT_DAY_CAP,
        ..RulesConfig::default()
    }
}

fn completion_expectation(summary: &SimulationSummary) -> Result<()> {
    let outcome = &summary.outcome;
    ensure!(outcome.days >= 1, "game ended before the first night");
    ensure!(!outcome.transcript.is_empty(), "transcript is empty");
    let closing = outcome
        .transcript
        .iter()
        .filter(|e| matches!(e.kind, EventKind::Winner { .. } | EventKind::Stalemate { .. }))
        .count();
    ensure!(closing == 1, "expected one closing event, found {closing}");
    Ok(())
}

fn replay_expectation(summary: &SimulationSummary) -> Result<()> {
    let replay = Game::with_config(
        summary.roster.clone(),
        Some(summary.effective_seed()),
        summary.rules.clone(),
    )
    .run()?;
    ensure!(
        replay.transcript.fingerprint() == summary.outcome.transcript.fingerprint(),
        "replay diverged: fingerprint {:016x} != {:016x}",
        replay.transcript.fingerprint(),
        summary.outcome.transcript.fingerprint()
    );
    ensure!(
        replay.winner == summary.outcome.winner,
        "replay winner {:?} != {:?}",
        replay.winner,
        summary.outcome.winner
    );
    ensure!(replay.deaths == summary.outcome.deaths, "replay deaths differ");
    Ok(())
}

fn seat_plan_expectation(summary: &SimulationSummary) -> Result<()> {
    let players = &summary.outcome.players;
    let seats = SeatPlan::for_players(players.len(), &summary.rules);
    let count = |faction| {
        players
            .iter()
            .filter(|p| p.faction() == Some(faction))
            .count()
    };
    ensure!(
        players.iter().all(|p| p.role_id().is_some()),
        "a player was left without a role"
    );
    ensure!(count(Faction::Mafia) == seats.mafia, "mafia seats off");
    ensure!(count(Faction::Neutral) == seats.neutral, "neutral seats off");
    ensure!(count(Faction::Town) == seats.town, "town seats off");
    Ok(())
}

fn death_consistency_expectation(summary: &SimulationSummary) -> Result<()> {
    let outcome = &summary.outcome;
    let mut seen = HashSet::new();
    for death in &outcome.deaths {
        ensure!(seen.insert(&death.name), "{} died twice", death.name);
        let player = outcome
            .players
            .iter()
            .find(|p| p.name == death.name)
            .ok_or_else(|| anyhow::anyhow!("death of unknown player {}", death.name))?;
        ensure!(!player.is_alive(), "{} is recorded dead but alive", death.name);
    }
    let dead = outcome.players.iter().filter(|p| !p.is_alive()).count();
    ensure!(
        dead == outcome.deaths.len(),
        "{dead} dead players but {} death records",
        outcome.deaths.len()
    );
    Ok(())
}

fn winner_consistency_expectation(summary: &SimulationSummary) -> Result<()> {
    let outcome = &summary.outcome;
    let living = |faction| {
        outcome
            .players
            .iter()
            .filter(|p| p.is_alive() && p.faction() == Some(faction))
            .count()
    };
    let (mafia, town) = (living(Faction::Mafia), living(Faction::Town));
    match outcome.winner {
        Some(Faction::Town) => ensure!(mafia == 0, "Town won with {mafia} Mafia alive"),
        Some(Faction::Mafia) => {
            ensure!(mafia >= town, "Mafia won while outnumbered {mafia} to {town}");
        }
        Some(Faction::Neutral) => anyhow::bail!("Neutral faction cannot win"),
        None => ensure!(
            outcome.days >= summary.rules.max_days,
            "stalemate after only {} days",
            outcome.days
        ),
    }
    Ok(())
}

fn charge_limit_expectation(summary: &SimulationSummary) -> Result<()> {
    let deaths = &summary.outcome.deaths;
    let executions = deaths
        .iter()
        .filter(|d| d.cause == DeathCause::JailorExecution)
        .count();
    let cleaned = deaths.iter().filter(|d| d.role.is_none()).count();
    ensure!(
        executions <= summary.rules.jailor_executions as usize,
        "{executions} executions exceed the Jailor's charges"
    );
    ensure!(
        cleaned <= summary.rules.janitor_cleans as usize,
        "{cleaned} cleaned bodies exceed the Janitor's charges"
    );
    Ok(())
}

fn small_table_expectation(summary: &SimulationSummary) -> Result<()> {
    let outcome = &summary.outcome;
    ensure!(
        outcome.winner == Some(Faction::Mafia),
        "expected a Mafia win, got {:?}",
        outcome.winner
    );
    ensure!(outcome.days == 1, "Mafia should win on the first night");
    Ok(())
}

fn day_cap_expectation(summary: &SimulationSummary) -> Result<()> {
    let outcome = &summary.outcome;
    ensure!(
        outcome.days <= summary.rules.max_days,
        "{} nights played past a cap of {}",
        outcome.days,
        summary.rules.max_days
    );
    let stalemate = outcome
        .transcript
        .iter()
        .any(|e| matches!(e.kind, EventKind::Stalemate { .. }));
    ensure!(
        stalemate == outcome.is_stalemate(),
        "stalemate event does not match the missing winner"
    );
    Ok(())
}
