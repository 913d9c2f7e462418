//! Night resolution.
//!
//! A night runs in two calls so callers can narrate in between:
//! [`plan_night`] collects every action (individual choices, then the Mafia
//! kill), and [`resolve_night`] applies the plan. Resolution validates the
//! whole plan before touching state, so a rejected night leaves the game
//! exactly as it was.
mod action;
mod targeting;

pub use action::{ActionKind, NightAction, NightPlan};

use log::{debug, info, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::RulesConfig;
use crate::day::SuspicionTally;
use crate::error::EngineError;
use crate::investigation;
use crate::roles::{Faction, RoleId};
use crate::state::{GameState, Phase, PlayerId};
use crate::transcript::DeathCause;

/// Killer preference for the nightly Mafia kill.
const KILLER_PREFERENCE: [RoleId; 2] = [RoleId::Mafioso, RoleId::Godfather];

/// A death resolved during the night.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NightDeath {
    pub victim: PlayerId,
    pub cause: DeathCause,
    pub cleaned: bool,
}

/// What happened during one resolved night.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NightReport {
    /// Day counter the night belonged to.
    pub night: u32,
    pub jailed: Option<PlayerId>,
    pub roleblocked: Vec<PlayerId>,
    /// Mafia target that survived thanks to a heal.
    pub saved: Option<PlayerId>,
    pub deaths: Vec<NightDeath>,
}

/// Collect every living player's action and the coordinated Mafia kill.
///
/// Draws happen in roster order, then one draw for the Mafia target.
pub fn plan_night<R: Rng + ?Sized>(
    state: &GameState,
    rules: &RulesConfig,
    rng: &mut R,
) -> NightPlan {
    let tally = SuspicionTally::from_state(state);
    let mut plan = NightPlan::new();

    for actor in state.living() {
        let Some(ability) = state.role_of(actor).and_then(|role| role.night_ability()) else {
            continue;
        };
        let target = targeting::choose_target(ability, actor, state, &tally, rules, rng);
        plan.record(NightAction::new(
            ActionKind::from_ability(ability),
            actor,
            target,
        ));
    }

    coordinate_mafia(state, &mut plan, rng);
    debug!("night {} plan holds {} action(s)", state.day, plan.len());
    plan
}

fn coordinate_mafia<R: Rng + ?Sized>(state: &GameState, plan: &mut NightPlan, rng: &mut R) {
    if state.living_in_faction(Faction::Mafia) == 0 {
        return;
    }
    let jailed = plan.target_of(ActionKind::Jail);
    let free = |id: &PlayerId| Some(*id) != jailed;

    let mafia: Vec<PlayerId> = state
        .living()
        .into_iter()
        .filter(|id| state.faction_of(*id) == Some(Faction::Mafia))
        .filter(free)
        .collect();
    let killer = KILLER_PREFERENCE
        .iter()
        .find_map(|role| {
            mafia
                .iter()
                .copied()
                .find(|id| state.role_of(*id).map(|r| r.id) == Some(*role))
        })
        .or_else(|| mafia.first().copied());
    let Some(killer) = killer else {
        debug!("every living mafia member is jailed; no kill tonight");
        return;
    };
    let Some(target) = targeting::mafia_kill_target(state, rng) else {
        return;
    };
    plan.record(NightAction::new(ActionKind::MafiaKill, killer, Some(target)));

    if state.janitor_cleans > 0
        && let Some(janitor) = state.living_with_role(RoleId::Janitor)
        && free(&janitor)
    {
        plan.record(NightAction::new(
            ActionKind::JanitorClean,
            janitor,
            Some(target),
        ));
    }
}

/// Resolve `plan` against `state`.
///
/// On success liveness, charges, knowledge logs and the day counter are
/// updated and the phase moves to day.
///
/// # Errors
///
/// Returns [`EngineError::RosterConsistency`] when an action names a player
/// outside the roster, or [`EngineError::IllegalMove`] when a Mafia member
/// targets another Mafia member. Nothing is mutated in either case.
pub fn resolve_night(
    state: &mut GameState,
    mut plan: NightPlan,
    rules: &RulesConfig,
) -> Result<NightReport, EngineError> {
    let night = state.day;
    let jailed = plan.target_of(ActionKind::Jail);
    if let Some(prisoner) = jailed {
        plan.remove_actor(prisoner);
    }
    let mut roleblocked: Vec<PlayerId> =
        plan.target_of(ActionKind::Roleblock).into_iter().collect();
    if let Some(prisoner) = jailed
        && !roleblocked.contains(&prisoner)
    {
        roleblocked.push(prisoner);
    }

    let (deaths, saved) = resolve_deaths(state, &plan, jailed, &roleblocked);
    validate(state, &plan).inspect_err(|err| warn!("night {night} rejected: {err}"))?;

    for death in &deaths {
        if state.kill(death.victim, death.cleaned) {
            info!(
                "night {night}: {} {}",
                state.name_of(death.victim),
                death.cause.label()
            );
        }
        if death.cause == DeathCause::JailorExecution {
            state.jailor_executions = state.jailor_executions.saturating_sub(1);
        }
        if death.cleaned {
            state.janitor_cleans = state.janitor_cleans.saturating_sub(1);
        }
    }

    investigation::apply(state, &plan, rules, night);

    state.day = state.day.saturating_add(1);
    state.phase = Phase::Day;
    Ok(NightReport {
        night,
        jailed,
        roleblocked,
        saved,
        deaths,
    })
}

fn resolve_deaths(
    state: &GameState,
    plan: &NightPlan,
    jailed: Option<PlayerId>,
    roleblocked: &[PlayerId],
) -> (Vec<NightDeath>, Option<PlayerId>) {
    let mut deaths = Vec::new();
    let mut saved = None;
    // A roleblocked actor's kill, heal or clean does not happen.
    let active = |kind| {
        plan.find(kind)
            .filter(|action| !roleblocked.contains(&action.actor))
            .and_then(|action| action.target)
    };
    let healed = active(ActionKind::Heal);

    if let Some(target) = active(ActionKind::MafiaKill) {
        if roleblocked.contains(&target) || jailed == Some(target) {
            debug!("mafia attack on {} blocked", state.name_of(target));
        } else if healed == Some(target) {
            debug!("mafia attack on {} healed", state.name_of(target));
            saved = Some(target);
        } else {
            deaths.push(NightDeath {
                victim: target,
                cause: DeathCause::MafiaKill,
                cleaned: false,
            });
        }
    }

    if let Some(prisoner) = jailed
        && state.jailor_executions > 0
        && state.is_alive(prisoner)
        && state.faction_of(prisoner).is_some_and(|f| f != Faction::Town)
        && !deaths.iter().any(|d| d.victim == prisoner)
    {
        deaths.push(NightDeath {
            victim: prisoner,
            cause: DeathCause::JailorExecution,
            cleaned: false,
        });
    }

    if state.janitor_cleans > 0
        && let Some(target) = active(ActionKind::JanitorClean)
        && let Some(death) = deaths.iter_mut().find(|d| d.victim == target)
    {
        death.cleaned = true;
    }

    (deaths, saved)
}

fn validate(state: &GameState, plan: &NightPlan) -> Result<(), EngineError> {
    for action in plan {
        for id in std::iter::once(action.actor).chain(action.target) {
            if !state.contains(id) {
                return Err(EngineError::RosterConsistency {
                    kind: action.kind,
                    id,
                });
            }
        }
        if let Some(target) = action.target
            && state.faction_of(action.actor) == Some(Faction::Mafia)
            && state.faction_of(target) == Some(Faction::Mafia)
        {
            return Err(EngineError::IllegalMove {
                kind: action.kind,
                actor: state.name_of(action.actor).to_string(),
                target: state.name_of(target).to_string(),
            });
        }
    }
    Ok(())
}
