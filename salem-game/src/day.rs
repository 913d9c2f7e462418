//! Day deliberation: suspicion, chatter and the elimination vote.
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::RulesConfig;
use crate::narration::{Narrator, day_chat_prompt};
use crate::roles::Faction;
use crate::state::{GameState, Phase, PlayerId};
use crate::transcript::NoTrialReason;

/// Public suspicion, keyed by player name.
///
/// Only "suspicious" Sheriff notes held by living Town players count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuspicionTally {
    counts: BTreeMap<String, u32>,
}

impl SuspicionTally {
    #[must_use]
    pub fn from_state(state: &GameState) -> Self {
        let mut counts: BTreeMap<String, u32> = BTreeMap::new();
        let holders = state
            .players()
            .iter()
            .filter(|p| p.is_alive() && p.faction() == Some(Faction::Town));
        for holder in holders {
            for note in holder.knowledge() {
                if let Some(target) = note.suspicious_target() {
                    *counts.entry(target.to_string()).or_default() += 1;
                }
            }
        }
        Self { counts }
    }

    #[must_use]
    pub fn count_for(&self, name: &str) -> u32 {
        self.counts.get(name).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Candidate with the highest positive count. Ties go to the earliest
    /// candidate in the given order.
    #[must_use]
    pub fn leading_among(
        &self,
        state: &GameState,
        candidates: &[PlayerId],
    ) -> Option<(PlayerId, u32)> {
        let mut best: Option<(PlayerId, u32)> = None;
        for &id in candidates {
            let count = self.count_for(state.name_of(id));
            if count > 0 && best.is_none_or(|(_, top)| count > top) {
                best = Some((id, count));
            }
        }
        best
    }
}

/// Result of the day vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DayOutcome {
    Eliminated { accused: PlayerId, suspicion: u32 },
    NoTrial(NoTrialReason),
}

/// One line of day chat per living player, in roster order.
pub fn day_chatter<N: Narrator + ?Sized>(
    state: &GameState,
    narrator: &mut N,
    recent_deaths: &[String],
) -> Vec<(PlayerId, String)> {
    state
        .living()
        .into_iter()
        .filter_map(|id| {
            let speaker = state.player(id)?;
            let prompt = day_chat_prompt(speaker, state.day, recent_deaths);
            Some((id, narrator.complete(&prompt)))
        })
        .collect()
}

/// Hold the elimination vote.
///
/// The accused dies immediately; no execution charge is spent.
pub fn resolve_day(state: &mut GameState, rules: &RulesConfig) -> DayOutcome {
    state.phase = Phase::Day;
    let living = state.living();
    let threshold = usize::try_from(rules.min_trial_players).unwrap_or(usize::MAX);
    if living.len() < threshold {
        debug!(
            "day {}: {} alive, below trial threshold",
            state.day,
            living.len()
        );
        return DayOutcome::NoTrial(NoTrialReason::TooFewPlayers {
            living: living.len(),
        });
    }

    let tally = SuspicionTally::from_state(state);
    let Some((accused, suspicion)) = tally.leading_among(state, &living) else {
        debug!("day {}: no suspects", state.day);
        return DayOutcome::NoTrial(NoTrialReason::NoSuspects);
    };
    state.kill(accused, false);
    info!(
        "day {}: {} eliminated on {suspicion} report(s)",
        state.day,
        state.name_of(accused)
    );
    DayOutcome::Eliminated { accused, suspicion }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::narration::RecordingNarrator;
    use crate::roles::RoleId;
    use crate::state::{KnowledgeNote, SheriffVerdict};

    fn table() -> GameState {
        GameState::with_roles(
            &[
                ("Ann", RoleId::Sheriff),
                ("Bo", RoleId::Mafioso),
                ("Cy", RoleId::Sheriff),
                ("Di", RoleId::Jester),
                ("Ed", RoleId::Consigliere),
            ],
            &RulesConfig::default(),
        )
    }

    fn suspect(state: &mut GameState, holder: usize, target: &str) {
        state.record_note(
            PlayerId(holder),
            KnowledgeNote::Sheriff {
                night: 1,
                target: target.to_string(),
                verdict: SheriffVerdict::Suspicious,
            },
        );
    }

    #[test]
    fn tally_counts_only_living_town_holders() {
        let mut state = table();
        suspect(&mut state, 0, "Bo");
        suspect(&mut state, 2, "Bo");
        suspect(&mut state, 4, "Di");
        state.record_note(
            PlayerId(0),
            KnowledgeNote::Sheriff {
                night: 2,
                target: "Cy".to_string(),
                verdict: SheriffVerdict::Innocent,
            },
        );
        let tally = SuspicionTally::from_state(&state);
        assert_eq!(tally.count_for("Bo"), 2);
        assert_eq!(tally.count_for("Di"), 0);
        assert_eq!(tally.count_for("Cy"), 0);

        state.kill(PlayerId(2), false);
        assert_eq!(SuspicionTally::from_state(&state).count_for("Bo"), 1);
    }

    #[test]
    fn plurality_suspect_is_eliminated() {
        let mut state = table();
        suspect(&mut state, 0, "Di");
        suspect(&mut state, 0, "Bo");
        suspect(&mut state, 2, "Bo");
        let outcome = resolve_day(&mut state, &RulesConfig::default());
        assert_eq!(
            outcome,
            DayOutcome::Eliminated {
                accused: PlayerId(1),
                suspicion: 2
            }
        );
        assert!(!state.is_alive(PlayerId(1)));
        assert_eq!(state.jailor_executions, 1);
    }

    #[test]
    fn ties_go_to_roster_order() {
        let mut state = table();
        suspect(&mut state, 0, "Ed");
        suspect(&mut state, 2, "Di");
        let outcome = resolve_day(&mut state, &RulesConfig::default());
        assert_eq!(
            outcome,
            DayOutcome::Eliminated {
                accused: PlayerId(3),
                suspicion: 1
            }
        );
    }

    #[test]
    fn no_suspects_means_no_trial() {
        let mut state = table();
        let outcome = resolve_day(&mut state, &RulesConfig::default());
        assert_eq!(outcome, DayOutcome::NoTrial(NoTrialReason::NoSuspects));
        assert_eq!(state.living_count(), 5);
    }

    #[test]
    fn dead_suspects_are_not_tried() {
        let mut state = table();
        suspect(&mut state, 0, "Bo");
        state.kill(PlayerId(1), false);
        let outcome = resolve_day(&mut state, &RulesConfig::default());
        assert_eq!(outcome, DayOutcome::NoTrial(NoTrialReason::NoSuspects));
    }

    #[test]
    fn too_few_players_skip_the_trial() {
        let mut state = table();
        suspect(&mut state, 0, "Bo");
        state.kill(PlayerId(2), false);
        state.kill(PlayerId(3), false);
        state.kill(PlayerId(4), false);
        let outcome = resolve_day(&mut state, &RulesConfig::default());
        assert_eq!(
            outcome,
            DayOutcome::NoTrial(NoTrialReason::TooFewPlayers { living: 2 })
        );
        assert!(state.is_alive(PlayerId(1)));
    }

    #[test]
    fn every_living_player_speaks_once() {
        let mut state = table();
        state.kill(PlayerId(3), false);
        let mut narrator = RecordingNarrator::default();
        let lines = day_chatter(&state, &mut narrator, &["Di".to_string()]);
        let speakers: Vec<_> = lines.iter().map(|(id, _)| id.0).collect();
        assert_eq!(speakers, vec![0, 1, 2, 4]);
        assert!(narrator.prompts[1].contains("claim to be the Townie"));
        assert!(narrator.prompts[3].contains("claim to be the Sheriff"));
    }
}
