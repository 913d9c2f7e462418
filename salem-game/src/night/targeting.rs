//! Per-role target selection.
use rand::Rng;
use rand::seq::SliceRandom;

use crate::config::RulesConfig;
use crate::day::SuspicionTally;
use crate::roles::{Faction, NightAbility};
use crate::state::{GameState, PlayerId};

/// Pick a target for `actor` using its role's policy.
///
/// Returns `None` when the candidate pool is empty; no draw is made then.
pub(crate) fn choose_target<R: Rng + ?Sized>(
    ability: NightAbility,
    actor: PlayerId,
    state: &GameState,
    tally: &SuspicionTally,
    rules: &RulesConfig,
    rng: &mut R,
) -> Option<PlayerId> {
    let living = state.living();
    match ability {
        NightAbility::Roleblock | NightAbility::Watch | NightAbility::Investigate => {
            pick(&others(&living, actor), rng)
        }
        NightAbility::Heal => pick(&living, rng),
        NightAbility::SheriffCheck => sheriff_target(actor, state, &living, rules, rng),
        NightAbility::Jail => {
            let candidates = others(&living, actor);
            tally
                .leading_among(state, &candidates)
                .map(|(id, _)| id)
                .or_else(|| pick(&candidates, rng))
        }
        NightAbility::Consult => {
            let candidates: Vec<PlayerId> = living
                .iter()
                .copied()
                .filter(|id| state.faction_of(*id) != Some(Faction::Mafia))
                .collect();
            pick(&candidates, rng)
        }
    }
}

/// Mafia kill target: uniform among living non-Mafia players.
pub(crate) fn mafia_kill_target<R: Rng + ?Sized>(
    state: &GameState,
    rng: &mut R,
) -> Option<PlayerId> {
    let candidates: Vec<PlayerId> = state
        .living()
        .into_iter()
        .filter(|id| state.faction_of(*id) != Some(Faction::Mafia))
        .collect();
    pick(&candidates, rng)
}

fn sheriff_target<R: Rng + ?Sized>(
    actor: PlayerId,
    state: &GameState,
    living: &[PlayerId],
    rules: &RulesConfig,
    rng: &mut R,
) -> Option<PlayerId> {
    let focus = rng.gen_bool(rules.sheriff_focus_chance.clamp(0.0, 1.0));
    let candidates = others(living, actor);
    if focus {
        let non_town: Vec<PlayerId> = candidates
            .iter()
            .copied()
            .filter(|id| state.faction_of(*id) != Some(Faction::Town))
            .collect();
        if !non_town.is_empty() {
            return pick(&non_town, rng);
        }
    }
    pick(&candidates, rng)
}

fn others(living: &[PlayerId], actor: PlayerId) -> Vec<PlayerId> {
    living.iter().copied().filter(|id| *id != actor).collect()
}

fn pick<R: Rng + ?Sized>(candidates: &[PlayerId], rng: &mut R) -> Option<PlayerId> {
    if candidates.is_empty() {
        return None;
    }
    candidates.choose(rng).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles::RoleId;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn table() -> GameState {
        GameState::with_roles(
            &[
                ("Ann", RoleId::Sheriff),
                ("Bo", RoleId::Mafioso),
                ("Cy", RoleId::Doctor),
                ("Di", RoleId::Consigliere),
                ("Ed", RoleId::Jailor),
                ("Fay", RoleId::Townie),
            ],
            &RulesConfig::default(),
        )
    }

    #[test]
    fn self_excluding_policies_never_pick_the_actor() {
        let state = table();
        let tally = SuspicionTally::default();
        let rules = RulesConfig::default();
        let mut rng = ChaCha20Rng::seed_from_u64(4);
        for _ in 0..200 {
            for ability in [
                NightAbility::Roleblock,
                NightAbility::Watch,
                NightAbility::Investigate,
                NightAbility::Jail,
                NightAbility::SheriffCheck,
            ] {
                let target =
                    choose_target(ability, PlayerId(0), &state, &tally, &rules, &mut rng);
                assert!(target.is_some());
                assert_ne!(target, Some(PlayerId(0)));
            }
        }
    }

    #[test]
    fn doctor_may_heal_itself() {
        let mut state = table();
        for id in [0, 1, 3, 4, 5] {
            state.kill(PlayerId(id), false);
        }
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let target = choose_target(
            NightAbility::Heal,
            PlayerId(2),
            &state,
            &SuspicionTally::default(),
            &RulesConfig::default(),
            &mut rng,
        );
        assert_eq!(target, Some(PlayerId(2)));
    }

    #[test]
    fn consigliere_and_mafia_never_target_mafia() {
        let state = table();
        let mut rng = ChaCha20Rng::seed_from_u64(9);
        for _ in 0..200 {
            let consult = choose_target(
                NightAbility::Consult,
                PlayerId(3),
                &state,
                &SuspicionTally::default(),
                &RulesConfig::default(),
                &mut rng,
            );
            let kill = mafia_kill_target(&state, &mut rng);
            for target in [consult, kill] {
                let faction = target.and_then(|id| state.faction_of(id));
                assert_ne!(faction, Some(Faction::Mafia));
            }
        }
    }

    #[test]
    fn focused_sheriff_picks_non_town() {
        let state = table();
        let mut rules = RulesConfig::default();
        rules.sheriff_focus_chance = 1.0;
        let mut rng = ChaCha20Rng::seed_from_u64(2);
        for _ in 0..100 {
            let target = choose_target(
                NightAbility::SheriffCheck,
                PlayerId(0),
                &state,
                &SuspicionTally::default(),
                &rules,
                &mut rng,
            );
            assert!(matches!(target, Some(PlayerId(1)) | Some(PlayerId(3))));
        }
    }

    #[test]
    fn jailor_follows_the_suspicion_leader() {
        let mut state = table();
        state.record_note(
            PlayerId(0),
            crate::state::KnowledgeNote::Sheriff {
                night: 1,
                target: "Di".to_string(),
                verdict: crate::state::SheriffVerdict::Suspicious,
            },
        );
        let tally = SuspicionTally::from_state(&state);
        let mut rng = ChaCha20Rng::seed_from_u64(0);
        let target = choose_target(
            NightAbility::Jail,
            PlayerId(4),
            &state,
            &tally,
            &RulesConfig::default(),
            &mut rng,
        );
        assert_eq!(target, Some(PlayerId(3)));
    }

    #[test]
    fn empty_pools_yield_no_target() {
        let mut state = table();
        for id in 1..6 {
            state.kill(PlayerId(id), false);
        }
        let mut rng = ChaCha20Rng::seed_from_u64(5);
        let target = choose_target(
            NightAbility::Investigate,
            PlayerId(0),
            &state,
            &SuspicionTally::default(),
            &RulesConfig::default(),
            &mut rng,
        );
        assert!(target.is_none());
    }
}
