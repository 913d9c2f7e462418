//! Role dealing at game start.
use log::debug;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::config::RulesConfig;
use crate::roles::{Faction, FILLER_TOWN_ROLE, RoleId, catalog};
use crate::state::{Persona, Player};

/// Seats per faction for a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeatPlan {
    pub town: usize,
    pub mafia: usize,
    pub neutral: usize,
}

impl SeatPlan {
    #[must_use]
    pub fn for_players(player_count: usize, rules: &RulesConfig) -> Self {
        let counts = rules.faction_counts(player_count);
        let mafia = usize::try_from(counts.mafia).unwrap_or(usize::MAX);
        let neutral = usize::try_from(counts.neutral).unwrap_or(usize::MAX);
        Self {
            town: player_count.saturating_sub(mafia.saturating_add(neutral)),
            mafia,
            neutral,
        }
    }
}

/// Filler used when a faction needs more seats than its catalog holds.
const fn filler_for(faction: Faction) -> RoleId {
    match faction {
        Faction::Town => FILLER_TOWN_ROLE,
        Faction::Mafia => RoleId::Mafioso,
        Faction::Neutral => RoleId::Jester,
    }
}

fn deal_pool<R: Rng + ?Sized>(faction: Faction, seats: usize, rng: &mut R) -> Vec<RoleId> {
    let mut pool: Vec<RoleId> = catalog(faction).iter().map(|role| role.id).collect();
    pool.shuffle(rng);
    pool.truncate(seats);
    pool.resize(seats, filler_for(faction));
    pool
}

/// Deal one role and one persona to every named player.
///
/// The Town, Mafia and Neutral pools are shuffled independently, combined,
/// shuffled again and paired with `names` in order. Persona tags are drawn
/// afterwards, one per player in roster order.
pub fn assign_roles<R: Rng + ?Sized>(
    names: &[String],
    rules: &RulesConfig,
    rng: &mut R,
) -> Vec<Player> {
    let seats = SeatPlan::for_players(names.len(), rules);
    let mut roles = deal_pool(Faction::Town, seats.town, rng);
    roles.extend(deal_pool(Faction::Mafia, seats.mafia, rng));
    roles.extend(deal_pool(Faction::Neutral, seats.neutral, rng));
    roles.shuffle(rng);
    debug!(
        "dealing {} roles to {} players ({seats:?})",
        roles.len(),
        names.len()
    );

    let mut players: Vec<Player> = names
        .iter()
        .zip(roles)
        .map(|(name, role)| {
            let mut player = Player::new(name.clone());
            player.assign_role(role);
            player
        })
        .collect();
    for player in &mut players {
        if let Some(persona) = Persona::ALL.choose(rng) {
            player.persona = *persona;
        }
    }
    players
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn names(count: usize) -> Vec<String> {
        (0..count).map(|idx| format!("P{idx}")).collect()
    }

    fn count_faction(players: &[Player], faction: Faction) -> usize {
        players
            .iter()
            .filter(|p| p.faction() == Some(faction))
            .count()
    }

    #[test]
    fn twelve_players_get_three_mafia_one_neutral() {
        let mut rng = ChaCha20Rng::seed_from_u64(12);
        let players = assign_roles(&names(12), &RulesConfig::default(), &mut rng);
        assert_eq!(players.len(), 12);
        assert_eq!(count_faction(&players, Faction::Mafia), 3);
        assert_eq!(count_faction(&players, Faction::Neutral), 1);
        assert_eq!(count_faction(&players, Faction::Town), 8);
    }

    #[test]
    fn thirteen_players_get_four_mafia_two_neutral() {
        let mut rng = ChaCha20Rng::seed_from_u64(13);
        let players = assign_roles(&names(13), &RulesConfig::default(), &mut rng);
        assert_eq!(count_faction(&players, Faction::Mafia), 4);
        assert_eq!(count_faction(&players, Faction::Neutral), 2);
        assert_eq!(count_faction(&players, Faction::Town), 7);
    }

    #[test]
    fn scaling_rule_holds_for_every_table_size() {
        let rules = RulesConfig::default();
        for count in 7..=24 {
            let mut rng = ChaCha20Rng::seed_from_u64(count as u64);
            let players = assign_roles(&names(count), &rules, &mut rng);
            let seats = SeatPlan::for_players(count, &rules);
            assert!(players.iter().all(|p| p.role().is_some()));
            assert_eq!(count_faction(&players, Faction::Mafia), seats.mafia);
            assert_eq!(count_faction(&players, Faction::Neutral), seats.neutral);
            assert_eq!(count_faction(&players, Faction::Town), seats.town);
        }
    }

    #[test]
    fn large_town_is_padded_with_filler() {
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let players = assign_roles(&names(20), &RulesConfig::default(), &mut rng);
        let townies = players
            .iter()
            .filter(|p| p.role_id() == Some(FILLER_TOWN_ROLE))
            .count();
        // 14 Town seats, 7 catalog roles (one of them the filler itself).
        assert_eq!(townies, 8);
        let jailors = players
            .iter()
            .filter(|p| p.role_id() == Some(RoleId::Jailor))
            .count();
        assert_eq!(jailors, 1);
    }

    #[test]
    fn tiny_tables_clamp_town_to_zero() {
        let seats = SeatPlan::for_players(3, &RulesConfig::default());
        assert_eq!(seats.town, 0);
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let players = assign_roles(&names(3), &RulesConfig::default(), &mut rng);
        assert_eq!(players.len(), 3);
        assert!(players.iter().all(|p| !p.role().is_some_and(|r| r.is_town())));
    }

    #[test]
    fn names_keep_their_order() {
        let mut rng = ChaCha20Rng::seed_from_u64(5);
        let input = names(9);
        let players = assign_roles(&input, &RulesConfig::default(), &mut rng);
        let output: Vec<_> = players.iter().map(|p| p.name.clone()).collect();
        assert_eq!(output, input);
    }

    #[test]
    fn same_seed_deals_same_roles() {
        let rules = RulesConfig::default();
        let deal = |seed| {
            let mut rng = ChaCha20Rng::seed_from_u64(seed);
            assign_roles(&names(10), &rules, &mut rng)
                .into_iter()
                .map(|p| (p.role_id(), p.persona))
                .collect::<Vec<_>>()
        };
        assert_eq!(deal(77), deal(77));
    }
}
