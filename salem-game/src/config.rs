//! Tunable rules for a game: faction scaling, charge counts, targeting bias.
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::error::ConfigError;
use crate::roles::InvestigationGroup;

const DEFAULT_RULES_DATA: &str = include_str!("../data/rules.json");

/// Hint returned for investigation groups missing from the hint table.
pub const UNCLEAR_HINT: &str = "Your target's role is unclear.";

/// Number of non-Town seats for a table size bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactionCounts {
    pub mafia: u32,
    pub neutral: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RulesConfig {
    /// Largest table still using the `small_game` counts.
    #[serde(default = "RulesConfig::default_small_game_max_players")]
    pub small_game_max_players: u32,
    #[serde(default = "RulesConfig::default_small_game")]
    pub small_game: FactionCounts,
    #[serde(default = "RulesConfig::default_large_game")]
    pub large_game: FactionCounts,
    #[serde(default = "RulesConfig::default_jailor_executions")]
    pub jailor_executions: u32,
    #[serde(default = "RulesConfig::default_janitor_cleans")]
    pub janitor_cleans: u32,
    /// Chance the Sheriff restricts its pick to non-Town players.
    #[serde(default = "RulesConfig::default_sheriff_focus_chance")]
    pub sheriff_focus_chance: f64,
    #[serde(default = "RulesConfig::default_min_trial_players")]
    pub min_trial_players: u32,
    /// Days after which an undecided game is called a stalemate.
    #[serde(default = "RulesConfig::default_max_days")]
    pub max_days: u32,
    #[serde(default = "RulesConfig::default_investigator_hints")]
    pub investigator_hints: BTreeMap<InvestigationGroup, String>,
    #[serde(default = "RulesConfig::default_players")]
    pub default_players: Vec<String>,
}

impl RulesConfig {
    const fn default_small_game_max_players() -> u32 {
        12
    }

    const fn default_small_game() -> FactionCounts {
        FactionCounts {
            mafia: 3,
            neutral: 1,
        }
    }

    const fn default_large_game() -> FactionCounts {
        FactionCounts {
            mafia: 4,
            neutral: 2,
        }
    }

    const fn default_jailor_executions() -> u32 {
        1
    }

    const fn default_janitor_cleans() -> u32 {
        3
    }

    const fn default_sheriff_focus_chance() -> f64 {
        0.7
    }

    const fn default_min_trial_players() -> u32 {
        3
    }

    const fn default_max_days() -> u32 {
        40
    }

    fn default_investigator_hints() -> BTreeMap<InvestigationGroup, String> {
        BTreeMap::from([
            (
                InvestigationGroup::Leader,
                "Your target could be a Jailor or Godfather.".to_string(),
            ),
            (
                InvestigationGroup::Investigator,
                "Your target could be a Sheriff, Investigator, or Consigliere.".to_string(),
            ),
            (
                InvestigationGroup::Protector,
                "Your target could be a Doctor.".to_string(),
            ),
            (
                InvestigationGroup::Escort,
                "Your target could be an Escort.".to_string(),
            ),
            (
                InvestigationGroup::Watcher,
                "Your target could be a Lookout.".to_string(),
            ),
            (
                InvestigationGroup::Support,
                "Your target could be a Townie or Janitor.".to_string(),
            ),
            (
                InvestigationGroup::Killing,
                "Your target could be a Mafioso.".to_string(),
            ),
            (
                InvestigationGroup::Deception,
                "Your target could be a Jester or Executioner.".to_string(),
            ),
        ])
    }

    fn default_players() -> Vec<String> {
        [
            "Alice", "Ben", "Casey", "Drew", "Emery", "Finley", "Gray", "Harper", "Indigo",
            "Jules", "Kai", "Logan",
        ]
        .into_iter()
        .map(String::from)
        .collect()
    }

    fn compiled_defaults() -> Self {
        Self {
            small_game_max_players: Self::default_small_game_max_players(),
            small_game: Self::default_small_game(),
            large_game: Self::default_large_game(),
            jailor_executions: Self::default_jailor_executions(),
            janitor_cleans: Self::default_janitor_cleans(),
            sheriff_focus_chance: Self::default_sheriff_focus_chance(),
            min_trial_players: Self::default_min_trial_players(),
            max_days: Self::default_max_days(),
            investigator_hints: Self::default_investigator_hints(),
            default_players: Self::default_players(),
        }
    }

    /// Parse a rules file.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Mafia and Neutral seat counts for a table of `player_count`.
    #[must_use]
    pub fn faction_counts(&self, player_count: usize) -> FactionCounts {
        let small_limit = usize::try_from(self.small_game_max_players).unwrap_or(usize::MAX);
        if player_count <= small_limit {
            self.small_game
        } else {
            self.large_game
        }
    }

    /// Ambiguous hint for an investigation group, or [`UNCLEAR_HINT`].
    #[must_use]
    pub fn investigator_hint(&self, group: InvestigationGroup) -> &str {
        self.investigator_hints
            .get(&group)
            .map_or(UNCLEAR_HINT, String::as_str)
    }

    /// Check the invariants the resolvers rely on.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.sheriff_focus_chance) {
            return Err(ConfigError::RangeViolation {
                field: "sheriff_focus_chance",
                min: 0.0,
                max: 1.0,
                value: self.sheriff_focus_chance,
            });
        }
        if self.min_trial_players < 1 {
            return Err(ConfigError::MinViolation {
                field: "min_trial_players",
                min: 1,
                value: self.min_trial_players,
            });
        }
        if self.max_days < 1 {
            return Err(ConfigError::MinViolation {
                field: "max_days",
                min: 1,
                value: self.max_days,
            });
        }
        let mut seen = HashSet::new();
        for name in &self.default_players {
            if !seen.insert(name.as_str()) {
                return Err(ConfigError::DuplicateDefaultPlayer(name.clone()));
            }
        }
        Ok(())
    }
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self::from_json(DEFAULT_RULES_DATA).unwrap_or_else(|_| Self::compiled_defaults())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_rules_match_compiled_defaults() {
        let embedded = RulesConfig::from_json(DEFAULT_RULES_DATA).unwrap();
        assert_eq!(embedded, RulesConfig::compiled_defaults());
        assert!(embedded.validate().is_ok());
    }

    #[test]
    fn faction_counts_switch_above_twelve() {
        let rules = RulesConfig::default();
        assert_eq!(
            rules.faction_counts(12),
            FactionCounts {
                mafia: 3,
                neutral: 1
            }
        );
        assert_eq!(
            rules.faction_counts(13),
            FactionCounts {
                mafia: 4,
                neutral: 2
            }
        );
        assert_eq!(rules.faction_counts(1), rules.small_game);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let rules = RulesConfig::from_json(r#"{ "jailor_executions": 2 }"#).unwrap();
        assert_eq!(rules.jailor_executions, 2);
        assert_eq!(rules.janitor_cleans, 3);
        assert_eq!(rules.default_players.len(), 12);
    }

    #[test]
    fn missing_hint_falls_back_to_unclear() {
        let rules = RulesConfig::from_json(
            r#"{ "investigator_hints": { "leader": "Could be a Jailor or Godfather." } }"#,
        )
        .unwrap();
        assert_eq!(
            rules.investigator_hint(InvestigationGroup::Leader),
            "Could be a Jailor or Godfather."
        );
        assert_eq!(
            rules.investigator_hint(InvestigationGroup::Killing),
            UNCLEAR_HINT
        );
    }

    #[test]
    fn validate_rejects_out_of_range_values() {
        let mut rules = RulesConfig::default();
        rules.sheriff_focus_chance = 1.5;
        assert!(matches!(
            rules.validate(),
            Err(ConfigError::RangeViolation {
                field: "sheriff_focus_chance",
                ..
            })
        ));

        let mut rules = RulesConfig::default();
        rules.min_trial_players = 0;
        assert!(matches!(
            rules.validate(),
            Err(ConfigError::MinViolation {
                field: "min_trial_players",
                ..
            })
        ));

        let mut rules = RulesConfig::default();
        rules.default_players = vec!["Ann".to_string(), "Ann".to_string()];
        assert_eq!(
            rules.validate(),
            Err(ConfigError::DuplicateDefaultPlayer("Ann".to_string()))
        );
    }
}
