//! Game-state aggregate: roster, phase, day counter, charges, winner.
use serde::{Deserialize, Serialize};

use crate::config::RulesConfig;
use crate::roles::{Faction, Role, RoleId};

/// Roster index of a player. Stable for the lifetime of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub usize);

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Night,
    Day,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Night => f.write_str("night"),
            Self::Day => f.write_str("day"),
        }
    }
}

/// Narration style tag. Has no gameplay effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Persona {
    #[default]
    Cautious,
    Bold,
    Analytical,
    Charming,
    Nervous,
}

impl Persona {
    pub const ALL: &'static [Self] = &[
        Self::Cautious,
        Self::Bold,
        Self::Analytical,
        Self::Charming,
        Self::Nervous,
    ];

    /// Style direction handed to the narrator.
    #[must_use]
    pub const fn style(self) -> &'static str {
        match self {
            Self::Cautious => "measured and careful, never accusing without proof",
            Self::Bold => "loud and confident, quick to point fingers",
            Self::Analytical => "methodical, citing votes and timelines",
            Self::Charming => "warm and disarming, building alliances",
            Self::Nervous => "jittery and over-explaining every move",
        }
    }
}

/// Outcome of a Sheriff check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SheriffVerdict {
    Suspicious,
    Innocent,
}

/// Private knowledge gathered at night. Rendered to text with `Display`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum KnowledgeNote {
    Sheriff {
        night: u32,
        target: String,
        verdict: SheriffVerdict,
    },
    Investigator {
        night: u32,
        target: String,
        hint: String,
    },
    Consigliere {
        night: u32,
        target: String,
        role: RoleId,
    },
    Lookout {
        night: u32,
        target: String,
        visitors: Vec<String>,
    },
}

impl KnowledgeNote {
    /// Name of the player the note is about.
    #[must_use]
    pub fn target(&self) -> &str {
        match self {
            Self::Sheriff { target, .. }
            | Self::Investigator { target, .. }
            | Self::Consigliere { target, .. }
            | Self::Lookout { target, .. } => target,
        }
    }

    /// Target name when this is a suspicious Sheriff result.
    #[must_use]
    pub fn suspicious_target(&self) -> Option<&str> {
        match self {
            Self::Sheriff {
                target,
                verdict: SheriffVerdict::Suspicious,
                ..
            } => Some(target),
            _ => None,
        }
    }
}

impl std::fmt::Display for KnowledgeNote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sheriff {
                night,
                target,
                verdict,
            } => {
                let verdict = match verdict {
                    SheriffVerdict::Suspicious => "suspicious",
                    SheriffVerdict::Innocent => "innocent",
                };
                write!(f, "Night {night}: Sheriff check on {target}: {verdict}.")
            }
            Self::Investigator { night, target, hint } => {
                write!(f, "Night {night}: Investigated {target}. {hint}")
            }
            Self::Consigliere {
                night,
                target,
                role,
            } => write!(f, "Night {night}: {target} is the {role}."),
            Self::Lookout {
                night,
                target,
                visitors,
            } => {
                if visitors.is_empty() {
                    write!(f, "Night {night}: Nobody visited {target}.")
                } else {
                    write!(
                        f,
                        "Night {night}: {target} was visited by {}.",
                        visitors.join(", ")
                    )
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    role: Option<RoleId>,
    alive: bool,
    pub persona: Persona,
    knowledge: Vec<KnowledgeNote>,
    cleaned: bool,
}

impl Player {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: None,
            alive: true,
            persona: Persona::default(),
            knowledge: Vec::new(),
            cleaned: false,
        }
    }

    #[must_use]
    pub fn with_role(name: impl Into<String>, role: RoleId) -> Self {
        let mut player = Self::new(name);
        player.role = Some(role);
        player
    }

    #[must_use]
    pub const fn role_id(&self) -> Option<RoleId> {
        self.role
    }

    #[must_use]
    pub fn role(&self) -> Option<&'static Role> {
        self.role.map(RoleId::role)
    }

    #[must_use]
    pub fn faction(&self) -> Option<Faction> {
        self.role().map(|role| role.faction)
    }

    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.alive
    }

    #[must_use]
    pub const fn is_cleaned(&self) -> bool {
        self.cleaned
    }

    #[must_use]
    pub fn knowledge(&self) -> &[KnowledgeNote] {
        &self.knowledge
    }

    /// Set once at game start; later calls are ignored.
    pub(crate) fn assign_role(&mut self, role: RoleId) {
        if self.role.is_none() {
            self.role = Some(role);
        }
    }

    pub(crate) fn record_note(&mut self, note: KnowledgeNote) {
        self.knowledge.push(note);
    }

    /// Returns `false` if the player was already dead.
    pub(crate) fn kill(&mut self, cleaned: bool) -> bool {
        if !self.alive {
            return false;
        }
        self.alive = false;
        self.cleaned = cleaned;
        true
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    players: Vec<Player>,
    /// One-based; advanced once per completed night.
    pub day: u32,
    pub phase: Phase,
    winner: Option<Faction>,
    pub jailor_executions: u32,
    pub janitor_cleans: u32,
}

impl GameState {
    #[must_use]
    pub fn new(players: Vec<Player>, rules: &RulesConfig) -> Self {
        Self {
            players,
            day: 1,
            phase: Phase::Night,
            winner: None,
            jailor_executions: rules.jailor_executions,
            janitor_cleans: rules.janitor_cleans,
        }
    }

    /// Build a state from fixed `(name, role)` pairs, in order.
    #[must_use]
    pub fn with_roles(assignments: &[(&str, RoleId)], rules: &RulesConfig) -> Self {
        let players = assignments
            .iter()
            .map(|(name, role)| Player::with_role(*name, *role))
            .collect();
        Self::new(players, rules)
    }

    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id.0)
    }

    pub(crate) fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.get_mut(id.0)
    }

    #[must_use]
    pub fn contains(&self, id: PlayerId) -> bool {
        id.0 < self.players.len()
    }

    #[must_use]
    pub fn name_of(&self, id: PlayerId) -> &str {
        self.player(id).map_or("<unknown>", |p| p.name.as_str())
    }

    /// First player registered under `name`.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<PlayerId> {
        self.players
            .iter()
            .position(|p| p.name == name)
            .map(PlayerId)
    }

    #[must_use]
    pub fn role_of(&self, id: PlayerId) -> Option<&'static Role> {
        self.player(id).and_then(Player::role)
    }

    #[must_use]
    pub fn faction_of(&self, id: PlayerId) -> Option<Faction> {
        self.player(id).and_then(Player::faction)
    }

    #[must_use]
    pub fn is_alive(&self, id: PlayerId) -> bool {
        self.player(id).is_some_and(Player::is_alive)
    }

    /// Living players in roster order.
    #[must_use]
    pub fn living(&self) -> Vec<PlayerId> {
        self.players
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_alive())
            .map(|(idx, _)| PlayerId(idx))
            .collect()
    }

    #[must_use]
    pub fn living_count(&self) -> usize {
        self.players.iter().filter(|p| p.is_alive()).count()
    }

    #[must_use]
    pub fn living_in_faction(&self, faction: Faction) -> usize {
        self.players
            .iter()
            .filter(|p| p.is_alive() && p.faction() == Some(faction))
            .count()
    }

    /// First living holder of `role`, in roster order.
    #[must_use]
    pub fn living_with_role(&self, role: RoleId) -> Option<PlayerId> {
        self.players
            .iter()
            .position(|p| p.is_alive() && p.role_id() == Some(role))
            .map(PlayerId)
    }

    #[must_use]
    pub const fn winner(&self) -> Option<Faction> {
        self.winner
    }

    /// Record the winner. Only the first declaration sticks.
    pub(crate) fn declare_winner(&mut self, faction: Faction) -> bool {
        if self.winner.is_some() {
            return false;
        }
        self.winner = Some(faction);
        true
    }

    pub(crate) fn record_note(&mut self, id: PlayerId, note: KnowledgeNote) {
        if let Some(player) = self.player_mut(id) {
            player.record_note(note);
        }
    }

    pub(crate) fn kill(&mut self, id: PlayerId, cleaned: bool) -> bool {
        self.player_mut(id).is_some_and(|p| p.kill(cleaned))
    }
}
