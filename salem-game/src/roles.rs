//! Static role catalog.
//!
//! Roles are plain values drawn from three fixed catalogs. Nothing in the
//! engine constructs a role at runtime; players point at catalog entries
//! through [`RoleId`].
use serde::{Deserialize, Serialize};

/// Team whose living headcount drives win conditions and targeting rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Faction {
    Town,
    Mafia,
    Neutral,
}

impl Faction {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Town => "Town",
            Self::Mafia => "Mafia",
            Self::Neutral => "Neutral",
        }
    }
}

impl std::fmt::Display for Faction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Classification used by investigative results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Town,
    Mafia,
    Neutral,
}

/// Bucket used to keep Investigator results deliberately ambiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvestigationGroup {
    Leader,
    Investigator,
    Protector,
    Escort,
    Watcher,
    Support,
    Killing,
    Deception,
}

impl InvestigationGroup {
    pub const ALL: &'static [Self] = &[
        Self::Leader,
        Self::Investigator,
        Self::Protector,
        Self::Escort,
        Self::Watcher,
        Self::Support,
        Self::Killing,
        Self::Deception,
    ];
}

/// Identity of a catalog role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleId {
    Jailor,
    Sheriff,
    Investigator,
    Doctor,
    Escort,
    Lookout,
    Townie,
    Godfather,
    Mafioso,
    Consigliere,
    Janitor,
    Jester,
    Executioner,
}

impl RoleId {
    /// Resolve the catalog record for this id.
    #[must_use]
    pub fn role(self) -> &'static Role {
        all_roles()
            .find(|role| role.id == self)
            .unwrap_or(&TOWN_ROLES[FILLER_INDEX])
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        self.role().name
    }
}

impl std::fmt::Display for RoleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Night ability granted to an individual role holder.
///
/// The Mafia kill and the Janitor clean are coordinated per faction rather
/// than per player, so they are not listed here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NightAbility {
    Jail,
    Roleblock,
    Heal,
    Watch,
    SheriffCheck,
    Investigate,
    Consult,
}

/// Immutable role definition shared by every holder of the role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Role {
    pub id: RoleId,
    pub name: &'static str,
    pub alignment: Alignment,
    pub faction: Faction,
    pub investigation_group: InvestigationGroup,
    /// Identity presented during day chat.
    pub fake_claim: RoleId,
}

impl Role {
    const fn new(
        id: RoleId,
        name: &'static str,
        faction: Faction,
        investigation_group: InvestigationGroup,
        fake_claim: RoleId,
    ) -> Self {
        let alignment = match faction {
            Faction::Town => Alignment::Town,
            Faction::Mafia => Alignment::Mafia,
            Faction::Neutral => Alignment::Neutral,
        };
        Self {
            id,
            name,
            alignment,
            faction,
            investigation_group,
            fake_claim,
        }
    }

    #[must_use]
    pub const fn night_ability(&self) -> Option<NightAbility> {
        match self.id {
            RoleId::Jailor => Some(NightAbility::Jail),
            RoleId::Sheriff => Some(NightAbility::SheriffCheck),
            RoleId::Investigator => Some(NightAbility::Investigate),
            RoleId::Doctor => Some(NightAbility::Heal),
            RoleId::Escort => Some(NightAbility::Roleblock),
            RoleId::Lookout => Some(NightAbility::Watch),
            RoleId::Consigliere => Some(NightAbility::Consult),
            RoleId::Townie
            | RoleId::Godfather
            | RoleId::Mafioso
            | RoleId::Janitor
            | RoleId::Jester
            | RoleId::Executioner => None,
        }
    }

    #[must_use]
    pub const fn is_town(&self) -> bool {
        matches!(self.faction, Faction::Town)
    }

    #[must_use]
    pub const fn is_mafia(&self) -> bool {
        matches!(self.faction, Faction::Mafia)
    }
}

const FILLER_INDEX: usize = 6;

/// Town role used to pad the Town pool when it runs short.
pub const FILLER_TOWN_ROLE: RoleId = RoleId::Townie;

pub const TOWN_ROLES: [Role; 7] = [
    Role::new(
        RoleId::Jailor,
        "Jailor",
        Faction::Town,
        InvestigationGroup::Leader,
        RoleId::Jailor,
    ),
    Role::new(
        RoleId::Sheriff,
        "Sheriff",
        Faction::Town,
        InvestigationGroup::Investigator,
        RoleId::Sheriff,
    ),
    Role::new(
        RoleId::Investigator,
        "Investigator",
        Faction::Town,
        InvestigationGroup::Investigator,
        RoleId::Investigator,
    ),
    Role::new(
        RoleId::Doctor,
        "Doctor",
        Faction::Town,
        InvestigationGroup::Protector,
        RoleId::Doctor,
    ),
    Role::new(
        RoleId::Escort,
        "Escort",
        Faction::Town,
        InvestigationGroup::Escort,
        RoleId::Escort,
    ),
    Role::new(
        RoleId::Lookout,
        "Lookout",
        Faction::Town,
        InvestigationGroup::Watcher,
        RoleId::Lookout,
    ),
    Role::new(
        RoleId::Townie,
        "Townie",
        Faction::Town,
        InvestigationGroup::Support,
        RoleId::Townie,
    ),
];

pub const MAFIA_ROLES: [Role; 4] = [
    Role::new(
        RoleId::Godfather,
        "Godfather",
        Faction::Mafia,
        InvestigationGroup::Leader,
        RoleId::Investigator,
    ),
    Role::new(
        RoleId::Mafioso,
        "Mafioso",
        Faction::Mafia,
        InvestigationGroup::Killing,
        RoleId::Townie,
    ),
    Role::new(
        RoleId::Consigliere,
        "Consigliere",
        Faction::Mafia,
        InvestigationGroup::Investigator,
        RoleId::Sheriff,
    ),
    Role::new(
        RoleId::Janitor,
        "Janitor",
        Faction::Mafia,
        InvestigationGroup::Support,
        RoleId::Doctor,
    ),
];

pub const NEUTRAL_ROLES: [Role; 2] = [
    Role::new(
        RoleId::Jester,
        "Jester",
        Faction::Neutral,
        InvestigationGroup::Deception,
        RoleId::Townie,
    ),
    Role::new(
        RoleId::Executioner,
        "Executioner",
        Faction::Neutral,
        InvestigationGroup::Deception,
        RoleId::Sheriff,
    ),
];

/// Iterate every catalog role: Town, then Mafia, then Neutral.
pub fn all_roles() -> impl Iterator<Item = &'static Role> {
    TOWN_ROLES
        .iter()
        .chain(MAFIA_ROLES.iter())
        .chain(NEUTRAL_ROLES.iter())
}

/// Catalog for a faction.
#[must_use]
pub const fn catalog(faction: Faction) -> &'static [Role] {
    match faction {
        Faction::Town => &TOWN_ROLES,
        Faction::Mafia => &MAFIA_ROLES,
        Faction::Neutral => &NEUTRAL_ROLES,
    }
}
