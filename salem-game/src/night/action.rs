use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::roles::NightAbility;
use crate::state::PlayerId;

/// Kind of a recorded night action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Jail,
    Roleblock,
    Heal,
    Watch,
    MafiaKill,
    JanitorClean,
    SheriffCheck,
    Investigate,
    Consult,
}

impl ActionKind {
    /// Kinds with at most one record per night. Recording another replaces it.
    #[must_use]
    pub const fn is_singleton(self) -> bool {
        match self {
            Self::Jail
            | Self::Roleblock
            | Self::Heal
            | Self::Watch
            | Self::MafiaKill
            | Self::JanitorClean => true,
            Self::SheriffCheck | Self::Investigate | Self::Consult => false,
        }
    }

    #[must_use]
    pub const fn from_ability(ability: NightAbility) -> Self {
        match ability {
            NightAbility::Jail => Self::Jail,
            NightAbility::Roleblock => Self::Roleblock,
            NightAbility::Heal => Self::Heal,
            NightAbility::Watch => Self::Watch,
            NightAbility::SheriffCheck => Self::SheriffCheck,
            NightAbility::Investigate => Self::Investigate,
            NightAbility::Consult => Self::Consult,
        }
    }
}

/// One actor's choice for the night.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NightAction {
    pub kind: ActionKind,
    pub actor: PlayerId,
    pub target: Option<PlayerId>,
}

impl NightAction {
    #[must_use]
    pub const fn new(kind: ActionKind, actor: PlayerId, target: Option<PlayerId>) -> Self {
        Self {
            kind,
            actor,
            target,
        }
    }
}

/// Actions recorded for a single night, in recording order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NightPlan {
    actions: SmallVec<[NightAction; 8]>,
}

impl NightPlan {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an action. A singleton kind overwrites the previous record in
    /// place; per-actor kinds overwrite that actor's previous record.
    pub fn record(&mut self, action: NightAction) {
        let existing = self.actions.iter_mut().find(|slot| {
            slot.kind == action.kind && (action.kind.is_singleton() || slot.actor == action.actor)
        });
        match existing {
            Some(slot) => *slot = action,
            None => self.actions.push(action),
        }
    }

    #[must_use]
    pub fn find(&self, kind: ActionKind) -> Option<&NightAction> {
        self.actions.iter().find(|a| a.kind == kind)
    }

    /// Target of the first action of `kind`.
    #[must_use]
    pub fn target_of(&self, kind: ActionKind) -> Option<PlayerId> {
        self.find(kind).and_then(|a| a.target)
    }

    /// Drop every action performed by `actor`.
    pub fn remove_actor(&mut self, actor: PlayerId) {
        self.actions.retain(|a| a.actor != actor);
    }

    /// Actors other than `exclude` whose action targeted `target`, in
    /// recording order, without repeats.
    #[must_use]
    pub fn visitors_of(&self, target: PlayerId, exclude: PlayerId) -> Vec<PlayerId> {
        let mut visitors = Vec::new();
        for action in &self.actions {
            if action.target == Some(target)
                && action.actor != exclude
                && !visitors.contains(&action.actor)
            {
                visitors.push(action.actor);
            }
        }
        visitors
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NightAction> {
        self.actions.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl<'a> IntoIterator for &'a NightPlan {
    type Item = &'a NightAction;
    type IntoIter = std::slice::Iter<'a, NightAction>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn singleton_kinds_replace_in_place() {
        let mut plan = NightPlan::new();
        plan.record(NightAction::new(
            ActionKind::Heal,
            PlayerId(0),
            Some(PlayerId(1)),
        ));
        plan.record(NightAction::new(
            ActionKind::SheriffCheck,
            PlayerId(2),
            Some(PlayerId(3)),
        ));
        plan.record(NightAction::new(
            ActionKind::Heal,
            PlayerId(4),
            Some(PlayerId(5)),
        ));
        assert_eq!(plan.len(), 2);
        assert_eq!(plan.target_of(ActionKind::Heal), Some(PlayerId(5)));
        assert_eq!(plan.iter().next().map(|a| a.kind), Some(ActionKind::Heal));
    }

    #[test]
    fn per_actor_kinds_keep_one_record_per_actor() {
        let mut plan = NightPlan::new();
        plan.record(NightAction::new(
            ActionKind::SheriffCheck,
            PlayerId(0),
            Some(PlayerId(1)),
        ));
        plan.record(NightAction::new(
            ActionKind::SheriffCheck,
            PlayerId(2),
            Some(PlayerId(1)),
        ));
        plan.record(NightAction::new(
            ActionKind::SheriffCheck,
            PlayerId(0),
            Some(PlayerId(3)),
        ));
        assert_eq!(plan.len(), 2);
        let targets: Vec<_> = plan.iter().map(|a| a.target).collect();
        assert_eq!(targets, vec![Some(PlayerId(3)), Some(PlayerId(1))]);
    }

    #[test]
    fn visitors_exclude_the_watcher_and_repeat_actors() {
        let mut plan = NightPlan::new();
        plan.record(NightAction::new(
            ActionKind::MafiaKill,
            PlayerId(1),
            Some(PlayerId(4)),
        ));
        plan.record(NightAction::new(
            ActionKind::JanitorClean,
            PlayerId(2),
            Some(PlayerId(4)),
        ));
        plan.record(NightAction::new(
            ActionKind::Watch,
            PlayerId(3),
            Some(PlayerId(4)),
        ));
        plan.record(NightAction::new(
            ActionKind::Consult,
            PlayerId(2),
            Some(PlayerId(4)),
        ));
        assert_eq!(
            plan.visitors_of(PlayerId(4), PlayerId(3)),
            vec![PlayerId(1), PlayerId(2)]
        );
    }

    #[test]
    fn removing_an_actor_drops_all_of_their_actions() {
        let mut plan = NightPlan::new();
        plan.record(NightAction::new(
            ActionKind::Consult,
            PlayerId(2),
            Some(PlayerId(0)),
        ));
        plan.record(NightAction::new(
            ActionKind::JanitorClean,
            PlayerId(2),
            Some(PlayerId(0)),
        ));
        plan.record(NightAction::new(ActionKind::Jail, PlayerId(1), Some(PlayerId(2))));
        plan.remove_actor(PlayerId(2));
        assert_eq!(plan.len(), 1);
        assert!(plan.find(ActionKind::JanitorClean).is_none());
    }
}
