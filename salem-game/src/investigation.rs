//! What investigative roles learn at night.
use crate::config::RulesConfig;
use crate::night::{ActionKind, NightAction, NightPlan};
use crate::roles::Alignment;
use crate::state::{GameState, KnowledgeNote, PlayerId, SheriffVerdict};

/// Note produced by a single action, if it is investigative.
#[must_use]
pub fn note_for(
    state: &GameState,
    plan: &NightPlan,
    action: &NightAction,
    rules: &RulesConfig,
    night: u32,
) -> Option<KnowledgeNote> {
    let target = action.target?;
    let role = state.role_of(target)?;
    let name = state.name_of(target).to_string();
    match action.kind {
        ActionKind::SheriffCheck => {
            let verdict = match role.alignment {
                Alignment::Mafia | Alignment::Neutral => SheriffVerdict::Suspicious,
                Alignment::Town => SheriffVerdict::Innocent,
            };
            Some(KnowledgeNote::Sheriff {
                night,
                target: name,
                verdict,
            })
        }
        ActionKind::Investigate => Some(KnowledgeNote::Investigator {
            night,
            target: name,
            hint: rules.investigator_hint(role.investigation_group).to_string(),
        }),
        ActionKind::Consult => Some(KnowledgeNote::Consigliere {
            night,
            target: name,
            role: role.id,
        }),
        ActionKind::Watch => Some(KnowledgeNote::Lookout {
            night,
            target: name,
            visitors: plan
                .visitors_of(target, action.actor)
                .into_iter()
                .map(|id| state.name_of(id).to_string())
                .collect(),
        }),
        ActionKind::Jail
        | ActionKind::Roleblock
        | ActionKind::Heal
        | ActionKind::MafiaKill
        | ActionKind::JanitorClean => None,
    }
}

/// Append every investigative result in `plan` to its actor's log.
pub fn apply(state: &mut GameState, plan: &NightPlan, rules: &RulesConfig, night: u32) {
    let notes: Vec<(PlayerId, KnowledgeNote)> = plan
        .iter()
        .filter_map(|action| {
            note_for(state, plan, action, rules, night).map(|note| (action.actor, note))
        })
        .collect();
    for (actor, note) in notes {
        log::debug!("{} learns: {note}", state.name_of(actor));
        state.record_note(actor, note);
    }
}
