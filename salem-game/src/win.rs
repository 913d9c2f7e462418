//! Win conditions, checked after every phase.
use crate::roles::Faction;
use crate::state::GameState;

/// Winner implied by the living headcount, if any.
#[must_use]
pub fn evaluate(state: &GameState) -> Option<Faction> {
    let mafia = state.living_in_faction(Faction::Mafia);
    let town = state.living_in_faction(Faction::Town);
    if mafia == 0 {
        Some(Faction::Town)
    } else if mafia >= town {
        Some(Faction::Mafia)
    } else {
        None
    }
}

/// Evaluate and freeze the winner. A recorded winner is returned as is.
pub fn check(state: &mut GameState) -> Option<Faction> {
    if let Some(winner) = state.winner() {
        return Some(winner);
    }
    let winner = evaluate(state)?;
    state.declare_winner(winner);
    log::info!("{winner} wins on day {}", state.day);
    Some(winner)
}
