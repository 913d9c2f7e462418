//! Salem Game Engine
//!
//! Round resolution for a hidden-faction social-deduction game: role dealing,
//! night actions, investigations, the day vote and win checks. Narration is
//! supplied through the [`Narrator`] seam; nothing here depends on a UI.

pub mod config;
pub mod day;
pub mod error;
pub mod game;
pub mod investigation;
pub mod narration;
pub mod night;
pub mod roles;
pub mod roster;
pub mod seed;
pub mod state;
pub mod transcript;
pub mod win;

// Re-export commonly used types
pub use config::{FactionCounts, RulesConfig};
pub use day::{DayOutcome, SuspicionTally};
pub use error::{ConfigError, EngineError};
pub use game::{DeathRecord, Game, GameOutcome};
pub use narration::{MockNarrator, Narrator, RecordingNarrator};
pub use night::{ActionKind, NightAction, NightDeath, NightPlan, NightReport};
pub use roles::{Alignment, Faction, InvestigationGroup, NightAbility, Role, RoleId};
pub use roster::{SeatPlan, assign_roles};
pub use seed::{derive_stream_seed, entropy_seed};
pub use state::{GameState, KnowledgeNote, Persona, Phase, Player, PlayerId, SheriffVerdict};
pub use transcript::{DeathCause, EventId, EventKind, NoTrialReason, Transcript, TranscriptEvent};
