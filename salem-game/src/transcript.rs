//! Ordered record of everything a game announced.
//!
//! Every event carries a stable `(day, seq)` identity so two runs of the same
//! seed can be compared event by event, or in one step via
//! [`Transcript::fingerprint`].
use serde::{Deserialize, Serialize};
use std::hash::Hasher;
use twox_hash::XxHash64;

use crate::roles::{Faction, RoleId};
use crate::state::Phase;

/// Stable, deterministic identifier for a single event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId {
    /// Day counter when the event occurred.
    pub day: u32,
    /// Sequence number (0-based) within the day.
    pub seq: u16,
}

impl EventId {
    #[must_use]
    pub const fn new(day: u32, seq: u16) -> Self {
        Self { day, seq }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeathCause {
    MafiaKill,
    JailorExecution,
    DayElimination,
}

impl DeathCause {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::MafiaKill => "killed by the Mafia",
            Self::JailorExecution => "executed by the Jailor",
            Self::DayElimination => "eliminated by the town",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum NoTrialReason {
    TooFewPlayers { living: usize },
    NoSuspects,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    Narration {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        speaker: Option<String>,
        text: String,
    },
    JailChat {
        prisoner: String,
        text: String,
    },
    /// A death announcement. `role` is hidden when the body was cleaned.
    Death {
        victim: String,
        cause: DeathCause,
        role: Option<RoleId>,
    },
    AttackThwarted {
        target: String,
    },
    Trial {
        accused: String,
        suspicion: u32,
        role: RoleId,
    },
    NoTrial(NoTrialReason),
    Winner {
        faction: Faction,
    },
    Stalemate {
        days: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEvent {
    pub id: EventId,
    pub phase: Phase,
    pub kind: EventKind,
}

impl std::fmt::Display for TranscriptEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let stamp = match self.phase {
            Phase::Night => format!("[night {}]", self.id.day),
            Phase::Day => format!("[day {}]", self.id.day),
        };
        match &self.kind {
            EventKind::Narration {
                speaker: Some(speaker),
                text,
            } => write!(f, "{stamp} {speaker}: {text}"),
            EventKind::Narration {
                speaker: None,
                text,
            } => write!(f, "{stamp} {text}"),
            EventKind::JailChat { prisoner, text } => {
                write!(f, "{stamp} (jail) {prisoner}: {text}")
            }
            EventKind::Death {
                victim,
                cause,
                role: Some(role),
            } => write!(f, "{stamp} {victim} was {}. They were the {role}.", cause.label()),
            EventKind::Death {
                victim,
                cause,
                role: None,
            } => write!(
                f,
                "{stamp} {victim} was {}. Their body was cleaned; the role is unknown.",
                cause.label()
            ),
            EventKind::AttackThwarted { target } => {
                write!(f, "{stamp} {target} was attacked but survived the night.")
            }
            EventKind::Trial {
                accused,
                suspicion,
                role,
            } => write!(
                f,
                "{stamp} The town voted out {accused} on {suspicion} suspicion report(s). They were the {role}."
            ),
            EventKind::NoTrial(NoTrialReason::TooFewPlayers { living }) => write!(
                f,
                "{stamp} Only {living} player(s) remain; no trial is held."
            ),
            EventKind::NoTrial(NoTrialReason::NoSuspects) => {
                write!(f, "{stamp} Nobody is under suspicion; no trial is held.")
            }
            EventKind::Winner { faction } => write!(f, "{stamp} {faction} wins!"),
            EventKind::Stalemate { days } => {
                write!(f, "{stamp} No faction prevailed after {days} days.")
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    events: Vec<TranscriptEvent>,
}

impl Transcript {
    #[must_use]
    pub const fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Append an event, numbering it within its day.
    pub fn push(&mut self, day: u32, phase: Phase, kind: EventKind) -> EventId {
        let seq = self.events.iter().filter(|e| e.id.day == day).count();
        let id = EventId::new(day, u16::try_from(seq).unwrap_or(u16::MAX));
        self.events.push(TranscriptEvent { id, phase, kind });
        id
    }

    #[must_use]
    pub fn events(&self) -> &[TranscriptEvent] {
        &self.events
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TranscriptEvent> {
        self.events.iter()
    }

    /// Events from `start` onwards.
    #[must_use]
    pub fn since(&self, start: usize) -> &[TranscriptEvent] {
        self.events.get(start..).unwrap_or(&[])
    }

    /// Hash of every event, in order. Equal transcripts hash equally.
    #[must_use]
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = XxHash64::with_seed(0);
        for event in &self.events {
            let bytes = serde_json::to_vec(event).unwrap_or_default();
            hasher.write(&bytes);
            hasher.write_u8(0xFF);
        }
        hasher.finish()
    }

    /// Render every event as one line of text.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.events.iter().map(ToString::to_string).collect()
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a TranscriptEvent;
    type IntoIter = std::slice::Iter<'a, TranscriptEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
