//! Narration seam.
//!
//! Flavor text comes from an external text-completion service behind the
//! [`Narrator`] trait. The engine only forwards prompts and records the
//! returned text in the transcript; it never parses what comes back.
use crate::roles::Role;
use crate::state::{Persona, Player};

/// Marker phrase identifying the opening prompt.
pub const INTRO_MARKER: &str = "Introduce the setting";

/// Synchronous text-completion provider.
pub trait Narrator {
    /// Return flavor text for `prompt`.
    fn complete(&mut self, prompt: &str) -> String;
}

impl<N: Narrator + ?Sized> Narrator for Box<N> {
    fn complete(&mut self, prompt: &str) -> String {
        (**self).complete(prompt)
    }
}

impl<N: Narrator + ?Sized> Narrator for &mut N {
    fn complete(&mut self, prompt: &str) -> String {
        (**self).complete(prompt)
    }
}

/// Deterministic stand-in used for simulations and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockNarrator;

impl MockNarrator {
    pub const INTRODUCTION: &'static str = "The town settles in as the sun dips, whispers filling the square. A chill falls as secrets awaken.";
    pub const GENERIC_LINE: &'static str = "Day log: claim and note suspicious behavior.";
}

impl Narrator for MockNarrator {
    fn complete(&mut self, prompt: &str) -> String {
        if prompt.contains(INTRO_MARKER) {
            Self::INTRODUCTION.to_string()
        } else {
            Self::GENERIC_LINE.to_string()
        }
    }
}

/// Narrator that records every prompt it receives. Useful in tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingNarrator {
    pub prompts: Vec<String>,
}

impl Narrator for RecordingNarrator {
    fn complete(&mut self, prompt: &str) -> String {
        self.prompts.push(prompt.to_string());
        MockNarrator.complete(prompt)
    }
}

#[must_use]
pub fn intro_prompt() -> String {
    format!("{INTRO_MARKER} for a Town of Salem style game night in two sentences.")
}

/// Role a player presents in public. Non-Town roles use their fake claim.
#[must_use]
pub fn claimed_role(role: &Role) -> &'static str {
    if role.is_town() {
        role.name
    } else {
        role.fake_claim.name()
    }
}

/// Day-chat prompt for one speaker.
#[must_use]
pub fn day_chat_prompt(speaker: &Player, day: u32, recent_deaths: &[String]) -> String {
    let claim = speaker.role().map_or("Townie", claimed_role);
    let persona = speaker.persona;
    let context = if recent_deaths.is_empty() {
        "Nobody died last night.".to_string()
    } else {
        format!("Last night the town lost {}.", recent_deaths.join(", "))
    };
    format!(
        "You are {name}, a {persona_label} townsperson ({style}). You claim to be the {claim}. \
         It is day {day}. {context} Speak one line to the town.",
        name = speaker.name,
        persona_label = persona_label(persona),
        style = persona.style(),
    )
}

/// Prompt for the private conversation between the Jailor and a prisoner.
#[must_use]
pub fn jail_chat_prompt(prisoner: &Player, day: u32) -> String {
    let claim = prisoner.role().map_or("Townie", claimed_role);
    format!(
        "Night {day}. {name} sits in the Jailor's cell claiming to be the {claim}. \
         Write the prisoner's plea in one line, in a {style} voice.",
        name = prisoner.name,
        style = prisoner.persona.style(),
    )
}

const fn persona_label(persona: Persona) -> &'static str {
    match persona {
        Persona::Cautious => "cautious",
        Persona::Bold => "bold",
        Persona::Analytical => "analytical",
        Persona::Charming => "charming",
        Persona::Nervous => "nervous",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles::RoleId;

    #[test]
    fn mock_returns_intro_for_setting_prompt() {
        let mut narrator = MockNarrator;
        assert_eq!(narrator.complete(&intro_prompt()), MockNarrator::INTRODUCTION);
        assert_eq!(
            narrator.complete("anything else"),
            MockNarrator::GENERIC_LINE
        );
    }

    #[test]
    fn mafia_speakers_present_their_fake_claim() {
        let godfather = Player::with_role("Gus", RoleId::Godfather);
        let prompt = day_chat_prompt(&godfather, 2, &[]);
        assert!(prompt.contains("claim to be the Investigator"));
        assert!(!prompt.contains("Godfather"));
        assert!(prompt.contains("Nobody died"));
    }

    #[test]
    fn town_speakers_claim_their_own_role() {
        let doc = Player::with_role("Dee", RoleId::Doctor);
        let prompt = day_chat_prompt(&doc, 3, &["Ann".to_string()]);
        assert!(prompt.contains("claim to be the Doctor"));
        assert!(prompt.contains("lost Ann"));
    }

    #[test]
    fn recording_narrator_keeps_prompts_in_order() {
        let mut narrator = RecordingNarrator::default();
        let prisoner = Player::with_role("Jo", RoleId::Janitor);
        narrator.complete(&intro_prompt());
        narrator.complete(&jail_chat_prompt(&prisoner, 1));
        assert_eq!(narrator.prompts.len(), 2);
        assert!(narrator.prompts[1].contains("claiming to be the Doctor"));
    }
}
