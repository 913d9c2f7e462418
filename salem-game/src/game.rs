//! The game aggregate: roster, state, RNG and narrator in one place.
use log::{debug, info};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};

use crate::config::RulesConfig;
use crate::day::{self, DayOutcome};
use crate::error::EngineError;
use crate::narration::{MockNarrator, Narrator, intro_prompt, jail_chat_prompt};
use crate::night::{self, ActionKind, NightPlan, NightReport};
use crate::roles::{Faction, RoleId};
use crate::roster::assign_roles;
use crate::seed::{entropy_seed, game_rng};
use crate::state::{GameState, Phase, Player};
use crate::transcript::{DeathCause, EventKind, Transcript};
use crate::win;

/// A death as announced to the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeathRecord {
    pub name: String,
    pub day: u32,
    pub phase: Phase,
    pub cause: DeathCause,
    /// Revealed role; hidden for cleaned bodies.
    pub role: Option<RoleId>,
}

/// Everything a finished game produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOutcome {
    pub seed: u64,
    /// `None` when the day cap ended the game.
    pub winner: Option<Faction>,
    /// Nights resolved.
    pub days: u32,
    pub deaths: Vec<DeathRecord>,
    pub players: Vec<Player>,
    pub transcript: Transcript,
}

impl GameOutcome {
    #[must_use]
    pub fn is_stalemate(&self) -> bool {
        self.winner.is_none()
    }
}

pub struct Game<N: Narrator = MockNarrator> {
    seed: u64,
    rules: RulesConfig,
    state: GameState,
    rng: ChaCha20Rng,
    narrator: N,
    transcript: Transcript,
    deaths: Vec<DeathRecord>,
    last_night_deaths: Vec<String>,
}

impl Game<MockNarrator> {
    /// New game with default rules and the mock narrator.
    ///
    /// An empty `names` list seats the configured default roster; a `None`
    /// seed is drawn from OS entropy.
    #[must_use]
    pub fn new(names: Vec<String>, seed: Option<u64>) -> Self {
        Self::with_config(names, seed, RulesConfig::default())
    }

    #[must_use]
    pub fn with_config(names: Vec<String>, seed: Option<u64>, rules: RulesConfig) -> Self {
        Game::with_narrator(names, seed, rules, MockNarrator)
    }
}

impl<N: Narrator> Game<N> {
    #[must_use]
    pub fn with_narrator(
        names: Vec<String>,
        seed: Option<u64>,
        rules: RulesConfig,
        narrator: N,
    ) -> Self {
        let seed = seed.unwrap_or_else(entropy_seed);
        let names = if names.is_empty() {
            rules.default_players.clone()
        } else {
            names
        };
        let mut rng = game_rng(seed);
        let players = assign_roles(&names, &rules, &mut rng);
        info!("seating {} players (seed {seed})", players.len());
        let state = GameState::new(players, &rules);
        Self::assemble(seed, rules, state, rng, narrator)
    }

    /// Continue from an already dealt table. Used for fixed-role setups.
    #[must_use]
    pub fn from_state(state: GameState, seed: u64, rules: RulesConfig, narrator: N) -> Self {
        let rng = game_rng(seed);
        Self::assemble(seed, rules, state, rng, narrator)
    }

    fn assemble(
        seed: u64,
        rules: RulesConfig,
        state: GameState,
        rng: ChaCha20Rng,
        narrator: N,
    ) -> Self {
        Self {
            seed,
            rules,
            state,
            rng,
            narrator,
            transcript: Transcript::new(),
            deaths: Vec::new(),
            last_night_deaths: Vec::new(),
        }
    }

    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    #[must_use]
    pub const fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub const fn rules(&self) -> &RulesConfig {
        &self.rules
    }

    #[must_use]
    pub const fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    #[must_use]
    pub fn narrator(&self) -> &N {
        &self.narrator
    }

    /// Emit the opening narration.
    pub fn introduce(&mut self) {
        let text = self.narrator.complete(&intro_prompt());
        self.transcript.push(
            self.state.day,
            Phase::Night,
            EventKind::Narration {
                speaker: None,
                text,
            },
        );
    }

    /// Play one night.
    ///
    /// # Errors
    ///
    /// Propagates validation failures from the night resolver. The game
    /// state and transcript are unchanged when this happens; the RNG stream
    /// and the narrator are not rewound.
    pub fn step_night(&mut self) -> Result<NightReport, EngineError> {
        let plan = night::plan_night(&self.state, &self.rules, &mut self.rng);
        self.play_night(plan)
    }

    fn play_night(&mut self, plan: NightPlan) -> Result<NightReport, EngineError> {
        let night = self.state.day;
        let jail_chat = plan
            .target_of(ActionKind::Jail)
            .and_then(|prisoner| self.state.player(prisoner))
            .map(|player| EventKind::JailChat {
                prisoner: player.name.clone(),
                text: self.narrator.complete(&jail_chat_prompt(player, night)),
            });

        let previous_phase = self.state.phase;
        self.state.phase = Phase::Night;
        let report = match night::resolve_night(&mut self.state, plan, &self.rules) {
            Ok(report) => report,
            Err(err) => {
                self.state.phase = previous_phase;
                return Err(err);
            }
        };

        if let Some(event) = jail_chat {
            self.transcript.push(night, Phase::Night, event);
        }

        if let Some(target) = report.saved {
            self.transcript.push(
                night,
                Phase::Night,
                EventKind::AttackThwarted {
                    target: self.state.name_of(target).to_string(),
                },
            );
        }
        self.last_night_deaths.clear();
        for death in &report.deaths {
            let name = self.state.name_of(death.victim).to_string();
            let role = if death.cleaned {
                None
            } else {
                self.state.player(death.victim).and_then(Player::role_id)
            };
            self.transcript.push(
                night,
                Phase::Night,
                EventKind::Death {
                    victim: name.clone(),
                    cause: death.cause,
                    role,
                },
            );
            self.deaths.push(DeathRecord {
                name: name.clone(),
                day: night,
                phase: Phase::Night,
                cause: death.cause,
                role,
            });
            self.last_night_deaths.push(name);
        }
        Ok(report)
    }

    /// Play one day: chatter, then the vote.
    pub fn step_day(&mut self) -> DayOutcome {
        self.state.phase = Phase::Day;
        let today = self.state.day;
        for (speaker, text) in
            day::day_chatter(&self.state, &mut self.narrator, &self.last_night_deaths)
        {
            self.transcript.push(
                today,
                Phase::Day,
                EventKind::Narration {
                    speaker: Some(self.state.name_of(speaker).to_string()),
                    text,
                },
            );
        }

        let outcome = day::resolve_day(&mut self.state, &self.rules);
        match outcome {
            DayOutcome::Eliminated { accused, suspicion } => {
                let name = self.state.name_of(accused).to_string();
                let role = self
                    .state
                    .player(accused)
                    .and_then(Player::role_id)
                    .unwrap_or(RoleId::Townie);
                self.transcript.push(
                    today,
                    Phase::Day,
                    EventKind::Trial {
                        accused: name.clone(),
                        suspicion,
                        role,
                    },
                );
                self.deaths.push(DeathRecord {
                    name,
                    day: today,
                    phase: Phase::Day,
                    cause: DeathCause::DayElimination,
                    role: Some(role),
                });
            }
            DayOutcome::NoTrial(reason) => {
                self.transcript
                    .push(today, Phase::Day, EventKind::NoTrial(reason));
            }
        }
        outcome
    }

    /// Evaluate the win condition, announcing a winner the first time one
    /// is found.
    pub fn check_winner(&mut self) -> Option<Faction> {
        let already = self.state.winner();
        let winner = win::check(&mut self.state);
        if already.is_none()
            && let Some(faction) = winner
        {
            self.transcript.push(
                self.state.day,
                self.state.phase,
                EventKind::Winner { faction },
            );
        }
        winner
    }

    /// Play to completion.
    ///
    /// # Errors
    ///
    /// Returns the first engine error raised by a night. The engine never
    /// retries on its own.
    pub fn run(mut self) -> Result<GameOutcome, EngineError> {
        self.introduce();
        loop {
            if self.state.day > self.rules.max_days {
                let days = self.rules.max_days;
                debug!("day cap of {days} reached without a winner");
                self.transcript
                    .push(self.state.day, self.state.phase, EventKind::Stalemate { days });
                break;
            }
            self.step_night()?;
            if self.check_winner().is_some() {
                break;
            }
            self.step_day();
            if self.check_winner().is_some() {
                break;
            }
        }
        Ok(self.into_outcome())
    }

    fn into_outcome(self) -> GameOutcome {
        GameOutcome {
            seed: self.seed,
            winner: self.state.winner(),
            days: self.state.day.saturating_sub(1),
            deaths: self.deaths,
            players: self.state.players().to_vec(),
            transcript: self.transcript,
        }
    }
}
