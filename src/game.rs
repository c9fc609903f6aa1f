use crate::schedule::{Deadline, Interval};
use crate::theme::{Catalog, Theme};
use clap::ValueEnum;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::time::{Duration, Instant};

/// Seconds the "time's up" splash holds before the board returns minus one.
const REVEAL_DELAY_SECS: u64 = 3;

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum, strum_macros::Display)]
pub enum Level {
    Easy,
    Medium,
    Hard,
}

/// Board size and memorize time for one difficulty level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundSettings {
    pub item_count: usize,
    pub memorize_secs: u64,
}

impl Level {
    pub fn settings(&self) -> RoundSettings {
        match self {
            Level::Easy => RoundSettings {
                item_count: 5,
                memorize_secs: 15,
            },
            Level::Medium => RoundSettings {
                item_count: 8,
                memorize_secs: 30,
            },
            Level::Hard => RoundSettings {
                item_count: 11,
                memorize_secs: 60,
            },
        }
    }
}

/// Where a running round currently is.
///
/// Memorize and TimeUp advance on the clock alone; Recall is terminal for
/// the round and only `play_again`/`quit` leave it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Memorize,
    TimeUp,
    Recall,
}

/// The board as it comes back after the pause: every icon but one in a fresh
/// shuffle, plus the icon that was taken away.
#[derive(Debug, Clone)]
pub struct Reveal {
    pub remaining: Vec<String>,
    pub omitted: String,
}

#[derive(Debug, Clone, Default)]
pub struct Answer {
    pub input: String,
    pub checked: bool,
    pub result: String,
}

/// Owns all game state. The UI reads `&Game` each frame and relays player
/// intent back through the command methods; nothing here blocks or sleeps,
/// time only moves when `poll` is called with the current instant.
#[derive(Debug)]
pub struct Game {
    pub level: Option<Level>,
    pub theme: Option<Theme>,
    pub started: bool,
    pub phase: Phase,
    pub time_left: u64,
    pub items: Vec<String>,
    pub reveal: Option<Reveal>,
    pub answer: Answer,
    catalog: Option<Catalog>,
    countdown: Interval,
    reveal_delay: Deadline,
    rng: StdRng,
}

impl Game {
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// Fixed shuffle seed, for reproducible rounds and deterministic tests.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            level: None,
            theme: None,
            started: false,
            phase: Phase::Memorize,
            time_left: 0,
            items: Vec::new(),
            reveal: None,
            answer: Answer::default(),
            catalog: None,
            countdown: Interval::every(Duration::from_secs(1)),
            reveal_delay: Deadline::default(),
            rng,
        }
    }

    pub fn select_level(&mut self, level: Level) {
        if !self.started {
            self.level = Some(level);
        }
    }

    pub fn select_theme(&mut self, theme: Theme) {
        if !self.started {
            self.theme = Some(theme);
        }
    }

    pub fn is_ready(&self) -> bool {
        self.level.is_some() && self.theme.is_some()
    }

    /// Begin the first round. No-op unless a level and a theme are picked
    /// and no round is already running; the menu greys the action out too.
    pub fn start(&mut self, now: Instant) {
        if self.started {
            return;
        }
        let (level, theme) = match (self.level, self.theme) {
            (Some(level), Some(theme)) => (level, theme),
            _ => return,
        };

        self.catalog = Some(theme.catalog());
        self.started = true;
        self.begin_round(level, now);
    }

    /// Restart with a fresh board at the same level and theme.
    pub fn play_again(&mut self, now: Instant) {
        let level = match (self.started, self.level) {
            (true, Some(level)) => level,
            _ => return,
        };
        self.begin_round(level, now);
    }

    fn begin_round(&mut self, level: Level, now: Instant) {
        let settings = level.settings();
        if let Some(catalog) = &self.catalog {
            self.items = sample_items(catalog, settings.item_count, &mut self.rng);
        }
        self.time_left = settings.memorize_secs;
        self.phase = Phase::Memorize;
        self.reveal = None;
        self.answer = Answer::default();
        self.reveal_delay.cancel();
        self.countdown.start(now);
    }

    /// Back to the idle menu. Cancels whatever is armed, from any phase.
    pub fn quit(&mut self) {
        self.countdown.cancel();
        self.reveal_delay.cancel();
        self.started = false;
        self.level = None;
        self.theme = None;
        self.phase = Phase::Memorize;
        self.time_left = 0;
        self.items.clear();
        self.reveal = None;
        self.answer = Answer::default();
        self.catalog = None;
    }

    /// Fire every schedule whose deadline has passed. The event loop calls
    /// this on each coarse tick with the wall clock; tests pass fabricated
    /// instants. A late poll catches up second by second, so the countdown
    /// decrements exactly once per elapsed second and never goes negative.
    ///
    /// Returns whether anything changed, so the caller knows to redraw.
    pub fn poll(&mut self, now: Instant) -> bool {
        let mut changed = false;

        while self.countdown.fire(now) {
            changed = true;
            self.time_left = self.time_left.saturating_sub(1);
            if self.time_left == 0 {
                self.countdown.cancel();
                self.reveal_delay
                    .arm(now + Duration::from_secs(REVEAL_DELAY_SECS));
                self.phase = Phase::TimeUp;
            }
        }

        if self.reveal_delay.fire(now) {
            changed = true;
            self.enter_recall();
        }

        changed
    }

    /// The one irreversible random decision per round: shuffle the full
    /// board into a fresh permutation and pull one position out of it.
    fn enter_recall(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let mut shuffled = self.items.clone();
        shuffled.shuffle(&mut self.rng);
        let omitted = shuffled.remove(self.rng.gen_range(0..shuffled.len()));
        self.reveal = Some(Reveal {
            remaining: shuffled,
            omitted,
        });
        self.phase = Phase::Recall;
    }

    pub fn set_answer<S: Into<String>>(&mut self, text: S) {
        if self.accepts_answer() {
            self.answer.input = text.into();
        }
    }

    pub fn type_char(&mut self, c: char) {
        if self.accepts_answer() {
            self.answer.input.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if self.accepts_answer() {
            self.answer.input.pop();
        }
    }

    fn accepts_answer(&self) -> bool {
        self.started && self.phase == Phase::Recall
    }

    /// Judge the current input against the omitted icon's canonical name,
    /// once. Matching is trim + lowercase; anything beyond that is on the
    /// player. A second call keeps the first verdict no matter how the
    /// input changed in between.
    pub fn check(&mut self) {
        if !self.accepts_answer() || self.answer.checked {
            return;
        }
        let reveal = match &self.reveal {
            Some(reveal) => reveal,
            None => return,
        };

        let cleaned = self.answer.input.trim().to_lowercase();
        let name = self
            .catalog
            .as_ref()
            .and_then(|catalog| catalog.icon_name(&reveal.omitted));

        // A missing name entry is a catalog gap, not a valid answer: report
        // it and score the round incorrect instead of comparing against
        // nothing. Shipped catalogs name every icon, so this only surfaces
        // after a bad catalog edit.
        self.answer.result = match name {
            Some(name) if cleaned == name => "Correct!".to_string(),
            Some(name) => format!("Wrong. The answer was {name}."),
            None => format!(
                "No name is registered for {}. This round can't be won.",
                reveal.omitted
            ),
        };
        self.answer.checked = true;
    }

    /// True while either timer handle is armed. Exists so teardown behavior
    /// is observable from tests and the event loop.
    pub fn has_pending_schedule(&self) -> bool {
        self.countdown.is_armed() || self.reveal_delay.is_armed()
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

fn sample_items(catalog: &Catalog, count: usize, rng: &mut StdRng) -> Vec<String> {
    // Uniform permutation, take the first `count`: sampling without
    // replacement, so a board never repeats an icon.
    let mut icons = catalog.icons.clone();
    icons.shuffle(rng);
    icons.truncate(count);
    icons
}
