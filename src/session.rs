//! Round lifecycle: waiting → running → finished, live scoring, countdown.

use std::time::{Duration, Instant};

use log::{debug, info};

use crate::language::{Language, WordSource};
use crate::layout::{keymap, KeyId};
use crate::scoring::{compute_accuracy, compute_wpm, count_correct};

/// Length of every round.
pub const ROUND_SECS: u32 = 60;
pub const DEFAULT_NUMBER_OF_WORDS: usize = 50;

const TICK: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Phase {
    Waiting,
    Running,
    Finished,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub number_of_words: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            number_of_words: DEFAULT_NUMBER_OF_WORDS,
        }
    }
}

/// Results frozen when a round finishes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinalStats {
    pub wpm: u32,
    pub accuracy: u32,
    pub correct_chars: usize,
    pub typed_chars: usize,
    /// Wall-clock time between the first keystroke and the finish.
    pub elapsed: Duration,
}

/// One-second countdown timer, armed only while a round is running.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Countdown {
    next_tick: Option<Instant>,
}

impl Countdown {
    pub fn start(&mut self, now: Instant) {
        self.next_tick = Some(now + TICK);
    }

    pub fn stop(&mut self) {
        self.next_tick = None;
    }

    pub fn is_active(&self) -> bool {
        self.next_tick.is_some()
    }

    pub fn next_tick(&self) -> Option<Instant> {
        self.next_tick
    }

    /// Consumes one due tick, scheduling the following one. Returns the
    /// deadline that fired.
    fn take_due(&mut self, now: Instant) -> Option<Instant> {
        let at = self.next_tick.filter(|at| *at <= now)?;
        self.next_tick = Some(at + TICK);
        Some(at)
    }
}

/// A single typing round and everything derived from it.
#[derive(Debug)]
pub struct Session<S: WordSource = Language> {
    source: S,
    config: SessionConfig,
    target_text: String,
    target_len: usize,
    user_input: String,
    input_len: usize,
    phase: Phase,
    started_at: Option<Instant>,
    remaining_secs: u32,
    correct_chars: usize,
    live_wpm: u32,
    live_accuracy: u32,
    final_stats: Option<FinalStats>,
    countdown: Countdown,
}

impl<S: WordSource> Session<S> {
    /// Creates a session with a freshly generated round, waiting for input.
    pub fn new(source: S, config: SessionConfig) -> Self {
        let mut session = Self {
            source,
            config,
            target_text: String::new(),
            target_len: 0,
            user_input: String::new(),
            input_len: 0,
            phase: Phase::Waiting,
            started_at: None,
            remaining_secs: ROUND_SECS,
            correct_chars: 0,
            live_wpm: 0,
            live_accuracy: 100,
            final_stats: None,
            countdown: Countdown::default(),
        };
        session.reset();
        session
    }

    /// Throws the current round away and starts a new one in `Waiting`.
    pub fn reset(&mut self) {
        self.countdown.stop();

        self.target_text = self
            .source
            .generate(self.config.number_of_words)
            .join(" ");
        self.target_len = self.target_text.chars().count();
        self.user_input.clear();
        self.input_len = 0;
        self.phase = Phase::Waiting;
        self.started_at = None;
        self.remaining_secs = ROUND_SECS;
        self.correct_chars = 0;
        self.live_wpm = 0;
        self.live_accuracy = 100;
        self.final_stats = None;

        debug!("new round with {} characters", self.target_len);
    }

    pub fn submit_input(&mut self, value: &str) {
        self.submit_input_at(value, Instant::now());
    }

    /// Feeds the whole current input buffer.
    ///
    /// The first change starts the round; reaching the end of the text
    /// finishes it. Countdown deadlines that passed before `now` fire first,
    /// so input arriving after the round ran out is ignored.
    pub fn submit_input_at(&mut self, value: &str, now: Instant) {
        self.poll_timer(now);
        if self.phase == Phase::Finished || value == self.user_input {
            return;
        }

        if self.phase == Phase::Waiting {
            self.phase = Phase::Running;
            self.started_at = Some(now);
            self.countdown.start(now);
            debug!("round started");
        }

        self.user_input.clear();
        self.user_input.push_str(value);
        self.input_len = self.user_input.chars().count();

        if self.input_len >= self.target_len {
            // anything typed past the end of the text is dropped
            if let Some((byte_idx, _)) = self.user_input.char_indices().nth(self.target_len) {
                self.user_input.truncate(byte_idx);
            }
            self.input_len = self.target_len;
            self.recompute_live(now);
            self.finish(now);
        } else {
            self.recompute_live(now);
        }
    }

    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    /// Advances the countdown by one second. No-op unless running.
    pub fn tick_at(&mut self, now: Instant) {
        if self.phase != Phase::Running {
            return;
        }

        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            self.finish(now);
        }
    }

    /// Fires every countdown tick whose deadline has passed by `now`, each
    /// at its own deadline. Returns how many ticks fired.
    pub fn poll_timer(&mut self, now: Instant) -> u32 {
        let mut fired = 0;
        while self.phase == Phase::Running {
            let Some(at) = self.countdown.take_due(now) else {
                break;
            };
            self.tick_at(at);
            fired += 1;
        }
        fired
    }

    fn recompute_live(&mut self, now: Instant) {
        self.correct_chars = count_correct(&self.user_input, &self.target_text);
        let elapsed = self.elapsed_at(now).as_secs_f64();
        self.live_wpm = compute_wpm(self.correct_chars, elapsed);
        self.live_accuracy = compute_accuracy(self.correct_chars, self.input_len);
    }

    fn finish(&mut self, now: Instant) {
        if self.phase == Phase::Finished {
            return;
        }

        self.phase = Phase::Finished;
        self.countdown.stop();

        let correct_chars = count_correct(&self.user_input, &self.target_text);
        let elapsed = self.elapsed_at(now);
        let stats = FinalStats {
            wpm: compute_wpm(correct_chars, elapsed.as_secs_f64()),
            accuracy: compute_accuracy(correct_chars, self.input_len),
            correct_chars,
            typed_chars: self.input_len,
            elapsed,
        };

        info!(
            "round finished: {} wpm, {}% acc, {}/{} chars in {:.2}s",
            stats.wpm,
            stats.accuracy,
            stats.correct_chars,
            stats.typed_chars,
            stats.elapsed.as_secs_f64()
        );
        self.final_stats = Some(stats);
    }

    /// Time since the first keystroke, zero before the round started.
    pub fn elapsed_at(&self, now: Instant) -> Duration {
        self.started_at
            .map(|start| now.saturating_duration_since(start))
            .unwrap_or_default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    pub fn target_text(&self) -> &str {
        &self.target_text
    }

    pub fn user_input(&self) -> &str {
        &self.user_input
    }

    pub fn started_at(&self) -> Option<Instant> {
        self.started_at
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn correct_chars(&self) -> usize {
        self.correct_chars
    }

    pub fn live_wpm(&self) -> u32 {
        self.live_wpm
    }

    pub fn live_accuracy(&self) -> u32 {
        self.live_accuracy
    }

    /// `Some` only once the round has finished.
    pub fn final_stats(&self) -> Option<&FinalStats> {
        self.final_stats.as_ref()
    }

    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    /// Next character to type; `None` at the end of the text or once finished.
    pub fn target_character(&self) -> Option<char> {
        if self.phase == Phase::Finished {
            return None;
        }
        self.target_text.chars().nth(self.input_len)
    }

    /// Physical key for [`Self::target_character`].
    pub fn target_key(&self) -> Option<KeyId> {
        self.target_character().and_then(|c| keymap().lookup(c))
    }
}
