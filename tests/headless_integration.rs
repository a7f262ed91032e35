use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use turbotype::{
    language::{Language, WordSource},
    runtime::{AppEvent, ChannelEventSource, Runner},
    session::{Phase, Session, SessionConfig},
};

struct Words(Vec<&'static str>);

impl WordSource for Words {
    fn generate(&self, count: usize) -> Vec<String> {
        self.0.iter().take(count).map(|w| w.to_string()).collect()
    }
}

/// The same word over and over, for rounds longer than anyone can type.
struct Repeating(&'static str);

impl WordSource for Repeating {
    fn generate(&self, count: usize) -> Vec<String> {
        vec![self.0.to_string(); count]
    }
}

fn key(c: char) -> AppEvent {
    AppEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
}

fn one_word(word: &'static str) -> Session<Words> {
    Session::new(
        Words(vec![word]),
        SessionConfig {
            number_of_words: 1,
        },
    )
}

// Headless integration using the internal runtime + Session without a TTY.
// Keys are folded into the input buffer the same way the binary does it.
#[test]
fn headless_typing_flow_completes() {
    let mut session = one_word("selam");

    let (tx, rx) = mpsc::channel();
    let runner =
        Runner::new(ChannelEventSource::new(rx)).with_poll_interval(Duration::from_millis(5));

    for c in "selam".chars() {
        tx.send(key(c)).unwrap();
    }

    for _ in 0..100u32 {
        match runner.next_event(session.countdown().next_tick(), Instant::now()) {
            AppEvent::Tick => {
                session.poll_timer(Instant::now());
            }
            AppEvent::Resize => {}
            AppEvent::Key(key) => {
                if let KeyCode::Char(c) = key.code {
                    let mut next = session.user_input().to_owned();
                    next.push(c);
                    session.submit_input(&next);
                    if session.is_finished() {
                        break;
                    }
                }
            }
        }
    }

    assert_eq!(session.phase(), Phase::Finished);
    let stats = session.final_stats().expect("finished rounds have results");
    assert_eq!(stats.accuracy, 100);
    assert_eq!(stats.correct_chars, 5);
}

#[test]
fn headless_timed_round_finishes_by_countdown() {
    let mut session = one_word("selam");
    let t0 = Instant::now();
    session.submit_input_at("s", t0);

    let (_tx, rx) = mpsc::channel();
    let runner =
        Runner::new(ChannelEventSource::new(rx)).with_poll_interval(Duration::from_millis(1));

    // simulated clock: every runner tick stands for 250ms
    let mut now = t0;
    for _ in 0..1000u32 {
        if let AppEvent::Tick = runner.next_event(session.countdown().next_tick(), now) {
            now += Duration::from_millis(250);
            session.poll_timer(now);
        }
        if session.is_finished() {
            break;
        }
    }

    assert_eq!(session.phase(), Phase::Finished);
    assert_eq!(session.remaining_secs(), 0);
    assert_eq!(
        session.final_stats().unwrap().elapsed,
        Duration::from_secs(60)
    );
}

#[test]
fn headless_round_on_embedded_corpus() {
    let mut session = Session::new(Language::turkish().unwrap(), SessionConfig::default());
    let target = session.target_text().to_owned();

    session.submit_input(&target);

    assert_eq!(session.phase(), Phase::Finished);
    assert_eq!(session.final_stats().unwrap().accuracy, 100);
}

// Keys arrive every 20ms of simulated time, well inside the poll interval,
// for longer than a round lasts. The countdown must keep running and the
// round must end on time.
#[test]
fn headless_fast_keys_cannot_outrun_the_countdown() {
    const KEY_GAP: Duration = Duration::from_millis(20);
    const KEYS: usize = 3_500;

    let mut session = Session::new(
        Repeating("kelime"),
        SessionConfig {
            number_of_words: 600,
        },
    );
    let target: Vec<char> = session.target_text().chars().collect();
    assert!(target.len() > KEYS);

    let (tx, rx) = mpsc::channel();
    for c in target.iter().take(KEYS) {
        tx.send(key(*c)).unwrap();
    }
    let runner = Runner::new(ChannelEventSource::new(rx));

    let t0 = Instant::now();
    let mut now = t0;
    let mut keys_seen = 0;
    let mut ticks = 0;
    let mut remaining_at_30s = None;

    while keys_seen < KEYS {
        match runner.next_event(session.countdown().next_tick(), now) {
            AppEvent::Tick => ticks += session.poll_timer(now),
            AppEvent::Resize => {}
            AppEvent::Key(key) => {
                if let KeyCode::Char(c) = key.code {
                    let mut next = session.user_input().to_owned();
                    next.push(c);
                    session.submit_input_at(&next, now);
                }
                if now == t0 + Duration::from_secs(30) {
                    remaining_at_30s = Some(session.remaining_secs());
                }
                keys_seen += 1;
                now += KEY_GAP;
            }
        }
    }

    assert_eq!(remaining_at_30s, Some(30));
    assert_eq!(ticks, 60);
    assert_eq!(session.phase(), Phase::Finished);
    assert_eq!(session.remaining_secs(), 0);
    // only keys before the 60s mark count
    assert_eq!(session.user_input().chars().count(), 3_000);
    let stats = session.final_stats().unwrap();
    assert_eq!(stats.elapsed, Duration::from_secs(60));
    assert_eq!(stats.accuracy, 100);
}
