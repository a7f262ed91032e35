mod ui;

use anyhow::{Context, Result};
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{
        KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    io::{self, stdin},
    time::Instant,
};
use turbotype::{
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    language::Language,
    layout::keymap,
    logging,
    pressed_keys::{PressedKeys, DEFAULT_HOLD},
    runtime::{AppEvent, CrosstermEventSource, Runner},
    session::{Session, SessionConfig},
};

/// typing speed trainer for the Turkish F keyboard layout
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A one-minute typing test on random Turkish words, with live wpm/accuracy and an on-screen F keyboard that lights up the next key."
)]
pub struct Cli {
    /// number of words in each round [default: saved setting, or 50]
    #[clap(short = 'w', long)]
    number_of_words: Option<usize>,

    /// hide the on-screen keyboard
    #[clap(long)]
    no_keyboard: bool,

    /// store the effective settings as the new defaults
    #[clap(long)]
    save_config: bool,
}

impl Cli {
    /// Command line flags take precedence over the saved config.
    fn apply_to(&self, mut cfg: Config) -> Config {
        if let Some(n) = self.number_of_words {
            cfg.number_of_words = n;
        }
        if self.no_keyboard {
            cfg.show_keyboard = false;
        }
        cfg
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

#[derive(Debug)]
pub struct App {
    pub session: Session,
    pub pressed: PressedKeys,
    pub show_keyboard: bool,
}

impl App {
    pub fn new(session: Session, show_keyboard: bool, pressed: PressedKeys) -> Self {
        Self {
            session,
            pressed,
            show_keyboard,
        }
    }

    pub fn on_key(&mut self, key: KeyEvent, now: Instant) -> Flow {
        // a key never lands in a round whose time already ran out
        self.session.poll_timer(now);
        self.pressed.on_key_event_at(&key, keymap(), now);

        if key.kind == KeyEventKind::Release {
            return Flow::Continue;
        }

        match key.code {
            KeyCode::Esc => return Flow::Quit,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Flow::Quit
            }
            KeyCode::Tab => {
                self.session.reset();
                self.pressed.clear();
            }
            KeyCode::Backspace => self.backspace(now),
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.type_char(c, now)
            }
            _ => {}
        }
        Flow::Continue
    }

    /// Drives the countdown and key-hold expiry. Returns true when the
    /// screen needs a redraw.
    pub fn on_tick(&mut self, now: Instant) -> bool {
        let fired = self.session.poll_timer(now);
        let expired = self.pressed.expire(now);
        fired > 0 || expired
    }

    fn type_char(&mut self, c: char, now: Instant) {
        let mut next = self.session.user_input().to_owned();
        next.push(c);
        self.session.submit_input_at(&next, now);
    }

    fn backspace(&mut self, now: Instant) {
        let mut next = self.session.user_input().to_owned();
        if next.pop().is_some() {
            self.session.submit_input_at(&next, now);
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    if let Some(log_path) = AppDirs::log_path() {
        if let Err(e) = logging::init(&log_path) {
            eprintln!("logging disabled: {e:#}");
        }
    }

    let store = FileConfigStore::new();
    let cfg = cli.apply_to(store.load());
    if cli.save_config {
        store
            .save(&cfg)
            .with_context(|| format!("saving config to {}", store.path().display()))?;
        log::info!("saved config to {}", store.path().display());
    }

    let language = Language::turkish()?;
    let session = Session::new(language, SessionConfig::from(&cfg));

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    // key release events let the keyboard show exactly what is held down
    let reports_release = supports_keyboard_enhancement().unwrap_or(false);
    if reports_release {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )?;
    }
    log::debug!("key release reporting: {reports_release}");

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(
        session,
        cfg.show_keyboard,
        PressedKeys::new(DEFAULT_HOLD, reports_release),
    );
    let result = start_tui(&mut terminal, &mut app);

    if reports_release {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)?;
    }
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    let runner = Runner::new(CrosstermEventSource::new());

    terminal.draw(|f| ui::draw(app, f))?;

    loop {
        let deadline = app.session.countdown().next_tick();
        let redraw = match runner.next_event(deadline, Instant::now()) {
            AppEvent::Tick => app.on_tick(Instant::now()),
            AppEvent::Resize => true,
            AppEvent::Key(key) => {
                if app.on_key(key, Instant::now()) == Flow::Quit {
                    break;
                }
                true
            }
        };

        if redraw {
            terminal.draw(|f| ui::draw(app, f))?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;
    use std::time::Duration;
    use turbotype::{
        layout::KeyId,
        session::{Phase, ROUND_SECS},
    };

    fn test_app(words: &[&str]) -> App {
        let language = Language {
            name: "test".to_string(),
            size: words.len() as u32,
            words: words.iter().map(|w| w.to_string()).collect(),
        };
        let session = Session::new(
            language,
            SessionConfig {
                number_of_words: 1,
            },
        );
        App::new(session, true, PressedKeys::new(DEFAULT_HOLD, true))
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn release(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        }
    }

    fn type_str(app: &mut App, s: &str, now: Instant) {
        for c in s.chars() {
            assert_eq!(app.on_key(key(KeyCode::Char(c)), now), Flow::Continue);
        }
    }

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::try_parse_from(["turbotype"]).unwrap();
        assert_eq!(cli.number_of_words, None);
        assert!(!cli.no_keyboard);
        assert!(!cli.save_config);
    }

    #[test]
    fn test_cli_flags() {
        let cli =
            Cli::try_parse_from(["turbotype", "-w", "20", "--no-keyboard", "--save-config"])
                .unwrap();
        assert_eq!(cli.number_of_words, Some(20));
        assert!(cli.no_keyboard);
        assert!(cli.save_config);
    }

    #[test]
    fn test_cli_rejects_negative_word_count() {
        assert!(Cli::try_parse_from(["turbotype", "-w", "-3"]).is_err());
    }

    #[test]
    fn test_cli_overrides_config() {
        let cli = Cli::try_parse_from(["turbotype", "--number-of-words", "10"]).unwrap();
        let cfg = cli.apply_to(Config {
            number_of_words: 30,
            show_keyboard: true,
        });
        assert_eq!(cfg.number_of_words, 10);
        assert!(cfg.show_keyboard);

        let cli = Cli::try_parse_from(["turbotype", "--no-keyboard"]).unwrap();
        let cfg = cli.apply_to(Config::default());
        assert_eq!(cfg.number_of_words, 50);
        assert!(!cfg.show_keyboard);
    }

    #[test]
    fn test_typing_runs_and_finishes_round() {
        let mut app = test_app(&["ev"]);
        let t0 = Instant::now();

        type_str(&mut app, "e", t0);
        assert_eq!(app.session.phase(), Phase::Running);

        type_str(&mut app, "v", t0 + Duration::from_secs(1));
        assert_eq!(app.session.phase(), Phase::Finished);
        assert_eq!(app.session.final_stats().unwrap().accuracy, 100);
    }

    #[test]
    fn test_backspace_truncates_input() {
        let mut app = test_app(&["kitap"]);
        let t0 = Instant::now();

        type_str(&mut app, "kx", t0);
        app.on_key(key(KeyCode::Backspace), t0);

        assert_eq!(app.session.user_input(), "k");
        assert_eq!(app.session.live_accuracy(), 100);
    }

    #[test]
    fn test_backspace_on_empty_input_keeps_waiting() {
        let mut app = test_app(&["kitap"]);
        app.on_key(key(KeyCode::Backspace), Instant::now());
        assert_eq!(app.session.phase(), Phase::Waiting);
    }

    #[test]
    fn test_tab_resets_round() {
        let mut app = test_app(&["kitap"]);
        let t0 = Instant::now();
        type_str(&mut app, "ki", t0);
        app.on_tick(t0 + Duration::from_secs(1));
        assert_eq!(app.session.remaining_secs(), ROUND_SECS - 1);

        app.on_key(key(KeyCode::Tab), t0 + Duration::from_secs(2));

        assert_eq!(app.session.phase(), Phase::Waiting);
        assert_eq!(app.session.user_input(), "");
        assert_eq!(app.session.remaining_secs(), ROUND_SECS);
    }

    #[test]
    fn test_tab_clears_pressed_keys() {
        let mut app = test_app(&["kitap"]);
        let t0 = Instant::now();
        app.on_key(key(KeyCode::Char('k')), t0);
        assert!(!app.pressed.is_empty());

        app.on_key(key(KeyCode::Tab), t0);

        assert!(app.pressed.is_empty());
    }

    #[test]
    fn test_keys_after_time_is_up_are_ignored() {
        let mut app = test_app(&["kitap"]);
        let t0 = Instant::now();
        type_str(&mut app, "k", t0);

        // no tick in between, as when keys arrive faster than the poll interval
        type_str(&mut app, "i", t0 + Duration::from_secs(59));
        assert_eq!(app.session.remaining_secs(), 1);
        type_str(&mut app, "t", t0 + Duration::from_millis(60_020));

        assert_eq!(app.session.phase(), Phase::Finished);
        assert_eq!(app.session.remaining_secs(), 0);
        assert_eq!(app.session.user_input(), "ki");
    }

    #[test]
    fn test_quit_keys() {
        let mut app = test_app(&["ev"]);
        assert_eq!(app.on_key(key(KeyCode::Esc), Instant::now()), Flow::Quit);
        assert_eq!(
            app.on_key(
                KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
                Instant::now()
            ),
            Flow::Quit
        );
    }

    #[test]
    fn test_control_chords_do_not_type() {
        let mut app = test_app(&["ev"]);
        app.on_key(
            KeyEvent::new(KeyCode::Char('e'), KeyModifiers::ALT),
            Instant::now(),
        );
        assert_eq!(app.session.user_input(), "");
    }

    #[test]
    fn test_release_does_not_type_but_clears_pressed() {
        let mut app = test_app(&["ev"]);
        let t0 = Instant::now();

        app.on_key(key(KeyCode::Char('e')), t0);
        assert!(app.pressed.contains(KeyId("KeyD")));

        app.on_key(release(KeyCode::Char('e')), t0);
        assert_eq!(app.session.user_input(), "e");
        assert!(!app.pressed.contains(KeyId("KeyD")));
    }

    #[test]
    fn test_input_ignored_after_finish() {
        let mut app = test_app(&["ev"]);
        let t0 = Instant::now();
        type_str(&mut app, "ev", t0);

        type_str(&mut app, "x", t0);
        app.on_key(key(KeyCode::Backspace), t0);

        assert_eq!(app.session.user_input(), "ev");
        assert_eq!(app.session.phase(), Phase::Finished);
    }

    #[test]
    fn test_on_tick_reports_redraw() {
        let mut app = test_app(&["kitap"]);
        let t0 = Instant::now();
        assert!(!app.on_tick(t0));

        type_str(&mut app, "k", t0);
        assert!(!app.on_tick(t0 + Duration::from_millis(500)));
        assert!(app.on_tick(t0 + Duration::from_millis(1000)));
    }

    #[test]
    fn test_timeout_via_ticks() {
        let mut app = test_app(&["kitap"]);
        let t0 = Instant::now();
        type_str(&mut app, "k", t0);

        app.on_tick(t0 + Duration::from_secs(ROUND_SECS as u64));

        assert_eq!(app.session.phase(), Phase::Finished);
        assert_eq!(app.session.remaining_secs(), 0);
        assert_eq!(
            app.session.final_stats().unwrap().elapsed,
            Duration::from_secs(ROUND_SECS as u64)
        );
    }
}
