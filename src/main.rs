pub mod game;
pub mod runtime;
pub mod schedule;
pub mod theme;
pub mod ui;

use crate::game::{Game, Level, Phase};
use crate::runtime::{CrosstermEventSource, GameEvent, Runner};
use crate::theme::Theme;
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    time::{Duration, Instant},
};

const TICK_RATE_MS: u64 = 100;

/// terminal memory game: memorize the board, then name the icon that vanished
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Pick a difficulty and a theme, memorize the icons before the clock runs out, then type the name of the one that vanished from the board."
)]
pub struct Cli {
    /// difficulty to preselect on the menu
    #[clap(short, long, value_enum)]
    level: Option<Level>,

    /// icon theme to preselect on the menu
    #[clap(short, long, value_enum)]
    theme: Option<Theme>,

    /// fix the shuffle seed for reproducible rounds
    #[clap(short, long)]
    seed: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Continue,
    Exit,
}

#[derive(Debug)]
pub struct App {
    pub game: Game,
}

impl App {
    pub fn new(cli: Cli) -> Self {
        let mut game = match cli.seed {
            Some(seed) => Game::with_seed(seed),
            None => Game::new(),
        };
        if let Some(level) = cli.level {
            game.select_level(level);
        }
        if let Some(theme) = cli.theme {
            game.select_theme(theme);
        }
        Self { game }
    }

    /// Route one key press to the controller. The menu and the round have
    /// separate key maps; free typing only exists on the recall screen.
    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> KeyOutcome {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyOutcome::Exit;
        }

        let game = &mut self.game;
        if !game.started {
            match key.code {
                KeyCode::Esc => return KeyOutcome::Exit,
                KeyCode::Enter => game.start(now),
                KeyCode::Char('e') => game.select_level(Level::Easy),
                KeyCode::Char('m') => game.select_level(Level::Medium),
                KeyCode::Char('h') => game.select_level(Level::Hard),
                KeyCode::Char('f') => game.select_theme(Theme::Fruits),
                KeyCode::Char('a') => game.select_theme(Theme::Animals),
                KeyCode::Char('o') => game.select_theme(Theme::Objects),
                _ => {}
            }
            return KeyOutcome::Continue;
        }

        match key.code {
            KeyCode::Esc => game.quit(),
            KeyCode::Enter => {
                if game.phase == Phase::Recall {
                    if game.answer.checked {
                        game.play_again(now);
                    } else {
                        game.check();
                    }
                }
            }
            KeyCode::Backspace => game.backspace(),
            KeyCode::Char(c) => game.type_char(c),
            _ => {}
        }
        KeyOutcome::Continue
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(cli);
    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        Duration::from_millis(TICK_RATE_MS),
    );

    terminal.draw(|f| ui(app, f))?;

    loop {
        match runner.step() {
            GameEvent::Tick => {
                // Redraw only when a schedule actually moved the game
                if app.game.poll(Instant::now()) {
                    terminal.draw(|f| ui(app, f))?;
                }
            }
            GameEvent::Resize => {
                terminal.draw(|f| ui(app, f))?;
            }
            GameEvent::Key(key) => {
                if app.handle_key(key, Instant::now()) == KeyOutcome::Exit {
                    break;
                }
                terminal.draw(|f| ui(app, f))?;
            }
        }
    }

    Ok(())
}

fn ui(app: &App, f: &mut Frame) {
    f.render_widget(&app.game, f.area());
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["blink"]);

        assert_eq!(cli.level, None);
        assert_eq!(cli.theme, None);
        assert_eq!(cli.seed, None);
    }

    #[test]
    fn test_cli_preselection() {
        let cli = Cli::parse_from(["blink", "-l", "hard", "-t", "animals"]);
        assert_eq!(cli.level, Some(Level::Hard));
        assert_eq!(cli.theme, Some(Theme::Animals));

        let cli = Cli::parse_from(["blink", "--level", "easy", "--theme", "fruits"]);
        assert_eq!(cli.level, Some(Level::Easy));
        assert_eq!(cli.theme, Some(Theme::Fruits));
    }

    #[test]
    fn test_cli_rejects_unknown_level() {
        assert!(Cli::try_parse_from(["blink", "-l", "nightmare"]).is_err());
    }

    #[test]
    fn test_cli_seed() {
        let cli = Cli::parse_from(["blink", "--seed", "42"]);
        assert_eq!(cli.seed, Some(42));
    }

    #[test]
    fn test_app_new_applies_preselection() {
        let cli = Cli::parse_from(["blink", "-l", "medium", "-t", "objects", "-s", "7"]);
        let app = App::new(cli);

        assert_eq!(app.game.level, Some(Level::Medium));
        assert_eq!(app.game.theme, Some(Theme::Objects));
        assert!(!app.game.started);
    }

    #[test]
    fn test_menu_keys_select_and_start() {
        let cli = Cli::parse_from(["blink", "-s", "5"]);
        let mut app = App::new(cli);
        let t0 = Instant::now();

        app.handle_key(key(KeyCode::Enter), t0);
        assert!(!app.game.started);

        app.handle_key(key(KeyCode::Char('e')), t0);
        app.handle_key(key(KeyCode::Char('a')), t0);
        assert_eq!(app.game.level, Some(Level::Easy));
        assert_eq!(app.game.theme, Some(Theme::Animals));

        app.handle_key(key(KeyCode::Enter), t0);
        assert!(app.game.started);
        assert_eq!(app.game.phase, Phase::Memorize);
    }

    #[test]
    fn test_escape_quits_round_then_exits_app() {
        let cli = Cli::parse_from(["blink", "-l", "easy", "-t", "fruits", "-s", "5"]);
        let mut app = App::new(cli);
        let t0 = Instant::now();

        app.handle_key(key(KeyCode::Enter), t0);
        assert!(app.game.started);

        let outcome = app.handle_key(key(KeyCode::Esc), t0);
        assert_eq!(outcome, KeyOutcome::Continue);
        assert!(!app.game.started);
        assert!(!app.game.has_pending_schedule());

        let outcome = app.handle_key(key(KeyCode::Esc), t0);
        assert_eq!(outcome, KeyOutcome::Exit);
    }

    #[test]
    fn test_ctrl_c_always_exits() {
        let cli = Cli::parse_from(["blink", "-l", "easy", "-t", "fruits", "-s", "5"]);
        let mut app = App::new(cli);
        let t0 = Instant::now();
        app.handle_key(key(KeyCode::Enter), t0);

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(app.handle_key(ctrl_c, t0), KeyOutcome::Exit);
    }

    #[test]
    fn test_full_round_through_the_key_map() {
        let cli = Cli::parse_from(["blink", "-l", "easy", "-t", "fruits", "-s", "11"]);
        let mut app = App::new(cli);
        let t0 = Instant::now();

        app.handle_key(key(KeyCode::Enter), t0);

        // Typing during the countdown goes nowhere
        app.handle_key(key(KeyCode::Char('x')), t0);
        assert!(app.game.answer.input.is_empty());

        app.game.poll(t0 + Duration::from_secs(15));
        assert_eq!(app.game.phase, Phase::TimeUp);
        let now = t0 + Duration::from_secs(18);
        app.game.poll(now);
        assert_eq!(app.game.phase, Phase::Recall);

        let omitted = app.game.reveal.as_ref().unwrap().omitted.clone();
        let name = Theme::Fruits
            .catalog()
            .icon_name(&omitted)
            .unwrap()
            .to_string();

        for c in name.chars() {
            app.handle_key(key(KeyCode::Char(c)), now);
        }
        app.handle_key(key(KeyCode::Enter), now);
        assert!(app.game.answer.checked);
        assert_eq!(app.game.answer.result, "Correct!");

        // Enter again deals a fresh round
        app.handle_key(key(KeyCode::Enter), now);
        assert_eq!(app.game.phase, Phase::Memorize);
        assert!(!app.game.answer.checked);
        assert_eq!(app.game.time_left, 15);
    }
}
