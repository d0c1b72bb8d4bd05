//! Play command implementation - Interactive TUI game.

use super::output::format_entry;
use super::{CliError, open_store};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::{Backend, CrosstermBackend},
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use squad::controller::Countdown;
use squad::game::{ACTOR_COUNT, ACTORS};
use squad::{
    Controller, GameConfig, MemoryStore, Notice, Phase, PhaseKind, ScoreStore, SessionError,
};
use std::io::stdout;
use std::path::PathBuf;
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};
use tracing::debug;

/// How long the mission briefing stays up before the first round starts.
const INTRO_DURATION: Duration = Duration::from_secs(4);

/// Seconds left at which the clock turns red.
const CLOCK_WARNING_SECONDS: u32 = 10;

/// Longest wait for a key press before redrawing.
const INPUT_POLL: Duration = Duration::from_millis(50);

/// Execute the play command.
///
/// # Errors
///
/// Returns an error if the settings are invalid or the TUI fails.
pub(crate) fn execute(
    seed: Option<u64>,
    seconds: u32,
    scores: Option<PathBuf>,
    no_save: bool,
) -> Result<(), CliError> {
    let config = GameConfig {
        round_seconds: seconds,
        ..GameConfig::default()
    };

    let store: Box<dyn ScoreStore> = if no_save {
        Box::new(MemoryStore::default())
    } else {
        Box::new(open_store(scores)?)
    };

    let controller = match seed {
        Some(seed) => Controller::with_seed(config, store, seed)?,
        None => Controller::new(config, store)?,
    };

    run_tui(App::new(controller))
}

/// Popup drawn over the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Overlay {
    Help,
    Leaderboard,
}

/// App state for the TUI.
struct App {
    controller: Controller<Box<dyn ScoreStore>>,
    notices: Receiver<Notice>,
    selected: usize,
    overlay: Option<Overlay>,
    intro_since: Option<Instant>,
    status: Option<String>,
}

impl App {
    fn new(mut controller: Controller<Box<dyn ScoreStore>>) -> Self {
        let notices = controller.subscribe();
        Self {
            controller,
            notices,
            selected: 0,
            overlay: None,
            intro_since: None,
            status: None,
        }
    }

    /// Fold controller notices into view state.
    fn drain_notices(&mut self) {
        while let Ok(notice) = self.notices.try_recv() {
            match notice {
                Notice::PhaseChanged { to, .. } => {
                    self.intro_since = (to == PhaseKind::Intro).then(Instant::now);
                }
                Notice::RoundStarted {
                    level,
                    available_pool,
                } => {
                    self.selected = 0;
                    self.status = Some(format!(
                        "Level {level}: {available_pool} power-ups to hand out"
                    ));
                }
                Notice::AllocationChanged { actor, allocation } => {
                    let name = ACTORS.get(actor).map_or("?", |a| a.name);
                    self.status = Some(format!("{name}: {allocation} power-ups"));
                }
                Notice::RoundWon { round_score, .. } => {
                    self.status = Some(format!("+{round_score} points"));
                }
                Notice::LeaderboardUpdated { entries } => {
                    self.status = Some(format!("Leaderboard: {} entries", entries.len()));
                }
                Notice::Tick { .. } | Notice::RoundLost { .. } => {}
            }
        }
    }

    /// Let the briefing run out on its own.
    fn finish_intro(&mut self, now: Instant) {
        if let Some(since) = self.intro_since
            && now.duration_since(since) >= INTRO_DURATION
        {
            self.intro_since = None;
            log_rejected(self.controller.intro_finished());
        }
    }

    fn select(&mut self, actor: usize) {
        self.selected = actor.min(ACTOR_COUNT - 1);
    }

    /// Handle a key press. Returns true to quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                if self.overlay.take().is_none() {
                    return true;
                }
            }
            KeyCode::Char('?' | 'i') => self.toggle(Overlay::Help),
            KeyCode::Char('l') => self.toggle(Overlay::Leaderboard),
            _ if self.overlay.is_some() => {}
            _ => self.handle_game_key(code),
        }
        false
    }

    fn toggle(&mut self, overlay: Overlay) {
        self.overlay = if self.overlay == Some(overlay) {
            None
        } else {
            Some(overlay)
        };
    }

    fn handle_game_key(&mut self, code: KeyCode) {
        let phase = self.controller.phase().kind();
        if phase == PhaseKind::Active && self.handle_selection(code) {
            return;
        }

        let c = &mut self.controller;
        let result = match (phase, code) {
            (PhaseKind::Idle, KeyCode::Enter | KeyCode::Char(' ')) => c.start_game(),
            (PhaseKind::Intro, KeyCode::Enter | KeyCode::Char(' ')) => c.start_mission(),

            (PhaseKind::Active, KeyCode::Up | KeyCode::Char('+' | '=')) => {
                c.adjust(self.selected, 1)
            }
            (PhaseKind::Active, KeyCode::Down | KeyCode::Char('-')) => c.adjust(self.selected, -1),
            (PhaseKind::Active, KeyCode::Enter | KeyCode::Char('p')) => c.submit(),
            (PhaseKind::Active, KeyCode::Char('r')) => c.reset_level(),

            (PhaseKind::ResolvedWin, KeyCode::Enter | KeyCode::Char('n')) => c.next_level(),
            (PhaseKind::ResolvedWin, KeyCode::Char('r')) => c.restart(),
            (PhaseKind::ResolvedLoss, KeyCode::Enter | KeyCode::Char('n')) => c.new_mission(),

            _ => return,
        };
        log_rejected(result);
    }

    /// Move the hero cursor. Returns false if `code` is not a cursor key.
    fn handle_selection(&mut self, code: KeyCode) -> bool {
        let actor = match code {
            KeyCode::Left => self.selected.saturating_sub(1),
            KeyCode::Right | KeyCode::Tab => self.selected + 1,
            KeyCode::Char(key) => match actor_for_key(key) {
                Some(actor) => actor,
                None => return false,
            },
            _ => return false,
        };
        self.select(actor);
        true
    }
}

fn log_rejected<T>(result: Result<T, SessionError>) {
    if let Some(e) = result.err() {
        debug!(error = %e, "key ignored");
    }
}

/// Time to wait for input: until the next clock tick, at most [`INPUT_POLL`].
fn input_timeout(countdown: &Countdown, now: Instant) -> Duration {
    countdown
        .until_next(now)
        .map_or(INPUT_POLL, |due| due.min(INPUT_POLL))
}

/// Hero index for a number key (`1` is the first hero).
fn actor_for_key(key: char) -> Option<usize> {
    let digit = usize::try_from(key.to_digit(10)?).ok()?;
    (1..=ACTOR_COUNT).contains(&digit).then(|| digit - 1)
}

fn run_tui(mut app: App) -> Result<(), CliError> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn event_loop<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), CliError> {
    loop {
        app.drain_notices();
        terminal.draw(|f| ui(f, app))?;

        let now = Instant::now();
        app.controller.poll(now);
        app.finish_intro(now);

        // Wake up in time for the next clock tick
        if event::poll(input_timeout(app.controller.countdown(), now))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && app.handle_key(key.code)
        {
            return Ok(());
        }
    }
}

fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(12),   // Main content
            Constraint::Length(3), // Footer
        ])
        .split(f.area());

    render_header(f, chunks[0], app);

    match app.controller.phase() {
        Phase::Idle => render_title(f, chunks[1]),
        Phase::Intro => render_briefing(f, chunks[1]),
        Phase::Active(_) | Phase::Won { .. } | Phase::Lost { .. } => {
            render_round(f, chunks[1], app);
        }
    }

    render_footer(f, chunks[2], app);

    match app.overlay {
        Some(Overlay::Help) => render_help(f, centered_rect(70, 70, f.area()), app),
        Some(Overlay::Leaderboard) => render_leaderboard(f, centered_rect(50, 50, f.area()), app),
        None => {}
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let session = app.controller.session();
    let title = format!(
        " DC Super Squad Resource Allocator | Justice League HQ - Level {} | Score: {} ",
        session.level(),
        session.cumulative_score()
    );

    let header = Paragraph::new(title)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(header, area);
}

fn render_title(f: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "DC Super Squad Resource Allocator",
            Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Press Enter to start the game"),
    ];

    let title = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(title, area);
}

fn render_briefing(f: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Incoming transmission from the Watchtower",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Three heroes, one stockpile of power-ups."),
        Line::from("Leave a hero empty-handed and the mission fails."),
        Line::from("Promise more than the stockpile holds and the squad deadlocks."),
        Line::from(""),
        Line::from("Press Enter to start the mission"),
    ];

    let briefing = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(" Briefing "));

    f.render_widget(briefing, area);
}

fn render_round(f: &mut Frame, area: Rect, app: &App) {
    let Some(round) = app.controller.phase().round() else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Pool and clock
            Constraint::Min(7),    // Heroes
            Constraint::Length(4), // Message
        ])
        .split(area);

    let clock_color = if round.remaining_seconds <= CLOCK_WARNING_SECONDS {
        Color::Red
    } else {
        Color::Blue
    };
    let stats = Paragraph::new(Line::from(vec![
        Span::raw(" Available Power-Ups: "),
        Span::styled(
            round.available_pool.to_string(),
            Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("   Allocated: {}", round.total_allocated())),
        Span::raw("   Time: "),
        Span::styled(
            format!("{}s", round.remaining_seconds),
            Style::default().fg(clock_color).add_modifier(Modifier::BOLD),
        ),
    ]))
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(stats, chunks[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3); ACTOR_COUNT])
        .split(chunks[1]);

    let active = app.controller.phase().kind() == PhaseKind::Active;
    for (i, (actor, units)) in ACTORS.iter().zip(round.allocations).enumerate() {
        let selected = active && i == app.selected;
        let border = if selected { Color::Yellow } else { Color::Blue };
        let units_color = if units == 0 { Color::Red } else { Color::Blue };

        let lines = vec![
            Line::from(Span::styled(actor.weapon, Style::default().fg(Color::Gray))),
            Line::from(""),
            Line::from(vec![
                Span::raw("[-]  "),
                Span::styled(
                    units.to_string(),
                    Style::default().fg(units_color).add_modifier(Modifier::BOLD),
                ),
                Span::raw("  [+]"),
            ]),
        ];

        let hero = Paragraph::new(lines).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border))
                .title(format!(" {}. {} ", i + 1, actor.name)),
        );
        f.render_widget(hero, columns[i]);
    }

    let (message, color) = match app.controller.phase() {
        Phase::Won { .. } => (app.controller.session().message(), Color::Green),
        Phase::Lost { .. } => (app.controller.session().message(), Color::Red),
        _ => (app.status.clone(), Color::Gray),
    };
    let message = Paragraph::new(message.unwrap_or_default())
        .style(Style::default().fg(color))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(message, chunks[2]);
}

fn render_footer(f: &mut Frame, area: Rect, app: &App) {
    let controls = match app.controller.phase().kind() {
        PhaseKind::Idle => " [Enter] Start game  [?] How to play  [l] Leaderboard  [q] Quit ",
        PhaseKind::Intro => " [Enter] Start mission  [?] How to play  [q] Quit ",
        PhaseKind::Active => {
            " [←/→/1-3] Hero  [↑/+] Add  [↓/-] Remove  [Enter] Power up squad!  [r] Reset level  [q] Quit "
        }
        PhaseKind::ResolvedWin => " [n] Next level  [r] Restart  [l] Leaderboard  [q] Quit ",
        PhaseKind::ResolvedLoss => " [n] New mission  [l] Leaderboard  [q] Quit ",
    };

    let footer = Paragraph::new(controls)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(footer, area);
}

fn render_help(f: &mut Frame, area: Rect, app: &App) {
    let seconds = app.controller.config().round_seconds;
    let steps = [
        "The Justice League needs your help to allocate power-ups!".to_string(),
        format!("You have {seconds} seconds to complete each level."),
        "Use + and - to give each hero their share of power-ups.".to_string(),
        "You lose if you allocate more than the available power-ups or if any hero gets zero."
            .to_string(),
        "Press Enter to power up the squad when you're ready.".to_string(),
        "Complete levels to increase your score and face tougher challenges.".to_string(),
        "If you lose, the game resets to level 1. Try to beat your high score!".to_string(),
    ];

    let mut lines: Vec<Line> = steps
        .iter()
        .enumerate()
        .map(|(i, step)| Line::from(format!("{}. {step}", i + 1)))
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Press ? or Esc to close",
        Style::default().fg(Color::Gray),
    )));

    let help = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(" How to Play "));

    f.render_widget(Clear, area);
    f.render_widget(help, area);
}

fn render_leaderboard(f: &mut Frame, area: Rect, app: &App) {
    let entries = app.controller.leaderboard().entries();

    let mut lines: Vec<Line> = if entries.is_empty() {
        vec![Line::from("No missions recorded yet.")]
    } else {
        entries
            .iter()
            .enumerate()
            .map(|(i, entry)| Line::from(format_entry(i + 1, entry)))
            .collect()
    };
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Press l or Esc to close",
        Style::default().fg(Color::Gray),
    )));

    let board = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(" Leaderboard "),
    );

    f.render_widget(Clear, area);
    f.render_widget(board, area);
}

/// A rectangle of the given percentage size centered in `area`.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app(pool: u32) -> App {
        let config = GameConfig {
            pool_min: pool,
            pool_max: pool,
            ..GameConfig::default()
        };
        let store: Box<dyn ScoreStore> = Box::new(MemoryStore::default());
        App::new(Controller::with_seed(config, store, 3).unwrap())
    }

    #[test]
    fn test_actor_for_key() {
        assert_eq!(actor_for_key('1'), Some(0));
        assert_eq!(actor_for_key('3'), Some(2));
        assert_eq!(actor_for_key('0'), None);
        assert_eq!(actor_for_key('4'), None);
        assert_eq!(actor_for_key('x'), None);
    }

    #[test]
    fn test_input_timeout_follows_clock() {
        let mut countdown = Countdown::new(Duration::from_secs(1));
        let now = Instant::now();
        assert_eq!(input_timeout(&countdown, now), INPUT_POLL);

        countdown.start(now);
        assert_eq!(input_timeout(&countdown, now), INPUT_POLL);
        let almost = now + Duration::from_millis(980);
        assert_eq!(input_timeout(&countdown, almost), Duration::from_millis(20));
        assert_eq!(
            input_timeout(&countdown, now + Duration::from_secs(2)),
            Duration::ZERO
        );
    }

    #[test]
    fn test_number_keys_select_heroes() {
        let mut app = app(6);
        app.handle_key(KeyCode::Enter);
        app.handle_key(KeyCode::Enter);

        app.handle_key(KeyCode::Char('3'));
        assert_eq!(app.selected, 2);
        app.handle_key(KeyCode::Char('4'));
        assert_eq!(app.selected, 2);
        app.handle_key(KeyCode::Left);
        assert_eq!(app.selected, 1);
        app.handle_key(KeyCode::Tab);
        app.handle_key(KeyCode::Right);
        assert_eq!(app.selected, 2);

        // Only the selected hero is adjusted
        app.handle_key(KeyCode::Char('+'));
        let round = app.controller.phase().round().unwrap();
        assert_eq!(round.allocations, [0, 0, 1]);
    }

    #[test]
    fn test_keys_play_a_round() {
        let mut app = app(6);
        app.handle_key(KeyCode::Enter);
        app.drain_notices();
        assert!(app.intro_since.is_some());

        app.handle_key(KeyCode::Enter);
        for key in ['1', '2', '3'] {
            app.handle_key(KeyCode::Char(key));
            app.handle_key(KeyCode::Char('+'));
        }
        app.handle_key(KeyCode::Enter);
        app.drain_notices();

        assert_eq!(app.controller.phase().kind(), PhaseKind::ResolvedWin);
        assert!(app.intro_since.is_none());
        assert!(app.status.as_deref().is_some_and(|s| s.starts_with('+')));
    }

    #[test]
    fn test_intro_finishes_on_its_own() {
        let mut app = app(6);
        app.handle_key(KeyCode::Enter);
        app.drain_notices();

        app.finish_intro(Instant::now() + INTRO_DURATION);
        assert_eq!(app.controller.phase().kind(), PhaseKind::Active);
    }

    #[test]
    fn test_overlay_swallows_game_keys() {
        let mut app = app(6);
        assert!(!app.handle_key(KeyCode::Char('?')));
        app.handle_key(KeyCode::Enter);
        assert_eq!(app.controller.phase().kind(), PhaseKind::Idle);

        // Esc closes the overlay before it quits
        assert!(!app.handle_key(KeyCode::Esc));
        assert!(app.handle_key(KeyCode::Esc));
    }
}
