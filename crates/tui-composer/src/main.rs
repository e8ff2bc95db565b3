//! Demo TUI chat composer
//!
//! A terminal front end for `mention-core`, wiring a raw-mode input loop to
//! the composer session. Type a message; an `@` opens the candidate
//! dropdown, which narrows as you keep typing. The canonical (wire form)
//! buffer is shown live below the input line so the display/data split is
//! visible while editing.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p tui-composer
//! ```
//!
//! # Keys
//!
//! - printable keys: type
//! - Backspace: delete (a mention is always removed whole)
//! - Left/Right/Home/End: move the caret
//! - Up/Down: move the dropdown selection
//! - Enter / Tab: choose the highlighted candidate; Enter with no dropdown
//!   sends the message
//! - Esc: dismiss the dropdown, or quit when none is open
//! - Ctrl+X: quit
//!
//! # Configuration
//!
//! `MENTION_TRIGGER_POLICY=any` makes any `@` reachable without crossing
//! whitespace open the dropdown; the default (`after-whitespace`) requires
//! the `@` to start a word.

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use mention_core::{Composer, ComposerCommand, StaticDirectory, TriggerPolicy, User};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use std::{
    env,
    io::{self, stdout},
};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// The sample directory: ten users, including two display-name collisions
/// (Alice and Bob each appear twice) to exercise the skew handling.
fn sample_users() -> Vec<User> {
    vec![
        User::new("user_001", "alice_johnson", "Alice", "https://example.com/pfp/alice_johnson"),
        User::new("user_002", "bob_smith", "Bob", "https://example.com/pfp/bob_smith"),
        User::new("user_003", "charlie_brown", "Charlie", "https://example.com/pfp/charlie_brown"),
        User::new("user_004", "diana_prince", "Diana", "https://example.com/pfp/diana_prince"),
        User::new("user_005", "edward_norton", "Alice", "https://example.com/pfp/edward_norton"),
        User::new("user_006", "fiona_apple", "Fiona", "https://example.com/pfp/fiona_apple"),
        User::new("user_007", "george_lucas", "George", "https://example.com/pfp/george_lucas"),
        User::new("user_008", "helen_hunt", "Bob", "https://example.com/pfp/helen_hunt"),
        User::new("user_009", "ivan_petrov", "Ivan", "https://example.com/pfp/ivan_petrov"),
        User::new("user_010", "julia_roberts", "Julia", "https://example.com/pfp/julia_roberts"),
    ]
}

fn trigger_policy_from_env() -> TriggerPolicy {
    match env::var("MENTION_TRIGGER_POLICY").as_deref() {
        Ok("any") => TriggerPolicy::AnyPosition,
        _ => TriggerPolicy::AfterWhitespace,
    }
}

/// Character offsets of every grapheme boundary in `display`, including 0
/// and the end.
fn grapheme_boundaries(display: &str) -> Vec<usize> {
    let mut boundaries = vec![0];
    let mut consumed = 0usize;
    for grapheme in display.graphemes(true) {
        consumed += grapheme.chars().count();
        boundaries.push(consumed);
    }
    boundaries
}

fn previous_boundary(display: &str, cursor: usize) -> usize {
    grapheme_boundaries(display)
        .into_iter()
        .rev()
        .find(|&b| b < cursor)
        .unwrap_or(0)
}

fn next_boundary(display: &str, cursor: usize) -> usize {
    let boundaries = grapheme_boundaries(display);
    let end = boundaries.last().copied().unwrap_or(0);
    boundaries.into_iter().find(|&b| b > cursor).unwrap_or(end)
}

/// Terminal column of the caret within the input line (display widths, not
/// character counts - CJK and emoji occupy two cells).
fn cursor_column(display: &str, cursor: usize) -> u16 {
    let prefix: String = display.chars().take(cursor).collect();
    prefix.as_str().width() as u16
}

struct App {
    directory: StaticDirectory,
    policy: TriggerPolicy,
    composer: Composer<StaticDirectory>,
    /// Canonical buffers of messages already sent, newest last.
    sent: Vec<String>,
    status_message: String,
    should_quit: bool,
}

impl App {
    fn new() -> Self {
        let directory = StaticDirectory::new(sample_users());
        let policy = trigger_policy_from_env();
        let composer = Composer::new(directory.clone()).with_policy(policy);
        Self {
            directory,
            policy,
            composer,
            sent: Vec::new(),
            status_message: String::new(),
            should_quit: false,
        }
    }

    fn apply(&mut self, command: ComposerCommand) {
        if let Err(err) = self.composer.apply(command) {
            self.status_message = err.to_string();
        }
    }

    fn choose_highlighted(&mut self) {
        if let Some(user) = self.composer.selected_user().cloned() {
            self.apply(ComposerCommand::MentionChosen { user });
        }
    }

    fn send_message(&mut self) {
        if self.composer.data().is_empty() {
            return;
        }
        self.sent.push(self.composer.data().to_string());
        self.composer = Composer::new(self.directory.clone()).with_policy(self.policy);
        self.status_message.clear();
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }
        self.status_message.clear();

        let dropdown_open = self
            .composer
            .search()
            .is_some_and(|search| !search.results.is_empty());

        match (key.code, key.modifiers) {
            (KeyCode::Char('x'), KeyModifiers::CONTROL)
            | (KeyCode::Char('c'), KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            (KeyCode::Esc, _) => {
                if self.composer.search().is_some() {
                    self.apply(ComposerCommand::SearchCancelled);
                } else {
                    self.should_quit = true;
                }
            }
            (KeyCode::Enter, _) => {
                if dropdown_open {
                    self.choose_highlighted();
                } else {
                    self.send_message();
                }
            }
            (KeyCode::Tab, _) => {
                if dropdown_open {
                    self.choose_highlighted();
                }
            }
            (KeyCode::Up, _) if dropdown_open => {
                self.apply(ComposerCommand::SelectionMovedUp);
            }
            (KeyCode::Down, _) if dropdown_open => {
                self.apply(ComposerCommand::SelectionMovedDown);
            }
            (KeyCode::Backspace, _) => {
                let cursor = self.composer.cursor();
                self.apply(ComposerCommand::RangeDeleted {
                    start: cursor,
                    end: cursor,
                });
            }
            (KeyCode::Left, _) => {
                let render = self.composer.render();
                let cursor = previous_boundary(&render.display_text, render.cursor);
                self.apply(ComposerCommand::CursorMoved { cursor });
            }
            (KeyCode::Right, _) => {
                let render = self.composer.render();
                let cursor = next_boundary(&render.display_text, render.cursor);
                self.apply(ComposerCommand::CursorMoved { cursor });
            }
            (KeyCode::Home, _) => {
                self.apply(ComposerCommand::CursorMoved { cursor: 0 });
            }
            (KeyCode::End, _) => {
                let cursor = self.composer.render().display_text.chars().count();
                self.apply(ComposerCommand::CursorMoved { cursor });
            }
            (KeyCode::Char(ch), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
                let cursor = self.composer.cursor();
                self.apply(ComposerCommand::CharacterTyped { ch, cursor });
            }
            _ => {}
        }
    }

    fn render(&self, frame: &mut Frame) {
        let render = self.composer.render();
        let search = self.composer.search();
        let dropdown_height = search
            .map(|s| s.results.len().max(1) as u16 + 2)
            .unwrap_or(0);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(dropdown_height),
                Constraint::Length(3),
                Constraint::Min(1),
                Constraint::Length(1),
            ])
            .split(frame.area());

        // Input line with the caret placed by display width.
        let input = Paragraph::new(render.display_text.as_str())
            .block(Block::default().borders(Borders::ALL).title("Message"));
        frame.render_widget(input, rows[0]);
        let caret_x = rows[0].x + 1 + cursor_column(&render.display_text, render.cursor);
        let caret_x = caret_x.min(rows[0].right().saturating_sub(2));
        frame.set_cursor_position((caret_x, rows[0].y + 1));

        // Candidate dropdown while a search is live.
        if let Some(search) = search {
            let mut lines: Vec<Line> = Vec::new();
            if search.results.is_empty() {
                lines.push(Line::from(Span::styled(
                    "no matches",
                    Style::default().fg(Color::DarkGray),
                )));
            }
            for (index, user) in search.results.iter().enumerate() {
                let label = format!("@{}  ({})", user.display_name, user.name);
                let style = if index == search.selected {
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Cyan)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                lines.push(Line::from(Span::styled(label, style)));
            }
            let dropdown = Paragraph::new(lines).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!("Mention: @{}", search.query)),
            );
            frame.render_widget(dropdown, rows[1]);
        }

        // The wire form, live.
        let canonical = Paragraph::new(self.composer.data())
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title("Canonical"));
        frame.render_widget(canonical, rows[2]);

        // Sent log, newest last.
        let mut log_lines: Vec<Line> = Vec::new();
        for data in &self.sent {
            log_lines.push(Line::from(format!("→ {data}")));
        }
        let log = Paragraph::new(log_lines)
            .block(Block::default().borders(Borders::ALL).title("Sent"));
        frame.render_widget(log, rows[3]);

        let help = if self.status_message.is_empty() {
            "Enter: send/choose  Tab: choose  ↑↓: select  Esc: cancel/quit  Ctrl+X: quit"
                .to_string()
        } else {
            self.status_message.clone()
        };
        frame.render_widget(
            Paragraph::new(help).style(Style::default().fg(Color::DarkGray)),
            rows[4],
        );
    }
}

fn main() -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new();
    let result = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|frame| app.render(frame))?;

        if app.should_quit {
            break;
        }

        if event::poll(std::time::Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) => app.handle_key_event(key),
                Event::Resize(_, _) => {}
                _ => {}
            }
        }
    }

    Ok(())
}
