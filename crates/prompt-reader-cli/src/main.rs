use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use prompt_reader_config::Config;
use prompt_reader_engine::{
    ActionOutcome, PanelAction, PanelError, PanelView, PromptHost, PromptId, PromptPanel, Severity,
    ViewItem,
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};
use std::{
    env,
    fs::OpenOptions,
    io::{Stdout, stdout},
    path::PathBuf,
    process,
    time::Duration,
};

mod host;

use host::TerminalHost;

const TICK_RATE: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, PartialEq, Eq)]
enum Mode {
    Browse,
    AddPrompt,
    SetPath { input: String },
}

struct App {
    panel: PromptPanel,
    host: TerminalHost,
    list_state: ListState,
    mode: Mode,
}

impl App {
    fn new(host: TerminalHost) -> Self {
        let mut app = Self {
            panel: PromptPanel::new(),
            host,
            list_state: ListState::default(),
            mode: Mode::Browse,
        };
        app.panel.attach(&mut app.host);
        app.reset_selection();
        app
    }

    /// Indices (into the view items) of every prompt card.
    fn prompt_indices(&self) -> Vec<usize> {
        self.panel
            .view()
            .items()
            .iter()
            .enumerate()
            .filter(|(_, item)| matches!(item, ViewItem::Prompt(_)))
            .map(|(i, _)| i)
            .collect()
    }

    fn selected_prompt(&self) -> Option<PromptId> {
        let index = self.list_state.selected()?;
        match self.panel.view().items().get(index)? {
            ViewItem::Prompt(card) => Some(card.id),
            ViewItem::Plain { .. } => None,
        }
    }

    /// Keeps the selection on a prompt after the view changed underneath it.
    fn reset_selection(&mut self) {
        let prompts = self.prompt_indices();
        let keep = self
            .list_state
            .selected()
            .filter(|i| prompts.contains(i))
            .or_else(|| prompts.first().copied());
        self.list_state.select(keep);
    }

    fn next_prompt(&mut self) {
        let prompts = self.prompt_indices();
        if prompts.is_empty() {
            return;
        }
        let next = match self.list_state.selected() {
            Some(i) => prompts
                .iter()
                .copied()
                .find(|&p| p > i)
                .unwrap_or(prompts[0]),
            None => prompts[0],
        };
        self.list_state.select(Some(next));
    }

    fn previous_prompt(&mut self) {
        let prompts = self.prompt_indices();
        let Some(&last) = prompts.last() else {
            return;
        };
        let previous = match self.list_state.selected() {
            Some(i) => prompts.iter().rev().copied().find(|&p| p < i).unwrap_or(last),
            None => last,
        };
        self.list_state.select(Some(previous));
    }

    fn apply(&mut self, action: PanelAction) {
        match self.panel.apply(action, &mut self.host) {
            Ok(ActionOutcome::Saved) => {
                self.mode = Mode::Browse;
                self.reset_selection();
            }
            Ok(ActionOutcome::Refreshed) => self.reset_selection(),
            Ok(ActionOutcome::FormClosed) => self.mode = Mode::Browse,
            Ok(ActionOutcome::FormOpened) => self.mode = Mode::AddPrompt,
            Ok(ActionOutcome::Copied(_) | ActionOutcome::Ignored) => {}
            // Save failures are already reported by the panel
            Err(e @ (PanelError::UnknownPrompt(_) | PanelError::Host(_))) => {
                self.host.notify_user(&e.to_string(), Severity::Error);
            }
            Err(e) => log::debug!("Action failed: {e}"),
        }
    }

    fn apply_path(&mut self, input: &str) {
        let path = PathBuf::from(input.trim());
        match self.host.set_prompts_path(&path) {
            Ok(()) => {
                self.mode = Mode::Browse;
                self.panel.attach(&mut self.host);
                self.list_state.select(None);
                self.reset_selection();
                self.host
                    .notify_user("Prompts file path updated", Severity::Info);
            }
            Err(e) => self.host.notify_user(&format!("{e:#}"), Severity::Error),
        }
    }

    /// Returns true when the app should quit.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        match self.mode.clone() {
            Mode::Browse => return self.handle_browse_key(key),
            Mode::AddPrompt => self.handle_form_key(key),
            Mode::SetPath { input } => self.handle_path_key(key, input),
        }
        false
    }

    fn handle_browse_key(&mut self, key: KeyEvent) -> bool {
        self.host.clear_status();
        match key.code {
            KeyCode::Char('q') => return true,
            KeyCode::Down | KeyCode::Char('j') => self.next_prompt(),
            KeyCode::Up | KeyCode::Char('k') => self.previous_prompt(),
            KeyCode::Enter | KeyCode::Char('c') | KeyCode::Char('y') => {
                if let Some(id) = self.selected_prompt() {
                    self.apply(PanelAction::CopyPrompt(id));
                }
            }
            // Adding needs a file to add to: ask for one first
            KeyCode::Char('a') if matches!(self.panel.view(), PanelView::NoPath) => {
                self.mode = Mode::SetPath {
                    input: String::new(),
                };
            }
            KeyCode::Char('a') => self.apply(PanelAction::OpenAddForm),
            KeyCode::Char('r') => self.apply(PanelAction::Refresh),
            KeyCode::Char('p') => {
                let input = self
                    .host
                    .configured_path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default();
                self.mode = Mode::SetPath { input };
            }
            _ => {}
        }
        false
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.apply(PanelAction::Cancel),
            KeyCode::Enter if key.modifiers.contains(KeyModifiers::ALT) => {
                if let Some(form) = self.panel.form_mut() {
                    form.push_char('\n');
                }
            }
            KeyCode::Enter => {
                let draft = self
                    .panel
                    .form()
                    .map(|f| f.draft().to_string())
                    .unwrap_or_default();
                self.apply(PanelAction::SubmitPrompt(draft));
            }
            KeyCode::Backspace => {
                if let Some(form) = self.panel.form_mut() {
                    form.backspace();
                }
            }
            KeyCode::Char(c) => {
                if let Some(form) = self.panel.form_mut() {
                    form.push_char(c);
                }
            }
            _ => {}
        }
    }

    fn handle_path_key(&mut self, key: KeyEvent, mut input: String) {
        match key.code {
            KeyCode::Esc => self.mode = Mode::Browse,
            KeyCode::Enter => self.apply_path(&input),
            KeyCode::Backspace => {
                input.pop();
                self.mode = Mode::SetPath { input };
            }
            KeyCode::Char(c) => {
                input.push(c);
                self.mode = Mode::SetPath { input };
            }
            _ => {}
        }
    }

    /// Picks up file changes delivered by the watcher.
    fn on_tick(&mut self) {
        if self.panel.pump(&mut self.host) {
            self.reset_selection();
        }
    }
}

fn init_logging() {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(log::LevelFilter::Info)
        .parse_default_env();

    // The panel owns the terminal, so log to a file next to the config
    let log_path = Config::log_path();
    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    match OpenOptions::new().create(true).append(true).open(&log_path) {
        Ok(file) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        Err(e) => eprintln!("Warning: cannot open log file {}: {e}", log_path.display()),
    }

    builder.init();
}

fn usage(program: &str) -> ! {
    eprintln!("Usage: {program} [prompts-file.md]");
    eprintln!("       {program} --set-path <prompts-file.md>");
    process::exit(1);
}

fn main() -> Result<()> {
    init_logging();
    log::info!("prompt-reader starting up");

    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("prompt-reader");
    let config_path = Config::config_path();

    let config = match Config::load() {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            eprintln!("Fix or remove {} and try again", config_path.display());
            process::exit(1);
        }
    };

    let config = match args.as_slice() {
        [_] => config,
        [_, flag, path] if flag == "--set-path" => {
            let mut host = TerminalHost::new(config, config_path.clone());
            if let Err(e) = host.set_prompts_path(&PathBuf::from(path)) {
                eprintln!("Error: {e:#}");
                process::exit(1);
            }
            println!("Prompts file set to {path} in {}", config_path.display());
            return Ok(());
        }
        [_, path] if !path.starts_with('-') => {
            // Session-only override; not persisted
            log::info!("Using prompts file from CLI argument: {path}");
            Config::with_expanded_prompts_path(path)
        }
        _ => usage(program),
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(TerminalHost::new(config, config_path));

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    app.panel.detach();

    if let Err(err) = res {
        log::error!("{err:?}");
        println!("{err:?}");
    }

    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if event::poll(TICK_RATE)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && app.handle_key(key)
        {
            return Ok(());
        }

        app.on_tick();
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(form_height(&app.mode)),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(f.area());

    draw_panel(f, app, rows[0]);

    match &app.mode {
        Mode::AddPrompt => {
            let draft = app.panel.form().map(|form| form.draft()).unwrap_or("");
            let lines: Vec<Line> = draft.split('\n').map(Line::from).collect();
            let form = Paragraph::new(lines)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title("New prompt (Enter: save, Alt+Enter: newline, Esc: cancel)"),
                )
                .wrap(Wrap { trim: false });
            f.render_widget(form, rows[1]);
        }
        Mode::SetPath { input } => {
            let form = Paragraph::new(Line::from(input.as_str())).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Prompts file path (Enter: save, Esc: cancel)"),
            );
            f.render_widget(form, rows[1]);
        }
        Mode::Browse => {}
    }

    if let Some((message, severity)) = app.host.status() {
        let color = match severity {
            Severity::Info => Color::Green,
            Severity::Warning => Color::Yellow,
            Severity::Error => Color::Red,
        };
        let status = Paragraph::new(Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(color),
        )));
        f.render_widget(status, rows[2]);
    }

    let help_text = Line::from(vec![
        Span::raw("q: Quit | "),
        Span::raw("↑/k ↓/j: Select | "),
        Span::raw("Enter/c: Copy | "),
        Span::raw("a: Add | r: Refresh | p: Set path"),
    ]);
    f.render_widget(Paragraph::new(help_text), rows[3]);
}

fn form_height(mode: &Mode) -> u16 {
    match mode {
        Mode::Browse => 0,
        Mode::AddPrompt => 6,
        Mode::SetPath { .. } => 3,
    }
}

fn draw_panel(f: &mut Frame, app: &mut App, area: ratatui::layout::Rect) {
    match app.panel.view() {
        PanelView::NoPath => {
            let text = vec![
                Line::from("No prompts file configured"),
                Line::from(""),
                Line::from("Press p to enter the path of a Markdown prompts file,"),
                Line::from("or run: prompt-reader --set-path <file.md>"),
            ];
            let paragraph = Paragraph::new(text)
                .block(Block::default().borders(Borders::ALL).title("Prompts"));
            f.render_widget(paragraph, area);
        }
        PanelView::ReadError { path, message } => {
            let text = vec![
                Line::from("Could not read prompts file"),
                Line::from(path.display().to_string()),
                Line::from(""),
                Line::from(Span::styled(
                    message.clone(),
                    Style::default().fg(Color::Red),
                )),
            ];
            let paragraph = Paragraph::new(text)
                .block(Block::default().borders(Borders::ALL).title("Prompts"))
                .wrap(Wrap { trim: true });
            f.render_widget(paragraph, area);
        }
        PanelView::Content { path, items } => {
            let list_items: Vec<ListItem> = items.iter().map(list_item).collect();
            let title = format!("Prompts - {}", path.display());
            let list = List::new(list_items)
                .block(Block::default().borders(Borders::ALL).title(title))
                .highlight_style(Style::default().bg(Color::Yellow).fg(Color::Black));
            f.render_stateful_widget(list, area, &mut app.list_state);
        }
    }
}

fn list_item(item: &ViewItem) -> ListItem<'static> {
    match item {
        ViewItem::Prompt(card) => {
            let mut lines = Vec::new();
            for (i, line) in card.copy_text.split('\n').enumerate() {
                let marker = if i == 0 {
                    format!("{:>3}. ", card.id.0)
                } else {
                    "     ".to_string()
                };
                lines.push(Line::from(vec![
                    Span::styled(marker, Style::default().fg(Color::Cyan)),
                    Span::raw(line.to_string()),
                ]));
            }
            ListItem::new(lines)
        }
        ViewItem::Plain { text, .. } => {
            let style = if text.starts_with('#') {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            ListItem::new(Line::from(Span::styled(text.clone(), style)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn app_with(content: &str) -> (TempDir, App) {
        let dir = TempDir::new().unwrap();
        let prompts = dir.path().join("prompts.md");
        std::fs::write(&prompts, content).unwrap();
        let host = TerminalHost::new(
            Config::with_prompts_path(&prompts),
            dir.path().join("config.toml"),
        );
        (dir, App::new(host))
    }

    fn press(app: &mut App, code: KeyCode) -> bool {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn selection_skips_plain_lines() {
        let (_dir, mut app) = app_with("# Title\n- one\nnotes\n\n- two\n");

        assert_eq!(app.selected_prompt(), Some(PromptId(1)));
        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.selected_prompt(), Some(PromptId(2)));
        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.selected_prompt(), Some(PromptId(1)));
        press(&mut app, KeyCode::Up);
        assert_eq!(app.selected_prompt(), Some(PromptId(2)));
    }

    #[test]
    fn no_prompts_means_no_selection() {
        let (_dir, mut app) = app_with("just notes\n");
        press(&mut app, KeyCode::Down);
        assert_eq!(app.list_state.selected(), None);
        assert_eq!(app.selected_prompt(), None);
    }

    #[test]
    fn typed_prompt_is_saved_and_selectable() {
        let (dir, mut app) = app_with("- one\n");

        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.mode, Mode::AddPrompt);
        for c in "two".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.mode, Mode::Browse);
        assert_eq!(
            std::fs::read_to_string(dir.path().join("prompts.md")).unwrap(),
            "- one\n\n- two\n\n"
        );
        assert_eq!(app.panel.view().prompts().count(), 2);
        assert_eq!(app.host.status(), Some(("Prompt saved", Severity::Info)));
    }

    #[test]
    fn blank_submit_keeps_form_open() {
        let (_dir, mut app) = app_with("- one\n");

        press(&mut app, KeyCode::Char('a'));
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.mode, Mode::AddPrompt);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, Mode::Browse);
        assert!(app.panel.form().is_none());
    }

    #[test]
    fn set_path_rejects_non_markdown() {
        let (dir, mut app) = app_with("- one\n");
        let bad = dir.path().join("notes.txt").display().to_string();

        press(&mut app, KeyCode::Char('p'));
        app.mode = Mode::SetPath { input: bad };
        press(&mut app, KeyCode::Enter);

        assert!(matches!(app.mode, Mode::SetPath { .. }));
        assert!(matches!(app.host.status(), Some((_, Severity::Error))));
    }

    #[test]
    fn add_without_path_asks_for_path_first() {
        let dir = TempDir::new().unwrap();
        let mut app = App::new(TerminalHost::new(
            Config::default(),
            dir.path().join("config.toml"),
        ));
        assert_eq!(app.panel.view(), &PanelView::NoPath);

        press(&mut app, KeyCode::Char('a'));

        assert_eq!(
            app.mode,
            Mode::SetPath {
                input: String::new()
            }
        );
        assert!(app.panel.form().is_none());
    }

    #[test]
    fn quit_only_from_browse() {
        let (_dir, mut app) = app_with("- one\n");
        press(&mut app, KeyCode::Char('a'));
        assert!(!press(&mut app, KeyCode::Char('q')));
        assert_eq!(app.panel.form().map(|f| f.draft()), Some("q"));
        press(&mut app, KeyCode::Esc);
        assert!(press(&mut app, KeyCode::Char('q')));
    }
}
