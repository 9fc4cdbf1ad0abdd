use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, List, ListItem, ListState, Paragraph, Row, Table, TableState, Tabs, Wrap},
    Frame, Terminal,
};
use std::io;
use std::time::{Duration, Instant};

use crate::ack::CopiedFlag;
use crate::clipboard::{Clipboard, CopyText};
use crate::crossref::{self, ModalDetails};
use crate::library::{Numbering, PromptLibrary, EMPTY_STATE};
use crate::models::{Category, FlatPrompt};
use crate::store::DataStore;
use crate::table_view::{self, GridCell};
use crate::view::{self, Location, Screen};

const TICK_RATE: Duration = Duration::from_millis(200);
const APP_HEADING: &str = "AI SDLC Playbook";
const LANDING_TITLE: &str = "AI Software Development Life Cycle Playbook";
const LANDING_DESCRIPTION: &str =
    "A Master Framework for Building Scalable, Governed, and Intelligent Analytics Platforms.";
const ACTION_LABEL: &str = "↗ View Prompt";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
}

pub struct App<C: CopyText = Clipboard> {
    store: DataStore,
    clipboard: C,
    pub screen: Screen,
    history: Vec<Screen>,
    pub library: PromptLibrary,
    pub catalog: PromptLibrary,
    pub card_state: ListState,
    pub row_state: TableState,
    pub prompt_state: TableState,
    pub table_copied: CopiedFlag<String>,
    pub input_mode: InputMode,
    pub should_quit: bool,
}

impl<C: CopyText> App<C> {
    pub fn new(store: DataStore, clipboard: C, screen: Screen) -> Self {
        let mut app = App {
            store,
            clipboard,
            screen,
            history: Vec::new(),
            library: PromptLibrary::new(Numbering::Sequential),
            catalog: PromptLibrary::new(Numbering::PerArea),
            card_state: ListState::default(),
            row_state: TableState::default(),
            prompt_state: TableState::default(),
            table_copied: CopiedFlag::default(),
            input_mode: InputMode::Normal,
            should_quit: false,
        };
        app.reset_selection();
        app
    }

    pub fn location(&self) -> Location {
        self.screen.to_location(&self.store)
    }

    pub fn navigate(&mut self, screen: Screen) {
        log::debug!("navigate to {}", screen.to_location(&self.store));
        let previous = std::mem::replace(&mut self.screen, screen);
        self.history.push(previous);
        self.input_mode = InputMode::Normal;
        self.reset_selection();
    }

    pub fn go_back(&mut self) {
        self.screen = self.history.pop().unwrap_or_default();
        self.input_mode = InputMode::Normal;
        self.reset_selection();
    }

    pub fn go_home(&mut self) {
        self.navigate(Screen::default());
    }

    fn reset_selection(&mut self) {
        let first = |len: usize| if len == 0 { None } else { Some(0) };
        match &self.screen {
            Screen::Landing { category } => {
                let len = view::landing_cards(&self.store, *category).len();
                self.card_state.select(first(len));
            }
            Screen::Table { table_id, .. } => {
                let len = self.store.table(*table_id).map_or(0, |t| t.rows.len());
                self.row_state.select(first(len));
            }
            Screen::TaskCatalog | Screen::PromptLibrary => {
                let len = self.visible_prompts().len();
                self.prompt_state.select(first(len));
            }
        }
    }

    fn active_library(&self) -> Option<&PromptLibrary> {
        match self.screen {
            Screen::PromptLibrary => Some(&self.library),
            Screen::TaskCatalog => Some(&self.catalog),
            _ => None,
        }
    }

    fn active_library_mut(&mut self) -> Option<&mut PromptLibrary> {
        match self.screen {
            Screen::PromptLibrary => Some(&mut self.library),
            Screen::TaskCatalog => Some(&mut self.catalog),
            _ => None,
        }
    }

    pub fn visible_prompts(&self) -> Vec<FlatPrompt> {
        self.active_library()
            .map(|library| library.visible(self.store.prompts()))
            .unwrap_or_default()
    }

    /// Details for the open table modal, resolved against the prompt document on every call.
    pub fn table_modal(&self) -> Option<ModalDetails> {
        match &self.screen {
            Screen::Table {
                table_id,
                modal: Some(key),
            } => {
                let table = self.store.table(*table_id)?;
                Some(crossref::modal_details(self.store.prompts(), table, key))
            }
            _ => None,
        }
    }

    pub fn library_detail(&self) -> Option<FlatPrompt> {
        self.active_library()?.detail().cloned()
    }

    pub fn next_item(&mut self) {
        self.step_selection(true);
    }

    pub fn previous_item(&mut self) {
        self.step_selection(false);
    }

    fn step_selection(&mut self, forward: bool) {
        match &self.screen {
            Screen::Landing { category } => {
                let len = view::landing_cards(&self.store, *category).len();
                let next = step(self.card_state.selected(), len, forward);
                self.card_state.select(next);
            }
            Screen::Table { table_id, .. } => {
                let len = self.store.table(*table_id).map_or(0, |t| t.rows.len());
                let next = step(self.row_state.selected(), len, forward);
                self.row_state.select(next);
            }
            Screen::TaskCatalog | Screen::PromptLibrary => {
                let len = self.visible_prompts().len();
                let next = step(self.prompt_state.selected(), len, forward);
                self.prompt_state.select(next);
            }
        }
    }

    pub fn change_category(&mut self, forward: bool) {
        if let Screen::Landing { category } = &mut self.screen {
            *category = if forward {
                category.next()
            } else {
                category.previous()
            };
            self.reset_selection();
        }
    }

    pub fn change_table(&mut self, forward: bool) {
        if let Screen::Table { table_id, .. } = &self.screen {
            let tables = self.store.tables();
            let position = self.store.position(*table_id);
            let next = step(Some(position), tables.len(), forward).unwrap_or(0);
            self.screen = Screen::open_table(&tables[next]);
            self.table_copied.clear();
            self.reset_selection();
        }
    }

    pub fn open_selected(&mut self) {
        match self.screen.clone() {
            Screen::Landing { category } => {
                let cards = view::landing_cards(&self.store, category);
                let target = self
                    .card_state
                    .selected()
                    .and_then(|i| cards.get(i))
                    .map(|(_, table)| Screen::open_table(table));
                if let Some(screen) = target {
                    self.navigate(screen);
                }
            }
            Screen::Table { table_id, .. } => {
                let key = self.store.table(table_id).and_then(|table| {
                    let grid = table_view::project(table);
                    let row = self.row_state.selected()?;
                    grid.row_action(row).map(str::to_string)
                });
                if let Some(key) = key {
                    self.open_table_modal(key);
                }
            }
            Screen::TaskCatalog | Screen::PromptLibrary => {
                let visible = self.visible_prompts();
                let selected = self.prompt_state.selected().and_then(|i| visible.get(i).cloned());
                if let (Some(record), Some(library)) = (selected, self.active_library_mut()) {
                    library.view_detail(&record);
                }
            }
        }
    }

    pub fn open_table_modal(&mut self, key: String) {
        if let Screen::Table { modal, .. } = &mut self.screen {
            *modal = Some(key);
            self.table_copied.clear();
        }
    }

    pub fn close_modal(&mut self) {
        if let Screen::Table { modal, .. } = &mut self.screen {
            *modal = None;
            self.table_copied.clear();
            return;
        }
        if let Some(library) = self.active_library_mut() {
            library.close_detail();
        }
    }

    pub fn has_modal(&self) -> bool {
        match &self.screen {
            Screen::Table { modal, .. } => modal.is_some(),
            Screen::TaskCatalog | Screen::PromptLibrary => {
                self.active_library().and_then(PromptLibrary::detail).is_some()
            }
            Screen::Landing { .. } => false,
        }
    }

    pub fn copy_current(&mut self, now: Instant) {
        if let Screen::Table { modal: Some(key), .. } = &self.screen {
            let key = key.clone();
            if let Some(details) = self.table_modal() {
                self.clipboard.copy(&details.prompt);
                self.table_copied.mark(key, now);
            }
            return;
        }

        if let Some(record) = self.library_detail() {
            let clipboard = &mut self.clipboard;
            let library = match self.screen {
                Screen::PromptLibrary => &mut self.library,
                _ => &mut self.catalog,
            };
            library.copy_prompt(&record, clipboard, now);
        }
    }

    pub fn is_copied(&self, now: Instant) -> bool {
        match &self.screen {
            Screen::Table { modal: Some(key), .. } => self.table_copied.is_set(key, now),
            _ => match (self.active_library(), self.library_detail()) {
                (Some(library), Some(record)) => library.is_copied(&record, now),
                _ => false,
            },
        }
    }

    pub fn expire_copied(&mut self, now: Instant) {
        self.table_copied.expire(now);
        self.library.expire_copied(now);
        self.catalog.expire_copied(now);
    }

    fn edit_search(&mut self, edit: impl FnOnce(&mut PromptLibrary)) {
        if let Some(library) = self.active_library_mut() {
            edit(library);
        }
        self.reset_selection();
    }

    fn cycle_area(&mut self, forward: bool) {
        let prompts = self.store.prompts().clone();
        self.edit_search(|library| library.cycle_area(&prompts, forward));
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if self.input_mode == InputMode::Search {
            match key.code {
                KeyCode::Enter | KeyCode::Esc => self.input_mode = InputMode::Normal,
                KeyCode::Backspace => self.edit_search(PromptLibrary::pop_search_char),
                KeyCode::Char(c) => self.edit_search(|library| library.push_search_char(c)),
                _ => {}
            }
            return;
        }

        if self.has_modal() {
            match key.code {
                KeyCode::Esc | KeyCode::Enter | KeyCode::Char('x') => self.close_modal(),
                KeyCode::Char('c') => self.copy_current(now),
                KeyCode::Char('q') => self.should_quit = true,
                _ => {}
            }
            return;
        }

        match (self.screen.clone(), key.code) {
            (_, KeyCode::Char('q')) => self.should_quit = true,
            (_, KeyCode::Down | KeyCode::Char('j')) => self.next_item(),
            (_, KeyCode::Up | KeyCode::Char('k')) => self.previous_item(),
            (_, KeyCode::Enter) => self.open_selected(),
            (Screen::Landing { .. }, KeyCode::Right | KeyCode::Char('l') | KeyCode::Tab) => {
                self.change_category(true)
            }
            (Screen::Landing { .. }, KeyCode::Left | KeyCode::Char('h') | KeyCode::BackTab) => {
                self.change_category(false)
            }
            (Screen::Landing { .. }, KeyCode::Char('p')) => self.navigate(Screen::PromptLibrary),
            (Screen::Table { .. }, KeyCode::Tab | KeyCode::Right) => self.change_table(true),
            (Screen::Table { .. }, KeyCode::BackTab | KeyCode::Left) => self.change_table(false),
            (Screen::Table { .. }, KeyCode::Char('p')) => self.navigate(Screen::PromptLibrary),
            (Screen::Table { .. }, KeyCode::Char('d')) => self.navigate(Screen::TaskCatalog),
            (Screen::Table { .. }, KeyCode::Char('H')) => self.go_home(),
            (Screen::TaskCatalog | Screen::PromptLibrary, KeyCode::Char('/')) => {
                self.input_mode = InputMode::Search
            }
            (Screen::TaskCatalog | Screen::PromptLibrary, KeyCode::Char('a')) => self.cycle_area(true),
            (Screen::TaskCatalog | Screen::PromptLibrary, KeyCode::Char('A')) => self.cycle_area(false),
            (Screen::Landing { .. }, _) => {}
            (_, KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('b')) => self.go_back(),
            _ => {}
        }
    }
}

fn step(selected: Option<usize>, len: usize, forward: bool) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some(match selected {
        Some(i) if forward => {
            if i >= len - 1 {
                0
            } else {
                i + 1
            }
        }
        Some(i) => {
            if i == 0 {
                len - 1
            } else {
                i - 1
            }
        }
        None => 0,
    })
}

pub fn run_tui(store: DataStore, screen: Screen) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(store, Clipboard::system(), screen);
    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

fn run_app<B: Backend, C: CopyText>(terminal: &mut Terminal<B>, app: &mut App<C>) -> io::Result<()> {
    loop {
        let now = Instant::now();
        app.expire_copied(now);
        terminal.draw(|f| ui(f, app, now))?;

        if event::poll(TICK_RATE)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key, Instant::now());
                }
            }
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

fn ui<C: CopyText>(f: &mut Frame, app: &mut App<C>, now: Instant) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(1)].as_ref())
        .split(f.area());

    let header = Paragraph::new(Line::from(vec![
        Span::styled(APP_HEADING, Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Span::raw("  "),
        Span::styled(app.screen.title(), Style::default().fg(Color::Gray)),
    ]))
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, chunks[0]);

    match app.screen.clone() {
        Screen::Landing { category } => render_landing(f, app, category, chunks[1]),
        Screen::Table { table_id, .. } => render_table(f, app, table_id, chunks[1]),
        Screen::TaskCatalog | Screen::PromptLibrary => render_library(f, app, chunks[1]),
    }

    render_footer(f, app, chunks[2]);

    if let Some(details) = app.table_modal() {
        render_modal(f, "How to Do", &details, app.is_copied(now));
    } else if let Some(record) = app.library_detail() {
        let details = ModalDetails {
            area: record.area_label,
            task: record.task,
            prompt: record.prompt,
        };
        render_modal(f, "Prompt Details", &details, app.is_copied(now));
    }
}

// Helper function to create centered rectangles for popups
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

fn highlight() -> Style {
    Style::default().bg(Color::LightGreen).fg(Color::Black).add_modifier(Modifier::BOLD)
}

fn render_landing<C: CopyText>(f: &mut Frame, app: &mut App<C>, category: Category, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Length(3), Constraint::Min(0)].as_ref())
        .split(area);

    let intro = Paragraph::new(vec![
        Line::from(Span::styled(LANDING_TITLE, Style::default().add_modifier(Modifier::BOLD))),
        Line::from(LANDING_DESCRIPTION),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });
    f.render_widget(intro, chunks[0]);

    let titles: Vec<Line> = Category::all().iter().map(|c| Line::from(c.label())).collect();
    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL).title("Category"))
        .select(category.index())
        .style(Style::default().fg(Color::Cyan))
        .highlight_style(Style::default().add_modifier(Modifier::BOLD).bg(Color::Black));
    f.render_widget(tabs, chunks[1]);

    let cards = view::landing_cards(&app.store, category);
    if cards.is_empty() {
        let empty = Paragraph::new("No playbook sections in this category yet.")
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("Sections"));
        f.render_widget(empty, chunks[2]);
        return;
    }

    let items: Vec<ListItem> = cards
        .iter()
        .map(|(section, table)| {
            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(format!("{} ", section.glyph), Style::default().fg(Color::Cyan)),
                    Span::styled(table.title.clone(), Style::default().add_modifier(Modifier::BOLD)),
                ]),
                Line::from(format!("  {}", section.description)),
                Line::from(Span::styled("  Show Details >", Style::default().fg(Color::Green))),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Sections"))
        .highlight_style(highlight())
        .highlight_symbol(">> ");
    f.render_stateful_widget(list, chunks[2], &mut app.card_state);
}

fn render_table<C: CopyText>(f: &mut Frame, app: &mut App<C>, table_id: u32, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)].as_ref())
        .split(area);

    let titles: Vec<Line> = app
        .store
        .tables()
        .iter()
        .map(|t| Line::from(t.title.clone()))
        .collect();
    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL).title("Tables"))
        .select(app.store.position(table_id))
        .style(Style::default().fg(Color::Cyan))
        .highlight_style(Style::default().add_modifier(Modifier::BOLD).bg(Color::Black));
    f.render_widget(tabs, chunks[0]);

    let Some(table) = app.store.table(table_id) else {
        return;
    };
    let grid = table_view::project(table);

    let header = Row::new(grid.headers.iter().map(|h| Cell::from(h.clone())))
        .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
    let rows: Vec<Row> = grid
        .rows
        .iter()
        .map(|row| {
            Row::new(row.iter().map(|cell| match cell {
                GridCell::Text(text) => Cell::from(text.clone()),
                GridCell::Action { .. } => Cell::from(Span::styled(
                    ACTION_LABEL,
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::UNDERLINED),
                )),
            }))
        })
        .collect();

    let columns = grid.headers.len().max(1) as u32;
    let widths = vec![Constraint::Ratio(1, columns); grid.headers.len()];
    let widget = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(grid.title.clone()))
        .highlight_style(highlight())
        .highlight_symbol(">> ");
    f.render_stateful_widget(widget, chunks[1], &mut app.row_state);
}

fn render_library<C: CopyText>(f: &mut Frame, app: &mut App<C>, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)].as_ref())
        .split(area);

    let (search, area_filter) = match app.active_library() {
        Some(library) => (library.search_text().to_string(), library.area_filter().to_string()),
        None => (String::new(), String::new()),
    };
    let searching = app.input_mode == InputMode::Search;
    let search_line = if search.is_empty() && !searching {
        Span::styled(
            "Search prompts by area, task, or keywords...",
            Style::default().fg(Color::DarkGray),
        )
    } else {
        Span::raw(if searching { format!("{}_", search) } else { search })
    };
    let controls = Paragraph::new(Line::from(vec![
        search_line,
        Span::raw("   "),
        Span::styled(format!("Area: {}", area_filter), Style::default().fg(Color::Cyan)),
    ]))
    .block(Block::default().borders(Borders::ALL).title("Search"));
    f.render_widget(controls, chunks[0]);

    let visible = app.visible_prompts();
    if visible.is_empty() {
        let empty = Paragraph::new(EMPTY_STATE)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title(app.screen.title()));
        f.render_widget(empty, chunks[1]);
        return;
    }

    let id_header = match app.screen {
        Screen::TaskCatalog => "Task ID",
        _ => "ID",
    };
    let header = Row::new(vec![id_header, "Task", "Area", "Prompt"])
        .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
    let rows: Vec<Row> = visible
        .iter()
        .map(|record| {
            Row::new(vec![
                Cell::from(record.id.to_string()),
                Cell::from(record.task.clone()),
                Cell::from(Span::styled(record.area_label.clone(), Style::default().fg(Color::Green))),
                Cell::from(record.prompt.clone()),
            ])
        })
        .collect();

    let widths = [
        Constraint::Percentage(6),
        Constraint::Percentage(32),
        Constraint::Percentage(15),
        Constraint::Percentage(47),
    ];
    let widget = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(app.screen.title()))
        .highlight_style(highlight())
        .highlight_symbol(">> ");
    f.render_stateful_widget(widget, chunks[1], &mut app.prompt_state);
}

fn render_modal(f: &mut Frame, title: &str, details: &ModalDetails, copied: bool) {
    let popup_area = centered_rect(70, 60, f.area());
    f.render_widget(Clear, popup_area);

    let section = |label: &'static str| {
        Span::styled(label, Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
    };
    let copy_label = if copied {
        Span::styled("✓ Copied!", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
    } else {
        Span::styled("[c] Copy", Style::default().fg(Color::Cyan))
    };

    let lines = vec![
        Line::from(section("Area")),
        Line::from(details.area.clone()),
        Line::from(""),
        Line::from(section("Task")),
        Line::from(details.task.clone()),
        Line::from(""),
        Line::from(vec![section("Prompt"), Span::raw("  "), copy_label]),
        Line::from(details.prompt.clone()),
        Line::from(""),
        Line::from(Span::styled("Esc: Close", Style::default().fg(Color::DarkGray))),
    ];

    let block = Block::default()
        .title(title.to_string())
        .borders(Borders::ALL)
        .style(Style::default().bg(Color::DarkGray).fg(Color::White));
    let content = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    f.render_widget(content, popup_area);
}

fn render_footer<C: CopyText>(f: &mut Frame, app: &App<C>, area: Rect) {
    let help = if app.input_mode == InputMode::Search {
        "Type to search • Enter/Esc: Done"
    } else if app.has_modal() {
        "c: Copy prompt • Esc: Close • q: Quit"
    } else {
        match app.screen {
            Screen::Landing { .. } => "←/→: Category • ↑/↓: Select • Enter: Show details • p: Prompt library • q: Quit",
            Screen::Table { .. } => "Tab: Next table • ↑/↓: Row • Enter: View prompt • p: Prompt library • d: Task catalog • H: Home • Esc: Back",
            Screen::TaskCatalog | Screen::PromptLibrary => "/: Search • a/A: Area • ↑/↓: Select • Enter: View • Esc: Back",
        }
    };
    let footer = Paragraph::new(Line::from(vec![
        Span::styled(help, Style::default().fg(Color::Gray)),
        Span::raw("   "),
        Span::styled(app.location().to_string(), Style::default().fg(Color::DarkGray)),
    ]));
    f.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ack::COPIED_WINDOW;
    use crate::clipboard::testing::RecordingClipboard;
    use crate::store::fixtures;
    use ratatui::backend::TestBackend;

    fn app() -> App<RecordingClipboard> {
        App::new(fixtures::store(), RecordingClipboard::default(), Screen::default())
    }

    fn press(app: &mut App<RecordingClipboard>, code: KeyCode, now: Instant) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE), now);
    }

    fn draw(app: &mut App<RecordingClipboard>, now: Instant) -> String {
        let mut terminal = Terminal::new(TestBackend::new(140, 40)).unwrap();
        terminal.draw(|f| ui(f, app, now)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn enter_on_landing_opens_first_card() {
        let now = Instant::now();
        let mut app = app();
        press(&mut app, KeyCode::Enter, now);
        assert_eq!(app.screen, Screen::Table { table_id: 1, modal: None });
        assert_eq!(app.location().to_string(), "/?table=assess");

        press(&mut app, KeyCode::Esc, now);
        assert_eq!(app.screen, Screen::default());
    }

    #[test]
    fn automation_row_opens_modal_and_copies() {
        let now = Instant::now();
        let mut app = app();
        press(&mut app, KeyCode::Enter, now);
        press(&mut app, KeyCode::Enter, now);

        assert_eq!(app.screen, Screen::Table { table_id: 1, modal: Some("1".to_string()) });
        assert_eq!(app.table_modal().unwrap().task, "Inventory");

        press(&mut app, KeyCode::Char('c'), now);
        assert_eq!(app.clipboard.copied, vec!["Create an Azure inventory table.".to_string()]);
        assert!(app.is_copied(now));
        assert!(!app.is_copied(now + COPIED_WINDOW));

        press(&mut app, KeyCode::Esc, now);
        assert_eq!(app.screen, Screen::Table { table_id: 1, modal: None });
        assert!(!app.is_copied(now));
    }

    #[test]
    fn plain_rows_do_not_open_a_modal() {
        let now = Instant::now();
        let mut app = app();
        press(&mut app, KeyCode::Enter, now);
        press(&mut app, KeyCode::Down, now);
        press(&mut app, KeyCode::Enter, now);
        assert!(!app.has_modal());
    }

    #[test]
    fn tab_cycles_tables() {
        let now = Instant::now();
        let mut app = app();
        press(&mut app, KeyCode::Enter, now);
        press(&mut app, KeyCode::Tab, now);
        assert_eq!(app.screen, Screen::Table { table_id: 2, modal: None });
        press(&mut app, KeyCode::Tab, now);
        assert_eq!(app.screen, Screen::Table { table_id: 1, modal: None });
    }

    #[test]
    fn library_search_detail_and_copy() {
        let now = Instant::now();
        let mut app = app();
        press(&mut app, KeyCode::Char('p'), now);
        assert_eq!(app.screen, Screen::PromptLibrary);
        assert_eq!(app.visible_prompts().len(), 4);

        press(&mut app, KeyCode::Char('/'), now);
        for c in "dax".chars() {
            press(&mut app, KeyCode::Char(c), now);
        }
        press(&mut app, KeyCode::Enter, now);
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.visible_prompts().len(), 1);

        press(&mut app, KeyCode::Enter, now);
        assert_eq!(app.library_detail().map(|r| r.id), Some(4));
        press(&mut app, KeyCode::Char('c'), now);
        assert!(app.is_copied(now));
        assert_eq!(app.clipboard.copied.len(), 1);

        press(&mut app, KeyCode::Esc, now);
        assert!(!app.has_modal());
        press(&mut app, KeyCode::Esc, now);
        assert_eq!(app.screen, Screen::default());
    }

    #[test]
    fn area_key_cycles_library_filter() {
        let now = Instant::now();
        let mut app = app();
        press(&mut app, KeyCode::Char('p'), now);
        press(&mut app, KeyCode::Char('a'), now);
        assert_eq!(app.library.area_filter(), "Assess");
        assert_eq!(app.visible_prompts().len(), 2);
    }

    #[test]
    fn task_catalog_numbers_per_area() {
        let now = Instant::now();
        let mut app = app();
        press(&mut app, KeyCode::Enter, now);
        press(&mut app, KeyCode::Char('d'), now);
        assert_eq!(app.screen, Screen::TaskCatalog);
        let ids: Vec<usize> = app.visible_prompts().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 1, 1]);
    }

    #[test]
    fn task_catalog_opens_and_copies_the_selected_area() {
        let now = Instant::now();
        let mut app = App::new(fixtures::store(), RecordingClipboard::default(), Screen::TaskCatalog);
        press(&mut app, KeyCode::Down, now);
        press(&mut app, KeyCode::Down, now);
        press(&mut app, KeyCode::Enter, now);

        let shown = app.library_detail().unwrap();
        assert_eq!((shown.id, shown.task.as_str()), (1, "Connector Setup"));

        press(&mut app, KeyCode::Char('c'), now);
        assert_eq!(app.clipboard.copied, vec!["Write linked service JSON.".to_string()]);
        assert!(app.is_copied(now));
        assert!(!app.catalog.is_copied(&app.visible_prompts()[0], now));
    }

    #[test]
    fn draws_landing_page() {
        let now = Instant::now();
        let mut app = app();
        let screen = draw(&mut app, now);
        assert!(screen.contains(LANDING_TITLE));
        assert!(screen.contains("Show Details >"));
        assert!(screen.contains("Data Ingestion & Prep!"));
    }

    #[test]
    fn draws_table_modal_with_copied_state() {
        let now = Instant::now();
        let mut app = app();
        press(&mut app, KeyCode::Enter, now);
        let screen = draw(&mut app, now);
        assert!(screen.contains(ACTION_LABEL));

        press(&mut app, KeyCode::Enter, now);
        press(&mut app, KeyCode::Char('c'), now);
        let screen = draw(&mut app, now);
        assert!(screen.contains("How to Do"));
        assert!(screen.contains("Copied!"));
    }

    #[test]
    fn draws_empty_state_for_no_matches() {
        let now = Instant::now();
        let mut app = app();
        press(&mut app, KeyCode::Char('p'), now);
        app.library.search("no such prompt");
        let screen = draw(&mut app, now);
        assert!(screen.contains(EMPTY_STATE));
    }
}
