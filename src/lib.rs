use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::sync::mpsc::Sender;
use std::time::{Duration, Instant};

use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};

use ratatui::widgets::{Block, Borders, Clear, Paragraph};

pub mod auth_modal;
pub mod cli;
pub mod client;
pub mod config;
pub mod debounce;
pub mod export;
pub mod form;
pub mod search_modal;
pub mod session;
pub mod table;
pub mod widgets;

pub use cli::{Args, ServiceKind};
pub use config::{AppConfig, ConfigManager};

use auth_modal::{AuthFocus, AuthModal, AuthTab};
use client::ApiClient;
use debounce::Debouncer;
use export::ExportFormat;
use form::SearchForm;
use search_modal::{SearchFocus, SearchModal};
use session::{AuthField, PasswordStrength, Session, UserStore};
use table::ResultsTable;
use widgets::controls::Controls;
use widgets::results_table::ResultsTableView;

/// Application name used for config directory and other app-specific paths
pub const APP_NAME: &str = "admitui";

pub enum AppEvent {
    Key(KeyEvent),
    Resize(u16, u16), // resized (width, height)
    /// Validated form submitted; shows the loading state
    Search(SearchForm),
    /// Internal event to perform the blocking search after a UI update
    DoSearch(SearchForm),
    /// Debounced filter commit with the final query value
    ApplyFilter(String),
    /// Debounced layout recompute after the last resize
    ApplyResize,
    Sort(usize),
    Export(ExportFormat),
    /// Internal event to perform the blocking export after a UI update
    DoExport(ExportFormat, SearchForm),
    Exit,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub enum InputMode {
    #[default]
    Normal,
    Filtering,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

impl StatusKind {
    fn color(self) -> Color {
        match self {
            Self::Info => Color::Cyan,
            Self::Success => Color::Green,
            Self::Error => Color::Red,
        }
    }
}

/// Transient status message, the toast analog
pub struct StatusMessage {
    pub kind: StatusKind,
    pub message: String,
    expires_at: Instant,
}

#[derive(Clone, Debug, Default)]
pub enum LoadingState {
    #[default]
    Idle,
    Busy {
        phase: String,
    },
}

impl LoadingState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadingState::Busy { .. })
    }
}

pub struct App {
    service: ServiceKind,
    client: ApiClient,
    store: UserStore,
    pub session: Option<Session>,
    config: AppConfig,
    events: Sender<AppEvent>,
    pub table: Option<ResultsTable>,
    summary: Option<String>,
    pub search_modal: SearchModal,
    pub auth_modal: AuthModal,
    pub input_mode: InputMode,
    input: String,
    input_cursor: usize, // Cursor position in input string, in chars
    filter_debounce: Debouncer,
    pending_filter: Option<String>,
    resize_debounce: Debouncer,
    viewport_width: u16,
    narrow: bool,
    col_cursor: usize,
    row_offset: usize,
    last_form: Option<SearchForm>,
    loading_state: LoadingState,
    status: Option<StatusMessage>,
    download_dir: std::path::PathBuf,
}

impl App {
    pub fn new(events: Sender<AppEvent>, service: ServiceKind, config: AppConfig) -> Result<App> {
        let client = ApiClient::new(
            &config.server.base_url,
            Duration::from_secs(config.server.timeout_secs),
        )?;
        let store = UserStore::new(ConfigManager::new(APP_NAME)?);
        Ok(Self::with_parts(events, service, config, client, store))
    }

    /// Assemble an App from pre-built parts (primarily for testing)
    pub fn with_parts(
        events: Sender<AppEvent>,
        service: ServiceKind,
        config: AppConfig,
        client: ApiClient,
        store: UserStore,
    ) -> App {
        let session = store.load_session();
        if let Some(session) = &session {
            tracing::info!("restored session for {}", session.email);
        }
        let download_dir = config.downloads.resolve();
        let filter_debounce = Debouncer::new(Duration::from_millis(config.ui.filter_debounce_ms));
        let resize_debounce = Debouncer::new(Duration::from_millis(config.ui.resize_debounce_ms));

        App {
            service,
            client,
            store,
            session,
            config,
            events,
            table: None,
            summary: None,
            search_modal: SearchModal::new(),
            auth_modal: AuthModal::new(),
            input_mode: InputMode::Normal,
            input: String::new(),
            input_cursor: 0,
            filter_debounce,
            pending_filter: None,
            resize_debounce,
            viewport_width: 0,
            narrow: false,
            col_cursor: 0,
            row_offset: 0,
            last_form: None,
            loading_state: LoadingState::Idle,
            status: None,
            download_dir,
        }
    }

    pub fn send_event(&mut self, event: AppEvent) -> Result<()> {
        self.events.send(event)?;
        Ok(())
    }

    pub fn is_loading(&self) -> bool {
        self.loading_state.is_loading()
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    pub fn last_form(&self) -> Option<&SearchForm> {
        self.last_form.as_ref()
    }

    fn toast(&mut self, kind: StatusKind, message: impl Into<String>) {
        self.status = Some(StatusMessage {
            kind,
            message: message.into(),
            expires_at: Instant::now()
                + Duration::from_millis(self.config.ui.status_duration_ms),
        });
    }

    /// Expire the status message; returns true when a redraw is needed
    pub fn tick(&mut self, now: Instant) -> bool {
        if let Some(status) = &self.status {
            if now >= status.expires_at {
                self.status = None;
                return true;
            }
        }
        false
    }

    /// Debounced work that has come due: at most one filter application and
    /// one layout recompute per quiescence window, always with the latest
    /// input value
    pub fn due_events(&mut self, now: Instant) -> Vec<AppEvent> {
        let mut due = Vec::new();
        if self.filter_debounce.fire(now) {
            let query = self.pending_filter.take().unwrap_or_default();
            due.push(AppEvent::ApplyFilter(query));
        }
        if self.resize_debounce.fire(now) {
            due.push(AppEvent::ApplyResize);
        }
        due
    }

    pub fn event(&mut self, event: &AppEvent) -> Option<AppEvent> {
        match event {
            AppEvent::Key(key) => self.handle_key(*key),
            AppEvent::Resize(width, _) => {
                self.viewport_width = *width;
                self.resize_debounce.trigger(Instant::now());
                None
            }
            AppEvent::ApplyResize => {
                self.narrow = self.viewport_width < self.config.ui.narrow_width;
                None
            }
            AppEvent::Search(form) => {
                if self.is_loading() {
                    self.toast(StatusKind::Info, "Please wait for the current request");
                    return None;
                }
                tracing::info!(service = self.service.as_str(), rank = form.rank, "search");
                self.last_form = Some(form.clone());
                self.loading_state = LoadingState::Busy {
                    phase: "Searching".to_string(),
                };
                Some(AppEvent::DoSearch(form.clone()))
            }
            AppEvent::DoSearch(form) => {
                match self.client.search(self.service, form) {
                    Ok(data) => {
                        let mut table = ResultsTable::new(data.columns, data.rows);
                        // A fresh result set makes the export control usable
                        table.mark_export_ready();
                        self.table = Some(table);
                        self.summary = data.summary;
                        self.row_offset = 0;
                        self.col_cursor = 0;
                        self.input.clear();
                        self.input_cursor = 0;
                        self.pending_filter = None;
                        self.filter_debounce.cancel();
                        self.input_mode = InputMode::Normal;
                        let message = match self.service {
                            ServiceKind::Josaa => "Preferences generated successfully",
                            ServiceKind::Mhtcet => "Search completed successfully",
                        };
                        self.toast(StatusKind::Success, message);
                    }
                    Err(e) => {
                        // The previous result set stays intact
                        tracing::warn!("search failed: {}", e);
                        self.toast(
                            StatusKind::Error,
                            "Failed to perform search. Please try again.",
                        );
                    }
                }
                self.loading_state = LoadingState::Idle;
                None
            }
            AppEvent::ApplyFilter(query) => {
                if let Some(table) = &mut self.table {
                    table.set_filter(query);
                    self.row_offset = 0;
                }
                None
            }
            AppEvent::Sort(column) => {
                if let Some(table) = &mut self.table {
                    table.sort_by(*column);
                }
                None
            }
            AppEvent::Export(format) => {
                if self.is_loading() {
                    self.toast(StatusKind::Info, "Please wait for the current request");
                    return None;
                }
                let ready = self
                    .table
                    .as_ref()
                    .map(|t| t.export_ready())
                    .unwrap_or(false);
                if !ready {
                    self.toast(StatusKind::Error, "Nothing to export yet");
                    return None;
                }
                let Some(form) = self.last_form.clone() else {
                    self.toast(StatusKind::Error, "Run a search before exporting");
                    return None;
                };
                self.loading_state = LoadingState::Busy {
                    phase: "Exporting".to_string(),
                };
                Some(AppEvent::DoExport(*format, form))
            }
            AppEvent::DoExport(format, form) => {
                tracing::info!(format = format.as_str(), "export");
                let saved = self
                    .client
                    .export(self.service, *format, form)
                    .map_err(|e| e.to_string())
                    .and_then(|payload| {
                        export::save_download(&self.download_dir, *format, &payload)
                            .map_err(|e| e.to_string())
                    });
                match saved {
                    Ok(path) => {
                        self.toast(
                            StatusKind::Success,
                            format!("Export saved to {}", path.display()),
                        );
                    }
                    Err(e) => {
                        tracing::warn!("export failed: {}", e);
                        self.toast(
                            StatusKind::Error,
                            "Failed to export results. Please try again.",
                        );
                    }
                }
                self.loading_state = LoadingState::Idle;
                None
            }
            AppEvent::Exit => None,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<AppEvent> {
        if key.kind == KeyEventKind::Release {
            return None;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(AppEvent::Exit);
        }
        if self.auth_modal.active {
            return self.handle_auth_key(key);
        }
        if self.search_modal.active {
            return self.handle_search_key(key);
        }
        match self.input_mode {
            InputMode::Filtering => self.handle_filter_key(key),
            InputMode::Normal => self.handle_normal_key(key),
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> Option<AppEvent> {
        match key.code {
            KeyCode::Char('q') => return Some(AppEvent::Exit),
            KeyCode::Char('g') => {
                self.search_modal.open();
            }
            KeyCode::Char('/') => {
                if let Some(table) = &self.table {
                    self.input = table.filter().to_string();
                    self.input_cursor = self.input.chars().count();
                    self.input_mode = InputMode::Filtering;
                } else {
                    self.toast(StatusKind::Info, "Run a search first");
                }
            }
            KeyCode::Char('s') | KeyCode::Enter => {
                if let Some(table) = &self.table {
                    if !table.columns().is_empty() {
                        return Some(AppEvent::Sort(self.col_cursor));
                    }
                }
            }
            KeyCode::Left => {
                self.col_cursor = self.col_cursor.saturating_sub(1);
            }
            KeyCode::Right => {
                if let Some(table) = &self.table {
                    let max = table.columns().len().saturating_sub(1);
                    self.col_cursor = (self.col_cursor + 1).min(max);
                }
            }
            KeyCode::Up => {
                self.row_offset = self.row_offset.saturating_sub(1);
            }
            KeyCode::Down => {
                self.scroll_down(1);
            }
            KeyCode::PageUp => {
                self.row_offset = self.row_offset.saturating_sub(10);
            }
            KeyCode::PageDown => {
                self.scroll_down(10);
            }
            KeyCode::Char('e') => return Some(AppEvent::Export(ExportFormat::Csv)),
            KeyCode::Char('x') => return Some(AppEvent::Export(ExportFormat::Excel)),
            KeyCode::Char('l') => {
                if self.session.is_some() {
                    self.logout();
                } else {
                    self.auth_modal.open();
                }
            }
            _ => {}
        }
        None
    }

    fn scroll_down(&mut self, lines: usize) {
        let max = self
            .table
            .as_ref()
            .map(|t| t.visible_len().saturating_sub(1))
            .unwrap_or(0);
        self.row_offset = (self.row_offset + lines).min(max);
    }

    fn handle_filter_key(&mut self, key: KeyEvent) -> Option<AppEvent> {
        match key.code {
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
            }
            KeyCode::Enter => {
                // Immediate apply supersedes the pending debounce
                self.input_mode = InputMode::Normal;
                self.filter_debounce.cancel();
                self.pending_filter = None;
                return Some(AppEvent::ApplyFilter(self.input.clone()));
            }
            KeyCode::Left => {
                self.input_cursor = self.input_cursor.saturating_sub(1);
            }
            KeyCode::Right => {
                self.input_cursor = (self.input_cursor + 1).min(self.input.chars().count());
            }
            KeyCode::Backspace => {
                if self.input_cursor > 0 {
                    remove_char(&mut self.input, self.input_cursor - 1);
                    self.input_cursor -= 1;
                    self.arm_filter_debounce();
                }
            }
            KeyCode::Char(c) => {
                insert_char(&mut self.input, self.input_cursor, c);
                self.input_cursor += 1;
                self.arm_filter_debounce();
            }
            _ => {}
        }
        None
    }

    fn arm_filter_debounce(&mut self) {
        self.pending_filter = Some(self.input.clone());
        self.filter_debounce.trigger(Instant::now());
    }

    fn handle_search_key(&mut self, key: KeyEvent) -> Option<AppEvent> {
        match key.code {
            KeyCode::Esc => {
                self.search_modal.close();
            }
            KeyCode::Tab | KeyCode::Down => {
                self.search_modal.next_focus(self.service);
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.search_modal.prev_focus(self.service);
            }
            KeyCode::Left => {
                self.search_modal.adjust(-1);
            }
            KeyCode::Right => {
                self.search_modal.adjust(1);
            }
            KeyCode::Backspace => {
                self.search_modal.backspace();
            }
            KeyCode::Enter => match self.search_modal.focus {
                SearchFocus::Submit => return self.submit_search(),
                SearchFocus::Cancel => self.search_modal.close(),
                _ => self.search_modal.next_focus(self.service),
            },
            KeyCode::Char(c) => {
                self.search_modal.insert_char(c);
            }
            _ => {}
        }
        None
    }

    fn submit_search(&mut self) -> Option<AppEvent> {
        // Generating requires an account
        if self.session.is_none() {
            self.toast(StatusKind::Info, "Please log in to continue");
            self.auth_modal.open();
            return None;
        }
        match self.search_modal.build(self.service) {
            Ok(form) => {
                self.search_modal.close();
                Some(AppEvent::Search(form))
            }
            Err(message) => {
                self.search_modal.error = Some(message.clone());
                self.toast(StatusKind::Error, message);
                None
            }
        }
    }

    fn handle_auth_key(&mut self, key: KeyEvent) -> Option<AppEvent> {
        match key.code {
            KeyCode::Esc => {
                self.auth_modal.close();
            }
            KeyCode::Tab | KeyCode::Down => {
                self.auth_modal.next_focus();
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.auth_modal.prev_focus();
            }
            KeyCode::Backspace => {
                self.auth_modal.backspace();
            }
            KeyCode::Enter => match self.auth_modal.focus {
                AuthFocus::Submit => self.submit_auth(),
                AuthFocus::SwitchTab => self.auth_modal.switch_tab(),
                AuthFocus::Cancel => self.auth_modal.close(),
                _ => self.auth_modal.next_focus(),
            },
            KeyCode::Char(c) => {
                self.auth_modal.insert_char(c);
            }
            _ => {}
        }
        None
    }

    fn submit_auth(&mut self) {
        let result = match self.auth_modal.tab {
            AuthTab::Login => self
                .store
                .login(self.auth_modal.email.trim(), &self.auth_modal.password),
            AuthTab::Signup => self.store.signup(
                &self.auth_modal.name,
                &self.auth_modal.email,
                &self.auth_modal.password,
                &self.auth_modal.confirm,
            ),
        };
        match result {
            Ok(session) => {
                tracing::info!("logged in as {}", session.email);
                let message = match self.auth_modal.tab {
                    AuthTab::Login => "Login successful!",
                    AuthTab::Signup => "Account created successfully!",
                };
                self.session = Some(session);
                self.auth_modal.close();
                self.toast(StatusKind::Success, message);
            }
            Err(e) => {
                self.auth_modal.set_error(&e);
            }
        }
    }

    fn logout(&mut self) {
        if let Err(e) = self.store.logout() {
            tracing::warn!("could not remove session file: {}", e);
        }
        self.session = None;
        self.toast(StatusKind::Success, "Logged out successfully");
    }
}

fn insert_char(s: &mut String, char_idx: usize, c: char) {
    let byte_idx = s
        .char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    s.insert(byte_idx, c);
}

fn remove_char(s: &mut String, char_idx: usize) {
    if let Some((byte_idx, _)) = s.char_indices().nth(char_idx) {
        s.remove(byte_idx);
    }
}

/// Fixed-size rect centered in the given area
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(height.min(area.height)),
            Constraint::Fill(1),
        ])
        .split(area);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(width.min(area.width)),
            Constraint::Fill(1),
        ])
        .split(vertical[1]);
    horizontal[1]
}

impl App {
    fn render_header(&self, area: Rect, buf: &mut Buffer) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(1)])
            .split(area);

        let user = match &self.session {
            Some(session) => format!("Welcome, {}", session.name),
            None => "Not logged in".to_string(),
        };
        let title = Line::from(vec![
            Span::styled(
                self.service.title(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(user, Style::default().fg(Color::DarkGray)),
        ]);
        Paragraph::new(title).render(rows[0], buf);

        if let Some(summary) = &self.summary {
            Paragraph::new(summary.as_str())
                .style(Style::default().fg(Color::DarkGray))
                .render(rows[1], buf);
        }
    }

    fn render_input_strip(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default().borders(Borders::ALL).title(" Filter ");
        let inner = block.inner(area);
        block.render(area, buf);

        let chars: Vec<char> = self.input.chars().collect();
        let before: String = chars[..self.input_cursor.min(chars.len())].iter().collect();
        let at: String = chars
            .get(self.input_cursor)
            .map(|c| c.to_string())
            .unwrap_or_else(|| " ".to_string());
        let after: String = if self.input_cursor + 1 <= chars.len() {
            chars[(self.input_cursor + 1).min(chars.len())..].iter().collect()
        } else {
            String::new()
        };
        let line = Line::from(vec![
            Span::raw(before),
            Span::styled(at, Style::default().add_modifier(Modifier::REVERSED)),
            Span::raw(after),
        ]);
        Paragraph::new(line).render(inner, buf);
    }

    fn render_welcome(&self, area: Rect, buf: &mut Buffer) {
        let lines = vec![
            Line::default(),
            Line::from(Span::styled(
                self.service.title(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::default(),
            Line::from("Press g to enter your details and search"),
            Line::from("Press l to log in or create an account"),
            Line::from("Press q to quit"),
        ];
        Paragraph::new(lines).centered().render(area, buf);
    }

    fn render_loading(&self, area: Rect, buf: &mut Buffer) {
        if let LoadingState::Busy { phase } = &self.loading_state {
            let rect = centered_rect(40, 3, area);
            Clear.render(rect, buf);
            let block = Block::default().borders(Borders::ALL).title(" Loading ");
            let inner = block.inner(rect);
            block.render(rect, buf);
            Paragraph::new(format!("{}...", phase))
                .centered()
                .render(inner, buf);
        }
    }

    fn field_line<'a>(label: &'a str, value: String, focused: bool) -> Line<'a> {
        let label_style = if focused {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let value_style = if focused {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };
        Line::from(vec![
            Span::styled(format!("{:<22}", label), label_style),
            Span::styled(value, value_style),
        ])
    }

    fn button_span(label: &str, focused: bool) -> Span<'_> {
        let style = if focused {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            Style::default()
        };
        Span::styled(format!("[ {} ]", label), style)
    }

    fn render_search_modal(&self, area: Rect, buf: &mut Buffer) {
        let modal = &self.search_modal;
        let height = match self.service {
            ServiceKind::Josaa => 13,
            ServiceKind::Mhtcet => 11,
        };
        let rect = centered_rect(56, height, area);
        Clear.render(rect, buf);
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Search ")
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(rect);
        block.render(rect, buf);

        let mut lines = vec![
            Self::field_line(
                modal.rank_label(self.service),
                modal.rank.clone(),
                modal.focus == SearchFocus::Rank,
            ),
            Self::field_line(
                "Category",
                modal.category.clone(),
                modal.focus == SearchFocus::Category,
            ),
            Self::field_line(
                modal.college_type_label(self.service),
                modal.college_type.clone(),
                modal.focus == SearchFocus::CollegeType,
            ),
            Self::field_line(
                "Preferred Branch",
                modal.branch.clone(),
                modal.focus == SearchFocus::Branch,
            ),
        ];
        if self.service == ServiceKind::Josaa {
            lines.push(Self::field_line(
                "Round",
                format!("< {} >", modal.round),
                modal.focus == SearchFocus::Round,
            ));
            lines.push(Self::field_line(
                "Min Probability",
                format!("< {}% >", modal.min_probability),
                modal.focus == SearchFocus::MinProbability,
            ));
        }
        lines.push(Line::default());
        lines.push(Line::from(vec![
            Self::button_span("Generate", modal.focus == SearchFocus::Submit),
            Span::raw("  "),
            Self::button_span("Cancel", modal.focus == SearchFocus::Cancel),
        ]));
        if let Some(error) = &modal.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        }
        Paragraph::new(lines).render(inner, buf);
    }

    fn render_auth_modal(&self, area: Rect, buf: &mut Buffer) {
        let modal = &self.auth_modal;
        let rect = centered_rect(56, 13, area);
        Clear.render(rect, buf);
        let title = match modal.tab {
            AuthTab::Login => " Login ",
            AuthTab::Signup => " Sign Up ",
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(rect);
        block.render(rect, buf);

        let masked = |s: &str| "*".repeat(s.chars().count());
        let mut lines = Vec::new();
        if modal.tab == AuthTab::Signup {
            lines.push(Self::field_line(
                "Name",
                modal.name.clone(),
                modal.focus == AuthFocus::Name,
            ));
            if let Some(message) = modal.field_error(AuthField::Name) {
                lines.push(error_line(message));
            }
        }
        lines.push(Self::field_line(
            "Email",
            modal.email.clone(),
            modal.focus == AuthFocus::Email,
        ));
        if let Some(message) = modal.field_error(AuthField::Email) {
            lines.push(error_line(message));
        }
        lines.push(Self::field_line(
            "Password",
            masked(&modal.password),
            modal.focus == AuthFocus::Password,
        ));
        if let Some(message) = modal.field_error(AuthField::Password) {
            lines.push(error_line(message));
        }
        if modal.tab == AuthTab::Signup {
            lines.push(Self::field_line(
                "Confirm Password",
                masked(&modal.confirm),
                modal.focus == AuthFocus::Confirm,
            ));
            if let Some(message) = modal.field_error(AuthField::Confirm) {
                lines.push(error_line(message));
            }
            let strength_color = match modal.strength {
                PasswordStrength::Strong => Color::Green,
                PasswordStrength::Medium => Color::Yellow,
                PasswordStrength::Weak => Color::Red,
                PasswordStrength::Unrated => Color::DarkGray,
            };
            lines.push(Line::from(Span::styled(
                modal.strength.label(),
                Style::default().fg(strength_color),
            )));
        }
        lines.push(Line::default());
        let switch_label = match modal.tab {
            AuthTab::Login => "Sign up instead",
            AuthTab::Signup => "Log in instead",
        };
        let submit_label = match modal.tab {
            AuthTab::Login => "Login",
            AuthTab::Signup => "Create Account",
        };
        lines.push(Line::from(vec![
            Self::button_span(submit_label, modal.focus == AuthFocus::Submit),
            Span::raw("  "),
            Self::button_span(switch_label, modal.focus == AuthFocus::SwitchTab),
            Span::raw("  "),
            Self::button_span("Cancel", modal.focus == AuthFocus::Cancel),
        ]));
        Paragraph::new(lines).render(inner, buf);
    }
}

fn error_line(message: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!("  {}", message),
        Style::default().fg(Color::Red),
    ))
}

impl Widget for &mut App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut constraints = vec![Constraint::Length(2), Constraint::Fill(1)];
        if self.input_mode == InputMode::Filtering {
            constraints.push(Constraint::Length(3));
        }
        if self.status.is_some() {
            constraints.push(Constraint::Length(1));
        }
        constraints.push(Constraint::Length(1)); // Controls
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        self.render_header(layout[0], buf);

        let main_area = layout[1];
        match &self.table {
            Some(table) => {
                let block = Block::default().borders(Borders::ALL).title(" Results ");
                let inner = block.inner(main_area);
                block.render(main_area, buf);
                ResultsTableView::new(table)
                    .with_narrow(self.narrow)
                    .with_col_cursor(self.col_cursor)
                    .with_offset(self.row_offset)
                    .render(inner, buf);
            }
            None => self.render_welcome(main_area, buf),
        }

        let mut next = 2;
        if self.input_mode == InputMode::Filtering {
            self.render_input_strip(layout[next], buf);
            next += 1;
        }
        if let Some(status) = &self.status {
            Paragraph::new(status.message.as_str())
                .style(Style::default().fg(status.kind.color()))
                .render(layout[next], buf);
            next += 1;
        }

        let row_count = self.table.as_ref().map(|t| t.visible_len());
        Controls::new()
            .with_row_count(row_count)
            .with_dimmed(self.is_loading())
            .with_logged_in(self.session.is_some())
            .render(layout[next], buf);

        if self.search_modal.active {
            self.render_search_modal(main_area, buf);
        }
        if self.auth_modal.active {
            self.render_auth_modal(main_area, buf);
        }
        self.render_loading(main_area, buf);
    }
}
