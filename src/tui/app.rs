//! Main application logic for the terminal dashboard.
//!
//! This module contains the `App` struct which owns the session state (the
//! store, the focus timer and the router), handles user input, drives the
//! two tick sources and renders the five views plus their overlays.

use std::io;
use std::time::Duration;

use chrono::{Datelike, Duration as CalDuration, Local, NaiveDate};
use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Gauge, Paragraph, Row, Table, TableState, Wrap},
    Frame, Terminal,
};

use crate::db::{format_brl, truncate, Store};
use crate::deadline::{
    alert_groups, day_delta, day_summary, format_date_long, format_date_short, month_title,
    next_month, prev_month, tasks_for_day, urgency_label, MonthGrid, WEEKDAY_HEADERS,
};
use crate::fields::*;
use crate::task::{Task, TaskPatch};
use crate::timer::{format_hm, format_hms, FocusTimer, Ticker, TimerState, DAILY_TARGET_SECONDS};
use crate::tui::{
    colors::{priority_color, task_status_color, AMBER, GOLD, GREEN, GREY, RED, SLATE},
    enums::{AppState, InputMode, TaskTab},
    router::{Router, View},
    task_form::{
        TaskForm, CLIENT_FIELD, DUE_FIELD, KIND_FIELD, NOTES_FIELD, PRIORITY_FIELD, STATUS_FIELD,
        TITLE_FIELD,
    },
    utils::centered_rect,
};

/// Main application state for the terminal dashboard.
///
/// Owns the store, the router, the focus timer and the two independent
/// 1 Hz tick sources: one gating focus accumulation, one refreshing the
/// displayed wall clock. Both die with the event loop.
pub struct App {
    state: AppState,
    store: Store,
    router: Router,
    timer: FocusTimer,
    accum_ticker: Ticker,
    clock_ticker: Ticker,
    clock: String,
    today: NaiveDate,
    task_list_state: TableState,
    filtered_tasks: Vec<String>,
    task_tab: TaskTab,
    task_form: TaskForm,
    input_mode: InputMode,
    status_message: String,
    filter_text: String,
    filter_active: bool,
    cal_year: i32,
    cal_month: u32,
    selected_date: NaiveDate,
    day_selection: usize,
    detail_task: Option<String>,
}

impl App {
    /// Create the app around a store, starting on the given view.
    pub fn new(store: Store, initial: View) -> Self {
        let today = Local::now().date_naive();
        let mut app = App {
            cal_year: today.year(),
            cal_month: today.month(),
            state: AppState::Browse,
            store,
            router: Router::new(initial),
            timer: FocusTimer::new(),
            accum_ticker: Ticker::new(Duration::from_secs(1)),
            clock_ticker: Ticker::new(Duration::from_secs(1)),
            clock: Local::now().format("%H:%M:%S").to_string(),
            today,
            task_list_state: TableState::default(),
            filtered_tasks: Vec::new(),
            task_tab: TaskTab::Pending,
            task_form: TaskForm::new(today),
            input_mode: InputMode::None,
            status_message: String::new(),
            filter_text: String::new(),
            filter_active: false,
            selected_date: today,
            day_selection: 0,
            detail_task: None,
        };
        app.update_filtered_tasks();
        app
    }

    /// Advance the two tick sources. Accumulation ticks are applied only
    /// while the timer runs; the clock refreshes in every state.
    fn on_tick(&mut self) {
        let accum = self.accum_ticker.poll();
        if self.timer.is_running() {
            for _ in 0..accum {
                self.timer.tick();
            }
        }
        if self.clock_ticker.poll() > 0 {
            let now = Local::now();
            self.clock = now.format("%H:%M:%S").to_string();
            self.today = now.date_naive();
        }
    }

    fn set_status_message(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }

    /// Update the filtered task id list for the Tarefas view from the
    /// active tab and search text, preserving the selection when possible.
    fn update_filtered_tasks(&mut self) {
        let old_selected = self
            .task_list_state
            .selected()
            .and_then(|idx| self.filtered_tasks.get(idx))
            .cloned();

        let needle = self.filter_text.to_lowercase();
        self.filtered_tasks = self
            .store
            .tasks
            .iter()
            .filter(|t| match self.task_tab {
                TaskTab::Pending => t.status == TaskStatus::Producing,
                TaskTab::Adjustment => {
                    t.status == TaskStatus::Late || t.status == TaskStatus::Awaiting
                }
                TaskTab::Completed => t.status == TaskStatus::Done,
            })
            .filter(|t| {
                needle.is_empty()
                    || t.title.to_lowercase().contains(&needle)
                    || t.client.to_lowercase().contains(&needle)
                    || format_task_kind(t.kind).to_lowercase().contains(&needle)
            })
            .map(|t| t.id.clone())
            .collect();

        if let Some(old_id) = old_selected {
            if let Some(idx) = self.filtered_tasks.iter().position(|id| *id == old_id) {
                self.task_list_state.select(Some(idx));
                return;
            }
        }
        self.task_list_state.select(if self.filtered_tasks.is_empty() {
            None
        } else {
            Some(0)
        });
    }

    fn selected_task_id(&self) -> Option<String> {
        self.task_list_state
            .selected()
            .and_then(|idx| self.filtered_tasks.get(idx))
            .cloned()
    }

    fn day_tasks(&self) -> Vec<&Task> {
        tasks_for_day(&self.store.tasks, self.selected_date)
    }

    fn selected_day_task_id(&self) -> Option<String> {
        self.day_tasks()
            .get(self.day_selection)
            .map(|t| t.id.clone())
    }

    /// Mark a task done through the store, surfacing unknown ids.
    fn mark_done(&mut self, id: &str) {
        let patch = TaskPatch {
            status: Some(TaskStatus::Done),
            ..Default::default()
        };
        match self.store.update_task(id, patch) {
            Ok(()) => self.set_status_message("Tarefa concluída"),
            Err(e) => self.set_status_message(e),
        }
        self.update_filtered_tasks();
    }

    /// Bind a task to the focus timer. Binding is independent of the
    /// timer's state and counters.
    fn bind_to_timer(&mut self, id: String) {
        self.timer.bind_task(id);
        self.set_status_message("Tarefa vinculada ao relógio de foco.");
    }

    fn timer_start(&mut self) {
        self.timer.start();
        self.set_status_message("Foco iniciado");
    }

    fn timer_pause(&mut self) {
        if self.timer.is_running() {
            self.timer.pause();
            self.set_status_message("Foco pausado");
        }
    }

    fn timer_stop(&mut self) {
        let had_session = self.timer.session_seconds > 0 || self.timer.is_running();
        self.timer.stop();
        if had_session {
            self.set_status_message("Tempo registrado. Bom trabalho!");
        }
    }

    /// Move the calendar selection by whole days, following the grid into
    /// neighbouring months.
    fn move_selected_date(&mut self, days: i64) {
        self.selected_date += CalDuration::days(days);
        self.cal_year = self.selected_date.year();
        self.cal_month = self.selected_date.month();
    }

    /// Jump the calendar one month, keeping the selection on day 1 of the
    /// target month.
    fn jump_month(&mut self, forward: bool) {
        let (y, m) = if forward {
            next_month(self.cal_year, self.cal_month)
        } else {
            prev_month(self.cal_year, self.cal_month)
        };
        self.cal_year = y;
        self.cal_month = m;
        if let Some(first) = NaiveDate::from_ymd_opt(y, m, 1) {
            self.selected_date = first;
        }
    }

    /// Handle keyboard input in the browse state.
    ///
    /// Returns true if the application should quit.
    fn handle_browse_input(&mut self, key: KeyCode, modifiers: KeyModifiers) -> io::Result<bool> {
        if self.filter_active {
            match key {
                KeyCode::Esc => {
                    self.filter_active = false;
                    self.filter_text.clear();
                    self.update_filtered_tasks();
                }
                KeyCode::Enter => self.filter_active = false,
                KeyCode::Backspace => {
                    self.filter_text.pop();
                    self.update_filtered_tasks();
                }
                KeyCode::Char(c) => {
                    self.filter_text.push(c);
                    self.update_filtered_tasks();
                }
                _ => {}
            }
            return Ok(false);
        }

        // Global navigation.
        match key {
            KeyCode::Char('q') => return Ok(true),
            KeyCode::Char('h') => {
                self.state = AppState::Help;
                return Ok(false);
            }
            KeyCode::Tab => {
                self.router.next();
                return Ok(false);
            }
            KeyCode::BackTab => {
                self.router.prev();
                return Ok(false);
            }
            KeyCode::Char(c @ '1'..='5') => {
                let idx = c as usize - '1' as usize;
                self.router.set(View::ALL[idx]);
                return Ok(false);
            }
            // Timer controls are global: the clock panel lives on the
            // dashboard but the session keeps counting everywhere.
            KeyCode::Char('s') => {
                self.timer_start();
                return Ok(false);
            }
            KeyCode::Char('p') => {
                self.timer_pause();
                return Ok(false);
            }
            KeyCode::Char('x') => {
                self.timer_stop();
                return Ok(false);
            }
            KeyCode::Char('u') => {
                if self.timer.task_in_focus.is_some() {
                    self.timer.clear_task();
                    self.set_status_message("Vínculo removido do relógio");
                }
                return Ok(false);
            }
            _ => {}
        }

        match self.router.current() {
            View::Dashboard => self.handle_dashboard_input(key, modifiers),
            View::Tasks => self.handle_tasks_input(key, modifiers),
            _ => Ok(false),
        }
    }

    fn handle_dashboard_input(
        &mut self,
        key: KeyCode,
        _modifiers: KeyModifiers,
    ) -> io::Result<bool> {
        match key {
            KeyCode::Left => self.move_selected_date(-1),
            KeyCode::Right => self.move_selected_date(1),
            KeyCode::Up => self.move_selected_date(-7),
            KeyCode::Down => self.move_selected_date(7),
            KeyCode::Char('n') => self.jump_month(true),
            KeyCode::Char('b') => self.jump_month(false),
            KeyCode::Char('t') => {
                self.selected_date = self.today;
                self.cal_year = self.today.year();
                self.cal_month = self.today.month();
            }
            KeyCode::Enter => {
                if !self.day_tasks().is_empty() {
                    self.day_selection = 0;
                    self.state = AppState::DayDetail;
                } else {
                    self.set_status_message("Nenhuma tarefa para este dia");
                }
            }
            KeyCode::Char('a') => {
                self.task_form = TaskForm::new(self.selected_date);
                self.input_mode = InputMode::Text;
                self.state = AppState::AddTask;
            }
            _ => {}
        }
        Ok(false)
    }

    fn handle_tasks_input(&mut self, key: KeyCode, _modifiers: KeyModifiers) -> io::Result<bool> {
        match key {
            KeyCode::Down => {
                if !self.filtered_tasks.is_empty() {
                    let next = match self.task_list_state.selected() {
                        Some(i) => (i + 1) % self.filtered_tasks.len(),
                        None => 0,
                    };
                    self.task_list_state.select(Some(next));
                }
            }
            KeyCode::Up => {
                if !self.filtered_tasks.is_empty() {
                    let prev = match self.task_list_state.selected() {
                        Some(0) | None => self.filtered_tasks.len() - 1,
                        Some(i) => i - 1,
                    };
                    self.task_list_state.select(Some(prev));
                }
            }
            KeyCode::Char('t') => {
                self.task_tab = self.task_tab.next();
                self.update_filtered_tasks();
            }
            KeyCode::Char('/') => {
                self.filter_active = true;
                self.filter_text.clear();
            }
            KeyCode::Enter => {
                if let Some(id) = self.selected_task_id() {
                    self.detail_task = Some(id);
                    self.state = AppState::TaskDetail;
                }
            }
            KeyCode::Char('c') => {
                if let Some(id) = self.selected_task_id() {
                    self.mark_done(&id);
                } else {
                    self.set_status_message("Nenhuma tarefa selecionada");
                }
            }
            KeyCode::Char('f') => {
                if let Some(id) = self.selected_task_id() {
                    self.bind_to_timer(id);
                } else {
                    self.set_status_message("Nenhuma tarefa selecionada");
                }
            }
            KeyCode::Char('a') => {
                self.task_form = TaskForm::new(self.today);
                self.input_mode = InputMode::Text;
                self.state = AppState::AddTask;
            }
            _ => {}
        }
        Ok(false)
    }

    fn handle_task_detail_input(
        &mut self,
        key: KeyCode,
        _modifiers: KeyModifiers,
    ) -> io::Result<bool> {
        match key {
            KeyCode::Esc | KeyCode::Char('q') => {
                self.detail_task = None;
                self.state = AppState::Browse;
            }
            KeyCode::Char('c') => {
                if let Some(id) = self.detail_task.clone() {
                    self.mark_done(&id);
                }
            }
            KeyCode::Char('f') => {
                if let Some(id) = self.detail_task.clone() {
                    self.bind_to_timer(id);
                }
            }
            _ => {}
        }
        Ok(false)
    }

    fn handle_day_detail_input(
        &mut self,
        key: KeyCode,
        _modifiers: KeyModifiers,
    ) -> io::Result<bool> {
        let count = self.day_tasks().len();
        match key {
            KeyCode::Esc | KeyCode::Char('q') => self.state = AppState::Browse,
            KeyCode::Down => {
                if count > 0 {
                    self.day_selection = (self.day_selection + 1) % count;
                }
            }
            KeyCode::Up => {
                if count > 0 {
                    self.day_selection = (self.day_selection + count - 1) % count;
                }
            }
            KeyCode::Enter => {
                let id = self.selected_day_task_id();
                if let Some(id) = id {
                    self.detail_task = Some(id);
                    self.state = AppState::TaskDetail;
                }
            }
            KeyCode::Char('c') => {
                let id = self.selected_day_task_id();
                if let Some(id) = id {
                    self.mark_done(&id);
                }
            }
            KeyCode::Char('f') => {
                let id = self.selected_day_task_id();
                if let Some(id) = id {
                    self.bind_to_timer(id);
                }
            }
            _ => {}
        }
        if count > 0 {
            self.day_selection = self.day_selection.min(count.saturating_sub(1));
        }
        Ok(false)
    }

    fn handle_form_input(&mut self, key: KeyCode, modifiers: KeyModifiers) -> io::Result<bool> {
        match key {
            KeyCode::Esc => {
                self.input_mode = InputMode::None;
                self.state = AppState::Browse;
            }
            KeyCode::Tab | KeyCode::Down => {
                self.task_form.next_field();
                self.sync_input_mode();
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.task_form.prev_field();
                self.sync_input_mode();
            }
            KeyCode::Left => self.task_form.handle_left_right(false),
            KeyCode::Right => self.task_form.handle_left_right(true),
            KeyCode::Backspace => self.task_form.handle_backspace(),
            KeyCode::Delete => self.task_form.handle_delete(),
            KeyCode::Enter => match self.task_form.build(self.today) {
                Ok(fields) => {
                    let id = self.store.create_task(fields);
                    self.set_status_message(format!("Tarefa {} criada", id));
                    self.input_mode = InputMode::None;
                    self.state = AppState::Browse;
                    self.update_filtered_tasks();
                }
                Err(e) => self.set_status_message(e),
            },
            KeyCode::Char(c) => {
                if self.input_mode == InputMode::Text && !modifiers.contains(KeyModifiers::CONTROL)
                {
                    self.task_form.handle_char(c);
                }
            }
            _ => {}
        }
        Ok(false)
    }

    /// Text entry applies only while a text field is active; on the
    /// selector fields keystrokes are commands, not input.
    fn sync_input_mode(&mut self) {
        self.input_mode = if self.task_form.current_field <= NOTES_FIELD {
            InputMode::Text
        } else {
            InputMode::None
        };
    }

    fn handle_help_input(&mut self, key: KeyCode, _modifiers: KeyModifiers) -> io::Result<bool> {
        match key {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('h') => {
                self.state = AppState::Browse;
            }
            _ => {}
        }
        Ok(false)
    }

    /// Poll for and handle keyboard events based on current state.
    ///
    /// Returns true if the application should quit.
    fn handle_input(&mut self) -> io::Result<bool> {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                self.status_message.clear();

                let should_quit = match self.state {
                    AppState::Browse => self.handle_browse_input(key.code, key.modifiers)?,
                    AppState::TaskDetail => {
                        self.handle_task_detail_input(key.code, key.modifiers)?
                    }
                    AppState::DayDetail => self.handle_day_detail_input(key.code, key.modifiers)?,
                    AppState::AddTask => self.handle_form_input(key.code, key.modifiers)?,
                    AppState::Help => self.handle_help_input(key.code, key.modifiers)?,
                };
                if should_quit {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }

    // ---- rendering ----------------------------------------------------

    fn render_header(&self, f: &mut Frame, area: Rect) {
        let view = self.router.current();
        let mut nav: Vec<Span> = Vec::new();
        for (i, v) in View::ALL.iter().enumerate() {
            let label = format!(" {} {} ", i + 1, v.title().split(' ').next().unwrap_or(""));
            let style = if *v == view {
                Style::default().bg(GOLD).fg(Color::Rgb(20, 20, 20))
            } else {
                Style::default().fg(GREY)
            };
            nav.push(Span::styled(label, style));
            nav.push(Span::raw(" "));
        }

        let pending = self
            .store
            .tasks
            .iter()
            .filter(|t| t.status != TaskStatus::Done)
            .count();
        let context = format!(
            "Hoje: {}   Pendências: {}   Rota: {}",
            format_date_short(self.today),
            pending,
            view.route()
        );

        let header = Paragraph::new(vec![
            Line::from(vec![
                Span::styled(
                    view.title(),
                    Style::default().fg(GOLD).add_modifier(Modifier::BOLD),
                ),
                Span::raw("   "),
                Span::styled(context, Style::default().fg(GREY).add_modifier(Modifier::ITALIC)),
            ]),
            Line::from(nav),
        ])
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Left);
        f.render_widget(header, area);
    }

    fn render_kpis(&self, f: &mut Frame, area: Rect) {
        let (billed, received, receivable) = self.store.month_totals(self.today);
        let cards = [
            ("Clientes Ativos", format!("{}", self.store.active_clients()), GOLD),
            ("Valor Total (Mês)", format_brl(billed), GOLD),
            ("Valor Recebido", format_brl(received), GREEN),
            ("A Receber", format_brl(receivable), SLATE),
        ];
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(25),
                Constraint::Percentage(25),
                Constraint::Percentage(25),
                Constraint::Percentage(25),
            ])
            .split(area);
        for (i, (label, value, color)) in cards.iter().enumerate() {
            let card = Paragraph::new(vec![
                Line::from(Span::styled(*label, Style::default().fg(GREY))),
                Line::from(Span::styled(
                    value.clone(),
                    Style::default().fg(*color).add_modifier(Modifier::BOLD),
                )),
            ])
            .block(Block::default().borders(Borders::ALL))
            .alignment(Alignment::Center);
            f.render_widget(card, chunks[i]);
        }
    }

    fn render_calendar(&self, f: &mut Frame, area: Rect) {
        let grid = match MonthGrid::new(self.cal_year, self.cal_month) {
            Some(g) => g,
            None => return,
        };

        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(
            WEEKDAY_HEADERS
                .iter()
                .map(|d| Span::styled(format!("{:^6}", d), Style::default().fg(GREY)))
                .collect::<Vec<_>>(),
        ));

        let cells = grid.cells();
        for week in cells.chunks(7) {
            let mut spans: Vec<Span> = Vec::new();
            for cell in week {
                match cell {
                    None => spans.push(Span::raw("      ")),
                    Some(day) => {
                        let date = match grid.date_of(*day) {
                            Some(d) => d,
                            None => continue,
                        };
                        let day_tasks = tasks_for_day(&self.store.tasks, date);
                        let mut marks = String::new();
                        let mut seen: Vec<TaskStatus> = Vec::new();
                        for t in &day_tasks {
                            if !seen.contains(&t.status) {
                                seen.push(t.status);
                            }
                        }
                        for _ in 0..seen.len().min(3) {
                            marks.push('•');
                        }
                        let text = format!("{:>3}{:<3}", day, marks);
                        let mut style = Style::default();
                        if date == self.selected_date {
                            style = style.bg(GOLD).fg(Color::Rgb(20, 20, 20));
                        } else if date == self.today {
                            style = style.fg(GOLD).add_modifier(Modifier::BOLD);
                        } else if !day_tasks.is_empty() {
                            style = style.fg(task_status_color(day_tasks[0].status));
                        } else if crate::deadline::is_weekend(date) {
                            style = style.fg(Color::DarkGray);
                        }
                        spans.push(Span::styled(text, style));
                    }
                }
            }
            lines.push(Line::from(spans));
        }

        lines.push(Line::from(""));
        let summary = day_summary(&self.day_tasks()).unwrap_or_else(|| {
            format!(
                "{} — nenhuma tarefa para este dia",
                format_date_short(self.selected_date)
            )
        });
        lines.push(Line::from(Span::styled(summary, Style::default().fg(GREY))));

        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(
                "Agenda de Produção — {} (setas mover, n/b mês, t hoje, Enter dia, a nova)",
                month_title(self.cal_year, self.cal_month)
            ))
            .title_style(Style::default().fg(GOLD));
        let calendar = Paragraph::new(lines).block(block);
        f.render_widget(calendar, area);
    }

    fn render_clock(&self, f: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title("Relógio de Produtividade")
            .title_style(Style::default().fg(GOLD));
        let inner = block.inner(area);
        f.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // wall clock
                Constraint::Length(2), // session
                Constraint::Length(2), // today/week
                Constraint::Length(2), // gauge
                Constraint::Length(1), // bound task
                Constraint::Length(1), // state + keys
            ])
            .split(inner);

        let state_color = match self.timer.state {
            TimerState::Running => GOLD,
            TimerState::Paused => AMBER,
            TimerState::Stopped => SLATE,
        };

        let wall = Paragraph::new(vec![
            Line::from(Span::styled("Hora local", Style::default().fg(GREY))),
            Line::from(Span::styled(
                self.clock.clone(),
                Style::default().fg(GOLD).add_modifier(Modifier::BOLD),
            )),
        ])
        .alignment(Alignment::Center);
        f.render_widget(wall, chunks[0]);

        let session = Paragraph::new(vec![
            Line::from(Span::styled(
                format_hms(self.timer.session_seconds),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled("sessão", Style::default().fg(GREY))),
        ])
        .alignment(Alignment::Center);
        f.render_widget(session, chunks[1]);

        let totals = Paragraph::new(vec![
            Line::from(Span::styled(
                format!("{} hoje", format_hm(self.timer.today_seconds)),
                Style::default().fg(GREY),
            )),
            Line::from(Span::styled(
                format!("{} na semana", format_hm(self.timer.week_seconds)),
                Style::default().fg(GREY),
            )),
        ])
        .alignment(Alignment::Center);
        f.render_widget(totals, chunks[2]);

        let ratio = self.timer.progress_ratio(DAILY_TARGET_SECONDS);
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(GOLD).bg(Color::Rgb(34, 34, 34)))
            .ratio(ratio)
            .label(format!("{}% da meta diária", (ratio * 100.0).round() as u16));
        f.render_widget(gauge, chunks[3]);

        let bound = match &self.timer.task_in_focus {
            Some(id) => {
                let title = self
                    .store
                    .get_task(id)
                    .map(|t| truncate(&t.title, 24))
                    .unwrap_or_else(|| id.clone());
                Line::from(Span::styled(
                    format!("Em foco: {}", title),
                    Style::default().fg(GOLD),
                ))
            }
            None => Line::from(Span::styled(
                "Nenhuma tarefa vinculada",
                Style::default().fg(Color::DarkGray),
            )),
        };
        f.render_widget(Paragraph::new(bound).alignment(Alignment::Center), chunks[4]);

        let state_line = Line::from(vec![
            Span::styled("● ", Style::default().fg(state_color)),
            Span::styled(
                self.timer.status_label(),
                Style::default().fg(state_color).add_modifier(Modifier::BOLD),
            ),
            Span::styled("  s iniciar  p pausar  x encerrar", Style::default().fg(GREY)),
        ]);
        f.render_widget(Paragraph::new(state_line).alignment(Alignment::Center), chunks[5]);
    }

    fn render_alerts(&self, f: &mut Frame, area: Rect) {
        let groups = alert_groups(&self.store.tasks, self.today);
        let sections: [(&str, Color, &Vec<&Task>); 3] = [
            ("Urgentes", RED, &groups.urgent),
            ("Próximos", AMBER, &groups.upcoming),
            ("Dentro do prazo", SLATE, &groups.within_deadline),
        ];

        let mut lines: Vec<Line> = Vec::new();
        for (title, color, tasks) in sections {
            if tasks.is_empty() {
                continue;
            }
            lines.push(Line::from(vec![
                Span::styled("● ", Style::default().fg(color)),
                Span::styled(title, Style::default().fg(GREY).add_modifier(Modifier::BOLD)),
            ]));
            for task in tasks {
                let label = urgency_label(day_delta(task.due, self.today));
                lines.push(Line::from(vec![
                    Span::raw("  "),
                    Span::styled(truncate(&task.title, 22), Style::default().fg(Color::White)),
                    Span::styled(format!(" · {}", truncate(&task.client, 14)), Style::default().fg(GREY)),
                    Span::styled(format!("  {}", label), Style::default().fg(color)),
                ]));
            }
        }
        if lines.is_empty() {
            lines.push(Line::from(Span::styled(
                "Sem alertas de prazo",
                Style::default().fg(Color::DarkGray),
            )));
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!("Alertas de Prazos ({})", groups.urgent.len()))
            .title_style(Style::default().fg(GOLD));
        f.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), area);
    }

    fn render_dashboard(&self, f: &mut Frame, area: Rect) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0)])
            .split(area);
        self.render_kpis(f, rows[0]);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(rows[1]);
        self.render_calendar(f, columns[0]);

        let side = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(13), Constraint::Min(0)])
            .split(columns[1]);
        self.render_clock(f, side[0]);
        self.render_alerts(f, side[1]);
    }

    fn render_tasks(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(2), Constraint::Min(0)])
            .split(area);

        let count_for = |tab: TaskTab| {
            self.store
                .tasks
                .iter()
                .filter(|t| match tab {
                    TaskTab::Pending => t.status == TaskStatus::Producing,
                    TaskTab::Adjustment => {
                        t.status == TaskStatus::Late || t.status == TaskStatus::Awaiting
                    }
                    TaskTab::Completed => t.status == TaskStatus::Done,
                })
                .count()
        };

        let mut tabs: Vec<Span> = Vec::new();
        for tab in TaskTab::ALL {
            let label = format!(" {} ({}) ", tab.label(), count_for(tab));
            let style = if tab == self.task_tab {
                Style::default().bg(GOLD).fg(Color::Rgb(20, 20, 20))
            } else {
                Style::default().fg(GREY)
            };
            tabs.push(Span::styled(label, style));
            tabs.push(Span::raw(" "));
        }

        let total = self.store.tasks.len();
        let done = count_for(TaskTab::Completed);
        let rate = if total > 0 { done * 100 / total } else { 0 };
        let stats = format!(
            "Total: {}   Concluídas: {}   Taxa de conclusão: {}%   (t abas, / filtrar, Enter detalhes, c concluir, f focar)",
            total, done, rate
        );
        let strip = Paragraph::new(vec![
            Line::from(tabs),
            Line::from(Span::styled(stats, Style::default().fg(GREY))),
        ]);
        f.render_widget(strip, chunks[0]);

        let header = Row::new(
            ["ID", "Título", "Cliente", "Tipo", "Prioridade", "Status", "Prazo"]
                .iter()
                .map(|h| Cell::from(*h).style(Style::default().add_modifier(Modifier::BOLD))),
        )
        .style(Style::default().bg(GOLD).fg(Color::Rgb(20, 20, 20)))
        .height(1);

        let today = self.today;
        let rows: Vec<Row> = self
            .filtered_tasks
            .iter()
            .filter_map(|id| self.store.get_task(id))
            .map(|task| {
                let style = match task.status {
                    TaskStatus::Done => Style::default().fg(Color::DarkGray),
                    TaskStatus::Late => Style::default().fg(RED).add_modifier(Modifier::BOLD),
                    _ => Style::default().fg(Color::White),
                };
                Row::new(vec![
                    Cell::from(task.id.clone()),
                    Cell::from(truncate(&task.title, 32)),
                    Cell::from(truncate(&task.client, 20)),
                    Cell::from(format_task_kind(task.kind)),
                    Cell::from(format_priority(task.priority))
                        .style(Style::default().fg(priority_color(task.priority))),
                    Cell::from(format_task_status(task.status))
                        .style(Style::default().fg(task_status_color(task.status))),
                    Cell::from(urgency_label(day_delta(task.due, today))),
                ])
                .style(style)
            })
            .collect();

        let title = if self.filter_active || !self.filter_text.is_empty() {
            format!("Tarefas ({}) — filtro: {}", self.filtered_tasks.len(), self.filter_text)
        } else {
            format!("Tarefas ({}/{})", self.filtered_tasks.len(), total)
        };
        let table = Table::new(
            rows,
            [
                Constraint::Length(6),
                Constraint::Min(24),
                Constraint::Length(20),
                Constraint::Length(10),
                Constraint::Length(10),
                Constraint::Length(21),
                Constraint::Length(16),
            ],
        )
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title))
        .row_highlight_style(Style::default().bg(Color::Gray).fg(Color::Black))
        .highlight_symbol(">> ");
        f.render_stateful_widget(table, chunks[1], &mut self.task_list_state);
    }

    fn render_clients(&self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(area);

        let header = Row::new(
            ["ID", "Nome", "Tipo", "Limite", "Saldo", "Status", "Contato"]
                .iter()
                .map(|h| Cell::from(*h).style(Style::default().add_modifier(Modifier::BOLD))),
        )
        .style(Style::default().bg(GOLD).fg(Color::Rgb(20, 20, 20)));

        let rows: Vec<Row> = self
            .store
            .clients
            .iter()
            .map(|c| {
                let status_style = match c.status {
                    ClientStatus::Active => Style::default().fg(GREEN),
                    ClientStatus::Warning => Style::default().fg(AMBER),
                    ClientStatus::Inactive => Style::default().fg(Color::DarkGray),
                };
                Row::new(vec![
                    Cell::from(c.id.clone()),
                    Cell::from(c.name.clone()),
                    Cell::from(format_client_kind(c.kind)),
                    Cell::from(format_brl(c.limit)),
                    Cell::from(format_brl(c.balance)).style(if c.balance < 0.0 {
                        Style::default().fg(RED)
                    } else {
                        Style::default()
                    }),
                    Cell::from(format_client_status(c.status)).style(status_style),
                    Cell::from(c.email.clone().unwrap_or_else(|| "-".into())),
                ])
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(5),
                Constraint::Min(18),
                Constraint::Length(13),
                Constraint::Length(12),
                Constraint::Length(12),
                Constraint::Length(8),
                Constraint::Min(20),
            ],
        )
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Clientes ({})", self.store.clients.len())),
        );
        f.render_widget(table, chunks[0]);

        let product_header = Row::new(
            ["ID", "Nome", "Tipo", "Preço padrão", "Prazo (dias)"]
                .iter()
                .map(|h| Cell::from(*h).style(Style::default().add_modifier(Modifier::BOLD))),
        )
        .style(Style::default().bg(SLATE).fg(Color::Rgb(20, 20, 20)));
        let product_rows: Vec<Row> = self
            .store
            .products
            .iter()
            .map(|p| {
                Row::new(vec![
                    Cell::from(p.id.clone()),
                    Cell::from(p.name.clone()),
                    Cell::from(format_product_kind(p.kind)),
                    Cell::from(format_brl(p.default_price)),
                    Cell::from(p.delivery_time.to_string()),
                ])
            })
            .collect();
        let products = Table::new(
            product_rows,
            [
                Constraint::Length(5),
                Constraint::Min(20),
                Constraint::Length(12),
                Constraint::Length(14),
                Constraint::Length(12),
            ],
        )
        .header(product_header)
        .block(Block::default().borders(Borders::ALL).title("Catálogo de Produtos"));
        f.render_widget(products, chunks[1]);
    }

    fn render_deliveries(&self, f: &mut Frame, area: Rect) {
        let header = Row::new(
            ["ID", "Cliente", "Título", "Data", "Status", "Arquivos"]
                .iter()
                .map(|h| Cell::from(*h).style(Style::default().add_modifier(Modifier::BOLD))),
        )
        .style(Style::default().bg(GOLD).fg(Color::Rgb(20, 20, 20)));

        let rows: Vec<Row> = self
            .store
            .deliveries
            .iter()
            .map(|d| {
                let status_style = match d.status {
                    DeliveryStatus::Approved => Style::default().fg(GREEN),
                    DeliveryStatus::InRevision => Style::default().fg(RED),
                    DeliveryStatus::Awaiting => Style::default().fg(GOLD),
                    DeliveryStatus::Sent => Style::default().fg(AMBER),
                };
                Row::new(vec![
                    Cell::from(d.id.clone()),
                    Cell::from(d.client.clone()),
                    Cell::from(d.title.clone()),
                    Cell::from(format_date_short(d.date)),
                    Cell::from(format_delivery_status(d.status)).style(status_style),
                    Cell::from(d.files.join(", ")),
                ])
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(5),
                Constraint::Length(20),
                Constraint::Min(22),
                Constraint::Length(12),
                Constraint::Length(11),
                Constraint::Min(16),
            ],
        )
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Entregas ({})", self.store.deliveries.len())),
        );
        f.render_widget(table, area);
    }

    fn render_finance(&self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(3)])
            .split(area);

        let header = Row::new(
            ["Data", "Cliente", "Tipo", "Descrição", "Valor", "Status"]
                .iter()
                .map(|h| Cell::from(*h).style(Style::default().add_modifier(Modifier::BOLD))),
        )
        .style(Style::default().bg(GOLD).fg(Color::Rgb(20, 20, 20)));

        let rows: Vec<Row> = self
            .store
            .finance
            .iter()
            .map(|e| {
                let status_style = match e.status {
                    PaymentStatus::Paid => Style::default().fg(GREEN),
                    PaymentStatus::Receivable => Style::default().fg(AMBER),
                };
                Row::new(vec![
                    Cell::from(format_date_short(e.date)),
                    Cell::from(e.client.clone()),
                    Cell::from(e.kind.clone()),
                    Cell::from(e.description.clone()),
                    Cell::from(format_brl(e.value)),
                    Cell::from(format_payment_status(e.status)).style(status_style),
                ])
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(12),
                Constraint::Length(20),
                Constraint::Length(11),
                Constraint::Min(20),
                Constraint::Length(13),
                Constraint::Length(10),
            ],
        )
        .header(header)
        .block(Block::default().borders(Borders::ALL).title("Histórico Financeiro"));
        f.render_widget(table, chunks[0]);

        let (billed, received, receivable) = self.store.month_totals(self.today);
        let totals = Paragraph::new(Line::from(vec![
            Span::styled("Faturado no mês: ", Style::default().fg(GREY)),
            Span::styled(format_brl(billed), Style::default().fg(GOLD)),
            Span::styled("   Recebido: ", Style::default().fg(GREY)),
            Span::styled(format_brl(received), Style::default().fg(GREEN)),
            Span::styled("   A receber: ", Style::default().fg(GREY)),
            Span::styled(format_brl(receivable), Style::default().fg(AMBER)),
        ]))
        .block(Block::default().borders(Borders::ALL));
        f.render_widget(totals, chunks[1]);
    }

    fn render_task_detail(&self, f: &mut Frame, area: Rect) {
        let task = match self.detail_task.as_deref().and_then(|id| self.store.get_task(id)) {
            Some(t) => t,
            None => return,
        };
        let popup = centered_rect(55, 55, area);
        f.render_widget(Clear, popup);

        let delta = day_delta(task.due, self.today);
        let lines = vec![
            Line::from(""),
            Line::from(vec![
                Span::styled("Título: ", Style::default().fg(GREY)),
                Span::styled(task.title.clone(), Style::default().add_modifier(Modifier::BOLD)),
            ]),
            Line::from(vec![
                Span::styled("Cliente: ", Style::default().fg(GREY)),
                Span::raw(task.client.clone()),
            ]),
            Line::from(vec![
                Span::styled("Tipo: ", Style::default().fg(GREY)),
                Span::raw(format_task_kind(task.kind)),
            ]),
            Line::from(vec![
                Span::styled("Prioridade: ", Style::default().fg(GREY)),
                Span::styled(
                    format_priority(task.priority),
                    Style::default().fg(priority_color(task.priority)),
                ),
            ]),
            Line::from(vec![
                Span::styled("Status: ", Style::default().fg(GREY)),
                Span::styled(
                    format_task_status(task.status),
                    Style::default().fg(task_status_color(task.status)),
                ),
            ]),
            Line::from(vec![
                Span::styled("Prazo: ", Style::default().fg(GREY)),
                Span::raw(format!(
                    "{} ({})",
                    format_date_short(task.due),
                    urgency_label(delta)
                )),
            ]),
            Line::from(vec![
                Span::styled("Notas: ", Style::default().fg(GREY)),
                Span::raw(task.notes.clone().unwrap_or_else(|| "-".into())),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                "c concluir   f vincular ao relógio   Esc voltar",
                Style::default().fg(GREY),
            )),
        ];

        let detail = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!("Tarefa {}", task.id))
                    .title_style(Style::default().fg(GOLD)),
            )
            .wrap(Wrap { trim: true });
        f.render_widget(detail, popup);
    }

    fn render_day_detail(&self, f: &mut Frame, area: Rect) {
        let day_tasks = self.day_tasks();
        let popup = centered_rect(55, 60, area);
        f.render_widget(Clear, popup);

        let mut lines: Vec<Line> = vec![Line::from(Span::styled(
            day_summary(&day_tasks).unwrap_or_else(|| "Nenhuma tarefa para este dia".into()),
            Style::default().fg(GREY),
        ))];
        lines.push(Line::from(""));
        for (i, task) in day_tasks.iter().enumerate() {
            let selected = i == self.day_selection;
            let marker = if selected { ">> " } else { "   " };
            let mut style = Style::default().fg(task_status_color(task.status));
            if selected {
                style = style.add_modifier(Modifier::BOLD);
            }
            lines.push(Line::from(vec![
                Span::styled(marker, Style::default().fg(GOLD)),
                Span::styled("● ", Style::default().fg(task_status_color(task.status))),
                Span::styled(format!("{} · {}", task.title, task.client), style),
                Span::styled(
                    format!(
                        "  [{} / {}]",
                        format_task_kind(task.kind),
                        format_task_status(task.status)
                    ),
                    Style::default().fg(GREY),
                ),
            ]));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Enter detalhes   c concluir   f focar   Esc voltar",
            Style::default().fg(GREY),
        )));

        let sheet = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!("Tarefas — {}", format_date_long(self.selected_date)))
                    .title_style(Style::default().fg(GOLD)),
            )
            .wrap(Wrap { trim: false });
        f.render_widget(sheet, popup);
    }

    fn render_task_form(&self, f: &mut Frame, area: Rect) {
        let popup = centered_rect(55, 65, area);
        f.render_widget(Clear, popup);

        let text_field = |label: &str, field: &crate::tui::input::InputField, active: bool| {
            let style = if active {
                Style::default().fg(GOLD).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            Line::from(vec![
                Span::styled(format!("{:<22}", label), Style::default().fg(GREY)),
                Span::styled(field.value.clone(), style),
                Span::styled(if active { "▏" } else { "" }, Style::default().fg(GOLD)),
            ])
        };
        let selector = |label: &str, value: &str, active: bool| {
            let style = if active {
                Style::default().fg(GOLD).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            Line::from(vec![
                Span::styled(format!("{:<22}", label), Style::default().fg(GREY)),
                Span::styled(format!("◀ {} ▶", value), style),
            ])
        };

        let form = &self.task_form;
        let lines = vec![
            Line::from(""),
            text_field("Título *", &form.title, form.current_field == TITLE_FIELD),
            text_field("Cliente *", &form.client, form.current_field == CLIENT_FIELD),
            text_field(
                "Data (YYYY-MM-DD) *",
                &form.due,
                form.current_field == DUE_FIELD,
            ),
            text_field("Notas", &form.notes, form.current_field == NOTES_FIELD),
            Line::from(""),
            selector(
                "Tipo",
                format_task_kind(form.kinds[form.kind]),
                form.current_field == KIND_FIELD,
            ),
            selector(
                "Status",
                format_task_status(form.statuses[form.status]),
                form.current_field == STATUS_FIELD,
            ),
            selector(
                "Prioridade",
                format_priority(form.priorities[form.priority]),
                form.current_field == PRIORITY_FIELD,
            ),
            Line::from(""),
            Line::from(Span::styled(
                "Tab próximo campo   ◀▶ alterar   Enter salvar   Esc cancelar",
                Style::default().fg(GREY),
            )),
        ];

        let widget = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Nova Tarefa")
                .title_style(Style::default().fg(GOLD)),
        );
        f.render_widget(widget, popup);
    }

    fn render_help(&self, f: &mut Frame, area: Rect) {
        let popup = centered_rect(60, 70, area);
        f.render_widget(Clear, popup);

        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Navegação",
                Style::default().fg(GOLD).add_modifier(Modifier::BOLD),
            )),
            Line::from("  1-5          ir para a tela (Dashboard, Tarefas, Cadastros, Entregas, Financeiro)"),
            Line::from("  Tab / S-Tab  próxima / tela anterior"),
            Line::from("  q            sair"),
            Line::from(""),
            Line::from(Span::styled(
                "Agenda (Dashboard)",
                Style::default().fg(GOLD).add_modifier(Modifier::BOLD),
            )),
            Line::from("  setas        mover a seleção de dia"),
            Line::from("  n / b        mês seguinte / anterior"),
            Line::from("  t            voltar para hoje"),
            Line::from("  Enter        tarefas do dia selecionado"),
            Line::from("  a            nova tarefa no dia selecionado"),
            Line::from(""),
            Line::from(Span::styled(
                "Relógio de foco",
                Style::default().fg(GOLD).add_modifier(Modifier::BOLD),
            )),
            Line::from("  s            iniciar"),
            Line::from("  p            pausar (apenas enquanto ativo)"),
            Line::from("  x            encerrar (zera a sessão, mantém hoje/semana)"),
            Line::from("  u            desvincular a tarefa do relógio"),
            Line::from(""),
            Line::from(Span::styled(
                "Tarefas",
                Style::default().fg(GOLD).add_modifier(Modifier::BOLD),
            )),
            Line::from("  t            alternar abas"),
            Line::from("  /            filtrar por título, cliente ou tipo"),
            Line::from("  c            concluir a tarefa selecionada"),
            Line::from("  f            vincular a tarefa ao relógio de foco"),
        ];

        let help = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Ajuda — Esc para voltar")
                    .title_style(Style::default().fg(GOLD)),
            )
            .wrap(Wrap { trim: false });
        f.render_widget(help, popup);
    }

    fn render_status_bar(&self, f: &mut Frame, area: Rect) {
        let text = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else if self.filter_active {
            format!("Filtro: {} (Esc limpar, Enter confirmar)", self.filter_text)
        } else {
            format!(
                "{} | 1-5 telas  Tab próxima  h ajuda  q sair",
                self.router.current().route()
            )
        };
        let bar = Paragraph::new(text)
            .style(Style::default().bg(GOLD).fg(Color::Rgb(20, 20, 20)))
            .alignment(Alignment::Left);
        f.render_widget(bar, area);
    }

    fn render_view(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0)])
            .split(area);
        self.render_header(f, chunks[0]);

        match self.router.current() {
            View::Dashboard => self.render_dashboard(f, chunks[1]),
            View::Tasks => self.render_tasks(f, chunks[1]),
            View::Clients => self.render_clients(f, chunks[1]),
            View::Deliveries => self.render_deliveries(f, chunks[1]),
            View::Finance => self.render_finance(f, chunks[1]),
        }
    }

    /// Main render function: the current view, then any overlay.
    fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)].as_ref())
            .split(f.area());

        self.render_view(f, chunks[0]);
        match self.state {
            AppState::Browse => {}
            AppState::TaskDetail => self.render_task_detail(f, chunks[0]),
            AppState::DayDetail => self.render_day_detail(f, chunks[0]),
            AppState::AddTask => self.render_task_form(f, chunks[0]),
            AppState::Help => self.render_help(f, chunks[0]),
        }
        self.render_status_bar(f, chunks[1]);
    }

    /// Main event loop for the TUI application.
    ///
    /// Ticks, renders and processes input until the user exits.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            self.on_tick();
            terminal.draw(|f| self.render(f))?;

            if self.handle_input()? {
                break;
            }
        }
        Ok(())
    }
}
