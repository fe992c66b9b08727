// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use horizon_app::{
    AppCommand, AppEvent, AppState, BUDGET_RANGES, CATEGORY_FILTERS, CatalogCommand,
    CatalogDisplay, CatalogEvent, CatalogView, ContactMethod, FILTER_ALL, InquiryField,
    InquiryPayload, InquiryPipeline, InquiryReceipt, LoadTicket, Notification, NotificationSink,
    NotificationVariant, Overlay, PendingSubmission, Project, RemoteFailure, SERVICE_CATALOG,
    STATUS_FILTERS, Screen, StatusTone, SubmissionResolution, SubmissionToken, SubmitBlocked,
    TIMELINE_OPTIONS, aborted_request_failure, cycle_option, status_tone,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Tabs, Wrap};
use std::any::Any;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;
use tracing::{debug, error, info, warn};

const STATUS_TTL: Duration = Duration::from_secs(4);
const TOAST_TTL: Duration = Duration::from_secs(5);
const TOAST_LIMIT: usize = 3;
const TOAST_WIDTH: u16 = 46;
const TOAST_HEIGHT: u16 = 5;
const CARD_LINES: usize = 5;
const TECHNOLOGY_PREVIEW: usize = 3;

/// Backend operations the terminal front end depends on. The `spawn_*`
/// defaults run inline and report through the channel; runtimes that own a
/// thread-safe client override them to run off the event loop.
pub trait AppRuntime {
    fn fetch_projects(&mut self) -> Result<Vec<Project>, RemoteFailure>;
    fn submit_inquiry(
        &mut self,
        payload: &InquiryPayload,
    ) -> Result<InquiryReceipt, RemoteFailure>;
    fn spawn_fetch(&mut self, ticket: LoadTicket, tx: Sender<InternalEvent>) -> Result<()> {
        let completion = CompletionGuard::load(ticket, tx);
        let result = self.fetch_projects();
        completion.complete(InternalEvent::CatalogLoaded { ticket, result })
    }
    fn spawn_submission(
        &mut self,
        pending: PendingSubmission,
        tx: Sender<InternalEvent>,
    ) -> Result<()> {
        let token = pending.token;
        let completion = CompletionGuard::submission(token, tx);
        let result = self.submit_inquiry(&pending.payload);
        completion.complete(InternalEvent::InquiryResolved { token, result })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalEvent {
    ClearStatus {
        token: u64,
    },
    ExpireToast {
        id: u64,
    },
    CatalogLoaded {
        ticket: LoadTicket,
        result: Result<Vec<Project>, RemoteFailure>,
    },
    InquiryResolved {
        token: SubmissionToken,
        result: Result<InquiryReceipt, RemoteFailure>,
    },
}

/// Delivers exactly one completion event for a background request. If the
/// worker unwinds before completing, dropping the guard reports the request
/// as aborted so the loop never waits on it forever.
#[derive(Debug)]
pub struct CompletionGuard {
    tx: Sender<InternalEvent>,
    fallback: Option<InternalEvent>,
}

impl CompletionGuard {
    pub fn load(ticket: LoadTicket, tx: Sender<InternalEvent>) -> Self {
        Self {
            tx,
            fallback: Some(InternalEvent::CatalogLoaded {
                ticket,
                result: Err(aborted_load_failure()),
            }),
        }
    }

    pub fn submission(token: SubmissionToken, tx: Sender<InternalEvent>) -> Self {
        Self {
            tx,
            fallback: Some(InternalEvent::InquiryResolved {
                token,
                result: Err(aborted_request_failure()),
            }),
        }
    }

    pub fn complete(mut self, event: InternalEvent) -> Result<()> {
        self.fallback = None;
        self.tx
            .send(event)
            .map_err(|_| anyhow!("event channel closed"))
    }
}

impl Drop for CompletionGuard {
    fn drop(&mut self) {
        if let Some(event) = self.fallback.take() {
            warn!("background request ended without a result");
            let _ = self.tx.send(event);
        }
    }
}

pub fn aborted_load_failure() -> RemoteFailure {
    RemoteFailure::transport("projects", "request aborted before completion")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum InquiryFocus {
    #[default]
    Service,
    Field(InquiryField),
    Contact,
    Submit,
}

impl InquiryFocus {
    const ORDER: [Self; 10] = [
        Self::Service,
        Self::Field(InquiryField::Name),
        Self::Field(InquiryField::Email),
        Self::Field(InquiryField::Phone),
        Self::Field(InquiryField::Company),
        Self::Field(InquiryField::Budget),
        Self::Field(InquiryField::Timeline),
        Self::Contact,
        Self::Field(InquiryField::Message),
        Self::Submit,
    ];

    fn step(self, delta: isize) -> Self {
        let len = Self::ORDER.len() as isize;
        let current = Self::ORDER
            .iter()
            .position(|focus| *focus == self)
            .unwrap_or(0) as isize;
        Self::ORDER[(current + delta).rem_euclid(len) as usize]
    }

    fn label(self) -> &'static str {
        match self {
            Self::Service => "Service",
            Self::Field(field) => field.label(),
            Self::Contact => "Preferred Contact Method",
            Self::Submit => "Submit",
        }
    }
}

fn choice_options(field: InquiryField) -> Option<&'static [&'static str]> {
    match field {
        InquiryField::Budget => Some(&BUDGET_RANGES),
        InquiryField::Timeline => Some(&TIMELINE_OPTIONS),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Toast {
    id: u64,
    notification: Notification,
}

/// On-screen notification stack. Expiry timers are armed by the loop after
/// each batch of notifications.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct ToastBoard {
    toasts: Vec<Toast>,
    next_id: u64,
    unscheduled: Vec<u64>,
}

impl ToastBoard {
    fn dismiss(&mut self, id: u64) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|toast| toast.id != id);
        self.toasts.len() != before
    }

    fn take_unscheduled(&mut self) -> Vec<u64> {
        std::mem::take(&mut self.unscheduled)
    }
}

impl NotificationSink for ToastBoard {
    fn notify(&mut self, notification: Notification) {
        self.next_id = self.next_id.saturating_add(1);
        debug!(id = self.next_id, title = %notification.title, "toast shown");
        self.toasts.push(Toast {
            id: self.next_id,
            notification,
        });
        if self.toasts.len() > TOAST_LIMIT {
            self.toasts.remove(0);
        }
        self.unscheduled.push(self.next_id);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct ViewData {
    title: String,
    catalog: CatalogView,
    inquiry: InquiryPipeline,
    cursor: usize,
    focus: InquiryFocus,
    toasts: ToastBoard,
    help_visible: bool,
    status_token: u64,
}

impl ViewData {
    fn new(title: &str) -> Self {
        Self {
            title: title.to_owned(),
            ..Self::default()
        }
    }
}

pub fn run_app<R: AppRuntime>(state: &mut AppState, runtime: &mut R, title: &str) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData::new(title);
    let (internal_tx, internal_rx) = mpsc::channel();

    // The default hook writes to stderr, which would corrupt the alternate screen.
    let previous_hook = panic::take_hook();
    panic::set_hook(Box::new(|info| {
        error!(panic = %info, "panic");
    }));

    start_catalog_load(runtime, &mut view_data, &internal_tx);

    let mut result = Ok(());
    loop {
        process_internal_events(state, &mut view_data, &internal_tx, &internal_rx);

        let mut fault = None;
        if let Err(error) = terminal.draw(|frame| {
            fault = draw_guarded(frame, state, &view_data);
        }) {
            result = Err(error).context("draw frame");
            break;
        }
        if let Some(detail) = fault {
            error!(%detail, "rendering fault caught; showing fallback");
            state.dispatch(AppCommand::RaiseFault(detail));
            continue;
        }

        let has_event = match event::poll(Duration::from_millis(120)).context("poll event") {
            Ok(has_event) => has_event,
            Err(error) => {
                result = Err(error);
                break;
            }
        };
        if has_event {
            match event::read().context("read event") {
                Ok(Event::Key(key)) => {
                    if handle_key_event(state, runtime, &mut view_data, &internal_tx, key) {
                        break;
                    }
                }
                Ok(_) => {}
                Err(error) => {
                    result = Err(error);
                    break;
                }
            }
        }
    }

    panic::set_hook(previous_hook);
    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn process_internal_events(
    state: &mut AppState,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                state.dispatch(AppCommand::ClearStatus);
            }
            InternalEvent::ClearStatus { .. } => {}
            InternalEvent::ExpireToast { id } => {
                view_data.toasts.dismiss(id);
            }
            InternalEvent::CatalogLoaded { ticket, result } => {
                for event in view_data.catalog.resolve_load(ticket, result) {
                    match event {
                        CatalogEvent::Loaded { count } => {
                            info!(count, "catalog ready");
                        }
                        CatalogEvent::StaleResponseDiscarded(ticket) => {
                            debug!(epoch = ticket.epoch(), "late catalog response dropped");
                        }
                        _ => {}
                    }
                }
                clamp_cursor(view_data);
            }
            InternalEvent::InquiryResolved { token, result } => {
                let resolution = view_data
                    .inquiry
                    .resolve(token, result, &mut view_data.toasts);
                if resolution == SubmissionResolution::Succeeded {
                    view_data.focus = InquiryFocus::default();
                }
                schedule_toast_expiry(view_data, tx);
            }
        }
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(STATUS_TTL);
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn emit_status(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    state.dispatch(AppCommand::SetStatus(message.into()));
    view_data.status_token = view_data.status_token.saturating_add(1);
    schedule_status_clear(internal_tx, view_data.status_token);
}

fn schedule_toast_expiry(view_data: &mut ViewData, internal_tx: &Sender<InternalEvent>) {
    for id in view_data.toasts.take_unscheduled() {
        let sender = internal_tx.clone();
        thread::spawn(move || {
            thread::sleep(TOAST_TTL);
            let _ = sender.send(InternalEvent::ExpireToast { id });
        });
    }
}

fn start_catalog_load<R: AppRuntime>(
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let (ticket, _) = view_data.catalog.begin_load();
    view_data.cursor = 0;
    if let Err(error) = runtime.spawn_fetch(ticket, internal_tx.clone()) {
        warn!(%error, "could not start catalog load");
        view_data
            .catalog
            .resolve_load(ticket, Err(aborted_load_failure()));
    }
}

fn start_submission<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let pending = match view_data.inquiry.begin_submit() {
        Ok(pending) => pending,
        Err(SubmitBlocked::InFlight) => {
            emit_status(state, view_data, internal_tx, "submission already in progress");
            return;
        }
        Err(SubmitBlocked::MissingFields(fields)) => {
            let labels = fields
                .iter()
                .map(|field| field.label())
                .collect::<Vec<_>>()
                .join(", ");
            emit_status(state, view_data, internal_tx, format!("required: {labels}"));
            return;
        }
    };

    let token = pending.token;
    info!(service_type = %pending.payload.service_type, "submitting inquiry");
    if let Err(error) = runtime.spawn_submission(pending, internal_tx.clone()) {
        warn!(%error, "could not start inquiry submission");
        view_data
            .inquiry
            .resolve(token, Err(aborted_request_failure()), &mut view_data.toasts);
        schedule_toast_expiry(view_data, internal_tx);
    }
}

fn handle_key_event<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    if state.has_fault() {
        handle_fault_key(state, runtime, view_data, internal_tx, key);
        return false;
    }

    if view_data.help_visible {
        if key.code == KeyCode::Esc || key.code == KeyCode::Char('?') {
            view_data.help_visible = false;
        }
        return false;
    }

    match state.screen {
        Screen::Catalog => handle_catalog_key(state, runtime, view_data, internal_tx, key),
        Screen::Inquiry => handle_inquiry_key(state, runtime, view_data, internal_tx, key),
    }
    false
}

fn handle_fault_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    let command = match key.code {
        KeyCode::Char('r') => AppCommand::Reload,
        KeyCode::Char('h') | KeyCode::Enter => AppCommand::GoHome,
        _ => return,
    };
    view_data.help_visible = false;
    for event in state.dispatch(command) {
        if event == AppEvent::ReloadRequested {
            info!("reloading after rendering fault");
            view_data.catalog.dispatch(CatalogCommand::ClearFilters);
            start_catalog_load(runtime, view_data, internal_tx);
        }
    }
}

fn handle_catalog_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    if *view_data.catalog.overlay() != Overlay::Closed {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => {
                view_data.catalog.dispatch(CatalogCommand::CloseOverlay);
            }
            KeyCode::Char('j') | KeyCode::Down => {
                move_cursor(view_data, 1);
                inspect_cursor(view_data);
            }
            KeyCode::Char('k') | KeyCode::Up => {
                move_cursor(view_data, -1);
                inspect_cursor(view_data);
            }
            _ => {}
        }
        return;
    }

    match (key.code, key.modifiers) {
        (KeyCode::Tab, _) => {
            state.dispatch(AppCommand::NextScreen);
        }
        (KeyCode::BackTab, _) => {
            state.dispatch(AppCommand::PrevScreen);
        }
        (KeyCode::Char('?'), _) => view_data.help_visible = true,
        (KeyCode::Char('j') | KeyCode::Down, _) => move_cursor(view_data, 1),
        (KeyCode::Char('k') | KeyCode::Up, _) => move_cursor(view_data, -1),
        (KeyCode::Char('g') | KeyCode::Home, _) => view_data.cursor = 0,
        (KeyCode::Char('G') | KeyCode::End, _) => {
            view_data.cursor = view_data.catalog.visible().len().saturating_sub(1);
        }
        (KeyCode::Enter, _) => inspect_cursor(view_data),
        (KeyCode::Char('c'), _) => cycle_category(state, view_data, internal_tx, 1),
        (KeyCode::Char('C'), _) => cycle_category(state, view_data, internal_tx, -1),
        (KeyCode::Char('s'), _) => cycle_status(state, view_data, internal_tx, 1),
        (KeyCode::Char('S'), _) => cycle_status(state, view_data, internal_tx, -1),
        (KeyCode::Char('x'), _) => {
            if !view_data
                .catalog
                .dispatch(CatalogCommand::ClearFilters)
                .is_empty()
            {
                clamp_cursor(view_data);
                emit_status(state, view_data, internal_tx, "filters cleared");
            }
        }
        (KeyCode::Char('r'), _) => {
            start_catalog_load(runtime, view_data, internal_tx);
            emit_status(state, view_data, internal_tx, "reloading projects");
        }
        _ => {}
    }
}

fn cycle_category(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    delta: isize,
) {
    let next = cycle_option(&CATEGORY_FILTERS, &view_data.catalog.filters().category, delta);
    view_data
        .catalog
        .dispatch(CatalogCommand::SetCategory(next.clone()));
    clamp_cursor(view_data);
    emit_status(state, view_data, internal_tx, format!("category: {next}"));
}

fn cycle_status(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    delta: isize,
) {
    let next = cycle_option(&STATUS_FILTERS, &view_data.catalog.filters().status, delta);
    view_data
        .catalog
        .dispatch(CatalogCommand::SetStatus(next.clone()));
    clamp_cursor(view_data);
    emit_status(state, view_data, internal_tx, format!("status: {next}"));
}

fn move_cursor(view_data: &mut ViewData, delta: isize) {
    let len = view_data.catalog.visible().len();
    if len == 0 {
        view_data.cursor = 0;
        return;
    }
    let next = (view_data.cursor as isize + delta).clamp(0, len as isize - 1);
    view_data.cursor = next as usize;
}

fn clamp_cursor(view_data: &mut ViewData) {
    let len = view_data.catalog.visible().len();
    view_data.cursor = view_data.cursor.min(len.saturating_sub(1));
}

fn inspect_cursor(view_data: &mut ViewData) {
    let id = view_data
        .catalog
        .visible()
        .get(view_data.cursor)
        .map(|project| project.id.clone());
    if let Some(id) = id {
        view_data.catalog.dispatch(CatalogCommand::Inspect(id));
    }
}

fn handle_inquiry_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    if key.code == KeyCode::Char('s') && key.modifiers.contains(KeyModifiers::CONTROL) {
        start_submission(state, runtime, view_data, internal_tx);
        return;
    }

    match key.code {
        KeyCode::Esc => {
            state.dispatch(AppCommand::ShowScreen(Screen::Catalog));
            return;
        }
        KeyCode::Tab | KeyCode::Down => {
            view_data.focus = view_data.focus.step(1);
            return;
        }
        KeyCode::BackTab | KeyCode::Up => {
            view_data.focus = view_data.focus.step(-1);
            return;
        }
        _ => {}
    }

    match view_data.focus {
        InquiryFocus::Service => match key.code {
            KeyCode::Left => cycle_service(view_data, -1),
            KeyCode::Right | KeyCode::Char(' ') => cycle_service(view_data, 1),
            KeyCode::Enter => {
                if view_data.inquiry.selected_service().is_none() {
                    cycle_service(view_data, 1);
                }
                view_data.focus = view_data.focus.step(1);
            }
            _ => {}
        },
        InquiryFocus::Field(field) => {
            if let Some(options) = choice_options(field) {
                let current = view_data.inquiry.form().field(field).to_owned();
                match key.code {
                    KeyCode::Left => {
                        let next = cycle_option(options, &current, -1);
                        view_data.inquiry.set_field(field, next);
                    }
                    KeyCode::Right | KeyCode::Char(' ') => {
                        let next = cycle_option(options, &current, 1);
                        view_data.inquiry.set_field(field, next);
                    }
                    KeyCode::Backspace | KeyCode::Delete => {
                        view_data.inquiry.set_field(field, "");
                    }
                    KeyCode::Enter => view_data.focus = view_data.focus.step(1),
                    _ => {}
                }
                return;
            }
            match key.code {
                KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                    view_data.inquiry.push_char(field, ch);
                }
                KeyCode::Backspace => view_data.inquiry.pop_char(field),
                KeyCode::Enter => view_data.focus = view_data.focus.step(1),
                _ => {}
            }
        }
        InquiryFocus::Contact => {
            if matches!(
                key.code,
                KeyCode::Left | KeyCode::Right | KeyCode::Char(' ')
            ) {
                let toggled = view_data.inquiry.form().preferred_contact_method.toggled();
                view_data.inquiry.set_contact_method(toggled);
            } else if key.code == KeyCode::Enter {
                view_data.focus = view_data.focus.step(1);
            }
        }
        InquiryFocus::Submit => {
            if key.code == KeyCode::Enter {
                start_submission(state, runtime, view_data, internal_tx);
            }
        }
    }
}

fn cycle_service(view_data: &mut ViewData, delta: isize) {
    let len = SERVICE_CATALOG.len() as isize;
    let next = match view_data.inquiry.selected_service() {
        Some(selected) => {
            let current = SERVICE_CATALOG
                .iter()
                .position(|service| service.id == selected.id)
                .unwrap_or(0) as isize;
            (current + delta).rem_euclid(len) as usize
        }
        None if delta < 0 => SERVICE_CATALOG.len() - 1,
        None => 0,
    };
    view_data.inquiry.select_service(SERVICE_CATALOG[next].id);
}

fn draw_guarded(
    frame: &mut ratatui::Frame<'_>,
    state: &AppState,
    view_data: &ViewData,
) -> Option<String> {
    if state.has_fault() {
        render_fault(frame, state);
        return None;
    }
    guard_render(|| render(frame, state, view_data))
}

/// Runs one draw pass, converting a panic into the fault detail it carried.
fn guard_render(draw: impl FnOnce()) -> Option<String> {
    panic::catch_unwind(AssertUnwindSafe(draw))
        .err()
        .map(|payload| panic_detail(payload.as_ref()))
}

fn panic_detail(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        return (*message).to_owned();
    }
    if let Some(message) = payload.downcast_ref::<String>() {
        return message.clone();
    }
    "unknown rendering fault".to_owned()
}

fn render(frame: &mut ratatui::Frame<'_>, state: &AppState, view_data: &ViewData) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let selected = Screen::ALL
        .iter()
        .position(|screen| *screen == state.screen)
        .unwrap_or(0);
    let tabs = Tabs::new(Screen::ALL.iter().map(|screen| screen.label()))
        .block(
            Block::default()
                .title(view_data.title.as_str())
                .borders(Borders::ALL),
        )
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .select(selected);
    frame.render_widget(tabs, layout[0]);

    match state.screen {
        Screen::Catalog => render_catalog(frame, layout[1], view_data),
        Screen::Inquiry => render_inquiry(frame, layout[1], view_data),
    }

    let status_widget = Paragraph::new(status_text(state, view_data))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status_widget, layout[2]);

    if state.screen == Screen::Catalog
        && let Some(project) = view_data.catalog.inspected()
    {
        let area = centered_rect(76, 80, frame.area());
        frame.render_widget(Clear, area);
        let overlay = Paragraph::new(render_overlay_text(project))
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .title(project.title.as_str())
                    .borders(Borders::ALL)
                    .style(Style::default().fg(Color::Cyan)),
            );
        frame.render_widget(overlay, area);
    }

    if view_data.help_visible {
        let area = centered_rect(70, 60, frame.area());
        frame.render_widget(Clear, area);
        let help = Paragraph::new(help_overlay_text())
            .block(Block::default().title("help").borders(Borders::ALL));
        frame.render_widget(help, area);
    }

    render_toasts(frame, &view_data.toasts);
}

fn render_catalog(frame: &mut ratatui::Frame<'_>, area: Rect, view_data: &ViewData) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(1)])
        .split(area);

    let filters = Paragraph::new(render_filter_bar_text(&view_data.catalog))
        .block(Block::default().title("filters").borders(Borders::ALL));
    frame.render_widget(filters, layout[0]);

    let body_style = match view_data.catalog.display() {
        CatalogDisplay::Failed { .. } => Style::default().fg(Color::Red),
        _ => Style::default(),
    };
    let visible_rows = layout[1].height.saturating_sub(2) as usize;
    let cursor_line = view_data.cursor * CARD_LINES;
    let scroll = (cursor_line + CARD_LINES).saturating_sub(visible_rows);
    let body = Paragraph::new(render_catalog_text(view_data))
        .style(body_style)
        .scroll((u16::try_from(scroll).unwrap_or(u16::MAX), 0))
        .block(Block::default().title("projects").borders(Borders::ALL));
    frame.render_widget(body, layout[1]);
}

fn render_inquiry(frame: &mut ratatui::Frame<'_>, area: Rect, view_data: &ViewData) {
    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    let services = Paragraph::new(render_services_text(view_data))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title("Choose Your Service")
                .borders(Borders::ALL),
        );
    frame.render_widget(services, layout[0]);

    let form = Paragraph::new(render_inquiry_form_text(view_data))
        .wrap(Wrap { trim: false })
        .block(Block::default().title("Project Details").borders(Borders::ALL));
    frame.render_widget(form, layout[1]);
}

fn render_toasts(frame: &mut ratatui::Frame<'_>, toasts: &ToastBoard) {
    let area = frame.area();
    let width = TOAST_WIDTH.min(area.width);
    for (index, toast) in toasts.toasts.iter().rev().enumerate() {
        let y = area.y + 1 + TOAST_HEIGHT * index as u16;
        if y + TOAST_HEIGHT > area.bottom() {
            break;
        }
        let rect = Rect {
            x: area.right().saturating_sub(width + 1),
            y,
            width,
            height: TOAST_HEIGHT,
        };
        let color = match toast.notification.variant {
            NotificationVariant::Destructive => Color::Red,
            NotificationVariant::Default => Color::Green,
        };
        frame.render_widget(Clear, rect);
        let widget = Paragraph::new(toast.notification.description.as_str())
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .title(toast.notification.title.as_str())
                    .borders(Borders::ALL)
                    .style(Style::default().fg(color)),
            );
        frame.render_widget(widget, rect);
    }
}

fn render_fault(frame: &mut ratatui::Frame<'_>, state: &AppState) {
    let area = centered_rect(70, 60, frame.area());
    frame.render_widget(Clear, frame.area());
    let text = render_fault_text(state, cfg!(debug_assertions));
    let widget = Paragraph::new(text)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title("Oops! Something went wrong")
                .borders(Borders::ALL)
                .style(Style::default().fg(Color::Red)),
        );
    frame.render_widget(widget, area);
}

fn render_fault_text(state: &AppState, show_detail: bool) -> String {
    let mut lines = vec![
        "We apologize for the inconvenience. The screen encountered an unexpected error."
            .to_owned(),
        String::new(),
        "r reload | h go home | ctrl+q quit".to_owned(),
    ];
    if show_detail && let Some(detail) = &state.fault {
        lines.push(String::new());
        lines.push("Error details (development build):".to_owned());
        lines.push(detail.clone());
    }
    lines.join("\n")
}

pub fn projects_found_label(count: usize) -> String {
    if count == 1 {
        "1 project found".to_owned()
    } else {
        format!("{count} projects found")
    }
}

fn render_filter_bar_text(catalog: &CatalogView) -> String {
    let filters = catalog.filters();
    let mut lines = vec![format!(
        "category: {} (c/C) | status: {} (s/S)",
        filters.category, filters.status
    )];

    let mut summary = Vec::new();
    if matches!(catalog.display(), CatalogDisplay::Items(_) | CatalogDisplay::Empty) {
        summary.push(projects_found_label(catalog.visible().len()));
    }
    if filters.is_active() {
        let mut chips = Vec::new();
        if filters.category != FILTER_ALL {
            chips.push(format!("[{}]", filters.category));
        }
        if filters.status != FILTER_ALL {
            chips.push(format!("[{}]", filters.status));
        }
        summary.push(format!("active: {} (x clear)", chips.join(" ")));
    }
    lines.push(summary.join(" | "));
    lines.join("\n")
}

fn render_catalog_text(view_data: &ViewData) -> String {
    match view_data.catalog.display() {
        CatalogDisplay::Loading => "Loading projects...".to_owned(),
        CatalogDisplay::Failed { reason } => {
            format!("Unable to load projects\n\n{reason}\n\npress r to try again")
        }
        CatalogDisplay::Empty => {
            "No projects found\n\nTry adjusting your filters to see more projects.".to_owned()
        }
        CatalogDisplay::Items(items) => items
            .iter()
            .enumerate()
            .map(|(index, project)| render_card_text(project, index == view_data.cursor))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

fn status_badge(status: &str) -> String {
    let mark = match status_tone(status) {
        StatusTone::Done => "✓",
        StatusTone::Active => "●",
        StatusTone::Pending => "○",
    };
    format!("{mark} {status}")
}

fn render_card_text(project: &Project, selected: bool) -> String {
    let marker = if selected { ">" } else { " " };
    let featured = if project.featured { " ★ Featured" } else { "" };

    let mut meta = vec![
        project.category.clone(),
        format!("started {}", project.started_label()),
    ];
    if project.project_link().is_some() {
        meta.push("Live".to_owned());
    }
    if project.github_link().is_some() {
        meta.push("Code".to_owned());
    }

    let (shown, hidden) = project.technology_preview(TECHNOLOGY_PREVIEW);
    let mut technologies = shown.join(", ");
    if hidden > 0 {
        technologies.push_str(&format!(" +{hidden} more"));
    }

    [
        format!(
            "{marker} {}  [{}]{featured}",
            project.title,
            status_badge(&project.status)
        ),
        format!("    {}", meta.join(" · ")),
        format!("    {}", project.short_description),
        format!("    {technologies}"),
    ]
    .join("\n")
        + "\n"
}

fn render_overlay_text(project: &Project) -> String {
    let mut lines = Vec::new();
    if !project.client_name.is_empty() {
        lines.push(format!("Client: {}", project.client_name));
        lines.push(String::new());
    }
    lines.push(project.description.clone());
    lines.push(String::new());
    if !project.technologies.is_empty() {
        lines.push(format!("Technologies: {}", project.technologies.join(", ")));
    }
    if !project.tags.is_empty() {
        lines.push(format!("Tags: {}", project.tags.join(", ")));
    }
    lines.push(format!("Category: {}", project.category));
    lines.push(format!("Status: {}", status_badge(&project.status)));
    lines.push(format!("Started: {}", project.started_label()));
    if let Some(completed) = project.completed_label() {
        lines.push(format!("Completed: {completed}"));
    }
    if let Some(url) = project.project_link() {
        lines.push(format!("View Live: {url}"));
    }
    if let Some(url) = project.github_link() {
        lines.push(format!("View Code: {url}"));
    }
    lines.push(String::new());
    lines.push("esc close | j/k next/prev project".to_owned());
    lines.join("\n")
}

fn render_services_text(view_data: &ViewData) -> String {
    let selected = view_data.inquiry.selected_service();
    let focused = view_data.focus == InquiryFocus::Service;
    let mut lines = Vec::new();
    for service in &SERVICE_CATALOG {
        let is_selected = selected.is_some_and(|selected| selected.id == service.id);
        let mark = if is_selected { "●" } else { "○" };
        lines.push(format!("{mark} {}  {}", service.title, service.price));
        lines.push(format!("  {}", service.description));
        if is_selected {
            for feature in service.features {
                lines.push(format!("    ✓ {feature}"));
            }
        }
    }
    lines.push(String::new());
    lines.push(if focused {
        "> left/right choose a service".to_owned()
    } else {
        "  tab to the service list to choose".to_owned()
    });
    lines.join("\n")
}

fn render_inquiry_form_text(view_data: &ViewData) -> String {
    let form = view_data.inquiry.form();
    let mut lines = Vec::new();
    for focus in InquiryFocus::ORDER {
        let marker = if focus == view_data.focus { ">" } else { " " };
        let line = match focus {
            InquiryFocus::Service => {
                let service = view_data
                    .inquiry
                    .selected_service()
                    .map_or("(none)", |service| service.title);
                format!("{marker} {}: {service}", focus.label())
            }
            InquiryFocus::Field(field) => {
                let required = if field.is_required() { " *" } else { "" };
                let value = form.field(field);
                let shown = match (choice_options(field), value.is_empty()) {
                    (Some(_), true) => "< select >".to_owned(),
                    (Some(_), false) => format!("< {value} >"),
                    (None, _) => value.to_owned(),
                };
                format!("{marker} {}{required}: {shown}", field.label())
            }
            InquiryFocus::Contact => {
                let choices = ContactMethod::ALL
                    .iter()
                    .map(|method| {
                        let mark = if *method == form.preferred_contact_method {
                            "●"
                        } else {
                            "○"
                        };
                        format!("{mark} {}", method.as_str())
                    })
                    .collect::<Vec<_>>()
                    .join("  ");
                format!("{marker} {}: {choices}", focus.label())
            }
            InquiryFocus::Submit => {
                lines.push(String::new());
                format!("{marker} {}", submit_label(&view_data.inquiry))
            }
        };
        lines.push(line);
    }
    lines.push(String::new());
    lines.push("We'll review your project and send you a custom proposal within 24 hours.".to_owned());
    lines.join("\n")
}

fn submit_label(inquiry: &InquiryPipeline) -> String {
    if inquiry.is_submitting() {
        return "[ Submitting... ]".to_owned();
    }
    if inquiry.can_submit() {
        return "[ Start My Project ]".to_owned();
    }
    let missing = inquiry
        .form()
        .missing_required()
        .iter()
        .map(|field| field.label())
        .collect::<Vec<_>>()
        .join(", ");
    format!("[ Start My Project ] (disabled: fill in {missing})")
}

fn status_text(state: &AppState, view_data: &ViewData) -> String {
    if view_data.help_visible {
        return String::new();
    }
    let default = match state.screen {
        Screen::Catalog if *view_data.catalog.overlay() != Overlay::Closed => {
            "esc close | j/k next/prev | ctrl+q quit"
        }
        Screen::Catalog => {
            "j/k move | enter details | c/C category | s/S status | x clear | r reload | tab screens | ? help | ctrl+q quit"
        }
        Screen::Inquiry => {
            "tab/shift+tab field | left/right choose | ctrl+s submit | esc projects | ctrl+q quit"
        }
    };
    match &state.status_line {
        Some(status) => format!("{status} | {default}"),
        None => default.to_owned(),
    }
}

fn help_overlay_text() -> &'static str {
    "global: ctrl+q quit\n\
projects: tab/shift+tab switch screens | ? help\n\
projects: j/k or up/down move | g/G first/last | enter open details\n\
projects: c/C next/prev category | s/S next/prev status | x clear filters | r reload\n\
details: esc/enter close | j/k show next/prev project\n\
get started: tab/shift+tab or up/down field | left/right choose service, budget, timeline, contact\n\
get started: type to edit | backspace delete | enter next field or submit | ctrl+s submit | esc projects\n\
fallback: r reload | h go home"
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
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
        .split(popup_layout[1])[1]
}
